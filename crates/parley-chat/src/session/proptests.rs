//! Property-based tests for the send guard and hydration.

use std::sync::Arc;

use parley_common::{Message, Role, SessionId};
use proptest::prelude::*;

use super::*;
use crate::storage::MemoryStore;
use crate::testing::MockTransport;
use crate::{ChatReply, NullPresenter, TransportError};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn lifecycle(transport: Arc<MockTransport>) -> SessionLifecycle {
    SessionLifecycle::new(
        SessionIdentity::new(Arc::new(MemoryStore::new())),
        transport,
        Arc::new(NullPresenter),
    )
}

// ============================================================================
// Generators
// ============================================================================

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\r\n]{0,12}"
}

fn arb_message() -> impl Strategy<Value = Message> {
    (any::<bool>(), "[a-zA-Z0-9 ?.!]{1,40}").prop_map(|(is_user, content)| {
        if is_user {
            Message::user(content)
        } else {
            Message::assistant(content)
        }
    })
}

fn arb_reply() -> impl Strategy<Value = Result<ChatReply, TransportError>> {
    prop_oneof![
        "[a-z ]{1,20}".prop_map(|text| Ok(ChatReply::new(text))),
        Just(Err(TransportError::Timeout)),
        (500u16..600).prop_map(|status| Err(TransportError::Api {
            status,
            detail: "server error".into(),
        })),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn blank_queries_never_reach_transport(queries in prop::collection::vec(arb_blank(), 1..8)) {
        let transport = Arc::new(MockTransport::new());
        let lifecycle = lifecycle(transport.clone());
        let rt = runtime();

        for query in &queries {
            let outcome = rt.block_on(lifecycle.submit(query));
            prop_assert_eq!(outcome, SubmitOutcome::Rejected(RejectReason::Empty));
        }
        prop_assert!(transport.sent().is_empty());
        prop_assert!(lifecycle.snapshot().is_empty());
    }

    #[test]
    fn hydrate_preserves_server_sequence(history in prop::collection::vec(arb_message(), 0..20)) {
        let transport = MockTransport::new();
        let session_id = SessionId::parse("session_prop").unwrap();
        transport.set_history(session_id.as_str(), history.clone());

        let store = ConversationStore::new();
        let count = runtime().block_on(store.hydrate(&transport, &session_id)).unwrap();
        prop_assert_eq!(count, history.len());
        prop_assert_eq!(store.snapshot(), history);
    }

    #[test]
    fn every_exchange_appends_user_then_assistant(
        exchanges in prop::collection::vec(("[a-z]{1,10}", arb_reply()), 1..10)
    ) {
        let transport = Arc::new(MockTransport::new());
        let lifecycle = lifecycle(transport.clone());
        let rt = runtime();

        for (query, reply) in &exchanges {
            transport.push_reply(reply.clone());
            let outcome = rt.block_on(lifecycle.submit(query));
            prop_assert!(!outcome.is_rejected());
            prop_assert_eq!(outcome.is_success(), reply.is_ok());
            prop_assert_eq!(lifecycle.send_state(), SendState::Idle);
        }

        let snapshot = lifecycle.snapshot();
        prop_assert_eq!(snapshot.len(), exchanges.len() * 2);
        for (pair, (query, reply)) in snapshot.chunks(2).zip(&exchanges) {
            prop_assert_eq!(pair[0].role, Role::User);
            prop_assert_eq!(&pair[0].content, query);
            prop_assert_eq!(pair[1].role, Role::Assistant);
            if let Ok(reply) = reply {
                prop_assert_eq!(&pair[1].content, &reply.response);
            }
        }
        prop_assert_eq!(transport.sent().len(), exchanges.len());
    }
}
