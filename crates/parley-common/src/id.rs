use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const SESSION_PREFIX: &str = "session_";
const SUFFIX_LEN: usize = 9;
const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const MAX_SESSION_ID_LEN: usize = 128;
const SHORT_FORM_LEN: usize = 8;

/// Short hex id used to correlate the log lines of one exchange.
pub fn new_correlation_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

/// Opaque token naming one conversation.
///
/// Generated as `session_<unix millis>_<9 lowercase alphanumerics>`. Values
/// read back from storage are accepted as long as they are well-formed (see
/// [`SessionId::parse`]); the generation rule is not enforced on them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Synthesize a fresh identifier from the wall clock and a random suffix.
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();
        Self(format!("{SESSION_PREFIX}{millis}_{suffix}"))
    }

    /// Accept a stored token if it is non-empty, at most 128 characters and
    /// free of whitespace and control characters.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty()
            || raw.len() > MAX_SESSION_ID_LEN
            || raw.chars().any(|c| c.is_whitespace() || c.is_control())
        {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form: the last eight characters.
    pub fn short(&self) -> &str {
        let start = self
            .0
            .char_indices()
            .rev()
            .nth(SHORT_FORM_LEN - 1)
            .map(|(i, _)| i)
            .unwrap_or(0);
        &self.0[start..]
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for SessionId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("malformed session id: {value:?}"))
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}
