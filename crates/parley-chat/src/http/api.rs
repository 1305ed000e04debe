//! Transport trait implementation for HttpTransport.

use async_trait::async_trait;
use tracing::debug;

use parley_common::SessionId;

use super::client::{
    error_from_response, map_reqwest_error, ChatRequest, HistoryBody, HttpTransport,
};
use crate::{ChatReply, DeleteReceipt, HealthStatus, HistoryFetch, Transport, TransportError};

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        query: &str,
        session_id: &SessionId,
        user_identity: &str,
    ) -> Result<ChatReply, TransportError> {
        let url = self.endpoint(&["chat"]);
        let body = ChatRequest {
            query,
            session_id: session_id.as_str(),
            user_email: user_identity,
        };

        debug!(%url, session = %session_id, "chat request");

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response, "Failed to send message").await);
        }

        response.json().await.map_err(map_reqwest_error)
    }

    async fn fetch_history(&self, session_id: &SessionId) -> Result<HistoryFetch, TransportError> {
        let url = self.endpoint(&["conversation", session_id.as_str()]);
        debug!(%url, "history request");

        let response = self.http.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(HistoryFetch::NotFound);
        }
        if !status.is_success() {
            return Err(
                error_from_response(response, "Failed to fetch conversation history").await,
            );
        }

        let body: HistoryBody = response.json().await.map_err(map_reqwest_error)?;
        Ok(HistoryFetch::Found(body.messages))
    }

    async fn delete_history(&self, session_id: &SessionId) -> Result<DeleteReceipt, TransportError> {
        let url = self.endpoint(&["conversation", session_id.as_str()]);
        debug!(%url, "delete request");

        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response, "Failed to delete conversation").await);
        }

        response.json().await.map_err(map_reqwest_error)
    }

    async fn health_check(&self) -> Result<HealthStatus, TransportError> {
        let url = self.endpoint(&["health"]);
        let response = self.http.get(url).send().await.map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response, "Health check failed").await);
        }

        response.json().await.map_err(map_reqwest_error)
    }
}
