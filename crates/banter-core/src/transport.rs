//! HTTP transport to the agent server.
//!
//! One chat turn is a single `POST /call-agent` request carrying the user's
//! text; the reply text comes back in the `response` field of the JSON body.
//! No retry, no streaming, no cancellation. All failure detail is collapsed
//! into [`TransportError`] at this boundary; callers surface it to the user
//! only as [`ERROR_FALLBACK`].

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Server base URL used when none is given on the command line.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Endpoint path, fixed by the agent server.
const CALL_AGENT_PATH: &str = "/call-agent";

/// Reply substituted when the server answers 2xx but the `response` field is
/// absent or empty. The turn still counts as succeeded.
pub const EMPTY_REPLY_FALLBACK: &str = "Sorry, I received an empty response.";

/// Bot message substituted for any transport-level failure.
pub const ERROR_FALLBACK: &str = "Sorry, I encountered an error while processing your request. \
     Please make sure the server is running.";

/// Request body for a chat turn.
#[derive(Debug, Serialize)]
struct AgentRequest<'a> {
    msg: &'a str,
}

/// Expected success response body. Unknown fields are ignored; a missing
/// `response` field deserializes as `None`.
#[derive(Debug, Deserialize)]
struct AgentResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Errors that can occur while talking to the agent server.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Network failure or undecodable response body.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-2xx status.
    #[error("server returned {0}")]
    Status(StatusCode),

    /// The in-flight request task was torn down before completing.
    #[error("request was interrupted")]
    Interrupted,
}

/// Client for the agent server's chat endpoint.
#[derive(Debug, Clone)]
pub struct AgentClient {
    client: reqwest::Client,
    base_url: String,
}

impl AgentClient {
    /// Create a client for the server at `base_url` (scheme + host + port,
    /// with or without a trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one user message and return the agent's reply text.
    ///
    /// A 2xx response with a missing or blank `response` field is not an
    /// error: [`EMPTY_REPLY_FALLBACK`] is substituted and the turn succeeds.
    pub async fn send(&self, text: &str) -> Result<String, TransportError> {
        let url = format!("{}{}", self.base_url, CALL_AGENT_PATH);
        debug!(url = %url, "sending message to agent");

        let response = self
            .client
            .post(&url)
            .json(&AgentRequest { msg: text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "agent server returned an error status");
            return Err(TransportError::Status(status));
        }

        let body: AgentResponse = response.json().await?;
        match body.response {
            Some(reply) if !reply.trim().is_empty() => Ok(reply),
            _ => {
                debug!("agent response had no reply text, substituting fallback");
                Ok(EMPTY_REPLY_FALLBACK.to_string())
            }
        }
    }
}

/// Collapse a turn result into the text to display as the bot message.
pub fn reply_or_fallback(result: Result<String, TransportError>) -> String {
    match result {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "chat turn failed");
            ERROR_FALLBACK.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_send_returns_reply_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/call-agent"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "msg": "add milk to my list" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "Task added"
            })))
            .mount(&server)
            .await;

        let client = AgentClient::new(server.uri());
        let reply = client.send("add milk to my list").await.unwrap();
        assert_eq!(reply, "Task added");
    }

    #[tokio::test]
    async fn test_missing_response_field_substitutes_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/call-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .mount(&server)
            .await;

        let client = AgentClient::new(server.uri());
        let reply = client.send("hello").await.unwrap();
        assert_eq!(reply, EMPTY_REPLY_FALLBACK);
    }

    #[tokio::test]
    async fn test_blank_response_field_substitutes_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/call-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "   " })))
            .mount(&server)
            .await;

        let client = AgentClient::new(server.uri());
        let reply = client.send("hello").await.unwrap();
        assert_eq!(reply, EMPTY_REPLY_FALLBACK);
    }

    #[tokio::test]
    async fn test_error_status_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/call-agent"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = AgentClient::new(server.uri());
        let err = client.send("hello").await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::Status(StatusCode::INTERNAL_SERVER_ERROR)
        ));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/call-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = AgentClient::new(server.uri());
        let err = client.send("hello").await.unwrap_err();
        assert!(matches!(err, TransportError::Http(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_failure() {
        // Nothing listens on this port.
        let client = AgentClient::new("http://127.0.0.1:1");
        let err = client.send("hello").await.unwrap_err();
        assert!(matches!(err, TransportError::Http(_)));
    }

    #[test]
    fn test_reply_or_fallback() {
        assert_eq!(reply_or_fallback(Ok("Task added".into())), "Task added");
        assert_eq!(
            reply_or_fallback(Err(TransportError::Interrupted)),
            ERROR_FALLBACK
        );
        assert_eq!(
            reply_or_fallback(Err(TransportError::Status(StatusCode::BAD_GATEWAY))),
            ERROR_FALLBACK
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = AgentClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
    }
}
