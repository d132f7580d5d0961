use std::time::Duration;
use log::{debug, trace, error};
use crate::config::{EndpointConfig, CHAT_OPTIONS, COMPLETION_OPTIONS};
use crate::request::{
  ChatMessage, ChatRequest, ChatResponse,
  CompletionRequest, CompletionResponse,
};

/// Outcome of one completion call
pub type InvocationReply = Result<String, crate::error::Error>;

/// Outcome of one chat call
pub type ChatReply = Result<ChatMessage, crate::error::Error>;

/// Flatten a completion or chat reply into text,
/// failures as `"Error: <reason>"`
pub fn reply_text<T: std::fmt::Display>(
  reply: &Result<T, crate::error::Error>
) -> String
{   match reply
    {   Ok(value) => value.to_string()
      , Err(e) => format!("Error: {}", e)
    }
}

/// HTTP invoker for completion and chat endpoints.
///
/// Every call is a single best-effort POST; failures come back as
/// `Err` values and are never retried.
#[derive(Debug, Clone)]
pub struct ModelClient
{   http_client: reqwest::Client
}

impl Default for ModelClient
{   fn default() -> Self
    {   ModelClient::new()
    }
}

impl ModelClient
{   pub fn new() -> Self
    {   debug!("Creating ModelClient");
        ModelClient
        {   http_client: reqwest::Client::new()
        }
    }

    /// Client with a per-request timeout
    pub fn with_timeout(timeout_secs: u64)
      -> Result<Self, crate::error::Error>
    {   debug!("Creating ModelClient with {}s timeout", timeout_secs);
        let http_client = reqwest::Client::builder()
          .timeout(Duration::from_secs(timeout_secs))
          .build()
          .map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            crate::error::Error::InvalidConfiguration(e.to_string())
          })?;
        Ok(ModelClient { http_client })
    }

    /// Send one prompt to a completion endpoint
    pub async fn send_prompt(
      &self
    , url: &str
    , prompt: &str
    , model: &str
    ) -> InvocationReply
    {   debug!("send_prompt to {} for model: {}", url, model);

        let request = CompletionRequest
        {   prompt
          , model
          , stream: false
          , options: COMPLETION_OPTIONS
        };
        trace!("Completion request: {:?}", request);

        let response = self
          .post_json(url, &request)
          .await?
          .json::<CompletionResponse>()
          .await
          .map_err(|e| {
            error!("Parse error from {}: {}", url, e);
            crate::error::Error::ParseError(e.to_string())
          })?;

        debug!(
          "Model {} answered with {} bytes",
          model, response.response.len()
        );
        Ok(response.response)
    }

    /// Send a conversation to the chat endpoint of `endpoint`
    pub async fn send_chat(
      &self
    , endpoint: &EndpointConfig
    , messages: &[ChatMessage]
    , model: &str
    ) -> ChatReply
    {   let url = endpoint.chat_endpoint().map_err(|e| {
          error!("{}", e);
          e
        })?;
        debug!(
          "send_chat to {} for model: {} ({} messages)",
          url, model, messages.len()
        );

        let request = ChatRequest
        {   messages
          , model
          , stream: false
          , options: CHAT_OPTIONS
        };
        trace!("Chat request: {:?}", request);

        let response = self
          .post_json(&url, &request)
          .await?
          .json::<ChatResponse>()
          .await
          .map_err(|e| {
            error!("Parse error from {}: {}", url, e);
            crate::error::Error::ParseError(e.to_string())
          })?;

        Ok(response.message)
    }

    /// `send_chat` against a completion URL, deriving the chat route
    pub async fn send_chat_url(
      &self
    , url: &str
    , messages: &[ChatMessage]
    , model: &str
    ) -> ChatReply
    {   self.send_chat(&EndpointConfig::new(url), messages, model)
          .await
    }

    async fn post_json<T: serde::Serialize>(
      &self
    , url: &str
    , body: &T
    ) -> Result<reqwest::Response, crate::error::Error>
    {   let response = self.http_client
          .post(url)
          .json(body)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            crate::error::Error::HttpError(e.to_string())
          })?;

        let status = response.status();
        trace!("Response status from {}: {}", url, status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("API error from {}: {} {}", url, status, error_text);
            return Err(crate::error::Error::ApiError(
              format!("{}: {}", status, error_text)
            ));
        }
        Ok(response)
    }
}

/// Send one prompt with `client`; free-function form of `send_prompt`
pub async fn test_prompt_with_model(
  client: &ModelClient
, url: &str
, prompt: &str
, model: &str
) -> InvocationReply
{   client.send_prompt(url, prompt, model).await
}

/// Send one conversation with `client`; free-function form of `send_chat_url`
pub async fn test_prompt_with_chat_model(
  client: &ModelClient
, url: &str
, messages: &[ChatMessage]
, model: &str
) -> ChatReply
{   client.send_chat_url(url, messages, model).await
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn reply_text_marks_failures()
    {   let ok: InvocationReply = Ok("Paris".to_string());
        let err: InvocationReply = Err(
          crate::error::Error::HttpError("connection refused".to_string())
        );
        assert_eq!(reply_text(&ok), "Paris");
        assert_eq!(reply_text(&err), "Error: HTTP error: connection refused");
    }

    #[test]
    fn reply_text_covers_chat_replies()
    {   let ok: ChatReply = Ok(ChatMessage::new("assistant", "Hello!"));
        let err: ChatReply = Err(
          crate::error::Error::ApiError("404 Not Found: no model".to_string())
        );
        assert_eq!(reply_text(&ok), "Hello!");
        assert_eq!(reply_text(&err), "Error: API error: 404 Not Found: no model");
    }
}
