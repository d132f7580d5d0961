//! Wire types for the completion and chat endpoints

use std::fmt;
use serde::{Deserialize, Serialize};

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

impl ChatMessage
{   pub fn new(
      role: impl Into<String>
    , content: impl Into<String>
    ) -> Self
    {   ChatMessage
        {   role: role.into()
          , content: content.into()
        }
    }

    pub fn user(content: impl Into<String>) -> Self
    {   ChatMessage::new("user", content)
    }

    pub fn system(content: impl Into<String>) -> Self
    {   ChatMessage::new("system", content)
    }
}

impl fmt::Display for ChatMessage
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   write!(f, "{}", self.content)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<'a>
{   pub prompt: &'a str
  , pub model: &'a str
  , pub stream: bool
  , pub options: crate::config::GenerationOptions
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a>
{   pub messages: &'a [ChatMessage]
  , pub model: &'a str
  , pub stream: bool
  , pub options: crate::config::GenerationOptions
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse
{   pub response: String
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse
{   pub message: ChatMessage
}
