//! Configuration records for invokers, fan-out and the judge

use serde::{Deserialize, Serialize};
use log::debug;

/// Context window sent with every request (tokens)
pub const CONTEXT_LENGTH: u32 = 10_000;

/// Marker the judge prompt asks the judge to put before its score
pub const DEFAULT_RATING_MARKER: &str = "Total rating:";

/// Sampling options sent in the `options` object of a request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions
{   pub num_ctx: u32
  , pub temperature: f32
  , pub top_p: f32
  , pub top_k: u32
}

/// Options for plain completion calls
pub const COMPLETION_OPTIONS: GenerationOptions = GenerationOptions
{   num_ctx: CONTEXT_LENGTH
  , temperature: 0.1
  , top_p: 0.7
  , top_k: 20
};

/// Options for chat calls
pub const CHAT_OPTIONS: GenerationOptions = GenerationOptions
{   num_ctx: CONTEXT_LENGTH
  , temperature: 0.3
  , top_p: 0.9
  , top_k: 40
};

/// Where a model server lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig
{   /// Completion URL, e.g. `http://host:11434/api/generate`
    pub generate_url: String
  , /// Explicit chat URL; derived from `generate_url` when absent
    #[serde(default)]
    pub chat_url: Option<String>
}

impl EndpointConfig
{   pub fn new(generate_url: impl Into<String>) -> Self
    {   EndpointConfig
        {   generate_url: generate_url.into()
          , chat_url: None
        }
    }

    pub fn with_chat_url(
      mut self
    , chat_url: impl Into<String>
    ) -> Self
    {   self.chat_url = Some(chat_url.into());
        self
    }

    /// Resolve the chat URL.
    ///
    /// Without an explicit `chat_url` the completion URL must contain
    /// `/generate`; anything else is refused rather than silently sending
    /// chat traffic to a completion route.
    pub fn chat_endpoint(&self)
      -> Result<String, crate::error::Error>
    {   if let Some(url) = &self.chat_url
        {   return Ok(url.clone());
        }
        if !self.generate_url.contains("/generate")
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!(
                "cannot derive chat endpoint from {}",
                self.generate_url
              )
            ));
        }
        let url = self.generate_url.replace("/generate", "/chat");
        debug!("Derived chat endpoint: {}", url);
        Ok(url)
    }
}

/// Which model a judge prompt goes to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeConfig
{   pub url: String
  , pub model: String
  , #[serde(default = "default_rating_marker")]
    pub rating_marker: String
}

fn default_rating_marker() -> String
{   DEFAULT_RATING_MARKER.to_string()
}

impl JudgeConfig
{   pub fn new(
      url: impl Into<String>
    , model: impl Into<String>
    ) -> Self
    {   JudgeConfig
        {   url: url.into()
          , model: model.into()
          , rating_marker: default_rating_marker()
        }
    }
}

/// What to do when a fan-out names the same model twice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DuplicateModels
{   /// Later pairing overwrites the earlier one
    #[default]
    KeepLast
  , /// First pairing wins, later ones are still sent
    KeepFirst
  , /// Refuse the batch before sending anything
    Reject
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FanOutConfig
{   #[serde(default)]
    pub duplicates: DuplicateModels
}
