use std::fmt;

/// Custom error type for evaluation operations
/// Implements Clone so it can live inside fan-out result maps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Transport-level failure (connect, send, read)
    HttpError(String)
  , /// Endpoint answered with a non-success status
    ApiError(String)
  , /// Failed to parse the response body or a field was missing
    ParseError(String)
  , /// Template source could not be parsed
    TemplateError(String)
  , /// Template values were not a JSON object
    InvalidValues(String)
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Same model identifier given twice to a fan-out
    DuplicateModel(String)
  , /// Judge answer carried no numeric rating
    NoRatingFound
  , /// Generic error
    Other(String)
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError(msg) => {
              write!(f, "API error: {}", msg)
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::TemplateError(msg) => {
              write!(f, "Template error: {}", msg)
            }
          , Error::InvalidValues(msg) => {
              write!(f, "Invalid template values: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::DuplicateModel(model) => {
              write!(f,
                "Model given more than once: {}",
                model
              )
            }
          , Error::NoRatingFound => {
              write!(f, "No numeric rating in judge answer")
            }
          , Error::Other(msg) => {
              write!(f, "{}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}

impl From<minijinja::Error> for Error
{   fn from(e: minijinja::Error) -> Self
    {   Error::TemplateError(e.to_string())
    }
}
