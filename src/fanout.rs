//! Concurrent dispatch of one prompt to many models

use std::collections::{HashMap, HashSet};
use futures::future::join_all;
use log::{debug, warn, error};
use crate::client::{InvocationReply, ModelClient};
use crate::config::{DuplicateModels, FanOutConfig};

/// Send `prompt` to every `(url, model)` pair concurrently.
///
/// Pairs are formed positionally and truncated to the shorter list.
/// All requests are started before any is awaited and the call returns
/// only once every request has finished. A failed request shows up as
/// an `Err` under its model and never aborts the others.
pub async fn test_multiple_models(
  client: &ModelClient
, urls: &[String]
, prompt: &str
, models: &[String]
, config: &FanOutConfig
) -> Result<HashMap<String, InvocationReply>, crate::error::Error>
{   if urls.len() != models.len()
    {   warn!(
          "Fan-out got {} urls and {} models, using the first {}",
          urls.len(), models.len(), urls.len().min(models.len())
        );
    }
    let pairs: Vec<(&String, &String)>
      = urls.iter().zip(models.iter()).collect();

    if config.duplicates == DuplicateModels::Reject
    {   let mut seen = HashSet::new();
        for (_, model) in &pairs
        {   if !seen.insert(model.as_str())
            {   error!("Duplicate model in fan-out: {}", model);
                return Err(crate::error::Error::DuplicateModel(
                  model.to_string()
                ));
            }
        }
    }

    debug!("Fanning out prompt to {} models", pairs.len());
    let requests = pairs.iter().map(|(url, model)| {
      client.send_prompt(url, prompt, model)
    });
    let replies = join_all(requests).await;

    let failed = replies.iter().filter(|r| r.is_err()).count();
    debug!(
      "Fan-out finished: {} ok, {} failed",
      replies.len() - failed, failed
    );

    let mut results = HashMap::with_capacity(replies.len());
    for ((_, model), reply) in pairs.into_iter().zip(replies)
    {   match config.duplicates
        {   DuplicateModels::KeepFirst => {
              results.entry(model.clone()).or_insert(reply);
            }
          , _ => {
              if results.insert(model.clone(), reply).is_some()
              {   warn!("Model {} answered twice, keeping last", model);
              }
            }
        }
    }
    Ok(results)
}
