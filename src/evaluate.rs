//! Scoring model answers against expected answers

use serde::{Deserialize, Serialize};
use log::debug;
use crate::client::ModelClient;
use crate::config::JudgeConfig;
use crate::judge::Judge;

/// Exact match, ignoring surrounding whitespace and case
pub fn evaluate_test_case(llm_output: &str, expected_output: &str) -> bool
{   llm_output.trim().to_lowercase()
      == expected_output.trim().to_lowercase()
}

/// How a test case is scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scoring
{   /// 1.0 on exact match, 0.0 otherwise
    ExactMatch
  , /// Graded by a judge model
    Judge(JudgeConfig)
}

impl Scoring
{   /// Score `llm_output` in `[0.0, 1.0]`
    pub async fn score(
      &self
    , client: &ModelClient
    , instruction: &str
    , llm_output: &str
    , expected_output: &str
    ) -> f64
    {   match self
        {   Scoring::ExactMatch => {
              let matched = evaluate_test_case(llm_output, expected_output);
              debug!("Exact match: {}", matched);
              if matched { 1.0 } else { 0.0 }
            }
          , Scoring::Judge(config) => {
              Judge::new(config.clone(), client.clone())
                .score(instruction, llm_output, expected_output)
                .await
            }
        }
    }
}
