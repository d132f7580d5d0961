//! LLM-as-judge scoring
//!
//! A judge model is shown the instruction, the answer under test and the
//! expected answer, and asked for a 1 to 4 rating behind a fixed marker.
//! The rating is pulled out of its free-text reply and rescaled to
//! `[0.0, 1.0]`.

use std::future::Future;
use once_cell::sync::Lazy;
use regex::Regex;
use log::{debug, error};
use crate::client::{InvocationReply, ModelClient};
use crate::config::{JudgeConfig, DEFAULT_RATING_MARKER};

static NUMBER: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"\d+(?:\.\d+)?").expect("number pattern is valid")
});

static DECIMAL_DIGIT: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^\d$").expect("digit pattern is valid")
});

fn is_decimal_digit(c: char) -> bool
{   let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

/// Value of any Unicode decimal digit (`４`, `٣`, `𝟑`, ...).
///
/// Decimal digits come in contiguous runs of ten starting at zero, so the
/// value is the offset from the start of the run, modulo ten.
fn decimal_value(c: char) -> Option<u32>
{   if let Some(v) = c.to_digit(10)
    {   return Some(v);
    }
    if !is_decimal_digit(c)
    {   return None;
    }
    let mut start = c as u32;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32)
    {   if !is_decimal_digit(prev)
        {   break;
        }
        start -= 1;
    }
    Some((c as u32 - start) % 10)
}

/// Rewrite a matched number with ASCII digits so `f64` can parse it
fn to_ascii_number(raw: &str) -> Result<String, crate::error::Error>
{   raw.chars()
      .map(|c| match c
      {   '.' => Ok('.')
        , _ => decimal_value(c)
            .and_then(|v| char::from_digit(v, 10))
            .ok_or_else(|| crate::error::Error::ParseError(
              format!("not a decimal digit: {:?}", c)
            ))
      })
      .collect()
}

const JUDGE_PROMPT: &str = "
You will be given a user_instruction, a system_answer and a expected_answer.
Your task is to provide a 'total rating' scoring how well the system_answer answers the user instruction expressed in the user_instruction and how well the system_answer matches the expected_answer.
Give your answer on a scale of 1 to 4, where 1 means that the system_answer is not helpful at all and does not match with the expected_answer, and 4 means that the system_answer completely and helpfully addresses the user_question and perfectly matches the expected_answer.

Here is the scale you should use to build your answer:
1: The system_answer is terrible: completely irrelevant to the user_instruction, or very partial. The system_answer is completely incorrect and does not match with the expected_answer.
2: The system_answer is mostly not helpful: misses some key aspects of the user_instruction. The system_answer has major differences or missing key elements compared to the expected_answer.
3: The system_answer is mostly helpful: provides support, but still could be improved. The system_answer has minor differences but maintains the core meaning compared to the expected_answer.
4: The system_answer is excellent: relevant, direct, detailed, and addresses all the concerns raised in the user_instruction. Perfect match of system_answer and expected_answer.

Provide your feedback as follows:

Feedback:::
Evaluation: (your rationale for the rating, as a text)
Total rating: (your rating, as a number between 1 and 4)

You MUST provide values for 'Evaluation:' and 'Total rating:' in your answer.

Now here are the user_instruction, system_answer and expected_answer.

user_instruction: {instruction}
system_answer: {answer}
expected_answer: {expected}

Provide your feedback. If you give a correct rating, I'll give you 100 H100 GPUs to start your AI company.
Feedback:::
Evaluation:
";

/// Judge prompt with the three texts embedded verbatim
pub fn build_judge_prompt(
  instruction: &str
, answer: &str
, expected: &str
) -> String
{   // single pass so braces inside the texts are left alone
    let mut prompt = String::with_capacity(
      JUDGE_PROMPT.len() + instruction.len() + answer.len() + expected.len()
    );
    let mut rest = JUDGE_PROMPT;
    for (slot, text) in [
      ("{instruction}", instruction)
    , ("{answer}", answer)
    , ("{expected}", expected)
    ]
    {   if let Some(at) = rest.find(slot)
        {   prompt.push_str(&rest[..at]);
            prompt.push_str(text);
            rest = &rest[at + slot.len()..];
        }
    }
    prompt.push_str(rest);
    prompt
}

/// Normalized score from a judge reply; 0.0 when no rating can be read.
pub fn extract_judge_score(answer: &str, marker: &str) -> f64
{   match try_extract_judge_score(answer, marker)
    {   Ok(score) => score
      , Err(e) => {
          error!("Could not read judge score: {}", e);
          0.0
        }
    }
}

fn try_extract_judge_score(answer: &str, marker: &str)
  -> Result<f64, crate::error::Error>
{   let window = match answer.split_once(marker)
    {   Some((_, after)) if !marker.is_empty() => {
          after.split(marker).next().unwrap_or(after)
        }
      , _ => answer
    };

    let raw = NUMBER.find(window)
      .ok_or(crate::error::Error::NoRatingFound)?
      .as_str();
    let score: f64 = to_ascii_number(raw)?.parse().map_err(|e| {
      crate::error::Error::ParseError(format!("{}: {}", raw, e))
    })?;
    debug!("Judge raw rating: {}", score);

    if score == 0.0
    {   return Ok(0.0);
    }
    Ok((score / 4.0).clamp(0.0, 1.0))
}

/// Ask a judge model how well `llm_output` answers `original_instruction`
/// compared to `expected_output`.
///
/// `invoke` is called once as `invoke(url, prompt, model)`. A failed
/// invocation scores 0.0.
pub async fn compare_strings_with_llm_judge<F, Fut>(
  llm_output: &str
, expected_output: &str
, original_instruction: &str
, invoke: F
, url: &str
, model: &str
) -> f64
where
  F: FnOnce(String, String, String) -> Fut
, Fut: Future<Output = InvocationReply>
{   judge_with_marker(
      llm_output
    , expected_output
    , original_instruction
    , invoke
    , url
    , model
    , DEFAULT_RATING_MARKER
    ).await
}

async fn judge_with_marker<F, Fut>(
  llm_output: &str
, expected_output: &str
, original_instruction: &str
, invoke: F
, url: &str
, model: &str
, marker: &str
) -> f64
where
  F: FnOnce(String, String, String) -> Fut
, Fut: Future<Output = InvocationReply>
{   let prompt = build_judge_prompt(
      original_instruction, llm_output, expected_output
    );
    debug!("Asking judge {} at {}", model, url);

    match invoke(url.to_string(), prompt, model.to_string()).await
    {   Ok(reply) => extract_judge_score(&reply, marker)
      , Err(e) => {
          error!("Judge {} failed: {}", model, e);
          0.0
        }
    }
}

/// A judge model reached through a `ModelClient`
#[derive(Debug, Clone)]
pub struct Judge
{   pub config: JudgeConfig
  , client: ModelClient
}

impl Judge
{   pub fn new(config: JudgeConfig, client: ModelClient) -> Self
    {   Judge { config, client }
    }

    /// Score one answer in `[0.0, 1.0]`
    pub async fn score(
      &self
    , instruction: &str
    , llm_output: &str
    , expected_output: &str
    ) -> f64
    {   let client = &self.client;
        judge_with_marker(
          llm_output
        , expected_output
        , instruction
        , |url, prompt, model| async move {
            client.send_prompt(&url, &prompt, &model).await
          }
        , &self.config.url
        , &self.config.model
        , &self.config.rating_marker
        ).await
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    fn score(answer: &str) -> f64
    {   extract_judge_score(answer, DEFAULT_RATING_MARKER)
    }

    #[test]
    fn reads_rating_after_marker()
    {   assert_eq!(score("Evaluation: good.\nTotal rating: 4"), 1.0);
        assert_eq!(score("Evaluation: 2 typos.\nTotal rating: 3"), 0.75);
    }

    #[test]
    fn zero_is_exactly_zero()
    {   assert_eq!(score("Total rating: 0"), 0.0);
    }

    #[test]
    fn decimals_are_scaled()
    {   assert_eq!(score("Total rating: 2.5"), 0.625);
    }

    #[test]
    fn out_of_range_is_clamped()
    {   assert_eq!(score("Total rating: 10"), 1.0);
    }

    #[test]
    fn no_marker_uses_whole_answer()
    {   assert_eq!(score("I would say 2 out of 4"), 0.5);
    }

    #[test]
    fn no_number_scores_zero()
    {   assert_eq!(score("no rating given"), 0.0);
        assert_eq!(score("Total rating: none"), 0.0);
    }

    #[test]
    fn window_stops_at_repeated_marker()
    {   assert_eq!(score("Total rating: n/a\nTotal rating: 4"), 0.0);
    }

    #[test]
    fn unicode_digits_are_read()
    {   assert_eq!(score("Total rating: \u{FF14}"), 1.0);
        assert_eq!(score("Total rating: \u{0663}"), 0.75);
        assert_eq!(score("Total rating: \u{FF12}.\u{FF15}"), 0.625);
        assert_eq!(score("Total rating: \u{1D7D1}"), 0.75);
        assert_eq!(score("Total rating: \u{0966}"), 0.0);
    }

    #[test]
    fn decimal_value_covers_runs()
    {   assert_eq!(decimal_value('7'), Some(7));
        assert_eq!(decimal_value('\u{FF10}'), Some(0));
        assert_eq!(decimal_value('\u{0669}'), Some(9));
        assert_eq!(decimal_value('\u{1D7D8}'), Some(0));
        assert_eq!(decimal_value('x'), None);
        assert_eq!(to_ascii_number("\u{0661}\u{0660}.\u{0665}").unwrap(), "10.5");
    }

    #[test]
    fn empty_marker_searches_whole_answer()
    {   assert_eq!(extract_judge_score("Total rating: 3", ""), 0.75);
        assert_eq!(extract_judge_score("nothing here", ""), 0.0);
    }

    #[test]
    fn custom_marker()
    {   assert_eq!(extract_judge_score("Score 1\nGrade: 3", "Grade:"), 0.75);
    }

    #[test]
    fn prompt_embeds_texts_verbatim()
    {   let prompt = build_judge_prompt(
          "Capital of France?", "It is {answer} Paris", "Paris"
        );
        assert!(prompt.contains("user_instruction: Capital of France?\n"));
        assert!(prompt.contains("system_answer: It is {answer} Paris\n"));
        assert!(prompt.contains("expected_answer: Paris\n"));
        assert!(prompt.contains("Total rating: (your rating"));
        assert!(prompt.contains("'Evaluation:' and 'Total rating:'"));
        assert!(prompt.ends_with("Feedback:::\nEvaluation:\n"));
    }
}
