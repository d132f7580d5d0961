pub mod error;
pub mod config;
pub mod request;
pub mod client;
pub mod fanout;
pub mod template;
pub mod evaluate;
pub mod judge;

/*

allm-eval: async harness for evaluating models served behind an
ollama-style HTTP endpoint (`/api/generate`, `/api/chat`).

  caller
    -> template::validate_variables_with_template   (values complete?)
    -> client::ModelClient / fanout::test_multiple_models
    -> evaluate::evaluate_test_case                  (exact match)
       or judge::compare_strings_with_llm_judge      (judge model)
    -> score in [0.0, 1.0]

Network failures never abort a batch: every call yields a
Result and the fan-out collects one per model.

*/

pub use error::Error;
pub use config::{
  EndpointConfig, FanOutConfig, DuplicateModels, GenerationOptions,
  JudgeConfig, CHAT_OPTIONS, COMPLETION_OPTIONS, CONTEXT_LENGTH,
  DEFAULT_RATING_MARKER,
};
pub use request::ChatMessage;
pub use client::{
  reply_text, test_prompt_with_chat_model, test_prompt_with_model,
  ChatReply, InvocationReply, ModelClient,
};
pub use fanout::test_multiple_models;
pub use template::{
  get_template_variables, validate_variables_with_template,
  TemplateValues, VariableCheck,
};
pub use evaluate::{evaluate_test_case, Scoring};
pub use judge::{
  build_judge_prompt, compare_strings_with_llm_judge,
  extract_judge_score, Judge,
};
