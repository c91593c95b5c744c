//! promptfind — natural-language prompt to find-in-files search.
//!
//! Pipeline: a prompt goes to an OpenAI-compatible chat endpoint with a
//! fixed instruction, the reply is parsed into a four-field [`plan::SearchPlan`]
//! (query, case-sensitivity, regex flag, whole-word flag), and the plan runs
//! through a gitignore-aware find-in-files engine. One awaited request per
//! prompt, no retries, no persistence.

pub mod config;
pub mod console;
pub mod error;
pub mod llm;
pub mod logger;
pub mod plan;
pub mod search;
pub mod translate;
