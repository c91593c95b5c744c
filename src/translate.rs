//! Prompt → search plan translation.
//!
//! One awaited provider round-trip per prompt; no retries. Every failure on
//! the way — transport, HTTP status, empty or malformed reply — collapses
//! into a single user-visible [`AppError::Translate`].

use tracing::{debug, info};

use crate::error::AppError;
use crate::llm::LlmProvider;
use crate::plan::{self, SearchPlan};

/// Fixed instruction the model answers under. The reply must be a bare JSON
/// object carrying the four wire fields.
const INSTRUCTION: &str = "\
You translate natural-language search requests into a structured search query.
Respond with a single JSON object and nothing else, with these properties:
- query: the search string
- caseSensitive: boolean, whether the search should be case sensitive
- useRegex: boolean, whether the query is a regular expression
- matchWholeWord: boolean, whether the search should match whole words only";

/// Turns prompts into [`SearchPlan`]s through a provider.
#[derive(Debug, Clone)]
pub struct Translator {
    provider: LlmProvider,
}

impl Translator {
    pub fn new(provider: LlmProvider) -> Self {
        Self { provider }
    }

    /// Translate `prompt` into a search plan.
    ///
    /// An empty or whitespace-only prompt is rejected before any request is
    /// made.
    pub async fn translate(&self, prompt: &str) -> Result<SearchPlan, AppError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AppError::Translate("prompt is empty".into()));
        }

        debug!(prompt_len = prompt.len(), "translating prompt");

        let reply = self
            .provider
            .complete(INSTRUCTION, prompt)
            .await
            .map_err(|e| AppError::Translate(e.to_string()))?;

        let plan = plan::parse_reply(&reply)?;

        info!(
            query = %plan.query,
            case_sensitive = plan.case_sensitive,
            use_regex = plan.use_regex,
            match_whole_word = plan.match_whole_word,
            "search plan generated"
        );

        Ok(plan)
    }
}
