//! Dummy LLM provider — answers with a canned search-plan JSON object.
//! Used for testing the full prompt→plan→search round-trip without a key.
//!
//! The "translation" is a keyword heuristic over the prompt text: quoted
//! spans become the query verbatim, otherwise the last word does; mentions
//! of "regex", "case", or "whole word" set the matching flags.

use crate::llm::ProviderError;

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn complete(&self, _system: &str, user: &str) -> Result<String, ProviderError> {
        let lower = user.to_lowercase();
        let query = quoted_span(user)
            .unwrap_or_else(|| user.split_whitespace().last().unwrap_or_default())
            .to_string();
        let reply = serde_json::json!({
            "query": query,
            "caseSensitive": lower.contains("case sensitive") || lower.contains("case-sensitive"),
            "useRegex": lower.contains("regex") || lower.contains("regular expression"),
            "matchWholeWord": lower.contains("whole word") || lower.contains("whole-word"),
        });
        Ok(reply.to_string())
    }
}

/// First span between double or single quotes, if any.
fn quoted_span(text: &str) -> Option<&str> {
    for quote in ['"', '\''] {
        let mut parts = text.splitn(3, quote);
        parts.next()?;
        if let (Some(span), Some(_)) = (parts.next(), parts.next()) {
            return Some(span);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan;

    #[tokio::test]
    async fn reply_is_parseable_plan() {
        let p = DummyProvider;
        let reply = p.complete("", "find every todo marker").await.unwrap();
        let plan = plan::parse_reply(&reply).unwrap();
        assert_eq!(plan.query, "marker");
        assert!(!plan.use_regex);
    }

    #[tokio::test]
    async fn quoted_span_becomes_query() {
        let p = DummyProvider;
        let reply = p.complete("", "search for \"fn main\" as a whole word").await.unwrap();
        let plan = plan::parse_reply(&reply).unwrap();
        assert_eq!(plan.query, "fn main");
        assert!(plan.match_whole_word);
    }

    #[tokio::test]
    async fn regex_mention_sets_flag() {
        let p = DummyProvider;
        let reply = p
            .complete("", "case-sensitive regex for hex literals")
            .await
            .unwrap();
        let plan = plan::parse_reply(&reply).unwrap();
        assert!(plan.use_regex);
        assert!(plan.case_sensitive);
    }

    #[tokio::test]
    async fn empty_prompt_yields_empty_query() {
        let p = DummyProvider;
        let reply = p.complete("", "").await.unwrap();
        let plan = plan::parse_reply(&reply).unwrap();
        assert_eq!(plan.query, "");
    }
}
