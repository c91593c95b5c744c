//! Find-in-files engine.
//!
//! Consumes a [`SearchPlan`] exactly as generated: the four fields decide
//! pattern escaping, word boundaries, and case folding. The walk honors
//! `.gitignore` and skips hidden files via the `ignore` crate; files that
//! do not read as UTF-8 are skipped as binary.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::plan::SearchPlan;

/// One matching line.
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    /// Path relative to the search root.
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// The matching line, trailing newline stripped.
    pub text: String,
}

/// The result of one search run.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub matches: Vec<SearchMatch>,
    /// True when the match cap cut the run short.
    pub truncated: bool,
}

/// Walks a root directory and applies search plans to its files.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    root: PathBuf,
    max_results: usize,
}

impl SearchEngine {
    pub fn new(root: impl Into<PathBuf>, max_results: usize) -> Self {
        Self { root: root.into(), max_results }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run `plan` over the tree. An empty query yields no matches rather
    /// than matching every line.
    pub fn run(&self, plan: &SearchPlan) -> Result<SearchOutcome, AppError> {
        if plan.query.is_empty() {
            return Ok(SearchOutcome { matches: Vec::new(), truncated: false });
        }

        let pattern = compile_pattern(plan)?;
        debug!(pattern = %pattern.as_str(), root = %self.root.display(), "running search");

        let mut matches = Vec::new();
        let mut truncated = false;

        // require_git(false): honor .gitignore files even when the root is
        // not itself a git repository.
        let walk = WalkBuilder::new(&self.root).require_git(false).build();

        'walk: for entry in walk {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            // Non-UTF-8 content means a binary (or foreign-encoded) file.
            let Ok(content) = fs::read_to_string(entry.path()) else {
                continue;
            };

            let rel = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(entry.path())
                .to_path_buf();

            for (idx, line) in content.lines().enumerate() {
                if pattern.is_match(line) {
                    if matches.len() >= self.max_results {
                        truncated = true;
                        break 'walk;
                    }
                    matches.push(SearchMatch {
                        path: rel.clone(),
                        line: idx + 1,
                        text: line.to_string(),
                    });
                }
            }
        }

        debug!(matches = matches.len(), truncated, "search finished");
        Ok(SearchOutcome { matches, truncated })
    }
}

/// Build the line regex a plan describes.
///
/// Literal queries are escaped before the word-boundary wrap so a query like
/// `foo.bar` stays literal.
fn compile_pattern(plan: &SearchPlan) -> Result<Regex, AppError> {
    let mut pattern = if plan.use_regex {
        plan.query.clone()
    } else {
        regex::escape(&plan.query)
    };
    if plan.match_whole_word {
        pattern = format!(r"\b(?:{pattern})\b");
    }
    RegexBuilder::new(&pattern)
        .case_insensitive(!plan.case_sensitive)
        .build()
        .map_err(|e| AppError::Search(format!("invalid pattern {:?}: {e}", plan.query)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn plan(query: &str) -> SearchPlan {
        SearchPlan {
            query: query.to_string(),
            case_sensitive: false,
            use_regex: false,
            match_whole_word: false,
        }
    }

    fn tree(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn literal_match_with_line_numbers() {
        let dir = tree(&[("a.txt", "one\ntwo needle\nthree\nneedle four\n")]);
        let engine = SearchEngine::new(dir.path(), 200);
        let out = engine.run(&plan("needle")).unwrap();
        assert_eq!(out.matches.len(), 2);
        assert_eq!(out.matches[0].line, 2);
        assert_eq!(out.matches[1].line, 4);
        assert_eq!(out.matches[0].path, PathBuf::from("a.txt"));
        assert!(!out.truncated);
    }

    #[test]
    fn case_insensitive_by_default() {
        let dir = tree(&[("a.txt", "Needle\nNEEDLE\nneedle\n")]);
        let engine = SearchEngine::new(dir.path(), 200);
        assert_eq!(engine.run(&plan("needle")).unwrap().matches.len(), 3);
    }

    #[test]
    fn case_sensitive_flag_respected() {
        let dir = tree(&[("a.txt", "Needle\nneedle\n")]);
        let engine = SearchEngine::new(dir.path(), 200);
        let mut p = plan("needle");
        p.case_sensitive = true;
        let out = engine.run(&p).unwrap();
        assert_eq!(out.matches.len(), 1);
        assert_eq!(out.matches[0].line, 2);
    }

    #[test]
    fn whole_word_flag_respected() {
        let dir = tree(&[("a.txt", "handle\nhandler\nre-handle now\n")]);
        let engine = SearchEngine::new(dir.path(), 200);
        let mut p = plan("handle");
        p.match_whole_word = true;
        let out = engine.run(&p).unwrap();
        assert_eq!(out.matches.len(), 2);
        assert_eq!(out.matches[0].text, "handle");
        assert_eq!(out.matches[1].line, 3);
    }

    #[test]
    fn literal_query_is_escaped() {
        let dir = tree(&[("a.txt", "foo.bar\nfooXbar\n")]);
        let engine = SearchEngine::new(dir.path(), 200);
        let out = engine.run(&plan("foo.bar")).unwrap();
        assert_eq!(out.matches.len(), 1);
        assert_eq!(out.matches[0].text, "foo.bar");
    }

    #[test]
    fn regex_query_matches_alternation() {
        let dir = tree(&[("a.txt", "TODO: x\nFIXME: y\nDONE: z\n")]);
        let engine = SearchEngine::new(dir.path(), 200);
        let mut p = plan("TODO|FIXME");
        p.use_regex = true;
        p.case_sensitive = true;
        assert_eq!(engine.run(&p).unwrap().matches.len(), 2);
    }

    #[test]
    fn invalid_regex_errors() {
        let dir = tree(&[("a.txt", "x\n")]);
        let engine = SearchEngine::new(dir.path(), 200);
        let mut p = plan("(unclosed");
        p.use_regex = true;
        let err = engine.run(&p).unwrap_err();
        assert!(err.to_string().contains("invalid pattern"));
    }

    #[test]
    fn empty_query_matches_nothing() {
        let dir = tree(&[("a.txt", "anything\n")]);
        let engine = SearchEngine::new(dir.path(), 200);
        let out = engine.run(&plan("")).unwrap();
        assert!(out.matches.is_empty());
        assert!(!out.truncated);
    }

    #[test]
    fn match_cap_truncates() {
        let dir = tree(&[("a.txt", "hit\n".repeat(50).as_str())]);
        let engine = SearchEngine::new(dir.path(), 10);
        let out = engine.run(&plan("hit")).unwrap();
        assert_eq!(out.matches.len(), 10);
        assert!(out.truncated);
    }

    #[test]
    fn gitignore_is_honored() {
        let dir = tree(&[
            (".gitignore", "ignored.txt\n"),
            ("ignored.txt", "needle\n"),
            ("kept.txt", "needle\n"),
        ]);
        let engine = SearchEngine::new(dir.path(), 200);
        let out = engine.run(&plan("needle")).unwrap();
        assert_eq!(out.matches.len(), 1);
        assert_eq!(out.matches[0].path, PathBuf::from("kept.txt"));
    }

    #[test]
    fn hidden_files_skipped() {
        let dir = tree(&[
            (".env", "needle=secret\n"),
            (".config/settings.toml", "needle\n"),
            ("visible.txt", "needle\n"),
        ]);
        let engine = SearchEngine::new(dir.path(), 200);
        let out = engine.run(&plan("needle")).unwrap();
        assert_eq!(out.matches.len(), 1);
        assert_eq!(out.matches[0].path, PathBuf::from("visible.txt"));
    }

    #[test]
    fn binary_files_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("blob.bin"), [0u8, 159, 146, 150, 255]).unwrap();
        fs::write(dir.path().join("a.txt"), "needle\n").unwrap();
        let engine = SearchEngine::new(dir.path(), 200);
        let out = engine.run(&plan("needle")).unwrap();
        assert_eq!(out.matches.len(), 1);
    }

    #[test]
    fn subdirectories_are_walked() {
        let dir = tree(&[("nested/deep/file.rs", "let needle = 1;\n")]);
        let engine = SearchEngine::new(dir.path(), 200);
        let out = engine.run(&plan("needle")).unwrap();
        assert_eq!(out.matches.len(), 1);
        assert_eq!(out.matches[0].path, PathBuf::from("nested/deep/file.rs"));
    }
}
