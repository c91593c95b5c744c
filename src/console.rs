//! Console front-end — runs translate-then-search cycles and prints results.
//!
//! One-shot mode runs a single cycle; interactive mode reads lines from
//! stdin, sends each through the same cycle, and prints the reply to stdout.
//! Runs until stdin closes or Ctrl-C. Diagnostics go to stderr via tracing;
//! match output stays on stdout so it can be piped.

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::error::AppError;
use crate::plan::SearchPlan;
use crate::search::{SearchEngine, SearchOutcome};
use crate::translate::Translator;

/// A configured front-end session: provider-backed translator, search
/// engine, and output switches.
pub struct Session {
    translator: Translator,
    engine: SearchEngine,
    /// Print the plan and skip the search.
    pub dry_run: bool,
    /// Machine-readable output instead of grep-style lines.
    pub json: bool,
}

impl Session {
    pub fn new(translator: Translator, engine: SearchEngine) -> Self {
        Self { translator, engine, dry_run: false, json: false }
    }

    /// Run one full cycle: translate `prompt`, execute the search, print.
    pub async fn run_prompt(&self, prompt: &str) -> Result<(), AppError> {
        let plan = self.translator.translate(prompt).await?;

        if self.dry_run {
            self.print_plan_only(&plan)?;
            return Ok(());
        }

        let outcome = self.engine.run(&plan)?;
        self.print_outcome(&plan, &outcome)?;
        Ok(())
    }

    /// Interactive loop: banner, `> ` prompt, one cycle per line.
    ///
    /// A failed cycle reports its single collapsed error and the loop
    /// continues; only Ctrl-C or EOF ends the session.
    pub async fn run_interactive(&self) -> Result<(), AppError> {
        info!(root = %self.engine.root().display(), "interactive session started");
        println!("─────────────────────────────────");
        println!(" promptfind  (Ctrl-C to quit)");
        println!(" Describe a search, e.g.: find functions that handle user authentication");
        println!("─────────────────────────────────");

        let stdin = tokio::io::stdin();
        let mut lines = BufReader::new(stdin).lines();

        loop {
            print!("> ");
            use std::io::Write as _;
            let _ = std::io::stdout().flush();

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    info!("ctrl-c received — leaving interactive session");
                    return Ok(());
                }
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            let line = line.trim();
                            if line.is_empty() {
                                continue;
                            }
                            if let Err(e) = self.run_prompt(line).await {
                                warn!(error = %e, "prompt cycle failed");
                                eprintln!("error: {e}");
                            }
                        }
                        Ok(None) => {
                            // stdin closed
                            println!();
                            return Ok(());
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }
    }

    fn print_plan_only(&self, plan: &SearchPlan) -> Result<(), AppError> {
        if self.json {
            println!("{}", to_json(plan)?);
        } else {
            println!("Generated search: {}", plan.summary());
        }
        Ok(())
    }

    fn print_outcome(&self, plan: &SearchPlan, outcome: &SearchOutcome) -> Result<(), AppError> {
        if self.json {
            println!("{}", to_json(&JsonReport { plan, outcome })?);
            return Ok(());
        }

        println!("Generated search: {}", plan.summary());
        for m in &outcome.matches {
            println!("{}:{}: {}", m.path.display(), m.line, m.text);
        }
        match outcome.matches.len() {
            0 => println!("no matches"),
            1 => println!("1 match"),
            n if outcome.truncated => println!("{n} matches (truncated)"),
            n => println!("{n} matches"),
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    plan: &'a SearchPlan,
    #[serde(flatten)]
    outcome: &'a SearchOutcome,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Search(format!("failed to serialize output: {e}")))
}
