//! promptfind — entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI args
//!   3. Load config
//!   4. Resolve effective log level (CLI `-v` flags > env > config)
//!   5. Init logger once
//!   6. Build the LLM provider (API key checked here, before any request)
//!   7. Run one prompt, or the interactive console loop

use tracing::info;

use promptfind::config;
use promptfind::console::Session;
use promptfind::error::AppError;
use promptfind::llm::providers;
use promptfind::logger;
use promptfind::search::SearchEngine;
use promptfind::translate::Translator;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();
    check_args(&args)?;

    let mut config = config::load(args.config_path.as_deref())?;
    if let Some(root) = &args.search_root {
        config.search_root = config::expand_home(root);
    }

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    let force_cli_level = args.log_level.is_some();

    logger::init(effective_log_level, force_cli_level)?;

    info!(
        app_name = %config.app_name,
        search_root = %config.search_root.display(),
        provider = %config.llm.provider,
        model = %config.llm.openai.model,
        effective_log_level = %effective_log_level,
        interactive = %args.interactive,
        "config loaded"
    );

    let provider = providers::build(&config.llm, config.llm_api_key.clone())
        .map_err(|e| AppError::Config(e.to_string()))?;

    let engine = SearchEngine::new(config.search_root.clone(), config.search.max_results);
    let mut session = Session::new(Translator::new(provider), engine);
    session.dry_run = args.dry_run;
    session.json = args.json;

    if args.interactive {
        return session.run_interactive().await;
    }

    let prompt = args.prompt.join(" ");
    if prompt.trim().is_empty() {
        return Err(AppError::Translate(
            "prompt is empty — pass one as arguments or use -i".into(),
        ));
    }
    session.run_prompt(&prompt).await
}

// ── CLI args ─────────────────────────────────────────────────────────────────

struct CliArgs {
    log_level: Option<&'static str>,
    interactive: bool,
    dry_run: bool,
    json: bool,
    config_path: Option<String>,
    search_root: Option<String>,
    prompt: Vec<String>,
}

/// Interactive mode reads prompts from stdin; silently dropping positional
/// words the user also passed would hide a mistake.
fn check_args(args: &CliArgs) -> Result<(), AppError> {
    if args.interactive && !args.prompt.is_empty() {
        return Err(AppError::Config(format!(
            "unexpected prompt arguments with -i (got {:?}) — interactive mode reads prompts from stdin",
            args.prompt.join(" "),
        )));
    }
    Ok(())
}

fn parse_cli_args() -> CliArgs {
    parse_cli_args_from(std::env::args().skip(1))
}

fn parse_cli_args_from(args: impl Iterator<Item = String>) -> CliArgs {
    let mut verbosity = 0u8;
    let mut interactive = false;
    let mut dry_run = false;
    let mut json = false;
    let mut config_path = None;
    let mut search_root = None;
    let mut prompt = Vec::new();

    let mut iter = args;
    while let Some(arg) = iter.next() {
        if arg == "--" {
            prompt.extend(iter);
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: promptfind [OPTIONS] [PROMPT...]");
                println!();
                println!("Turn a natural-language prompt into a find-in-files search.");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -i, --interactive          Read prompts from stdin in a console loop");
                println!("  -f, --config <PATH>        Path to configuration file (default: config/default.toml)");
                println!("  -r, --root <PATH>          Directory to search (default: current directory)");
                println!("      --dry-run              Print the generated search, skip running it");
                println!("      --json                 Machine-readable output");
                println!("  -v, -vv, -vvv, -vvvv       Increase logging verbosity");
                std::process::exit(0);
            }
            "-i" | "--interactive" => interactive = true,
            "--dry-run" => dry_run = true,
            "--json" => json = true,
            "-f" | "--config" => {
                config_path = iter.next();
                if config_path.is_none() {
                    eprintln!("error: {arg} requires a path argument");
                    std::process::exit(2);
                }
            }
            "-r" | "--root" => {
                search_root = iter.next();
                if search_root.is_none() {
                    eprintln!("error: {arg} requires a path argument");
                    std::process::exit(2);
                }
            }
            flag if flag.starts_with("-v") && flag[1..].bytes().all(|b| b == b'v') => {
                verbosity = verbosity.saturating_add((flag.len() - 1) as u8);
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                eprintln!("error: unknown option '{flag}' (see --help)");
                std::process::exit(2);
            }
            _ => prompt.push(arg),
        }
    }

    let log_level = match verbosity {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    };

    CliArgs { log_level, interactive, dry_run, json, config_path, search_root, prompt }
}
