//! Logging initialisation via tracing-subscriber.
//!
//! Two entry points: [`parse_level`] strictly validates a level string the
//! user wrote (config file or env override) and [`init`] installs the global
//! subscriber once the effective level is resolved. Diagnostics go to stderr
//! so match output on stdout stays pipeable.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Initialise the global tracing subscriber.
///
/// If `prefer_level` is `true` (the user passed `-v` flags), `level` wins and
/// `RUST_LOG` is only a fallback. Otherwise `RUST_LOG` wins — it may carry
/// full filter directives — and `level` is the fallback.
pub fn init(level: &str, prefer_level: bool) -> Result<(), AppError> {
    let filter = resolve_filter(level, prefer_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))?;

    Ok(())
}

fn resolve_filter(level: &str, prefer_level: bool) -> Result<EnvFilter, AppError> {
    if prefer_level {
        match EnvFilter::try_new(level) {
            Ok(filter) => Ok(filter),
            Err(level_err) => EnvFilter::try_from_default_env().map_err(|env_err| {
                AppError::Logger(format!(
                    "invalid log level '{level}': {level_err}; RUST_LOG parse failed: {env_err}"
                ))
            }),
        }
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .map_err(|e| AppError::Logger(format!("invalid log level '{level}': {e}")))
    }
}

/// Strictly parse a log level string into a [`LevelFilter`].
///
/// `EnvFilter` would silently accept a typo like `"verbos"` as a target
/// directive that filters everything out; config-sourced levels go through
/// this instead so the typo is an error at startup. Called from
/// `config::load_from` on the resolved `log_level`.
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_levels_are_accepted() {
        for l in &["off", "error", "warn", "info", "debug", "trace"] {
            assert!(parse_level(l).is_ok(), "expected '{l}' to be valid");
        }
        assert_eq!(parse_level("warn").unwrap(), LevelFilter::WARN);
    }

    #[test]
    fn typos_are_rejected_not_swallowed() {
        // These would pass EnvFilter as target directives and silence all logs.
        assert!(parse_level("verbos").is_err());
        assert!(parse_level("informational").is_err());
        assert!(parse_level("").is_err());
    }

    #[test]
    fn filter_directives_are_rejected() {
        // Directive syntax belongs in RUST_LOG, not in the config's log_level.
        assert!(parse_level("promptfind=debug").is_err());
    }

    #[test]
    fn cli_level_resolves_filter() {
        let filter = resolve_filter("debug", true).unwrap();
        assert!(filter.to_string().contains("debug"));
    }

    #[test]
    fn init_tolerates_prior_subscriber() {
        // Another test in this process may have installed one already.
        match init("info", false) {
            Ok(()) => {}
            Err(AppError::Logger(msg)) if msg.contains("set subscriber") => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}
