//! Structured logging for promptforge
//!
//! Console output goes to stdout, so every log line is written to stderr.

use tracing::{Level, error, info, span};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::types::LogFormat;

/// Default filter when `RUST_LOG` is not set
fn default_filter(verbose: bool) -> EnvFilter {
    let directives = if verbose {
        "promptforge=debug,info"
    } else {
        "promptforge=info,warn"
    };
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `verbose`. Returns an error if a global
/// subscriber is already installed.
pub fn init_tracing(
    verbose: bool,
    format: LogFormat,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_current_span(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .try_init()?;
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(verbose)
                        .with_thread_ids(false)
                        .with_thread_names(false)
                        .with_line_number(false)
                        .with_file(false)
                        .with_span_events(if verbose {
                            FmtSpan::CLOSE
                        } else {
                            FmtSpan::NONE
                        })
                        .compact(),
                )
                .try_init()?;
        }
    }

    Ok(())
}

/// Span covering one pipeline stage
pub fn stage_span(stage: &str, model: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "pipeline_stage",
        stage = %stage,
        model = %model,
    )
}

/// Log stage completion with duration
pub fn log_stage_complete(stage: &str, duration_ms: u128, output_chars: usize) {
    info!(
        stage = %stage,
        duration_ms = %duration_ms,
        output_chars = output_chars,
        "Stage completed"
    );
}

/// Log stage failure.
///
/// `error` must already be redacted by the caller.
pub fn log_stage_error(stage: &str, kind: &str, error: &str, duration_ms: u128) {
    error!(
        stage = %stage,
        kind = %kind,
        duration_ms = %duration_ms,
        error = %error,
        "Stage failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_span_has_expected_name() {
        let span = stage_span("analyze", "gpt-3.5-turbo");
        // No subscriber is installed in unit tests, so the span is disabled;
        // metadata is still available when it is enabled elsewhere.
        if let Some(meta) = span.metadata() {
            assert_eq!(meta.name(), "pipeline_stage");
        }
    }

    #[test]
    fn test_second_init_fails_instead_of_panicking() {
        // The first call may lose to another test; only the second must fail.
        init_tracing(false, LogFormat::Compact).ok();
        let second = init_tracing(true, LogFormat::Json);
        assert!(second.is_err());
    }
}
