//! Tracing setup with optional span timings.
//!
//! Commands are annotated with `#[instrument]`; with `--timing` each span's
//! duration is logged when it closes. `log` records from the library crates
//! are forwarded into the same subscriber.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// `RUST_LOG` still wins over these defaults.
fn default_level(verbose: bool, timing: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else if timing {
        // span close events are emitted at INFO
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

pub fn init_tracing(verbose: bool, timing: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose, timing).into())
        .from_env_lossy();

    let span_events = if timing {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    // a second init (e.g. from tests) keeps the first subscriber
    drop(
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(verbose)
                    .with_span_events(span_events)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_wins_over_timing() {
        assert_eq!(default_level(true, true), LevelFilter::DEBUG);
        assert_eq!(default_level(false, true), LevelFilter::INFO);
        assert_eq!(default_level(false, false), LevelFilter::WARN);
    }
}
