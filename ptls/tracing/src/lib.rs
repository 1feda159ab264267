#![deny(rust_2018_idioms, clippy::disallowed_methods, clippy::disallowed_types)]
#![forbid(unsafe_code)]


use tracing::Dispatch;
use tracing_subscriber::{fmt::format, prelude::*, registry::LookupSpan, EnvFilter, Layer};

pub use tracing::Subscriber;

pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

const ENV_LOG_LEVEL: &str = "PTLS_LOG";
const ENV_LOG_FORMAT: &str = "PTLS_LOG_FORMAT";

const DEFAULT_LOG_LEVEL: &str = "warn,ptls=info";
const DEFAULT_LOG_FORMAT: &str = "PLAIN";

#[derive(Debug, Default)]
#[must_use]
pub struct Settings {
    filter: String,
    format: String,
    is_test: bool,
}

/// Routes `log` records (emitted by rustls) to the `tracing` subscriber.
pub fn init_log_compat() -> Result<(), Error> {
    use tracing_log::{log, AsLog};
    tracing_log::LogTracer::init()?;
    log::set_max_level(tracing::level_filters::LevelFilter::current().as_log());
    Ok(())
}

// === impl Settings ===

impl Settings {
    pub fn from_env() -> Self {
        Self {
            filter: std::env::var(ENV_LOG_LEVEL)
                .ok()
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            format: std::env::var(ENV_LOG_FORMAT)
                .ok()
                .unwrap_or_else(|| DEFAULT_LOG_FORMAT.to_string()),
            is_test: false,
        }
    }

    fn for_test(filter: String) -> Self {
        Self {
            filter,
            format: DEFAULT_LOG_FORMAT.to_string(),
            is_test: true,
        }
    }

    fn mk_json<S>(&self) -> Box<dyn Layer<S> + Send + Sync + 'static>
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
        S: Send + Sync,
    {
        let fmt = tracing_subscriber::fmt::format()
            .with_thread_ids(!self.is_test)
            // Configure the formatter to output JSON logs.
            .json()
            // Output the current span context as a JSON list.
            .with_span_list(true)
            // Don't output a field for the current span, since this
            // would duplicate information already in the span list.
            .with_current_span(false);

        let fmt = tracing_subscriber::fmt::layer()
            .event_format(fmt)
            .fmt_fields(format::JsonFields::default());

        if self.is_test {
            Box::new(fmt.with_test_writer())
        } else {
            Box::new(fmt)
        }
    }

    fn mk_plain<S>(&self) -> Box<dyn Layer<S> + Send + Sync + 'static>
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
        S: Send + Sync,
    {
        let fmt = tracing_subscriber::fmt::format().with_thread_ids(!self.is_test);
        let fmt = tracing_subscriber::fmt::layer().event_format(fmt);
        if self.is_test {
            Box::new(fmt.with_test_writer())
        } else {
            Box::new(fmt)
        }
    }

    /// Initializes the process-wide subscriber using the `PTLS_LOG` filter.
    ///
    /// Logging is disabled entirely when the filter is `off`.
    pub fn init(self) -> Result<(), Error> {
        if self.filter.trim().eq_ignore_ascii_case("off") {
            return Ok(());
        }

        tracing::dispatcher::set_global_default(self.build())?;
        init_log_compat()?;
        Ok(())
    }

    /// Builds a dispatcher that writes formatted events to stdout.
    ///
    /// Invalid filter directives are reported on stderr and skipped.
    pub fn build(self) -> Dispatch {
        let stdout = if self.format.eq_ignore_ascii_case("json") {
            self.mk_json()
        } else {
            self.mk_plain()
        };
        let filter = EnvFilter::builder().parse_lossy(&self.filter);

        tracing_subscriber::registry()
            .with(stdout.with_filter(filter))
            .into()
    }
}
