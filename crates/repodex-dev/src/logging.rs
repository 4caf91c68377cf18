use std::fmt;
use std::str::FromStr;

use anstream::ColorChoice;
use anyhow::Context;
use owo_colors::OwoColorize;
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::env_vars::EnvVars;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Level {
    /// Show `INFO` messages and above from our crates by default (overridable by `RUST_LOG`).
    #[default]
    Default,
    /// Show `DEBUG` messages from our crates by default (overridable by `RUST_LOG`).
    Verbose,
}

impl Level {
    fn directive(self) -> &'static str {
        match self {
            Self::Default => "repodex=info",
            Self::Verbose => "repodex=debug",
        }
    }
}

/// Prefixes each message with its level, colored when stderr supports it.
struct RepodexFormat;

impl<S, N> FormatEvent<S, N> for RepodexFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let level = *event.metadata().level();
        if writer.has_ansi_escapes() {
            let styled = match level {
                tracing::Level::TRACE => level.purple().to_string(),
                tracing::Level::DEBUG => level.blue().to_string(),
                tracing::Level::INFO => level.green().to_string(),
                tracing::Level::WARN => level.yellow().to_string(),
                tracing::Level::ERROR => level.red().to_string(),
            };
            write!(writer, "{styled} ")?;
        } else {
            write!(writer, "{level} ")?;
        }
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install a stderr subscriber for the given verbosity.
pub(crate) fn setup_logging(level: Level) -> anyhow::Result<()> {
    let default_directive = Directive::from_str(level.directive())
        .with_context(|| format!("Invalid default directive: `{}`", level.directive()))?;

    let filter = EnvFilter::builder()
        .with_env_var(EnvVars::RUST_LOG)
        .with_default_directive(default_directive)
        .from_env()
        .context("Invalid RUST_LOG directives")?;

    let ansi = match anstream::Stderr::choice(&std::io::stderr()) {
        ColorChoice::Always | ColorChoice::AlwaysAnsi => true,
        ColorChoice::Never => false,
        // We just asked anstream for a choice, that can't be auto
        ColorChoice::Auto => unreachable!(),
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(RepodexFormat)
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .with_filter(filter),
        )
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(())
}
