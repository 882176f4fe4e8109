// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Initialize the `tracing` subscriber.
//!
//! The log level is configured with the `RUST_LOG` environment variable, and
//! defaults to `info`. All output goes to stdout, through the [Masker].

use crate::masking::Masker;
use std::fmt::Write as _;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// The format of the diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human readable lines, with a timestamp and the level.
    #[default]
    Text,
    /// GitHub Actions [workflow commands], errors and warnings become
    /// annotations.
    ///
    /// [workflow commands]: https://docs.github.com/en/actions/reference/workflow-commands-for-github-actions
    Github,
}

impl LogFormat {
    /// The default format: [LogFormat::Github] when running in GitHub
    /// Actions, [LogFormat::Text] otherwise.
    ///
    /// The runner sets `GITHUB_ACTIONS=true` for every step.
    pub fn detect() -> Self {
        match std::env::var("GITHUB_ACTIONS") {
            Ok(v) if v == "true" => Self::Github,
            _ => Self::Text,
        }
    }
}

/// Installs the global subscriber.
pub fn init(format: LogFormat, masker: &Masker) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    subscriber(format, filter, masker, std::io::stdout).try_init()
}

/// Returns a subscriber writing events in `format` to `writer`.
///
/// The secrets registered with `masker` are redacted from every event.
pub fn subscriber<W>(
    format: LogFormat,
    filter: EnvFilter,
    masker: &Masker,
    writer: W,
) -> Box<dyn Subscriber + Send + Sync + 'static>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let writer = masker.make_writer(writer);
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => Box::new(
            registry.with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(writer),
            ),
        ),
        LogFormat::Github => Box::new(
            registry.with(
                fmt::layer()
                    .event_format(WorkflowCommands::new(masker.clone()))
                    .with_writer(writer),
            ),
        ),
    }
}

/// Formats events as GitHub Actions workflow commands.
///
/// Errors and warnings become `::error::` and `::warning::` commands, debug
/// and trace events become `::debug::` commands. Info events are plain
/// lines.
///
/// Messages are redacted before they are escaped, a secret containing a line
/// break or `%` would not match once escaped.
#[derive(Clone, Debug, Default)]
pub struct WorkflowCommands {
    masker: Masker,
}

impl WorkflowCommands {
    pub fn new(masker: Masker) -> Self {
        Self { masker }
    }
}

impl<S, N> FormatEvent<S, N> for WorkflowCommands
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let mut message = String::new();
        ctx.format_fields(Writer::new(&mut message), event)?;
        let message = self.masker.redact(&message);
        match *event.metadata().level() {
            Level::ERROR => writeln!(writer, "::error::{}", escape_data(&message)),
            Level::WARN => writeln!(writer, "::warning::{}", escape_data(&message)),
            Level::INFO => writeln!(writer, "{message}"),
            _ => writeln!(writer, "::debug::{}", escape_data(&message)),
        }
    }
}

// Workflow command data must escape `%` and line breaks.
fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
