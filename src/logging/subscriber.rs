//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use super::utils::{
    DRY_RUN_TARGET, SECTION_TARGET, file_line, format_local_datetime, section_banner,
};

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// Handle to the log file the installed subscriber appends to.
///
/// The subscriber is installed before the configuration is loaded, so the
/// file is attached later with [`LogFile::attach`]. Until then events only
/// reach the console.
#[derive(Debug, Clone, Default)]
pub struct LogFile {
    file: Arc<Mutex<Option<fs::File>>>,
}

impl LogFile {
    /// Open `path` for appending, creating it and its parent directories if
    /// needed, and route every following event to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directories cannot be
    /// created.
    pub fn attach(&self, path: &Path) -> Result<()> {
        let file = open_append(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        if let Ok(mut guard) = self.file.lock() {
            *guard = Some(file);
        }
        Ok(())
    }

    /// Whether a log file is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.file.lock().is_ok_and(|guard| guard.is_some())
    }
}

fn open_append(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::OpenOptions::new().create(true).append(true).open(path)
}

/// A [`tracing_subscriber::Layer`] that appends every event to the attached
/// log file as `"<timestamp> - <message>"` with ANSI codes stripped.
#[derive(Debug)]
pub(super) struct FileLayer {
    target: LogFile,
}

impl FileLayer {
    /// Layer writing to `target` once a file is attached to it.
    pub(super) const fn new(target: LogFile) -> Self {
        Self { target }
    }

    /// Open `path` for appending, creating it and its parent directories if
    /// needed.
    pub(super) fn open(path: &Path) -> Result<Self> {
        let target = LogFile::default();
        target.attach(path)?;
        Ok(Self::new(target))
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let line = file_line(
            &format_local_datetime(),
            *metadata.level(),
            metadata.target(),
            &extractor.message,
        );

        if let Ok(mut guard) = self.target.file.lock()
            && let Some(f) = guard.as_mut()
        {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that colours console output by
/// severity and renders section banners.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let level = *metadata.level();
        let target = metadata.target();

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let msg = &extractor.message;

        match level {
            tracing::Level::ERROR => writeln!(writer, "\x1b[31mERROR: {msg}\x1b[0m"),
            tracing::Level::WARN => writeln!(writer, "\x1b[33mWARNING: {msg}\x1b[0m"),
            tracing::Level::INFO if target == SECTION_TARGET => {
                for line in section_banner(msg) {
                    writeln!(writer, "\x1b[1;34m{line}\x1b[0m")?;
                }
                Ok(())
            }
            tracing::Level::INFO if target == DRY_RUN_TARGET => {
                writeln!(writer, "\x1b[33m[DRY RUN]\x1b[0m {msg}")
            }
            tracing::Level::INFO => writeln!(writer, "\x1b[32m{msg}\x1b[0m"),
            _ => writeln!(writer, "\x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Level filter shared by the console and the log file.
///
/// `directives` uses the `RUST_LOG` syntax and overrides the default level
/// (`debug` when verbose, `info` otherwise).
pub(super) fn level_filter(verbose: bool, directives: Option<&str>) -> EnvFilter {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    EnvFilter::builder()
        .with_default_directive(default.into())
        .parse_lossy(directives.unwrap_or_default())
}

/// Build the subscriber: one filter in front of the console formatter and
/// the file layer, so both sinks see the same events.
pub(super) fn build_subscriber<W>(
    filter: EnvFilter,
    make_writer: W,
    file: LogFile,
) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    use tracing_subscriber::{fmt, layer::SubscriberExt as _};

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .event_format(ConsoleFormatter)
                .with_writer(make_writer),
        )
        .with(FileLayer::new(file))
}

/// Initialise the global [`tracing`] subscriber.
///
/// Console output goes to stdout (info and below) and stderr (warnings and
/// errors). The returned [`LogFile`] receives the same events once a file
/// is attached. `RUST_LOG` overrides the level chosen by `verbose`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_subscriber(verbose: bool) -> Result<LogFile> {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let file = LogFile::default();
    build_subscriber(
        level_filter(verbose, directives.as_deref()),
        make_writer,
        file.clone(),
    )
    .try_init()
    .context("installing tracing subscriber")?;
    Ok(file)
}
