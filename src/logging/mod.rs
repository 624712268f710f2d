//! Logging infrastructure for coloured console and append-only file output.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::{LogFile, init_subscriber};
pub use types::{Log, TaskEntry, TaskStatus};

/// Create a Logger backed by an isolated per-thread tracing subscriber with a
/// file layer on a temporary log file, so that events emitted by logger
/// methods reach the file during tests.
///
/// The returned [`tracing::dispatcher::DefaultGuard`] must be kept alive for
/// the duration of the test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let path = tmp.path().join("sysmaint.log");
    let file_layer = subscriber::FileLayer::open(&path).expect("failed to create file layer");
    let log = Logger::new(&path);
    let subscriber =
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (log, tmp, guard)
}

/// In-memory console used as the `MakeWriter` of test subscribers.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct ConsoleCapture(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl ConsoleCapture {
    /// Everything written so far, with ANSI codes stripped.
    pub(crate) fn text(&self) -> String {
        self.0.lock().map_or_else(
            |_| String::new(),
            |buf| utils::strip_ansi(&String::from_utf8_lossy(&buf)),
        )
    }
}

#[cfg(test)]
impl std::io::Write for ConsoleCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(mut inner) = self.0.lock() {
            inner.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ConsoleCapture {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install a thread-local subscriber like the one [`init_subscriber`]
/// installs, writing the console to a [`ConsoleCapture`]. No log file is
/// attached yet.
#[cfg(test)]
pub(crate) fn capturing_subscriber(
    verbose: bool,
) -> (ConsoleCapture, LogFile, tracing::dispatcher::DefaultGuard) {
    let console = ConsoleCapture::default();
    let file = LogFile::default();
    let subscriber = subscriber::build_subscriber(
        subscriber::level_filter(verbose, None),
        console.clone(),
        file.clone(),
    );
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (console, file, guard)
}
