#![forbid(unsafe_code)]

//! Tracing layer that keeps recent events as plain text lines.
//!
//! A browser page has no stderr, so events are formatted into a bounded ring
//! buffer and handed to the host on request (`drainLogs` in `folio-web`).
//! Tests use the same layer to assert on what the runtime logged.
//!
//! Line format: `LEVEL target: message key=value ...`.
//!
//! ```
//! use folio_runtime::log_capture::LogCaptureLayer;
//! use tracing_subscriber::prelude::*;
//!
//! let (layer, handle) = LogCaptureLayer::new(16);
//! let subscriber = tracing_subscriber::registry().with(layer);
//! tracing::subscriber::with_default(subscriber, || {
//!     tracing::info!(card = 2, "card selected");
//! });
//! let lines = handle.drain();
//! assert_eq!(lines.len(), 1);
//! assert!(lines[0].ends_with("card selected card=2"));
//! ```

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};

/// Lines kept when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 256;

type Buffer = Arc<Mutex<VecDeque<String>>>;

fn lock(buffer: &Buffer) -> MutexGuard<'_, VecDeque<String>> {
    match buffer.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Collects `message` and the remaining fields of one event.
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl LineVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name(), value));
        }
    }
}

impl Visit for LineVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_owned());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }
}

fn level_str(level: Level) -> &'static str {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

/// Format one event as a capture line.
fn format_event(event: &Event<'_>) -> String {
    let metadata = event.metadata();
    let mut visitor = LineVisitor::default();
    event.record(&mut visitor);

    let mut line = format!(
        "{} {}: {}",
        level_str(*metadata.level()),
        metadata.target(),
        visitor.message
    );
    for (key, value) in &visitor.fields {
        let _ = write!(line, " {key}={value}");
    }
    line
}

/// Layer writing formatted events into a bounded buffer.
///
/// When the buffer is full the oldest line is dropped.
#[derive(Debug)]
pub struct LogCaptureLayer {
    buffer: Buffer,
    capacity: usize,
}

impl LogCaptureLayer {
    /// Create a layer and the handle that reads it. A zero capacity keeps
    /// nothing.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, LogCaptureHandle) {
        let buffer: Buffer = Arc::new(Mutex::new(VecDeque::with_capacity(capacity.min(1024))));
        let handle = LogCaptureHandle {
            buffer: Arc::clone(&buffer),
        };
        (Self { buffer, capacity }, handle)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<S> Layer<S> for LogCaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if self.capacity == 0 {
            return;
        }
        let line = format_event(event);
        let mut buffer = lock(&self.buffer);
        while buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(line);
    }
}

/// Reader side of a [`LogCaptureLayer`].
#[derive(Debug, Clone)]
pub struct LogCaptureHandle {
    buffer: Buffer,
}

impl LogCaptureHandle {
    /// Take every buffered line, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<String> {
        lock(&self.buffer).drain(..).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.buffer).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.buffer).is_empty()
    }
}

/// Error from [`install`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallError(String);

impl fmt::Display for InstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "log capture not installed: {}", self.0)
    }
}

impl std::error::Error for InstallError {}

/// Install a capture layer as the global subscriber, keeping events at
/// `max_level` and above.
///
/// Fails if a global subscriber is already set.
pub fn install(max_level: Level, capacity: usize) -> Result<LogCaptureHandle, InstallError> {
    let (layer, handle) = LogCaptureLayer::new(capacity);
    let subscriber =
        tracing_subscriber::registry().with(layer.with_filter(LevelFilter::from_level(max_level)));
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| InstallError(err.to_string()))?;
    Ok(handle)
}
