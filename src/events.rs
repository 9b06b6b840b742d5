//! Notifications emitted by the organize engine.
//!
//! The engine never renders anything itself. It hands immutable [`Event`]
//! values to a [`NotificationSink`], and whatever hosts the engine decides how
//! to show them. A `crossbeam` channel sender is the usual sink, letting the
//! worker thread produce events while another thread consumes them in order.

use crossbeam::channel::Sender;
use serde::Serialize;

/// A single notification, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Event {
    /// A human-readable log line. The consumer adds the timestamp.
    Log(String),
    /// Overall progress, 0 to 100.
    Progress(u8),
    /// Short state label such as `scanning` or `organizing (3/10)`.
    Status(String),
    /// Counts summary, e.g. `total: 3 | moved: 3 | skipped: 0 | errored: 0`.
    Stats(String),
}

/// Receives engine events.
///
/// Implementations must be cheap and must not block for long: the engine calls
/// `notify` synchronously between file operations.
pub trait NotificationSink {
    fn notify(&self, event: Event);

    fn log(&self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.notify(Event::Log(message.into()));
    }

    fn progress(&self, percent: u8)
    where
        Self: Sized,
    {
        self.notify(Event::Progress(percent.min(100)));
    }

    fn status(&self, text: impl Into<String>)
    where
        Self: Sized,
    {
        self.notify(Event::Status(text.into()));
    }

    fn stats(&self, summary: impl Into<String>)
    where
        Self: Sized,
    {
        self.notify(Event::Stats(summary.into()));
    }
}

impl NotificationSink for Sender<Event> {
    fn notify(&self, event: Event) {
        // A dropped receiver means nobody is listening any more; the run goes on.
        let _ = self.send(event);
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for &S {
    fn notify(&self, event: Event) {
        (**self).notify(event);
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for Box<S> {
    fn notify(&self, event: Event) {
        (**self).notify(event);
    }
}

/// A sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _event: Event) {}
}
