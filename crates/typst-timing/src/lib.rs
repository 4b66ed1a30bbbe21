//! Performance timing instrumentation.
//!
//! Realization is single-threaded and synchronous (no suspension, no
//! incremental caching), so the only observability hook it needs is a
//! lightweight opt-in scope timer around the grouping-rule `finish`
//! callbacks, mirroring how the rest of the pipeline is instrumented.

use std::borrow::Cow;
use std::fmt::Display;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use ecow::EcoVec;
use parking_lot::Mutex;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

/// Creates a timing scope around an expression.
///
/// The output of the expression is returned.
#[macro_export]
macro_rules! timed {
    ($name:expr, $body:expr $(,)?) => {{
        let __scope = $crate::TimingScope::new($name);
        $body
    }};
}

thread_local! {
    static THREAD_DATA: ThreadData = ThreadData {
        id: {
            static COUNTER: AtomicU64 = AtomicU64::new(1);
            COUNTER.fetch_add(1, Ordering::Relaxed)
        },
    };
}

/// Whether the timer is enabled. Defaults to `false`.
static ENABLED: AtomicBool = AtomicBool::new(false);

/// The list of collected events.
static EVENTS: Mutex<Vec<Event>> = Mutex::new(Vec::new());

/// Enable the timer.
#[inline]
pub fn enable() {
    ENABLED.store(true, Ordering::Relaxed);
}

/// Whether the timer is enabled.
#[inline]
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Clears the recorded events.
#[inline]
pub fn clear() {
    EVENTS.lock().clear();
}

/// Export data as JSON for Chrome's tracing tool.
pub fn export_json<W: Write>(writer: W) -> Result<(), String> {
    #[derive(Serialize)]
    struct Entry<'a> {
        name: &'static str,
        cat: &'static str,
        ph: &'static str,
        ts: f64,
        pid: u64,
        tid: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        args: Option<EcoVec<(Cow<'a, str>, Cow<'a, serde_json::Value>)>>,
    }

    let lock = EVENTS.lock();
    let events = lock.as_slice();

    let mut serializer = serde_json::Serializer::new(writer);
    let mut seq = serializer
        .serialize_seq(Some(events.len()))
        .map_err(|e| format!("failed to serialize events: {e}"))?;

    for event in events.iter() {
        let args: EcoVec<(Cow<str>, Cow<serde_json::Value>)> = event
            .args
            .iter()
            .map(|(k, v)| (Cow::Borrowed(*k), Cow::Owned(v.clone())))
            .collect();

        seq.serialize_element(&Entry {
            name: event.name,
            cat: "realize",
            ph: match event.kind {
                EventKind::Start => "B",
                EventKind::End => "E",
            },
            ts: event.timestamp.micros_since(events[0].timestamp),
            pid: 1,
            tid: event.thread_id,
            args: args.is_empty().then_some(args).filter(|a| !a.is_empty()),
        })
        .map_err(|e| format!("failed to serialize event: {e}"))?;
    }

    seq.end().map_err(|e| format!("failed to serialize events: {e}"))
}

/// A scope that records an event when it is dropped.
#[must_use]
pub struct TimingScope {
    name: &'static str,
    args: EcoVec<(&'static str, serde_json::Value)>,
}

impl TimingScope {
    /// Create a new scope if timing is enabled.
    #[inline]
    pub fn new(name: &'static str) -> Option<TimingScopeGuard> {
        is_enabled().then(|| Self { name, args: EcoVec::new() }.build())
    }

    /// Attach a display-formatted argument to the scope.
    pub fn with_display(mut self, name: &'static str, value: impl Display) -> Self {
        self.args.push((name, serde_json::json!(value.to_string())));
        self
    }

    fn build(self) -> TimingScopeGuard {
        let (thread_id, timestamp) =
            THREAD_DATA.with(|data| (data.id, Timestamp::now()));
        let event = Event {
            kind: EventKind::Start,
            timestamp,
            name: self.name,
            args: self.args.clone(),
            thread_id,
        };
        EVENTS.lock().push(event.clone());
        TimingScopeGuard { scope: Some(event) }
    }
}

/// RAII guard that records the matching end event on drop.
pub struct TimingScopeGuard {
    scope: Option<Event>,
}

impl Drop for TimingScopeGuard {
    fn drop(&mut self) {
        let timestamp = Timestamp::now();
        let mut scope = self.scope.take().expect("scope already dropped");
        scope.timestamp = timestamp;
        scope.kind = EventKind::End;
        EVENTS.lock().push(scope);
    }
}

#[derive(Clone)]
struct Event {
    kind: EventKind,
    timestamp: Timestamp,
    name: &'static str,
    args: EcoVec<(&'static str, serde_json::Value)>,
    thread_id: u64,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum EventKind {
    Start,
    End,
}

#[derive(Copy, Clone)]
struct Timestamp {
    inner: std::time::SystemTime,
}

impl Timestamp {
    fn now() -> Self {
        Self { inner: std::time::SystemTime::now() }
    }

    fn micros_since(self, start: Self) -> f64 {
        self.inner
            .duration_since(start.inner)
            .unwrap_or(std::time::Duration::ZERO)
            .as_nanos() as f64
            / 1_000.0
    }
}

struct ThreadData {
    id: u64,
}
