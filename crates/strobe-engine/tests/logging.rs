//! Structured log events emitted during playback.

use std::sync::{Arc, Mutex};

use strobe_core::{CycleId, FetchError};
use strobe_engine::{InlineRefill, PlaybackConfig, PlaybackSession, StepOutcome};
use strobe_test_utils::fixtures::{active_frame, ScriptedSource, IDLE};
use strobe_test_utils::MockGraph;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

// ── Capture layer ───────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Captured {
    level: Level,
    message: String,
}

#[derive(Clone, Default)]
struct Capture {
    events: Arc<Mutex<Vec<Captured>>>,
}

impl Capture {
    fn at(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(Captured {
            level: *event.metadata().level(),
            message: visitor.0,
        });
    }
}

fn with_capture<T>(f: impl FnOnce() -> T) -> (T, Capture) {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, capture)
}

// ── Tests ───────────────────────────────────────────────────────

#[test]
fn missing_graph_elements_warn() {
    let (_, capture) = with_capture(|| {
        let mut graph = MockGraph::new()
            .with_node("a", IDLE)
            .with_node("b", IDLE)
            .with_edge("a-b", "a", "b");
        graph.drop_edge("a-b");
        let source = ScriptedSource::new(vec![active_frame(b'a', &[("a", 1), ("ghost", 2)])]);
        let mut s =
            PlaybackSession::new(graph, InlineRefill::new(source), PlaybackConfig::default())
                .unwrap();
        s.prime().unwrap();
        s.pump();
        assert_eq!(s.step(1), Ok(StepOutcome::Applied(CycleId(0))));
    });
    let warnings = capture.at(Level::WARN);
    assert!(warnings.iter().any(|m| m.contains("not in graph")), "{warnings:?}");
    assert!(warnings.iter().any(|m| m.contains("outgoing edge")), "{warnings:?}");
}

#[test]
fn failed_refill_warns_once() {
    let (_, capture) = with_capture(|| {
        let mut source = ScriptedSource::counting("a", &[1], 10);
        source.fail_next(FetchError::Unavailable {
            reason: "disk".into(),
        });
        let graph = MockGraph::new().with_node("a", IDLE);
        let mut s =
            PlaybackSession::new(graph, InlineRefill::new(source), PlaybackConfig::default())
                .unwrap();
        s.prime().unwrap();
        assert!(s.pump().failed);
    });
    let warnings = capture.at(Level::WARN);
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert_eq!(warnings[0], "refill failed");
}

#[test]
fn quiet_playback_emits_no_warnings() {
    let (_, capture) = with_capture(|| {
        let source = ScriptedSource::counting("a", &[1, 2, 3], 30);
        let graph = MockGraph::new().with_node("a", IDLE);
        let mut s =
            PlaybackSession::new(graph, InlineRefill::new(source), PlaybackConfig::default())
                .unwrap();
        s.prime().unwrap();
        s.pump();
        while s.step(1).is_ok() {}
    });
    assert!(capture.at(Level::WARN).is_empty());
    assert!(!capture.at(Level::DEBUG).is_empty());
}
