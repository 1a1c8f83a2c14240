#![forbid(unsafe_code)]

//! Tracing integration tests.
//!
//! Spans enabled:
//!   cargo test -p tablelist --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p tablelist --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tablelist::{ItemRecord, TableList, Template};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured span with its metadata and parent info.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

/// A tracing Layer that captures span metadata.
struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

/// Handle to read captured spans afterwards.
struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    fn named(&self, name: &str) -> Vec<CapturedSpan> {
        self.spans().into_iter().filter(|s| s.name == name).collect()
    }
}

/// Visitor that extracts span fields.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);

        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());

        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }
}

/// Set up a tracing subscriber with span capture and run a closure.
fn with_captured_spans<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let layer = SpanCapture {
        spans: spans.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { spans }
}

fn list() -> TableList {
    TableList::new(
        Template::with_slots(["domain"]),
        Template::with_slots(["name"]),
    )
}

fn records(prefix: &str, n: usize) -> Vec<ItemRecord> {
    (0..n)
        .map(|i| ItemRecord::new(format!("{prefix}{i}")))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn add_items_span_records_count_and_parent() {
    let handle = with_captured_spans(|| {
        let mut list = list();
        list.add_items(records("example", 3), None);
        list.add_items(records("sub", 2), Some("example1"));
    });

    let spans = handle.named("table_list.add_items");
    assert_eq!(spans.len(), 2, "got {spans:?}");
    assert_eq!(spans[0].fields.get("count").map(String::as_str), Some("3"));
    assert_eq!(spans[0].fields.get("parent").map(String::as_str), Some(""));
    assert_eq!(
        spans[1].fields.get("parent").map(String::as_str),
        Some("example1")
    );
}

#[test]
#[cfg(feature = "tracing")]
fn scroll_load_span_carries_batch_bounds() {
    let handle = with_captured_spans(|| {
        let mut list = list();
        list.add_items(records("example", 120), None);
        list.scroll_to(usize::MAX);
    });

    let spans = handle.named("table_list.scroll_load");
    assert_eq!(spans.len(), 1, "got {spans:?}");
    assert_eq!(spans[0].fields.get("from").map(String::as_str), Some("50"));
    assert_eq!(spans[0].fields.get("to").map(String::as_str), Some("100"));
}

#[test]
#[cfg(feature = "tracing")]
fn remove_and_empty_spans() {
    let handle = with_captured_spans(|| {
        let mut list = list();
        list.add_items(records("example", 3), None);
        list.remove_item("example1", None);
        list.empty(None);
    });

    let removes = handle.named("table_list.remove_item");
    assert_eq!(removes.len(), 1);
    assert_eq!(removes[0].fields.get("id").map(String::as_str), Some("example1"));
    assert_eq!(handle.named("table_list.empty").len(), 1);
}

/// Without the `tracing` feature the span macros compile to nothing.
#[test]
#[cfg(not(feature = "tracing"))]
fn zero_overhead_when_disabled() {
    let handle = with_captured_spans(|| {
        let mut list = list();
        list.add_items(records("example", 120), None);
        list.scroll_to(usize::MAX);
        list.remove_item("example0", None);
    });

    let ours: Vec<_> = handle
        .spans()
        .into_iter()
        .filter(|s| s.name.starts_with("table_list."))
        .collect();
    assert!(ours.is_empty(), "unexpected spans: {ours:?}");
}
