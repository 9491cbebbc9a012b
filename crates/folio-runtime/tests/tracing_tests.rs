//! Tracing output of the page runtime, read back through the log capture
//! layer.
//!
//! ```sh
//! cargo test -p folio-runtime --test tracing_tests
//! ```

#![cfg(test)]

use folio_core::config::PageConfig;
use folio_core::contact::ContactField;
use folio_core::event::PageEvent;
use folio_core::markup::{CardAttributes, PageMarkup};
use folio_runtime::log_capture::{LogCaptureHandle, LogCaptureLayer};
use folio_runtime::program::{Effect, PortfolioPage};
use folio_runtime::render::DomPatch;
use folio_runtime::runtime::PageRuntime;
use folio_runtime::simulator::PageSimulator;
use folio_runtime::surface::{PageSurface, SurfaceError};
use tracing_subscriber::prelude::*;

fn capture(f: impl FnOnce()) -> LogCaptureHandle {
    let (layer, handle) = LogCaptureLayer::new(128);
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    handle
}

fn markup() -> PageMarkup {
    PageMarkup::new()
        .with_filter(Some("all"))
        .with_filter(Some("web"))
        .with_card(
            CardAttributes {
                tags: Some("web"),
                title: Some("Site"),
                ..Default::default()
            },
            "Project",
        )
        .with_contact_form(true)
}

/// Surface that refuses everything.
struct RefusingSurface;

impl PageSurface for RefusingSurface {
    type Error = SurfaceError;

    fn apply_patch(&mut self, _patch: &DomPatch) -> Result<(), Self::Error> {
        Err(SurfaceError::Host("read-only".into()))
    }

    fn run_effect(&mut self, _effect: &Effect) -> Result<(), Self::Error> {
        Err(SurfaceError::Host("read-only".into()))
    }
}

#[test]
fn dispatch_logs_event_kind_and_counts() {
    let handle = capture(|| {
        let mut sim = PageSimulator::new(markup(), PageConfig::default());
        sim.click_filter(1);
    });
    let lines = handle.drain();
    assert!(
        lines
            .iter()
            .any(|l| l.contains("event dispatched") && l.contains("kind=filter_click")),
        "{lines:#?}"
    );
    assert!(
        lines
            .iter()
            .any(|l| l.contains("filter applied") && l.contains("filter=web")),
        "{lines:#?}"
    );
}

#[test]
fn selection_and_rejection_are_logged() {
    let handle = capture(|| {
        let mut sim = PageSimulator::new(markup(), PageConfig::default());
        sim.click_card(0);
        sim.type_into(ContactField::Name, "A");
        sim.submit();
    });
    let lines = handle.drain();
    assert!(
        lines
            .iter()
            .any(|l| l.contains("project selected") && l.contains("title=Site")),
        "{lines:#?}"
    );
    assert!(
        lines
            .iter()
            .any(|l| l.starts_with("DEBUG") && l.contains("contact draft rejected")),
        "{lines:#?}"
    );
}

#[test]
fn surface_failures_are_warned_not_raised() {
    let handle = capture(|| {
        let mut rt = PageRuntime::new(
            PortfolioPage::new(markup(), &PageConfig::default()),
            RefusingSurface,
        );
        let report = rt.dispatch(&PageEvent::FilterClick { control: 1 });
        assert_eq!(report.patches, 0);
        assert!(report.failures > 0);
    });
    let warnings: Vec<String> = handle
        .drain()
        .into_iter()
        .filter(|l| l.starts_with("WARN"))
        .collect();
    assert!(!warnings.is_empty());
    assert!(warnings.iter().all(|l| l.contains("host error: read-only")));
}
