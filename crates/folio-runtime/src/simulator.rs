#![forbid(unsafe_code)]

//! Deterministic page simulator for testing.
//!
//! `PageSimulator` runs a [`PortfolioPage`] against a [`MemorySurface`],
//! enabling event injection and state assertions without a browser. Every
//! dispatched event is recorded and can be exported as JSONL for replay.
//!
//! # Example
//!
//! ```
//! use folio_core::config::PageConfig;
//! use folio_core::contact::ContactField;
//! use folio_core::markup::PageMarkup;
//! use folio_runtime::simulator::PageSimulator;
//!
//! let markup = PageMarkup::new().with_contact_form(true);
//! let mut sim = PageSimulator::new(markup, PageConfig::default());
//! sim.type_into(ContactField::Name, "A");
//! sim.submit();
//! assert_eq!(sim.surface().focused(), Some(ContactField::Name));
//! ```

use folio_core::config::PageConfig;
use folio_core::contact::ContactField;
use folio_core::event::PageEvent;
use folio_core::markup::{CardId, PageMarkup};

use crate::program::{PageSnapshot, PortfolioPage};
use crate::runtime::{DispatchReport, PageRuntime};
use crate::surface::MemorySurface;

/// Deterministic simulator for [`PortfolioPage`] testing.
#[derive(Debug)]
pub struct PageSimulator {
    runtime: PageRuntime<MemorySurface>,
    events: Vec<PageEvent>,
}

impl PageSimulator {
    /// Build and start a page for `markup`.
    #[must_use]
    pub fn new(markup: PageMarkup, config: PageConfig) -> Self {
        let surface = MemorySurface::from_markup(&markup);
        let mut runtime = PageRuntime::new(PortfolioPage::new(markup, &config), surface);
        runtime.start();
        Self {
            runtime,
            events: Vec::new(),
        }
    }

    /// Dispatch a raw event.
    pub fn send(&mut self, event: PageEvent) -> DispatchReport {
        let report = self.runtime.dispatch(&event);
        self.events.push(event);
        report
    }

    pub fn click_filter(&mut self, control: usize) -> DispatchReport {
        self.send(PageEvent::FilterClick { control })
    }

    pub fn click_card(&mut self, card: usize) -> DispatchReport {
        self.send(PageEvent::CardClick {
            card: CardId(card),
            inside_link: false,
        })
    }

    /// Click a hyperlink nested inside a card.
    pub fn click_link_in_card(&mut self, card: usize) -> DispatchReport {
        self.send(PageEvent::CardClick {
            card: CardId(card),
            inside_link: true,
        })
    }

    pub fn press_on_card(&mut self, card: usize, key: &str) -> DispatchReport {
        self.send(PageEvent::CardKey {
            card: CardId(card),
            key: key.to_owned(),
        })
    }

    /// Set a field's value and fire an input event with the whole form.
    pub fn type_into(&mut self, field: ContactField, value: &str) -> DispatchReport {
        self.runtime.surface_mut().set_field(field, value);
        let fields = self.runtime.surface().raw_fields().clone();
        self.send(PageEvent::FormInput { fields })
    }

    /// Submit the form with the current field values.
    pub fn submit(&mut self) -> DispatchReport {
        let fields = self.runtime.surface().raw_fields().clone();
        self.send(PageEvent::FormSubmit { fields })
    }

    #[must_use]
    pub fn page(&self) -> &PortfolioPage {
        self.runtime.page()
    }

    #[must_use]
    pub fn surface(&self) -> &MemorySurface {
        self.runtime.surface()
    }

    #[must_use]
    pub fn snapshot(&self) -> PageSnapshot {
        self.runtime.page().snapshot()
    }

    /// Events sent so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[PageEvent] {
        &self.events
    }

    /// Recorded events, one JSON object per line.
    ///
    /// Fails on the first event that cannot be encoded.
    pub fn events_jsonl(&self) -> Result<String, folio_core::EventDecodeError> {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&event.to_json_string()?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Dispatch every non-blank line of `jsonl`. Stops at the first bad line.
    pub fn replay_jsonl(&mut self, jsonl: &str) -> Result<usize, folio_core::EventDecodeError> {
        let mut count = 0;
        for line in jsonl.lines().filter(|l| !l.trim().is_empty()) {
            let event = PageEvent::from_json_str(line)?;
            self.send(event);
            count += 1;
        }
        Ok(count)
    }
}
