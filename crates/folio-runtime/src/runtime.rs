#![forbid(unsafe_code)]

//! Event loop glue: page program + view diff + surface.
//!
//! [`PageRuntime`] runs each event to completion synchronously:
//! update the page, diff the new view against the last rendered one, apply
//! patches, then run effects. A failing patch or effect is logged and
//! skipped; it never aborts the rest of the batch or reaches the caller as
//! an error.

use folio_core::event::PageEvent;
use serde::Serialize;
use tracing::{debug, warn};

use crate::program::{Effect, PortfolioPage};
use crate::render::{PageView, ViewDiff};
use crate::surface::PageSurface;

/// What one dispatch did to the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    /// Patches applied successfully.
    pub patches: usize,
    /// Effects performed successfully.
    pub effects: usize,
    /// Patches or effects the surface rejected.
    pub failures: usize,
}

impl DispatchReport {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.patches == 0 && self.effects == 0 && self.failures == 0
    }

    /// Add `other`'s counts to this report.
    pub fn absorb(&mut self, other: Self) {
        self.patches += other.patches;
        self.effects += other.effects;
        self.failures += other.failures;
    }
}

/// Owns the page program and the surface it renders to.
#[derive(Debug)]
pub struct PageRuntime<S: PageSurface> {
    page: PortfolioPage,
    surface: S,
    rendered: Option<PageView>,
    started: bool,
}

impl<S: PageSurface> PageRuntime<S> {
    #[must_use]
    pub fn new(page: PortfolioPage, surface: S) -> Self {
        Self {
            page,
            surface,
            rendered: None,
            started: false,
        }
    }

    /// Run page startup and paint the whole view once.
    ///
    /// Calling `start` again is a no-op.
    pub fn start(&mut self) -> DispatchReport {
        if self.started {
            return DispatchReport::default();
        }
        self.started = true;
        let effects = self.page.init();
        self.flush(effects)
    }

    /// Handle one event. Starts the runtime first if needed; the startup
    /// paint is then counted in the returned report.
    pub fn dispatch(&mut self, event: &PageEvent) -> DispatchReport {
        let mut report = self.start();
        let effects = self.page.update(event);
        report.absorb(self.flush(effects));
        debug!(
            kind = event.kind(),
            patches = report.patches,
            effects = report.effects,
            failures = report.failures,
            "event dispatched"
        );
        report
    }

    #[must_use]
    pub fn page(&self) -> &PortfolioPage {
        &self.page
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The view last pushed to the surface.
    #[must_use]
    pub fn rendered(&self) -> Option<&PageView> {
        self.rendered.as_ref()
    }

    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }

    fn flush(&mut self, effects: Vec<Effect>) -> DispatchReport {
        let mut report = DispatchReport::default();

        let next = self.page.view();
        let diff = ViewDiff::compute(self.rendered.as_ref(), &next);
        for patch in diff.iter() {
            match self.surface.apply_patch(patch) {
                Ok(()) => report.patches += 1,
                Err(err) => {
                    warn!(?patch, error = %err, "patch dropped");
                    report.failures += 1;
                }
            }
        }
        self.rendered = Some(next);

        for effect in &effects {
            match self.surface.run_effect(effect) {
                Ok(()) => report.effects += 1,
                Err(err) => {
                    warn!(?effect, error = %err, "effect dropped");
                    report.failures += 1;
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{MemorySurface, SurfaceError};
    use crate::render::DomPatch;
    use folio_core::config::PageConfig;
    use folio_core::markup::{CardAttributes, CardId, PageMarkup};

    /// Surface that rejects every patch for one card.
    #[derive(Debug, Default)]
    struct FlakySurface {
        inner: MemorySurface,
        broken_card: usize,
    }

    impl PageSurface for FlakySurface {
        type Error = SurfaceError;

        fn apply_patch(&mut self, patch: &DomPatch) -> Result<(), Self::Error> {
            if let DomPatch::SetVisible { card, .. } = patch
                && card.index() == self.broken_card
            {
                return Err(SurfaceError::Host("detached".into()));
            }
            self.inner.apply_patch(patch)
        }

        fn run_effect(&mut self, effect: &Effect) -> Result<(), Self::Error> {
            self.inner.run_effect(effect)
        }
    }

    fn markup() -> PageMarkup {
        PageMarkup::new()
            .with_filter(Some("all"))
            .with_filter(Some("web"))
            .with_card(
                CardAttributes {
                    tags: Some("web"),
                    ..Default::default()
                },
                "Project",
            )
            .with_card(CardAttributes::default(), "Project")
    }

    #[test]
    fn start_paints_once() {
        let markup = markup();
        let surface = MemorySurface::from_markup(&markup);
        let mut rt = PageRuntime::new(PortfolioPage::new(markup, &PageConfig::default()), surface);
        let first = rt.start();
        assert_eq!(first.patches, 2 + 2 + 2);
        assert!(rt.start().is_noop());
        assert_eq!(rt.surface().active_controls(), vec![0]);
    }

    #[test]
    fn failing_patch_does_not_stop_batch() {
        let markup = markup();
        let surface = FlakySurface {
            inner: MemorySurface::from_markup(&markup),
            broken_card: 1,
        };
        let mut rt = PageRuntime::new(PortfolioPage::new(markup, &PageConfig::default()), surface);
        rt.start();
        let report = rt.dispatch(&PageEvent::FilterClick { control: 1 });
        assert_eq!(report.failures, 1);
        assert_eq!(report.patches, 2);
        assert!(rt.surface().inner.is_control_active(1));
        assert!(rt.surface().inner.is_card_visible(CardId(0)));
    }

    #[test]
    fn dispatch_starts_implicitly() {
        let markup = markup();
        let surface = MemorySurface::from_markup(&markup);
        let mut rt = PageRuntime::new(PortfolioPage::new(markup, &PageConfig::default()), surface);
        let report = rt.dispatch(&PageEvent::FilterClick { control: 1 });
        assert_eq!(rt.surface().active_controls(), vec![1]);
        assert_eq!(rt.surface().visible_cards(), vec![CardId(0)]);
        // Startup paint (6) plus both controls and the hidden card (3).
        assert_eq!(report.patches, 6 + 3);
        assert_eq!(report.failures, 0);
    }

    #[test]
    fn implicit_start_reports_startup_failures() {
        let markup = markup();
        let surface = FlakySurface {
            inner: MemorySurface::from_markup(&markup),
            broken_card: 0,
        };
        let mut rt = PageRuntime::new(PortfolioPage::new(markup, &PageConfig::default()), surface);
        let report = rt.dispatch(&PageEvent::CardClick {
            card: CardId(1),
            inside_link: false,
        });
        assert_eq!(report.failures, 1);
        assert_eq!(report.patches, 5 + 1);

        let next = rt.dispatch(&PageEvent::CardClick {
            card: CardId(0),
            inside_link: false,
        });
        assert_eq!(next.failures, 0);
        assert_eq!(next.patches, 2);
    }
}
