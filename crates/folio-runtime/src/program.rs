#![forbid(unsafe_code)]

//! The portfolio page program.
//!
//! [`PortfolioPage`] is the single owner of page state: one filter/selection
//! controller and one contact validator, each present only if the markup
//! has the elements it needs. Events go in through [`PortfolioPage::update`];
//! side effects that are not view state come back as [`Effect`] values, and
//! the view is read with [`PortfolioPage::view`].

use folio_core::config::PageConfig;
use folio_core::contact::{ContactDraft, ContactField, ContactValidator, SubmitOutcome};
use folio_core::event::PageEvent;
use folio_core::filter::{FilterController, Navigation};
use folio_core::markup::{ALL_FILTER, CardId, PageMarkup};
use serde::Serialize;
use tracing::{debug, trace};

use crate::render::{FormMessage, MessageTone, PageView};

/// Side effect requested by the page, executed by the surface after patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open an external project link in a new, isolated browsing context.
    Navigate(Navigation),
    /// Clear every contact form control.
    ResetForm,
    /// Move keyboard focus to a contact form control.
    FocusField(ContactField),
}

/// Serializable view of page state for hosts and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSnapshot {
    pub active_filter: Option<String>,
    pub selected_card: Option<CardId>,
    pub selected_title: Option<String>,
    pub draft: Option<ContactDraft>,
    pub message: Option<FormMessage>,
}

/// State owner for one mounted page.
#[derive(Debug, Clone)]
pub struct PortfolioPage {
    filter: Option<FilterController>,
    contact: Option<ContactValidator>,
    message: Option<FormMessage>,
    has_controls: bool,
    live_sync: bool,
}

impl PortfolioPage {
    /// Build the page from parsed markup.
    ///
    /// The filter controller is created when there is at least one control
    /// or card; the contact validator only when the contact form exists.
    #[must_use]
    pub fn new(markup: PageMarkup, config: &PageConfig) -> Self {
        let has_controls = !markup.filters.is_empty();
        let filter = (!markup.filters.is_empty() || !markup.cards.is_empty())
            .then(|| FilterController::new(markup.filters, markup.cards));
        let contact = markup
            .has_contact_form
            .then(|| ContactValidator::new(config.rules, config.messages.clone()));
        Self {
            filter,
            contact,
            message: None,
            has_controls,
            live_sync: config.live_sync,
        }
    }

    /// Startup: normalize controls and cards under the "all" filter.
    pub fn init(&mut self) -> Vec<Effect> {
        if self.has_controls
            && let Some(filter) = self.filter.as_mut()
        {
            filter.apply_filter(ALL_FILTER);
        }
        debug!(
            filter = self.filter.is_some(),
            contact = self.contact.is_some(),
            "page initialized"
        );
        Vec::new()
    }

    /// Apply one event. Events aimed at absent components are ignored.
    pub fn update(&mut self, event: &PageEvent) -> Vec<Effect> {
        trace!(kind = event.kind(), "page event");
        match event {
            PageEvent::FilterClick { control } => {
                if let Some(filter) = self.filter.as_mut() {
                    filter.apply_control(*control);
                }
                Vec::new()
            }
            PageEvent::CardClick { .. } | PageEvent::CardKey { .. } => {
                let Some((card, activation)) = event.card_activation() else {
                    return Vec::new();
                };
                self.filter
                    .as_mut()
                    .and_then(|filter| filter.select_card(card, activation))
                    .map(Effect::Navigate)
                    .into_iter()
                    .collect()
            }
            PageEvent::FormInput { fields } => {
                if self.live_sync
                    && let Some(contact) = self.contact.as_mut()
                {
                    contact.sync_draft(fields);
                }
                Vec::new()
            }
            PageEvent::FormSubmit { fields } => {
                let Some(contact) = self.contact.as_mut() else {
                    return Vec::new();
                };
                let outcome = contact.submit_fields(fields);
                self.message = Some(FormMessage {
                    text: outcome.message(),
                    tone: if outcome.is_accepted() {
                        MessageTone::Success
                    } else {
                        MessageTone::Error
                    },
                });
                match outcome {
                    SubmitOutcome::Accepted { .. } => vec![Effect::ResetForm],
                    SubmitOutcome::Rejected { focus, .. } => vec![Effect::FocusField(focus)],
                }
            }
        }
    }

    /// Desired DOM state.
    ///
    /// Without filter controls nothing can change card visibility, so the
    /// view leaves it to the markup and only carries selection.
    #[must_use]
    pub fn view(&self) -> PageView {
        let mut view = self
            .filter
            .as_ref()
            .map(PageView::from_filter)
            .unwrap_or_default();
        if !self.has_controls {
            view.cards_visible.clear();
        }
        view.with_message(self.message.clone())
    }

    #[must_use]
    pub fn filter(&self) -> Option<&FilterController> {
        self.filter.as_ref()
    }

    #[must_use]
    pub fn contact(&self) -> Option<&ContactValidator> {
        self.contact.as_ref()
    }

    #[must_use]
    pub fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> PageSnapshot {
        let selection = self.filter.as_ref().and_then(|f| f.state().selection());
        PageSnapshot {
            active_filter: self
                .filter
                .as_ref()
                .map(|f| f.state().active_filter().to_owned()),
            selected_card: selection.map(|s| s.card),
            selected_title: selection.map(|s| s.title.clone()),
            draft: self.contact.as_ref().map(|c| c.draft().clone()),
            message: self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::contact::RawFields;
    use folio_core::markup::CardAttributes;

    use crate::render::{DomPatch, ViewDiff};

    fn markup() -> PageMarkup {
        PageMarkup::new()
            .with_filter(Some("all"))
            .with_filter(Some("web"))
            .with_card(
                CardAttributes {
                    tags: Some("web"),
                    url: Some("https://example.com/a"),
                    title: Some("Site"),
                    ..Default::default()
                },
                "Project",
            )
            .with_card(CardAttributes::default(), "Project")
            .with_contact_form(true)
    }

    #[test]
    fn absent_components_ignore_events() {
        let mut page = PortfolioPage::new(PageMarkup::new(), &PageConfig::default());
        page.init();
        assert!(page.filter().is_none());
        assert!(page.contact().is_none());
        assert!(page.update(&PageEvent::FilterClick { control: 0 }).is_empty());
        assert!(
            page.update(&PageEvent::FormSubmit {
                fields: RawFields::default()
            })
            .is_empty()
        );
        assert_eq!(page.view(), PageView::default());
    }

    #[test]
    fn card_click_requests_navigation() {
        let mut page = PortfolioPage::new(markup(), &PageConfig::default());
        page.init();
        let effects = page.update(&PageEvent::CardClick {
            card: CardId(0),
            inside_link: false,
        });
        assert_eq!(
            effects,
            vec![Effect::Navigate(Navigation {
                url: "https://example.com/a".into()
            })]
        );
        assert_eq!(page.snapshot().selected_title.as_deref(), Some("Site"));
    }

    #[test]
    fn ignored_key_changes_nothing() {
        let mut page = PortfolioPage::new(markup(), &PageConfig::default());
        page.init();
        let effects = page.update(&PageEvent::CardKey {
            card: CardId(0),
            key: "Tab".into(),
        });
        assert!(effects.is_empty());
        assert_eq!(page.snapshot().selected_card, None);
    }

    #[test]
    fn rejected_submit_focuses_and_shows_error() {
        let mut page = PortfolioPage::new(markup(), &PageConfig::default());
        let effects = page.update(&PageEvent::FormSubmit {
            fields: RawFields::new("Ann", "nope", "this is long enough"),
        });
        assert_eq!(effects, vec![Effect::FocusField(ContactField::Email)]);
        assert_eq!(page.message().map(|m| m.tone), Some(MessageTone::Error));
    }

    #[test]
    fn accepted_submit_resets_and_shows_success() {
        let mut page = PortfolioPage::new(markup(), &PageConfig::default());
        let effects = page.update(&PageEvent::FormSubmit {
            fields: RawFields::new("Ann", "ann@example.com", "this is long enough"),
        });
        assert_eq!(effects, vec![Effect::ResetForm]);
        assert_eq!(page.message().map(|m| m.tone), Some(MessageTone::Success));
        assert_eq!(page.snapshot().draft, Some(ContactDraft::default()));
    }

    #[test]
    fn live_sync_can_be_disabled() {
        let config = PageConfig::default().with_live_sync(false);
        let mut page = PortfolioPage::new(markup(), &config);
        page.update(&PageEvent::FormInput {
            fields: RawFields::new("Ann", "", ""),
        });
        assert_eq!(page.contact().map(|c| c.draft().name.as_str()), Some(""));

        let mut page = PortfolioPage::new(markup(), &PageConfig::default());
        page.update(&PageEvent::FormInput {
            fields: RawFields::new(" Ann ", "", ""),
        });
        assert_eq!(page.contact().map(|c| c.draft().name.as_str()), Some("Ann"));
    }

    #[test]
    fn view_reflects_filter() {
        let mut page = PortfolioPage::new(markup(), &PageConfig::default());
        page.init();
        page.update(&PageEvent::FilterClick { control: 1 });
        let view = page.view();
        assert_eq!(view.controls_active, vec![false, true]);
        assert_eq!(view.cards_visible, vec![true, false]);
    }

    #[test]
    fn cards_without_controls_keep_their_visibility() {
        let markup = PageMarkup::new()
            .with_card(CardAttributes::default(), "Project")
            .with_card(CardAttributes::default(), "Project");
        let mut page = PortfolioPage::new(markup, &PageConfig::default());
        page.init();

        let diff = ViewDiff::compute(None, &page.view());
        assert!(
            diff.iter()
                .all(|patch| !matches!(patch, DomPatch::SetVisible { .. }))
        );
        assert_eq!(diff.len(), 2);

        page.update(&PageEvent::CardClick {
            card: CardId(1),
            inside_link: false,
        });
        let view = page.view();
        assert!(view.cards_visible.is_empty());
        assert_eq!(view.cards_selected, vec![false, true]);
    }
}
