#![forbid(unsafe_code)]

//! Project filter and selection state machine.
//!
//! [`FilterController`] owns the parsed filter controls and project cards and
//! the single [`FilterState`] for the page. Everything the DOM shows (which
//! control is active, which cards are visible, which card is highlighted) is
//! derived from that state on demand.
//!
//! # Invariants
//!
//! - A control is active iff its tag equals `active_filter`; with distinct
//!   tags that means exactly one, or none when the tag matches no control.
//! - A card is visible iff the filter is `"all"` or the card carries the tag.
//! - At most one card is selected.

use tracing::{debug, trace};

use crate::markup::{ALL_FILTER, CardId, FilterControl, ProjectCard};

/// The card currently highlighted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub card: CardId,
    pub title: String,
}

/// Page-lifetime filter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    active_filter: String,
    selection: Option<Selection>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            active_filter: ALL_FILTER.to_owned(),
            selection: None,
        }
    }
}

impl FilterState {
    #[must_use]
    pub fn active_filter(&self) -> &str {
        &self.active_filter
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }
}

/// How a card was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardActivation {
    /// Pointer click. `inside_link` is set when the click target sits inside
    /// a hyperlink nested in the card.
    Click { inside_link: bool },
    /// Enter or Space while the card has focus.
    Key,
}

impl CardActivation {
    /// Whether this activation may open the card's target URL.
    #[must_use]
    pub const fn navigates(self) -> bool {
        !matches!(self, Self::Click { inside_link: true })
    }
}

/// Request to open an external project link.
///
/// Hosts must open it in a new browsing context without opener or referrer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub url: String,
}

/// Window features passed along with every [`Navigation`].
pub const NAVIGATION_FEATURES: &str = "noopener,noreferrer";
/// Browsing context target for every [`Navigation`].
pub const NAVIGATION_TARGET: &str = "_blank";

/// Filter/selection controller for one page.
#[derive(Debug, Clone, Default)]
pub struct FilterController {
    controls: Vec<FilterControl>,
    cards: Vec<ProjectCard>,
    state: FilterState,
}

impl FilterController {
    /// Create a controller in the initial state: filter `"all"`, nothing selected.
    #[must_use]
    pub fn new(controls: Vec<FilterControl>, cards: Vec<ProjectCard>) -> Self {
        Self {
            controls,
            cards,
            state: FilterState::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    #[must_use]
    pub fn controls(&self) -> &[FilterControl] {
        &self.controls
    }

    #[must_use]
    pub fn cards(&self) -> &[ProjectCard] {
        &self.cards
    }

    /// Make `tag` the active filter.
    ///
    /// A tag that matches no control or no card is accepted; it simply yields
    /// no active control or no visible card.
    pub fn apply_filter(&mut self, tag: &str) {
        tag.clone_into(&mut self.state.active_filter);
        debug!(
            filter = tag,
            visible = self.visible_count(),
            "filter applied"
        );
    }

    /// Apply the tag carried by control `index`.
    ///
    /// Returns `false` (and changes nothing) if there is no such control.
    pub fn apply_control(&mut self, index: usize) -> bool {
        let Some(control) = self.controls.get(index) else {
            trace!(index, "filter control not found");
            return false;
        };
        let tag = control.tag.clone();
        self.apply_filter(&tag);
        true
    }

    /// Highlight card `id` and record its title.
    ///
    /// Returns the navigation the host should perform, if any. Unknown ids
    /// leave the state untouched and return `None`.
    pub fn select_card(&mut self, id: CardId, activation: CardActivation) -> Option<Navigation> {
        let Some(card) = self.cards.get(id.index()) else {
            trace!(card = %id, "project card not found");
            return None;
        };
        self.state.selection = Some(Selection {
            card: card.id,
            title: card.title.clone(),
        });
        debug!(card = %id, title = %card.title, ?activation, "project selected");

        if !activation.navigates() {
            return None;
        }
        card.target_url.as_ref().map(|url| Navigation { url: url.clone() })
    }

    /// Whether control `index` is marked active.
    #[must_use]
    pub fn is_control_active(&self, index: usize) -> bool {
        self.controls
            .get(index)
            .is_some_and(|c| c.tag == self.state.active_filter)
    }

    /// Whether card `id` is currently shown.
    #[must_use]
    pub fn is_card_visible(&self, id: CardId) -> bool {
        self.cards
            .get(id.index())
            .is_some_and(|c| c.is_visible_under(&self.state.active_filter))
    }

    /// Whether card `id` is currently highlighted.
    #[must_use]
    pub fn is_card_selected(&self, id: CardId) -> bool {
        self.state.selection.as_ref().is_some_and(|s| s.card == id)
    }

    /// Number of cards shown under the active filter.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.cards
            .iter()
            .filter(|c| c.is_visible_under(&self.state.active_filter))
            .count()
    }

    /// Number of controls marked active.
    #[must_use]
    pub fn active_control_count(&self) -> usize {
        (0..self.controls.len())
            .filter(|&i| self.is_control_active(i))
            .count()
    }
}
