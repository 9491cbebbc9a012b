#![forbid(unsafe_code)]

//! Plain entities parsed once from the page's static markup.
//!
//! The DOM is the source of these values only at page load. After that the
//! controllers work on [`PageMarkup`] and never re-read attributes.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag that matches every card regardless of its own tags.
pub const ALL_FILTER: &str = "all";

/// Position of a project card in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub usize);

impl CardId {
    /// Index into the card list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card#{}", self.0)
    }
}

/// Set of category tags attached to a card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    /// Parse a comma-separated tag list.
    ///
    /// Entries are trimmed; empty entries are dropped. A missing attribute
    /// yields the empty set.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let tags = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect();
        Self(tags)
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Whether a card with `tags` is shown under filter `tag`.
#[must_use]
pub fn matches_filter(tag: &str, tags: &TagSet) -> bool {
    tag == ALL_FILTER || tags.contains(tag)
}

/// Raw attribute values read from one project card element.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardAttributes<'a> {
    /// Comma-separated tag list.
    pub tags: Option<&'a str>,
    /// Single explicit category, used when `tags` is absent.
    pub category: Option<&'a str>,
    /// External link opened on activation.
    pub url: Option<&'a str>,
    /// Heading text.
    pub title: Option<&'a str>,
}

/// A project card. Never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCard {
    pub id: CardId,
    pub title: String,
    pub tags: TagSet,
    pub target_url: Option<String>,
}

impl ProjectCard {
    /// Build a card from its raw attributes.
    ///
    /// `fallback_title` is used when the card has no non-blank heading.
    #[must_use]
    pub fn from_attributes(id: CardId, attrs: CardAttributes<'_>, fallback_title: &str) -> Self {
        let tags = match attrs.tags {
            Some(raw) => TagSet::parse(Some(raw)),
            None => TagSet::parse(attrs.category),
        };
        let title = attrs
            .title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(fallback_title)
            .to_owned();
        let target_url = attrs
            .url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_owned);
        Self {
            id,
            title,
            tags,
            target_url,
        }
    }

    /// Whether this card is shown under filter `tag`.
    #[must_use]
    pub fn is_visible_under(&self, tag: &str) -> bool {
        matches_filter(tag, &self.tags)
    }
}

/// A filter button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterControl {
    pub index: usize,
    pub tag: String,
}

impl FilterControl {
    /// Build a control from its filter attribute; missing or blank means "all".
    #[must_use]
    pub fn new(index: usize, raw_tag: Option<&str>) -> Self {
        let tag = raw_tag
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(ALL_FILTER)
            .to_owned();
        Self { index, tag }
    }
}

/// Everything the page runtime needs to know about the static markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMarkup {
    pub filters: Vec<FilterControl>,
    pub cards: Vec<ProjectCard>,
    /// A contact form with the three named fields exists.
    pub has_contact_form: bool,
    /// The message output element exists.
    pub has_form_message: bool,
}

impl PageMarkup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter control in document order.
    #[must_use]
    pub fn with_filter(mut self, raw_tag: Option<&str>) -> Self {
        let index = self.filters.len();
        self.filters.push(FilterControl::new(index, raw_tag));
        self
    }

    /// Append a project card in document order.
    #[must_use]
    pub fn with_card(mut self, attrs: CardAttributes<'_>, fallback_title: &str) -> Self {
        let id = CardId(self.cards.len());
        self.cards
            .push(ProjectCard::from_attributes(id, attrs, fallback_title));
        self
    }

    /// Declare the contact form and whether it has a message output.
    #[must_use]
    pub fn with_contact_form(mut self, has_form_message: bool) -> Self {
        self.has_contact_form = true;
        self.has_form_message = has_form_message;
        self
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&ProjectCard> {
        self.cards.get(id.index())
    }
}
