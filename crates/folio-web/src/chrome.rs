#![forbid(unsafe_code)]

//! Page chrome decisions that do not need a DOM.
//!
//! The wasm side reads attributes, asks these helpers what to write, and
//! writes it back.

use folio_core::contact::ContactField;
use folio_core::markup::ProjectCard;

/// `rel` tokens every `target="_blank"` link must carry.
pub const REL_TOKENS: [&str; 2] = ["noopener", "noreferrer"];

/// Role given to linked project cards that do not declare one.
pub const CARD_ROLE: &str = "link";

/// Tab index given to linked project cards that do not declare one.
pub const CARD_TABINDEX: &str = "0";

/// Attributes a linked project card gets when its markup leaves them out.
/// Cards without a target URL only take part in selection and get none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardChrome {
    pub tabindex: &'static str,
    pub role: &'static str,
    pub aria_label: String,
}

impl CardChrome {
    /// Chrome for `card`, or `None` if it does not open anything.
    #[must_use]
    pub fn for_card(card: &ProjectCard) -> Option<Self> {
        card.target_url.as_ref()?;
        Some(Self {
            tabindex: CARD_TABINDEX,
            role: CARD_ROLE,
            aria_label: format!("Open project: {}", card.title),
        })
    }
}

/// The `rel` value a new-tab link should have, or `None` if `existing`
/// already carries every required token.
///
/// Existing tokens are kept in order; missing ones are appended.
#[must_use]
pub fn hardened_rel(existing: Option<&str>) -> Option<String> {
    let current: Vec<&str> = existing.unwrap_or("").split_ascii_whitespace().collect();
    let missing: Vec<&str> = REL_TOKENS
        .iter()
        .copied()
        .filter(|token| !current.iter().any(|t| t.eq_ignore_ascii_case(token)))
        .collect();
    if missing.is_empty() {
        return None;
    }
    Some(
        current
            .into_iter()
            .chain(missing)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// Selector for a contact form control, relative to the form.
#[must_use]
pub fn field_selector(field: ContactField) -> String {
    format!("[name=\"{}\"]", field.name())
}
