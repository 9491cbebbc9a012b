#![forbid(unsafe_code)]

//! JSON-friendly page event schema.
//!
//! DOM listeners normalize raw browser events into [`PageEvent`] values
//! before they reach the runtime. The same schema is accepted from the host
//! for replay, so element references are document-order indices rather than
//! DOM handles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::contact::RawFields;
use crate::filter::CardActivation;
use crate::markup::CardId;

/// Keys that activate a focused project card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationKey {
    Enter,
    Space,
}

impl ActivationKey {
    /// Map a DOM `KeyboardEvent.key` value; other keys return `None`.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(Self::Enter),
            " " | "Spacebar" => Some(Self::Space),
            _ => None,
        }
    }
}

/// One user input, already resolved to page entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageEvent {
    /// A filter control was clicked.
    FilterClick { control: usize },
    /// A project card was clicked.
    CardClick {
        card: CardId,
        #[serde(default)]
        inside_link: bool,
    },
    /// A key was pressed while a project card had focus.
    CardKey { card: CardId, key: String },
    /// A contact form field changed.
    FormInput {
        #[serde(default)]
        fields: RawFields,
    },
    /// The contact form was submitted.
    FormSubmit {
        #[serde(default)]
        fields: RawFields,
    },
}

impl PageEvent {
    /// Card activation carried by this event, if any.
    ///
    /// Key events for keys other than Enter and Space are not activations.
    #[must_use]
    pub fn card_activation(&self) -> Option<(CardId, CardActivation)> {
        match self {
            Self::CardClick { card, inside_link } => Some((
                *card,
                CardActivation::Click {
                    inside_link: *inside_link,
                },
            )),
            Self::CardKey { card, key } => {
                ActivationKey::from_dom_key(key).map(|_| (*card, CardActivation::Key))
            }
            _ => None,
        }
    }

    /// Short event name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FilterClick { .. } => "filter_click",
            Self::CardClick { .. } => "card_click",
            Self::CardKey { .. } => "card_key",
            Self::FormInput { .. } => "form_input",
            Self::FormSubmit { .. } => "form_submit",
        }
    }

    pub fn to_json_string(&self) -> Result<String, EventDecodeError> {
        serde_json::to_string(self).map_err(|e| EventDecodeError(e.to_string()))
    }

    pub fn from_json_str(json: &str) -> Result<Self, EventDecodeError> {
        serde_json::from_str(json).map_err(|e| EventDecodeError(e.to_string()))
    }
}

/// A page event could not be encoded or decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDecodeError(pub String);

impl fmt::Display for EventDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid page event: {}", self.0)
    }
}

impl std::error::Error for EventDecodeError {}
