#![forbid(unsafe_code)]

//! Page configuration.
//!
//! Every field has a default matching the stock portfolio markup, so an
//! embedding page only overrides what differs. The host passes overrides as
//! JSON; missing keys keep their defaults.
//!
//! ```rust
//! use folio_core::config::PageConfig;
//!
//! let config = PageConfig::from_json(r#"{ "classes": { "active": "on" } }"#).unwrap();
//! assert_eq!(config.classes.active, "on");
//! assert_eq!(config.classes.selected, "is-selected");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::contact::{ContactMessages, ContactRules};

/// CSS selectors used to locate page elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub filter_button: String,
    pub project_card: String,
    /// Relative to a project card.
    pub card_title: String,
    pub contact_form: String,
    pub form_message: String,
    pub year: String,
    pub external_link: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            filter_button: ".filter-btn".into(),
            project_card: ".projects article".into(),
            card_title: "h3".into(),
            contact_form: "#contactForm".into(),
            form_message: "#formMsg".into(),
            year: "[data-year]".into(),
            external_link: "a[target=\"_blank\"]".into(),
        }
    }
}

/// Attribute names read from the markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub filter: String,
    pub tags: String,
    pub category: String,
    pub url: String,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            filter: "data-filter".into(),
            tags: "data-tags".into(),
            category: "data-category".into(),
            url: "data-url".into(),
        }
    }
}

/// Class names toggled on page elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Classes {
    pub active: String,
    pub selected: String,
    pub error: String,
    pub success: String,
}

impl Default for Classes {
    fn default() -> Self {
        Self {
            active: "is-active".into(),
            selected: "is-selected".into(),
            error: "is-error".into(),
            success: "is-success".into(),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON could not be parsed.
    Parse(String),
    /// A selector, attribute, or class name is blank.
    Blank(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid page config: {msg}"),
            Self::Blank(field) => write!(f, "invalid page config: `{field}` must not be blank"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Full configuration for one mounted page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub selectors: Selectors,
    pub attributes: Attributes,
    pub classes: Classes,
    pub rules: ContactRules,
    pub messages: ContactMessages,
    /// Sync the draft on every input event, not only on submit.
    pub live_sync: bool,
    /// Title recorded for cards without a heading.
    pub default_card_title: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            attributes: Attributes::default(),
            classes: Classes::default(),
            rules: ContactRules::default(),
            messages: ContactMessages::default(),
            live_sync: true,
            default_card_title: "Project".into(),
        }
    }
}

impl PageConfig {
    /// Parse overrides from JSON and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject blank selectors, attribute names, and class names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("selectors.filter_button", &self.selectors.filter_button),
            ("selectors.project_card", &self.selectors.project_card),
            ("selectors.card_title", &self.selectors.card_title),
            ("selectors.contact_form", &self.selectors.contact_form),
            ("selectors.form_message", &self.selectors.form_message),
            ("selectors.year", &self.selectors.year),
            ("selectors.external_link", &self.selectors.external_link),
            ("attributes.filter", &self.attributes.filter),
            ("attributes.tags", &self.attributes.tags),
            ("attributes.category", &self.attributes.category),
            ("attributes.url", &self.attributes.url),
            ("classes.active", &self.classes.active),
            ("classes.selected", &self.classes.selected),
            ("classes.error", &self.classes.error),
            ("classes.success", &self.classes.success),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(ConfigError::Blank(*field)),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: ContactRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_messages(mut self, messages: ContactMessages) -> Self {
        self.messages = messages;
        self
    }

    #[must_use]
    pub fn with_classes(mut self, classes: Classes) -> Self {
        self.classes = classes;
        self
    }

    #[must_use]
    pub fn with_live_sync(mut self, live_sync: bool) -> Self {
        self.live_sync = live_sync;
        self
    }
}
