#![forbid(unsafe_code)]

//! Core: markup entities, the project filter/selection controller, and the
//! contact-form validator for Folio portfolio pages.
//!
//! Nothing in this crate touches the DOM. Hosts parse the page into
//! [`markup::PageMarkup`] once, feed [`event::PageEvent`] values in, and read
//! derived state back out.

pub mod config;
pub mod contact;
pub mod event;
pub mod filter;
pub mod markup;
pub mod validation;

pub use config::{ConfigError, PageConfig};
pub use contact::{
    ContactDraft, ContactFailure, ContactField, ContactValidator, FailureKind, RawFields,
    SubmitOutcome,
};
pub use event::{ActivationKey, EventDecodeError, PageEvent};
pub use filter::{CardActivation, FilterController, FilterState, Navigation, Selection};
pub use markup::{ALL_FILTER, CardAttributes, CardId, FilterControl, PageMarkup, ProjectCard, TagSet};
