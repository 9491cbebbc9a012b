#![forbid(unsafe_code)]

//! The seam between the page runtime and whatever displays the page.
//!
//! A [`PageSurface`] applies [`DomPatch`]es and performs [`Effect`]s. The
//! browser implementation lives in `folio-web`; [`MemorySurface`] keeps the
//! same state in plain vectors so the runtime can be driven without a DOM.

use core::fmt;

use folio_core::contact::{ContactField, RawFields};
use folio_core::markup::{CardId, PageMarkup};

use crate::program::Effect;
use crate::render::{ClassRole, DomPatch, MessageTone, Target};

/// Surface error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// A patch addressed an element the surface does not have.
    MissingElement(String),
    /// The host rejected an operation.
    Host(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement(what) => write!(f, "missing element: {what}"),
            Self::Host(msg) => write!(f, "host error: {msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Something that can display a portfolio page.
pub trait PageSurface {
    type Error: std::error::Error;

    /// Apply one view patch.
    fn apply_patch(&mut self, patch: &DomPatch) -> Result<(), Self::Error>;

    /// Perform one side effect.
    fn run_effect(&mut self, effect: &Effect) -> Result<(), Self::Error>;
}

/// In-memory page surface.
///
/// Optional elements follow the markup: writing a message without a message
/// output, or resetting a form that does not exist, is a silent no-op.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    controls_active: Vec<bool>,
    cards_visible: Vec<bool>,
    cards_selected: Vec<bool>,
    has_form: bool,
    has_message: bool,
    message_text: String,
    message_tone: Option<MessageTone>,
    fields: RawFields,
    focused: Option<ContactField>,
    opened: Vec<String>,
    form_resets: usize,
    patches_applied: usize,
}

impl MemorySurface {
    /// A surface with the elements described by `markup`, all cards visible,
    /// nothing active or selected.
    #[must_use]
    pub fn from_markup(markup: &PageMarkup) -> Self {
        let fields = if markup.has_contact_form {
            RawFields::new("", "", "")
        } else {
            RawFields::default()
        };
        Self {
            controls_active: vec![false; markup.filters.len()],
            cards_visible: vec![true; markup.cards.len()],
            cards_selected: vec![false; markup.cards.len()],
            has_form: markup.has_contact_form,
            has_message: markup.has_form_message,
            fields,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_control_active(&self, index: usize) -> bool {
        self.controls_active.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn is_card_visible(&self, card: CardId) -> bool {
        self.cards_visible.get(card.index()).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn is_card_selected(&self, card: CardId) -> bool {
        self.cards_selected
            .get(card.index())
            .copied()
            .unwrap_or(false)
    }

    #[must_use]
    pub fn active_controls(&self) -> Vec<usize> {
        flagged(&self.controls_active)
    }

    #[must_use]
    pub fn visible_cards(&self) -> Vec<CardId> {
        flagged(&self.cards_visible).into_iter().map(CardId).collect()
    }

    #[must_use]
    pub fn selected_cards(&self) -> Vec<CardId> {
        flagged(&self.cards_selected).into_iter().map(CardId).collect()
    }

    /// Message output text and tone; `None` when nothing has been shown.
    #[must_use]
    pub fn message(&self) -> Option<(&str, MessageTone)> {
        self.message_tone
            .map(|tone| (self.message_text.as_str(), tone))
    }

    /// Type into a form control. Ignored when the form does not exist.
    pub fn set_field(&mut self, field: ContactField, value: &str) {
        if !self.has_form {
            return;
        }
        let slot = match field {
            ContactField::Name => &mut self.fields.name,
            ContactField::Email => &mut self.fields.email,
            ContactField::Message => &mut self.fields.message,
        };
        *slot = Some(value.to_owned());
    }

    /// Current raw control values.
    #[must_use]
    pub fn raw_fields(&self) -> &RawFields {
        &self.fields
    }

    #[must_use]
    pub fn focused(&self) -> Option<ContactField> {
        self.focused
    }

    /// URLs opened so far, oldest first.
    #[must_use]
    pub fn opened(&self) -> &[String] {
        &self.opened
    }

    #[must_use]
    pub fn form_resets(&self) -> usize {
        self.form_resets
    }

    #[must_use]
    pub fn patches_applied(&self) -> usize {
        self.patches_applied
    }

    fn class_flag(
        &mut self,
        target: Target,
        class: ClassRole,
    ) -> Result<Option<&mut bool>, SurfaceError> {
        let slot = match (target, class) {
            (Target::Control(i), ClassRole::Active) => self.controls_active.get_mut(i),
            (Target::Card(id), ClassRole::Selected) => self.cards_selected.get_mut(id.index()),
            (Target::FormMessage, ClassRole::Error | ClassRole::Success) => return Ok(None),
            (target, class) => {
                return Err(SurfaceError::Host(format!(
                    "class {class:?} not supported on {target:?}"
                )));
            }
        };
        slot.map(Some)
            .ok_or_else(|| SurfaceError::MissingElement(format!("{target:?}")))
    }
}

fn flagged(flags: &[bool]) -> Vec<usize> {
    flags
        .iter()
        .enumerate()
        .filter_map(|(i, &on)| on.then_some(i))
        .collect()
}

impl PageSurface for MemorySurface {
    type Error = SurfaceError;

    fn apply_patch(&mut self, patch: &DomPatch) -> Result<(), Self::Error> {
        match patch {
            DomPatch::SetClass { target, class, on } => {
                if let Some(flag) = self.class_flag(*target, *class)? {
                    *flag = *on;
                } else if self.has_message {
                    // Message tone: the last class turned on wins.
                    let tone = match class {
                        ClassRole::Error => MessageTone::Error,
                        _ => MessageTone::Success,
                    };
                    if *on {
                        self.message_tone = Some(tone);
                    } else if self.message_tone == Some(tone) {
                        self.message_tone = None;
                    }
                }
            }
            DomPatch::SetVisible { card, visible } => {
                let slot = self
                    .cards_visible
                    .get_mut(card.index())
                    .ok_or_else(|| SurfaceError::MissingElement(card.to_string()))?;
                *slot = *visible;
            }
            DomPatch::SetMessageText { text } => {
                if self.has_message {
                    text.clone_into(&mut self.message_text);
                }
            }
        }
        self.patches_applied += 1;
        Ok(())
    }

    fn run_effect(&mut self, effect: &Effect) -> Result<(), Self::Error> {
        match effect {
            Effect::Navigate(nav) => self.opened.push(nav.url.clone()),
            Effect::ResetForm => {
                if self.has_form {
                    self.fields = RawFields::new("", "", "");
                    self.form_resets += 1;
                }
            }
            Effect::FocusField(field) => {
                if self.has_form {
                    self.focused = Some(*field);
                }
            }
        }
        Ok(())
    }
}
