#![forbid(unsafe_code)]

//! Desired page view and diffing into DOM patches.
//!
//! The page model produces a [`PageView`] after every event. [`ViewDiff`]
//! compares it with the view that was last pushed to the surface and emits
//! only the patches needed to get there.
//!
//! # Algorithm
//!
//! Document-order scan:
//! 1. Filter controls: emit `SetClass(Active)` where the flag differs
//! 2. Cards: emit `SetVisible` then `SetClass(Selected)` where they differ
//! 3. Message output: emit text and both tone classes if the message differs
//!
//! With no previous view every element is emitted (full paint), so the
//! surface converges regardless of what the static markup shipped with.
//!
//! # Usage
//!
//! ```
//! use folio_runtime::render::{PageView, ViewDiff};
//!
//! let old = PageView { controls_active: vec![true, false], ..Default::default() };
//! let new = PageView { controls_active: vec![false, true], ..Default::default() };
//!
//! assert_eq!(ViewDiff::compute(Some(&old), &new).len(), 2);
//! assert!(ViewDiff::compute(Some(&new), &new).is_empty());
//! ```

use folio_core::filter::FilterController;
use folio_core::markup::CardId;
use serde::Serialize;

/// Visual state of the message output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageTone {
    Error,
    Success,
}

/// Text shown in the message output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormMessage {
    pub text: String,
    pub tone: MessageTone,
}

/// Element addressed by a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Control(usize),
    Card(CardId),
    FormMessage,
}

/// Which configured class name a patch toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassRole {
    Active,
    Selected,
    Error,
    Success,
}

impl ClassRole {
    #[must_use]
    pub const fn for_tone(tone: MessageTone) -> Self {
        match tone {
            MessageTone::Error => Self::Error,
            MessageTone::Success => Self::Success,
        }
    }
}

/// One minimal DOM mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomPatch {
    /// Add (`on`) or remove a class.
    SetClass {
        target: Target,
        class: ClassRole,
        on: bool,
    },
    /// Show a card, or remove it from layout.
    SetVisible { card: CardId, visible: bool },
    /// Replace the message output text.
    SetMessageText { text: String },
}

/// Everything the DOM should show, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageView {
    pub controls_active: Vec<bool>,
    /// Empty when card visibility is left to the markup.
    pub cards_visible: Vec<bool>,
    pub cards_selected: Vec<bool>,
    pub message: Option<FormMessage>,
}

impl PageView {
    /// Derive the filter/selection part of the view from a controller.
    #[must_use]
    pub fn from_filter(filter: &FilterController) -> Self {
        let controls_active = (0..filter.controls().len())
            .map(|i| filter.is_control_active(i))
            .collect();
        let cards_visible = filter
            .cards()
            .iter()
            .map(|c| filter.is_card_visible(c.id))
            .collect();
        let cards_selected = filter
            .cards()
            .iter()
            .map(|c| filter.is_card_selected(c.id))
            .collect();
        Self {
            controls_active,
            cards_visible,
            cards_selected,
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: Option<FormMessage>) -> Self {
        self.message = message;
        self
    }
}

/// Patches that turn one view into another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewDiff {
    patches: Vec<DomPatch>,
}

impl ViewDiff {
    /// Diff `new` against `old`; `None` means nothing has been rendered yet.
    #[must_use]
    pub fn compute(old: Option<&PageView>, new: &PageView) -> Self {
        let mut patches = Vec::new();

        for (i, &on) in new.controls_active.iter().enumerate() {
            if changed(old.map(|v| &v.controls_active), i, on) {
                patches.push(DomPatch::SetClass {
                    target: Target::Control(i),
                    class: ClassRole::Active,
                    on,
                });
            }
        }

        for (i, &visible) in new.cards_visible.iter().enumerate() {
            if changed(old.map(|v| &v.cards_visible), i, visible) {
                patches.push(DomPatch::SetVisible {
                    card: CardId(i),
                    visible,
                });
            }
        }
        for (i, &on) in new.cards_selected.iter().enumerate() {
            if changed(old.map(|v| &v.cards_selected), i, on) {
                patches.push(DomPatch::SetClass {
                    target: Target::Card(CardId(i)),
                    class: ClassRole::Selected,
                    on,
                });
            }
        }

        let old_message = old.and_then(|v| v.message.as_ref());
        if let Some(message) = &new.message
            && old_message != Some(message)
        {
            patches.push(DomPatch::SetMessageText {
                text: message.text.clone(),
            });
            for tone in [MessageTone::Error, MessageTone::Success] {
                patches.push(DomPatch::SetClass {
                    target: Target::FormMessage,
                    class: ClassRole::for_tone(tone),
                    on: tone == message.tone,
                });
            }
        }

        Self { patches }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DomPatch> {
        self.patches.iter()
    }

    #[must_use]
    pub fn into_patches(self) -> Vec<DomPatch> {
        self.patches
    }
}

fn changed(old: Option<&Vec<bool>>, index: usize, now: bool) -> bool {
    old.and_then(|flags| flags.get(index)).copied() != Some(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn view(active: &[bool], visible: &[bool], selected: &[bool]) -> PageView {
        PageView {
            controls_active: active.to_vec(),
            cards_visible: visible.to_vec(),
            cards_selected: selected.to_vec(),
            message: None,
        }
    }

    #[test]
    fn first_render_is_full_paint() {
        let v = view(&[true, false], &[true, true, false], &[false, false, false]);
        let diff = ViewDiff::compute(None, &v);
        assert_eq!(diff.len(), 2 + 3 + 3);
    }

    #[test]
    fn identical_views_produce_nothing() {
        let v = view(&[true], &[true, false], &[false, true]);
        assert!(ViewDiff::compute(Some(&v), &v).is_empty());
    }

    #[test]
    fn filter_change_patches_only_differences() {
        let old = view(&[true, false, false], &[true, true, true], &[false; 3]);
        let new = view(&[false, true, false], &[true, false, true], &[false; 3]);
        let patches = ViewDiff::compute(Some(&old), &new).into_patches();
        assert_eq!(
            patches,
            vec![
                DomPatch::SetClass {
                    target: Target::Control(0),
                    class: ClassRole::Active,
                    on: false
                },
                DomPatch::SetClass {
                    target: Target::Control(1),
                    class: ClassRole::Active,
                    on: true
                },
                DomPatch::SetVisible {
                    card: CardId(1),
                    visible: false
                },
            ]
        );
    }

    #[test]
    fn selection_move_clears_old_and_marks_new() {
        let old = view(&[], &[true, true], &[true, false]);
        let new = view(&[], &[true, true], &[false, true]);
        let patches = ViewDiff::compute(Some(&old), &new).into_patches();
        assert_eq!(patches.len(), 2);
        assert!(patches.contains(&DomPatch::SetClass {
            target: Target::Card(CardId(0)),
            class: ClassRole::Selected,
            on: false
        }));
    }

    #[test]
    fn message_replaces_tone() {
        let old = PageView::default().with_message(Some(FormMessage {
            text: "bad".into(),
            tone: MessageTone::Error,
        }));
        let new = PageView::default().with_message(Some(FormMessage {
            text: "ok".into(),
            tone: MessageTone::Success,
        }));
        let patches = ViewDiff::compute(Some(&old), &new).into_patches();
        assert_eq!(
            patches,
            vec![
                DomPatch::SetMessageText { text: "ok".into() },
                DomPatch::SetClass {
                    target: Target::FormMessage,
                    class: ClassRole::Error,
                    on: false
                },
                DomPatch::SetClass {
                    target: Target::FormMessage,
                    class: ClassRole::Success,
                    on: true
                },
            ]
        );
    }

    #[test]
    fn unchanged_message_not_rewritten() {
        let v = PageView::default().with_message(Some(FormMessage {
            text: "same".into(),
            tone: MessageTone::Error,
        }));
        assert!(ViewDiff::compute(Some(&v), &v).is_empty());
    }
}
