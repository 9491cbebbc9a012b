//! Property-based invariant tests for the contact draft validator.
//!
//! Verifies:
//! 1. `sync_draft` is idempotent and always yields trimmed values
//! 2. Rule order: a short name is always reported before email or message problems
//! 3. A rejected submit keeps the draft; an accepted submit clears it
//! 4. Validation is a pure function of the draft

use folio_core::contact::{ContactDraft, ContactValidator, FailureKind, RawFields, SubmitOutcome};
use proptest::prelude::*;

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ \t\n]{0,3}[a-zA-Z ]{0,14}[ \t\n]{0,3}",
        "[ ]{0,2}[a-z]{1,8}@[a-z]{1,8}\\.[a-z]{2,4}[ ]{0,2}",
        any::<String>(),
    ]
}

fn arb_raw() -> impl Strategy<Value = RawFields> {
    (
        prop::option::of(arb_text()),
        prop::option::of(arb_text()),
        prop::option::of(arb_text()),
    )
        .prop_map(|(name, email, message)| RawFields {
            name,
            email,
            message,
        })
}

proptest! {
    #[test]
    fn sync_draft_idempotent_and_trimmed(raw in arb_raw()) {
        let mut v = ContactValidator::default();
        let first = v.sync_draft(&raw).clone();
        let second = v.sync_draft(&raw).clone();
        prop_assert_eq!(&first, &second);
        for value in [&first.name, &first.email, &first.message] {
            prop_assert_eq!(value.trim(), value.as_str());
        }
    }

    #[test]
    fn short_name_reported_first(name in "[a-z]?", raw in arb_raw()) {
        let v = ContactValidator::default();
        let draft = ContactDraft {
            name,
            ..ContactDraft::from_raw(&raw)
        };
        let failure = v.validate(&draft).unwrap_err();
        prop_assert_eq!(failure.kind, FailureKind::NameTooShort);
    }

    #[test]
    fn submit_clears_only_on_success(raw in arb_raw()) {
        let mut v = ContactValidator::default();
        let synced = v.sync_draft(&raw).clone();
        match v.submit() {
            SubmitOutcome::Accepted { .. } => prop_assert!(v.draft().is_empty()),
            SubmitOutcome::Rejected { failure, focus } => {
                prop_assert_eq!(v.draft(), &synced);
                prop_assert_eq!(failure.field(), focus);
            }
        }
    }

    #[test]
    fn validation_is_deterministic(raw in arb_raw()) {
        let v = ContactValidator::default();
        let draft = ContactDraft::from_raw(&raw);
        prop_assert_eq!(v.validate(&draft), v.validate(&draft));
    }
}
