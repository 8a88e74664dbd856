//! Property tests for the provider-failure classifier.

use proptest::prelude::*;

use tether::domain::models::{codes, FlowOutcome};

const MAPPED_LINK_CODES: [&str; 5] = [
    codes::CREDENTIAL_ALREADY_IN_USE,
    codes::OPERATION_NOT_ALLOWED,
    codes::NETWORK_REQUEST_FAILED,
    codes::WEAK_PASSWORD,
    codes::INVALID_EMAIL,
];

proptest! {
    /// Property: every unmapped code classifies to `OtherFailure` and
    /// carries the provider message through byte-for-byte.
    #[test]
    fn prop_unmapped_codes_preserve_message(
        code in "[a-z-]{1,40}",
        message in ".*"
    ) {
        prop_assume!(!MAPPED_LINK_CODES.contains(&code.as_str()));

        let outcome = FlowOutcome::classify_link(&code, &message);
        prop_assert_eq!(
            outcome,
            FlowOutcome::OtherFailure { message: message.clone() }
        );
    }

    /// Property: mapped codes classify by code alone; the message never
    /// influences the variant.
    #[test]
    fn prop_mapped_codes_ignore_message(message in ".*") {
        for code in MAPPED_LINK_CODES {
            let outcome = FlowOutcome::classify_link(code, &message);
            prop_assert!(
                !matches!(outcome, FlowOutcome::OtherFailure { .. }),
                "code {} fell through to OtherFailure", code
            );
        }
    }

    /// Property: sign-in classification agrees with link classification
    /// for every code except the wrong-password special case.
    #[test]
    fn prop_sign_in_matches_link_except_wrong_password(
        code in "[a-z-]{1,40}",
        message in ".*"
    ) {
        let sign_in = FlowOutcome::classify_sign_in(&code, &message);

        if code == codes::WRONG_PASSWORD {
            prop_assert_eq!(sign_in, FlowOutcome::SignInWrongSecret);
        } else {
            prop_assert_eq!(sign_in, FlowOutcome::classify_link(&code, &message));
        }
    }

    /// Property: classification is total. Every (code, message) pair
    /// lands on exactly one failure variant, never a success or idle
    /// outcome.
    #[test]
    fn prop_classification_is_total_and_failing(
        code in "\\PC*",
        message in "\\PC*"
    ) {
        let outcome = FlowOutcome::classify_link(&code, &message);
        prop_assert!(outcome.is_failure(), "got {:?}", outcome);

        let outcome = FlowOutcome::classify_sign_in(&code, &message);
        prop_assert!(outcome.is_failure(), "got {:?}", outcome);
    }
}
