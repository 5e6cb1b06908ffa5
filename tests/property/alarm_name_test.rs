//! Property-based tests for alarm identity encoding.
//!
//! For any owner URL (including ones full of separators and `deadline`
//! lookalikes) and ordinal, decoding an encoded name gives back exactly the
//! same identity, and an owner never matches a different URL.

use pagekeeper::types::alarm::AlarmName;
use proptest::prelude::*;

fn arb_owner() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~]{0,60}",
        "https://[a-z]{1,10}\\.com/[a-z_:0-9]{0,20}",
        "\\PC{0,20}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn encode_then_decode_is_identity(owner in arb_owner(), ordinal in 0usize..10_000) {
        let name = AlarmName::deadline(&owner, ordinal);
        let encoded = name.encode();
        prop_assert!(AlarmName::is_reminder(&encoded));
        prop_assert_eq!(AlarmName::decode(&encoded), Some(name));
    }

    #[test]
    fn distinct_owners_never_share_a_name(
        a in arb_owner(),
        b in arb_owner(),
        ordinal in 0usize..100,
    ) {
        prop_assume!(a != b);
        let name_a = AlarmName::deadline(&a, ordinal).encode();
        let name_b = AlarmName::deadline(&b, ordinal).encode();
        prop_assert_ne!(name_a, name_b);
    }

    #[test]
    fn names_without_prefix_never_decode(raw in "[ -~]{0,40}") {
        prop_assume!(!raw.starts_with("deadline:"));
        prop_assert_eq!(AlarmName::decode(&raw), None);
    }
}
