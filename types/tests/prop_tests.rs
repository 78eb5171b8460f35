use proptest::prelude::*;

use farm_types::{AccountId, FarmParams, Timestamp, SECONDS_PER_PERIOD};

proptest! {
    /// Elapsed time is never negative and matches plain subtraction when ordered.
    #[test]
    fn elapsed_since_is_saturating(start in 0u64..u64::MAX / 2, delta in 0u64..1_000_000) {
        let t = Timestamp::new(start);
        prop_assert_eq!(t.elapsed_since(Timestamp::new(start + delta)), delta);
        prop_assert_eq!(Timestamp::new(start + delta).elapsed_since(t), 0);
    }

    /// Whole periods times the period length never exceeds the elapsed time.
    #[test]
    fn whole_periods_is_floor(elapsed in 0u64..u64::MAX) {
        let periods = FarmParams::current().whole_periods(elapsed);
        prop_assert!(periods as u128 * SECONDS_PER_PERIOD as u128 <= elapsed as u128);
        prop_assert!((periods as u128 + 1) * SECONDS_PER_PERIOD as u128 > elapsed as u128);
    }

    /// Timestamps order the same way as their second counts.
    #[test]
    fn timestamp_ordering_follows_secs(a in any::<u64>(), b in any::<u64>()) {
        prop_assert_eq!(Timestamp::new(a) < Timestamp::new(b), a < b);
    }

    /// Any non-empty whitespace-free string parses to an account id.
    #[test]
    fn account_parse_accepts_tokens(raw in "[a-zA-Z0-9_]{1,40}") {
        let id = AccountId::parse(&raw).unwrap();
        prop_assert_eq!(id.as_str(), raw.as_str());
    }
}
