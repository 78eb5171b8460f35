mod common;

use common::*;
use farm_engine::{accrue, FarmError, StakeRebase};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Stake(u8, u32),
    Unstake(u8, u32),
    Withdraw(u8),
    Wait(u32),
    FailTransfers(bool),
    RejectMints(bool),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..3, 1u32..10_000).prop_map(|(a, n)| Op::Stake(a, n)),
        (0u8..3, 1u32..10_000).prop_map(|(a, n)| Op::Unstake(a, n)),
        (0u8..3).prop_map(Op::Withdraw),
        (0u32..400_000).prop_map(Op::Wait),
        any::<bool>().prop_map(Op::FailTransfers),
        any::<bool>().prop_map(Op::RejectMints),
    ]
}

fn staker(i: u8) -> farm_types::AccountId {
    acct(&format!("staker_{i}"))
}

proptest! {
    #[test]
    fn accrual_is_monotonic_in_elapsed(staked in 0u128..1_000_000_000, a in 0u64..10_000_000, b in 0u64..10_000_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(accrue(staked, lo).unwrap() <= accrue(staked, hi).unwrap());
    }

    #[test]
    fn accrual_ignores_partial_periods(staked in 0u128..1_000_000_000, periods in 0u64..10_000, extra in 0u64..86_400) {
        prop_assert_eq!(
            accrue(staked, periods * 86_400 + extra),
            accrue(staked, periods * 86_400)
        );
    }

    #[test]
    fn custody_matches_total_staked(ops in prop::collection::vec(op(), 1..60)) {
        let farm = deploy(StakeRebase::Settle);
        farm.hand_over_mint_authority();
        for i in 0..3 {
            farm.fund(&staker(i), 1_000_000);
        }

        let mut net: u128 = 0;
        for op in ops {
            let who = match &op {
                Op::Stake(a, _) | Op::Unstake(a, _) | Op::Withdraw(a) => Some(staker(*a)),
                _ => None,
            };
            let before = who.as_ref().map(|w| farm.engine.record(w));
            let outcome = match op {
                Op::Stake(a, n) => farm
                    .engine
                    .stake(&staker(a), n.into())
                    .map(|_| net += u128::from(n)),
                Op::Unstake(a, n) => {
                    let staked = farm.engine.staking_balance(&staker(a));
                    let result = farm.engine.unstake(&staker(a), n.into());
                    if let Err(FarmError::InsufficientStake { staked: seen, .. }) = &result {
                        prop_assert_eq!(*seen, staked);
                        prop_assert!(u128::from(n) > staked);
                    }
                    result.map(|_| net -= u128::from(n))
                }
                Op::Withdraw(a) => farm.engine.withdraw_yield(&staker(a)).map(|_| ()),
                Op::Wait(secs) => {
                    farm.clock.advance(secs.into());
                    Ok(())
                }
                Op::FailTransfers(fail) => {
                    farm.stake.fail_transfers(fail);
                    Ok(())
                }
                Op::RejectMints(reject) => {
                    farm.reward.reject_mints(reject);
                    Ok(())
                }
            };
            if let (Err(_), Some(who), Some(before)) = (&outcome, &who, before) {
                prop_assert_eq!(farm.engine.record(who), before);
            }
            prop_assert_eq!(farm.custody(), farm.engine.total_staked());
            prop_assert_eq!(farm.engine.total_staked(), net);
        }
    }

    #[test]
    fn withdraw_issues_pending_then_resets(staked in 1u128..1_000_000, days in 0u64..1_000, extra in 0u64..86_400) {
        let farm = deploy(StakeRebase::Settle);
        farm.hand_over_mint_authority();
        let alice = acct("alice");
        farm.fund(&alice, staked);
        farm.engine.stake(&alice, staked).unwrap();
        farm.clock.advance(days * DAY + extra);

        let pending = farm.engine.pending_reward(&alice).unwrap();
        prop_assert_eq!(pending, staked * u128::from(days));
        prop_assert_eq!(farm.engine.withdraw_yield(&alice).unwrap(), pending);
        prop_assert_eq!(farm.engine.pending_reward(&alice).unwrap(), 0);
        prop_assert_eq!(farm.engine.calculate_accrued_time(&alice), 0);
    }

    #[test]
    fn settling_rebase_never_loses_accrual(first in 1u128..10_000, second in 1u128..10_000, d1 in 0u64..50, d2 in 0u64..50) {
        let farm = deploy(StakeRebase::Settle);
        farm.hand_over_mint_authority();
        let alice = acct("alice");
        farm.fund(&alice, first + second);

        farm.engine.stake(&alice, first).unwrap();
        farm.clock.advance(d1 * DAY);
        farm.engine.stake(&alice, second).unwrap();
        farm.clock.advance(d2 * DAY);

        let expected = first * u128::from(d1) + (first + second) * u128::from(d2);
        prop_assert_eq!(farm.engine.withdraw_yield(&alice).unwrap(), expected);
    }
}
