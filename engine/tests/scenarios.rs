mod common;

use common::*;
use farm_engine::{FarmError, StakeRebase};
use farm_token::RewardLedger;

#[test]
fn scenario_a_immediate_withdraw_issues_nothing() {
    let farm = deploy(StakeRebase::Settle);
    farm.hand_over_mint_authority();
    let alice = acct("alice");
    farm.fund(&alice, 100);
    farm.engine.stake(&alice, 100).unwrap();

    assert_eq!(farm.engine.withdraw_yield(&alice).unwrap(), 0);
    assert_eq!(farm.reward.balance_of(&alice), 0);
}

#[test]
fn scenario_b_one_period_issues_stake_amount() {
    let farm = deploy(StakeRebase::Settle);
    farm.hand_over_mint_authority();
    let alice = acct("alice");
    farm.fund(&alice, 100);
    farm.engine.stake(&alice, 100).unwrap();
    farm.clock.advance(DAY);

    assert_eq!(farm.engine.calculate_accrued_time(&alice), DAY);
    assert_eq!(farm.engine.withdraw_yield(&alice).unwrap(), 100);
    assert_eq!(farm.reward.balance_of(&alice), 100);
    assert_eq!(farm.engine.unclaimed_reward(&alice), 0);
    // Deployer's initial supply is untouched; only the minted reward is new.
    assert_eq!(farm.reward.total_supply(), 1_000_100);
}

#[test]
fn scenario_c_unstake_settles_before_reducing() {
    let farm = deploy(StakeRebase::Settle);
    let alice = acct("alice");
    farm.fund(&alice, 10);
    farm.engine.stake(&alice, 10).unwrap();
    farm.clock.advance(DAY);

    assert_eq!(farm.engine.unstake(&alice, 5).unwrap(), 5);
    assert_eq!(farm.engine.unclaimed_reward(&alice), 10);
    assert_eq!(farm.engine.staking_balance(&alice), 5);
    assert_eq!(farm.engine.accrual_start(&alice), farm.clock.now());
}

#[test]
fn scenario_d_over_unstake_fails_with_state_unchanged() {
    let farm = deploy(StakeRebase::Settle);
    let alice = acct("alice");
    farm.fund(&alice, 10);
    farm.engine.stake(&alice, 10).unwrap();
    farm.clock.advance(DAY / 2);
    let before = farm.engine.record(&alice).unwrap();

    match farm.engine.unstake(&alice, 11) {
        Err(FarmError::InsufficientStake { requested, staked }) => {
            assert_eq!(requested, 11);
            assert_eq!(staked, 10);
        }
        other => panic!("expected InsufficientStake, got {other:?}"),
    }
    assert_eq!(farm.engine.record(&alice).unwrap(), before);
    assert_eq!(farm.custody(), 10);
}

#[test]
fn scenario_e_withdraw_before_handoff_fails() {
    let farm = deploy(StakeRebase::Settle);
    let alice = acct("alice");
    farm.fund(&alice, 10);
    farm.engine.stake(&alice, 10).unwrap();
    farm.clock.advance(DAY);

    assert!(matches!(
        farm.engine.withdraw_yield(&alice),
        Err(FarmError::AuthorityNotHeld)
    ));
    assert_eq!(farm.engine.calculate_accrued_time(&alice), DAY);

    farm.hand_over_mint_authority();
    assert_eq!(farm.engine.withdraw_yield(&alice).unwrap(), 10);
}

#[test]
fn unstake_to_zero_then_restake_restarts_clock() {
    let farm = deploy(StakeRebase::Settle);
    farm.hand_over_mint_authority();
    let alice = acct("alice");
    farm.fund(&alice, 100);

    farm.engine.stake(&alice, 100).unwrap();
    farm.clock.advance(2 * DAY);
    farm.engine.unstake(&alice, 100).unwrap();
    assert!(!farm.engine.is_staking(&alice));

    farm.clock.advance(5 * DAY);
    assert_eq!(farm.engine.pending_reward(&alice).unwrap(), 200);

    farm.fund(&alice, 50);
    farm.engine.stake(&alice, 50).unwrap();
    assert!(farm.engine.is_staking(&alice));
    farm.clock.advance(DAY);
    assert_eq!(farm.engine.withdraw_yield(&alice).unwrap(), 250);
}

#[test]
fn partial_periods_truncate_across_the_whole_flow() {
    let farm = deploy(StakeRebase::Settle);
    farm.hand_over_mint_authority();
    let alice = acct("alice");
    farm.fund(&alice, 7);
    farm.engine.stake(&alice, 7).unwrap();

    farm.clock.advance(DAY - 1);
    assert_eq!(farm.engine.pending_reward(&alice).unwrap(), 0);
    farm.clock.advance(1);
    assert_eq!(farm.engine.pending_reward(&alice).unwrap(), 7);
    farm.clock.advance(DAY - 1);
    assert_eq!(farm.engine.withdraw_yield(&alice).unwrap(), 7);
}

#[test]
fn literal_rebase_loses_accrual_on_top_up() {
    let settle = deploy(StakeRebase::Settle);
    let discard = deploy(StakeRebase::Discard);
    for farm in [&settle, &discard] {
        farm.hand_over_mint_authority();
        let alice = acct("alice");
        farm.fund(&alice, 20);
        farm.engine.stake(&alice, 10).unwrap();
        farm.clock.advance(DAY);
        farm.engine.stake(&alice, 10).unwrap();
        farm.clock.advance(DAY);
    }
    assert_eq!(settle.engine.withdraw_yield(&acct("alice")).unwrap(), 30);
    assert_eq!(discard.engine.withdraw_yield(&acct("alice")).unwrap(), 20);
}

#[test]
fn accounts_are_independent() {
    let farm = deploy(StakeRebase::Settle);
    farm.hand_over_mint_authority();
    let alice = acct("alice");
    let bob = acct("bob");
    farm.fund(&alice, 100);
    farm.fund(&bob, 25_000);

    farm.engine.stake(&alice, 100).unwrap();
    farm.clock.advance(DAY);
    farm.engine.stake(&bob, 25_000).unwrap();
    farm.clock.advance(DAY);

    assert_eq!(farm.engine.withdraw_yield(&alice).unwrap(), 200);
    assert_eq!(farm.engine.withdraw_yield(&bob).unwrap(), 25_000);
    assert_eq!(farm.engine.total_staked(), 25_100);
    assert_eq!(farm.custody(), 25_100);
    assert_eq!(farm.engine.total_minted(), 25_200);
}
