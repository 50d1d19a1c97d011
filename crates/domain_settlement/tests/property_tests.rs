//! Property-based tests for the settlement stages

use core_kernel::{Currency, PersonId, SETTLEMENT_TOLERANCE};
use domain_settlement::{aggregate, apply, reduce, settle, Balances};
use proptest::prelude::*;
use rust_decimal::Decimal;
use test_utils::{
    assert_amounts_at_least_tolerance, assert_no_self_payment, assert_settles, assert_zero_sum,
    balances_strategy, group_strategy, zero_sum_balances_strategy,
};

/// Residue left after settling `people` balances; each skipped or advanced
/// position may keep up to one tolerance
fn closure_bound(people: usize) -> Decimal {
    SETTLEMENT_TOLERANCE * Decimal::from(people.max(1))
}

proptest! {
    #[test]
    fn prop_aggregated_balances_sum_to_zero(group in group_strategy()) {
        let sheet = aggregate(group.people(), group.items(), group.currency());

        assert_zero_sum(&sheet.balances, SETTLEMENT_TOLERANCE);
        prop_assert_eq!(sheet.balances.len(), group.people().len());
        prop_assert_eq!(sheet.total, group.total_spend());
    }

    #[test]
    fn prop_settling_a_group_closes_every_balance(group in group_strategy()) {
        let summary = settle(&group);

        assert_settles(&summary.balances, &summary.transactions, closure_bound(group.people().len()));
        assert_no_self_payment(&summary.transactions);
        assert_amounts_at_least_tolerance(&summary.transactions);
    }

    #[test]
    fn prop_zero_sum_balances_settle(balances in zero_sum_balances_strategy()) {
        let txns = reduce(&balances);

        assert_settles(&balances, &txns, closure_bound(balances.len()));
        assert_no_self_payment(&txns);
    }

    #[test]
    fn prop_amounts_are_positive(balances in balances_strategy()) {
        for t in reduce(&balances) {
            prop_assert!(t.amount.is_positive());
            prop_assert!(t.amount.amount() >= SETTLEMENT_TOLERANCE);
        }
    }

    #[test]
    fn prop_transaction_count_bound(balances in balances_strategy()) {
        let debtors = balances.iter().filter(|(_, b)| b.amount() < -SETTLEMENT_TOLERANCE).count();
        let creditors = balances.iter().filter(|(_, b)| b.amount() > SETTLEMENT_TOLERANCE).count();

        let txns = reduce(&balances);

        if debtors == 0 || creditors == 0 {
            prop_assert!(txns.is_empty());
        } else {
            prop_assert!(txns.len() <= debtors + creditors - 1);
        }
    }

    #[test]
    fn prop_reduce_is_idempotent(balances in balances_strategy()) {
        prop_assert_eq!(reduce(&balances), reduce(&balances));
    }

    #[test]
    fn prop_payments_flow_from_debtors_to_creditors(balances in balances_strategy()) {
        for t in reduce(&balances) {
            let from = balances.get(&t.from).map(|m| m.amount()).unwrap_or_default();
            let to = balances.get(&t.to).map(|m| m.amount()).unwrap_or_default();
            prop_assert!(from < Decimal::ZERO);
            prop_assert!(to > Decimal::ZERO);
        }
    }

    #[test]
    fn prop_dust_never_pays(minors in proptest::collection::vec(-100i64..=100i64, 0..10)) {
        // Every amount is within one cent of zero
        let balances = Balances::from_amounts(
            Currency::INR,
            minors
                .into_iter()
                .enumerate()
                .map(|(i, minor)| (PersonId::from_token(format!("p_{i}")), Decimal::new(minor, 4))),
        );

        prop_assert!(reduce(&balances).is_empty());
        prop_assert!(apply(&balances, &[]).is_settled());
    }
}
