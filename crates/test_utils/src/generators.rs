//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating groups and balance mappings
//! that maintain domain invariants.

use core_kernel::{Currency, GroupId, Money, PersonId};
use domain_settlement::{Balances, Group, Person};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for expense costs in minor units (1 paisa to 10 lakh rupees)
pub fn cost_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

/// Strategy for roster sizes
pub fn roster_size_strategy() -> impl Strategy<Value = usize> {
    1usize..12usize
}

/// Strategy for whole groups: a roster of `p_0..p_n` and expenses paid by
/// random members
pub fn group_strategy() -> impl Strategy<Value = Group> {
    roster_size_strategy().prop_flat_map(|size| {
        let expenses = proptest::collection::vec((cost_minor_strategy(), 0..size), 0..20);
        (Just(size), expenses)
    })
    .prop_map(|(size, expenses)| {
        let mut group = Group::with_id(GroupId::from("g_prop"), "Generated", Currency::INR);
        for index in 0..size {
            group
                .insert_person(Person::new(indexed_id(index), format!("Person {index}")))
                .expect("generated ids are unique");
        }
        for (n, (cost, payer)) in expenses.into_iter().enumerate() {
            let cost = Money::from_minor(cost, Currency::INR).amount();
            group
                .add_expense(format!("Expense {n}"), cost, &indexed_id(payer))
                .expect("generated expenses are valid");
        }
        group
    })
}

/// Strategy for balance mappings that sum exactly to zero
///
/// The last person absorbs the negated sum of everyone else.
pub fn zero_sum_balances_strategy() -> impl Strategy<Value = Balances> {
    proptest::collection::vec(-10_000_000i64..10_000_000i64, 1..15).prop_map(|minors| {
        let closing: i64 = -minors.iter().sum::<i64>();
        let amounts = minors
            .into_iter()
            .chain(std::iter::once(closing))
            .enumerate()
            .map(|(index, minor)| (indexed_id(index), Decimal::new(minor, 2)));
        Balances::from_amounts(Currency::INR, amounts)
    })
}

/// Strategy for arbitrary balance mappings, not necessarily zero-sum
pub fn balances_strategy() -> impl Strategy<Value = Balances> {
    proptest::collection::vec(-10_000_000i64..10_000_000i64, 0..15).prop_map(|minors| {
        Balances::from_amounts(
            Currency::INR,
            minors
                .into_iter()
                .enumerate()
                .map(|(index, minor)| (indexed_id(index), Decimal::new(minor, 2))),
        )
    })
}

fn indexed_id(index: usize) -> PersonId {
    PersonId::from_token(format!("p_{index}"))
}
