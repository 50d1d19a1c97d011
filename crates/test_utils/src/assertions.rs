//! Custom Test Assertions
//!
//! Assertion helpers for balances and settlement payments that give more
//! meaningful messages than plain `assert!`.

use core_kernel::{PersonId, SETTLEMENT_TOLERANCE};
use domain_settlement::{apply, Balances, SettlementTransaction};
use rust_decimal::Decimal;

/// Asserts that balances sum to zero within `tolerance`
pub fn assert_zero_sum(balances: &Balances, tolerance: Decimal) {
    let net = balances.net();
    assert!(
        net.amount().abs() <= tolerance,
        "Balances do not sum to zero: net={}, tolerance={}",
        net.amount(),
        tolerance
    );
}

/// Asserts that applying `transactions` leaves every balance within
/// `tolerance` of zero
pub fn assert_settles(balances: &Balances, transactions: &[SettlementTransaction], tolerance: Decimal) {
    let settled = apply(balances, transactions);
    for (id, balance) in settled.iter() {
        assert!(
            balance.amount().abs() <= tolerance,
            "{} still has balance {} after settlement (tolerance {})",
            id,
            balance.amount(),
            tolerance
        );
    }
}

/// Asserts that nobody pays themselves
pub fn assert_no_self_payment(transactions: &[SettlementTransaction]) {
    for t in transactions {
        assert_ne!(t.from, t.to, "Self-payment emitted: {}", t);
    }
}

/// Asserts that every amount is at least the settlement tolerance
pub fn assert_amounts_at_least_tolerance(transactions: &[SettlementTransaction]) {
    for t in transactions {
        assert!(
            t.amount.amount() >= SETTLEMENT_TOLERANCE,
            "Dust transaction emitted: {}",
            t
        );
    }
}

/// Asserts one transaction's parties and amount
pub fn assert_transaction(
    transaction: &SettlementTransaction,
    from: &PersonId,
    to: &PersonId,
    amount: Decimal,
) {
    assert_eq!(&transaction.from, from, "Unexpected payer in {}", transaction);
    assert_eq!(&transaction.to, to, "Unexpected payee in {}", transaction);
    assert_eq!(
        transaction.amount.amount(),
        amount,
        "Unexpected amount in {}",
        transaction
    );
}

/// Asserts that a person's balance equals `expected`
pub fn assert_balance(balances: &Balances, id: &PersonId, expected: Decimal) {
    let actual = balances
        .get(id)
        .unwrap_or_else(|| panic!("{} has no balance", id));
    assert_eq!(
        actual.amount(),
        expected,
        "Balance of {} is {}, expected {}",
        id,
        actual.amount(),
        expected
    );
}

/// Asserts that a result is Ok and returns the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Asserts that an error matches a specific variant
#[macro_export]
macro_rules! assert_err_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Ok(value) => panic!("Expected Err matching {}, got Ok({:?})", stringify!($pattern), value),
            Err(ref e) => {
                assert!(
                    matches!(e, $pattern),
                    "Error {:?} does not match pattern {}",
                    e,
                    stringify!($pattern)
                );
            }
        }
    };
}
