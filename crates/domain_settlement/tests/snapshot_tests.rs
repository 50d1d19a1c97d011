//! Snapshot decoding and conversion tests

use core_kernel::{Currency, ExpenseItemId, GroupId};
use domain_settlement::{settle, GroupSnapshot, ItemSnapshot, Person};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_utils::{
    assert_balance, assert_transaction, init_test_tracing, pid, GroupFixtures, SnapshotFixtures,
};

fn item(id: &str, cost: Decimal, payer: &str, split_with: Option<Vec<&str>>) -> ItemSnapshot {
    ItemSnapshot {
        id: ExpenseItemId::from(id),
        description: id.to_string(),
        cost,
        paid_by: Some(pid(payer)),
        split_with: split_with.map(|names| names.into_iter().map(pid).collect()),
        created_at: None,
    }
}

fn snapshot(people: &[&str], items: Vec<ItemSnapshot>) -> GroupSnapshot {
    GroupSnapshot {
        id: GroupId::from("g_snap"),
        name: "Snapshot".to_string(),
        currency: None,
        people: people.iter().map(|n| Person::new(pid(n), *n)).collect(),
        items,
    }
}

mod lenient_decoding {
    use super::*;

    #[test]
    fn test_malformed_costs_become_zero() {
        init_test_tracing();
        let snapshot = SnapshotFixtures::messy_trip();

        let costs: Vec<Decimal> = snapshot.items.iter().map(|i| i.cost).collect();
        assert_eq!(costs, vec![dec!(90.00), dec!(30), dec!(0), dec!(0), dec!(0)]);
    }

    #[test]
    fn test_blank_payer_becomes_none() {
        let snapshot = SnapshotFixtures::messy_trip();
        assert_eq!(snapshot.items[4].paid_by, None);
        assert_eq!(snapshot.items[0].paid_by, Some(pid("A")));
    }

    #[test]
    fn test_missing_splits_are_recorded_as_absent() {
        let snapshot = SnapshotFixtures::messy_trip();
        assert!(snapshot.items[1].split_with.is_none());
        assert_eq!(snapshot.items[0].split_with.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_messy_trip_settles() {
        init_test_tracing();
        let group = SnapshotFixtures::messy_trip().into_group(Currency::INR);

        let summary = settle(&group);

        assert_eq!(summary.total.amount(), dec!(120));
        assert_eq!(summary.average_per_person.amount(), dec!(40));
        assert_balance(&summary.balances, &pid("A"), dec!(50));
        assert_balance(&summary.balances, &pid("B"), dec!(-10));
        assert_balance(&summary.balances, &pid("C"), dec!(-40));
        assert_eq!(summary.transactions.len(), 2);
        assert_transaction(&summary.transactions[0], &pid("B"), &pid("A"), dec!(10));
        assert_transaction(&summary.transactions[1], &pid("C"), &pid("A"), dec!(40));
    }

    #[test]
    fn test_out_of_range_costs_become_zero() {
        init_test_tracing();
        let json = r#"{
            "id": "g_big",
            "name": "Big",
            "people": [{ "id": "p_a", "name": "A" }, { "id": "p_b", "name": "B" }],
            "items": [
                { "id": "i_1", "description": "Huge", "cost": "50000000000000000000000000000", "paid_by": "p_a" },
                { "id": "i_2", "description": "Huge again", "cost": "50000000000000000000000000000", "paid_by": "p_b" },
                { "id": "i_3", "description": "Float", "cost": 1e30, "paid_by": "p_a" },
                { "id": "i_4", "description": "Lunch", "cost": "20", "paid_by": "p_a" }
            ]
        }"#;

        let snapshot: GroupSnapshot = serde_json::from_str(json).unwrap();
        let costs: Vec<Decimal> = snapshot.items.iter().map(|i| i.cost).collect();
        assert_eq!(costs, vec![dec!(0), dec!(0), dec!(0), dec!(20)]);

        let summary = settle(&snapshot.into_group(Currency::INR));

        assert_eq!(summary.total.amount(), dec!(20));
        assert_eq!(summary.transactions.len(), 1);
        assert_transaction(&summary.transactions[0], &pid("B"), &pid("A"), dec!(10));
    }

    #[test]
    fn test_minimal_snapshot_json() {
        let snapshot: GroupSnapshot =
            serde_json::from_str(r#"{ "id": "g_min", "name": "Minimal" }"#).unwrap();

        assert!(snapshot.people.is_empty());
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.currency, None);
    }
}

mod into_group {
    use super::*;

    #[test]
    fn test_absent_splits_cover_whole_roster() {
        let group = snapshot(&["A", "B", "C"], vec![item("i_1", dec!(30), "A", None)])
            .into_group(Currency::INR);

        assert_eq!(group.items()[0].split_with, vec![pid("A"), pid("B"), pid("C")]);
    }

    #[test]
    fn test_empty_split_set_is_dropped() {
        init_test_tracing();
        let group = snapshot(
            &["A", "B"],
            vec![
                item("i_1", dec!(30), "A", Some(vec![])),
                item("i_2", dec!(10), "B", Some(vec!["A", "B"])),
            ],
        )
        .into_group(Currency::INR);

        assert_eq!(group.items().len(), 1);
        assert_eq!(group.items()[0].id, ExpenseItemId::from("i_2"));
        assert!(group.is_well_formed());
        assert_eq!(settle(&group).total.amount(), dec!(10));
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let mut raw = snapshot(
            &["A", "B"],
            vec![
                item("i_1", dec!(30), "A", None),
                item("i_1", dec!(999), "B", None),
            ],
        );
        raw.people.push(Person::new(pid("A"), "Impostor"));

        let group = raw.into_group(Currency::INR);

        assert_eq!(group.people().len(), 2);
        assert_eq!(group.person_name(&pid("A")), Some("A"));
        assert_eq!(group.items().len(), 1);
        assert_eq!(group.items()[0].cost.amount(), dec!(30));
    }

    #[test]
    fn test_default_currency_applies_when_absent() {
        let group = snapshot(&["A"], vec![item("i_1", dec!(5), "A", None)]).into_group(Currency::EUR);

        assert_eq!(group.currency(), Currency::EUR);
        assert_eq!(group.items()[0].cost.currency(), Currency::EUR);
    }

    #[test]
    fn test_recorded_currency_wins() {
        let mut raw = snapshot(&["A"], vec![item("i_1", dec!(5), "A", None)]);
        raw.currency = Some(Currency::USD);

        let group = raw.into_group(Currency::EUR);

        assert_eq!(group.currency(), Currency::USD);
    }
}

mod from_group {
    use super::*;

    #[test]
    fn test_group_survives_snapshot_round_trip() {
        let group = GroupFixtures::weekend_trip();

        let restored = GroupSnapshot::from(&group).into_group(Currency::USD);

        assert_eq!(restored, group);
        assert_eq!(settle(&restored), settle(&group));
    }

    #[test]
    fn test_group_survives_json_round_trip() {
        let group = GroupFixtures::three_person_cycle();
        let json = serde_json::to_string(&GroupSnapshot::from(&group)).unwrap();

        let parsed: GroupSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.into_group(Currency::USD), group);
    }

    #[test]
    fn test_snapshot_records_currency_and_splits() {
        let snapshot = SnapshotFixtures::three_person_cycle();

        assert_eq!(snapshot.currency, Some(Currency::INR));
        assert!(snapshot.items.iter().all(|i| i.split_with.is_some()));
    }
}
