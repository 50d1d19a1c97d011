//! Settlement service tests against the in-memory snapshot port

use std::sync::Arc;

use core_kernel::{Currency, GroupId};
use domain_settlement::ports::mock::MockGroupSnapshotPort;
use domain_settlement::{
    GroupSnapshot, GroupSnapshotPort, SettlementConfig, SettlementError, SettlementService,
};
use rust_decimal_macros::dec;
use test_utils::{
    assert_err_variant, assert_ok, assert_transaction, init_test_tracing, pid, GroupBuilder,
    GroupFixtures, SnapshotFixtures,
};

async fn service_with(snapshots: Vec<GroupSnapshot>) -> (SettlementService, Arc<MockGroupSnapshotPort>) {
    init_test_tracing();
    let port = Arc::new(MockGroupSnapshotPort::with_snapshots(snapshots).await);
    let service = SettlementService::new(port.clone(), SettlementConfig::default());
    (service, port)
}

mod settle_group {
    use super::*;

    #[tokio::test]
    async fn test_settles_fetched_group() {
        let (service, _) = service_with(vec![GroupSnapshot::from(&GroupFixtures::weekend_trip())]).await;

        let summary = assert_ok!(service.settle_group(&GroupId::from("g_weekend")).await);

        assert_eq!(summary.group_id, GroupId::from("g_weekend"));
        assert_eq!(summary.total.amount(), dec!(1900.25));
        assert_eq!(summary.transactions.len(), 3);
        assert!(summary.transactions.iter().all(|t| t.to == pid("Asha")));
    }

    #[tokio::test]
    async fn test_missing_group_is_port_error() {
        let (service, _) = service_with(Vec::new()).await;

        let result = service.settle_group(&GroupId::from("g_missing")).await;

        let error = result.unwrap_err();
        assert!(matches!(error, SettlementError::Port(ref e) if e.is_not_found()));
        assert!(!error.is_validation());
    }

    #[tokio::test]
    async fn test_unreachable_store_is_transient_port_error() {
        let group = GroupFixtures::couple_dinner();
        let (service, port) = service_with(vec![GroupSnapshot::from(&group)]).await;
        port.set_offline(true);

        let error = service.settle_group(group.id()).await.unwrap_err();
        assert!(matches!(error, SettlementError::Port(ref e) if e.is_transient()));
        assert_err_variant!(service.list_groups().await, SettlementError::Port(_));

        port.set_offline(false);
        let summary = assert_ok!(service.settle_group(group.id()).await);
        assert_eq!(summary.transactions.len(), 1);
    }

    #[tokio::test]
    async fn test_each_call_fetches_a_fresh_snapshot() {
        let group = GroupFixtures::couple_dinner();
        let id = group.id().clone();
        let (service, port) = service_with(vec![GroupSnapshot::from(&group)]).await;

        let first = assert_ok!(service.settle_group(&id).await);
        assert_transaction(&first.transactions[0], &pid("B"), &pid("A"), dec!(50));

        let mut changed = group.clone();
        assert_ok!(changed.add_expense("Dessert", dec!(40), &pid("B")));
        port.put(GroupSnapshot::from(&changed)).await;

        let second = assert_ok!(service.settle_group(&id).await);
        assert_transaction(&second.transactions[0], &pid("B"), &pid("A"), dec!(30));
        assert_eq!(port.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_snapshot_without_currency_uses_configured_one() {
        init_test_tracing();
        let mut snapshot = GroupSnapshot::from(&GroupFixtures::couple_dinner());
        snapshot.currency = None;
        let id = snapshot.id.clone();
        let port = Arc::new(MockGroupSnapshotPort::with_snapshots(vec![snapshot]).await);
        let config = SettlementConfig {
            currency: Currency::EUR,
            ..SettlementConfig::default()
        };
        let service = SettlementService::new(port, config);

        let summary = assert_ok!(service.settle_group(&id).await);

        assert_eq!(summary.total.currency(), Currency::EUR);
        assert_eq!(service.config().currency, Currency::EUR);
    }

    #[tokio::test]
    async fn test_concurrent_requests_are_independent() {
        let weekend = GroupFixtures::weekend_trip();
        let dinner = GroupFixtures::couple_dinner();
        let (service, port) = service_with(vec![
            GroupSnapshot::from(&weekend),
            GroupSnapshot::from(&dinner),
        ])
        .await;

        let (a, b) = tokio::join!(service.settle_group(weekend.id()), service.settle_group(dinner.id()));

        assert_eq!(assert_ok!(a).transactions.len(), 3);
        assert_eq!(assert_ok!(b).transactions.len(), 1);
        assert_eq!(port.fetch_count(), 2);
    }
}

mod summarize_group {
    use super::*;

    #[tokio::test]
    async fn test_requires_two_people() {
        let solo = GroupBuilder::new()
            .with_id(GroupId::from("g_solo"))
            .with_person("A")
            .with_expense("Coffee", dec!(4), "A")
            .build_snapshot();
        let (service, _) = service_with(vec![solo]).await;

        assert_err_variant!(
            service.summarize_group(&GroupId::from("g_solo")).await,
            SettlementError::InsufficientData { people: 1, items: 1, .. }
        );
    }

    #[tokio::test]
    async fn test_requires_an_expense() {
        let idle = GroupBuilder::new()
            .with_id(GroupId::from("g_idle"))
            .with_people(&["A", "B"])
            .build_snapshot();
        let (service, _) = service_with(vec![idle]).await;

        assert_err_variant!(
            service.summarize_group(&GroupId::from("g_idle")).await,
            SettlementError::InsufficientData { items: 0, .. }
        );
    }

    #[tokio::test]
    async fn test_average_per_person() {
        let (service, _) = service_with(vec![SnapshotFixtures::three_person_cycle()]).await;
        let id = SnapshotFixtures::three_person_cycle().id;

        let summary = assert_ok!(service.summarize_group(&id).await);

        assert_eq!(summary.average_per_person.amount(), dec!(30));
        assert_eq!(summary.average_per_person.round_to_currency().to_string(), "Rs.30.00");
    }
}

mod describe_group {
    use super::*;

    #[tokio::test]
    async fn test_lines_name_both_parties() {
        let (service, _) = service_with(vec![SnapshotFixtures::messy_trip()]).await;

        let lines = assert_ok!(service.describe_group(&GroupId::from("g_messy")).await);

        assert_eq!(lines, vec!["B owes A Rs.10.00", "C owes A Rs.40.00"]);
    }

    #[tokio::test]
    async fn test_settled_group_has_no_lines() {
        let even = GroupBuilder::new()
            .with_id(GroupId::from("g_even"))
            .with_people(&["A", "B"])
            .with_expense("Cab", dec!(20), "A")
            .with_expense("Tea", dec!(20), "B")
            .build_snapshot();
        let (service, _) = service_with(vec![even]).await;

        let lines = assert_ok!(service.describe_group(&GroupId::from("g_even")).await);

        assert!(lines.is_empty());
    }
}

mod list_groups {
    use super::*;

    #[tokio::test]
    async fn test_lists_overviews() {
        let (service, port) = service_with(vec![
            GroupSnapshot::from(&GroupFixtures::weekend_trip()),
            SnapshotFixtures::messy_trip(),
        ])
        .await;

        let overviews = assert_ok!(service.list_groups().await);

        assert_eq!(overviews.len(), 2);
        assert_eq!(overviews[0].name, "Weekend trip");
        assert_eq!(overviews[0].people_count, 4);
        assert_eq!(overviews[0].items_count, 4);
        assert_eq!(overviews[1].items_count, 5);
        assert_eq!(port.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_port_is_usable_as_trait_object() {
        let port: Arc<dyn GroupSnapshotPort> = Arc::new(MockGroupSnapshotPort::new());
        assert!(assert_ok!(port.list_groups().await).is_empty());
    }
}
