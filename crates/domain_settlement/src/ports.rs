//! Settlement Domain Ports
//!
//! The settlement engine is handed a fresh snapshot for every computation.
//! Whatever stores groups (a database, a remote API) implements
//! [`GroupSnapshotPort`]; the engine never caches what it fetched.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_settlement::{GroupSnapshotPort, SettlementService, SettlementConfig};
//! use std::sync::Arc;
//!
//! let service = SettlementService::new(Arc::new(PostgresGroupAdapter::new(pool)), SettlementConfig::default());
//! let summary = service.settle_group(&group_id).await?;
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, GroupId, PortError};
use crate::group::GroupOverview;
use crate::snapshot::GroupSnapshot;

/// Source of group snapshots
#[async_trait]
pub trait GroupSnapshotPort: DomainPort {
    /// Fetches the current state of one group
    ///
    /// # Errors
    ///
    /// Returns `PortError::NotFound` if the group does not exist
    async fn fetch_group(&self, id: &GroupId) -> Result<GroupSnapshot, PortError>;

    /// Lists every group with its people and item counts
    async fn list_groups(&self) -> Result<Vec<GroupOverview>, PortError>;
}

/// In-memory snapshot port
///
/// Useful for tests that need a snapshot source without a real store.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use indexmap::IndexMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::Currency;

    /// In-memory mock implementation of GroupSnapshotPort
    #[derive(Debug, Default)]
    pub struct MockGroupSnapshotPort {
        groups: Arc<RwLock<IndexMap<GroupId, GroupSnapshot>>>,
        fetches: AtomicUsize,
        offline: AtomicBool,
    }

    impl MockGroupSnapshotPort {
        /// Creates an empty mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with snapshots for testing
        pub async fn with_snapshots(snapshots: Vec<GroupSnapshot>) -> Self {
            let port = Self::new();
            for snapshot in snapshots {
                port.put(snapshot).await;
            }
            port
        }

        /// Inserts or replaces a snapshot
        pub async fn put(&self, snapshot: GroupSnapshot) {
            self.groups.write().await.insert(snapshot.id.clone(), snapshot);
        }

        /// Removes a group
        pub async fn delete(&self, id: &GroupId) -> Option<GroupSnapshot> {
            self.groups.write().await.shift_remove(id)
        }

        /// Number of `fetch_group` calls served so far
        pub fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }

        /// Makes every call fail with a connection error until switched back
        pub fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        fn ensure_online(&self) -> Result<(), PortError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(PortError::connection("snapshot store is offline"));
            }
            Ok(())
        }
    }

    impl DomainPort for MockGroupSnapshotPort {}

    #[async_trait]
    impl GroupSnapshotPort for MockGroupSnapshotPort {
        async fn fetch_group(&self, id: &GroupId) -> Result<GroupSnapshot, PortError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.ensure_online()?;
            self.groups
                .read()
                .await
                .get(id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Group", id))
        }

        async fn list_groups(&self) -> Result<Vec<GroupOverview>, PortError> {
            self.ensure_online()?;
            Ok(self
                .groups
                .read()
                .await
                .values()
                .map(|snapshot| snapshot.clone().into_group(Currency::default()).overview())
                .collect())
        }
    }
}
