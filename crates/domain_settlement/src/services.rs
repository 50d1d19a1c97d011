//! Settlement domain services
//!
//! The service fetches a fresh snapshot on every call and runs the pure
//! settlement stages over it. No group state is kept between calls.

use std::sync::Arc;
use tracing::instrument;

use core_kernel::GroupId;
use crate::config::SettlementConfig;
use crate::error::SettlementError;
use crate::group::{Group, GroupOverview};
use crate::ports::GroupSnapshotPort;
use crate::summary::{settle, SettlementSummary};

/// Settles groups fetched through a [`GroupSnapshotPort`]
pub struct SettlementService {
    port: Arc<dyn GroupSnapshotPort>,
    config: SettlementConfig,
}

impl SettlementService {
    /// Creates a new settlement service
    pub fn new(port: Arc<dyn GroupSnapshotPort>, config: SettlementConfig) -> Self {
        Self { port, config }
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Fetches the group and builds its aggregate
    ///
    /// # Errors
    ///
    /// Returns error if the port cannot supply the snapshot
    #[instrument(skip(self), fields(group_id = %group_id))]
    pub async fn load_group(&self, group_id: &GroupId) -> Result<Group, SettlementError> {
        let snapshot = self.port.fetch_group(group_id).await?;
        Ok(snapshot.into_group(self.config.currency))
    }

    /// Settles a group regardless of its size
    ///
    /// # Errors
    ///
    /// Returns error if the port cannot supply the snapshot
    #[instrument(skip(self), fields(group_id = %group_id))]
    pub async fn settle_group(&self, group_id: &GroupId) -> Result<SettlementSummary, SettlementError> {
        let group = self.load_group(group_id).await?;
        Ok(settle(&group))
    }

    /// Settles a group that has enough people and expenses to summarize
    ///
    /// # Errors
    ///
    /// - Returns error if the port cannot supply the snapshot
    /// - Returns [`SettlementError::InsufficientData`] for groups too small
    ///   to summarize
    #[instrument(skip(self), fields(group_id = %group_id))]
    pub async fn summarize_group(&self, group_id: &GroupId) -> Result<SettlementSummary, SettlementError> {
        self.load_group(group_id).await?.summarize()
    }

    /// Payment lines for a group, e.g. `"Ravi owes Asha Rs.30.00"`
    #[instrument(skip(self), fields(group_id = %group_id))]
    pub async fn describe_group(&self, group_id: &GroupId) -> Result<Vec<String>, SettlementError> {
        let group = self.load_group(group_id).await?;
        Ok(group.summarize()?.describe(&group))
    }

    /// Lists all groups
    #[instrument(skip(self))]
    pub async fn list_groups(&self) -> Result<Vec<GroupOverview>, SettlementError> {
        Ok(self.port.list_groups().await?)
    }
}
