use dashmap::DashMap;
use std::collections::HashMap;
use tracing::instrument;

use crate::models::{Category, PurchaseEvent, UserPreferences};

/// Read-only access to learned preferences
///
/// Ranking only ever needs a consistent copy of one user's counters, so it
/// depends on this seam rather than on the concrete store.
#[cfg_attr(test, mockall::automock)]
pub trait PreferenceSource: Send + Sync {
    /// Snapshot of the user's counters, or `None` for a user with no events
    fn preferences(&self, user_id: &str) -> Option<UserPreferences>;
}

/// Result of ingesting one purchase event
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// The event was counted; holds the user's category counts after the update
    Recorded(HashMap<String, u64>),
    /// The category is not one we track, nothing changed
    Ignored,
}

/// Process-wide store of per-user purchase counters
///
/// Records are sharded by user id. Writers for the same user are serialized on
/// that user's shard, writers for different users only contend when they hash
/// to the same shard.
#[derive(Debug, Default)]
pub struct PreferenceStore {
    users: DashMap<String, UserPreferences>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a purchase event against the user's preferences
    ///
    /// Events in an unrecognized category are ignored. The user's record is
    /// created on their first counted event.
    #[instrument(skip(self, event), fields(user_id = %event.user_id, category = %event.category))]
    pub fn record_event(&self, event: &PurchaseEvent) -> RecordOutcome {
        if Category::from_label(&event.category).is_none() {
            tracing::debug!("Ignoring event with unrecognized category");
            return RecordOutcome::Ignored;
        }

        let mut record = self.users.entry(event.user_id.clone()).or_default();
        record.record(&event.category, event.product_id.as_deref());

        tracing::debug!(
            category_total = record.total_category_count(),
            "Purchase event recorded"
        );

        RecordOutcome::Recorded(record.category_counts.clone())
    }

    /// Number of users with at least one counted event
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl PreferenceSource for PreferenceStore {
    fn preferences(&self, user_id: &str) -> Option<UserPreferences> {
        self.users.get(user_id).map(|record| record.value().clone())
    }
}
