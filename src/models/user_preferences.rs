use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Purchase counters learned for a single user
///
/// Counts only ever grow; a record lives for as long as the process does.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserPreferences {
    /// Purchases per category label
    pub category_counts: HashMap<String, u64>,
    /// Purchases per product identifier
    pub product_counts: HashMap<String, u64>,
    /// Time of the last counted event
    pub updated_at: DateTime<Utc>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self::new()
    }
}

impl UserPreferences {
    /// Creates an empty record
    pub fn new() -> Self {
        Self {
            category_counts: HashMap::new(),
            product_counts: HashMap::new(),
            updated_at: Utc::now(),
        }
    }

    /// Counts one purchase in `category`, and of `product_id` when given
    pub fn record(&mut self, category: &str, product_id: Option<&str>) {
        *self.category_counts.entry(category.to_string()).or_insert(0) += 1;
        if let Some(product_id) = product_id {
            *self.product_counts.entry(product_id.to_string()).or_insert(0) += 1;
        }
        self.updated_at = Utc::now();
    }

    pub fn category_count(&self, category: &str) -> u64 {
        self.category_counts.get(category).copied().unwrap_or(0)
    }

    pub fn product_count(&self, product_id: &str) -> u64 {
        self.product_counts.get(product_id).copied().unwrap_or(0)
    }

    /// Sum of all category counts
    pub fn total_category_count(&self) -> u64 {
        self.category_counts.values().sum()
    }
}
