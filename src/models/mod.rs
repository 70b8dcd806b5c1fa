use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{AppError, AppResult};

pub mod lenient;
pub mod user_preferences;

pub use user_preferences::UserPreferences;

/// The closed set of product categories accepted on event ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Sports,
    Food,
    Clothing,
    Study,
    Electronics,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Sports,
        Category::Food,
        Category::Clothing,
        Category::Study,
        Category::Electronics,
    ];

    /// Storefront label in the source locale
    pub fn label(&self) -> &'static str {
        match self {
            Category::Sports => "스포츠",
            Category::Food => "음식",
            Category::Clothing => "의류",
            Category::Study => "학습",
            Category::Electronics => "전자기기",
        }
    }

    /// Resolves a storefront label. Matching is exact.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Labels used as the category universe when a catalog carries none
    pub fn canonical_labels() -> Vec<&'static str> {
        Self::ALL.iter().map(Category::label).collect()
    }
}

/// A product offered for ranking, as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(rename = "_id", default, deserialize_with = "lenient::opt_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub category: Option<String>,
}

impl CatalogItem {
    pub fn new(id: &str, name: &str, category: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            category: Some(category.to_string()),
        }
    }

    /// Category label, treating an empty string as absent
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

// ============================================================================
// Event ingestion
// ============================================================================

/// Raw body of `POST /train`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainRequest {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub product_id: Option<String>,
}

/// A validated purchase event
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseEvent {
    pub user_id: String,
    pub category: String,
    pub product_id: Option<String>,
}

impl PurchaseEvent {
    pub fn new(user_id: &str, category: &str, product_id: Option<&str>) -> Self {
        Self {
            user_id: user_id.to_string(),
            category: category.to_string(),
            product_id: product_id.map(str::to_string),
        }
    }
}

impl TryFrom<TrainRequest> for PurchaseEvent {
    type Error = AppError;

    fn try_from(request: TrainRequest) -> AppResult<Self> {
        let non_empty = |field: Option<String>| field.filter(|s| !s.is_empty());

        match (non_empty(request.user_id), non_empty(request.category)) {
            (Some(user_id), Some(category)) => Ok(Self {
                user_id,
                category,
                product_id: non_empty(request.product_id),
            }),
            _ => Err(AppError::MissingRequiredField(
                "userId and category".to_string(),
            )),
        }
    }
}

/// Body returned from `POST /train`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TrainResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<HashMap<String, u64>>,
}

impl TrainResponse {
    pub fn ok(counts: HashMap<String, u64>) -> Self {
        Self {
            message: "ok".to_string(),
            counts: Some(counts),
        }
    }

    pub fn ignored() -> Self {
        Self {
            message: "ignored".to_string(),
            counts: None,
        }
    }
}

// ============================================================================
// Ranking
// ============================================================================

/// Raw body of `POST /recommend`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::catalog")]
    pub catalog: Vec<CatalogItem>,
    #[serde(default, deserialize_with = "lenient::id_list")]
    pub purchased_ids: Vec<String>,
    #[serde(default, deserialize_with = "lenient::top_k")]
    pub k: Option<i64>,
}

/// Snapshot of one user's counters, returned from `GET /users/:user_id/preferences`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesResponse {
    pub user_id: String,
    pub category_counts: HashMap<String, u64>,
    pub product_counts: HashMap<String, u64>,
    pub updated_at: DateTime<Utc>,
}

impl PreferencesResponse {
    pub fn new(user_id: String, preferences: UserPreferences) -> Self {
        Self {
            user_id,
            category_counts: preferences.category_counts,
            product_counts: preferences.product_counts,
            updated_at: preferences.updated_at,
        }
    }
}
