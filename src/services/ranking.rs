//! Scoring and ranking of catalog items against a user's learned preferences.
//!
//! The score of an item is
//!
//! ```text
//! 0.8 * category_score(item.category) * repeat_multiplier(product_count(item.id))
//! ```
//!
//! where the category score is the additively smoothed share of the user's
//! purchases in that category, taken over the categories present in the catalog.

use std::collections::HashSet;

use crate::models::{CatalogItem, Category, UserPreferences};

/// Global dampening factor applied to every item score
pub const CATEGORY_WEIGHT: f64 = 0.8;

const REPEAT_BASE: f64 = 0.3;
const REPEAT_STEP: f64 = 0.2;
const REPEAT_CAP: f64 = 1.0;

/// A candidate with its computed score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredItem<'a> {
    pub item: &'a CatalogItem,
    pub score: f64,
}

/// Distinct non-empty categories of the catalog in first-seen order,
/// or the canonical labels when the catalog has none
pub fn category_universe(catalog: &[CatalogItem]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let universe: Vec<&str> = catalog
        .iter()
        .filter_map(CatalogItem::category)
        .filter(|category| seen.insert(*category))
        .collect();

    if universe.is_empty() {
        Category::canonical_labels()
    } else {
        universe
    }
}

/// Multiplier rewarding products the user bought before
///
/// Items never bought stay at 1.0; the first repeat jumps to 1.5 and each
/// further purchase adds 0.2, saturating at 2.0.
pub fn repeat_multiplier(repeats: u64) -> f64 {
    if repeats == 0 {
        1.0
    } else {
        1.0 + REPEAT_CAP.min(REPEAT_BASE + REPEAT_STEP * repeats as f64)
    }
}

/// Scores catalog items for one user
#[derive(Debug, Clone)]
pub struct Ranker<'p> {
    preferences: Option<&'p UserPreferences>,
    total_category_count: u64,
    num_categories: usize,
}

impl<'p> Ranker<'p> {
    /// Builds a ranker for the given catalog. `None` preferences score every
    /// item on smoothing alone.
    pub fn new(preferences: Option<&'p UserPreferences>, catalog: &[CatalogItem]) -> Self {
        let num_categories = category_universe(catalog).len().max(1);
        Self {
            preferences,
            total_category_count: preferences.map_or(0, UserPreferences::total_category_count),
            num_categories,
        }
    }

    /// Size of the category universe used in the smoothing denominator
    pub fn num_categories(&self) -> usize {
        self.num_categories
    }

    /// Laplace-smoothed probability of the user buying in `category`
    pub fn category_score(&self, category: Option<&str>) -> f64 {
        let count = match (self.preferences, category) {
            (Some(prefs), Some(category)) => prefs.category_count(category),
            _ => 0,
        };
        (count + 1) as f64 / (self.total_category_count + self.num_categories as u64) as f64
    }

    pub fn item_score(&self, item: &CatalogItem) -> f64 {
        let repeats = match (self.preferences, item.id.as_deref()) {
            (Some(prefs), Some(id)) => prefs.product_count(id),
            _ => 0,
        };
        CATEGORY_WEIGHT * self.category_score(item.category()) * repeat_multiplier(repeats)
    }

    /// Scores every item not in `purchased_ids` and returns the best `k`,
    /// highest first. Equal scores keep their catalog order.
    pub fn rank_scored<'c>(
        &self,
        catalog: &'c [CatalogItem],
        purchased_ids: &HashSet<String>,
        k: i64,
    ) -> Vec<ScoredItem<'c>> {
        let limit = usize::try_from(k).unwrap_or(0);
        if limit == 0 {
            return Vec::new();
        }

        let mut candidates: Vec<ScoredItem<'c>> = catalog
            .iter()
            .filter(|item| {
                item.id
                    .as_ref()
                    .map_or(true, |id| !purchased_ids.contains(id))
            })
            .map(|item| ScoredItem {
                item,
                score: self.item_score(item),
            })
            .collect();

        // sort_by is stable
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates.truncate(limit);
        candidates
    }
}

/// Names of the top `k` unpurchased catalog items for a user
///
/// Items without a name project to `None`.
pub fn rank(
    preferences: Option<&UserPreferences>,
    catalog: &[CatalogItem],
    purchased_ids: &HashSet<String>,
    k: i64,
) -> Vec<Option<String>> {
    Ranker::new(preferences, catalog)
        .rank_scored(catalog, purchased_ids, k)
        .into_iter()
        .map(|scored| scored.item.name.clone())
        .collect()
}
