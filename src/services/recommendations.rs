use std::collections::HashSet;

use crate::{
    models::RecommendRequest,
    services::{preference_store::PreferenceSource, ranking},
};

/// Result size used when the caller does not ask for one
pub const DEFAULT_K: i64 = 5;

/// Generates personalized product recommendations
///
/// Normalizes the decoded request into ranking inputs: a missing `k` becomes
/// [`DEFAULT_K`], purchased ids become the exclusion set, and an absent or
/// unknown user is ranked on smoothing alone. The user's counters are read
/// once, so a single ranking sees one consistent snapshot of them.
pub fn get_recommendations(
    source: &dyn PreferenceSource,
    request: RecommendRequest,
) -> Vec<Option<String>> {
    let k = request.k.unwrap_or(DEFAULT_K);
    let purchased_ids: HashSet<String> = request.purchased_ids.into_iter().collect();

    let user_id = request.user_id.as_deref().filter(|id| !id.is_empty());
    let preferences = user_id.and_then(|id| source.preferences(id));

    let names = ranking::rank(preferences.as_ref(), &request.catalog, &purchased_ids, k);

    tracing::info!(
        user_id = user_id.unwrap_or("anonymous"),
        known_user = preferences.is_some(),
        catalog_size = request.catalog.len(),
        excluded = purchased_ids.len(),
        k,
        returned = names.len(),
        "Ranked catalog"
    );

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogItem, UserPreferences};
    use crate::services::preference_store::MockPreferenceSource;

    fn catalog(len: usize) -> Vec<CatalogItem> {
        (0..len)
            .map(|i| CatalogItem::new(&format!("p{i}"), &format!("Product {i}"), "food"))
            .collect()
    }

    #[test]
    fn test_default_k_is_five() {
        let mut source = MockPreferenceSource::new();
        source.expect_preferences().never();

        let request = RecommendRequest {
            catalog: catalog(8),
            ..Default::default()
        };
        assert_eq!(get_recommendations(&source, request).len(), 5);
    }

    #[test]
    fn test_looks_up_known_user_once() {
        let mut prefs = UserPreferences::new();
        prefs.record("study", Some("p1"));
        prefs.record("study", Some("p1"));

        let mut source = MockPreferenceSource::new();
        source
            .expect_preferences()
            .withf(|user_id| user_id == "u1")
            .times(1)
            .return_const(Some(prefs));

        let request = RecommendRequest {
            user_id: Some("u1".to_string()),
            catalog: vec![
                CatalogItem::new("p0", "Notebook", "study"),
                CatalogItem::new("p1", "Pencil", "study"),
                CatalogItem::new("p2", "Apple", "food"),
            ],
            purchased_ids: vec!["p0".to_string()],
            k: Some(2),
        };

        let result = get_recommendations(&source, request);
        assert_eq!(
            result,
            vec![Some("Pencil".to_string()), Some("Apple".to_string())]
        );
    }

    #[test]
    fn test_unknown_user_ranks_on_smoothing() {
        let mut source = MockPreferenceSource::new();
        source.expect_preferences().returning(|_| None);

        let request = RecommendRequest {
            user_id: Some("nobody".to_string()),
            catalog: vec![
                CatalogItem::new("a", "Ball", "sports"),
                CatalogItem::new("b", "Book", "study"),
            ],
            k: Some(5),
            ..Default::default()
        };

        let result = get_recommendations(&source, request);
        assert_eq!(result, vec![Some("Ball".to_string()), Some("Book".to_string())]);
    }

    #[test]
    fn test_empty_user_id_is_anonymous() {
        let mut source = MockPreferenceSource::new();
        source.expect_preferences().never();

        let request = RecommendRequest {
            user_id: Some(String::new()),
            catalog: catalog(2),
            ..Default::default()
        };
        assert_eq!(get_recommendations(&source, request).len(), 2);
    }

    #[test]
    fn test_explicit_zero_k_is_empty() {
        let mut source = MockPreferenceSource::new();
        source.expect_preferences().never();

        let request = RecommendRequest {
            catalog: catalog(3),
            k: Some(0),
            ..Default::default()
        };
        assert!(get_recommendations(&source, request).is_empty());
    }
}
