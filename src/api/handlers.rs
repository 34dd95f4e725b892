use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{
        BehaviorEvent, Intent, Property, Recommendation, RecommendationAnalytics, SessionId,
        UserBehavior, UserPreferences,
    },
    services::{recommendations, ScoringContext},
};

use super::AppState;

// Request/Response types

/// Body of `PUT /behavior/preferences`; both lists replace the stored ones
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRequest {
    #[serde(default)]
    pub location_preferences: Vec<String>,
    #[serde(default)]
    pub property_type_preferences: Vec<String>,
}

/// Body of `POST /recommendations`
///
/// Every field is optional. `budgetRange` is `[min, max]` in the catalog's
/// price unit and `limit` falls back to the configured default.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationRequest {
    pub current_property_id: Option<String>,
    pub intent: Intent,
    pub budget_range: Option<(f64, f64)>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub recommendations: Vec<Recommendation>,
    pub analytics: RecommendationAnalytics,
    pub generated_at: DateTime<Utc>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List the full property catalog
pub async fn list_properties(State(state): State<AppState>) -> AppResult<Json<Vec<Property>>> {
    let properties = state.catalog.list_properties().await?;
    Ok(Json(properties))
}

/// Get a single property
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Property>> {
    let property = state.catalog.get_property(&id).await?;
    Ok(Json(property))
}

/// Get the session's tracked behavior
///
/// Sessions that have not recorded anything in this process are read from
/// storage without being kept in memory.
pub async fn get_behavior(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> Json<UserBehavior> {
    Json(state.behavior_snapshot(session).await)
}

/// Record one user action
///
/// Blank identifiers are rejected with 400. The updated behavior is written
/// through to storage and returned.
pub async fn track_event(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Json(event): Json<BehaviorEvent>,
) -> AppResult<Json<UserBehavior>> {
    validate_event(&event)?;

    let action = event.action();
    let behavior = state
        .with_behavior(session, |store| {
            store.track(event);
            store.behavior().clone()
        })
        .await;

    tracing::info!(
        session = %session,
        action,
        data_points = behavior.data_points(),
        "Behavior tracked"
    );

    Ok(Json(behavior))
}

/// Replace the session's location and property-type preferences
pub async fn set_preferences(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Json(request): Json<PreferencesRequest>,
) -> Json<UserBehavior> {
    let behavior = state
        .with_behavior(session, |store| {
            store.set_preferences(
                request.location_preferences,
                request.property_type_preferences,
            );
            store.behavior().clone()
        })
        .await;
    Json(behavior)
}

/// Generate recommendations for the session
///
/// Validates the limit and budget bounds, scores the full catalog against a
/// snapshot of the session's behavior and returns the picks with a summary.
/// Catalog failures surface as 502.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let limit = request.limit.unwrap_or(state.default_limit);
    if limit == 0 {
        return Err(AppError::InvalidInput(
            "limit must be at least 1".to_string(),
        ));
    }
    if let Some((min, max)) = request.budget_range {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(AppError::InvalidInput(format!(
                "Invalid budget range [{}, {}]",
                min, max
            )));
        }
    }

    let properties = state.catalog.list_properties().await?;
    let behavior = state.behavior_snapshot(session).await;
    let preferences = UserPreferences {
        budget_range: request.budget_range,
    };
    let context = ScoringContext {
        intent: request.intent,
        preferences: &preferences,
        behavior: &behavior,
    };

    let recommendations = recommendations::generate(
        &properties,
        request.current_property_id.as_deref(),
        &context,
        limit,
    );
    let analytics = recommendations::summarize(&recommendations, &context);

    tracing::info!(
        session = %session,
        catalog = properties.len(),
        source = state.catalog.name(),
        returned = analytics.total_recommendations,
        average_score = analytics.average_score,
        "Recommendations generated"
    );

    Ok(Json(RecommendationResponse {
        recommendations,
        analytics,
        generated_at: Utc::now(),
    }))
}

/// Rejects events whose identifying field is empty or whitespace
fn validate_event(event: &BehaviorEvent) -> AppResult<()> {
    let (field, value) = match event {
        BehaviorEvent::ViewProperty { property_id }
        | BehaviorEvent::SaveProperty { property_id }
        | BehaviorEvent::TimeSpent { property_id, .. } => ("propertyId", property_id),
        BehaviorEvent::Search { search_term, .. } => ("searchTerm", search_term),
        BehaviorEvent::ClickFeature { feature } => ("feature", feature),
    };

    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{} cannot be empty", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_router;
    use crate::db::MemoryBehaviorStorage;
    use crate::services::providers::MockPropertyCatalog;
    use axum_test::TestServer;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_catalog_failure_maps_to_bad_gateway() {
        let mut catalog = MockPropertyCatalog::new();
        catalog
            .expect_list_properties()
            .times(1)
            .returning(|| Err(AppError::ExternalApi("catalog unavailable".to_string())));
        catalog.expect_name().return_const("mock");

        let state = AppState::new(
            Arc::new(catalog),
            Arc::new(MemoryBehaviorStorage::new()),
            6,
        );
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server
            .post("/api/v1/recommendations")
            .json(&json!({ "intent": "end-use" }))
            .await;
        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert_eq!(body["error"], "catalog unavailable");
    }

    #[test]
    fn test_validate_event_rejects_blank_fields() {
        let event = BehaviorEvent::Search {
            search_term: "  ".to_string(),
            price_range: None,
        };
        assert!(matches!(
            validate_event(&event),
            Err(AppError::InvalidInput(_))
        ));

        let event = BehaviorEvent::ClickFeature {
            feature: "gym".to_string(),
        };
        assert!(validate_event(&event).is_ok());
    }

    #[test]
    fn test_recommendation_request_defaults() {
        let request: RecommendationRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.intent, Intent::Unset);
        assert!(request.limit.is_none());
        assert!(request.current_property_id.is_none());
    }
}
