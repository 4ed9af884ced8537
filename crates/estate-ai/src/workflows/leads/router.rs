use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::aggregator::StatusFilter;
use super::domain::{ContactInput, LeadId, LeadStatus, OwnerId, PropertyInput};
use super::repository::LeadStore;
use super::service::{LeadService, LeadServiceError};
use crate::workflows::estimation::{EstimationError, InferenceGateway, PriceSource};

/// Router builder exposing the engine operations over HTTP. The owner id is
/// an explicit parameter on every route; nothing is read from ambient
/// session state.
pub fn lead_router<S, G>(service: Arc<LeadService<S, G>>) -> Router
where
    S: LeadStore + 'static,
    G: InferenceGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/leads",
            get(list_handler::<S, G>).post(create_handler::<S, G>),
        )
        .route(
            "/api/v1/leads/:lead_id/status",
            put(set_status_handler::<S, G>),
        )
        .route("/api/v1/leads/:lead_id", delete(delete_handler::<S, G>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListLeadsQuery {
    pub(crate) owner_id: String,
    #[serde(default)]
    pub(crate) search: String,
    #[serde(default)]
    pub(crate) status: StatusFilter,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateLeadRequest {
    pub(crate) owner_id: String,
    pub(crate) property: PropertyInput,
    pub(crate) contact: ContactInput,
    #[serde(default)]
    pub(crate) price_source: PriceSource,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SetStatusRequest {
    pub(crate) owner_id: String,
    pub(crate) status: LeadStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteLeadQuery {
    pub(crate) owner_id: String,
}

pub(crate) async fn list_handler<S, G>(
    State(service): State<Arc<LeadService<S, G>>>,
    Query(query): Query<ListLeadsQuery>,
) -> Response
where
    S: LeadStore + 'static,
    G: InferenceGateway + 'static,
{
    let owner = OwnerId(query.owner_id);
    match service
        .get_merged_leads(&owner, &query.search, query.status)
        .await
    {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<S, G>(
    State(service): State<Arc<LeadService<S, G>>>,
    axum::Json(request): axum::Json<CreateLeadRequest>,
) -> Response
where
    S: LeadStore + 'static,
    G: InferenceGateway + 'static,
{
    let owner = OwnerId(request.owner_id);
    match service
        .create_lead_with_estimate(&owner, request.property, request.contact, request.price_source)
        .await
    {
        Ok(lead) => (StatusCode::CREATED, axum::Json(lead)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn set_status_handler<S, G>(
    State(service): State<Arc<LeadService<S, G>>>,
    Path(lead_id): Path<String>,
    axum::Json(request): axum::Json<SetStatusRequest>,
) -> Response
where
    S: LeadStore + 'static,
    G: InferenceGateway + 'static,
{
    let owner = OwnerId(request.owner_id);
    let id = LeadId(lead_id);
    match service.set_lead_status(&owner, &id, request.status).await {
        Ok(lead) => (StatusCode::OK, axum::Json(lead)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<S, G>(
    State(service): State<Arc<LeadService<S, G>>>,
    Path(lead_id): Path<String>,
    Query(query): Query<DeleteLeadQuery>,
) -> Response
where
    S: LeadStore + 'static,
    G: InferenceGateway + 'static,
{
    let owner = OwnerId(query.owner_id);
    let id = LeadId(lead_id);
    match service.delete_lead(&owner, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: LeadServiceError) -> Response {
    let status = match &error {
        LeadServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LeadServiceError::Estimation(EstimationError::Resolution(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LeadServiceError::Estimation(EstimationError::Inference(_)) => StatusCode::BAD_GATEWAY,
        LeadServiceError::Unauthorized { .. } => StatusCode::FORBIDDEN,
        LeadServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        LeadServiceError::SourcesUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        LeadServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = axum::Json(json!({ "error": error.to_string() }));
    (status, body).into_response()
}
