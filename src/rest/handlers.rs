use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    error::ServiceError,
    service,
    storage::{format_creation_time, Storage},
};

use super::{
    models::{
        CollectionDetailResponse, CollectionSummary, CountryValueResponse, DeleteResponse,
        ErrorResponse, HealthResponse, ImportParams, OrderParams, RankParams,
        RankedResponse,
    },
    AppState,
};

type ApiResult<T> = Result<Json<T>, ServiceError>;

pub async fn health<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            uptime_secs,
        }),
    )
}

pub async fn import_collection<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    params: Result<Query<ImportParams>, QueryRejection>,
) -> ApiResult<CollectionSummary> {
    let Query(params) = params?;
    let outcome = service::import_collection(
        &state.storage,
        state.source.as_ref(),
        params.indicator_id.as_deref(),
    )
    .await?;
    Ok(Json(CollectionSummary::from(&outcome.collection)))
}

pub async fn list_collections<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    params: Result<Query<OrderParams>, QueryRejection>,
) -> ApiResult<Vec<CollectionSummary>> {
    let Query(params) = params?;
    let store = state.storage.begin_read()?;
    let collections = service::list_collections(&store, params.order_by.as_deref())?;
    Ok(Json(collections.iter().map(CollectionSummary::from).collect()))
}

pub async fn get_collection<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
    params: Result<Query<OrderParams>, QueryRejection>,
) -> ApiResult<CollectionDetailResponse> {
    let Path(id) = path?;
    let Query(params) = params?;
    let id = service::parse_collection_id(&id)?;
    let store = state.storage.begin_read()?;
    let detail = service::collection_detail(&store, id, params.order_by.as_deref())?;
    Ok(Json(CollectionDetailResponse {
        id: detail.collection.id,
        indicator_id: detail.collection.indicator_id,
        indicator_value: detail.collection.indicator_value,
        creation_time: format_creation_time(&detail.collection.creation_time),
        entries: detail.entries.into_iter().map(Into::into).collect(),
    }))
}

pub async fn delete_collection<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<DeleteResponse> {
    let Path(id) = path?;
    let id = service::parse_collection_id(&id)?;
    service::delete_collection(&state.storage, id)?;
    Ok(Json(DeleteResponse {
        message: format!("The collection {} was removed from the database!", id),
        id,
    }))
}

pub async fn get_country_entry<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    path: Result<Path<(String, String, String)>, PathRejection>,
) -> ApiResult<CountryValueResponse> {
    let Path((id, year, country)) = path?;
    let id = service::parse_collection_id(&id)?;
    let store = state.storage.begin_read()?;
    let (collection, entry) = service::country_entry(&store, id, &year, &country)?;
    Ok(Json(CountryValueResponse {
        id: collection.id,
        indicator: collection.indicator_id,
        country: entry.country,
        date: entry.date,
        value: entry.value,
    }))
}

pub async fn get_ranked_entries<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    path: Result<Path<(String, String)>, PathRejection>,
    params: Result<Query<RankParams>, QueryRejection>,
) -> ApiResult<RankedResponse> {
    let Path((id, year)) = path?;
    let Query(params) = params?;
    let id = service::parse_collection_id(&id)?;
    let store = state.storage.begin_read()?;
    let ranked = service::ranked_entries(&store, id, &year, params.query.as_deref())?;
    Ok(Json(RankedResponse {
        indicator_value: ranked.collection.indicator_value,
        indicator: ranked.collection.indicator_id,
        entries: ranked.entries.into_iter().map(Into::into).collect(),
    }))
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "endpoint not found".to_string(),
        }),
    )
}
