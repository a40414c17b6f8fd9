//! Read-only reference-data endpoints. Open to any caller; the query
//! service takes care of ordering and pagination.
use axum::extract::{Query, State};
use axum::Json;
use models::{county, district, school};
use serde::Deserialize;
use service::pagination::Pagination;
use service::query_service;

use crate::auth::ServerState;
use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DistrictQuery {
    pub county: Option<i32>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SchoolQuery {
    pub district: Option<i32>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[utoipa::path(get, path = "/api/counties", tag = "reference", responses((status = 200, description = "OK")))]
pub async fn list_counties(
    State(state): State<ServerState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<Vec<county::Model>>, ApiError> {
    let items = query_service::list_counties(
        &state.db,
        Pagination::from_params(params.page, params.per_page),
    )
    .await?;
    Ok(Json(items))
}

#[utoipa::path(get, path = "/api/districts", tag = "reference", responses((status = 200, description = "OK")))]
pub async fn list_districts(
    State(state): State<ServerState>,
    Query(params): Query<DistrictQuery>,
) -> Result<Json<Vec<district::Model>>, ApiError> {
    let items = query_service::list_districts(
        &state.db,
        params.county,
        Pagination::from_params(params.page, params.per_page),
    )
    .await?;
    Ok(Json(items))
}

#[utoipa::path(get, path = "/api/schools", tag = "reference", responses((status = 200, description = "OK")))]
pub async fn list_schools(
    State(state): State<ServerState>,
    Query(params): Query<SchoolQuery>,
) -> Result<Json<Vec<school::Model>>, ApiError> {
    let items = query_service::list_schools(
        &state.db,
        params.district,
        params.search.as_deref(),
        Pagination::from_params(params.page, params.per_page),
    )
    .await?;
    Ok(Json(items))
}
