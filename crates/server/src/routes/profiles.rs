//! Profile endpoints: the administrative collection and the
//! self-service `/me` view. Authorization decisions are made in the
//! service layer; handlers only carry the verified caller identity.
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use models::profile;
use serde::Deserialize;
use service::pagination::Pagination;
use service::profile_service::{self, ProfileFilter, ProfileInput, ProfileOwner, ProfileUpdate};
use uuid::Uuid;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct ProfileListQuery {
    pub school: Option<i32>,
    pub year_of_graduation: Option<i16>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Admin create payload: the owner identity plus the profile fields.
#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(flatten)]
    pub profile: ProfileInput,
}

// ---- administrative surface ----

#[utoipa::path(get, path = "/api/profiles", tag = "profiles", responses((status = 200, description = "OK"), (status = 403, description = "Forbidden")))]
pub async fn list_profiles(
    State(state): State<ServerState>,
    CurrentUser(caller): CurrentUser,
    Query(params): Query<ProfileListQuery>,
) -> Result<Json<Vec<profile::Model>>, ApiError> {
    let filter = ProfileFilter {
        school: params.school,
        year_of_graduation: params.year_of_graduation,
        search: params.search,
    };
    let items = profile_service::list_profiles(
        &state.db,
        &caller,
        filter,
        Pagination::from_params(params.page, params.per_page),
    )
    .await?;
    Ok(Json(items))
}

#[utoipa::path(post, path = "/api/profiles", tag = "profiles", request_body = crate::openapi::CreateProfileRequestDoc, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request")))]
pub async fn create_profile(
    State(state): State<ServerState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<profile::Model>), ApiError> {
    let owner = ProfileOwner {
        user_id: payload.user_id,
        first_name: payload.first_name,
        last_name: payload.last_name,
    };
    let created =
        profile_service::create_profile(&state.db, &caller, owner, payload.profile).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/api/profiles/{user_id}", tag = "profiles", responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get_profile(
    State(state): State<ServerState>,
    CurrentUser(caller): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<profile::Model>, ApiError> {
    let found = profile_service::get_profile(&state.db, &caller, user_id).await?;
    Ok(Json(found))
}

#[utoipa::path(put, path = "/api/profiles/{user_id}", tag = "profiles", request_body = crate::openapi::ProfileUpdateDoc, responses((status = 200, description = "OK"), (status = 400, description = "Bad Request")))]
pub async fn update_profile(
    State(state): State<ServerState>,
    CurrentUser(caller): CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<profile::Model>, ApiError> {
    let updated = profile_service::update_profile(&state.db, &caller, user_id, payload).await?;
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/api/profiles/{user_id}", tag = "profiles", responses((status = 204, description = "No Content"), (status = 404, description = "Not Found")))]
pub async fn delete_profile(
    State(state): State<ServerState>,
    CurrentUser(caller): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    profile_service::delete_profile(&state.db, &caller, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- self-service surface ----

#[utoipa::path(get, path = "/api/profiles/me", tag = "profiles", responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get_my_profile(
    State(state): State<ServerState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<profile::Model>, ApiError> {
    let found = profile_service::get_my_profile(&state.db, &caller).await?;
    Ok(Json(found))
}

#[utoipa::path(post, path = "/api/profiles/me", tag = "profiles", request_body = crate::openapi::ProfileInputDoc, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request")))]
pub async fn register_my_profile(
    State(state): State<ServerState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<ProfileInput>,
) -> Result<(StatusCode, Json<profile::Model>), ApiError> {
    let created = profile_service::register_my_profile(&state.db, &caller, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/api/profiles/me", tag = "profiles", request_body = crate::openapi::ProfileUpdateDoc, responses((status = 200, description = "OK"), (status = 400, description = "Bad Request")))]
pub async fn update_my_profile(
    State(state): State<ServerState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<profile::Model>, ApiError> {
    let updated = profile_service::update_my_profile(&state.db, &caller, payload).await?;
    Ok(Json(updated))
}
