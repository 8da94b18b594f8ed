//! Profile page data.
//!
//! Loading runs in two sequential steps: the server step reads the session
//! cookie and fetches the `Colegio` collection from the basic-auth backend,
//! the page step fetches the user list and merges both payloads.

use crate::{
    api::session::Session,
    upstream::{Upstream, UpstreamError},
};
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

/// Output of the server step.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProfileData {
    #[schema(value_type = Object)]
    pub data_test: Value,
}

/// Merged page payload.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProfilePage {
    #[schema(value_type = Vec<Object>)]
    pub users: Value,
    #[schema(value_type = Object)]
    pub data_test: Value,
}

/// Server step: log the session and fetch the `Colegio` collection.
///
/// # Errors
/// Returns an error if the backend call fails.
#[instrument(skip_all)]
pub async fn load_profile_data(
    session: Option<&Session>,
    upstream: &Upstream,
) -> Result<ProfileData, UpstreamError> {
    // The session is only logged; the backend call does not depend on it.
    info!(sessionid = session.map(Session::email), "profile request");

    let data_test = upstream.fetch_colegio().await?;

    Ok(ProfileData { data_test })
}

/// Page step: fetch the user list and merge it with the server step output.
///
/// # Errors
/// Returns an error if the users call fails.
#[instrument(skip_all)]
pub async fn load_profile_page(
    data: ProfileData,
    upstream: &Upstream,
) -> Result<ProfilePage, UpstreamError> {
    info!("Loading users...");

    let users = upstream.fetch_users().await?;

    Ok(ProfilePage {
        users,
        data_test: data.data_test,
    })
}

#[utoipa::path(
    get,
    path= "/profile/data",
    responses (
        (status = 200, description = "Server step output", body = ProfileData),
        (status = 500, description = "Upstream call failed"),
    ),
    tag= "profile"
)]
// axum handler for the server step only
pub async fn profile_data(
    headers: HeaderMap,
    upstream: Extension<Arc<Upstream>>,
) -> Result<Json<ProfileData>, UpstreamError> {
    let session = Session::from_headers(&headers);

    let data = load_profile_data(session.as_ref(), &upstream).await?;

    Ok(Json(data))
}

#[utoipa::path(
    get,
    path= "/profile",
    responses (
        (status = 200, description = "Merged profile payload", body = ProfilePage),
        (status = 500, description = "Upstream call failed"),
    ),
    tag= "profile"
)]
// axum handler for the profile page
pub async fn profile(
    headers: HeaderMap,
    upstream: Extension<Arc<Upstream>>,
) -> Result<Json<ProfilePage>, UpstreamError> {
    let session = Session::from_headers(&headers);

    let data = load_profile_data(session.as_ref(), &upstream).await?;
    let page = load_profile_page(data, &upstream).await?;

    Ok(Json(page))
}

// Upstream failures surface as a generic error page.
impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        error!("Failed to load profile: {}", self);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Error".to_string(),
        )
            .into_response()
    }
}
