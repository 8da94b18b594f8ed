use super::handlers::{health, profile, sign_in};
use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        profile::profile,
        profile::profile_data,
        sign_in::action,
        sign_in::login,
        sign_in::register,
    ),
    components(schemas(
        health::Health,
        profile::ProfileData,
        profile::ProfilePage,
        sign_in::SignInForm,
    )),
    tags(
        (name = "health", description = "Service status"),
        (name = "profile", description = "Profile page data"),
        (name = "sign-in", description = "Cookie session sign-in actions"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    // Use Cargo.toml metadata instead of the utoipa defaults.
    doc.info.title = env!("CARGO_PKG_NAME").to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc.info.description = Some(env!("CARGO_PKG_DESCRIPTION").to_string());
    doc
}

// axum handler for `/openapi.json`
pub async fn openapi_json() -> impl IntoResponse {
    Json(openapi())
}
