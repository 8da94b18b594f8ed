use axum::response::IntoResponse;

// axum handler for `/`, the register redirect target
pub async fn root() -> impl IntoResponse {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
