use crate::api::session::session_cookie;
use axum::{
    extract::{FromRequest, RawQuery, Request},
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Form,
};
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

/// Raw urlencoded pairs, in submission order.
pub type FormFields = Vec<(String, String)>;

/// Sign-in form fields, both opaque strings.
#[derive(ToSchema, Debug, Default, PartialEq, Eq)]
pub struct SignInForm {
    email: Option<String>,
    password: Option<String>,
}

// A repeated field keeps its first value.
impl From<FormFields> for SignInForm {
    fn from(fields: FormFields) -> Self {
        let mut form = Self::default();
        for (key, value) in fields {
            match key.as_str() {
                "email" if form.email.is_none() => form.email = Some(value),
                "password" if form.password.is_none() => form.password = Some(value),
                _ => {}
            }
        }
        form
    }
}

#[utoipa::path(
    post,
    path= "/sign-in/login",
    request_body(content = SignInForm, content_type = "application/x-www-form-urlencoded"),
    responses (
        (status = 200, description = "Session cookie set to the submitted email"),
        (status = 500, description = "Session cookie could not be built"),
    ),
    tag= "sign-in"
)]
// axum handler for the login action
#[instrument(skip(form))]
pub async fn login(form: Option<Form<FormFields>>) -> Response {
    info!("login");

    let form = form
        .map(|Form(fields)| SignInForm::from(fields))
        .unwrap_or_default();

    // No credential check: whatever was submitted becomes the session.
    debug!(
        email = form.email.as_deref(),
        password_present = form.password.is_some(),
        "sign-in form"
    );

    let email = form.email.unwrap_or_default();

    let cookie = match session_cookie(&email) {
        Ok(cookie) => cookie,
        Err(err) => {
            error!("Failed to build session cookie: {err}");

            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Error".to_string(),
            )
                .into_response();
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);

    (StatusCode::OK, headers).into_response()
}

#[utoipa::path(
    post,
    path= "/sign-in/register",
    responses (
        (status = 302, description = "Redirect to the site root"),
    ),
    tag= "sign-in"
)]
// axum handler for the register action, no account is created
#[instrument]
pub async fn register() -> impl IntoResponse {
    info!("register");

    (StatusCode::FOUND, [(LOCATION, HeaderValue::from_static("/"))])
}

#[utoipa::path(
    post,
    path= "/sign-in",
    responses (
        (status = 200, description = "Login action ran"),
        (status = 302, description = "Register action ran"),
        (status = 404, description = "Unknown form action"),
    ),
    tag= "sign-in"
)]
/// Dispatch `POST /sign-in?/<action>` to the named action.
pub async fn action(RawQuery(query): RawQuery, request: Request) -> Response {
    match query.as_deref() {
        Some("/login") => {
            let form = <Option<Form<FormFields>> as FromRequest<()>>::from_request(request, &())
                .await
                .unwrap_or_default();
            login(form).await
        }
        Some("/register") => register().await.into_response(),
        other => {
            debug!("Unknown sign-in action: {:?}", other);

            (StatusCode::NOT_FOUND, "Unknown action".to_string()).into_response()
        }
    }
}
