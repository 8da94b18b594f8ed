//! HTTP client for the two remote APIs behind the profile page.
//!
//! The backend requires HTTP basic auth and serves the `Colegio` object
//! collection; the users API is a public placeholder service. Neither call is
//! retried or time-limited.

mod error;

pub use error::UpstreamError;

use crate::APP_USER_AGENT;
use reqwest::{
    header::CONTENT_TYPE,
    Client, Response,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_USERS_URL: &str = "https://jsonplaceholder.typicode.com/users";

const COLEGIO_PATH: &str = "index.php";
const COLEGIO_OBJECT: &str = "Colegio";

/// Static username/password pair sent to the backend with HTTP basic auth.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// When the response status is checked relative to parsing the body.
///
/// `AfterBody` parses first, so a non-OK response with a non-JSON body fails
/// with [`UpstreamError::Json`] instead of [`UpstreamError::Status`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusOrder {
    #[default]
    AfterBody,
    BeforeBody,
}

impl FromStr for StatusOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "after-body" => Ok(Self::AfterBody),
            "before-body" => Ok(Self::BeforeBody),
            _ => Err(format!("invalid status order: {s}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Upstream {
    client: Client,
    api_base: Url,
    users_url: Url,
    credentials: Credentials,
    status_order: StatusOrder,
}

impl Upstream {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_base: Url,
        users_url: Url,
        credentials: Credentials,
        status_order: StatusOrder,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self {
            client,
            api_base,
            users_url,
            credentials,
            status_order,
        })
    }

    #[must_use]
    pub const fn status_order(&self) -> StatusOrder {
        self.status_order
    }

    /// `{api_base}/index.php?object=Colegio`
    ///
    /// # Errors
    /// Returns an error if the joined URL is invalid.
    pub fn colegio_url(&self) -> Result<Url, UpstreamError> {
        // Appended, not `Url::join`, so a base with a path keeps its last segment.
        let base = self.api_base.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{COLEGIO_PATH}"))?;
        url.query_pairs_mut().append_pair("object", COLEGIO_OBJECT);
        Ok(url)
    }

    #[must_use]
    pub const fn users_url(&self) -> &Url {
        &self.users_url
    }

    /// Fetch the `Colegio` object collection from the basic-auth backend.
    ///
    /// # Errors
    /// Returns an error if the request fails, the body is not JSON, or the
    /// status is not a success.
    #[instrument(skip(self))]
    pub async fn fetch_colegio(&self) -> Result<Value, UpstreamError> {
        let url = self.colegio_url()?;

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .basic_auth(
                &self.credentials.username,
                Some(self.credentials.password.expose_secret()),
            )
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(UpstreamError::Request)?;

        self.read_json(response).await
    }

    /// Fetch the user list from the placeholder API.
    ///
    /// # Errors
    /// Returns an error if the request fails, the body is not JSON, or the
    /// status is not a success.
    #[instrument(skip(self))]
    pub async fn fetch_users(&self) -> Result<Value, UpstreamError> {
        debug!("GET {}", self.users_url);

        let response = self
            .client
            .get(self.users_url.clone())
            .send()
            .await
            .map_err(UpstreamError::Request)?;

        self.read_json(response).await
    }

    async fn read_json(&self, response: Response) -> Result<Value, UpstreamError> {
        let status = response.status();

        if self.status_order == StatusOrder::BeforeBody && !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body = response.bytes().await.map_err(UpstreamError::Body)?;
        let payload: Value = serde_json::from_slice(&body)?;

        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn credentials() -> Credentials {
        Credentials::new("user", SecretString::from("pass".to_string()))
    }

    fn upstream(base: &str, order: StatusOrder) -> Result<Upstream> {
        Ok(Upstream::new(
            Url::parse(base)?,
            Url::parse(&format!("{base}/users"))?,
            credentials(),
            order,
        )?)
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let debug = format!("{:?}", credentials());
        assert!(debug.contains("user"));
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("\"pass\""));
    }

    #[test]
    fn status_order_from_str() {
        assert_eq!("after-body".parse::<StatusOrder>(), Ok(StatusOrder::AfterBody));
        assert_eq!("BEFORE-BODY".parse::<StatusOrder>(), Ok(StatusOrder::BeforeBody));
        assert!("sideways".parse::<StatusOrder>().is_err());
        assert_eq!(StatusOrder::default(), StatusOrder::AfterBody);
    }

    #[test]
    fn colegio_url_keeps_base_path() -> Result<()> {
        let nested = upstream("https://api.example.com/v2/", StatusOrder::default())?;
        assert_eq!(
            nested.colegio_url()?.as_str(),
            "https://api.example.com/v2/index.php?object=Colegio"
        );

        let bare = upstream("https://api.example.com", StatusOrder::default())?;
        assert_eq!(
            bare.colegio_url()?.as_str(),
            "https://api.example.com/index.php?object=Colegio"
        );
        Ok(())
    }

    #[tokio::test]
    async fn fetch_colegio_sends_basic_auth() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/index.php"))
            .and(query_param("object", "Colegio"))
            .and(header("Authorization", "Basic dXNlcjpwYXNz"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"foo": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let client = upstream(&server.uri(), StatusOrder::default())?;
        let payload = client.fetch_colegio().await?;

        assert_eq!(payload, json!({"foo": 1}));
        Ok(())
    }

    #[tokio::test]
    async fn basic_auth_keeps_colons_in_password() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/index.php"))
            .and(header("Authorization", "Basic dXNlcjpwYTpzcw=="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = Upstream::new(
            Url::parse(&server.uri())?,
            Url::parse(&format!("{}/users", server.uri()))?,
            Credentials::new("user", SecretString::from("pa:ss".to_string())),
            StatusOrder::default(),
        )?;

        assert_eq!(client.fetch_colegio().await?, json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn non_json_error_body_fails_parsing_first() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/index.php"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let client = upstream(&server.uri(), StatusOrder::AfterBody)?;
        let Err(err) = client.fetch_colegio().await else {
            panic!("expected an error");
        };

        assert!(err.is_json(), "expected parse error, got: {err}");
        Ok(())
    }

    #[tokio::test]
    async fn non_json_error_body_fails_on_status_when_checked_first() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/index.php"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let client = upstream(&server.uri(), StatusOrder::BeforeBody)?;
        let Err(err) = client.fetch_colegio().await else {
            panic!("expected an error");
        };

        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        Ok(())
    }

    #[tokio::test]
    async fn json_error_body_fails_on_status() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "nope"})))
            .mount(&server)
            .await;

        let client = upstream(&server.uri(), StatusOrder::AfterBody)?;
        let Err(err) = client.fetch_users().await else {
            panic!("expected an error");
        };

        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "HTTP error! status: 404");
        Ok(())
    }
}
