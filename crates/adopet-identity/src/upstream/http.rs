//! HTTP implementations of the upstream directories.
//!
//! Both clients are thin wrappers over `reqwest` with the configured
//! request timeout baked into the client. Transport failures, non-2xx
//! statuses, and unparseable bodies all map to
//! [`IdentityError::Upstream`]; callers decide whether that is fatal
//! (identity fetch) or merely degrades refinement (institution
//! lookup).

use adopet_core::InstitutionKind;
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::IdentityResult;
use crate::config::UpstreamConfig;
use crate::error::IdentityError;

use super::{AccountProfile, InstitutionDirectory, UserDirectory};

/// `reqwest`-backed [`UserDirectory`].
pub struct HttpUserDirectory {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpUserDirectory {
    /// Creates a user directory client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should not happen
    /// in practice).
    #[must_use]
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            client: build_client(config),
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn fetch_current_user(&self, credential: &str) -> IdentityResult<AccountProfile> {
        let url = endpoint(&self.base_url, &["usuarios", "perfil"])?;
        tracing::debug!(%url, "Fetching current user profile");

        let response = self
            .client
            .get(url)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(map_transport_error)?
            .error_for_status()
            .map_err(|e| IdentityError::upstream(format!("user directory: {e}")))?;

        response
            .json::<AccountProfile>()
            .await
            .map_err(|e| IdentityError::upstream(format!("user directory body: {e}")))
    }
}

/// `reqwest`-backed [`InstitutionDirectory`].
pub struct HttpInstitutionDirectory {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpInstitutionDirectory {
    /// Creates an institution directory client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should not happen
    /// in practice).
    #[must_use]
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            client: build_client(config),
            base_url: config.base_url.clone(),
        }
    }
}

/// Wire shape of the institution kind endpoint.
#[derive(Debug, Deserialize)]
struct InstitutionKindResponse {
    tipo: String,
}

#[async_trait]
impl InstitutionDirectory for HttpInstitutionDirectory {
    async fn institution_kind(
        &self,
        user_id: &str,
        credential: &str,
    ) -> IdentityResult<InstitutionKind> {
        let url = endpoint(&self.base_url, &["instituciones", user_id, "tipo"])?;
        tracing::debug!(%url, user_id, "Looking up institution kind");

        let response = self
            .client
            .get(url)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(map_transport_error)?
            .error_for_status()
            .map_err(|e| IdentityError::upstream(format!("institution directory: {e}")))?;

        let body: InstitutionKindResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::upstream(format!("institution directory body: {e}")))?;

        InstitutionKind::parse(&body.tipo).ok_or_else(|| {
            IdentityError::upstream(format!("unknown institution kind: {}", body.tipo))
        })
    }
}

fn build_client(config: &UpstreamConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .expect("Failed to create HTTP client")
}

fn endpoint(base: &Url, segments: &[&str]) -> IdentityResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| IdentityError::upstream("upstream base URL cannot be a base"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn map_transport_error(err: reqwest::Error) -> IdentityError {
    if err.is_timeout() {
        IdentityError::upstream("upstream request timed out")
    } else {
        IdentityError::upstream(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config_for(server: &MockServer) -> UpstreamConfig {
        UpstreamConfig {
            base_url: Url::parse(&server.uri()).unwrap(),
            request_timeout: Duration::from_secs(2),
        }
    }

    #[tokio::test]
    async fn test_fetch_current_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/usuarios/perfil"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "42",
                "username": "ana",
                "email": "ana@x.com",
                "bio": "Cuido gatos",
                "avatarRef": "a/42.png"
            })))
            .mount(&server)
            .await;

        let directory = HttpUserDirectory::new(&config_for(&server));
        let profile = directory.fetch_current_user("tok-1").await.unwrap();

        assert_eq!(profile.id, "42");
        assert_eq!(profile.username, "ana");
        assert_eq!(profile.email.as_deref(), Some("ana@x.com"));
        assert_eq!(profile.avatar_ref.as_deref(), Some("a/42.png"));
    }

    #[tokio::test]
    async fn test_user_directory_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/usuarios/perfil"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let directory = HttpUserDirectory::new(&config_for(&server));
        let err = directory.fetch_current_user("tok-1").await.unwrap_err();
        assert!(matches!(err, IdentityError::Upstream { .. }));
    }

    #[tokio::test]
    async fn test_user_directory_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/usuarios/perfil"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": "42", "username": "ana"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.request_timeout = Duration::from_millis(50);

        let directory = HttpUserDirectory::new(&config);
        let err = directory.fetch_current_user("tok-1").await.unwrap_err();
        assert_eq!(err, IdentityError::upstream("upstream request timed out"));
    }

    #[tokio::test]
    async fn test_institution_kind_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/instituciones/42/tipo"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"tipo": "REFUGIO"})),
            )
            .mount(&server)
            .await;

        let directory = HttpInstitutionDirectory::new(&config_for(&server));
        let kind = directory.institution_kind("42", "tok-1").await.unwrap();
        assert_eq!(kind, InstitutionKind::Refugio);
    }

    #[tokio::test]
    async fn test_unknown_institution_kind_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/instituciones/42/tipo"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"tipo": "GUARDERIA"})),
            )
            .mount(&server)
            .await;

        let directory = HttpInstitutionDirectory::new(&config_for(&server));
        let err = directory.institution_kind("42", "tok-1").await.unwrap_err();
        assert!(err.to_string().contains("unknown institution kind"));
    }

    #[tokio::test]
    async fn test_institution_not_found_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/instituciones/42/tipo"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let directory = HttpInstitutionDirectory::new(&config_for(&server));
        let err = directory.institution_kind("42", "tok-1").await.unwrap_err();
        assert!(matches!(err, IdentityError::Upstream { .. }));
    }
}
