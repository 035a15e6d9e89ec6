//! Bearer-token guard and CORS policy for the HTTP API.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Access settings for a deployment.
#[derive(Clone, Debug, Default)]
pub struct SecurityConfig {
    /// Required bearer token. `None` leaves the API open.
    pub api_key: Option<String>,
    /// Allowed CORS origins. `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
}

impl SecurityConfig {
    /// No authentication and permissive CORS (local development, tests).
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(key.into()),
            cors_origins: None,
        }
    }

    pub fn with_cors_origins(origins: Vec<String>) -> Self {
        Self {
            api_key: None,
            cors_origins: Some(origins),
        }
    }

    /// CORS layer for the configured origins. Origins that are not valid
    /// header values are skipped with a warning.
    pub fn cors_layer(&self) -> CorsLayer {
        let Some(origins) = &self.cors_origins else {
            return CorsLayer::permissive();
        };
        if origins.iter().any(|origin| origin == "*") {
            return CorsLayer::permissive();
        }

        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(tower_http::cors::Any)
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    }
}

/// Reject requests without `Authorization: Bearer <api_key>` when a key is set.
pub async fn auth_middleware(
    State(config): State<SecurityConfig>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected_key) = &config.api_key else {
        return Ok(next.run(request).await);
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match auth_header.map(|h| h.strip_prefix("Bearer ")) {
        Some(Some(token)) if token == expected_key => Ok(next.run(request).await),
        Some(Some(_)) => {
            tracing::warn!("Invalid API key provided");
            Err(StatusCode::UNAUTHORIZED)
        }
        Some(None) => {
            tracing::warn!("Invalid Authorization header format");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => {
            tracing::warn!("Missing Authorization header");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    fn guarded(config: SecurityConfig) -> Router {
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(middleware::from_fn_with_state(config, auth_middleware))
    }

    async fn status_for(config: SecurityConfig, auth: Option<&str>) -> StatusCode {
        let mut request = Request::builder().uri("/ping");
        if let Some(value) = auth {
            request = request.header(header::AUTHORIZATION, value);
        }
        guarded(config)
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[test]
    fn security_config_disabled_has_no_auth() {
        let config = SecurityConfig::disabled();
        assert!(config.api_key.is_none());
        assert!(config.cors_origins.is_none());
    }

    #[test]
    fn security_config_with_api_key_has_auth() {
        let config = SecurityConfig::with_api_key("test-key");
        assert_eq!(config.api_key, Some("test-key".to_string()));
    }

    #[test]
    fn cors_layer_accepts_origin_lists_and_wildcards() {
        SecurityConfig::with_cors_origins(vec!["http://localhost:3000".to_string()]).cors_layer();
        SecurityConfig::with_cors_origins(vec!["*".to_string()]).cors_layer();
    }

    #[tokio::test]
    async fn open_when_no_key_configured() {
        assert_eq!(status_for(SecurityConfig::disabled(), None).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn accepts_matching_bearer_token() {
        let config = SecurityConfig::with_api_key("s3cret");
        assert_eq!(status_for(config, Some("Bearer s3cret")).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn rejects_wrong_missing_or_malformed_tokens() {
        let config = SecurityConfig::with_api_key("s3cret");
        assert_eq!(
            status_for(config.clone(), Some("Bearer nope")).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(config.clone(), Some("Basic s3cret")).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_for(config, None).await, StatusCode::UNAUTHORIZED);
    }
}
