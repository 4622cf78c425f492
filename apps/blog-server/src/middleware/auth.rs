//! Authentication extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use blog_core::policy::Viewer;
use blog_core::ports::{AuthError, TokenClaims};
use blog_shared::ErrorResponse;

use crate::state::AppState;

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
}

impl Identity {
    pub fn viewer(&self) -> Viewer {
        Viewer::User(self.user_id)
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match &self.0 {
            AuthError::TokenExpired
            | AuthError::InvalidToken(_)
            | AuthError::MissingAuth
            | AuthError::InvalidCredentials => actix_web::http::StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => actix_web::http::StatusCode::FORBIDDEN,
            AuthError::HashingError(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let error = match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your authentication token has expired. Please login again."),
            AuthError::InvalidToken(msg) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
            }
            AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Please provide a valid Bearer token in the Authorization header."),
            AuthError::InvalidCredentials => ErrorResponse::unauthorized(),
            AuthError::InsufficientPermissions => ErrorResponse::forbidden(),
            AuthError::HashingError(_) => ErrorResponse::internal_error(),
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        ));
    };

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))?;

    state.tokens.validate_token(token).map(Identity::from)
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(AuthenticationError))
    }
}

/// Optional identity extractor - anonymous when the caller sends no usable token.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn viewer(&self) -> Viewer {
        self.0
            .as_ref()
            .map(Identity::viewer)
            .unwrap_or(Viewer::Anonymous)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match authenticate(req) {
            Ok(identity) => ready(Ok(OptionalIdentity(Some(identity)))),
            Err(AuthError::MissingAuth) => ready(Ok(OptionalIdentity(None))),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable token on public route");
                ready(Ok(OptionalIdentity(None)))
            }
        }
    }
}
