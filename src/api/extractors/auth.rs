use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header::AUTHORIZATION, request::Parts},
};
use crate::state::AppState;
use crate::domain::models::auth::{Claims, Role, TOKEN_AUDIENCE};
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::Cookies;
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};
use tracing::{debug, error, warn, Span};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Caller identity taken from a verified access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub role: Role,
}

impl AuthUser {
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role != role {
            warn!(user_id = %self.id, role = %self.role, required = %role, "Role check failed");
            return Err(AppError::Forbidden(format!("Requires role '{}'", role)));
        }
        Ok(())
    }
}

/// Authenticated caller holding the `admin` role.
pub struct AdminUser(pub AuthUser);

/// Authenticated caller holding the `user` role.
pub struct CustomerUser(pub AuthUser);

fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(cookies) = parts.extensions.get::<Cookies>()
        && let Some(cookie) = cookies.get(ACCESS_TOKEN_COOKIE)
    {
        return Some(cookie.value().to_string());
    }

    parts.headers.get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let access_token = extract_token(parts).ok_or(AppError::Unauthorized)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let decoding_key = DecodingKey::from_ed_pem(app_state.config.jwt_public_key.as_bytes())
            .map_err(|e| {
                error!("JWT_PUBLIC_KEY is not a valid Ed25519 PEM: {:?}", e);
                AppError::Unauthorized
            })?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.set_issuer(&[app_state.config.auth_issuer.as_str()]);

        let token_data = decode::<Claims>(&access_token, &decoding_key, &validation)
            .map_err(|e| {
                debug!("Rejected access token: {}", e);
                AppError::Unauthorized
            })?;

        let user = AuthUser {
            id: token_data.claims.sub,
            role: token_data.claims.role,
        };

        Span::current().record("user_id", &user.id);

        Ok(user)
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require_role(Role::Admin)?;
        Ok(AdminUser(user))
    }
}

impl<S> FromRequestParts<S> for CustomerUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require_role(Role::User)?;
        Ok(CustomerUser(user))
    }
}
