use std::env;
use std::future::Future;

use axum::{
    extract::{FromRequestParts, Json, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::AppState;

const AUTH_COOKIE_NAME: &str = "auth_token";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Numeric `app_user` id as a string, or "operator" when the login
    /// matched no database user.
    pub sub: String,
    pub exp: usize,
    pub name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Serialize, Clone)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    user: UserProfile,
}

pub struct AuthenticatedUser {
    pub id: String,
    pub name: String,
}

impl AuthenticatedUser {
    /// Donation writes attribute `user_id` when the subject is a positive
    /// integer; anything else (the fallback operator identity) stays NULL.
    pub fn user_id(&self) -> Option<i32> {
        match self.id.parse::<i32>() {
            Ok(n) if n > 0 => Some(n),
            _ => None,
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync + 'static,
{
    type Rejection = (StatusCode, String);

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let token = extract_token_from_headers(&parts.headers)
                .ok_or((StatusCode::UNAUTHORIZED, "Missing auth token".to_string()))?;
            let claims = validate_token_str(&token).map_err(|e| {
                tracing::error!("Token error: {}", e);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            })?;
            Ok(AuthenticatedUser {
                id: claims.sub,
                name: claims.name,
            })
        }
    }
}

pub fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    if let Some(cookie_header) = headers.get(header::COOKIE).and_then(|h| h.to_str().ok()) {
        for cookie in cookie_header.split(';') {
            let cookie = cookie.trim();
            if let Some((k, v)) = cookie.split_once('=') {
                if k == AUTH_COOKIE_NAME {
                    return Some(v.to_string());
                }
            }
        }
    }
    None
}

pub fn validate_token_str(token: &str) -> anyhow::Result<Claims> {
    let secret = env::var("JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;
    let mut validation = Validation::default();
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;
    Ok(data.claims)
}

pub fn create_jwt(sub: &str, name: &str) -> anyhow::Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(1))
        .expect("valid timestamp")
        .timestamp();

    let claims = Claims {
        sub: sub.to_string(),
        exp: expiration as usize,
        name: name.to_string(),
    };

    let secret = env::var("JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}

/// Password login for the operator account configured via environment
/// variables. Disabled in production unless explicitly switched on; the UI
/// is the only expected caller.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let env_mode = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
    if env_mode == "production"
        && env::var("ALLOW_OPERATOR_LOGIN").unwrap_or_default() != "true"
    {
        return (StatusCode::FORBIDDEN, "Operator login disabled").into_response();
    }

    let operator_user = env::var("OPERATOR_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let operator_pass = env::var("OPERATOR_PASSWORD").unwrap_or_else(|_| "password".to_string());

    if operator_pass == "password" {
        tracing::warn!("Default OPERATOR_PASSWORD is not allowed");
        return (StatusCode::FORBIDDEN, "Operator login misconfigured").into_response();
    }

    if payload.username != operator_user || payload.password != operator_pass {
        return (StatusCode::UNAUTHORIZED, "Invalid credentials").into_response();
    }

    // Carry a numeric user id in `sub` when the operator maps to an
    // app_user row, so created donations get attributed.
    let (sub, name) = match crate::db::get_user_by_username(&state.db, payload.username.clone()).await
    {
        Ok(Some(user)) => (
            user.user_id.to_string(),
            user.display_name.unwrap_or(user.username),
        ),
        Ok(None) => ("operator".to_string(), payload.username.clone()),
        Err(e) => {
            tracing::error!("User lookup failed during login: {}", e);
            ("operator".to_string(), payload.username.clone())
        }
    };

    match create_jwt(&sub, &name) {
        Ok(token) => {
            let user = UserProfile { id: sub, name };
            let cookie = build_auth_cookie(&token);
            let mut response = Json(AuthResponse { user }).into_response();
            response
                .headers_mut()
                .insert(header::SET_COOKIE, HeaderValue::from_str(&cookie).unwrap());
            response
        }
        Err(e) => {
            tracing::error!("JWT creation failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to create token").into_response()
        }
    }
}

pub async fn logout() -> impl IntoResponse {
    let cookie = clear_auth_cookie();
    let mut response = (StatusCode::OK, "OK").into_response();
    response
        .headers_mut()
        .insert(header::SET_COOKIE, HeaderValue::from_str(&cookie).unwrap());
    response
}

pub async fn me(user: AuthenticatedUser) -> impl IntoResponse {
    Json(UserProfile {
        id: user.id,
        name: user.name,
    })
}

fn build_auth_cookie(token: &str) -> String {
    let secure = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()) == "production";
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age=86400",
        AUTH_COOKIE_NAME, token
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn clear_auth_cookie() -> String {
    let secure = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()) == "production";
    let mut cookie = format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0",
        AUTH_COOKIE_NAME
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
