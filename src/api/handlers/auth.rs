use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{JoinRequest, LoginRequest};
use crate::api::dtos::responses::{AuthResponse, JoinResponse, PublicUser};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::user::User;
use crate::domain::services::{avatar::avatar_url, password::{hash_password, verify_password}};
use std::sync::Arc;
use serde_json::json;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::{info, warn};

pub async fn join(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<JoinRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let email = payload.email_address.trim().to_lowercase();
    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email address is already registered".into()));
    }

    let first_name = payload.first_name.trim().to_string();
    let avatar = avatar_url(&state.config.avatar_base_url, payload.gender, &first_name);

    let mut user = User::new(
        first_name,
        payload.last_name.trim().to_string(),
        payload.gender,
        email,
        hash_password(&payload.password)?,
        avatar,
    );
    user.card_last4 = payload.card_last4();
    user.id_type = payload.id_type.as_str().to_string();
    user.current_address = non_empty(payload.current_address);
    user.contact_number = non_empty(payload.contact_number);
    user.id_number = non_empty(payload.id_number);
    user.cardholder_name = non_empty(payload.cardholder_name);
    user.billing_address = non_empty(payload.billing_address);
    user.city = non_empty(payload.city);
    user.postal_code = non_empty(payload.postal_code);
    user.country = non_empty(payload.country);

    let created = state.user_repo.create(&user).await?;
    let tokens = state.auth_service.login(&created).await?;
    set_cookies(&cookies, &tokens.access_token, &tokens.refresh_token);

    info!("User registered: {}", created.id);

    Ok((
        StatusCode::CREATED,
        Json(JoinResponse {
            message: "Account created successfully".to_string(),
            csrf_token: tokens.csrf_token,
            user: PublicUser::from(created),
        }),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.email_address.trim().to_lowercase();
    let user = state.user_repo.find_by_email(&email).await?
        .ok_or(AppError::Unauthorized)?;

    if let Err(e) = verify_password(&payload.password, &user.password_hash) {
        warn!("Failed login attempt for user: {}", user.id);
        return Err(e);
    }

    let tokens = state.auth_service.login(&user).await?;
    set_cookies(&cookies, &tokens.access_token, &tokens.refresh_token);

    info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        csrf_token: tokens.csrf_token,
        user: PublicUser::from(user),
    }))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let refresh_cookie = cookies.get("refresh_token").ok_or(AppError::Unauthorized)?;
    let raw_token = refresh_cookie.value();

    let token_hash = state.auth_service.hash_token(raw_token);
    let record = state.auth_repo.find_refresh_token(&token_hash).await?
        .ok_or(AppError::Unauthorized)?;

    let user = state.user_repo.find_by_id(&record.user_id).await?
        .ok_or(AppError::Unauthorized)?;

    let tokens = state.auth_service.refresh(raw_token, &user).await?;
    set_cookies(&cookies, &tokens.access_token, &tokens.refresh_token);

    info!("Token refreshed for user: {}", user.id);

    Ok(Json(AuthResponse {
        csrf_token: tokens.csrf_token,
        user: PublicUser::from(user),
    }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = cookies.get("refresh_token")
        && let Err(e) = state.auth_service.logout(cookie.value()).await
    {
        warn!("Failed to revoke refresh token family: {}", e);
    }

    cookies.remove(Cookie::build(("access_token", "")).path("/").into());
    cookies.remove(Cookie::build(("refresh_token", "")).path("/").into());

    info!("User logged out");

    Ok(StatusCode::OK)
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_id(&auth.user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(json!({ "user": PublicUser::from(user) })))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn set_cookies(cookies: &Cookies, access: &str, refresh: &str) {
    let mut access_c = Cookie::new("access_token", access.to_string());
    access_c.set_http_only(true);
    access_c.set_secure(true);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(15));
    cookies.add(access_c);

    let mut refresh_c = Cookie::new("refresh_token", refresh.to_string());
    refresh_c.set_http_only(true);
    refresh_c.set_secure(true);
    refresh_c.set_same_site(SameSite::Strict);
    refresh_c.set_path("/");
    refresh_c.set_max_age(Duration::days(7));
    cookies.add(refresh_c);
}
