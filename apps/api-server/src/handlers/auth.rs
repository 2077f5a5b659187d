//! Authentication handlers.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpResponse, web};

use quill_core::domain::{User, UserDetails};
use quill_core::ports::{AuthError, BaseRepository};
use quill_core::validation;
use quill_shared::ApiResponse;
use quill_shared::dto::{AuthResponse, LoginRequest, SignupRequest};

use super::common::{load_account, user_response};
use crate::config::CookieConfig;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Session cookie carrying `token` for `max_age` seconds.
pub(crate) fn session_cookie(config: &CookieConfig, token: String, max_age: i64) -> Cookie<'static> {
    Cookie::build(config.name.clone(), token)
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age))
        .finish()
}

/// Expired cookie that makes the browser drop the session.
pub(crate) fn removal_cookie(config: &CookieConfig) -> Cookie<'static> {
    session_cookie(config, String::new(), 0)
}

fn issue_token(state: &AppState, user: &User) -> AppResult<(AuthResponse, Cookie<'static>)> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username, user.role)?;
    let expires_in = state.tokens.expiration_seconds();

    let cookie = session_cookie(&state.cookie, token.clone(), expires_in);
    let response = AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: expires_in.max(0) as u64,
        user: user_response(user),
    };

    Ok((response, cookie))
}

/// POST /api/auth/signup
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let username = req.username.trim().to_string();
    let email = req.email.trim().to_lowercase();

    let errors: Vec<String> = [
        validation::username(&username),
        validation::email(&email),
        validation::password(&req.password),
    ]
    .into_iter()
    .filter_map(Result::err)
    .map(|e| e.to_string())
    .collect();

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if state.repos.users.find_by_username(&username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }
    if state.repos.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = state.passwords.hash(&req.password)?;

    let user = state
        .repos
        .users
        .create(User::new(username, email, password_hash))
        .await?;
    state
        .repos
        .users
        .save_details(UserDetails::empty(user.id))
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User signed up");

    let (response, cookie) = issue_token(&state, &user)?;

    Ok(HttpResponse::Created()
        .cookie(cookie)
        .json(ApiResponse::ok(response)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let credential = req.login.trim();

    // Usernames cannot contain '@'.
    let found = if credential.contains('@') {
        state
            .repos
            .users
            .find_by_email(&credential.to_lowercase())
            .await?
    } else {
        state.repos.users.find_by_username(credential).await?
    };

    let user = found.ok_or(AuthError::InvalidCredentials)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    if !user.is_active() {
        tracing::info!(user_id = %user.id, status = %user.status, "Login refused for inactive account");
        return Err(AppError::Forbidden);
    }

    let (response, cookie) = issue_token(&state, &user)?;

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::ok(response)))
}

/// POST /api/auth/logout
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(removal_cookie(&state.cookie))
        .json(ApiResponse::message("Logged out"))
}

/// GET /api/auth/profile - Protected route
pub async fn profile(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = load_account(&state, &identity).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user_response(&user))))
}
