//! Account and profile handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{User, UserDetails, UserStatus};
use quill_core::policy;
use quill_core::ports::{AuthError, BaseRepository};
use quill_core::validation;
use quill_shared::ApiResponse;
use quill_shared::dto::{
    ProfileResponse, PublicProfileResponse, UpdateUserRequest, UpdateUserStatusRequest,
    UserDetailsDto,
};

use super::auth::removal_cookie;
use super::common::{clean, details_dto, load_account, load_actor, user_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn details_of(state: &AppState, user_id: Uuid) -> AppResult<UserDetailsDto> {
    let details = state
        .repos
        .users
        .find_details(user_id)
        .await?
        .unwrap_or_else(|| UserDetails::empty(user_id));

    Ok(details_dto(details))
}

fn details_from_dto(user_id: Uuid, dto: UserDetailsDto) -> UserDetails {
    UserDetails {
        user_id,
        display_name: clean(dto.display_name),
        bio: clean(dto.bio),
        avatar_url: clean(dto.avatar_url),
        website: clean(dto.website),
        location: clean(dto.location),
    }
}

/// GET /api/users/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = load_account(&state, &identity).await?;
    let details = details_of(&state, user.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProfileResponse {
        user: user_response(&user),
        details,
    })))
}

async fn apply_account_changes(
    state: &AppState,
    user: &mut User,
    req: &UpdateUserRequest,
) -> AppResult<bool> {
    let mut changed = false;

    if let Some(username) = req.username.as_deref().map(str::trim) {
        if username != user.username {
            validation::username(username)?;
            if state.repos.users.find_by_username(username).await?.is_some() {
                return Err(AppError::Conflict("Username already taken".to_string()));
            }
            user.username = username.to_string();
            changed = true;
        }
    }

    if let Some(email) = req.email.as_deref().map(|e| e.trim().to_lowercase()) {
        if email != user.email {
            validation::email(&email)?;
            if state.repos.users.find_by_email(&email).await?.is_some() {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
            user.email = email;
            changed = true;
        }
    }

    if let Some(password) = req.password.as_deref() {
        let current = req.current_password.as_deref().ok_or_else(|| {
            AppError::Validation(vec!["current_password is required to change the password".into()])
        })?;
        if !state.passwords.verify(current, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials.into());
        }
        validation::password(password)?;
        user.password_hash = state.passwords.hash(password)?;
        changed = true;
    }

    Ok(changed)
}

/// PUT /api/users/me
pub async fn update_me(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let mut user = load_actor(&state, &identity).await?;
    let req = body.into_inner();

    if apply_account_changes(&state, &mut user, &req).await? {
        user.updated_at = chrono::Utc::now();
        user = state.repos.users.update(user).await?;
        tracing::info!(user_id = %user.id, "Account updated");
    }

    let details = match req.details {
        Some(dto) => {
            let saved = state
                .repos
                .users
                .save_details(details_from_dto(user.id, dto))
                .await?;
            details_dto(saved)
        }
        None => details_of(&state, user.id).await?,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProfileResponse {
        user: user_response(&user),
        details,
    })))
}

/// DELETE /api/users/me - soft delete; the row stays for referential history.
pub async fn delete_me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let mut user = load_actor(&state, &identity).await?;

    user.soft_delete();
    let user = state.repos.users.update(user).await?;

    tracing::info!(user_id = %user.id, "Account soft-deleted");

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(&state.cookie))
        .json(ApiResponse::message("Account deleted")))
}

/// GET /api/users/{username}
pub async fn public_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();

    let user = state
        .repos
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    policy::ensure_author_visible(&user).map_err(|_| AppError::not_found("User"))?;

    let details = details_of(&state, user.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PublicProfileResponse {
        id: user.id,
        username: user.username,
        details,
        created_at: user.created_at,
    })))
}

/// PUT /api/users/{id}/status - admin moderation
pub async fn update_status(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUserStatusRequest>,
) -> AppResult<HttpResponse> {
    let actor = load_actor(&state, &identity).await?;

    let status: UserStatus = body.status.parse()?;
    if status == UserStatus::Deleted {
        return Err(AppError::Validation(vec![
            "status must be 'active' or 'suspended'".to_string(),
        ]));
    }

    let mut target = state
        .repos
        .users
        .find_by_id(path.into_inner())
        .await?
        .filter(|u| u.deleted_at.is_none())
        .ok_or_else(|| AppError::not_found("User"))?;

    policy::can_moderate_user(&actor, &target)?;

    target.set_status(status);
    let target = state.repos.users.update(target).await?;

    tracing::info!(
        admin_id = %actor.id,
        user_id = %target.id,
        status = %target.status,
        "Account status changed"
    );

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user_response(&target))))
}
