use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password, MIN_PASSWORD_LEN},
    repo_types::NewUser,
};
use crate::{
    error::{AppError, AppResult},
    store::UserStore,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn issue_tokens(keys: &JwtKeys, user: PublicUser) -> AppResult<AuthResponse> {
    Ok(AuthResponse {
        access_token: keys.sign_access(user.id)?,
        refresh_token: keys.sign_refresh(user.id)?,
        user,
    })
}

pub async fn register<S>(store: &S, keys: &JwtKeys, req: RegisterRequest) -> AppResult<AuthResponse>
where
    S: UserStore + ?Sized,
{
    let email = normalize_email(&req.email);
    let name = req.name.trim().to_string();
    let phone = req.phone.trim().to_string();

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::validation("Invalid email"));
    }
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    if phone.is_empty() {
        return Err(AppError::validation("Phone is required"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = hash_password(&req.password)?;

    // The store enforces email uniqueness; a duplicate surfaces as a 409.
    let user = store
        .insert_user(NewUser {
            name,
            email,
            phone,
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    issue_tokens(keys, user.into())
}

pub async fn login<S>(store: &S, keys: &JwtKeys, req: LoginRequest) -> AppResult<AuthResponse>
where
    S: UserStore + ?Sized,
{
    let email = normalize_email(&req.email);
    let invalid = || AppError::unauthorized("Invalid credentials");

    let Some(user) = store.find_user_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(invalid());
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    info!(user_id = %user.id, "user logged in");
    issue_tokens(keys, user.into())
}

pub async fn refresh<S>(store: &S, keys: &JwtKeys, refresh_token: &str) -> AppResult<AuthResponse>
where
    S: UserStore + ?Sized,
{
    let claims = keys
        .verify_refresh(refresh_token)
        .map_err(|e| AppError::unauthorized(e.to_string()))?;
    let user = store
        .find_user(claims.sub)
        .await?
        .ok_or_else(|| AppError::unauthorized("User not found"))?;
    issue_tokens(keys, user.into())
}

pub async fn profile<S>(store: &S, user_id: Uuid) -> AppResult<PublicUser>
where
    S: UserStore + ?Sized,
{
    store
        .find_user(user_id)
        .await?
        .map(PublicUser::from)
        .ok_or_else(|| AppError::unauthorized("User not found"))
}
