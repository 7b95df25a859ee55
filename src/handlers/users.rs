use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use email_address::EmailAddress;
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    db::entities::user,
    error::{AppError, Result},
    extractors::AuthUser,
    handlers::{favorites, history},
    state::AppState,
};

const REFRESH_COOKIE: &str = "refreshToken";
const VERIFICATION_CODE_TTL_MINUTES: i64 = 15;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub code: i32,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileRefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub is_verified: bool,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub profile: UserResponse,
    pub favorites: Vec<favorites::FavoriteResponse>,
    pub mood_history: Vec<history::HistoryEntryResponse>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            is_verified: model.is_verified,
            phone: model.phone,
            location: model.location,
            photo_url: model.photo_url,
        }
    }
}

fn validate_signup(req: &SignupRequest) -> Result<()> {
    if req.username.trim().len() < 3 {
        return Err(AppError::Validation(
            "Username must be at least 3 characters long".to_string(),
        ));
    }
    if !EmailAddress::is_valid(&req.email) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }
    if req.password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters long".to_string(),
        ));
    }
    Ok(())
}

fn refresh_cookie(token: String) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .path("/")
        .build()
}

/// Register a new account and email a one-time verification code.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse> {
    validate_signup(&req)?;

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&req.email))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Validation(
            "User with this email already exists".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let code: i32 = rand::thread_rng().gen_range(100_000..=999_999);
    let now = Utc::now();

    let new_user = user::ActiveModel {
        username: Set(req.username.trim().to_string()),
        email: Set(req.email.clone()),
        password_hash: Set(password_hash),
        is_verified: Set(false),
        verification_code: Set(Some(code)),
        verification_expires_at: Set(Some(
            (now + Duration::minutes(VERIFICATION_CODE_TTL_MINUTES)).into(),
        )),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    let created = new_user.insert(&state.db).await?;

    // Mail delivery must not block registration
    if let Err(e) = state
        .mailer
        .send_verification_code(&created.email, &created.username, code)
        .await
    {
        tracing::warn!("failed to send verification email to {}: {}", created.email, e);
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "New user is successfully registered, check your email for the verification code"
        })),
    ))
}

/// Redeem the emailed one-time code.
pub async fn verify(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<serde_json::Value>> {
    let found = user::Entity::find()
        .filter(user::Column::Email.eq(&req.email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if found.is_verified {
        return Ok(Json(json!({ "message": "User is already verified" })));
    }

    let code_matches = found.verification_code == Some(req.code);
    let still_valid = found
        .verification_expires_at
        .map(|exp| exp.to_utc() > Utc::now())
        .unwrap_or(false);

    if !code_matches || !still_valid {
        return Err(AppError::Validation(
            "Invalid or expired verification code".to_string(),
        ));
    }

    let mut active: user::ActiveModel = found.into();
    active.is_verified = Set(true);
    active.verification_code = Set(None);
    active.verification_expires_at = Set(None);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.db).await?;

    Ok(Json(json!({ "message": "Email verified successfully" })))
}

async fn check_credentials(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<user::Model> {
    let found = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?
        .ok_or_else(|| AppError::Authentication("Incorrect email".to_string()))?;

    let password_valid = bcrypt::verify(password, &found.password_hash)
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))?;

    if !password_valid {
        return Err(AppError::Authentication("Incorrect password".to_string()));
    }

    Ok(found)
}

/// Web login: access token in the body, refresh token as an http-only
/// cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let found = check_credentials(&state.db, &req.email, &req.password).await?;

    let access_token = state.tokens.generate_access_token(found.id)?;
    let refresh_token = state.tokens.generate_refresh_token(found.id)?;

    let jar = jar.add(refresh_cookie(refresh_token));

    Ok((
        jar,
        Json(json!({
            "message": "Login successful",
            "accessToken": access_token,
        })),
    ))
}

/// Mobile login: no cookies, both tokens in the body.
pub async fn mobile_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>> {
    let found = check_credentials(&state.db, &req.email, &req.password).await?;

    let access_token = state.tokens.generate_access_token(found.id)?;
    let refresh_token = state.tokens.generate_refresh_token(found.id)?;

    Ok(Json(json!({
        "message": "Login successful",
        "accessToken": access_token,
        "refreshToken": refresh_token,
    })))
}

pub async fn logout(jar: CookieJar) -> Result<impl IntoResponse> {
    let jar = jar.remove(Cookie::build((REFRESH_COOKIE, "")).path("/").build());

    Ok((jar, Json(json!({ "message": "Logged out" }))))
}

/// Exchange the refresh cookie for a fresh access token.
pub async fn refresh_access_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<serde_json::Value>> {
    let refresh_token = jar
        .get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| AppError::Forbidden("Refresh token required".to_string()))?;

    let user_id = state.tokens.verify_refresh_token(&refresh_token)?;
    let access_token = state.tokens.generate_access_token(user_id)?;

    Ok(Json(json!({ "accessToken": access_token })))
}

/// Mobile variant: refresh token arrives in the body.
pub async fn mobile_refresh(
    State(state): State<AppState>,
    Json(req): Json<MobileRefreshRequest>,
) -> Result<Json<serde_json::Value>> {
    let user_id = state.tokens.verify_refresh_token(&req.refresh_token)?;
    let access_token = state.tokens.generate_access_token(user_id)?;

    Ok(Json(json!({ "accessToken": access_token })))
}

fn validate_phone(phone: &str) -> Result<()> {
    if phone.len() != 10 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Mobile number must be exactly 10 digits".to_string(),
        ));
    }
    Ok(())
}

fn photo_extension(file_name: Option<&str>, content_type: Option<&str>) -> &'static str {
    if let Some(name) = file_name {
        if name.ends_with(".png") {
            return "png";
        }
        if name.ends_with(".webp") {
            return "webp";
        }
    }
    match content_type {
        Some("image/png") => "png",
        Some("image/webp") => "webp",
        _ => "jpg",
    }
}

/// Multipart profile update: optional phone, location, and profile photo.
/// The photo is written under the static dir and served from `/static`.
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UserResponse>> {
    let found = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let mut phone: Option<String> = None;
    let mut location: Option<String> = None;
    let mut photo_url: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("phone") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid phone field: {}", e)))?;
                validate_phone(&value)?;
                phone = Some(value);
            }
            Some("location") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid location field: {}", e)))?;
                location = Some(value);
            }
            Some("profilePhoto") => {
                let extension = photo_extension(field.file_name(), field.content_type());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid photo upload: {}", e)))?;

                let photo_dir = format!("{}/profile", state.config.static_dir);
                tokio::fs::create_dir_all(&photo_dir).await?;

                let file_name = format!("{}.{}", uuid::Uuid::new_v4(), extension);
                tokio::fs::write(format!("{}/{}", photo_dir, file_name), &bytes).await?;

                photo_url = Some(format!("/static/profile/{}", file_name));
            }
            _ => {}
        }
    }

    let mut active: user::ActiveModel = found.into();
    if let Some(phone) = phone {
        active.phone = Set(Some(phone));
    }
    if let Some(location) = location {
        active.location = Set(Some(location));
    }
    if let Some(photo_url) = photo_url {
        active.photo_url = Set(Some(photo_url));
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.db).await?;

    Ok(Json(updated.into()))
}

pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>> {
    let found = fetch_profile(&state.db, user_id).await?;
    Ok(Json(found))
}

async fn fetch_profile(db: &DatabaseConnection, user_id: i32) -> Result<UserResponse> {
    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .map(UserResponse::from)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Combined view: profile, favorites, and mood history fetched
/// concurrently. None of the three mutate anything, so no ordering is
/// needed between them.
pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DashboardResponse>> {
    let (profile, favorites, mood_history) = tokio::try_join!(
        fetch_profile(&state.db, user_id),
        favorites::favorites_for_user(&state.db, user_id),
        history::history_for_user(&state.db, user_id),
    )?;

    Ok(Json(DashboardResponse {
        profile,
        favorites,
        mood_history,
    }))
}
