use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

use upfluence_db::models::{CreateAccount, NewAccount, NewInfluencerProfile};
use upfluence_types::api::{
    LoginRequest, LoginResponse, Principal, RegisterRequest, RegisterResponse, SessionClaims,
};
use upfluence_types::models::{PlanType, Role};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::password;
use crate::session::{clear_session_cookie, session_cookie};
use crate::state::{AppState, blocking, blocking_db};

pub const MIN_PASSWORD_LEN: usize = 8;
/// Applies to the name and the company, both of which ride in the session cookie.
pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_EMAIL_CHARS: usize = 254;

/// Emails are unique after trimming and lower-casing.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Loose address shape check: one `@` with a non-empty local part and a dotted domain.
pub fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Registration input after validation.
#[derive(Debug)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub company: Option<String>,
    pub website: Option<String>,
}

pub fn validate_registration(req: RegisterRequest) -> ApiResult<ValidRegistration> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(ApiError::validation(format!(
            "Name must be at most {MAX_NAME_CHARS} characters"
        )));
    }

    let email = normalize_email(&req.email);
    if email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if email.chars().count() > MAX_EMAIL_CHARS || !looks_like_email(&email) {
        return Err(ApiError::validation("Email address is invalid"));
    }

    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let role = match req.role.trim().parse::<Role>() {
        Ok(Role::Admin) => return Err(ApiError::validation("Admin accounts cannot be self-registered")),
        Ok(role) => role,
        Err(_) => return Err(ApiError::validation("Role must be BRAND or INFLUENCER")),
    };

    let keep_brand_field = |value: Option<String>| match role {
        Role::Brand => value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()),
        Role::Influencer | Role::Admin => None,
    };
    let company = keep_brand_field(req.company);
    if company.as_ref().is_some_and(|c| c.chars().count() > MAX_NAME_CHARS) {
        return Err(ApiError::validation(format!(
            "Company must be at most {MAX_NAME_CHARS} characters"
        )));
    }

    Ok(ValidRegistration {
        name,
        email,
        password: req.password,
        role,
        company,
        website: keep_brand_field(req.website),
    })
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = validate_registration(req)?;

    let email = input.email.clone();
    if blocking_db(&state, move |db| db.email_exists(&email)).await? {
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let plain = input.password;
    let password_hash = blocking(move || password::hash_password(&plain)).await?;

    let account = NewAccount {
        name: input.name,
        email: input.email,
        password_hash,
        role: input.role,
        avatar: None,
        company: input.company,
        website: input.website,
        description: None,
        plan_type: PlanType::Free,
        influencer_profile: (input.role == Role::Influencer).then(NewInfluencerProfile::blank),
    };
    let role = account.role;

    match blocking_db(&state, move |db| db.create_account(&account)).await? {
        CreateAccount::Created(user_id) => {
            info!(%user_id, %role, "User registered");
            Ok((
                StatusCode::CREATED,
                Json(RegisterResponse {
                    message: "User created successfully".into(),
                    user_id,
                }),
            ))
        }
        // Lost a race with a concurrent registration for the same email.
        CreateAccount::EmailTaken => Err(ApiError::Conflict("User already exists".into())),
    }
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Response> {
    let email = normalize_email(&req.email);
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::InvalidCredentials);
    }

    let lookup_email = email.clone();
    let account = match blocking_db(&state, move |db| db.find_account_by_email(&lookup_email)).await {
        Ok(account) => account,
        Err(e) => {
            error!(error = %e, "Account lookup failed during login");
            None
        }
    };

    let plain = req.password;
    let verified = blocking(move || {
        Ok(match account {
            Some(account) if password::verify_password(&plain, &account.password) => Some(account),
            Some(_) => None,
            None => {
                password::verify_against_dummy(&plain);
                None
            }
        })
    })
    .await?;

    let Some(account) = verified else {
        warn!(%email, "Failed login attempt");
        return Err(ApiError::InvalidCredentials);
    };

    let principal = account.principal();
    let issued = state.sessions.issue(&principal)?;
    info!(user_id = %principal.id, role = %principal.role, "User logged in");

    let body = LoginResponse {
        token: issued.token.clone(),
        expires_at: issued.expires_at,
        user: principal,
    };
    Ok((
        [(header::SET_COOKIE, session_cookie(&issued.token))],
        Json(body),
    )
        .into_response())
}

pub async fn logout() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_session_cookie())],
    )
}

pub async fn current_session(Extension(claims): Extension<SessionClaims>) -> Json<SessionClaims> {
    Json(claims)
}

/// The principal as currently stored, rather than the login-time snapshot.
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> ApiResult<Json<Principal>> {
    let user_id = claims.sub;
    let account = blocking_db(&state, move |db| db.find_account_by_id(user_id))
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(account.principal()))
}
