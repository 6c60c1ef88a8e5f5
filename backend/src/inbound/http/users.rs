//! Account endpoints.
//!
//! ```text
//! POST   /users/registration
//! GET    /users/verify_email?token=...
//! POST   /users/authentication {"email":"ada@example.com","password":"secret"}
//! POST   /users/logout
//! GET    /users/all
//! PATCH  /users/block/{id}
//! PATCH  /users/edit/role/{id}
//! PATCH  /users/add_to_favorites/{book_id}
//! PATCH  /users/remove_from_favorites/{book_id}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::BlockOutcome;
use crate::domain::{
    ApiResult, BookId, LoginCredentials, LoginValidationError, Registration, Role, User, UserId,
};
use crate::inbound::http::MessageResponse;
use crate::inbound::http::auth::{require_admin, require_user};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_login_validation, map_user_validation};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistrationRequest {
    pub firstname: String,
    pub lastname: String,
    pub phone_number: String,
    pub email: String,
    pub password: String,
}

/// Login request body for `POST /users/authentication`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VerifyQuery {
    pub token: Uuid,
}

/// Public view of an account; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserResponse {
    pub firstname: String,
    pub lastname: String,
    pub phone_number: String,
    pub is_active: bool,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            firstname: value.firstname,
            lastname: value.lastname,
            phone_number: value.phone_number,
            is_active: value.is_active,
            email: value.email,
            role: value.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegistrationResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Create an inactive account and mail its verification link.
#[post("/users/registration")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegistrationRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let registration = Registration::try_new(
        &body.firstname,
        &body.lastname,
        &body.phone_number,
        &body.email,
        &body.password,
    )
    .map_err(map_user_validation)?;
    let user = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(RegistrationResponse {
        message: "Success! Please, check your email to complete your registration.".to_owned(),
        user: user.into(),
    }))
}

#[get("/users/verify_email")]
pub async fn verify_email(
    state: web::Data<HttpState>,
    query: web::Query<VerifyQuery>,
) -> ApiResult<web::Json<MessageResponse>> {
    state.accounts.verify_email(query.token).await?;
    Ok(web::Json(MessageResponse::new(
        "Email verified successfully. Now you can login to your account",
    )))
}

/// Authenticate and establish a session.
#[post("/users/authentication")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(user_id)?;
    Ok(web::Json(MessageResponse::new("Logged in successfully")))
}

#[post("/users/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

#[get("/users/all")]
pub async fn all_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    require_admin(&state, &session).await?;
    let users = state.users.list_users().await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Toggle a reader's active flag.
#[patch("/users/block/{id}")]
pub async fn block_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let caller = require_admin(&state, &session).await?;
    let id = UserId::new(path.into_inner());
    let verb = match state.accounts.block_user(&caller, id).await? {
        BlockOutcome::Blocked => "blocked",
        BlockOutcome::Unblocked => "unblocked",
    };
    Ok(web::Json(MessageResponse::new(format!(
        "User with id: {id} is {verb}"
    ))))
}

#[patch("/users/edit/role/{id}")]
pub async fn edit_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let caller = require_admin(&state, &session).await?;
    let id = UserId::new(path.into_inner());
    let role = state.accounts.edit_role(&caller, id).await?;
    Ok(web::Json(MessageResponse::new(format!(
        "User with id: {id} has role changed to {role}"
    ))))
}

#[patch("/users/add_to_favorites/{book_id}")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let caller = require_user(&state, &session).await?;
    state
        .accounts
        .add_favorite(&caller, BookId::new(path.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse::new(
        "Book added to favorites successfully",
    )))
}

#[patch("/users/remove_from_favorites/{book_id}")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let caller = require_user(&state, &session).await?;
    state
        .accounts
        .remove_favorite(&caller, BookId::new(path.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse::new(
        "Book removed from favorites successfully",
    )))
}
