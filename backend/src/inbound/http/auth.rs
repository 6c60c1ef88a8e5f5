//! Role gates used by HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! identity resolution here. A gate reads the user id from the session,
//! resolves it into a [`Caller`] through [`UsersQuery`] and checks the role
//! the endpoint demands.
//!
//! - no session, or a session for a deleted account: `401`
//! - inactive (blocked or unverified) account: `403`
//! - wrong role: `403`
//!
//! [`UsersQuery`]: crate::domain::ports::UsersQuery

use crate::domain::{ApiResult, Caller, Error, Role};

use super::session::SessionContext;
use super::state::HttpState;

/// Resolve the session into a caller without checking its role.
pub async fn current_caller(state: &HttpState, session: &SessionContext) -> ApiResult<Caller> {
    let user_id = session.require_user_id()?;
    state.users.caller(user_id).await
}

/// Resolve the caller and require `role`.
pub async fn require_role(
    state: &HttpState,
    session: &SessionContext,
    role: Role,
) -> ApiResult<Caller> {
    let caller = current_caller(state, session).await?;
    if caller.role != role {
        return Err(Error::forbidden("Access denied"));
    }
    Ok(caller)
}

/// Gate for endpoints reserved to readers (`ROLE_USER`).
pub async fn require_user(state: &HttpState, session: &SessionContext) -> ApiResult<Caller> {
    require_role(state, session, Role::User).await
}

/// Gate for endpoints reserved to administrators (`ROLE_ADMIN`).
pub async fn require_admin(state: &HttpState, session: &SessionContext) -> ApiResult<Caller> {
    require_role(state, session, Role::Admin).await
}
