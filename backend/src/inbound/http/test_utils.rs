//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};
use std::sync::Arc;

use crate::domain::ports::{
    MockAccountCommand, MockAuthorCommand, MockBookCommand, MockBookQuery, MockGenreCommand,
    MockLoginService, MockOrderCommand, MockOrderHistoryQuery, MockOrderQuery, MockReviewCommand,
    MockReviewQuery, MockUsersQuery,
};
use crate::domain::{ApiResult, Caller, Role, UserId};

use super::session::SessionContext;
use super::state::HttpState;

/// User id stored in sessions created by [`login_as_session_user`].
pub const SESSION_USER: i64 = 7;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

pub fn caller_with_role(id: UserId, role: Role) -> Caller {
    Caller {
        id,
        email: format!("user{id}@library.test"),
        role,
    }
}

/// One mock per driving port; set expectations, then call
/// [`TestPorts::into_state`].
#[derive(Default)]
pub struct TestPorts {
    pub login: MockLoginService,
    pub users: MockUsersQuery,
    pub accounts: MockAccountCommand,
    pub orders: MockOrderCommand,
    pub orders_query: MockOrderQuery,
    pub history_query: MockOrderHistoryQuery,
    pub books: MockBookCommand,
    pub books_query: MockBookQuery,
    pub authors: MockAuthorCommand,
    pub genres: MockGenreCommand,
    pub reviews: MockReviewCommand,
    pub reviews_query: MockReviewQuery,
}

impl TestPorts {
    /// Resolve every session to [`SESSION_USER`] holding `role`.
    pub fn signed_in_as(mut self, role: Role) -> Self {
        self.users
            .expect_caller()
            .returning(move |id| Ok(caller_with_role(id, role)));
        self
    }

    pub fn into_state(self) -> HttpState {
        HttpState {
            login: Arc::new(self.login),
            users: Arc::new(self.users),
            accounts: Arc::new(self.accounts),
            orders: Arc::new(self.orders),
            orders_query: Arc::new(self.orders_query),
            history_query: Arc::new(self.history_query),
            books: Arc::new(self.books),
            books_query: Arc::new(self.books_query),
            authors: Arc::new(self.authors),
            genres: Arc::new(self.genres),
            reviews: Arc::new(self.reviews),
            reviews_query: Arc::new(self.reviews_query),
        }
    }
}

async fn seed_session(session: SessionContext, id: web::Path<i64>) -> ApiResult<HttpResponse> {
    session.persist_user(UserId::new(id.into_inner()))?;
    Ok(HttpResponse::Ok().finish())
}

/// Full route table over mocked ports plus a `/test/session/{id}` helper
/// that signs a session in.
pub fn test_app(
    ports: TestPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(test_session_middleware())
        .app_data(web::Data::new(ports.into_state()))
        .route("/test/session/{id}", web::get().to(seed_session))
        .configure(super::configure)
}

/// GET `uri` and return the session cookie it sets.
pub async fn session_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    uri: &str,
) -> Cookie<'static> {
    let res = test::call_service(app, test::TestRequest::get().uri(uri).to_request()).await;
    assert!(res.status().is_success(), "session seed failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Session cookie for [`SESSION_USER`].
pub async fn login_as_session_user(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
) -> Cookie<'static> {
    session_cookie(app, &format!("/test/session/{SESSION_USER}")).await
}
