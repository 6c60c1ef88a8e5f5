//! Tests for the account service.

use std::sync::Arc;

use chrono::Duration;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockBookRepository, MockNotificationSender, MockPasswordHasher, MockUserRepository,
    MockVerificationTokenRepository, PasswordHashError,
};
use crate::domain::test_fixtures::{admin, book, fixture_clock, fixture_now, reader};
use crate::domain::ErrorCode;

#[derive(Default)]
struct Mocks {
    users: MockUserRepository,
    tokens: MockVerificationTokenRepository,
    books: MockBookRepository,
    hasher: MockPasswordHasher,
    notifier: MockNotificationSender,
}

impl Mocks {
    fn service(self) -> AccountService {
        let ports = AccountPorts {
            users: Arc::new(self.users),
            tokens: Arc::new(self.tokens),
            books: Arc::new(self.books),
            hasher: Arc::new(self.hasher),
            notifier: Arc::new(self.notifier),
        };
        AccountService::new(ports, fixture_clock(), "https://library.test/")
    }
}

fn user(id: i64, role: Role, is_active: bool) -> User {
    User {
        id: UserId::new(id),
        firstname: "Jane".to_owned(),
        lastname: "Doe".to_owned(),
        phone_number: "555-0100".to_owned(),
        email: format!("user{id}@example.com"),
        password_hash: "stored-hash".to_owned(),
        role,
        is_active,
        created_at: fixture_now(),
        admin_created_by: None,
        favorite_books: Vec::new(),
    }
}

fn registration() -> Registration {
    Registration::try_new("Jane", "Doe", "555-0100", "Jane@Example.com", "secret")
        .expect("valid registration")
}

#[tokio::test]
async fn register_stores_inactive_user_and_emails_link() {
    let mut mocks = Mocks::default();
    mocks.users.expect_find_by_email().return_once(|_| Ok(None));
    mocks
        .hasher
        .expect_hash()
        .returning(|_| Ok("hashed".to_owned()));
    mocks
        .users
        .expect_insert()
        .withf(|new_user| {
            new_user.email == "jane@example.com"
                && !new_user.is_active
                && new_user.role == Role::User
                && new_user.password_hash == "hashed"
        })
        .return_once(|_| Ok(user(3, Role::User, false)));
    mocks
        .tokens
        .expect_save()
        .withf(|token| token.expires_at == fixture_now() + Duration::minutes(15))
        .return_once(|_| Ok(()));
    mocks
        .notifier
        .expect_send_email_notification()
        .withf(|email, subject, message| {
            email == "jane@example.com"
                && subject == VERIFICATION_SUBJECT
                && message.contains("https://library.test/users/verify_email?token=")
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    let created = mocks
        .service()
        .register(registration())
        .await
        .expect("registration succeeds");

    assert_eq!(created.id, UserId::new(3));
}

#[tokio::test]
async fn register_fails_without_storing_when_hashing_fails() {
    let mut mocks = Mocks::default();
    mocks.users.expect_find_by_email().return_once(|_| Ok(None));
    mocks
        .hasher
        .expect_hash()
        .returning(|_| Err(PasswordHashError::hashing("cost not allowed")));
    mocks.users.expect_insert().times(0);
    mocks.tokens.expect_save().times(0);

    let err = mocks
        .service()
        .register(registration())
        .await
        .expect_err("hashing failure");

    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn register_rejects_taken_emails() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(user(1, Role::User, true))));
    mocks.users.expect_insert().times(0);

    let err = mocks
        .service()
        .register(registration())
        .await
        .expect_err("duplicate email");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn register_surfaces_mail_failures() {
    let mut mocks = Mocks::default();
    mocks.users.expect_find_by_email().return_once(|_| Ok(None));
    mocks
        .hasher
        .expect_hash()
        .returning(|_| Ok("hashed".to_owned()));
    mocks
        .users
        .expect_insert()
        .return_once(|_| Ok(user(3, Role::User, false)));
    mocks.tokens.expect_save().return_once(|_| Ok(()));
    mocks
        .notifier
        .expect_send_email_notification()
        .returning(|_, _, _| Err(Error::mail_delivery_failed("relay down")));

    let err = mocks
        .service()
        .register(registration())
        .await
        .expect_err("mail failure");

    assert_eq!(err.code(), ErrorCode::MailDeliveryFailed);
}

#[rstest]
#[case(Duration::minutes(5), true)]
#[case(Duration::minutes(-1), false)]
#[tokio::test]
async fn verify_email_honours_expiry(#[case] remaining: Duration, #[case] succeeds: bool) {
    let token = Uuid::new_v4();
    let mut mocks = Mocks::default();
    mocks.tokens.expect_find().return_once(move |_| {
        Ok(Some(VerificationToken {
            token,
            user_id: UserId::new(3),
            expires_at: fixture_now() + remaining,
        }))
    });
    mocks.tokens.expect_delete().times(1).return_once(|_| Ok(()));
    mocks
        .users
        .expect_set_active()
        .times(usize::from(succeeds))
        .returning(|_, _| Ok(()));

    let result = mocks.service().verify_email(token).await;

    match result {
        Ok(()) => assert!(succeeds),
        Err(err) => {
            assert!(!succeeds);
            assert_eq!(err.message(), "Token already expired");
        }
    }
}

#[tokio::test]
async fn verify_email_rejects_unknown_tokens() {
    let mut mocks = Mocks::default();
    mocks.tokens.expect_find().return_once(|_| Ok(None));

    let err = mocks
        .service()
        .verify_email(Uuid::new_v4())
        .await
        .expect_err("unknown token");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(true, true, None)]
#[case(true, false, Some(ErrorCode::Unauthorized))]
#[case(false, true, Some(ErrorCode::Forbidden))]
#[tokio::test]
async fn authenticate_checks_password_then_activity(
    #[case] active: bool,
    #[case] password_ok: bool,
    #[case] expected: Option<ErrorCode>,
) {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(user(4, Role::User, active))));
    mocks
        .hasher
        .expect_verify()
        .returning(move |_, _| Ok(password_ok));
    let credentials =
        LoginCredentials::try_from_parts("user4@example.com", "secret").expect("credentials");

    let result = mocks.service().authenticate(&credentials).await;

    assert_eq!(result.map_err(|err| err.code()).err(), expected);
}

#[tokio::test]
async fn caller_resolution_rejects_unknown_users() {
    let mut mocks = Mocks::default();
    mocks.users.expect_find_by_id().return_once(|_| Ok(None));

    let err = mocks
        .service()
        .caller(UserId::new(77))
        .await
        .expect_err("unknown user");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn block_toggles_and_notifies_when_blocking() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(user(4, Role::User, true))));
    mocks
        .users
        .expect_set_active()
        .withf(|id, active| *id == UserId::new(4) && !active)
        .return_once(|_, _| Ok(()));
    mocks
        .notifier
        .expect_send_email_notification()
        .withf(|_, subject, message| subject == BLOCKED_SUBJECT && message == BLOCKED_MESSAGE)
        .times(1)
        .returning(|_, _, _| Ok(()));

    let outcome = mocks
        .service()
        .block_user(&admin(1), UserId::new(4))
        .await
        .expect("block succeeds");

    assert_eq!(outcome, BlockOutcome::Blocked);
}

#[tokio::test]
async fn admins_cannot_be_blocked() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(user(2, Role::Admin, true))));
    mocks.users.expect_set_active().times(0);

    let err = mocks
        .service()
        .block_user(&admin(1), UserId::new(2))
        .await
        .expect_err("admin target");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn edit_role_claims_unowned_accounts() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(user(4, Role::User, true))));
    mocks
        .users
        .expect_set_role()
        .withf(|id, role, owner| {
            *id == UserId::new(4) && *role == Role::Admin && *owner == Some(UserId::new(1))
        })
        .return_once(|_, _, _| Ok(()));

    let role = mocks
        .service()
        .edit_role(&admin(1), UserId::new(4))
        .await
        .expect("role changed");

    assert_eq!(role, Role::Admin);
}

#[tokio::test]
async fn edit_role_is_limited_to_the_owning_admin() {
    let mut target = user(4, Role::Admin, true);
    target.admin_created_by = Some(UserId::new(9));
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(target)));
    mocks.users.expect_set_role().times(0);

    let err = mocks
        .service()
        .edit_role(&admin(1), UserId::new(4))
        .await
        .expect_err("other admin owns the role");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn readers_cannot_moderate() {
    let err = Mocks::default()
        .service()
        .block_user(&reader(1), UserId::new(4))
        .await
        .expect_err("reader caller");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn favourites_reject_duplicates() {
    let mut mocks = Mocks::default();
    mocks
        .books
        .expect_find_by_id()
        .return_once(|_| Ok(Some(book(7, 1))));
    mocks
        .users
        .expect_add_favorite()
        .return_once(|_, _| Ok(false));

    let err = mocks
        .service()
        .add_favorite(&reader(1), BookId::new(7))
        .await
        .expect_err("already a favourite");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn ensure_admin_creates_missing_account() {
    let mut mocks = Mocks::default();
    mocks.users.expect_find_by_email().return_once(|_| Ok(None));
    mocks
        .hasher
        .expect_hash()
        .returning(|_| Ok("hashed".to_owned()));
    mocks
        .users
        .expect_insert()
        .withf(|new_user| new_user.role == Role::Admin && new_user.is_active)
        .return_once(|_| Ok(user(1, Role::Admin, true)));

    let id = mocks
        .service()
        .ensure_admin("admin@library.test", "password")
        .await
        .expect("admin ensured");

    assert_eq!(id, UserId::new(1));
}
