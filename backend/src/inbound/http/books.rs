//! Catalogue endpoints for books.
//!
//! ```text
//! GET    /books/all?page=0&size=10
//! GET    /books/by_genre_id/{id}
//! GET    /books/by_genre_title/{title}
//! GET    /books/by_author_id/{id}
//! POST   /books/by_author_name {"name":"herbert"}
//! POST   /books/create
//! PUT    /books/update/entire/{id}
//! PUT    /books/update/details/{id}
//! DELETE /books/delete/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::PageRequest;
use crate::domain::{
    ApiResult, AuthorId, AuthorName, BookDetails, BookDraft, BookId, BookListing, GenreId,
};
use crate::inbound::http::MessageResponse;
use crate::inbound::http::auth::{require_admin, require_user};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_catalogue_validation;

/// Author named in a book submission.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookAuthorRequest {
    pub author_firstname: String,
    pub author_lastname: String,
}

/// Genre named in a book submission; only the title is used for matching.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookGenreRequest {
    pub title: String,
}

/// Full book submission used by create and entire update.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub publication_year: String,
    pub author: BookAuthorRequest,
    #[serde(default)]
    pub genres: Vec<BookGenreRequest>,
    pub quantity: i32,
}

impl BookRequest {
    fn into_draft(self) -> ApiResult<BookDraft> {
        let details = BookDetails::try_new(
            &self.title,
            self.description.as_deref(),
            &self.publication_year,
            self.quantity,
        )
        .map_err(map_catalogue_validation)?;
        let author = AuthorName::try_new(
            &self.author.author_firstname,
            &self.author.author_lastname,
        )
        .map_err(map_catalogue_validation)?;
        let titles: Vec<String> = self.genres.into_iter().map(|genre| genre.title).collect();
        BookDraft::try_new(details, author, &titles).map_err(map_catalogue_validation)
    }
}

/// Detail-only update body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookDetailsRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub publication_year: String,
    pub quantity: i32,
}

impl TryFrom<BookDetailsRequest> for BookDetails {
    type Error = crate::domain::Error;

    fn try_from(value: BookDetailsRequest) -> Result<Self, Self::Error> {
        BookDetails::try_new(
            &value.title,
            value.description.as_deref(),
            &value.publication_year,
            value.quantity,
        )
        .map_err(map_catalogue_validation)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthorNameQuery {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BookResponse {
    pub book_title: String,
    pub author_firstname: String,
    pub author_lastname: String,
    pub genre_title: Vec<String>,
    pub quantity: i32,
}

impl From<BookListing> for BookResponse {
    fn from(value: BookListing) -> Self {
        Self {
            book_title: value.book.title,
            author_firstname: value.author.firstname,
            author_lastname: value.author.lastname,
            genre_title: value.genres.into_iter().map(|genre| genre.title).collect(),
            quantity: value.book.quantity,
        }
    }
}

fn listings(books: Vec<BookListing>) -> web::Json<Vec<BookResponse>> {
    web::Json(books.into_iter().map(BookResponse::from).collect())
}

/// Paged catalogue listing; public.
#[get("/books/all")]
pub async fn all_books(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Vec<BookResponse>>> {
    let PageQuery { page, size } = query.into_inner();
    let page = PageRequest::try_new(page, size)?;
    Ok(listings(state.books_query.list_books(page).await?))
}

#[get("/books/by_genre_id/{id}")]
pub async fn books_by_genre_id(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<BookResponse>>> {
    require_user(&state, &session).await?;
    let books = state
        .books_query
        .books_by_genre_id(GenreId::new(path.into_inner()))
        .await?;
    Ok(listings(books))
}

#[get("/books/by_genre_title/{title}")]
pub async fn books_by_genre_title(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<BookResponse>>> {
    require_user(&state, &session).await?;
    Ok(listings(state.books_query.books_by_genre_title(&path).await?))
}

#[get("/books/by_author_id/{id}")]
pub async fn books_by_author_id(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<BookResponse>>> {
    require_user(&state, &session).await?;
    let books = state
        .books_query
        .books_by_author_id(AuthorId::new(path.into_inner()))
        .await?;
    Ok(listings(books))
}

/// Author search takes a JSON body, so it is a POST.
#[post("/books/by_author_name")]
pub async fn books_by_author_name(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AuthorNameQuery>,
) -> ApiResult<web::Json<Vec<BookResponse>>> {
    require_user(&state, &session).await?;
    Ok(listings(
        state.books_query.books_by_author_name(&payload.name).await?,
    ))
}

#[post("/books/create")]
pub async fn create_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BookRequest>,
) -> ApiResult<HttpResponse> {
    let caller = require_admin(&state, &session).await?;
    let draft = payload.into_inner().into_draft()?;
    let listing = state.books.create_book(&caller, draft).await?;
    Ok(HttpResponse::Created().json(BookResponse::from(listing)))
}

#[put("/books/update/entire/{id}")]
pub async fn update_book_entirely(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<BookRequest>,
) -> ApiResult<web::Json<BookResponse>> {
    let caller = require_admin(&state, &session).await?;
    let draft = payload.into_inner().into_draft()?;
    let listing = state
        .books
        .update_book_entirely(&caller, BookId::new(path.into_inner()), draft)
        .await?;
    Ok(web::Json(listing.into()))
}

#[put("/books/update/details/{id}")]
pub async fn update_book_details(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<BookDetailsRequest>,
) -> ApiResult<web::Json<BookResponse>> {
    let caller = require_admin(&state, &session).await?;
    let details = BookDetails::try_from(payload.into_inner())?;
    let listing = state
        .books
        .update_book_details(&caller, BookId::new(path.into_inner()), details)
        .await?;
    Ok(web::Json(listing.into()))
}

#[delete("/books/delete/{id}")]
pub async fn delete_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let caller = require_admin(&state, &session).await?;
    let id = BookId::new(path.into_inner());
    state.books.delete_book(&caller, id).await?;
    Ok(web::Json(MessageResponse::new(format!(
        "Book with id: {id} deleted successfully"
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Author, Book, Error, Genre, Role, UserId};
    use crate::inbound::http::test_utils::{TestPorts, login_as_session_user, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn listing() -> BookListing {
        BookListing {
            book: Book {
                id: BookId::new(1),
                title: "Dune".to_owned(),
                description: None,
                publication_year: "1965".to_owned(),
                quantity: 2,
                author_id: AuthorId::new(1),
                genre_ids: vec![GenreId::new(1)],
                created_by: UserId::new(7),
            },
            author: Author {
                id: AuthorId::new(1),
                firstname: "Frank".to_owned(),
                lastname: "Herbert".to_owned(),
                date_of_birth: None,
                birthplace: None,
            },
            genres: vec![Genre {
                id: GenreId::new(1),
                title: "Science fiction".to_owned(),
                description: None,
            }],
        }
    }

    fn book_body() -> Value {
        json!({
            "title": "Dune",
            "publication_year": "1965",
            "author": {"author_firstname": "Frank", "author_lastname": "Herbert"},
            "genres": [{"title": "Science fiction"}],
            "quantity": 2,
        })
    }

    #[rstest]
    #[actix_web::test]
    async fn all_books_is_public_and_paged() {
        let mut ports = TestPorts::default();
        ports
            .books_query
            .expect_list_books()
            .withf(|page| page.offset() == 20 && page.limit() == 10)
            .times(1)
            .returning(|_| Ok(vec![listing()]));
        let app = test::init_service(test_app(ports)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/books/all?page=2&size=10")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            json!([{
                "book_title": "Dune",
                "author_firstname": "Frank",
                "author_lastname": "Herbert",
                "genre_title": ["Science fiction"],
                "quantity": 2,
            }])
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn oversized_pages_are_rejected() {
        let mut ports = TestPorts::default();
        ports.books_query.expect_list_books().never();
        let app = test::init_service(test_app(ports)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/books/all?size=500").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn create_book_returns_created_listing() {
        let mut ports = TestPorts::default().signed_in_as(Role::Admin);
        ports
            .books
            .expect_create_book()
            .withf(|_, draft| {
                draft.details().title() == "Dune"
                    && draft.author().lastname() == "Herbert"
                    && draft.genre_titles() == ["Science fiction".to_owned()]
            })
            .times(1)
            .returning(|_, _| Ok(listing()));
        let app = test::init_service(test_app(ports)).await;
        let cookie = login_as_session_user(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/books/create")
                .cookie(cookie)
                .set_json(book_body())
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[rstest]
    #[actix_web::test]
    async fn create_book_validates_before_calling_the_service() {
        let mut ports = TestPorts::default().signed_in_as(Role::Admin);
        ports.books.expect_create_book().never();
        let app = test::init_service(test_app(ports)).await;
        let cookie = login_as_session_user(&app).await;
        let mut body = book_body();
        body["publication_year"] = json!("19655");

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/books/create")
                .cookie(cookie)
                .set_json(body)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body.pointer("/details/field").and_then(Value::as_str),
            Some("publication_year")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_book_is_conflict() {
        let mut ports = TestPorts::default().signed_in_as(Role::Admin);
        ports
            .books
            .expect_update_book_entirely()
            .returning(|_, _, _| Err(Error::conflict("Such a book already exists!")));
        let app = test::init_service(test_app(ports)).await;
        let cookie = login_as_session_user(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/books/update/entire/1")
                .cookie(cookie)
                .set_json(book_body())
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[rstest]
    #[actix_web::test]
    async fn author_search_reads_name_from_body() {
        let mut ports = TestPorts::default().signed_in_as(Role::User);
        ports
            .books_query
            .expect_books_by_author_name()
            .withf(|name| name == "herb")
            .times(1)
            .returning(|_| Err(Error::not_found("Author not found!")));
        let app = test::init_service(test_app(ports)).await;
        let cookie = login_as_session_user(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/books/by_author_name")
                .cookie(cookie)
                .set_json(json!({"name": "herb"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_book_reports_message() {
        let mut ports = TestPorts::default().signed_in_as(Role::Admin);
        ports
            .books
            .expect_delete_book()
            .withf(|_, id| *id == BookId::new(5))
            .returning(|_, _| Ok(()));
        let app = test::init_service(test_app(ports)).await;
        let cookie = login_as_session_user(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/books/delete/5")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: MessageResponse = test::read_body_json(res).await;
        assert_eq!(body.message, "Book with id: 5 deleted successfully");
    }
}
