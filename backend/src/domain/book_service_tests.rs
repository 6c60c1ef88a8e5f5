//! Tests for the catalogue service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ports::{MockAuthorRepository, MockBookRepository, MockGenreRepository};
use crate::domain::test_fixtures::{admin, book, listing};
use crate::domain::{ErrorCode, UserId};

type Service = BookService<MockBookRepository, MockAuthorRepository, MockGenreRepository>;

fn service(
    books: MockBookRepository,
    authors: MockAuthorRepository,
    genres: MockGenreRepository,
) -> Service {
    BookService::new(Arc::new(books), Arc::new(authors), Arc::new(genres))
}

fn draft() -> BookDraft {
    let details = BookDetails::try_new("Dune", None, "1965", 3).expect("valid details");
    let author = AuthorName::try_new("Frank", "Herbert").expect("valid author");
    BookDraft::try_new(details, author, &["Science fiction".to_owned()]).expect("valid draft")
}

fn herbert() -> Author {
    Author {
        id: AuthorId::new(1),
        firstname: "Frank".to_owned(),
        lastname: "Herbert".to_owned(),
        date_of_birth: None,
        birthplace: None,
    }
}

fn science_fiction() -> Genre {
    Genre {
        id: GenreId::new(1),
        title: "Science fiction".to_owned(),
        description: None,
    }
}

#[tokio::test]
async fn create_book_creates_missing_author_and_genres() {
    let mut authors = MockAuthorRepository::new();
    authors.expect_find_by_name().return_once(|_, _| Ok(None));
    authors
        .expect_insert()
        .times(1)
        .return_once(|_| Ok(herbert()));
    let mut genres = MockGenreRepository::new();
    genres
        .expect_find_by_title()
        .withf(|title| title == "Science fiction")
        .return_once(|_| Ok(None));
    genres
        .expect_insert()
        .times(1)
        .return_once(|_| Ok(science_fiction()));
    let mut books = MockBookRepository::new();
    books.expect_exists().times(0);
    books
        .expect_insert()
        .withf(|new_book| new_book.created_by == UserId::new(5) && new_book.genre_ids.len() == 1)
        .return_once(|new_book| {
            Ok(Book {
                id: BookId::new(10),
                title: new_book.details.title().to_owned(),
                description: None,
                publication_year: "1965".to_owned(),
                quantity: new_book.details.quantity(),
                author_id: new_book.author_id,
                genre_ids: new_book.genre_ids.clone(),
                created_by: new_book.created_by,
            })
        });

    let created = service(books, authors, genres)
        .create_book(&admin(5), draft())
        .await
        .expect("book created");

    assert_eq!(created.book.id, BookId::new(10));
    assert_eq!(created.author.lastname, "Herbert");
    assert_eq!(created.genres, vec![science_fiction()]);
}

#[tokio::test]
async fn create_book_rejects_duplicates_before_writing() {
    let mut authors = MockAuthorRepository::new();
    authors
        .expect_find_by_name()
        .return_once(|_, _| Ok(Some(herbert())));
    authors.expect_insert().times(0);
    let mut books = MockBookRepository::new();
    books
        .expect_exists()
        .withf(|identity| identity.title == "Dune" && identity.excluding.is_none())
        .return_once(|_| Ok(true));
    books.expect_insert().times(0);

    let err = service(books, authors, MockGenreRepository::new())
        .create_book(&admin(5), draft())
        .await
        .expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "Such a book already exists!");
}

#[tokio::test]
async fn update_requires_the_creating_admin() {
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .return_once(|_| Ok(Some(book(7, 1))));
    books.expect_update().times(0);

    let err = service(books, MockAuthorRepository::new(), MockGenreRepository::new())
        .update_book_entirely(&admin(5), BookId::new(7), draft())
        .await
        .expect_err("not the creator");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.message(), "You cannot edit this book");
}

#[tokio::test]
async fn update_details_keeps_author_and_genres() {
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .return_once(|_| Ok(Some(book(7, 1))));
    books
        .expect_exists()
        .withf(|identity| identity.excluding == Some(BookId::new(7)))
        .return_once(|_| Ok(false));
    books
        .expect_update()
        .withf(|update| update.author_id == AuthorId::new(1) && update.details.quantity() == 4)
        .return_once(|_| Ok(Some(book(7, 4))));
    books
        .expect_find_listing()
        .return_once(|_| Ok(Some(listing(book(7, 4)))));
    let details = BookDetails::try_new("Dune", Some("Spice"), "1965", 4).expect("valid details");

    let updated = service(books, MockAuthorRepository::new(), MockGenreRepository::new())
        .update_book_details(&admin(99), BookId::new(7), details)
        .await
        .expect("details updated");

    assert_eq!(updated.book.quantity, 4);
}

#[tokio::test]
async fn delete_refuses_ordered_books() {
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .return_once(|_| Ok(Some(book(7, 1))));
    books.expect_has_orders().return_once(|_| Ok(true));
    books.expect_delete().times(0);

    let err = service(books, MockAuthorRepository::new(), MockGenreRepository::new())
        .delete_book(&admin(99), BookId::new(7))
        .await
        .expect_err("ordered book");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn delete_reports_unknown_books() {
    let mut books = MockBookRepository::new();
    books.expect_find_by_id().return_once(|_| Ok(None));

    let err = service(books, MockAuthorRepository::new(), MockGenreRepository::new())
        .delete_book(&admin(99), BookId::new(3))
        .await
        .expect_err("unknown book");

    assert_eq!(err.message(), "Book with id: 3 not found!");
}

#[rstest]
#[tokio::test]
async fn empty_genre_listing_is_not_found() {
    let mut books = MockBookRepository::new();
    books.expect_list_by_genre_id().return_once(|_| Ok(Vec::new()));

    let err = service(books, MockAuthorRepository::new(), MockGenreRepository::new())
        .books_by_genre_id(GenreId::new(2))
        .await
        .expect_err("no books");

    assert_eq!(err.message(), "Genre not found!");
}

#[tokio::test]
async fn author_name_search_trims_the_fragment() {
    let mut books = MockBookRepository::new();
    books
        .expect_list_by_author_name()
        .withf(|fragment| fragment == "herb")
        .return_once(|_| Ok(vec![listing(book(7, 1))]));

    let found = service(books, MockAuthorRepository::new(), MockGenreRepository::new())
        .books_by_author_name("  herb ")
        .await
        .expect("books found");

    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn blank_search_fragments_are_invalid() {
    let err = service(
        MockBookRepository::new(),
        MockAuthorRepository::new(),
        MockGenreRepository::new(),
    )
    .books_by_genre_title(" ")
    .await
    .expect_err("blank fragment");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn list_books_applies_page_offset() {
    let mut books = MockBookRepository::new();
    books
        .expect_list_page()
        .with(eq(20_i64), eq(10_i64))
        .return_once(|_, _| Ok(Vec::new()));

    let page = PageRequest::try_new(Some(2), None).expect("valid page");
    let listed = service(books, MockAuthorRepository::new(), MockGenreRepository::new())
        .list_books(page)
        .await
        .expect("listing succeeds");

    assert!(listed.is_empty());
}
