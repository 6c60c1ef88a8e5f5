//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod books;
pub mod catalogue;
pub mod error;
pub mod health;
pub mod order_history;
pub mod orders;
pub mod reviews;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;
use serde::{Deserialize, Serialize};

pub use crate::domain::ApiResult;

/// Plain acknowledgement body: `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Register extractor error handlers and every library endpoint.
///
/// Health probes are registered separately because they need
/// `Data<HealthState>` rather than the port bundle.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(users::register)
        .service(users::verify_email)
        .service(users::login)
        .service(users::logout)
        .service(users::all_users)
        .service(users::block_user)
        .service(users::edit_role)
        .service(users::add_favorite)
        .service(users::remove_favorite)
        .service(books::all_books)
        .service(books::books_by_genre_id)
        .service(books::books_by_genre_title)
        .service(books::books_by_author_id)
        .service(books::books_by_author_name)
        .service(books::create_book)
        .service(books::update_book_entirely)
        .service(books::update_book_details)
        .service(books::delete_book)
        .service(catalogue::update_author)
        .service(catalogue::delete_author)
        .service(catalogue::update_genre)
        .service(catalogue::delete_genre)
        .service(orders::all_orders)
        .service(orders::take_book)
        .service(orders::return_book)
        .service(order_history::all_history)
        .service(order_history::history_by_order)
        .service(order_history::my_history)
        .service(reviews::create_review)
        .service(reviews::all_reviews)
        .service(reviews::reviews_by_book)
        .service(reviews::update_review)
        .service(reviews::delete_review);
}
