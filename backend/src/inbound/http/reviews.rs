//! Review endpoints.
//!
//! ```text
//! POST   /reviews/create {"book_id":1,"comment":"..."}
//! GET    /reviews/all
//! GET    /reviews/by_book/{book_id}
//! PATCH  /reviews/update/{id} {"comment":"..."}
//! DELETE /reviews/delete/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{ApiResult, BookId, ReviewComment, ReviewId, ReviewView};
use crate::inbound::http::MessageResponse;
use crate::inbound::http::auth::{require_admin, require_user};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_review_validation;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewRequest {
    pub book_id: BookId,
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewUpdateRequest {
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReviewResponse {
    pub comment: String,
    pub user_firstname: String,
    pub user_lastname: String,
}

impl From<ReviewView> for ReviewResponse {
    fn from(value: ReviewView) -> Self {
        Self {
            comment: value.review.comment,
            user_firstname: value.user_firstname,
            user_lastname: value.user_lastname,
        }
    }
}

fn reviews(views: Vec<ReviewView>) -> web::Json<Vec<ReviewResponse>> {
    web::Json(views.into_iter().map(ReviewResponse::from).collect())
}

#[post("/reviews/create")]
pub async fn create_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let caller = require_user(&state, &session).await?;
    let comment = ReviewComment::new(&payload.comment).map_err(map_review_validation)?;
    let view = state
        .reviews
        .create_review(&caller, payload.book_id, comment)
        .await?;
    Ok(HttpResponse::Created().json(ReviewResponse::from(view)))
}

#[get("/reviews/all")]
pub async fn all_reviews(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ReviewResponse>>> {
    require_admin(&state, &session).await?;
    Ok(reviews(state.reviews_query.all_reviews().await?))
}

#[get("/reviews/by_book/{book_id}")]
pub async fn reviews_by_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<ReviewResponse>>> {
    require_user(&state, &session).await?;
    let views = state
        .reviews_query
        .reviews_by_book(BookId::new(path.into_inner()))
        .await?;
    Ok(reviews(views))
}

/// Authors may only edit their own reviews.
#[patch("/reviews/update/{id}")]
pub async fn update_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<ReviewUpdateRequest>,
) -> ApiResult<web::Json<ReviewResponse>> {
    let caller = require_user(&state, &session).await?;
    let comment = ReviewComment::new(&payload.comment).map_err(map_review_validation)?;
    let view = state
        .reviews
        .update_review(&caller, ReviewId::new(path.into_inner()), comment)
        .await?;
    Ok(web::Json(view.into()))
}

#[delete("/reviews/delete/{id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let caller = require_user(&state, &session).await?;
    let id = ReviewId::new(path.into_inner());
    state.reviews.delete_review(&caller, id).await?;
    Ok(web::Json(MessageResponse::new(format!(
        "Review with id: {id} deleted successfully!"
    ))))
}
