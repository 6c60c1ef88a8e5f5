//! Admin maintenance of authors and genres.
//!
//! ```text
//! PUT    /authors/update/{id}
//! DELETE /authors/delete/{id}
//! PUT    /genres/update/{id}
//! DELETE /genres/delete/{id}
//! ```

use actix_web::{delete, put, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{ApiResult, AuthorDraft, AuthorId, GenreDraft, GenreId};
use crate::inbound::http::MessageResponse;
use crate::inbound::http::auth::require_admin;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_catalogue_validation;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthorRequest {
    pub author_firstname: String,
    pub author_lastname: String,
    #[serde(default)]
    pub author_date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub author_birthplace: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenreRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[put("/authors/update/{id}")]
pub async fn update_author(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<AuthorRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    require_admin(&state, &session).await?;
    let body = payload.into_inner();
    let draft = AuthorDraft::try_new(
        &body.author_firstname,
        &body.author_lastname,
        body.author_date_of_birth,
        body.author_birthplace.as_deref(),
    )
    .map_err(map_catalogue_validation)?;
    let id = AuthorId::new(path.into_inner());
    state.authors.update_author(id, draft).await?;
    Ok(web::Json(MessageResponse::new(format!(
        "Author with id: {id} successfully updated!"
    ))))
}

#[delete("/authors/delete/{id}")]
pub async fn delete_author(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    require_admin(&state, &session).await?;
    let id = AuthorId::new(path.into_inner());
    state.authors.delete_author(id).await?;
    Ok(web::Json(MessageResponse::new(format!(
        "Author with id: {id} deleted successfully"
    ))))
}

#[put("/genres/update/{id}")]
pub async fn update_genre(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<GenreRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    require_admin(&state, &session).await?;
    let draft = GenreDraft::try_new(&payload.title, payload.description.as_deref())
        .map_err(map_catalogue_validation)?;
    let id = GenreId::new(path.into_inner());
    state.genres.update_genre(id, draft).await?;
    Ok(web::Json(MessageResponse::new(format!(
        "Genre with id: {id} updated successfully!"
    ))))
}

#[delete("/genres/delete/{id}")]
pub async fn delete_genre(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    require_admin(&state, &session).await?;
    let id = GenreId::new(path.into_inner());
    state.genres.delete_genre(id).await?;
    Ok(web::Json(MessageResponse::new(format!(
        "Genre with id: {id} deleted successfully"
    ))))
}
