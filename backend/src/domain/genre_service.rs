//! Genre maintenance service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{GenreCommand, GenreRepository};
use crate::domain::repository_errors::map_catalogue_error;
use crate::domain::{Error, GenreDraft, GenreId};

fn genre_not_found(id: GenreId) -> Error {
    Error::not_found(format!("Genre with id: {id} not found!"))
}

pub struct GenreService<G> {
    genres: Arc<G>,
}

impl<G> GenreService<G> {
    pub fn new(genres: Arc<G>) -> Self {
        Self { genres }
    }
}

#[async_trait]
impl<G> GenreCommand for GenreService<G>
where
    G: GenreRepository,
{
    async fn update_genre(&self, id: GenreId, draft: GenreDraft) -> Result<(), Error> {
        let namesake = self
            .genres
            .find_by_title(&draft.title)
            .await
            .map_err(map_catalogue_error)?;
        if namesake.is_some_and(|genre| genre.id != id) {
            return Err(Error::conflict("Such a genre already exists!"));
        }
        self.genres
            .update(id, &draft)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| genre_not_found(id))?;
        info!(genre_id = %id, "genre updated");
        Ok(())
    }

    async fn delete_genre(&self, id: GenreId) -> Result<(), Error> {
        if self
            .genres
            .has_books(id)
            .await
            .map_err(map_catalogue_error)?
        {
            return Err(Error::conflict(
                "It is not possible to delete a genre. The genre is associated with several books. To delete this genre, delete all related books.",
            ));
        }
        if !self
            .genres
            .delete(id)
            .await
            .map_err(map_catalogue_error)?
        {
            return Err(genre_not_found(id));
        }
        info!(genre_id = %id, "genre deleted");
        Ok(())
    }
}
