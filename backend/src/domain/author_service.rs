//! Author maintenance service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{AuthorCommand, AuthorRepository};
use crate::domain::repository_errors::map_catalogue_error;
use crate::domain::{AuthorDraft, AuthorId, Error};

fn author_not_found(id: AuthorId) -> Error {
    Error::not_found(format!("Author with id: {id} not found!"))
}

pub struct AuthorService<A> {
    authors: Arc<A>,
}

impl<A> AuthorService<A> {
    pub fn new(authors: Arc<A>) -> Self {
        Self { authors }
    }
}

#[async_trait]
impl<A> AuthorCommand for AuthorService<A>
where
    A: AuthorRepository,
{
    async fn update_author(&self, id: AuthorId, draft: AuthorDraft) -> Result<(), Error> {
        let namesake = self
            .authors
            .find_by_name(draft.name.firstname(), draft.name.lastname())
            .await
            .map_err(map_catalogue_error)?;
        if namesake.is_some_and(|author| author.id != id) {
            return Err(Error::conflict("Such an author already exists!"));
        }
        self.authors
            .update(id, &draft)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| author_not_found(id))?;
        info!(author_id = %id, "author updated");
        Ok(())
    }

    async fn delete_author(&self, id: AuthorId) -> Result<(), Error> {
        if self
            .authors
            .has_books(id)
            .await
            .map_err(map_catalogue_error)?
        {
            return Err(Error::conflict(
                "It is not possible to delete an author. The author is associated with several books. To delete this author, delete all related books.",
            ));
        }
        if !self
            .authors
            .delete(id)
            .await
            .map_err(map_catalogue_error)?
        {
            return Err(author_not_found(id));
        }
        info!(author_id = %id, "author deleted");
        Ok(())
    }
}
