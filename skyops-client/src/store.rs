//! Storage seam for UI code.

use async_trait::async_trait;
use skyops_model::{Entity, SerializeOptions};
use skyops_types::EntityKind;

use crate::client::{EntityClient, Page};
use crate::error::ClientResult;
use crate::query::ListQuery;

/// CRUD over one entity kind.
///
/// [`EntityClient`] is the HTTP implementation; tests substitute their own.
#[async_trait]
pub trait EntityStore: Send + Sync {
    fn kind(&self) -> EntityKind;

    async fn list(&self, query: &ListQuery) -> ClientResult<Page>;

    async fn get(&self, id: &str) -> ClientResult<Entity>;

    /// Validates and writes `entity`, returning the stored state.
    async fn save(&self, entity: &Entity, options: &SerializeOptions) -> ClientResult<Entity>;

    async fn delete(&self, id: &str) -> ClientResult<()>;
}

#[async_trait]
impl EntityStore for EntityClient {
    fn kind(&self) -> EntityKind {
        EntityClient::kind(self)
    }

    async fn list(&self, query: &ListQuery) -> ClientResult<Page> {
        EntityClient::list(self, query).await
    }

    async fn get(&self, id: &str) -> ClientResult<Entity> {
        EntityClient::get(self, id).await
    }

    async fn save(&self, entity: &Entity, options: &SerializeOptions) -> ClientResult<Entity> {
        EntityClient::save(self, entity, options).await
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        EntityClient::delete(self, id).await
    }
}
