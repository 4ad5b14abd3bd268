use std::sync::Arc;

use async_trait::async_trait;
use motorchain_common::{Address, ConditionalSync, ObjectId};

use crate::{
    ChainEvent, ChainQueryError, Cursor, DynamicFieldName, ObjectData, ObjectFilter, Page,
};

/// Read-only view of the chain.
///
/// Every method may fail with a [`ChainQueryError`]; callers are expected to
/// catch it rather than let it escape to the UI.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait ChainQuery: ConditionalSync {
    /// One page of objects owned by `owner` that pass `filter`.
    async fn get_owned_objects(
        &self,
        owner: &Address,
        filter: &ObjectFilter,
        cursor: Option<&Cursor>,
    ) -> Result<Page<ObjectData>, ChainQueryError>;

    /// A single object, or `None` if it does not exist.
    async fn get_object(&self, id: &ObjectId) -> Result<Option<ObjectData>, ChainQueryError>;

    /// The dynamic field of `parent` stored under `name`, or `None` if there
    /// is no such entry.
    async fn get_dynamic_field_object(
        &self,
        parent: &ObjectId,
        name: &DynamicFieldName,
    ) -> Result<Option<ObjectData>, ChainQueryError>;

    /// One page of events of the given Move type, oldest first.
    async fn query_events(
        &self,
        event_type: &str,
        cursor: Option<&Cursor>,
    ) -> Result<Page<ChainEvent>, ChainQueryError>;
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<T> ChainQuery for Arc<T>
where
    T: ChainQuery + ?Sized,
{
    async fn get_owned_objects(
        &self,
        owner: &Address,
        filter: &ObjectFilter,
        cursor: Option<&Cursor>,
    ) -> Result<Page<ObjectData>, ChainQueryError> {
        T::get_owned_objects(self, owner, filter, cursor).await
    }

    async fn get_object(&self, id: &ObjectId) -> Result<Option<ObjectData>, ChainQueryError> {
        T::get_object(self, id).await
    }

    async fn get_dynamic_field_object(
        &self,
        parent: &ObjectId,
        name: &DynamicFieldName,
    ) -> Result<Option<ObjectData>, ChainQueryError> {
        T::get_dynamic_field_object(self, parent, name).await
    }

    async fn query_events(
        &self,
        event_type: &str,
        cursor: Option<&Cursor>,
    ) -> Result<Page<ChainEvent>, ChainQueryError> {
        T::query_events(self, event_type, cursor).await
    }
}

/// Upper bound on pages followed by the `collect_*` helpers.
pub const MAX_PAGES: usize = 64;

/// Follows `get_owned_objects` pagination to the end and returns every
/// object in the node's order. Any failing page fails the whole collection,
/// as does running past [`MAX_PAGES`].
pub async fn collect_owned_objects<C>(
    chain: &C,
    owner: &Address,
    filter: &ObjectFilter,
) -> Result<Vec<ObjectData>, ChainQueryError>
where
    C: ChainQuery + ?Sized,
{
    let mut objects = Vec::new();
    let mut cursor = None;

    for _ in 0..MAX_PAGES {
        let page = chain
            .get_owned_objects(owner, filter, cursor.as_ref())
            .await?;
        objects.extend(page.data);

        match (page.has_next_page, page.next_cursor) {
            (true, Some(next)) => cursor = Some(next),
            _ => return Ok(objects),
        }
    }

    tracing::warn!(%owner, pages = MAX_PAGES, "Stopped following owned object pages");
    Err(ChainQueryError::TooManyPages {
        method: "suix_getOwnedObjects",
        pages: MAX_PAGES,
    })
}

/// Follows `query_events` pagination to the end. Fails once [`MAX_PAGES`]
/// pages have been read without reaching it.
pub async fn collect_events<C>(
    chain: &C,
    event_type: &str,
) -> Result<Vec<ChainEvent>, ChainQueryError>
where
    C: ChainQuery + ?Sized,
{
    let mut events = Vec::new();
    let mut cursor = None;

    for _ in 0..MAX_PAGES {
        let page = chain.query_events(event_type, cursor.as_ref()).await?;
        events.extend(page.data);

        match (page.has_next_page, page.next_cursor) {
            (true, Some(next)) => cursor = Some(next),
            _ => return Ok(events),
        }
    }

    tracing::warn!(event_type, pages = MAX_PAGES, "Stopped following event pages");
    Err(ChainQueryError::TooManyPages {
        method: "suix_queryEvents",
        pages: MAX_PAGES,
    })
}
