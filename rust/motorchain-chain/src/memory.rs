//! A volatile [`ChainQuery`] for tests.
//!
//! Objects, dynamic fields and events are kept in insertion order, which is
//! also the order queries return them in. Failures can be injected per
//! method, and every call is counted so tests can assert on how many lookups
//! a resolver issued.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use motorchain_common::{Address, ObjectId};
use parking_lot::RwLock;
use serde_json::Value;

use crate::{
    ChainEvent, ChainQuery, ChainQueryError, Cursor, DynamicFieldName, ObjectData, ObjectFilter,
    Page, StructTag,
};

/// The [`ChainQuery`] method a call was made to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainMethod {
    /// [`ChainQuery::get_owned_objects`]
    OwnedObjects,
    /// [`ChainQuery::get_object`]
    Object,
    /// [`ChainQuery::get_dynamic_field_object`]
    DynamicField,
    /// [`ChainQuery::query_events`]
    Events,
}

#[derive(Default)]
struct MemoryChainState {
    objects: Vec<(Option<Address>, ObjectData)>,
    dynamic_fields: Vec<(ObjectId, DynamicFieldName, ObjectData)>,
    events: Vec<ChainEvent>,
    page_size: Option<usize>,
    failing: HashSet<ChainMethod>,
    failing_fields: Vec<DynamicFieldName>,
    calls: HashMap<ChainMethod, usize>,
    in_flight: usize,
    max_in_flight: usize,
}

impl MemoryChainState {
    fn enter(&mut self, method: ChainMethod) -> Result<(), ChainQueryError> {
        *self.calls.entry(method).or_default() += 1;

        if self.failing.contains(&method) {
            return Err(ChainQueryError::Transport(format!(
                "Injected failure for {method:?}"
            )));
        }

        Ok(())
    }

    fn paginate<T: Clone>(&self, items: Vec<T>, cursor: Option<&Cursor>) -> Page<T> {
        let start = cursor
            .and_then(|cursor| cursor.0.as_u64())
            .map(|offset| offset as usize)
            .unwrap_or(0);
        let remaining = items.len().saturating_sub(start);
        let take = self.page_size.unwrap_or(remaining).min(remaining);
        let end = start + take;
        let has_next_page = end < items.len();

        Page {
            data: items.into_iter().skip(start).take(take).collect(),
            next_cursor: has_next_page.then(|| Cursor(Value::from(end as u64))),
            has_next_page,
        }
    }
}

/// In-memory chain. Clones share state.
#[derive(Clone, Default)]
pub struct MemoryChain {
    state: Arc<RwLock<MemoryChainState>>,
}

impl MemoryChain {
    /// An empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits pages returned by paginated queries to `page_size` items.
    pub fn with_page_size(self, page_size: usize) -> Self {
        self.state.write().page_size = Some(page_size.max(1));
        self
    }

    /// Adds an object, optionally owned by an address.
    pub fn insert_object(&self, owner: Option<Address>, object: ObjectData) {
        self.state.write().objects.push((owner, object));
    }

    /// Moves an object to a new owner, keeping its position.
    pub fn transfer(&self, id: &ObjectId, owner: Option<Address>) {
        let mut state = self.state.write();
        for (current, object) in state.objects.iter_mut() {
            if &object.object_id == id {
                *current = owner;
            }
        }
    }

    /// Adds (or replaces) a dynamic field under `parent`.
    pub fn insert_dynamic_field(
        &self,
        parent: ObjectId,
        name: DynamicFieldName,
        object: ObjectData,
    ) {
        let mut state = self.state.write();
        state
            .dynamic_fields
            .retain(|(existing_parent, existing_name, _)| {
                !(existing_parent == &parent && existing_name == &name)
            });
        state.dynamic_fields.push((parent, name, object));
    }

    /// Appends an event.
    pub fn push_event(&self, event: ChainEvent) {
        self.state.write().events.push(event);
    }

    /// Makes every call to `method` fail with a transport error.
    pub fn fail(&self, method: ChainMethod) {
        self.state.write().failing.insert(method);
    }

    /// Undoes [`MemoryChain::fail`].
    pub fn recover(&self, method: ChainMethod) {
        self.state.write().failing.remove(&method);
    }

    /// Makes lookups of one dynamic field fail with a transport error.
    pub fn fail_dynamic_field(&self, name: DynamicFieldName) {
        self.state.write().failing_fields.push(name);
    }

    /// Number of calls made to `method` so far.
    pub fn calls(&self, method: ChainMethod) -> usize {
        self.state.read().calls.get(&method).copied().unwrap_or(0)
    }

    /// Highest number of dynamic field lookups that were in flight at once.
    pub fn max_concurrent_dynamic_field_lookups(&self) -> usize {
        self.state.read().max_in_flight
    }
}

/// Resolves after being polled twice, giving sibling futures a turn.
struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

fn same_type(left: &str, right: &str) -> bool {
    match (StructTag::parse(left), StructTag::parse(right)) {
        (Some(left), Some(right)) => left == right,
        _ => left == right,
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ChainQuery for MemoryChain {
    async fn get_owned_objects(
        &self,
        owner: &Address,
        filter: &ObjectFilter,
        cursor: Option<&Cursor>,
    ) -> Result<Page<ObjectData>, ChainQueryError> {
        let mut state = self.state.write();
        state.enter(ChainMethod::OwnedObjects)?;

        let owned = state
            .objects
            .iter()
            .filter(|(current, _)| current.as_ref() == Some(owner))
            .filter(|(_, object)| {
                object
                    .struct_tag()
                    .is_some_and(|tag| filter.matches(&tag))
            })
            .map(|(_, object)| object.clone())
            .collect();

        Ok(state.paginate(owned, cursor))
    }

    async fn get_object(&self, id: &ObjectId) -> Result<Option<ObjectData>, ChainQueryError> {
        let mut state = self.state.write();
        state.enter(ChainMethod::Object)?;

        Ok(state
            .objects
            .iter()
            .find(|(_, object)| &object.object_id == id)
            .map(|(_, object)| object.clone()))
    }

    async fn get_dynamic_field_object(
        &self,
        parent: &ObjectId,
        name: &DynamicFieldName,
    ) -> Result<Option<ObjectData>, ChainQueryError> {
        {
            let mut state = self.state.write();
            state.enter(ChainMethod::DynamicField)?;
            state.in_flight += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight);
        }

        YieldNow(false).await;

        let mut state = self.state.write();
        state.in_flight -= 1;

        if state.failing_fields.contains(name) {
            return Err(ChainQueryError::Transport(format!(
                "Injected failure for dynamic field {}",
                name.value
            )));
        }

        Ok(state
            .dynamic_fields
            .iter()
            .find(|(existing_parent, existing_name, _)| {
                existing_parent == parent && existing_name == name
            })
            .map(|(_, _, object)| object.clone()))
    }

    async fn query_events(
        &self,
        event_type: &str,
        cursor: Option<&Cursor>,
    ) -> Result<Page<ChainEvent>, ChainQueryError> {
        let mut state = self.state.write();
        state.enter(ChainMethod::Events)?;

        let events = state
            .events
            .iter()
            .filter(|event| same_type(&event.event_type, event_type))
            .cloned()
            .collect();

        Ok(state.paginate(events, cursor))
    }
}
