use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use motorchain_common::{Address, ObjectId};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use url::Url;

use crate::{
    ChainEvent, ChainQuery, ChainQueryError, Cursor, DynamicFieldName, ObjectData, ObjectFilter,
    Page, move_u64,
};

/// A [`ChainQuery`] backed by a full node's JSON-RPC API.
#[derive(Debug)]
pub struct JsonRpcChain {
    client: reqwest::Client,
    endpoint: Url,
    next_id: AtomicU64,
}

impl JsonRpcChain {
    /// Creates a client for the given endpoint.
    pub fn new(endpoint: &str) -> Result<Self, ChainQueryError> {
        let endpoint =
            Url::parse(endpoint).map_err(|_| ChainQueryError::InvalidEndpoint(endpoint.into()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            next_id: AtomicU64::new(1),
        })
    }

    /// Creates a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, endpoint: Url) -> Self {
        Self {
            client,
            endpoint,
            next_id: AtomicU64::new(1),
        }
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn call<T>(&self, method: &str, params: Value) -> Result<T, ChainQueryError>
    where
        T: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!(method, id, "Sending chain RPC request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let envelope: RpcEnvelope<T> = response.json().await?;

        match (envelope.result, envelope.error) {
            (_, Some(error)) => Err(ChainQueryError::Rpc {
                code: error.code,
                message: error.message,
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(ChainQueryError::Decode(format!(
                "Response to {method} had neither result nor error"
            ))),
        }
    }
}

#[derive(Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePage<T> {
    data: Vec<T>,
    next_cursor: Option<Value>,
    #[serde(default)]
    has_next_page: bool,
}

/// `SuiObjectResponse`: either `data` or an `error` such as `notExists`.
#[derive(Deserialize)]
struct WireObjectResponse {
    data: Option<WireObject>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireObject {
    object_id: ObjectId,
    #[serde(rename = "type")]
    object_type: Option<String>,
    content: Option<WireContent>,
}

#[derive(Deserialize)]
struct WireContent {
    #[serde(default)]
    fields: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    parsed_json: Value,
    timestamp_ms: Option<Value>,
}

impl From<WireObject> for ObjectData {
    fn from(object: WireObject) -> Self {
        ObjectData {
            object_id: object.object_id,
            object_type: object.object_type,
            fields: object.content.map(|content| content.fields).unwrap_or_default(),
        }
    }
}

impl From<WireEvent> for ChainEvent {
    fn from(event: WireEvent) -> Self {
        ChainEvent {
            event_type: event.event_type,
            parsed_json: event.parsed_json,
            timestamp_ms: event.timestamp_ms.as_ref().and_then(move_u64),
        }
    }
}

fn into_page<W, T>(page: WirePage<W>) -> Page<T>
where
    W: Into<T>,
{
    Page {
        data: page.data.into_iter().map(Into::into).collect(),
        next_cursor: page.next_cursor.filter(|cursor| !cursor.is_null()).map(Cursor),
        has_next_page: page.has_next_page,
    }
}

fn object_options() -> Value {
    json!({ "showType": true, "showContent": true })
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ChainQuery for JsonRpcChain {
    async fn get_owned_objects(
        &self,
        owner: &Address,
        filter: &ObjectFilter,
        cursor: Option<&Cursor>,
    ) -> Result<Page<ObjectData>, ChainQueryError> {
        let query = json!({ "filter": filter, "options": object_options() });
        let page: WirePage<WireObjectResponse> = self
            .call(
                "suix_getOwnedObjects",
                json!([owner, query, cursor, Value::Null]),
            )
            .await?;

        Ok(into_page(WirePage {
            data: page
                .data
                .into_iter()
                .filter_map(|response| response.data)
                .collect::<Vec<WireObject>>(),
            next_cursor: page.next_cursor,
            has_next_page: page.has_next_page,
        }))
    }

    async fn get_object(&self, id: &ObjectId) -> Result<Option<ObjectData>, ChainQueryError> {
        let response: WireObjectResponse = self
            .call("sui_getObject", json!([id, object_options()]))
            .await?;

        Ok(response.data.map(ObjectData::from))
    }

    async fn get_dynamic_field_object(
        &self,
        parent: &ObjectId,
        name: &DynamicFieldName,
    ) -> Result<Option<ObjectData>, ChainQueryError> {
        let response: WireObjectResponse = self
            .call("suix_getDynamicFieldObject", json!([parent, name]))
            .await?;

        Ok(response.data.map(ObjectData::from))
    }

    async fn query_events(
        &self,
        event_type: &str,
        cursor: Option<&Cursor>,
    ) -> Result<Page<ChainEvent>, ChainQueryError> {
        let page: WirePage<WireEvent> = self
            .call(
                "suix_queryEvents",
                json!([{ "MoveEventType": event_type }, cursor, Value::Null, false]),
            )
            .await?;

        Ok(into_page(page))
    }
}
