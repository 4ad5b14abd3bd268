//! [`JsonRpcChain`] against a mock full node.

#![cfg(not(target_arch = "wasm32"))]

use anyhow::Result;
use motorchain_chain::{
    ChainQuery, ChainQueryError, Cursor, DynamicFieldName, JsonRpcChain, ObjectFilter,
};
use motorchain_common::{Address, ObjectId};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const OWNER: Address = Address::from_literal("0xa11ce");
const CAP: ObjectId = ObjectId::from_literal("0xc1");
const UNLISTED: ObjectId = ObjectId::from_literal("0xc2");
const TABLE: ObjectId = ObjectId::from_literal("0x7ab1e");

const PARTNER_CAP: &str = "0xab::vehicle::ThirdPartyCap";
const GRANTED: &str = "0xab::vehicle::ThirdPartyGranted";

/// Starts a node that answers every request with `body` and `status`.
async fn node(status: u16, body: Value) -> Result<(MockServer, JsonRpcChain)> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;

    let chain = JsonRpcChain::new(&server.uri())?;
    Ok((server, chain))
}

async fn answering(result: Value) -> Result<(MockServer, JsonRpcChain)> {
    node(200, json!({ "jsonrpc": "2.0", "id": 1, "result": result })).await
}

/// Bodies of every request the node received, in order.
async fn requests(server: &MockServer) -> Result<Vec<Value>> {
    let received = server.received_requests().await.unwrap_or_default();
    let bodies: Vec<Value> = received
        .iter()
        .map(|request| request.body_json::<Value>())
        .collect::<Result<_, _>>()?;
    Ok(bodies)
}

fn cap_object() -> Value {
    json!({
        "data": {
            "objectId": CAP.to_string(),
            "version": "4",
            "digest": "d1",
            "type": PARTNER_CAP,
            "content": {
                "dataType": "moveObject",
                "type": PARTNER_CAP,
                "hasPublicTransfer": false,
                "fields": { "id": { "id": CAP.to_string() }, "org_type": 1 }
            }
        }
    })
}

#[tokio::test]
async fn it_requests_owned_objects_with_filter_then_cursor() -> Result<()> {
    let (server, chain) = answering(json!({
        "data": [cap_object(), { "error": { "code": "displayError" } }],
        "nextCursor": CAP.to_string(),
        "hasNextPage": true
    }))
    .await?;
    let filter = ObjectFilter::any_struct_type([PARTNER_CAP]);

    let first = chain.get_owned_objects(&OWNER, &filter, None).await?;
    let cursor = Cursor(json!(CAP.to_string()));
    chain.get_owned_objects(&OWNER, &filter, Some(&cursor)).await?;

    assert_eq!(first.data.len(), 1);
    assert_eq!(first.data[0].object_id, CAP);
    assert_eq!(first.data[0].field("/org_type"), Some(&json!(1)));
    assert_eq!(first.next_cursor, Some(cursor.clone()));
    assert!(first.has_next_page);

    let options = json!({ "showType": true, "showContent": true });
    let bodies = requests(&server).await?;
    assert_eq!(
        bodies,
        vec![
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "suix_getOwnedObjects",
                "params": [
                    OWNER.to_string(),
                    {
                        "filter": { "MatchAny": [{ "StructType": PARTNER_CAP }] },
                        "options": options
                    },
                    null,
                    null
                ]
            }),
            json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "suix_getOwnedObjects",
                "params": [
                    OWNER.to_string(),
                    {
                        "filter": { "MatchAny": [{ "StructType": PARTNER_CAP }] },
                        "options": options
                    },
                    CAP.to_string(),
                    null
                ]
            }),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn it_requests_a_single_object_with_content() -> Result<()> {
    let (server, chain) = answering(cap_object()).await?;

    let object = chain.get_object(&CAP).await?;

    assert_eq!(
        object.map(|object| object.object_type),
        Some(Some(PARTNER_CAP.to_owned()))
    );
    assert_eq!(
        requests(&server).await?[0]["params"],
        json!([CAP.to_string(), { "showType": true, "showContent": true }])
    );

    Ok(())
}

#[tokio::test]
async fn it_reads_a_missing_object_as_none() -> Result<()> {
    let (_server, chain) = answering(json!({
        "error": { "code": "notExists", "object_id": CAP.to_string() }
    }))
    .await?;

    assert_eq!(chain.get_object(&CAP).await?, None);

    Ok(())
}

#[tokio::test]
async fn it_requests_dynamic_fields_by_typed_name() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "data": {
                    "objectId": "0xf1e1d",
                    "type": "0x2::dynamic_field::Field<0x2::object::ID, bool>",
                    "content": {
                        "dataType": "moveObject",
                        "fields": { "name": CAP.to_string(), "value": true }
                    }
                }
            }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "error": { "code": "dynamicFieldNotFound" } }
        })))
        .mount(&server)
        .await;
    let chain = JsonRpcChain::new(&server.uri())?;

    let entry = chain
        .get_dynamic_field_object(&TABLE, &DynamicFieldName::object_id(&CAP))
        .await?;
    let absent = chain
        .get_dynamic_field_object(&TABLE, &DynamicFieldName::object_id(&UNLISTED))
        .await?;

    assert_eq!(
        entry.as_ref().and_then(|entry| entry.field("/value")),
        Some(&json!(true))
    );
    assert_eq!(absent, None);

    let bodies = requests(&server).await?;
    assert_eq!(bodies[0]["method"], json!("suix_getDynamicFieldObject"));
    assert_eq!(
        bodies[0]["params"],
        json!([
            TABLE.to_string(),
            { "type": "0x2::object::ID", "value": CAP.to_string() }
        ])
    );

    Ok(())
}

#[tokio::test]
async fn it_queries_events_ascending_by_move_type() -> Result<()> {
    let (server, chain) = answering(json!({
        "data": [{
            "id": { "txDigest": "d1", "eventSeq": "0" },
            "type": GRANTED,
            "parsedJson": { "cap_id": CAP.to_string(), "name": "Taipei Motors" },
            "timestampMs": "1700000000000"
        }],
        "nextCursor": { "txDigest": "d1", "eventSeq": "0" },
        "hasNextPage": false
    }))
    .await?;

    let cursor = Cursor(json!({ "txDigest": "d0", "eventSeq": "3" }));
    let page = chain.query_events(GRANTED, Some(&cursor)).await?;

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].event_type, GRANTED);
    assert_eq!(page.data[0].timestamp_ms, Some(1_700_000_000_000));
    assert_eq!(page.data[0].parsed_json["name"], json!("Taipei Motors"));
    assert!(!page.has_next_page);

    let bodies = requests(&server).await?;
    assert_eq!(bodies[0]["method"], json!("suix_queryEvents"));
    assert_eq!(
        bodies[0]["params"],
        json!([
            { "MoveEventType": GRANTED },
            { "txDigest": "d0", "eventSeq": "3" },
            null,
            false
        ])
    );

    Ok(())
}

#[tokio::test]
async fn it_maps_error_objects_to_rpc_errors() -> Result<()> {
    let (_server, chain) = node(
        200,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "Invalid params" }
        }),
    )
    .await?;

    assert_eq!(
        chain.get_object(&CAP).await,
        Err(ChainQueryError::Rpc {
            code: -32602,
            message: "Invalid params".to_owned(),
        })
    );

    Ok(())
}

#[tokio::test]
async fn it_maps_responses_without_a_result_to_decode_errors() -> Result<()> {
    for body in [
        json!({ "jsonrpc": "2.0", "id": 1 }),
        json!({ "jsonrpc": "2.0", "id": 1, "result": null }),
        json!({ "unexpected": true, "result": { "data": 5 } }),
    ] {
        let (_server, chain) = node(200, body.clone()).await?;

        let result = chain.query_events(GRANTED, None).await;

        assert!(
            matches!(result, Err(ChainQueryError::Decode(_))),
            "expected {body} to fail decoding, got {result:?}"
        );
    }

    Ok(())
}

#[tokio::test]
async fn it_maps_http_failures_to_transport_errors() -> Result<()> {
    for status in [429, 500, 503] {
        let (_server, chain) = node(status, json!({ "message": "unavailable" })).await?;

        let result = chain
            .get_owned_objects(&OWNER, &ObjectFilter::any_struct_type([PARTNER_CAP]), None)
            .await;

        assert!(
            matches!(result, Err(ChainQueryError::Transport(_))),
            "expected HTTP {status} to be a transport error, got {result:?}"
        );
    }

    Ok(())
}

#[tokio::test]
async fn it_maps_an_unreachable_node_to_a_transport_error() -> Result<()> {
    let chain = JsonRpcChain::new("http://127.0.0.1:1")?;

    assert!(matches!(
        chain.get_object(&CAP).await,
        Err(ChainQueryError::Transport(_))
    ));

    Ok(())
}
