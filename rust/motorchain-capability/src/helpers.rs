//! Credential and registry fixtures shaped the way a full node renders them.

use motorchain_chain::{
    ChainEvent, Deployment, DynamicFieldName, MemoryChain, OBJECT_ID_TYPE, ObjectData,
};
use motorchain_common::{Address, ObjectId};
use serde_json::json;

use crate::{ADMIN_CAP, OrgType, PARTNER_CAP};

/// An administrator credential object.
pub fn admin_cap_object(deployment: &Deployment, id: &ObjectId) -> ObjectData {
    ObjectData {
        object_id: *id,
        object_type: Some(format!(
            "{}::{}::{ADMIN_CAP}",
            deployment.package_id, deployment.module
        )),
        fields: json!({ "id": { "id": id.to_string() } }),
    }
}

/// A partner credential object with a raw `org_type` code.
pub fn partner_cap_object(deployment: &Deployment, id: &ObjectId, org_type: u64) -> ObjectData {
    ObjectData {
        object_id: *id,
        object_type: Some(format!(
            "{}::{}::{PARTNER_CAP}",
            deployment.package_id, deployment.module
        )),
        fields: json!({
            "id": { "id": id.to_string() },
            "name": format!("Partner {id}"),
            "org_type": org_type,
        }),
    }
}

/// The shared `AuthRegistry` object pointing at authorization table `table`.
pub fn auth_registry_object(deployment: &Deployment, table: &ObjectId) -> ObjectData {
    let mut fields = json!({ "id": { "id": deployment.auth_registry_id.to_string() } });
    fields[deployment.auth_table_field.as_str()] = json!({
        "type": format!("0x2::table::Table<{OBJECT_ID_TYPE}, bool>"),
        "fields": {
            "id": { "id": table.to_string() },
            "size": "0"
        }
    });

    ObjectData {
        object_id: deployment.auth_registry_id,
        object_type: Some(format!(
            "{}::{}::AuthRegistry",
            deployment.package_id, deployment.module
        )),
        fields,
    }
}

/// The `Field<ID, bool>` object holding one authorization table entry.
pub fn authorization_entry(credential: &ObjectId, live: bool) -> ObjectData {
    ObjectData {
        object_id: *credential,
        object_type: Some(format!("0x2::dynamic_field::Field<{OBJECT_ID_TYPE}, bool>")),
        fields: json!({
            "id": { "id": credential.to_string() },
            "name": credential.to_string(),
            "value": live,
        }),
    }
}

/// A `ThirdPartyGranted` event.
pub fn granted_event(
    deployment: &Deployment,
    credential: &ObjectId,
    name: &str,
    org_type: OrgType,
    recipient: &Address,
    timestamp_ms: u64,
) -> ChainEvent {
    ChainEvent {
        event_type: deployment.granted_event_type(),
        parsed_json: json!({
            "cap_id": credential.to_string(),
            "name": name,
            "org_type": org_type.code(),
            "recipient": recipient.to_string(),
        }),
        timestamp_ms: Some(timestamp_ms),
    }
}

/// A `ThirdPartyRevoked` event.
pub fn revoked_event(
    deployment: &Deployment,
    credential: &ObjectId,
    timestamp_ms: u64,
) -> ChainEvent {
    ChainEvent {
        event_type: deployment.revoked_event_type(),
        parsed_json: json!({ "cap_id": credential.to_string() }),
        timestamp_ms: Some(timestamp_ms),
    }
}

/// A [`MemoryChain`] holding `deployment`'s registry with an empty
/// authorization table, plus helpers to populate it.
#[derive(Clone)]
pub struct CredentialFixture {
    /// The chain the fixture writes to
    pub chain: MemoryChain,
    /// The deployment credentials are issued under
    pub deployment: Deployment,
    /// Id of the authorization table
    pub table: ObjectId,
}

impl CredentialFixture {
    /// A fresh chain with `deployment`'s registry in place.
    pub fn new(deployment: Deployment) -> Self {
        let chain = MemoryChain::new();
        let table = ObjectId::from_literal("0x7ab1e");
        chain.insert_object(None, auth_registry_object(&deployment, &table));

        Self {
            chain,
            deployment,
            table,
        }
    }

    /// Issues an administrator credential to `owner`.
    pub fn grant_admin(&self, owner: &Address, id: &ObjectId) {
        self.chain
            .insert_object(Some(*owner), admin_cap_object(&self.deployment, id));
    }

    /// Issues a partner credential with a raw `org_type` code to `owner`,
    /// without touching the authorization table.
    pub fn issue_partner(&self, owner: &Address, id: &ObjectId, org_type: u64) {
        self.chain
            .insert_object(Some(*owner), partner_cap_object(&self.deployment, id, org_type));
    }

    /// Sets the authorization table entry for `credential`.
    pub fn authorize(&self, credential: &ObjectId, live: bool) {
        self.chain.insert_dynamic_field(
            self.table,
            DynamicFieldName::object_id(credential),
            authorization_entry(credential, live),
        );
    }

    /// Issues a partner credential to `owner` and marks it live.
    pub fn grant_partner(&self, owner: &Address, id: &ObjectId, org_type: OrgType) {
        self.issue_partner(owner, id, org_type.code());
        self.authorize(id, true);
    }
}
