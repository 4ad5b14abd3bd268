use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use motorchain_chain::{ChainQuery, ChainQueryError, Deployment, DynamicFieldName, move_object_id};
use motorchain_common::{ConditionalSync, ObjectId};
use serde_json::Value;

/// The authoritative record of which partner credentials are still honoured.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait RevocationRegistry: ConditionalSync {
    /// The registry entry for credential `id`: `Some(true)` if live,
    /// `Some(false)` if revoked, `None` if the registry has no entry.
    async fn is_live(&self, id: &ObjectId) -> Result<Option<bool>, ChainQueryError>;
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl RevocationRegistry for HashMap<ObjectId, bool> {
    async fn is_live(&self, id: &ObjectId) -> Result<Option<bool>, ChainQueryError> {
        Ok(self.get(id).copied())
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl RevocationRegistry for BTreeMap<ObjectId, bool> {
    async fn is_live(&self, id: &ObjectId) -> Result<Option<bool>, ChainQueryError> {
        Ok(self.get(id).copied())
    }
}

/// The contract's shared `AuthRegistry`, whose `Table<ID, bool>` maps each
/// issued partner credential to whether it is still authorized.
///
/// Opening the registry reads the registry object once to find the table;
/// every [`RevocationRegistry::is_live`] call is then one dynamic field
/// lookup. If the table could not be found, every lookup fails with the
/// error that prevented it.
pub struct AuthRegistry<'a, C: ?Sized> {
    chain: &'a C,
    table: Result<ObjectId, ChainQueryError>,
}

impl<'a, C> AuthRegistry<'a, C>
where
    C: ChainQuery + ?Sized,
{
    /// Locates the authorization table of `deployment`'s registry.
    pub async fn open(chain: &'a C, deployment: &Deployment) -> Self {
        let table = Self::locate(chain, deployment).await;

        if let Err(error) = &table {
            tracing::warn!(
                registry = %deployment.auth_registry_id,
                %error,
                "Could not locate the authorization table"
            );
        }

        Self { chain, table }
    }

    async fn locate(chain: &C, deployment: &Deployment) -> Result<ObjectId, ChainQueryError> {
        let registry = chain
            .get_object(&deployment.auth_registry_id)
            .await?
            .ok_or_else(|| {
                ChainQueryError::Decode(format!(
                    "Registry {} does not exist",
                    deployment.auth_registry_id
                ))
            })?;

        registry
            .field(&format!("/{}/fields/id", deployment.auth_table_field))
            .and_then(move_object_id)
            .ok_or_else(|| {
                ChainQueryError::Decode(format!(
                    "Registry {} has no `{}` table",
                    deployment.auth_registry_id, deployment.auth_table_field
                ))
            })
    }

    /// Id of the authorization table, when it was found.
    pub fn table(&self) -> Option<&ObjectId> {
        self.table.as_ref().ok()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<C> RevocationRegistry for AuthRegistry<'_, C>
where
    C: ChainQuery + ?Sized,
{
    async fn is_live(&self, id: &ObjectId) -> Result<Option<bool>, ChainQueryError> {
        let table = self.table.as_ref().map_err(Clone::clone)?;

        let Some(entry) = self
            .chain
            .get_dynamic_field_object(table, &DynamicFieldName::object_id(id))
            .await?
        else {
            return Ok(None);
        };

        match entry.field("/value") {
            Some(Value::Bool(live)) => Ok(Some(*live)),
            other => Err(ChainQueryError::Decode(format!(
                "Authorization entry for {id} is not a bool: {other:?}"
            ))),
        }
    }
}
