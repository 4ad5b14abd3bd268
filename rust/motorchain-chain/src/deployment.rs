use std::fmt::{Display, Formatter};

use motorchain_common::ObjectId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const TESTNET_PACKAGE_ID: ObjectId =
    ObjectId::from_literal("0x90c07cb444d737d0880f505d26c4659c1f134f129230cac9e76fb3bf0342930a");
const TESTNET_AUTH_REGISTRY_ID: ObjectId =
    ObjectId::from_literal("0xe41ac212d96827c4e7c4d461cf7123121c2bcdfefb3d4fd3a54d6f206425c4e1");
const TESTNET_RPC_URL: &str = "https://fullnode.testnet.sui.io:443";

/// Errors produced while loading a [`Deployment`].
#[derive(Error, Debug)]
pub enum DeploymentError {
    /// The settings document is not valid JSON, or an id in it is malformed
    #[error("Failed to parse deployment settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// The module name is empty
    #[error("Deployment module name must not be empty")]
    EmptyModule,

    /// The RPC URL does not parse
    #[error("Invalid RPC URL '{url}': {source}")]
    InvalidRpcUrl {
        /// The offending URL
        url: String,
        /// Parser error
        source: url::ParseError,
    },
}

/// Network the contract is published on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network
    Mainnet,
    /// Public test network
    Testnet,
    /// Development network
    Devnet,
}

impl Display for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
            Network::Devnet => write!(f, "devnet"),
        }
    }
}

/// Where the vehicle contract lives and how to reach it.
///
/// Loaded from JSON with [`Deployment::from_json`]; every field missing from
/// the document falls back to the published testnet deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deployment {
    /// Package the contract was published in
    pub package_id: ObjectId,
    /// Module declaring the credential and event types
    pub module: String,
    /// Shared `AuthRegistry` object holding the revocation table
    pub auth_registry_id: ObjectId,
    /// Field of the `AuthRegistry` holding the `Table<ID, bool>`
    pub auth_table_field: String,
    /// Full node JSON-RPC endpoint
    pub rpc_url: String,
    /// Network name passed to the login provider
    pub network: Network,
    /// OAuth client id used to start federated login
    pub client_id: Option<String>,
}

impl Default for Deployment {
    fn default() -> Self {
        Self::testnet()
    }
}

impl Deployment {
    /// The published testnet deployment.
    pub fn testnet() -> Self {
        Self {
            package_id: TESTNET_PACKAGE_ID,
            module: "vehicle".to_owned(),
            auth_registry_id: TESTNET_AUTH_REGISTRY_ID,
            auth_table_field: "authorized".to_owned(),
            rpc_url: TESTNET_RPC_URL.to_owned(),
            network: Network::Testnet,
            client_id: None,
        }
    }

    /// Loads and validates deployment settings from a JSON document.
    pub fn from_json(document: &str) -> Result<Self, DeploymentError> {
        let deployment: Deployment = serde_json::from_str(document)?;
        deployment.validate()?;
        Ok(deployment)
    }

    /// Checks the fields serde cannot check on its own.
    pub fn validate(&self) -> Result<(), DeploymentError> {
        if self.module.trim().is_empty() {
            return Err(DeploymentError::EmptyModule);
        }

        Url::parse(&self.rpc_url).map_err(|source| DeploymentError::InvalidRpcUrl {
            url: self.rpc_url.clone(),
            source,
        })?;

        Ok(())
    }

    fn type_name(&self, name: &str) -> String {
        format!("{}::{}::{}", self.package_id, self.module, name)
    }

    /// Type of the administrator credential.
    pub fn admin_cap_type(&self) -> String {
        self.type_name("AdminCap")
    }

    /// Type of the service/insurance partner credential.
    pub fn partner_cap_type(&self) -> String {
        self.type_name("ThirdPartyCap")
    }

    /// Event emitted when a partner credential is issued.
    pub fn granted_event_type(&self) -> String {
        self.type_name("ThirdPartyGranted")
    }

    /// Event emitted when a partner credential is revoked.
    pub fn revoked_event_type(&self) -> String {
        self.type_name("ThirdPartyRevoked")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_defaults_to_testnet() {
        let deployment = Deployment::from_json("{}").unwrap();

        assert_eq!(deployment, Deployment::testnet());
        assert_eq!(
            deployment.admin_cap_type(),
            "0x90c07cb444d737d0880f505d26c4659c1f134f129230cac9e76fb3bf0342930a::vehicle::AdminCap"
        );
    }

    #[test]
    fn it_normalizes_ids_from_settings() {
        let deployment = Deployment::from_json(
            r#"{ "package_id": "0xAB", "module": "garage", "network": "devnet" }"#,
        )
        .unwrap();

        assert_eq!(deployment.package_id, ObjectId::from_literal("0xab"));
        assert_eq!(deployment.network, Network::Devnet);
        assert!(deployment.partner_cap_type().ends_with("::garage::ThirdPartyCap"));
    }

    #[test]
    fn it_rejects_invalid_settings() {
        assert!(matches!(
            Deployment::from_json(r#"{ "package_id": "0xnothex" }"#),
            Err(DeploymentError::Parse(_))
        ));
        assert!(matches!(
            Deployment::from_json(r#"{ "module": " " }"#),
            Err(DeploymentError::EmptyModule)
        ));
        assert!(matches!(
            Deployment::from_json(r#"{ "rpc_url": "not a url" }"#),
            Err(DeploymentError::InvalidRpcUrl { .. })
        ));
    }
}
