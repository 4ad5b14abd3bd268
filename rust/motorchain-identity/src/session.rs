use std::fmt::{Debug, Formatter};

use motorchain_common::Address;
use serde::{Deserialize, Deserializer, Serialize, de};

/// Which identity source a [`Session`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// A directly connected signing wallet
    Wallet,
    /// A federated (zkLogin) session
    Federated,
    /// Nobody is logged in
    Anonymous,
}

/// The single authoritative identity of the current browser session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// A wallet is connected; it acts as `address`
    Wallet {
        /// The wallet's account address
        address: Address,
    },
    /// A federated login completed and its material is held locally
    Federated(FederatedSession),
    /// Nobody is logged in
    Anonymous,
}

impl Session {
    /// Which identity source this session came from.
    pub fn kind(&self) -> SessionKind {
        match self {
            Session::Wallet { .. } => SessionKind::Wallet,
            Session::Federated(_) => SessionKind::Federated,
            Session::Anonymous => SessionKind::Anonymous,
        }
    }

    /// The address this session acts as, if anyone is logged in.
    pub fn address(&self) -> Option<&Address> {
        match self {
            Session::Wallet { address } => Some(address),
            Session::Federated(session) => Some(&session.address),
            Session::Anonymous => None,
        }
    }

    /// Proof material for the transaction-signing collaborator, present only
    /// for federated sessions.
    pub fn federated_material(&self) -> Option<&FederatedMaterial> {
        match self {
            Session::Federated(session) => Some(&session.material),
            _ => None,
        }
    }
}

/// A completed federated login, as persisted by the login callback.
///
/// `address` was derived once from the proof material when the login
/// completed; it is trusted as stored and never recomputed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederatedSession {
    /// Account address derived from the identity token and salt
    pub address: Address,
    /// Material needed later to sign transactions
    #[serde(flatten)]
    pub material: FederatedMaterial,
}

/// Signing material of a federated session. Opaque to everything except
/// the transaction signer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedMaterial {
    /// Signed identity token (JWT) issued by the OAuth provider
    pub jwt: String,
    /// Ephemeral Ed25519 secret key, base64. The public key is derived from
    /// it when a proof is requested.
    #[serde(rename = "ephemeralKeyPair")]
    pub ephemeral_key_pair: String,
    /// Last epoch the ephemeral key is valid for
    #[serde(deserialize_with = "epoch")]
    pub max_epoch: u64,
    /// Per-login nonce randomness
    pub randomness: String,
    /// User salt, when the login provider reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    /// OAuth provider the token came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl Debug for FederatedMaterial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FederatedMaterial")
            .field("jwt", &"<redacted>")
            .field("ephemeral_key_pair", &"<redacted>")
            .field("max_epoch", &self.max_epoch)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

/// Login SDKs disagree on whether `maxEpoch` is a number or a decimal string.
fn epoch<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Epoch {
        Number(u64),
        Text(String),
    }

    match Epoch::deserialize(deserializer)? {
        Epoch::Number(epoch) => Ok(epoch),
        Epoch::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record() -> serde_json::Value {
        json!({
            "address": "0xa11ce",
            "jwt": "header.payload.signature",
            "ephemeralKeyPair": "c2VjcmV0LWtleS1ieXRlcw==",
            "maxEpoch": "412",
            "randomness": "1234567890",
            "salt": "42"
        })
    }

    #[test]
    fn it_decodes_persisted_records() {
        let session: FederatedSession = serde_json::from_value(record()).unwrap();

        assert_eq!(session.address, Address::from_literal("0xa11ce"));
        assert_eq!(session.material.max_epoch, 412);
        assert_eq!(session.material.salt.as_deref(), Some("42"));
        assert_eq!(session.material.provider, None);
    }

    #[test]
    fn it_accepts_numeric_epochs() {
        let mut value = record();
        value["maxEpoch"] = json!(9);

        let session: FederatedSession = serde_json::from_value(value).unwrap();

        assert_eq!(session.material.max_epoch, 9);
    }

    #[test]
    fn it_redacts_secrets_in_debug_output() {
        let session: FederatedSession = serde_json::from_value(record()).unwrap();
        let rendered = format!("{session:?}");

        assert!(!rendered.contains("header.payload.signature"));
        assert!(!rendered.contains("c2VjcmV0LWtleS1ieXRlcw=="));
    }

    #[test]
    fn it_writes_the_key_pair_under_its_stored_name() {
        let session: FederatedSession = serde_json::from_value(record()).unwrap();
        let value = serde_json::to_value(&session).unwrap();

        assert_eq!(value["ephemeralKeyPair"], json!("c2VjcmV0LWtleS1ieXRlcw=="));
        assert_eq!(value["maxEpoch"], json!(412));
        assert!(value.get("ephemeralPublicKey").is_none());
    }

    #[test]
    fn it_reports_kind_and_address() {
        let session: FederatedSession = serde_json::from_value(record()).unwrap();
        let federated = Session::Federated(session);

        assert_eq!(federated.kind(), SessionKind::Federated);
        assert_eq!(federated.address(), Some(&Address::from_literal("0xa11ce")));
        assert!(federated.federated_material().is_some());

        assert_eq!(Session::Anonymous.address(), None);
        assert_eq!(
            Session::Wallet {
                address: Address::from_literal("0x1")
            }
            .federated_material(),
            None
        );
    }
}
