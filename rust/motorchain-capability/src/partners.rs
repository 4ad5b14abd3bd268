use std::collections::HashSet;

use motorchain_chain::{
    ChainEvent, ChainQuery, ChainQueryError, Deployment, collect_events, move_object_id, move_u64,
};
use motorchain_common::{Address, ObjectId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CredentialError, OrgType};

/// Whether a granted partner credential is still honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartnerStatus {
    /// No revocation event names the credential
    Active,
    /// The credential was revoked
    Revoked,
}

/// A partner credential as recorded by its grant event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    /// Id of the issued credential
    pub credential_id: ObjectId,
    /// Organisation name given at grant time
    pub name: String,
    /// Partner role
    pub org_type: OrgType,
    /// Address the credential was issued to
    pub address: Address,
    /// Current status
    pub status: PartnerStatus,
    /// When the grant was checkpointed, if known
    pub granted_at_ms: Option<u64>,
}

impl Partner {
    /// Reads a `ThirdPartyGranted` event. The status starts out active.
    pub fn from_event(event: &ChainEvent) -> Result<Self, CredentialError> {
        let payload = &event.parsed_json;

        let credential_id = payload
            .get("cap_id")
            .and_then(move_object_id)
            .ok_or(CredentialError::MissingField("cap_id"))?;
        let name = payload
            .get("name")
            .and_then(Value::as_str)
            .ok_or(CredentialError::MissingField("name"))?
            .to_owned();
        let org_type = payload
            .get("org_type")
            .and_then(move_u64)
            .ok_or(CredentialError::MissingOrgType)
            .and_then(OrgType::try_from)?;
        let address = payload
            .get("recipient")
            .and_then(Value::as_str)
            .and_then(|recipient| recipient.parse().ok())
            .ok_or(CredentialError::MissingField("recipient"))?;

        Ok(Self {
            credential_id,
            name,
            org_type,
            address,
            status: PartnerStatus::Active,
            granted_at_ms: event.timestamp_ms,
        })
    }

    /// Whether `term` occurs in the name or the address, ignoring case. An
    /// empty term matches everything.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        self.name.to_lowercase().contains(&term)
            || self.address.to_string().contains(term.trim_start_matches("0x"))
    }
}

/// Every partner credential the deployment has ever granted.
#[derive(Debug, Clone)]
pub struct PartnerDirectory<C> {
    chain: C,
    deployment: Deployment,
}

impl<C> PartnerDirectory<C>
where
    C: ChainQuery,
{
    /// Creates a directory reading `deployment`'s events from `chain`.
    pub fn new(chain: C, deployment: Deployment) -> Self {
        Self { chain, deployment }
    }

    /// All granted partners, most recent grant first. Grants named by a
    /// revocation event are marked [`PartnerStatus::Revoked`]. Grants whose
    /// payload cannot be read are skipped.
    pub async fn list(&self) -> Result<Vec<Partner>, ChainQueryError> {
        let granted = collect_events(&self.chain, &self.deployment.granted_event_type()).await?;
        let revoked = collect_events(&self.chain, &self.deployment.revoked_event_type()).await?;

        let revoked: HashSet<ObjectId> = revoked
            .iter()
            .filter_map(|event| event.parsed_json.get("cap_id").and_then(move_object_id))
            .collect();

        let mut partners: Vec<Partner> = granted
            .iter()
            .filter_map(|event| match Partner::from_event(event) {
                Ok(partner) => Some(partner),
                Err(error) => {
                    tracing::warn!(
                        %error,
                        payload = %event.parsed_json,
                        "Skipping unreadable grant event"
                    );
                    None
                }
            })
            .map(|mut partner| {
                if revoked.contains(&partner.credential_id) {
                    partner.status = PartnerStatus::Revoked;
                }
                partner
            })
            .collect();

        partners.sort_by(|left, right| right.granted_at_ms.cmp(&left.granted_at_ms));

        Ok(partners)
    }

    /// The partners of [`PartnerDirectory::list`] matching `term`.
    pub async fn filter(&self, term: &str) -> Result<Vec<Partner>, ChainQueryError> {
        let mut partners = self.list().await?;
        partners.retain(|partner| partner.matches(term));
        Ok(partners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn granted(payload: Value) -> ChainEvent {
        ChainEvent {
            event_type: "0x2::vehicle::ThirdPartyGranted".to_owned(),
            parsed_json: payload,
            timestamp_ms: Some(1_700_000_000_000),
        }
    }

    #[test]
    fn it_reads_grant_events() {
        let partner = Partner::from_event(&granted(json!({
            "cap_id": "0xc1",
            "name": "Taipei Motors",
            "org_type": 1,
            "recipient": "0xA11CE"
        })))
        .unwrap();

        assert_eq!(
            partner,
            Partner {
                credential_id: ObjectId::from_literal("0xc1"),
                name: "Taipei Motors".to_owned(),
                org_type: OrgType::Service,
                address: Address::from_literal("0xa11ce"),
                status: PartnerStatus::Active,
                granted_at_ms: Some(1_700_000_000_000),
            }
        );
    }

    #[test]
    fn it_rejects_incomplete_grant_events() {
        assert_eq!(
            Partner::from_event(&granted(json!({
                "name": "x",
                "org_type": 1,
                "recipient": "0x1"
            }))),
            Err(CredentialError::MissingField("cap_id"))
        );
        assert_eq!(
            Partner::from_event(&granted(
                json!({ "cap_id": "0xc1", "name": "x", "org_type": 9, "recipient": "0x1" })
            )),
            Err(CredentialError::UnknownOrgType(9))
        );
    }

    #[test]
    fn it_matches_names_and_addresses_case_insensitively() {
        let partner = Partner::from_event(&granted(json!({
            "cap_id": "0xc1",
            "name": "Taipei Motors",
            "org_type": "2",
            "recipient": "0xBEEF"
        })))
        .unwrap();

        assert!(partner.matches("motors"));
        assert!(partner.matches("0xbeef"));
        assert!(partner.matches("BEEF"));
        assert!(partner.matches(""));
        assert!(!partner.matches("insurance"));
    }
}
