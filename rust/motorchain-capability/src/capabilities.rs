use motorchain_common::ObjectId;
use serde::{Deserialize, Serialize};

use crate::OrgType;

/// The privileged roles an address holds.
///
/// A credential id is only ever set for a partner credential that passed the
/// revocation check, so `service_credential_id.is_some()` always agrees with
/// `is_service_provider` (and likewise for insurance).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilitySet {
    /// Holds an administrator credential
    pub is_admin: bool,
    /// Holds a live service partner credential
    pub is_service_provider: bool,
    /// Id of the live service partner credential
    pub service_credential_id: Option<ObjectId>,
    /// Holds a live insurance partner credential
    pub is_insurance_provider: bool,
    /// Id of the live insurance partner credential
    pub insurance_credential_id: Option<ObjectId>,
}

impl CapabilitySet {
    /// No roles at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Records a live partner credential. A later credential of the same
    /// kind replaces an earlier one.
    pub fn grant(&mut self, org_type: OrgType, id: ObjectId) {
        match org_type {
            OrgType::Service => {
                self.is_service_provider = true;
                self.service_credential_id = Some(id);
            }
            OrgType::Insurance => {
                self.is_insurance_provider = true;
                self.insurance_credential_id = Some(id);
            }
        }
    }

    /// Id of the live credential for `org_type`, if any.
    pub fn credential_id(&self, org_type: OrgType) -> Option<&ObjectId> {
        match org_type {
            OrgType::Service => self.service_credential_id.as_ref(),
            OrgType::Insurance => self.insurance_credential_id.as_ref(),
        }
    }

    /// Whether no role is held.
    pub fn is_empty(&self) -> bool {
        !self.is_admin && !self.is_service_provider && !self.is_insurance_provider
    }
}

/// Whether a [`CapabilitySet`] reflects what the chain says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionStatus {
    /// Ownership was read successfully
    Confirmed,
    /// Ownership could not be read; the set is all-false
    Indeterminate,
}

/// Outcome of one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityResolution {
    /// Roles the address holds
    pub capabilities: CapabilitySet,
    /// Whether `capabilities` could be confirmed
    pub status: ResolutionStatus,
}

impl CapabilityResolution {
    /// A confirmed result.
    pub fn confirmed(capabilities: CapabilitySet) -> Self {
        Self {
            capabilities,
            status: ResolutionStatus::Confirmed,
        }
    }

    /// The all-false result of a pass that could not read ownership.
    pub fn indeterminate() -> Self {
        Self {
            capabilities: CapabilitySet::none(),
            status: ResolutionStatus::Indeterminate,
        }
    }

    /// Whether ownership could not be read.
    pub fn is_indeterminate(&self) -> bool {
        self.status == ResolutionStatus::Indeterminate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_keeps_the_last_grant_per_role() {
        let mut capabilities = CapabilitySet::none();
        assert!(capabilities.is_empty());

        capabilities.grant(OrgType::Service, ObjectId::from_literal("0x1"));
        capabilities.grant(OrgType::Service, ObjectId::from_literal("0x2"));

        assert_eq!(
            capabilities,
            CapabilitySet {
                is_service_provider: true,
                service_credential_id: Some(ObjectId::from_literal("0x2")),
                ..CapabilitySet::default()
            }
        );
        assert_eq!(capabilities.credential_id(OrgType::Insurance), None);
    }

    #[test]
    fn it_tells_confirmed_empty_apart_from_indeterminate() {
        let confirmed = CapabilityResolution::confirmed(CapabilitySet::none());
        let indeterminate = CapabilityResolution::indeterminate();

        assert_eq!(confirmed.capabilities, indeterminate.capabilities);
        assert_ne!(confirmed, indeterminate);
        assert!(indeterminate.is_indeterminate());
    }
}
