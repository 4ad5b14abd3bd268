use std::fmt::{Display, Formatter};

use motorchain_chain::{Deployment, ObjectData, ObjectFilter, StructTag, move_u64};
use motorchain_common::ObjectId;
use serde::{Deserialize, Serialize};

use crate::CredentialError;

/// Struct name of the administrator credential.
pub const ADMIN_CAP: &str = "AdminCap";

/// Struct name of the partner credential.
pub const PARTNER_CAP: &str = "ThirdPartyCap";

/// The kind of organisation a partner credential was issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrgType {
    /// Workshops that record maintenance
    Service,
    /// Insurers that record claims
    Insurance,
}

impl OrgType {
    /// The contract's `u8` encoding.
    pub const fn code(self) -> u64 {
        match self {
            OrgType::Service => 1,
            OrgType::Insurance => 2,
        }
    }
}

impl TryFrom<u64> for OrgType {
    type Error = CredentialError;

    fn try_from(code: u64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(OrgType::Service),
            2 => Ok(OrgType::Insurance),
            other => Err(CredentialError::UnknownOrgType(other)),
        }
    }
}

impl Display for OrgType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OrgType::Service => write!(f, "Service"),
            OrgType::Insurance => write!(f, "Insurance"),
        }
    }
}

/// A credential object held by an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    /// Grants administrator rights; never revoked in place
    Administrator {
        /// Object id of the credential
        id: ObjectId,
    },
    /// Grants a partner role while the revocation registry says it is live
    Partner {
        /// Object id of the credential, the revocation registry key
        id: ObjectId,
        /// Which partner role the credential is for
        org_type: OrgType,
    },
}

impl Credential {
    /// Object id of the credential.
    pub fn id(&self) -> &ObjectId {
        match self {
            Credential::Administrator { id } | Credential::Partner { id, .. } => id,
        }
    }
}

/// The two credential types of one deployment, compared by parsed
/// [`StructTag`] so zero-padding differences in type strings do not matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialTypes {
    admin: StructTag,
    partner: StructTag,
}

impl CredentialTypes {
    /// Credential types published by `deployment`.
    pub fn new(deployment: &Deployment) -> Self {
        Self {
            admin: StructTag::new(deployment.package_id, &deployment.module, ADMIN_CAP),
            partner: StructTag::new(deployment.package_id, &deployment.module, PARTNER_CAP),
        }
    }

    /// The administrator credential type.
    pub fn admin(&self) -> &StructTag {
        &self.admin
    }

    /// The partner credential type.
    pub fn partner(&self) -> &StructTag {
        &self.partner
    }

    /// An owned-object filter selecting both credential types in one query.
    pub fn filter(&self) -> ObjectFilter {
        ObjectFilter::any_struct_type([self.admin.to_string(), self.partner.to_string()])
    }

    /// Reads `object` as a credential.
    pub fn classify(&self, object: &ObjectData) -> Result<Credential, CredentialError> {
        let tag = object.struct_tag();

        if tag.as_ref() == Some(&self.admin) {
            return Ok(Credential::Administrator {
                id: object.object_id,
            });
        }

        if tag.as_ref() == Some(&self.partner) {
            let code = object
                .field("/org_type")
                .and_then(move_u64)
                .ok_or(CredentialError::MissingOrgType)?;

            return Ok(Credential::Partner {
                id: object.object_id,
                org_type: OrgType::try_from(code)?,
            });
        }

        Err(CredentialError::NotACredential(object.object_type.clone()))
    }
}
