use thiserror::Error;

/// Reasons an on-chain object or event could not be read as a credential.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// The object is not of a credential type
    #[error("Object of type {0:?} is not a credential")]
    NotACredential(Option<String>),

    /// A partner credential is missing its `org_type` field
    #[error("Partner credential has no readable org_type")]
    MissingOrgType,

    /// A partner credential names an organisation type this client does not know
    #[error("Unknown partner org_type {0}")]
    UnknownOrgType(u64),

    /// An event payload lacks a required field
    #[error("Event payload is missing `{0}`")]
    MissingField(&'static str),
}
