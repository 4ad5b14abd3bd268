use futures::future::join_all;
use motorchain_chain::{ChainQuery, Deployment, collect_owned_objects};
use motorchain_common::{Address, ObjectId};

use crate::{
    AuthRegistry, CapabilityResolution, CapabilitySet, Credential, CredentialTypes, OrgType,
    RevocationRegistry,
};

/// Computes the [`CapabilitySet`] of an address from the chain.
///
/// Each call is one independent pass: ownership and the revocation registry
/// are read afresh and nothing is cached between passes.
#[derive(Debug, Clone)]
pub struct CapabilityResolver<C> {
    chain: C,
    deployment: Deployment,
    types: CredentialTypes,
}

impl<C> CapabilityResolver<C>
where
    C: ChainQuery,
{
    /// Creates a resolver reading `deployment`'s credentials from `chain`.
    pub fn new(chain: C, deployment: Deployment) -> Self {
        let types = CredentialTypes::new(&deployment);
        Self {
            chain,
            deployment,
            types,
        }
    }

    /// The chain being read.
    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// The deployment whose credentials are recognised.
    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    /// Resolves the roles held by `address`, reading revocation state from
    /// the deployment's `AuthRegistry`. No address means no roles and no
    /// queries.
    pub async fn resolve(&self, address: Option<&Address>) -> CapabilityResolution {
        let Some(address) = address else {
            return CapabilityResolution::confirmed(CapabilitySet::none());
        };

        let Some(held) = self.credentials(address).await else {
            return CapabilityResolution::indeterminate();
        };

        let capabilities = if held.partners.is_empty() {
            CapabilitySet {
                is_admin: held.is_admin,
                ..CapabilitySet::none()
            }
        } else {
            let registry = AuthRegistry::open(&self.chain, &self.deployment).await;
            held.check(&registry).await
        };

        tracing::debug!(%address, ?capabilities, "Resolved capabilities");
        CapabilityResolution::confirmed(capabilities)
    }

    /// Like [`CapabilityResolver::resolve`], but checking partner credentials
    /// against the given registry.
    pub async fn resolve_with<R>(
        &self,
        address: Option<&Address>,
        registry: &R,
    ) -> CapabilityResolution
    where
        R: RevocationRegistry + ?Sized,
    {
        let Some(address) = address else {
            return CapabilityResolution::confirmed(CapabilitySet::none());
        };

        let Some(held) = self.credentials(address).await else {
            return CapabilityResolution::indeterminate();
        };

        let capabilities = held.check(registry).await;

        tracing::debug!(%address, ?capabilities, "Resolved capabilities");
        CapabilityResolution::confirmed(capabilities)
    }

    /// Reads every credential owned by `address`. `None` if ownership could
    /// not be read.
    async fn credentials(&self, address: &Address) -> Option<HeldCredentials> {
        tracing::debug!(%address, "Querying owned credentials");

        let objects = match collect_owned_objects(&self.chain, address, &self.types.filter()).await
        {
            Ok(objects) => objects,
            Err(error) => {
                tracing::warn!(%address, %error, "Could not read owned credentials");
                return None;
            }
        };

        let mut held = HeldCredentials::default();

        for object in &objects {
            match self.types.classify(object) {
                Ok(Credential::Administrator { .. }) => held.is_admin = true,
                Ok(Credential::Partner { id, org_type }) => held.partners.push((id, org_type)),
                Err(error) => {
                    tracing::warn!(id = %object.object_id, %error, "Ignoring unusable credential");
                }
            }
        }

        Some(held)
    }
}

/// Credentials found by the ownership query, partners in ownership order.
#[derive(Debug, Default)]
struct HeldCredentials {
    is_admin: bool,
    partners: Vec<(ObjectId, OrgType)>,
}

impl HeldCredentials {
    /// Checks every partner credential concurrently and grants the live
    /// ones, in ownership order. Nothing is granted until every lookup has
    /// finished.
    async fn check<R>(self, registry: &R) -> CapabilitySet
    where
        R: RevocationRegistry + ?Sized,
    {
        let mut capabilities = CapabilitySet {
            is_admin: self.is_admin,
            ..CapabilitySet::none()
        };

        let lookups = join_all(self.partners.iter().map(|(id, _)| registry.is_live(id))).await;

        for ((id, org_type), lookup) in self.partners.into_iter().zip(lookups) {
            match lookup {
                Ok(Some(true)) => capabilities.grant(org_type, id),
                Ok(Some(false)) => {
                    tracing::warn!(%id, %org_type, "Ignoring revoked partner credential");
                }
                Ok(None) => {
                    tracing::warn!(
                        %id,
                        %org_type,
                        "Ignoring partner credential missing from the registry"
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        %id,
                        %org_type,
                        %error,
                        "Could not check partner credential, treating it as revoked"
                    );
                }
            }
        }

        capabilities
    }
}
