use std::sync::atomic::{AtomicU64, Ordering};

use motorchain_capability::CapabilityResolver;
use motorchain_chain::ChainQuery;
use motorchain_common::Address;
use motorchain_identity::{IdentityResolver, LoginProvider, WalletConnector};
use motorchain_storage::SessionStore;
use tokio::sync::watch;

use crate::{CapabilityState, SessionSnapshot, SessionState};

/// Drives identity and capability resolution and publishes the result.
///
/// Every [`SessionController::refresh`] starts a new generation. A pass only
/// publishes while its generation is the latest, and capabilities are only
/// applied if the published session still has the address they were
/// computed for.
pub struct SessionController<W, L, S, C> {
    identity: IdentityResolver<W, L, S>,
    capabilities: CapabilityResolver<C>,
    state: watch::Sender<SessionSnapshot>,
    generation: AtomicU64,
}

impl<W, L, S, C> SessionController<W, L, S, C>
where
    W: WalletConnector,
    L: LoginProvider,
    S: SessionStore,
    C: ChainQuery,
{
    /// Creates a controller in the initial resolving state. Nothing is
    /// resolved until [`SessionController::refresh`] is called.
    pub fn new(identity: IdentityResolver<W, L, S>, capabilities: CapabilityResolver<C>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());

        Self {
            identity,
            capabilities,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// The identity resolver.
    pub fn identity(&self) -> &IdentityResolver<W, L, S> {
        &self.identity
    }

    /// The capability resolver.
    pub fn capability_resolver(&self) -> &CapabilityResolver<C> {
        &self.capabilities
    }

    /// A receiver that observes every published transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// The latest published state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// The latest published identity state.
    pub fn session(&self) -> SessionState {
        self.state.borrow().session.clone()
    }

    /// The latest published capability state.
    pub fn capabilities(&self) -> CapabilityState {
        self.state.borrow().capabilities.clone()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Re-resolves identity, then the capabilities of the resulting address.
    /// A pass that is overtaken by a newer one stops publishing.
    pub async fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(generation, "Starting session pass");

        self.state.send_modify(|snapshot| {
            snapshot.session = SessionState::Resolving;
            snapshot.capabilities = CapabilityState::default();
        });

        let session = self.identity.resolve().await;
        let address = session.address().copied();

        let published = self.state.send_if_modified(|snapshot| {
            if !self.is_current(generation) {
                return false;
            }

            snapshot.session = SessionState::Resolved(session);
            snapshot.capabilities = CapabilityState::Resolving { address };
            true
        });

        if !published {
            tracing::debug!(generation, "Dropping superseded identity result");
            return;
        }

        let resolution = self.capabilities.resolve(address.as_ref()).await;

        let applied = self.state.send_if_modified(|snapshot| {
            if !self.is_current(generation) || snapshot.session.address() != address.as_ref() {
                return false;
            }

            snapshot.capabilities = CapabilityState::Resolved {
                address,
                resolution,
            };
            true
        });

        if applied {
            tracing::debug!(generation, "Published capabilities");
        } else {
            tracing::debug!(
                generation,
                address = ?address,
                "Dropping capabilities resolved for a superseded address"
            );
        }
    }

    /// Reacts to the wallet connecting, disconnecting or switching account.
    pub async fn wallet_changed(&self, address: Option<Address>) {
        tracing::debug!(?address, "Wallet changed");
        self.refresh().await;
    }

    /// Clears persisted federated material and login state, then re-resolves.
    /// A connected wallet stays connected and is resolved again.
    pub async fn logout(&self) {
        self.identity.logout().await;
        self.refresh().await;
    }
}
