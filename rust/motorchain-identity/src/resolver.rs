use motorchain_chain::Deployment;
use motorchain_storage::SessionStore;
use url::Url;

use crate::{
    AuthorizationRequest, FederatedSession, IdentityError, LoginProvider, OAuthProvider,
    PERSISTED_KEYS, PersistedSession, SESSION_KEY, Session, WalletConnector,
};

/// Produces the one [`Session`] the current user acts as.
///
/// The resolver owns no state of its own: every call to
/// [`IdentityResolver::resolve`] reads the wallet, the store and the login
/// provider afresh.
#[derive(Debug, Clone)]
pub struct IdentityResolver<W, L, S> {
    wallet: W,
    login: L,
    store: S,
}

impl<W, L, S> IdentityResolver<W, L, S>
where
    W: WalletConnector,
    L: LoginProvider,
    S: SessionStore,
{
    /// Creates a resolver over the given collaborators.
    pub fn new(wallet: W, login: L, store: S) -> Self {
        Self {
            wallet,
            login,
            store,
        }
    }

    /// The wallet connector.
    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    /// The login provider.
    pub fn login(&self) -> &L {
        &self.login
    }

    /// The persisted store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolves the current session. A connected wallet always takes
    /// precedence over any federated session.
    pub async fn resolve(&self) -> Session {
        if let Some(address) = self.wallet.connected_address() {
            tracing::debug!(%address, "Resolved wallet session");
            return Session::Wallet { address };
        }

        match PersistedSession::load(&self.store) {
            PersistedSession::Valid(session) => {
                if let Err(error) = self.login.restore(&session).await {
                    tracing::warn!(%error, "Could not resynchronize login provider state");
                }

                tracing::debug!(address = %session.address, "Resolved persisted federated session");
                Session::Federated(session)
            }
            PersistedSession::Malformed { reason } => {
                tracing::warn!(%reason, "Ignoring malformed persisted session");
                Session::Anonymous
            }
            PersistedSession::Absent => self.recover().await,
        }
    }

    /// Falls back to whatever session the login provider still holds in
    /// memory, e.g. after storage was cleared mid-session.
    async fn recover(&self) -> Session {
        match self.login.session().await {
            Ok(Some(session)) if !session.material.jwt.trim().is_empty() => {
                tracing::debug!(
                    address = %session.address,
                    "Recovered federated session from login provider"
                );
                Session::Federated(session)
            }
            Ok(_) => Session::Anonymous,
            Err(error) => {
                tracing::debug!(%error, "Login provider has no recoverable session");
                Session::Anonymous
            }
        }
    }

    /// Persists a completed federated login so later resolutions find it.
    pub fn persist(&self, session: &FederatedSession) -> Result<(), IdentityError> {
        let record = serde_json::to_string(session)?;
        self.store.set(SESSION_KEY, &record)?;
        Ok(())
    }

    /// Clears every piece of persisted federated material and the login
    /// provider's cached state. Each step runs even if an earlier one fails;
    /// calling this repeatedly is harmless.
    pub async fn logout(&self) {
        for key in PERSISTED_KEYS {
            if let Err(error) = self.store.remove(key) {
                tracing::warn!(key, %error, "Could not clear persisted key");
            }
        }

        if let Err(error) = self.login.logout().await {
            tracing::warn!(%error, "Login provider logout failed");
        }
    }

    /// Builds the URL that starts a federated login for `provider`, returning
    /// to `redirect_url` once the user consents.
    pub async fn authorization_url(
        &self,
        deployment: &Deployment,
        provider: OAuthProvider,
        redirect_url: &str,
    ) -> Result<Url, IdentityError> {
        let client_id = deployment
            .client_id
            .as_deref()
            .map(str::trim)
            .filter(|client_id| !client_id.is_empty())
            .ok_or(IdentityError::MissingClientId)?;

        let redirect_url =
            Url::parse(redirect_url).map_err(|source| IdentityError::InvalidRedirect {
                url: redirect_url.to_owned(),
                source,
            })?;

        let request = AuthorizationRequest {
            provider,
            client_id: client_id.to_owned(),
            redirect_url,
            network: deployment.network,
        };

        self.login.create_authorization_url(&request).await
    }
}
