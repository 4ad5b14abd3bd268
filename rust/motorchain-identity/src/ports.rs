//! Collaborators the resolver is handed instead of reaching for globals.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use async_trait::async_trait;
use motorchain_chain::Network;
use motorchain_common::{Address, ConditionalSync};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{FederatedSession, IdentityError};

/// The wallet connector: reports the currently connected account, if any.
pub trait WalletConnector: ConditionalSync {
    /// Address of the connected wallet account.
    fn connected_address(&self) -> Option<Address>;
}

impl WalletConnector for Option<Address> {
    fn connected_address(&self) -> Option<Address> {
        *self
    }
}

impl<T> WalletConnector for Arc<T>
where
    T: WalletConnector + ?Sized,
{
    fn connected_address(&self) -> Option<Address> {
        T::connected_address(self)
    }
}

/// OAuth providers supported by the federated login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    /// Google accounts
    Google,
    /// Facebook accounts
    Facebook,
    /// Twitch accounts
    Twitch,
}

impl Display for OAuthProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OAuthProvider::Google => write!(f, "google"),
            OAuthProvider::Facebook => write!(f, "facebook"),
            OAuthProvider::Twitch => write!(f, "twitch"),
        }
    }
}

/// Parameters for starting a redirect-based federated login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// Which OAuth provider to log in with
    pub provider: OAuthProvider,
    /// OAuth client id registered with the provider
    pub client_id: String,
    /// Where the provider redirects back to once the user consents
    pub redirect_url: Url,
    /// Network the resulting session will sign for
    pub network: Network,
}

/// The federated-login SDK.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait LoginProvider: ConditionalSync {
    /// URL to send the browser to in order to start a login.
    async fn create_authorization_url(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<Url, IdentityError>;

    /// The provider's own live session, if it still holds one.
    async fn session(&self) -> Result<Option<FederatedSession>, IdentityError>;

    /// Re-seeds the provider's internal state from a persisted record, so
    /// later calls into the SDK see the same session the resolver returned.
    async fn restore(&self, session: &FederatedSession) -> Result<(), IdentityError>;

    /// Drops every piece of state the provider caches.
    async fn logout(&self) -> Result<(), IdentityError>;
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<T> LoginProvider for Arc<T>
where
    T: LoginProvider + ?Sized,
{
    async fn create_authorization_url(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<Url, IdentityError> {
        T::create_authorization_url(self, request).await
    }

    async fn session(&self) -> Result<Option<FederatedSession>, IdentityError> {
        T::session(self).await
    }

    async fn restore(&self, session: &FederatedSession) -> Result<(), IdentityError> {
        T::restore(self, session).await
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        T::logout(self).await
    }
}
