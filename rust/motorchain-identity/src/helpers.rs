//! In-memory collaborators for tests.

use std::sync::Arc;

use async_trait::async_trait;
use motorchain_common::Address;
use parking_lot::RwLock;
use url::Url;

use crate::{
    AuthorizationRequest, FederatedSession, IdentityError, LoginProvider, OAuthProvider,
    WalletConnector,
};

/// A wallet connector whose connection state is set by the test. Clones
/// share state, so a test can keep a handle to (dis)connect the wallet the
/// resolver was built with.
#[derive(Clone, Default, Debug)]
pub struct MemoryWallet {
    address: Arc<RwLock<Option<Address>>>,
}

impl MemoryWallet {
    /// A wallet that starts out disconnected.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// A wallet that starts out connected as `address`.
    pub fn connected(address: Address) -> Self {
        let wallet = Self::default();
        wallet.connect(address);
        wallet
    }

    /// Connects as `address`.
    pub fn connect(&self, address: Address) {
        *self.address.write() = Some(address);
    }

    /// Disconnects the wallet.
    pub fn disconnect(&self) {
        *self.address.write() = None;
    }
}

impl WalletConnector for MemoryWallet {
    fn connected_address(&self) -> Option<Address> {
        *self.address.read()
    }
}

#[derive(Default, Debug)]
struct MemoryLoginState {
    session: Option<FederatedSession>,
    restored: Vec<FederatedSession>,
    logouts: usize,
    failing: bool,
}

/// A login provider that keeps its "SDK state" in memory.
#[derive(Clone, Default, Debug)]
pub struct MemoryLoginProvider {
    state: Arc<RwLock<MemoryLoginState>>,
}

impl MemoryLoginProvider {
    /// A provider holding no session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the live session the provider reports.
    pub fn set_session(&self, session: Option<FederatedSession>) {
        self.state.write().session = session;
    }

    /// Makes every provider call fail.
    pub fn fail(&self, failing: bool) {
        self.state.write().failing = failing;
    }

    /// Sessions pushed into the provider by [`LoginProvider::restore`].
    pub fn restored(&self) -> Vec<FederatedSession> {
        self.state.read().restored.clone()
    }

    /// Number of [`LoginProvider::logout`] calls.
    pub fn logouts(&self) -> usize {
        self.state.read().logouts
    }

    fn check(&self) -> Result<(), IdentityError> {
        if self.state.read().failing {
            Err(IdentityError::Provider("Injected login provider failure".into()))
        } else {
            Ok(())
        }
    }
}

fn authorization_endpoint(provider: OAuthProvider) -> &'static str {
    match provider {
        OAuthProvider::Google => "https://accounts.google.com/o/oauth2/v2/auth",
        OAuthProvider::Facebook => "https://www.facebook.com/v17.0/dialog/oauth",
        OAuthProvider::Twitch => "https://id.twitch.tv/oauth2/authorize",
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl LoginProvider for MemoryLoginProvider {
    async fn create_authorization_url(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<Url, IdentityError> {
        self.check()?;

        let mut url = Url::parse(authorization_endpoint(request.provider))
            .map_err(|error| IdentityError::Provider(error.to_string()))?;
        url.query_pairs_mut()
            .append_pair("client_id", &request.client_id)
            .append_pair("redirect_uri", request.redirect_url.as_str())
            .append_pair("response_type", "id_token")
            .append_pair("scope", "openid")
            .append_pair("network", &request.network.to_string());

        Ok(url)
    }

    async fn session(&self) -> Result<Option<FederatedSession>, IdentityError> {
        self.check()?;
        Ok(self.state.read().session.clone())
    }

    async fn restore(&self, session: &FederatedSession) -> Result<(), IdentityError> {
        self.check()?;
        let mut state = self.state.write();
        state.session = Some(session.clone());
        state.restored.push(session.clone());
        Ok(())
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        let mut state = self.state.write();
        state.logouts += 1;
        if state.failing {
            return Err(IdentityError::Provider(
                "Injected login provider failure".into(),
            ));
        }
        state.session = None;
        Ok(())
    }
}
