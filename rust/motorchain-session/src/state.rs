use motorchain_capability::{CapabilityResolution, CapabilitySet};
use motorchain_common::Address;
use motorchain_identity::Session;

/// Identity half of the published state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Identity resolution is in flight; not the same as logged out
    #[default]
    Resolving,
    /// Identity is known
    Resolved(Session),
}

impl SessionState {
    /// Address of the resolved session, if any.
    pub fn address(&self) -> Option<&Address> {
        match self {
            SessionState::Resolving => None,
            SessionState::Resolved(session) => session.address(),
        }
    }

    /// Whether resolution is still in flight.
    pub fn is_resolving(&self) -> bool {
        matches!(self, SessionState::Resolving)
    }
}

/// Capability half of the published state, always tagged with the address
/// it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityState {
    /// A pass for `address` is in flight
    Resolving {
        /// Address being resolved
        address: Option<Address>,
    },
    /// The pass for `address` finished
    Resolved {
        /// Address that was resolved
        address: Option<Address>,
        /// Outcome of the pass
        resolution: CapabilityResolution,
    },
}

impl Default for CapabilityState {
    fn default() -> Self {
        CapabilityState::Resolving { address: None }
    }
}

impl CapabilityState {
    /// Address this state belongs to.
    pub fn address(&self) -> Option<&Address> {
        match self {
            CapabilityState::Resolving { address } | CapabilityState::Resolved { address, .. } => {
                address.as_ref()
            }
        }
    }

    /// Whether a pass is still in flight.
    pub fn is_resolving(&self) -> bool {
        matches!(self, CapabilityState::Resolving { .. })
    }

    /// The resolved capabilities. While resolving this is the all-false set,
    /// so gates stay closed until a pass completes.
    pub fn capabilities(&self) -> CapabilitySet {
        match self {
            CapabilityState::Resolving { .. } => CapabilitySet::none(),
            CapabilityState::Resolved { resolution, .. } => resolution.capabilities.clone(),
        }
    }
}

/// Everything observers are told about the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Who the user is
    pub session: SessionState,
    /// What the user may do
    pub capabilities: CapabilityState,
}
