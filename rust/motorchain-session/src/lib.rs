#![warn(missing_docs)]

//! Observable session state for the UI.
//!
//! [`SessionController`] runs identity resolution and then capability
//! resolution for the address it produced, publishing every transition on a
//! [`tokio::sync::watch`] channel. Observers never see a partially computed
//! [`motorchain_capability::CapabilitySet`], and a capability pass that was
//! overtaken by a newer one (the wallet changed while it was in flight) is
//! discarded instead of applied.

mod state;
pub use state::*;

mod controller;
pub use controller::*;
