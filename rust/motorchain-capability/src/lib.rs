#![warn(missing_docs)]

//! Works out which privileged roles an address currently holds.
//!
//! Roles are proven by credential objects owned by the address:
//!
//! - an `AdminCap` makes the holder an administrator outright;
//! - a `ThirdPartyCap` makes the holder a service or insurance partner, but
//!   only while the shared revocation registry still marks it as live.
//!
//! [`CapabilityResolver::resolve`] never returns an error. When ownership
//! cannot be read the result is an all-false [`CapabilitySet`] marked
//! [`ResolutionStatus::Indeterminate`]; when a single revocation lookup fails
//! the credential is treated as revoked.
//!
//! [`PartnerDirectory`] lists every partner credential ever granted, with its
//! current status, from the contract's grant and revoke events.

mod error;
pub use error::*;

mod credential;
pub use credential::*;

mod capabilities;
pub use capabilities::*;

mod registry;
pub use registry::*;

mod resolver;
pub use resolver::*;

mod partners;
pub use partners::*;

#[cfg(any(test, feature = "helpers"))]
mod helpers;
#[cfg(any(test, feature = "helpers"))]
pub use helpers::*;
