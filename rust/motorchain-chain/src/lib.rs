#![warn(missing_docs)]

//! Read-only access to the chain the vehicle-history contract lives on.
//!
//! The [`ChainQuery`] trait is the port every resolver talks to. It is
//! implemented by [`JsonRpcChain`] for real full nodes and, behind the
//! `helpers` feature, by [`MemoryChain`] for tests.
//!
//! ```rust
//! use motorchain_chain::{Deployment, JsonRpcChain};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let deployment = Deployment::testnet();
//! let _chain = JsonRpcChain::new(&deployment.rpc_url)?;
//!
//! assert!(deployment.admin_cap_type().ends_with("::vehicle::AdminCap"));
//! # Ok(())
//! # }
//! ```
//!
//! The [`Deployment`] names the published contract: its package id, module
//! and the shared registry objects the resolvers read.

mod error;
pub use error::*;

mod object;
pub use object::*;

mod query;
pub use query::*;

mod deployment;
pub use deployment::*;

mod rpc;
pub use rpc::*;

#[cfg(any(test, feature = "helpers"))]
mod memory;
#[cfg(any(test, feature = "helpers"))]
pub use memory::*;
