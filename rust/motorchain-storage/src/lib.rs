#![warn(missing_docs)]

//! Synchronous key-value storage for session material that must survive a
//! page reload.
//!
//! In the browser this is `window.localStorage` ([`LocalSessionStore`]);
//! everywhere else, and in tests, it is [`MemorySessionStore`]. Storage may
//! be missing altogether (private browsing, server-side rendering), which is
//! modelled by using `Option<S>` as the store.

mod error;
pub use error::*;

mod store;
pub use store::*;

mod memory;
pub use memory::*;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
mod local;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub use local::*;
