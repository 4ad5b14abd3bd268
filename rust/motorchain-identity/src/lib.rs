#![warn(missing_docs)]

//! Decides who the current browser session is.
//!
//! Two identity sources can be present at once: a directly connected signing
//! wallet, and a federated (zkLogin) session persisted by the login callback.
//! [`IdentityResolver`] merges them into exactly one [`Session`]:
//!
//! 1. a connected wallet always wins;
//! 2. otherwise a persisted federated record, if it decodes;
//! 3. otherwise whatever live session the login provider still holds;
//! 4. otherwise [`Session::Anonymous`].
//!
//! Resolution never fails. Corrupt storage and provider errors are logged and
//! treated as "no session", because the worst acceptable outcome for the UI
//! is rendering as logged out.

mod error;
pub use error::*;

mod session;
pub use session::*;

mod persisted;
pub use persisted::*;

mod ports;
pub use ports::*;

mod resolver;
pub use resolver::*;

#[cfg(any(test, feature = "helpers"))]
mod helpers;
#[cfg(any(test, feature = "helpers"))]
pub use helpers::*;
