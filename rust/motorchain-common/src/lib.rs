#![warn(missing_docs)]

//! Light weight pieces shared by every motorchain crate: canonical on-chain
//! identifiers ([`Address`], [`ObjectId`]) and the bound-compatibility traits
//! that let the same async code target both native and
//! `wasm32-unknown-unknown`.

mod sync;
pub use sync::*;

mod identifier;
pub use identifier::*;
