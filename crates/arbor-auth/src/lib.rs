//! # arbor-auth
//!
//! Authorization boundary for Arbor.
//!
//! ## Modules
//!
//! - `policy`: the owner-scoped capability gate every store operation applies
//! - `principal`: verified identities and bearer token decoding

pub mod policy;
pub mod principal;

pub use policy::{Owned, authorize, require_owned};
pub use principal::{Principal, PrincipalDecoder};
