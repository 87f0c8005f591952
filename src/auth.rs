//! Auth-domain identifiers, secrets, codes, credentials, and identities.

pub mod code;
pub mod credentials;
pub mod id;
pub mod identity;
pub mod secret;

pub use code::*;
pub use credentials::*;
pub use id::*;
pub use identity::*;
pub use secret::*;
