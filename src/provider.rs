//! Provider-facing descriptors (data), field tables, and strategies (behavior).
//!
//! `descriptor` exposes validated metadata (`ProviderDescriptor`) covering endpoints,
//! scopes, and provider quirks (token key, token placement, scope delimiter). `mapping`
//! holds the declarative profile field table and the [`IdentityMapper`]. `strategy`
//! defines [`ProviderStrategy`], an HTTP-client-agnostic hook used to augment token
//! requests and recognize provider error payloads. `presets` ships descriptors for common
//! providers.

pub mod descriptor;
pub mod mapping;
pub mod presets;
pub mod strategy;

pub use descriptor::*;
pub use mapping::*;
pub use strategy::*;
