//! Lumen Core - scene data model for the progressive path tracer.
//!
//! This crate provides the passive scene representation:
//!
//! - **`Material`**: single unified scatter record (albedo, roughness,
//!   metallic, emission) instead of a material class hierarchy
//! - **`Sphere`**: analytic primitive referencing a material by index
//! - **`Scene`**: ordered sphere and material lists, owned by the host
//!
//! The renderer only ever borrows a `Scene`; all mutation happens on the
//! host side between render calls.

pub mod scene;

// Re-export commonly used types
pub use scene::{Material, Scene, Sphere};
