//! Ready-made part families.
//!
//! Each family is a config struct with sensible `Default` dimensions, eager
//! parameter validation, and a `build()` that returns the printable solids.

pub mod adapter;
pub mod capsule;
pub mod container;
pub mod enclosure;

pub use adapter::{AdapterConfig, AdapterParts};
pub use capsule::{CapsuleConfig, CapsuleParts};
pub use container::{ContainerConfig, ContainerParts};
pub use enclosure::{Connector, ConnectorShape, EnclosureConfig, EnclosureParts, Face, VentStyle};
