//! Rasterizer descriptors and canonical presets.
//!
//! A [`RasterizerState`] is mutable until its first [`apply`](RasterizerState::apply).
//! From then on it is bound to one device and owns the native objects
//! compiled for it, until that device is reset.

mod desc;
mod error;
mod presets;
mod rasterizer;

pub use desc::{CullMode, FillMode, RasterizerDesc};
pub use error::RasterizerError;
pub use presets::{Preset, PresetRegistry};
pub use rasterizer::{RasterizerState, TargetKind};
