//! Tessera engine crate.
//!
//! This crate owns rasterizer state: the backend-agnostic descriptor, the
//! per-backend translation into native rasterizer objects, the canonical
//! presets, and the device-side lifecycle that invalidates compiled objects
//! when a device is recreated.

pub mod backend;
pub mod device;
pub mod state;

pub mod logging;
