//! Device abstraction consumed by rasterizer states.
//!
//! This module is responsible for:
//! - the [`GraphicsDevice`] contract (identity, backend, render-target count,
//!   native object creation and binding)
//! - the reset lifecycle that invalidates compiled objects and presets
//! - a headless wgpu device and a CPU-only recording device

mod error;
mod gpu;
mod id;
mod init;
mod lifecycle;
mod recording;

pub use error::DeviceError;
pub use gpu::{OffscreenTarget, ScissorRect, WgpuDevice};
pub use id::DeviceId;
pub use init::DeviceInit;
pub use lifecycle::{DeviceLifecycle, DeviceResetListener, SubscriptionId};
pub use recording::RecordingDevice;

use crate::backend::{Backend, NativeRasterizerDesc, NativeRasterizerState};

/// What a rasterizer state needs from the device it is applied to.
///
/// Callers serialize access; a device is driven from one render thread.
pub trait GraphicsDevice {
    /// Identity of the current native device. Changes on recreation.
    fn id(&self) -> DeviceId;

    /// Backend compiler selected when the device was created.
    fn backend(&self) -> Backend;

    /// Number of bound off-screen render targets.
    fn render_target_count(&self) -> usize;

    /// Creates a native rasterizer object from a backend description.
    fn create_rasterizer_state(
        &mut self,
        desc: NativeRasterizerDesc,
    ) -> Result<NativeRasterizerState, DeviceError>;

    /// Makes `state` the rasterizer state for subsequent draws.
    fn bind_rasterizer_state(&mut self, state: &NativeRasterizerState);

    /// Reset notifications and presets for this device.
    fn lifecycle(&self) -> &DeviceLifecycle;
}
