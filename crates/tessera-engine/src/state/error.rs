use thiserror::Error;

use crate::device::DeviceError;

/// Recoverable failures from [`RasterizerState::apply`](super::RasterizerState::apply).
///
/// Misuse (cross-device apply, mutation after bind) is not represented here;
/// it panics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RasterizerError {
    /// The active backend cannot express a requested field.
    #[error("{backend} backend does not support {feature}")]
    Unsupported {
        backend: &'static str,
        feature: &'static str,
    },

    /// The device rejected the native description.
    #[error("failed to create native rasterizer state: {0}")]
    Device(#[from] DeviceError),
}
