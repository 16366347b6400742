use thiserror::Error;

use crate::backend::Backend;

use super::DeviceId;

/// Native-call failures reported by a [`GraphicsDevice`](super::GraphicsDevice).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("{0} is lost")]
    Lost(DeviceId),

    #[error("{found} rasterizer description cannot be created on a {expected} device")]
    BackendMismatch {
        expected: Backend,
        found: &'static str,
    },

    #[error("native call failed: {0}")]
    Native(String),
}
