/// Which triangle winding is discarded by the rasterizer.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum CullMode {
    /// Draw both windings.
    None,
    /// Discard triangles whose vertices are in clockwise order.
    CullClockwiseFace,
    /// Discard triangles whose vertices are in counter-clockwise order.
    #[default]
    CullCounterClockwiseFace,
}

/// How triangles are filled.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum FillMode {
    #[default]
    Solid,
    WireFrame,
}

/// Logical rasterizer configuration.
///
/// This is a plain value; binding semantics live in
/// [`RasterizerState`](super::RasterizerState).
///
/// Depth bias values are passed to the native API untouched. Their units are
/// whatever the active backend documents (GL polygon offset units, D3D
/// depth bias integers, wgpu constant bias).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RasterizerDesc {
    pub cull_mode: CullMode,
    pub fill_mode: FillMode,
    pub depth_bias: f32,
    pub slope_scale_depth_bias: f32,
    pub scissor_test_enable: bool,
    pub multi_sample_anti_alias: bool,
}

impl RasterizerDesc {
    /// Default description with the given cull mode.
    #[inline]
    pub const fn with_cull_mode(cull_mode: CullMode) -> Self {
        Self {
            cull_mode,
            fill_mode: FillMode::Solid,
            depth_bias: 0.0,
            slope_scale_depth_bias: 0.0,
            scissor_test_enable: false,
            multi_sample_anti_alias: true,
        }
    }

    /// True when either bias term is non-zero.
    #[inline]
    pub fn has_depth_offset(&self) -> bool {
        self.depth_bias != 0.0 || self.slope_scale_depth_bias != 0.0
    }
}

impl Default for RasterizerDesc {
    fn default() -> Self {
        Self::with_cull_mode(CullMode::CullCounterClockwiseFace)
    }
}
