use std::fmt;

use super::{Backend, Winding};

/// Enabled `GL_CULL_FACE` with `glCullFace(GL_BACK)`, plus the `glFrontFace` argument.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GlCullFace {
    pub front_face: Winding,
}

/// Argument to `glPolygonMode(GL_FRONT_AND_BACK, ..)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GlPolygonMode {
    Fill,
    Line,
}

/// Arguments to `glPolygonOffset(factor, units)` with `GL_POLYGON_OFFSET_FILL` enabled.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlPolygonOffset {
    /// Slope-scaled term.
    pub factor: f32,
    /// Constant term.
    pub units: f32,
}

/// Fixed-function state for OpenGL and OpenGL ES.
///
/// GL has no multisample toggle that matches the descriptor's flag, so it is
/// not represented here.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlRasterizerDesc {
    /// `None` disables `GL_CULL_FACE`.
    pub cull_face: Option<GlCullFace>,
    pub polygon_mode: GlPolygonMode,
    pub scissor_test: bool,
    /// `None` disables `GL_POLYGON_OFFSET_FILL`.
    pub polygon_offset: Option<GlPolygonOffset>,
}

/// `D3D11_FILL_MODE`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum D3d11FillMode {
    Wireframe,
    Solid,
}

/// `D3D11_CULL_MODE`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum D3d11CullMode {
    None,
    Back,
}

/// Mirrors `D3D11_RASTERIZER_DESC`, plus whether a depth offset was requested.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct D3d11RasterizerDesc {
    pub fill_mode: D3d11FillMode,
    pub cull_mode: D3d11CullMode,
    pub front_counter_clockwise: bool,
    pub depth_bias: i32,
    pub depth_bias_clamp: f32,
    pub slope_scaled_depth_bias: f32,
    pub depth_clip_enable: bool,
    pub scissor_enable: bool,
    pub multisample_enable: bool,
    pub antialiased_line_enable: bool,
    /// Not a native field. A sub-unit constant bias truncates to 0, so the
    /// bias values alone cannot tell whether an offset was asked for.
    pub depth_bias_enable: bool,
}

/// Rasterizer portion of a wgpu render pipeline.
///
/// wgpu has no standalone rasterizer object: the primitive state and depth
/// bias are baked into each pipeline, and scissoring is a render-pass
/// command. This struct carries everything a pipeline builder needs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WgpuRasterizerDesc {
    /// Primitive state with the topology left at its default.
    pub primitive: wgpu::PrimitiveState,
    /// `None` when no depth offset is requested.
    pub depth_bias: Option<wgpu::DepthBiasState>,
    pub scissor_test: bool,
    pub multisample: bool,
}

impl WgpuRasterizerDesc {
    /// Primitive state for a pipeline using `topology`.
    pub fn primitive_state(&self, topology: wgpu::PrimitiveTopology) -> wgpu::PrimitiveState {
        let strip_index_format = match topology {
            wgpu::PrimitiveTopology::LineStrip | wgpu::PrimitiveTopology::TriangleStrip => {
                self.primitive.strip_index_format
            }
            _ => None,
        };
        wgpu::PrimitiveState {
            topology,
            strip_index_format,
            ..self.primitive
        }
    }

    /// Bias to place into the pipeline's `DepthStencilState`.
    pub fn depth_bias_state(&self) -> wgpu::DepthBiasState {
        self.depth_bias.unwrap_or_default()
    }

    /// Multisample state for a target with `sample_count` samples.
    ///
    /// With multisampling disabled the pipeline is single-sampled, which
    /// requires a single-sampled target.
    pub fn multisample_state(&self, sample_count: u32) -> wgpu::MultisampleState {
        wgpu::MultisampleState {
            count: if self.multisample { sample_count.max(1) } else { 1 },
            mask: !0,
            alpha_to_coverage_enabled: false,
        }
    }
}

/// Backend-native rasterizer description produced by [`Backend::compile`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum NativeRasterizerDesc {
    Gl(GlRasterizerDesc),
    D3d11(D3d11RasterizerDesc),
    Wgpu(WgpuRasterizerDesc),
}

impl NativeRasterizerDesc {
    /// Short name of the API family this description targets.
    pub fn family(&self) -> &'static str {
        match self {
            Self::Gl(_) => "GL",
            Self::D3d11(_) => "D3D11",
            Self::Wgpu(_) => "wgpu",
        }
    }

    /// True when this description can be created on a device running `backend`.
    pub fn is_for(&self, backend: Backend) -> bool {
        matches!(
            (self, backend),
            (Self::Gl(_), Backend::OpenGl | Backend::OpenGlEs)
                | (Self::D3d11(_), Backend::Direct3D11)
                | (Self::Wgpu(_), Backend::Wgpu { .. })
        )
    }

    /// Front-face winding when back-face culling is enabled; `None` when
    /// culling is disabled.
    pub fn front_face(&self) -> Option<Winding> {
        match self {
            Self::Gl(gl) => gl.cull_face.map(|c| c.front_face),
            Self::D3d11(d3d) => match d3d.cull_mode {
                D3d11CullMode::None => None,
                _ if d3d.front_counter_clockwise => Some(Winding::Ccw),
                _ => Some(Winding::Cw),
            },
            Self::Wgpu(w) => w.primitive.cull_mode.map(|_| w.primitive.front_face.into()),
        }
    }

    pub fn is_wireframe(&self) -> bool {
        match self {
            Self::Gl(gl) => gl.polygon_mode == GlPolygonMode::Line,
            Self::D3d11(d3d) => d3d.fill_mode == D3d11FillMode::Wireframe,
            Self::Wgpu(w) => w.primitive.polygon_mode == wgpu::PolygonMode::Line,
        }
    }

    /// `(constant, slope_scaled)` when depth offset is enabled.
    ///
    /// Enabled whenever the source descriptor had a non-zero bias, even if
    /// the backend truncated the constant to 0.
    pub fn depth_offset(&self) -> Option<(f32, f32)> {
        match self {
            Self::Gl(gl) => gl.polygon_offset.map(|o| (o.units, o.factor)),
            Self::D3d11(d3d) => d3d
                .depth_bias_enable
                .then_some((d3d.depth_bias as f32, d3d.slope_scaled_depth_bias)),
            Self::Wgpu(w) => w.depth_bias.map(|b| (b.constant as f32, b.slope_scale)),
        }
    }

    pub fn scissor_test(&self) -> bool {
        match self {
            Self::Gl(gl) => gl.scissor_test,
            Self::D3d11(d3d) => d3d.scissor_enable,
            Self::Wgpu(w) => w.scissor_test,
        }
    }

    /// Multisample flag, or `None` where the backend cannot express it.
    pub fn multisample(&self) -> Option<bool> {
        match self {
            Self::Gl(_) => None,
            Self::D3d11(d3d) => Some(d3d.multisample_enable),
            Self::Wgpu(w) => Some(w.multisample),
        }
    }
}

/// Device-assigned identifier of a native rasterizer object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NativeHandle(pub u64);

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rasterizer#{}", self.0)
    }
}

/// A native rasterizer object created by a device.
///
/// Owned by exactly one [`RasterizerState`](crate::state::RasterizerState);
/// devices only see it by reference when binding.
#[derive(Debug)]
pub struct NativeRasterizerState {
    handle: NativeHandle,
    desc: NativeRasterizerDesc,
}

impl NativeRasterizerState {
    pub fn new(handle: NativeHandle, desc: NativeRasterizerDesc) -> Self {
        Self { handle, desc }
    }

    #[inline]
    pub fn handle(&self) -> NativeHandle {
        self.handle
    }

    #[inline]
    pub fn desc(&self) -> &NativeRasterizerDesc {
        &self.desc
    }
}
