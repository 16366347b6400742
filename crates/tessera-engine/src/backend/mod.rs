//! Backend compilers.
//!
//! Each supported graphics API is one variant of [`Backend`]. A device picks
//! its variant once, at creation, and every [`RasterizerDesc`] applied to that
//! device is translated through [`Backend::compile`].
//!
//! Winding convention shared by all backends:
//! - culling always discards the back face
//! - the front face is chosen from the cull mode and from whether the device
//!   is rendering off-screen, since off-screen targets flip the winding the
//!   rasterizer sees

mod d3d11;
mod gl;
mod native;
mod webgpu;

use std::fmt;

pub use native::{
    D3d11CullMode, D3d11FillMode, D3d11RasterizerDesc, GlCullFace, GlPolygonMode,
    GlPolygonOffset, GlRasterizerDesc, NativeHandle, NativeRasterizerDesc,
    NativeRasterizerState, WgpuRasterizerDesc,
};

use crate::state::{CullMode, RasterizerDesc, RasterizerError};

/// Vertex traversal direction that classifies a triangle as front-facing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Winding {
    Cw,
    Ccw,
}

impl From<wgpu::FrontFace> for Winding {
    fn from(face: wgpu::FrontFace) -> Self {
        match face {
            wgpu::FrontFace::Cw => Winding::Cw,
            wgpu::FrontFace::Ccw => Winding::Ccw,
        }
    }
}

impl From<Winding> for wgpu::FrontFace {
    fn from(winding: Winding) -> Self {
        match winding {
            Winding::Cw => wgpu::FrontFace::Cw,
            Winding::Ccw => wgpu::FrontFace::Ccw,
        }
    }
}

/// Front-face winding for `cull_mode`, or `None` when culling is disabled.
///
/// | cull mode                | main target | off-screen |
/// |--------------------------|-------------|------------|
/// | `CullClockwiseFace`        | Ccw         | Cw         |
/// | `CullCounterClockwiseFace` | Cw          | Ccw        |
pub fn front_face(cull_mode: CullMode, offscreen: bool) -> Option<Winding> {
    match (cull_mode, offscreen) {
        (CullMode::None, _) => None,
        (CullMode::CullClockwiseFace, false) => Some(Winding::Ccw),
        (CullMode::CullClockwiseFace, true) => Some(Winding::Cw),
        (CullMode::CullCounterClockwiseFace, false) => Some(Winding::Cw),
        (CullMode::CullCounterClockwiseFace, true) => Some(Winding::Ccw),
    }
}

/// Supported native graphics backends.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Backend {
    /// Desktop OpenGL.
    OpenGl,
    /// OpenGL ES 2/3. No polygon mode, so no wireframe.
    OpenGlEs,
    Direct3D11,
    /// wgpu. Wireframe requires `wgpu::Features::POLYGON_MODE_LINE`.
    Wgpu { polygon_mode_line: bool },
}

impl Backend {
    pub fn name(self) -> &'static str {
        match self {
            Backend::OpenGl => "OpenGL",
            Backend::OpenGlEs => "OpenGL ES",
            Backend::Direct3D11 => "Direct3D 11",
            Backend::Wgpu { .. } => "wgpu",
        }
    }

    pub fn supports_wireframe(self) -> bool {
        match self {
            Backend::OpenGl | Backend::Direct3D11 => true,
            Backend::OpenGlEs => false,
            Backend::Wgpu { polygon_mode_line } => polygon_mode_line,
        }
    }

    /// Whether the multisample flag reaches the native state.
    ///
    /// OpenGL and OpenGL ES ignore it.
    pub fn supports_multisample_toggle(self) -> bool {
        !matches!(self, Backend::OpenGl | Backend::OpenGlEs)
    }

    /// Translates `desc` into this backend's native description.
    ///
    /// `offscreen` is true when the target device has at least one
    /// off-screen render target bound.
    ///
    /// Errors:
    /// - [`RasterizerError::Unsupported`] for wireframe on a backend without it
    pub fn compile(
        self,
        desc: &RasterizerDesc,
        offscreen: bool,
    ) -> Result<NativeRasterizerDesc, RasterizerError> {
        let native = match self {
            Backend::OpenGl | Backend::OpenGlEs => {
                NativeRasterizerDesc::Gl(gl::compile(self, desc, offscreen)?)
            }
            Backend::Direct3D11 => NativeRasterizerDesc::D3d11(d3d11::compile(desc, offscreen)),
            Backend::Wgpu { .. } => {
                NativeRasterizerDesc::Wgpu(webgpu::compile(self, desc, offscreen)?)
            }
        };
        Ok(native)
    }

    fn unsupported(self, feature: &'static str) -> RasterizerError {
        RasterizerError::Unsupported {
            backend: self.name(),
            feature,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FillMode;

    const ALL: [Backend; 5] = [
        Backend::OpenGl,
        Backend::OpenGlEs,
        Backend::Direct3D11,
        Backend::Wgpu { polygon_mode_line: true },
        Backend::Wgpu { polygon_mode_line: false },
    ];

    // ── winding table ─────────────────────────────────────────────────────

    #[test]
    fn winding_table() {
        use CullMode::*;
        assert_eq!(front_face(CullClockwiseFace, false), Some(Winding::Ccw));
        assert_eq!(front_face(CullClockwiseFace, true), Some(Winding::Cw));
        assert_eq!(front_face(CullCounterClockwiseFace, false), Some(Winding::Cw));
        assert_eq!(front_face(CullCounterClockwiseFace, true), Some(Winding::Ccw));
        assert_eq!(front_face(None, false), Option::None);
        assert_eq!(front_face(None, true), Option::None);
    }

    #[test]
    fn every_backend_follows_the_winding_table() {
        for backend in ALL {
            for cull in [
                CullMode::None,
                CullMode::CullClockwiseFace,
                CullMode::CullCounterClockwiseFace,
            ] {
                for offscreen in [false, true] {
                    let native = backend
                        .compile(&RasterizerDesc::with_cull_mode(cull), offscreen)
                        .unwrap();
                    assert_eq!(
                        native.front_face(),
                        front_face(cull, offscreen),
                        "{backend} {cull:?} offscreen={offscreen}"
                    );
                }
            }
        }
    }

    #[test]
    fn cull_none_disables_culling_whatever_else_is_set() {
        let desc = RasterizerDesc {
            cull_mode: CullMode::None,
            fill_mode: FillMode::Solid,
            depth_bias: 4.0,
            slope_scale_depth_bias: 1.5,
            scissor_test_enable: true,
            multi_sample_anti_alias: false,
        };
        for backend in ALL {
            for offscreen in [false, true] {
                let native = backend.compile(&desc, offscreen).unwrap();
                assert_eq!(native.front_face(), None, "{backend}");
            }
        }
    }

    // ── depth offset ──────────────────────────────────────────────────────

    #[test]
    fn depth_offset_carries_both_terms() {
        let desc = RasterizerDesc {
            depth_bias: 2.0,
            slope_scale_depth_bias: 0.5,
            ..RasterizerDesc::default()
        };
        for backend in ALL {
            let native = backend.compile(&desc, false).unwrap();
            assert_eq!(native.depth_offset(), Some((2.0, 0.5)), "{backend}");
        }
    }

    #[test]
    fn sub_unit_bias_keeps_depth_offset_enabled() {
        let desc = RasterizerDesc {
            depth_bias: 0.5,
            ..RasterizerDesc::default()
        };
        for backend in ALL {
            let native = backend.compile(&desc, false).unwrap();
            let (constant, slope) = native.depth_offset().expect(backend.name());
            assert_eq!(slope, 0.0, "{backend}");
            let expected = if matches!(backend, Backend::OpenGl | Backend::OpenGlEs) {
                0.5
            } else {
                0.0
            };
            assert_eq!(constant, expected, "{backend}");
        }
    }

    #[test]
    fn zero_bias_disables_depth_offset() {
        for backend in ALL {
            let native = backend.compile(&RasterizerDesc::default(), false).unwrap();
            assert_eq!(native.depth_offset(), None, "{backend}");
        }
    }

    // ── fill / scissor / multisample ──────────────────────────────────────

    #[test]
    fn wireframe_support_matrix() {
        let desc = RasterizerDesc {
            fill_mode: FillMode::WireFrame,
            ..RasterizerDesc::default()
        };
        for backend in ALL {
            match backend.compile(&desc, false) {
                Ok(native) => {
                    assert!(backend.supports_wireframe(), "{backend}");
                    assert!(native.is_wireframe(), "{backend}");
                }
                Err(RasterizerError::Unsupported { backend: name, feature }) => {
                    assert!(!backend.supports_wireframe(), "{backend}");
                    assert_eq!(name, backend.name());
                    assert_eq!(feature, "wireframe fill mode");
                }
                Err(other) => panic!("unexpected error {other}"),
            }
        }
    }

    #[test]
    fn scissor_is_passed_through() {
        for backend in ALL {
            for enabled in [false, true] {
                let desc = RasterizerDesc {
                    scissor_test_enable: enabled,
                    ..RasterizerDesc::default()
                };
                assert_eq!(backend.compile(&desc, false).unwrap().scissor_test(), enabled);
            }
        }
    }

    #[test]
    fn multisample_is_a_gap_on_gl_only() {
        let desc = RasterizerDesc {
            multi_sample_anti_alias: false,
            ..RasterizerDesc::default()
        };
        for backend in ALL {
            let native = backend.compile(&desc, false).unwrap();
            if backend.supports_multisample_toggle() {
                assert_eq!(native.multisample(), Some(false), "{backend}");
            } else {
                assert_eq!(native.multisample(), None, "{backend}");
            }
        }
    }

    #[test]
    fn native_desc_matches_its_backend_family() {
        let gl = Backend::OpenGlEs.compile(&RasterizerDesc::default(), false).unwrap();
        assert!(gl.is_for(Backend::OpenGl));
        assert!(gl.is_for(Backend::OpenGlEs));
        assert!(!gl.is_for(Backend::Direct3D11));

        let w = Backend::Wgpu { polygon_mode_line: false }
            .compile(&RasterizerDesc::default(), false)
            .unwrap();
        assert!(w.is_for(Backend::Wgpu { polygon_mode_line: true }));
        assert!(!w.is_for(Backend::OpenGl));
    }
}
