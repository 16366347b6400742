use std::sync::Once;

use crate::state::{FillMode, RasterizerDesc, RasterizerError};

use super::{front_face, Backend, GlCullFace, GlPolygonMode, GlPolygonOffset, GlRasterizerDesc};

static MSAA_GAP: Once = Once::new();

/// Shared by desktop GL and GL ES; `backend` decides wireframe support.
pub(super) fn compile(
    backend: Backend,
    desc: &RasterizerDesc,
    offscreen: bool,
) -> Result<GlRasterizerDesc, RasterizerError> {
    let polygon_mode = match desc.fill_mode {
        FillMode::Solid => GlPolygonMode::Fill,
        FillMode::WireFrame if backend.supports_wireframe() => GlPolygonMode::Line,
        FillMode::WireFrame => return Err(backend.unsupported("wireframe fill mode")),
    };

    let cull_face = front_face(desc.cull_mode, offscreen).map(|front_face| GlCullFace { front_face });

    // glPolygonOffset takes (factor, units): slope first.
    let polygon_offset = desc.has_depth_offset().then_some(GlPolygonOffset {
        factor: desc.slope_scale_depth_bias,
        units: desc.depth_bias,
    });

    if !desc.multi_sample_anti_alias {
        MSAA_GAP.call_once(|| {
            log::debug!("{backend}: multisample toggle is not supported; flag ignored");
        });
    }

    Ok(GlRasterizerDesc {
        cull_face,
        polygon_mode,
        scissor_test: desc.scissor_test_enable,
        polygon_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Winding;
    use crate::state::CullMode;

    #[test]
    fn cull_clockwise_on_main_target() {
        let gl = compile(
            Backend::OpenGl,
            &RasterizerDesc::with_cull_mode(CullMode::CullClockwiseFace),
            false,
        )
        .unwrap();
        assert_eq!(
            gl.cull_face,
            Some(GlCullFace { front_face: Winding::Ccw })
        );
    }

    #[test]
    fn cull_counter_clockwise_off_screen() {
        let gl = compile(Backend::OpenGl, &RasterizerDesc::default(), true).unwrap();
        assert_eq!(
            gl.cull_face,
            Some(GlCullFace { front_face: Winding::Ccw })
        );
    }

    #[test]
    fn polygon_offset_argument_order() {
        let desc = RasterizerDesc {
            depth_bias: 2.0,
            slope_scale_depth_bias: 0.5,
            ..RasterizerDesc::default()
        };
        let gl = compile(Backend::OpenGl, &desc, false).unwrap();
        assert_eq!(gl.polygon_offset, Some(GlPolygonOffset { factor: 0.5, units: 2.0 }));
    }

    #[test]
    fn wireframe_on_desktop_gl() {
        let desc = RasterizerDesc { fill_mode: FillMode::WireFrame, ..RasterizerDesc::default() };
        let gl = compile(Backend::OpenGl, &desc, false).unwrap();
        assert_eq!(gl.polygon_mode, GlPolygonMode::Line);
    }

    #[test]
    fn wireframe_on_gles_fails_fast() {
        let desc = RasterizerDesc { fill_mode: FillMode::WireFrame, ..RasterizerDesc::default() };
        let err = compile(Backend::OpenGlEs, &desc, false).unwrap_err();
        assert_eq!(err.to_string(), "OpenGL ES backend does not support wireframe fill mode");
    }
}
