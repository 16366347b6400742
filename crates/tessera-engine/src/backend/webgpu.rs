use crate::state::{FillMode, RasterizerDesc, RasterizerError};

use super::{front_face, Backend, WgpuRasterizerDesc};

pub(super) fn compile(
    backend: Backend,
    desc: &RasterizerDesc,
    offscreen: bool,
) -> Result<WgpuRasterizerDesc, RasterizerError> {
    let polygon_mode = match desc.fill_mode {
        FillMode::Solid => wgpu::PolygonMode::Fill,
        FillMode::WireFrame if backend.supports_wireframe() => wgpu::PolygonMode::Line,
        FillMode::WireFrame => return Err(backend.unsupported("wireframe fill mode")),
    };

    let front = front_face(desc.cull_mode, offscreen);

    let primitive = wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        // wgpu needs a winding even with culling off; it only matters for culling.
        front_face: front.map(Into::into).unwrap_or(wgpu::FrontFace::Ccw),
        cull_mode: front.map(|_| wgpu::Face::Back),
        polygon_mode,
        unclipped_depth: false,
        conservative: false,
    };

    let depth_bias = desc.has_depth_offset().then_some(wgpu::DepthBiasState {
        constant: desc.depth_bias as i32,
        slope_scale: desc.slope_scale_depth_bias,
        clamp: 0.0,
    });

    Ok(WgpuRasterizerDesc {
        primitive,
        depth_bias,
        scissor_test: desc.scissor_test_enable,
        multisample: desc.multi_sample_anti_alias,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CullMode;

    const LINES: Backend = Backend::Wgpu { polygon_mode_line: true };
    const NO_LINES: Backend = Backend::Wgpu { polygon_mode_line: false };

    #[test]
    fn cull_clockwise_off_screen() {
        let w = compile(
            NO_LINES,
            &RasterizerDesc::with_cull_mode(CullMode::CullClockwiseFace),
            true,
        )
        .unwrap();
        assert_eq!(w.primitive.cull_mode, Some(wgpu::Face::Back));
        assert_eq!(w.primitive.front_face, wgpu::FrontFace::Cw);
    }

    #[test]
    fn cull_none_has_no_cull_face() {
        let w = compile(NO_LINES, &RasterizerDesc::with_cull_mode(CullMode::None), false).unwrap();
        assert_eq!(w.primitive.cull_mode, None);
    }

    #[test]
    fn wireframe_needs_polygon_mode_line() {
        let desc = RasterizerDesc { fill_mode: FillMode::WireFrame, ..RasterizerDesc::default() };
        assert_eq!(compile(LINES, &desc, false).unwrap().primitive.polygon_mode, wgpu::PolygonMode::Line);
        assert!(matches!(
            compile(NO_LINES, &desc, false),
            Err(RasterizerError::Unsupported { backend: "wgpu", .. })
        ));
    }

    #[test]
    fn bias_state() {
        let desc = RasterizerDesc {
            depth_bias: 3.0,
            slope_scale_depth_bias: 0.25,
            ..RasterizerDesc::default()
        };
        let w = compile(NO_LINES, &desc, false).unwrap();
        assert_eq!(
            w.depth_bias,
            Some(wgpu::DepthBiasState { constant: 3, slope_scale: 0.25, clamp: 0.0 })
        );
        assert_eq!(w.depth_bias_state().constant, 3);
    }

    #[test]
    fn pipeline_helpers() {
        let w = compile(NO_LINES, &RasterizerDesc::default(), false).unwrap();

        let strip = w.primitive_state(wgpu::PrimitiveTopology::TriangleStrip);
        assert_eq!(strip.topology, wgpu::PrimitiveTopology::TriangleStrip);
        assert_eq!(strip.cull_mode, w.primitive.cull_mode);

        assert_eq!(w.multisample_state(4).count, 4);
        assert_eq!(w.depth_bias_state(), wgpu::DepthBiasState::default());

        let single = compile(
            NO_LINES,
            &RasterizerDesc { multi_sample_anti_alias: false, ..RasterizerDesc::default() },
            false,
        )
        .unwrap();
        assert_eq!(single.multisample_state(4).count, 1);
    }
}
