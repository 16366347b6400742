use crate::state::{FillMode, RasterizerDesc};

use super::{front_face, D3d11CullMode, D3d11FillMode, D3d11RasterizerDesc, Winding};

/// Direct3D 11 expresses every field, so this never fails.
pub(super) fn compile(desc: &RasterizerDesc, offscreen: bool) -> D3d11RasterizerDesc {
    let front = front_face(desc.cull_mode, offscreen);

    let fill_mode = match desc.fill_mode {
        FillMode::Solid => D3d11FillMode::Solid,
        FillMode::WireFrame => D3d11FillMode::Wireframe,
    };

    let (depth_bias, slope_scaled_depth_bias) = if desc.has_depth_offset() {
        // D3D depth bias is an integer count of minimum resolvable depth units.
        (desc.depth_bias as i32, desc.slope_scale_depth_bias)
    } else {
        (0, 0.0)
    };

    D3d11RasterizerDesc {
        fill_mode,
        cull_mode: if front.is_some() { D3d11CullMode::Back } else { D3d11CullMode::None },
        front_counter_clockwise: front == Some(Winding::Ccw),
        depth_bias,
        // Feature level 9.x requires these exact values.
        depth_bias_clamp: 0.0,
        depth_clip_enable: true,
        slope_scaled_depth_bias,
        scissor_enable: desc.scissor_test_enable,
        multisample_enable: desc.multi_sample_anti_alias,
        antialiased_line_enable: false,
        depth_bias_enable: desc.has_depth_offset(),
    }
}
