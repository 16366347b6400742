use std::sync::Arc;

use pretty_assertions::assert_eq;

use tessera_engine::backend::{
    Backend, GlCullFace, GlPolygonMode, GlPolygonOffset, GlRasterizerDesc,
    NativeRasterizerDesc, Winding,
};
use tessera_engine::device::{GraphicsDevice, RecordingDevice};
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::state::{CullMode, FillMode, Preset, RasterizerDesc, RasterizerState};

fn setup(backend: Backend) -> RecordingDevice {
    init_logging(LoggingConfig::for_tests());
    RecordingDevice::new(backend)
}

#[test]
fn presets_survive_a_frame_and_come_back_fresh_after_reset() {
    let mut device = setup(Backend::OpenGl);

    let presets: Vec<_> = Preset::ALL
        .iter()
        .map(|&p| device.lifecycle().presets().get(p))
        .collect();
    for state in &presets {
        state.apply(&mut device).unwrap();
        state.apply(&mut device).unwrap();
    }
    assert_eq!(device.create_count(), 3);
    assert_eq!(device.lifecycle().listener_count(), 3);

    device.recreate();

    for (preset, old) in Preset::ALL.iter().zip(&presets) {
        assert!(!old.is_bound());
        let fresh = device.lifecycle().presets().get(*preset);
        assert!(!Arc::ptr_eq(old, &fresh));
        assert_eq!(fresh.desc(), RasterizerDesc::with_cull_mode(preset.cull_mode()));
        assert!(!fresh.is_bound());
    }

    let cull_none = device.lifecycle().presets().cull_none();
    cull_none.apply(&mut device).unwrap();
    cull_none.apply(&mut device).unwrap();
    assert_eq!(device.create_count(), 4);
    assert_eq!(device.bound().unwrap().front_face(), None);
}

#[test]
fn offscreen_pass_between_main_passes() {
    let mut device = setup(Backend::OpenGl);
    let cw = device.lifecycle().presets().cull_clockwise();

    cw.apply(&mut device).unwrap();
    assert_eq!(device.bound().unwrap().front_face(), Some(Winding::Ccw));

    device.set_render_target_count(1);
    cw.apply(&mut device).unwrap();
    assert_eq!(device.bound().unwrap().front_face(), Some(Winding::Cw));

    device.set_render_target_count(0);
    cw.apply(&mut device).unwrap();
    assert_eq!(device.bound().unwrap().front_face(), Some(Winding::Ccw));

    assert_eq!(device.create_count(), 2);
}

#[test]
fn shadow_bias_state_on_gl() {
    let mut device = setup(Backend::OpenGl);
    let state = Arc::new(RasterizerState::labeled(
        "shadow",
        RasterizerDesc {
            cull_mode: CullMode::CullClockwiseFace,
            fill_mode: FillMode::WireFrame,
            depth_bias: 2.0,
            slope_scale_depth_bias: 0.5,
            scissor_test_enable: true,
            multi_sample_anti_alias: true,
        },
    ));

    device.set_render_target_count(1);
    state.apply(&mut device).unwrap();

    assert_eq!(
        device.bound().copied(),
        Some(NativeRasterizerDesc::Gl(GlRasterizerDesc {
            cull_face: Some(GlCullFace {
                front_face: Winding::Cw,
            }),
            polygon_mode: GlPolygonMode::Line,
            scissor_test: true,
            polygon_offset: Some(GlPolygonOffset {
                factor: 0.5,
                units: 2.0,
            }),
        }))
    );
}

#[test]
fn same_state_on_every_backend() {
    for backend in [
        Backend::OpenGl,
        Backend::OpenGlEs,
        Backend::Direct3D11,
        Backend::Wgpu { polygon_mode_line: false },
    ] {
        let mut device = setup(backend);
        let state = Arc::new(RasterizerState::new(RasterizerDesc::default()));

        state.apply(&mut device).unwrap();

        let bound = device.bound().unwrap();
        assert!(bound.is_for(backend), "{backend}");
        assert_eq!(bound.front_face(), Some(Winding::Cw), "{backend}");
        assert_eq!(bound.depth_offset(), None, "{backend}");
        assert!(!bound.is_wireframe(), "{backend}");
    }
}
