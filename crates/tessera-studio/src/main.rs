//! Headless rasterizer-state demo.
//!
//! Renders into an off-screen target with each preset and a custom
//! wireframe state, recreates the device, and renders again. Run with
//! `RUST_LOG=tessera_engine=debug` to watch compilation and reset.

mod triangle;

use std::sync::Arc;

use anyhow::{Context, Result};

use tessera_engine::device::{DeviceInit, GraphicsDevice, ScissorRect, WgpuDevice};
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::state::{
    FillMode, Preset, RasterizerDesc, RasterizerError, RasterizerState,
};

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const TARGET_SIZE: u32 = 256;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut device =
        WgpuDevice::new_blocking(DeviceInit::default()).context("failed to create device")?;
    let adapter = device.adapter_info();
    log::info!("rendering on {} ({:?})", adapter.name, adapter.backend);

    let wireframe = Arc::new(RasterizerState::labeled(
        "studio_wireframe",
        RasterizerDesc {
            fill_mode: FillMode::WireFrame,
            scissor_test_enable: true,
            ..RasterizerDesc::default()
        },
    ));

    render_frame(&mut device, &wireframe)?;
    device.recreate()?;
    render_frame(&mut device, &wireframe)?;

    log::info!(
        "done after {} device reset(s)",
        device.lifecycle().reset_count()
    );
    Ok(())
}

fn render_frame(device: &mut WgpuDevice, wireframe: &Arc<RasterizerState>) -> Result<()> {
    let target = device.create_offscreen_target(TARGET_SIZE, TARGET_SIZE, TARGET_FORMAT);
    device.push_render_target(target);
    device.set_scissor_rect(Some(ScissorRect::new(64, 64, 128, 128)));

    for preset in Preset::ALL {
        let state = device.lifecycle().presets().get(preset);
        state.apply(device)?;
        triangle::draw(device)?;
        log::info!(
            "{}: drew with {:?}",
            preset.label(),
            device.bound_rasterizer().map(|r| r.primitive.front_face)
        );
    }

    match wireframe.apply(device) {
        Ok(()) => triangle::draw(device)?,
        Err(err @ RasterizerError::Unsupported { .. }) => {
            log::warn!("skipping wireframe pass: {err}");
        }
        Err(err) => return Err(err.into()),
    }

    if let Some(target) = device.pop_render_target() {
        let extent = target.texture().size();
        log::debug!("frame done on {}x{} target", extent.width, extent.height);
    }
    Ok(())
}
