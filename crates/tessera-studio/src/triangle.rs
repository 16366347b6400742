use anyhow::{Context, Result};

use tessera_engine::device::WgpuDevice;

/// Draws one counter-clockwise and one clockwise triangle into the current
/// off-screen target, using whatever rasterizer state is bound.
///
/// The pipeline is rebuilt per call; the bound state is baked into it.
pub fn draw(device: &WgpuDevice) -> Result<()> {
    let target = device.render_target().context("no off-screen target bound")?;
    let raster = device.bound_rasterizer().context("no rasterizer state bound")?;

    let (width, height) = target.size();
    let Some(scissor) = device.scissor_for(width, height) else {
        log::debug!("scissor rect misses the target; draw skipped");
        return Ok(());
    };

    let gpu = device.device();

    let shader = gpu.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("tessera studio triangle shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/triangle.wgsl").into()),
    });

    let pipeline_layout = gpu.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("tessera studio pipeline layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    let pipeline = gpu.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("tessera studio triangle pipeline"),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[],
        },

        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: target.format(),
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: raster.primitive_state(wgpu::PrimitiveTopology::TriangleList),

        // No depth attachment, so the bound depth bias has nothing to act on.
        depth_stencil: None,
        multisample: raster.multisample_state(1),

        multiview_mask: None,
        cache: None,
    });

    let mut encoder = gpu.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("tessera studio encoder"),
    });

    {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera studio triangle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.view(),
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&pipeline);
        rpass.set_scissor_rect(scissor.x, scissor.y, scissor.width, scissor.height);
        rpass.draw(0..6, 0..1);
    }

    device.queue().submit(std::iter::once(encoder.finish()));
    Ok(())
}
