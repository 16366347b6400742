use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::backend::{
    Backend, NativeHandle, NativeRasterizerDesc, NativeRasterizerState, WgpuRasterizerDesc,
};

use super::{DeviceError, DeviceId, DeviceInit, DeviceLifecycle, GraphicsDevice};

/// Scissor rectangle in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ScissorRect {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Clips the rectangle to a `width` x `height` target.
    ///
    /// Returns `None` when nothing of it is left; the draw should be skipped.
    pub fn clamped(self, width: u32, height: u32) -> Option<Self> {
        let x0 = self.x.min(width);
        let y0 = self.y.min(height);
        let x1 = self.x.saturating_add(self.width).min(width);
        let y1 = self.y.saturating_add(self.height).min(height);

        if x1 > x0 && y1 > y0 {
            Some(Self::new(x0, y0, x1 - x0, y1 - y0))
        } else {
            None
        }
    }
}

/// Color texture usable as an off-screen render target.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Headless wgpu device.
///
/// Owns the wgpu Adapter/Device/Queue plus the device-side state that
/// rasterizer states interact with:
/// - the off-screen render-target stack (non-empty means off-screen)
/// - the scissor rectangle
/// - the currently bound rasterizer description, read by pipeline builders
/// - the reset lifecycle, fired by [`recreate`](Self::recreate)
pub struct WgpuDevice {
    id: DeviceId,
    init: DeviceInit,

    /// Kept to request replacement devices.
    adapter: wgpu::Adapter,

    device: wgpu::Device,
    queue: wgpu::Queue,
    backend: Backend,

    /// Set by wgpu's device-lost callback.
    lost: Arc<AtomicBool>,

    lifecycle: DeviceLifecycle,
    render_targets: Vec<OffscreenTarget>,
    scissor: Option<ScissorRect>,
    bound: Option<(NativeHandle, WgpuRasterizerDesc)>,
    next_handle: u64,
}

impl WgpuDevice {
    /// Creates a device without a surface.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(init: DeviceInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: init.force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = request_device(&adapter, &init).await?;

        let id = DeviceId::next();
        let lost = watch_device_lost(&device, id);
        let backend = backend_of(&device);

        let info = adapter.get_info();
        log::info!("{id}: {} via {:?} ({backend:?})", info.name, info.backend);

        Ok(Self {
            id,
            init,
            adapter,
            device,
            queue,
            backend,
            lost,
            lifecycle: DeviceLifecycle::new(),
            render_targets: Vec::new(),
            scissor: None,
            bound: None,
            next_handle: 1,
        })
    }

    /// Blocking variant of [`new`](Self::new).
    pub fn new_blocking(init: DeviceInit) -> Result<Self> {
        pollster::block_on(Self::new(init))
    }

    /// Replaces the logical device with a fresh one from the same adapter.
    ///
    /// Render targets and the bound rasterizer belong to the old device and
    /// are dropped. The reset notification is delivered before this returns,
    /// so no draw reaches the new device with stale state.
    pub fn recreate(&mut self) -> Result<()> {
        let (device, queue) = pollster::block_on(request_device(&self.adapter, &self.init))
            .context("failed to recreate wgpu device")?;

        let old = self.id;
        self.id = DeviceId::next();
        self.lost = watch_device_lost(&device, self.id);
        self.backend = backend_of(&device);
        self.device = device;
        self.queue = queue;

        self.render_targets.clear();
        self.bound = None;

        log::info!("{old} recreated as {}", self.id);
        self.lifecycle.notify_reset();
        Ok(())
    }

    /// True once wgpu has reported the device as lost.
    pub fn is_lost(&self) -> bool {
        self.lost.load(Ordering::Acquire)
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Allocates a color target of `width` x `height` (clamped to at least 1x1).
    pub fn create_offscreen_target(
        &self,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> OffscreenTarget {
        let width = width.max(1);
        let height = height.max(1);

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tessera offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        OffscreenTarget {
            texture,
            view,
            format,
            width,
            height,
        }
    }

    /// Redirects drawing to `target`.
    pub fn push_render_target(&mut self, target: OffscreenTarget) {
        self.render_targets.push(target);
    }

    pub fn pop_render_target(&mut self) -> Option<OffscreenTarget> {
        self.render_targets.pop()
    }

    /// Target currently drawn to, if off-screen.
    pub fn render_target(&self) -> Option<&OffscreenTarget> {
        self.render_targets.last()
    }

    /// Sets the rectangle used when the bound state enables scissoring.
    pub fn set_scissor_rect(&mut self, rect: Option<ScissorRect>) {
        self.scissor = rect;
    }

    pub fn scissor_rect(&self) -> Option<ScissorRect> {
        self.scissor
    }

    /// Currently bound rasterizer description.
    pub fn bound_rasterizer(&self) -> Option<&WgpuRasterizerDesc> {
        self.bound.as_ref().map(|(_, desc)| desc)
    }

    /// Scissor to set on a render pass over a `width` x `height` target.
    ///
    /// Full target unless the bound state enables the scissor test and a
    /// rectangle is set. `None` means the rectangle misses the target.
    pub fn scissor_for(&self, width: u32, height: u32) -> Option<ScissorRect> {
        let full = ScissorRect::new(0, 0, width, height);
        match (self.bound_rasterizer(), self.scissor) {
            (Some(desc), Some(rect)) if desc.scissor_test => rect.clamped(width, height),
            _ => Some(full),
        }
    }
}

impl GraphicsDevice for WgpuDevice {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn backend(&self) -> Backend {
        self.backend
    }

    fn render_target_count(&self) -> usize {
        self.render_targets.len()
    }

    fn create_rasterizer_state(
        &mut self,
        desc: NativeRasterizerDesc,
    ) -> Result<NativeRasterizerState, DeviceError> {
        if self.is_lost() {
            return Err(DeviceError::Lost(self.id));
        }

        let NativeRasterizerDesc::Wgpu(wgpu_desc) = &desc else {
            return Err(DeviceError::BackendMismatch {
                expected: self.backend,
                found: desc.family(),
            });
        };

        if wgpu_desc.primitive.polygon_mode != wgpu::PolygonMode::Fill
            && !self.device.features().contains(wgpu::Features::POLYGON_MODE_LINE)
        {
            return Err(DeviceError::Native(
                "non-fill polygon mode requires POLYGON_MODE_LINE".into(),
            ));
        }

        let handle = NativeHandle(self.next_handle);
        self.next_handle += 1;
        Ok(NativeRasterizerState::new(handle, desc))
    }

    fn bind_rasterizer_state(&mut self, state: &NativeRasterizerState) {
        match state.desc() {
            NativeRasterizerDesc::Wgpu(desc) => self.bound = Some((state.handle(), *desc)),
            other => log::error!(
                "{}: ignoring {} rasterizer state {}",
                self.id,
                other.family(),
                state.handle()
            ),
        }
    }

    fn lifecycle(&self) -> &DeviceLifecycle {
        &self.lifecycle
    }
}

async fn request_device(
    adapter: &wgpu::Adapter,
    init: &DeviceInit,
) -> Result<(wgpu::Device, wgpu::Queue)> {
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some(init.label),
            required_features: init.required_features(adapter.features()),
            required_limits: init.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to create wgpu device/queue")
}

fn backend_of(device: &wgpu::Device) -> Backend {
    Backend::Wgpu {
        polygon_mode_line: device.features().contains(wgpu::Features::POLYGON_MODE_LINE),
    }
}

fn watch_device_lost(device: &wgpu::Device, id: DeviceId) -> Arc<AtomicBool> {
    let lost = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&lost);
    device.set_device_lost_callback(move |reason, message| {
        flag.store(true, Ordering::Release);
        if matches!(reason, wgpu::DeviceLostReason::Destroyed) {
            log::debug!("{id} destroyed: {message}");
        } else {
            log::warn!("{id} lost ({reason:?}): {message}");
        }
    });
    lost
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scissor_inside_target_is_unchanged() {
        let r = ScissorRect::new(10, 20, 30, 40);
        assert_eq!(r.clamped(100, 100), Some(r));
    }

    #[test]
    fn scissor_is_clipped_to_target() {
        let r = ScissorRect::new(90, 90, 50, 50);
        assert_eq!(r.clamped(100, 100), Some(ScissorRect::new(90, 90, 10, 10)));
    }

    #[test]
    fn scissor_outside_target_is_none() {
        assert_eq!(ScissorRect::new(100, 0, 10, 10).clamped(100, 100), None);
        assert_eq!(ScissorRect::new(0, 0, 0, 10).clamped(100, 100), None);
    }

    #[test]
    fn scissor_does_not_overflow() {
        let r = ScissorRect::new(u32::MAX - 1, 0, u32::MAX, 5);
        assert_eq!(r.clamped(100, 100), None);
    }

    // ── device (needs an adapter) ─────────────────────────────────────────

    use crate::state::{RasterizerDesc, RasterizerState};

    /// Software adapter, or `None` on machines without one.
    fn fallback_device() -> Option<WgpuDevice> {
        let init = DeviceInit {
            force_fallback_adapter: true,
            ..DeviceInit::default()
        };
        match WgpuDevice::new_blocking(init) {
            Ok(device) => Some(device),
            Err(err) => {
                eprintln!("skipping: {err:#}");
                None
            }
        }
    }

    #[test]
    fn scissor_for_follows_the_bound_state() {
        let Some(mut device) = fallback_device() else {
            return;
        };
        let target = device.create_offscreen_target(100, 100, wgpu::TextureFormat::Rgba8Unorm);
        device.push_render_target(target);
        device.set_scissor_rect(Some(ScissorRect::new(90, 90, 50, 50)));

        let full = Some(ScissorRect::new(0, 0, 100, 100));
        assert_eq!(device.scissor_for(100, 100), full);

        let plain = Arc::new(RasterizerState::new(RasterizerDesc::default()));
        plain.apply(&mut device).unwrap();
        assert_eq!(device.scissor_for(100, 100), full);

        let scissored = Arc::new(RasterizerState::new(RasterizerDesc {
            scissor_test_enable: true,
            ..RasterizerDesc::default()
        }));
        scissored.apply(&mut device).unwrap();
        assert_eq!(device.scissor_for(100, 100), Some(ScissorRect::new(90, 90, 10, 10)));

        device.set_scissor_rect(Some(ScissorRect::new(200, 0, 10, 10)));
        assert_eq!(device.scissor_for(100, 100), None);
    }

    #[test]
    fn create_rejects_descriptions_for_another_backend() {
        let Some(mut device) = fallback_device() else {
            return;
        };
        let gl = Backend::OpenGl.compile(&RasterizerDesc::default(), false).unwrap();

        let err = device.create_rasterizer_state(gl).unwrap_err();
        assert!(
            matches!(err, DeviceError::BackendMismatch { found: "GL", .. }),
            "{err}"
        );
    }

    #[test]
    fn create_fails_once_lost() {
        let Some(mut device) = fallback_device() else {
            return;
        };
        let desc = device.backend().compile(&RasterizerDesc::default(), false).unwrap();
        assert!(device.create_rasterizer_state(desc).is_ok());

        device.lost.store(true, Ordering::Release);
        assert!(device.is_lost());
        assert_eq!(
            device.create_rasterizer_state(desc).unwrap_err(),
            DeviceError::Lost(device.id())
        );
    }
}
