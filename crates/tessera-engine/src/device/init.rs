/// Initialization parameters for [`WgpuDevice`](super::WgpuDevice).
///
/// Kept small on purpose; the device is headless, so there is no surface or
/// present configuration here.
#[derive(Debug, Clone)]
pub struct DeviceInit {
    /// Backends wgpu may pick an adapter from.
    pub backends: wgpu::Backends,

    pub power_preference: wgpu::PowerPreference,

    /// Use the software fallback adapter (useful in CI).
    pub force_fallback_adapter: bool,

    /// Request `POLYGON_MODE_LINE` when the adapter offers it.
    ///
    /// Without it, wireframe rasterizer states fail to compile on this device.
    pub request_wireframe: bool,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Debug label of the logical device.
    pub label: &'static str,
}

impl Default for DeviceInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            request_wireframe: true,
            required_limits: wgpu::Limits::default(),
            label: "tessera device",
        }
    }
}

impl DeviceInit {
    /// Features to request from an adapter offering `available`.
    pub(crate) fn required_features(&self, available: wgpu::Features) -> wgpu::Features {
        if self.request_wireframe && available.contains(wgpu::Features::POLYGON_MODE_LINE) {
            wgpu::Features::POLYGON_MODE_LINE
        } else {
            wgpu::Features::empty()
        }
    }
}
