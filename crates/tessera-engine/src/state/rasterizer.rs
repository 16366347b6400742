use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::backend::NativeRasterizerState;
use crate::device::{DeviceId, DeviceResetListener, GraphicsDevice, SubscriptionId};

use super::{CullMode, FillMode, RasterizerDesc, RasterizerError};

/// Whether a device is drawing to its main target or to an off-screen one.
///
/// Off-screen targets flip the winding seen by the rasterizer, so compiled
/// objects are cached per kind.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TargetKind {
    Main,
    Offscreen,
}

impl TargetKind {
    #[inline]
    pub fn from_render_target_count(count: usize) -> Self {
        if count > 0 { TargetKind::Offscreen } else { TargetKind::Main }
    }

    #[inline]
    pub fn is_offscreen(self) -> bool {
        self == TargetKind::Offscreen
    }
}

/// Rasterizer configuration that compiles itself lazily for one device.
///
/// Lifecycle:
/// - **Unbound**: fields may be changed freely.
/// - **Bound** after the first successful [`apply`](Self::apply): the state
///   owns the native objects created for that device, and changing a field
///   panics.
/// - Back to **Unbound** when the device is reset, or on [`release`](Self::release).
///
/// Shared as `Arc<RasterizerState>`; the device keeps a weak reference to
/// deliver reset notifications.
#[derive(Debug, Default)]
pub struct RasterizerState {
    label: Option<String>,
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    desc: RasterizerDesc,
    binding: Binding,
}

#[derive(Debug, Default)]
enum Binding {
    #[default]
    Unbound,
    Bound(Compiled),
}

impl Binding {
    fn native(&self, target: TargetKind) -> Option<&NativeRasterizerState> {
        match self {
            Binding::Unbound => None,
            Binding::Bound(compiled) => compiled.slot(target).as_ref(),
        }
    }
}

#[derive(Debug)]
struct Compiled {
    device: DeviceId,
    subscription: SubscriptionId,
    main: Option<NativeRasterizerState>,
    offscreen: Option<NativeRasterizerState>,
}

impl Compiled {
    fn slot(&self, target: TargetKind) -> &Option<NativeRasterizerState> {
        match target {
            TargetKind::Main => &self.main,
            TargetKind::Offscreen => &self.offscreen,
        }
    }

    fn slot_mut(&mut self, target: TargetKind) -> &mut Option<NativeRasterizerState> {
        match target {
            TargetKind::Main => &mut self.main,
            TargetKind::Offscreen => &mut self.offscreen,
        }
    }
}

impl RasterizerState {
    pub fn new(desc: RasterizerDesc) -> Self {
        Self {
            label: None,
            inner: Mutex::new(Inner {
                desc,
                binding: Binding::Unbound,
            }),
        }
    }

    /// Same as [`new`](Self::new) with a label used in diagnostics.
    pub fn labeled(label: impl Into<String>, desc: RasterizerDesc) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new(desc)
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn name(&self) -> &str {
        self.label().unwrap_or("<unnamed>")
    }

    /// Snapshot of the logical fields.
    pub fn desc(&self) -> RasterizerDesc {
        self.inner.lock().desc
    }

    pub fn cull_mode(&self) -> CullMode {
        self.inner.lock().desc.cull_mode
    }

    pub fn fill_mode(&self) -> FillMode {
        self.inner.lock().desc.fill_mode
    }

    pub fn depth_bias(&self) -> f32 {
        self.inner.lock().desc.depth_bias
    }

    pub fn slope_scale_depth_bias(&self) -> f32 {
        self.inner.lock().desc.slope_scale_depth_bias
    }

    pub fn scissor_test_enable(&self) -> bool {
        self.inner.lock().desc.scissor_test_enable
    }

    pub fn multi_sample_anti_alias(&self) -> bool {
        self.inner.lock().desc.multi_sample_anti_alias
    }

    pub fn set_cull_mode(&self, cull_mode: CullMode) {
        self.update("cull_mode", |d| d.cull_mode = cull_mode);
    }

    pub fn set_fill_mode(&self, fill_mode: FillMode) {
        self.update("fill_mode", |d| d.fill_mode = fill_mode);
    }

    pub fn set_depth_bias(&self, depth_bias: f32) {
        self.update("depth_bias", |d| d.depth_bias = depth_bias);
    }

    pub fn set_slope_scale_depth_bias(&self, slope_scale_depth_bias: f32) {
        self.update("slope_scale_depth_bias", |d| {
            d.slope_scale_depth_bias = slope_scale_depth_bias
        });
    }

    pub fn set_scissor_test_enable(&self, enable: bool) {
        self.update("scissor_test_enable", |d| d.scissor_test_enable = enable);
    }

    pub fn set_multi_sample_anti_alias(&self, enable: bool) {
        self.update("multi_sample_anti_alias", |d| d.multi_sample_anti_alias = enable);
    }

    /// Replaces every field at once.
    pub fn set_desc(&self, desc: RasterizerDesc) {
        self.update("desc", |d| *d = desc);
    }

    /// # Panics
    /// If the state is bound to a device.
    fn update(&self, field: &str, f: impl FnOnce(&mut RasterizerDesc)) {
        let mut inner = self.inner.lock();
        if let Binding::Bound(compiled) = &inner.binding {
            panic!(
                "cannot change {field} of rasterizer state {}: it is bound to {}",
                self.name(),
                compiled.device
            );
        }
        f(&mut inner.desc);
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.inner.lock().binding, Binding::Bound(_))
    }

    /// Device the native objects were compiled for.
    pub fn bound_device(&self) -> Option<DeviceId> {
        match &self.inner.lock().binding {
            Binding::Unbound => None,
            Binding::Bound(compiled) => Some(compiled.device),
        }
    }

    /// Binds this configuration on `device` for subsequent draw calls.
    ///
    /// The first call for a device (per [`TargetKind`]) compiles the native
    /// object through the device's backend and caches it; later calls reuse
    /// it. On error the state is left as it was and nothing is bound.
    ///
    /// # Panics
    /// If the state is bound to a different device. A device reset must
    /// happen before a state moves to another device.
    pub fn apply<D>(self: &Arc<Self>, device: &mut D) -> Result<(), RasterizerError>
    where
        D: GraphicsDevice + ?Sized,
    {
        let device_id = device.id();
        let target = TargetKind::from_render_target_count(device.render_target_count());

        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if let Binding::Bound(compiled) = &inner.binding {
            if compiled.device != device_id {
                panic!(
                    "rasterizer state {} was compiled for {} but applied to {} \
                     without a device reset in between",
                    self.name(),
                    compiled.device,
                    device_id
                );
            }
        }

        if inner.binding.native(target).is_none() {
            let backend = device.backend();
            let native_desc = backend.compile(&inner.desc, target.is_offscreen())?;
            let native = device.create_rasterizer_state(native_desc)?;

            log::debug!(
                "compiled rasterizer state {} for {device_id} ({backend}, {target:?}) as {}",
                self.name(),
                native.handle()
            );

            if let Binding::Bound(compiled) = &mut inner.binding {
                *compiled.slot_mut(target) = Some(native);
            } else {
                let listener: Weak<Self> = Arc::downgrade(self);
                let subscription = device.lifecycle().subscribe(listener);

                let mut compiled = Compiled {
                    device: device_id,
                    subscription,
                    main: None,
                    offscreen: None,
                };
                *compiled.slot_mut(target) = Some(native);
                inner.binding = Binding::Bound(compiled);
            }
        }

        if let Some(native) = inner.binding.native(target) {
            device.bind_rasterizer_state(native);
        }
        Ok(())
    }

    /// Drops the native objects early and detaches from `device`.
    ///
    /// No-op when unbound.
    ///
    /// # Panics
    /// If the state is bound to a different device.
    pub fn release<D>(&self, device: &D)
    where
        D: GraphicsDevice + ?Sized,
    {
        let mut inner = self.inner.lock();
        let Binding::Bound(compiled) = &inner.binding else {
            return;
        };

        if compiled.device != device.id() {
            panic!(
                "rasterizer state {} is bound to {} and cannot be released through {}",
                self.name(),
                compiled.device,
                device.id()
            );
        }

        device.lifecycle().unsubscribe(compiled.subscription);
        log::debug!("released rasterizer state {} from {}", self.name(), compiled.device);
        inner.binding = Binding::Unbound;
    }
}

impl DeviceResetListener for RasterizerState {
    /// Drops the compiled objects. Idempotent.
    fn on_device_reset(&self) {
        let mut inner = self.inner.lock();
        if let Binding::Bound(compiled) = std::mem::take(&mut inner.binding) {
            log::trace!(
                "rasterizer state {} dropped its objects for {}",
                self.name(),
                compiled.device
            );
        }
    }
}
