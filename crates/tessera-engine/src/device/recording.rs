use crate::backend::{Backend, NativeHandle, NativeRasterizerDesc, NativeRasterizerState};

use super::{DeviceError, DeviceId, DeviceLifecycle, GraphicsDevice};

/// CPU-only device that records what it is asked to do.
///
/// Works for any [`Backend`], which makes backend translation and the
/// bind/reset protocol checkable without a GPU.
pub struct RecordingDevice {
    id: DeviceId,
    backend: Backend,
    render_target_count: usize,
    lifecycle: DeviceLifecycle,

    next_handle: u64,
    created: Vec<NativeRasterizerDesc>,
    bindings: Vec<NativeHandle>,
    bound: Option<NativeRasterizerDesc>,

    fail_next: Option<DeviceError>,
}

impl RecordingDevice {
    pub fn new(backend: Backend) -> Self {
        Self {
            id: DeviceId::next(),
            backend,
            render_target_count: 0,
            lifecycle: DeviceLifecycle::new(),
            next_handle: 1,
            created: Vec::new(),
            bindings: Vec::new(),
            bound: None,
            fail_next: None,
        }
    }

    /// Simulates pushing or popping off-screen render targets.
    pub fn set_render_target_count(&mut self, count: usize) {
        self.render_target_count = count;
    }

    /// Makes the next `create_rasterizer_state` call fail with `err`.
    pub fn fail_next_create(&mut self, err: DeviceError) {
        self.fail_next = Some(err);
    }

    /// Number of native objects created since construction.
    pub fn create_count(&self) -> usize {
        self.created.len()
    }

    /// Every description created, in order.
    pub fn created(&self) -> &[NativeRasterizerDesc] {
        &self.created
    }

    /// Every bind, in order.
    pub fn bindings(&self) -> &[NativeHandle] {
        &self.bindings
    }

    /// Description of the currently bound object.
    pub fn bound(&self) -> Option<&NativeRasterizerDesc> {
        self.bound.as_ref()
    }

    /// Replaces the native device: new id, bindings cleared, reset delivered.
    ///
    /// Render-target count and the create/bind history survive.
    pub fn recreate(&mut self) {
        let old = self.id;
        self.id = DeviceId::next();
        self.bound = None;
        log::debug!("recording device {old} recreated as {}", self.id);
        self.lifecycle.notify_reset();
    }
}

impl GraphicsDevice for RecordingDevice {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn backend(&self) -> Backend {
        self.backend
    }

    fn render_target_count(&self) -> usize {
        self.render_target_count
    }

    fn create_rasterizer_state(
        &mut self,
        desc: NativeRasterizerDesc,
    ) -> Result<NativeRasterizerState, DeviceError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        if !desc.is_for(self.backend) {
            return Err(DeviceError::BackendMismatch {
                expected: self.backend,
                found: desc.family(),
            });
        }

        let handle = NativeHandle(self.next_handle);
        self.next_handle += 1;
        self.created.push(desc);
        Ok(NativeRasterizerState::new(handle, desc))
    }

    fn bind_rasterizer_state(&mut self, state: &NativeRasterizerState) {
        self.bindings.push(state.handle());
        self.bound = Some(*state.desc());
    }

    fn lifecycle(&self) -> &DeviceLifecycle {
        &self.lifecycle
    }
}
