use std::sync::Arc;

use ::state::InitCell;

use super::{CullMode, RasterizerDesc, RasterizerState};

/// The three canonical rasterizer configurations.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Preset {
    CullClockwise,
    CullCounterClockwise,
    CullNone,
}

impl Preset {
    pub const ALL: [Preset; 3] = [
        Preset::CullClockwise,
        Preset::CullCounterClockwise,
        Preset::CullNone,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Preset::CullClockwise => "cull_clockwise",
            Preset::CullCounterClockwise => "cull_counter_clockwise",
            Preset::CullNone => "cull_none",
        }
    }

    pub fn cull_mode(self) -> CullMode {
        match self {
            Preset::CullClockwise => CullMode::CullClockwiseFace,
            Preset::CullCounterClockwise => CullMode::CullCounterClockwiseFace,
            Preset::CullNone => CullMode::None,
        }
    }

    /// Fresh, unbound state with defaults except the cull mode.
    pub fn build(self) -> RasterizerState {
        RasterizerState::labeled(self.label(), RasterizerDesc::with_cull_mode(self.cull_mode()))
    }
}

/// Lazily-built presets for one device.
///
/// Owned by [`DeviceLifecycle`](crate::device::DeviceLifecycle). Each preset
/// is built on first access and then returned by identity until the device
/// is reset, after which the next access builds a new instance. Replacing the
/// instance, rather than only unbinding it, discards any field changes made
/// to the old one.
pub struct PresetRegistry {
    cull_clockwise: InitCell<Arc<RasterizerState>>,
    cull_counter_clockwise: InitCell<Arc<RasterizerState>>,
    cull_none: InitCell<Arc<RasterizerState>>,
}

impl PresetRegistry {
    pub const fn new() -> Self {
        Self {
            cull_clockwise: InitCell::new(),
            cull_counter_clockwise: InitCell::new(),
            cull_none: InitCell::new(),
        }
    }

    fn cell(&self, preset: Preset) -> &InitCell<Arc<RasterizerState>> {
        match preset {
            Preset::CullClockwise => &self.cull_clockwise,
            Preset::CullCounterClockwise => &self.cull_counter_clockwise,
            Preset::CullNone => &self.cull_none,
        }
    }

    fn cell_mut(&mut self, preset: Preset) -> &mut InitCell<Arc<RasterizerState>> {
        match preset {
            Preset::CullClockwise => &mut self.cull_clockwise,
            Preset::CullCounterClockwise => &mut self.cull_counter_clockwise,
            Preset::CullNone => &mut self.cull_none,
        }
    }

    /// Returns the preset, building it on first access.
    ///
    /// Concurrent first accesses all observe the same instance.
    pub fn get(&self, preset: Preset) -> Arc<RasterizerState> {
        let state = self.cell(preset).get_or_init(|| {
            log::debug!("building rasterizer preset {}", preset.label());
            Arc::new(preset.build())
        });
        Arc::clone(state)
    }

    #[inline]
    pub fn cull_clockwise(&self) -> Arc<RasterizerState> {
        self.get(Preset::CullClockwise)
    }

    #[inline]
    pub fn cull_counter_clockwise(&self) -> Arc<RasterizerState> {
        self.get(Preset::CullCounterClockwise)
    }

    #[inline]
    pub fn cull_none(&self) -> Arc<RasterizerState> {
        self.get(Preset::CullNone)
    }

    /// True if the preset has been built since the last reset.
    pub fn is_live(&self, preset: Preset) -> bool {
        self.cell(preset).try_get().is_some()
    }

    /// Returns every preset to the unbuilt state.
    pub fn reset(&mut self) {
        for preset in Preset::ALL {
            if self.cell_mut(preset).take().is_some() {
                log::trace!("rasterizer preset {} discarded", preset.label());
            }
        }
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::new()
    }
}
