use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Weak;

use parking_lot::Mutex;

use crate::state::PresetRegistry;

/// Receives the device-reset notification.
///
/// Implementations drop whatever native objects they hold for the old
/// device. They run synchronously inside [`DeviceLifecycle::notify_reset`]
/// and must not call back into the device.
pub trait DeviceResetListener: Send + Sync {
    fn on_device_reset(&self);
}

/// Handle returned by [`DeviceLifecycle::subscribe`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    listener: Weak<dyn DeviceResetListener>,
}

/// Per-device reset channel plus the preset registry.
///
/// Owned by the device. Listeners are held weakly; a listener that has been
/// dropped is skipped and pruned. Each subscription fires at most once: a
/// reset consumes all of them, and listeners subscribe again when they next
/// compile against the device.
pub struct DeviceLifecycle {
    subscriptions: Mutex<Vec<Subscription>>,
    next_subscription: AtomicU64,
    presets: PresetRegistry,
    reset_count: u64,
}

impl DeviceLifecycle {
    pub fn new() -> Self {
        Self {
            subscriptions: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
            presets: PresetRegistry::new(),
            reset_count: 0,
        }
    }

    /// Registers `listener` for the next reset.
    pub fn subscribe(&self, listener: Weak<dyn DeviceResetListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        let mut subscriptions = self.subscriptions.lock();
        subscriptions.retain(|s| s.listener.strong_count() > 0);
        subscriptions.push(Subscription { id, listener });
        id
    }

    /// Removes a subscription. Returns false if it already fired or was removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.lock();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        subscriptions.len() != before
    }

    /// Number of subscribed listeners that are still alive.
    pub fn listener_count(&self) -> usize {
        self.subscriptions
            .lock()
            .iter()
            .filter(|s| s.listener.strong_count() > 0)
            .count()
    }

    /// Canonical rasterizer presets for this device.
    #[inline]
    pub fn presets(&self) -> &PresetRegistry {
        &self.presets
    }

    /// Number of resets delivered so far.
    #[inline]
    pub fn reset_count(&self) -> u64 {
        self.reset_count
    }

    /// Delivers a device reset.
    ///
    /// Call once per loss-and-recreate cycle, after the new device exists and
    /// before any draw call on it. Every live listener is notified exactly
    /// once, all subscriptions are consumed, and the presets are discarded.
    pub fn notify_reset(&mut self) {
        let subscriptions = std::mem::take(self.subscriptions.get_mut());

        let mut notified = 0usize;
        for subscription in subscriptions {
            if let Some(listener) = subscription.listener.upgrade() {
                listener.on_device_reset();
                notified += 1;
            }
        }

        self.presets.reset();
        self.reset_count += 1;

        log::info!(
            "device reset #{}: {notified} listener(s) notified, presets cleared",
            self.reset_count
        );
    }
}

impl Default for DeviceLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
