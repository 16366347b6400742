use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identity of a native device instance.
///
/// A recreated device gets a new id, so objects compiled for the old one can
/// never be mistaken for objects of the new one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DeviceId(u64);

impl DeviceId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device#{}", self.0)
    }
}
