//! Voice registry and handle space.
//!
//! Handles are opaque 64-bit identities allocated from a monotonic counter,
//! so a destroyed handle can never be confused with a later voice. Every
//! public operation resolves its handle here first; an unknown handle is
//! always `BadHandle`, never a dereference.

use std::collections::HashMap;
use std::num::NonZeroU64;

use tracing::debug;

use crate::status::{SegaError, SegaResult};
use crate::voice::Voice;

/// Opaque, stable identity of one voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceHandle(NonZeroU64);

impl VoiceHandle {
    pub fn from_raw(raw: u64) -> Option<VoiceHandle> {
        NonZeroU64::new(raw).map(VoiceHandle)
    }

    pub fn raw(self) -> u64 {
        self.0.get()
    }
}

pub(crate) struct Registry {
    voices: HashMap<VoiceHandle, Voice>,
    next: NonZeroU64,
}

impl Registry {
    pub(crate) fn new() -> Registry {
        Registry {
            voices: HashMap::new(),
            next: NonZeroU64::MIN,
        }
    }

    /// Reserves the next handle. Burned handles are never reissued, even
    /// when voice construction fails afterwards.
    pub(crate) fn allocate(&mut self) -> VoiceHandle {
        let handle = VoiceHandle(self.next);
        self.next = self.next.checked_add(1).unwrap_or(NonZeroU64::MIN);
        handle
    }

    pub(crate) fn insert(&mut self, handle: VoiceHandle, voice: Voice) {
        debug!(handle = handle.raw(), "voice registered");
        self.voices.insert(handle, voice);
    }

    pub(crate) fn get(&self, handle: VoiceHandle) -> SegaResult<&Voice> {
        self.voices.get(&handle).ok_or(SegaError::BadHandle)
    }

    pub(crate) fn remove(&mut self, handle: VoiceHandle) -> SegaResult<Voice> {
        let voice = self.voices.remove(&handle).ok_or(SegaError::BadHandle)?;
        debug!(handle = handle.raw(), "voice removed");
        Ok(voice)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.values()
    }

    pub(crate) fn drain(&mut self) -> Vec<Voice> {
        self.voices.drain().map(|(_, voice)| voice).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.voices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_monotonic_and_nonzero() {
        let mut registry = Registry::new();
        let a = registry.allocate();
        let b = registry.allocate();
        assert_ne!(a, b);
        assert!(a.raw() > 0);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn raw_zero_is_not_a_handle() {
        assert!(VoiceHandle::from_raw(0).is_none());
        assert!(VoiceHandle::from_raw(7).is_some());
    }

    #[test]
    fn lookup_of_unknown_handle_is_bad_handle() {
        let registry = Registry::new();
        let bogus = VoiceHandle::from_raw(41).unwrap();
        assert!(matches!(registry.get(bogus), Err(SegaError::BadHandle)));
    }
}
