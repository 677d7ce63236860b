//! Voice-management shim that reimplements the legacy SEGA HA/WOSE audio
//! API on top of a pluggable playback backend.
//!
//! One [context::Context] is one instance of the legacy surface: an opaque
//! handle space of voices, each owning a native playback voice plus the
//! loop, pitch, volume, and send-routing state the original hardware API
//! exposed. Old callers go through the `SEGAAPI_*` exports (feature
//! `capi`); Rust callers construct a context directly.

pub(crate) mod utils;

pub mod backend;
pub mod builders;
pub mod context;
pub mod params;
pub mod registry;
pub mod status;
pub mod voice;

#[cfg(feature = "capi")]
pub mod capi;

pub use context::Context;
pub use registry::VoiceHandle;
pub use status::{PlaybackStatus, SegaError, SegaResult, Status};

use builders::VoiceBuilder;

/// Constructs a context on the default backend.
///
/// With the `cpal-backend` feature this opens the default output device;
/// without it, the silent backend is used and the full API remains
/// functional for headless callers.
pub fn create_context() -> SegaResult<Context> {
    Context::with_default_backend()
}

/// Constructs a new voice builder.
///
/// The builder can be further configured with format, size, and routing
/// options; build() registers the voice and returns its handle.
pub fn create_voice() -> VoiceBuilder {
    VoiceBuilder::new()
}

#[allow(unused_imports)]
pub mod prelude {
    pub use crate::backend::{AudioBackend, BackendError, DrainHook, NativeVoice, SubmitDesc};
    pub use crate::context::Context;
    pub use crate::params::*;
    pub use crate::registry::VoiceHandle;
    pub use crate::status::{PlaybackStatus, SegaError, SegaResult, Status};
    pub use crate::voice::{BufferCallback, BufferConfig, BufferMessage, ExternalMemory};
}
