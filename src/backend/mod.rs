//! Abstract playback backend.
//!
//! The voice engine talks to the underlying audio system through two small
//! traits: [AudioBackend] creates voices and owns master gain, and
//! [NativeVoice] is one playback primitive with the capability set the
//! engine needs: start, stop, flush, submit a buffer, frequency ratio,
//! whole-voice gain, an output matrix, and queue/position queries. Any
//! engine that can satisfy this set can sit underneath the registry.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::params::WaveFormat;

pub(crate) mod null;

#[cfg(feature = "cpal-backend")]
pub(crate) mod cpal;

pub use self::null::NullBackend;

#[cfg(feature = "cpal-backend")]
pub use self::cpal::CpalBackend;

/// Backend handle shared between the context and every voice record, so
/// deferred changes can recreate native voices from the drain path.
pub(crate) type SharedBackend = Arc<Mutex<Box<dyn AudioBackend>>>;

/// Failures surfaced by a backend.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("no usable output device: {0}")]
    DeviceUnavailable(String),
    #[error("native voice construction failed: {0}")]
    VoiceCreation(String),
    #[error("backend rejected the operation: {0}")]
    Operation(String),
}

/// One buffer handed to a native voice.
///
/// `data` is interleaved PCM matching the voice wave format. Loop fields
/// are in frames, relative to the start of `data`; when `looping` is false
/// they are zero and ignored.
#[derive(Debug, Clone)]
pub struct SubmitDesc {
    pub data: Vec<u8>,
    pub loop_begin: u32,
    pub loop_frames: u32,
    pub looping: bool,
}

/// Invoked by the backend when a voice's buffer queue reaches zero.
///
/// Always called from the backend's own thread, never synchronously from
/// inside a [NativeVoice] method; the hook may take the voice lock.
pub type DrainHook = Box<dyn Fn() + Send + Sync>;

/// The playback primitive a voice record owns.
pub trait NativeVoice: Send {
    fn start(&mut self) -> Result<(), BackendError>;

    /// Halts consumption without discarding queued audio.
    fn stop(&mut self) -> Result<(), BackendError>;

    /// Discards any queued buffer. Does not fire the drain hook.
    fn flush(&mut self) -> Result<(), BackendError>;

    /// Queues one buffer. At most one buffer is in flight per voice; the
    /// engine flushes before resubmitting.
    fn submit(&mut self, desc: SubmitDesc) -> Result<(), BackendError>;

    fn set_frequency_ratio(&mut self, ratio: f32) -> Result<(), BackendError>;

    /// Whole-voice gain, applied on top of the output matrix.
    fn set_volume(&mut self, gain: f32) -> Result<(), BackendError>;

    /// Routing gains, row-major `[output_channel][input_channel]` with
    /// `output_channels` rows of `source_channels` entries each.
    fn set_output_matrix(
        &mut self,
        source_channels: u32,
        matrix: &[f32],
    ) -> Result<(), BackendError>;

    fn buffers_queued(&self) -> u32;

    /// Frames consumed since creation, monotonic across submissions.
    fn frames_played(&self) -> u64;
}

/// The audio system underneath the registry.
pub trait AudioBackend: Send {
    fn create_voice(
        &mut self,
        format: &WaveFormat,
        on_drain: DrainHook,
    ) -> Result<Box<dyn NativeVoice>, BackendError>;

    /// Width of the output matrix.
    fn output_channels(&self) -> u32;

    /// Master gain for one physical output channel.
    fn set_output_gain(&mut self, output_channel: usize, gain: f32) -> Result<(), BackendError>;

    /// Restores unity master gain on every output channel.
    fn reset_output_gains(&mut self) -> Result<(), BackendError>;
}
