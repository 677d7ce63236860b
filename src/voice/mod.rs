//! Voice records.
//!
//! A [Voice] is one legacy buffer: the record of everything the caller
//! configured plus the native voice it owns. The record proper lives in
//! [inner::VoiceInner] behind a mutex shared with the backend's drain
//! notification; the wrapper mirrors the playback state in an atomic so
//! state can be read without the lock.

use std::ffi::c_void;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex, Weak};

use atomic_enum::atomic_enum;
use tracing::warn;

use crate::backend::SharedBackend;
use crate::params::{
    BufferFlags, MAX_SENDS, MAX_VOICE_CHANNELS, Routing, SYNTH_PARAM_COUNT, SampleFormat,
    SynthParam, VOLUME_MAX, WaveFormat,
};
use crate::registry::VoiceHandle;
use crate::status::{SegaError, SegaResult};
use crate::utils::MutexPoison;
use crate::voice::inner::{BufferMemory, SendSlot, VoiceInner};

pub(crate) mod inner;

/// Lifecycle state of one voice.
#[atomic_enum]
#[derive(PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// Event delivered to a buffer callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum BufferMessage {
    /// The queued buffer finished and the voice queue drained.
    End = 0,
}

/// Caller-supplied notification hook, invoked off the caller thread when
/// the voice's buffer queue drains.
pub type BufferCallback = Arc<dyn Fn(VoiceHandle, BufferMessage) + Send + Sync>;

/// Caller-owned sample memory for the legacy mapped-buffer path.
#[derive(Debug, Clone, Copy)]
pub struct ExternalMemory {
    pub ptr: *mut u8,
    pub len: usize,
}

/// Everything `CreateBuffer` needs to size and shape a voice.
pub struct BufferConfig {
    pub priority: u32,
    pub sample_rate: u32,
    pub format: SampleFormat,
    pub channels: u32,
    /// Buffer size in bytes. Ignored when `memory` is supplied.
    pub size: u32,
    pub user_data: *mut c_void,
    /// Caller-owned memory; `None` makes the registry allocate and own it.
    pub memory: Option<ExternalMemory>,
}

impl Default for BufferConfig {
    fn default() -> BufferConfig {
        BufferConfig {
            priority: 0,
            sample_rate: 44100,
            format: SampleFormat::Signed16,
            channels: 1,
            size: 0,
            user_data: std::ptr::null_mut(),
            memory: None,
        }
    }
}

pub(crate) struct Voice {
    inner: Arc<Mutex<VoiceInner>>,
    state: Arc<AtomicPlaybackState>,
}

impl Voice {
    pub(crate) fn create(
        backend: &SharedBackend,
        handle: VoiceHandle,
        config: BufferConfig,
        callback: Option<BufferCallback>,
        flags: BufferFlags,
    ) -> SegaResult<Voice> {
        if config.channels == 0 || config.channels as usize > MAX_VOICE_CHANNELS {
            return Err(SegaError::BadParam);
        }
        crate::params::validate_sample_rate(config.sample_rate)?;
        if flags.contains(BufferFlags::USE_MAPPED_MEM) && config.memory.is_none() {
            return Err(SegaError::BadPointer);
        }

        let memory = match config.memory {
            Some(external) => BufferMemory::External {
                ptr: external.ptr,
                len: external.len,
            },
            None => {
                let len = config.size as usize;
                let mut data = Vec::new();
                data.try_reserve_exact(len)
                    .map_err(|_| SegaError::OutOfMemory)?;
                data.resize(len, config.format.silence_byte());
                BufferMemory::Owned(data)
            }
        };
        let size = memory.len() as u32;

        let format = WaveFormat {
            sample_rate: config.sample_rate,
            channels: config.channels,
            format: config.format,
        };
        let output_channels = backend.lock_poison().output_channels();
        let state = Arc::new(AtomicPlaybackState::new(PlaybackState::Stopped));

        let inner = Arc::new(Mutex::new(VoiceInner {
            handle,
            backend: Arc::clone(backend),
            output_channels,
            format,
            memory,
            priority: config.priority,
            user_data: config.user_data,
            callback,
            flags,
            state: Arc::clone(&state),
            weak_self: Weak::new(),
            start_loop: 0,
            end_loop: size,
            end_offset: size,
            looping: false,
            channel_volumes: [VOLUME_MAX; MAX_VOICE_CHANNELS],
            sends: [[SendSlot::default(); MAX_SENDS]; MAX_VOICE_CHANNELS],
            synth_params: [0; SYNTH_PARAM_COUNT],
            pitch_semitones: 0.0,
            ratio: 1.0,
            submit_offset: 0,
            frames_at_submit: 0,
            pending: std::collections::VecDeque::new(),
            native: None,
        }));
        inner.lock_poison().weak_self = Arc::downgrade(&inner);

        let hook = inner.lock_poison().make_drain_hook();
        let native = backend
            .lock_poison()
            .create_voice(&format, hook)
            .map_err(|err| {
                warn!(handle = handle.raw(), %err, "native voice construction failed");
                SegaError::Unknown
            })?;
        inner.lock_poison().native = Some(native);

        Ok(Voice { inner, state })
    }

    pub(crate) fn play(&self) -> SegaResult {
        self.inner.lock_poison().play()
    }

    pub(crate) fn stop(&self) -> SegaResult {
        self.inner.lock_poison().stop()
    }

    pub(crate) fn pause(&self) -> SegaResult {
        self.inner.lock_poison().pause()
    }

    pub(crate) fn update_buffer(&self, start: u32, len: u32) -> SegaResult {
        self.inner.lock_poison().update_buffer(start, len)
    }

    pub(crate) fn set_format(&self, format: WaveFormat) -> SegaResult {
        self.inner.lock_poison().set_format(format)
    }

    pub(crate) fn format(&self) -> WaveFormat {
        self.inner.lock_poison().format
    }

    pub(crate) fn set_sample_rate(&self, rate: u32) -> SegaResult {
        self.inner.lock_poison().set_sample_rate(rate)
    }

    pub(crate) fn sample_rate(&self) -> u32 {
        self.inner.lock_poison().format.sample_rate
    }

    pub(crate) fn set_priority(&self, priority: u32) {
        self.inner.lock_poison().priority = priority;
    }

    pub(crate) fn priority(&self) -> u32 {
        self.inner.lock_poison().priority
    }

    pub(crate) fn set_user_data(&self, user_data: *mut c_void) {
        self.inner.lock_poison().user_data = user_data;
    }

    pub(crate) fn user_data(&self) -> *mut c_void {
        self.inner.lock_poison().user_data
    }

    pub(crate) fn set_start_loop_offset(&self, offset: u32) -> SegaResult {
        self.inner.lock_poison().set_start_loop_offset(offset)
    }

    pub(crate) fn start_loop_offset(&self) -> u32 {
        self.inner.lock_poison().start_loop
    }

    pub(crate) fn set_end_loop_offset(&self, offset: u32) -> SegaResult {
        self.inner.lock_poison().set_end_loop_offset(offset)
    }

    pub(crate) fn end_loop_offset(&self) -> u32 {
        self.inner.lock_poison().end_loop
    }

    pub(crate) fn set_end_offset(&self, offset: u32) -> SegaResult {
        self.inner.lock_poison().set_end_offset(offset)
    }

    pub(crate) fn end_offset(&self) -> u32 {
        self.inner.lock_poison().end_offset
    }

    pub(crate) fn set_loop_state(&self, looping: bool) {
        self.inner.lock_poison().set_loop_state(looping);
    }

    pub(crate) fn loop_state(&self) -> bool {
        self.inner.lock_poison().looping
    }

    pub(crate) fn set_synth_param(&self, param: SynthParam, value: i32) -> SegaResult {
        self.inner.lock_poison().set_synth_param(param, value)
    }

    pub(crate) fn synth_param(&self, param: SynthParam) -> i32 {
        self.inner.lock_poison().synth_param(param)
    }

    pub(crate) fn set_pitch(&self, semitones: f32) -> SegaResult {
        self.inner.lock_poison().set_pitch(semitones)
    }

    pub(crate) fn pitch(&self) -> f32 {
        self.inner.lock_poison().pitch_semitones
    }

    pub(crate) fn set_channel_volume(&self, channel: u32, volume: u32) -> SegaResult {
        self.inner.lock_poison().set_channel_volume(channel, volume)
    }

    pub(crate) fn channel_volume(&self, channel: u32) -> SegaResult<u32> {
        self.inner.lock_poison().channel_volume(channel)
    }

    pub(crate) fn set_send_routing(&self, channel: u32, send: u32, dest: Routing) -> SegaResult {
        self.inner.lock_poison().set_send_routing(channel, send, dest)
    }

    pub(crate) fn send_routing(&self, channel: u32, send: u32) -> SegaResult<Routing> {
        self.inner.lock_poison().send_routing(channel, send)
    }

    pub(crate) fn set_send_level(&self, channel: u32, send: u32, level: u32) -> SegaResult {
        self.inner.lock_poison().set_send_level(channel, send, level)
    }

    pub(crate) fn send_level(&self, channel: u32, send: u32) -> SegaResult<u32> {
        self.inner.lock_poison().send_level(channel, send)
    }

    pub(crate) fn set_playback_position(&self, position: u32) -> SegaResult {
        self.inner.lock_poison().set_playback_position(position)
    }

    pub(crate) fn playback_position(&self) -> u32 {
        self.inner.lock_poison().playback_position()
    }

    pub(crate) fn playback_status(&self) -> PlaybackState {
        self.inner.lock_poison().playback_status()
    }

    /// Number of buffers the native voice still has queued.
    pub(crate) fn buffers_queued(&self) -> u32 {
        let inner = self.inner.lock_poison();
        inner.native.as_ref().map_or(0, |n| n.buffers_queued())
    }

    pub(crate) fn destroy(&self) -> SegaResult {
        self.inner.lock_poison().release()
    }
}

impl Drop for Voice {
    fn drop(&mut self) {
        self.state.store(PlaybackState::Stopped, Ordering::Release);
    }
}
