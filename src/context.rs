//! The audio context: one instance of the legacy API.
//!
//! Owns the backend, the voice registry, the per-line IO volumes, and the
//! last-status slot the legacy surface exposes. Every operation validates
//! its handle through the registry before touching any voice state, and
//! records its outcome in the last-status slot on the way out.

use std::ffi::c_void;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::backend::{AudioBackend, SharedBackend};
use crate::params::{
    BufferFlags, PhysicalIo, Routing, SendLevelParam, SendRouteParam, SynthParam, SynthParamValue,
    VOLUME_MAX, VoiceIoctl, VoiceParam, WaveFormat, raw_volume_to_gain,
};
use crate::registry::{Registry, VoiceHandle};
use crate::status::{PlaybackStatus, SegaResult, Status};
use crate::utils::MutexPoison;
use crate::voice::{BufferCallback, BufferConfig, PlaybackState, Voice};

pub struct Context {
    backend: SharedBackend,
    registry: Registry,
    io_volumes: [u32; PhysicalIo::COUNT],
    last_status: Status,
}

impl Context {
    /// Wraps an already-constructed backend.
    pub fn new(backend: Box<dyn AudioBackend>) -> Context {
        Context {
            backend: Arc::new(Mutex::new(backend)),
            registry: Registry::new(),
            io_volumes: [VOLUME_MAX; PhysicalIo::COUNT],
            last_status: Status::SUCCESS,
        }
    }

    /// Opens the default backend: the cpal device when that feature is
    /// enabled, the silent backend otherwise.
    pub fn with_default_backend() -> SegaResult<Context> {
        #[cfg(feature = "cpal-backend")]
        {
            let backend =
                crate::backend::CpalBackend::new().map_err(crate::status::SegaError::from)?;
            return Ok(Context::new(Box::new(backend)));
        }
        #[cfg(not(feature = "cpal-backend"))]
        {
            return Ok(Context::new(Box::new(crate::backend::NullBackend::new())));
        }
    }

    fn track<T>(&mut self, result: SegaResult<T>) -> SegaResult<T> {
        self.last_status = Status::from(&result);
        result
    }

    /// Last-status slot of the legacy surface. Purely informational.
    pub fn last_status(&self) -> Status {
        self.last_status
    }

    pub fn set_last_status(&mut self, status: Status) {
        self.last_status = status;
    }

    pub fn voice_count(&self) -> usize {
        self.registry.len()
    }

    pub fn create_buffer(
        &mut self,
        config: BufferConfig,
        callback: Option<BufferCallback>,
        flags: BufferFlags,
    ) -> SegaResult<VoiceHandle> {
        let handle = self.registry.allocate();
        let result =
            Voice::create(&self.backend, handle, config, callback, flags).map(|voice| {
                self.registry.insert(handle, voice);
                handle
            });
        self.track(result)
    }

    pub fn destroy_buffer(&mut self, handle: VoiceHandle) -> SegaResult {
        let result = self
            .registry
            .remove(handle)
            .and_then(|voice| voice.destroy());
        self.track(result)
    }

    pub fn play(&mut self, handle: VoiceHandle) -> SegaResult {
        let result = self.registry.get(handle).and_then(Voice::play);
        self.track(result)
    }

    pub fn stop(&mut self, handle: VoiceHandle) -> SegaResult {
        let result = self.registry.get(handle).and_then(Voice::stop);
        self.track(result)
    }

    pub fn pause(&mut self, handle: VoiceHandle) -> SegaResult {
        let result = self.registry.get(handle).and_then(Voice::pause);
        self.track(result)
    }

    /// Applies routing, level, ioctl, and synth batches, then plays.
    pub fn play_with_setup(
        &mut self,
        handle: VoiceHandle,
        routes: &[SendRouteParam],
        levels: &[SendLevelParam],
        ioctls: &[VoiceParam],
        synth: &[SynthParamValue],
    ) -> SegaResult {
        let result = self.registry.get(handle).and_then(|voice| {
            for route in routes {
                voice.set_send_routing(route.channel, route.send, route.dest)?;
            }
            for level in levels {
                voice.set_send_level(level.channel, level.send, level.level)?;
            }
            for ioctl in ioctls {
                apply_ioctl(voice, ioctl)?;
            }
            for param in synth {
                voice.set_synth_param(param.param, param.value)?;
            }
            voice.play()
        });
        self.track(result)
    }

    pub fn update_buffer(&mut self, handle: VoiceHandle, start: u32, len: u32) -> SegaResult {
        let result = self
            .registry
            .get(handle)
            .and_then(|voice| voice.update_buffer(start, len));
        self.track(result)
    }

    pub fn set_format(&mut self, handle: VoiceHandle, format: WaveFormat) -> SegaResult {
        let result = self
            .registry
            .get(handle)
            .and_then(|voice| voice.set_format(format));
        self.track(result)
    }

    pub fn format(&mut self, handle: VoiceHandle) -> SegaResult<WaveFormat> {
        let result = self.registry.get(handle).map(Voice::format);
        self.track(result)
    }

    pub fn set_sample_rate(&mut self, handle: VoiceHandle, rate: u32) -> SegaResult {
        let result = self
            .registry
            .get(handle)
            .and_then(|voice| voice.set_sample_rate(rate));
        self.track(result)
    }

    pub fn sample_rate(&mut self, handle: VoiceHandle) -> SegaResult<u32> {
        let result = self.registry.get(handle).map(Voice::sample_rate);
        self.track(result)
    }

    pub fn set_priority(&mut self, handle: VoiceHandle, priority: u32) -> SegaResult {
        let result = self
            .registry
            .get(handle)
            .map(|voice| voice.set_priority(priority));
        self.track(result)
    }

    pub fn priority(&mut self, handle: VoiceHandle) -> SegaResult<u32> {
        let result = self.registry.get(handle).map(Voice::priority);
        self.track(result)
    }

    pub fn set_user_data(&mut self, handle: VoiceHandle, user_data: *mut c_void) -> SegaResult {
        let result = self
            .registry
            .get(handle)
            .map(|voice| voice.set_user_data(user_data));
        self.track(result)
    }

    pub fn user_data(&mut self, handle: VoiceHandle) -> SegaResult<*mut c_void> {
        let result = self.registry.get(handle).map(Voice::user_data);
        self.track(result)
    }

    pub fn set_start_loop_offset(&mut self, handle: VoiceHandle, offset: u32) -> SegaResult {
        let result = self
            .registry
            .get(handle)
            .and_then(|voice| voice.set_start_loop_offset(offset));
        self.track(result)
    }

    pub fn start_loop_offset(&mut self, handle: VoiceHandle) -> SegaResult<u32> {
        let result = self.registry.get(handle).map(Voice::start_loop_offset);
        self.track(result)
    }

    pub fn set_end_loop_offset(&mut self, handle: VoiceHandle, offset: u32) -> SegaResult {
        let result = self
            .registry
            .get(handle)
            .and_then(|voice| voice.set_end_loop_offset(offset));
        self.track(result)
    }

    pub fn end_loop_offset(&mut self, handle: VoiceHandle) -> SegaResult<u32> {
        let result = self.registry.get(handle).map(Voice::end_loop_offset);
        self.track(result)
    }

    pub fn set_end_offset(&mut self, handle: VoiceHandle, offset: u32) -> SegaResult {
        let result = self
            .registry
            .get(handle)
            .and_then(|voice| voice.set_end_offset(offset));
        self.track(result)
    }

    pub fn end_offset(&mut self, handle: VoiceHandle) -> SegaResult<u32> {
        let result = self.registry.get(handle).map(Voice::end_offset);
        self.track(result)
    }

    pub fn set_loop_state(&mut self, handle: VoiceHandle, looping: bool) -> SegaResult {
        let result = self
            .registry
            .get(handle)
            .map(|voice| voice.set_loop_state(looping));
        self.track(result)
    }

    pub fn loop_state(&mut self, handle: VoiceHandle) -> SegaResult<bool> {
        let result = self.registry.get(handle).map(Voice::loop_state);
        self.track(result)
    }

    pub fn set_synth_param(
        &mut self,
        handle: VoiceHandle,
        param: SynthParam,
        value: i32,
    ) -> SegaResult {
        let result = self
            .registry
            .get(handle)
            .and_then(|voice| voice.set_synth_param(param, value));
        self.track(result)
    }

    pub fn synth_param(&mut self, handle: VoiceHandle, param: SynthParam) -> SegaResult<i32> {
        let result = self
            .registry
            .get(handle)
            .map(|voice| voice.synth_param(param));
        self.track(result)
    }

    pub fn set_synth_params(
        &mut self,
        handle: VoiceHandle,
        params: &[SynthParamValue],
    ) -> SegaResult {
        let result = self.registry.get(handle).and_then(|voice| {
            for param in params {
                voice.set_synth_param(param.param, param.value)?;
            }
            Ok(())
        });
        self.track(result)
    }

    /// Direct pitch path; the value is in semitones, unlike the synth
    /// parameter which is in cents.
    pub fn set_pitch(&mut self, handle: VoiceHandle, semitones: f32) -> SegaResult {
        let result = self
            .registry
            .get(handle)
            .and_then(|voice| voice.set_pitch(semitones));
        self.track(result)
    }

    pub fn pitch(&mut self, handle: VoiceHandle) -> SegaResult<f32> {
        let result = self.registry.get(handle).map(Voice::pitch);
        self.track(result)
    }

    pub fn set_channel_volume(
        &mut self,
        handle: VoiceHandle,
        channel: u32,
        volume: u32,
    ) -> SegaResult {
        let result = self
            .registry
            .get(handle)
            .and_then(|voice| voice.set_channel_volume(channel, volume));
        self.track(result)
    }

    pub fn channel_volume(&mut self, handle: VoiceHandle, channel: u32) -> SegaResult<u32> {
        let result = self
            .registry
            .get(handle)
            .and_then(|voice| voice.channel_volume(channel));
        self.track(result)
    }

    pub fn set_send_routing(
        &mut self,
        handle: VoiceHandle,
        channel: u32,
        send: u32,
        dest: Routing,
    ) -> SegaResult {
        let result = self
            .registry
            .get(handle)
            .and_then(|voice| voice.set_send_routing(channel, send, dest));
        self.track(result)
    }

    pub fn send_routing(
        &mut self,
        handle: VoiceHandle,
        channel: u32,
        send: u32,
    ) -> SegaResult<Routing> {
        let result = self
            .registry
            .get(handle)
            .and_then(|voice| voice.send_routing(channel, send));
        self.track(result)
    }

    pub fn set_send_level(
        &mut self,
        handle: VoiceHandle,
        channel: u32,
        send: u32,
        level: u32,
    ) -> SegaResult {
        let result = self
            .registry
            .get(handle)
            .and_then(|voice| voice.set_send_level(channel, send, level));
        self.track(result)
    }

    pub fn send_level(&mut self, handle: VoiceHandle, channel: u32, send: u32) -> SegaResult<u32> {
        let result = self
            .registry
            .get(handle)
            .and_then(|voice| voice.send_level(channel, send));
        self.track(result)
    }

    pub fn set_playback_position(&mut self, handle: VoiceHandle, position: u32) -> SegaResult {
        let result = self
            .registry
            .get(handle)
            .and_then(|voice| voice.set_playback_position(position));
        self.track(result)
    }

    pub fn playback_position(&mut self, handle: VoiceHandle) -> SegaResult<u32> {
        let result = self.registry.get(handle).map(Voice::playback_position);
        self.track(result)
    }

    /// Snapshot of the voice state machine; unknown handles report
    /// `Invalid` in-band.
    pub fn playback_status(&mut self, handle: VoiceHandle) -> PlaybackStatus {
        match self.registry.get(handle) {
            Ok(voice) => match voice.playback_status() {
                PlaybackState::Stopped => PlaybackStatus::Stop,
                PlaybackState::Playing => PlaybackStatus::Active,
                PlaybackState::Paused => PlaybackStatus::Pause,
            },
            Err(_) => PlaybackStatus::Invalid,
        }
    }

    /// Buffers still queued on the native voice, for drain polling.
    pub fn buffers_queued(&mut self, handle: VoiceHandle) -> SegaResult<u32> {
        let result = self.registry.get(handle).map(Voice::buffers_queued);
        self.track(result)
    }

    pub fn set_io_volume(&mut self, io: PhysicalIo, volume: u32) -> SegaResult {
        let result = (|| {
            self.io_volumes[io.index()] = volume;
            if let Some(channel) = io.output_channel() {
                self.backend
                    .lock_poison()
                    .set_output_gain(channel, raw_volume_to_gain(volume))?;
            }
            Ok(())
        })();
        self.track(result)
    }

    pub fn io_volume(&mut self, io: PhysicalIo) -> u32 {
        self.io_volumes[io.index()]
    }

    /// Silences every live voice without destroying any record, and
    /// restores unity master gain.
    pub fn reset(&mut self) -> SegaResult {
        let result = (|| {
            for voice in self.registry.iter() {
                voice.stop()?;
            }
            self.io_volumes = [VOLUME_MAX; PhysicalIo::COUNT];
            self.backend.lock_poison().reset_output_gains()?;
            Ok(())
        })();
        self.track(result)
    }

    /// Stops and releases every voice. The context stays usable; `Drop`
    /// calls this as well.
    pub fn shutdown(&mut self) {
        let voices = self.registry.drain();
        if !voices.is_empty() {
            debug!(count = voices.len(), "shutting down live voices");
        }
        for voice in voices {
            let _ = voice.destroy();
        }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn apply_ioctl(voice: &Voice, ioctl: &VoiceParam) -> SegaResult {
    match ioctl.ioctl {
        VoiceIoctl::SetStartLoopOffset => voice.set_start_loop_offset(ioctl.param1),
        VoiceIoctl::SetEndLoopOffset => voice.set_end_loop_offset(ioctl.param1),
        VoiceIoctl::SetEndOffset => voice.set_end_offset(ioctl.param1),
        VoiceIoctl::SetPlayPosition => voice.set_playback_position(ioctl.param1),
        VoiceIoctl::SetLoopState => {
            voice.set_loop_state(ioctl.param1 != 0);
            Ok(())
        }
        // Notification plumbing is accepted but not implemented.
        VoiceIoctl::SetNotificationPoint
        | VoiceIoctl::ClearNotificationPoint
        | VoiceIoctl::SetNotificationFrequency => Ok(()),
    }
}
