use std::collections::VecDeque;
use std::ffi::c_void;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex, Weak};

use tracing::{debug, warn};

use crate::backend::{DrainHook, NativeVoice, SharedBackend, SubmitDesc};
use crate::params::{
    BufferFlags, MAX_SENDS, MAX_VOICE_CHANNELS, Routing, SYNTH_PARAM_COUNT, SynthParam, WaveFormat,
    cents_to_ratio, raw_volume_to_gain, semitones_to_ratio, tenth_db_to_gain,
};
use crate::registry::VoiceHandle;
use crate::status::{SegaError, SegaResult};
use crate::utils::MutexPoison;
use crate::voice::{AtomicPlaybackState, BufferCallback, BufferMessage, PlaybackState};

/// Sample memory behind one voice.
///
/// External memory is the legacy mapped-buffer path: the caller guarantees
/// the pointer stays valid until the voice is destroyed.
pub(crate) enum BufferMemory {
    Owned(Vec<u8>),
    External { ptr: *mut u8, len: usize },
}

impl BufferMemory {
    pub(crate) fn len(&self) -> usize {
        match self {
            BufferMemory::Owned(data) => data.len(),
            BufferMemory::External { len, .. } => *len,
        }
    }

    fn as_slice(&self) -> &[u8] {
        match self {
            BufferMemory::Owned(data) => data,
            // SAFETY: validity for the lifetime of the voice is the caller's
            // side of the mapped-memory contract.
            BufferMemory::External { ptr, len } => unsafe {
                std::slice::from_raw_parts(*ptr, *len)
            },
        }
    }
}

/// One send slot: destination port and level word.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SendSlot {
    pub dest: Routing,
    pub level: u32,
}

impl Default for SendSlot {
    fn default() -> SendSlot {
        SendSlot {
            dest: Routing::Unused,
            level: crate::params::VOLUME_MAX,
        }
    }
}

/// Parameter change that could not apply while the native voice still had
/// buffers queued. Applied in FIFO order once the queue drains.
pub(crate) enum DeferredOp {
    Format(WaveFormat),
    SampleRate(u32),
}

pub(crate) struct VoiceInner {
    pub handle: VoiceHandle,
    pub backend: SharedBackend,
    pub output_channels: u32,

    pub format: WaveFormat,
    pub memory: BufferMemory,
    pub priority: u32,
    pub user_data: *mut c_void,
    pub callback: Option<BufferCallback>,
    #[allow(dead_code)]
    pub flags: BufferFlags,

    pub state: Arc<AtomicPlaybackState>,
    pub weak_self: Weak<Mutex<VoiceInner>>,

    pub start_loop: u32,
    pub end_loop: u32,
    pub end_offset: u32,
    pub looping: bool,

    pub channel_volumes: [u32; MAX_VOICE_CHANNELS],
    pub sends: [[SendSlot; MAX_SENDS]; MAX_VOICE_CHANNELS],
    pub synth_params: [i32; SYNTH_PARAM_COUNT],
    pub pitch_semitones: f32,
    /// Frequency ratio last pushed to the native voice, whichever pitch
    /// path set it. Re-applied after a voice swap.
    pub ratio: f32,

    /// Byte offset of the most recently submitted region.
    pub submit_offset: u32,
    /// Native frame counter at the moment of the last submission.
    pub frames_at_submit: u64,

    pub pending: VecDeque<DeferredOp>,
    /// `None` only after a failed native-voice recreation; never dangling.
    pub native: Option<Box<dyn NativeVoice>>,
}

// SAFETY: the raw pointers are opaque tokens owned by the caller; this
// crate only stores and returns them, except for the mapped buffer which
// the caller contracts to keep alive for the voice's lifetime.
unsafe impl Send for VoiceInner {}

impl VoiceInner {
    pub(crate) fn size(&self) -> u32 {
        self.memory.len() as u32
    }

    fn frame_bytes(&self) -> u32 {
        self.format.block_align().max(1)
    }

    /// Byte range the submitted audio plays within.
    fn play_end(&self) -> u32 {
        self.end_offset.min(self.size())
    }

    /// Loop region in bytes, clamped into the playable range.
    fn loop_region(&self) -> (u32, u32) {
        let end = self.end_loop.min(self.play_end());
        let start = self.start_loop.min(end);
        (start, end)
    }

    fn validate_offset(&self, offset: u32) -> SegaResult {
        if offset > self.size() {
            return Err(SegaError::BadParam);
        }
        Ok(())
    }

    fn queued(&self) -> u32 {
        self.native.as_ref().map_or(0, |n| n.buffers_queued())
    }

    fn native_mut(&mut self) -> SegaResult<&mut Box<dyn NativeVoice>> {
        self.native.as_mut().ok_or(SegaError::Unknown)
    }

    pub(crate) fn make_drain_hook(&self) -> DrainHook {
        let weak = self.weak_self.clone();
        Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let after = { inner.lock_poison().handle_drain() };
            // User callback runs without the voice lock so it can re-enter
            // the API.
            if let Some((callback, handle)) = after {
                callback(handle, BufferMessage::End);
            }
        })
    }

    /// Runs on the backend's drain notification: flush deferred changes,
    /// settle the state machine, and hand back the user callback to invoke.
    fn handle_drain(&mut self) -> Option<(BufferCallback, VoiceHandle)> {
        self.apply_pending();
        if !self.looping && self.state.load(Ordering::Acquire) == PlaybackState::Playing {
            self.state.store(PlaybackState::Stopped, Ordering::Release);
        }
        self.callback.clone().map(|cb| (cb, self.handle))
    }

    /// Applies queued deferred changes if the native queue is observed
    /// empty. Called at every observation point so backends without drain
    /// notifications still converge.
    pub(crate) fn service_pending(&mut self) {
        if self.pending.is_empty() || self.queued() > 0 {
            return;
        }
        self.apply_pending();
    }

    fn apply_pending(&mut self) {
        while let Some(op) = self.pending.pop_front() {
            let result = match op {
                DeferredOp::Format(format) => self.apply_format(format),
                DeferredOp::SampleRate(rate) => {
                    let format = WaveFormat {
                        sample_rate: rate,
                        ..self.format
                    };
                    self.apply_format(format)
                }
            };
            if let Err(err) = result {
                warn!(handle = self.handle.raw(), %err, "deferred change failed");
            }
        }
    }

    /// Destroys and recreates the native voice with `format`. On failure
    /// the native slot is left explicitly empty and the stored format is
    /// unchanged.
    fn apply_format(&mut self, format: WaveFormat) -> SegaResult {
        self.native = None;
        let hook = self.make_drain_hook();
        let created = { self.backend.lock_poison().create_voice(&format, hook) };
        match created {
            Ok(native) => {
                self.native = Some(native);
                self.format = format;
                debug!(
                    handle = self.handle.raw(),
                    sample_rate = format.sample_rate,
                    channels = format.channels,
                    "native voice recreated"
                );
                self.reapply_controls()
            }
            Err(err) => {
                warn!(handle = self.handle.raw(), %err, "native voice recreation failed");
                Err(SegaError::Unknown)
            }
        }
    }

    /// Pushes the persistent controls onto a freshly created native voice.
    fn reapply_controls(&mut self) -> SegaResult {
        let matrix = compute_output_matrix(
            &self.sends,
            &self.channel_volumes,
            self.format.channels as usize,
            self.output_channels as usize,
        );
        let ratio = self.ratio;
        let gain = tenth_db_to_gain(self.synth_params[SynthParam::Attenuation.index()]);
        let channels = self.format.channels;
        let native = self.native_mut()?;
        native.set_output_matrix(channels, &matrix)?;
        native.set_frequency_ratio(ratio)?;
        native.set_volume(gain)?;
        Ok(())
    }

    /// Copies the window, derives loop fields, and queues it as the one
    /// in-flight buffer.
    fn submit_window(&mut self, start: u32, len: u32) -> SegaResult {
        let end = start
            .checked_add(len)
            .filter(|&e| e as usize <= self.memory.len())
            .ok_or(SegaError::BadParam)?;
        let data = self.memory.as_slice()[start as usize..end as usize].to_vec();
        let (loop_begin, loop_frames, looping) = self.loop_fields(start, len);

        let native = self.native_mut()?;
        native.flush()?;
        let frames_before = native.frames_played();
        native.submit(SubmitDesc {
            data,
            loop_begin,
            loop_frames,
            looping,
        })?;
        self.submit_offset = start;
        self.frames_at_submit = frames_before;
        Ok(())
    }

    /// Loop fields for a submitted window, in frames relative to the
    /// window start. An empty intersection disables looping.
    fn loop_fields(&self, window_start: u32, window_len: u32) -> (u32, u32, bool) {
        if !self.looping {
            return (0, 0, false);
        }
        let (loop_start, loop_end) = self.loop_region();
        let window_end = window_start.saturating_add(window_len);
        let start = loop_start.clamp(window_start, window_end);
        let end = loop_end.clamp(window_start, window_end);
        if end <= start {
            return (0, 0, false);
        }
        let frame = self.frame_bytes();
        let loop_frames = (end - start) / frame;
        if loop_frames == 0 {
            return (0, 0, false);
        }
        ((start - window_start) / frame, loop_frames, true)
    }

    pub(crate) fn play(&mut self) -> SegaResult {
        self.service_pending();
        if self.state.load(Ordering::Acquire) == PlaybackState::Paused {
            self.native_mut()?.start()?;
            self.state.store(PlaybackState::Playing, Ordering::Release);
            return Ok(());
        }
        let end = self.play_end();
        self.submit_window(0, end)?;
        self.native_mut()?.start()?;
        self.state.store(PlaybackState::Playing, Ordering::Release);
        Ok(())
    }

    pub(crate) fn stop(&mut self) -> SegaResult {
        self.service_pending();
        if let Some(native) = self.native.as_mut() {
            native.stop()?;
            native.flush()?;
        }
        self.state.store(PlaybackState::Stopped, Ordering::Release);
        Ok(())
    }

    pub(crate) fn pause(&mut self) -> SegaResult {
        if self.state.load(Ordering::Acquire) == PlaybackState::Playing {
            self.native_mut()?.stop()?;
            self.state.store(PlaybackState::Paused, Ordering::Release);
        }
        Ok(())
    }

    pub(crate) fn update_buffer(&mut self, start: u32, len: u32) -> SegaResult {
        let end = start.checked_add(len).ok_or(SegaError::BadParam)?;
        if end as usize > self.memory.len() {
            return Err(SegaError::BadParam);
        }
        self.service_pending();
        self.submit_window(start, len)
    }

    pub(crate) fn set_format(&mut self, format: WaveFormat) -> SegaResult {
        if format.channels == 0 || format.channels as usize > MAX_VOICE_CHANNELS {
            return Err(SegaError::BadParam);
        }
        crate::params::validate_sample_rate(format.sample_rate)?;
        if self.queued() > 0 {
            debug!(handle = self.handle.raw(), "format change deferred");
            self.pending.push_back(DeferredOp::Format(format));
            return Ok(());
        }
        self.apply_format(format)
    }

    pub(crate) fn set_sample_rate(&mut self, rate: u32) -> SegaResult {
        crate::params::validate_sample_rate(rate)?;
        if self.queued() > 0 {
            debug!(handle = self.handle.raw(), rate, "sample-rate change deferred");
            self.pending.push_back(DeferredOp::SampleRate(rate));
            return Ok(());
        }
        let format = WaveFormat {
            sample_rate: rate,
            ..self.format
        };
        self.apply_format(format)
    }

    pub(crate) fn set_start_loop_offset(&mut self, offset: u32) -> SegaResult {
        self.validate_offset(offset)?;
        self.start_loop = offset;
        Ok(())
    }

    pub(crate) fn set_end_loop_offset(&mut self, offset: u32) -> SegaResult {
        self.validate_offset(offset)?;
        self.end_loop = offset;
        Ok(())
    }

    pub(crate) fn set_end_offset(&mut self, offset: u32) -> SegaResult {
        self.validate_offset(offset)?;
        self.end_offset = offset;
        Ok(())
    }

    pub(crate) fn set_loop_state(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub(crate) fn set_synth_param(&mut self, param: SynthParam, value: i32) -> SegaResult {
        self.synth_params[param.index()] = value;
        match param {
            SynthParam::Attenuation => {
                let gain = tenth_db_to_gain(value);
                self.native_mut()?.set_volume(gain)?;
            }
            SynthParam::Pitch => {
                // This entry point speaks cents; the direct pitch path
                // speaks semitones. Both are kept, per the original API.
                let ratio = cents_to_ratio(value);
                self.ratio = ratio;
                self.native_mut()?.set_frequency_ratio(ratio)?;
            }
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn synth_param(&self, param: SynthParam) -> i32 {
        self.synth_params[param.index()]
    }

    pub(crate) fn set_pitch(&mut self, semitones: f32) -> SegaResult {
        let ratio = semitones_to_ratio(semitones);
        self.pitch_semitones = semitones;
        self.ratio = ratio;
        self.native_mut()?.set_frequency_ratio(ratio)?;
        Ok(())
    }

    pub(crate) fn set_channel_volume(&mut self, channel: u32, volume: u32) -> SegaResult {
        if channel >= self.format.channels {
            return Err(SegaError::BadParam);
        }
        self.channel_volumes[channel as usize] = volume;
        self.refresh_matrix()
    }

    pub(crate) fn channel_volume(&self, channel: u32) -> SegaResult<u32> {
        if channel >= self.format.channels {
            return Err(SegaError::BadParam);
        }
        Ok(self.channel_volumes[channel as usize])
    }

    fn validate_send(&self, channel: u32, send: u32) -> SegaResult {
        if channel >= self.format.channels {
            return Err(SegaError::BadParam);
        }
        if send as usize >= MAX_SENDS {
            return Err(SegaError::InvalidSend);
        }
        Ok(())
    }

    pub(crate) fn set_send_routing(&mut self, channel: u32, send: u32, dest: Routing) -> SegaResult {
        self.validate_send(channel, send)?;
        self.sends[channel as usize][send as usize].dest = dest;
        self.refresh_matrix()
    }

    pub(crate) fn send_routing(&self, channel: u32, send: u32) -> SegaResult<Routing> {
        self.validate_send(channel, send)?;
        Ok(self.sends[channel as usize][send as usize].dest)
    }

    pub(crate) fn set_send_level(&mut self, channel: u32, send: u32, level: u32) -> SegaResult {
        self.validate_send(channel, send)?;
        self.sends[channel as usize][send as usize].level = level;
        self.refresh_matrix()
    }

    pub(crate) fn send_level(&self, channel: u32, send: u32) -> SegaResult<u32> {
        self.validate_send(channel, send)?;
        Ok(self.sends[channel as usize][send as usize].level)
    }

    /// Recomputes and pushes the routing matrix. Runs synchronously; a
    /// matrix update never needs voice recreation.
    fn refresh_matrix(&mut self) -> SegaResult {
        let matrix = compute_output_matrix(
            &self.sends,
            &self.channel_volumes,
            self.format.channels as usize,
            self.output_channels as usize,
        );
        let channels = self.format.channels;
        self.native_mut()?.set_output_matrix(channels, &matrix)?;
        Ok(())
    }

    pub(crate) fn set_playback_position(&mut self, position: u32) -> SegaResult {
        self.validate_offset(position)?;
        self.service_pending();
        if let Some(native) = self.native.as_mut() {
            native.flush()?;
        }
        let frames = self.native.as_ref().map_or(0, |n| n.frames_played());
        self.submit_offset = position;
        self.frames_at_submit = frames;
        if self.state.load(Ordering::Acquire) == PlaybackState::Playing {
            let end = self.play_end();
            if position < end {
                self.submit_window(position, end - position)?;
            }
        }
        Ok(())
    }

    pub(crate) fn playback_position(&self) -> u32 {
        let played = self
            .native
            .as_ref()
            .map_or(0, |n| n.frames_played().saturating_sub(self.frames_at_submit));
        let mut position = self.submit_offset as u64 + played * self.frame_bytes() as u64;
        let (loop_start, loop_end) = self.loop_region();
        if self.looping && loop_end > loop_start {
            let (start, end) = (loop_start as u64, loop_end as u64);
            if position >= end {
                position = start + (position - start) % (end - start);
            }
        }
        position.min(self.size() as u64) as u32
    }

    pub(crate) fn playback_status(&mut self) -> PlaybackState {
        self.service_pending();
        let state = self.state.load(Ordering::Acquire);
        if state == PlaybackState::Playing && self.queued() == 0 {
            self.state.store(PlaybackState::Stopped, Ordering::Release);
            return PlaybackState::Stopped;
        }
        state
    }

    /// Teardown used by destroy and shutdown: silences the native voice and
    /// releases it. Buffer memory goes with the record.
    pub(crate) fn release(&mut self) -> SegaResult {
        let result = self.stop();
        self.native = None;
        result
    }
}

/// Flattened routing matrix, row-major `[output][input]`.
///
/// Every active send whose destination resolves to a physical output
/// contributes `send_gain x channel_gain`, clamped to `[0, 1]`; anything
/// routed to an effect slot or left unused is skipped.
pub(crate) fn compute_output_matrix(
    sends: &[[SendSlot; MAX_SENDS]; MAX_VOICE_CHANNELS],
    channel_volumes: &[u32; MAX_VOICE_CHANNELS],
    source_channels: usize,
    output_channels: usize,
) -> Vec<f32> {
    let mut matrix = vec![0.0f32; output_channels * source_channels];
    for channel in 0..source_channels.min(MAX_VOICE_CHANNELS) {
        let channel_gain = raw_volume_to_gain(channel_volumes[channel]);
        for slot in &sends[channel] {
            let Some(port) = slot.dest.output_channel() else {
                continue;
            };
            if port >= output_channels {
                continue;
            }
            let level = (raw_volume_to_gain(slot.level) * channel_gain).clamp(0.0, 1.0);
            matrix[port * source_channels + channel] = level;
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::VOLUME_MAX;

    fn default_sends() -> [[SendSlot; MAX_SENDS]; MAX_VOICE_CHANNELS] {
        [[SendSlot::default(); MAX_SENDS]; MAX_VOICE_CHANNELS]
    }

    #[test]
    fn unused_sends_produce_a_zero_matrix() {
        let matrix = compute_output_matrix(&default_sends(), &[VOLUME_MAX; 6], 2, 6);
        assert_eq!(matrix.len(), 12);
        assert!(matrix.iter().all(|&g| g == 0.0));
    }

    #[test]
    fn mono_front_left_send_hits_one_cell() {
        let mut sends = default_sends();
        sends[0][0] = SendSlot {
            dest: Routing::FrontLeft,
            level: VOLUME_MAX,
        };
        let matrix = compute_output_matrix(&sends, &[VOLUME_MAX; 6], 1, 6);
        assert!((matrix[0] - 1.0).abs() < 1e-6);
        assert!(matrix[1..].iter().all(|&g| g == 0.0));
    }

    #[test]
    fn channel_volume_scales_the_send() {
        let mut sends = default_sends();
        sends[0][0] = SendSlot {
            dest: Routing::FrontRight,
            level: VOLUME_MAX,
        };
        let mut volumes = [VOLUME_MAX; 6];
        volumes[0] = VOLUME_MAX / 2;
        let matrix = compute_output_matrix(&sends, &volumes, 1, 6);
        assert!((matrix[1] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn fx_slot_destinations_are_skipped() {
        let mut sends = default_sends();
        sends[0][0] = SendSlot {
            dest: Routing::FxSlot2,
            level: VOLUME_MAX,
        };
        let matrix = compute_output_matrix(&sends, &[VOLUME_MAX; 6], 1, 6);
        assert!(matrix.iter().all(|&g| g == 0.0));
    }

    #[test]
    fn ports_beyond_the_device_width_are_skipped() {
        let mut sends = default_sends();
        sends[0][0] = SendSlot {
            dest: Routing::RearRight,
            level: VOLUME_MAX,
        };
        let matrix = compute_output_matrix(&sends, &[VOLUME_MAX; 6], 1, 2);
        assert_eq!(matrix.len(), 2);
        assert!(matrix.iter().all(|&g| g == 0.0));
    }
}
