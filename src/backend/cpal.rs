//! cpal-backed playback.
//!
//! One output stream feeds a small software mixer. Each native voice is a
//! slot holding at most one queued buffer; the stream callback resamples by
//! the voice frequency ratio, applies the routing matrix and the master
//! output gains, and accumulates into the device buffer. The stream lives
//! on its own worker thread so the backend stays `Send` regardless of what
//! the platform stream type supports.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread::JoinHandle;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, warn};

use crate::backend::{AudioBackend, BackendError, DrainHook, NativeVoice, SubmitDesc};
use crate::params::{OUTPUT_PORTS, SampleFormat, WaveFormat};
use crate::utils::MutexPoison;

pub struct CpalBackend {
    shared: Arc<MixerShared>,
    output_channels: u32,
    shutdown: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

struct MixerShared {
    voices: Mutex<Vec<Arc<VoiceSlot>>>,
    master_gains: Mutex<[f32; OUTPUT_PORTS]>,
}

struct VoiceSlot {
    state: Mutex<SlotState>,
    queued: AtomicU32,
    frames_played: AtomicU64,
    dead: AtomicBool,
}

struct SlotState {
    format: WaveFormat,
    buffer: Option<SubmitDesc>,
    playing: bool,
    ratio: f32,
    volume: f32,
    matrix: Vec<f32>,
    /// Fractional read position in source frames, relative to the buffer.
    pos: f64,
    /// Source frames consumed since creation, in fractional frames.
    consumed: f64,
    on_drain: Arc<dyn Fn() + Send + Sync>,
}

impl CpalBackend {
    pub fn new() -> Result<CpalBackend, BackendError> {
        let shared = Arc::new(MixerShared {
            voices: Mutex::new(Vec::new()),
            master_gains: Mutex::new([1.0; OUTPUT_PORTS]),
        });
        let shutdown = Arc::new(AtomicBool::new(false));

        let (ready_tx, ready_rx) = mpsc::channel::<Result<u32, BackendError>>();
        let worker_shared = Arc::clone(&shared);
        let worker_shutdown = Arc::clone(&shutdown);

        let worker = std::thread::Builder::new()
            .name("sega-audio-mixer".into())
            .spawn(move || run_stream(worker_shared, worker_shutdown, ready_tx))
            .map_err(|e| BackendError::DeviceUnavailable(e.to_string()))?;

        let device_channels = match ready_rx.recv() {
            Ok(Ok(channels)) => channels,
            Ok(Err(err)) => {
                let _ = worker.join();
                return Err(err);
            }
            Err(_) => {
                let _ = worker.join();
                return Err(BackendError::DeviceUnavailable(
                    "mixer thread exited before reporting a device".into(),
                ));
            }
        };

        Ok(CpalBackend {
            shared,
            output_channels: device_channels.min(OUTPUT_PORTS as u32),
            shutdown,
            worker: Some(worker),
        })
    }
}

impl Drop for CpalBackend {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl AudioBackend for CpalBackend {
    fn create_voice(
        &mut self,
        format: &WaveFormat,
        on_drain: DrainHook,
    ) -> Result<Box<dyn NativeVoice>, BackendError> {
        let src = format.channels as usize;
        let slot = Arc::new(VoiceSlot {
            state: Mutex::new(SlotState {
                format: *format,
                buffer: None,
                playing: false,
                ratio: 1.0,
                volume: 1.0,
                matrix: vec![0.0; self.output_channels as usize * src],
                pos: 0.0,
                consumed: 0.0,
                on_drain: Arc::from(on_drain),
            }),
            queued: AtomicU32::new(0),
            frames_played: AtomicU64::new(0),
            dead: AtomicBool::new(false),
        });

        let mut voices = self.shared.voices.lock_poison();
        voices.retain(|v| !v.dead.load(Ordering::Acquire));
        voices.push(Arc::clone(&slot));
        drop(voices);

        debug!(
            sample_rate = format.sample_rate,
            channels = format.channels,
            "created cpal voice"
        );
        Ok(Box::new(CpalVoice { slot }))
    }

    fn output_channels(&self) -> u32 {
        self.output_channels
    }

    fn set_output_gain(&mut self, output_channel: usize, gain: f32) -> Result<(), BackendError> {
        let mut gains = self.shared.master_gains.lock_poison();
        if let Some(slot) = gains.get_mut(output_channel) {
            *slot = gain.clamp(0.0, 1.0);
        }
        Ok(())
    }

    fn reset_output_gains(&mut self) -> Result<(), BackendError> {
        *self.shared.master_gains.lock_poison() = [1.0; OUTPUT_PORTS];
        Ok(())
    }
}

struct CpalVoice {
    slot: Arc<VoiceSlot>,
}

impl Drop for CpalVoice {
    fn drop(&mut self) {
        self.slot.dead.store(true, Ordering::Release);
    }
}

impl NativeVoice for CpalVoice {
    fn start(&mut self) -> Result<(), BackendError> {
        self.slot.state.lock_poison().playing = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BackendError> {
        self.slot.state.lock_poison().playing = false;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BackendError> {
        let mut state = self.slot.state.lock_poison();
        state.buffer = None;
        state.pos = 0.0;
        self.slot.queued.store(0, Ordering::Release);
        Ok(())
    }

    fn submit(&mut self, desc: SubmitDesc) -> Result<(), BackendError> {
        let mut state = self.slot.state.lock_poison();
        state.buffer = Some(desc);
        state.pos = 0.0;
        self.slot.queued.store(1, Ordering::Release);
        Ok(())
    }

    fn set_frequency_ratio(&mut self, ratio: f32) -> Result<(), BackendError> {
        self.slot.state.lock_poison().ratio = ratio.max(0.0);
        Ok(())
    }

    fn set_volume(&mut self, gain: f32) -> Result<(), BackendError> {
        self.slot.state.lock_poison().volume = gain.max(0.0);
        Ok(())
    }

    fn set_output_matrix(
        &mut self,
        source_channels: u32,
        matrix: &[f32],
    ) -> Result<(), BackendError> {
        let mut state = self.slot.state.lock_poison();
        if source_channels != state.format.channels {
            return Err(BackendError::Operation(format!(
                "matrix for {source_channels} channels on a {} channel voice",
                state.format.channels
            )));
        }
        state.matrix.clear();
        state.matrix.extend_from_slice(matrix);
        Ok(())
    }

    fn buffers_queued(&self) -> u32 {
        self.slot.queued.load(Ordering::Acquire)
    }

    fn frames_played(&self) -> u64 {
        self.slot.frames_played.load(Ordering::Acquire)
    }
}

fn run_stream(
    shared: Arc<MixerShared>,
    shutdown: Arc<AtomicBool>,
    ready_tx: mpsc::Sender<Result<u32, BackendError>>,
) {
    let host = cpal::default_host();
    let device = match host.default_output_device() {
        Some(device) => device,
        None => {
            let _ = ready_tx.send(Err(BackendError::DeviceUnavailable(
                "no default output device".into(),
            )));
            return;
        }
    };
    let config = match device.default_output_config() {
        Ok(config) => config,
        Err(err) => {
            let _ = ready_tx.send(Err(BackendError::DeviceUnavailable(err.to_string())));
            return;
        }
    };
    if config.sample_format() != cpal::SampleFormat::F32 {
        let _ = ready_tx.send(Err(BackendError::DeviceUnavailable(format!(
            "unsupported device sample format {:?}",
            config.sample_format()
        ))));
        return;
    }

    let device_rate = config.sample_rate().0;
    let device_channels = config.channels() as usize;
    let stream_shared = Arc::clone(&shared);

    let stream = device.build_output_stream(
        &config.into(),
        move |out: &mut [f32], _: &cpal::OutputCallbackInfo| {
            let hooks = stream_shared.mix(out, device_channels, device_rate);
            // Hooks run with no mixer lock held; they are free to re-enter
            // the voice engine.
            for hook in hooks {
                hook();
            }
        },
        |err| warn!(error = %err, "cpal stream error"),
        None,
    );

    let stream = match stream {
        Ok(stream) => stream,
        Err(err) => {
            let _ = ready_tx.send(Err(BackendError::DeviceUnavailable(err.to_string())));
            return;
        }
    };
    if let Err(err) = stream.play() {
        let _ = ready_tx.send(Err(BackendError::DeviceUnavailable(err.to_string())));
        return;
    }
    let _ = ready_tx.send(Ok(device_channels as u32));

    while !shutdown.load(Ordering::Acquire) {
        std::thread::sleep(Duration::from_millis(50));
    }
    drop(stream);
}

impl MixerShared {
    /// Accumulates every live voice into `out` and returns the drain hooks
    /// of voices whose queue emptied during this pass.
    fn mix(
        &self,
        out: &mut [f32],
        device_channels: usize,
        device_rate: u32,
    ) -> Vec<Arc<dyn Fn() + Send + Sync>> {
        out.fill(0.0);

        let master = *self.master_gains.lock_poison();
        let mut fired = Vec::new();

        let Some(mut voices) = self.voices.try_lock_poison() else {
            return fired;
        };
        voices.retain(|v| !v.dead.load(Ordering::Acquire));

        for slot in voices.iter() {
            let Some(mut state) = slot.state.try_lock_poison() else {
                continue;
            };
            if mix_voice(&mut state, slot, out, device_channels, device_rate, &master) {
                fired.push(Arc::clone(&state.on_drain));
            }
        }
        fired
    }
}

/// Renders one voice into `out`. Returns true when the voice's buffer
/// finished during this pass.
fn mix_voice(
    state: &mut SlotState,
    slot: &VoiceSlot,
    out: &mut [f32],
    device_channels: usize,
    device_rate: u32,
    master: &[f32; OUTPUT_PORTS],
) -> bool {
    if !state.playing {
        return false;
    }

    let src_channels = state.format.channels as usize;
    let frame_bytes = state.format.block_align() as usize;
    let step = state.ratio as f64 * state.format.sample_rate as f64 / device_rate as f64;
    let out_ports = device_channels.min(OUTPUT_PORTS);
    let mut drained = false;

    {
        let buffer = match state.buffer.as_ref() {
            Some(buffer) => buffer,
            None => return false,
        };
        let total_frames = if frame_bytes == 0 {
            0
        } else {
            buffer.data.len() / frame_bytes
        };
        let loop_end = (buffer.loop_begin + buffer.loop_frames) as f64;
        let looping = buffer.looping && buffer.loop_frames > 0;

        let mut pos = state.pos;
        let mut consumed = state.consumed;

        for frame in out.chunks_mut(device_channels) {
            if looping && pos >= loop_end {
                pos = buffer.loop_begin as f64 + (pos - loop_end) % buffer.loop_frames as f64;
            }
            if pos >= total_frames as f64 {
                drained = true;
                break;
            }
            let index = pos as usize;
            for ch in 0..src_channels {
                let sample = decode_sample(&buffer.data, state.format.format, index, src_channels, ch)
                    * state.volume;
                if sample == 0.0 {
                    continue;
                }
                for (port, out_sample) in frame.iter_mut().take(out_ports).enumerate() {
                    let gain = state
                        .matrix
                        .get(port * src_channels + ch)
                        .copied()
                        .unwrap_or(0.0);
                    if gain != 0.0 {
                        *out_sample += sample * gain * master[port];
                    }
                }
            }
            pos += step;
            consumed += step;
        }

        state.pos = pos;
        state.consumed = consumed;
    }

    slot.frames_played
        .store(state.consumed as u64, Ordering::Release);

    if drained {
        state.buffer = None;
        state.pos = 0.0;
        slot.queued.store(0, Ordering::Release);
    }
    drained
}

fn decode_sample(
    data: &[u8],
    format: SampleFormat,
    frame: usize,
    channels: usize,
    channel: usize,
) -> f32 {
    let sample_index = frame * channels + channel;
    match format {
        SampleFormat::Unsigned8 => data
            .get(sample_index)
            .map(|&b| (b as f32 - 128.0) / 128.0)
            .unwrap_or(0.0),
        SampleFormat::Signed16 => {
            let offset = sample_index * 2;
            if offset + 2 <= data.len() {
                let sample: i16 = bytemuck::pod_read_unaligned(&data[offset..offset + 2]);
                sample as f32 / 32768.0
            } else {
                0.0
            }
        }
    }
}
