#![allow(dead_code)]
//! Recording backend for driving the voice engine without audio hardware.
//!
//! Every native-voice call is captured so tests can assert on the exact
//! values the engine pushed down, and `drain_voice` fires the drain hook
//! the way a real mixer thread would: with no backend lock held.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use sega_audio::backend::{AudioBackend, BackendError, DrainHook, NativeVoice, SubmitDesc};
use sega_audio::params::WaveFormat;

/// Installs a test-writer subscriber so engine tracing shows up in failed
/// test output. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[derive(Default)]
pub struct MockShared {
    pub voices: Mutex<Vec<Arc<MockVoiceState>>>,
    pub created: AtomicU32,
    pub fail_creations: AtomicBool,
}

pub struct MockVoiceState {
    pub format: WaveFormat,
    pub queued: AtomicU32,
    pub frames_played: AtomicU64,
    pub started: AtomicBool,
    pub ratio: Mutex<f32>,
    pub volume: Mutex<f32>,
    pub matrix: Mutex<Vec<f32>>,
    pub submits: Mutex<Vec<SubmitDesc>>,
    hook: Mutex<Option<Arc<dyn Fn() + Send + Sync>>>,
}

impl MockShared {
    pub fn voice(&self, index: usize) -> Arc<MockVoiceState> {
        Arc::clone(&self.voices.lock().unwrap()[index])
    }

    pub fn created(&self) -> u32 {
        self.created.load(Ordering::Acquire)
    }

    pub fn set_fail_creations(&self, fail: bool) {
        self.fail_creations.store(fail, Ordering::Release);
    }

    /// Simulates the backend observing the voice's queue reach zero:
    /// clears the queue and invokes the drain hook exactly as a mixer
    /// thread would, holding no lock of its own.
    pub fn drain_voice(&self, index: usize) {
        let state = self.voice(index);
        state.queued.store(0, Ordering::Release);
        let hook = state.hook.lock().unwrap().clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    /// Advances the voice's consumed-frames counter, as if the mixer had
    /// rendered that much audio.
    pub fn advance_frames(&self, index: usize, frames: u64) {
        self.voice(index)
            .frames_played
            .fetch_add(frames, Ordering::AcqRel);
    }
}

pub struct MockBackend {
    shared: Arc<MockShared>,
    output_channels: u32,
}

impl MockBackend {
    pub fn new() -> (MockBackend, Arc<MockShared>) {
        let shared = Arc::new(MockShared::default());
        (
            MockBackend {
                shared: Arc::clone(&shared),
                output_channels: 6,
            },
            shared,
        )
    }
}

impl AudioBackend for MockBackend {
    fn create_voice(
        &mut self,
        format: &WaveFormat,
        on_drain: DrainHook,
    ) -> Result<Box<dyn NativeVoice>, BackendError> {
        if self.shared.fail_creations.load(Ordering::Acquire) {
            return Err(BackendError::VoiceCreation("forced failure".into()));
        }
        let state = Arc::new(MockVoiceState {
            format: *format,
            queued: AtomicU32::new(0),
            frames_played: AtomicU64::new(0),
            started: AtomicBool::new(false),
            ratio: Mutex::new(1.0),
            volume: Mutex::new(1.0),
            matrix: Mutex::new(Vec::new()),
            submits: Mutex::new(Vec::new()),
            hook: Mutex::new(Some(Arc::from(on_drain))),
        });
        self.shared.voices.lock().unwrap().push(Arc::clone(&state));
        self.shared.created.fetch_add(1, Ordering::AcqRel);
        Ok(Box::new(MockVoice { state }))
    }

    fn output_channels(&self) -> u32 {
        self.output_channels
    }

    fn set_output_gain(&mut self, _output_channel: usize, _gain: f32) -> Result<(), BackendError> {
        Ok(())
    }

    fn reset_output_gains(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
}

struct MockVoice {
    state: Arc<MockVoiceState>,
}

impl NativeVoice for MockVoice {
    fn start(&mut self) -> Result<(), BackendError> {
        self.state.started.store(true, Ordering::Release);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BackendError> {
        self.state.started.store(false, Ordering::Release);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BackendError> {
        self.state.queued.store(0, Ordering::Release);
        Ok(())
    }

    fn submit(&mut self, desc: SubmitDesc) -> Result<(), BackendError> {
        self.state.submits.lock().unwrap().push(desc);
        self.state.queued.store(1, Ordering::Release);
        Ok(())
    }

    fn set_frequency_ratio(&mut self, ratio: f32) -> Result<(), BackendError> {
        *self.state.ratio.lock().unwrap() = ratio;
        Ok(())
    }

    fn set_volume(&mut self, gain: f32) -> Result<(), BackendError> {
        *self.state.volume.lock().unwrap() = gain;
        Ok(())
    }

    fn set_output_matrix(
        &mut self,
        _source_channels: u32,
        matrix: &[f32],
    ) -> Result<(), BackendError> {
        *self.state.matrix.lock().unwrap() = matrix.to_vec();
        Ok(())
    }

    fn buffers_queued(&self) -> u32 {
        self.state.queued.load(Ordering::Acquire)
    }

    fn frames_played(&self) -> u64 {
        self.state.frames_played.load(Ordering::Acquire)
    }
}
