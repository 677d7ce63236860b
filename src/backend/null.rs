//! Silent backend for headless use.
//!
//! Voices account for queued buffers and positions but produce no audio
//! and run no thread, so drain notifications are never delivered; deferred
//! parameter changes apply at the engine's next observation point instead.

use tracing::debug;

use crate::backend::{AudioBackend, BackendError, DrainHook, NativeVoice, SubmitDesc};
use crate::params::{OUTPUT_PORTS, WaveFormat};

pub struct NullBackend {
    output_channels: u32,
}

impl NullBackend {
    pub fn new() -> NullBackend {
        NullBackend {
            output_channels: OUTPUT_PORTS as u32,
        }
    }
}

impl Default for NullBackend {
    fn default() -> NullBackend {
        NullBackend::new()
    }
}

impl AudioBackend for NullBackend {
    fn create_voice(
        &mut self,
        format: &WaveFormat,
        _on_drain: DrainHook,
    ) -> Result<Box<dyn NativeVoice>, BackendError> {
        debug!(
            sample_rate = format.sample_rate,
            channels = format.channels,
            "created null voice"
        );
        Ok(Box::new(NullVoice {
            queued: 0,
            frames_played: 0,
        }))
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

struct NullVoice {
    queued: u32,
    frames_played: u64,
}

impl NativeVoice for NullVoice {
    fn start(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BackendError> {
        self.queued = 0;
        Ok(())
    }

    fn submit(&mut self, _desc: SubmitDesc) -> Result<(), BackendError> {
        self.queued = 1;
        Ok(())
    }

    fn set_frequency_ratio(&mut self, _ratio: f32) -> Result<(), BackendError> {
        Ok(())
    }

    fn set_volume(&mut self, _gain: f32) -> Result<(), BackendError> {
        Ok(())
    }

    fn set_output_matrix(
        &mut self,
        _source_channels: u32,
        _matrix: &[f32],
    ) -> Result<(), BackendError> {
        Ok(())
    }

    fn buffers_queued(&self) -> u32 {
        self.queued
    }

    fn frames_played(&self) -> u64 {
        self.frames_played
    }
}
