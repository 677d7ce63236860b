use std::ffi::c_void;

use crate::context::Context;
use crate::params::{BufferFlags, SampleFormat};
use crate::registry::VoiceHandle;
use crate::status::SegaResult;
use crate::voice::{BufferCallback, BufferConfig, ExternalMemory};

/// Builder for a new voice buffer.
///
/// Defaults to a mono, 16-bit, 44.1 kHz voice with registry-owned memory.
pub struct VoiceBuilder {
    sample_rate: u32,
    channels: u32,
    format: SampleFormat,
    size: u32,
    priority: u32,
    user_data: *mut c_void,
    memory: Option<ExternalMemory>,
    callback: Option<BufferCallback>,
    flags: BufferFlags,
}

impl VoiceBuilder {
    pub(crate) fn new() -> Self {
        Self {
            sample_rate: 44100,
            channels: 1,
            format: SampleFormat::Signed16,
            size: 0,
            priority: 0,
            user_data: std::ptr::null_mut(),
            memory: None,
            callback: None,
            flags: BufferFlags::empty(),
        }
    }

    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn channels(mut self, channels: u32) -> Self {
        self.channels = channels;
        self
    }

    pub fn format(mut self, format: SampleFormat) -> Self {
        self.format = format;
        self
    }

    /// Buffer size in bytes; the registry allocates and owns the memory.
    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self.memory = None;
        self
    }

    /// Caller-owned sample memory. The pointer must stay valid until the
    /// voice is destroyed.
    pub fn memory(mut self, memory: ExternalMemory) -> Self {
        self.memory = Some(memory);
        self.flags |= BufferFlags::USE_MAPPED_MEM;
        self
    }

    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn user_data(mut self, user_data: *mut c_void) -> Self {
        self.user_data = user_data;
        self
    }

    /// Drain notification hook.
    pub fn callback(mut self, callback: BufferCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn build(self, context: &mut Context) -> SegaResult<VoiceHandle> {
        let config = BufferConfig {
            priority: self.priority,
            sample_rate: self.sample_rate,
            format: self.format,
            channels: self.channels,
            size: self.size,
            user_data: self.user_data,
            memory: self.memory,
        };
        context.create_buffer(config, self.callback, self.flags)
    }
}
