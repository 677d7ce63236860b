//! `SEGAAPI_*` C exports.
//!
//! The legacy surface assumes one implicit instance per process, so the
//! exports funnel into a single [Context] behind a global slot created by
//! `SEGAAPI_Init` and torn down by `SEGAAPI_Exit`. Calls made outside that
//! window fail cleanly. Every entry point null-checks its pointers before
//! anything else and reports through the legacy status words.

use std::ffi::c_void;
use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::context::Context;
use crate::params::{
    BufferFlags, PhysicalIo, Routing, SampleFormat, SendLevelParam, SendRouteParam, SynthParam,
    SynthParamValue, VOLUME_MAX, VoiceIoctl, VoiceParam, WaveFormat,
};
use crate::registry::VoiceHandle;
use crate::status::{PlaybackStatus, SegaResult, Status};
use crate::utils::MutexPoison;
use crate::voice::{BufferCallback, BufferConfig, BufferMessage, ExternalMemory};

static CONTEXT: Lazy<Mutex<Option<Context>>> = Lazy::new(|| Mutex::new(None));

/// Buffer-event callback from the legacy surface.
pub type SegaBufferCallbackFn = extern "C" fn(handle: *mut c_void, message: i32);

#[repr(C)]
pub struct SegaWoseFormat {
    pub sample_rate: u32,
    pub sample_format: u32,
    pub num_chans: u32,
}

#[repr(C)]
pub struct SegaMapData {
    pub size: u32,
    pub offset: u32,
    pub buffer_hdr: *mut c_void,
}

#[repr(C)]
pub struct SegaBufferConfig {
    pub priority: u32,
    pub sample_rate: u32,
    pub sample_format: u32,
    pub num_chans: u32,
    pub reserved: u32,
    pub user_data: *mut c_void,
    pub map_data: SegaMapData,
}

#[repr(C)]
pub struct SegaSendRouteParamSet {
    pub channel: u32,
    pub send: u32,
    pub dest: u32,
}

#[repr(C)]
pub struct SegaSendLevelParamSet {
    pub channel: u32,
    pub send: u32,
    pub level: u32,
}

#[repr(C)]
pub struct SegaVoiceParamSet {
    pub ioctl: u32,
    pub param1: u32,
    pub param2: u32,
}

#[repr(C)]
pub struct SegaSynthParamSet {
    pub param: u32,
    pub value: i32,
}

fn with_context<T>(missing: T, f: impl FnOnce(&mut Context) -> T) -> T {
    let mut guard = CONTEXT.lock_poison();
    match guard.as_mut() {
        Some(context) => f(context),
        None => missing,
    }
}

fn parse_handle(raw: *mut c_void) -> Option<VoiceHandle> {
    VoiceHandle::from_raw(raw as usize as u64)
}

fn handle_to_raw(handle: VoiceHandle) -> *mut c_void {
    handle.raw() as usize as *mut c_void
}

/// Status-returning operation on one handle.
fn handle_op(raw: *mut c_void, f: impl FnOnce(&mut Context, VoiceHandle) -> SegaResult) -> i32 {
    with_context(Status::UNKNOWN.raw(), |context| match parse_handle(raw) {
        Some(handle) => Status::from(&f(context, handle)).raw(),
        None => {
            context.set_last_status(Status::BAD_HANDLE);
            Status::BAD_HANDLE.raw()
        }
    })
}

/// Value-returning query on one handle; failures yield `missing`.
fn handle_get<T: Copy>(
    raw: *mut c_void,
    missing: T,
    f: impl FnOnce(&mut Context, VoiceHandle) -> SegaResult<T>,
) -> T {
    with_context(missing, |context| match parse_handle(raw) {
        Some(handle) => f(context, handle).unwrap_or(missing),
        None => missing,
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_Init() -> i32 {
    let mut guard = CONTEXT.lock_poison();
    if guard.is_some() {
        return Status::SUCCESS.raw();
    }
    match Context::with_default_backend() {
        Ok(context) => {
            *guard = Some(context);
            Status::SUCCESS.raw()
        }
        Err(err) => Status::from(err).raw(),
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_Exit() -> i32 {
    let mut guard = CONTEXT.lock_poison();
    if let Some(mut context) = guard.take() {
        context.shutdown();
    }
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_CreateBuffer(
    config: *mut SegaBufferConfig,
    callback: Option<SegaBufferCallbackFn>,
    flags: u32,
    handle_out: *mut *mut c_void,
) -> i32 {
    if config.is_null() || handle_out.is_null() {
        return Status::BAD_POINTER.raw();
    }

    with_context(Status::UNKNOWN.raw(), |context| {
        let config = unsafe { &*config };
        let Some(format) = SampleFormat::from_raw(config.sample_format) else {
            context.set_last_status(Status::BAD_PARAM);
            return Status::BAD_PARAM.raw();
        };

        let flags = BufferFlags::from_bits_truncate(flags);
        let memory = if !config.map_data.buffer_hdr.is_null() {
            Some(ExternalMemory {
                ptr: config.map_data.buffer_hdr as *mut u8,
                len: config.map_data.size as usize,
            })
        } else {
            None
        };

        let buffer_config = BufferConfig {
            priority: config.priority,
            sample_rate: config.sample_rate,
            format,
            channels: config.num_chans,
            size: config.map_data.size,
            user_data: config.user_data,
            memory,
        };

        let callback: Option<BufferCallback> = callback.map(|cb| {
            std::sync::Arc::new(move |handle: VoiceHandle, message: BufferMessage| {
                cb(handle_to_raw(handle), message as i32)
            }) as BufferCallback
        });

        match context.create_buffer(buffer_config, callback, flags) {
            Ok(handle) => {
                unsafe { *handle_out = handle_to_raw(handle) };
                Status::SUCCESS.raw()
            }
            Err(err) => Status::from(err).raw(),
        }
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_DestroyBuffer(handle: *mut c_void) -> i32 {
    handle_op(handle, |context, handle| context.destroy_buffer(handle))
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_Play(handle: *mut c_void) -> i32 {
    handle_op(handle, |context, handle| context.play(handle))
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_Stop(handle: *mut c_void) -> i32 {
    handle_op(handle, |context, handle| context.stop(handle))
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_Pause(handle: *mut c_void) -> i32 {
    handle_op(handle, |context, handle| context.pause(handle))
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_PlayWithSetup(
    handle: *mut c_void,
    num_send_routes: u32,
    send_routes: *mut SegaSendRouteParamSet,
    num_send_levels: u32,
    send_levels: *mut SegaSendLevelParamSet,
    num_voice_params: u32,
    voice_params: *mut SegaVoiceParamSet,
    num_synth_params: u32,
    synth_params: *mut SegaSynthParamSet,
) -> i32 {
    handle_op(handle, |context, handle| {
        let routes = read_array(send_routes, num_send_routes, |set| {
            Routing::from_raw(set.dest).map(|dest| SendRouteParam {
                channel: set.channel,
                send: set.send,
                dest,
            })
        })?;
        let levels = read_array(send_levels, num_send_levels, |set| {
            Some(SendLevelParam {
                channel: set.channel,
                send: set.send,
                level: set.level,
            })
        })?;
        let ioctls = read_array(voice_params, num_voice_params, |set| {
            VoiceIoctl::from_raw(set.ioctl).map(|ioctl| VoiceParam {
                ioctl,
                param1: set.param1,
                param2: set.param2,
            })
        })?;
        let synth = read_array(synth_params, num_synth_params, |set| {
            SynthParam::from_raw(set.param).map(|param| SynthParamValue {
                param,
                value: set.value,
            })
        })?;
        context.play_with_setup(handle, &routes, &levels, &ioctls, &synth)
    })
}

/// Copies a legacy parameter array, rejecting unknown enum values.
fn read_array<S, T>(
    ptr: *mut S,
    count: u32,
    convert: impl Fn(&S) -> Option<T>,
) -> SegaResult<Vec<T>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if ptr.is_null() {
        return Err(crate::status::SegaError::BadPointer);
    }
    let raw = unsafe { std::slice::from_raw_parts(ptr, count as usize) };
    raw.iter()
        .map(|set| convert(set).ok_or(crate::status::SegaError::BadParam))
        .collect()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_UpdateBuffer(handle: *mut c_void, start_offset: u32, length: u32) -> i32 {
    handle_op(handle, |context, handle| {
        context.update_buffer(handle, start_offset, length)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetUserData(handle: *mut c_void, user_data: *mut c_void) -> i32 {
    handle_op(handle, |context, handle| {
        context.set_user_data(handle, user_data)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetUserData(handle: *mut c_void) -> *mut c_void {
    handle_get(handle, std::ptr::null_mut(), |context, handle| {
        context.user_data(handle)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetFormat(handle: *mut c_void, format: *mut SegaWoseFormat) -> i32 {
    if format.is_null() {
        return Status::BAD_POINTER.raw();
    }
    handle_op(handle, |context, handle| {
        let format = unsafe { &*format };
        let sample_format = SampleFormat::from_raw(format.sample_format)
            .ok_or(crate::status::SegaError::BadParam)?;
        context.set_format(
            handle,
            WaveFormat {
                sample_rate: format.sample_rate,
                channels: format.num_chans,
                format: sample_format,
            },
        )
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetFormat(handle: *mut c_void, format_out: *mut SegaWoseFormat) -> i32 {
    if format_out.is_null() {
        return Status::BAD_POINTER.raw();
    }
    handle_op(handle, |context, handle| {
        let format = context.format(handle)?;
        unsafe {
            (*format_out).sample_rate = format.sample_rate;
            (*format_out).sample_format = format.format.raw();
            (*format_out).num_chans = format.channels;
        }
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetSampleRate(handle: *mut c_void, sample_rate: u32) -> i32 {
    handle_op(handle, |context, handle| {
        context.set_sample_rate(handle, sample_rate)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetSampleRate(handle: *mut c_void) -> u32 {
    handle_get(handle, 0, |context, handle| context.sample_rate(handle))
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetPriority(handle: *mut c_void, priority: u32) -> i32 {
    handle_op(handle, |context, handle| {
        context.set_priority(handle, priority)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetPriority(handle: *mut c_void) -> u32 {
    handle_get(handle, 0, |context, handle| context.priority(handle))
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetSendRouting(
    handle: *mut c_void,
    channel: u32,
    send: u32,
    dest: u32,
) -> i32 {
    handle_op(handle, |context, handle| {
        let dest = Routing::from_raw(dest).ok_or(crate::status::SegaError::BadParam)?;
        context.set_send_routing(handle, channel, send, dest)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetSendRouting(handle: *mut c_void, channel: u32, send: u32) -> u32 {
    handle_get(handle, Routing::Unused.raw(), |context, handle| {
        context
            .send_routing(handle, channel, send)
            .map(Routing::raw)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetSendLevel(
    handle: *mut c_void,
    channel: u32,
    send: u32,
    level: u32,
) -> i32 {
    handle_op(handle, |context, handle| {
        context.set_send_level(handle, channel, send, level)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetSendLevel(handle: *mut c_void, channel: u32, send: u32) -> u32 {
    handle_get(handle, 0, |context, handle| {
        context.send_level(handle, channel, send)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetChannelVolume(handle: *mut c_void, channel: u32, volume: u32) -> i32 {
    handle_op(handle, |context, handle| {
        context.set_channel_volume(handle, channel, volume)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetChannelVolume(handle: *mut c_void, channel: u32) -> u32 {
    handle_get(handle, 0, |context, handle| {
        context.channel_volume(handle, channel)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetPlaybackPosition(handle: *mut c_void, playback_pos: u32) -> i32 {
    handle_op(handle, |context, handle| {
        context.set_playback_position(handle, playback_pos)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetPlaybackPosition(handle: *mut c_void) -> u32 {
    handle_get(handle, 0, |context, handle| {
        context.playback_position(handle)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetPlaybackStatus(handle: *mut c_void) -> i32 {
    with_context(PlaybackStatus::Invalid as i32, |context| {
        match parse_handle(handle) {
            Some(handle) => context.playback_status(handle) as i32,
            None => PlaybackStatus::Invalid as i32,
        }
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetNotificationFrequency(_handle: *mut c_void, _frame_count: u32) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetNotificationPoint(_handle: *mut c_void, _buffer_offset: u32) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_ClearNotificationPoint(_handle: *mut c_void, _buffer_offset: u32) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetStartLoopOffset(handle: *mut c_void, offset: u32) -> i32 {
    handle_op(handle, |context, handle| {
        context.set_start_loop_offset(handle, offset)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetStartLoopOffset(handle: *mut c_void) -> u32 {
    handle_get(handle, 0, |context, handle| {
        context.start_loop_offset(handle)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetEndLoopOffset(handle: *mut c_void, offset: u32) -> i32 {
    handle_op(handle, |context, handle| {
        context.set_end_loop_offset(handle, offset)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetEndLoopOffset(handle: *mut c_void) -> u32 {
    handle_get(handle, 0, |context, handle| context.end_loop_offset(handle))
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetEndOffset(handle: *mut c_void, offset: u32) -> i32 {
    handle_op(handle, |context, handle| {
        context.set_end_offset(handle, offset)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetEndOffset(handle: *mut c_void) -> u32 {
    handle_get(handle, 0, |context, handle| context.end_offset(handle))
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetLoopState(handle: *mut c_void, do_continuous_looping: i32) -> i32 {
    handle_op(handle, |context, handle| {
        context.set_loop_state(handle, do_continuous_looping != 0)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetLoopState(handle: *mut c_void) -> i32 {
    handle_get(handle, 0, |context, handle| {
        context.loop_state(handle).map(i32::from)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetSynthParam(handle: *mut c_void, param: u32, value: i32) -> i32 {
    handle_op(handle, |context, handle| {
        let param = SynthParam::from_raw(param).ok_or(crate::status::SegaError::BadParam)?;
        context.set_synth_param(handle, param, value)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetSynthParam(handle: *mut c_void, param: u32) -> i32 {
    handle_get(handle, 0, |context, handle| {
        let param = SynthParam::from_raw(param).ok_or(crate::status::SegaError::BadParam)?;
        context.synth_param(handle, param)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetSynthParamMultiple(
    handle: *mut c_void,
    num_params: u32,
    params: *mut SegaSynthParamSet,
) -> i32 {
    handle_op(handle, |context, handle| {
        let params = read_array(params, num_params, |set| {
            SynthParam::from_raw(set.param).map(|param| SynthParamValue {
                param,
                value: set.value,
            })
        })?;
        context.set_synth_params(handle, &params)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetSynthParamMultiple(
    handle: *mut c_void,
    num_params: u32,
    params: *mut SegaSynthParamSet,
) -> i32 {
    if num_params == 0 {
        // Nothing to fill in; still validate the handle.
        return handle_op(handle, |context, handle| context.format(handle).map(|_| ()));
    }
    if params.is_null() {
        return Status::BAD_POINTER.raw();
    }
    handle_op(handle, |context, handle| {
        let slots = unsafe { std::slice::from_raw_parts_mut(params, num_params as usize) };
        for slot in slots {
            let param =
                SynthParam::from_raw(slot.param).ok_or(crate::status::SegaError::BadParam)?;
            slot.value = context.synth_param(handle, param)?;
        }
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetReleaseState(_handle: *mut c_void, _set: i32) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetPitch(handle: *mut c_void, pitch: f32) -> i32 {
    handle_op(handle, |context, handle| context.set_pitch(handle, pitch))
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetPitch(handle: *mut c_void) -> f32 {
    handle_get(handle, 0.0, |context, handle| context.pitch(handle))
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetIOVolume(phys_io: u32, volume: u32) -> i32 {
    with_context(Status::UNKNOWN.raw(), |context| {
        match PhysicalIo::from_raw(phys_io) {
            Some(io) => Status::from(&context.set_io_volume(io, volume)).raw(),
            None => {
                context.set_last_status(Status::BAD_PARAM);
                Status::BAD_PARAM.raw()
            }
        }
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetIOVolume(phys_io: u32) -> u32 {
    with_context(VOLUME_MAX, |context| match PhysicalIo::from_raw(phys_io) {
        Some(io) => context.io_volume(io),
        None => VOLUME_MAX,
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetLastStatus(last_status: i32) {
    with_context((), |context| {
        context.set_last_status(Status::from_raw(last_status))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetLastStatus() -> i32 {
    with_context(Status::UNKNOWN.raw(), |context| {
        context.last_status().raw()
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_Reset() -> i32 {
    with_context(Status::UNKNOWN.raw(), |context| {
        Status::from(&context.reset()).raw()
    })
}

// ----------------------------------------------------------------------
// Legacy stub surface: EAX environmental effects, SPDIF control, and the
// channel-filter family. Accepted and ignored; getters report zero.
// ----------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetGlobalEAXProperty(
    _guid: *mut c_void,
    _property: u32,
    _data: *mut c_void,
    _data_size: u32,
) -> i32 {
    1
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetGlobalEAXProperty(
    _guid: *mut c_void,
    _property: u32,
    _data: *mut c_void,
    _data_size: u32,
) -> i32 {
    1
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetSendEAXProperty(
    _handle: *mut c_void,
    _channel: u32,
    _send: u32,
    _guid: *mut c_void,
    _property: u32,
    _data: *mut c_void,
    _data_size: u32,
) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetSendEAXProperty(
    _handle: *mut c_void,
    _channel: u32,
    _send: u32,
    _guid: *mut c_void,
    _property: u32,
    _data: *mut c_void,
    _data_size: u32,
) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetSPDIFOutChannelStatus(
    _channel_status: u32,
    _ext_channel_status: u32,
) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetSPDIFOutChannelStatus(
    channel_status: *mut u32,
    ext_channel_status: *mut u32,
) -> i32 {
    if channel_status.is_null() || ext_channel_status.is_null() {
        return Status::BAD_POINTER.raw();
    }
    unsafe {
        *channel_status = 0;
        *ext_channel_status = 0;
    }
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetSPDIFOutSampleRate(_sampling_rate: u32) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetSPDIFOutSampleRate() -> u32 {
    0
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetSPDIFOutChannelRouting(_channel: u32, _source: u32) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetSPDIFOutChannelRouting(_channel: u32) -> u32 {
    Routing::FrontLeft.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetSPDIFMode(_mode: u32) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetSPDIFMode() -> u32 {
    0
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetSPDIFWordSize(_word_size: u32) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetSPDIFWordSize() -> u32 {
    0
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetChannelRouting(
    _handle: *mut c_void,
    _channel: u32,
    _dest: u32,
) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetChannelRouting(_handle: *mut c_void, _channel: u32) -> u32 {
    Routing::FrontLeft.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetChannelEAXProperty(
    _handle: *mut c_void,
    _channel: u32,
    _guid: *mut c_void,
    _property: u32,
    _data: *mut c_void,
    _data_size: u32,
) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetChannelEAXProperty(
    _handle: *mut c_void,
    _channel: u32,
    _guid: *mut c_void,
    _property: u32,
    _data: *mut c_void,
    _data_size: u32,
) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetChannelFilter(
    _handle: *mut c_void,
    _channel: u32,
    _filter: u32,
) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetChannelFilter(_handle: *mut c_void, _channel: u32) -> u32 {
    0
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetChannelFilterParam(
    _handle: *mut c_void,
    _channel: u32,
    _filter_param: u32,
    _value: i32,
) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetChannelFilterParam(
    _handle: *mut c_void,
    _channel: u32,
    _filter_param: u32,
) -> i32 {
    0
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetChannelFilterState(
    _handle: *mut c_void,
    _channel: u32,
    _enable: i32,
) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetChannelFilterState(_handle: *mut c_void, _channel: u32) -> i32 {
    0
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetSendFilter(
    _handle: *mut c_void,
    _channel: u32,
    _send: u32,
    _filter: u32,
) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetSendFilter(_handle: *mut c_void, _channel: u32, _send: u32) -> u32 {
    0
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetSendFilterParam(
    _handle: *mut c_void,
    _channel: u32,
    _send: u32,
    _filter_param: u32,
    _value: i32,
) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetSendFilterParam(
    _handle: *mut c_void,
    _channel: u32,
    _send: u32,
    _filter_param: u32,
) -> i32 {
    0
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_SetSendFilterState(
    _handle: *mut c_void,
    _channel: u32,
    _send: u32,
    _enable: i32,
) -> i32 {
    Status::SUCCESS.raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn SEGAAPI_GetSendFilterState(
    _handle: *mut c_void,
    _channel: u32,
    _send: u32,
) -> i32 {
    0
}

/// The EAX send-filter scalar family shares one shape: the setter takes an
/// `i32` and succeeds, the getter reports zero.
macro_rules! send_filter_stubs {
    ($(($set:ident, $get:ident)),* $(,)?) => {
        $(
            #[unsafe(no_mangle)]
            pub extern "C" fn $set(
                _handle: *mut c_void,
                _channel: u32,
                _send: u32,
                _value: i32,
            ) -> i32 {
                Status::SUCCESS.raw()
            }

            #[unsafe(no_mangle)]
            pub extern "C" fn $get(_handle: *mut c_void, _channel: u32, _send: u32) -> i32 {
                0
            }
        )*
    };
}

send_filter_stubs! {
    (SEGAAPI_SetSendFilterQFactor, SEGAAPI_GetSendFilterQFactor),
    (SEGAAPI_SetSendFilterFrequency, SEGAAPI_GetSendFilterFrequency),
    (SEGAAPI_SetSendFilterGain, SEGAAPI_GetSendFilterGain),
    (SEGAAPI_SetSendFilterBandwidth, SEGAAPI_GetSendFilterBandwidth),
    (SEGAAPI_SetSendFilterCutoffFrequency, SEGAAPI_GetSendFilterCutoffFrequency),
    (SEGAAPI_SetSendFilterLowpassResonance, SEGAAPI_GetSendFilterLowpassResonance),
    (SEGAAPI_SetSendFilterWetDryMix, SEGAAPI_GetSendFilterWetDryMix),
    (SEGAAPI_SetSendFilterDelay, SEGAAPI_GetSendFilterDelay),
    (SEGAAPI_SetSendFilterFeedback, SEGAAPI_GetSendFilterFeedback),
    (SEGAAPI_SetSendFilterLeftDelay, SEGAAPI_GetSendFilterLeftDelay),
    (SEGAAPI_SetSendFilterRightDelay, SEGAAPI_GetSendFilterRightDelay),
    (SEGAAPI_SetSendFilterPanDelay, SEGAAPI_GetSendFilterPanDelay),
    (SEGAAPI_SetSendFilterModulationRate, SEGAAPI_GetSendFilterModulationRate),
    (SEGAAPI_SetSendFilterModulationDepth, SEGAAPI_GetSendFilterModulationDepth),
    (SEGAAPI_SetSendFilterModulationTime, SEGAAPI_GetSendFilterModulationTime),
    (SEGAAPI_SetSendFilterModulationWaveform, SEGAAPI_GetSendFilterModulationWaveform),
    (SEGAAPI_SetSendFilterPhase, SEGAAPI_GetSendFilterPhase),
    (SEGAAPI_SetSendFilterInGain, SEGAAPI_GetSendFilterInGain),
    (SEGAAPI_SetSendFilterOutGain, SEGAAPI_GetSendFilterOutGain),
    (SEGAAPI_SetSendFilterEQGain, SEGAAPI_GetSendFilterEQGain),
    (SEGAAPI_SetSendFilterEQBandwidth, SEGAAPI_GetSendFilterEQBandwidth),
    (SEGAAPI_SetSendFilterEQFrequency, SEGAAPI_GetSendFilterEQFrequency),
    (SEGAAPI_SetSendFilterDistortion, SEGAAPI_GetSendFilterDistortion),
    (SEGAAPI_SetSendFilterEcho, SEGAAPI_GetSendFilterEcho),
    (SEGAAPI_SetSendFilterChorus, SEGAAPI_GetSendFilterChorus),
    (SEGAAPI_SetSendFilterDecayTime, SEGAAPI_GetSendFilterDecayTime),
    (SEGAAPI_SetSendFilterDecayHFRatio, SEGAAPI_GetSendFilterDecayHFRatio),
    (SEGAAPI_SetSendFilterDensity, SEGAAPI_GetSendFilterDensity),
    (SEGAAPI_SetSendFilterDiffusion, SEGAAPI_GetSendFilterDiffusion),
    (SEGAAPI_SetSendFilterHFReference, SEGAAPI_GetSendFilterHFReference),
    (SEGAAPI_SetSendFilterHFGain, SEGAAPI_GetSendFilterHFGain),
    (SEGAAPI_SetSendFilterLFGain, SEGAAPI_GetSendFilterLFGain),
    (SEGAAPI_SetSendFilterReflectionsDelay, SEGAAPI_GetSendFilterReflectionsDelay),
    (SEGAAPI_SetSendFilterReflectionsGain, SEGAAPI_GetSendFilterReflectionsGain),
    (SEGAAPI_SetSendFilterReflectionsScale, SEGAAPI_GetSendFilterReflectionsScale),
    (SEGAAPI_SetSendFilterReflectionsDelayScale, SEGAAPI_GetSendFilterReflectionsDelayScale),
    (SEGAAPI_SetSendFilterReverbDelay, SEGAAPI_GetSendFilterReverbDelay),
    (SEGAAPI_SetSendFilterReverbGain, SEGAAPI_GetSendFilterReverbGain),
    (SEGAAPI_SetSendFilterReverbScale, SEGAAPI_GetSendFilterReverbScale),
    (SEGAAPI_SetSendFilterReverbDelayScale, SEGAAPI_GetSendFilterReverbDelayScale),
    (SEGAAPI_SetSendFilterRoomRolloffFactor, SEGAAPI_GetSendFilterRoomRolloffFactor),
    (SEGAAPI_SetSendFilterAirAbsorptionGainHF, SEGAAPI_GetSendFilterAirAbsorptionGainHF),
    (SEGAAPI_SetSendFilterRoomSize, SEGAAPI_GetSendFilterRoomSize),
    (SEGAAPI_SetSendFilterPosition, SEGAAPI_GetSendFilterPosition),
    (SEGAAPI_SetSendFilterVelocity, SEGAAPI_GetSendFilterVelocity),
    (SEGAAPI_SetSendFilterOrientation, SEGAAPI_GetSendFilterOrientation),
    (SEGAAPI_SetSendFilterEnvironmentSize, SEGAAPI_GetSendFilterEnvironmentSize),
    (SEGAAPI_SetSendFilterEnvironmentDiffusion, SEGAAPI_GetSendFilterEnvironmentDiffusion),
    (SEGAAPI_SetSendFilterEnvironmentReflections, SEGAAPI_GetSendFilterEnvironmentReflections),
    (SEGAAPI_SetSendFilterEnvironmentReverb, SEGAAPI_GetSendFilterEnvironmentReverb),
}
