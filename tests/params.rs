mod common;

use std::sync::Arc;

use common::MockBackend;
use sega_audio::params::{
    BufferFlags, PhysicalIo, Routing, SampleFormat, SynthParam, VOLUME_MAX,
};
use sega_audio::status::{PlaybackStatus, SegaError};
use sega_audio::voice::BufferConfig;
use sega_audio::{Context, VoiceHandle};

fn test_context() -> (Context, Arc<common::MockShared>) {
    common::init_tracing();
    let (backend, shared) = MockBackend::new();
    (Context::new(Box::new(backend)), shared)
}

fn voice(ctx: &mut Context, channels: u32, size: u32) -> VoiceHandle {
    ctx.create_buffer(
        BufferConfig {
            sample_rate: 44100,
            channels,
            format: SampleFormat::Signed16,
            size,
            ..BufferConfig::default()
        },
        None,
        BufferFlags::empty(),
    )
    .unwrap()
}

#[test]
fn loop_offsets_round_trip_within_the_buffer() {
    let (mut ctx, _shared) = test_context();
    let handle = voice(&mut ctx, 1, 44100);

    for offset in [0, 1, 22050, 44100] {
        ctx.set_start_loop_offset(handle, offset).unwrap();
        assert_eq!(ctx.start_loop_offset(handle).unwrap(), offset);
    }

    ctx.set_end_loop_offset(handle, 44100).unwrap();
    assert_eq!(ctx.end_loop_offset(handle).unwrap(), 44100);

    ctx.set_end_offset(handle, 32000).unwrap();
    assert_eq!(ctx.end_offset(handle).unwrap(), 32000);
}

#[test]
fn offsets_beyond_the_buffer_fail_and_keep_the_old_value() {
    let (mut ctx, _shared) = test_context();
    let handle = voice(&mut ctx, 1, 44100);

    ctx.set_start_loop_offset(handle, 1000).unwrap();
    assert_eq!(
        ctx.set_start_loop_offset(handle, 44101),
        Err(SegaError::BadParam)
    );
    assert_eq!(ctx.start_loop_offset(handle).unwrap(), 1000);

    ctx.set_end_offset(handle, 2000).unwrap();
    assert_eq!(ctx.set_end_offset(handle, 50000), Err(SegaError::BadParam));
    assert_eq!(ctx.end_offset(handle).unwrap(), 2000);
}

#[test]
fn loop_state_round_trips() {
    let (mut ctx, _shared) = test_context();
    let handle = voice(&mut ctx, 1, 64);

    assert!(!ctx.loop_state(handle).unwrap());
    ctx.set_loop_state(handle, true).unwrap();
    assert!(ctx.loop_state(handle).unwrap());
    ctx.set_loop_state(handle, false).unwrap();
    assert!(!ctx.loop_state(handle).unwrap());
}

#[test]
fn channel_volume_round_trips_and_validates_the_channel() {
    let (mut ctx, _shared) = test_context();
    let handle = voice(&mut ctx, 2, 1024);

    for volume in [0u32, 1, VOLUME_MAX / 2, VOLUME_MAX] {
        ctx.set_channel_volume(handle, 0, volume).unwrap();
        assert_eq!(ctx.channel_volume(handle, 0).unwrap(), volume);
    }
    ctx.set_channel_volume(handle, 1, 7).unwrap();
    assert_eq!(ctx.channel_volume(handle, 1).unwrap(), 7);

    assert_eq!(
        ctx.set_channel_volume(handle, 2, VOLUME_MAX),
        Err(SegaError::BadParam)
    );
    assert_eq!(ctx.channel_volume(handle, 2), Err(SegaError::BadParam));
}

#[test]
fn pitch_in_cents_drives_the_frequency_ratio() {
    let (mut ctx, shared) = test_context();
    let handle = voice(&mut ctx, 1, 1024);

    ctx.set_synth_param(handle, SynthParam::Pitch, 0).unwrap();
    assert!((*shared.voice(0).ratio.lock().unwrap() - 1.0).abs() < 1e-6);
    assert_eq!(ctx.synth_param(handle, SynthParam::Pitch).unwrap(), 0);

    ctx.set_synth_param(handle, SynthParam::Pitch, 1200).unwrap();
    assert!((*shared.voice(0).ratio.lock().unwrap() - 2.0).abs() < 1e-5);
    assert_eq!(ctx.synth_param(handle, SynthParam::Pitch).unwrap(), 1200);
}

#[test]
fn pitch_in_semitones_is_an_independent_path() {
    let (mut ctx, shared) = test_context();
    let handle = voice(&mut ctx, 1, 1024);

    ctx.set_pitch(handle, 0.0).unwrap();
    assert!((*shared.voice(0).ratio.lock().unwrap() - 1.0).abs() < 1e-6);
    assert_eq!(ctx.pitch(handle).unwrap(), 0.0);

    ctx.set_pitch(handle, 12.0).unwrap();
    assert!((*shared.voice(0).ratio.lock().unwrap() - 2.0).abs() < 1e-5);
    assert_eq!(ctx.pitch(handle).unwrap(), 12.0);

    // The cents path does not read back through the semitone getter.
    ctx.set_synth_param(handle, SynthParam::Pitch, -1200).unwrap();
    assert_eq!(ctx.pitch(handle).unwrap(), 12.0);
    assert!((*shared.voice(0).ratio.lock().unwrap() - 0.5).abs() < 1e-5);
}

#[test]
fn attenuation_sets_voice_gain_in_tenth_decibels() {
    let (mut ctx, shared) = test_context();
    let handle = voice(&mut ctx, 1, 1024);

    ctx.set_synth_param(handle, SynthParam::Attenuation, 0)
        .unwrap();
    assert!((*shared.voice(0).volume.lock().unwrap() - 1.0).abs() < 1e-6);

    ctx.set_synth_param(handle, SynthParam::Attenuation, 200)
        .unwrap();
    assert!((*shared.voice(0).volume.lock().unwrap() - 0.1).abs() < 1e-5);
    assert_eq!(
        ctx.synth_param(handle, SynthParam::Attenuation).unwrap(),
        200
    );
}

#[test]
fn unsupported_synth_params_are_stored_but_inert() {
    let (mut ctx, shared) = test_context();
    let handle = voice(&mut ctx, 1, 1024);

    ctx.set_synth_param(handle, SynthParam::FilterCutoff, 1234)
        .unwrap();
    assert_eq!(
        ctx.synth_param(handle, SynthParam::FilterCutoff).unwrap(),
        1234
    );
    assert!((*shared.voice(0).ratio.lock().unwrap() - 1.0).abs() < 1e-6);
    assert!((*shared.voice(0).volume.lock().unwrap() - 1.0).abs() < 1e-6);
}

#[test]
fn mono_front_left_send_yields_a_single_full_gain_cell() {
    let (mut ctx, shared) = test_context();
    let handle = voice(&mut ctx, 1, 1024);

    ctx.set_send_routing(handle, 0, 0, Routing::FrontLeft)
        .unwrap();
    ctx.set_send_level(handle, 0, 0, VOLUME_MAX).unwrap();

    let matrix = shared.voice(0).matrix.lock().unwrap().clone();
    assert_eq!(matrix.len(), 6);
    assert!((matrix[0] - 1.0).abs() < 1e-6);
    assert!(matrix[1..].iter().all(|&g| g == 0.0));
}

#[test]
fn send_level_and_channel_volume_multiply_into_the_matrix() {
    let (mut ctx, shared) = test_context();
    let handle = voice(&mut ctx, 1, 1024);

    ctx.set_send_routing(handle, 0, 0, Routing::FrontRight)
        .unwrap();
    ctx.set_send_level(handle, 0, 0, VOLUME_MAX / 2).unwrap();
    ctx.set_channel_volume(handle, 0, VOLUME_MAX / 2).unwrap();

    let matrix = shared.voice(0).matrix.lock().unwrap().clone();
    assert!((matrix[1] - 0.25).abs() < 1e-3);
}

#[test]
fn rerouting_a_send_clears_its_old_cell() {
    let (mut ctx, shared) = test_context();
    let handle = voice(&mut ctx, 1, 1024);

    ctx.set_send_routing(handle, 0, 0, Routing::FrontLeft)
        .unwrap();
    ctx.set_send_routing(handle, 0, 0, Routing::RearLeft)
        .unwrap();

    let matrix = shared.voice(0).matrix.lock().unwrap().clone();
    assert_eq!(matrix[0], 0.0);
    assert!((matrix[4] - 1.0).abs() < 1e-6);
}

#[test]
fn send_routing_round_trips_and_validates_indices() {
    let (mut ctx, _shared) = test_context();
    let handle = voice(&mut ctx, 2, 1024);

    ctx.set_send_routing(handle, 1, 3, Routing::FxSlot1).unwrap();
    assert_eq!(ctx.send_routing(handle, 1, 3).unwrap(), Routing::FxSlot1);
    assert_eq!(ctx.send_routing(handle, 0, 0).unwrap(), Routing::Unused);

    assert_eq!(
        ctx.set_send_routing(handle, 2, 0, Routing::FrontLeft),
        Err(SegaError::BadParam)
    );
    assert_eq!(
        ctx.set_send_routing(handle, 0, 4, Routing::FrontLeft),
        Err(SegaError::InvalidSend)
    );
    assert_eq!(
        ctx.set_send_level(handle, 0, 9, VOLUME_MAX),
        Err(SegaError::InvalidSend)
    );
}

#[test]
fn looping_play_submits_the_loop_region_in_frames() {
    let (mut ctx, shared) = test_context();
    let handle = voice(&mut ctx, 1, 44100);

    ctx.set_start_loop_offset(handle, 0).unwrap();
    ctx.set_end_loop_offset(handle, 44100).unwrap();
    ctx.set_loop_state(handle, true).unwrap();
    ctx.play(handle).unwrap();

    assert_eq!(ctx.playback_status(handle), PlaybackStatus::Active);
    let voice = shared.voice(0);
    let submits = voice.submits.lock().unwrap();
    assert_eq!(submits.len(), 1);
    let desc = &submits[0];
    assert_eq!(desc.data.len(), 44100);
    assert!(desc.looping);
    assert_eq!(desc.loop_begin, 0);
    // 44100 bytes of mono 16-bit audio is 22050 frames.
    assert_eq!(desc.loop_frames, 22050);
}

#[test]
fn partial_loop_region_is_rebased_to_frames() {
    let (mut ctx, shared) = test_context();
    let handle = voice(&mut ctx, 1, 8000);

    ctx.set_start_loop_offset(handle, 1000).unwrap();
    ctx.set_end_loop_offset(handle, 5000).unwrap();
    ctx.set_loop_state(handle, true).unwrap();
    ctx.play(handle).unwrap();

    let voice = shared.voice(0);
    let submits = voice.submits.lock().unwrap();
    let desc = &submits[0];
    assert_eq!(desc.loop_begin, 500);
    assert_eq!(desc.loop_frames, 2000);
}

#[test]
fn non_looping_play_disables_native_loop_fields() {
    let (mut ctx, shared) = test_context();
    let handle = voice(&mut ctx, 1, 4096);

    ctx.play(handle).unwrap();
    let voice = shared.voice(0);
    let submits = voice.submits.lock().unwrap();
    let desc = &submits[0];
    assert!(!desc.looping);
    assert_eq!(desc.loop_begin, 0);
    assert_eq!(desc.loop_frames, 0);
}

#[test]
fn update_buffer_resubmits_a_window_and_validates_bounds() {
    let (mut ctx, shared) = test_context();
    let handle = voice(&mut ctx, 1, 4096);

    ctx.update_buffer(handle, 1024, 2048).unwrap();
    {
        let voice = shared.voice(0);
        let submits = voice.submits.lock().unwrap();
        assert_eq!(submits.len(), 1);
        assert_eq!(submits[0].data.len(), 2048);
    }

    assert_eq!(
        ctx.update_buffer(handle, 4000, 1000),
        Err(SegaError::BadParam)
    );
    assert_eq!(shared.voice(0).submits.lock().unwrap().len(), 1);
}

#[test]
fn end_offset_truncates_the_submitted_region() {
    let (mut ctx, shared) = test_context();
    let handle = voice(&mut ctx, 1, 4096);

    ctx.set_end_offset(handle, 1000).unwrap();
    ctx.play(handle).unwrap();
    assert_eq!(shared.voice(0).submits.lock().unwrap()[0].data.len(), 1000);
}

#[test]
fn playback_position_reports_consumed_bytes() {
    let (mut ctx, shared) = test_context();
    let handle = voice(&mut ctx, 1, 44100);

    ctx.play(handle).unwrap();
    assert_eq!(ctx.playback_position(handle).unwrap(), 0);

    shared.advance_frames(0, 100);
    // Mono 16-bit: one frame is two bytes.
    assert_eq!(ctx.playback_position(handle).unwrap(), 200);
}

#[test]
fn playback_position_wraps_inside_the_loop_region() {
    let (mut ctx, shared) = test_context();
    let handle = voice(&mut ctx, 1, 8000);

    ctx.set_start_loop_offset(handle, 1000).unwrap();
    ctx.set_end_loop_offset(handle, 5000).unwrap();
    ctx.set_loop_state(handle, true).unwrap();
    ctx.play(handle).unwrap();

    // 3000 frames = 6000 bytes from the start, 1000 past the loop end.
    shared.advance_frames(0, 3000);
    assert_eq!(ctx.playback_position(handle).unwrap(), 2000);
}

#[test]
fn set_playback_position_rebases_and_validates() {
    let (mut ctx, shared) = test_context();
    let handle = voice(&mut ctx, 1, 44100);

    ctx.set_playback_position(handle, 1000).unwrap();
    assert_eq!(ctx.playback_position(handle).unwrap(), 1000);
    assert_eq!(
        ctx.set_playback_position(handle, 50000),
        Err(SegaError::BadParam)
    );

    // While playing, the region from the new position is resubmitted.
    ctx.play(handle).unwrap();
    ctx.set_playback_position(handle, 2000).unwrap();
    let voice = shared.voice(0);
    let submits = voice.submits.lock().unwrap();
    assert_eq!(submits.last().unwrap().data.len(), 44100 - 2000);
}

#[test]
fn io_volume_round_trips_per_line() {
    let (mut ctx, _shared) = test_context();

    assert_eq!(ctx.io_volume(PhysicalIo::OutFrontLeft), VOLUME_MAX);
    ctx.set_io_volume(PhysicalIo::OutFrontLeft, 12345).unwrap();
    assert_eq!(ctx.io_volume(PhysicalIo::OutFrontLeft), 12345);
    assert_eq!(ctx.io_volume(PhysicalIo::OutFrontRight), VOLUME_MAX);

    ctx.reset().unwrap();
    assert_eq!(ctx.io_volume(PhysicalIo::OutFrontLeft), VOLUME_MAX);
}

#[test]
fn sample_rate_outside_the_supported_band_is_rejected() {
    let (mut ctx, _shared) = test_context();
    let handle = voice(&mut ctx, 1, 1024);

    assert_eq!(
        ctx.set_sample_rate(handle, 100),
        Err(SegaError::BadSampleRate)
    );
    assert_eq!(
        ctx.set_sample_rate(handle, 400_000),
        Err(SegaError::BadSampleRate)
    );
    assert_eq!(ctx.sample_rate(handle).unwrap(), 44100);
}
