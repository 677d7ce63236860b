mod common;

use std::sync::Arc;

use common::MockBackend;
use sega_audio::params::{BufferFlags, SampleFormat, WaveFormat};
use sega_audio::status::{PlaybackStatus, SegaError};
use sega_audio::voice::BufferConfig;
use sega_audio::{Context, VoiceHandle};

fn test_context() -> (Context, Arc<common::MockShared>) {
    common::init_tracing();
    let (backend, shared) = MockBackend::new();
    (Context::new(Box::new(backend)), shared)
}

fn long_voice(ctx: &mut Context) -> VoiceHandle {
    ctx.create_buffer(
        BufferConfig {
            sample_rate: 44100,
            channels: 1,
            format: SampleFormat::Signed16,
            size: 44100,
            ..BufferConfig::default()
        },
        None,
        BufferFlags::empty(),
    )
    .unwrap()
}

#[test]
fn sample_rate_change_applies_immediately_when_idle() {
    let (mut ctx, shared) = test_context();
    let handle = long_voice(&mut ctx);
    assert_eq!(shared.created(), 1);

    ctx.set_sample_rate(handle, 22050).unwrap();
    // Idle voice: the native voice is recreated on the spot.
    assert_eq!(shared.created(), 2);
    assert_eq!(ctx.sample_rate(handle).unwrap(), 22050);
}

#[test]
fn sample_rate_change_defers_while_buffers_are_queued() {
    let (mut ctx, shared) = test_context();
    let handle = long_voice(&mut ctx);

    ctx.play(handle).unwrap();
    assert_eq!(ctx.buffers_queued(handle).unwrap(), 1);

    ctx.set_sample_rate(handle, 22050).unwrap();
    // Still in flight: nothing is recreated and the stored format is
    // untouched until the queue drains.
    assert_eq!(shared.created(), 1);
    assert_eq!(ctx.sample_rate(handle).unwrap(), 44100);
    assert_eq!(ctx.buffers_queued(handle).unwrap(), 1);
    assert_eq!(ctx.playback_status(handle), PlaybackStatus::Active);

    shared.drain_voice(0);
    assert_eq!(shared.created(), 2);
    assert_eq!(ctx.sample_rate(handle).unwrap(), 22050);
    assert_eq!(shared.voice(1).format.sample_rate, 22050);
}

#[test]
fn deferred_changes_apply_in_fifo_order() {
    let (mut ctx, shared) = test_context();
    let handle = long_voice(&mut ctx);

    ctx.play(handle).unwrap();
    ctx.set_sample_rate(handle, 22050).unwrap();
    ctx.set_format(
        handle,
        WaveFormat {
            sample_rate: 48000,
            channels: 2,
            format: SampleFormat::Unsigned8,
        },
    )
    .unwrap();
    assert_eq!(ctx.sample_rate(handle).unwrap(), 44100);

    shared.drain_voice(0);
    // Both ran, oldest first, so the later format change wins.
    assert_eq!(shared.created(), 3);
    let format = ctx.format(handle).unwrap();
    assert_eq!(format.sample_rate, 48000);
    assert_eq!(format.channels, 2);
    assert_eq!(format.format, SampleFormat::Unsigned8);
}

#[test]
fn pending_changes_apply_at_the_next_observation_point() {
    let (mut ctx, shared) = test_context();
    let handle = long_voice(&mut ctx);

    ctx.play(handle).unwrap();
    ctx.set_sample_rate(handle, 32000).unwrap();
    assert_eq!(shared.created(), 1);

    // Stop flushes the queue but the change was requested while buffers
    // were still queued; the next call that observes an empty queue
    // applies it.
    ctx.stop(handle).unwrap();
    ctx.play(handle).unwrap();
    assert_eq!(shared.created(), 2);
    assert_eq!(ctx.sample_rate(handle).unwrap(), 32000);
}

#[test]
fn failed_recreation_leaves_an_explicit_hole_then_recovers() {
    let (mut ctx, shared) = test_context();
    let handle = long_voice(&mut ctx);

    shared.set_fail_creations(true);
    assert_eq!(ctx.set_sample_rate(handle, 22050), Err(SegaError::Unknown));
    // The record survives without a native voice: state queries keep
    // working, playback reports the backend failure.
    assert_eq!(ctx.sample_rate(handle).unwrap(), 44100);
    assert_eq!(ctx.play(handle), Err(SegaError::Unknown));
    assert!(ctx.set_start_loop_offset(handle, 10).is_ok());

    shared.set_fail_creations(false);
    ctx.set_sample_rate(handle, 22050).unwrap();
    assert_eq!(ctx.sample_rate(handle).unwrap(), 22050);
    ctx.play(handle).unwrap();
    assert_eq!(ctx.playback_status(handle), PlaybackStatus::Active);

    assert!(ctx.destroy_buffer(handle).is_ok());
}

#[test]
fn recreated_voice_keeps_ratio_volume_and_matrix() {
    let (mut ctx, shared) = test_context();
    let handle = long_voice(&mut ctx);

    ctx.set_pitch(handle, 12.0).unwrap();
    ctx.set_synth_param(handle, sega_audio::params::SynthParam::Attenuation, 200)
        .unwrap();
    ctx.set_send_routing(handle, 0, 0, sega_audio::params::Routing::FrontLeft)
        .unwrap();

    ctx.set_sample_rate(handle, 22050).unwrap();
    let replacement = shared.voice(1);
    assert!((*replacement.ratio.lock().unwrap() - 2.0).abs() < 1e-5);
    assert!((*replacement.volume.lock().unwrap() - 0.1).abs() < 1e-5);
    let matrix = replacement.matrix.lock().unwrap().clone();
    assert!((matrix[0] - 1.0).abs() < 1e-6);
}

#[test]
fn format_change_while_queued_does_not_interrupt_playback() {
    let (mut ctx, shared) = test_context();
    let handle = long_voice(&mut ctx);

    ctx.play(handle).unwrap();
    ctx.set_format(
        handle,
        WaveFormat {
            sample_rate: 48000,
            channels: 1,
            format: SampleFormat::Signed16,
        },
    )
    .unwrap();

    // The queued buffer is untouched and the voice was not recreated.
    assert_eq!(shared.voice(0).submits.lock().unwrap().len(), 1);
    assert_eq!(ctx.buffers_queued(handle).unwrap(), 1);
    assert_eq!(ctx.playback_status(handle), PlaybackStatus::Active);
    assert_eq!(shared.created(), 1);
}
