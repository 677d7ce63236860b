use bitflags::bitflags;

/// Full-scale value for every unsigned volume word on the public surface.
pub const VOLUME_MAX: u32 = 0xFFFF_FFFF;

/// Most channels a single voice can carry.
pub const MAX_VOICE_CHANNELS: usize = 6;

/// Independent send slots per voice channel, one per effect slot port.
pub const MAX_SENDS: usize = 4;

/// Physical output ports addressable by the routing matrix.
pub const OUTPUT_PORTS: usize = 6;

const SAMPLE_FORMAT_UNSIGNED_8: u32 = 0x0004;
const SAMPLE_FORMAT_SIGNED_16: u32 = 0x0020;

const UNUSED_SEND: u32 = 0xFFFF_0001;

bitflags! {
    /// Creation flags from the legacy buffer-config word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BufferFlags: u32 {
        const SYNTH_BUFFER = 0x0000_0001;
        const ALLOC_USER_MEM = 0x0000_0002;
        const USE_MAPPED_MEM = 0x0000_0004;
    }
}

/// PCM sample encodings the voice engine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    Unsigned8,
    Signed16,
}

impl SampleFormat {
    pub fn from_raw(raw: u32) -> Option<SampleFormat> {
        match raw {
            SAMPLE_FORMAT_UNSIGNED_8 => Some(SampleFormat::Unsigned8),
            SAMPLE_FORMAT_SIGNED_16 => Some(SampleFormat::Signed16),
            _ => None,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            SampleFormat::Unsigned8 => SAMPLE_FORMAT_UNSIGNED_8,
            SampleFormat::Signed16 => SAMPLE_FORMAT_SIGNED_16,
        }
    }

    pub fn bytes_per_sample(self) -> u32 {
        match self {
            SampleFormat::Unsigned8 => 1,
            SampleFormat::Signed16 => 2,
        }
    }

    /// Byte value an all-silent buffer is filled with.
    pub fn silence_byte(self) -> u8 {
        match self {
            SampleFormat::Unsigned8 => 0x80,
            SampleFormat::Signed16 => 0x00,
        }
    }
}

/// Wave-format descriptor for one voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveFormat {
    pub sample_rate: u32,
    pub channels: u32,
    pub format: SampleFormat,
}

impl WaveFormat {
    /// Bytes per interleaved frame.
    pub fn block_align(&self) -> u32 {
        self.format.bytes_per_sample() * self.channels
    }

    pub fn avg_bytes_per_sec(&self) -> u32 {
        self.sample_rate * self.block_align()
    }
}

/// Routing destination for one send: a physical output port or one of the
/// effect-slot submixes. Effect slots are accepted and stored but resolve
/// to no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Routing {
    #[default]
    Unused,
    FrontLeft,
    FrontRight,
    FrontCenter,
    LowFrequency,
    RearLeft,
    RearRight,
    FxSlot0,
    FxSlot1,
    FxSlot2,
    FxSlot3,
}

impl Routing {
    pub fn from_raw(raw: u32) -> Option<Routing> {
        match raw {
            UNUSED_SEND => Some(Routing::Unused),
            0 => Some(Routing::FrontLeft),
            1 => Some(Routing::FrontRight),
            2 => Some(Routing::FrontCenter),
            3 => Some(Routing::LowFrequency),
            4 => Some(Routing::RearLeft),
            5 => Some(Routing::RearRight),
            10 => Some(Routing::FxSlot0),
            11 => Some(Routing::FxSlot1),
            12 => Some(Routing::FxSlot2),
            13 => Some(Routing::FxSlot3),
            _ => None,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            Routing::Unused => UNUSED_SEND,
            Routing::FrontLeft => 0,
            Routing::FrontRight => 1,
            Routing::FrontCenter => 2,
            Routing::LowFrequency => 3,
            Routing::RearLeft => 4,
            Routing::RearRight => 5,
            Routing::FxSlot0 => 10,
            Routing::FxSlot1 => 11,
            Routing::FxSlot2 => 12,
            Routing::FxSlot3 => 13,
        }
    }

    /// Output-matrix column this destination lands in, if it maps to a
    /// physical port.
    pub fn output_channel(self) -> Option<usize> {
        match self {
            Routing::FrontLeft => Some(0),
            Routing::FrontRight => Some(1),
            Routing::FrontCenter => Some(2),
            Routing::LowFrequency => Some(3),
            Routing::RearLeft => Some(4),
            Routing::RearRight => Some(5),
            _ => None,
        }
    }
}

/// Physical IO lines addressable by the master-gain surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalIo {
    OutFrontLeft,
    OutFrontRight,
    OutFrontCenter,
    OutLowFrequency,
    OutRearLeft,
    OutRearRight,
    OutOpticalLeft,
    OutOpticalRight,
    InLineLeft,
    InLineRight,
}

impl PhysicalIo {
    pub const COUNT: usize = 10;

    pub fn from_raw(raw: u32) -> Option<PhysicalIo> {
        match raw {
            0 => Some(PhysicalIo::OutFrontLeft),
            1 => Some(PhysicalIo::OutFrontRight),
            2 => Some(PhysicalIo::OutFrontCenter),
            3 => Some(PhysicalIo::OutLowFrequency),
            4 => Some(PhysicalIo::OutRearLeft),
            5 => Some(PhysicalIo::OutRearRight),
            10 => Some(PhysicalIo::OutOpticalLeft),
            11 => Some(PhysicalIo::OutOpticalRight),
            20 => Some(PhysicalIo::InLineLeft),
            21 => Some(PhysicalIo::InLineRight),
            _ => None,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            PhysicalIo::OutFrontLeft => 0,
            PhysicalIo::OutFrontRight => 1,
            PhysicalIo::OutFrontCenter => 2,
            PhysicalIo::OutLowFrequency => 3,
            PhysicalIo::OutRearLeft => 4,
            PhysicalIo::OutRearRight => 5,
            PhysicalIo::OutOpticalLeft => 10,
            PhysicalIo::OutOpticalRight => 11,
            PhysicalIo::InLineLeft => 20,
            PhysicalIo::InLineRight => 21,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            PhysicalIo::OutFrontLeft => 0,
            PhysicalIo::OutFrontRight => 1,
            PhysicalIo::OutFrontCenter => 2,
            PhysicalIo::OutLowFrequency => 3,
            PhysicalIo::OutRearLeft => 4,
            PhysicalIo::OutRearRight => 5,
            PhysicalIo::OutOpticalLeft => 6,
            PhysicalIo::OutOpticalRight => 7,
            PhysicalIo::InLineLeft => 8,
            PhysicalIo::InLineRight => 9,
        }
    }

    /// Mixer output channel this line feeds, if any.
    pub fn output_channel(self) -> Option<usize> {
        match self {
            PhysicalIo::OutFrontLeft => Some(0),
            PhysicalIo::OutFrontRight => Some(1),
            PhysicalIo::OutFrontCenter => Some(2),
            PhysicalIo::OutLowFrequency => Some(3),
            PhysicalIo::OutRearLeft => Some(4),
            PhysicalIo::OutRearRight => Some(5),
            _ => None,
        }
    }
}

/// Per-voice synthesis parameters of the legacy surface.
///
/// Only attenuation and pitch have a behavioral effect; the envelope and
/// LFO family is accepted and stored so getters round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SynthParam {
    Attenuation = 0,
    Pitch,
    FilterCutoff,
    FilterQ,
    DelayVolEnv,
    AttackVolEnv,
    HoldVolEnv,
    DecayVolEnv,
    SustainVolEnv,
    ReleaseVolEnv,
    DelayModEnv,
    AttackModEnv,
    HoldModEnv,
    DecayModEnv,
    SustainModEnv,
    ReleaseModEnv,
    DelayModLfo,
    FreqModLfo,
    DelayVibLfo,
    FreqVibLfo,
    ModLfoToPitch,
    VibLfoToPitch,
    ModLfoToFilterCutoff,
    ModLfoToAttenuation,
    ModEnvToPitch,
    ModEnvToFilterCutoff,
}

/// Number of [SynthParam] variants, sizing the per-voice store.
pub const SYNTH_PARAM_COUNT: usize = 26;

impl SynthParam {
    pub fn from_raw(raw: u32) -> Option<SynthParam> {
        if raw < SYNTH_PARAM_COUNT as u32 {
            // SAFETY: SynthParam is repr(u32) with contiguous discriminants
            // starting at zero, and raw is range-checked above.
            Some(unsafe { std::mem::transmute::<u32, SynthParam>(raw) })
        } else {
            None
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Voice IO-control opcodes accepted by `PlayWithSetup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceIoctl {
    SetStartLoopOffset,
    SetEndLoopOffset,
    SetEndOffset,
    SetPlayPosition,
    SetLoopState,
    SetNotificationPoint,
    ClearNotificationPoint,
    SetNotificationFrequency,
}

impl VoiceIoctl {
    pub fn from_raw(raw: u32) -> Option<VoiceIoctl> {
        match raw {
            0x100 => Some(VoiceIoctl::SetStartLoopOffset),
            0x101 => Some(VoiceIoctl::SetEndLoopOffset),
            0x102 => Some(VoiceIoctl::SetEndOffset),
            0x103 => Some(VoiceIoctl::SetPlayPosition),
            0x104 => Some(VoiceIoctl::SetLoopState),
            0x105 => Some(VoiceIoctl::SetNotificationPoint),
            0x106 => Some(VoiceIoctl::ClearNotificationPoint),
            0x107 => Some(VoiceIoctl::SetNotificationFrequency),
            _ => None,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            VoiceIoctl::SetStartLoopOffset => 0x100,
            VoiceIoctl::SetEndLoopOffset => 0x101,
            VoiceIoctl::SetEndOffset => 0x102,
            VoiceIoctl::SetPlayPosition => 0x103,
            VoiceIoctl::SetLoopState => 0x104,
            VoiceIoctl::SetNotificationPoint => 0x105,
            VoiceIoctl::ClearNotificationPoint => 0x106,
            VoiceIoctl::SetNotificationFrequency => 0x107,
        }
    }
}

/// One send-routing assignment inside a `PlayWithSetup` batch.
#[derive(Debug, Clone, Copy)]
pub struct SendRouteParam {
    pub channel: u32,
    pub send: u32,
    pub dest: Routing,
}

/// One send-level assignment inside a `PlayWithSetup` batch.
#[derive(Debug, Clone, Copy)]
pub struct SendLevelParam {
    pub channel: u32,
    pub send: u32,
    pub level: u32,
}

/// One voice IO-control request inside a `PlayWithSetup` batch.
#[derive(Debug, Clone, Copy)]
pub struct VoiceParam {
    pub ioctl: VoiceIoctl,
    pub param1: u32,
    pub param2: u32,
}

/// One synth-parameter assignment inside a `PlayWithSetup` batch.
#[derive(Debug, Clone, Copy)]
pub struct SynthParamValue {
    pub param: SynthParam,
    pub value: i32,
}

/// Sample rates the voice engine accepts.
pub(crate) fn validate_sample_rate(rate: u32) -> crate::status::SegaResult {
    if (8000..=192_000).contains(&rate) {
        Ok(())
    } else {
        Err(crate::status::SegaError::BadSampleRate)
    }
}

/// Pitch in hundredths of a semitone to a linear frequency ratio.
pub fn cents_to_ratio(cents: i32) -> f32 {
    (cents as f32 / 1200.0).exp2()
}

/// Pitch in whole semitones to a linear frequency ratio.
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    (semitones / 12.0).exp2()
}

/// Attenuation in tenths of a decibel to a linear gain.
pub fn tenth_db_to_gain(tenth_db: i32) -> f32 {
    10f32.powf(-(tenth_db as f32 / 10.0) / 20.0)
}

/// Unsigned volume word to a linear gain in `[0, 1]`.
///
/// Computed in f64 so full-scale words survive the conversion exactly.
pub fn raw_volume_to_gain(raw: u32) -> f32 {
    (raw as f64 / VOLUME_MAX as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_cents_is_unity() {
        assert!((cents_to_ratio(0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn octave_in_cents_doubles() {
        assert!((cents_to_ratio(1200) - 2.0).abs() < 1e-5);
        assert!((cents_to_ratio(-1200) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn octave_in_semitones_doubles() {
        assert!((semitones_to_ratio(0.0) - 1.0).abs() < 1e-6);
        assert!((semitones_to_ratio(12.0) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn attenuation_follows_decibel_law() {
        assert!((tenth_db_to_gain(0) - 1.0).abs() < 1e-6);
        // 20 dB down is a factor of ten.
        assert!((tenth_db_to_gain(200) - 0.1).abs() < 1e-5);
    }

    #[test]
    fn volume_words_span_the_unit_interval() {
        assert_eq!(raw_volume_to_gain(0), 0.0);
        assert!((raw_volume_to_gain(VOLUME_MAX) - 1.0).abs() < 1e-6);
        assert!((raw_volume_to_gain(VOLUME_MAX / 2) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn block_align_derives_from_format() {
        let fmt = WaveFormat {
            sample_rate: 44100,
            channels: 2,
            format: SampleFormat::Signed16,
        };
        assert_eq!(fmt.block_align(), 4);
        assert_eq!(fmt.avg_bytes_per_sec(), 176400);
    }

    #[test]
    fn routing_raw_round_trips() {
        for raw in [0xFFFF_0001u32, 0, 1, 2, 3, 4, 5, 10, 11, 12, 13] {
            let routing = Routing::from_raw(raw).unwrap();
            assert_eq!(routing.raw(), raw);
        }
        assert_eq!(Routing::from_raw(6), None);
    }

    #[test]
    fn fx_slots_resolve_to_no_output() {
        assert_eq!(Routing::FxSlot0.output_channel(), None);
        assert_eq!(Routing::Unused.output_channel(), None);
        assert_eq!(Routing::RearRight.output_channel(), Some(5));
    }

    #[test]
    fn synth_param_raw_range() {
        assert_eq!(SynthParam::from_raw(0), Some(SynthParam::Attenuation));
        assert_eq!(SynthParam::from_raw(1), Some(SynthParam::Pitch));
        assert_eq!(
            SynthParam::from_raw(25),
            Some(SynthParam::ModEnvToFilterCutoff)
        );
        assert_eq!(SynthParam::from_raw(26), None);
    }
}
