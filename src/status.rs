use thiserror::Error;

use crate::backend::BackendError;

const fn failure(code: u32) -> i32 {
    ((1u32 << 31) | 0xA000 | code) as i32
}

/// Legacy status word carried across the public boundary.
///
/// Failure values are bit-flagged: the sign bit plus a `0xA000` facility
/// marker plus a small error code, so callers that only test the sign bit
/// and callers that switch on the full word both keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Status(i32);

impl Status {
    pub const SUCCESS: Status = Status(0);
    pub const UNKNOWN: Status = Status(failure(1));
    pub const OUT_OF_MEMORY: Status = Status(failure(2));
    pub const BAD_POINTER: Status = Status(failure(3));
    pub const BAD_PARAM: Status = Status(failure(9));
    pub const INVALID_SEND: Status = Status(failure(11));
    pub const BAD_HANDLE: Status = Status(failure(18));
    pub const BAD_SAMPLERATE: Status = Status(failure(28));

    pub const fn from_raw(raw: i32) -> Status {
        Status(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }

    pub const fn is_success(self) -> bool {
        self.0 == 0
    }
}

/// Playback snapshot reported by status queries.
///
/// `Invalid` is what an unknown handle yields, matching the legacy
/// convention of reporting it in-band rather than through a status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PlaybackStatus {
    Stop = 0,
    Active = 1,
    Pause = 2,
    Invalid = -1,
}

/// Failures of the voice registry and parameter engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SegaError {
    #[error("backend operation failed")]
    Unknown,
    #[error("buffer memory allocation failed")]
    OutOfMemory,
    #[error("required pointer argument was null")]
    BadPointer,
    #[error("argument outside the valid range")]
    BadParam,
    #[error("send slot index outside the configured maximum")]
    InvalidSend,
    #[error("handle is not registered")]
    BadHandle,
    #[error("sample rate is not supported")]
    BadSampleRate,
}

pub type SegaResult<T = ()> = Result<T, SegaError>;

impl From<SegaError> for Status {
    fn from(err: SegaError) -> Status {
        match err {
            SegaError::Unknown => Status::UNKNOWN,
            SegaError::OutOfMemory => Status::OUT_OF_MEMORY,
            SegaError::BadPointer => Status::BAD_POINTER,
            SegaError::BadParam => Status::BAD_PARAM,
            SegaError::InvalidSend => Status::INVALID_SEND,
            SegaError::BadHandle => Status::BAD_HANDLE,
            SegaError::BadSampleRate => Status::BAD_SAMPLERATE,
        }
    }
}

impl From<BackendError> for SegaError {
    fn from(_: BackendError) -> SegaError {
        SegaError::Unknown
    }
}

impl<T> From<&SegaResult<T>> for Status {
    fn from(result: &SegaResult<T>) -> Status {
        match result {
            Ok(_) => Status::SUCCESS,
            Err(err) => Status::from(*err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_words_carry_facility_bits() {
        assert!(Status::SUCCESS.is_success());
        for status in [
            Status::UNKNOWN,
            Status::OUT_OF_MEMORY,
            Status::BAD_POINTER,
            Status::BAD_PARAM,
            Status::INVALID_SEND,
            Status::BAD_HANDLE,
            Status::BAD_SAMPLERATE,
        ] {
            assert!(status.raw() < 0);
            assert_eq!(status.raw() as u32 & 0xA000, 0xA000);
        }
    }

    #[test]
    fn bad_handle_keeps_its_legacy_code() {
        assert_eq!(Status::BAD_HANDLE.raw() as u32 & 0xFF, 18);
    }
}
