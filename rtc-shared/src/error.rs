#![allow(dead_code)]

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    //Carrier errors
    #[error("interceptor: rtp packet not found in carrier")]
    ErrRtpPacketNotFound,
    #[error("interceptor: rtcp packets not found in carrier")]
    ErrRtcpPacketsNotFound,
    #[error("interceptor: rtp write callback not found in carrier")]
    ErrRtpWriterNotFound,
    #[error("interceptor: rtcp write callback not found in carrier")]
    ErrRtcpWriterNotFound,

    //Chain errors
    #[error("interceptor chain: already closed")]
    ErrInterceptorChainClosed,

    //Interceptor errors
    #[error("Packet too short to be read")]
    ErrPacketTooShort,
    #[error("Invalid header")]
    ErrInvalidHeader,
    #[error("Wrong payload type")]
    ErrWrongPayloadType,
    #[error("ssrc {0} not found")]
    ErrSsrcNotFound(u32),
    #[error("mutex poison: {0}")]
    PoisonError(String),

    //Third Party Error
    #[error("{0}")]
    Io(#[source] IoError),
    #[error("{0}")]
    Std(#[source] StdError),

    //Other Errors
    #[error("Other RTP Err: {0}")]
    OtherRtpErr(String),
    #[error("Other RTCP Err: {0}")]
    OtherRtcpErr(String),
    #[error("Other Interceptor Err: {0}")]
    OtherInterceptorErr(String),
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn from_std<T>(error: T) -> Self
    where
        T: std::error::Error + Send + Sync + 'static,
    {
        Error::Std(StdError(Box::new(error)))
    }

    pub fn downcast_ref<T: std::error::Error + 'static>(&self) -> Option<&T> {
        if let Error::Std(s) = self {
            return s.0.downcast_ref();
        }

        None
    }

    /// Returns true if the error reports a carrier that did not hold the payload
    /// or callback expected by the operation it was passed to.
    pub fn is_carrier_error(&self) -> bool {
        matches!(
            self,
            Error::ErrRtpPacketNotFound
                | Error::ErrRtcpPacketsNotFound
                | Error::ErrRtpWriterNotFound
                | Error::ErrRtcpWriterNotFound
        )
    }
}

#[derive(Debug, Error)]
#[error("io error: {0}")]
pub struct IoError(#[from] pub io::Error);

// Workaround for wanting PartialEq for io::Error.
impl PartialEq for IoError {
    fn eq(&self, other: &Self) -> bool {
        self.0.kind() == other.0.kind()
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(IoError(e))
    }
}

/// An escape hatch to preserve the source of errors foreign to this crate.
///
/// Interceptors built on other libraries return their own error types. By using
/// `Error::from_std` such an error travels through the chain unchanged and can be
/// recovered with [`Error::downcast_ref`].
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StdError(pub Box<dyn std::error::Error + Send + Sync>);

impl PartialEq for StdError {
    fn eq(&self, _: &Self) -> bool {
        false
    }
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        Error::PoisonError(e.to_string())
    }
}

/// flatten_errs flattens multiple errors into one
///
/// A single error is returned as is, so a close cascade with only one failing
/// stage reports that stage's error verbatim.
pub fn flatten_errs(errs: Vec<impl Into<Error>>) -> Result<()> {
    let mut errs: Vec<Error> = errs.into_iter().map(Into::into).collect();
    match errs.len() {
        0 => Ok(()),
        1 => Err(errs.remove(0)),
        _ => {
            let errs_strs: Vec<String> = errs.into_iter().map(|e| e.to_string()).collect();
            Err(Error::Other(errs_strs.join("\n")))
        }
    }
}
