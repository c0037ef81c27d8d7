//! Capture of live network traffic as HAR entries.
//!
//! A [`CaptureSession`] owns all state for one recording: it is opened with
//! [`CaptureSession::begin`], fed DevTools `Network.*` events through
//! [`CaptureSession::record_event`] and closed by
//! [`CaptureSession::finalize`], which yields the entries for the report.

mod error;
mod events;
mod network_capture;
mod session;

pub use error::{Error, Result};
pub use events::{
    CaptureEvent, CdpRequest, CdpResponse, LoadingFailed, LoadingFinished, RequestWillBeSent,
    ResponseBody, ResponseReceived,
};
pub use network_capture::{
    CaptureLimits, DEFAULT_MAX_POST_DATA_BYTES, DEFAULT_MAX_RESPONSE_BODY_BYTES, truncate_base64,
    truncate_utf8,
};
pub use session::{CaptureSession, CaptureStatus};
