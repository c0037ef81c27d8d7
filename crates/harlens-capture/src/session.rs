use crate::events::{CaptureEvent, RequestWillBeSent};
use crate::network_capture::{CaptureLimits, CapturedBody, NetworkRequest};
use chrono::{DateTime, Utc};
use harlens_core::har::Entry;
use std::collections::HashMap;

/// Counts reported while a capture is running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStatus {
    pub in_flight: usize,
    pub completed: usize,
}

/// One recording of network traffic.
///
/// Requests are keyed by their DevTools request id while open. A redirect
/// reuses the id, so the previous hop is closed off with the redirect
/// response before the new hop starts.
#[derive(Debug)]
pub struct CaptureSession {
    limits: CaptureLimits,
    requests: HashMap<String, NetworkRequest>,
    closed: Vec<NetworkRequest>,
    next_seq: u64,
    /// (monotonic timestamp, wall clock) pair used to place events lacking wallTime
    clock_anchor: Option<(f64, DateTime<Utc>)>,
}

impl CaptureSession {
    pub fn begin(limits: CaptureLimits) -> Self {
        tracing::debug!(
            "Capture session started (response cap {} bytes, post data cap {} bytes)",
            limits.max_response_body_bytes,
            limits.max_post_data_bytes
        );

        Self {
            limits,
            requests: HashMap::new(),
            closed: Vec::new(),
            next_seq: 0,
            clock_anchor: None,
        }
    }

    pub fn record_event(&mut self, event: CaptureEvent) {
        tracing::trace!("Event for request {}", event.request_id());

        match event {
            CaptureEvent::RequestWillBeSent(sent) => self.on_request(sent),
            CaptureEvent::ResponseReceived(received) => {
                if let Some(req) = self.lookup(&received.request_id) {
                    req.response = Some(received.response);
                    req.response_timestamp = Some(received.timestamp);
                }
            }
            CaptureEvent::LoadingFinished(finished) => {
                if let Some(req) = self.lookup(&finished.request_id) {
                    req.finished_timestamp = Some(finished.timestamp);
                    req.encoded_data_length = finished.encoded_data_length;
                }
            }
            CaptureEvent::LoadingFailed(failed) => {
                if let Some(req) = self.lookup(&failed.request_id) {
                    req.finished_timestamp = Some(failed.timestamp);
                    req.failure = Some(if failed.canceled && failed.error_text.is_empty() {
                        "canceled".to_string()
                    } else {
                        failed.error_text
                    });
                }
            }
            CaptureEvent::ResponseBody(body) => {
                let max = self.limits.max_response_body_bytes;
                if let Some(req) = self.lookup(&body.request_id) {
                    req.body = Some(CapturedBody::new(body.body, body.base64_encoded, max));
                }
            }
        }
    }

    pub fn status(&self) -> CaptureStatus {
        let finished = self.requests.values().filter(|r| r.is_finished()).count();
        CaptureStatus {
            in_flight: self.requests.len() - finished,
            completed: finished + self.closed.len(),
        }
    }

    /// Close the session and return HAR entries in request order
    pub fn finalize(self) -> Vec<Entry> {
        let mut all: Vec<NetworkRequest> = self
            .closed
            .into_iter()
            .chain(self.requests.into_values())
            .collect();
        all.sort_by_key(|r| r.seq);

        let observed = all.len();
        let entries: Vec<Entry> = all.into_iter().filter_map(NetworkRequest::into_entry).collect();

        tracing::info!(
            "Capture finalized: {} entries from {} requests",
            entries.len(),
            observed
        );

        entries
    }

    fn on_request(&mut self, sent: RequestWillBeSent) {
        tracing::debug!("Request: {} {}", sent.request.method, sent.request.url);

        let started_at = self.wall_clock(sent.timestamp, sent.wall_time);

        if let Some(mut previous) = self.requests.remove(&sent.request_id) {
            if let Some(redirect) = sent.redirect_response {
                previous.response = Some(redirect);
                previous.response_timestamp = Some(sent.timestamp);
                previous.finished_timestamp = Some(sent.timestamp);
                self.closed.push(previous);
            } else {
                tracing::debug!("Request id {} reused without redirect, replacing", sent.request_id);
            }
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        let request = NetworkRequest::new(seq, started_at, sent.timestamp, sent.request, &self.limits);
        self.requests.insert(sent.request_id, request);
    }

    fn wall_clock(&mut self, timestamp: f64, wall_time: Option<f64>) -> DateTime<Utc> {
        let from_secs = |secs: f64| DateTime::from_timestamp_millis((secs * 1000.0).round() as i64);

        if let Some(wall) = wall_time.and_then(from_secs) {
            self.clock_anchor.get_or_insert((timestamp, wall));
            return wall;
        }

        match self.clock_anchor {
            Some((anchor_ts, anchor_wall)) => {
                let offset_ms = ((timestamp - anchor_ts) * 1000.0).round() as i64;
                anchor_wall + chrono::Duration::milliseconds(offset_ms)
            }
            None => Utc::now(),
        }
    }

    fn lookup(&mut self, request_id: &str) -> Option<&mut NetworkRequest> {
        let found = self.requests.get_mut(request_id);
        if found.is_none() {
            tracing::debug!("Ignoring event for unknown request {}", request_id);
        }
        found
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::begin(CaptureLimits::default())
    }
}
