//! Common test utilities
//!
//! Shared fixtures and stub placers for integration tests.

use async_trait::async_trait;
use outdial::placer::CallPlacer;
use outdial::{CallRequest, CallResponse, Error, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Build a valid call request for a given number
pub fn lead_request(number: &str) -> CallRequest {
    CallRequest::builder()
        .customer_name("Jordan Reyes")
        .phone_number(number)
        .assistant_id("asst_listing_followup")
        .phone_number_id("line_sf_office")
        .build()
        .expect("failed to build request")
}

/// Wait for a condition to be true
///
/// Polls every 20ms until the condition holds or the timeout expires.
pub async fn wait_for<F>(mut condition: F, timeout: Duration) -> std::result::Result<(), String>
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    Err(format!("condition not met after {timeout:?}"))
}

/// Placer that accepts every call and counts invocations
pub struct AcceptingPlacer {
    pub placed: Arc<AtomicUsize>,
}

impl AcceptingPlacer {
    pub fn new() -> Self {
        Self {
            placed: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl CallPlacer for AcceptingPlacer {
    async fn place(&self, _request: &CallRequest) -> Result<CallResponse> {
        let n = self.placed.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(CallResponse {
            id: format!("call_{n}"),
            status: "queued".to_string(),
            scheduled_time: None,
        })
    }
}

/// Placer that rejects every call
pub struct RejectingPlacer;

#[async_trait]
impl CallPlacer for RejectingPlacer {
    async fn place(&self, _request: &CallRequest) -> Result<CallResponse> {
        Err(Error::Placement {
            status: Some(502),
            detail: "upstream outage".to_string(),
        })
    }
}

/// Placer that rejects one specific number and accepts the rest
pub struct SelectivePlacer {
    pub reject_number: String,
}

#[async_trait]
impl CallPlacer for SelectivePlacer {
    async fn place(&self, request: &CallRequest) -> Result<CallResponse> {
        if request.phone_number == self.reject_number {
            return Err(Error::Placement {
                status: Some(400),
                detail: format!("number rejected: {}", request.phone_number),
            });
        }
        Ok(CallResponse {
            id: format!("call_for_{}", request.phone_number),
            status: "queued".to_string(),
            scheduled_time: None,
        })
    }
}

/// Placer that records every request it receives
pub struct RecordingPlacer {
    pub requests: Arc<Mutex<Vec<CallRequest>>>,
}

impl RecordingPlacer {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl CallPlacer for RecordingPlacer {
    async fn place(&self, request: &CallRequest) -> Result<CallResponse> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(CallResponse {
            id: "call_recorded".to_string(),
            status: "queued".to_string(),
            scheduled_time: None,
        })
    }
}
