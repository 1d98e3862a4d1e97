//! Call placement boundary
//!
//! Provides the [`CallPlacer`] trait — the single seam between the scheduler
//! and whatever actually initiates calls — and the HTTP implementation that
//! speaks the third-party voice API.

use crate::call::{CallRequest, CallResponse};
use crate::Result;
use async_trait::async_trait;

pub mod http;

pub use http::HttpCallPlacer;

/// CallPlacer trait - initiates one outbound call
///
/// Implementations may fail for network, auth, or upstream validation
/// reasons; the scheduler treats every failure uniformly. Implementations
/// must tolerate repeated and concurrent invocation.
#[async_trait]
pub trait CallPlacer: Send + Sync {
    /// Place a call, returning the voice API's call id and status
    async fn place(&self, request: &CallRequest) -> Result<CallResponse>;
}
