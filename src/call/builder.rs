//! Call request builder
//!
//! Provides a fluent API for building call requests.

use crate::{Error, Result};

use super::CallRequest;
use serde::Serialize;

/// Call request builder
///
/// # Examples
///
/// ```rust
/// use outdial::CallRequest;
///
/// # fn example() -> outdial::Result<()> {
/// let request = CallRequest::builder()
///     .customer_name("Jordan Reyes")
///     .phone_number("(415) 555-0000")
///     .assistant_id("asst_listing_followup")
///     .phone_number_id("line_sf_office")
///     .build()?;
///
/// assert_eq!(request.phone_number, "+14155550000");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct CallRequestBuilder {
    customer_name: String,
    phone_number: String,
    assistant_id: String,
    phone_number_id: String,
    metadata: Option<serde_json::Value>,
}

impl CallRequestBuilder {
    /// Create a new call request builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recipient display name
    #[must_use]
    pub fn customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = name.into();
        self
    }

    /// Set the recipient phone number (normalized to E.164 by `build`)
    #[must_use]
    pub fn phone_number(mut self, number: impl Into<String>) -> Self {
        self.phone_number = number.into();
        self
    }

    /// Set the assistant (voice profile) identifier
    #[must_use]
    pub fn assistant_id(mut self, id: impl Into<String>) -> Self {
        self.assistant_id = id.into();
        self
    }

    /// Set the outbound line identifier
    #[must_use]
    pub fn phone_number_id(mut self, id: impl Into<String>) -> Self {
        self.phone_number_id = id.into();
        self
    }

    /// Set free-form metadata (serialized to JSON)
    pub fn metadata<T: Serialize>(mut self, metadata: &T) -> Result<Self> {
        self.metadata = Some(
            serde_json::to_value(metadata)
                .map_err(|e| Error::Validation(format!("invalid metadata: {e}")))?,
        );
        Ok(self)
    }

    /// Build the request, validating fields and normalizing the phone number
    pub fn build(self) -> Result<CallRequest> {
        CallRequest {
            customer_name: self.customer_name,
            phone_number: self.phone_number,
            assistant_id: self.assistant_id,
            phone_number_id: self.phone_number_id,
            metadata: self.metadata,
        }
        .normalize()
    }
}
