//! Confirm-and-stage: where a confirmed order ends its life in this system.
//!
//! No kitchen integration exists yet, so staging means logging the payload
//! a future fulfillment endpoint would consume and acknowledging to the
//! customer.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::order::{AddressContext, StructuredOrder};

/// Acknowledgement shown to the customer after staging.
pub const STAGED_MESSAGE: &str =
    "Order staged. Wire this payload to Outta Sight's ordering endpoint when available.";

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("cannot stage an order with no items")]
    EmptyOrder,
    #[error("failed to serialize staging payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Saved-card metadata from the payments collaborator. Only enough to label
/// the payment method; vault identifiers stay with the provider.
#[derive(Debug, Clone)]
pub struct CardOnFile {
    pub brand: Option<String>,
    pub last4: Option<String>,
}

impl CardOnFile {
    /// Masked display label, `visa •••• 4242` style.
    pub fn label(&self) -> String {
        format!(
            "{} •••• {}",
            self.brand.as_deref().unwrap_or("card"),
            self.last4.as_deref().unwrap_or("0000")
        )
    }
}

/// Everything the ordering endpoint will eventually need, in one payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingPayload {
    pub user: Option<String>,
    pub order: StructuredOrder,
    pub address: AddressContext,
    /// Masked payment label; `None` when no card is on file.
    pub payment: Option<String>,
}

/// Result of a successful staging call.
#[derive(Debug, Clone)]
pub struct StagedOrder {
    pub payload: StagingPayload,
    pub message: String,
}

/// Validate and stage a confirmed order.
///
/// Rejects an empty cart, logs the full payload for the day a real
/// ordering endpoint shows up, and returns the acknowledgement.
pub fn stage(
    order: StructuredOrder,
    customer: Option<String>,
    address: AddressContext,
    card: Option<CardOnFile>,
) -> Result<StagedOrder, StagingError> {
    if order.items.is_empty() {
        return Err(StagingError::EmptyOrder);
    }

    let payload = StagingPayload {
        user: customer,
        order,
        address,
        payment: card.map(|c| c.label()),
    };

    let json = serde_json::to_string_pretty(&payload)?;
    info!(payload = %json, "Outta Sight Pizza order");

    Ok(StagedOrder {
        payload,
        message: STAGED_MESSAGE.to_string(),
    })
}
