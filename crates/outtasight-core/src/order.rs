//! Structured orders: the JSON contract the model is instructed to emit,
//! schema validation over untrusted model output, and order-summary math.
//!
//! Field names serialize in camelCase (`assistantMessage`,
//! `requiresClarification`, ...) because the same shapes cross the chat
//! surface's JSON boundary. Money is `f64` with JSON number semantics;
//! rounding happens only at the cents boundary via [`round_to_cents`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::menu::Menu;

/// Violations found when checking decoded model output against the order
/// schema. Any of these counts as a model failure, never a partial parse.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("order has no items")]
    EmptyOrder,
    #[error("order item {id} has quantity 0")]
    ZeroQuantity { id: String },
}

/// Delivery details supplied by the profile collaborator.
///
/// Read-only here: grounds the prompt and rides along in the staging
/// payload. Never validated or persisted by this crate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// One line of a proposed order. `id` references the catalog; `name` is the
/// customer-facing label, which may diverge if the model free-texted it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredOrderItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The normalized cart, independent of how it was derived. Totals are each
/// independently optional; missing ones are computed defensively at render
/// time (see [`StructuredOrder::summarize`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredOrder {
    pub items: Vec<StructuredOrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_prompt: Option<String>,
}

/// What the interpreter hands back for every turn: a conversational message
/// plus, when the utterance mapped to the menu, a proposed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretationResult {
    pub assistant_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_clarification: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarifications: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<StructuredOrder>,
}

impl StructuredOrder {
    /// Check the proposal invariants: at least one item, every quantity ≥ 1.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.items.is_empty() {
            return Err(SchemaError::EmptyOrder);
        }
        for item in &self.items {
            if item.quantity == 0 {
                return Err(SchemaError::ZeroQuantity {
                    id: item.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Resolve the order against the catalog into concrete display numbers.
    ///
    /// Each stated total is trusted when present; missing ones are computed:
    /// subtotal from line prices (item price, else catalog price, else 0),
    /// taxes from the configured rate rounded to cents, fees from the
    /// configured flat fee (default none), total as their sum.
    pub fn summarize(&self, menu: &Menu, pricing: &PricingConfig) -> OrderSummary {
        let lines: Vec<SummaryLine> = self
            .items
            .iter()
            .map(|item| {
                let catalog = menu.find_by_id(&item.id);
                let unit_price = item
                    .price
                    .or_else(|| catalog.map(|m| m.price))
                    .unwrap_or(0.0);
                SummaryLine {
                    quantity: item.quantity,
                    name: catalog
                        .map(|m| m.name.clone())
                        .unwrap_or_else(|| item.name.clone()),
                    description: catalog
                        .map(|m| m.description.clone())
                        .unwrap_or_else(|| "Custom item".to_string()),
                    unit_price,
                    line_total: unit_price * item.quantity as f64,
                }
            })
            .collect();

        let subtotal = self
            .subtotal
            .unwrap_or_else(|| lines.iter().map(|l| l.line_total).sum());
        let fees = self.fees.or(pricing.fees).unwrap_or(0.0);
        let taxes = self
            .taxes
            .unwrap_or_else(|| round_to_cents(subtotal * pricing.tax_rate));
        let total = self.total.unwrap_or(subtotal + taxes + fees);

        OrderSummary {
            lines,
            subtotal,
            taxes,
            fees,
            total,
            special_instructions: self.special_instructions.clone(),
            confirmation_prompt: self.confirmation_prompt.clone(),
        }
    }
}

impl InterpretationResult {
    /// Parse-then-validate text claimed to be an order-response JSON object.
    ///
    /// One step on purpose: any parse error or schema mismatch is the same
    /// uniform failure, so callers never see a half-trusted result.
    pub fn from_model_json(raw: &str) -> Result<Self, SchemaError> {
        let result: Self = serde_json::from_str(raw)?;
        if let Some(order) = &result.order {
            order.validate()?;
        }
        Ok(result)
    }
}

/// Local pricing policy for the fallback interpreter and summary math.
#[derive(Debug, Clone, Copy)]
pub struct PricingConfig {
    /// Sales-tax rate applied to the subtotal.
    pub tax_rate: f64,
    /// Flat delivery fee; `None` leaves fees out entirely.
    pub fees: Option<f64>,
}

impl Default for PricingConfig {
    /// NYC sales tax, no delivery fee.
    fn default() -> Self {
        Self {
            tax_rate: 0.08875,
            fees: None,
        }
    }
}

/// One resolved display line of an [`OrderSummary`].
#[derive(Debug, Clone)]
pub struct SummaryLine {
    pub quantity: u32,
    pub name: String,
    pub description: String,
    pub unit_price: f64,
    pub line_total: f64,
}

/// A fully-resolved order ready for display: every total is concrete.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub lines: Vec<SummaryLine>,
    pub subtotal: f64,
    pub taxes: f64,
    pub fees: f64,
    pub total: f64,
    pub special_instructions: Option<String>,
    pub confirmation_prompt: Option<String>,
}

/// Round to 2 decimal places against the value's exact decimal expansion;
/// a half-cent rounds up.
///
/// Not `(v * 100.0).round() / 100.0`: scaling can land exactly on a
/// half-cent that the unscaled value sits below. 28 * 0.08875 scales to
/// exactly 248.5 while the product reads 2.4849..., and that tax line is
/// 2.48, not 2.49.
pub fn round_to_cents(value: f64) -> f64 {
    let magnitude = value.abs();
    if !magnitude.is_finite() {
        return value;
    }
    // 20 fractional digits keep the rendering's own rounding far away
    // from the decision digit for any money-scale value.
    let rendered = format!("{magnitude:.20}");
    let mut cents = 0.0_f64;
    let mut in_fraction = false;
    let mut fraction_seen = 0_u8;
    for byte in rendered.bytes() {
        if byte == b'.' {
            in_fraction = true;
            continue;
        }
        let digit = f64::from(byte - b'0');
        if in_fraction {
            fraction_seen += 1;
            if fraction_seen > 2 {
                if digit >= 5.0 {
                    cents += 1.0;
                }
                break;
            }
        }
        cents = cents * 10.0 + digit;
    }
    let rounded = cents / 100.0;
    if value.is_sign_negative() { -rounded } else { rounded }
}
