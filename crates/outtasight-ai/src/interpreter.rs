//! The order interpretation pipeline.
//!
//! One turn runs through tiers that share a single output contract: the
//! generative model first, the deterministic fallback when the model is
//! missing or misbehaves, clarification as the floor. Every tier produces
//! a usable [`InterpretationResult`], so `interpret` never returns an
//! error.

use std::sync::Arc;

use tracing::{debug, warn};

use outtasight_core::chat::ConversationTurn;
use outtasight_core::menu::Menu;
use outtasight_core::order::{AddressContext, InterpretationResult, PricingConfig};

use crate::fallback::fallback_response;
use crate::model::GenerativeModel;
use crate::prompt::build_prompt;

/// Out-of-band service health reported with every outcome.
///
/// `Degraded` means no model credential is configured at all. A model that
/// is configured but failing still reports `Ok`, because the fallback
/// answered and the caller's payload shape is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceSignal {
    Ok,
    Degraded,
}

/// What one turn produces: a response to show, plus the health signal.
#[derive(Debug, Clone)]
pub struct InterpretOutcome {
    pub response: InterpretationResult,
    pub signal: ServiceSignal,
}

/// Turns customer utterances into structured order proposals.
///
/// Stateless across calls: the catalog is read-only, history belongs to the
/// caller, and nothing is cached between turns. Clone freely and share
/// across tasks.
#[derive(Clone)]
pub struct OrderInterpreter {
    menu: Arc<Menu>,
    model: Option<Arc<dyn GenerativeModel>>,
    pricing: PricingConfig,
}

impl OrderInterpreter {
    /// Interpreter over a catalog, with or without a configured model.
    pub fn new(menu: Arc<Menu>, model: Option<Arc<dyn GenerativeModel>>) -> Self {
        Self {
            menu,
            model,
            pricing: PricingConfig::default(),
        }
    }

    /// Override the pricing policy used by the fallback tier.
    pub fn with_pricing(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    /// The catalog this interpreter grounds on.
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Interpret one customer turn.
    ///
    /// Never fails: a missing credential, transport error, or schema
    /// violation each degrade to the fallback tier in the appropriate
    /// mode. A conversational surface must always get something to show.
    pub async fn interpret(
        &self,
        utterance: &str,
        history: &[ConversationTurn],
        address: &AddressContext,
    ) -> InterpretOutcome {
        let Some(model) = &self.model else {
            debug!("no model credential configured, answering from fallback");
            return InterpretOutcome {
                response: fallback_response(utterance, &self.menu, &self.pricing, false),
                signal: ServiceSignal::Degraded,
            };
        };

        let prompt = build_prompt(&self.menu, history, utterance, address);

        let raw = match model.generate(&prompt).await {
            Ok(raw) => raw,
            Err(error) => {
                warn!(model = model.model_name(), error = %error, "model call failed, using fallback");
                return InterpretOutcome {
                    response: fallback_response(utterance, &self.menu, &self.pricing, false),
                    signal: ServiceSignal::Ok,
                };
            }
        };

        match InterpretationResult::from_model_json(strip_code_fences(&raw)) {
            Ok(response) => InterpretOutcome {
                response,
                signal: ServiceSignal::Ok,
            },
            Err(error) => {
                warn!(
                    model = model.model_name(),
                    error = %error,
                    raw = %raw,
                    "model output failed schema validation, using silent fallback"
                );
                InterpretOutcome {
                    response: fallback_response(utterance, &self.menu, &self.pricing, true),
                    signal: ServiceSignal::Ok,
                }
            }
        }
    }
}

/// Strip the Markdown code fence some models wrap around JSON despite the
/// raw-JSON instruction.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
