//! Deterministic keyword-matching interpreter.
//!
//! The tier that can never fail: scans the utterance for catalog item names
//! and ids, prices matches at quantity 1 from the catalog, and asks for
//! clarification when nothing matches. No inference of quantity or size is
//! attempted here; that is the model's job when it is available.

use outtasight_core::menu::Menu;
use outtasight_core::order::{
    InterpretationResult, PricingConfig, StructuredOrder, StructuredOrderItem, round_to_cents,
};

/// Shown when nothing in the utterance maps to the catalog.
pub const NO_MATCH_MESSAGE: &str =
    "I couldn't map that to the menu yet. Could you name the pie or slice you're after?";

/// The one clarifying question the fallback ever asks.
pub const CLARIFYING_QUESTION: &str = "Which pizza from the menu should I grab for you?";

/// Interpret an utterance by substring matching alone.
///
/// `silent` suppresses the no-match message so model garbage is never
/// echoed back at the customer; a successful match still gets its
/// confirmation message so the turn stays conversational.
pub fn fallback_response(
    utterance: &str,
    menu: &Menu,
    pricing: &PricingConfig,
    silent: bool,
) -> InterpretationResult {
    let normalized = utterance.to_lowercase();
    let matched: Vec<_> = menu
        .items()
        .filter(|item| {
            normalized.contains(&item.name.to_lowercase()) || normalized.contains(item.id.as_str())
        })
        .collect();

    if matched.is_empty() {
        return InterpretationResult {
            assistant_message: if silent {
                String::new()
            } else {
                NO_MATCH_MESSAGE.to_string()
            },
            requires_clarification: Some(true),
            clarifications: Some(vec![CLARIFYING_QUESTION.to_string()]),
            order: None,
        };
    }

    let items: Vec<StructuredOrderItem> = matched
        .iter()
        .map(|item| StructuredOrderItem {
            id: item.id.clone(),
            name: item.name.clone(),
            quantity: 1,
            price: Some(item.price),
            notes: None,
        })
        .collect();

    let subtotal: f64 = items
        .iter()
        .map(|item| item.price.unwrap_or(0.0) * item.quantity as f64)
        .sum();
    let taxes = round_to_cents(subtotal * pricing.tax_rate);
    let total = round_to_cents(subtotal + taxes + pricing.fees.unwrap_or(0.0));

    let matched_summary = items
        .iter()
        .map(|item| format!("{} {}", item.quantity, item.name))
        .collect::<Vec<_>>()
        .join(", ");

    InterpretationResult {
        assistant_message: format!(
            "I matched that to {matched_summary}. Let me know if that's right!"
        ),
        requires_clarification: None,
        clarifications: None,
        order: Some(StructuredOrder {
            items,
            subtotal: Some(subtotal),
            taxes: Some(taxes),
            fees: pricing.fees,
            total: Some(total),
            special_instructions: None,
            confirmation_prompt: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn respond(utterance: &str) -> InterpretationResult {
        fallback_response(utterance, &Menu::house(), &PricingConfig::default(), false)
    }

    fn respond_silent(utterance: &str) -> InterpretationResult {
        fallback_response(utterance, &Menu::house(), &PricingConfig::default(), true)
    }

    #[test]
    fn tavern_pie_matches_at_catalog_price() {
        let result = respond("tavern pie");
        let order = result.order.unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].id, "tavern");
        assert_eq!(order.items[0].name, "Tavern Pie");
        assert_eq!(order.items[0].quantity, 1);
        assert_eq!(order.items[0].price, Some(28.0));
        assert_eq!(order.subtotal, Some(28.0));
        assert_eq!(order.taxes, Some(2.48));
        assert_eq!(order.total, Some(30.48));
        assert!(order.fees.is_none());
        assert_eq!(
            result.assistant_message,
            "I matched that to 1 Tavern Pie. Let me know if that's right!"
        );
    }

    #[test]
    fn unmatched_utterance_asks_for_clarification() {
        let result = respond("surprise me");
        assert_eq!(result.assistant_message, NO_MATCH_MESSAGE);
        assert_eq!(result.requires_clarification, Some(true));
        assert_eq!(
            result.clarifications,
            Some(vec![CLARIFYING_QUESTION.to_string()])
        );
        assert!(result.order.is_none());
    }

    #[test]
    fn silent_no_match_suppresses_the_message() {
        let result = respond_silent("surprise me");
        assert_eq!(result.assistant_message, "");
        assert_eq!(result.requires_clarification, Some(true));
    }

    #[test]
    fn silent_match_still_confirms() {
        let result = respond_silent("tavern pie");
        assert!(!result.assistant_message.is_empty());
        assert!(result.order.is_some());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let result = respond("BROOKLYN BRIDGE please");
        assert_eq!(result.order.unwrap().items[0].id, "brooklyn");
    }

    #[test]
    fn item_id_alone_matches() {
        let result = respond("the veg one sounds good");
        let order = result.order.unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].name, "Green Room");
    }

    #[test]
    fn multiple_matches_each_get_quantity_one() {
        let result = respond("a tavern pie and a caesar salad");
        let order = result.order.unwrap();
        let ids: Vec<&str> = order.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["tavern", "caesar"]);
        assert!(order.items.iter().all(|i| i.quantity == 1));
        assert_eq!(order.subtotal, Some(42.0));
        assert_eq!(order.taxes, Some(3.73));
        assert_eq!(order.total, Some(45.73));
        assert_eq!(
            result.assistant_message,
            "I matched that to 1 Tavern Pie, 1 Caesar Salad. Let me know if that's right!"
        );
    }

    #[test]
    fn every_catalog_item_matches_its_own_name() {
        let menu = Menu::house();
        for item in menu.items() {
            let result = fallback_response(
                &item.name.to_lowercase(),
                &menu,
                &PricingConfig::default(),
                false,
            );
            let order = result.order.expect("name should produce an order");
            assert!(
                order
                    .items
                    .iter()
                    .any(|i| i.id == item.id && i.quantity == 1 && i.price == Some(item.price)),
                "{} missing from its own match",
                item.id
            );
        }
    }

    #[test]
    fn configured_tax_rate_applies() {
        let pricing = PricingConfig {
            tax_rate: 0.1,
            fees: None,
        };
        let result = fallback_response("tomato pie", &Menu::house(), &pricing, false);
        let order = result.order.unwrap();
        assert_eq!(order.subtotal, Some(26.0));
        assert_eq!(order.taxes, Some(2.6));
        assert_eq!(order.total, Some(28.6));
    }

    #[test]
    fn configured_fee_lands_in_total() {
        let pricing = PricingConfig {
            tax_rate: 0.08875,
            fees: Some(3.0),
        };
        let result = fallback_response("caesar", &Menu::house(), &pricing, false);
        let order = result.order.unwrap();
        assert_eq!(order.fees, Some(3.0));
        assert_eq!(order.taxes, Some(1.24));
        assert_eq!(order.total, Some(18.24));
    }
}
