//! Grounded prompt assembly.
//!
//! One prompt carries everything the model may rely on: the system
//! instruction with the output schema and business rules, the full menu
//! rendering, the delivery address (or an explicit placeholder), the prior
//! conversation, and the latest utterance. The model is never allowed to
//! answer from anything outside this text.

use outtasight_core::chat::ConversationTurn;
use outtasight_core::menu::Menu;
use outtasight_core::order::AddressContext;

// ── Prompt templates ──

pub const SYSTEM_INSTRUCTION: &str = "\
You are an ordering specialist for Outta Sight Pizza (thatsouttasight.com). \
Translate the customer's natural language into the official menu items listed below. \
Respond ONLY with JSON following this TypeScript interface:

interface OrderResponse {
  assistantMessage: string; // conversational response
  requiresClarification?: boolean;
  clarifications?: string[]; // specific questions to ask
  order?: {
    items: Array<{ id: string; name: string; quantity: number; price?: number; notes?: string }>;
    subtotal?: number;
    taxes?: number;
    fees?: number;
    total?: number;
    specialInstructions?: string;
    confirmationPrompt?: string;
  };
}

Rules:
- Always choose the closest menu item.
- If quantity is missing, assume 1.
- Ask clarifying questions if the request is ambiguous or references unavailable items.
- Include a friendly assistantMessage summarizing the interpreted order.
- Total should include subtotal + taxes + fees when possible. If uncertain, omit it.
- Never invent menu items not listed.
- Mention when an item is unavailable.";

// ── Assembly ──

/// Render the delivery line. Keyed on `line1`: without a street line there
/// is nothing useful to ground, so the model is told so explicitly.
fn render_address(address: &AddressContext) -> String {
    match &address.line1 {
        Some(line1) => format!(
            "Current delivery details: {}, {}, {} {}.",
            line1,
            address.city.as_deref().unwrap_or(""),
            address.state.as_deref().unwrap_or(""),
            address.postal_code.as_deref().unwrap_or(""),
        ),
        None => "Delivery address not provided yet.".to_string(),
    }
}

/// Render history as alternating `Customer:` / `Assistant:` lines.
fn render_transcript(history: &[ConversationTurn]) -> String {
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assemble the single grounding prompt for one turn.
pub fn build_prompt(
    menu: &Menu,
    history: &[ConversationTurn],
    utterance: &str,
    address: &AddressContext,
) -> String {
    format!(
        "{system}\n\nMenu:\n{menu_text}\n\n{address_text}\n\nPrevious conversation (if any):\n{transcript}\n\nCustomer: {utterance}",
        system = SYSTEM_INSTRUCTION,
        menu_text = menu.render_for_prompt(),
        address_text = render_address(address),
        transcript = render_transcript(history),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_address() -> AddressContext {
        AddressContext {
            name: Some("Sal".to_string()),
            line1: Some("63 Spring St".to_string()),
            city: Some("New York".to_string()),
            state: Some("NY".to_string()),
            postal_code: Some("10012".to_string()),
        }
    }

    #[test]
    fn address_renders_delivery_details() {
        assert_eq!(
            render_address(&full_address()),
            "Current delivery details: 63 Spring St, New York, NY 10012."
        );
    }

    #[test]
    fn address_placeholder_without_street_line() {
        assert_eq!(
            render_address(&AddressContext::default()),
            "Delivery address not provided yet."
        );
    }

    #[test]
    fn transcript_labels_speakers() {
        let history = vec![
            ConversationTurn::customer("what's good here?"),
            ConversationTurn::assistant("The Tavern Pie is the house favorite."),
        ];
        assert_eq!(
            render_transcript(&history),
            "Customer: what's good here?\nAssistant: The Tavern Pie is the house favorite."
        );
    }

    #[test]
    fn prompt_layers_in_contract_order() {
        let menu = Menu::house();
        let history = vec![ConversationTurn::customer("hi")];
        let prompt = build_prompt(&menu, &history, "two grandma slices", &full_address());

        assert!(prompt.starts_with(SYSTEM_INSTRUCTION));
        assert!(prompt.contains("\n\nMenu:\nOutta Sight Pies:\n"));
        assert!(prompt.contains("\n\nCurrent delivery details: 63 Spring St"));
        assert!(prompt.contains("\n\nPrevious conversation (if any):\nCustomer: hi\n"));
        assert!(prompt.ends_with("\n\nCustomer: two grandma slices"));
    }

    #[test]
    fn empty_history_leaves_transcript_blank() {
        let menu = Menu::house();
        let prompt = build_prompt(&menu, &[], "a caesar salad", &AddressContext::default());
        // An empty transcript still occupies its line, so three newlines
        // separate the header from the utterance.
        assert!(prompt.ends_with("Previous conversation (if any):\n\n\nCustomer: a caesar salad"));
    }

    #[test]
    fn system_instruction_states_the_schema_and_rules() {
        assert!(SYSTEM_INSTRUCTION.contains("Respond ONLY with JSON"));
        assert!(SYSTEM_INSTRUCTION.contains("assistantMessage: string"));
        assert!(SYSTEM_INSTRUCTION.contains("If quantity is missing, assume 1."));
        assert!(SYSTEM_INSTRUCTION.contains("Never invent menu items not listed."));
    }
}
