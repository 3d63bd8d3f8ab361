//! Interactive ordering loop: chat turns, a running proposed order, and
//! confirm-and-stage at the end.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use outtasight_ai::{OrderInterpreter, ServiceSignal};
use outtasight_core::chat::ConversationTurn;
use outtasight_core::order::{AddressContext, PricingConfig, StructuredOrder};
use outtasight_core::staging;

use crate::display;

const GREETING: &str = "Outta Sight Pizza. Tell me what you're craving. \
Commands: 'menu' prints the menu, 'confirm' stages the current order, 'quit' leaves.";

/// Run the chat loop until the customer quits or stdin closes.
pub async fn run(
    interpreter: &OrderInterpreter,
    pricing: &PricingConfig,
    address: AddressContext,
) -> Result<()> {
    println!("{GREETING}");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut history: Vec<ConversationTurn> = Vec::new();
    let mut proposed: Option<StructuredOrder> = None;
    let mut degraded_notice_shown = false;

    loop {
        print!("you> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let utterance = line.trim();
        if utterance.is_empty() {
            continue;
        }

        match utterance {
            "quit" | "exit" => break,
            "menu" => {
                println!("{}", interpreter.menu().render_for_prompt());
                continue;
            }
            "confirm" => {
                match proposed.take() {
                    Some(order) => {
                        let staged =
                            staging::stage(order, address.name.clone(), address.clone(), None)?;
                        display::print_staged(&staged);
                    }
                    None => println!("Nothing to confirm yet. Order something first."),
                }
                continue;
            }
            _ => {}
        }

        let outcome = interpreter.interpret(utterance, &history, &address).await;

        if outcome.signal == ServiceSignal::Degraded && !degraded_notice_shown {
            println!("(no Gemini credential configured; matching against the menu directly)");
            degraded_notice_shown = true;
        }

        let response = outcome.response;
        if !response.assistant_message.is_empty() {
            println!("assistant> {}", response.assistant_message);
        }
        if let Some(clarifications) = &response.clarifications {
            for question in clarifications {
                println!("assistant> {question}");
            }
        }
        if let Some(order) = &response.order {
            display::print_summary(&order.summarize(interpreter.menu(), pricing));
            proposed = Some(order.clone());
        }

        history.push(ConversationTurn::customer(utterance));
        let assistant_text = if response.assistant_message.is_empty() {
            response
                .clarifications
                .and_then(|c| c.into_iter().next())
                .unwrap_or_default()
        } else {
            response.assistant_message
        };
        if !assistant_text.is_empty() {
            history.push(ConversationTurn::assistant(assistant_text));
        }
    }

    Ok(())
}
