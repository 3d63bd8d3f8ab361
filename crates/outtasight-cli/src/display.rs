//! Terminal rendering for proposed orders and staging receipts.

use outtasight_core::order::OrderSummary;
use outtasight_core::staging::StagedOrder;

/// Print a resolved order as a receipt card.
pub fn print_summary(summary: &OrderSummary) {
    println!("=== Proposed order ===");
    for line in &summary.lines {
        println!("  {} × {}  ${:.2}", line.quantity, line.name, line.line_total);
        println!("      {}", line.description);
    }
    println!();
    println!("  {:<12} ${:.2}", "Subtotal", summary.subtotal);
    println!("  {:<12} ${:.2}", "Taxes", summary.taxes);
    if summary.fees > 0.0 {
        println!("  {:<12} ${:.2}", "Fees", summary.fees);
    }
    println!("  {:<12} ${:.2}", "Total", summary.total);
    if let Some(instructions) = &summary.special_instructions {
        println!("  {:<12} {}", "Notes", instructions);
    }
    if let Some(prompt) = &summary.confirmation_prompt {
        println!();
        println!("{prompt}");
    }
}

/// Print the staging acknowledgement card.
pub fn print_staged(staged: &StagedOrder) {
    println!("=== Order staged ===");
    if let Some(user) = &staged.payload.user {
        println!("  {:<12} {}", "Customer", user);
    }
    if let Some(line1) = &staged.payload.address.line1 {
        println!("  {:<12} {}", "Deliver to", line1);
    }
    println!(
        "  {:<12} {}",
        "Payment",
        staged.payload.payment.as_deref().unwrap_or("none on file")
    );
    println!();
    println!("{}", staged.message);
}
