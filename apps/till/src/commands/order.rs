//! # Order Commands
//!
//! ```text
//! till order new --customer "Mang Tomas"      → prints the order id
//! till order add <order> pancit-canton 2
//! till order add <order> lomi
//! till order pay <order> 50                   → Partial: ₱30.00 remaining
//! till order pay <order> 30                   → Paid. Change: ₱0.00
//! ```

use clap::Subcommand;
use serde::Serialize;

use noodle_core::{Order, PaymentOutcome, PaymentSession, Period};

use super::{Output, RangeArgs};
use crate::error::AppResult;
use crate::service::{TenderResult, TillService};

#[derive(Debug, Subcommand)]
pub enum OrderCommand {
    /// Open a new order
    New {
        #[arg(long)]
        customer: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Add a menu item to an order
    Add {
        order_id: String,
        item_id: String,
        #[arg(default_value_t = 1)]
        quantity: i64,
    },
    /// Change a line's quantity; 0 removes the line
    Qty {
        order_id: String,
        /// Line id or menu item id
        line: String,
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
    /// Remove a line
    Remove {
        order_id: String,
        /// Line id or menu item id
        line: String,
    },
    /// Tender cash; without an amount, show what is due
    Pay {
        order_id: String,
        #[arg(allow_hyphen_values = true)]
        amount: Option<String>,
    },
    /// Cancel a pending order
    Cancel { order_id: String },
    /// Refund a paid order
    Refund { order_id: String },
    /// Show one order
    Show { order_id: String },
    /// Delete an order that never took money
    Discard { order_id: String },
    /// List orders (default: today)
    List {
        #[command(flatten)]
        range: RangeArgs,
    },
}

pub async fn run(command: OrderCommand, service: &TillService, out: &Output) -> AppResult<()> {
    match command {
        OrderCommand::New { customer, notes } => {
            let order = service
                .open_order(customer.as_deref(), notes.as_deref())
                .await?;
            out.emit(&order, || {
                format!("Opened {} ({})", order.receipt_number(), order.id())
            })
        }
        OrderCommand::Add {
            order_id,
            item_id,
            quantity,
        } => {
            let order = service.add_item(&order_id, &item_id, quantity).await?;
            out.emit(&order, || render_order(&order, out))
        }
        OrderCommand::Qty {
            order_id,
            line,
            quantity,
        } => {
            let order = service.set_quantity(&order_id, &line, &quantity).await?;
            out.emit(&order, || render_order(&order, out))
        }
        OrderCommand::Remove { order_id, line } => {
            let order = service.remove_line(&order_id, &line).await?;
            out.emit(&order, || render_order(&order, out))
        }
        OrderCommand::Pay { order_id, amount } => match amount {
            Some(amount) => {
                let result = service.tender(&order_id, &amount).await?;
                out.emit(&result, || render_tender(&result, out))
            }
            None => {
                let session = service.begin_payment(&order_id).await?;
                out.emit(&session, || render_session(&session, out))
            }
        },
        OrderCommand::Cancel { order_id } => {
            let order = service.cancel(&order_id).await?;
            out.emit(&order, || format!("Order {} cancelled", order.receipt_number()))
        }
        OrderCommand::Refund { order_id } => {
            let order = service.refund(&order_id).await?;
            out.emit(&order, || {
                format!(
                    "Order {} refunded ({})",
                    order.receipt_number(),
                    out.money(order.total())
                )
            })
        }
        OrderCommand::Show { order_id } => {
            let order = service.order(&order_id).await?;
            out.emit(&order, || render_order(&order, out))
        }
        OrderCommand::Discard { order_id } => {
            service.discard(&order_id).await?;
            out.emit(&Discarded { order_id: &order_id }, || {
                format!("Order {} discarded", order_id)
            })
        }
        OrderCommand::List { range } => {
            let range = range.resolve(service, Period::Today)?;
            let orders = service.list_orders(&range).await?;
            out.emit(&orders, || render_order_list(&orders, out))
        }
    }
}

#[derive(Serialize)]
struct Discarded<'a> {
    order_id: &'a str,
}

// =============================================================================
// Text Rendering
// =============================================================================

/// Receipt-style view of one order.
pub fn render_order(order: &Order, out: &Output) -> String {
    let mut text = format!(
        "{}  [{}]\n{}\n",
        order.receipt_number(),
        order.status().label(),
        order.id()
    );
    if let Some(name) = order.customer_name() {
        text.push_str(&format!("Customer: {}\n", name));
    }

    for line in order.lines() {
        text.push_str(&format!(
            "  {:>3} x {:<28} {:>10}\n",
            line.quantity,
            line.name,
            out.money(line.line_total())
        ));
    }
    if order.lines().is_empty() {
        text.push_str("  (no items)\n");
    }

    text.push_str(&format!("  {:<34} {:>10}\n", "Subtotal", out.money(order.subtotal())));
    if !order.tax_rate().is_zero() {
        let label = format!("Tax {:.2}%", order.tax_rate().percentage());
        text.push_str(&format!("  {:<34} {:>10}\n", label, out.money(order.tax())));
    }
    text.push_str(&format!("  {:<34} {:>10}\n", "Total", out.money(order.total())));

    if order.payment_amount().is_positive() {
        text.push_str(&format!("  {:<34} {:>10}\n", "Paid", out.money(order.payment_amount())));
        if order.is_fully_paid() {
            text.push_str(&format!("  {:<34} {:>10}\n", "Change", out.money(order.change_amount())));
        } else {
            text.push_str(&format!("  {:<34} {:>10}\n", "Remaining", out.money(order.remaining())));
        }
    }
    if let Some(notes) = order.notes() {
        text.push_str(&format!("Notes: {}\n", notes));
    }

    text.trim_end().to_string()
}

pub fn render_tender(result: &TenderResult, out: &Output) -> String {
    let mut text = match result.outcome {
        PaymentOutcome::Success { change } => format!("Paid. Change: {}", out.money(change)),
        PaymentOutcome::PartialPayment { remaining } => {
            format!("Partial payment. Remaining: {}", out.money(remaining))
        }
    };
    for warning in &result.warnings {
        text.push_str(&format!("\nWarning: {}", warning));
    }
    text
}

pub fn render_session(session: &PaymentSession, out: &Output) -> String {
    format!(
        "Total {}  Paid {}  Due {}",
        out.money(session.required),
        out.money(session.current),
        out.money(session.remaining)
    )
}

pub fn render_order_list(orders: &[Order], out: &Output) -> String {
    if orders.is_empty() {
        return "No orders.".to_string();
    }
    orders
        .iter()
        .map(|order| {
            format!(
                "{}  {:<9} {:>3} items  {:>10}  {}",
                order.receipt_number(),
                order.status().label(),
                order.total_quantity(),
                out.money(order.total()),
                order.id()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
