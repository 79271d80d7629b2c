//! Plain-text receipt rendering.
//!
//! A 40-column fixed-width layout suitable for thermal printers and
//! terminal display. Rendering is pure: it reads the committed sale
//! record and never touches the store.

use kirana_core::{Money, SaleRecord};

const WIDTH: usize = 40;

/// Renders a committed sale as a printable receipt.
///
/// Subtotal is recomputed from the pinned line snapshots; tax is the
/// difference to the recorded total, so the printed numbers always add
/// up to what the ledger holds.
pub fn render(shop_name: &str, cashier: &str, sale: &SaleRecord) -> String {
    let mut out = String::new();
    let rule = "-".repeat(WIDTH);

    out.push_str(&center(shop_name));
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');

    out.push_str(&format!(
        "Receipt #{:<8} {}\n",
        sale.id,
        sale.sold_at.format("%Y-%m-%d %H:%M UTC")
    ));
    out.push_str(&format!("Cashier: {}\n", cashier));
    out.push_str(&format!("Customer: {}\n", sale.customer));
    out.push_str(&rule);
    out.push('\n');

    let mut subtotal = Money::zero();
    for line in &sale.lines {
        let line_total = line.line_total();
        subtotal += line_total;

        out.push_str(&line.name);
        out.push('\n');
        let detail = format!("  {} x {}", line.quantity, Money::from_paise(line.price_paise));
        out.push_str(&right_pad(&detail, &line_total.to_string()));
        out.push('\n');
    }

    let total = sale.total();
    let tax = total - subtotal;

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&right_pad("Subtotal", &subtotal.to_string()));
    out.push('\n');
    out.push_str(&right_pad("Tax", &tax.to_string()));
    out.push('\n');
    out.push_str(&right_pad("TOTAL", &total.to_string()));
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&center("Thank you, visit again!"));
    out.push('\n');

    out
}

fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= WIDTH {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((WIDTH - len) / 2), text)
}

/// Left label, right-aligned amount, padded to the receipt width.
fn right_pad(left: &str, right: &str) -> String {
    let left_len = left.chars().count();
    let right_len = right.chars().count();
    let pad = WIDTH.saturating_sub(left_len + right_len).max(1);
    format!("{}{}{}", left, " ".repeat(pad), right)
}
