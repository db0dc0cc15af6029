//! # Invoices
//!
//! Renders a completed sale as a printable HTML page and as a prefilled
//! WhatsApp message.
//!
//! ## Delivery Paths
//! ```text
//! ┌──────────────┐     render_html()       ┌──────────────────────────────┐
//! │  SaleRecord  │ ──────────────────────► │ self-contained HTML, inline  │
//! │  (snapshot)  │                         │ styles, printed by browser   │
//! │              │     whatsapp_link()     ├──────────────────────────────┤
//! │              │ ──────────────────────► │ https://wa.me/<digits>?text= │
//! └──────────────┘                         └──────────────────────────────┘
//! ```
//!
//! Both work from the sale snapshot only; prices are never re-read from the
//! catalogue.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::SaleRecord;
use crate::validation::{self, ValidationResult};

/// Shop details printed in the invoice header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StoreProfile {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    /// Prefix for amounts, e.g. `Rs`.
    pub currency_symbol: String,
}

impl Default for StoreProfile {
    fn default() -> Self {
        Self {
            name: "Loom Boutique".to_string(),
            address: String::new(),
            phone: String::new(),
            currency_symbol: "Rs".to_string(),
        }
    }
}

impl StoreProfile {
    fn money(&self, amount: Money) -> String {
        amount.format_with(&self.currency_symbol)
    }
}

/// Minimal HTML escaping for text nodes and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const CELL: &str = "padding:6px 8px;border-bottom:1px solid #e5e7eb;";
const NUM_CELL: &str = "padding:6px 8px;border-bottom:1px solid #e5e7eb;text-align:right;";

/// A complete, self-contained HTML document for printing.
pub fn render_html(sale: &SaleRecord, store: &StoreProfile) -> String {
    let mut html = String::new();
    let esc = escape_html;

    // `write!` into a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Invoice {invoice}</title></head>\
         <body style=\"font-family:Arial,Helvetica,sans-serif;color:#111827;max-width:720px;margin:24px auto;\">\
         <div style=\"text-align:center;margin-bottom:16px;\">\
         <h1 style=\"margin:0;font-size:24px;\">{name}</h1>",
        invoice = esc(&sale.invoice_number),
        name = esc(&store.name),
    );
    if !store.address.is_empty() {
        let _ = write!(html, "<div style=\"font-size:12px;\">{}</div>", esc(&store.address));
    }
    if !store.phone.is_empty() {
        let _ = write!(html, "<div style=\"font-size:12px;\">Tel: {}</div>", esc(&store.phone));
    }
    html.push_str("</div>");

    let date = sale
        .created_at
        .map(|t| t.format("%d %b %Y %H:%M").to_string())
        .unwrap_or_default();
    let _ = write!(
        html,
        "<table style=\"width:100%;font-size:13px;margin-bottom:12px;\"><tr>\
         <td><strong>Invoice:</strong> {invoice}<br><strong>Date:</strong> {date}</td>\
         <td style=\"text-align:right;\"><strong>Customer:</strong> {customer}<br>{phone}</td>\
         </tr></table>",
        invoice = esc(&sale.invoice_number),
        date = esc(&date),
        customer = esc(display_or(&sale.customer_name, "Walk-in Customer")),
        phone = esc(&sale.customer_phone),
    );

    let _ = write!(
        html,
        "<table style=\"width:100%;border-collapse:collapse;font-size:13px;\">\
         <thead><tr style=\"background:#f3f4f6;\">\
         <th style=\"{CELL}text-align:left;\">Item</th>\
         <th style=\"{NUM_CELL}\">Qty</th>\
         <th style=\"{NUM_CELL}\">Price</th>\
         <th style=\"{NUM_CELL}\">Discount</th>\
         <th style=\"{NUM_CELL}\">Amount</th>\
         </tr></thead><tbody>"
    );
    for item in &sale.items {
        let _ = write!(
            html,
            "<tr><td style=\"{CELL}\">{name}<br><span style=\"color:#6b7280;font-size:11px;\">{code}</span></td>\
             <td style=\"{NUM_CELL}\">{qty}</td>\
             <td style=\"{NUM_CELL}\">{price}</td>\
             <td style=\"{NUM_CELL}\">{discount}</td>\
             <td style=\"{NUM_CELL}\">{amount}</td></tr>",
            name = esc(&item.product_name),
            code = esc(&item.product_code),
            qty = item.quantity,
            price = esc(&store.money(item.original_price)),
            discount = esc(&store.money(item.discount)),
            amount = esc(&store.money(item.net_total())),
        );
    }
    html.push_str("</tbody></table>");

    html.push_str("<table style=\"width:100%;font-size:13px;margin-top:12px;\">");
    let mut total_row = |label: &str, value: String, bold: bool| {
        let weight = if bold { "font-weight:bold;font-size:15px;" } else { "" };
        let _ = write!(
            html,
            "<tr><td style=\"text-align:right;{weight}\">{label}</td>\
             <td style=\"text-align:right;width:140px;{weight}\">{value}</td></tr>",
            label = esc(label),
            value = esc(&value),
        );
    };
    total_row("Subtotal", store.money(sale.subtotal), false);
    if !sale.discount.is_zero() {
        total_row("Discount", store.money(-sale.discount), false);
    }
    if !sale.tax.is_zero() {
        total_row("Tax", store.money(sale.tax), false);
    }
    total_row("Total", store.money(sale.total), true);
    total_row("Payment", sale.payment_method.label().to_string(), false);
    total_row("Status", sale.payment_status.label().to_string(), false);
    html.push_str("</table>");

    if !sale.staff_name.is_empty() {
        let _ = write!(
            html,
            "<p style=\"font-size:12px;color:#6b7280;\">Served by {}</p>",
            esc(&sale.staff_name)
        );
    }
    html.push_str(
        "<p style=\"text-align:center;font-size:12px;margin-top:24px;\">Thank you for shopping with us!</p>\
         </body></html>",
    );
    html
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Plain-text invoice summary for messaging apps.
pub fn invoice_message(sale: &SaleRecord, store: &StoreProfile) -> String {
    let mut msg = String::new();
    let _ = writeln!(msg, "*{}*", store.name);
    let _ = writeln!(msg, "Invoice: {}", sale.invoice_number);
    if let Some(at) = sale.created_at {
        let _ = writeln!(msg, "Date: {}", at.format("%d %b %Y"));
    }
    let _ = writeln!(msg, "Customer: {}", display_or(&sale.customer_name, "Walk-in Customer"));
    msg.push('\n');

    for item in &sale.items {
        let _ = writeln!(
            msg,
            "{} x{} - {}",
            item.product_name,
            item.quantity,
            store.money(item.net_total())
        );
    }
    msg.push('\n');

    let _ = writeln!(msg, "Subtotal: {}", store.money(sale.subtotal));
    if !sale.discount.is_zero() {
        let _ = writeln!(msg, "Discount: {}", store.money(sale.discount));
    }
    if !sale.tax.is_zero() {
        let _ = writeln!(msg, "Tax: {}", store.money(sale.tax));
    }
    let _ = writeln!(msg, "*Total: {}*", store.money(sale.total));
    let _ = write!(msg, "Payment: {}", sale.payment_method.label());
    msg
}

/// `https://wa.me/<digits>?text=<url-encoded message>`
///
/// Everything but digits is stripped from `phone`; a phone with no digits
/// at all is rejected.
pub fn whatsapp_link(phone: &str, message: &str) -> ValidationResult<String> {
    let digits = validation::digits_only(phone);
    if digits.is_empty() {
        return Err(ValidationError::invalid_format(
            "phone",
            "must contain at least one digit",
        ));
    }
    Ok(format!(
        "https://wa.me/{}?text={}",
        digits,
        urlencoding::encode(message)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeliveryStatus, PaymentMethod, PaymentStatus, SaleItem};
    use chrono::{TimeZone, Utc};

    fn sale() -> SaleRecord {
        SaleRecord {
            id: "s1".to_string(),
            invoice_number: "INV-260310-101500-AB12".to_string(),
            items: vec![
                SaleItem {
                    product_id: "p1".to_string(),
                    product_name: "Lawn <Suit>".to_string(),
                    product_code: "LWN-1".to_string(),
                    quantity: 2,
                    original_price: Money::from_units(1000),
                    final_price: 880.0,
                    discount: Money::from_units(240),
                },
                SaleItem {
                    product_id: "p2".to_string(),
                    product_name: "Dupatta".to_string(),
                    product_code: "DPT-4".to_string(),
                    quantity: 1,
                    original_price: Money::from_units(500),
                    final_price: 440.0,
                    discount: Money::from_units(60),
                },
            ],
            subtotal: Money::from_units(2500),
            discount: Money::from_units(300),
            tax: Money::zero(),
            total: Money::from_units(2200),
            payment_method: PaymentMethod::Cash,
            payment_status: PaymentStatus::Paid,
            delivery_status: DeliveryStatus::Pickup,
            customer_name: "Ayesha & Co".to_string(),
            customer_phone: "+92 300-1234567".to_string(),
            customer_address: String::new(),
            staff_id: "e1".to_string(),
            staff_name: "Bilal".to_string(),
            notes: String::new(),
            created_at: Some(Utc.with_ymd_and_hms(2026, 3, 10, 10, 15, 0).unwrap()),
            updated_at: None,
        }
    }

    #[test]
    fn test_render_html_escapes_and_totals() {
        let html = render_html(&sale(), &StoreProfile::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Lawn &lt;Suit&gt;"));
        assert!(html.contains("Ayesha &amp; Co"));
        assert!(html.contains("Rs 2,200"));
        assert!(html.contains("-Rs 300"));
        assert!(html.contains("Served by Bilal"));
        assert!(!html.contains("<Suit>"));
    }

    #[test]
    fn test_invoice_message() {
        let msg = invoice_message(&sale(), &StoreProfile::default());
        assert!(msg.contains("Invoice: INV-260310-101500-AB12"));
        assert!(msg.contains("Lawn <Suit> x2 - Rs 1,760"));
        assert!(msg.contains("*Total: Rs 2,200*"));
        assert!(msg.ends_with("Payment: Cash"));
    }

    #[test]
    fn test_whatsapp_link() {
        let link = whatsapp_link("+92 300-1234567", "Total: Rs 2,200\nThanks").unwrap();
        assert_eq!(
            link,
            "https://wa.me/923001234567?text=Total%3A%20Rs%202%2C200%0AThanks"
        );
        assert!(whatsapp_link("n/a", "hi").is_err());
    }
}
