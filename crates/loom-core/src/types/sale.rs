//! Sale documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::PaymentMethod;

/// A completed checkout.
///
/// ## Totals
/// ```text
/// subtotal = Σ originalPrice × quantity
/// discount = cart-level discount (Σ item.discount)
/// tax      = (subtotal − discount) × taxRate
/// total    = max(0, subtotal − discount) + tax
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleRecord {
    #[serde(default)]
    pub id: String,

    /// Human-readable number printed on the invoice.
    pub invoice_number: String,

    pub items: Vec<SaleItem>,

    pub subtotal: Money,

    #[serde(default)]
    pub discount: Money,

    #[serde(default)]
    pub tax: Money,

    pub total: Money,

    pub payment_method: PaymentMethod,

    #[serde(default)]
    pub payment_status: PaymentStatus,

    #[serde(default)]
    pub delivery_status: DeliveryStatus,

    #[serde(default)]
    pub customer_name: String,

    #[serde(default)]
    pub customer_phone: String,

    #[serde(default)]
    pub customer_address: String,

    /// Employee credited with the sale.
    #[serde(default)]
    pub staff_id: String,

    #[serde(default)]
    pub staff_name: String,

    #[serde(default)]
    pub notes: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SaleRecord {
    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Revenue before tax (what the goods actually sold for).
    pub fn net_revenue(&self) -> Money {
        (self.subtotal - self.discount).floor_zero()
    }

    /// Case-insensitive match on invoice number, customer name or phone.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.invoice_number.to_lowercase().contains(&needle)
            || self.customer_name.to_lowercase().contains(&needle)
            || self.customer_phone.contains(&needle)
            || self
                .items
                .iter()
                .any(|i| i.product_name.to_lowercase().contains(&needle))
    }
}

/// One line of a sale.
///
/// `final_price = original_price − discount / quantity` is the per-unit price
/// the customer actually paid; it is fractional when the line discount does
/// not divide evenly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleItem {
    pub product_id: String,

    #[serde(default)]
    pub product_name: String,

    #[serde(default)]
    pub product_code: String,

    pub quantity: i64,

    /// Unit price at checkout time.
    pub original_price: Money,

    /// Unit price after this line's share of the cart discount.
    pub final_price: f64,

    /// This line's share of the cart discount.
    #[serde(default)]
    pub discount: Money,
}

impl SaleItem {
    /// `original_price × quantity`, before discount.
    pub fn gross_total(&self) -> Money {
        self.original_price * self.quantity
    }

    /// What the line sold for after its discount share.
    pub fn net_total(&self) -> Money {
        self.gross_total() - self.discount
    }
}

/// Whether the customer has settled the sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Paid,
    Pending,
    Partial,
    Refunded,
}

/// Fulfilment state of a sale.
///
/// Walk-in customers take the goods (`pickup`); orders for delivery move
/// from `pending` to `delivered`, or are `cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    Pickup,
    Delivered,
    Pending,
    Cancelled,
}

impl DeliveryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryStatus::Pickup => "Pickup",
            DeliveryStatus::Delivered => "Delivered",
            DeliveryStatus::Pending => "Pending Delivery",
            DeliveryStatus::Cancelled => "Cancelled",
        }
    }
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Partial => "Partially Paid",
            PaymentStatus::Refunded => "Refunded",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_totals() {
        let item = SaleItem {
            product_id: "p1".to_string(),
            product_name: "Lawn Suit".to_string(),
            product_code: "LWN-1".to_string(),
            quantity: 2,
            original_price: Money::from_units(1000),
            final_price: 880.0,
            discount: Money::from_units(240),
        };
        assert_eq!(item.gross_total().units(), 2000);
        assert_eq!(item.net_total().units(), 1760);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&DeliveryStatus::Pickup).unwrap(),
            "\"pickup\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Partial).unwrap(),
            "\"partial\""
        );
    }
}
