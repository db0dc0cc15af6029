//! # Checkout
//!
//! Pure half of the POS checkout: everything that can be decided from the
//! cart, the product list and the staff member before anything is written.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        POS Checkout                                     │
//! │                                                                         │
//! │  CheckoutRequest                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_request ── empty cart / no payment method / no staff ──► Err │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_lines(products) ── any line short on stock ──────────────► Err  │
//! │       │                   (every short line listed)                     │
//! │       ▼                                                                 │
//! │  build_sale ── discount capped at subtotal, total floored at 0         │
//! │       │         distribute_discount → item.discount, item.finalPrice    │
//! │       ▼                                                                 │
//! │  SaleRecord ──► (server) write sale, decrement stock,                   │
//! │                 bargain_records_for, performance update                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, StockShortage};
use crate::money::Money;
use crate::types::{
    BargainRecord, BargainStatus, DeliveryStatus, Employee, PaymentMethod, PaymentStatus,
    Product, SaleItem, SaleRecord, TaxRate,
};
use crate::validation;
use crate::MAX_CART_ITEMS;

// =============================================================================
// Request
// =============================================================================

/// One cart line as sent by the POS screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: i64,
    /// Unit price shown in the cart. Falls back to the product's current
    /// price when absent.
    #[serde(default)]
    pub price: Option<Money>,
}

/// Everything the POS screen submits when the cashier hits "Complete Sale".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutRequest {
    pub items: Vec<CartLine>,

    /// Cart-level discount, in currency units.
    #[serde(default)]
    pub discount: Money,

    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,

    #[serde(default)]
    pub staff_id: Option<String>,

    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,

    #[serde(default)]
    pub delivery_status: Option<DeliveryStatus>,

    #[serde(default)]
    pub customer_name: String,

    #[serde(default)]
    pub customer_phone: String,

    #[serde(default)]
    pub customer_address: String,

    #[serde(default)]
    pub notes: String,
}

// =============================================================================
// Step 1: Request Validation
// =============================================================================

/// Rejects carts that cannot be checked out regardless of stock.
///
/// ## Rules
/// - At least one line, at most [`MAX_CART_ITEMS`]
/// - A payment method and a staff member are chosen
/// - Every quantity is in range
/// - Every explicit price and the cart discount lie in `0..=MAX_AMOUNT`
pub fn validate_request(req: &CheckoutRequest) -> CoreResult<()> {
    if req.items.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    if req.items.len() > MAX_CART_ITEMS {
        return Err(CoreError::CartTooLarge {
            max: MAX_CART_ITEMS,
        });
    }

    if req.payment_method.is_none() {
        return Err(CoreError::PaymentMethodRequired);
    }

    match req.staff_id.as_deref() {
        Some(id) if !id.trim().is_empty() => {}
        _ => return Err(CoreError::StaffRequired),
    }

    for line in &req.items {
        validation::validate_document_id("productId", &line.product_id)?;
        validation::validate_quantity(line.quantity)?;
        if let Some(price) = line.price {
            validation::validate_amount("price", price)?;
        }
    }

    validation::validate_amount("discount", req.discount)?;

    Ok(())
}

// =============================================================================
// Step 2: Stock Validation
// =============================================================================

/// Total requested quantity per product, in first-seen order of the ids.
pub fn quantities_by_product(items: &[SaleItem]) -> Vec<(String, i64)> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for item in items {
        let entry = totals.entry(item.product_id.as_str()).or_insert_with(|| {
            order.push(item.product_id.clone());
            0
        });
        *entry += item.quantity;
    }
    order
        .into_iter()
        .map(|id| {
            let qty = totals.get(id.as_str()).copied().unwrap_or_default();
            (id, qty)
        })
        .collect()
}

/// Checks every line against the freshly read product list.
///
/// Lines for the same product are summed before comparing. A product that
/// no longer exists counts as zero available. All shortages are reported
/// together so the cashier can fix the cart in one pass.
pub fn validate_stock(lines: &[CartLine], products: &[Product]) -> CoreResult<()> {
    let mut requested: Vec<(&str, i64)> = Vec::new();
    for line in lines {
        match requested.iter_mut().find(|(id, _)| *id == line.product_id) {
            Some((_, qty)) => *qty += line.quantity,
            None => requested.push((line.product_id.as_str(), line.quantity)),
        }
    }

    let shortages: Vec<StockShortage> = requested
        .into_iter()
        .filter_map(|(id, qty)| {
            let product = products.iter().find(|p| p.id == id);
            let available = product.map(|p| p.stock).unwrap_or(0);
            if qty > available {
                Some(StockShortage {
                    product_id: id.to_string(),
                    product_name: product
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| id.to_string()),
                    requested: qty,
                    available: available.max(0),
                })
            } else {
                None
            }
        })
        .collect();

    if shortages.is_empty() {
        Ok(())
    } else {
        Err(CoreError::InsufficientStock { shortages })
    }
}

/// Resolves each cart line against its product (name, code, price).
///
/// Runs [`validate_stock`] first, so a product missing from the list has
/// already been reported as a shortage.
pub fn price_lines(lines: &[CartLine], products: &[Product]) -> CoreResult<Vec<SaleItem>> {
    validate_stock(lines, products)?;

    lines
        .iter()
        .map(|line| {
            let product = products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;
            let price = line.price.unwrap_or(product.current_price);
            Ok(SaleItem {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                product_code: product.code.clone(),
                quantity: line.quantity,
                original_price: price,
                final_price: price.units() as f64,
                discount: Money::zero(),
            })
        })
        .collect()
}

// =============================================================================
// Step 3-5: Totals and Discount Distribution
// =============================================================================

/// Splits a cart-level discount across lines in proportion to line totals.
///
/// ## Algorithm
/// ```text
/// share_i = round_half_up(lineTotal_i × discount / subtotal)   for i < n-1
/// share_n = discount − Σ share_i                               (remainder)
/// ```
/// Shares always sum to exactly `discount`. When rounding pushes the first
/// shares past the discount, the last line's remainder goes negative rather
/// than breaking the sum. A zero subtotal gives every line a zero share.
///
/// ## Example
/// ```rust
/// use loom_core::checkout::distribute_discount;
/// use loom_core::money::Money;
///
/// let m = Money::from_units;
/// assert_eq!(
///     distribute_discount(&[m(2000), m(500)], m(300)),
///     vec![m(240), m(60)]
/// );
/// ```
pub fn distribute_discount(line_totals: &[Money], discount: Money) -> Vec<Money> {
    let subtotal: Money = line_totals.iter().sum();
    if line_totals.is_empty() {
        return Vec::new();
    }
    if subtotal.is_zero() || discount.is_zero() {
        return vec![Money::zero(); line_totals.len()];
    }

    let sub = subtotal.units() as i128;
    let d = discount.units() as i128;
    let last = line_totals.len() - 1;

    let mut shares = Vec::with_capacity(line_totals.len());
    let mut allocated = Money::zero();
    for total in &line_totals[..last] {
        // (2·lt·d + sub) / (2·sub) == floor(lt·d/sub + ½) for non-negative inputs
        let lt = total.units() as i128;
        let share = Money::from_units(((2 * lt * d + sub) / (2 * sub)) as i64);
        allocated += share;
        shares.push(share);
    }
    shares.push(discount - allocated);
    shares
}

/// Assembles the sale document from priced lines.
///
/// ## Totals
/// - `subtotal = Σ price × qty`
/// - `taxable = max(0, subtotal − discount)`
/// - `tax = taxable × tax_rate`
/// - `total = taxable + tax`
///
/// A discount above the subtotal is accepted but only the subtotal is
/// given away: the sale records the applied amount, and that is what gets
/// distributed, so no line ends up with a negative final price.
///
/// Each line gets its discount share and
/// `final_price = price − share / quantity`.
pub fn build_sale(
    req: &CheckoutRequest,
    mut items: Vec<SaleItem>,
    staff: Option<&Employee>,
    tax_rate: TaxRate,
    invoice_number: String,
) -> CoreResult<SaleRecord> {
    let payment_method = req.payment_method.ok_or(CoreError::PaymentMethodRequired)?;

    let line_totals: Vec<Money> = items.iter().map(SaleItem::gross_total).collect();
    let subtotal: Money = line_totals.iter().sum();

    let taxable = (subtotal - req.discount).floor_zero();
    let applied = subtotal - taxable;

    let shares = distribute_discount(&line_totals, applied);
    for (item, share) in items.iter_mut().zip(shares) {
        item.discount = share;
        item.final_price =
            item.original_price.units() as f64 - share.units() as f64 / item.quantity as f64;
    }

    let tax = taxable.calculate_tax(tax_rate);

    Ok(SaleRecord {
        id: String::new(),
        invoice_number,
        items,
        subtotal,
        discount: applied,
        tax,
        total: taxable + tax,
        payment_method,
        payment_status: req.payment_status.unwrap_or_default(),
        delivery_status: req.delivery_status.unwrap_or_default(),
        customer_name: req.customer_name.trim().to_string(),
        customer_phone: req.customer_phone.trim().to_string(),
        customer_address: req.customer_address.trim().to_string(),
        staff_id: req.staff_id.clone().unwrap_or_default(),
        staff_name: staff.map(|s| s.name.clone()).unwrap_or_default(),
        notes: req.notes.clone(),
        created_at: None,
        updated_at: None,
    })
}

// =============================================================================
// Step 7: Bargain Records
// =============================================================================

/// One pre-approved bargain record per discounted line of a saved sale.
pub fn bargain_records_for(sale: &SaleRecord) -> Vec<BargainRecord> {
    sale.items
        .iter()
        // The rounding remainder can leave the last line at zero or below
        // (4 × 1000 with a discount of 2 splits as 1, 1, 1, -1).
        .filter(|item| item.discount.is_positive())
        .map(|item| BargainRecord {
            id: String::new(),
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            original_price: item.original_price,
            final_price: item.final_price,
            discount_amount: item.discount,
            discount_percentage: item.discount.ratio_percent(item.gross_total()),
            customer_name: sale.customer_name.clone(),
            staff_id: sale.staff_id.clone(),
            staff_name: sale.staff_name.clone(),
            sale_id: sale.id.clone(),
            reason: format!("Cart discount on invoice {}", sale.invoice_number),
            status: BargainStatus::Approved,
            created_at: None,
            updated_at: None,
        })
        .collect()
}

// =============================================================================
// Invoice Numbers
// =============================================================================

/// `INV-YYMMDD-HHMMSS-XXXX`, the suffix taken from a random UUID.
pub fn generate_invoice_number(now: DateTime<Utc>) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string()[..4].to_uppercase();
    format!("INV-{}-{}", now.format("%y%m%d-%H%M%S"), suffix)
}

// =============================================================================
// Unit Tests
// =============================================================================
