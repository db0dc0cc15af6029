//! # POS Checkout
//!
//! Turns a cart into a saved sale and applies its side effects.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout Sequence                               │
//! │                                                                         │
//! │  1. validate_request      empty cart, payment method, staff            │
//! │  2. products.get_all      fresh read; every short line reported        │
//! │  3. price_lines           name, code, unit price per line              │
//! │  4. build_sale            subtotal, proportional discount, tax, total  │
//! │  ─────────────────────── nothing written above this line ──────────── │
//! │  5. sales.insert          the sale document                            │
//! │  6. products.update_stock one partial update per product (+ movement)  │
//! │  7. bargains.create       one approved record per discounted line      │
//! │  8. employees.apply_sales_credit  totals + blended performance score   │
//! │  9. CheckoutReceipt       sale + invoice / WhatsApp links              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Step 6 writes `stock − qty` computed from the read in step 2. Two
//! terminals selling the same product at once can both pass validation and
//! the later write wins. Failures after step 5 are returned to the caller
//! but nothing already written is rolled back.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use loom_core::checkout::{self, CheckoutRequest};
use loom_core::invoice::{self, StoreProfile};
use loom_core::performance;
use loom_core::{MovementType, SaleRecord, StockMovement, TaxRate};
use loom_store::Store;

use crate::error::ApiResult;

/// What the POS screen gets back after "Complete Sale".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub sale: SaleRecord,
    /// Printable HTML invoice for this sale.
    pub invoice_url: String,
    /// Present when the customer left a phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_link: Option<String>,
    pub bargain_records: usize,
}

pub async fn checkout(
    store: &Store,
    request: CheckoutRequest,
    tax_rate: TaxRate,
    profile: &StoreProfile,
    now: DateTime<Utc>,
) -> ApiResult<CheckoutReceipt> {
    // Steps 1-4: validate and assemble; no writes yet
    checkout::validate_request(&request)?;

    let products = store.products().get_all().await?;
    let items = checkout::price_lines(&request.items, &products)?;

    let staff_id = request.staff_id.clone().unwrap_or_default();
    let staff = store.employees().get_by_id(staff_id.trim()).await?;
    if staff.is_none() {
        warn!(staff_id = %staff_id, "Staff member not found; sale will not be credited");
    }

    let sale = checkout::build_sale(
        &request,
        items,
        staff.as_ref(),
        tax_rate,
        checkout::generate_invoice_number(now),
    )?;

    // Step 5
    let (sale_id, sale) = store.sales().insert(&sale).await?;
    info!(
        sale_id = %sale_id,
        invoice = %sale.invoice_number,
        total = sale.total.units(),
        lines = sale.items.len(),
        "Sale recorded"
    );

    // Step 6
    for (product_id, quantity) in checkout::quantities_by_product(&sale.items) {
        let Some(product) = products.iter().find(|p| p.id == product_id) else {
            continue;
        };
        let new_stock = MovementType::Sale.apply(product.stock, quantity);
        store.products().update_stock(&product_id, new_stock).await?;

        let movement = StockMovement {
            id: String::new(),
            product_id: product_id.clone(),
            product_name: product.name.clone(),
            movement_type: MovementType::Sale,
            quantity,
            previous_stock: product.stock,
            new_stock,
            reason: "POS sale".to_string(),
            reference: sale.invoice_number.clone(),
            performed_by: sale.staff_name.clone(),
            created_at: None,
        };
        store.stock_movements().create(&movement).await?;
        debug!(product_id = %product_id, previous = product.stock, new = new_stock, "Stock decremented");
    }

    // Step 7
    let bargains = checkout::bargain_records_for(&sale);
    for record in &bargains {
        store.bargains().create(record).await?;
    }

    // Step 8
    if let Some(employee) = staff {
        let credit = performance::credit_sale(&employee, sale.total);
        store
            .employees()
            .apply_sales_credit(&employee.id, &credit)
            .await?;
        info!(
            employee_id = %employee.id,
            score = credit.performance_score,
            monthly_sales = credit.monthly_sales.units(),
            "Staff performance updated"
        );
    }

    // Step 9
    let whatsapp_link = if sale.customer_phone.is_empty() {
        None
    } else {
        let message = invoice::invoice_message(&sale, profile);
        invoice::whatsapp_link(&sale.customer_phone, &message).ok()
    };

    Ok(CheckoutReceipt {
        invoice_url: format!("/api/sales/{}/invoice", sale.id),
        whatsapp_link,
        bargain_records: bargains.len(),
        sale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::fixtures::{employee, product};
    use loom_core::checkout::CartLine;
    use loom_core::{BargainStatus, Money, PaymentMethod};

    async fn seed(store: &Store) -> (String, String, String) {
        let suit = store
            .products()
            .create(&product("Lawn Suit", "LWN-01", 1000, 10))
            .await
            .unwrap();
        let dupatta = store
            .products()
            .create(&product("Silk Dupatta", "SLK-02", 500, 3))
            .await
            .unwrap();
        let staff = store
            .employees()
            .create(&employee("Ayesha", 75.0, 50000, 40000))
            .await
            .unwrap();
        (suit, dupatta, staff)
    }

    fn cart(lines: &[(&str, i64)], discount: i64, staff: &str) -> CheckoutRequest {
        CheckoutRequest {
            items: lines
                .iter()
                .map(|(id, qty)| CartLine {
                    product_id: id.to_string(),
                    quantity: *qty,
                    price: None,
                })
                .collect(),
            discount: Money::from_units(discount),
            payment_method: Some(PaymentMethod::Cash),
            staff_id: Some(staff.to_string()),
            customer_phone: "0300-1234567".to_string(),
            ..CheckoutRequest::default()
        }
    }

    #[tokio::test]
    async fn test_checkout_distributes_discount_and_applies_side_effects() {
        let store = Store::memory();
        let (suit, dupatta, staff) = seed(&store).await;

        let receipt = checkout(
            &store,
            cart(&[(&suit, 2), (&dupatta, 1)], 300, &staff),
            TaxRate::zero(),
            &StoreProfile::default(),
            Utc::now(),
        )
        .await
        .unwrap();

        let sale = &receipt.sale;
        assert_eq!(sale.subtotal.units(), 2500);
        assert_eq!(sale.total.units(), 2200);
        assert_eq!(sale.items[0].discount.units(), 240);
        assert_eq!(sale.items[1].discount.units(), 60);
        assert_eq!(sale.items[0].final_price, 880.0);
        assert_eq!(sale.items[1].final_price, 440.0);
        assert!(receipt
            .whatsapp_link
            .as_deref()
            .unwrap()
            .starts_with("https://wa.me/03001234567?text="));

        // Stock decremented
        assert_eq!(store.products().require(&suit).await.unwrap().stock, 8);
        assert_eq!(store.products().require(&dupatta).await.unwrap().stock, 2);
        assert_eq!(store.stock_movements().get_all().await.unwrap().len(), 2);

        // One approved bargain per discounted line
        let bargains = store.bargains().get_all().await.unwrap();
        assert_eq!(bargains.len(), 2);
        assert!(bargains.iter().all(|b| b.status == BargainStatus::Approved));
        assert!(bargains.iter().all(|b| b.sale_id == sale.id));

        // 75 × 0.7 + min(42200/50000·100, 100) × 0.3 = 77.82 → 78
        let credited = store.employees().require(&staff).await.unwrap();
        assert_eq!(credited.monthly_sales.units(), 42200);
        assert_eq!(credited.performance_score, 78.0);
    }

    #[tokio::test]
    async fn test_short_stock_rejects_whole_cart_without_writes() {
        let store = Store::memory();
        let (suit, dupatta, staff) = seed(&store).await;

        let err = checkout(
            &store,
            cart(&[(&suit, 11), (&dupatta, 4)], 0, &staff),
            TaxRate::zero(),
            &StoreProfile::default(),
            Utc::now(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("Lawn Suit (requested 11, available 10)"));
        assert!(err.message.contains("Silk Dupatta (requested 4, available 3)"));
        assert!(store.sales().get_all().await.unwrap().is_empty());
        assert_eq!(store.products().require(&suit).await.unwrap().stock, 10);
    }

    #[tokio::test]
    async fn test_no_discount_creates_no_bargains() {
        let store = Store::memory();
        let (suit, _, staff) = seed(&store).await;

        let receipt = checkout(
            &store,
            cart(&[(&suit, 1)], 0, &staff),
            TaxRate::from_bps(1700),
            &StoreProfile::default(),
            Utc::now(),
        )
        .await
        .unwrap();

        assert_eq!(receipt.bargain_records, 0);
        assert_eq!(receipt.sale.tax.units(), 170);
        assert_eq!(receipt.sale.total.units(), 1170);
        assert!(store.bargains().get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_staff_still_records_sale() {
        let store = Store::memory();
        let (suit, _, _) = seed(&store).await;

        let receipt = checkout(
            &store,
            cart(&[(&suit, 1)], 0, "ghost"),
            TaxRate::zero(),
            &StoreProfile::default(),
            Utc::now(),
        )
        .await
        .unwrap();

        assert_eq!(receipt.sale.staff_id, "ghost");
        assert!(receipt.sale.staff_name.is_empty());
        assert_eq!(store.sales().get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_payment_method_is_rejected() {
        let store = Store::memory();
        let (suit, _, staff) = seed(&store).await;
        let mut request = cart(&[(&suit, 1)], 0, &staff);
        request.payment_method = None;

        let err = checkout(
            &store,
            request,
            TaxRate::zero(),
            &StoreProfile::default(),
            Utc::now(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
