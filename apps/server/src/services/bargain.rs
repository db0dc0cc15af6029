//! Manually logged bargains and the approve / reject decision.

use loom_core::{BargainRecord, BargainStatus, CoreError, Money};
use loom_store::Store;
use tracing::info;

use crate::error::ApiResult;

/// Logs a bargain by hand. The agreed price must sit inside the product's
/// price ladder; the record waits for a manager decision.
pub async fn create(store: &Store, mut record: BargainRecord) -> ApiResult<BargainRecord> {
    record.validate()?;

    if let Some(product) = store.products().get_by_id(&record.product_id).await? {
        product.check_sale_price(Money::from_units(record.final_price.round() as i64))?;
        if record.product_name.is_empty() {
            record.product_name = product.name;
        }
    }

    record.derive_discount();
    record.status = BargainStatus::Pending;
    record.sale_id.clear();

    let (id, created) = store.bargains().insert(&record).await?;
    info!(
        id = %id,
        product_id = %created.product_id,
        discount = created.discount_amount.units(),
        "Bargain logged"
    );
    Ok(created)
}

/// Approves or rejects a pending bargain. A decided bargain stays decided.
pub async fn decide(store: &Store, id: &str, approve: bool) -> ApiResult<BargainRecord> {
    let bargains = store.bargains();
    let record = bargains.require(id).await?;

    if record.status != BargainStatus::Pending {
        return Err(CoreError::BargainAlreadyDecided {
            id: id.to_string(),
            status: record.status.to_string(),
        }
        .into());
    }

    let status = if approve {
        BargainStatus::Approved
    } else {
        BargainStatus::Rejected
    };
    let updated = bargains.set_status(id, status).await?;
    info!(id = %id, status = %status, "Bargain decided");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::fixtures::product;

    fn bargain(product_id: &str, original: i64, agreed: f64, quantity: i64) -> BargainRecord {
        BargainRecord {
            id: String::new(),
            product_id: product_id.to_string(),
            product_name: String::new(),
            quantity,
            original_price: Money::from_units(original),
            final_price: agreed,
            discount_amount: Money::zero(),
            discount_percentage: 0.0,
            customer_name: "Walk-in".to_string(),
            staff_id: "e1".to_string(),
            staff_name: "Ayesha".to_string(),
            sale_id: String::new(),
            reason: "Regular customer".to_string(),
            status: BargainStatus::Approved,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_manual_bargain_starts_pending() {
        let store = Store::memory();
        let pid = store
            .products()
            .create(&product("Lawn Suit", "LWN-01", 1000, 10))
            .await
            .unwrap();

        let created = create(&store, bargain(&pid, 1000, 900.0, 2)).await.unwrap();
        assert_eq!(created.status, BargainStatus::Pending);
        assert_eq!(created.product_name, "Lawn Suit");
        assert_eq!(created.discount_amount.units(), 200);
        assert!((created.discount_percentage - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_price_below_floor_is_rejected() {
        let store = Store::memory();
        let pid = store
            .products()
            .create(&product("Lawn Suit", "LWN-01", 1000, 10))
            .await
            .unwrap();

        // Floor is 500
        let err = create(&store, bargain(&pid, 1000, 450.0, 1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(store.bargains().get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_decision_is_final() {
        let store = Store::memory();
        let created = create(&store, bargain("p1", 1000, 950.0, 1)).await.unwrap();

        let approved = decide(&store, &created.id, true).await.unwrap();
        assert_eq!(approved.status, BargainStatus::Approved);

        let err = decide(&store, &created.id, false).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert!(err.message.contains("already approved"));
    }
}
