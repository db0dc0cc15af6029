//! Product catalogue operations.

use serde::Serialize;
use tracing::debug;

use loom_core::Product;

use crate::collection::Collection;
use crate::error::StoreResult;

#[derive(Serialize)]
struct StockPatch {
    stock: i64,
}

impl Collection<Product> {
    /// Sets `stock` as a partial update.
    ///
    /// This is a plain write of the value the caller computed, not an
    /// atomic decrement; two writers racing on the same product both win
    /// in turn.
    pub async fn update_stock(&self, id: &str, stock: i64) -> StoreResult<Product> {
        debug!(id = %id, stock = stock, "Updating product stock");
        self.update(id, &StockPatch { stock }).await
    }

    /// Case-insensitive lookup by product code.
    pub async fn find_by_code(&self, code: &str) -> StoreResult<Option<Product>> {
        let code = code.trim();
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .find(|p| p.code.trim().eq_ignore_ascii_case(code)))
    }
}

#[cfg(test)]
mod tests {
    use crate::Store;
    use loom_core::{Money, Product, ProductStatus};

    fn product(code: &str, stock: i64) -> Product {
        Product {
            id: String::new(),
            name: format!("Product {}", code),
            code: code.to_string(),
            fabric_type: String::new(),
            size: String::new(),
            color: String::new(),
            purchase_cost: Money::from_units(600),
            min_sale_price: Money::from_units(800),
            max_sale_price: Money::from_units(1200),
            current_price: Money::from_units(1000),
            stock,
            min_stock: 2,
            supplier: String::new(),
            batch_info: String::new(),
            status: ProductStatus::Active,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_update_stock_is_partial() {
        let store = Store::memory();
        let products = store.products();
        let id = products.create(&product("LWN-1", 10)).await.unwrap();

        let updated = products.update_stock(&id, 7).await.unwrap();
        assert_eq!(updated.stock, 7);
        assert_eq!(updated.code, "LWN-1");
        assert_eq!(updated.current_price.units(), 1000);
        assert!(updated.updated_at.is_some());

        assert!(products.update_stock("missing", 1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_find_by_code() {
        let store = Store::memory();
        let products = store.products();
        products.create(&product("LWN-1", 1)).await.unwrap();
        products.create(&product("SLK-2", 1)).await.unwrap();

        let found = products.find_by_code(" slk-2 ").await.unwrap().unwrap();
        assert_eq!(found.code, "SLK-2");
        assert!(products.find_by_code("NOPE").await.unwrap().is_none());
    }
}
