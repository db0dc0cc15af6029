//! # Services
//!
//! Multi-step operations that read collections, apply loom-core rules and
//! write the results back. Handlers stay thin; anything longer than one
//! store call lives here.
//!
//! No service is transactional. Each store call is its own write, and an
//! error part-way through leaves the earlier writes in place.

pub mod bargain;
pub mod catalogue;
pub mod checkout;
pub mod inventory;
pub mod ledger;
pub mod staff;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, ApiResult};

/// What `current` would look like after a shallow merge of `patch`, so
/// the result can be validated before anything is written.
pub(crate) fn preview_patch<T>(current: &T, patch: &Map<String, Value>) -> ApiResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut value = serde_json::to_value(current)
        .map_err(|e| ApiError::internal(format!("Failed to encode document: {}", e)))?;

    if let Value::Object(fields) = &mut value {
        for (key, field) in patch {
            if field.is_null() {
                fields.remove(key);
            } else {
                fields.insert(key.clone(), field.clone());
            }
        }
    }

    serde_json::from_value(value).map_err(|e| ApiError::validation(e.to_string()))
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preview_patch() {
        let product = fixtures::product("Lawn Suit", "LWN-01", 1800, 10);
        let Value::Object(patch) = json!({"currentPrice": 1500, "color": "Blue"}) else {
            unreachable!()
        };
        let preview = preview_patch(&product, &patch).unwrap();
        assert_eq!(preview.current_price.units(), 1500);
        assert_eq!(preview.color, "Blue");
        assert_eq!(preview.stock, 10);
    }

    #[test]
    fn test_preview_rejects_wrong_types() {
        let product = fixtures::product("Lawn Suit", "LWN-01", 1800, 10);
        let Value::Object(patch) = json!({"stock": "many"}) else {
            unreachable!()
        };
        assert!(preview_patch(&product, &patch).is_err());
    }
}
