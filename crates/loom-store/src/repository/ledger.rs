//! Credit and debit ledger entries.

use loom_core::ledger::LedgerPaymentUpdate;
use loom_core::LedgerEntry;

use crate::collection::Collection;
use crate::error::StoreResult;

impl Collection<LedgerEntry> {
    /// Persists the result of [`loom_core::ledger::apply_payment`].
    ///
    /// Not guarded against a concurrent payment on the same entry: the
    /// later write replaces `paidAmount`, `remainingAmount` and `payments`.
    pub async fn record_payment(&self, id: &str, update: &LedgerPaymentUpdate) -> StoreResult<LedgerEntry> {
        self.update(id, update).await
    }
}

#[cfg(test)]
mod tests {
    use crate::Store;
    use chrono::Utc;
    use loom_core::ledger::{apply_payment, NewPayment};
    use loom_core::{LedgerEntry, LedgerKind, LedgerStatus, Money, PaymentMethod};

    #[tokio::test]
    async fn test_record_payment() {
        let store = Store::memory();
        let credits = store.ledger(LedgerKind::Credit);

        let mut entry = LedgerEntry {
            id: String::new(),
            party_name: "Hamza Traders".to_string(),
            party_phone: String::new(),
            description: String::new(),
            reference: String::new(),
            amount: Money::from_units(5000),
            paid_amount: Money::zero(),
            remaining_amount: Money::zero(),
            status: LedgerStatus::Pending,
            due_date: None,
            payments: Vec::new(),
            created_at: None,
            updated_at: None,
        };
        entry.prepare_new();
        let (id, stored) = credits.insert(&entry).await.unwrap();

        let update = apply_payment(
            &stored,
            &NewPayment {
                amount: Money::from_units(2000),
                method: PaymentMethod::Cash,
                reference: String::new(),
                notes: String::new(),
            },
            Utc::now(),
        )
        .unwrap();
        let saved = credits.record_payment(&id, &update).await.unwrap();

        assert_eq!(saved.remaining_amount.units(), 3000);
        assert_eq!(saved.status, LedgerStatus::Partial);
        assert_eq!(saved.payments.len(), 1);
        assert_eq!(saved.party_name, "Hamza Traders");

        // Debit entries live at a different path.
        assert!(store.ledger(LedgerKind::Debit).get_all().await.unwrap().is_empty());
    }
}
