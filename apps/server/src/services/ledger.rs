//! Credit (receivable) and debit (payable) ledgers.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use loom_core::ledger::{self, NewPayment};
use loom_core::reports::{self, LedgerSummary};
use loom_core::{LedgerEntry, LedgerKind};
use loom_store::Store;

use crate::error::ApiResult;

/// Validates, derives `remainingAmount` and `status`, and writes the entry.
pub async fn create_entry(
    store: &Store,
    kind: LedgerKind,
    mut entry: LedgerEntry,
) -> ApiResult<LedgerEntry> {
    entry.validate()?;
    entry.prepare_new();
    entry.payments.clear();

    let (id, created) = store.ledger(kind).insert(&entry).await?;
    info!(ledger = %kind, id = %id, amount = created.amount.units(), "Ledger entry created");
    Ok(created)
}

/// Applies one payment. The read and the write are separate calls, so two
/// payments recorded at the same moment can overwrite each other.
pub async fn record_payment(
    store: &Store,
    kind: LedgerKind,
    id: &str,
    payment: &NewPayment,
    now: DateTime<Utc>,
) -> ApiResult<LedgerEntry> {
    let entries = store.ledger(kind);
    let entry = entries.require(id).await?;

    let update = ledger::apply_payment(&entry, payment, now)?;
    let updated = entries.record_payment(id, &update).await?;

    info!(
        ledger = %kind,
        id = %id,
        amount = payment.amount.units(),
        remaining = updated.remaining_amount.units(),
        status = ?updated.status,
        "Ledger payment recorded"
    );
    Ok(updated)
}

/// Entries with their status as of `today` (past-due reads as overdue).
pub async fn list_entries(
    store: &Store,
    kind: LedgerKind,
    today: NaiveDate,
) -> ApiResult<Vec<LedgerEntry>> {
    let mut entries = store.ledger(kind).get_all().await?;
    for entry in &mut entries {
        entry.status = entry.effective_status(today);
    }
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(entries)
}

pub async fn summary(store: &Store, kind: LedgerKind, today: NaiveDate) -> ApiResult<LedgerSummary> {
    let entries = store.ledger(kind).get_all().await?;
    Ok(reports::ledger_summary(&entries, today))
}
