//! Maintenance passes over every item.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::DocumentStore;
use crate::transaction::{self, TransactionOptions};

use super::mutator::record_for;
use super::{Item, LedgerError, Movement, MovementKind};

/// Reference written on log rows produced by [`repair_negative_stock`].
pub const REPAIR_REFERENCE: &str = "stock-repair";

/// Outcome of [`repair_negative_stock`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairReport {
    pub items_scanned: usize,
    pub entries_fixed: usize,
    /// Sum of units added back by clamping.
    pub units_restored: i64,
}

/// Outcome of [`recompute_totals`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeReport {
    pub items_scanned: usize,
    pub items_fixed: usize,
}

/// Clamp every negative residence quantity to zero.
///
/// Each clamped entry gets an `ADJUSTMENT` log row carrying the amount added,
/// so the log still sums to the stock map. Running it again on a repaired
/// store changes nothing.
pub fn repair_negative_stock<S: DocumentStore>(
    store: &S,
    options: &TransactionOptions,
    at: DateTime<Utc>,
) -> Result<RepairReport, LedgerError> {
    let report = transaction::run(store, options, |tx| {
        let items = tx.list::<Item>()?;
        let mut report = RepairReport {
            items_scanned: items.len(),
            ..RepairReport::default()
        };

        for mut item in items {
            let clamped = item.clamp_negative()?;
            if clamped.is_empty() {
                continue;
            }
            tx.set(&item)?;

            for (residence_id, added) in clamped {
                let movement = Movement::new(
                    item.id.clone(),
                    residence_id,
                    added,
                    MovementKind::Adjustment,
                    REPAIR_REFERENCE,
                )
                .with_notes(Some("negative stock clamped to zero".to_string()));
                tx.create(&record_for(&movement, at))?;
                report.entries_fixed += 1;
                report.units_restored = report.units_restored.saturating_add(added);
            }
        }
        Ok::<_, LedgerError>(report)
    })?;

    tracing::info!(
        items_scanned = report.items_scanned,
        entries_fixed = report.entries_fixed,
        units_restored = report.units_restored,
        "negative stock repair finished"
    );
    Ok(report)
}

/// Rewrite `totalStock` on every item whose total no longer matches its
/// residence map.
pub fn recompute_totals<S: DocumentStore>(
    store: &S,
    options: &TransactionOptions,
) -> Result<RecomputeReport, LedgerError> {
    let report = transaction::run(store, options, |tx| {
        let items = tx.list::<Item>()?;
        let mut report = RecomputeReport {
            items_scanned: items.len(),
            items_fixed: 0,
        };
        for mut item in items {
            if item.recompute_total()? {
                tx.set(&item)?;
                report.items_fixed += 1;
            }
        }
        Ok::<_, LedgerError>(report)
    })?;

    tracing::info!(
        items_scanned = report.items_scanned,
        items_fixed = report.items_fixed,
        "stock totals recomputed"
    );
    Ok(report)
}
