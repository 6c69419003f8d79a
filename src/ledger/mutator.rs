use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::store::DocumentStore;
use crate::transaction::Transaction;

use super::{combine, InventoryTransaction, Item, LedgerError, Movement};

/// Read an item inside `tx`, mapping absence to [`LedgerError::ItemNotFound`].
pub fn load_item<S: DocumentStore>(
    tx: &mut Transaction<'_, S>,
    item_id: &str,
) -> Result<Item, LedgerError> {
    tx.get::<Item>(item_id)?
        .ok_or_else(|| LedgerError::ItemNotFound(item_id.to_string()))
}

/// Current quantity of `item_id` at `residence_id`.
pub fn available<S: DocumentStore>(
    tx: &mut Transaction<'_, S>,
    item_id: &str,
    residence_id: &str,
) -> Result<i64, LedgerError> {
    Ok(load_item(tx, item_id)?.stock_at(residence_id))
}

/// Check that applying `movements` leaves no touched residence negative.
///
/// Deltas are netted per item and residence first. A pair whose net delta is
/// a decrease must end at zero or above; increases are always accepted, even
/// into a residence that is already negative.
pub fn validate<S: DocumentStore>(
    tx: &mut Transaction<'_, S>,
    movements: &[Movement],
) -> Result<(), LedgerError> {
    let mut net: BTreeMap<(&str, &str), i64> = BTreeMap::new();
    for movement in movements {
        let entry = net
            .entry((movement.item_id.as_str(), movement.residence_id.as_str()))
            .or_insert(0);
        *entry = entry
            .checked_add(movement.delta)
            .ok_or_else(|| LedgerError::overflow(&movement.item_id, &movement.residence_id))?;
    }

    for ((item_id, residence_id), delta) in net {
        let current = available(tx, item_id, residence_id)?;
        let after = current
            .checked_add(delta)
            .ok_or_else(|| LedgerError::overflow(item_id, residence_id))?;
        if delta < 0 && after < 0 {
            return Err(LedgerError::InsufficientStock {
                item_id: item_id.to_string(),
                residence_id: residence_id.to_string(),
                available: current,
                requested: delta.saturating_neg(),
            });
        }
    }
    Ok(())
}

/// Validate and apply `movements`, appending one log row per netted movement.
///
/// Every item is re-read through the transaction, so several movements on
/// the same item compound correctly. Nothing is buffered when validation
/// fails.
pub fn post<S: DocumentStore>(
    tx: &mut Transaction<'_, S>,
    movements: impl IntoIterator<Item = Movement>,
    at: DateTime<Utc>,
) -> Result<Vec<InventoryTransaction>, LedgerError> {
    let movements = combine(movements)?;
    validate(tx, &movements)?;

    let mut records = Vec::with_capacity(movements.len());
    for movement in movements {
        let mut item = load_item(tx, &movement.item_id)?;
        item.apply_delta(&movement.residence_id, movement.delta)?;
        tx.set(&item)?;

        let record = record_for(&movement, at);
        tx.create(&record)?;
        records.push(record);
    }

    Ok(records)
}

/// Validate and apply a single movement.
pub fn apply<S: DocumentStore>(
    tx: &mut Transaction<'_, S>,
    movement: Movement,
    at: DateTime<Utc>,
) -> Result<Option<InventoryTransaction>, LedgerError> {
    Ok(post(tx, [movement], at)?.pop())
}

pub(crate) fn record_for(movement: &Movement, at: DateTime<Utc>) -> InventoryTransaction {
    InventoryTransaction {
        id: Uuid::new_v4().to_string(),
        item_id: movement.item_id.clone(),
        residence_id: movement.residence_id.clone(),
        quantity: movement.delta.saturating_abs(),
        delta: movement.delta,
        kind: movement.kind,
        timestamp: at,
        reference: movement.reference.clone(),
        location_id: movement.location_id.clone(),
        notes: movement.notes.clone(),
    }
}
