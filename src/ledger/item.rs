use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Document;

use super::LedgerError;

/// A stock-keeping item with per-residence quantities.
///
/// `total_stock` is derived: every mutation recomputes it from
/// `stock_by_residence`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Document)]
#[document(collection = "items")]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name_en: String,
    pub name_ar: String,
    pub category: String,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifespan_days: Option<u32>,
    #[serde(default)]
    pub stock_by_residence: BTreeMap<String, i64>,
    #[serde(default)]
    pub total_stock: i64,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        name_en: impl Into<String>,
        name_ar: impl Into<String>,
        category: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name_en: name_en.into(),
            name_ar: name_ar.into(),
            category: category.into(),
            unit: unit.into(),
            lifespan_days: None,
            stock_by_residence: BTreeMap::new(),
            total_stock: 0,
        }
    }

    pub fn with_lifespan_days(mut self, days: u32) -> Self {
        self.lifespan_days = Some(days);
        self
    }

    /// Seed a residence quantity directly, bypassing the ledger.
    ///
    /// A total that would overflow is left as it was.
    pub fn with_stock(mut self, residence_id: impl Into<String>, quantity: i64) -> Self {
        self.stock_by_residence.insert(residence_id.into(), quantity);
        if let Some(total) = self.checked_total() {
            self.total_stock = total;
        }
        self
    }

    pub fn stock_at(&self, residence_id: &str) -> i64 {
        self.stock_by_residence
            .get(residence_id)
            .copied()
            .unwrap_or(0)
    }

    /// Apply a signed delta to one residence and recompute the total.
    /// Returns the residence's new quantity.
    ///
    /// On overflow the item is left untouched.
    pub fn apply_delta(&mut self, residence_id: &str, delta: i64) -> Result<i64, LedgerError> {
        let updated = self
            .stock_at(residence_id)
            .checked_add(delta)
            .ok_or_else(|| LedgerError::overflow(&self.id, residence_id))?;
        let previous = self
            .stock_by_residence
            .insert(residence_id.to_string(), updated);

        match self.checked_total() {
            Some(total) => {
                self.total_stock = total;
                Ok(updated)
            }
            None => {
                match previous {
                    Some(quantity) => self
                        .stock_by_residence
                        .insert(residence_id.to_string(), quantity),
                    None => self.stock_by_residence.remove(residence_id),
                };
                Err(LedgerError::overflow(&self.id, residence_id))
            }
        }
    }

    /// Recompute `total_stock`; returns true when it had drifted.
    pub fn recompute_total(&mut self) -> Result<bool, LedgerError> {
        let total = self
            .checked_total()
            .ok_or_else(|| LedgerError::overflow(&self.id, "all residences"))?;
        let drifted = total != self.total_stock;
        self.total_stock = total;
        Ok(drifted)
    }

    fn checked_total(&self) -> Option<i64> {
        self.stock_by_residence
            .values()
            .try_fold(0_i64, |total, quantity| total.checked_add(*quantity))
    }

    /// Clamp negative residence entries to zero.
    ///
    /// Returns `(residence_id, amount_added)` for each clamped entry.
    pub fn clamp_negative(&mut self) -> Result<Vec<(String, i64)>, LedgerError> {
        let mut clamped = Vec::new();
        for (residence_id, quantity) in self.stock_by_residence.iter() {
            if *quantity < 0 {
                let added = quantity
                    .checked_neg()
                    .ok_or_else(|| LedgerError::overflow(&self.id, residence_id))?;
                clamped.push((residence_id.clone(), added));
            }
        }
        for (residence_id, _) in &clamped {
            self.stock_by_residence.insert(residence_id.clone(), 0);
        }
        self.recompute_total()?;
        Ok(clamped)
    }
}
