use super::{LedgerError, MovementKind};

/// A requested stock delta, not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    pub item_id: String,
    pub residence_id: String,
    pub delta: i64,
    pub kind: MovementKind,
    pub reference: String,
    pub location_id: Option<String>,
    pub notes: Option<String>,
}

impl Movement {
    pub fn new(
        item_id: impl Into<String>,
        residence_id: impl Into<String>,
        delta: i64,
        kind: MovementKind,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            residence_id: residence_id.into(),
            delta,
            kind,
            reference: reference.into(),
            location_id: None,
            notes: None,
        }
    }

    pub fn with_location(mut self, location_id: Option<String>) -> Self {
        self.location_id = location_id;
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    fn same_target(&self, other: &Movement) -> bool {
        self.item_id == other.item_id
            && self.residence_id == other.residence_id
            && self.kind == other.kind
            && self.location_id == other.location_id
    }
}

/// Net movements that hit the same item, residence, kind and location.
///
/// Order of first appearance is kept; movements netting to zero are dropped.
pub fn combine(
    movements: impl IntoIterator<Item = Movement>,
) -> Result<Vec<Movement>, LedgerError> {
    let mut combined: Vec<Movement> = Vec::new();
    for movement in movements {
        match combined.iter_mut().find(|m| m.same_target(&movement)) {
            Some(existing) => {
                existing.delta = existing
                    .delta
                    .checked_add(movement.delta)
                    .ok_or_else(|| {
                        LedgerError::overflow(&movement.item_id, &movement.residence_id)
                    })?;
            }
            None => combined.push(movement),
        }
    }
    combined.retain(|m| m.delta != 0);
    Ok(combined)
}
