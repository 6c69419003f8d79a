use serde::{Deserialize, Serialize};

use crate::Document;

/// A residence that holds stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Document)]
#[serde(rename_all = "camelCase")]
pub struct Residence {
    pub id: String,
    pub name: String,
}

impl Residence {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
