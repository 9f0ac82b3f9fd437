//! Domain types representing spending categories.

use serde::{Deserialize, Serialize};

use crate::domain::common::*;
use crate::errors::ValidationError;

/// Groups transactions for statements and charts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub owner: OwnerId,
    pub name: String,
    #[serde(default)]
    pub color: LabelColor,
}

impl Category {
    pub fn new(owner: OwnerId, name: impl Into<String>, color: LabelColor) -> Self {
        Self {
            id: CategoryId::generate(),
            owner,
            name: name.into(),
            color,
        }
    }

    pub fn with_id(mut self, id: impl Into<CategoryId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty("category", "name"));
        }
        Ok(())
    }
}

impl Identifiable for Category {
    type Id = CategoryId;

    fn id(&self) -> &CategoryId {
        &self.id
    }
}

/// Fixed palette a category can be tagged with. Only used to look up display
/// colours and icons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum LabelColor {
    Red,
    Orange,
    Yellow,
    Green,
    Teal,
    Blue,
    Purple,
    Pink,
    #[default]
    Gray,
}

impl LabelColor {
    pub const ALL: [LabelColor; 9] = [
        LabelColor::Red,
        LabelColor::Orange,
        LabelColor::Yellow,
        LabelColor::Green,
        LabelColor::Teal,
        LabelColor::Blue,
        LabelColor::Purple,
        LabelColor::Pink,
        LabelColor::Gray,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            LabelColor::Red => "#E53935",
            LabelColor::Orange => "#FB8C00",
            LabelColor::Yellow => "#FDD835",
            LabelColor::Green => "#43A047",
            LabelColor::Teal => "#00897B",
            LabelColor::Blue => "#1E88E5",
            LabelColor::Purple => "#8E24AA",
            LabelColor::Pink => "#D81B60",
            LabelColor::Gray => "#757575",
        }
    }
}
