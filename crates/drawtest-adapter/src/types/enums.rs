/*
[INPUT]:  Drawing-test service schema and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed drawing categories, in upload slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrawingCategory {
    HouseTreePerson,
    NonexistentAnimal,
    SelfPortrait,
}

impl DrawingCategory {
    pub const ALL: [DrawingCategory; 3] = [
        DrawingCategory::HouseTreePerson,
        DrawingCategory::NonexistentAnimal,
        DrawingCategory::SelfPortrait,
    ];

    /// Slot position of this category
    pub fn index(self) -> usize {
        match self {
            DrawingCategory::HouseTreePerson => 0,
            DrawingCategory::NonexistentAnimal => 1,
            DrawingCategory::SelfPortrait => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            DrawingCategory::HouseTreePerson => "House, tree, person",
            DrawingCategory::NonexistentAnimal => "Nonexistent animal",
            DrawingCategory::SelfPortrait => "Self-portrait",
        }
    }
}

impl fmt::Display for DrawingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self {
            DrawingCategory::HouseTreePerson => "house-tree-person",
            DrawingCategory::NonexistentAnimal => "nonexistent-animal",
            DrawingCategory::SelfPortrait => "self-portrait",
        };
        f.write_str(id)
    }
}

/// Report status as reported by `GET /report/{task_id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteReportStatus {
    Processing,
    Completed,
    Error,
}
