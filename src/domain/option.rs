//! User-authored response options.
//!
//! Each event declares an ordered list of [`ResponseOption`]s that act as
//! enum-like keys for attendance responses. Options are tagged records
//! rather than free-form strings so that the capacity flag and display
//! color travel with the label.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Display color for a response option, from a fixed small palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OptionColor {
    /// Green (default for affirmative options).
    Green,
    /// Red (default for negative options).
    Red,
    /// Blue.
    Blue,
    /// Yellow.
    Yellow,
    /// Purple.
    Purple,
}

/// A single response option declared on an event.
///
/// The `label` is both the display text and the matching key: responses
/// reference options by string label equality. Renaming an option orphans
/// historical responses recorded against the old label — they stop being
/// counted but are never rejected (tolerance-of-drift, see
/// [`super::capacity`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResponseOption {
    /// Identifier unique within the parent event's option list.
    pub id: u32,
    /// Display label and matching key.
    pub label: String,
    /// Whether responses with this label count toward event capacity.
    pub counts_to_capacity: bool,
    /// Display color tag.
    pub color: OptionColor,
}

impl ResponseOption {
    /// Creates a new response option.
    #[must_use]
    pub fn new(id: u32, label: impl Into<String>, counts_to_capacity: bool, color: OptionColor) -> Self {
        Self {
            id,
            label: label.into(),
            counts_to_capacity,
            color,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn color_serializes_snake_case() {
        let json = serde_json::to_string(&OptionColor::Green).unwrap_or_default();
        assert_eq!(json, "\"green\"");
    }

    #[test]
    fn option_round_trip() {
        let opt = ResponseOption::new(1, "Going", true, OptionColor::Green);
        let json = serde_json::to_string(&opt).unwrap_or_default();
        let back: Option<ResponseOption> = serde_json::from_str(&json).ok();
        let Some(back) = back else {
            panic!("deserialization failed");
        };
        assert_eq!(back, opt);
    }
}
