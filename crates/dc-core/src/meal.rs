//! Meal vocabulary and the validated meal draft.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ValidationError;

/// Returned when parsing an unknown meal type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid meal type: {0}, expected breakfast, lunch, snack or dinner")]
pub struct UnknownMealType(pub String);

/// The kind of meal served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Snack,
    Dinner,
}

impl MealType {
    /// String representation for SQL storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Snack => "snack",
            Self::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MealType {
    type Err = UnknownMealType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "snack" => Ok(Self::Snack),
            "dinner" => Ok(Self::Dinner),
            _ => Err(UnknownMealType(s.to_string())),
        }
    }
}

/// How much of a meal a child ate.
///
/// The store keeps this as free text. Known labels get a closed variant;
/// anything else is carried verbatim as [`ConsumedAmount::Other`] so reports
/// can call it out instead of passing it through unnoticed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConsumedAmount {
    None,
    Some,
    Half,
    Most,
    Full,
    /// A label outside the known vocabulary, stored verbatim.
    Other(String),
}

impl ConsumedAmount {
    /// Interprets a free-text label. Never fails; unknown labels become
    /// [`ConsumedAmount::Other`].
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label {
            "none" => Self::None,
            "some" => Self::Some,
            "half" => Self::Half,
            "most" => Self::Most,
            "full" => Self::Full,
            other => Self::Other(other.to_string()),
        }
    }

    /// The raw label as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Some => "some",
            Self::Half => "half",
            Self::Most => "most",
            Self::Full => "full",
            Self::Other(label) => label,
        }
    }

    /// Human label for reports. Unrecognized values are marked as such.
    #[must_use]
    pub fn display_label(&self) -> Cow<'_, str> {
        match self {
            Self::None => Cow::Borrowed("ate nothing"),
            Self::Some => Cow::Borrowed("ate some"),
            Self::Half => Cow::Borrowed("ate half"),
            Self::Most => Cow::Borrowed("ate most"),
            Self::Full => Cow::Borrowed("finished"),
            Self::Other(label) => Cow::Owned(format!("other ({label:?})")),
        }
    }
}

impl fmt::Display for ConsumedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ConsumedAmount {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<ConsumedAmount> for String {
    fn from(amount: ConsumedAmount) -> Self {
        match amount {
            ConsumedAmount::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// A validated meal to record.
///
/// Construction is the validation boundary: empty descriptions or amount
/// labels never reach the store. `meal_date = None` means "now", resolved
/// by the store at insert time.
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub child_id: i64,
    pub meal_type: MealType,
    pub description: String,
    pub consumed_amount: ConsumedAmount,
    pub meal_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl NewMeal {
    pub fn new(
        child_id: i64,
        meal_type: MealType,
        description: impl Into<String>,
        consumed_amount: &str,
        meal_date: Option<DateTime<Utc>>,
        notes: Option<String>,
    ) -> Result<Self, ValidationError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "description",
            });
        }
        if consumed_amount.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "consumed amount",
            });
        }
        Ok(Self {
            child_id,
            meal_type,
            description,
            consumed_amount: ConsumedAmount::parse(consumed_amount),
            meal_date,
            notes,
        })
    }
}
