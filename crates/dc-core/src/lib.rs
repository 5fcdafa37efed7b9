//! Core domain logic for the daycare tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Meal vocabulary: meal types and consumed-amount labels
//! - Day windows: half-open per-day intervals and date normalization
//! - Validated input drafts for the meal log and the child directory

pub mod child;
pub mod day;
pub mod meal;
mod types;

pub use child::{ChildUpdate, NewChild};
pub use day::{DayWindow, day_window, parse_day, parse_instant};
pub use meal::{ConsumedAmount, MealType, NewMeal, UnknownMealType};
pub use types::ValidationError;
