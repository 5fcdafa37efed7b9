//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use dc_core::MealType;

/// Daycare attendance and meal tracker.
///
/// Tracks which children are currently present, when they arrived and left,
/// and what they ate.
#[derive(Debug, Parser)]
#[command(name = "dc", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage the child directory.
    Child {
        #[command(subcommand)]
        action: ChildAction,
    },

    /// Check a child in.
    CheckIn {
        /// The child's directory id.
        child_id: i64,

        /// Drop-off notes.
        #[arg(long)]
        notes: Option<String>,
    },

    /// Check a child out.
    CheckOut {
        /// The attendance record id returned by check-in.
        attendance_id: i64,

        /// Pick-up notes; replaces the stored notes when given.
        #[arg(long)]
        notes: Option<String>,
    },

    /// Show a child's attendance history.
    Attendance {
        /// The child's directory id.
        child_id: i64,

        /// Restrict to one day (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,

        /// Output JSONL instead of a listing.
        #[arg(long)]
        json: bool,
    },

    /// List the children currently checked in.
    Present {
        /// Output JSONL instead of a listing.
        #[arg(long)]
        json: bool,
    },

    /// Record a meal.
    Meal {
        /// The child's directory id.
        child_id: i64,

        /// breakfast, lunch, snack or dinner.
        #[arg(long)]
        meal_type: MealType,

        /// What was served.
        #[arg(long)]
        description: String,

        /// How much was eaten: none, some, half, most, full or free text.
        #[arg(long)]
        amount: String,

        /// When the meal was served (YYYY-MM-DD or RFC 3339); defaults to now.
        #[arg(long)]
        date: Option<String>,

        /// Additional notes.
        #[arg(long)]
        notes: Option<String>,
    },

    /// Show a child's meal history.
    Meals {
        /// The child's directory id.
        child_id: i64,

        /// Restrict to one day (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,

        /// Restrict to one meal type.
        #[arg(long)]
        meal_type: Option<MealType>,

        /// Output JSONL instead of a listing.
        #[arg(long)]
        json: bool,
    },

    /// Show all meals for one day, grouped by child.
    Daily {
        /// The day to report (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Output JSONL instead of a listing.
        #[arg(long)]
        json: bool,
    },

    /// Show database status.
    Status,
}

/// Child directory actions.
#[derive(Debug, Subcommand)]
pub enum ChildAction {
    /// Add a child to the directory.
    Add(ChildAddArgs),

    /// List the directory.
    List {
        /// Output JSONL instead of a listing.
        #[arg(long)]
        json: bool,
    },

    /// Show one child's profile.
    Show {
        /// The child's directory id.
        child_id: i64,
    },

    /// Update profile fields.
    Update(ChildUpdateArgs),
}

/// Arguments for `dc child add`.
#[derive(Debug, Args)]
pub struct ChildAddArgs {
    /// The child's name.
    #[arg(long)]
    pub name: String,

    /// Date of birth (YYYY-MM-DD).
    #[arg(long)]
    pub birthdate: String,

    /// Guardian's name.
    #[arg(long)]
    pub guardian: String,

    /// Guardian's phone number.
    #[arg(long)]
    pub phone: String,

    /// Guardian's email address.
    #[arg(long)]
    pub email: String,

    /// Emergency contact name.
    #[arg(long)]
    pub emergency_contact: String,

    /// Emergency contact phone number.
    #[arg(long)]
    pub emergency_phone: String,
}

/// Arguments for `dc child update`. Only provided fields change.
#[derive(Debug, Args)]
pub struct ChildUpdateArgs {
    /// The child's directory id.
    pub child_id: i64,

    /// New name.
    #[arg(long)]
    pub name: Option<String>,

    /// New date of birth (YYYY-MM-DD).
    #[arg(long)]
    pub birthdate: Option<String>,

    /// New guardian name.
    #[arg(long)]
    pub guardian: Option<String>,

    /// New guardian phone number.
    #[arg(long)]
    pub phone: Option<String>,

    /// New guardian email address.
    #[arg(long)]
    pub email: Option<String>,

    /// New emergency contact name.
    #[arg(long)]
    pub emergency_contact: Option<String>,

    /// New emergency contact phone number.
    #[arg(long)]
    pub emergency_phone: Option<String>,
}
