use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dc_cli::commands::{
    attendance, check_in, check_out, child, daily, meal, meals, present, status,
};
use dc_cli::{ChildAction, Cli, Commands, Config};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(dc_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = dc_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Child { action }) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            match action {
                ChildAction::Add(args) => child::add(&mut stdout, &mut db, args)?,
                ChildAction::List { json } => child::list(&mut stdout, &db, *json)?,
                ChildAction::Show { child_id } => child::show(&mut stdout, &db, *child_id)?,
                ChildAction::Update(args) => child::update(&mut stdout, &mut db, args)?,
            }
        }
        Some(Commands::CheckIn { child_id, notes }) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            check_in::run(&mut stdout, &mut db, *child_id, notes.as_deref())?;
        }
        Some(Commands::CheckOut {
            attendance_id,
            notes,
        }) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            check_out::run(&mut stdout, &mut db, *attendance_id, notes.as_deref())?;
        }
        Some(Commands::Attendance {
            child_id,
            date,
            json,
        }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            attendance::run(&mut stdout, &db, *child_id, date.as_deref(), *json)?;
        }
        Some(Commands::Present { json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            present::run(&mut stdout, &db, *json)?;
        }
        Some(Commands::Meal {
            child_id,
            meal_type,
            description,
            amount,
            date,
            notes,
        }) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            meal::run(
                &mut stdout,
                &mut db,
                *child_id,
                *meal_type,
                description,
                amount,
                date.as_deref(),
                notes.clone(),
            )?;
        }
        Some(Commands::Meals {
            child_id,
            date,
            meal_type,
            json,
        }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            meals::run(
                &mut stdout,
                &db,
                *child_id,
                date.as_deref(),
                *meal_type,
                *json,
            )?;
        }
        Some(Commands::Daily { date, json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            daily::run(&mut stdout, &db, date.as_deref(), *json)?;
        }
        Some(Commands::Status) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            status::run(&mut stdout, &db, &config.database_path)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
