//! Child directory commands.

use std::io::Write;

use anyhow::{Context, Result};

use dc_core::{ChildUpdate, NewChild, parse_day};
use dc_db::{Child, Database};

use crate::{ChildAddArgs, ChildUpdateArgs};

/// One listing line for the directory.
fn format_line(child: &Child) -> String {
    format!(
        "[{}] {}, born {}, guardian {} ({})",
        child.id, child.name, child.date_of_birth, child.guardian_name, child.guardian_phone
    )
}

/// Adds a child to the directory.
pub fn add<W: Write>(writer: &mut W, db: &mut Database, args: &ChildAddArgs) -> Result<()> {
    let birthdate = parse_day(&args.birthdate)?;
    let draft = NewChild::new(
        args.name.as_str(),
        birthdate,
        args.guardian.as_str(),
        args.phone.as_str(),
        args.email.as_str(),
        args.emergency_contact.as_str(),
        args.emergency_phone.as_str(),
    )?;
    let child = db.add_child(&draft)?;
    writeln!(writer, "Added {} (child {})", child.name, child.id)?;
    Ok(())
}

/// Lists the whole directory.
pub fn list<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let children = db.list_children()?;

    if json {
        for child in &children {
            writeln!(writer, "{}", serde_json::to_string(child)?)?;
        }
        return Ok(());
    }

    if children.is_empty() {
        writeln!(writer, "No children in the directory.")?;
        return Ok(());
    }
    for child in &children {
        writeln!(writer, "{}", format_line(child))?;
    }
    Ok(())
}

/// Shows one child's full profile.
pub fn show<W: Write>(writer: &mut W, db: &Database, child_id: i64) -> Result<()> {
    let child = db
        .child(child_id)?
        .with_context(|| format!("child {child_id} not found"))?;
    writeln!(writer, "{} (child {})", child.name, child.id)?;
    writeln!(writer, "Born: {}", child.date_of_birth)?;
    writeln!(
        writer,
        "Guardian: {} ({}, {})",
        child.guardian_name, child.guardian_phone, child.guardian_email
    )?;
    writeln!(
        writer,
        "Emergency: {} ({})",
        child.emergency_contact, child.emergency_phone
    )?;
    Ok(())
}

/// Applies a partial profile update.
pub fn update<W: Write>(writer: &mut W, db: &mut Database, args: &ChildUpdateArgs) -> Result<()> {
    let update = ChildUpdate {
        name: args.name.clone(),
        date_of_birth: args.birthdate.as_deref().map(parse_day).transpose()?,
        guardian_name: args.guardian.clone(),
        guardian_phone: args.phone.clone(),
        guardian_email: args.email.clone(),
        emergency_contact: args.emergency_contact.clone(),
        emergency_phone: args.emergency_phone.clone(),
    };
    update.validate()?;
    let child = db.update_child(args.child_id, &update)?;
    writeln!(writer, "Updated {} (child {})", child.name, child.id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::child_draft;

    use super::*;

    fn add_args(name: &str) -> ChildAddArgs {
        ChildAddArgs {
            name: name.to_string(),
            birthdate: "2020-06-01".to_string(),
            guardian: "Sarah Johnson".to_string(),
            phone: "555-0101".to_string(),
            email: "sarah@example.com".to_string(),
            emergency_contact: "Mike Johnson".to_string(),
            emergency_phone: "555-0102".to_string(),
        }
    }

    fn update_args(child_id: i64) -> ChildUpdateArgs {
        ChildUpdateArgs {
            child_id,
            name: None,
            birthdate: None,
            guardian: None,
            phone: None,
            email: None,
            emergency_contact: None,
            emergency_phone: None,
        }
    }

    #[test]
    fn add_then_show_round_trips() {
        let mut db = Database::open_in_memory().unwrap();

        let mut output = Vec::new();
        add(&mut output, &mut db, &add_args("Alice Johnson")).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Added Alice Johnson (child 1)\n"
        );

        let mut output = Vec::new();
        show(&mut output, &db, 1).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Alice Johnson (child 1)\n"));
        assert!(output.contains("Born: 2020-06-01"));
        assert!(output.contains("Guardian: Sarah Johnson (555-0101, sarah@example.com)"));
    }

    #[test]
    fn add_rejects_malformed_email() {
        let mut db = Database::open_in_memory().unwrap();
        let mut args = add_args("Alice Johnson");
        args.email = "not-an-address".to_string();

        let mut output = Vec::new();
        let err = add(&mut output, &mut db, &args).unwrap_err();
        assert_eq!(err.to_string(), "invalid email address: not-an-address");
        assert!(db.list_children().unwrap().is_empty());
    }

    #[test]
    fn show_unknown_child_fails_with_context() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        let err = show(&mut output, &db, 5).unwrap_err();
        assert_eq!(err.to_string(), "child 5 not found");
    }

    #[test]
    fn update_changes_only_provided_fields() {
        let mut db = Database::open_in_memory().unwrap();
        let stored = db.add_child(&child_draft("Alice Johnson")).unwrap();

        let mut args = update_args(stored.id);
        args.phone = Some("555-9999".to_string());
        let mut output = Vec::new();
        update(&mut output, &mut db, &args).unwrap();

        let child = db.child(stored.id).unwrap().unwrap();
        assert_eq!(child.guardian_phone, "555-9999");
        assert_eq!(child.name, stored.name);
    }

    #[test]
    fn update_validates_before_the_store() {
        let mut db = Database::open_in_memory().unwrap();
        let stored = db.add_child(&child_draft("Alice Johnson")).unwrap();

        let mut args = update_args(stored.id);
        args.name = Some("   ".to_string());
        let mut output = Vec::new();
        let err = update(&mut output, &mut db, &args).unwrap_err();
        assert_eq!(err.to_string(), "name cannot be empty");

        let child = db.child(stored.id).unwrap().unwrap();
        assert_eq!(child.name, "Alice Johnson");
    }

    #[test]
    fn list_is_ordered_by_name() {
        let mut db = Database::open_in_memory().unwrap();
        db.add_child(&child_draft("Bob Smith")).unwrap();
        db.add_child(&child_draft("Alice Johnson")).unwrap();

        let mut output = Vec::new();
        list(&mut output, &db, false).unwrap();

        let output = String::from_utf8(output).unwrap();
        let alice = output.find("Alice Johnson").unwrap();
        let bob = output.find("Bob Smith").unwrap();
        assert!(alice < bob);
    }
}
