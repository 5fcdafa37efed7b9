//! CLI subcommand implementations.

pub mod attendance;
pub mod check_in;
pub mod check_out;
pub mod child;
pub mod daily;
pub mod meal;
pub mod meals;
pub mod present;
pub mod status;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use dc_core::NewChild;

    pub fn child_draft(name: &str) -> NewChild {
        NewChild::new(
            name,
            NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
            "Sarah Johnson",
            "555-0101",
            "sarah@example.com",
            "Mike Johnson",
            "555-0102",
        )
        .unwrap()
    }
}
