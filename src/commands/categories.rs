use crate::category::ChatCategory;
use colored::Colorize;
use prettytable::{format, row, Table};

/// Table of every category with its key and description
pub fn categories_table(active: Option<ChatCategory>) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(row!["Key".bold(), "Category".bold(), "Description".bold()]);

    for category in ChatCategory::ALL {
        let key = if Some(category) == active {
            format!("{} *", category.key()).green().to_string()
        } else {
            category.key().cyan().to_string()
        };
        table.add_row(row![key, category, category.description()]);
    }

    table
}

/// Handle `healthchat categories`
pub fn handle_categories() {
    println!("\nTopic categories:");
    categories_table(None).printstd();
    println!();
    println!(
        "Use {} to start in a category.",
        "healthchat chat --category <key>".cyan()
    );
    println!();
}
