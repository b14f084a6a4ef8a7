//! # Menu Commands

use clap::{Subcommand, ValueEnum};

use noodle_core::{CoreError, MenuItem, Money};

use super::Output;
use crate::error::AppResult;
use crate::service::TillService;

#[derive(Debug, Subcommand)]
pub enum MenuCommand {
    /// List menu items
    List {
        /// Only items the kitchen can serve now
        #[arg(long, default_value_t = false)]
        available: bool,

        /// Only one menu section
        #[arg(long)]
        category: Option<String>,

        /// Name contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a menu item, or replace the one with the same id
    Add {
        id: String,
        name: String,
        /// Price, e.g. 45 or 45.50
        price: String,

        #[arg(long, default_value = "Noodles")]
        category: String,

        /// Add it switched off
        #[arg(long, default_value_t = false)]
        unavailable: bool,
    },
    /// Mark an item sold out (off) or back on the menu (on)
    Avail { id: String, state: Switch },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

pub async fn run(command: MenuCommand, service: &TillService, out: &Output) -> AppResult<()> {
    match command {
        MenuCommand::List {
            available,
            category,
            search,
        } => {
            let catalog = service.menu().await?;
            let items: Vec<&MenuItem> = match &search {
                Some(fragment) => catalog.search(fragment),
                None => catalog.items().iter().collect(),
            };
            let items: Vec<&MenuItem> = items
                .into_iter()
                .filter(|item| !available || item.is_available)
                .filter(|item| {
                    category
                        .as_deref()
                        .map_or(true, |c| item.category.eq_ignore_ascii_case(c))
                })
                .collect();

            out.emit(&items, || render_menu(&items, out))
        }
        MenuCommand::Add {
            id,
            name,
            price,
            category,
            unavailable,
        } => {
            let price = Money::parse(&price).map_err(CoreError::from)?;
            let item = MenuItem::new(id, name, price, category).with_availability(!unavailable);
            let saved = service.upsert_menu_item(item).await?;

            out.emit(&saved, || {
                format!("Saved {} ({}) at {}", saved.name, saved.id, out.money(saved.price))
            })
        }
        MenuCommand::Avail { id, state } => {
            let item = service.set_availability(&id, state == Switch::On).await?;
            out.emit(&item, || {
                let word = if item.is_available { "available" } else { "sold out" };
                format!("{} ({}) is now {}", item.name, item.id, word)
            })
        }
    }
}

/// One line per item, grouped under category headings.
pub fn render_menu(items: &[&MenuItem], out: &Output) -> String {
    if items.is_empty() {
        return "No menu items.".to_string();
    }

    let mut categories: Vec<&str> = Vec::new();
    for item in items {
        if !categories.contains(&item.category.as_str()) {
            categories.push(&item.category);
        }
    }

    let mut text = String::new();
    for category in categories {
        text.push_str(&format!("{}\n", category));
        for item in items.iter().filter(|i| i.category == category) {
            let flag = if item.is_available { "" } else { "  (sold out)" };
            text.push_str(&format!(
                "  {:<18} {:<28} {:>10}{}\n",
                item.id,
                item.name,
                out.money(item.price),
                flag
            ));
        }
    }
    text.trim_end().to_string()
}
