//! # Demo Menu
//!
//! The noodle-shop menu used by the `seed` binary and by `till --memory`.

use noodle_core::{MenuItem, Money};

/// (id, name, price in centavos, category)
const MENU: &[(&str, &str, i64, &str)] = &[
    ("pancit-canton", "Pancit Canton", 2500, "Noodles"),
    ("lomi", "Lomi", 3000, "Noodles"),
    ("la-paz-batchoy", "La Paz Batchoy", 4500, "Noodles"),
    ("mami", "Beef Mami", 4000, "Noodles"),
    ("sotanghon", "Sotanghon Guisado", 3500, "Noodles"),
    ("palabok", "Pancit Palabok", 3800, "Noodles"),
    ("siopao", "Siopao Asado", 2000, "Sides"),
    ("lumpia", "Lumpiang Shanghai (5 pcs)", 3000, "Sides"),
    ("iced-tea", "Iced Tea", 1500, "Drinks"),
    ("calamansi", "Calamansi Juice", 1800, "Drinks"),
    ("softdrink", "Soft Drink", 2000, "Drinks"),
];

pub fn demo_menu() -> Vec<MenuItem> {
    MENU.iter()
        .map(|(id, name, cents, category)| {
            MenuItem::new(*id, *name, Money::from_cents(*cents), *category)
        })
        .collect()
}
