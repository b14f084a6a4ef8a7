//! # Menu Catalog
//!
//! The immutable set of purchasable items, keyed by id.
//!
//! A catalog is built once from whatever the repository returns and then only
//! read. Building rejects invalid items and duplicate ids, so every lookup
//! afterwards can trust the data.
//!
//! ```rust
//! use noodle_core::{MenuCatalog, MenuItem, Money};
//!
//! let catalog = MenuCatalog::new(vec![
//!     MenuItem::new("pancit-canton", "Pancit Canton", Money::from_cents(2500), "Noodles"),
//!     MenuItem::new("lomi", "Lomi", Money::from_cents(3000), "Noodles"),
//! ])
//! .unwrap();
//!
//! assert_eq!(catalog.len(), 2);
//! assert_eq!(catalog.require("lomi").unwrap().name, "Lomi");
//! ```

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::MenuItem;
use crate::validation::ValidationResult;

/// Immutable menu, preserving the order items were supplied in.
#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    items: Vec<MenuItem>,
    index: HashMap<String, usize>,
}

impl MenuCatalog {
    /// Builds a catalog, validating every item.
    ///
    /// ## Errors
    /// - Any item failing [`MenuItem::validate`]
    /// - Two items sharing an id ([`ValidationError::Duplicate`])
    pub fn new(items: Vec<MenuItem>) -> ValidationResult<Self> {
        let mut index = HashMap::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            item.validate()?;
            if index.insert(item.id.clone(), position).is_some() {
                return Err(ValidationError::Duplicate {
                    field: "menu item id".to_string(),
                    value: item.id.clone(),
                });
            }
        }

        Ok(MenuCatalog { items, index })
    }

    /// Looks up an item by id.
    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    /// Looks up an item by id, failing with `MenuItemNotFound`.
    pub fn require(&self, id: &str) -> CoreResult<&MenuItem> {
        self.get(id)
            .ok_or_else(|| CoreError::MenuItemNotFound(id.to_string()))
    }

    /// All items in menu order.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Items the kitchen can currently serve.
    pub fn available(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.iter().filter(|item| item.is_available)
    }

    /// Items in one menu section (case-insensitive).
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a MenuItem> {
        self.items
            .iter()
            .filter(move |item| item.category.eq_ignore_ascii_case(category))
    }

    /// Distinct categories in the order they first appear on the menu.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for item in &self.items {
            if !seen.contains(&item.category.as_str()) {
                seen.push(item.category.as_str());
            }
        }
        seen
    }

    /// Items whose name contains `fragment` (case-insensitive).
    pub fn search(&self, fragment: &str) -> Vec<&MenuItem> {
        let needle = fragment.trim().to_lowercase();
        if needle.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
