//! The Outta Sight Pizza menu catalog.
//!
//! A fixed, hand-authored list of orderable items grouped into categories.
//! Built once at startup and read-only afterwards: the interpreter grounds
//! its prompt on [`Menu::render_for_prompt`], the fallback matcher scans
//! [`Menu::items`], and order summaries resolve authoritative prices via
//! [`Menu::find_by_id`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while assembling a catalog.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("duplicate menu item id: {0}")]
    DuplicateId(String),
}

/// Size classifier for pizza items. Sides and salads carry none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PizzaSize {
    Slice,
    Small,
    Medium,
    Large,
    Tavern,
}

impl std::fmt::Display for PizzaSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PizzaSize::Slice => "slice",
            PizzaSize::Small => "small",
            PizzaSize::Medium => "medium",
            PizzaSize::Large => "large",
            PizzaSize::Tavern => "tavern",
        };
        f.write_str(s)
    }
}

/// One orderable item with its canonical price and description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<PizzaSize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl MenuItem {
    /// Single prompt line: `- <name> (id: <id>) [| Size: <size>] - $<price>: <description> [| Tags: ...]`.
    fn prompt_line(&self) -> String {
        let size = match &self.size {
            Some(size) => format!(" | Size: {size}"),
            None => String::new(),
        };
        let tags = if self.tags.is_empty() {
            String::new()
        } else {
            format!(" | Tags: {}", self.tags.join(", "))
        };
        format!(
            "- {} (id: {}){} - ${}: {}{}",
            self.name, self.id, size, self.price, self.description, tags
        )
    }
}

/// A titled group of items. Every item belongs to exactly one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategory {
    pub id: String,
    pub title: String,
    pub items: Vec<MenuItem>,
}

/// The full catalog. Immutable after construction; no interior mutability,
/// so a shared reference is safe across any number of concurrent readers.
#[derive(Debug, Clone)]
pub struct Menu {
    categories: Vec<MenuCategory>,
}

impl Menu {
    /// Build a catalog, rejecting duplicate item ids across all categories.
    pub fn new(categories: Vec<MenuCategory>) -> Result<Self, MenuError> {
        let mut seen = std::collections::HashSet::new();
        for item in categories.iter().flat_map(|c| c.items.iter()) {
            if !seen.insert(item.id.as_str()) {
                return Err(MenuError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self { categories })
    }

    /// The house menu: pies, slices, and extras as sold at the counter.
    pub fn house() -> Self {
        let item = |id: &str,
                    name: &str,
                    description: &str,
                    price: f64,
                    size: Option<PizzaSize>,
                    tags: &[&str]| MenuItem {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price,
            size,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        };

        let categories = vec![
            MenuCategory {
                id: "pies".to_string(),
                title: "Outta Sight Pies".to_string(),
                items: vec![
                    item(
                        "tavern",
                        "Tavern Pie",
                        "Classic thin tavern-style pie with tomato sauce, mozzarella, provolone, parmesan, and oregano.",
                        28.0,
                        Some(PizzaSize::Tavern),
                        &["thin crust", "classic"],
                    ),
                    item(
                        "tomato",
                        "Tomato Pie",
                        "Crispy square pie layered with tomato sauce, aged provolone, pecorino romano, and extra virgin olive oil.",
                        26.0,
                        Some(PizzaSize::Large),
                        &["vegetarian"],
                    ),
                    item(
                        "brooklyn",
                        "Brooklyn Bridge",
                        "Large round pie topped with pepperoni cups, fresh mozzarella, pickled chiles, hot honey, and basil.",
                        32.0,
                        Some(PizzaSize::Large),
                        &["spicy", "pepperoni"],
                    ),
                    item(
                        "veg",
                        "Green Room",
                        "Vegetable-forward pie with roasted mushrooms, charred scallions, spinach, and whipped ricotta.",
                        30.0,
                        Some(PizzaSize::Large),
                        &["vegetarian"],
                    ),
                ],
            },
            MenuCategory {
                id: "slices".to_string(),
                title: "By The Slice".to_string(),
                items: vec![
                    item(
                        "tavern-slice",
                        "Tavern Slice",
                        "A single slice of the tavern pie.",
                        5.0,
                        Some(PizzaSize::Slice),
                        &[],
                    ),
                    item(
                        "grandma-slice",
                        "Grandma Slice",
                        "Thick square slice with rich tomato sauce and mozzarella.",
                        6.0,
                        Some(PizzaSize::Slice),
                        &[],
                    ),
                ],
            },
            MenuCategory {
                id: "extras".to_string(),
                title: "Salads & Extras".to_string(),
                items: vec![
                    item(
                        "caesar",
                        "Caesar Salad",
                        "Romaine, parmesan, garlic croutons, anchovy dressing.",
                        14.0,
                        None,
                        &[],
                    ),
                    item(
                        "meatballs",
                        "House Meatballs",
                        "Braised beef and pork meatballs with marinara and ricotta.",
                        16.0,
                        None,
                        &[],
                    ),
                ],
            },
        ];

        // Ids are fixed above; uniqueness is asserted by a test through `new`.
        Self { categories }
    }

    /// All categories in display order.
    pub fn categories(&self) -> &[MenuCategory] {
        &self.categories
    }

    /// All items across categories, in catalog order.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    /// Look up one item by id across all categories.
    pub fn find_by_id(&self, id: &str) -> Option<&MenuItem> {
        self.items().find(|item| item.id == id)
    }

    /// Plain-text catalog rendering used to ground the model prompt.
    ///
    /// One category block per paragraph: the title on its own line, then one
    /// `- <name> (id: <id>) ...` line per item. The exact format is a
    /// compatibility-sensitive contract with the model prompt; it must stay
    /// byte-stable across calls.
    pub fn render_for_prompt(&self) -> String {
        self.categories
            .iter()
            .map(|category| {
                let items = category
                    .items
                    .iter()
                    .map(MenuItem::prompt_line)
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("{}:\n{}", category.title, items)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn house_catalog_has_unique_ids() {
        let menu = Menu::house();
        assert!(Menu::new(menu.categories().to_vec()).is_ok());
    }

    #[test]
    fn duplicate_id_rejected() {
        let menu = Menu::house();
        let mut categories = menu.categories().to_vec();
        let dup = categories[0].items[0].clone();
        categories[1].items.push(dup);
        let err = Menu::new(categories).unwrap_err();
        assert!(matches!(err, MenuError::DuplicateId(id) if id == "tavern"));
    }

    #[test]
    fn find_by_id_resolves_across_categories() {
        let menu = Menu::house();
        assert_eq!(menu.find_by_id("tavern").unwrap().name, "Tavern Pie");
        assert_eq!(menu.find_by_id("caesar").unwrap().price, 14.0);
        assert!(menu.find_by_id("calzone").is_none());
    }

    #[test]
    fn items_walks_catalog_in_order() {
        let menu = Menu::house();
        let ids: Vec<&str> = menu.items().map(|i| i.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "tavern",
                "tomato",
                "brooklyn",
                "veg",
                "tavern-slice",
                "grandma-slice",
                "caesar",
                "meatballs",
            ]
        );
    }

    #[test]
    fn render_opens_with_pies_block() {
        let rendered = Menu::house().render_for_prompt();
        let mut lines = rendered.lines();
        assert_eq!(lines.next(), Some("Outta Sight Pies:"));
        assert_eq!(
            lines.next(),
            Some(
                "- Tavern Pie (id: tavern) | Size: tavern - $28: Classic thin \
                 tavern-style pie with tomato sauce, mozzarella, provolone, \
                 parmesan, and oregano. | Tags: thin crust, classic"
            )
        );
    }

    #[test]
    fn render_omits_absent_size_and_tags() {
        let rendered = Menu::house().render_for_prompt();
        assert!(rendered.contains(
            "- Caesar Salad (id: caesar) - $14: Romaine, parmesan, garlic croutons, anchovy dressing."
        ));
    }

    #[test]
    fn render_prints_whole_dollar_prices_without_decimals() {
        let rendered = Menu::house().render_for_prompt();
        assert!(rendered.contains("$28:"));
        assert!(!rendered.contains("$28.00"));
    }

    #[test]
    fn render_separates_categories_with_blank_line() {
        let rendered = Menu::house().render_for_prompt();
        assert!(rendered.contains("\n\nBy The Slice:\n"));
        assert!(rendered.contains("\n\nSalads & Extras:\n"));
    }

    #[test]
    fn render_is_byte_stable() {
        let menu = Menu::house();
        assert_eq!(menu.render_for_prompt(), menu.render_for_prompt());
    }
}
