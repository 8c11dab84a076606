use std::fmt;

use serde::{Deserialize, Serialize};

/// Key a product is stored under in the text index: its id in decimal form
pub type DocKey = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Footwear,
    #[serde(rename = "Home & Kitchen")]
    HomeAndKitchen,
    Fitness,
    Books,
    Clothing,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Electronics,
        Category::Footwear,
        Category::HomeAndKitchen,
        Category::Fitness,
        Category::Books,
        Category::Clothing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Footwear => "Footwear",
            Category::HomeAndKitchen => "Home & Kitchen",
            Category::Fitness => "Fitness",
            Category::Books => "Books",
            Category::Clothing => "Clothing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub category: Category,
}

impl Product {
    pub fn doc_key(&self) -> DocKey {
        self.id.to_string()
    }
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}
