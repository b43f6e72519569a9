//! Static category taxonomy
//!
//! The keyword table is an ordered slice: classification ties resolve to the
//! entry that appears first, so reordering rows changes classifier output.
//! The category→group map is kept separate from the keyword table because it
//! names groups for categories that have no keywords (e.g. `Insurance`).

use serde::{Deserialize, Serialize};

/// Category assigned when no keyword matches
pub const DEFAULT_CATEGORY: &str = "Shopping";

/// Glyph shown for categories missing from the table
pub const FALLBACK_GLYPH: &str = "💰";

/// Color shown for categories missing from the table
pub const FALLBACK_COLOR: &str = "#3B82F6";

/// Higher-level grouping of spending categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoryGroup {
    Bills,
    Needs,
    Wants,
    Savings,
}

impl CategoryGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bills => "Bills",
            Self::Needs => "Needs",
            Self::Wants => "Wants",
            Self::Savings => "Savings",
        }
    }
}

impl std::str::FromStr for CategoryGroup {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bills" => Ok(Self::Bills),
            "needs" => Ok(Self::Needs),
            "wants" => Ok(Self::Wants),
            "savings" => Ok(Self::Savings),
            _ => Err(format!("Unknown category group: {}", s)),
        }
    }
}

impl std::fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the keyword table
#[derive(Debug)]
pub struct CategoryDef {
    pub name: &'static str,
    pub glyph: &'static str,
    pub color: &'static str,
    /// Lowercase fragments matched as substrings of a description
    pub keywords: &'static [&'static str],
}

impl CategoryDef {
    pub fn group(&self) -> CategoryGroup {
        group_for(self.name)
    }

    /// Public view of this row (without keywords)
    pub fn info(&self) -> CategoryInfo {
        CategoryInfo {
            name: self.name.to_string(),
            group: self.group(),
            glyph: self.glyph.to_string(),
            color: self.color.to_string(),
        }
    }
}

/// Category as exposed to API callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub name: String,
    pub group: CategoryGroup,
    pub glyph: String,
    pub color: String,
}

pub static CATEGORIES: &[CategoryDef] = &[
    CategoryDef {
        name: "Bills",
        glyph: "🏠",
        color: "#10B981",
        keywords: &[
            "rent",
            "utilities",
            "electricity",
            "water",
            "gas",
            "internet",
            "phone",
            "insurance",
            "mortgage",
            "taxes",
        ],
    },
    CategoryDef {
        name: "Groceries",
        glyph: "🛒",
        color: "#3B82F6",
        keywords: &[
            "grocery",
            "groceries",
            "supermarket",
            "market",
            "food",
            "walmart",
            "costco",
            "trader joe",
            "whole foods",
        ],
    },
    CategoryDef {
        name: "Rent",
        glyph: "🏡",
        color: "#10B981",
        keywords: &["rent", "lease", "landlord"],
    },
    CategoryDef {
        name: "Vacation",
        glyph: "🏖️",
        color: "#A78BFA",
        keywords: &[
            "vacation", "hotel", "airbnb", "flight", "travel", "resort", "beach", "trip",
        ],
    },
    CategoryDef {
        name: "Utilities",
        glyph: "⚡",
        color: "#F59E0B",
        keywords: &["electric", "water", "gas bill", "utility"],
    },
    CategoryDef {
        name: "Dining",
        glyph: "🍽️",
        color: "#EC4899",
        keywords: &[
            "restaurant",
            "cafe",
            "coffee",
            "pizza",
            "burger",
            "sushi",
            "lunch",
            "dinner",
        ],
    },
    CategoryDef {
        name: "Transportation",
        glyph: "🚗",
        color: "#06B6D4",
        keywords: &[
            "uber",
            "lyft",
            "taxi",
            "gas station",
            "petrol",
            "parking",
            "car",
        ],
    },
    CategoryDef {
        name: "Entertainment",
        glyph: "🎬",
        color: "#8B5CF6",
        keywords: &[
            "movie", "cinema", "netflix", "spotify", "gaming", "concert", "game",
        ],
    },
    CategoryDef {
        name: "Shopping",
        glyph: "🛍️",
        color: "#EC4899",
        keywords: &[
            "amazon", "mall", "store", "shop", "clothing", "fashion", "online",
        ],
    },
    CategoryDef {
        name: "Fitness",
        glyph: "💪",
        color: "#06B6D4",
        keywords: &["gym", "fitness", "yoga", "sport", "exercise"],
    },
];

static GROUPS: &[(&str, CategoryGroup)] = &[
    ("Bills", CategoryGroup::Bills),
    ("Rent", CategoryGroup::Bills),
    ("Utilities", CategoryGroup::Bills),
    ("Insurance", CategoryGroup::Bills),
    ("Groceries", CategoryGroup::Needs),
    ("Dining", CategoryGroup::Needs),
    ("Transportation", CategoryGroup::Needs),
    ("Fitness", CategoryGroup::Needs),
    ("Vacation", CategoryGroup::Wants),
    ("Entertainment", CategoryGroup::Wants),
    ("Shopping", CategoryGroup::Wants),
];

/// Group for a category name; unmapped names fall into `Wants`
pub fn group_for(name: &str) -> CategoryGroup {
    GROUPS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, g)| *g)
        .unwrap_or(CategoryGroup::Wants)
}

/// Look up a table row by name (case-insensitive)
pub fn find(name: &str) -> Option<&'static CategoryDef> {
    let name = name.trim();
    CATEGORIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
}

pub fn glyph_for(name: &str) -> &'static str {
    find(name).map(|c| c.glyph).unwrap_or(FALLBACK_GLYPH)
}

pub fn color_for(name: &str) -> &'static str {
    find(name).map(|c| c.color).unwrap_or(FALLBACK_COLOR)
}

/// The whole table in definition order
pub fn all() -> Vec<CategoryInfo> {
    CATEGORIES.iter().map(CategoryDef::info).collect()
}
