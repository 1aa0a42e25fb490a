//! Product categories and their fixed size lists.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const APPAREL_SIZES: &[&str] = &["XS", "S", "M", "L", "XL"];
const JEANS_SIZES: &[&str] = &["28", "29", "30", "31", "32", "33", "34", "35", "36", "37", "38"];
const CAP_SIZES: &[&str] = &["Adjustable"];
const SNEAKER_SIZES: &[&str] = &["21", "22", "23", "24", "25", "26", "27", "28", "29", "30"];

/// Older clients spell the one cap size this way.
const SIZE_ALIASES: &[(&str, &str)] = &[("Ajustable", "Adjustable")];

/// Trims a size label and maps legacy spellings to the stored one.
pub fn canonical_size(raw: &str) -> String {
    let trimmed = raw.trim();
    SIZE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == trimmed)
        .map_or(trimmed, |(_, size)| size)
        .to_string()
}

/// Closed set of catalog categories.
///
/// Wire values are the capitalized names (`"Shirts"`, `"Jeans"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i16)]
pub enum Category {
    Shirts = 0,
    Hoodies = 1,
    Jeans = 2,
    Caps = 3,
    Sneakers = 4,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Shirts,
        Category::Hoodies,
        Category::Jeans,
        Category::Caps,
        Category::Sneakers,
    ];

    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use Category::*;
        match self {
            Shirts => "Shirts",
            Hoodies => "Hoodies",
            Jeans => "Jeans",
            Caps => "Caps",
            Sneakers => "Sneakers",
        }
    }

    /// Valid size labels, in display order.
    pub const fn sizes(&self) -> &'static [&'static str] {
        use Category::*;
        match self {
            Shirts | Hoodies => APPAREL_SIZES,
            Jeans => JEANS_SIZES,
            Caps => CAP_SIZES,
            Sneakers => SNEAKER_SIZES,
        }
    }

    pub fn accepts_size(&self, size: &str) -> bool {
        self.sizes().contains(&size)
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive match on the wire value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(trimmed.to_string()))
    }
}
