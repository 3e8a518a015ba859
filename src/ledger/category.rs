use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Categorises subscriptions for grouping and reporting.
///
/// The set is closed; values persisted before a format change that no longer
/// resolve fall back to [`Category::Other`] instead of failing the load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Category {
    Streaming,
    Music,
    Software,
    Gaming,
    Fitness,
    Shopping,
    Cloud,
    Other,
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(Category::Other)
    }
}

impl Category {
    /// Every category in display order. Grouping ties resolve in this order.
    pub const ALL: [Category; 8] = [
        Category::Streaming,
        Category::Music,
        Category::Software,
        Category::Gaming,
        Category::Fitness,
        Category::Shopping,
        Category::Cloud,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Streaming => "Streaming",
            Category::Music => "Music",
            Category::Software => "Software",
            Category::Gaming => "Gaming",
            Category::Fitness => "Fitness",
            Category::Shopping => "Shopping",
            Category::Cloud => "Cloud",
            Category::Other => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Streaming => "▶",
            Category::Music => "♫",
            Category::Software => "⌘",
            Category::Gaming => "◈",
            Category::Fitness => "◎",
            Category::Shopping => "◇",
            Category::Cloud => "⬡",
            Category::Other => "●",
        }
    }

    /// Accent color as an RGB triple.
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Category::Streaming => (225, 29, 72),
            Category::Music => (124, 58, 237),
            Category::Software => (37, 99, 235),
            Category::Gaming => (22, 163, 74),
            Category::Fitness => (234, 88, 12),
            Category::Shopping => (219, 39, 119),
            Category::Cloud => (8, 145, 178),
            Category::Other => (107, 114, 128),
        }
    }

    /// Stable identifier used in persisted data and command arguments.
    pub fn id(&self) -> &'static str {
        match self {
            Category::Streaming => "streaming",
            Category::Music => "music",
            Category::Software => "software",
            Category::Gaming => "gaming",
            Category::Fitness => "fitness",
            Category::Shopping => "shopping",
            Category::Cloud => "cloud",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.id() == needle)
            .ok_or_else(|| format!("unknown category `{}`", value.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn unknown_persisted_value_falls_back_to_other() {
        let parsed: Category = serde_json::from_str("\"vpn\"").unwrap();
        assert_eq!(parsed, Category::Other);
    }

    #[test]
    fn known_values_round_trip() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            let back: Category = serde_json::from_str(&json).unwrap();
            assert_eq!(back, category);
        }
    }

    #[test]
    fn parses_user_input_case_insensitively() {
        assert_eq!("Streaming".parse::<Category>().unwrap(), Category::Streaming);
        assert_eq!(" cloud ".parse::<Category>().unwrap(), Category::Cloud);
        assert!("unknown".parse::<Category>().is_err());
    }
}
