/// Category labels and their presentation colors.
///
/// A category is an opaque, case-insensitive label. The registry only decides
/// which color an event gets; an unknown label is still a valid category and
/// falls back to the default color.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub name: String,
    pub color: String,
}

pub const DEFAULT_COLOR: &str = "blue";

impl CategoryRegistry {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Parses the CATEGORIES config value: comma-separated "name=color" pairs,
    /// e.g. "work=red,lunch=yellow,sport=orange".
    pub fn from_config_value(value: &str) -> Result<Self, String> {
        let mut categories = Vec::new();
        for pair in value.split(',').filter(|p| !p.trim().is_empty()) {
            let Some((name, color)) = pair.split_once('=') else {
                return Err(format!("Invalid category entry '{}', expected name=color", pair));
            };
            let color = color.trim().to_lowercase();
            if color_to_id(&color).is_none() {
                return Err(format!("Unknown color '{}' for category '{}'", color, name.trim()));
            }
            categories.push(Category {
                name: name.trim().to_string(),
                color,
            });
        }
        Ok(Self::new(categories))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn color_for(&self, name: &str) -> &str {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.color.as_str())
            .unwrap_or(DEFAULT_COLOR)
    }

    pub fn name_for_color(&self, color: &str) -> &str {
        self.categories
            .iter()
            .find(|c| c.color == color)
            .map(|c| c.name.as_str())
            .unwrap_or("default")
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

// Google Calendar event color ids for the colors we support.
pub fn color_to_id(color: &str) -> Option<&'static str> {
    match color {
        "red" => Some("11"),
        "yellow" => Some("5"),
        "purple" => Some("3"),
        "orange" => Some("6"),
        "blue" => Some("7"),
        _ => None,
    }
}

pub fn id_to_color(color_id: &str) -> &'static str {
    match color_id {
        "11" => "red",
        "5" => "yellow",
        "3" => "purple",
        "6" => "orange",
        _ => "blue",
    }
}
