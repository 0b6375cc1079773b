use std::collections::HashMap;
use std::env;
use std::fs;

use crate::error::AgendoError;
use crate::models::category::CategoryRegistry;

/// Flat key=value configuration, loaded from the file named by `CONFIG_FILE`
/// (or `--config`), with process environment variables as fallback per key.
///
/// Recognized keys:
///   CALENDAR_TOKEN - bearer token for the calendar API (required)
///   CALENDAR_ID    - calendar to write to (default "primary")
///   CATEGORIES     - comma-separated name=color pairs, e.g. "work=red,lunch=yellow"
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, AgendoError> {
        let content = fs::read_to_string(path)
            .map_err(|e| AgendoError::Config(format!("Cannot read {}: {}", path, e)))?;
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(AgendoError::Config(format!(
                    "Invalid config line {}: {}",
                    idx + 1,
                    line
                )));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if (value.starts_with('"') && value.ends_with('"') && value.len() >= 2)
                || (value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2)
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .cloned()
            .or_else(|| env::var(key).ok())
    }

    pub fn require(&self, key: &str) -> Result<String, AgendoError> {
        self.get(key)
            .ok_or_else(|| AgendoError::Config(format!("{} is not set", key)))
    }

    pub fn categories(&self) -> Result<CategoryRegistry, AgendoError> {
        match self.get("CATEGORIES") {
            Some(value) => CategoryRegistry::from_config_value(&value).map_err(AgendoError::Config),
            None => Ok(CategoryRegistry::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> std::path::PathBuf {
        let path = env::temp_dir().join(format!("agendo_config_{}", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_key_value_lines() {
        let path = write_config(
            "# comment\nexport CALENDAR_TOKEN=\"tok\"\nCALENDAR_ID = primary\n\nCATEGORIES='work=red'\n",
        );
        let config = AppConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.get("CALENDAR_TOKEN").as_deref(), Some("tok"));
        assert_eq!(config.get("CALENDAR_ID").as_deref(), Some("primary"));
        assert_eq!(config.categories().unwrap().color_for("work"), "red");
    }

    #[test]
    fn rejects_malformed_lines() {
        let path = write_config("CALENDAR_TOKEN tok\n");
        assert!(AppConfig::from_file(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn missing_categories_is_an_empty_registry() {
        let path = write_config("CALENDAR_TOKEN=tok\n");
        let config = AppConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.categories().unwrap().color_for("anything"), "blue");
    }
}
