use std::{collections::HashMap, fs, path::Path};

use log::debug;
use toml::{Table, Value};

use crate::licensing_error::LicensingError;

const DEFAULT_MESSAGES: [(&str, &str); 4] = [
    ("article.licensing.author", "Author"),
    ("article.licensing.created_at", "Posted on"),
    ("article.licensing.updated_at", "Updated on"),
    ("article.licensing.licensed_under", "Licensed under"),
];

/// Messages by dotted key, loaded from a toml locale file
///
/// ```toml
/// [article.licensing]
/// author = "Auteur"
/// ```
#[derive(Debug, Clone, Default)]
pub struct Translations {
    messages: HashMap<String, String>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml(input: &str) -> Result<Translations, LicensingError> {
        let table: Table = toml::from_str(input)
            .map_err(|e| LicensingError::translation(e.to_string()))?;
        let mut translations = Translations::new();
        flatten(&table, "", &mut translations.messages)?;
        debug!("Loaded {} translation(s)", translations.messages.len());
        Ok(translations)
    }

    pub fn from_path(path: &Path) -> Result<Translations, LicensingError> {
        let input = fs::read_to_string(path)
            .map_err(|e| LicensingError::from(e).with_context(path.display().to_string()))?;
        Translations::from_toml(&input).map_err(|e| e.with_context(path.display().to_string()))
    }

    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(key.into(), message.into());
    }

    /// Loaded message for `key`, falling back to the built-in english messages
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str).or_else(|| {
            DEFAULT_MESSAGES
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, message)| *message)
        })
    }
}

fn flatten(
    table: &Table,
    prefix: &str,
    messages: &mut HashMap<String, String>,
) -> Result<(), LicensingError> {
    for (key, value) in table {
        let key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::String(message) => {
                messages.insert(key, message.clone());
            }
            Value::Table(table) => flatten(table, &key, messages)?,
            other => {
                return Err(LicensingError::translation(format!(
                    "Expected a string or table for '{key}', found {}",
                    other.type_str()
                )));
            }
        }
    }
    Ok(())
}
