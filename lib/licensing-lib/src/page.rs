use std::{fs, path::Path};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, de::Error as _};

use crate::{licensing_error::LicensingError, site_config::SiteConfig};

/// The article a licensing block is rendered for
///
/// ```toml
/// title = "Hello World"
/// path = "2024/01/01/hello-world/index.html"
/// date = 2024-01-01
/// updated = "2024-02-01T10:00:00+01:00"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Page {
    pub title: Option<String>,
    pub permalink: Option<String>,
    /// Path relative to the site url, used when there is no permalink
    pub path: Option<String>,
    pub author: Option<String>,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "deserialize_date")]
    pub updated: Option<DateTime<Utc>>,
}

impl Page {
    pub fn from_toml(input: &str) -> Result<Page, LicensingError> {
        toml::from_str(input).map_err(|e| LicensingError::page(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Page, LicensingError> {
        let input = fs::read_to_string(path)
            .map_err(|e| LicensingError::from(e).with_context(path.display().to_string()))?;
        Page::from_toml(&input).map_err(|e| e.with_context(path.display().to_string()))
    }

    /// The full url of this page, either given or made from the site url and page path
    pub fn permalink(&self, config: &SiteConfig) -> Result<String, LicensingError> {
        if let Some(permalink) = &self.permalink {
            return Ok(permalink.clone());
        }
        match &self.path {
            Some(path) => Ok(format!(
                "{}/{}",
                config.url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )),
            None => Err(LicensingError::page("Page has no permalink or path")),
        }
    }
}

/// Dates are either toml datetimes or strings
fn deserialize_date<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let input = match toml::Value::deserialize(d)? {
        toml::Value::String(s) => s,
        toml::Value::Datetime(datetime) => datetime.to_string(),
        other => {
            return Err(D::Error::custom(format!(
                "expected a date, found {}",
                other.type_str()
            )));
        }
    };
    parse_date_string(&input).map(Some).map_err(D::Error::custom)
}

pub fn parse_date_string(input: &str) -> Result<DateTime<Utc>, LicensingError> {
    // "2025-05-08T14:30:00+02:00"
    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Ok(datetime.with_timezone(&Utc));
    }

    // "2025-05-08T14:30:00"
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    for format in ["%Y-%m-%e", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
        }
    }

    Err(LicensingError::date(format!("Unknown date format: {input}")))
}
