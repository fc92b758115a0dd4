use std::fmt::Write;

use chrono::{DateTime, Locale, Utc};
use log::warn;
use regex::Regex;

use crate::{i18n::Translations, licensing_error::LicensingError, site_config::SiteConfig};

/// Site level services a component needs to turn a page into display values
pub trait Helper {
    /// Localized message for a dotted key
    fn translate(&self, key: &str) -> Result<String, LicensingError>;
    /// Resolve a path against the site
    fn url_for(&self, path: &str) -> Result<String, LicensingError>;
    fn format_date(&self, date: &DateTime<Utc>) -> Result<String, LicensingError>;
}

/// [`Helper`] backed by the site config and loaded translations
pub struct SiteHelper<'a> {
    config: &'a SiteConfig,
    translations: &'a Translations,
    scheme: Regex,
    locale: Locale,
}

impl<'a> SiteHelper<'a> {
    pub fn new(
        config: &'a SiteConfig,
        translations: &'a Translations,
    ) -> Result<SiteHelper<'a>, LicensingError> {
        Ok(SiteHelper {
            config,
            translations,
            scheme: Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:")?,
            locale: locale(&config.language),
        })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }
}

/// Map a site language (`en`, `zh-CN`, `nl_NL`) to a chrono locale
fn locale(language: &str) -> Locale {
    let language = language.replace('-', "_");
    let candidates = match language.split_once('_') {
        Some(_) => vec![language.clone()],
        None if language == "en" => vec!["en_US".to_string()],
        None => vec![
            format!("{language}_{}", language.to_uppercase()),
            language.clone(),
        ],
    };

    for candidate in &candidates {
        if let Ok(locale) = Locale::try_from(candidate.as_str()) {
            return locale;
        }
    }
    warn!("Unknown locale for language '{language}', using POSIX");
    Locale::POSIX
}

impl Helper for SiteHelper<'_> {
    fn translate(&self, key: &str) -> Result<String, LicensingError> {
        self.translations
            .get(key)
            .map(str::to_string)
            .ok_or_else(|| LicensingError::translation(format!("No translation for '{key}'")))
    }

    fn url_for(&self, path: &str) -> Result<String, LicensingError> {
        if self.scheme.is_match(path) || path.starts_with("//") || path.starts_with('#') {
            return Ok(path.to_string());
        }
        Ok(format!(
            "{}{}",
            self.config.root,
            path.trim_start_matches('/')
        ))
    }

    fn format_date(&self, date: &DateTime<Utc>) -> Result<String, LicensingError> {
        let mut formatted = String::new();
        write!(
            formatted,
            "{}",
            date.format_localized(&self.config.date_format, self.locale)
        )
        .map_err(|_| {
            LicensingError::date(format!(
                "Invalid date format '{}'",
                self.config.date_format
            ))
        })?;
        Ok(formatted)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::licensing_error::LicensingErrorKind;

    use super::*;

    fn config(root: &str, language: &str, date_format: &str) -> SiteConfig {
        SiteConfig {
            root: root.into(),
            language: language.into(),
            date_format: date_format.into(),
            ..Default::default()
        }
    }

    #[test]
    fn url_for_joins_root() {
        let config = config("/blog/", "en", "%Y-%m-%d");
        let translations = Translations::new();
        let helper = SiteHelper::new(&config, &translations).unwrap();

        assert_eq!(helper.url_for("/licenses/").unwrap(), "/blog/licenses/");
        assert_eq!(helper.url_for("licenses/").unwrap(), "/blog/licenses/");
        assert_eq!(helper.url_for("").unwrap(), "/blog/");
    }

    #[test]
    fn url_for_keeps_absolute_urls() {
        let config = config("/blog/", "en", "%Y-%m-%d");
        let translations = Translations::new();
        let helper = SiteHelper::new(&config, &translations).unwrap();

        for url in [
            "https://creativecommons.org/licenses/by/4.0/",
            "mailto:lyr@example.com",
            "//cdn.example.com/x",
            "#license",
        ] {
            assert_eq!(helper.url_for(url).unwrap(), url);
        }
    }

    #[test]
    fn translate_uses_loaded_then_default_messages() {
        let config = SiteConfig::default();
        let mut translations = Translations::new();
        translations.insert("article.licensing.author", "Auteur");
        let helper = SiteHelper::new(&config, &translations).unwrap();

        assert_eq!(helper.translate("article.licensing.author").unwrap(), "Auteur");
        assert_eq!(
            helper.translate("article.licensing.updated_at").unwrap(),
            "Updated on"
        );
        assert_eq!(
            helper.translate("article.unknown").unwrap_err().kind(),
            LicensingErrorKind::Translation
        );
    }

    #[test]
    fn format_date_is_localized() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let translations = Translations::new();

        let config = config("/", "en", "%B %d, %Y");
        let helper = SiteHelper::new(&config, &translations).unwrap();
        assert_eq!(helper.format_date(&date).unwrap(), "March 01, 2024");

        let config = SiteConfig {
            language: "fr".into(),
            ..config
        };
        let helper = SiteHelper::new(&config, &translations).unwrap();
        assert_eq!(helper.locale(), Locale::fr_FR);
        assert_eq!(helper.format_date(&date).unwrap(), "mars 01, 2024");
    }

    #[test]
    fn languages_map_to_locales() {
        assert_eq!(locale("en"), Locale::en_US);
        assert_eq!(locale("zh-CN"), Locale::zh_CN);
        assert_eq!(locale("nl"), Locale::nl_NL);
        assert_eq!(locale("xx"), Locale::POSIX);
    }

    #[test]
    fn invalid_date_format_is_an_error() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let translations = Translations::new();
        let config = config("/", "en", "%Q");
        let helper = SiteHelper::new(&config, &translations).unwrap();
        assert_eq!(
            helper.format_date(&date).unwrap_err().kind(),
            LicensingErrorKind::Date
        );
    }
}
