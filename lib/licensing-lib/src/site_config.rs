use std::{fs, path::Path};

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use serde_extensions::Overwrite;

use crate::{
    component::{Icon, LicenseEntry},
    licensing_error::LicensingError,
};

/// A license as written in the site config, either just an url or a table
///
/// ```toml
/// [article.licenses]
/// "Creative Commons" = "https://creativecommons.org/"
/// "Attribution 4.0 International" = { url = "https://creativecommons.org/licenses/by/4.0/", icon = ["fab fa-creative-commons", "fab fa-creative-commons-by"] }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LicenseConfig {
    UrlOnly(String),
    Detailed {
        url: String,
        #[serde(default)]
        icon: Option<Icon>,
        #[serde(default)]
        text: Option<String>,
    },
}

impl LicenseConfig {
    /// Turn into an entry with the url still unresolved
    pub fn normalize(&self) -> LicenseEntry {
        match self {
            LicenseConfig::UrlOnly(url) => LicenseEntry::new(url),
            LicenseConfig::Detailed { url, icon, text } => LicenseEntry {
                url: url.clone(),
                icon: icon.clone(),
                text: text.clone(),
            },
        }
    }
}

/// [article]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArticleConfig {
    /// Licenses in the order they are written
    pub licenses: IndexMap<String, LicenseConfig>,
}

/// Site wide options, every key is optional in the config file
#[derive(Debug, Clone, Overwrite)]
pub struct SiteConfig {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Base url of the site, used to turn a page path into a permalink
    pub url: String,
    /// Path the site is served from
    pub root: String,
    pub language: String,
    /// chrono strftime format used for dates
    pub date_format: String,
    pub article: ArticleConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            url: String::new(),
            root: "/".into(),
            language: "en".into(),
            date_format: "%Y-%m-%d".into(),
            article: ArticleConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_toml(input: &str) -> Result<SiteConfig, LicensingError> {
        let value: toml::Value = toml::from_str(input)?;
        let mut config = SiteConfig::default();
        config.overwrite(value)?;
        if !config.root.ends_with('/') {
            config.root.push('/');
        }
        debug!(
            "Loaded site config with {} license(s)",
            config.article.licenses.len()
        );
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<SiteConfig, LicensingError> {
        let input = fs::read_to_string(path)
            .map_err(|e| LicensingError::from(e).with_context(path.display().to_string()))?;
        SiteConfig::from_toml(&input)
            .map_err(|e| e.with_context(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::licensing_error::LicensingErrorKind;

    use super::*;

    #[test]
    fn defaults_are_kept_for_missing_keys() {
        let config = SiteConfig::from_toml(r#"author = "Lyr""#).unwrap();
        assert_eq!(config.author.as_deref(), Some("Lyr"));
        assert_eq!(config.title, None);
        assert_eq!(config.root, "/");
        assert_eq!(config.language, "en");
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert!(config.article.licenses.is_empty());
    }

    #[test]
    fn root_gets_trailing_slash() {
        let config = SiteConfig::from_toml(r#"root = "/blog""#).unwrap();
        assert_eq!(config.root, "/blog/");
    }

    #[test]
    fn licenses_keep_document_order() {
        let config = SiteConfig::from_toml(
            r#"
[article.licenses]
"Zeta" = "https://z.example/"
"Alpha" = { url = "/alpha", icon = "fab fa-a" }
"Mu" = { url = "/mu", icon = ["a", "b"], text = " text" }
"#,
        )
        .unwrap();

        let names: Vec<&str> = config
            .article
            .licenses
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mu"]);

        assert_eq!(
            config.article.licenses["Zeta"],
            LicenseConfig::UrlOnly("https://z.example/".into())
        );
        assert_eq!(
            config.article.licenses["Alpha"].normalize(),
            LicenseEntry::new("/alpha").with_icon("fab fa-a")
        );
        assert_eq!(
            config.article.licenses["Mu"].normalize(),
            LicenseEntry::new("/mu")
                .with_icon(["a", "b"].into_iter().collect::<Icon>())
                .with_text(" text")
        );
    }

    #[test]
    fn invalid_types_are_config_errors() {
        let error = SiteConfig::from_toml("root = 1").unwrap_err();
        assert_eq!(error.kind(), LicensingErrorKind::Config);

        let error = SiteConfig::from_toml("[article.licenses]\nMIT = 1").unwrap_err();
        assert_eq!(error.kind(), LicensingErrorKind::Config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let error = SiteConfig::from_path(Path::new("/does/not/exist.toml")).unwrap_err();
        assert_eq!(error.kind(), LicensingErrorKind::Io);
    }
}
