//! Article licensing block for static sites
//!
//! Renders a box below an article with its title, link, author, dates and the licenses the
//! article is published under.
//!
//! # Examples
//! ```
//! use licensing_lib::{CacheableLicensingBlock, Page, SiteConfig, SiteHelper, Translations};
//!
//! let config = SiteConfig::from_toml(r#"
//! author = "Lyr"
//! url = "https://example.com"
//!
//! [article.licenses]
//! "CC BY 4.0" = { url = "https://creativecommons.org/licenses/by/4.0/", icon = "fab fa-creative-commons-by" }
//! "#).unwrap();
//! let page = Page::from_toml(r#"
//! title = "Hello World"
//! path = "hello-world/index.html"
//! date = 2024-01-01
//! "#).unwrap();
//!
//! let translations = Translations::new();
//! let helper = SiteHelper::new(&config, &translations).unwrap();
//! let mut block = CacheableLicensingBlock::new();
//! let html = block.render(&config, &page, &helper).unwrap().to_string();
//! assert!(html.contains(r#"<a href="https://example.com/hello-world/">"#));
//! ```
pub mod component;
pub mod helper;
pub mod i18n;
pub mod licensing_error;
pub mod page;
pub mod site_config;
pub mod uri;

use virtual_dom::{Document, DomNode};

pub use component::{
    CacheableLicensingBlock, Component, LicenseEntry, LicensingBlock, RenderProps,
};
pub use helper::{Helper, SiteHelper};
pub use i18n::Translations;
pub use licensing_error::{LicensingError, LicensingErrorKind};
pub use page::Page;
pub use site_config::SiteConfig;

/// Wrap a rendered block in a full html document titled after the page
pub fn standalone_document(config: &SiteConfig, page: &Page, block: DomNode) -> Document {
    let document = Document::new(&config.language);
    let title = match (&page.title, &config.title) {
        (Some(page_title), Some(site_title)) => format!("{page_title} | {site_title}"),
        (Some(title), None) | (None, Some(title)) => title.clone(),
        (None, None) => String::new(),
    };
    if !title.is_empty() {
        document.set_title(&title);
    }
    document.body.append_child(block);
    document
}
