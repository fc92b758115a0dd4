use std::fs;

use licensing_lib::{
    CacheableLicensingBlock, LicensingErrorKind, Page, SiteConfig, SiteHelper, Translations,
};
use tempfile::tempdir;
use virtual_dom::DomNode;

const CONFIG: &str = r#"
author = "Lyr"
url = "https://example.com"
root = "/blog"
date_format = "%Y/%m/%d"

[article.licenses]
"Creative Commons" = "https://creativecommons.org/"
"Attribution 4.0 International" = { url = "/licenses/by/", icon = ["fab fa-creative-commons", "fab fa-creative-commons-by"] }
"MIT" = { url = "/licenses/mit/", icon = "fas fa-balance-scale", text = " (code)" }
"#;

const PAGE: &str = r#"
title = "Hello World"
permalink = "https://example.com/blog/%E4%BD%A0%E5%A5%BD%3F/index.html"
date = 2024-01-01
updated = "2024-02-01T10:00:00Z"
"#;

const LOCALE: &str = r#"
[article.licensing]
author = "Auteur"
licensed_under = "Sous licence"
"#;

fn items(node: &DomNode) -> Vec<(String, DomNode)> {
    node.get_elements_by_class_name("level-item")
        .into_iter()
        .map(|item| {
            let label = item.get_elements_by_tag_name("h6")[0].text_content();
            let paragraphs = item.get_elements_by_tag_name("p");
            assert_eq!(paragraphs.len(), 1, "every item has a single value paragraph");
            let value = paragraphs[0].clone();
            (label, value)
        })
        .collect()
}

#[test]
fn renders_block_from_files() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("site.toml");
    let page_path = dir.path().join("page.toml");
    let locale_path = dir.path().join("fr.toml");
    fs::write(&config_path, CONFIG).unwrap();
    fs::write(&page_path, PAGE).unwrap();
    fs::write(&locale_path, LOCALE).unwrap();

    let config = SiteConfig::from_path(&config_path).unwrap();
    let page = Page::from_path(&page_path).unwrap();
    let translations = Translations::from_path(&locale_path).unwrap();
    let helper = SiteHelper::new(&config, &translations).unwrap();

    let mut block = CacheableLicensingBlock::new();
    let node = block.render(&config, &page, &helper).unwrap();

    let link = &node.get_elements_by_class_name("licensing-title")[0];
    assert_eq!(link.text_content(), "Hello Worldhttps://example.com/blog/你好%3F/");

    let items = items(&node);
    let labels: Vec<&str> = items.iter().map(|(label, _)| label.as_str()).collect();
    assert_eq!(labels, vec!["Auteur", "Posted on", "Updated on", "Sous licence"]);
    assert_eq!(items[0].1.text_content(), "Lyr");
    assert_eq!(items[1].1.text_content(), "2024/01/01");
    assert_eq!(items[2].1.text_content(), "2024/02/01");

    let anchors = items[3].1.get_elements_by_tag_name("a");
    let hrefs: Vec<String> = anchors
        .iter()
        .filter_map(|a| a.get_attribute("href"))
        .collect();
    assert_eq!(
        hrefs,
        vec![
            "https://creativecommons.org/",
            "/blog/licenses/by/",
            "/blog/licenses/mit/"
        ]
    );
    assert_eq!(anchors[0].text_content(), "Creative Commons");
    assert_eq!(anchors[1].get_elements_by_tag_name("i").len(), 2);
    assert_eq!(anchors[1].text_content(), "\u{a0}\u{a0}");
    assert_eq!(anchors[2].get_attribute("class").as_deref(), Some("icon"));
    assert_eq!(anchors[2].text_content(), " (code)");

    let html = node.to_string();
    assert!(html.contains(r#"<h6>Sous licence</h6><p><a rel="noopener" target="_blank" title="Creative Commons" class href="https://creativecommons.org/">Creative Commons</a>"#));
    assert!(!html.contains("<p><p>"));
}

#[test]
fn cache_follows_page_changes() {
    let config = SiteConfig::from_toml(CONFIG).unwrap();
    let translations = Translations::new();
    let helper = SiteHelper::new(&config, &translations).unwrap();
    let mut block = CacheableLicensingBlock::new();

    let page = Page::from_toml(PAGE).unwrap();
    let first = block.render(&config, &page, &helper).unwrap().to_string();
    let again = block.render(&config, &page, &helper).unwrap().to_string();
    assert_eq!(first, again);
    assert_eq!(block.cache().hits(), 1);

    let edited = Page::from_toml(&PAGE.replace("Hello World", "Hello Rust")).unwrap();
    let changed = block.render(&config, &edited, &helper).unwrap().to_string();
    assert_ne!(first, changed);
    assert!(changed.contains("<p>Hello Rust</p>"));
    assert_eq!(block.cache().misses(), 2);
}

#[test]
fn flat_locale_keys_fall_back_to_english() {
    let config = SiteConfig::from_toml(CONFIG).unwrap();
    let page = Page::from_toml(PAGE).unwrap();
    let translations = Translations::from_toml("[article]\nlicensing = \"flat\"").unwrap();
    let helper = SiteHelper::new(&config, &translations).unwrap();

    // "article.licensing" is a message itself, nested keys are not
    let node = CacheableLicensingBlock::new()
        .render(&config, &page, &helper)
        .unwrap();
    assert!(node.to_string().contains("<h6>Author</h6>"));

    let error = Page::from_toml("").unwrap().permalink(&config).unwrap_err();
    assert_eq!(error.kind(), LicensingErrorKind::Page);
}
