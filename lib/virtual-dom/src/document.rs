use std::fmt;

use crate::{to_attributes, DomNode};

/// A minimal html document, mimicking the browser `Document`
/// (https://developer.mozilla.org/en-US/docs/Web/API/Document)
#[derive(Debug, Clone)]
pub struct Document {
    root: DomNode,
    pub head: DomNode,
    pub body: DomNode,
}

impl Document {
    /// Create an empty document with a utf-8 charset meta tag and the given `lang` attribute
    pub fn new(language: &str) -> Document {
        let root = DomNode::create_element_with_attributes("html", to_attributes([("lang", language)]));
        let head = DomNode::create_element("head");
        let body = DomNode::create_element("body");

        head.append_child(DomNode::create_element_with_attributes(
            "meta",
            to_attributes([("charset", "utf-8")]),
        ));
        root.append_child(head.clone());
        root.append_child(body.clone());

        Document { root, head, body }
    }

    pub fn root(&self) -> DomNode {
        self.root.clone()
    }

    pub fn set_title(&self, title: &str) {
        if let Some(existing) = self.head.get_elements_by_tag_name("title").first() {
            existing.detach();
        }
        let el = DomNode::create_element("title");
        el.append_child(title);
        self.head.append_child(el);
    }

    pub fn add_stylesheet(&self, href: &str) {
        self.head.append_child(DomNode::create_element_with_attributes(
            "link",
            to_attributes([("rel", "stylesheet"), ("href", href)]),
        ));
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<!DOCTYPE html>{}", self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_renders_head_and_body() {
        let document = Document::new("en");
        document.set_title("Old");
        document.set_title("Hello & welcome");
        document.add_stylesheet("/css/style.css");
        document.body.append_child("content");

        assert_eq!(
            document.to_string(),
            r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"/><title>Hello &amp; welcome</title><link rel="stylesheet" href="/css/style.css"/></head><body>content</body></html>"#
        );
    }
}
