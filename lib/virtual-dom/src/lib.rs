//! A small virtual DOM used to build and serialise html fragments.
//!
//! Nodes are reference counted ([`DomNode`]) so a subtree can be built up in pieces and
//! appended anywhere. [`Html`] is the owned counterpart used to compare or store trees.
mod document;
mod dom_node;
mod html;

pub use document::*;
pub use dom_node::*;
pub use html::{
    escape_attribute, escape_text, is_void_element, parse_html, Attributes, Html,
};

/// Utility function to convert iteratables into an attributes map, keeping their order
pub fn to_attributes<I: IntoIterator<Item = (impl Into<String>, impl Into<String>)>>(
    arr: I,
) -> Attributes {
    arr.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
