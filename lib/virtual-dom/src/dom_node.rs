use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::html::{escape_attribute, escape_text, is_void_element, Attributes, Html};

/// Strong link
type Link = Rc<RefCell<DomNodeData>>;
type WeakLink = Weak<RefCell<DomNodeData>>;

/// Reference counted dom node. Children are owned through `first_child` and `next_sibling`, all
/// other links are weak.
///
/// Based on https://docs.rs/rctree/latest/rctree/struct.Node.html
pub struct DomNode(Link);

#[derive(Debug, Clone, PartialEq)]
pub enum DomNodeKind {
    Text { text: String },
    Element { tag: String, attributes: Attributes },
}

struct DomNodeData {
    kind: DomNodeKind,
    parent: Option<WeakLink>,
    first_child: Option<Link>,
    last_child: Option<WeakLink>,
    previous_sibling: Option<WeakLink>,
    next_sibling: Option<Link>,
}

/// Cloning a `DomNode` only increments a reference count. It does not copy the data.
impl Clone for DomNode {
    fn clone(&self) -> Self {
        DomNode(Rc::clone(&self.0))
    }
}

/// Identity comparison, use [`Html`] to compare trees structurally
impl PartialEq for DomNode {
    fn eq(&self, other: &DomNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for DomNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&*self.kind(), f)
    }
}

impl DomNode {
    pub fn new(kind: DomNodeKind) -> DomNode {
        DomNode(Rc::new(RefCell::new(DomNodeData {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            previous_sibling: None,
            next_sibling: None,
        })))
    }

    pub fn create_element(tag: impl Into<String>) -> DomNode {
        Self::create_element_with_attributes(tag, Attributes::new())
    }

    pub fn create_element_with_attributes(
        tag: impl Into<String>,
        attributes: Attributes,
    ) -> DomNode {
        Self::new(DomNodeKind::Element {
            tag: tag.into(),
            attributes,
        })
    }

    pub fn create_text(text: impl Into<String>) -> DomNode {
        Self::new(DomNodeKind::Text { text: text.into() })
    }

    pub fn get_attribute(&self, key: &str) -> Option<String> {
        match &*self.kind() {
            DomNodeKind::Element { attributes, .. } => attributes.get(key).cloned(),
            DomNodeKind::Text { .. } => None,
        }
    }

    /// Tag name, `None` for text nodes
    pub fn tag(&self) -> Option<String> {
        match &*self.kind() {
            DomNodeKind::Element { tag, .. } => Some(tag.clone()),
            DomNodeKind::Text { .. } => None,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attribute("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Concatenated text of this node and all its descendants
    pub fn text_content(&self) -> String {
        self.descendants()
            .filter_map(|node| match &*node.kind() {
                DomNodeKind::Text { text } => Some(text.clone()),
                DomNodeKind::Element { .. } => None,
            })
            .collect()
    }

    /// # Panics
    ///
    /// Panics if the node is currently mutably borrowed.
    pub fn parent(&self) -> Option<DomNode> {
        Some(DomNode(self.0.borrow().parent.as_ref()?.upgrade()?))
    }

    pub fn first_child(&self) -> Option<DomNode> {
        Some(DomNode(self.0.borrow().first_child.as_ref()?.clone()))
    }

    pub fn last_child(&self) -> Option<DomNode> {
        Some(DomNode(self.0.borrow().last_child.as_ref()?.upgrade()?))
    }

    pub fn next_sibling(&self) -> Option<DomNode> {
        Some(DomNode(self.0.borrow().next_sibling.as_ref()?.clone()))
    }

    pub fn kind(&self) -> Ref<'_, DomNodeKind> {
        Ref::map(self.0.borrow(), |v| &v.kind)
    }

    pub fn children(&self) -> Children {
        Children(self.first_child())
    }

    pub fn has_children(&self) -> bool {
        self.first_child().is_some()
    }

    /// Returns an iterator of nodes to this node and its descendants, in tree order.
    ///
    /// Includes the current node.
    pub fn descendants(&self) -> Descendants {
        Descendants(vec![self.clone()])
    }

    pub fn get_elements_by_tag_name(&self, tag: &str) -> Vec<DomNode> {
        self.descendants()
            .filter(|d| matches!(&*d.kind(), DomNodeKind::Element { tag: t, .. } if t == tag))
            .collect()
    }

    pub fn get_elements_by_class_name(&self, class: &str) -> Vec<DomNode> {
        self.descendants().filter(|d| d.has_class(class)).collect()
    }

    /// Detaches a node from its parent and siblings. Children are not affected.
    pub fn detach(&self) {
        self.0.borrow_mut().detach();
    }

    /// Appends a new child to this node, after existing children.
    ///
    /// # Panics
    ///
    /// Panics if the node, the new child, or one of their adjoining nodes is currently borrowed.
    pub fn append_child(&self, new_child: impl Into<DomNode>) {
        let new_child = new_child.into();
        assert!(*self != new_child, "a node cannot be appended to itself");

        let mut self_borrow = self.0.borrow_mut();
        let mut last_child_opt = None;
        {
            let mut new_child_borrow = new_child.0.borrow_mut();
            new_child_borrow.detach();
            new_child_borrow.parent = Some(Rc::downgrade(&self.0));
            if let Some(last_child_weak) = self_borrow.last_child.take() {
                if let Some(last_child_strong) = last_child_weak.upgrade() {
                    new_child_borrow.previous_sibling = Some(last_child_weak);
                    last_child_opt = Some(last_child_strong);
                }
            }
            self_borrow.last_child = Some(Rc::downgrade(&new_child.0));
        }

        match last_child_opt {
            Some(last_child_strong) => {
                last_child_strong.borrow_mut().next_sibling = Some(new_child.0);
            }
            None => self_borrow.first_child = Some(new_child.0),
        }
    }

    /// Append every node yielded by `children` in order
    pub fn append_children(&self, children: impl IntoIterator<Item = DomNode>) {
        for child in children {
            self.append_child(child);
        }
    }
}

impl fmt::Display for DomNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.kind() {
            DomNodeKind::Text { text } => f.write_str(&escape_text(text)),
            DomNodeKind::Element { tag, attributes } => {
                write!(f, "<{tag}")?;
                for (key, value) in attributes {
                    if value.is_empty() {
                        write!(f, " {key}")?;
                    } else {
                        write!(f, r#" {key}="{}""#, escape_attribute(value))?;
                    }
                }

                if !self.has_children() && is_void_element(tag) {
                    return f.write_str("/>");
                }

                f.write_str(">")?;
                for child in self.children() {
                    write!(f, "{child}")?;
                }
                write!(f, "</{tag}>")
            }
        }
    }
}

impl From<Html> for DomNode {
    /// Comments are dropped
    fn from(value: Html) -> Self {
        match value {
            Html::Text { text } => DomNode::create_text(text),
            Html::Comment { .. } => DomNode::create_text(String::new()),
            Html::Element {
                tag,
                attributes,
                children,
            } => {
                let node = DomNode::create_element_with_attributes(tag, attributes);
                for child in children {
                    if !matches!(child, Html::Comment { .. }) {
                        node.append_child(DomNode::from(child));
                    }
                }
                node
            }
        }
    }
}

impl From<DomNode> for Html {
    fn from(value: DomNode) -> Self {
        Html::from(&value)
    }
}

impl From<&DomNode> for Html {
    fn from(value: &DomNode) -> Self {
        match &*value.kind() {
            DomNodeKind::Text { text } => Html::Text { text: text.clone() },
            DomNodeKind::Element { tag, attributes } => Html::Element {
                tag: tag.clone(),
                attributes: attributes.clone(),
                children: value.children().map(|c| Html::from(&c)).collect(),
            },
        }
    }
}

impl From<String> for DomNode {
    fn from(value: String) -> Self {
        DomNode::create_text(value)
    }
}

impl From<&String> for DomNode {
    fn from(value: &String) -> Self {
        DomNode::create_text(value.clone())
    }
}

impl From<&str> for DomNode {
    fn from(value: &str) -> Self {
        DomNode::create_text(value)
    }
}

impl DomNodeData {
    /// Detaches a node from its parent and siblings. Children are not affected.
    fn detach(&mut self) {
        let parent_weak = self.parent.take();
        let previous_sibling_weak = self.previous_sibling.take();
        let next_sibling_strong = self.next_sibling.take();

        let previous_sibling_opt = previous_sibling_weak
            .as_ref()
            .and_then(|weak| weak.upgrade());

        if let Some(next_sibling_ref) = next_sibling_strong.as_ref() {
            next_sibling_ref.borrow_mut().previous_sibling = previous_sibling_weak;
        } else if let Some(parent_strong) = parent_weak.as_ref().and_then(|p| p.upgrade()) {
            parent_strong.borrow_mut().last_child = previous_sibling_weak;
        }

        if let Some(previous_sibling_strong) = previous_sibling_opt {
            previous_sibling_strong.borrow_mut().next_sibling = next_sibling_strong;
        } else if let Some(parent_strong) = parent_weak.as_ref().and_then(|p| p.upgrade()) {
            parent_strong.borrow_mut().first_child = next_sibling_strong;
        }
    }
}

impl Drop for DomNodeData {
    fn drop(&mut self) {
        // unlink children iteratively so dropping a deep tree does not overflow the stack
        let mut stack: Vec<Link> = self.first_child.take().into_iter().collect();
        while let Some(node) = stack.pop() {
            // still referenced from outside this tree
            if Rc::strong_count(&node) > 1 {
                continue;
            }
            let mut data = node.borrow_mut();
            stack.extend(data.first_child.take());
            stack.extend(data.next_sibling.take());
        }
    }
}

/// An iterator over the children of a node
pub struct Children(Option<DomNode>);

impl Iterator for Children {
    type Item = DomNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.0.take()?;
        self.0 = node.next_sibling();
        Some(node)
    }
}

/// Depth first iterator over a node and its descendants, in tree order
pub struct Descendants(Vec<DomNode>);

impl Iterator for Descendants {
    type Item = DomNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.0.pop()?;
        let mut children: Vec<DomNode> = node.children().collect();
        children.reverse();
        self.0.extend(children);
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_attributes;

    #[test]
    fn append_keeps_order_and_parent() {
        let p = DomNode::create_element("p");
        let a = DomNode::create_element_with_attributes("a", to_attributes([("href", "/cc")]));
        p.append_child(a.clone());
        p.append_child("BY");

        let children: Vec<DomNode> = p.children().collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0], a);
        assert_eq!(a.parent(), Some(p.clone()));
        assert_eq!(p.last_child().map(|c| c.text_content()), Some("BY".into()));
    }

    #[test]
    fn detach_relinks_siblings() {
        let div = DomNode::create_element("div");
        let first = DomNode::create_text("1");
        let second = DomNode::create_text("2");
        let third = DomNode::create_text("3");
        div.append_children([first.clone(), second.clone(), third.clone()]);

        second.detach();
        assert_eq!(div.text_content(), "13");
        assert_eq!(first.next_sibling(), Some(third));
        assert_eq!(second.parent(), None);
    }

    #[test]
    fn display_escapes_and_keeps_attribute_order() {
        let a = DomNode::create_element_with_attributes(
            "a",
            to_attributes([("rel", "noopener"), ("class", ""), ("title", "Tom & \"Jerry\"")]),
        );
        a.append_child("<CC>");
        assert_eq!(
            a.to_string(),
            r#"<a rel="noopener" class title="Tom &amp; &quot;Jerry&quot;">&lt;CC&gt;</a>"#
        );
        assert_eq!(DomNode::create_element("br").to_string(), "<br/>");
        assert_eq!(DomNode::create_element("i").to_string(), "<i></i>");
    }

    #[test]
    fn html_round_trip_drops_comments() {
        let html = Html::Element {
            tag: "p".into(),
            attributes: Attributes::new(),
            children: vec![
                Html::Comment { text: "x".into() },
                Html::Text { text: "y".into() },
            ],
        };
        let node = DomNode::from(html);
        assert_eq!(
            Html::from(&node),
            Html::Element {
                tag: "p".into(),
                attributes: Attributes::new(),
                children: vec![Html::Text { text: "y".into() }],
            }
        );
    }

    #[test]
    fn descendants_in_tree_order() {
        let root = DomNode::create_element("div");
        let h6 = DomNode::create_element("h6");
        h6.append_child("Author");
        let p = DomNode::create_element("p");
        p.append_child("Lyr");
        root.append_children([h6, p]);

        let tags: Vec<Option<String>> = root.descendants().map(|d| d.tag()).collect();
        assert_eq!(
            tags,
            vec![Some("div".into()), Some("h6".into()), None, Some("p".into()), None]
        );
    }
}
