use std::{
    hash::{Hash, Hasher},
    ops::Deref,
};

use indexmap::IndexMap;
use serde::Deserialize;

/// Icon classes of a license, either a single glyph or a row of glyphs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum Icon {
    Single(String),
    Sequence(Vec<String>),
}

impl Icon {
    /// All icon classes in order
    pub fn classes(&self) -> &[String] {
        match self {
            Icon::Single(class) => std::slice::from_ref(class),
            Icon::Sequence(classes) => classes,
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Icon::Single(_))
    }
}

impl From<&str> for Icon {
    fn from(value: &str) -> Self {
        Icon::Single(value.to_string())
    }
}

impl From<Vec<String>> for Icon {
    fn from(value: Vec<String>) -> Self {
        Icon::Sequence(value)
    }
}

impl<S: Into<String>> FromIterator<S> for Icon {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Icon::Sequence(iter.into_iter().map(Into::into).collect())
    }
}

/// A single license with an already resolved url
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LicenseEntry {
    pub url: String,
    pub icon: Option<Icon>,
    pub text: Option<String>,
}

impl LicenseEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            icon: None,
            text: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<Icon>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Licenses by name in insertion order. Unlike [`IndexMap`] equality and hashing take the order
/// into account, two maps that would render differently are never equal.
#[derive(Debug, Clone, Default)]
pub struct LicenseMap(IndexMap<String, LicenseEntry>);

impl LicenseMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: LicenseEntry) {
        self.0.insert(name.into(), entry);
    }
}

impl Deref for LicenseMap {
    type Target = IndexMap<String, LicenseEntry>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for LicenseMap {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().eq(other.0.iter())
    }
}
impl Eq for LicenseMap {}

impl Hash for LicenseMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.0.len());
        for (name, entry) in &self.0 {
            name.hash(state);
            entry.hash(state);
        }
    }
}

impl<N: Into<String>> FromIterator<(N, LicenseEntry)> for LicenseMap {
    fn from_iter<T: IntoIterator<Item = (N, LicenseEntry)>>(iter: T) -> Self {
        LicenseMap(iter.into_iter().map(|(n, e)| (n.into(), e)).collect())
    }
}

/// Display ready values of the article licensing block. `None` and empty strings both hide
/// the related part of the block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RenderProps {
    pub title: Option<String>,
    pub link: String,
    pub author: Option<String>,
    pub author_title: Option<String>,
    pub created_at: Option<String>,
    pub created_title: Option<String>,
    pub updated_at: Option<String>,
    pub updated_title: Option<String>,
    pub licenses: Option<LicenseMap>,
    pub licensed_title: Option<String>,
}

/// Returns the value if it would be rendered
pub(super) fn truthy(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::hash::DefaultHasher;

    use super::*;

    fn hash(value: &impl Hash) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn icon_classes() {
        let single = Icon::from("fab fa-creative-commons");
        assert!(single.is_single());
        assert_eq!(single.classes(), ["fab fa-creative-commons".to_string()]);

        let sequence: Icon = ["fab fa-creative-commons", "fab fa-creative-commons-by"]
            .into_iter()
            .collect();
        assert!(!sequence.is_single());
        assert_eq!(sequence.classes().len(), 2);

        let sequence: Icon = Vec::<String>::new().into_iter().collect();
        assert!(sequence.classes().is_empty());
    }

    #[test]
    fn icon_deserializes_from_string_or_list() {
        #[derive(Deserialize)]
        struct Holder {
            icon: Icon,
        }
        let holder: Holder = toml::from_str(r#"icon = "fab fa-x""#).unwrap();
        assert_eq!(holder.icon, Icon::from("fab fa-x"));
        let holder: Holder = toml::from_str(r#"icon = ["a", "b"]"#).unwrap();
        assert_eq!(holder.icon, ["a", "b"].into_iter().collect::<Icon>());
    }

    #[test]
    fn license_map_equality_is_ordered() {
        let a: LicenseMap = [
            ("CC", LicenseEntry::new("https://creativecommons.org/")),
            ("BY", LicenseEntry::new("https://creativecommons.org/licenses/by/4.0/")),
        ]
        .into_iter()
        .collect();
        let b: LicenseMap = a.iter().rev().map(|(n, e)| (n.clone(), e.clone())).collect();

        assert_ne!(a, b);
        assert_ne!(hash(&a), hash(&b));
        assert_eq!(a, a.clone());
        assert_eq!(hash(&a), hash(&a.clone()));
    }

    #[test]
    fn truthy_hides_empty() {
        assert_eq!(truthy(&None), None);
        assert_eq!(truthy(&Some(String::new())), None);
        assert_eq!(truthy(&Some("Lyr".into())), Some("Lyr"));
    }
}
