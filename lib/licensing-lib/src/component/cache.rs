use std::hash::{DefaultHasher, Hash, Hasher};

use indexmap::IndexMap;
use log::debug;
use virtual_dom::{DomNode, Html};

use super::Component;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: &'static str,
    hash: u64,
}

impl CacheKey {
    pub fn new(namespace: &'static str, props: &impl Hash) -> Self {
        let mut hasher = DefaultHasher::new();
        props.hash(&mut hasher);
        CacheKey {
            namespace,
            hash: hasher.finish(),
        }
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }
}

struct CacheEntry<P> {
    props: P,
    html: Html,
}

/// Rendered trees keyed by namespace and a hash of the props they were rendered from.
///
/// Every entry keeps its props, a lookup only hits when they are equal so a hash collision
/// renders again. Nothing expires on its own: entries live until [`RenderCache::clear`] or, with
/// a capacity, until they are the oldest entry when a new one is inserted.
pub struct RenderCache<P> {
    entries: IndexMap<CacheKey, CacheEntry<P>>,
    capacity: Option<usize>,
    hits: u64,
    misses: u64,
}

impl<P> Default for RenderCache<P> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            capacity: None,
            hits: 0,
            misses: 0,
        }
    }
}

impl<P: Hash + Eq> RenderCache<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` entries, evicting the oldest first
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn get(&mut self, key: &CacheKey, props: &P) -> Option<DomNode> {
        match self.entries.get(key) {
            Some(entry) if entry.props == *props => {
                self.hits += 1;
                Some(DomNode::from(entry.html.clone()))
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: CacheKey, props: P, html: Html) {
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return;
            }
            self.entries.shift_remove(&key);
            while self.entries.len() >= capacity {
                if let Some((evicted, _)) = self.entries.shift_remove_index(0) {
                    debug!("Evicting {evicted:?} from render cache");
                }
            }
        }
        self.entries.insert(key, CacheEntry { props, html });
    }

    /// Return a copy of the cached tree for `props` or render and cache it
    pub fn get_or_render(
        &mut self,
        namespace: &'static str,
        props: P,
        render: impl FnOnce(&P) -> DomNode,
    ) -> DomNode {
        let key = CacheKey::new(namespace, &props);
        if let Some(node) = self.get(&key, &props) {
            debug!("Render cache hit for {key:?}");
            return node;
        }

        debug!("Render cache miss for {key:?}");
        let node = render(&props);
        self.insert(key, props, Html::from(&node));
        node
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

/// Wraps a component so rendering the same props twice reuses the first render
pub struct CachedComponent<C: Component> {
    component: C,
    namespace: &'static str,
    cache: RenderCache<C::Props>,
}

impl<C> CachedComponent<C>
where
    C: Component,
    C::Props: Hash + Eq,
{
    pub fn new(component: C, namespace: &'static str) -> Self {
        Self::with_cache(component, namespace, RenderCache::new())
    }

    pub fn with_cache(component: C, namespace: &'static str, cache: RenderCache<C::Props>) -> Self {
        CachedComponent {
            component,
            namespace,
            cache,
        }
    }

    pub fn render(&mut self, props: C::Props) -> DomNode {
        let component = &self.component;
        self.cache
            .get_or_render(self.namespace, props, |props| component.render(props))
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    pub fn cache(&self) -> &RenderCache<C::Props> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut RenderCache<C::Props> {
        &mut self.cache
    }
}
