use virtual_dom::DomNode;

mod article_licensing;
pub use article_licensing::*;
mod cache;
pub use cache::*;

/// A unit of rendering, turns immutable props into a dom tree in a single pass
pub trait Component {
    type Props;

    fn render(&self, props: &Self::Props) -> DomNode;
}
