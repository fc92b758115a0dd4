use proc_virtual_dom::dom;
use virtual_dom::DomNode;

use super::Component;

mod cacheable;
pub use cacheable::*;
mod render_props;
pub use render_props::*;

/// Slot of the article licensing block in the render cache
pub const CACHE_NAMESPACE: &str = "misc.articlelicensing";

const NBSP: &str = "\u{a0}";

/// Renders the licensing block of an article: title and link, followed by a row with author,
/// dates and licenses. Missing values leave out their part of the block.
///
/// ```html
/// <div class="article-licensing box">
///     <div class="licensing-title"><p>{title}</p><p><a href="{link}">{link}</a></p></div>
///     <div class="licensing-meta level is-mobile">
///         <div class="level-left">
///             <div class="level-item is-narrow"><div><h6>{label}</h6><p>{value}</p></div></div>
///         </div>
///     </div>
/// </div>
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct LicensingBlock;

impl Component for LicensingBlock {
    type Props = RenderProps;

    fn render(&self, props: &RenderProps) -> DomNode {
        let block = dom!(<div class="article-licensing box"></div>);

        let heading = dom!(<div class="licensing-title"></div>);
        if let Some(title) = truthy(&props.title) {
            heading.append_child(dom!(<p>{title}</p>));
        }
        let link = &props.link;
        heading.append_child(dom!(<p><a href="{link}">{link}</a></p>));
        block.append_child(heading);

        let level_left = dom!(<div class="level-left"></div>);
        let values = [
            (&props.author_title, &props.author),
            (&props.created_title, &props.created_at),
            (&props.updated_title, &props.updated_at),
        ];
        for (label, value) in values {
            if let Some(value) = truthy(value) {
                level_left.append_child(meta_item(truthy(label), [DomNode::create_text(value)]));
            }
        }
        if let Some(licenses) = props.licenses.as_ref().filter(|l| !l.is_empty()) {
            let links = licenses
                .iter()
                .map(|(name, license)| license_link(name, license));
            level_left.append_child(meta_item(truthy(&props.licensed_title), links));
        }

        let meta = dom!(<div class="licensing-meta level is-mobile"></div>);
        meta.append_child(level_left);
        block.append_child(meta);

        block
    }
}

/// A labeled item of the meta row, `content` goes into a single paragraph
fn meta_item(label: Option<&str>, content: impl IntoIterator<Item = DomNode>) -> DomNode {
    let title = dom!(<h6></h6>);
    if let Some(label) = label {
        title.append_child(label);
    }
    let value = dom!(<p></p>);
    value.append_children(content);

    let inner = dom!(<div></div>);
    inner.append_child(title);
    inner.append_child(value);
    dom!(<div class="level-item is-narrow">{inner}</div>)
}

fn license_link(name: &str, license: &LicenseEntry) -> DomNode {
    let url = &license.url;
    // an empty icon class counts as no icon
    let icon = license
        .icon
        .as_ref()
        .filter(|icon| !matches!(icon, Icon::Single(class) if class.is_empty()));
    let class = match icon {
        Some(icon) if icon.is_single() => "icon",
        _ => "",
    };

    let a = dom!(<a rel="noopener" target="_blank" title="{name}" class="{class}" href="{url}"></a>);
    match icon {
        Some(icon) => {
            for glyph_class in icon.classes() {
                a.append_child(dom!(<i class="{glyph_class}"></i>));
                if !icon.is_single() {
                    a.append_child(NBSP);
                }
            }
        }
        None => a.append_child(name),
    }
    if let Some(text) = truthy(&license.text) {
        a.append_child(text);
    }
    a
}
