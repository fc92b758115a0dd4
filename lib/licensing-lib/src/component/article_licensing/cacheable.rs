use log::debug;
use virtual_dom::DomNode;

use crate::{
    component::{CachedComponent, RenderCache},
    helper::Helper,
    licensing_error::LicensingError,
    page::Page,
    site_config::SiteConfig,
    uri::pretty_permalink,
};

use super::{CACHE_NAMESPACE, LicenseMap, LicensingBlock, RenderProps};

pub const AUTHOR_TITLE_KEY: &str = "article.licensing.author";
pub const CREATED_TITLE_KEY: &str = "article.licensing.created_at";
pub const UPDATED_TITLE_KEY: &str = "article.licensing.updated_at";
pub const LICENSED_TITLE_KEY: &str = "article.licensing.licensed_under";

/// Map the site config and page to the values shown in the licensing block
pub fn licensing_props(
    config: &SiteConfig,
    page: &Page,
    helper: &dyn Helper,
) -> Result<RenderProps, LicensingError> {
    let licenses = config
        .article
        .licenses
        .iter()
        .map(|(name, license)| {
            let mut entry = license.normalize();
            entry.url = helper.url_for(&entry.url)?;
            Ok((name.as_str(), entry))
        })
        .collect::<Result<LicenseMap, LicensingError>>()?;

    let link = pretty_permalink(&page.permalink(config)?)?;
    let author = page
        .author
        .clone()
        .filter(|author| !author.is_empty())
        .or_else(|| config.author.clone());

    let created_at = page
        .date
        .as_ref()
        .map(|date| helper.format_date(date))
        .transpose()?;
    let updated_at = page
        .updated
        .as_ref()
        .map(|date| helper.format_date(date))
        .transpose()?;

    debug!("Licensing props for '{link}' with {} license(s)", licenses.len());
    Ok(RenderProps {
        title: page.title.clone(),
        link,
        author,
        author_title: Some(helper.translate(AUTHOR_TITLE_KEY)?),
        created_at,
        created_title: Some(helper.translate(CREATED_TITLE_KEY)?),
        updated_at,
        updated_title: Some(helper.translate(UPDATED_TITLE_KEY)?),
        licenses: Some(licenses),
        licensed_title: Some(helper.translate(LICENSED_TITLE_KEY)?),
    })
}

/// [`LicensingBlock`] rendered from a site config and page, reusing earlier renders when the
/// derived props did not change
pub struct CacheableLicensingBlock {
    inner: CachedComponent<LicensingBlock>,
}

impl Default for CacheableLicensingBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheableLicensingBlock {
    pub fn new() -> Self {
        CacheableLicensingBlock {
            inner: CachedComponent::new(LicensingBlock, CACHE_NAMESPACE),
        }
    }

    /// Keep at most `capacity` rendered blocks
    pub fn with_capacity(capacity: usize) -> Self {
        CacheableLicensingBlock {
            inner: CachedComponent::with_cache(
                LicensingBlock,
                CACHE_NAMESPACE,
                RenderCache::with_capacity(capacity),
            ),
        }
    }

    pub fn render(
        &mut self,
        config: &SiteConfig,
        page: &Page,
        helper: &dyn Helper,
    ) -> Result<DomNode, LicensingError> {
        let props = licensing_props(config, page, helper)?;
        Ok(self.inner.render(props))
    }

    pub fn cache(&self) -> &RenderCache<RenderProps> {
        self.inner.cache()
    }

    pub fn clear_cache(&mut self) {
        self.inner.cache_mut().clear()
    }
}
