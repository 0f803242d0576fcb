use once_cell::sync::Lazy;
use scraper::Selector;
use serde::Serialize;

use crate::error::Result;
use crate::fragment::{attr, full_text, inner_html, sel, Fragment};

static TITLE: Lazy<Selector> = Lazy::new(|| sel("h1.heading-main"));
static TEXT: Lazy<Selector> = Lazy::new(|| sel("div.wiki-page-text"));
static EDITED: Lazy<Selector> = Lazy::new(|| sel("footer.wiki-page-footer time[datetime]"));

/// A group wiki page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WikiPage {
    pub title: String,
    /// Rendered HTML of the page body.
    pub content: String,
    /// ISO-8601 time of the last edit, when the footer shows one.
    pub last_edited: Option<String>,
}

impl WikiPage {
    /// # Errors
    ///
    /// Fails on empty markup or a missing title or body.
    pub fn from_html(html: &str) -> Result<Self> {
        let fragment = Fragment::parse(html)?;
        Ok(Self {
            title: full_text(fragment.require(&TITLE, "h1.heading-main")?),
            content: inner_html(fragment.require(&TEXT, "div.wiki-page-text")?),
            last_edited: fragment
                .select_first(&EDITED)
                .and_then(|time| attr(time, "datetime"))
                .map(str::to_string),
        })
    }
}
