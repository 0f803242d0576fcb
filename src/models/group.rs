use once_cell::sync::Lazy;
use scraper::Selector;
use serde::Serialize;

use crate::error::Result;
use crate::fragment::{
    first, full_text, group_name, has_class, leading_integer, required, sel, Fragment,
};

static ROW: Lazy<Selector> = Lazy::new(|| sel(".group-list-item"));
static LINK: Lazy<Selector> = Lazy::new(|| sel("a.link-group"));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| sel(".group-list-description"));
static SUBSCRIBERS: Lazy<Selector> = Lazy::new(|| sel(".group-subscription-count"));
static SUBSCRIBE_BUTTON: Lazy<Selector> = Lazy::new(|| sel(".group-subscription-button"));

/// One row of the group listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    /// Group name without the `~` prefix.
    pub name: String,
    pub description: Option<String>,
    pub num_subscribers: u32,
    /// The viewing user is subscribed (the button shows its "used" state).
    pub subscribed: bool,
}

impl Group {
    /// # Errors
    ///
    /// Fails on empty markup or a row without a group link.
    pub fn from_html(html: &str) -> Result<Self> {
        let fragment = Fragment::parse(html)?;
        let row = fragment.select_first(&ROW).unwrap_or_else(|| fragment.root());

        let name = group_name(&full_text(required(row, &LINK, "a.link-group")?));
        let description = first(row, &DESCRIPTION)
            .map(full_text)
            .filter(|text| !text.is_empty());
        let num_subscribers =
            first(row, &SUBSCRIBERS).map_or(0, |count| leading_integer(&full_text(count)));
        let subscribed = first(row, &SUBSCRIBE_BUTTON).is_some_and(|b| has_class(b, "btn-used"));

        Ok(Self {
            name,
            description,
            num_subscribers,
            subscribed,
        })
    }
}
