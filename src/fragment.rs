//! Markup fragment loading and tree queries.
//!
//! Every extractor in [`crate::models`] starts here: the raw string is parsed
//! once into a [`Fragment`] and the record is read off [`ElementRef`]s with the
//! small query helpers below. Queries never mutate the tree, so a fragment can
//! be shared freely between extractions.

use std::collections::BTreeMap;

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use crate::error::{ExtractError, Result};

/// Elements the HTML5 tree builder synthesizes around any input.
const SCAFFOLDING: &[&str] = &["html", "head", "body"];

/// A parsed markup fragment.
#[derive(Debug)]
pub struct Fragment {
    document: Html,
}

impl Fragment {
    /// Parse a markup string into a queryable tree.
    ///
    /// The tree builder recovers from unbalanced tags and similar noise, which
    /// is only traced. Input that yields no element at all (empty, whitespace,
    /// bare text) cannot describe any record and is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::MalformedMarkup`] if the string holds no markup.
    pub fn parse(markup: &str) -> Result<Self> {
        if markup.trim().is_empty() {
            return Err(ExtractError::MalformedMarkup {
                reason: "fragment is empty".to_string(),
            });
        }

        let document = Html::parse_document(markup);
        for complaint in &document.errors {
            trace!(complaint = %complaint, "Tree builder recovered from markup error");
        }

        let has_elements = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .any(|element| !SCAFFOLDING.contains(&element.value().name()));
        if !has_elements {
            return Err(ExtractError::MalformedMarkup {
                reason: "fragment contains no elements".to_string(),
            });
        }

        Ok(Self { document })
    }

    /// The document root, usable as a query scope.
    #[must_use]
    pub fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    /// First element in document order matching `selector`.
    #[must_use]
    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.document.select(selector).next()
    }

    /// All elements matching `selector`, in document order.
    pub fn select_all<'a>(
        &'a self,
        selector: &'a Selector,
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.document.select(selector)
    }

    /// First match for `selector`, or a missing-element error naming `what`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::MissingRequiredElement`] if nothing matches.
    pub fn require(&self, selector: &Selector, what: &str) -> Result<ElementRef<'_>> {
        self.select_first(selector).ok_or_else(|| ExtractError::missing(what))
    }
}

/// Compile a selector literal.
///
/// Only used for the fixed selector vocabulary compiled into this crate.
pub(crate) fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("Invalid selector")
}

/// First descendant of `scope` matching `selector`.
#[must_use]
pub fn first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// First descendant of `scope` matching `selector`, or an error naming `what`.
///
/// # Errors
///
/// Returns [`ExtractError::MissingRequiredElement`] if nothing matches.
pub fn required<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    what: &str,
) -> Result<ElementRef<'a>> {
    first(scope, selector).ok_or_else(|| ExtractError::missing(what))
}

/// Direct element children of `parent` that match `selector`.
///
/// Unlike [`first`], this does not descend, which keeps a comment's own fields
/// apart from those of its nested replies.
pub fn child_elements<'a>(
    parent: ElementRef<'a>,
    selector: &'a Selector,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| selector.matches(child))
}

/// The element's attribute map.
#[must_use]
pub fn attributes(element: ElementRef<'_>) -> BTreeMap<&str, &str> {
    element.value().attrs().collect()
}

/// A single attribute value, if present.
#[must_use]
pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}

/// An attribute that must be present.
///
/// # Errors
///
/// Returns [`ExtractError::MissingRequiredElement`] naming `element[name]`.
pub fn required_attr(element: ElementRef<'_>, name: &str) -> Result<String> {
    attr(element, name)
        .map(str::to_string)
        .ok_or_else(|| ExtractError::missing(format!("{}[{name}]", element.value().name())))
}

/// Whether the element carries the given class.
#[must_use]
pub fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Text nodes that are direct children of the element, trimmed.
#[must_use]
pub fn own_text(element: ElementRef<'_>) -> String {
    let text: String = element
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|text| &**text)
        .collect();
    text.trim().to_string()
}

/// All descendant text, trimmed.
#[must_use]
pub fn full_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Rendered inner HTML, trimmed.
#[must_use]
pub fn inner_html(element: ElementRef<'_>) -> String {
    element.inner_html().trim().to_string()
}

/// Text that immediately follows the element, up to the next sibling element.
///
/// Comment nodes in between are skipped. The result is not trimmed.
#[must_use]
pub fn trailing_text(element: ElementRef<'_>) -> String {
    let mut tail = String::new();
    for sibling in element.next_siblings() {
        match sibling.value() {
            Node::Text(text) => tail.push_str(text),
            Node::Element(_) => break,
            _ => {}
        }
    }
    tail
}

/// Leading integer of a count label such as `"1,234 subscribers"`.
///
/// Labels without a leading number count as zero.
#[must_use]
pub fn leading_integer(text: &str) -> u32 {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

/// Strip the `~` prefix from a group path such as `~music`.
#[must_use]
pub fn group_name(text: &str) -> String {
    let trimmed = text.trim();
    trimmed.strip_prefix('~').unwrap_or(trimmed).to_string()
}
