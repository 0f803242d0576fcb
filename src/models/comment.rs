use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use serde::Serialize;
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::fragment::{
    child_elements, first, full_text, inner_html, leading_integer, own_text, required,
    required_attr, sel, Fragment,
};
use crate::status::{comment_status, AccessStatus};

static COMMENT: Lazy<Selector> = Lazy::new(|| sel("article.comment[data-comment-id36]"));
static COMMENT_ITSELF: Lazy<Selector> = Lazy::new(|| sel("div.comment-itself"));
static AUTHOR: Lazy<Selector> = Lazy::new(|| sel("a.link-user"));
static POSTED_TIME: Lazy<Selector> = Lazy::new(|| sel("time.comment-posted-time[datetime]"));
static TEXT: Lazy<Selector> = Lazy::new(|| sel("div.comment-text"));
static VOTES: Lazy<Selector> = Lazy::new(|| sel(".comment-votes"));
static REPLIES: Lazy<Selector> = Lazy::new(|| sel("ol.comment-tree-replies"));
static REPLY_ITEM: Lazy<Selector> = Lazy::new(|| sel("li"));
static REPLY_ARTICLE: Lazy<Selector> = Lazy::new(|| sel("article.comment"));

/// A comment and the replies it owns.
///
/// When `status` is not [`AccessStatus::Full`] the content fields are empty,
/// but `children` still mirrors the reply tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id36: String,
    pub status: AccessStatus,
    /// Rendered HTML of the comment body.
    pub content: String,
    pub author: String,
    pub timestamp: String,
    pub num_votes: u32,
    pub children: Vec<Comment>,
}

impl Comment {
    /// Extract the outermost comment in `html` together with its replies.
    ///
    /// The fragment may be a bare `article.comment` or wrapped in any
    /// container.
    ///
    /// # Errors
    ///
    /// Fails on empty markup, a missing comment article, an unknown status
    /// warning, or a missing author/time/body on a visible comment.
    pub fn from_html(html: &str) -> Result<Self> {
        let fragment = Fragment::parse(html)?;
        let article = fragment.require(&COMMENT, "article.comment[data-comment-id36]")?;
        Self::from_element(article)
    }

    pub(crate) fn from_element(article: ElementRef<'_>) -> Result<Self> {
        let id36 = required_attr(article, "data-comment-id36")?;
        let itself = child_elements(article, &COMMENT_ITSELF)
            .next()
            .ok_or_else(|| ExtractError::missing("div.comment-itself"))?;

        let status = comment_status(itself)?;
        if !status.is_full() {
            return Ok(Self::hidden(id36, status, replies(article)?));
        }

        let author = own_text(required(itself, &AUTHOR, "a.link-user")?);
        let timestamp = required_attr(
            required(itself, &POSTED_TIME, "time.comment-posted-time")?,
            "datetime",
        )?;
        let content = inner_html(required(itself, &TEXT, "div.comment-text")?);
        let num_votes =
            first(itself, &VOTES).map_or(0, |votes| leading_integer(&full_text(votes)));
        let children = replies(article)?;

        debug!(id36 = %id36, replies = children.len(), "Extracted comment");

        Ok(Self {
            id36,
            status,
            content,
            author,
            timestamp,
            num_votes,
            children,
        })
    }

    fn hidden(id36: String, status: AccessStatus, children: Vec<Comment>) -> Self {
        Self {
            id36,
            status,
            content: String::new(),
            author: String::new(),
            timestamp: String::new(),
            num_votes: 0,
            children,
        }
    }

    /// Depth-first, pre-order walk over this comment and all of its replies.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

/// Direct replies of a comment article, in document order.
fn replies(article: ElementRef<'_>) -> Result<Vec<Comment>> {
    child_elements(article, &REPLIES)
        .flat_map(|list| child_elements(list, &REPLY_ITEM))
        .flat_map(|item| child_elements(item, &REPLY_ARTICLE))
        .map(Comment::from_element)
        .collect()
}

/// Iterator returned by [`Comment::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<&'a Comment>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Comment;

    fn next(&mut self) -> Option<Self::Item> {
        let comment = self.stack.pop()?;
        self.stack.extend(comment.children.iter().rev());
        Some(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id36: &str) -> Comment {
        Comment::hidden(id36.to_string(), AccessStatus::Deleted, vec![])
    }

    #[test]
    fn test_walk_is_pre_order() {
        let mut a = leaf("a");
        let mut b = leaf("b");
        b.children = vec![leaf("c")];
        a.children = vec![b, leaf("d")];

        let order: Vec<&str> = a.walk().map(|c| c.id36.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_missing_comment_itself() {
        let err =
            Comment::from_html(r#"<article class="comment" data-comment-id36="x"></article>"#)
                .unwrap_err();
        assert_eq!(err, ExtractError::missing("div.comment-itself"));
    }
}
