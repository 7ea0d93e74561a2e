//! Selector interface used by the extractor, plus the `scraper` backend.
//!
//! Extraction only ever asks two questions of a document: "which elements
//! have this tag and class?" and, per element, "what is the first descendant
//! with this tag and class, and what text does it hold?". Keeping that surface
//! small lets the extractor run against synthetic trees in tests.

use scraper::{ElementRef, Html, Selector};

/// A parsed document that can be queried by tag and class.
pub trait DocumentTree {
    type Node<'a>: TreeNode
    where
        Self: 'a;

    /// All elements named `tag` whose class list contains `class`, in document order.
    fn select_by_tag_and_class<'a>(&'a self, tag: &str, class: &str) -> Vec<Self::Node<'a>>;
}

/// One element inside a [`DocumentTree`].
pub trait TreeNode: Sized {
    /// First descendant (excluding the node itself) named `tag` with class `class`.
    fn find_descendant(&self, tag: &str, class: &str) -> Option<Self>;

    /// Concatenated text of the node and all its descendants, unmodified.
    fn text_content(&self) -> String;
}

/// Parse markup leniently. Malformed input yields a best-effort tree, never an error.
pub fn parse(body: &str) -> Html {
    Html::parse_document(body)
}

fn tag_class_selector(tag: &str, class: &str) -> Option<Selector> {
    let css = format!("{tag}.{class}");
    match Selector::parse(&css) {
        Ok(sel) => Some(sel),
        Err(err) => {
            tracing::warn!(selector=%css, error=%err, "web.selector.invalid");
            None
        }
    }
}

impl DocumentTree for Html {
    type Node<'a>
        = ElementRef<'a>
    where
        Self: 'a;

    fn select_by_tag_and_class<'a>(&'a self, tag: &str, class: &str) -> Vec<ElementRef<'a>> {
        match tag_class_selector(tag, class) {
            Some(sel) => self.select(&sel).collect(),
            None => Vec::new(),
        }
    }
}

impl<'a> TreeNode for ElementRef<'a> {
    fn find_descendant(&self, tag: &str, class: &str) -> Option<Self> {
        let sel = tag_class_selector(tag, class)?;
        self.select(&sel).next()
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }
}
