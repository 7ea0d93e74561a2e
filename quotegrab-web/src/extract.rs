use crate::tree::{DocumentTree, TreeNode};

/// Substituted when a container has no text element.
pub const TEXT_NOT_FOUND: &str = "text not found";
/// Substituted when a container has no author element.
pub const AUTHOR_NOT_FOUND: &str = "author not found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

/// A `(tag, class)` pair naming an element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementMatch {
    pub tag: &'static str,
    pub class: &'static str,
}

/// Where quotes live on a page: a repeating container holding a text field
/// and an author field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteLayout {
    pub container: ElementMatch,
    pub text: ElementMatch,
    pub author: ElementMatch,
}

impl QuoteLayout {
    /// `div.quote` > `span.text` + `small.author`, as served by quotes.toscrape.com.
    pub const DEFAULT: Self = Self {
        container: ElementMatch {
            tag: "div",
            class: "quote",
        },
        text: ElementMatch {
            tag: "span",
            class: "text",
        },
        author: ElementMatch {
            tag: "small",
            class: "author",
        },
    };

    /// Extract one [`Quote`] per container, in document order.
    ///
    /// Each field is looked up independently; a missing one is replaced by its
    /// sentinel so a single broken container never spoils the rest.
    pub fn extract<T: DocumentTree>(&self, doc: &T) -> Vec<Quote> {
        doc.select_by_tag_and_class(self.container.tag, self.container.class)
            .iter()
            .map(|container| Quote {
                text: field_text(container, self.text, TEXT_NOT_FOUND),
                author: field_text(container, self.author, AUTHOR_NOT_FOUND),
            })
            .collect()
    }
}

impl Default for QuoteLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn field_text<N: TreeNode>(container: &N, field: ElementMatch, sentinel: &str) -> String {
    match container.find_descendant(field.tag, field.class) {
        Some(node) => node.text_content().trim().to_string(),
        None => sentinel.to_string(),
    }
}

/// Extract quotes using [`QuoteLayout::DEFAULT`].
///
/// ```
/// use quotegrab_web::{extract_quotes, parse};
///
/// let doc = parse(r#"<div class="quote"><span class="text"> Be yourself. </span>
///     <small class="author">Oscar Wilde</small></div>"#);
/// let quotes = extract_quotes(&doc);
/// assert_eq!(quotes.len(), 1);
/// assert_eq!(quotes[0].text, "Be yourself.");
/// assert_eq!(quotes[0].author, "Oscar Wilde");
/// ```
pub fn extract_quotes<T: DocumentTree>(doc: &T) -> Vec<Quote> {
    QuoteLayout::DEFAULT.extract(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::parse;

    // ---- synthetic tree, no HTML involved ----

    #[derive(Debug, Clone, Default)]
    struct FakeNode {
        tag: &'static str,
        classes: Vec<&'static str>,
        text: &'static str,
        children: Vec<FakeNode>,
    }

    impl FakeNode {
        fn el(tag: &'static str, class: &'static str, text: &'static str) -> Self {
            Self {
                tag,
                classes: class.split_whitespace().collect(),
                text,
                children: Vec::new(),
            }
        }

        fn with(mut self, child: FakeNode) -> Self {
            self.children.push(child);
            self
        }

        fn is(&self, tag: &str, class: &str) -> bool {
            self.tag == tag && self.classes.contains(&class)
        }

        fn walk<'a>(&'a self, out: &mut Vec<&'a FakeNode>) {
            for child in &self.children {
                out.push(child);
                child.walk(out);
            }
        }
    }

    impl<'n> TreeNode for &'n FakeNode {
        fn find_descendant(&self, tag: &str, class: &str) -> Option<Self> {
            let node: &'n FakeNode = *self;
            let mut all = Vec::new();
            node.walk(&mut all);
            all.into_iter().find(|n| n.is(tag, class))
        }

        fn text_content(&self) -> String {
            let mut out = self.text.to_string();
            for child in &self.children {
                out.push_str(&child.text_content());
            }
            out
        }
    }

    struct FakeTree {
        root: FakeNode,
    }

    impl DocumentTree for FakeTree {
        type Node<'a>
            = &'a FakeNode
        where
            Self: 'a;

        fn select_by_tag_and_class<'a>(&'a self, tag: &str, class: &str) -> Vec<&'a FakeNode> {
            let mut all = Vec::new();
            self.root.walk(&mut all);
            all.into_iter().filter(|n| n.is(tag, class)).collect()
        }
    }

    fn full_quote(text: &'static str, author: &'static str) -> FakeNode {
        FakeNode::el("div", "quote", "")
            .with(FakeNode::el("span", "text", text))
            .with(FakeNode::el("small", "author", author))
    }

    #[test]
    fn synthetic_tree_in_document_order() {
        let tree = FakeTree {
            root: FakeNode::el("body", "", "")
                .with(full_quote("one", "A"))
                .with(FakeNode::el("p", "", "filler"))
                .with(full_quote("two", "B")),
        };
        let quotes = extract_quotes(&tree);
        assert_eq!(
            quotes,
            vec![
                Quote {
                    text: "one".into(),
                    author: "A".into()
                },
                Quote {
                    text: "two".into(),
                    author: "B".into()
                },
            ]
        );
    }

    #[test]
    fn synthetic_missing_author_uses_sentinel() {
        let tree = FakeTree {
            root: FakeNode::el("body", "", "").with(
                FakeNode::el("div", "quote", "").with(FakeNode::el("span", "text", "  kept  ")),
            ),
        };
        let quotes = extract_quotes(&tree);
        assert_eq!(quotes[0].text, "kept");
        assert_eq!(quotes[0].author, AUTHOR_NOT_FOUND);
    }

    #[test]
    fn custom_layout_is_honoured() {
        let layout = QuoteLayout {
            container: ElementMatch {
                tag: "article",
                class: "saying",
            },
            text: ElementMatch {
                tag: "p",
                class: "body",
            },
            author: ElementMatch {
                tag: "cite",
                class: "who",
            },
        };
        let tree = FakeTree {
            root: FakeNode::el("main", "", "").with(
                FakeNode::el("article", "saying", "")
                    .with(FakeNode::el("p", "body", "Know thyself"))
                    .with(FakeNode::el("cite", "who", "Socrates")),
            ),
        };
        let quotes = layout.extract(&tree);
        assert_eq!(quotes[0].text, "Know thyself");
        assert_eq!(quotes[0].author, "Socrates");
        assert!(extract_quotes(&tree).is_empty());
    }

    // ---- real HTML ----

    #[test]
    fn counts_every_container() {
        let mut html = String::from("<html><body>");
        for i in 0..7 {
            html.push_str(&format!(
                r#"<div class="quote"><span class="text">q{i}</span><small class="author">a{i}</small></div>"#
            ));
        }
        html.push_str("</body></html>");

        let quotes = extract_quotes(&parse(&html));
        assert_eq!(quotes.len(), 7);
        for (i, q) in quotes.iter().enumerate() {
            assert_eq!(q.text, format!("q{i}"));
            assert_eq!(q.author, format!("a{i}"));
        }
    }

    #[test]
    fn empty_document_yields_nothing() {
        assert!(extract_quotes(&parse("")).is_empty());
        assert!(extract_quotes(&parse("<html><body><p>nothing</p></body></html>")).is_empty());
    }

    #[test]
    fn missing_text_uses_sentinel() {
        let doc = parse(r#"<div class="quote"><small class="author">Anon</small></div>"#);
        let quotes = extract_quotes(&doc);
        assert_eq!(quotes[0].text, TEXT_NOT_FOUND);
        assert_eq!(quotes[0].author, "Anon");
    }

    #[test]
    fn missing_author_uses_sentinel() {
        let doc = parse(r#"<div class="quote"><span class="text">Orphan</span></div>"#);
        let quotes = extract_quotes(&doc);
        assert_eq!(quotes[0].text, "Orphan");
        assert_eq!(quotes[0].author, AUTHOR_NOT_FOUND);
    }

    #[test]
    fn trims_only_outer_whitespace() {
        let doc = parse(
            r#"<div class="quote"><span class="text">  Hello world  </span>
               <small class="author">
                   Jane  Doe
               </small></div>"#,
        );
        let quotes = extract_quotes(&doc);
        assert_eq!(quotes[0].text, "Hello world");
        assert_eq!(quotes[0].author, "Jane  Doe");
    }

    #[test]
    fn decodes_entities() {
        let doc = parse(
            r#"<div class="quote"><span class="text">&ldquo;Tom &amp; Jerry&rdquo;</span><small class="author">H&amp;B</small></div>"#,
        );
        let quotes = extract_quotes(&doc);
        assert_eq!(quotes[0].text, "\u{201c}Tom & Jerry\u{201d}");
        assert_eq!(quotes[0].author, "H&B");
    }
}
