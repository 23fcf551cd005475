//! HTML to canonical text conversion.
//!
//! The conversion keeps the formatting that carries meaning in legal texts
//! and drops the rest:
//!
//! - `<sup>1</sup>` becomes `^1`
//! - `<br>` becomes a line break, `<p>` a paragraph followed by a blank line
//! - `<ol>` items are numbered `1. `, `2. `, ... one per line
//! - the page navigation container is skipped
//!
//! The tree is walked with an explicit stack, so deeply nested documents do
//! not grow the call stack.

use scraper::node::Element;
use scraper::{ElementRef, Node};

/// Prefix marking superscript text.
pub const SUPERSCRIPT_MARKER: char = '^';

/// `id` attributes of `<div>` containers holding page navigation.
pub const NAVIGATION_CONTAINER_IDS: &[&str] = &["pageNavigation"];

/// How an element contributes to the canonical text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    Superscript,
    LineBreak,
    Paragraph,
    OrderedList,
    Skip,
    Inline,
}

impl Handler {
    fn for_element(element: &Element) -> Self {
        match element.name() {
            "sup" => Handler::Superscript,
            "br" => Handler::LineBreak,
            "p" => Handler::Paragraph,
            "ol" => Handler::OrderedList,
            "script" | "style" => Handler::Skip,
            "div"
                if element
                    .id()
                    .is_some_and(|id| NAVIGATION_CONTAINER_IDS.contains(&id)) =>
            {
                Handler::Skip
            }
            _ => Handler::Inline,
        }
    }
}

/// Text rendered for a subtree.
#[derive(Debug, Default)]
struct Rendered {
    text: String,
    /// Whether the subtree holds content other than superscripts: non-whitespace
    /// text, a paragraph or a list.
    has_text: bool,
    /// Number of non-empty superscripts in the subtree.
    superscripts: usize,
}

impl Rendered {
    fn from_text(raw: &str) -> Self {
        let text = normalize_chars(raw);
        let has_text = !text.trim().is_empty();
        Self {
            text,
            has_text,
            superscripts: 0,
        }
    }

    fn push(&mut self, other: Rendered) {
        self.text.push_str(&other.text);
        self.has_text |= other.has_text;
        self.superscripts += other.superscripts;
    }

    /// A single footnote reference with nothing around it.
    fn is_lone_superscript(&self) -> bool {
        !self.has_text && self.superscripts == 1
    }
}

/// An element whose children are still being visited.
struct Frame<C> {
    handler: Handler,
    children: C,
    out: Rendered,
    items: Vec<Rendered>,
}

impl<C> Frame<C> {
    fn new(handler: Handler, children: C) -> Self {
        let mut out = Rendered::default();
        if handler == Handler::Superscript {
            out.text.push(SUPERSCRIPT_MARKER);
        }
        Self {
            handler,
            children,
            out,
            items: Vec::new(),
        }
    }

    fn accept(&mut self, child: Rendered) {
        match self.handler {
            Handler::OrderedList => self.items.push(child),
            _ => self.out.push(child),
        }
    }

    fn finish(self) -> Rendered {
        match self.handler {
            Handler::Superscript => {
                // An empty superscript leaves no marker behind.
                if self.out.text.len() == SUPERSCRIPT_MARKER.len_utf8() {
                    return Rendered::default();
                }
                Rendered {
                    text: self.out.text,
                    has_text: false,
                    superscripts: self.out.superscripts + 1,
                }
            }
            Handler::Paragraph => {
                if self.out.text.trim().is_empty() {
                    return Rendered::default();
                }
                let mut text = self.out.text.trim_end_matches(' ').to_string();
                text.push_str("\n\n");
                Rendered {
                    text,
                    has_text: true,
                    superscripts: self.out.superscripts,
                }
            }
            Handler::OrderedList => {
                if self.items.is_empty() {
                    return Rendered::default();
                }
                let superscripts = self.items.iter().map(|item| item.superscripts).sum();
                let mut text = String::new();
                for (index, item) in self.items.iter().enumerate() {
                    text.push_str(&format!("{}. {}\n", index + 1, item.text.trim()));
                }
                text.push('\n');
                Rendered {
                    text,
                    has_text: true,
                    superscripts,
                }
            }
            Handler::Inline | Handler::LineBreak | Handler::Skip => self.out,
        }
    }
}

/// Strips trailing spaces from the text accumulated so far, which may span
/// several open elements, then starts a new line in the innermost one.
fn line_break<C>(stack: &mut [Frame<C>]) {
    if stack
        .last()
        .is_none_or(|frame| frame.handler == Handler::OrderedList)
    {
        return;
    }
    for frame in stack.iter_mut().rev() {
        if frame.handler == Handler::OrderedList {
            break;
        }
        let kept = frame.out.text.trim_end_matches(' ').len();
        frame.out.text.truncate(kept);
        if !frame.out.text.is_empty() {
            break;
        }
    }
    if let Some(frame) = stack.last_mut() {
        frame.out.text.push('\n');
    }
}

/// Renders `root` and its descendants. Text following `root` in its parent
/// is not part of the result.
fn render(root: ElementRef<'_>) -> Rendered {
    let handler = Handler::for_element(root.value());
    match handler {
        Handler::Skip => return Rendered::default(),
        Handler::LineBreak => {
            return Rendered {
                text: "\n".to_string(),
                ..Rendered::default()
            };
        }
        _ => {}
    }

    let mut stack = vec![Frame::new(handler, root.children())];
    while let Some(frame) = stack.last_mut() {
        let Some(child) = frame.children.next() else {
            let Some(done) = stack.pop() else { break };
            let rendered = done.finish();
            match stack.last_mut() {
                Some(parent) => parent.accept(rendered),
                None => return rendered,
            }
            continue;
        };

        match child.value() {
            // Only the items of a list are rendered, never the text between them.
            Node::Text(text) if frame.handler != Handler::OrderedList => {
                frame.accept(Rendered::from_text(text));
            }
            Node::Element(element) => match Handler::for_element(element) {
                Handler::LineBreak => line_break(&mut stack),
                Handler::Skip => {}
                handler => stack.push(Frame::new(handler, child.children())),
            },
            _ => {}
        }
    }
    Rendered::default()
}

/// Replaces non-breaking spaces, drops soft hyphens and maps dash variants
/// to `-`.
fn normalize_chars(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\u{a0}' => Some(' '),
            '\u{ad}' => None,
            '\u{2010}' | '\u{2011}' | '\u{2013}' | '\u{2212}' => Some('-'),
            c => Some(c),
        })
        .collect()
}

/// Canonical text of a single element.
pub fn canonicalize(element: ElementRef<'_>) -> String {
    canonicalize_all([element])
}

/// Canonical text of several elements, concatenated in order.
pub fn canonicalize_all<'a, I>(elements: I) -> String
where
    I: IntoIterator<Item = ElementRef<'a>>,
{
    let mut all = Rendered::default();
    for element in elements {
        all.push(render(element));
    }

    let trimmed = all.text.trim();
    let only_marker = trimmed.chars().eq([SUPERSCRIPT_MARKER]);
    if trimmed.is_empty() || only_marker || all.is_lone_superscript() {
        return String::new();
    }
    all.text
}
