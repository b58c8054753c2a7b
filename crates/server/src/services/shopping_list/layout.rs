//! Page layout for shopping list exports.
//!
//! Lines are placed onto fixed-capacity pages by a small state machine. A
//! page is either open with some lines remaining or full; writing to a full
//! page first starts a new one.
//!
//! Item text longer than a printed row is word-wrapped into continuation rows.
//! Each row takes one unit of page capacity, and all rows of an item stay on
//! the same page. Only an item taller than a whole page is carried over.

use core::fmt;
use std::mem;

use foodgram_core::CartLine;
use thiserror::Error;

/// Longest first row of an item, in characters.
pub const ROW_CHARS: usize = 56;

/// Longest continuation row of an item, in characters.
pub const CONTINUATION_CHARS: usize = 52;

/// Maximum number of rows on one page, title included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCapacity(usize);

impl PageCapacity {
    /// Smallest usable capacity: the title plus one item.
    pub const MIN: usize = 2;
    /// Largest capacity that still prints item text at 9pt or more on A4.
    pub const MAX: usize = 60;
    pub const DEFAULT: usize = 40;

    /// # Errors
    ///
    /// Returns `PageCapacityError` if `lines` is outside [`Self::MIN`]..=[`Self::MAX`].
    pub const fn new(lines: usize) -> Result<Self, PageCapacityError> {
        if lines < Self::MIN || lines > Self::MAX {
            return Err(PageCapacityError(lines));
        }
        Ok(Self(lines))
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for PageCapacity {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for PageCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Page capacity outside the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "page capacity must be between {min} and {max} lines (got {0})",
    min = PageCapacity::MIN,
    max = PageCapacity::MAX
)]
pub struct PageCapacityError(pub usize);

/// Fixed strings placed on the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutText {
    pub title: String,
    pub empty_notice: String,
}

impl Default for LayoutText {
    fn default() -> Self {
        Self {
            title: "Shopping list:".to_owned(),
            empty_notice: "Your shopping list is empty.".to_owned(),
        }
    }
}

/// How a line is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    /// First row of a numbered item.
    Item,
    /// Wrapped remainder of the item above.
    Continuation,
    Notice,
}

/// A line of text placed on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaidLine {
    pub style: LineStyle,
    pub text: String,
}

impl LaidLine {
    fn new(style: LineStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }
}

/// One page of laid-out lines, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    lines: Vec<LaidLine>,
}

impl Page {
    #[must_use]
    pub fn lines(&self) -> &[LaidLine] {
        &self.lines
    }

    /// Number of numbered ingredient lines on this page.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.style == LineStyle::Item)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    Open { remaining: usize },
    Full,
}

struct PageWriter {
    capacity: usize,
    pages: Vec<Page>,
    current: Page,
    state: PageState,
}

impl PageWriter {
    const fn new(capacity: PageCapacity) -> Self {
        Self {
            capacity: capacity.get(),
            pages: Vec::new(),
            current: Page { lines: Vec::new() },
            state: PageState::Open {
                remaining: capacity.get(),
            },
        }
    }

    /// Write the rows of one entry, starting a new page if they do not all
    /// fit on the current one. Rows that would not fit even on an empty page
    /// continue from where the current page ends.
    fn write(&mut self, rows: Vec<LaidLine>) {
        let fits = match self.state {
            PageState::Open { remaining } => rows.len() <= remaining,
            PageState::Full => false,
        };
        if !fits && rows.len() <= self.capacity && !self.current.lines.is_empty() {
            self.break_page();
        }
        for row in rows {
            self.push(row);
        }
    }

    fn push(&mut self, line: LaidLine) {
        if self.state == PageState::Full {
            self.break_page();
        }

        self.current.lines.push(line);
        self.state = match self.state {
            PageState::Open { remaining } if remaining > 1 => PageState::Open {
                remaining: remaining - 1,
            },
            _ => PageState::Full,
        };
    }

    fn break_page(&mut self) {
        let page = mem::take(&mut self.current);
        self.pages.push(page);
        self.state = PageState::Open {
            remaining: self.capacity,
        };
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.current.lines.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Text of the `n`th item (1-based): `"{n}. {name} - {amount} {unit}."`.
#[must_use]
pub fn item_text(n: usize, line: &CartLine) -> String {
    format!("{n}. {line}.")
}

/// Split `text` into rows of at most [`ROW_CHARS`] characters for the first
/// row and [`CONTINUATION_CHARS`] after it.
///
/// Breaks fall between words. A word too long for a row of its own is cut
/// to fill the row it starts on. Runs of whitespace collapse to one space.
#[must_use]
pub fn wrap(text: &str) -> Vec<String> {
    let mut rows: Vec<String> = Vec::new();
    let mut row = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        loop {
            let limit = if rows.is_empty() { ROW_CHARS } else { CONTINUATION_CHARS };
            let used = row.chars().count();
            let gap = usize::from(used > 0);
            let len = word.chars().count();

            if used + gap + len <= limit {
                if gap > 0 {
                    row.push(' ');
                }
                row.push_str(word);
                break;
            }

            let room = limit.saturating_sub(used + gap);
            if used > 0 && (len <= CONTINUATION_CHARS || room == 0) {
                rows.push(mem::take(&mut row));
                continue;
            }

            let cut = word.char_indices().nth(room).map_or(word.len(), |(i, _)| i);
            let (head, tail) = word.split_at(cut);
            if gap > 0 {
                row.push(' ');
            }
            row.push_str(head);
            rows.push(mem::take(&mut row));
            word = tail;
            if word.is_empty() {
                break;
            }
        }
    }

    if !row.is_empty() || rows.is_empty() {
        rows.push(row);
    }
    rows
}

fn item_rows(n: usize, line: &CartLine) -> Vec<LaidLine> {
    wrap(&item_text(n, line))
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let style = if i == 0 { LineStyle::Item } else { LineStyle::Continuation };
            LaidLine::new(style, text)
        })
        .collect()
}

/// Lay `lines` out on pages in input order.
///
/// The first page opens with the title. An empty list yields a single page
/// holding only the empty-cart notice.
#[must_use]
pub fn lay_out(lines: &[CartLine], capacity: PageCapacity, text: &LayoutText) -> Vec<Page> {
    if lines.is_empty() {
        return vec![Page {
            lines: vec![LaidLine::new(LineStyle::Notice, text.empty_notice.as_str())],
        }];
    }

    let mut writer = PageWriter::new(capacity);
    writer.write(vec![LaidLine::new(LineStyle::Title, text.title.as_str())]);
    for (index, line) in lines.iter().enumerate() {
        writer.write(item_rows(index + 1, line));
    }
    writer.finish()
}
