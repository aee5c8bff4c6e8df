//! Line wrapping
//!
//! [`Lines`] pulls characters from the input only as fragments are requested.
//! Characters accumulate on the current line; the most recent break
//! opportunity (after a space, at a soft hyphen, after a wide glyph) is kept
//! as a segment start. When a character would overflow the column limit the
//! line is cut at that segment, or, if there is none, right before the
//! character.

use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::mem;
use std::str::Chars;

use super::{AtomicClusters, ClusterSupport, State, TypesetOptions, Typesetter};
use crate::width::{Advance, Width};

const TAB: u32 = 0x09;
const LF: u32 = 0x0A;
const CR: u32 = 0x0D;
const SPACE: u32 = 0x20;
const SOFT_HYPHEN: u32 = 0xAD;

/// Cursor position reported alongside wrapped output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Line feeds emitted so far
    pub lines_advanced: usize,
    /// Column before the last fragment's terminator, or the final column once
    /// the input is exhausted
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Join {
    Whitespace,
    SoftHyphen,
    Continuous,
}

/// A break opportunity on the current line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    /// Byte offset into the line
    start: usize,
    /// Column at that offset
    column: usize,
    join: Join,
}

/// Wrapped output fragments, each ending with its terminator except the last
#[derive(Debug)]
pub struct Lines<'a, 't> {
    typesetter: Typesetter<'a>,
    chars: Chars<'t>,
    state: State,

    limit: usize,
    wrap_column: usize,
    tab_size: Option<usize>,
    nice_wrap: bool,
    soft_hyphens: bool,
    pad: bool,
    atomic: bool,

    column: usize,
    line: String,
    segment: Option<Segment>,
    /// Segment in effect before the last wide glyph added its own
    prior: Option<Segment>,
    /// The last visible codepoint added a segment after a wide glyph
    fresh_break: bool,
    swallow_space: bool,
    lines_advanced: usize,
    ready: VecDeque<(String, Metadata)>,
    metadata: Metadata,
    done: bool,
}

impl<'a, 't> Lines<'a, 't> {
    pub(super) fn new(typesetter: Typesetter<'a>, text: &'t str, options: &TypesetOptions) -> Self {
        let limit = options.column_limit.map_or(usize::MAX, |limit| limit.max(1));
        let wrap_column = options
            .wrap_column
            .unwrap_or(options.begin_column)
            .min(limit - 1);
        let atomic = match options.atomic_grapheme_clusters {
            AtomicClusters::Always => true,
            AtomicClusters::Never => false,
            AtomicClusters::IfSupported => {
                typesetter.supports_grapheme_clusters() == ClusterSupport::Full
            },
        };

        Self {
            typesetter,
            chars: text.chars(),
            state: typesetter.state(&options.state_options()),
            limit,
            wrap_column,
            tab_size: options.tab_size.map(|size| size.max(1)),
            nice_wrap: options.nice_wrap,
            soft_hyphens: options.soft_hyphens,
            pad: options.pad_unsupported_characters,
            atomic,
            column: options.begin_column,
            line: String::new(),
            segment: None,
            prior: None,
            fresh_break: false,
            swallow_space: false,
            lines_advanced: 0,
            ready: VecDeque::new(),
            metadata: Metadata::default(),
            done: false,
        }
    }

    /// Cursor position after the fragment most recently returned
    pub fn metadata(&self) -> Metadata {
        self.metadata
    }

    fn step(&mut self, c: char) {
        let codepoint = c as u32;
        if self.swallow_space {
            if codepoint == SPACE || codepoint == TAB {
                return;
            }
            self.swallow_space = false;
        }

        let was_escape = self.state.in_escape();
        let mut advance = self.typesetter.measure_stateful(codepoint, &mut self.state);
        let escape = was_escape || self.state.in_escape();
        if codepoint == SOFT_HYPHEN && self.soft_hyphens && !self.state.in_escape() {
            // Reserve room for the hyphen shown if the line breaks here
            advance = Advance::Cells(1);
        }

        if !escape {
            if self.fresh_break && self.atomic && self.state.uncertain_codepoints() > 1 {
                // The wide glyph turned out to start a cluster
                self.segment = self.prior;
            }
            self.fresh_break = false;
        }

        match advance {
            Advance::Cells(cells) if cells > 0 => self.place(c, cells.unsigned_abs() as usize),
            Advance::Cells(cells) => {
                self.attach(c, escape);
                self.column = self.column.saturating_sub(cells.unsigned_abs() as usize);
            },
            Advance::Control => self.control(c),
        }
    }

    /// Push a codepoint that takes no columns of its own. Marks and joiners
    /// stay with the glyph before them, so a break candidate at the end of
    /// the line moves past them.
    fn attach(&mut self, c: char, escape: bool) {
        let end = self.line.len();
        self.line.push(c);
        if escape {
            return;
        }
        if let Some(segment) = self.segment.as_mut().filter(|segment| segment.start == end) {
            segment.start = self.line.len();
        }
    }

    fn place(&mut self, c: char, cells: usize) {
        let codepoint = c as u32;
        let mut cells = cells;
        let mut padded = false;
        if self.pad && cells == 1 && self.typesetter.reference_width(codepoint) == Width::Wide {
            cells = 2;
            padded = true;
        }
        let hold = self.atomic && self.state.uncertain_codepoints() > 1;

        if self.column > 0 && self.column.saturating_add(cells) > self.limit {
            if codepoint == SPACE {
                self.segment = Some(self.segment_here(Join::Whitespace));
            }
            match self.segment {
                Some(segment) if self.nice_wrap && segment.start > 0 => self.break_at(segment),
                // Inside a cluster: let it run past the limit
                _ if hold => {},
                _ => self.hard_break(),
            }
            if self.nice_wrap && self.line.is_empty() && codepoint == SPACE {
                // Spaces directly after the break are dropped
                self.swallow_space = true;
                return;
            }
        }

        if codepoint == SPACE {
            self.line.push(' ');
            self.column = self.column.saturating_add(cells);
            self.segment = Some(self.segment_here(Join::Whitespace));
        } else if codepoint == SOFT_HYPHEN && self.soft_hyphens {
            self.segment = Some(self.segment_here(Join::SoftHyphen));
        } else {
            self.line.push(c);
            if padded {
                self.line.push(' ');
            }
            self.column = self.column.saturating_add(cells);
            if cells == 2 && !hold {
                self.prior = self.segment;
                self.segment = Some(self.segment_here(Join::Continuous));
                self.fresh_break = true;
            }
        }
    }

    fn control(&mut self, c: char) {
        match c as u32 {
            TAB if self.tab_size.is_some() => {
                let size = self.tab_size.unwrap_or(1);
                let next = (self.column / size).saturating_add(1).saturating_mul(size);
                if next >= self.limit {
                    let column = self.column;
                    self.line.push('\n');
                    self.finish_line(column, true);
                    if self.nice_wrap {
                        self.swallow_space = true;
                    }
                } else {
                    self.line.extend(std::iter::repeat(' ').take(next - self.column));
                    self.column = next;
                    self.segment = Some(self.segment_here(Join::Whitespace));
                }
            },
            LF => {
                let column = self.column;
                self.line.push('\n');
                self.finish_line(column, true);
            },
            CR => {
                let column = self.column;
                self.line.push('\r');
                self.finish_line(column, false);
            },
            _ => self.line.push(c),
        }
    }

    fn segment_here(&self, join: Join) -> Segment {
        Segment {
            start: self.line.len(),
            column: self.column,
            join,
        }
    }

    /// Cut the line at `segment`, carrying the rest over to the next line
    fn break_at(&mut self, segment: Segment) {
        let rest = self.line.split_off(segment.start);
        let mut head = mem::replace(&mut self.line, rest);
        let mut column = segment.column;
        if segment.join == Join::SoftHyphen {
            head.push('-');
            column = column.saturating_add(1);
        }
        head.push('\n');
        self.emit(head, column, true);

        self.column = self.column.saturating_sub(segment.column).saturating_add(self.wrap_column);
        self.segment = None;
        self.prior = None;

        let spaces = self.line.len() - self.line.trim_start_matches(' ').len();
        if spaces > 0 {
            self.line.drain(..spaces);
            self.column = self.column.saturating_sub(spaces);
        }
    }

    /// Cut the line right here
    fn hard_break(&mut self) {
        let column = self.column;
        self.line.push('\n');
        self.finish_line(column, true);
    }

    fn finish_line(&mut self, column: usize, line_feed: bool) {
        let line = mem::take(&mut self.line);
        self.emit(line, column, line_feed);
        self.column = self.wrap_column;
        self.segment = None;
        self.prior = None;
        self.fresh_break = false;
    }

    fn emit(&mut self, line: String, column: usize, line_feed: bool) {
        if line_feed {
            self.lines_advanced += 1;
        }
        let metadata = Metadata {
            lines_advanced: self.lines_advanced,
            column,
        };
        self.ready.push_back((line, metadata));
    }
}

impl Iterator for Lines<'_, '_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some((line, metadata)) = self.ready.pop_front() {
                self.metadata = metadata;
                return Some(line);
            }
            if self.done {
                return None;
            }
            match self.chars.next() {
                Some(c) => self.step(c),
                None => {
                    self.done = true;
                    self.metadata = Metadata {
                        lines_advanced: self.lines_advanced,
                        column: self.column,
                    };
                    if !self.line.is_empty() {
                        let line = mem::take(&mut self.line);
                        return Some(line);
                    }
                },
            }
        }
    }
}

impl FusedIterator for Lines<'_, '_> {}

#[cfg(test)]
mod tests {
    use crate::catalog::Catalog;
    use crate::profile::Environment;
    use crate::typesetter::{TypesetOptions, Typesetter};

    fn wrap(text: &str, options: TypesetOptions) -> Vec<String> {
        let catalog = Catalog::builtin();
        let ts = Typesetter::new(&catalog, &Environment::new()).unwrap();
        ts.typeset(text, &options).collect()
    }

    fn limit(columns: usize) -> TypesetOptions {
        TypesetOptions::default().with_column_limit(columns)
    }

    #[test]
    fn test_unbounded_keeps_one_line() {
        assert_eq!(wrap("hello world", TypesetOptions::default()), vec!["hello world"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(wrap("", limit(10)).is_empty());
    }

    #[test]
    fn test_line_feeds_pass_through() {
        assert_eq!(wrap("ab\ncd\r\n", limit(10)), vec!["ab\n", "cd\r", "\n"]);
    }

    #[test]
    fn test_trailing_spaces_stay_on_broken_line() {
        let options = TypesetOptions {
            tab_size: None,
            ..limit(6)
        };
        assert_eq!(wrap("aaa   bbbb", options), vec!["aaa   \n", "bbbb"]);
    }

    #[test]
    fn test_wrap_column_indents_continuations() {
        let options = TypesetOptions {
            wrap_column: Some(2),
            ..limit(8)
        };
        // continuation lines start at column 2, leaving 6 columns
        assert_eq!(wrap("aaaa bbbb cccc", options), vec!["aaaa \n", "bbbb \n", "cccc"]);
    }

    #[test]
    fn test_wrap_column_is_clamped_below_limit() {
        let options = TypesetOptions {
            wrap_column: Some(50),
            ..limit(3)
        };
        let lines = wrap("abcdefg", options);
        assert_eq!(lines, vec!["abc\n", "d\n", "e\n", "f\n", "g"]);
    }

    #[test]
    fn test_begin_column_shortens_first_line() {
        let options = TypesetOptions {
            begin_column: 6,
            wrap_column: Some(0),
            ..limit(10)
        };
        assert_eq!(wrap("abc defg", options), vec!["abc \n", "defg"]);
    }

    #[test]
    fn test_columns_saturate_near_usize_max() {
        let options = TypesetOptions {
            begin_column: usize::MAX - 1,
            ..TypesetOptions::default()
        };
        assert_eq!(wrap("a\tb", options.clone()), vec!["a\n", "b"]);
        assert_eq!(wrap("\u{6F22}\u{6F22}", options), vec!["\u{6F22}\u{6F22}"]);
    }

    #[test]
    fn test_space_after_split_word_is_kept() {
        assert_eq!(wrap("abcd ef", limit(3)), vec!["abc\n", "d \n", "ef"]);
    }

    #[test]
    fn test_soft_hyphen_disabled_is_printed() {
        let options = TypesetOptions {
            soft_hyphens: false,
            ..limit(40)
        };
        assert_eq!(wrap("a\u{AD}b", options), vec!["a\u{AD}b"]);
    }

    #[test]
    fn test_tabs_disabled_pass_through() {
        let options = TypesetOptions {
            tab_size: None,
            ..limit(40)
        };
        assert_eq!(wrap("a\tb", options), vec!["a\tb"]);
    }

    #[test]
    fn test_zero_tab_size_is_one() {
        let options = TypesetOptions {
            tab_size: Some(0),
            ..limit(40)
        };
        assert_eq!(wrap("a\tb", options), vec!["a b"]);
    }

    #[test]
    fn test_metadata() {
        let catalog = Catalog::builtin();
        let ts = Typesetter::new(&catalog, &Environment::new()).unwrap();
        let mut lines = ts.typeset("one two three", &limit(8));

        assert_eq!(lines.next().as_deref(), Some("one two \n"));
        assert_eq!(lines.metadata().lines_advanced, 1);
        assert_eq!(lines.metadata().column, 8);

        assert_eq!(lines.next().as_deref(), Some("three"));
        assert_eq!(lines.metadata().lines_advanced, 1);
        assert_eq!(lines.metadata().column, 5);

        assert_eq!(lines.next(), None);
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_metadata_after_trailing_line_feed() {
        let catalog = Catalog::builtin();
        let ts = Typesetter::new(&catalog, &Environment::new()).unwrap();
        let mut lines = ts.typeset("ab\n", &limit(8));
        assert_eq!(lines.next().as_deref(), Some("ab\n"));
        assert_eq!(lines.metadata().column, 2);
        assert_eq!(lines.next(), None);
        assert_eq!(lines.metadata().lines_advanced, 1);
        assert_eq!(lines.metadata().column, 0);
    }
}
