//! Segment lexer for table properties lines
//!
//! A properties line is a comma separated list of `key=value` segments.
//! Commas only separate segments at brace depth zero and when they are not
//! escaped with a backslash, so values may carry nested property lists:
//!
//! ```text
//! transformer=FROM_LANDSCAPE, tables={transformer=ROWS\, column=a}
//! ```

use std::iter::FusedIterator;

const SEGMENT_SEPARATOR: char = ',';
const KEY_VALUE_SEPARATOR: char = '=';
const ESCAPE: char = '\\';
const GROUP_OPEN: char = '{';
const GROUP_CLOSE: char = '}';

/// A top-level `key=value` unit of a properties line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Segment text with comma escapes removed
    pub text: String,
    /// Byte offset of the segment start in the original input
    pub offset: usize,
}

impl Segment {
    /// Splits the segment into its key part and optional value part
    pub fn key_value(&self) -> (&str, Option<&str>) {
        split_key_value(&self.text)
    }
}

/// Lazily splits a properties line into segments
///
/// Blank segments are skipped. Unmatched braces are kept literally and an
/// unmatched `}` never drives the depth below zero.
#[derive(Debug, Clone)]
pub struct SegmentLexer<'a> {
    input: &'a str,
    position: usize,
    finished: bool,
}

impl<'a> SegmentLexer<'a> {
    /// Creates a lexer over the given input
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            finished: input.is_empty(),
        }
    }

    /// Returns the original input
    pub fn source(&self) -> &'a str {
        self.input
    }

    /// Returns the byte offset of the next segment
    pub fn current_offset(&self) -> usize {
        self.position
    }

    /// Scans one raw segment starting at the current position.
    ///
    /// Returns the unescaped text and the byte offset just past the
    /// separating comma, or `None` when the input ended.
    fn scan_segment(&self) -> (String, Option<usize>) {
        let rest = &self.input[self.position..];
        let mut text = String::with_capacity(rest.len().min(64));
        let mut depth = 0usize;
        let mut escaped = false;

        for (index, c) in rest.char_indices() {
            if escaped {
                escaped = false;
                if c != SEGMENT_SEPARATOR {
                    text.push(ESCAPE);
                }
                text.push(c);
                continue;
            }

            match c {
                ESCAPE => escaped = true,
                GROUP_OPEN => {
                    depth += 1;
                    text.push(c);
                }
                GROUP_CLOSE => {
                    depth = depth.saturating_sub(1);
                    text.push(c);
                }
                SEGMENT_SEPARATOR if depth == 0 => {
                    return (text, Some(self.position + index + c.len_utf8()));
                }
                _ => text.push(c),
            }
        }

        // trailing backslash has nothing to escape
        if escaped {
            text.push(ESCAPE);
        }
        (text, None)
    }
}

impl Iterator for SegmentLexer<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        while !self.finished {
            let offset = self.position;
            let (text, next) = self.scan_segment();
            match next {
                Some(next) => self.position = next,
                None => {
                    self.position = self.input.len();
                    self.finished = true;
                }
            }

            if !text.trim().is_empty() {
                return Some(Segment { text, offset });
            }
        }
        None
    }
}

impl FusedIterator for SegmentLexer<'_> {}

/// Splits a segment at its first unescaped `=`.
///
/// The key part is trimmed. The value part is returned untouched, including
/// surrounding whitespace and any nested brace groups. A segment without `=`
/// yields no value part.
pub fn split_key_value(segment: &str) -> (&str, Option<&str>) {
    let mut escaped = false;
    for (index, c) in segment.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            ESCAPE => escaped = true,
            KEY_VALUE_SEPARATOR => {
                let value_start = index + c.len_utf8();
                return (segment[..index].trim(), Some(&segment[value_start..]));
            }
            _ => {}
        }
    }
    (segment.trim(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        SegmentLexer::new(input).map(|segment| segment.text).collect()
    }

    #[test]
    fn test_splits_on_top_level_commas() {
        assert_eq!(texts("a=1,b=2, c=3"), vec!["a=1", "b=2", " c=3"]);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(texts("").is_empty());
        assert!(texts("  ,  , ").is_empty());
    }

    #[test]
    fn test_escaped_comma_is_unescaped() {
        assert_eq!(texts(r"list=a\,b,next=c"), vec!["list=a,b", "next=c"]);
    }

    #[test]
    fn test_backslash_elsewhere_is_literal() {
        assert_eq!(texts(r"custom=\"), vec![r"custom=\"]);
        assert_eq!(texts(r"path=C:\dir\file"), vec![r"path=C:\dir\file"]);
        assert_eq!(texts(r"chars=/:*$\"), vec![r"chars=/:*$\"]);
    }

    #[test]
    fn test_escaped_backslash_does_not_escape_comma() {
        assert_eq!(texts(r"a=x\\,b=y"), vec![r"a=x\\", "b=y"]);
    }

    #[test]
    fn test_commas_inside_braces_are_kept() {
        assert_eq!(
            texts("t=X, tables={a=1, b={c=2, d=3}}, z=9"),
            vec!["t=X", " tables={a=1, b={c=2, d=3}}", " z=9"]
        );
    }

    #[test]
    fn test_escaped_comma_inside_braces_is_unescaped() {
        assert_eq!(
            texts(r"tables={transformer=CUSTOM\, parameter1=value1}"),
            vec!["tables={transformer=CUSTOM, parameter1=value1}"]
        );
    }

    #[test]
    fn test_escaped_braces_do_not_nest() {
        assert_eq!(texts(r"a=\{,b=2"), vec![r"a=\{", "b=2"]);
    }

    #[test]
    fn test_unmatched_braces_are_tolerated() {
        assert_eq!(texts("a=}},b=2"), vec!["a=}}", "b=2"]);
        // an unclosed group swallows the rest of the line
        assert_eq!(texts("a={1,b=2"), vec!["a={1,b=2"]);
        // depth is floored, so the closing brace after the stray ones still
        // leaves the following comma at depth zero
        assert_eq!(texts("a=}{},b=2"), vec!["a=}{}", "b=2"]);
    }

    #[test]
    fn test_segment_offsets() {
        let segments: Vec<Segment> = SegmentLexer::new("a=1, b=2,,c").collect();
        let offsets: Vec<usize> = segments.iter().map(|segment| segment.offset).collect();
        assert_eq!(offsets, vec![0, 4, 10]);
    }

    #[test]
    fn test_lexer_is_fused() {
        let mut lexer = SegmentLexer::new("a=1");
        assert!(lexer.next().is_some());
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
        assert_eq!(lexer.current_offset(), 3);
    }

    #[test]
    fn test_multibyte_input() {
        assert_eq!(texts("ключ=значение,ü=ö"), vec!["ключ=значение", "ü=ö"]);
    }

    #[test]
    fn test_split_key_value() {
        assert_eq!(split_key_value(" key = value "), ("key", Some(" value ")));
        assert_eq!(split_key_value("key=a=b"), ("key", Some("a=b")));
        assert_eq!(split_key_value("key="), ("key", Some("")));
        assert_eq!(split_key_value(" flag "), ("flag", None));
    }

    #[test]
    fn test_split_key_value_skips_escaped_equals() {
        assert_eq!(split_key_value(r"a\=b=c"), (r"a\=b", Some("c")));
    }

    #[test]
    fn test_split_key_value_keeps_nested_groups() {
        assert_eq!(
            split_key_value("tables={x=1, y=2}"),
            ("tables", Some("{x=1, y=2}"))
        );
    }
}
