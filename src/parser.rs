//! Streaming JSON5 parsing for sprite definition files
//!
//! A definition file holds one or more sprite definitions, either as a
//! stream of top-level objects (single-line JSONL or multi-line JSON5) or as
//! a single top-level array. JSON5 adds comments, trailing commas, unquoted
//! keys and hex literals, which keeps hand-authored pixel grids readable.

use crate::models::SpriteDefinition;
use std::io::{BufRead, BufReader, Read};
use thiserror::Error;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

/// Parse a single JSON5 sprite definition.
pub fn parse_definition(text: &str, line_number: usize) -> Result<SpriteDefinition, ParseError> {
    json5::from_str(text).map_err(|e| ParseError { message: e.to_string(), line: line_number })
}

/// Parse a JSON5 value that is either one definition or an array of them.
fn parse_value(text: &str, line_number: usize) -> Result<Vec<SpriteDefinition>, ParseError> {
    if text.trim_start().starts_with('[') {
        json5::from_str(text).map_err(|e| ParseError { message: e.to_string(), line: line_number })
    } else {
        parse_definition(text, line_number).map(|d| vec![d])
    }
}

/// Tracks nesting depth across lines so complete top-level values can be cut
/// out of the stream. Brackets inside strings and comments do not count.
#[derive(Debug, Default)]
struct DepthTracker {
    depth: i32,
    opened: bool,
    quote: Option<char>,
    escape_next: bool,
    in_block_comment: bool,
}

impl DepthTracker {
    fn feed(&mut self, line: &str) {
        let mut chars = line.chars().peekable();
        while let Some(ch) = chars.next() {
            if self.in_block_comment {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    self.in_block_comment = false;
                }
                continue;
            }
            if self.escape_next {
                self.escape_next = false;
                continue;
            }
            if let Some(q) = self.quote {
                match ch {
                    '\\' => self.escape_next = true,
                    c if c == q => self.quote = None,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' | '\'' => self.quote = Some(ch),
                '/' if chars.peek() == Some(&'/') => break,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    self.in_block_comment = true;
                }
                '{' | '[' => {
                    self.depth += 1;
                    self.opened = true;
                }
                '}' | ']' => self.depth -= 1,
                _ => {}
            }
        }
        // JSON5 strings cannot span lines without an escaped newline
        if !self.escape_next {
            self.quote = None;
        }
    }

    fn is_balanced(&self) -> bool {
        self.depth <= 0 && self.quote.is_none() && !self.in_block_comment
    }
}

/// Parse a stream of JSON5 sprite definitions.
///
/// Supports both formats:
/// - Single-line JSONL (one JSON5 object per line)
/// - Multi-line JSON5 (values can span multiple lines, separated by whitespace)
///
/// A top-level array is accepted in place of an object and contributes all
/// of its elements. Definitions are returned in file order.
///
/// The stream is all-or-nothing: the first malformed value fails the whole
/// stream, since a partially understood file is not a safe source of sprites.
pub fn parse_stream<R: Read>(reader: R) -> Result<Vec<SpriteDefinition>, ParseError> {
    let mut definitions = Vec::new();
    let buf_reader = BufReader::new(reader);

    let mut accumulator = String::new();
    let mut tracker = DepthTracker::default();
    let mut start_line = 1;

    for (i, line) in buf_reader.lines().enumerate() {
        let current_line = i + 1;
        let line = line.map_err(|e| ParseError { message: e.to_string(), line: current_line })?;

        // Skip empty lines when not accumulating
        if accumulator.is_empty() && line.trim().is_empty() {
            continue;
        }
        if accumulator.is_empty() {
            start_line = current_line;
        } else {
            accumulator.push('\n');
        }
        accumulator.push_str(&line);
        tracker.feed(&line);

        // Comment-only lines before a value don't start one
        if !tracker.opened {
            if tracker.is_balanced() && !accumulator.trim().is_empty() && !is_comment(&accumulator) {
                return Err(ParseError {
                    message: format!("expected an object or array, found '{}'", accumulator.trim()),
                    line: start_line,
                });
            }
            if tracker.is_balanced() {
                accumulator.clear();
            }
            continue;
        }

        if tracker.is_balanced() {
            definitions.extend(parse_value(&accumulator, start_line)?);
            accumulator.clear();
            tracker = DepthTracker::default();
        }
    }

    // Unterminated trailing value
    if !accumulator.trim().is_empty() {
        definitions.extend(parse_value(&accumulator, start_line)?);
    }

    Ok(definitions)
}

fn is_comment(text: &str) -> bool {
    text.lines().all(|l| {
        let l = l.trim();
        l.is_empty() || l.starts_with("//") || l.starts_with("/*") || l.starts_with('*')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, PaletteColor};
    use std::io::Cursor;

    const DOT: &str = r#"{"name": "dot", "width": 1, "height": 1, "palette": {"1": 16711680}, "angles": {"down": [[[1]]]}}"#;

    #[test]
    fn test_parse_definition() {
        let sprite = parse_definition(DOT, 1).unwrap();
        assert_eq!(sprite.name, "dot");
        assert_eq!(sprite.palette.get(1), Some(PaletteColor::Rgb([255, 0, 0])));
    }

    #[test]
    fn test_parse_definition_unquoted_direction_keys() {
        let sprite = parse_definition(
            "{name: 'dot', width: 1, height: 1, palette: {}, angles: {down: [[[0]]], right: [[[0]]]}}",
            1,
        )
        .unwrap();
        assert_eq!(sprite.defined_directions(), vec![Direction::Down, Direction::Right]);
    }

    #[test]
    fn test_parse_definition_invalid_json() {
        let err = parse_definition("{not valid json}", 5).unwrap_err();
        assert_eq!(err.line, 5);
    }

    #[test]
    fn test_parse_definition_missing_field() {
        let result = parse_definition(r#"{"name": "dot", "width": 1}"#, 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_stream_jsonl() {
        let input = format!("{}\n{}\n", DOT, DOT.replace("\"dot\"", "\"dot2\""));
        let sprites = parse_stream(Cursor::new(input)).unwrap();
        let names: Vec<&str> = sprites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["dot", "dot2"]);
    }

    #[test]
    fn test_parse_stream_multiline_json5() {
        let input = r#"
// Robot companion
{
  name: 'robot',
  width: 2,
  height: 2,
  scale: 2,
  palette: {
    "0": null,   // transparent
    "1": 0x555566, /* outline */
  },
  angles: {
    down: [
      [
        [0, 1],
        [1, 0],
      ],
    ],
  },
}
"#;
        let sprites = parse_stream(Cursor::new(input)).unwrap();
        assert_eq!(sprites.len(), 1);
        let robot = &sprites[0];
        assert_eq!(robot.name, "robot");
        assert_eq!(robot.scale, 2);
        assert_eq!(robot.palette.get(0), Some(PaletteColor::Transparent));
        assert_eq!(robot.palette.get(1), Some(PaletteColor::Rgb([0x55, 0x55, 0x66])));
        assert_eq!(robot.angles[&Direction::Down][0], vec![vec![0, 1], vec![1, 0]]);
    }

    #[test]
    fn test_parse_stream_top_level_array() {
        let input = format!("[\n{},\n{}\n]", DOT, DOT.replace("\"dot\"", "\"other\""));
        let sprites = parse_stream(Cursor::new(input)).unwrap();
        assert_eq!(sprites.len(), 2);
        assert_eq!(sprites[1].name, "other");
    }

    #[test]
    fn test_parse_stream_braces_in_strings_and_comments() {
        let input = r#"{
  name: "br{ace}s", // a } in a comment
  width: 1, height: 1, /* { */
  palette: {},
  angles: {down: [[[0]]]},
}"#;
        let sprites = parse_stream(Cursor::new(input)).unwrap();
        assert_eq!(sprites.len(), 1);
        assert_eq!(sprites[0].name, "br{ace}s");
    }

    #[test]
    fn test_parse_stream_error_reports_start_line() {
        let input = format!("{}\n\n{{\n  name: \"bad\",\n  oops\n}}\n", DOT);
        let err = parse_stream(Cursor::new(input)).unwrap_err();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_parse_stream_stray_text() {
        let err = parse_stream(Cursor::new("hello\n")).unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_parse_stream_empty() {
        assert!(parse_stream(Cursor::new("")).unwrap().is_empty());
        assert!(parse_stream(Cursor::new("// only a comment\n")).unwrap().is_empty());
    }
}
