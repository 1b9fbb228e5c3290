//! # Dialect Parsing
//!
//! Data and schema text are parsed with `jsonc-parser`. Resolved parser
//! options map onto its tolerances:
//!
//! | Option                     | `jsonc_parser::ParseOptions`             |
//! |----------------------------|------------------------------------------|
//! | comments                   | `allow_comments`                         |
//! | trailing commas            | `allow_trailing_commas`                  |
//! | single-quoted strings      | `allow_single_quoted_strings`            |
//! | `json5` mode               | `allow_loose_object_property_names`, `allow_hexadecimal_numbers`, `allow_unary_plus_numbers` |
//!
//! Missing commas are never accepted.
//!
//! `jsonc-parser` keeps the last value of a repeated key. When duplicate
//! keys are not allowed the document's AST is walked first and the second
//! occurrence of a key is reported.
//!
//! Every failure becomes a located `ErrorKind::Parse` detail:
//!
//! ```text
//! Parse error on line 1, column 10:
//! {"a": 1, "a": 2}
//! ---------^
//! Duplicate key "a"
//! ```

use std::collections::HashSet;

use jsonc_parser::ast::{self, ObjectPropName};
use jsonc_parser::{CollectOptions, ParseOptions};
use jsonlint_core::{ErrorDetail, ErrorKind, Mode, ParserOptions};
use serde_json::Value;

/// Characters of source context kept on each side of the error column.
const EXCERPT_CONTEXT: usize = 40;

/// Translate resolved parser options into `jsonc-parser` tolerances.
pub fn parse_options(options: &ParserOptions) -> ParseOptions {
    let json5 = options.mode == Mode::Json5;
    let mut parse = ParseOptions::default();
    parse.allow_comments = options.ignore_comments;
    parse.allow_trailing_commas = options.ignore_trailing_commas;
    parse.allow_single_quoted_strings = options.allow_single_quoted_strings;
    parse.allow_loose_object_property_names = json5;
    parse.allow_hexadecimal_numbers = json5;
    parse.allow_unary_plus_numbers = json5;
    parse.allow_missing_commas = false;
    parse
}

/// Parse `text` as a single document under `options`.
///
/// # Errors
///
/// Returns a located `ErrorKind::Parse` detail. Empty or whitespace-only
/// text is an error: there is no empty JSON document.
pub fn parse(text: &str, options: &ParserOptions) -> Result<Value, ErrorDetail> {
    let parse = parse_options(options);
    if !options.allow_duplicate_object_keys {
        let document = jsonc_parser::parse_to_ast(text, &CollectOptions::default(), &parse)
            .map_err(|e| located(text, e.range().start, reason(&e.to_string())))?;
        if let Some(value) = &document.value {
            reject_duplicates(text, value)?;
        }
    }
    match jsonc_parser::parse_to_serde_value(text, &parse) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(located(text, text.len(), "Unexpected end of input")),
        Err(e) => Err(located(text, e.range().start, reason(&e.to_string()))),
    }
}

fn reject_duplicates(text: &str, value: &ast::Value<'_>) -> Result<(), ErrorDetail> {
    match value {
        ast::Value::Object(object) => {
            let mut seen = HashSet::new();
            for property in &object.properties {
                let (key, start) = match &property.name {
                    ObjectPropName::String(name) => (name.value.as_ref(), name.range.start),
                    ObjectPropName::Word(name) => (name.value, name.range.start),
                };
                if !seen.insert(key) {
                    return Err(located(text, start, format!("Duplicate key \"{key}\"")));
                }
                reject_duplicates(text, &property.value)?;
            }
            Ok(())
        }
        ast::Value::Array(array) => array
            .elements
            .iter()
            .try_for_each(|element| reject_duplicates(text, element)),
        _ => Ok(()),
    }
}

// `jsonc-parser` appends its own "on line L column C" suffix.
fn reason(message: &str) -> String {
    message
        .split(" on line ")
        .next()
        .unwrap_or(message)
        .to_string()
}

/// A parse failure at byte `offset` of `text`, with 1-based line and column
/// (in characters), an excerpt of the offending line and a pointer to the
/// column.
pub fn located(text: &str, offset: usize, reason: impl Into<String>) -> ErrorDetail {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &text[..offset];
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let line = before.matches('\n').count() + 1;
    let column = before[line_start..].chars().count() + 1;
    let line_end = text[offset..]
        .find(|c: char| c == '\n' || c == '\r')
        .map_or(text.len(), |i| offset + i);

    let source_line: Vec<char> = text[line_start..line_end].chars().collect();
    let caret = column - 1;
    let window_start = caret.saturating_sub(EXCERPT_CONTEXT);
    let window_end = (caret + EXCERPT_CONTEXT).min(source_line.len());
    let excerpt: String = source_line[window_start..window_end].iter().collect();
    let pointer = format!("{}^", "-".repeat(caret - window_start));

    ErrorDetail::new(
        ErrorKind::Parse,
        format!(
            "Parse error on line {line}, column {column}:\n{excerpt}\n{pointer}\n{}",
            reason.into()
        ),
    )
    .with_location(line, column)
}
