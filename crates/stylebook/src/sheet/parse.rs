//! Loading stylesheet text into rules.
//!
//! Only qualified rules (`selector { declarations }`) are kept. At-rules such
//! as `@media` or `@font-face` are skipped whole, and a declaration that does
//! not parse is dropped without affecting its neighbours.

use cssparser::{ParseError, Parser, ParserInput, Token};

use super::rule::{Declaration, Priority, StyleRule};

/// Parses a stylesheet into rules, in source order.
pub fn parse_rules(css: &str) -> Vec<StyleRule> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rules = Vec::new();

    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }

        let start = parser.position();
        let mut at_rule = false;
        let mut found_block = false;
        loop {
            match parser.next() {
                Ok(Token::CurlyBracketBlock) => {
                    found_block = true;
                    break;
                }
                Ok(Token::AtKeyword(_)) => at_rule = true,
                Ok(Token::Semicolon) if at_rule => break,
                Ok(_) => {}
                Err(_) => break,
            }
        }

        if at_rule {
            log::trace!("skipping at-rule: {}", parser.slice_from(start).trim());
            continue;
        }
        if !found_block {
            log::warn!("ignoring trailing stylesheet text without a block");
            break;
        }

        let prelude = parser.slice_from(start).trim_end_matches('{').trim();
        if prelude.is_empty() {
            continue;
        }
        let selector = prelude.to_string();

        let parsed: Result<Vec<Declaration>, ParseError<'_, ()>> =
            parser.parse_nested_block(|block| Ok(parse_declarations(block)));
        match parsed {
            Ok(declarations) => rules.push(StyleRule::with_declarations(&selector, declarations)),
            Err(_) => log::warn!("skipping rule with unreadable block: {}", selector),
        }
    }

    rules
}

/// Parses the inside of a declaration block.
///
/// Also used for `style="..."` attributes.
pub fn parse_declaration_list(text: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    parse_declarations(&mut parser)
}

fn parse_declarations(parser: &mut Parser<'_, '_>) -> Vec<Declaration> {
    let mut declarations = Vec::new();

    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }

        let name = match parser.next() {
            Ok(Token::Ident(name)) => name.to_string(),
            Ok(Token::Semicolon) => continue,
            Ok(_) => {
                skip_declaration(parser);
                continue;
            }
            Err(_) => break,
        };

        if parser.expect_colon().is_err() {
            skip_declaration(parser);
            continue;
        }

        // Nested blocks are consumed lazily by `next`, so the end position is
        // only reliable after the terminating semicolon has been read.
        let value_start = parser.position();
        loop {
            match parser.next() {
                Ok(Token::Semicolon) | Err(_) => break,
                Ok(_) => {}
            }
        }
        let value_end = parser.position();

        let raw = parser.slice(value_start..value_end).trim_end_matches(';');
        let (value, priority) = split_priority(raw);
        if value.is_empty() {
            log::debug!("dropping empty declaration for '{}'", name);
            continue;
        }
        declarations.push(Declaration::new(name, value, priority));
    }

    declarations
}

/// Consumes tokens through the next top-level semicolon.
fn skip_declaration(parser: &mut Parser<'_, '_>) {
    while let Ok(token) = parser.next() {
        if matches!(token, Token::Semicolon) {
            break;
        }
    }
}

/// Separates a trailing `! important` marker from a raw value.
///
/// Anything after a `!` other than `important` is discarded.
pub(crate) fn split_priority(raw: &str) -> (&str, Priority) {
    match raw.rfind('!') {
        Some(bang) => {
            let flag = raw[bang + 1..].trim();
            let priority = if flag.eq_ignore_ascii_case("important") {
                Priority::Important
            } else {
                Priority::Normal
            };
            (raw[..bang].trim(), priority)
        }
        None => (raw.trim(), Priority::Normal),
    }
}
