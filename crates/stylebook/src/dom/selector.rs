//! Selector matching for the page model.
//!
//! Supported: type and universal selectors, `.class`, `#id`, attribute
//! selectors (`[a]`, `[a=v]`, `[a~=v]`, `[a|=v]`, `[a^=v]`, `[a$=v]`,
//! `[a*=v]`), `:not(...)` over those, descendant and child combinators, and
//! comma-separated lists. A selector using anything else fails to parse and
//! therefore matches nothing.

use std::borrow::Cow;

use cssparser::{ParseError, Parser, ParserInput, Token};

use super::{Document, ElementId};

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(Vec<ComplexSelector>);

impl SelectorList {
    /// Parses selector text, returning `None` for unsupported syntax.
    pub fn parse(text: &str) -> Option<Self> {
        let mut input = ParserInput::new(text);
        let mut parser = Parser::new(&mut input);
        let mut builder = ListBuilder::default();

        loop {
            let token = match parser.next_including_whitespace() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };
            match token {
                Token::WhiteSpace(_) => builder.whitespace(),
                Token::Delim('>') => builder.child()?,
                Token::Comma => builder.end_selector()?,
                Token::Ident(name) => {
                    if !builder.compound.is_empty() {
                        return None;
                    }
                    builder.push(Simple::Tag(name.to_ascii_lowercase()))?;
                }
                Token::Delim('*') => builder.push(Simple::Universal)?,
                Token::Delim('.') => match parser.next_including_whitespace() {
                    Ok(Token::Ident(class)) => {
                        let class = class.to_string();
                        builder.push(Simple::Class(class))?;
                    }
                    _ => return None,
                },
                Token::IDHash(id) => builder.push(Simple::Id(id.to_string()))?,
                Token::SquareBracketBlock => {
                    let attribute = parse_nested(&mut parser, parse_attribute)?;
                    builder.push(attribute)?;
                }
                Token::Colon => match parser.next_including_whitespace() {
                    Ok(Token::Function(name)) if name.eq_ignore_ascii_case("not") => {
                        let negated = parse_nested(&mut parser, parse_negation)?;
                        builder.push(Simple::Not(negated))?;
                    }
                    _ => return None,
                },
                _ => return None,
            }
        }

        builder.finish()
    }

    /// Whether any selector in the list matches the element.
    pub fn matches(&self, doc: &Document, element: ElementId) -> bool {
        self.0.iter().any(|selector| selector.matches(doc, element))
    }
}

fn parse_nested<T>(
    parser: &mut Parser<'_, '_>,
    parse: fn(&mut Parser<'_, '_>) -> Option<T>,
) -> Option<T> {
    let result: Result<Option<T>, ParseError<'_, ()>> =
        parser.parse_nested_block(|block| Ok(parse(block)));
    result.ok().flatten()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Simple {
    Tag(String),
    Universal,
    Class(String),
    Id(String),
    Attribute {
        name: String,
        test: Option<(AttrOp, String)>,
    },
    Not(Vec<Simple>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Substring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// Compound selectors joined by combinators, left to right.
///
/// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ComplexSelector {
    compounds: Vec<Vec<Simple>>,
    combinators: Vec<Combinator>,
}

#[derive(Default)]
struct ListBuilder {
    selectors: Vec<ComplexSelector>,
    current: ComplexSelector,
    compound: Vec<Simple>,
    pending: Option<Combinator>,
}

impl ListBuilder {
    fn push(&mut self, simple: Simple) -> Option<()> {
        if self.compound.is_empty() && !self.current.compounds.is_empty() {
            let combinator = self.pending.take()?;
            self.current.combinators.push(combinator);
        }
        self.compound.push(simple);
        Some(())
    }

    fn flush(&mut self) {
        if !self.compound.is_empty() {
            self.current
                .compounds
                .push(std::mem::take(&mut self.compound));
            self.pending = Some(Combinator::Descendant);
        }
    }

    fn whitespace(&mut self) {
        self.flush();
    }

    fn child(&mut self) -> Option<()> {
        self.flush();
        if self.current.compounds.is_empty() {
            return None;
        }
        self.pending = Some(Combinator::Child);
        Some(())
    }

    fn end_selector(&mut self) -> Option<()> {
        self.flush();
        if self.current.compounds.is_empty() || self.pending == Some(Combinator::Child) {
            return None;
        }
        self.selectors.push(std::mem::take(&mut self.current));
        self.pending = None;
        Some(())
    }

    fn finish(mut self) -> Option<SelectorList> {
        self.end_selector()?;
        Some(SelectorList(self.selectors))
    }
}

fn parse_attribute(block: &mut Parser<'_, '_>) -> Option<Simple> {
    let name = match block.next() {
        Ok(Token::Ident(name)) => name.to_ascii_lowercase(),
        _ => return None,
    };
    if block.is_exhausted() {
        return Some(Simple::Attribute { name, test: None });
    }

    let op = match block.next() {
        Ok(Token::Delim('=')) => AttrOp::Equals,
        Ok(Token::IncludeMatch) => AttrOp::Includes,
        Ok(Token::DashMatch) => AttrOp::DashMatch,
        Ok(Token::PrefixMatch) => AttrOp::Prefix,
        Ok(Token::SuffixMatch) => AttrOp::Suffix,
        Ok(Token::SubstringMatch) => AttrOp::Substring,
        _ => return None,
    };
    let value = match block.next() {
        Ok(Token::Ident(value)) | Ok(Token::QuotedString(value)) => value.to_string(),
        _ => return None,
    };
    block.expect_exhausted().ok()?;

    Some(Simple::Attribute {
        name,
        test: Some((op, value)),
    })
}

/// Parses the argument of `:not()`: a single compound without combinators.
fn parse_negation(block: &mut Parser<'_, '_>) -> Option<Vec<Simple>> {
    let start = block.position();
    while block.next().is_ok() {}
    let list = SelectorList::parse(block.slice_from(start))?;

    let [ComplexSelector {
        compounds,
        combinators,
    }] = <[ComplexSelector; 1]>::try_from(list.0).ok()?;
    if !combinators.is_empty() {
        return None;
    }
    let [compound] = <[Vec<Simple>; 1]>::try_from(compounds).ok()?;
    Some(compound)
}

impl ComplexSelector {
    fn matches(&self, doc: &Document, element: ElementId) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.matches_at(doc, n - 1, element),
        }
    }

    fn matches_at(&self, doc: &Document, index: usize, element: ElementId) -> bool {
        if !matches_compound(&self.compounds[index], doc, element) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => doc
                .parent(element)
                .is_some_and(|parent| self.matches_at(doc, index - 1, parent)),
            Combinator::Descendant => doc
                .ancestors_inclusive(element)
                .skip(1)
                .any(|ancestor| self.matches_at(doc, index - 1, ancestor)),
        }
    }
}

fn matches_compound(compound: &[Simple], doc: &Document, element: ElementId) -> bool {
    compound.iter().all(|simple| matches_simple(simple, doc, element))
}

fn matches_simple(simple: &Simple, doc: &Document, id: ElementId) -> bool {
    let element = doc.element(id);
    match simple {
        Simple::Tag(tag) => element.tag().eq_ignore_ascii_case(tag),
        Simple::Universal => true,
        Simple::Class(class) => element.has_class(class),
        Simple::Id(expected) => element.id() == Some(expected.as_str()),
        Simple::Attribute { name, test } => match attribute_value(doc, id, name) {
            None => false,
            Some(actual) => match test {
                None => true,
                Some((op, expected)) => attribute_test(*op, &actual, expected),
            },
        },
        Simple::Not(inner) => !matches_compound(inner, doc, id),
    }
}

fn attribute_value<'d>(doc: &'d Document, id: ElementId, name: &str) -> Option<Cow<'d, str>> {
    let element = doc.element(id);
    match name {
        "class" if !element.classes().is_empty() => Some(Cow::Owned(element.classes().join(" "))),
        "class" => None,
        _ => element.attribute(name).map(Cow::Borrowed),
    }
}

fn attribute_test(op: AttrOp, actual: &str, expected: &str) -> bool {
    match op {
        AttrOp::Equals => actual == expected,
        AttrOp::Includes => actual.split_whitespace().any(|word| word == expected),
        AttrOp::DashMatch => {
            actual == expected
                || actual
                    .strip_prefix(expected)
                    .is_some_and(|rest| rest.starts_with('-'))
        }
        AttrOp::Prefix => !expected.is_empty() && actual.starts_with(expected),
        AttrOp::Suffix => !expected.is_empty() && actual.ends_with(expected),
        AttrOp::Substring => !expected.is_empty() && actual.contains(expected),
    }
}
