// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! S-expression reader/writer for KiCad files
//!
//! Atoms (symbols and numbers) keep their original text so that values the
//! placer never touches are written back byte-for-byte.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::map,
    error::{Error as NomError, ErrorKind},
    multi::many0,
    sequence::{delimited, preceded},
    IResult, Parser,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SExpr {
    /// Bare symbol or number, e.g. `locked`, `12.5`
    Atom(String),
    /// Quoted string, stored unescaped
    Str(String),
    List(Vec<SExpr>),
}

impl SExpr {
    pub fn atom(text: &str) -> Self {
        SExpr::Atom(text.to_string())
    }

    pub fn string(text: &str) -> Self {
        SExpr::Str(text.to_string())
    }

    /// `(tag values...)` where every value is an atom
    pub fn node(tag: &str, values: &[&str]) -> Self {
        let mut items = vec![SExpr::atom(tag)];
        items.extend(values.iter().map(|value| SExpr::atom(value)));
        SExpr::List(items)
    }

    pub fn as_list(&self) -> Option<&[SExpr]> {
        match self {
            SExpr::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<SExpr>> {
        match self {
            SExpr::List(items) => Some(items),
            _ => None,
        }
    }

    /// Text of an atom or string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SExpr::Atom(text) | SExpr::Str(text) => Some(text),
            SExpr::List(_) => None,
        }
    }

    /// First element of a list when it is an atom: `(at 1 2)` -> `at`
    pub fn tag(&self) -> Option<&str> {
        match self.as_list()?.first()? {
            SExpr::Atom(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag() == Some(tag)
    }

    /// Elements after the tag
    pub fn args(&self) -> &[SExpr] {
        self.as_list()
            .and_then(|items| items.get(1..))
            .unwrap_or(&[])
    }

    pub fn args_mut(&mut self) -> &mut [SExpr] {
        match self {
            SExpr::List(items) if !items.is_empty() => &mut items[1..],
            _ => &mut [],
        }
    }

    /// Text of the `index`-th argument
    pub fn text_at(&self, index: usize) -> Option<&str> {
        self.args().get(index).and_then(SExpr::as_text)
    }

    pub fn f64_at(&self, index: usize) -> Option<f64> {
        self.text_at(index).and_then(|text| text.parse().ok())
    }

    /// Child lists (arguments that are lists)
    pub fn children(&self) -> impl Iterator<Item = &SExpr> {
        self.args().iter().filter(|item| item.as_list().is_some())
    }

    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut SExpr> {
        self.args_mut()
            .iter_mut()
            .filter(|item| item.as_list().is_some())
    }

    pub fn find(&self, tag: &str) -> Option<&SExpr> {
        self.children().find(|child| child.is_tag(tag))
    }

    pub fn find_mut(&mut self, tag: &str) -> Option<&mut SExpr> {
        self.children_mut().find(|child| child.is_tag(tag))
    }

    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a SExpr> + 'a {
        self.children().filter(move |child| child.is_tag(tag))
    }

    /// True when a bare atom argument equals `atom`, e.g. `locked`
    pub fn has_atom(&self, atom: &str) -> bool {
        self.args()
            .iter()
            .any(|item| matches!(item, SExpr::Atom(text) if text == atom))
    }

    /// Replace (or append) the `index`-th argument
    pub fn set_arg(&mut self, index: usize, value: SExpr) {
        if let SExpr::List(items) = self {
            let slot = index + 1;
            if slot < items.len() {
                items[slot] = value;
            } else {
                items.push(value);
            }
        }
    }

    pub fn push(&mut self, value: SExpr) {
        if let SExpr::List(items) = self {
            items.push(value);
        }
    }

    /// Keep only the list items for which `keep` returns true
    pub fn retain<F: FnMut(&SExpr) -> bool>(&mut self, keep: F) {
        if let SExpr::List(items) = self {
            items.retain(keep);
        }
    }

    /// Apply `f` to this node and every descendant list, parents first
    pub fn walk_mut<F: FnMut(&mut SExpr)>(&mut self, f: &mut F) {
        f(self);
        if let SExpr::List(items) = self {
            for item in items.iter_mut().filter(|item| item.as_list().is_some()) {
                item.walk_mut(f);
            }
        }
    }
}

fn is_atom_char(c: char) -> bool {
    !c.is_whitespace() && c != '(' && c != ')' && c != '"'
}

fn atom(input: &str) -> IResult<&str, SExpr> {
    map(take_while1(is_atom_char), SExpr::atom).parse(input)
}

fn quoted(input: &str) -> IResult<&str, SExpr> {
    let (mut rest, _) = char('"')(input)?;
    let mut text = String::new();

    loop {
        let mut chars = rest.chars();
        match chars.next() {
            None => return Err(nom::Err::Error(NomError::new(rest, ErrorKind::Char))),
            Some('"') => return Ok((&rest[1..], SExpr::Str(text))),
            Some('\\') => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| nom::Err::Error(NomError::new(rest, ErrorKind::Escaped)))?;
                text.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                });
                rest = &rest[1 + escaped.len_utf8()..];
            }
            Some(c) => {
                text.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
}

fn list(input: &str) -> IResult<&str, SExpr> {
    map(
        delimited(
            char('('),
            many0(preceded(multispace0, expr)),
            preceded(multispace0, char(')')),
        ),
        SExpr::List,
    )
    .parse(input)
}

fn expr(input: &str) -> IResult<&str, SExpr> {
    alt((list, quoted, atom)).parse(input)
}

/// Parse a single top-level expression; only whitespace may follow it
pub fn parse(input: &str) -> Result<SExpr, String> {
    match preceded(multispace0, list).parse(input) {
        Ok((rest, root)) => {
            if rest.trim().is_empty() {
                Ok(root)
            } else {
                let offset = input.len() - rest.len();
                Err(format!("unexpected content at byte {offset}"))
            }
        }
        Err(e) => Err(format!("{e:?}")),
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('"');
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped.push('"');
    escaped
}

/// Serialize in KiCad's layout: lists holding only atoms stay on one line,
/// nested lists go one per line, indented with tabs.
pub fn write(expr: &SExpr) -> String {
    let mut out = String::new();
    write_expr(expr, 0, &mut out);
    out.push('\n');
    out
}

fn write_expr(expr: &SExpr, depth: usize, out: &mut String) {
    match expr {
        SExpr::Atom(text) => out.push_str(text),
        SExpr::Str(text) => out.push_str(&escape(text)),
        SExpr::List(items) => {
            out.push('(');
            let nested = items.iter().any(|item| item.as_list().is_some());
            let mut broken = false;
            for (index, item) in items.iter().enumerate() {
                if nested && item.as_list().is_some() {
                    out.push('\n');
                    out.push_str(&"\t".repeat(depth + 1));
                    broken = true;
                } else if index > 0 {
                    if broken {
                        out.push('\n');
                        out.push_str(&"\t".repeat(depth + 1));
                    } else {
                        out.push(' ');
                    }
                }
                write_expr(item, depth + 1, out);
            }
            if broken {
                out.push('\n');
                out.push_str(&"\t".repeat(depth));
            }
            out.push(')');
        }
    }
}

/// Format a millimetre value the way KiCad does: at most six decimals, no
/// trailing zeros.
pub fn format_number(value: f64) -> String {
    let text = format!("{value:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
