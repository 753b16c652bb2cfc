//! Syntax highlighting for the editor surface.
//!
//! Uses syntect for tokenization with Sublime Text syntax definitions and
//! renders the token stream to flat, per-line highlighted markup.

mod grammar;

pub use grammar::{Grammar, LanguageRegistry};

use std::sync::OnceLock;

use syntect::easy::ScopeRangeIterator;
use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::error::{EditorError, Result};

/// A classified span of source text.
///
/// `scope` is the innermost syntect scope covering the text, or `None` for
/// text that only carries the syntax's root scope. A token never contains a
/// newline unless it is a bare `"\n"` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub scope: Option<String>,
}

impl Token {
    /// An unclassified token.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            scope: None,
        }
    }

    /// CSS class list for this token, e.g. `token keyword control rust`.
    pub fn class_name(&self) -> Option<String> {
        let scope = self.scope.as_deref()?;
        let mut class = String::from("token");
        for atom in scope.split('.').filter(|atom| !atom.is_empty()) {
            class.push(' ');
            class.push_str(atom);
        }
        Some(class)
    }
}

/// Ordered tokens for a whole document.
pub type TokenStream = Vec<Token>;

/// Turns text into tokens and tokens into markup.
///
/// `render(tokenize(text))` split on `'\n'` must yield exactly one segment
/// per document line, in order.
pub trait Tokenizer {
    /// Tokenize `text` with the rules of `grammar`.
    ///
    /// # Errors
    /// Returns [`EditorError::Tokenize`] if the grammar cannot be applied.
    fn tokenize(&self, text: &str, grammar: &Grammar) -> Result<TokenStream>;

    /// Render tokens to highlighted markup.
    fn render(&self, tokens: &TokenStream) -> String {
        render(tokens)
    }
}

/// Tokenizer backed by syntect's bundled syntax definitions.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntectTokenizer;

impl Tokenizer for SyntectTokenizer {
    fn tokenize(&self, text: &str, grammar: &Grammar) -> Result<TokenStream> {
        let _scope = crate::perf::scope("highlight.tokenize");
        let syntax_set = syntax_set();
        let syntax = resolve_syntax(syntax_set, grammar)?;
        tokenize_with(syntax_set, syntax, text)
    }
}

fn resolve_syntax<'a>(syntax_set: &'a SyntaxSet, grammar: &Grammar) -> Result<&'a SyntaxReference> {
    syntax_set
        .find_syntax_by_name(grammar.syntax())
        .ok_or_else(|| {
            EditorError::Tokenize(format!(
                "grammar '{}' names unknown syntax '{}'",
                grammar.name(),
                grammar.syntax()
            ))
        })
}

fn tokenize_with(syntax_set: &SyntaxSet, syntax: &SyntaxReference, text: &str) -> Result<TokenStream> {
    let mut tokens = Vec::new();
    let mut parse_state = ParseState::new(syntax);
    let mut stack = ScopeStack::new();

    for line in LinesWithEndings::from(text) {
        let ops = parse_state
            .parse_line(line, syntax_set)
            .map_err(|err| EditorError::Tokenize(err.to_string()))?;
        for (range, op) in ScopeRangeIterator::new(&ops, line) {
            stack
                .apply(op)
                .map_err(|err| EditorError::Tokenize(err.to_string()))?;
            if range.is_empty() {
                continue;
            }
            // The root scope is the syntax itself; only nested scopes classify.
            let scope = match stack.as_slice() {
                [_, .., inner] => Some(inner.build_string()),
                _ => None,
            };
            push_split_at_newlines(&mut tokens, &line[range], scope);
        }
    }

    Ok(tokens)
}

fn push_split_at_newlines(tokens: &mut TokenStream, text: &str, scope: Option<String>) {
    let mut rest = text;
    while let Some(pos) = rest.find('\n') {
        if pos > 0 {
            tokens.push(Token {
                text: rest[..pos].to_string(),
                scope: scope.clone(),
            });
        }
        tokens.push(Token::plain("\n"));
        rest = &rest[pos + 1..];
    }
    if !rest.is_empty() {
        tokens.push(Token {
            text: rest.to_string(),
            scope,
        });
    }
}

/// Render a token stream to flat highlighted markup.
///
/// Newlines are emitted outside of any span so the result can be split into
/// independent per-line fragments.
pub fn render(tokens: &TokenStream) -> String {
    let mut out = String::new();
    for token in tokens {
        match token.class_name() {
            Some(class) => {
                out.push_str("<span class=\"");
                out.push_str(&class);
                out.push_str("\">");
                escape_markup_into(&mut out, &token.text);
                out.push_str("</span>");
            }
            None => escape_markup_into(&mut out, &token.text),
        }
    }
    out
}

/// Escape text for inclusion in markup.
fn escape_markup_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push(' '),
            _ => out.push(ch),
        }
    }
}

pub(crate) fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(|| {
        let _scope = crate::perf::scope("highlight.syntax_set.load_defaults");
        SyntaxSet::load_defaults_newlines()
    })
}
