//! Symbolic sequence regular expressions over data-unit-type names,
//! grounded on `vc2_conformance/_symbol_re.py`: tokenise, parse
//! right-to-left into an AST (for tight postfix-operator binding),
//! Thompson-construct an NFA, then simulate it directly as a state-set
//! frontier (no determinisation).

use crate::error::{Result, Vc2Error};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

pub const WILDCARD: &str = ".";
pub const END_OF_SEQUENCE: &str = "";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Symbol,
    Wildcard,
    EndOfSequence,
    Question,
    Star,
    Plus,
    Bar,
    LParen,
    RParen,
}

struct Token {
    kind: TokenKind,
    text: String,
}

fn tokenize(pattern: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let bytes: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        match c {
            '.' => {
                tokens.push(Token {
                    kind: TokenKind::Wildcard,
                    text: ".".into(),
                });
                i += 1;
            }
            '$' => {
                tokens.push(Token {
                    kind: TokenKind::EndOfSequence,
                    text: "$".into(),
                });
                i += 1;
            }
            '?' => {
                tokens.push(Token {
                    kind: TokenKind::Question,
                    text: "?".into(),
                });
                i += 1;
            }
            '*' => {
                tokens.push(Token {
                    kind: TokenKind::Star,
                    text: "*".into(),
                });
                i += 1;
            }
            '+' => {
                tokens.push(Token {
                    kind: TokenKind::Plus,
                    text: "+".into(),
                });
                i += 1;
            }
            '|' => {
                tokens.push(Token {
                    kind: TokenKind::Bar,
                    text: "|".into(),
                });
                i += 1;
            }
            '(' => {
                tokens.push(Token {
                    kind: TokenKind::LParen,
                    text: "(".into(),
                });
                i += 1;
            }
            ')' => {
                tokens.push(Token {
                    kind: TokenKind::RParen,
                    text: ")".into(),
                });
                i += 1;
            }
            c if c.is_alphanumeric() || c == '_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_alphanumeric() || bytes[i] == '_') {
                    i += 1;
                }
                let text: String = bytes[start..i].iter().collect();
                tokens.push(Token {
                    kind: TokenKind::Symbol,
                    text,
                });
            }
            other => {
                return Err(Vc2Error::SymbolRegexSyntax(format!(
                    "unexpected character {other:?} at offset {i}"
                )))
            }
        }
    }
    Ok(tokens)
}

#[derive(Debug, Clone)]
enum Ast {
    Symbol(String),
    Star(Box<Ast>),
    Concatenation(Box<Ast>, Box<Ast>),
    Union(Box<Ast>, Option<Box<Ast>>),
}

/// Recursive-descent parser consuming tokens right-to-left (via `pop`) so
/// that postfix quantifiers bind to the immediately preceding expression
/// regardless of how long the rest of the expression is.
fn parse_expression(tokens: &mut Vec<Token>) -> Result<Ast> {
    let mut expr = parse_term(tokens)?;
    while let Some(tok) = tokens.last() {
        if tok.kind == TokenKind::Bar {
            tokens.pop();
            let lhs = parse_expression(tokens)?;
            expr = Ast::Union(Box::new(lhs), Some(Box::new(expr)));
        } else {
            break;
        }
    }
    Ok(expr)
}

fn parse_term(tokens: &mut Vec<Token>) -> Result<Ast> {
    let mut expr = parse_factor(tokens)?;
    loop {
        match tokens.last().map(|t| t.kind) {
            // Any of these can be the rightmost token of a preceding
            // factor: a bare atom, a group, or a factor's own postfix
            // quantifier (scanned before the atom it modifies).
            Some(TokenKind::Symbol)
            | Some(TokenKind::Wildcard)
            | Some(TokenKind::EndOfSequence)
            | Some(TokenKind::RParen)
            | Some(TokenKind::Star)
            | Some(TokenKind::Plus)
            | Some(TokenKind::Question) => {
                let lhs = parse_factor(tokens)?;
                expr = Ast::Concatenation(Box::new(lhs), Box::new(expr));
            }
            _ => break,
        }
    }
    Ok(expr)
}

/// A factor is an atom optionally followed by one postfix quantifier.
/// Tokens are popped right-to-left, so the quantifier (if present) is
/// popped *before* the atom it applies to; recursing into `parse_factor`
/// again for the base lets quantifiers stack (`a?*`) the same way the
/// reference parser allows.
fn parse_factor(tokens: &mut Vec<Token>) -> Result<Ast> {
    match tokens.last().map(|t| t.kind) {
        Some(TokenKind::Star) => {
            tokens.pop();
            let base = parse_factor(tokens)?;
            Ok(Ast::Star(Box::new(base)))
        }
        Some(TokenKind::Plus) => {
            tokens.pop();
            let base = parse_factor(tokens)?;
            Ok(Ast::Concatenation(
                Box::new(base.clone()),
                Box::new(Ast::Star(Box::new(base))),
            ))
        }
        Some(TokenKind::Question) => {
            tokens.pop();
            let base = parse_factor(tokens)?;
            Ok(Ast::Union(Box::new(base), None))
        }
        _ => parse_atom(tokens),
    }
}

fn parse_atom(tokens: &mut Vec<Token>) -> Result<Ast> {
    let tok = tokens
        .pop()
        .ok_or_else(|| Vc2Error::SymbolRegexSyntax("unexpected end of pattern".into()))?;
    match tok.kind {
        TokenKind::Symbol => Ok(Ast::Symbol(tok.text)),
        TokenKind::Wildcard => Ok(Ast::Symbol(WILDCARD.to_string())),
        TokenKind::EndOfSequence => Ok(Ast::Symbol(END_OF_SEQUENCE.to_string())),
        TokenKind::RParen => {
            let inner = parse_expression(tokens)?;
            match tokens.pop() {
                Some(t) if t.kind == TokenKind::LParen => Ok(inner),
                _ => Err(Vc2Error::SymbolRegexSyntax("unmatched ')'".into())),
            }
        }
        other => Err(Vc2Error::SymbolRegexSyntax(format!(
            "unexpected token {other:?}"
        ))),
    }
}

pub fn parse_regex(pattern: &str) -> Result<Ast> {
    // `parse_expression` consumes tokens back-to-front via `Vec::pop`
    // (mirroring the reference's `tokens.pop(-1)`) so postfix quantifiers
    // bind to the immediately preceding atom; the token list therefore
    // stays in left-to-right order here, it is *popped* right-to-left.
    let mut tokens = tokenize(pattern)?;
    let ast = parse_expression(&mut tokens)?;
    if !tokens.is_empty() {
        return Err(Vc2Error::SymbolRegexSyntax(
            "trailing tokens after parsing expression".into(),
        ));
    }
    Ok(ast)
}

type NodeRef = Rc<RefCell<NfaNode>>;

struct NfaNode {
    id: usize,
    /// `None` key = epsilon transitions (bidirectional, hence stored twice:
    /// once from each endpoint).
    transitions: Vec<(Option<String>, NodeRef)>,
}

fn new_node(counter: &mut usize) -> NodeRef {
    let id = *counter;
    *counter += 1;
    Rc::new(RefCell::new(NfaNode {
        id,
        transitions: Vec::new(),
    }))
}

fn add_transition(from: &NodeRef, to: &NodeRef, symbol: Option<String>) {
    from.borrow_mut().transitions.push((symbol, to.clone()));
}

fn add_epsilon(a: &NodeRef, b: &NodeRef) {
    add_transition(a, b, None);
    add_transition(b, a, None);
}

fn equivalent_nodes(start: &NodeRef) -> HashSet<usize> {
    let mut seen = HashSet::new();
    let mut stack = vec![start.clone()];
    let mut out = Vec::new();
    while let Some(n) = stack.pop() {
        let id = n.borrow().id;
        if !seen.insert(id) {
            continue;
        }
        out.push(n.clone());
        for (sym, dest) in &n.borrow().transitions {
            if sym.is_none() {
                stack.push(dest.clone());
            }
        }
    }
    out.into_iter().map(|n| n.borrow().id).collect()
}

fn equivalent_node_refs(start: &NodeRef) -> Vec<NodeRef> {
    let mut seen = HashSet::new();
    let mut stack = vec![start.clone()];
    let mut out = Vec::new();
    while let Some(n) = stack.pop() {
        let id = n.borrow().id;
        if !seen.insert(id) {
            continue;
        }
        for (sym, dest) in &n.borrow().transitions {
            if sym.is_none() {
                stack.push(dest.clone());
            }
        }
        out.push(n);
    }
    out
}

fn follow(start: &NodeRef, symbol: &str) -> Vec<NodeRef> {
    let mut out = Vec::new();
    for node in equivalent_node_refs(start) {
        for (sym, dest) in &node.borrow().transitions {
            if sym.as_deref() == Some(symbol) {
                out.push(dest.clone());
            }
        }
    }
    out
}

struct Nfa {
    start: NodeRef,
    end: NodeRef,
}

fn from_ast(ast: &Ast, counter: &mut usize) -> Nfa {
    match ast {
        Ast::Symbol(s) => {
            let start = new_node(counter);
            let end = new_node(counter);
            add_transition(&start, &end, Some(s.clone()));
            Nfa { start, end }
        }
        Ast::Concatenation(a, b) => {
            let a_nfa = from_ast(a, counter);
            let b_nfa = from_ast(b, counter);
            add_epsilon(&a_nfa.end, &b_nfa.start);
            Nfa {
                start: a_nfa.start,
                end: b_nfa.end,
            }
        }
        Ast::Union(a, b) => {
            let start = new_node(counter);
            let end = new_node(counter);
            let a_nfa = from_ast(a, counter);
            add_epsilon(&start, &a_nfa.start);
            add_epsilon(&a_nfa.end, &end);
            if let Some(b) = b {
                let b_nfa = from_ast(b, counter);
                add_epsilon(&start, &b_nfa.start);
                add_epsilon(&b_nfa.end, &end);
            } else {
                add_epsilon(&start, &end);
            }
            Nfa { start, end }
        }
        Ast::Star(inner) => {
            let start = new_node(counter);
            let end = new_node(counter);
            let inner_nfa = from_ast(inner, counter);
            add_epsilon(&start, &inner_nfa.start);
            add_epsilon(&inner_nfa.end, &end);
            add_epsilon(&inner_nfa.end, &inner_nfa.start);
            add_epsilon(&start, &end);
            Nfa { start, end }
        }
    }
}

/// Executes the NFA of a symbolic sequence regular expression one symbol at
/// a time, tracking the frontier of reachable states rather than
/// determinising ahead of time.
pub struct Matcher {
    final_id: usize,
    cur_states: Vec<NodeRef>,
}

impl Matcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let ast = parse_regex(pattern)?;
        let mut counter = 0usize;
        let nfa = from_ast(&ast, &mut counter);
        let final_id = nfa.end.borrow().id;
        Ok(Self {
            final_id,
            cur_states: vec![nfa.start],
        })
    }

    /// Attempt to match the next symbol. Returns `false` iff `symbol` is
    /// not accepted at this point (the matcher's state is unchanged).
    pub fn match_symbol(&mut self, symbol: &str) -> bool {
        let mut new_states = Vec::new();
        let mut seen = HashSet::new();
        for state in &self.cur_states {
            for dest in follow(state, symbol).into_iter().chain(follow(state, WILDCARD)) {
                let id = dest.borrow().id;
                if seen.insert(id) {
                    new_states.push(dest);
                }
            }
        }
        if new_states.is_empty() {
            return false;
        }
        self.cur_states = new_states;
        true
    }

    pub fn is_complete(&self) -> bool {
        for state in &self.cur_states {
            if equivalent_nodes(state).contains(&self.final_id) {
                return true;
            }
            if !follow(state, END_OF_SEQUENCE).is_empty() {
                return true;
            }
        }
        false
    }

    pub fn valid_next_symbols(&self) -> HashSet<String> {
        let mut valid = HashSet::new();
        for state in &self.cur_states {
            for node in equivalent_node_refs(state) {
                for (sym, _) in &node.borrow().transitions {
                    if let Some(s) = sym {
                        valid.insert(s.clone());
                    }
                }
            }
        }
        if valid.contains(WILDCARD) {
            let mut only_wildcard = HashSet::new();
            only_wildcard.insert(WILDCARD.to_string());
            return only_wildcard;
        }
        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_simple_sequence() {
        let mut m = Matcher::new("sequence_header high_quality_picture* end_of_sequence").unwrap();
        assert!(m.match_symbol("sequence_header"));
        assert!(m.match_symbol("high_quality_picture"));
        assert!(m.match_symbol("high_quality_picture"));
        assert!(m.match_symbol("end_of_sequence"));
        assert!(m.is_complete());
    }

    #[test]
    fn rejects_unexpected_symbol() {
        let mut m = Matcher::new("sequence_header end_of_sequence").unwrap();
        assert!(m.match_symbol("sequence_header"));
        assert!(!m.match_symbol("high_quality_picture"));
    }

    #[test]
    fn wildcard_matches_anything() {
        let mut m = Matcher::new("sequence_header . end_of_sequence").unwrap();
        assert!(m.match_symbol("sequence_header"));
        assert!(m.match_symbol("literally_anything"));
        assert!(m.match_symbol("end_of_sequence"));
        assert!(m.is_complete());
    }

    #[test]
    fn optional_and_alternation() {
        let mut m = Matcher::new("foo? (bar | baz)").unwrap();
        assert!(m.match_symbol("bar"));
        assert!(m.is_complete());

        let mut m2 = Matcher::new("foo? (bar | baz)").unwrap();
        assert!(m2.match_symbol("foo"));
        assert!(m2.match_symbol("baz"));
        assert!(m2.is_complete());
    }
}
