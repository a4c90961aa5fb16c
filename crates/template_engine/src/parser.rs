//! Recursive-descent parser producing the template AST

use serde::{Deserialize, Serialize};

use crate::lexer::{tokenize, BlockKind, Token};

/// Deepest block nesting the parser accepts.
///
/// Open tokens past this depth are kept as literal text.
pub const MAX_NESTING_DEPTH: usize = 64;

/// A node of a parsed template
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    /// Literal text
    Text(String),
    /// `{{name}}`
    Variable(String),
    /// `{{#if name}} body {{/if}}`
    If { name: String, body: Vec<Node> },
    /// `{{#each name}} body {{/each}}`
    Each { name: String, body: Vec<Node> },
}

/// Kind of problem found in a malformed template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A close token with no matching open token
    UnmatchedClose,
    /// An open token with no matching close token
    Unclosed,
    /// An open token nested deeper than [`MAX_NESTING_DEPTH`]
    DepthExceeded,
}

/// A non-fatal finding about a template.
///
/// The offending token is rendered as literal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What went wrong
    pub kind: DiagnosticKind,
    /// Byte offset of the token in the template source
    pub offset: usize,
    /// The token as written
    pub token: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self.kind {
            DiagnosticKind::UnmatchedClose => "close tag without a matching open tag",
            DiagnosticKind::Unclosed => "open tag is never closed",
            DiagnosticKind::DepthExceeded => "blocks nested too deeply",
        };
        write!(f, "{} at byte {}: {}", self.token, self.offset, what)
    }
}

/// Parse template source into nodes and diagnostics
pub(crate) fn parse(source: &str) -> (Vec<Node>, Vec<Diagnostic>) {
    let mut parser = Parser {
        tokens: tokenize(source),
        pos: 0,
        open: Vec::new(),
        diagnostics: Vec::new(),
    };
    let mut nodes = Vec::new();
    parser.parse_nodes(None, &mut nodes);
    parser.diagnostics.sort_by_key(|d| d.offset);
    (nodes, parser.diagnostics)
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    /// Kinds of the blocks currently being parsed, innermost last
    open: Vec<BlockKind>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    /// Parse nodes into `out` until the close token for `closing`, or the end
    /// of input. Returns whether the matching close token was consumed.
    fn parse_nodes(&mut self, closing: Option<BlockKind>, out: &mut Vec<Node>) -> bool {
        while let Some(token) = self.tokens.get(self.pos).cloned() {
            match token {
                Token::Text(text) => {
                    push_text(out, text);
                    self.pos += 1;
                }
                Token::Variable { name } => {
                    out.push(Node::Variable(name.to_string()));
                    self.pos += 1;
                }
                Token::Open {
                    kind,
                    name,
                    raw,
                    offset,
                } => {
                    self.pos += 1;
                    if self.open.len() >= MAX_NESTING_DEPTH {
                        tracing::warn!(offset, token = raw, "template nesting depth exceeded");
                        self.report(DiagnosticKind::DepthExceeded, offset, raw);
                        push_text(out, raw);
                        continue;
                    }

                    self.open.push(kind);
                    let mut body = Vec::new();
                    let closed = self.parse_nodes(Some(kind), &mut body);
                    self.open.pop();

                    if closed {
                        let name = name.to_string();
                        out.push(match kind {
                            BlockKind::If => Node::If { name, body },
                            BlockKind::Each => Node::Each { name, body },
                        });
                    } else {
                        self.report(DiagnosticKind::Unclosed, offset, raw);
                        push_text(out, raw);
                        for node in body {
                            push_node(out, node);
                        }
                    }
                }
                Token::Close { kind, raw, offset } => {
                    if closing == Some(kind) {
                        self.pos += 1;
                        return true;
                    }
                    if self.open.contains(&kind) {
                        // Closes an enclosing block; leave it for that frame
                        return false;
                    }
                    self.report(DiagnosticKind::UnmatchedClose, offset, raw);
                    push_text(out, raw);
                    self.pos += 1;
                }
            }
        }
        false
    }

    fn report(&mut self, kind: DiagnosticKind, offset: usize, token: &str) {
        self.diagnostics.push(Diagnostic {
            kind,
            offset,
            token: token.to_string(),
        });
    }
}

fn push_text(out: &mut Vec<Node>, text: &str) {
    if let Some(Node::Text(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Node::Text(text.to_string()));
    }
}

fn push_node(out: &mut Vec<Node>, node: Node) {
    match node {
        Node::Text(text) => push_text(out, &text),
        other => out.push(other),
    }
}
