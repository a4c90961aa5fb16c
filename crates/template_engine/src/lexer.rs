//! Tokenizer for the template directive syntax

/// Kind of block directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// `{{#if name}} ... {{/if}}`
    If,
    /// `{{#each name}} ... {{/each}}`
    Each,
}

impl BlockKind {
    /// Keyword used in the open and close tokens
    pub fn keyword(&self) -> &'static str {
        match self {
            BlockKind::If => "if",
            BlockKind::Each => "each",
        }
    }
}

/// A lexical token borrowed from the template source
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// Literal pass-through text
    Text(&'a str),
    /// `{{name}}`
    Variable { name: &'a str },
    /// `{{#if name}}` or `{{#each name}}`
    Open {
        kind: BlockKind,
        name: &'a str,
        raw: &'a str,
        offset: usize,
    },
    /// `{{/if}}` or `{{/each}}`
    Close {
        kind: BlockKind,
        raw: &'a str,
        offset: usize,
    },
}

const OPEN_DELIM: &str = "{{";
const CLOSE_DELIM: &str = "}}";

/// Split a template into tokens.
///
/// Any `{{...}}` that is not a recognised directive stays in the surrounding
/// text, and scanning resumes one byte after its opening brace so a valid
/// directive starting inside it is still found.
///
/// Runs in linear time: the nearest `}}` is remembered, so a run of `{{`
/// that never forms a directive does not rescan the rest of the input.
pub(crate) fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;
    // Byte offset of the first `}}` at or after the last searched position
    let mut close_at: Option<usize> = None;

    while let Some(found) = source[cursor..].find(OPEN_DELIM) {
        let start = cursor + found;
        let inner_start = start + OPEN_DELIM.len();
        let inner_end = match close_at {
            Some(at) if at >= inner_start => at,
            _ => match source[inner_start..].find(CLOSE_DELIM) {
                Some(len) => inner_start + len,
                None => break,
            },
        };
        close_at = Some(inner_end);
        let end = inner_end + CLOSE_DELIM.len();
        let raw = &source[start..end];

        match classify(&source[inner_start..inner_end], raw, start) {
            Some(token) => {
                if text_start < start {
                    tokens.push(Token::Text(&source[text_start..start]));
                }
                tokens.push(token);
                text_start = end;
                cursor = end;
            }
            None => cursor = start + 1,
        }
    }

    if text_start < source.len() {
        tokens.push(Token::Text(&source[text_start..]));
    }
    tokens
}

fn classify<'a>(inner: &'a str, raw: &'a str, offset: usize) -> Option<Token<'a>> {
    if is_identifier(inner) {
        return Some(Token::Variable { name: inner });
    }
    if let Some(rest) = inner.strip_prefix('#') {
        for kind in [BlockKind::If, BlockKind::Each] {
            if let Some(name) = rest.strip_prefix(kind.keyword()).and_then(block_name) {
                return Some(Token::Open {
                    kind,
                    name,
                    raw,
                    offset,
                });
            }
        }
        return None;
    }
    if let Some(rest) = inner.strip_prefix('/') {
        for kind in [BlockKind::If, BlockKind::Each] {
            if rest == kind.keyword() {
                return Some(Token::Close { kind, raw, offset });
            }
        }
    }
    None
}

/// Name after a block keyword: at least one space or tab, then an identifier
fn block_name(rest: &str) -> Option<&str> {
    let name = rest.trim_start_matches([' ', '\t']);
    (name.len() < rest.len() && is_identifier(name)).then_some(name)
}

/// Letters, digits and underscore, at least one character
pub(crate) fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(tokenize("<p>hello</p>"), vec![Token::Text("<p>hello</p>")]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_directives() {
        let tokens = tokenize("A{{#if ok}}{{name}}{{/if}}B");
        assert_eq!(
            tokens,
            vec![
                Token::Text("A"),
                Token::Open {
                    kind: BlockKind::If,
                    name: "ok",
                    raw: "{{#if ok}}",
                    offset: 1
                },
                Token::Variable { name: "name" },
                Token::Close {
                    kind: BlockKind::If,
                    raw: "{{/if}}",
                    offset: 19
                },
                Token::Text("B"),
            ]
        );
    }

    #[test]
    fn test_each_with_extra_spacing() {
        let tokens = tokenize("{{#each \t items}}");
        assert!(matches!(
            tokens[0],
            Token::Open { kind: BlockKind::Each, name: "items", .. }
        ));
    }

    #[test]
    fn test_unrecognised_braces_are_text() {
        for src in ["{{ name }}", "{{a.b}}", "{{#ifx}}", "{{#if}}", "{{/unless}}", "{{}}"] {
            let tokens = tokenize(src);
            assert!(
                tokens.iter().all(|t| matches!(t, Token::Text(_))),
                "expected literal text for {src}"
            );
        }
    }

    #[test]
    fn test_unterminated_delimiter_is_text() {
        assert_eq!(tokenize("a {{name"), vec![Token::Text("a {{name")]);
    }

    #[test]
    fn test_directive_inside_extra_braces() {
        let tokens = tokenize("{{{{name}}}}");
        assert_eq!(
            tokens,
            vec![
                Token::Text("{{"),
                Token::Variable { name: "name" },
                Token::Text("}}"),
            ]
        );
    }

    #[test]
    fn test_directive_after_unrecognised_opener_shares_close() {
        assert_eq!(
            tokenize("{{ a {{b}} c}}"),
            vec![
                Token::Text("{{ a "),
                Token::Variable { name: "b" },
                Token::Text(" c}}"),
            ]
        );
        assert_eq!(
            tokenize("{{ x}} {{y}}"),
            vec![Token::Text("{{ x}} "), Token::Variable { name: "y" }]
        );
    }

    #[test]
    fn test_unrecognised_openers_scan_in_linear_time() {
        let source = format!("{}}}}}", "{{ ".repeat(100_000));
        let started = std::time::Instant::now();
        let tokens = tokenize(&source);
        assert_eq!(tokens, vec![Token::Text(&source)]);
        assert!(
            started.elapsed() < std::time::Duration::from_secs(2),
            "tokenizing {} bytes took {:?}",
            source.len(),
            started.elapsed()
        );
    }

    #[test]
    fn test_multibyte_text_is_preserved() {
        let tokens = tokenize("Orçamento nº {{quoteNumber}} – válido");
        assert_eq!(tokens[0], Token::Text("Orçamento nº "));
        assert_eq!(tokens[2], Token::Text(" – válido"));
    }

    #[test]
    fn test_identifier() {
        assert!(is_identifier("client_name2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier("ação"));
    }
}
