//! Statement syntax.
//!
//! - Tokens are separated by whitespace.
//! - `'...'` groups literally; `"..."` groups with backslash escapes.
//! - `[` or `{` opens a JSON literal that runs to its matching bracket,
//!   spaces and quotes included.
//! - `#` at the start of a token comments out the rest of the line.
//! - `name=value` is a keyword argument when `name` is an identifier and the
//!   token does not start with a quote.

use std::collections::BTreeMap;

use crate::error::EvalError;

/// One parsed line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statement {
    pub command: String,
    pub positional: Vec<String>,
    pub keywords: BTreeMap<String, String>,
    /// 1-based line in the script it came from; 0 when typed at the prompt.
    pub line: usize,
}

struct Token {
    text: String,
    quoted: bool,
}

impl Statement {
    /// Parse one line. Blank and comment-only lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, EvalError> {
        Self::parse_at(line, 0)
    }

    /// Parse line `number` of a script.
    pub fn parse_at(line: &str, number: usize) -> Result<Option<Self>, EvalError> {
        let mut tokens = tokenize(line)?.into_iter();
        let Some(first) = tokens.next() else {
            return Ok(None);
        };

        let mut statement = Statement {
            command: first.text,
            line: number,
            ..Default::default()
        };

        for token in tokens {
            match keyword(&token) {
                Some((name, value)) => {
                    if statement.keywords.insert(name.clone(), value).is_some() {
                        return Err(EvalError::Usage(format!("argument {name} given twice")));
                    }
                }
                None => statement.positional.push(token.text),
            }
        }

        Ok(Some(statement))
    }
}

fn keyword(token: &Token) -> Option<(String, String)> {
    if token.quoted {
        return None;
    }
    let (name, value) = token.text.split_once('=')?;
    let mut chars = name.chars();
    let head = chars.next()?;
    let is_identifier = (head.is_ascii_alphabetic() || head == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    is_identifier.then(|| (name.to_string(), value.to_string()))
}

fn tokenize(line: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut current: Option<Token> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if let Some(token) = current.take() {
                    tokens.push(token);
                }
            }
            '#' if current.is_none() => break,
            '\'' => {
                let token = current.get_or_insert_with(|| Token {
                    text: String::new(),
                    quoted: true,
                });
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => token.text.push(c),
                        None => return Err(EvalError::Parse("unterminated ' quote".into())),
                    }
                }
            }
            '"' => {
                let token = current.get_or_insert_with(|| Token {
                    text: String::new(),
                    quoted: true,
                });
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped) => token.text.push(escaped),
                            None => return Err(EvalError::Parse("unterminated \" quote".into())),
                        },
                        Some(c) => token.text.push(c),
                        None => return Err(EvalError::Parse("unterminated \" quote".into())),
                    }
                }
            }
            '[' | '{' => {
                let token = current.get_or_insert_with(|| Token {
                    text: String::new(),
                    quoted: false,
                });
                token.text.push(c);
                json_literal(&mut chars, &mut token.text)?;
            }
            c => current
                .get_or_insert_with(|| Token {
                    text: String::new(),
                    quoted: false,
                })
                .text
                .push(c),
        }
    }

    if let Some(token) = current {
        tokens.push(token);
    }
    Ok(tokens)
}

/// Copy a JSON literal whose opening bracket was already consumed.
fn json_literal(chars: &mut std::str::Chars<'_>, out: &mut String) -> Result<(), EvalError> {
    let mut depth = 1usize;
    while depth > 0 {
        let c = chars
            .next()
            .ok_or_else(|| EvalError::Parse("unbalanced brackets in JSON literal".into()))?;
        out.push(c);
        match c {
            '[' | '{' => depth += 1,
            ']' | '}' => depth -= 1,
            '"' => loop {
                let c = chars
                    .next()
                    .ok_or_else(|| EvalError::Parse("unterminated string in JSON literal".into()))?;
                out.push(c);
                match c {
                    '"' => break,
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            out.push(escaped);
                        }
                    }
                    _ => {}
                }
            },
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Statement {
        Statement::parse(line).unwrap().unwrap()
    }

    #[test]
    fn blank_and_comment_lines_are_empty() {
        assert_eq!(Statement::parse("").unwrap(), None);
        assert_eq!(Statement::parse("   \t ").unwrap(), None);
        assert_eq!(Statement::parse("# balance 0xabc").unwrap(), None);
    }

    #[test]
    fn splits_command_and_positionals() {
        let statement = parse("  balance   0xabc  latest ");
        assert_eq!(statement.command, "balance");
        assert_eq!(statement.positional, vec!["0xabc", "latest"]);
        assert!(statement.keywords.is_empty());
    }

    #[test]
    fn trailing_comment_is_dropped() {
        let statement = parse("block-number # how far along are we");
        assert_eq!(statement.command, "block-number");
        assert!(statement.positional.is_empty());
    }

    #[test]
    fn keywords_are_separated() {
        let statement = parse("call 0xto data=0x70a08231 block=pending");
        assert_eq!(statement.positional, vec!["0xto"]);
        assert_eq!(statement.keywords["data"], "0x70a08231");
        assert_eq!(statement.keywords["block"], "pending");
    }

    #[test]
    fn quoted_tokens_stay_positional() {
        let statement = parse(r#"rpc "a=b" 'c d'"#);
        assert_eq!(statement.positional, vec!["a=b", "c d"]);
    }

    #[test]
    fn quoted_keyword_value() {
        let statement = parse(r#"send from=0x1 to=0x2 data="0x 00""#);
        assert_eq!(statement.keywords["data"], "0x 00");
    }

    #[test]
    fn double_quotes_honor_escapes() {
        let statement = parse(r#"rpc "say \"hi\"""#);
        assert_eq!(statement.positional, vec![r#"say "hi""#]);
    }

    #[test]
    fn json_literal_keeps_spaces_and_quotes() {
        let statement = parse(r#"rpc eth_getBalance ["0xabc", "latest"]"#);
        assert_eq!(statement.positional, vec!["eth_getBalance", r#"["0xabc", "latest"]"#]);
    }

    #[test]
    fn json_literal_ignores_brackets_in_strings() {
        let statement = parse(r#"rpc m [{"note": "a ] b"}, 1] tail"#);
        assert_eq!(
            statement.positional,
            vec!["m", r#"[{"note": "a ] b"}, 1]"#, "tail"]
        );
    }

    #[test]
    fn json_literal_as_keyword_value() {
        let statement = parse(r#"rpc method=eth_call params=[{"to": "0x1"}, "latest"]"#);
        assert_eq!(statement.keywords["params"], r#"[{"to": "0x1"}, "latest"]"#);
    }

    #[test]
    fn script_line_number_is_kept() {
        assert_eq!(parse("accounts").line, 0);
        let statement = Statement::parse_at("block-number", 12).unwrap().unwrap();
        assert_eq!(statement.line, 12);
    }

    #[test]
    fn hash_inside_token_is_literal() {
        let statement = parse("rpc note#1");
        assert_eq!(statement.positional, vec!["note#1"]);
    }

    #[test]
    fn unterminated_quote_is_parse_error() {
        assert!(matches!(
            Statement::parse("balance '0xabc"),
            Err(EvalError::Parse(_))
        ));
        assert!(matches!(
            Statement::parse(r#"balance "0xabc"#),
            Err(EvalError::Parse(_))
        ));
    }

    #[test]
    fn unbalanced_json_is_parse_error() {
        assert!(matches!(
            Statement::parse("rpc eth_call [1, 2"),
            Err(EvalError::Parse(_))
        ));
    }

    #[test]
    fn repeated_keyword_is_usage_error() {
        assert!(matches!(
            Statement::parse("balance address=0x1 address=0x2"),
            Err(EvalError::Usage(_))
        ));
    }
}
