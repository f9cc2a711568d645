//! Whitespace tokenization with quoted runs.
//!
//! Tokens are separated by whitespace, except that a run delimited by double
//! quotes (with `\"` and `\\` escapes) stays inside a single token. The
//! quotes and escapes are kept verbatim; field formats strip them when they
//! parse the token.

use crate::error::FormatError;

/// The display-mode token for a null field value.
pub const NONE_TOKEN: &str = "\"\"";

/// Split a line into tokens, honoring quoted runs. Fails on an unterminated
/// quote.
pub fn tokenize(text: &str) -> Result<Vec<String>, FormatError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let mut token = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            chars.next();
            token.push(c);
            if c == '"' {
                let mut closed = false;
                while let Some(c) = chars.next() {
                    token.push(c);
                    match c {
                        '\\' => match chars.next() {
                            Some(escaped) => token.push(escaped),
                            None => break,
                        },
                        '"' => {
                            closed = true;
                            break;
                        }
                        _ => {}
                    }
                }
                if !closed {
                    return Err(FormatError::UnterminatedQuote {
                        text: text.to_string(),
                    });
                }
            }
        }
        tokens.push(token);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        tokenize(text).expect("tokenize")
    }

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(tokens("a bc  def"), ["a", "bc", "def"]);
        assert_eq!(tokens("  a "), ["a"]);
        assert!(tokens("").is_empty());
        assert!(tokens("   ").is_empty());
    }

    #[test]
    fn quoted_runs_stay_in_one_token() {
        assert_eq!(tokens(r#"a "b c" d"#), ["a", r#""b c""#, "d"]);
        assert_eq!(tokens(r#""""#), [r#""""#]);
        assert_eq!(tokens(r#""a \" b""#), [r#""a \" b""#]);
        assert_eq!(tokens(r#""a \\" b"#), [r#""a \\""#, "b"]);
    }

    #[test]
    fn unterminated_quote_fails() {
        assert!(matches!(
            tokenize(r#"a "bc"#),
            Err(FormatError::UnterminatedQuote { .. })
        ));
        assert!(matches!(
            tokenize(r#""a \"#),
            Err(FormatError::UnterminatedQuote { .. })
        ));
    }
}
