/// A lexical unit of the query: its literal text plus the char offset it
/// started at in the original input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub offset: usize,
}

impl Token {
    fn new(text: impl Into<String>, offset: usize) -> Self {
        Self {
            text: text.into(),
            offset,
        }
    }
}

/// Splits a query string into tokens. Boundaries are whitespace and the
/// symbols `!= = < > ( ) ,`; keywords fall out as ordinary words. A double-
/// or single-quoted substring survives as a single token, delimiters
/// included; an unterminated quote runs to the end of the input. Only pure
/// whitespace is discarded, so tokenization never fails.
pub fn tokenize(input: &str) -> Vec<Token> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' | ')' | ',' | '=' | '<' | '>' => {
                tokens.push(Token::new(c, i));
                i += 1;
            }
            '!' if chars.get(i + 1) == Some(&'=') => {
                tokens.push(Token::new("!=", i));
                i += 2;
            }
            '"' | '\'' => {
                let start = i;
                i += 1;
                while i < chars.len() && chars[i] != c {
                    i += 1;
                }
                if i < chars.len() {
                    // consume the closing delimiter
                    i += 1;
                }
                tokens.push(Token::new(chars[start..i].iter().collect::<String>(), start));
            }
            _ => {
                let start = i;
                while i < chars.len() && !is_boundary(&chars, i) {
                    i += 1;
                }
                tokens.push(Token::new(chars[start..i].iter().collect::<String>(), start));
            }
        }
    }

    tokens
}

fn is_boundary(chars: &[char], i: usize) -> bool {
    match chars[i] {
        '(' | ')' | ',' | '=' | '<' | '>' | '"' | '\'' => true,
        // a lone '!' is not a boundary; only the two-char symbol is
        '!' => chars.get(i + 1) == Some(&'='),
        c => c.is_whitespace(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn splits_on_whitespace_and_keywords() {
        assert_eq!(
            texts("SELECT a FROM table"),
            vec!["SELECT", "a", "FROM", "table"]
        );
    }

    #[test]
    fn splits_symbols_without_surrounding_whitespace() {
        assert_eq!(texts("a=5"), vec!["a", "=", "5"]);
        assert_eq!(texts("a!=5"), vec!["a", "!=", "5"]);
        assert_eq!(texts("(a<1),b"), vec!["(", "a", "<", "1", ")", ",", "b"]);
    }

    #[test]
    fn preserves_quoted_substrings() {
        assert_eq!(
            texts(r#"name = "hello, world""#),
            vec!["name", "=", "\"hello, world\""]
        );
        assert_eq!(texts("name = 'x < y'"), vec!["name", "=", "'x < y'"]);
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        assert_eq!(texts(r#"name = "abc"#), vec!["name", "=", "\"abc"]);
    }

    #[test]
    fn records_offsets() {
        let tokens = tokenize("a =  5");
        assert_eq!(tokens[0].offset, 0);
        assert_eq!(tokens[1].offset, 2);
        assert_eq!(tokens[2].offset, 5);
    }

    #[test]
    fn discards_pure_whitespace() {
        assert!(texts("   \t \n ").is_empty());
    }
}
