//! String and bytes literal lexing.

use uxf_util::{codes, text, Result};

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    /// Lexes a `<…>` string, the opening `<` already consumed.
    ///
    /// The body is entity-decoded; running to end of input is fatal.
    pub(crate) fn read_string(&mut self) -> Result<()> {
        let lino = self.cursor.line();
        let Some(value) = self.cursor.take_until(">") else {
            return Err(self.fatal(codes::UNTERMINATED, "unterminated string"));
        };
        self.tokens
            .push(Token::new(TokenKind::Str(text::unescape(value)), lino));
        Ok(())
    }

    /// Lexes a `(:…:)` bytes literal, the opening `(:` already consumed.
    ///
    /// The body is hex pairs; whitespace between digits is ignored. A
    /// non-hex digit or an odd digit count is fatal.
    pub(crate) fn read_bytes(&mut self) -> Result<()> {
        let lino = self.cursor.line();
        let Some(value) = self.cursor.take_until(":)") else {
            return Err(self.fatal(codes::UNTERMINATED, "unterminated bytes"));
        };
        let digits: Vec<char> = value.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() % 2 != 0 {
            return Err(self.fatal(
                codes::INVALID_BYTES,
                format!("expected bytes, got {value:?}: odd number of hex digits"),
            ));
        }
        let mut bytes = Vec::with_capacity(digits.len() / 2);
        for pair in digits.chunks(2) {
            let (hi, lo) = (pair[0].to_digit(16), pair[1].to_digit(16));
            match (hi, lo) {
                (Some(hi), Some(lo)) => bytes.push((hi * 16 + lo) as u8),
                _ => {
                    return Err(self.fatal(
                        codes::INVALID_BYTES,
                        format!("expected bytes, got {value:?}: non-hex digit"),
                    ))
                }
            }
        }
        self.tokens.push(Token::new(TokenKind::Bytes(bytes), lino));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use uxf_util::MemoryReporter;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut reporter = MemoryReporter::new();
        tokenize(source, "-", &mut reporter)
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_string() {
        let tokens = kinds("uxf 1.0\n[<hello world>]\n");
        assert_eq!(tokens[1], TokenKind::Str("hello world".to_string()));
    }

    #[test]
    fn test_string_entities_decoded() {
        let tokens = kinds("uxf 1.0\n[<a &lt; b &amp; c &gt; d &quot;q&quot;>]\n");
        assert_eq!(tokens[1], TokenKind::Str("a < b & c > d \"q\"".to_string()));
    }

    #[test]
    fn test_empty_string() {
        let tokens = kinds("uxf 1.0\n[<>]\n");
        assert_eq!(tokens[1], TokenKind::Str(String::new()));
    }

    #[test]
    fn test_multiline_string() {
        let tokens = kinds("uxf 1.0\n[<one\ntwo>]\n");
        assert_eq!(tokens[1], TokenKind::Str("one\ntwo".to_string()));
    }

    #[test]
    fn test_unterminated_string_is_fatal() {
        let mut reporter = MemoryReporter::new();
        let err = tokenize("uxf 1.0\n[<oops]\n", "-", &mut reporter).unwrap_err();
        assert_eq!(err.code(), Some(codes::UNTERMINATED));
    }

    #[test]
    fn test_bytes() {
        let tokens = kinds("uxf 1.0\n[(:DEADBEEF:)]\n");
        assert_eq!(tokens[1], TokenKind::Bytes(vec![0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn test_bytes_whitespace_ignored() {
        let tokens = kinds("uxf 1.0\n[(:DE AD\nBE EF:)]\n");
        assert_eq!(tokens[1], TokenKind::Bytes(vec![0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn test_bytes_lower_case() {
        let tokens = kinds("uxf 1.0\n[(:0a0b:)]\n");
        assert_eq!(tokens[1], TokenKind::Bytes(vec![0x0a, 0x0b]));
    }

    #[test]
    fn test_empty_bytes() {
        let tokens = kinds("uxf 1.0\n[(::)]\n");
        assert_eq!(tokens[1], TokenKind::Bytes(Vec::new()));
    }

    #[test]
    fn test_bad_hex_is_fatal() {
        let mut reporter = MemoryReporter::new();
        let err = tokenize("uxf 1.0\n[(:XY:)]\n", "-", &mut reporter).unwrap_err();
        assert_eq!(err.code(), Some(codes::INVALID_BYTES));
    }

    #[test]
    fn test_odd_digit_count_is_fatal() {
        let mut reporter = MemoryReporter::new();
        let err = tokenize("uxf 1.0\n[(:ABC:)]\n", "-", &mut reporter).unwrap_err();
        assert_eq!(err.code(), Some(codes::INVALID_BYTES));
    }
}
