//! Identifier and reserved-word lexing.

use uxf_util::ident;

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    /// Lexes a name: the booleans `yes` and `no`, a built-in type name, or
    /// an identifier.
    ///
    /// The whole alphanumeric-and-underscore run is consumed before
    /// classification, so an identifier that merely starts with a reserved
    /// word (`north`, `integer`) stays an identifier.
    pub(crate) fn read_name(&mut self) {
        let lino = self.cursor.line();
        let Some(word) = self.match_identifier() else {
            return;
        };
        let kind = match word.as_str() {
            "yes" => TokenKind::Bool(true),
            "no" => TokenKind::Bool(false),
            _ if ident::is_any_value_type_name(&word) => TokenKind::Type(word),
            _ => TokenKind::Identifier(word),
        };
        self.tokens.push(Token::new(kind, lino));
    }
}
