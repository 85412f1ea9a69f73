//! Number, date, and datetime literal lexing.
//!
//! A token starting with a digit is classified after consuming the whole
//! run of number-and-date characters: a colon, `T`, or `Z` makes it a
//! datetime, exactly two hyphens (and no time marker) a date, a `.` or
//! exponent a real, and anything else an integer.

use chrono::{NaiveDate, NaiveDateTime};

use uxf_util::codes;

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// ISO-8601 with and without seconds.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// The length of `YYYY-MM-DDTHH:MM:SS`, the longest naive datetime form.
const NAIVE_DATETIME_LEN: usize = 19;

impl<'a> Lexer<'a> {
    /// Lexes a negative int or real, starting at the `-`.
    pub(crate) fn read_negative_number(&mut self) {
        let lino = self.cursor.line();
        let start = self.cursor.position();
        self.cursor.advance(); // the '-'
        let mut is_real = false;
        let mut previous = '-';
        while !self.cursor.is_at_end() {
            let c = self.cursor.current_char();
            let is_exponent_sign = (c == '+' || c == '-') && matches!(previous, 'e' | 'E');
            if matches!(c, '.' | 'e' | 'E') {
                is_real = true;
            } else if !c.is_ascii_digit() && !is_exponent_sign {
                break;
            }
            previous = c;
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);
        if is_real {
            match text.parse::<f64>() {
                Ok(value) => self.tokens.push(Token::new(TokenKind::Real(value), lino)),
                Err(err) => self.error(
                    codes::INVALID_NUMBER,
                    format!("invalid number: {text:?}: {err}"),
                ),
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => self.tokens.push(Token::new(TokenKind::Int(value), lino)),
                Err(err) => self.error(
                    codes::INVALID_NUMBER,
                    format!("invalid number: {text:?}: {err}"),
                ),
            }
        }
    }

    /// Lexes a positive int, real, date, or datetime.
    pub(crate) fn read_number_or_date(&mut self) {
        let lino = self.cursor.line();
        let start = self.cursor.position();
        let mut is_real = false;
        let mut is_datetime = false;
        let mut hyphens = 0;
        while !self.cursor.is_at_end() {
            let c = self.cursor.current_char();
            match c {
                '.' | 'e' | 'E' => is_real = true,
                '-' => hyphens += 1,
                ':' | 'T' | 'Z' => is_datetime = true,
                '+' => {}
                c if c.is_ascii_digit() => {}
                _ => break,
            }
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start).to_string();
        if is_datetime {
            self.read_datetime(&text, lino);
        } else if hyphens == 2 {
            match NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
                Ok(date) => self.tokens.push(Token::new(TokenKind::Date(date), lino)),
                Err(err) => self.error(
                    codes::INVALID_NUMBER_OR_DATE,
                    format!("invalid number or date/time: {text:?}: {err}"),
                ),
            }
        } else if is_real {
            match text.parse::<f64>() {
                Ok(value) => self.tokens.push(Token::new(TokenKind::Real(value), lino)),
                Err(err) => self.error(
                    codes::INVALID_NUMBER_OR_DATE,
                    format!("invalid number or date/time: {text:?}: {err}"),
                ),
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => self.tokens.push(Token::new(TokenKind::Int(value), lino)),
                Err(err) => self.error(
                    codes::INVALID_NUMBER_OR_DATE,
                    format!("invalid number or date/time: {text:?}: {err}"),
                ),
            }
        }
    }

    /// Parses a datetime, falling back to the 19-character naive prefix
    /// when the full text carries zone data this model does not keep.
    fn read_datetime(&mut self, text: &str, lino: u32) {
        if let Some(value) = parse_datetime(text) {
            self.tokens
                .push(Token::new(TokenKind::DateTime(value), lino));
            return;
        }
        if text.len() > NAIVE_DATETIME_LEN {
            let prefix = &text[..NAIVE_DATETIME_LEN];
            if let Some(value) = parse_datetime(prefix) {
                self.tokens
                    .push(Token::new(TokenKind::DateTime(value), lino));
                self.error(
                    codes::TIMEZONE_DROPPED,
                    format!("skipped timezone data, used {prefix:?}, got {text:?}"),
                );
            } else {
                self.error(
                    codes::INVALID_DATETIME,
                    format!("invalid datetime: {text:?}"),
                );
            }
        } else {
            self.error(
                codes::INVALID_NUMBER_OR_DATE,
                format!("invalid number or date/time: {text:?}"),
            );
        }
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    // a trailing Z with nothing after it is plain UTC, not an offset
    let text = text.strip_suffix('Z').unwrap_or(text);
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}
