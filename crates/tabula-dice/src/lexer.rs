//! Dice formula lexer
//!
//! Turns text such as `2d6 + 3` or `к20-1` into tokens, left to right.
//! Whitespace is dropped and characters that start no token are skipped.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Letters accepted between the dice count and the face count
pub const DIVIDERS: [char; 3] = ['d', 'к', 'д'];

/// Sign token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    Plus,
    Minus,
}

/// A lexed formula token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    Sign(Sign),
    Number(u64),
    /// `count` dice with faces `1..=max`; a missing count is 1
    Dice { count: u64, max: u64 },
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Sign(Sign::Plus) => write!(f, "+"),
            Token::Sign(Sign::Minus) => write!(f, "-"),
            Token::Number(n) => write!(f, "{}", n),
            Token::Dice { count, max } => write!(f, "{}d{}", count, max),
        }
    }
}

/// Tokenize a formula
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        if c == '+' || c == '-' {
            tokens.push(Token::Sign(if c == '+' { Sign::Plus } else { Sign::Minus }));
            pos += 1;
        } else if c.is_ascii_digit() {
            let (count, next) = read_number(&chars, pos)?;
            match dice_faces(&chars, next)? {
                Some((max, end)) => {
                    tokens.push(Token::Dice { count, max });
                    pos = end;
                }
                None => {
                    tokens.push(Token::Number(count));
                    pos = next;
                }
            }
        } else if let Some((max, end)) = dice_faces(&chars, pos)? {
            tokens.push(Token::Dice { count: 1, max });
            pos = end;
        } else {
            tracing::trace!(character = %c, position = pos, "skipping character");
            pos += 1;
        }
    }

    Ok(tokens)
}

fn read_number(chars: &[char], start: usize) -> Result<(u64, usize)> {
    let mut pos = start;
    let mut value: u64 = 0;
    while let Some(digit) = chars.get(pos).and_then(|c| c.to_digit(10)) {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit as u64))
            .ok_or_else(|| {
                Error::InvalidFormula(format!("number too large at position {}", start))
            })?;
        pos += 1;
    }
    Ok((value, pos))
}

/// A divider at `pos` followed by digits, as `(faces, end)`
fn dice_faces(chars: &[char], pos: usize) -> Result<Option<(u64, usize)>> {
    let is_divider = chars.get(pos).is_some_and(|c| DIVIDERS.contains(c));
    let has_faces = chars.get(pos + 1).is_some_and(|c| c.is_ascii_digit());
    if !(is_divider && has_faces) {
        return Ok(None);
    }
    read_number(chars, pos + 1).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple() {
        let tokens = tokenize("2d6 + 12").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Dice { count: 2, max: 6 },
                Token::Sign(Sign::Plus),
                Token::Number(12),
            ]
        );
    }

    #[test]
    fn test_localized_dividers() {
        assert_eq!(tokenize("к20").unwrap(), vec![Token::Dice { count: 1, max: 20 }]);
        assert_eq!(tokenize("3д4").unwrap(), vec![Token::Dice { count: 3, max: 4 }]);
    }

    #[test]
    fn test_unknown_characters_skipped() {
        assert_eq!(
            tokenize("d-5").unwrap(),
            vec![Token::Sign(Sign::Minus), Token::Number(5)]
        );
        assert_eq!(
            tokenize("6d6 + 5 cow").unwrap(),
            vec![
                Token::Dice { count: 6, max: 6 },
                Token::Sign(Sign::Plus),
                Token::Number(5),
            ]
        );
    }

    #[test]
    fn test_whitespace_removed() {
        assert_eq!(tokenize(" 1 2 d 6 ").unwrap(), vec![Token::Dice { count: 12, max: 6 }]);
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_overflow_is_invalid() {
        assert!(matches!(
            tokenize("99999999999999999999999d6"),
            Err(Error::InvalidFormula(_))
        ));
    }

    #[test]
    fn test_display() {
        let text: Vec<String> = tokenize("d8-2")
            .unwrap()
            .iter()
            .map(Token::to_string)
            .collect();
        assert_eq!(text, vec!["1d8", "-", "2"]);
    }
}
