//! Formula preprocessing.
//!
//! Before a formula reaches Rhai, it is tokenized and every numeric literal
//! and cell reference is bound to a script variable:
//!
//! - **Literals**: `1.5` → `n0`, `2` → `n1`, ...
//! - **References**: `A1` → `r0`, `B2` → `r1`, ... (one variable per distinct position)
//! - **Operators**: `+ - * /` and parentheses pass through, space-separated
//!
//! Rhai therefore only ever parses the operator skeleton of the formula, and
//! the same pass produces the canonical expression text.

use super::formula::FormulaParseError;
use super::position::{Position, letters_to_col};

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number { text: String, value: f64 },
    Ref(Position),
    Op(char),
    LParen,
    RParen,
}

/// A formula split into its Rhai skeleton and the values bound into it.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Preprocessed {
    pub script: String,
    pub canonical: String,
    pub literals: Vec<f64>,
    /// Distinct referenced positions, in order of first appearance.
    pub refs: Vec<Position>,
}

/// Tokenize a formula body (without the leading `=`) and bind its operands.
pub(crate) fn preprocess_formula(formula: &str) -> Result<Preprocessed, FormulaParseError> {
    let tokens = tokenize(formula)?;
    if tokens.is_empty() {
        return Err(FormulaParseError::new("empty formula"));
    }

    let mut script = Vec::with_capacity(tokens.len());
    let mut canonical = String::with_capacity(formula.len());
    let mut literals = Vec::new();
    let mut refs: Vec<Position> = Vec::new();
    let mut prev: Option<&Token> = None;

    for token in &tokens {
        let follows_operand = matches!(
            prev,
            Some(Token::Number { .. } | Token::Ref(_) | Token::RParen)
        );
        let starts_operand = matches!(token, Token::Number { .. } | Token::Ref(_) | Token::LParen);
        if follows_operand && starts_operand {
            return Err(FormulaParseError::new("missing operator between operands"));
        }
        match token {
            Token::Number { text, value } => {
                script.push(format!("n{}", literals.len()));
                literals.push(*value);
                canonical.push_str(text);
            }
            Token::Ref(pos) => {
                let slot = match refs.iter().position(|r| r == pos) {
                    Some(slot) => slot,
                    None => {
                        refs.push(*pos);
                        refs.len() - 1
                    }
                };
                script.push(format!("r{}", slot));
                canonical.push_str(&pos.to_string());
            }
            Token::Op(op) => {
                script.push(op.to_string());
                canonical.push(*op);
            }
            Token::LParen => {
                script.push("(".to_string());
                canonical.push('(');
            }
            Token::RParen => {
                if prev == Some(&Token::LParen) {
                    return Err(FormulaParseError::new("empty parentheses"));
                }
                script.push(")".to_string());
                canonical.push(')');
            }
        }
        prev = Some(token);
    }

    Ok(Preprocessed {
        script: script.join(" "),
        canonical,
        literals,
        refs,
    })
}

fn tokenize(formula: &str) -> Result<Vec<Token>, FormulaParseError> {
    let bytes = formula.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b' ' | b'\t' | b'\r' | b'\n' => i += 1,
            b'+' | b'-' | b'*' | b'/' => {
                tokens.push(Token::Op(c as char));
                i += 1;
            }
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            b'0'..=b'9' | b'.' => {
                let end = scan_number(bytes, i);
                let text = &formula[i..end];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| FormulaParseError::new(format!("invalid number '{}'", text)))?;
                tokens.push(Token::Number {
                    text: text.to_string(),
                    value,
                });
                i = end;
            }
            b'A'..=b'Z' => {
                let letters_end = scan_while(bytes, i, |b| b.is_ascii_uppercase());
                let digits_end = scan_while(bytes, letters_end, |b| b.is_ascii_digit());
                let text = &formula[i..digits_end];
                let pos = parse_reference(&formula[i..letters_end], &formula[letters_end..digits_end])
                    .ok_or_else(|| FormulaParseError::new(format!("invalid reference '{}'", text)))?;
                tokens.push(Token::Ref(pos));
                i = digits_end;
            }
            _ => {
                let ch = formula[i..].chars().next().unwrap_or('?');
                return Err(FormulaParseError::new(format!("unexpected character '{}'", ch)));
            }
        }
    }

    Ok(tokens)
}

fn scan_while(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    let mut end = start;
    while end < bytes.len() && pred(bytes[end]) {
        end += 1;
    }
    end
}

/// digits, optional fraction, optional exponent
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let mut end = scan_while(bytes, start, |b| b.is_ascii_digit());
    if end < bytes.len() && bytes[end] == b'.' {
        end = scan_while(bytes, end + 1, |b| b.is_ascii_digit());
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            end = scan_while(bytes, exp, |b| b.is_ascii_digit());
        }
    }
    end
}

fn parse_reference(letters: &str, digits: &str) -> Option<Position> {
    if digits.is_empty() {
        return None;
    }
    let col = letters_to_col(letters)?;
    let row = digits.parse::<usize>().ok()?.checked_sub(1)?;
    Some(Position::new(row, col))
}
