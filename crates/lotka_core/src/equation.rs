//! Parser for user-entered growth/interaction equations.
//!
//! The grammar is a flat sequence of signed terms with no separators:
//! `[sign][digits[.digits]][Letter][Letter]`, e.g. `"3R-1.4RF"`. Variables
//! are single uppercase ASCII letters; whitespace is stripped before
//! tokenization and characters that cannot start a term are skipped.

use crate::error::ParseError;

/// Coefficients of one parsed equation.
///
/// `letters` is the `(first, second)` variable pair in the order fixed by the
/// two-letter interaction term. Which letter is "self" for a given species is
/// decided by the model layer, not here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedEquation {
    pub growth_rate: f64,
    pub interaction_rate: f64,
    pub letters: (char, char),
}

// --- Tokenizer ---

/// One raw term before coefficient resolution.
#[derive(Debug, Clone, PartialEq)]
struct RawTerm {
    coefficient: String,
    first: Option<char>,
    second: Option<char>,
}

fn tokenize(cleaned: &str) -> Vec<RawTerm> {
    let mut terms = Vec::new();
    let mut chars = cleaned.chars().peekable();

    while let Some(&c) = chars.peek() {
        // Characters that cannot start a term are skipped, not rejected.
        if c != '+' && c != '-' && c != '.' && !c.is_ascii_digit() && !c.is_ascii_uppercase() {
            chars.next();
            continue;
        }

        let mut coefficient = String::new();
        if c == '+' || c == '-' {
            coefficient.push(c);
            chars.next();
        }

        let mut seen_dot = false;
        while let Some(&d) = chars.peek() {
            if d.is_ascii_digit() || (d == '.' && !seen_dot) {
                seen_dot |= d == '.';
                coefficient.push(d);
                chars.next();
            } else {
                break;
            }
        }

        let mut first = None;
        let mut second = None;
        if let Some(&l) = chars.peek() {
            if l.is_ascii_uppercase() {
                first = Some(l);
                chars.next();
            }
        }
        if first.is_some() {
            if let Some(&l) = chars.peek() {
                if l.is_ascii_uppercase() {
                    second = Some(l);
                    chars.next();
                }
            }
        }

        terms.push(RawTerm {
            coefficient,
            first,
            second,
        });
    }

    terms
}

/// An empty or bare `+` coefficient is `1.0`, a bare `-` is `-1.0`, anything
/// else must be a decimal number with its sign included.
fn resolve_coefficient(text: &str) -> Result<f64, ParseError> {
    match text {
        "" | "+" => Ok(1.0),
        "-" => Ok(-1.0),
        other => other
            .parse::<f64>()
            .map_err(|_| ParseError::BadCoefficient(other.to_string())),
    }
}

// --- Parser ---

/// Parses an equation into `(growth_rate, interaction_rate, letters)`.
///
/// A one-letter term seen before any letter is assigned supplies the growth
/// rate; a later one-letter term only confirms the second variable's
/// identity (its coefficient is discarded). A two-letter term supplies the
/// interaction rate and fixes both letters in term order.
pub fn parse(expression: &str) -> Result<ParsedEquation, ParseError> {
    let cleaned: String = expression.chars().filter(|c| !c.is_whitespace()).collect();

    let mut growth_rate = 0.0;
    let mut interaction_rate = 0.0;
    let mut first: Option<char> = None;
    let mut second: Option<char> = None;

    for term in tokenize(&cleaned) {
        // Resolution happens before classification, so a garbage coefficient
        // is rejected even on a term that carries no letters.
        let coefficient = resolve_coefficient(&term.coefficient)?;

        match (term.first, term.second) {
            (Some(letter), None) => {
                if first.is_none() {
                    growth_rate = coefficient;
                    first = Some(letter);
                } else {
                    second = Some(letter);
                }
            }
            (Some(a), Some(b)) => {
                interaction_rate = coefficient;
                first = Some(a);
                second = Some(b);
            }
            (None, _) => {}
        }
    }

    // A lone letter lands in the first slot; with no two-letter term to
    // disambiguate, it is demoted to the second slot before validation.
    if second.is_none() {
        second = first.take();
    }

    match (first, second) {
        (Some(a), Some(b)) => Ok(ParsedEquation {
            growth_rate,
            interaction_rate,
            letters: (a, b),
        }),
        _ => Err(ParseError::MissingVariables),
    }
}
