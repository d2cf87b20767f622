//! Individual similarity algorithms. Inputs are expected to be normalized.
//!
//! Every function returns a 0–100 score or a [`ScoringError::Anomaly`] when the
//! input is degenerate. An empty side yields [`ScoringError::EmptyInput`].

use std::collections::HashSet;

use strsim::{jaro_winkler, normalized_levenshtein};

use super::error::ScoringError;
use super::types::Algorithm;
use crate::constants::SCORE_SCALE;

pub fn compute(algorithm: Algorithm, a: &str, b: &str) -> Result<f64, ScoringError> {
    if a.trim().is_empty() || b.trim().is_empty() {
        return Err(ScoringError::EmptyInput { algorithm });
    }

    let score = match algorithm {
        Algorithm::EditRatio => edit_ratio(a, b),
        Algorithm::JaroWinkler => jaro_winkler(a, b) * SCORE_SCALE,
        Algorithm::TokenSet => token_set(a, b),
        Algorithm::FirstToken => first_token(a, b),
        Algorithm::PartialRatio => partial_ratio(a, b),
        Algorithm::Phonetic => phonetic(a, b),
        Algorithm::Exact => flag(a == b),
        Algorithm::Phrase => phrase(a, b),
        Algorithm::Prefix => prefix(a, b),
    };

    if !score.is_finite() {
        return Err(ScoringError::anomaly(
            algorithm,
            format!("non-finite score {score}"),
        ));
    }
    Ok(score)
}

#[inline]
fn flag(hit: bool) -> f64 {
    if hit { SCORE_SCALE } else { 0.0 }
}

fn edit_ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * SCORE_SCALE
}

fn tokens(s: &str) -> Vec<&str> {
    s.split_whitespace().collect()
}

fn set_overlap<T: Eq + std::hash::Hash>(a: HashSet<T>, b: HashSet<T>) -> f64 {
    let avg = (a.len() + b.len()) as f64 / 2.0;
    if avg == 0.0 {
        return 0.0;
    }
    let shared = a.intersection(&b).count() as f64;
    shared / avg * SCORE_SCALE
}

fn token_set(a: &str, b: &str) -> f64 {
    set_overlap(
        tokens(a).into_iter().collect(),
        tokens(b).into_iter().collect(),
    )
}

fn first_token(a: &str, b: &str) -> f64 {
    flag(a.split_whitespace().next() == b.split_whitespace().next())
}

fn partial_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (short, long) = if a_chars.len() <= b_chars.len() {
        (&a_chars, &b_chars)
    } else {
        (&b_chars, &a_chars)
    };

    if short.len() == long.len() {
        return edit_ratio(a, b);
    }

    let needle: String = short.iter().collect();
    long.windows(short.len())
        .map(|window| {
            let hay: String = window.iter().collect();
            normalized_levenshtein(&needle, &hay)
        })
        .fold(0.0_f64, f64::max)
        * SCORE_SCALE
}

fn phonetic(a: &str, b: &str) -> f64 {
    let codes = |s: &str| -> HashSet<String> { tokens(s).into_iter().map(soundex).collect() };
    set_overlap(codes(a), codes(b))
}

fn phrase(a: &str, b: &str) -> f64 {
    let (ta, tb) = (tokens(a), tokens(b));
    let (short, long) = if ta.len() <= tb.len() { (ta, tb) } else { (tb, ta) };
    flag(long.windows(short.len()).any(|w| w == short.as_slice()))
}

fn prefix(a: &str, b: &str) -> f64 {
    let (ta, tb) = (tokens(a), tokens(b));
    let (short, long) = if ta.len() <= tb.len() { (ta, tb) } else { (tb, ta) };
    flag(
        short
            .iter()
            .zip(long.iter())
            .all(|(s, l)| l.starts_with(s) || s.starts_with(l)),
    )
}

/// American Soundex code for one token. Tokens without a leading letter are
/// returned unchanged so digits still compare by identity.
pub fn soundex(token: &str) -> String {
    let letters: Vec<char> = token
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let Some(&first) = letters.first() else {
        return token.to_string();
    };
    if !token.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return token.to_string();
    }

    let digit = |c: char| -> Option<char> {
        match c {
            'B' | 'F' | 'P' | 'V' => Some('1'),
            'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => Some('2'),
            'D' | 'T' => Some('3'),
            'L' => Some('4'),
            'M' | 'N' => Some('5'),
            'R' => Some('6'),
            _ => None,
        }
    };

    let mut code = String::with_capacity(4);
    code.push(first);
    let mut last = digit(first);

    for &c in &letters[1..] {
        let d = digit(c);
        match d {
            Some(d) if Some(d) != last => {
                code.push(d);
                if code.len() == 4 {
                    break;
                }
            }
            _ => {}
        }
        // H and W do not separate equal codes; vowels do.
        if c != 'H' && c != 'W' {
            last = d;
        }
    }

    while code.len() < 4 {
        code.push('0');
    }
    code
}
