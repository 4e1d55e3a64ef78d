/**
 * Parser for the answers that users type in response to a question.
 *
 * Accepted forms are a single letter ("b") for single-select questions, and a list of
 * letters for multi-select questions ("A,C", "a c", "a;c", "AC").
 */
use std::collections::BTreeSet;

use log::debug;
use unicode_normalization::UnicodeNormalization;

use super::question::LETTERS;


/// The token that ends the exam early, after upper-casing.
pub const QUIT_TOKEN: &str = "Q";

const SEPARATORS: &[char] = &[' ', ';', '/', '|'];


#[derive(Debug, PartialEq, Eq)]
pub enum ParsedAnswer {
    /// The indices of the options the user chose. Never empty.
    Selection(BTreeSet<usize>),
    /// Blank or malformed input. The user should be asked again.
    Invalid,
    /// The user asked to end the exam.
    Quit,
}


/// Parse `raw` as an answer to a question with `num_options` options.
///
/// For single-select questions only the first character of the input is looked at,
/// so "B,C" is read as "B".
pub fn parse(raw: &str, multi_select: bool, num_options: usize) -> ParsedAnswer {
    // NFKC folds full-width letters into their ASCII forms.
    let normalized: String = raw.nfkc().collect();
    let upper = normalized.trim().to_uppercase();
    if upper.is_empty() {
        return ParsedAnswer::Invalid;
    }

    if upper == QUIT_TOKEN {
        return ParsedAnswer::Quit;
    }

    let joined = upper.replace(SEPARATORS, ",");
    let tokens: Vec<String> = if multi_select {
        if !joined.contains(',') && joined.chars().count() > 1 {
            joined.chars().map(|c| c.to_string()).collect()
        } else {
            joined.split(',').filter(|t| !t.is_empty()).map(String::from).collect()
        }
    } else {
        joined.chars().take(1).map(|c| c.to_string()).collect()
    };

    let valid = &LETTERS[..num_options.min(LETTERS.len())];
    let mut chosen = BTreeSet::new();
    for token in tokens.iter() {
        let mut chars = token.chars();
        let index = match (chars.next(), chars.next()) {
            (Some(c), None) => valid.find(c),
            _ => None,
        };
        match index {
            Some(index) => {
                chosen.insert(index);
            },
            None => {
                debug!("Rejecting answer {:?}: bad token {:?}", raw, token);
                return ParsedAnswer::Invalid;
            },
        }
    }

    if chosen.is_empty() || (!multi_select && chosen.len() != 1) {
        return ParsedAnswer::Invalid;
    }
    ParsedAnswer::Selection(chosen)
}
