use std::sync::Arc;
use thiserror::Error;

/// The result of a given letter at a specific location.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LetterStatus {
    /// The letter is in the word at this location.
    Green,
    /// The letter is in the word, but not at this location.
    Yellow,
    /// The letter is not in the word, or the word has fewer copies of it than the guess.
    Gray,
}

/// Indicates that an error occurred while solving a puzzle.
#[derive(Debug, Error)]
pub enum SolverError {
    /// No answer candidates remain, so the feedback must have been inconsistent or the secret is
    /// not in the answer list.
    #[error("no answer candidates remain")]
    ExhaustedCandidates,
    /// The requested secret word is not in the answer list.
    #[error("the secret \"{0}\" is not in the answer list")]
    UnsupportedSecret(String),
    /// The given feedback does not match the guessed word.
    #[error("malformed feedback: {0}")]
    MalformedFeedback(String),
    /// The solver was asked to solve on its own, but has no secret to grade guesses against.
    #[error("no secret word was given")]
    NoSecret,
    /// The word has the wrong length or contains characters other than ASCII letters.
    #[error("\"{0}\" is not a valid word for this puzzle")]
    InvalidWord(String),
    /// A word list had no usable words of the expected length, which this contains.
    #[error("no words of length {0}")]
    WordLength(usize),
    /// The word bank could not be read.
    #[error("could not read words")]
    Io(#[from] std::io::Error),
}

/// The result of a single word guess.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GuessResult<'a> {
    /// The guess that was made.
    pub guess: &'a str,
    /// The result of each letter, provided in the same letter order as in the guess.
    pub results: Vec<LetterStatus>,
}

impl<'a> GuessResult<'a> {
    /// Returns true iff every letter was green.
    pub fn is_solved(&self) -> bool {
        self.results
            .iter()
            .all(|status| *status == LetterStatus::Green)
    }
}

/// The guesses made to solve a puzzle, in order. The last guess is the solution.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    guesses: Vec<Arc<str>>,
}

impl Solution {
    pub(crate) fn new(guesses: Vec<Arc<str>>) -> Solution {
        Solution { guesses }
    }

    /// The word that solved the puzzle.
    pub fn word(&self) -> Option<&str> {
        self.guesses.last().map(|word| word.as_ref())
    }

    /// The number of guesses it took.
    pub fn guess_count(&self) -> usize {
        self.guesses.len()
    }

    /// Every guess, in the order it was made.
    pub fn guesses(&self) -> &[Arc<str>] {
        &self.guesses
    }
}

/// Determines the result of the given `guess` when applied to the given `objective`.
///
/// Letters are graded the way the game does it: exact matches are green first, then each
/// remaining letter is yellow only while the objective still has an unmatched copy of it, reading
/// left to right. Any further copies are gray.
///
/// ```
/// use wordle_pruning_solver::{get_result_for_guess, LetterStatus};
///
/// let result = get_result_for_guess("ABIDE", "SPEED").unwrap();
/// assert_eq!(
///     result.results,
///     vec![
///         LetterStatus::Gray,
///         LetterStatus::Gray,
///         LetterStatus::Yellow,
///         LetterStatus::Gray,
///         LetterStatus::Yellow,
///     ]
/// );
/// ```
pub fn get_result_for_guess<'a>(
    objective: &str,
    guess: &'a str,
) -> Result<GuessResult<'a>, SolverError> {
    let objective: Vec<char> = objective.chars().collect();
    let guess_letters: Vec<char> = guess.chars().collect();
    if objective.len() != guess_letters.len() {
        return Err(SolverError::InvalidWord(guess.to_string()));
    }
    let mut results = vec![LetterStatus::Gray; guess_letters.len()];
    let mut unmatched: Vec<Option<char>> = Vec::with_capacity(objective.len());
    for (index, letter) in guess_letters.iter().enumerate() {
        if objective[index] == *letter {
            results[index] = LetterStatus::Green;
            unmatched.push(None);
        } else {
            unmatched.push(Some(objective[index]));
        }
    }
    for (index, letter) in guess_letters.iter().enumerate() {
        if results[index] == LetterStatus::Green {
            continue;
        }
        if let Some(slot) = unmatched
            .iter_mut()
            .find(|maybe_letter| **maybe_letter == Some(*letter))
        {
            *slot = None;
            results[index] = LetterStatus::Yellow;
        }
    }
    Ok(GuessResult { guess, results })
}
