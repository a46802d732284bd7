use crate::data::LetterFrequencyTable;
use std::cmp::Reverse;
use std::sync::Arc;

/// Which letter frequency a word is scored by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreMode {
    /// Each letter earns the number of times it appears at the same location. Used to rank
    /// possible answers, since an answer wants its letters in the likely places.
    Positional,
    /// Each letter earns the number of times it appears anywhere. Used to rank exploratory
    /// guesses, which only need to find out whether letters are present.
    Total,
}

/// Scores the given word by summing the frequency of each unique letter in it.
///
/// Only the first occurrence of a letter is scored, so repeated letters earn nothing extra. In
/// [`ScoreMode::Positional`] the letter is scored at the location of that first occurrence.
///
/// ```
/// use wordle_pruning_solver::details::LetterFrequencyTable;
/// use wordle_pruning_solver::scorers::{score_word, ScoreMode};
///
/// let table = LetterFrequencyTable::new(&["ALPHA", "ALLOT", "BEGOT"]);
///
/// // A(3) + L(3) + P(1) + H(1), the second 'A' is not counted.
/// assert_eq!(score_word("ALPHA", &table, ScoreMode::Total), 8);
/// assert_eq!(score_word("ALPHA", &table, ScoreMode::Positional), 2 + 2 + 1 + 1);
/// ```
pub fn score_word(word: &str, table: &LetterFrequencyTable, mode: ScoreMode) -> u32 {
    let mut sum = 0;
    for (index, letter) in word.char_indices() {
        if index > 0
            && word
                .chars()
                .take(index)
                .any(|other_letter| other_letter == letter)
        {
            continue;
        }
        sum += match mode {
            ScoreMode::Positional => table.count_at(letter, index),
            ScoreMode::Total => table.total_count(letter),
        };
    }
    sum
}

/// Sorts the words from highest to lowest score. Words with equal scores keep their existing
/// order.
pub fn rank_words(words: &mut [Arc<str>], table: &LetterFrequencyTable, mode: ScoreMode) {
    words.sort_by_cached_key(|word| Reverse(score_word(word, table, mode)));
}
