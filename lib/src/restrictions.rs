use crate::data::normalize_letter;
use crate::data::normalize_word;
use crate::data::LocatedLetter;
use crate::results::GuessResult;
use crate::results::LetterStatus;
use crate::results::SolverError;
use log::trace;
use log::warn;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

/// What the current guess has revealed about one letter so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct RoundTally {
    /// Locations where this letter was graded green or yellow.
    present_at: BTreeSet<usize>,
    /// Whether any copy of this letter was graded gray.
    absent: bool,
}

/// Everything learned about the secret word from the feedback given so far.
///
/// Reports are grouped by guess: [`begin_guess`](Self::begin_guess) starts a new guess, and every
/// report until the next one is tallied together. This is how repeated letters are handled. If a
/// guess grades some copies of a letter green or yellow and another copy gray, the secret has
/// exactly as many copies as were green or yellow. If it grades none of them gray, the secret has
/// at least that many.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackState {
    word_length: usize,
    green: BTreeMap<usize, char>,
    yellow: BTreeMap<usize, BTreeSet<char>>,
    gray: BTreeSet<char>,
    used: BTreeSet<char>,
    min_counts: BTreeMap<char, usize>,
    max_counts: BTreeMap<char, usize>,
    excluded: BTreeSet<LocatedLetter>,
    round: BTreeMap<char, RoundTally>,
    current_guess: Option<Arc<str>>,
}

impl FeedbackState {
    /// Creates an empty feedback state for words of the given length.
    pub fn new(word_length: usize) -> FeedbackState {
        FeedbackState {
            word_length,
            green: BTreeMap::new(),
            yellow: BTreeMap::new(),
            gray: BTreeSet::new(),
            used: BTreeSet::new(),
            min_counts: BTreeMap::new(),
            max_counts: BTreeMap::new(),
            excluded: BTreeSet::new(),
            round: BTreeMap::new(),
            current_guess: None,
        }
    }

    /// The length of the words this state applies to.
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    /// Letters known to be at each location.
    pub fn green(&self) -> &BTreeMap<usize, char> {
        &self.green
    }

    /// Letters known to be in the word, keyed by the location where they were tried and found
    /// not to be. A letter is moved out of here once its location is known.
    pub fn yellow(&self) -> &BTreeMap<usize, BTreeSet<char>> {
        &self.yellow
    }

    /// Letters known not to be in the word at all.
    pub fn gray(&self) -> &BTreeSet<char> {
        &self.gray
    }

    /// Every letter that has been guessed or reported.
    pub fn used(&self) -> &BTreeSet<char> {
        &self.used
    }

    /// The minimum number of times the letter must appear, if it is known to be present.
    pub fn min_count(&self, letter: char) -> Option<usize> {
        self.min_counts.get(&letter).copied()
    }

    /// The exact number of times the letter must appear, if that is known.
    pub fn exact_count(&self, letter: char) -> Option<usize> {
        self.max_counts.get(&letter).copied()
    }

    /// The guess that reports are currently being tallied against, if any.
    pub fn current_guess(&self) -> Option<&str> {
        self.current_guess.as_deref()
    }

    /// Starts tallying reports for a new guess. All its letters count as used.
    pub fn begin_guess(&mut self, guess: &str) -> Result<(), SolverError> {
        let guess = normalize_word(guess, self.word_length)?;
        if self.current_guess.as_ref() == Some(&guess) {
            return Ok(());
        }
        if self.current_guess.is_some() {
            self.warn_contradictions();
        }
        self.used.extend(guess.chars());
        self.round.clear();
        self.current_guess = Some(guess);
        Ok(())
    }

    /// Records that the letter is at the given location.
    pub fn hit(&mut self, letter: char, location: usize) -> Result<(), SolverError> {
        let letter = self.check_report(letter, Some(location))?;
        if let Some(existing) = self.green.get(&location) {
            if *existing != letter {
                return Err(SolverError::MalformedFeedback(format!(
                    "location {} is already known to be '{}'",
                    location, existing
                )));
            }
        }
        if self.is_ruled_out(letter, location) {
            return Err(SolverError::MalformedFeedback(format!(
                "'{}' is already known not to be at location {}",
                letter, location
            )));
        }
        trace!("green: '{}' at {}", letter, location);
        self.used.insert(letter);
        self.green.insert(location, letter);
        // The letter's location is now known, so yellow records for it only rule out places.
        for (tried_location, letters) in self.yellow.iter_mut() {
            if letters.remove(&letter) {
                self.excluded
                    .insert(LocatedLetter::new(letter, *tried_location));
            }
        }
        self.yellow.retain(|_, letters| !letters.is_empty());
        self.tally(letter).present_at.insert(location);
        self.refresh_counts(letter);
        Ok(())
    }

    /// Records that the letter is in the word, but not at the location where it was tried.
    pub fn hit_elsewhere(&mut self, letter: char, tried_location: usize) -> Result<(), SolverError> {
        let letter = self.check_report(letter, Some(tried_location))?;
        if self.green.get(&tried_location) == Some(&letter) {
            return Err(SolverError::MalformedFeedback(format!(
                "'{}' is already known to be at location {}",
                letter, tried_location
            )));
        }
        trace!("yellow: '{}' not at {}", letter, tried_location);
        self.used.insert(letter);
        if self.green.values().any(|known| *known == letter) {
            self.excluded
                .insert(LocatedLetter::new(letter, tried_location));
        } else {
            self.yellow
                .entry(tried_location)
                .or_default()
                .insert(letter);
        }
        self.tally(letter).present_at.insert(tried_location);
        self.refresh_counts(letter);
        Ok(())
    }

    /// Records that the letter is not in the word, or that the word has no more copies of it
    /// than the current guess graded green or yellow.
    pub fn miss(&mut self, letter: char) -> Result<(), SolverError> {
        let letter = self.check_report(letter, None)?;
        self.record_gray(letter, None);
        Ok(())
    }

    /// Applies the feedback for a whole guess at once. Nothing is changed if any part of it is
    /// malformed.
    pub fn update(&mut self, result: &GuessResult) -> Result<(), SolverError> {
        if result.results.len() != self.word_length {
            return Err(SolverError::MalformedFeedback(format!(
                "expected {} letter results for \"{}\", got {}",
                self.word_length,
                result.guess,
                result.results.len()
            )));
        }
        let mut next = self.clone();
        next.begin_guess(result.guess).map_err(|_| {
            SolverError::MalformedFeedback(format!("\"{}\" is not a valid guess", result.guess))
        })?;
        let mut grays = Vec::new();
        for ((location, letter), status) in result.guess.char_indices().zip(result.results.iter())
        {
            match status {
                LetterStatus::Green => next.hit(letter, location)?,
                LetterStatus::Yellow => next.hit_elsewhere(letter, location)?,
                LetterStatus::Gray => grays.push((letter, location)),
            }
        }
        // Grays go last so they are read against every present copy of the same letter.
        for (letter, location) in grays {
            let letter = next.check_report(letter, Some(location))?;
            next.record_gray(letter, Some(location));
        }
        *self = next;
        Ok(())
    }

    /// Returns `true` iff the given word is consistent with everything learned so far.
    pub fn is_satisfied_by(&self, word: &str) -> bool {
        let letters: Vec<char> = word.chars().collect();
        if letters.len() != self.word_length {
            return false;
        }
        let count = |letter: char| letters.iter().filter(|other| **other == letter).count();
        self.green
            .iter()
            .all(|(location, letter)| letters[*location] == *letter)
            && self.yellow.iter().all(|(location, tried)| {
                tried
                    .iter()
                    .all(|letter| letters[*location] != *letter && letters.contains(letter))
            })
            && self
                .excluded
                .iter()
                .all(|ll| letters[ll.location] != ll.letter)
            && self
                .gray
                .iter()
                .all(|letter| self.min_counts.contains_key(letter) || !letters.contains(letter))
            && self
                .min_counts
                .iter()
                .all(|(letter, min)| count(*letter) >= *min)
            && self
                .max_counts
                .iter()
                .all(|(letter, max)| count(*letter) <= *max)
    }

    fn check_report(&self, letter: char, location: Option<usize>) -> Result<char, SolverError> {
        let letter = normalize_letter(letter)?;
        if let Some(location) = location {
            if location >= self.word_length {
                return Err(SolverError::MalformedFeedback(format!(
                    "location {} is outside a {} letter word",
                    location, self.word_length
                )));
            }
        }
        if let Some(guess) = &self.current_guess {
            let matches_guess = match location {
                Some(location) => guess.chars().nth(location) == Some(letter),
                None => guess.contains(letter),
            };
            if !matches_guess {
                return Err(SolverError::MalformedFeedback(format!(
                    "'{}' does not match the guess \"{}\"",
                    letter, guess
                )));
            }
        }
        Ok(letter)
    }

    fn is_ruled_out(&self, letter: char, location: usize) -> bool {
        self.excluded.contains(&LocatedLetter::new(letter, location))
            || self
                .yellow
                .get(&location)
                .map_or(false, |letters| letters.contains(&letter))
    }

    fn record_gray(&mut self, letter: char, location: Option<usize>) {
        trace!("gray: '{}'", letter);
        self.used.insert(letter);
        if let Some(location) = location {
            self.excluded.insert(LocatedLetter::new(letter, location));
        }
        self.tally(letter).absent = true;
        self.refresh_counts(letter);
    }

    /// Reports made without a current guess can't be grouped, so each one is tallied alone.
    fn tally(&mut self, letter: char) -> &mut RoundTally {
        if self.current_guess.is_none() {
            self.round.clear();
        }
        self.round.entry(letter).or_default()
    }

    /// Folds this guess's tally for the letter into the known counts.
    fn refresh_counts(&mut self, letter: char) {
        let tally = match self.round.get(&letter) {
            Some(tally) => tally,
            None => return,
        };
        let num_present = tally.present_at.len();
        if num_present > 0 {
            self.gray.remove(&letter);
            let min = self.min_counts.entry(letter).or_insert(0);
            *min = (*min).max(num_present);
            if tally.absent {
                let max = self.max_counts.entry(letter).or_insert(num_present);
                *max = (*max).min(num_present);
            }
        } else if tally.absent && !self.min_counts.contains_key(&letter) {
            self.gray.insert(letter);
        }
        if self.current_guess.is_none() {
            self.warn_contradictions();
        }
    }

    /// Letters whose every copy in the current guess was graded gray, even though an earlier guess
    /// found them in the word. Only meaningful once all of the guess's reports are in.
    pub(crate) fn contradicted_letters(&self) -> Vec<char> {
        self.round
            .iter()
            .filter(|(letter, tally)| {
                tally.absent && tally.present_at.is_empty() && self.min_counts.contains_key(letter)
            })
            .map(|(letter, _)| *letter)
            .collect()
    }

    fn warn_contradictions(&self) {
        for letter in self.contradicted_letters() {
            warn!(
                "'{}' was graded gray, but an earlier guess found it in the word",
                letter
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn feedback_state_is_satisfied_by_no_feedback() {
        let state = FeedbackState::new(4);

        assert!(state.is_satisfied_by("ABCD"));
        assert!(state.is_satisfied_by("ZZZZ"));

        // Wrong length
        assert_eq!(state.is_satisfied_by(""), false);
        assert_eq!(state.is_satisfied_by("ABCDE"), false);
    }

    #[test]
    fn feedback_state_is_satisfied_by_with_feedback() -> Result<(), SolverError> {
        let mut state = FeedbackState::new(4);

        state.update(&GuessResult {
            guess: "ABBC",
            results: vec![
                LetterStatus::Yellow,
                LetterStatus::Yellow,
                LetterStatus::Green,
                LetterStatus::Gray,
            ],
        })?;

        assert!(state.is_satisfied_by("BDBA"));
        assert!(state.is_satisfied_by("DABB"));

        assert_eq!(state.is_satisfied_by("BBBA"), false);
        assert_eq!(state.is_satisfied_by("BCBA"), false);
        assert_eq!(state.is_satisfied_by("ADBD"), false);
        assert_eq!(state.is_satisfied_by("BDBD"), false);
        Ok(())
    }

    #[test]
    fn feedback_state_is_satisfied_by_with_exact_count() -> Result<(), SolverError> {
        let mut state = FeedbackState::new(4);

        state.update(&GuessResult {
            guess: "ABBC",
            results: vec![
                LetterStatus::Yellow,
                LetterStatus::Gray,
                LetterStatus::Green,
                LetterStatus::Gray,
            ],
        })?;

        assert!(state.is_satisfied_by("EDBA"));
        assert!(state.is_satisfied_by("DABE"));
        assert!(state.is_satisfied_by("DABA"));
        assert_eq!(state.exact_count('B'), Some(1));
        assert!(!state.gray().contains(&'B'));

        assert_eq!(state.is_satisfied_by("BDBA"), false);
        assert_eq!(state.is_satisfied_by("DCBA"), false);
        assert_eq!(state.is_satisfied_by("ADBD"), false);
        Ok(())
    }

    #[test]
    fn feedback_state_gray_then_green_in_same_guess_is_order_independent() -> Result<(), SolverError>
    {
        let mut gray_first = FeedbackState::new(5);
        gray_first.begin_guess("SPEED")?;
        gray_first.miss('E')?;
        gray_first.hit('E', 2)?;

        let mut green_first = FeedbackState::new(5);
        green_first.begin_guess("SPEED")?;
        green_first.hit('E', 2)?;
        green_first.miss('E')?;

        assert_eq!(gray_first.exact_count('E'), Some(1));
        assert_eq!(green_first.exact_count('E'), Some(1));
        assert!(!gray_first.gray().contains(&'E'));
        assert!(gray_first.is_satisfied_by("THEIR"));
        assert!(!gray_first.is_satisfied_by("THEME"));
        Ok(())
    }

    #[test]
    fn feedback_state_gray_before_green_is_not_a_contradiction() -> Result<(), SolverError> {
        let mut state = FeedbackState::new(5);
        state.begin_guess("CRANE")?;
        state.hit('E', 4)?;

        state.begin_guess("EERIE")?;
        state.miss('E')?;
        // Mid-guess, the gray copies look contradictory until the green one arrives.
        assert_eq!(state.contradicted_letters(), vec!['E']);
        state.hit('E', 4)?;

        assert!(state.contradicted_letters().is_empty());
        assert_eq!(state.exact_count('E'), Some(1));
        assert!(!state.gray().contains(&'E'));
        Ok(())
    }

    #[test]
    fn feedback_state_gray_after_earlier_present_is_a_contradiction() -> Result<(), SolverError> {
        let mut state = FeedbackState::new(5);
        state.begin_guess("CRANE")?;
        state.hit('E', 4)?;

        state.begin_guess("THEIR")?;
        state.miss('E')?;

        assert_eq!(state.contradicted_letters(), vec!['E']);
        assert!(!state.gray().contains(&'E'));
        Ok(())
    }

    #[test]
    fn feedback_state_rejects_green_where_ruled_out() -> Result<(), SolverError> {
        let mut state = FeedbackState::new(5);
        state.hit_elsewhere('A', 1)?;

        assert_matches!(state.hit('A', 1), Err(SolverError::MalformedFeedback(_)));

        state.update(&GuessResult {
            guess: "SLATE",
            results: vec![LetterStatus::Gray; 5],
        })?;
        state.begin_guess("SPOON")?;

        assert_matches!(state.hit('S', 0), Err(SolverError::MalformedFeedback(_)));
        assert!(state.green().is_empty());
        Ok(())
    }

    #[test]
    fn feedback_state_green_moves_yellow_to_excluded() -> Result<(), SolverError> {
        let mut state = FeedbackState::new(5);

        state.hit_elsewhere('A', 1)?;
        assert_eq!(state.yellow().get(&1), Some(&BTreeSet::from(['A'])));

        state.hit('A', 3)?;

        assert!(state.yellow().is_empty());
        assert_eq!(state.green().get(&3), Some(&'A'));
        assert!(!state.is_satisfied_by("BAXAX"));
        assert!(state.is_satisfied_by("BXXAX"));
        Ok(())
    }

    #[test]
    fn feedback_state_green_removes_gray() -> Result<(), SolverError> {
        let mut state = FeedbackState::new(5);

        state.miss('T')?;
        assert!(state.gray().contains(&'T'));

        state.begin_guess("TOAST")?;
        state.hit('T', 0)?;

        assert!(!state.gray().contains(&'T'));
        assert!(state.used().contains(&'T'));
        Ok(())
    }

    #[test]
    fn feedback_state_records_used_letters() -> Result<(), SolverError> {
        let mut state = FeedbackState::new(5);

        state.begin_guess("crane")?;
        state.miss('c')?;

        assert_eq!(
            state.used().iter().collect::<String>(),
            "ACENR".to_string()
        );
        Ok(())
    }

    #[test]
    fn feedback_state_rejects_location_out_of_range() {
        let mut state = FeedbackState::new(5);

        assert_matches!(state.hit('A', 5), Err(SolverError::MalformedFeedback(_)));
        assert!(state.green().is_empty());
    }

    #[test]
    fn feedback_state_rejects_letter_not_in_guess() -> Result<(), SolverError> {
        let mut state = FeedbackState::new(5);
        state.begin_guess("CRANE")?;

        assert_matches!(state.hit('C', 1), Err(SolverError::MalformedFeedback(_)));
        assert_matches!(state.miss('Z'), Err(SolverError::MalformedFeedback(_)));
        assert!(state.green().is_empty());
        assert!(state.gray().is_empty());
        Ok(())
    }

    #[test]
    fn feedback_state_rejects_conflicting_green() -> Result<(), SolverError> {
        let mut state = FeedbackState::new(5);
        state.hit('A', 2)?;

        assert_matches!(state.hit('B', 2), Err(SolverError::MalformedFeedback(_)));
        assert_matches!(
            state.hit_elsewhere('A', 2),
            Err(SolverError::MalformedFeedback(_))
        );
        assert_eq!(state.green().get(&2), Some(&'A'));
        Ok(())
    }

    #[test]
    fn feedback_state_update_wrong_length_does_not_mutate() {
        let mut state = FeedbackState::new(5);

        let result = state.update(&GuessResult {
            guess: "CRANE",
            results: vec![LetterStatus::Green; 4],
        });

        assert_matches!(result, Err(SolverError::MalformedFeedback(_)));
        assert_eq!(state, FeedbackState::new(5));
    }

    #[test]
    fn feedback_state_update_partial_failure_does_not_mutate() -> Result<(), SolverError> {
        let mut state = FeedbackState::new(5);
        state.hit('R', 1)?;
        let before = state.clone();

        // 'L' at location 1 contradicts the known 'R'.
        let result = state.update(&GuessResult {
            guess: "SLATE",
            results: vec![
                LetterStatus::Gray,
                LetterStatus::Green,
                LetterStatus::Gray,
                LetterStatus::Gray,
                LetterStatus::Gray,
            ],
        });

        assert_matches!(result, Err(SolverError::MalformedFeedback(_)));
        assert_eq!(state, before);
        Ok(())
    }

    #[test]
    fn feedback_state_lower_case_reports_match_upper_case() -> Result<(), SolverError> {
        let mut lower = FeedbackState::new(5);
        lower.hit('a', 2)?;
        lower.hit_elsewhere('e', 0)?;
        lower.miss('s')?;

        let mut upper = FeedbackState::new(5);
        upper.hit('A', 2)?;
        upper.hit_elsewhere('E', 0)?;
        upper.miss('S')?;

        assert_eq!(lower, upper);
        Ok(())
    }
}
