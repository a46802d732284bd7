use crate::data::LetterFrequencyTable;
use crate::restrictions::FeedbackState;
use crate::scorers::rank_words;
use crate::scorers::ScoreMode;
use log::debug;
use std::sync::Arc;

/// The words that could still be the answer, and the words still worth guessing to learn about
/// untested letters. Both lists are kept ranked best-first, and only ever shrink.
#[derive(Clone, Debug)]
pub struct CandidateStore {
    answers: Vec<Arc<str>>,
    guesses: Vec<Arc<str>>,
    frequencies: LetterFrequencyTable,
}

impl CandidateStore {
    /// Creates a store from the given answer and guess words. Answers are ranked by how common
    /// their letters are at each location among all answers, and guesses by how common their
    /// letters are anywhere among all answers.
    pub fn new(answers: &[Arc<str>], guesses: &[Arc<str>]) -> CandidateStore {
        let mut store = CandidateStore {
            answers: answers.to_vec(),
            guesses: guesses.to_vec(),
            frequencies: LetterFrequencyTable::new(answers),
        };
        rank_words(&mut store.answers, &store.frequencies, ScoreMode::Positional);
        rank_words(&mut store.guesses, &store.frequencies, ScoreMode::Total);
        store
    }

    /// The words that could still be the answer, best first.
    pub fn answers(&self) -> &[Arc<str>] {
        &self.answers
    }

    /// The exploratory guesses that remain, best first.
    pub fn guesses(&self) -> &[Arc<str>] {
        &self.guesses
    }

    /// The letter frequencies of the current answers.
    pub fn frequencies(&self) -> &LetterFrequencyTable {
        &self.frequencies
    }

    /// Removes the word from both lists. Does nothing if it isn't in them.
    pub fn register_guess(&mut self, word: &str) {
        self.answers.retain(|answer| answer.as_ref() != word);
        self.guesses.retain(|guess| guess.as_ref() != word);
    }

    /// Removes every answer that doesn't satisfy the feedback, then re-ranks the rest by their
    /// own letter frequencies. Returns the number of answers removed.
    pub fn prune_answers(&mut self, feedback: &FeedbackState) -> usize {
        let before = self.answers.len();
        self.answers.retain(|word| feedback.is_satisfied_by(word));
        self.frequencies = LetterFrequencyTable::new(&self.answers);
        rank_words(&mut self.answers, &self.frequencies, ScoreMode::Positional);
        let removed = before - self.answers.len();
        debug!(
            "pruned {} answers, {} remain",
            removed,
            self.answers.len()
        );
        removed
    }

    /// Removes every guess that repeats an already-used letter, then re-ranks the rest by the
    /// letter frequencies of the current answers. Returns the number of guesses removed.
    pub fn prune_guesses(&mut self, feedback: &FeedbackState) -> usize {
        let before = self.guesses.len();
        let used = feedback.used();
        self.guesses
            .retain(|word| !word.chars().any(|letter| used.contains(&letter)));
        rank_words(&mut self.guesses, &self.frequencies, ScoreMode::Total);
        let removed = before - self.guesses.len();
        debug!(
            "pruned {} guesses, {} remain",
            removed,
            self.guesses.len()
        );
        removed
    }

    /// Letters that appear in the current answers but haven't been tried yet, in the order they
    /// are first seen in the ranked answers.
    pub fn untested_letters(&self, feedback: &FeedbackState) -> Vec<char> {
        let mut letters: Vec<char> = Vec::new();
        for letter in self.answers.iter().flat_map(|word| word.chars()) {
            if !feedback.used().contains(&letter) && !letters.contains(&letter) {
                letters.push(letter);
            }
        }
        letters
    }
}
