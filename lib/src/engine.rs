use crate::candidates::CandidateStore;
use crate::data::normalize_word;
use crate::data::WordBank;
use crate::restrictions::FeedbackState;
use crate::results::*;
use log::info;
use log::warn;
use std::sync::Arc;

/// Settings for a puzzle. Everything that changes how the solver behaves is set here and passed
/// in at construction.
///
/// ```
/// use wordle_pruning_solver::SolverConfig;
///
/// let config = SolverConfig::default().with_opening_word("slate");
///
/// assert_eq!(config.word_length, 5);
/// assert_eq!(config.fixed_opening_word.as_deref(), Some("slate"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// The length of every word in the puzzle.
    pub word_length: usize,
    /// With more answers than this left, guess the best exploratory word outright.
    pub explore_threshold: usize,
    /// With more answers than this left (but not more than `explore_threshold`), look for a
    /// guess that tests several untested letters from the answers at once.
    pub intersect_threshold: usize,
    /// The fewest untested letters such a guess must test to be worth more than guessing an
    /// answer.
    pub min_intersecting_letters: usize,
    /// If set, always guess this word first instead of asking the strategy.
    pub fixed_opening_word: Option<String>,
    /// Logs each guess decision at info level.
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            word_length: 5,
            explore_threshold: 32,
            intersect_threshold: 2,
            min_intersecting_letters: 2,
            fixed_opening_word: None,
            verbose: false,
        }
    }
}

impl SolverConfig {
    /// Sets the length of every word in the puzzle.
    pub fn with_word_length(self, word_length: usize) -> Self {
        SolverConfig {
            word_length,
            ..self
        }
    }

    /// Always guesses the given word first. It is checked and upper-cased when the puzzle is
    /// built.
    pub fn with_opening_word(self, word: &str) -> Self {
        SolverConfig {
            fixed_opening_word: Some(word.to_string()),
            ..self
        }
    }

    /// Sets the answer counts above which the solver explores outright, or looks for a guess
    /// that tests several untested letters.
    pub fn with_thresholds(self, explore_threshold: usize, intersect_threshold: usize) -> Self {
        SolverConfig {
            explore_threshold,
            intersect_threshold,
            ..self
        }
    }

    /// Sets whether each guess decision is logged at info level.
    pub fn with_verbose(self, verbose: bool) -> Self {
        SolverConfig { verbose, ..self }
    }
}

/// How a guess was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GuessMode {
    /// The best-ranked word that could be the answer.
    ExploitAnswer,
    /// The best-ranked exploratory word, which may not be a possible answer.
    ExploreGuess,
    /// The exploratory word that tests the most untested letters from the remaining answers.
    ExploreIntersecting,
    /// The configured opening word.
    Opening,
}

/// Chooses the next guess from the candidate lists.
#[derive(Clone, Debug)]
pub struct GuessSelector {
    explore_threshold: usize,
    intersect_threshold: usize,
    min_intersecting_letters: usize,
}

impl GuessSelector {
    /// Creates a selector using the thresholds from the given config.
    pub fn new(config: &SolverConfig) -> GuessSelector {
        GuessSelector {
            explore_threshold: config.explore_threshold,
            intersect_threshold: config.intersect_threshold,
            min_intersecting_letters: config.min_intersecting_letters,
        }
    }

    /// Decides how to guess given the current candidates, and returns the guess.
    ///
    /// Fails with [`SolverError::ExhaustedCandidates`] if no answers remain.
    pub fn select(
        &self,
        store: &CandidateStore,
        feedback: &FeedbackState,
    ) -> Result<(GuessMode, Arc<str>), SolverError> {
        let answers = store.answers();
        let top_answer = answers
            .first()
            .ok_or(SolverError::ExhaustedCandidates)?;
        if answers.len() == 1 {
            return Ok((GuessMode::ExploitAnswer, Arc::clone(top_answer)));
        }
        if answers.len() > self.explore_threshold {
            if let Some(guess) = store.guesses().first() {
                return Ok((GuessMode::ExploreGuess, Arc::clone(guess)));
            }
        }
        if answers.len() > self.intersect_threshold {
            if let Some(guess) = self.best_intersecting_guess(store, feedback) {
                return Ok((GuessMode::ExploreIntersecting, guess));
            }
        }
        Ok((GuessMode::ExploitAnswer, Arc::clone(top_answer)))
    }

    /// Finds the guess containing the most letters that appear in the answers but haven't been
    /// tried. Ties go to the better-ranked guess.
    fn best_intersecting_guess(
        &self,
        store: &CandidateStore,
        feedback: &FeedbackState,
    ) -> Option<Arc<str>> {
        let untested = store.untested_letters(feedback);
        let mut best: Option<(&Arc<str>, usize)> = None;
        for word in store.guesses() {
            let num_untested = untested
                .iter()
                .filter(|letter| word.contains(**letter))
                .count();
            if best.map_or(true, |(_, best_count)| num_untested > best_count) {
                best = Some((word, num_untested));
            }
        }
        best.filter(|(_, count)| *count >= self.min_intersecting_letters)
            .map(|(word, _)| Arc::clone(word))
    }
}

/// The state of one puzzle: the remaining candidates, the feedback so far, and the guesses made.
///
/// This can be driven directly to assist a human player:
///
/// ```
/// use wordle_pruning_solver::{Puzzle, SolverConfig, WordBank};
///
/// let bank = WordBank::from_iterator(&["robot", "crane", "plant"], 5).unwrap();
/// let mut puzzle = Puzzle::from_answers(&bank, SolverConfig::default()).unwrap();
///
/// puzzle.register_guess("slate").unwrap();
/// puzzle.miss('s').unwrap();
/// puzzle.miss('l').unwrap();
/// puzzle.hit('a', 2).unwrap();
/// puzzle.miss('t').unwrap();
/// puzzle.hit('e', 4).unwrap();
///
/// assert_eq!(puzzle.next_guess().unwrap().as_ref(), "CRANE");
/// ```
#[derive(Clone, Debug)]
pub struct Puzzle {
    config: SolverConfig,
    selector: GuessSelector,
    store: CandidateStore,
    feedback: FeedbackState,
    opening_word: Option<Arc<str>>,
    guessed: Vec<Arc<str>>,
    needs_prune: bool,
    solved: bool,
}

impl Puzzle {
    /// Creates a puzzle whose secret is one of `answers`, and whose exploratory guesses are
    /// drawn from `guesses`.
    pub fn new(
        answers: &WordBank,
        guesses: &WordBank,
        config: SolverConfig,
    ) -> Result<Puzzle, SolverError> {
        for bank in [answers, guesses] {
            if !bank.is_empty() && bank.word_length() != config.word_length {
                return Err(SolverError::WordLength(config.word_length));
            }
        }
        let opening_word = config
            .fixed_opening_word
            .as_deref()
            .map(|word| normalize_word(word, config.word_length))
            .transpose()?;
        Ok(Puzzle {
            selector: GuessSelector::new(&config),
            store: CandidateStore::new(answers, guesses),
            feedback: FeedbackState::new(config.word_length),
            opening_word,
            guessed: Vec::new(),
            needs_prune: false,
            solved: false,
            config,
        })
    }

    /// Creates a puzzle that uses the answers as the exploratory guesses too.
    pub fn from_answers(answers: &WordBank, config: SolverConfig) -> Result<Puzzle, SolverError> {
        Puzzle::new(answers, answers, config)
    }

    /// Chooses the next word to guess, applying any feedback reported since the last call.
    pub fn next_guess(&mut self) -> Result<Arc<str>, SolverError> {
        self.prune();
        let (mode, guess) = match (&self.opening_word, self.guessed.is_empty()) {
            (Some(word), true) if !self.store.answers().is_empty() => {
                (GuessMode::Opening, Arc::clone(word))
            }
            _ => self
                .selector
                .select(&self.store, &self.feedback)
                .map_err(|err| {
                    warn!("no answers remain after {} guesses", self.guessed.len());
                    err
                })?,
        };
        if self.config.verbose {
            info!(
                "{:?}: {} ({} answers, {} guesses left)",
                mode,
                guess,
                self.store.answers().len(),
                self.store.guesses().len()
            );
        }
        Ok(guess)
    }

    /// Records that the word was guessed. It won't be suggested again, and feedback reported
    /// after this is checked against it. Registering the same word again does nothing.
    pub fn register_guess(&mut self, word: &str) -> Result<(), SolverError> {
        let word = normalize_word(word, self.config.word_length)?;
        if self.guessed.contains(&word) {
            return Ok(());
        }
        self.feedback.begin_guess(&word)?;
        self.store.register_guess(&word);
        self.guessed.push(word);
        self.needs_prune = true;
        Ok(())
    }

    /// Reports that the letter is at the given zero-based location.
    pub fn hit(&mut self, letter: char, location: usize) -> Result<(), SolverError> {
        self.feedback.hit(letter, location)?;
        self.needs_prune = true;
        Ok(())
    }

    /// Reports that the letter is in the word, but not at the location where it was tried.
    pub fn hit_elsewhere(&mut self, letter: char, tried_location: usize) -> Result<(), SolverError> {
        self.feedback.hit_elsewhere(letter, tried_location)?;
        self.needs_prune = true;
        Ok(())
    }

    /// Reports that the letter is not in the word (beyond any copies already reported green or
    /// yellow for the current guess).
    pub fn miss(&mut self, letter: char) -> Result<(), SolverError> {
        self.feedback.miss(letter)?;
        self.needs_prune = true;
        Ok(())
    }

    /// Reports the feedback for a whole guess, registering the guess if needed. If every letter
    /// is green, the puzzle is solved.
    pub fn update(&mut self, result: &GuessResult) -> Result<(), SolverError> {
        self.feedback.update(result)?;
        let word = normalize_word(result.guess, self.config.word_length)?;
        self.store.register_guess(&word);
        if !self.guessed.contains(&word) {
            self.guessed.push(word);
        }
        self.needs_prune = true;
        if result.is_solved() {
            self.mark_solved();
        }
        Ok(())
    }

    /// Applies the feedback reported so far to the candidate lists. This happens automatically
    /// in [`next_guess`](Self::next_guess).
    pub fn prune(&mut self) {
        if !self.needs_prune {
            return;
        }
        self.store.prune_answers(&self.feedback);
        self.store.prune_guesses(&self.feedback);
        self.needs_prune = false;
    }

    /// Marks the puzzle as solved.
    pub fn mark_solved(&mut self) {
        self.solved = true;
    }

    /// Returns true iff the puzzle has been marked solved, either directly or by an all-green
    /// update.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// The guesses made so far, in order.
    pub fn guesses(&self) -> &[Arc<str>] {
        &self.guessed
    }

    /// The words that could still be the answer, best first. Feedback reported since the last
    /// prune is not yet reflected here.
    pub fn answers(&self) -> &[Arc<str>] {
        self.store.answers()
    }

    /// The remaining exploratory guesses, best first.
    pub fn guess_candidates(&self) -> &[Arc<str>] {
        self.store.guesses()
    }

    /// Everything learned from the feedback reported so far.
    pub fn feedback(&self) -> &FeedbackState {
        &self.feedback
    }

    /// The settings this puzzle was built with.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The guesses made so far as a [`Solution`].
    pub fn solution(&self) -> Solution {
        Solution::new(self.guessed.clone())
    }
}

/// Solves a puzzle, either against a known secret or with feedback from a player.
#[derive(Clone, Debug)]
pub struct Solver {
    target: Option<Arc<str>>,
    puzzle: Puzzle,
}

impl Solver {
    /// Creates a solver with no known secret. Feedback must be reported through
    /// [`puzzle_mut`](Self::puzzle_mut).
    pub fn new(
        answers: &WordBank,
        guesses: &WordBank,
        config: SolverConfig,
    ) -> Result<Solver, SolverError> {
        Ok(Solver {
            target: None,
            puzzle: Puzzle::new(answers, guesses, config)?,
        })
    }

    /// Creates a solver for the given secret, which must be one of the answers.
    pub fn with_target(
        target: &str,
        answers: &WordBank,
        guesses: &WordBank,
        config: SolverConfig,
    ) -> Result<Solver, SolverError> {
        let puzzle = Puzzle::new(answers, guesses, config)?;
        if !answers.contains(target) {
            return Err(SolverError::UnsupportedSecret(target.trim().to_string()));
        }
        let target = normalize_word(target, puzzle.config().word_length)?;
        Ok(Solver {
            target: Some(target),
            puzzle,
        })
    }

    /// The secret this solver grades its guesses against, if it has one.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// The puzzle being solved.
    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// The puzzle being solved, for reporting feedback when there is no secret.
    pub fn puzzle_mut(&mut self) -> &mut Puzzle {
        &mut self.puzzle
    }

    /// Returns true iff the puzzle is solved.
    pub fn is_solved(&self) -> bool {
        self.puzzle.is_solved()
    }

    /// Guesses until the secret is found, grading each guess against it.
    ///
    /// Fails with [`SolverError::NoSecret`] if this solver has no secret, or
    /// [`SolverError::ExhaustedCandidates`] if the answers run out.
    pub fn solve(&mut self) -> Result<Solution, SolverError> {
        let target = self.target.clone().ok_or(SolverError::NoSecret)?;
        while !self.puzzle.is_solved() {
            let guess = self.puzzle.next_guess()?;
            self.puzzle.register_guess(&guess)?;
            if guess == target {
                self.puzzle.mark_solved();
                break;
            }
            let result = get_result_for_guess(&target, &guess)?;
            self.puzzle.update(&result)?;
        }
        Ok(self.puzzle.solution())
    }
}

/// Solves for the given secret from a fresh puzzle built from the word banks.
///
/// ```
/// use wordle_pruning_solver::{solve, SolverConfig, WordBank};
///
/// let bank = WordBank::from_iterator(&["robot", "crane", "plant"], 5).unwrap();
/// let config = SolverConfig::default().with_opening_word("robot");
///
/// let solution = solve("robot", &bank, &bank, config).unwrap();
///
/// assert_eq!(solution.guess_count(), 1);
/// assert_eq!(solution.word(), Some("ROBOT"));
/// ```
pub fn solve(
    secret: &str,
    answers: &WordBank,
    guesses: &WordBank,
    config: SolverConfig,
) -> Result<Solution, SolverError> {
    Solver::with_target(secret, answers, guesses, config)?.solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn bank(words: &[&str]) -> WordBank {
        WordBank::from_iterator(words, 5).unwrap()
    }

    #[test]
    fn selector_exhausted() {
        let store = CandidateStore::new(&[], &[]);
        let selector = GuessSelector::new(&SolverConfig::default());

        assert_matches!(
            selector.select(&store, &FeedbackState::new(5)),
            Err(SolverError::ExhaustedCandidates)
        );
    }

    #[test]
    fn selector_single_answer_exploits() -> Result<(), SolverError> {
        let answers = bank(&["CRANE"]);
        let guesses = bank(&["CRANE", "DUMPY"]);
        let store = CandidateStore::new(&answers, &guesses);
        let selector = GuessSelector::new(&SolverConfig::default());

        let (mode, guess) = selector.select(&store, &FeedbackState::new(5))?;

        assert_eq!(mode, GuessMode::ExploitAnswer);
        assert_eq!(guess.as_ref(), "CRANE");
        Ok(())
    }

    #[test]
    fn selector_many_answers_explores() -> Result<(), SolverError> {
        let answers = bank(&["BATCH", "MATCH", "LATCH", "CATCH"]);
        let guesses = bank(&["BATCH", "MATCH", "LATCH", "CATCH", "CLIMB"]);
        let store = CandidateStore::new(&answers, &guesses);
        let selector = GuessSelector::new(&SolverConfig::default().with_thresholds(3, 2));

        let (mode, guess) = selector.select(&store, &FeedbackState::new(5))?;

        assert_eq!(mode, GuessMode::ExploreGuess);
        assert_eq!(guess, store.guesses()[0]);
        Ok(())
    }

    #[test]
    fn selector_moderate_answers_tests_untested_letters() -> Result<(), SolverError> {
        let answers = bank(&["BATCH", "MATCH", "LATCH"]);
        let guesses = bank(&["BATCH", "MATCH", "LATCH", "CLIMB", "BLIMP"]);
        let mut store = CandidateStore::new(&answers, &guesses);
        let mut feedback = FeedbackState::new(5);
        feedback.begin_guess("WATCH")?;
        feedback.miss('W')?;
        for (location, letter) in "ATCH".char_indices() {
            feedback.hit(letter, location + 1)?;
        }
        store.register_guess("WATCH");
        store.prune_answers(&feedback);
        store.prune_guesses(&feedback);
        let selector = GuessSelector::new(&SolverConfig::default());

        let (mode, guess) = selector.select(&store, &feedback)?;

        // Only BLIMP avoids every used letter, and it tests B, L, and M at once.
        assert_eq!(mode, GuessMode::ExploreIntersecting);
        assert_eq!(guess.as_ref(), "BLIMP");
        Ok(())
    }

    fn watch_feedback() -> Result<FeedbackState, SolverError> {
        let mut feedback = FeedbackState::new(5);
        feedback.begin_guess("WATCH")?;
        feedback.miss('W')?;
        for (location, letter) in "ATCH".char_indices() {
            feedback.hit(letter, location + 1)?;
        }
        Ok(feedback)
    }

    #[test]
    fn selector_intersecting_ties_go_to_better_rank() -> Result<(), SolverError> {
        let answers = bank(&["BATCH", "MATCH", "LATCH"]);
        let feedback = watch_feedback()?;
        let selector = GuessSelector::new(&SolverConfig::default());

        // LIMBO and BLIMP both test B, L, and M, and score the same, so they keep their order.
        for (guesses, expected) in [
            (bank(&["LIMBO", "BLIMP", "CLIMB"]), "LIMBO"),
            (bank(&["BLIMP", "LIMBO", "CLIMB"]), "BLIMP"),
        ] {
            let mut store = CandidateStore::new(&answers, &guesses);
            store.prune_answers(&feedback);
            store.prune_guesses(&feedback);

            let (mode, guess) = selector.select(&store, &feedback)?;

            assert_eq!(mode, GuessMode::ExploreIntersecting);
            assert_eq!(guess.as_ref(), expected);
        }
        Ok(())
    }

    #[test]
    fn selector_no_guesses_left_skips_exploring() -> Result<(), SolverError> {
        let answers = bank(&["BATCH", "MATCH", "LATCH"]);
        let store = CandidateStore::new(&answers, &[]);
        let selector = GuessSelector::new(&SolverConfig::default().with_thresholds(1, 2));

        let (mode, guess) = selector.select(&store, &FeedbackState::new(5))?;

        assert_eq!(mode, GuessMode::ExploitAnswer);
        assert_eq!(guess, store.answers()[0]);
        Ok(())
    }

    #[test]
    fn selector_falls_back_to_answer() -> Result<(), SolverError> {
        let answers = bank(&["BATCH", "MATCH", "LATCH"]);
        let store = CandidateStore::new(&answers, &answers);
        let mut feedback = FeedbackState::new(5);
        feedback.begin_guess("WATCH")?;
        let selector = GuessSelector::new(&SolverConfig::default());

        // Every guess tests only one of B, M, and L.
        let (mode, guess) = selector.select(&store, &feedback)?;

        assert_eq!(mode, GuessMode::ExploitAnswer);
        assert_eq!(guess, store.answers()[0]);
        Ok(())
    }

    #[test]
    fn puzzle_rejects_mismatched_word_length() {
        let answers = bank(&["ROBOT"]);

        assert_matches!(
            Puzzle::from_answers(&answers, SolverConfig::default().with_word_length(4)),
            Err(SolverError::WordLength(4))
        );
    }

    #[test]
    fn puzzle_rejects_invalid_opening_word() {
        let answers = bank(&["ROBOT"]);

        assert_matches!(
            Puzzle::from_answers(&answers, SolverConfig::default().with_opening_word("ROBOTS")),
            Err(SolverError::InvalidWord(_))
        );
    }

    #[test]
    fn puzzle_uses_opening_word_first() -> Result<(), SolverError> {
        let answers = bank(&["ROBOT", "CRANE", "PLANT"]);
        let mut puzzle =
            Puzzle::from_answers(&answers, SolverConfig::default().with_opening_word("slate"))?;

        assert_eq!(puzzle.next_guess()?.as_ref(), "SLATE");
        puzzle.register_guess("SLATE")?;
        assert_ne!(puzzle.next_guess()?.as_ref(), "SLATE");
        Ok(())
    }

    #[test]
    fn puzzle_register_guess_is_idempotent() -> Result<(), SolverError> {
        let answers = bank(&["ROBOT", "CRANE", "PLANT"]);
        let mut puzzle = Puzzle::from_answers(&answers, SolverConfig::default())?;

        puzzle.register_guess("crane")?;
        puzzle.register_guess("CRANE")?;

        assert_eq!(puzzle.guesses().len(), 1);
        assert_eq!(puzzle.answers().len(), 2);
        assert_eq!(puzzle.guess_candidates().len(), 2);
        Ok(())
    }

    #[test]
    fn puzzle_update_solves_on_all_green() -> Result<(), SolverError> {
        let answers = bank(&["ROBOT", "CRANE", "PLANT"]);
        let mut puzzle = Puzzle::from_answers(&answers, SolverConfig::default())?;

        puzzle.update(&GuessResult {
            guess: "PLANT",
            results: vec![LetterStatus::Green; 5],
        })?;

        assert!(puzzle.is_solved());
        assert_eq!(puzzle.solution().word(), Some("PLANT"));
        Ok(())
    }

    #[test]
    fn solver_without_target_cannot_solve() -> Result<(), SolverError> {
        let answers = bank(&["ROBOT"]);
        let mut solver = Solver::new(&answers, &answers, SolverConfig::default())?;

        assert_matches!(solver.solve(), Err(SolverError::NoSecret));
        Ok(())
    }
}
