//! Solves Wordle-style puzzles by pruning candidate words with letter feedback.
//!
//! Each guess is chosen greedily from letter frequencies: while many answers remain, the solver
//! guesses words that test common, untested letters, and once few remain it guesses the
//! best-ranked possible answer.

mod candidates;
mod data;
mod engine;
mod restrictions;
mod results;
pub mod scorers;

pub use data::WordBank;
pub use engine::*;
pub use results::*;

/// Building blocks of the solver, for callers who want to drive the pieces themselves.
pub mod details {
    pub use crate::candidates::CandidateStore;
    pub use crate::data::LetterFrequencyTable;
    pub use crate::data::LocatedLetter;
    pub use crate::restrictions::FeedbackState;
}
