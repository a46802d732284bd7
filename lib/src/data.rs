use crate::results::SolverError;
use log::debug;
use std::collections::HashMap;
use std::collections::HashSet;
use std::io::BufRead;
use std::ops::Deref;
use std::sync::Arc;

/// A letter along with its location in the word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocatedLetter {
    pub letter: char,
    /// The zero-based location (i.e. index) for this letter in a word.
    pub location: usize,
}

impl LocatedLetter {
    pub fn new(letter: char, location: usize) -> LocatedLetter {
        LocatedLetter { letter, location }
    }
}

/// Converts the given word to the canonical form used throughout this crate: trimmed and upper
/// case. Fails if the word has the wrong length or contains anything but ASCII letters.
pub(crate) fn normalize_word(word: &str, word_length: usize) -> Result<Arc<str>, SolverError> {
    let word = word.trim();
    if word.len() != word_length || !word.chars().all(|letter| letter.is_ascii_alphabetic()) {
        return Err(SolverError::InvalidWord(word.to_string()));
    }
    Ok(Arc::from(word.to_ascii_uppercase().as_str()))
}

/// Converts the given letter to upper case, failing if it is not an ASCII letter.
pub(crate) fn normalize_letter(letter: char) -> Result<char, SolverError> {
    if !letter.is_ascii_alphabetic() {
        return Err(SolverError::MalformedFeedback(format!(
            "'{}' is not a letter",
            letter
        )));
    }
    Ok(letter.to_ascii_uppercase())
}

/// Contains an ordered list of words for a puzzle, either the possible answers or the allowed
/// guesses.
///
/// ```
/// use wordle_pruning_solver::WordBank;
///
/// let bank = WordBank::from_iterator(&["crane", " Slate", "", "robots", "can't"], 5).unwrap();
///
/// assert_eq!(bank.len(), 2);
/// assert_eq!(bank[1].as_ref(), "SLATE");
/// assert_eq!(bank.word_length(), 5);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordBank {
    all_words: Vec<Arc<str>>,
    word_length: usize,
}

impl WordBank {
    /// Constructs a new `WordBank` by reading words from the given reader.
    ///
    /// The reader should provide one word per line, as in a dictionary file. See
    /// [`from_iterator`](Self::from_iterator) for which lines are kept.
    pub fn from_reader<R: BufRead>(
        word_reader: R,
        word_length: usize,
    ) -> Result<Self, SolverError> {
        let words = word_reader
            .lines()
            .collect::<std::io::Result<Vec<String>>>()?;
        WordBank::from_iterator(words, word_length)
    }

    /// Constructs a new `WordBank` from the given words.
    ///
    /// Surrounding whitespace is trimmed and each word is converted to upper case. Blank entries,
    /// words of any other length, and words with anything but ASCII letters are skipped, and
    /// duplicates are dropped.
    ///
    /// Fails with [`SolverError::WordLength`] if words were given but none of them were usable.
    pub fn from_iterator<S>(
        words: impl IntoIterator<Item = S>,
        word_length: usize,
    ) -> Result<Self, SolverError>
    where
        S: AsRef<str>,
    {
        let mut seen: HashSet<Arc<str>> = HashSet::new();
        let mut all_words: Vec<Arc<str>> = Vec::new();
        let mut num_skipped = 0;
        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            let word = match normalize_word(word, word_length) {
                Ok(word) => word,
                Err(_) => {
                    num_skipped += 1;
                    continue;
                }
            };
            if seen.insert(Arc::clone(&word)) {
                all_words.push(word);
            }
        }
        if num_skipped > 0 {
            debug!(
                "skipped {} words that are not {} ASCII letters long",
                num_skipped, word_length
            );
            if all_words.is_empty() {
                return Err(SolverError::WordLength(word_length));
            }
        }
        Ok(WordBank {
            all_words,
            word_length,
        })
    }

    /// Returns the number of words.
    pub fn len(&self) -> usize {
        self.all_words.len()
    }

    /// Returns true iff the bank has no words.
    pub fn is_empty(&self) -> bool {
        self.all_words.is_empty()
    }

    /// Returns the length of every word in the bank.
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    /// Returns true iff the given word is in the bank. The word is compared case-insensitively.
    pub fn contains(&self, word: &str) -> bool {
        let word = word.trim();
        self.all_words
            .iter()
            .any(|other| other.eq_ignore_ascii_case(word))
    }
}

impl Deref for WordBank {
    type Target = [Arc<str>];

    fn deref(&self) -> &Self::Target {
        &self.all_words
    }
}

/// Counts how often each letter occurs in a list of words, both overall and at each location.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LetterFrequencyTable {
    count_by_ll: HashMap<LocatedLetter, u32>,
    count_by_letter: HashMap<char, u32>,
}

impl LetterFrequencyTable {
    /// Creates a new table based on the given word list.
    pub fn new<S>(words: &[S]) -> LetterFrequencyTable
    where
        S: AsRef<str>,
    {
        let mut count_by_ll: HashMap<LocatedLetter, u32> = HashMap::new();
        let mut count_by_letter: HashMap<char, u32> = HashMap::new();
        for word in words {
            for (index, letter) in word.as_ref().char_indices() {
                *count_by_ll
                    .entry(LocatedLetter::new(letter, index))
                    .or_insert(0) += 1;
                *count_by_letter.entry(letter).or_insert(0) += 1;
            }
        }
        LetterFrequencyTable {
            count_by_ll,
            count_by_letter,
        }
    }

    /// Retrieves how many times the letter occurs at the given location across all words.
    pub fn count_at(&self, letter: char, location: usize) -> u32 {
        *self
            .count_by_ll
            .get(&LocatedLetter::new(letter, location))
            .unwrap_or(&0)
    }

    /// Retrieves how many times the letter occurs anywhere across all words.
    pub fn total_count(&self, letter: char) -> u32 {
        *self.count_by_letter.get(&letter).unwrap_or(&0)
    }

    /// Returns true iff the table was built from no letters at all.
    pub fn is_empty(&self) -> bool {
        self.count_by_letter.is_empty()
    }
}
