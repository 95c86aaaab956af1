//! Analysis modes and their tokenization pipelines.

use std::borrow::Cow;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::stopwords::is_stop_word;

/// A run of digits with an optional fractional part, on word boundaries.
static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+(?:\.\d+)?\b").expect("valid regex"));

/// Chart cap for modes with an open-ended vocabulary.
pub const DEFAULT_TOP_N: usize = 10;

/// Chart cap for letters; the alphabet is small enough to stay legible.
pub const LETTERS_TOP_N: usize = 20;

/// Which unit of text is counted.
///
/// Every mode runs the same pipeline: [`normalize`](Self::normalize) the
/// raw text, [`tokenize`](Self::tokenize) it, then drop tokens that fail
/// [`keep`](Self::keep).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum AnalysisMode {
    /// Whole words, minus stop words and single characters.
    #[default]
    Words,
    /// Integers and decimals, counted verbatim.
    Numbers,
    /// ASCII letters a-z, case-folded.
    Letters,
    /// Every alphanumeric character, case-folded.
    All,
}

impl AnalysisMode {
    /// All modes, in display order.
    pub const ALL: [Self; 4] = [Self::Words, Self::Numbers, Self::Letters, Self::All];

    /// Returns the mode name as used on the command line and in config files.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Words => "words",
            Self::Numbers => "numbers",
            Self::Letters => "letters",
            Self::All => "all",
        }
    }

    /// Plural name of the counted unit ("Words", "Characters").
    pub const fn unit_plural(&self) -> &'static str {
        match self {
            Self::Words => "Words",
            Self::Numbers => "Numbers",
            Self::Letters => "Letters",
            Self::All => "Characters",
        }
    }

    /// Singular name of the counted unit, used as a column heading.
    pub const fn unit_singular(&self) -> &'static str {
        match self {
            Self::Words => "Word",
            Self::Numbers => "Number",
            Self::Letters => "Letter",
            Self::All => "Character",
        }
    }

    /// Adjective for the filtered total ("Meaningful Words", "Counted Letters").
    pub const fn counted_label(&self) -> &'static str {
        match self {
            Self::Words => "Meaningful",
            _ => "Counted",
        }
    }

    /// How many ranked entries a chart shows.
    pub const fn top_n(&self) -> usize {
        match self {
            Self::Letters => LETTERS_TOP_N,
            _ => DEFAULT_TOP_N,
        }
    }

    /// Prepare raw text for tokenization.
    ///
    /// Words lose ASCII punctuation and are lower-cased; letters and
    /// characters are lower-cased; numbers are matched on the raw text.
    pub fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            Self::Words => Cow::Owned(
                text.chars()
                    .filter(|c| !c.is_ascii_punctuation())
                    .collect::<String>()
                    .to_lowercase(),
            ),
            Self::Numbers => Cow::Borrowed(text),
            Self::Letters | Self::All => Cow::Owned(text.to_lowercase()),
        }
    }

    /// Split normalized text into tokens.
    ///
    /// The number of tokens returned here is the unfiltered total.
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        match self {
            Self::Words => text.split_whitespace().collect(),
            Self::Numbers => NUMBER_PATTERN.find_iter(text).map(|m| m.as_str()).collect(),
            Self::Letters => single_chars(text, |c| c.is_ascii_lowercase()),
            Self::All => single_chars(text, char::is_alphanumeric),
        }
    }

    /// Whether a token survives filtering.
    ///
    /// Only words are filtered: stop words and tokens of one character are
    /// dropped.
    pub fn keep(&self, token: &str) -> bool {
        match self {
            Self::Words => token.chars().nth(1).is_some() && !is_stop_word(token),
            Self::Numbers | Self::Letters | Self::All => true,
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode: {0}. Use: words, numbers, letters, all")]
pub struct ParseModeError(String);

impl FromStr for AnalysisMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

/// Slice every character matching `pred` out of `text` as its own token.
fn single_chars(text: &str, pred: impl Fn(char) -> bool) -> Vec<&str> {
    text.char_indices()
        .filter(|&(_, c)| pred(c))
        .map(|(i, c)| &text[i..i + c.len_utf8()])
        .collect()
}
