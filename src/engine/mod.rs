//! Pluggable matching engines.
//!
//! An [`Engine`] compiles a source string plus [`Flags`] into a regex that
//! implements [`Matcher`]. Everything above this layer (global iteration,
//! substitution, splitting) is written once against `Matcher`, so swapping
//! engines cannot change how results are assembled.

mod backtracking;
mod linear;

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use itertools::Itertools;

use crate::errors::{EvalError, Result};

pub use backtracking::Backtracking;
pub use linear::Linear;

/// Byte ranges of group 0 and every capture group; `None` for groups that
/// did not participate in the match.
pub type CaptureSpans = Vec<Option<Range<usize>>>;

/// The one primitive every engine must provide.
pub trait Matcher {
    /// Leftmost match starting at or after byte offset `start`.
    fn captures_at(&self, text: &str, start: usize) -> Result<Option<CaptureSpans>>;

    fn is_match(&self, text: &str) -> Result<bool> {
        Ok(self.captures_at(text, 0)?.is_some())
    }
}

pub trait Engine: 'static {
    /// Shown in logs.
    const NAME: &'static str;

    type Regex: Matcher;

    fn compile(source: &str, flags: Flags) -> Result<Self::Regex>;
}

/// Regular expression flags in their single-letter form (`"gi"`, `"y"`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
    pub unicode: bool,
    pub sticky: bool,
}

impl Flags {
    /// Prefix `source` with the inline group flags both engines understand.
    pub(crate) fn apply(&self, source: &str) -> String {
        let inline: String = [
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
        ]
        .into_iter()
        .filter_map(|(on, c)| on.then_some(c))
        .collect();

        if inline.is_empty() {
            source.to_string()
        } else {
            format!("(?{inline}){source}")
        }
    }
}

impl FromStr for Flags {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        if s.chars().duplicates().next().is_some() {
            return Err(EvalError::InvalidFlags(s.to_string()));
        }
        let mut flags = Flags::default();
        for c in s.chars() {
            let slot = match c {
                'g' => &mut flags.global,
                'i' => &mut flags.ignore_case,
                'm' => &mut flags.multiline,
                's' => &mut flags.dot_all,
                'u' => &mut flags.unicode,
                'y' => &mut flags.sticky,
                _ => return Err(EvalError::InvalidFlags(s.to_string())),
            };
            *slot = true;
        }
        Ok(flags)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (on, c) in [
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.sticky, 'y'),
        ] {
            if on {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
