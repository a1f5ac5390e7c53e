use tracing::debug;

use super::{CaptureSpans, Engine, Flags, Matcher};
use crate::errors::Result;

/// Engine backed by the `regex` crate: finite automata only, so matching
/// time is linear in the input length whatever the pattern. No look-around
/// or back-references.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl Engine for Linear {
    const NAME: &'static str = "linear";

    type Regex = regex::Regex;

    fn compile(source: &str, flags: Flags) -> Result<regex::Regex> {
        let regex = regex::Regex::new(&flags.apply(source))?;
        debug!(engine = Self::NAME, source, %flags, "compiled pattern");
        Ok(regex)
    }
}

impl Matcher for regex::Regex {
    fn captures_at(&self, text: &str, start: usize) -> Result<Option<CaptureSpans>> {
        Ok(regex::Regex::captures_at(self, text, start)
            .map(|caps| caps.iter().map(|m| m.map(|m| m.range())).collect()))
    }

    fn is_match(&self, text: &str) -> Result<bool> {
        Ok(regex::Regex::is_match(self, text))
    }
}
