use tracing::debug;

use super::{CaptureSpans, Engine, Flags, Matcher};
use crate::errors::Result;

/// Engine backed by `fancy-regex`: supports look-around and back-references
/// through backtracking. Patterns without those features are delegated to
/// the `regex` crate internally; the rest can take exponential time, bounded
/// only by the backtrack limit (exceeding it is a runtime error).
#[derive(Debug, Clone, Copy, Default)]
pub struct Backtracking;

impl Engine for Backtracking {
    const NAME: &'static str = "backtracking";

    type Regex = fancy_regex::Regex;

    fn compile(source: &str, flags: Flags) -> Result<fancy_regex::Regex> {
        let regex = fancy_regex::Regex::new(&flags.apply(source))?;
        debug!(engine = Self::NAME, source, %flags, "compiled pattern");
        Ok(regex)
    }
}

impl Matcher for fancy_regex::Regex {
    fn captures_at(&self, text: &str, start: usize) -> Result<Option<CaptureSpans>> {
        let caps = self.captures_from_pos(text, start)?;
        Ok(caps.map(|caps| caps.iter().map(|m| m.map(|m| m.range())).collect()))
    }

    fn is_match(&self, text: &str) -> Result<bool> {
        Ok(fancy_regex::Regex::is_match(self, text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn supports_lookahead_and_backreferences() {
        let re = Backtracking::compile(r"(\w)\1(?=!)", Flags::default()).unwrap();
        let spans = Matcher::captures_at(&re, "aa bb!", 0).unwrap().unwrap();
        assert_eq!(spans, vec![Some(3..5), Some(3..4)]);
    }

    #[test]
    fn search_respects_start_offset() {
        let re = Backtracking::compile("a", Flags::default()).unwrap();
        let spans = Matcher::captures_at(&re, "a_a", 1).unwrap().unwrap();
        assert_eq!(spans[0], Some(2..3));
    }
}
