//! Pattern normalization and the matching operations built on top of it.

use std::fmt;
use std::marker::PhantomData;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::engine::{CaptureSpans, Engine, Flags, Matcher};
use crate::errors::{EvalError, Result};

/// The JSON form of an already constructed pattern.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternObject {
    pub source: String,
    #[serde(default)]
    pub flags: Option<String>,
}

/// A value accepted wherever a pattern is expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternCandidate<'v> {
    /// `"a.*?c"`
    Source(&'v str),
    /// `["a.*?c", "g"]`, `["a.*?c", null]` or `["a.*?c"]`
    Pair {
        source: &'v str,
        flags: Option<&'v str>,
    },
    /// `{"source": "a.*?c", "flags": "g"}`
    Object(PatternObject),
}

impl<'v> PatternCandidate<'v> {
    /// Classify `value` by shape. Never touches an engine.
    pub fn classify(value: &'v Value) -> Result<Self> {
        let invalid = || EvalError::InvalidPatternCandidate(value.clone());
        match value {
            Value::String(source) => Ok(PatternCandidate::Source(source.as_str())),
            Value::Array(items) => match items.as_slice() {
                [Value::String(source)] | [Value::String(source), Value::Null] => {
                    Ok(PatternCandidate::Pair {
                        source: source.as_str(),
                        flags: None,
                    })
                }
                [Value::String(source), Value::String(flags)] => Ok(PatternCandidate::Pair {
                    source: source.as_str(),
                    flags: Some(flags.as_str()),
                }),
                _ => Err(invalid()),
            },
            Value::Object(_) => serde_json::from_value(value.clone())
                .map(PatternCandidate::Object)
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    fn parts(&self) -> (&str, Option<&str>) {
        match self {
            PatternCandidate::Source(source) => (*source, None),
            PatternCandidate::Pair { source, flags } => (*source, *flags),
            PatternCandidate::Object(object) => (object.source.as_str(), object.flags.as_deref()),
        }
    }
}

/// Turn any accepted candidate into a pattern compiled by `E`.
pub fn normalize<E: Engine>(candidate: &Value) -> Result<Pattern<E>> {
    let candidate = PatternCandidate::classify(candidate)?;
    let (source, flags) = candidate.parts();
    Pattern::new(source, flags.unwrap_or_default())
}

/// A compiled pattern. Holds no match position between calls.
pub struct Pattern<E: Engine> {
    source: String,
    flags: Flags,
    regex: E::Regex,
    engine: PhantomData<E>,
}

impl<E: Engine> fmt::Debug for Pattern<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("engine", &E::NAME)
            .field("source", &self.source)
            .field("flags", &self.flags)
            .finish()
    }
}

impl<E: Engine> Pattern<E> {
    pub fn new(source: &str, flags: &str) -> Result<Self> {
        let flags: Flags = flags.parse()?;
        Ok(Self {
            source: source.to_string(),
            flags,
            regex: E::compile(source, flags)?,
            engine: PhantomData,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// The pattern object form, accepted back by [`normalize`].
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("source".to_string(), Value::from(self.source.as_str()));
        let flags = self.flags.to_string();
        if !flags.is_empty() {
            object.insert("flags".to_string(), Value::from(flags));
        }
        Value::Object(object)
    }

    /// One match search from `pos`; a sticky pattern must match exactly there.
    fn exec_at(&self, text: &str, pos: usize) -> Result<Option<CaptureSpans>> {
        if pos > text.len() {
            return Ok(None);
        }
        let found = self.regex.captures_at(text, pos)?;
        Ok(found.filter(|spans| !self.flags.sticky || whole(spans).start == pos))
    }

    /// Every match from the start of `text`, honoring the global flag.
    fn exec_all(&self, text: &str) -> Result<Vec<CaptureSpans>> {
        let mut found = Vec::new();
        let mut pos = 0;
        while let Some(spans) = self.exec_at(text, pos)? {
            let range = whole(&spans);
            pos = if range.is_empty() {
                next_char(text, range.end)
            } else {
                range.end
            };
            found.push(spans);
            if !self.flags.global {
                break;
            }
        }
        Ok(found)
    }

    /// Global: the full text of every match. Otherwise: the first match
    /// followed by its capture groups. No match gives an empty vector.
    pub fn match_in(&self, text: &str) -> Result<Vec<Value>> {
        let found = self.exec_all(text)?;
        if self.flags.global {
            return Ok(found
                .iter()
                .map(|spans| Value::from(&text[whole(spans)]))
                .collect());
        }
        Ok(found
            .first()
            .map(|spans| groups(text, spans).collect())
            .unwrap_or_default())
    }

    pub fn test(&self, text: &str) -> Result<bool> {
        if self.flags.sticky {
            return Ok(self.exec_at(text, 0)?.is_some());
        }
        self.regex.is_match(text)
    }

    /// Replace the first match (every match when global) with whatever
    /// `replacement` returns for the matched text. `replacement` runs once per
    /// match, left to right; its output is inserted verbatim.
    pub fn replace_with<F>(&self, text: &str, mut replacement: F) -> Result<String>
    where
        F: FnMut(&str) -> Result<String>,
    {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for spans in self.exec_all(text)? {
            let range = whole(&spans);
            out.push_str(&text[last..range.start]);
            out.push_str(&replacement(&text[range.clone()])?);
            last = range.end;
        }
        out.push_str(&text[last..]);
        Ok(out)
    }

    /// Fragments between matches with capture groups interleaved. Global and
    /// sticky flags are ignored. An empty match where the previous fragment
    /// ended does not split.
    pub fn split(&self, text: &str) -> Result<Vec<Value>> {
        if text.is_empty() {
            let matches_empty = self.regex.captures_at(text, 0)?.is_some();
            return Ok(if matches_empty { vec![] } else { vec![Value::from("")] });
        }

        let mut out = Vec::new();
        let (mut p, mut q) = (0, 0);
        while q < text.len() {
            let Some(spans) = self.regex.captures_at(text, q)? else {
                break;
            };
            let range = whole(&spans);
            if range.start >= text.len() {
                break;
            }
            if range.end == p {
                q = next_char(text, range.start);
                continue;
            }
            out.push(Value::from(&text[p..range.start]));
            out.extend(groups(text, &spans).skip(1));
            p = range.end;
            q = p;
        }
        out.push(Value::from(&text[p..]));
        Ok(out)
    }
}

fn whole(spans: &CaptureSpans) -> std::ops::Range<usize> {
    spans
        .first()
        .cloned()
        .flatten()
        .unwrap_or_default()
}

fn groups<'a>(text: &'a str, spans: &'a CaptureSpans) -> impl Iterator<Item = Value> + 'a {
    spans.iter().map(move |span| match span {
        Some(range) => Value::from(&text[range.clone()]),
        None => Value::Null,
    })
}

/// Byte offset one character past `at` (or one past the end).
fn next_char(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map_or(at + 1, |c| at + c.len_utf8())
}
