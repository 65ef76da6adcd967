//! Response parser — pulls a JSON array of tweets out of a raw completion.
//!
//! Two ordered attempts, first array wins:
//! 1. the whole completion parsed as JSON;
//! 2. the greedy span from the first `[` to the last `]`, parsed as JSON.
//!
//! The greedy span is deliberate: with several arrays in the text the match
//! covers all of them (and usually fails to parse) rather than picking one.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Could not parse tweets from LLM response")]
    NoArray,

    #[error("LLM response array contains a non-string element at index {index}")]
    NonStringElement { index: usize },
}

/// Extracts the tweet list from a raw model completion.
pub fn parse_tweets(raw: &str) -> Result<Vec<String>, ParseError> {
    let items = parse_whole(raw)
        .or_else(|| parse_bracket_span(raw))
        .ok_or(ParseError::NoArray)?;

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(s) => Ok(s),
            _ => Err(ParseError::NonStringElement { index }),
        })
        .collect()
}

fn parse_whole(raw: &str) -> Option<Vec<Value>> {
    as_array(serde_json::from_str(raw).ok()?)
}

fn parse_bracket_span(raw: &str) -> Option<Vec<Value>> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end < start {
        return None;
    }
    as_array(serde_json::from_str(&raw[start..=end]).ok()?)
}

fn as_array(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        _ => None,
    }
}
