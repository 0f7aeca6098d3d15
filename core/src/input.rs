use std::collections::HashMap;
use anyhow::{anyhow, Result};

/// Free words plus `key:value` metadata, as typed on the command line.
#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub text: String,
    pub metadata: HashMap<String, String>,
}

/// A `key:value` token. Only alphabetic keys with a non-empty value count,
/// so `Note:`, times like `09:30` and URLs stay in the text.
fn split_metadata(arg: &str) -> Option<(String, &str)> {
    let (key, value) = arg.split_once(':')?;
    let is_key = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphabetic());
    if !is_key || value.is_empty() || value.starts_with("//") {
        return None;
    }
    Some((key.to_lowercase(), value))
}

/// Splits `key:value` tokens from free text.
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut text_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        match split_metadata(arg) {
            Some((key, value)) => {
                metadata.insert(key, value.to_string());
            }
            None => text_parts.push(arg.as_str()),
        }
    }

    ParsedInput {
        text: text_parts.join(" "),
        metadata,
    }
}

/// Resolves an abbreviated key against `candidates` by unique prefix.
pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches = prefix_matches(key, candidates);
    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

fn prefix_matches<'a>(key: &str, candidates: &[&'a str]) -> Vec<&'a str> {
    candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect()
}

/// Parses and expands in one go. Tokens whose key matches no candidate
/// stay in the text; ambiguous keys are errors.
pub fn parse_with_keys(args: &[String], candidates: &[&str]) -> Result<ParsedInput> {
    let mut text_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        match split_metadata(arg) {
            Some((key, value)) if !prefix_matches(&key, candidates).is_empty() => {
                metadata.insert(expand_key(&key, candidates)?, value.to_string());
            }
            _ => text_parts.push(arg.as_str()),
        }
    }

    Ok(ParsedInput {
        text: text_parts.join(" "),
        metadata,
    })
}
