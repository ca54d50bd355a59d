//! CFI Parser
//!
//! Parses EPUB CFI strings into structured Cfi objects.
//!
//! Grammar:
//! ```text
//! cfi       = "epubcfi(" segment "!" segment ["," segment "," segment] ")"
//! segment   = "/" step ("/" step)* [":" terminal]
//! step      = integer ["[" id "]"]
//! terminal  = integer ["[" assertion "]"]
//! ```
//!
//! The `epubcfi(...)` wrapper is optional. Parsing is lenient below the base
//! component: a step token that is not an integer becomes an empty slot and
//! an unreadable offset becomes `None`.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::*;
use super::CfiError;

const PREFIX: &str = "epubcfi(";
const SUFFIX: &str = ")";

static BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*)\]").expect("valid regex"));

/// Check whether a string carries the `epubcfi(...)` wrapper
pub fn is_cfi_string(input: &str) -> bool {
    input.starts_with(PREFIX) && input.ends_with(SUFFIX)
}

/// Parse a CFI string into a Cfi struct
pub fn parse(input: &str) -> Result<Cfi, CfiError> {
    let inner = unwrap(input);

    let (base_str, rest) = match inner.split_once('!') {
        Some((base, rest)) => (base, Some(rest)),
        None => (inner, None),
    };

    if base_str.is_empty() {
        tracing::debug!(input, "Rejected CFI with empty base component");
        return Err(CfiError::Malformed(format!("empty base component in {input:?}")));
    }

    let base = parse_segment(base_str);
    if !base.is_well_formed() {
        tracing::debug!(input, "Rejected CFI with unreadable base step");
        return Err(CfiError::Malformed(format!("unreadable base step in {input:?}")));
    }

    let path = rest
        .map(|rest| parse_segment(rest.split(',').next().unwrap_or_default()))
        .unwrap_or_default();

    let mut cfi = Cfi::new(base, path);

    // Range detection looks at the whole string: exactly three comma-separated parts.
    let parts: Vec<&str> = inner.split(',').collect();
    if let [_, start, end] = parts.as_slice() {
        cfi.range = Some(CfiRange {
            start: parse_segment(start),
            end: parse_segment(end),
        });
    }

    Ok(cfi)
}

/// Parse a CFI string, returning None on failure
pub fn try_parse(input: &str) -> Option<Cfi> {
    parse(input).ok()
}

/// Strip the `epubcfi(` prefix and `)` suffix when both are present
fn unwrap(input: &str) -> &str {
    if is_cfi_string(input) {
        &input[PREFIX.len()..input.len() - SUFFIX.len()]
    } else {
        input
    }
}

/// Parse a single component: `/4/2[para05]/1:3[text]`
pub(crate) fn parse_segment(component: &str) -> Segment {
    let (steps_str, terminal) = match component.split_once(':') {
        Some((steps, terminal)) => (steps, parse_terminal(terminal)),
        None => (component, Terminal::default()),
    };

    let steps_str = steps_str.strip_prefix('/').unwrap_or(steps_str);
    let steps = if steps_str.is_empty() {
        Vec::new()
    } else {
        steps_str.split('/').map(parse_step).collect()
    };

    Segment { steps, terminal }
}

/// Parse one step token such as `6`, `4[chap01ref]`, `1`
pub(crate) fn parse_step(token: &str) -> Option<Step> {
    let raw = leading_integer(token)?;
    let mut step = Step::from_raw(raw)?;
    step.id = bracketed(token);
    Some(step)
}

/// Parse a terminal such as `3` or `3[some text]`
pub(crate) fn parse_terminal(token: &str) -> Terminal {
    let assertion = bracketed(token);
    let number = match assertion {
        Some(_) => token.split('[').next().unwrap_or_default(),
        None => token,
    };

    Terminal {
        offset: leading_integer(number),
        assertion,
    }
}

/// Content of the outermost bracket pair, if non-empty
fn bracketed(token: &str) -> Option<String> {
    BRACKETS
        .captures(token)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Read the leading run of ASCII digits, ignoring anything after it
fn leading_integer<T: FromStr>(token: &str) -> Option<T> {
    let end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    token[..end].parse().ok()
}
