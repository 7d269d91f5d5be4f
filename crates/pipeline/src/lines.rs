//! Line schema of the scorer's text output.
//!
//! The scorer prints one block per recommendation:
//!
//! ```text
//! 1. Intro to Go (ID: 42, Score: 0.91
//!    Reason: matches your interests
//!    Description: A gentle start
//! ```
//!
//! Every line falls into exactly one [`LineKind`]. Classification is
//! stateless. Assembling records is the decoder's job.

use catalog::CourseId;
use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that starts like a numbered item: `<int>. `
static HEADER_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s").expect("header start pattern is valid"));

/// Full header: `<rank>. <title> (ID: <int>, Score: <float>`
static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\.\s(.+)\s\(ID:\s(\d+),\sScore:\s(\d*\.?\d+)")
        .expect("header pattern is valid")
});

static REASON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+Reason:\s?(.*)$").expect("reason pattern is valid"));

static DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s+Description:\s?(.*)$").expect("description pattern is valid")
});

/// Fields extracted from a well-formed header line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderFields<'a> {
    pub course_id: CourseId,
    pub title: &'a str,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineKind<'a> {
    /// A numbered item. `None` when the ID/Score part is missing or unparsable.
    Header(Option<HeaderFields<'a>>),
    /// Indented `Reason:` line, with the label and one separating space removed
    Reason(&'a str),
    /// Indented `Description:` line, with the label and one separating space removed
    Description(&'a str),
    Other,
}

/// Classify a single line (without its terminator).
pub fn classify(line: &str) -> LineKind<'_> {
    if HEADER_START.is_match(line) {
        return LineKind::Header(parse_header(line));
    }
    if let Some(caps) = REASON.captures(line) {
        return LineKind::Reason(caps.get(1).map_or("", |m| m.as_str()));
    }
    if let Some(caps) = DESCRIPTION.captures(line) {
        return LineKind::Description(caps.get(1).map_or("", |m| m.as_str()));
    }
    LineKind::Other
}

fn parse_header(line: &str) -> Option<HeaderFields<'_>> {
    let caps = HEADER.captures(line)?;
    let title = caps.get(1)?.as_str();
    let course_id: CourseId = caps.get(2)?.as_str().parse().ok()?;
    let score: f64 = caps.get(3)?.as_str().parse().ok()?;

    if course_id == 0 {
        return None;
    }

    Some(HeaderFields {
        course_id,
        title,
        score,
    })
}

/// Split scorer output into lines, tolerating CRLF terminators.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
}
