//! Parser for the tracker's plain-text notification template.
//!
//! The template is positional: after the header line is dropped, the fourth
//! line is always the issue URL. Anything that does not fit that shape is
//! rejected with a [`ParseError`] instead of yielding a wrong issue id.

use thiserror::Error;

use crate::notification::ParsedNotification;

/// Separator between template sections (20 dashes).
pub const SECTION_SEPARATOR: &str = "--------------------";

/// Position of the issue URL line once the leading and trailing lines are gone.
const ISSUE_URL_LINE: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("section separator not found")]
    MissingSeparator,

    #[error("expected at least {} lines, found {found}", ISSUE_URL_LINE + 1)]
    TooFewLines { found: usize },

    #[error("issue line has no path: {line:?}")]
    MissingIssuePath { line: String },

    #[error("issue line is not an issue URL: {line:?}")]
    InvalidIssueUrl { line: String },
}

/// Extracts the issue id and display text from a decoded notification body.
pub fn parse(text: &str) -> Result<ParsedNotification, ParseError> {
    let mut sections: Vec<&str> = text.split(SECTION_SEPARATOR).collect();
    if sections.len() < 2 {
        return Err(ParseError::MissingSeparator);
    }
    // "Why you received this" footer
    sections.pop();

    let mut lines: Vec<String> = sections
        .iter()
        .map(|section| section.replace("<p>", "").replace("</p>", ""))
        .flat_map(|section| {
            section
                .split('\n')
                .map(|line| line.trim().to_string())
                .collect::<Vec<_>>()
        })
        .collect();

    let found = lines.len().saturating_sub(2);
    if found <= ISSUE_URL_LINE {
        return Err(ParseError::TooFewLines { found });
    }
    lines.pop();
    lines.remove(0);

    let url_line = lines.remove(ISSUE_URL_LINE);
    let issue_id = issue_id_from_url(&url_line)?;

    Ok(ParsedNotification {
        issue_id,
        formatted_message: lines.join("\n"),
    })
}

fn issue_id_from_url(line: &str) -> Result<String, ParseError> {
    let Some((_, last)) = line.rsplit_once('/') else {
        return Err(ParseError::MissingIssuePath {
            line: line.to_string(),
        });
    };

    let has_scheme = line.starts_with("https://") || line.starts_with("http://");
    if !has_scheme || last.is_empty() || line.chars().any(char::is_whitespace) {
        return Err(ParseError::InvalidIssueUrl {
            line: line.to_string(),
        });
    }

    Ok(last.to_string())
}
