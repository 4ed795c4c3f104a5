//! Front-matter block extraction
//!
//! A Markdown file opens with a delimiter line (commonly `+++` or `---`). Everything up to
//! the next line identical to it is the metadata block; the Markdown body is never read.

use crate::error::ExtractError;
use std::io::BufRead;

/// Extract the raw front-matter block from a reader
///
/// The first line is the delimiter token. Subsequent non-empty lines are collected, each
/// followed by `\n`, until a line exactly equal to the delimiter is read. Trailing `\r` is
/// stripped before comparison so CRLF files behave like LF files.
///
/// # Errors
///
/// - [`ExtractError::MissingDelimiter`] if the stream is empty or the first line is blank
/// - [`ExtractError::UnterminatedBlock`] if the stream ends before the closing delimiter
/// - [`ExtractError::Io`] if reading fails (including invalid UTF-8)
///
/// # Examples
///
/// ```
/// use tattoo_dl::frontmatter::extract;
///
/// let text = "+++\ntitle = \"Koi\"\n\nimage_ipfs = \"Qm123\"\n+++\n# Body\n";
/// let block = extract(text.as_bytes()).unwrap();
/// assert_eq!(block, "title = \"Koi\"\nimage_ipfs = \"Qm123\"\n");
/// ```
pub fn extract<R: BufRead>(reader: R) -> Result<String, ExtractError> {
    let mut lines = reader.lines();

    let delimiter = match lines.next() {
        Some(line) => trim_line_ending(line?),
        None => return Err(ExtractError::MissingDelimiter),
    };
    if delimiter.trim().is_empty() {
        return Err(ExtractError::MissingDelimiter);
    }

    let mut block = String::new();
    for line in lines {
        let line = trim_line_ending(line?);
        if line == delimiter {
            return Ok(block);
        }
        if !line.is_empty() {
            block.push_str(&line);
            block.push('\n');
        }
    }

    Err(ExtractError::UnterminatedBlock { delimiter })
}

fn trim_line_ending(mut line: String) -> String {
    if line.ends_with('\r') {
        line.pop();
    }
    line
}
