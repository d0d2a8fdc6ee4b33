//! Token scanner for finished input lines.

use crate::config::MAX_PARAMETER_LENGTH;

/// A single extracted token. Empty means "no token at that index".
pub type Token = heapless::String<MAX_PARAMETER_LENGTH>;

/// Extract the `index`-th delimiter-separated token from `line`.
///
/// Tokens are maximal runs of non-delimiter bytes; consecutive delimiters
/// collapse, so `a,b,,c` holds exactly three tokens. An index past the
/// last token, or an empty line, yields an empty token. Tokens longer
/// than `MAX_PARAMETER_LENGTH - 1` are truncated.
pub fn get_token(line: &[u8], delimiter: u8, index: usize) -> Token {
    let mut token = Token::new();

    let run = line
        .split(|&b| b == delimiter)
        .filter(|run| !run.is_empty())
        .nth(index);

    if let Some(run) = run {
        for &b in run.iter().take(MAX_PARAMETER_LENGTH - 1) {
            if token.push(b as char).is_err() {
                break;
            }
        }
    }

    token
}
