use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// A digit directly followed by a space, e.g. the "2 " in "(2 Leader Name)"
static POSITION_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9] ").expect("position token pattern is valid"));

/// Tempo text that does not carry a leader segment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaderParseError {
    #[error("Unparsable tempo text: {0}")]
    Unparsable(String),
}

/// Extract the pace leader's name from a race tempo summary
///
/// The leader appears inside the first parenthesized segment, after a
/// numeric-prefixed token: `"1.14,2 (2 Leader Name)"` yields `"Leader Name"`.
/// The name ends at the next digit-space token, if any.
pub fn extract_leader(tempo_text: &str) -> Result<&str, LeaderParseError> {
    let unparsable = || LeaderParseError::Unparsable(tempo_text.to_string());

    let (_, after_open) = tempo_text.split_once('(').ok_or_else(unparsable)?;
    let close = after_open.find(')').ok_or_else(unparsable)?;
    let segment = &after_open[..close];
    let segment = segment.split('(').next().unwrap_or(segment);

    let mut pieces = POSITION_TOKEN.split(segment);
    pieces.next();

    match pieces.next() {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(unparsable()),
    }
}

/// Whether `horse_name` is recorded as leader in `tempo_text`
///
/// Unparsable text never names a leader.
#[inline]
pub fn is_leader(tempo_text: &str, horse_name: &str) -> bool {
    match extract_leader(tempo_text) {
        Ok(leader) => leader == horse_name,
        Err(e) => {
            tracing::trace!("{}", e);
            false
        }
    }
}
