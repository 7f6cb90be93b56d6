use super::{MatchOutcome, ParserData, ParserInfo};
use crate::error::Unmatched;
use serde_json::Value;

/// Matches a double-quoted string allowing `\"` and `\\` escapes. Consumes
/// the surrounding quotes; the attached value is the unescaped contents.
fn match_fn(
    input: &[u8],
    offs: usize,
    _data: &ParserData,
    want_value: bool,
) -> Result<MatchOutcome, Unmatched> {
    if input.get(offs) != Some(&b'"') {
        return Err(Unmatched);
    }
    let mut i = offs + 1;
    let mut unescaped = Vec::new();
    loop {
        match input.get(i) {
            None => return Err(Unmatched),
            Some(b'"') => {
                i += 1;
                break;
            }
            Some(b'\\') => match input.get(i + 1) {
                Some(&escaped) => {
                    unescaped.push(escaped);
                    i += 2;
                }
                None => return Err(Unmatched),
            },
            Some(&b) => {
                unescaped.push(b);
                i += 1;
            }
        }
    }
    let parsed = i - offs;
    let value = want_value.then(|| Value::String(String::from_utf8_lossy(&unescaped).into_owned()));
    Ok(MatchOutcome::new(parsed, value))
}

pub(super) const INFO: ParserInfo = ParserInfo {
    name: "quoted_string",
    construct: None,
    match_fn,
    destruct: None,
};
