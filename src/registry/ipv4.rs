use super::{MatchOutcome, ParserData, ParserInfo};
use crate::error::Unmatched;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use serde_json::Value;

static PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})").expect("valid ipv4 regex")
});

fn match_fn(
    input: &[u8],
    offs: usize,
    _data: &ParserData,
    want_value: bool,
) -> Result<MatchOutcome, Unmatched> {
    let captures = PATTERN.captures(&input[offs..]).ok_or(Unmatched)?;
    let whole = captures.get(0).expect("group 0 always present");
    if whole.start() != 0 {
        return Err(Unmatched);
    }
    for i in 1..=4 {
        let octet = captures.get(i).expect("four octet groups");
        let text = std::str::from_utf8(octet.as_bytes()).expect("ascii digits");
        let value: u16 = text.parse().map_err(|_| Unmatched)?;
        if value > 255 {
            return Err(Unmatched);
        }
    }
    let parsed = whole.end();
    let value = want_value.then(|| {
        Value::String(String::from_utf8_lossy(&input[offs..offs + parsed]).into_owned())
    });
    Ok(MatchOutcome::new(parsed, value))
}

pub(super) const INFO: ParserInfo = ParserInfo {
    name: "ipv4",
    construct: None,
    match_fn,
    destruct: None,
};
