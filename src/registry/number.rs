use super::{MatchOutcome, ParserData, ParserInfo};
use crate::error::Unmatched;
use serde_json::{Number, Value};

fn match_fn(
    input: &[u8],
    offs: usize,
    _data: &ParserData,
    want_value: bool,
) -> Result<MatchOutcome, Unmatched> {
    let digits = input[offs..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return Err(Unmatched);
    }
    let text = std::str::from_utf8(&input[offs..offs + digits]).expect("ascii digits");
    // A digit run longer than u64::MAX's 20 digits overflows; such input
    // simply doesn't match this parser rather than panicking on it.
    let n: u64 = text.parse().map_err(|_| Unmatched)?;
    let value = want_value.then(|| Value::Number(Number::from(n)));
    Ok(MatchOutcome::new(digits, value))
}

pub(super) const INFO: ParserInfo = ParserInfo {
    name: "number",
    construct: None,
    match_fn,
    destruct: None,
};
