use super::{MatchOutcome, ParserData, ParserInfo};
use crate::error::{BuildError, Unmatched};
use serde_json::Value;
use std::collections::BTreeSet;

fn construct(
    extra: Option<&[u8]>,
    _params: Option<&Value>,
) -> Result<ParserData, BuildError> {
    let bytes = extra.ok_or_else(|| BuildError::BadParserConfig {
        parser: "stop_field",
        message: "missing stop-byte set".into(),
    })?;
    Ok(ParserData::StopSet(bytes.iter().copied().collect::<BTreeSet<u8>>()))
}

/// Consumes the longest run of bytes up to (but not including) the first
/// stop byte, or to end of input if none occurs. A zero-length match is
/// legal (§4.5.3, "empty parses").
fn match_fn(
    input: &[u8],
    offs: usize,
    data: &ParserData,
    want_value: bool,
) -> Result<MatchOutcome, Unmatched> {
    let stop = match data {
        ParserData::StopSet(set) => set,
        _ => panic!("stop_field row always carries StopSet data"),
    };
    let run = input[offs..]
        .iter()
        .take_while(|b| !stop.contains(b))
        .count();
    let value = want_value.then(|| {
        Value::String(String::from_utf8_lossy(&input[offs..offs + run]).into_owned())
    });
    Ok(MatchOutcome::new(run, value))
}

pub(super) const INFO: ParserInfo = ParserInfo {
    name: "stop_field",
    construct: Some(construct),
    match_fn,
    destruct: None,
};
