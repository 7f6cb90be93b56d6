use super::{MatchOutcome, ParserData, ParserInfo};
use crate::error::{BuildError, Unmatched};
use serde_json::Value;

fn construct(
    extra: Option<&[u8]>,
    _params: Option<&Value>,
) -> Result<ParserData, BuildError> {
    let bytes = extra.ok_or_else(|| BuildError::BadParserConfig {
        parser: "literal",
        message: "missing literal bytes".into(),
    })?;
    Ok(ParserData::Literal(bytes.to_vec()))
}

fn match_fn(
    input: &[u8],
    offs: usize,
    data: &ParserData,
    want_value: bool,
) -> Result<MatchOutcome, Unmatched> {
    let bytes = data.as_literal().expect("literal row always carries Literal data");
    if input[offs..].starts_with(bytes) {
        let value = want_value.then(|| {
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        });
        Ok(MatchOutcome::new(bytes.len(), value))
    } else {
        Err(Unmatched)
    }
}

pub(super) const INFO: ParserInfo = ParserInfo {
    name: "literal",
    construct: Some(construct),
    match_fn,
    destruct: None,
};
