use crate::{Document, Error, Result, Value};

use super::strip_position;

const FORMAT: &str = "YAML";

pub(super) fn parse(text: &str) -> Result<Document> {
    let value: Value = serde_yaml::from_str(text).map_err(|err| {
        let msg = err.to_string();
        match err.location() {
            Some(loc) => Error::syntax(FORMAT, loc.line(), loc.column(), strip_position(&msg)),
            None => Error::parse(FORMAT, msg),
        }
    })?;
    Ok(Document::classify(value))
}

pub(super) fn serialize(value: &Value) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| Error::serialize(FORMAT, e))
}
