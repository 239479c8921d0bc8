use crate::{Document, Error, Result, Value};

use super::strip_position;

const FORMAT: &str = "JSON";

pub(super) fn parse(text: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(text).map_err(to_error)?;
    Ok(Document::classify(value))
}

/// Pretty-printed with 2-space indentation.
pub(super) fn serialize(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::serialize(FORMAT, e))
}

fn to_error(err: serde_json::Error) -> Error {
    let msg = err.to_string();
    if err.line() == 0 {
        return Error::parse(FORMAT, msg);
    }
    Error::syntax(FORMAT, err.line(), err.column(), strip_position(&msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, Shape};

    #[test]
    fn test_parse_keeps_order_and_types() {
        let doc = parse(r#"{"zeta": 1, "alpha": 2.5, "flag": false, "none": null}"#).unwrap();
        assert_eq!(doc.shape(), Shape::Record);
        assert_eq!(
            doc.into_value(),
            value!({"zeta": 1, "alpha": 2.5, "flag": false, "none": null})
        );
    }

    #[test]
    fn test_syntax_error_has_position() {
        let err = parse("{\n  \"a\": 1,\n  \"b\" 2\n}").unwrap_err();
        assert_eq!(err.position().map(|(line, _)| line), Some(3));
        assert!(err.to_string().starts_with("JSON parse error at line 3"));
        assert!(err.to_string().contains("expected `:`"));
    }

    #[test]
    fn test_serialize_pretty() {
        let text = serialize(&value!({"a": [1, 2]})).unwrap();
        assert_eq!(text, "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
    }
}
