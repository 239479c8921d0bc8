//! XML mapped onto records.
//!
//! Reading follows the usual attribute-prefix convention:
//!
//! - attributes become `@_name` keys,
//! - element text next to attributes or children becomes `#text`,
//! - repeated sibling elements become an array,
//! - an element with text only becomes that text, typed like a CSV field,
//! - an empty element becomes `""`.
//!
//! The XML declaration, comments, processing instructions and the doctype are
//! skipped. Writing reverses the mapping with 2-space indentation and wraps a
//! non-object value in a `<root>` element.

use std::borrow::Cow;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::{Document, Error, Map, Result, Value};

const FORMAT: &str = "XML";
const ATTR_PREFIX: &str = "@_";
const TEXT_KEY: &str = "#text";

#[derive(Default)]
struct Element {
    name: String,
    fields: Map,
    text: String,
}

impl Element {
    fn into_value(self) -> Value {
        let text = self.text.trim();
        if self.fields.is_empty() {
            return if text.is_empty() {
                Value::String(String::new())
            } else {
                Value::infer(text)
            };
        }
        let mut fields = self.fields;
        if !text.is_empty() {
            fields.insert(TEXT_KEY.to_string(), Value::infer(text));
        }
        Value::Object(fields)
    }

    fn add_child(&mut self, name: String, value: Value) {
        match self.fields.get_mut(&name) {
            // Element values are never arrays, so an array here is a run of siblings.
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::take(existing);
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.fields.insert(name, value);
            }
        }
    }
}

pub(super) fn parse(text: &str) -> Result<Document> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut root = Element::default();
    let mut stack: Vec<Element> = Vec::new();
    let mut seen_element = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| syntax_error(text, reader.error_position(), e))?;
        match event {
            Event::Start(start) => {
                let element = open_element(&start)
                    .map_err(|e| syntax_error(text, reader.buffer_position(), e))?;
                seen_element = true;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = open_element(&start)
                    .map_err(|e| syntax_error(text, reader.buffer_position(), e))?;
                seen_element = true;
                let parent = stack.last_mut().unwrap_or(&mut root);
                parent.add_child(element.name.clone(), element.into_value());
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    let parent = stack.last_mut().unwrap_or(&mut root);
                    let name = element.name.clone();
                    parent.add_child(name, element.into_value());
                }
            }
            Event::Text(content) => {
                let unescaped = content
                    .unescape()
                    .map_err(|e| syntax_error(text, reader.buffer_position(), e))?;
                match stack.last_mut() {
                    Some(element) => element.text.push_str(&unescaped),
                    None if unescaped.trim().is_empty() => {}
                    None => {
                        return Err(syntax_error(
                            text,
                            reader.buffer_position(),
                            "text outside of any element",
                        ))
                    }
                }
            }
            Event::CData(content) => {
                let decoded = content
                    .decode()
                    .map_err(|e| syntax_error(text, reader.buffer_position(), e))?;
                match stack.last_mut() {
                    Some(element) => element.text.push_str(&decoded),
                    None => {
                        return Err(syntax_error(
                            text,
                            reader.buffer_position(),
                            "CDATA outside of any element",
                        ))
                    }
                }
            }
            Event::Eof => break,
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        let (line, col) = line_col(text, text.len());
        return Err(Error::syntax(
            FORMAT,
            line,
            col,
            format!("unclosed element <{}>", open.name),
        ));
    }
    if !seen_element {
        let (line, col) = line_col(text, text.len());
        return Err(Error::syntax(FORMAT, line, col, "no root element"));
    }

    Ok(Document::Record(root.fields))
}

fn open_element(start: &BytesStart<'_>) -> std::result::Result<Element, quick_xml::Error> {
    let mut element = Element {
        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        ..Default::default()
    };
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref());
        let value = attr.unescape_value()?;
        element
            .fields
            .insert(format!("{}{}", ATTR_PREFIX, key), Value::infer(&value));
    }
    Ok(element)
}

fn syntax_error<E: std::fmt::Display>(text: &str, offset: u64, err: E) -> Error {
    let offset = usize::try_from(offset).unwrap_or(text.len());
    let (line, col) = line_col(text, offset);
    Error::syntax(FORMAT, line, col, err)
}

/// 1-based line and column of a byte offset.
fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let mut end = offset.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let before = &text[..end];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}

pub(super) fn serialize(value: &Value) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    match value {
        Value::Object(map) => {
            for (name, child) in map {
                write_element(&mut writer, name, child)?;
            }
        }
        other => write_element(&mut writer, "root", other)?,
    }

    String::from_utf8(writer.into_inner()).map_err(|e| Error::serialize(FORMAT, e))
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<()> {
    if let Value::Array(items) = value {
        for item in items {
            write_element(writer, name, item)?;
        }
        return Ok(());
    }

    if !is_valid_name(name) {
        return Err(Error::serialize(
            FORMAT,
            format!("invalid element name '{}'", name),
        ));
    }

    let mut start = BytesStart::new(name);
    let mut text: Option<Cow<'_, str>> = None;
    let mut children: Vec<(&str, &Value)> = Vec::new();

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if let Some(attr) = key.strip_prefix(ATTR_PREFIX) {
                    start.push_attribute((attr, child.to_plain_text().as_str()));
                } else if key == TEXT_KEY {
                    text = Some(Cow::Owned(child.to_plain_text()));
                } else {
                    children.push((key.as_str(), child));
                }
            }
        }
        Value::String(s) => text = Some(Cow::Borrowed(s)),
        Value::Null => {}
        scalar => text = Some(Cow::Owned(scalar.to_plain_text())),
    }

    let text = text.filter(|t| !t.is_empty());
    if text.is_none() && children.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    if let Some(text) = text {
        emit(writer, Event::Text(BytesText::new(&text)))?;
    }
    for (key, child) in children {
        write_element(writer, key, child)?;
    }
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::serialize(FORMAT, e))
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}
