//! Protocol Buffers text format over the JSON value model of a record.
//!
//! Repeated fields are written with list syntax (`values: [1, 2]`, `ports: [{ ... }]`) so a
//! one-element list reads back as a list. On input, repeated keys are merged into a list and
//! a single occurrence of a known repeated field is read as a one-element list. Both `{}`
//! and `<>` message delimiters are accepted. Enum fields are written as bare
//! identifiers; bare identifiers other than `true`/`false` read back as strings.

use crate::msg::{ENUM_FIELDS, REPEATED_FIELDS};
use pest::Parser;
use pest_derive::Parser as PestParser;
use serde_json::{Map, Number, Value};

#[derive(PestParser)]
#[grammar = "pbtext.pest"]
struct TextParser;

#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("{0}")]
    Syntax(String),
    #[error("invalid number {0}")]
    Number(String),
    #[error("top level must be a message")]
    NotAMessage,
}

/// Parse text format into a JSON object.
pub fn from_str(source: &str) -> Result<Value, TextError> {
    let mut pairs = TextParser::parse(Rule::document, source)
        .map_err(|e| TextError::Syntax(e.to_string()))?;
    let doc = pairs
        .next()
        .ok_or_else(|| TextError::Syntax("empty parse".to_string()))?;
    build_fields(doc.into_inner())
}

fn build_fields(pairs: pest::iterators::Pairs<Rule>) -> Result<Value, TextError> {
    let mut map = Map::new();
    for pair in pairs {
        if pair.as_rule() != Rule::field {
            continue;
        }
        let mut inner = pair.into_inner();
        let key = inner
            .next()
            .ok_or_else(|| TextError::Syntax("field: missing name".to_string()))?
            .as_str()
            .to_string();
        let value_pair = inner
            .next()
            .ok_or_else(|| TextError::Syntax(format!("field {}: missing value", key)))?;
        let value = build_value(value_pair)?;
        merge(&mut map, key, value);
    }
    for key in REPEATED_FIELDS {
        if let Some(v) = map.get_mut(*key) {
            if !v.is_array() {
                let one = v.take();
                *v = Value::Array(vec![one]);
            }
        }
    }
    Ok(Value::Object(map))
}

/// Repeated keys accumulate into a list.
fn merge(map: &mut Map<String, Value>, key: String, value: Value) {
    match map.get_mut(&key) {
        None => {
            map.insert(key, value);
        }
        Some(Value::Array(items)) => match value {
            Value::Array(more) => items.extend(more),
            v => items.push(v),
        },
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

fn build_value(pair: pest::iterators::Pair<Rule>) -> Result<Value, TextError> {
    match pair.as_rule() {
        Rule::message => build_fields(pair.into_inner()),
        Rule::list => pair
            .into_inner()
            .map(build_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Rule::string => {
            let inner = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
            Ok(Value::String(unescape(inner)?))
        }
        Rule::number => parse_number(pair.as_str()),
        Rule::identifier => Ok(match pair.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            other => Value::String(other.to_string()),
        }),
        other => Err(TextError::Syntax(format!("unexpected {:?}", other))),
    }
}

fn parse_number(s: &str) -> Result<Value, TextError> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        let n = i64::from_str_radix(hex, 16).map_err(|_| TextError::Number(s.to_string()))?;
        return Ok(Value::Number(Number::from(if negative { -n } else { n })));
    }
    if let Ok(n) = s.parse::<i64>() {
        return Ok(Value::Number(Number::from(n)));
    }
    if let Ok(n) = s.parse::<u64>() {
        return Ok(Value::Number(Number::from(n)));
    }
    s.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| TextError::Number(s.to_string()))
}

/// Decode a quoted string body. Octal (`\NNN`) and hex (`\xNN`) escapes give raw bytes,
/// which must form UTF-8 together with the rest of the string.
fn unescape(s: &str) -> Result<String, TextError> {
    let bad = |what: &str| TextError::Syntax(format!("invalid escape {} in \"{}\"", what, s));
    let mut out: Vec<u8> = Vec::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let e = chars.next().ok_or_else(|| bad("at end of string"))?;
        let byte = match e {
            'n' => b'\n',
            't' => b'\t',
            'r' => b'\r',
            'a' => 0x07,
            'b' => 0x08,
            'f' => 0x0c,
            'v' => 0x0b,
            '\\' => b'\\',
            '\'' => b'\'',
            '"' => b'"',
            '?' => b'?',
            '0'..='7' => {
                let mut n = e.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            n = n * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                u8::try_from(n).map_err(|_| bad(&format!("\\{:o}", n)))?
            }
            'x' | 'X' => {
                let mut n = None;
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(16)) {
                        Some(d) => {
                            n = Some(n.unwrap_or(0) * 16 + d);
                            chars.next();
                        }
                        None => break,
                    }
                }
                // two hex digits never exceed 0xff
                n.ok_or_else(|| bad("\\x without digits"))? as u8
            }
            other => return Err(bad(&format!("\\{}", other))),
        };
        out.push(byte);
    }
    String::from_utf8(out).map_err(|_| TextError::Syntax(format!("string \"{}\" is not UTF-8", s)))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_ascii_control() => out.push_str(&format!("\\{:03o}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Render a JSON object as text format. Non-object input renders as an empty message.
pub fn to_string(value: &Value) -> String {
    let mut out = String::new();
    if let Value::Object(map) = value {
        write_fields(&mut out, map, 0);
    }
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn write_fields(out: &mut String, map: &Map<String, Value>, depth: usize) {
    for (key, value) in map {
        if value.is_null() {
            continue;
        }
        indent(out, depth);
        out.push_str(key);
        out.push_str(": ");
        write_value(out, key, value, depth);
        out.push('\n');
    }
}

fn write_value(out: &mut String, key: &str, value: &Value, depth: usize) {
    match value {
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{\n");
            write_fields(out, map, depth + 1);
            indent(out, depth);
            out.push('}');
        }
        Value::Array(items) if items.iter().all(|v| !v.is_object()) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, key, item, depth);
            }
            out.push(']');
        }
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                indent(out, depth + 1);
                write_value(out, key, item, depth + 1);
                if i + 1 < items.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            indent(out, depth);
            out.push(']');
        }
        Value::String(s) if ENUM_FIELDS.contains(&key) && is_identifier(s) => out.push_str(s),
        Value::String(s) => out.push_str(&escape(s)),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Null => {}
    }
}
