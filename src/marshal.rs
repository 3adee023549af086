//! Wire-format plumbing around the backing records: JSON, YAML, protobuf text and binary.
//!
//! These helpers only encode/decode records. The validate-and-default contract that wraps
//! every call lives on [`ObjectNode`](crate::node::ObjectNode).

use crate::pbtext;
use prost::Message;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Serialization format, carried by codec errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    Proto,
    PbText,
    Json,
    Yaml,
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WireFormat::Proto => "proto",
            WireFormat::PbText => "pbtext",
            WireFormat::Json => "json",
            WireFormat::Yaml => "yaml",
        })
    }
}

/// Output shaping for the text encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarshalOptions {
    /// Spaces per nesting level; 0 writes compact JSON.
    pub indent: usize,
}

impl Default for MarshalOptions {
    fn default() -> Self {
        MarshalOptions { indent: 2 }
    }
}

/// Failure inside an encoder or decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecFailure {
    pub format: WireFormat,
    pub message: String,
}

const CODEC_PREFIX: &str = "proto: ";

/// Replace non-breaking spaces and strip the codec's fixed `proto: ` prefix.
pub fn normalize_message(raw: &str) -> String {
    let s = raw.replace('\u{a0}', " ");
    match s.strip_prefix(CODEC_PREFIX) {
        Some(rest) => rest.to_string(),
        None => s,
    }
}

fn fail(format: WireFormat, e: impl fmt::Display) -> CodecFailure {
    CodecFailure {
        format,
        message: normalize_message(&e.to_string()),
    }
}

/// Empty text input reads as an empty object.
fn or_empty_object(s: &str) -> &str {
    if s.trim().is_empty() {
        "{}"
    } else {
        s
    }
}

pub fn encode_proto<M: Message>(msg: &M) -> Vec<u8> {
    msg.encode_to_vec()
}

pub fn decode_proto<M: Message + Default>(bytes: &[u8]) -> Result<M, CodecFailure> {
    M::decode(bytes).map_err(|e| fail(WireFormat::Proto, e))
}

pub fn encode_json<M: Serialize>(msg: &M, opts: MarshalOptions) -> Result<String, CodecFailure> {
    if opts.indent == 0 {
        return serde_json::to_string(msg).map_err(|e| fail(WireFormat::Json, e));
    }
    let indent = vec![b' '; opts.indent];
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    msg.serialize(&mut ser).map_err(|e| fail(WireFormat::Json, e))?;
    String::from_utf8(out).map_err(|e| fail(WireFormat::Json, e))
}

pub fn decode_json<M: DeserializeOwned>(s: &str) -> Result<M, CodecFailure> {
    serde_json::from_str(or_empty_object(s)).map_err(|e| fail(WireFormat::Json, e))
}

pub fn encode_yaml<M: Serialize>(msg: &M) -> Result<String, CodecFailure> {
    serde_yaml::to_string(msg).map_err(|e| fail(WireFormat::Yaml, e))
}

pub fn decode_yaml<M: DeserializeOwned>(s: &str) -> Result<M, CodecFailure> {
    serde_yaml::from_str(or_empty_object(s)).map_err(|e| fail(WireFormat::Yaml, e))
}

pub fn encode_pbtext<M: Serialize>(msg: &M) -> Result<String, CodecFailure> {
    let value = serde_json::to_value(msg).map_err(|e| fail(WireFormat::PbText, e))?;
    Ok(pbtext::to_string(&value))
}

pub fn decode_pbtext<M: DeserializeOwned>(s: &str) -> Result<M, CodecFailure> {
    let value = pbtext::from_str(s).map_err(|e| fail(WireFormat::PbText, e))?;
    serde_json::from_value(value).map_err(|e| fail(WireFormat::PbText, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg;

    #[test]
    fn normalize_strips_prefix_and_nbsp() {
        assert_eq!(normalize_message("proto:\u{a0}unexpected token"), "unexpected token");
        assert_eq!(normalize_message("proto: bad"), "bad");
        assert_eq!(normalize_message("plain\u{a0}text"), "plain text");
    }

    #[test]
    fn empty_text_is_empty_object() {
        let a: msg::Config = decode_json("").unwrap();
        let b: msg::Config = decode_json("{}").unwrap();
        assert_eq!(a, b);
        let y: msg::Config = decode_yaml("  \n").unwrap();
        assert_eq!(y, b);
    }

    #[test]
    fn json_indent_option() {
        let port = msg::Port {
            name: Some("p1".into()),
            location: None,
        };
        assert_eq!(encode_json(&port, MarshalOptions { indent: 0 }).unwrap(), r#"{"name":"p1"}"#);
        assert_eq!(
            encode_json(&port, MarshalOptions::default()).unwrap(),
            "{\n  \"name\": \"p1\"\n}"
        );
    }

    #[test]
    fn decode_failure_carries_format() {
        let err = decode_json::<msg::Port>("{\"name\": 5}").unwrap_err();
        assert_eq!(err.format, WireFormat::Json);
        let err = decode_proto::<msg::Port>(&[0xff, 0xff]).unwrap_err();
        assert_eq!(err.format, WireFormat::Proto);
    }
}
