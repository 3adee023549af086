//! Object nodes: the validate / default / clone / serialize contract shared by every schema
//! type.
//!
//! A node owns its data and its children outright. Children are created on first mutable
//! access and are dropped together with the rest of the node when [`ObjectNode::set_msg`]
//! replaces it, so a stale child can never be observed after a decode. Trees have no
//! internal locking; mutation goes through `&mut self`.
//!
//! Every serialize call runs [`ObjectNode::validate_to_and_from`] first and encodes only a
//! valid, fully defaulted tree. Every deserialize call decodes into a fresh record, replaces
//! the node wholesale, then runs the same validation.

use crate::marshal::{self, CodecFailure, MarshalOptions, WireFormat};
use crate::msg::NamedEnum;
use crate::validation::{Validation, ValidationError};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{format} decode: {message}")]
    Decode { format: WireFormat, message: String },
    #[error("{format} encode: {message}")]
    Encode { format: WireFormat, message: String },
    #[error("index {index} out of range for {type_name} list of length {len}")]
    IndexOutOfRange {
        type_name: &'static str,
        index: usize,
        len: usize,
    },
}

impl ModelError {
    fn decode(f: CodecFailure) -> Self {
        ModelError::Decode {
            format: f.format,
            message: f.message,
        }
    }

    fn encode(f: CodecFailure) -> Self {
        ModelError::Encode {
            format: f.format,
            message: f.message,
        }
    }

    /// Validation messages, if this is a validation failure.
    pub fn messages(&self) -> &[String] {
        match self {
            ModelError::Validation(v) => &v.messages,
            _ => &[],
        }
    }
}

/// A schema type: backing record, defaults, validation and serialization.
///
/// `Default` is the blank node with nothing populated and no defaults applied; schema types
/// also provide `new()`, which applies defaults immediately.
pub trait ObjectNode: Default {
    type Msg: prost::Message + Default + Clone + PartialEq + Serialize + DeserializeOwned;
    const TYPE_NAME: &'static str;

    /// Backing record for the current state.
    fn to_msg(&self) -> Self::Msg;

    /// Replace the whole node from a record, dropping every cached child.
    fn set_msg(&mut self, msg: Self::Msg) -> &mut Self;

    /// Apply defaults to this node and every populated child.
    fn set_default(&mut self);

    /// Check this node's populated fields, then recurse into its children.
    fn validate_obj(&self, vobj: &mut Validation);

    fn from_msg(msg: Self::Msg) -> Self {
        let mut obj = Self::default();
        obj.set_msg(msg);
        obj
    }

    /// Validate as-is, without applying defaults. Warnings are returned on success.
    fn validate(&self) -> Result<Vec<String>, ValidationError> {
        let mut vobj = Validation::new();
        self.validate_obj(&mut vobj);
        vobj.finish()
    }

    /// Apply defaults, then validate. Runs before every serialize and after every
    /// deserialize.
    fn validate_to_and_from(&mut self) -> Result<Vec<String>, ValidationError> {
        self.set_default();
        self.validate()
    }

    /// Copy through the binary wire format. The source is validated (no defaults applied);
    /// the copy shares nothing with it.
    fn clone_node(&self) -> Result<Self, ModelError> {
        self.validate()?;
        let bytes = marshal::encode_proto(&self.to_msg());
        let msg = marshal::decode_proto::<Self::Msg>(&bytes).map_err(ModelError::decode)?;
        Ok(Self::from_msg(msg))
    }

    fn to_proto(&mut self) -> Result<Vec<u8>, ModelError> {
        tracing::debug!(node = Self::TYPE_NAME, format = %WireFormat::Proto, "serialize");
        self.validate_to_and_from()?;
        Ok(marshal::encode_proto(&self.to_msg()))
    }

    fn to_pbtext(&mut self) -> Result<String, ModelError> {
        tracing::debug!(node = Self::TYPE_NAME, format = %WireFormat::PbText, "serialize");
        self.validate_to_and_from()?;
        marshal::encode_pbtext(&self.to_msg()).map_err(ModelError::encode)
    }

    fn to_json(&mut self) -> Result<String, ModelError> {
        self.to_json_with(MarshalOptions::default())
    }

    fn to_json_with(&mut self, opts: MarshalOptions) -> Result<String, ModelError> {
        tracing::debug!(node = Self::TYPE_NAME, format = %WireFormat::Json, "serialize");
        self.validate_to_and_from()?;
        marshal::encode_json(&self.to_msg(), opts).map_err(ModelError::encode)
    }

    fn to_yaml(&mut self) -> Result<String, ModelError> {
        tracing::debug!(node = Self::TYPE_NAME, format = %WireFormat::Yaml, "serialize");
        self.validate_to_and_from()?;
        marshal::encode_yaml(&self.to_msg()).map_err(ModelError::encode)
    }

    fn from_proto(bytes: &[u8]) -> Result<Self, ModelError> {
        tracing::debug!(node = Self::TYPE_NAME, format = %WireFormat::Proto, "deserialize");
        let msg = marshal::decode_proto(bytes).map_err(ModelError::decode)?;
        Self::adopt(msg)
    }

    fn from_pbtext(s: &str) -> Result<Self, ModelError> {
        tracing::debug!(node = Self::TYPE_NAME, format = %WireFormat::PbText, "deserialize");
        let msg = marshal::decode_pbtext(s).map_err(ModelError::decode)?;
        Self::adopt(msg)
    }

    fn from_json(s: &str) -> Result<Self, ModelError> {
        tracing::debug!(node = Self::TYPE_NAME, format = %WireFormat::Json, "deserialize");
        let msg = marshal::decode_json(s).map_err(ModelError::decode)?;
        Self::adopt(msg)
    }

    fn from_yaml(s: &str) -> Result<Self, ModelError> {
        tracing::debug!(node = Self::TYPE_NAME, format = %WireFormat::Yaml, "deserialize");
        let msg = marshal::decode_yaml(s).map_err(ModelError::decode)?;
        Self::adopt(msg)
    }

    /// Build a node from a freshly decoded record and run validation with defaults.
    fn adopt(msg: Self::Msg) -> Result<Self, ModelError> {
        let mut obj = Self::from_msg(msg);
        obj.validate_to_and_from()?;
        Ok(obj)
    }
}

/// Map a raw enum tag to a known, non-zero variant. Unknown values are recorded.
pub(crate) fn known_tag<E: NamedEnum>(
    raw: Option<i32>,
    type_name: &str,
    issues: &mut Vec<String>,
) -> Option<E> {
    let n = raw.filter(|&n| n != 0)?;
    match E::try_from(n) {
        Ok(e) => Some(e),
        Err(_) => {
            issues.push(format!("{} is not a valid choice on {}ChoiceEnum", n, type_name));
            None
        }
    }
}

/// Settle the choice of a decoded record from its tag and the exclusive fields that are
/// populated. A tag that disagrees with the populated fields, or several populated fields
/// without a tag, is reported as a mismatch rather than repaired.
pub(crate) fn resolve_choice<C: Copy + PartialEq>(
    tag: Option<C>,
    populated: &[C],
    type_name: &str,
    issues: &mut Vec<String>,
) -> Option<C> {
    let mismatch = |issues: &mut Vec<String>| {
        issues.push(format!("choice not matching with property in {}", type_name));
    };
    match (tag, populated) {
        (Some(tag), []) => Some(tag),
        (Some(tag), [only]) => {
            if *only != tag {
                mismatch(issues);
            }
            Some(tag)
        }
        (Some(tag), _) => {
            mismatch(issues);
            Some(tag)
        }
        (None, []) => None,
        (None, [only]) => Some(*only),
        (None, _) => {
            mismatch(issues);
            None
        }
    }
}

/// Ordered list of child nodes. Append-only, apart from explicit [`NodeList::set`] and
/// [`NodeList::clear`]; indices are stable until cleared.
#[derive(Debug, PartialEq)]
pub struct NodeList<T> {
    items: Vec<T>,
}

impl<T> Default for NodeList<T> {
    fn default() -> Self {
        NodeList { items: Vec::new() }
    }
}

impl<T: ObjectNode> NodeList<T> {
    /// Append a new defaulted item and return it for editing.
    pub fn add(&mut self) -> &mut T {
        let mut item = T::default();
        item.set_default();
        self.items.push(item);
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    pub fn append(&mut self, item: T) -> &mut Self {
        self.items.push(item);
        self
    }

    /// Replace the item at `index`.
    pub fn set(&mut self, index: usize, item: T) -> Result<&mut Self, ModelError> {
        let len = self.items.len();
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = item;
                Ok(self)
            }
            None => Err(ModelError::IndexOutOfRange {
                type_name: T::TYPE_NAME,
                index,
                len,
            }),
        }
    }

    pub fn clear(&mut self) -> &mut Self {
        self.items.clear();
        self
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn to_msgs(&self) -> Vec<T::Msg> {
        self.items.iter().map(ObjectNode::to_msg).collect()
    }

    pub(crate) fn from_msgs(msgs: Vec<T::Msg>) -> Self {
        NodeList {
            items: msgs.into_iter().map(T::from_msg).collect(),
        }
    }

    pub(crate) fn set_default(&mut self) {
        for item in &mut self.items {
            item.set_default();
        }
    }

    /// Validate items in index order.
    pub(crate) fn validate_obj(&self, vobj: &mut Validation) {
        for item in &self.items {
            item.validate_obj(vobj);
        }
    }
}

impl<'a, T> IntoIterator for &'a NodeList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
