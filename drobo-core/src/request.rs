//! Request document builder
//!
//! Requests are nested ordered structures rendered as XML. The device parses
//! children positionally, so map entries are emitted in insertion order.

use bytes::Bytes;
use indexmap::IndexMap;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::constants::cmd;
use crate::error::{Error, Result};

/// Element name used for every sequence item
pub const SEQUENCE_ITEM: &str = "i";

/// A request value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Rendered as element text
    Text(String),

    /// Rendered as element text in decimal
    Integer(i64),

    /// Rendered as element text; integral values keep one decimal (`2.0`)
    Float(f64),

    /// Rendered as repeated `<i>` children
    Sequence(Vec<Value>),

    /// Rendered as one child per key, in insertion order
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Build a map from ordered entries
    ///
    /// A repeated key keeps its first position and takes the last value.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a sequence from items in order
    pub fn sequence<V, I>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Sequence(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self::Map(map)
    }
}

/// Renders [`Value`] trees into XML request bodies
pub struct RequestBuilder;

impl RequestBuilder {
    /// Render `value` wrapped in an element named `root_name`
    ///
    /// # Examples
    ///
    /// ```
    /// use drobo_core::request::{RequestBuilder, Value};
    ///
    /// let value = Value::map([("CmdID", Value::Integer(30)), ("ESAID", Value::from("X"))]);
    /// let xml = RequestBuilder::build("TMCmd", &value).unwrap();
    /// assert_eq!(&xml[..], b"<TMCmd><CmdID>30</CmdID><ESAID>X</ESAID></TMCmd>");
    /// ```
    pub fn build(root_name: &str, value: &Value) -> Result<Bytes> {
        let mut writer = Writer::new(Vec::new());
        write_element(&mut writer, root_name, value)?;
        Ok(Bytes::from(writer.into_inner()))
    }

    /// The `TMCmd` body for a command request
    ///
    /// Keys are emitted as `CmdID`, then `Params` (when `config_type` is set,
    /// as `{config_type: config_type}`), then `ESAID`.
    pub fn command(cmd_id: u32, config_type: Option<&str>, esa_id: &str) -> Result<Bytes> {
        let mut request = IndexMap::new();
        request.insert("CmdID".to_string(), Value::from(cmd_id));
        if let Some(config_type) = config_type {
            request.insert(
                "Params".to_string(),
                Value::map([(config_type, config_type)]),
            );
        }
        request.insert("ESAID".to_string(), Value::from(esa_id));

        Self::build(cmd::ROOT, &Value::Map(request))
    }
}

fn xml_error(e: impl std::fmt::Display) -> Error {
    Error::Xml(e.to_string())
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<()> {
    if name.is_empty() {
        return Err(Error::MalformedDocument("empty element name".into()));
    }

    let is_empty = match value {
        Value::Text(s) => s.is_empty(),
        Value::Integer(_) | Value::Float(_) => false,
        Value::Sequence(items) => items.is_empty(),
        Value::Map(map) => map.is_empty(),
    };

    if is_empty {
        return writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(xml_error);
    }

    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)?;

    match value {
        Value::Sequence(items) => {
            for item in items {
                write_element(writer, SEQUENCE_ITEM, item)?;
            }
        }
        Value::Map(map) => {
            for (key, child) in map {
                write_element(writer, key, child)?;
            }
        }
        Value::Text(s) => write_text(writer, s)?,
        Value::Integer(n) => write_text(writer, &n.to_string())?,
        Value::Float(n) => write_text(writer, &format_float(*n))?,
    }

    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)
}

fn format_float(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{n:.1}")
    } else {
        n.to_string()
    }
}

fn write_text(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<()> {
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_error)
}
