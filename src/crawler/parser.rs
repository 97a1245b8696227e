//! Feed parser producing a generic document tree
//!
//! The feed markup is turned into nested mappings keyed by element name:
//! - attributes become `@name` keys
//! - an element holding only text collapses to that text
//! - text next to attributes or child elements is stored under `#text`
//! - repeated sibling elements collapse into a sequence
//!
//! The last rule means one `<entry>` shows up as a mapping while two or more
//! show up as a sequence. Callers that need a uniform view go through
//! [`Value::as_slice`] or [`crate::review::EntrySet`].

use crate::ParseError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// A node of the parsed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Map(BTreeMap<String, Value>),
    List(Vec<Value>),
}

impl Value {
    /// Looks up a key on a mapping node
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Follows a chain of keys from this node
    pub fn path(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Text content of a leaf, or the `#text` of an element with attributes
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::Map(map) => match map.get("#text") {
                Some(Value::Text(text)) => Some(text),
                _ => None,
            },
            Value::List(_) => None,
        }
    }

    /// Views any node as a sequence: a list yields its items, anything else
    /// yields itself once
    pub fn as_slice(&self) -> &[Value] {
        match self {
            Value::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }
}

/// A parsed feed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root_name: String,
    root: Value,
}

impl Document {
    /// Name of the document element (e.g. `feed`)
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Looks up the document element by name, mirroring `doc["feed"]`
    pub fn get(&self, key: &str) -> Option<&Value> {
        (self.root_name == key).then_some(&self.root)
    }
}

/// An element whose end tag has not been seen yet
struct Frame {
    name: String,
    attributes: Vec<(String, String)>,
    children: BTreeMap<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, position: usize) -> Result<Self, ParseError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| ParseError::Xml {
                position,
                message: e.to_string(),
            })?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| ParseError::Xml {
                    position,
                    message: e.to_string(),
                })?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            children: BTreeMap::new(),
            text: String::new(),
        })
    }

    fn close(self) -> (String, Value) {
        if self.attributes.is_empty() && self.children.is_empty() {
            return (self.name, Value::Text(self.text));
        }

        let mut map = self.children;
        for (key, value) in self.attributes {
            map.insert(format!("@{}", key), Value::Text(value));
        }
        if !self.text.is_empty() {
            map.insert("#text".to_string(), Value::Text(self.text));
        }
        (self.name, Value::Map(map))
    }

    fn add_child(&mut self, name: String, value: Value) {
        match self.children.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::List(items) => items.push(value),
                existing => {
                    let first = std::mem::replace(existing, Value::List(Vec::new()));
                    *existing = Value::List(vec![first, value]);
                }
            },
        }
    }
}

/// Parses feed markup into a [`Document`]
///
/// # Errors
///
/// * `ParseError::Xml` - the markup is not well-formed
/// * `ParseError::Unclosed` - input ended inside an element
/// * `ParseError::Empty` - no document element was found
///
/// # Example
///
/// ```
/// use review_harvest::crawler::parse_document;
///
/// let doc = parse_document(r#"<feed><link rel="last" href="x"/></feed>"#).unwrap();
/// let link = doc.get("feed").and_then(|f| f.get("link")).unwrap();
/// assert_eq!(link.get("@rel").and_then(|v| v.as_text()), Some("last"));
/// ```
pub fn parse_document(text: &str) -> Result<Document, ParseError> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let position = reader.buffer_position();
        let event = reader.read_event().map_err(|e| ParseError::Xml {
            position,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(ParseError::Xml {
                        position,
                        message: "content after document element".to_string(),
                    });
                }
                stack.push(Frame::open(&start, position)?);
            }
            Event::Empty(start) => {
                if root.is_some() {
                    return Err(ParseError::Xml {
                        position,
                        message: "content after document element".to_string(),
                    });
                }
                let (name, value) = Frame::open(&start, position)?.close();
                match stack.last_mut() {
                    Some(parent) => parent.add_child(name, value),
                    None => root = Some((name, value)),
                }
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or_else(|| ParseError::Xml {
                    position,
                    message: "unexpected end tag".to_string(),
                })?;
                let (name, value) = frame.close();
                match stack.last_mut() {
                    Some(parent) => parent.add_child(name, value),
                    None => root = Some((name, value)),
                }
            }
            Event::Text(content) => {
                let content = content.unescape().map_err(|e| ParseError::Xml {
                    position,
                    message: e.to_string(),
                })?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&content);
                }
            }
            Event::CData(content) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&content.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(frame) = stack.pop() {
        return Err(ParseError::Unclosed(frame.name));
    }

    let (root_name, root) = root.ok_or(ParseError::Empty)?;
    Ok(Document { root_name, root })
}
