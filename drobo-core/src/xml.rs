//! XML reply parsing
//!
//! Turns a reply payload (or the status block) into an owned
//! [`XmlElement`] tree in one pass. Comments, processing instructions and
//! the XML declaration are skipped.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::trace;

use drobo_types::{ConfigDocument, XmlElement};

use crate::error::{Error, Result};

/// Parse a complete document
///
/// # Errors
///
/// - `Xml` for anything the reader rejects (mismatched end tags, bad escapes)
/// - `MalformedDocument` for no root, several roots, stray text outside the
///   root, or elements left open at end of input
pub fn parse_document(bytes: &[u8]) -> Result<ConfigDocument> {
    parse_element(bytes).map(ConfigDocument::new)
}

/// Parse a complete document and return its root element
pub fn parse_element(bytes: &[u8]) -> Result<XmlElement> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| Error::Xml(format!("at byte {}: {}", reader.buffer_position(), e)))?;

        match event {
            Event::Start(e) => stack.push(open_element(&e)?),
            Event::Empty(e) => {
                let element = open_element(&e)?;
                close_element(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::MalformedDocument("unbalanced end tag".into()))?;
                close_element(element, &mut stack, &mut root)?;
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|e| Error::Xml(e.to_string()))?;
                append_text(&mut stack, &text)?;
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e);
                append_text(&mut stack, &text)?;
            }
            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(Error::MalformedDocument(format!(
            "element <{}> not closed",
            open.name
        )));
    }

    let root = root.ok_or_else(|| Error::MalformedDocument("no root element".into()))?;
    trace!("Parsed <{}> with {} children", root.name, root.children.len());

    Ok(root)
}

fn open_element(start: &BytesStart<'_>) -> Result<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Xml(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn close_element(
    mut element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<()> {
    let trimmed = element.text.trim();
    if trimmed.len() != element.text.len() {
        element.text = trimmed.to_string();
    }

    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }

    if root.is_some() {
        return Err(Error::MalformedDocument(format!(
            "second root element <{}>",
            element.name
        )));
    }

    *root = Some(element);
    Ok(())
}

fn append_text(stack: &mut [XmlElement], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(current) => {
            current.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(Error::MalformedDocument("text outside root element".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_nested_document() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<TMCmd>
  <CmdID>30</CmdID>
  <ResultCode>0</ResultCode>
  <ResultDetails>
    <DRINASConfig version="2">
      <DRIShareConfig/>
    </DRINASConfig>
  </ResultDetails>
</TMCmd>"#;

        let doc = parse_document(xml).unwrap();
        let root = doc.root();

        assert_eq!(root.name, "TMCmd");
        assert_eq!(root.text, "");
        assert_eq!(root.child_text("CmdID"), Some("30"));

        let config = doc.select("/TMCmd/ResultDetails/DRINASConfig").unwrap();
        assert_eq!(config.attribute("version"), Some("2"));
        assert_eq!(config.children.len(), 1);
        assert_eq!(config.children[0].name, "DRIShareConfig");
    }

    #[test]
    fn test_text_is_unescaped_and_trimmed() {
        let root = parse_element(b"<a> x &amp; y \n</a>").unwrap();
        assert_eq!(root.text, "x & y");
    }

    #[test]
    fn test_cdata() {
        let root = parse_element(b"<a><![CDATA[<raw>]]></a>").unwrap();
        assert_eq!(root.text, "<raw>");
    }

    #[test]
    fn test_children_keep_order() {
        let root = parse_element(b"<r><b/><a/><b/></r>").unwrap();
        let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_mismatched_end_tag() {
        assert!(matches!(parse_element(b"<a><b></a>"), Err(Error::Xml(_))));
    }

    #[test]
    fn test_unclosed_element() {
        assert!(parse_element(b"<a><b></b>").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            parse_element(b"   "),
            Err(Error::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_two_roots() {
        assert!(matches!(
            parse_element(b"<a/><b/>"),
            Err(Error::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_text_outside_root() {
        assert!(matches!(
            parse_element(b"junk<a/>"),
            Err(Error::MalformedDocument(_))
        ));
    }
}
