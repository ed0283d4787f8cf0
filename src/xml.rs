//! Lowered plan XML provider
//!
//! Turns a core plan document into a [`RawNode`] tree. Elements become nodes,
//! attributes become attribute nodes, non-blank text becomes a trimmed `#text`
//! leaf. Comments, processing instructions and the XML declaration are dropped.

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::raw::RawNode;

/// Failure to build a raw tree from XML text
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("document has no root element")]
    NoRootElement,

    #[error("content after the root element: <{0}>")]
    TrailingElement(String),

    #[error("text outside the root element: {0:?}")]
    TextOutsideRoot(String),

    #[error("element <{0}> is never closed")]
    UnclosedElement(String),

    #[error("closing tag </{0}> has no matching opening tag")]
    UnexpectedEnd(String),
}

/// Parse a lowered plan document
pub fn parse_document(source: &str) -> Result<RawNode, LoadError> {
    let mut reader = Reader::from_str(source);
    let mut open: Vec<RawNode> = Vec::new();
    let mut root: Option<RawNode> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => open.push(element(&start)?),
            Event::Empty(start) => {
                let node = element(&start)?;
                attach(&mut open, &mut root, node)?;
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                let node = open.pop().ok_or(LoadError::UnexpectedEnd(name))?;
                attach(&mut open, &mut root, node)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                push_text(&mut open, text.trim())?;
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                push_text(&mut open, text.trim())?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.pop() {
        return Err(LoadError::UnclosedElement(unclosed.name));
    }
    root.ok_or(LoadError::NoRootElement)
}

fn element(start: &BytesStart<'_>) -> Result<RawNode, LoadError> {
    let mut node = RawNode::element(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?;
        node = node.with_attribute(key, value);
    }
    Ok(node)
}

fn attach(
    open: &mut [RawNode],
    root: &mut Option<RawNode>,
    node: RawNode,
) -> Result<(), LoadError> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    if root.is_some() {
        return Err(LoadError::TrailingElement(node.name));
    }
    *root = Some(node);
    Ok(())
}

fn push_text(open: &mut [RawNode], text: &str) -> Result<(), LoadError> {
    if text.is_empty() {
        return Ok(());
    }
    match open.last_mut() {
        Some(parent) => {
            parent.children.push(RawNode::text(text));
            Ok(())
        }
        None => Err(LoadError::TextOutsideRoot(text.to_string())),
    }
}
