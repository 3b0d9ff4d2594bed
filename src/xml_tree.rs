//! Minimal editable XML tree.
//!
//! Metadata documents are edited in place: matching elements are removed and
//! new ones appended, while everything else (comments, processing
//! instructions, unknown elements, original attribute order) is written back
//! unchanged. The tree is built from quick-xml events and records the resolved
//! namespace of every element, so lookups can match on namespace URI rather
//! than on whichever prefix a document happens to use.

use std::fmt::Write;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{NewspaperError, Result};

/// A node in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element.
    Element(Element),
    /// Text, kept escaped exactly as read.
    Text(String),
    /// A CDATA section.
    CData(String),
    /// A comment.
    Comment(String),
    /// A processing instruction.
    ProcessingInstruction(String),
}

/// An element with its resolved namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified name as written (`mods:dateIssued`).
    pub name: String,
    /// Namespace URI the prefix resolved to.
    pub namespace: Option<String>,
    /// Attributes in document order, unescaped.
    pub attributes: Vec<(String, String)>,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns the local part of the qualified name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.name.rsplit_once(':').map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Returns the prefix of the qualified name, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Returns true if the element has this namespace and local name.
    #[must_use]
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name() == local_name
    }

    /// Returns the value of an attribute by qualified name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets an attribute, replacing an existing value.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    /// Appends escaped text for `text`.
    pub fn push_text(&mut self, text: &str) {
        self.children.push(Node::Text(escape(text).into_owned()));
    }

    /// Returns the concatenated, unescaped text content.
    ///
    /// # Errors
    ///
    /// Returns [`NewspaperError::Xml`] if the text contains an unknown entity.
    pub fn text(&self) -> Result<String> {
        let mut text = String::new();
        for child in &self.children {
            match child {
                Node::Text(raw) => text.push_str(
                    &quick_xml::escape::unescape(raw)
                        .map_err(|e| NewspaperError::Xml(e.to_string()))?,
                ),
                Node::CData(raw) => text.push_str(raw),
                Node::Element(element) => text.push_str(&element.text()?),
                Node::Comment(_) | Node::ProcessingInstruction(_) => {},
            }
        }
        Ok(text)
    }

    /// Child elements in order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Finds the first descendant (depth-first, document order) matching the
    /// predicate, including this element.
    pub fn find<P>(&self, predicate: &P) -> Option<&Element>
    where
        P: Fn(&Element) -> bool,
    {
        if predicate(self) {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find(predicate))
    }

    /// Finds the first descendant, in document order, for which
    /// `predicate(parent, child)` holds.
    pub fn find_with_parent<P>(&self, predicate: &P) -> Option<&Element>
    where
        P: Fn(&Element, &Element) -> bool,
    {
        self.child_elements().find_map(|child| {
            if predicate(self, child) {
                Some(child)
            } else {
                child.find_with_parent(predicate)
            }
        })
    }

    /// Mutable variant of [`Element::find`].
    pub fn find_mut<P>(&mut self, predicate: &P) -> Option<&mut Element>
    where
        P: Fn(&Element) -> bool,
    {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(child) => child.find_mut(predicate),
            _ => None,
        })
    }

    /// Removes every descendant element for which `predicate(parent, child)`
    /// holds and returns how many were removed.
    pub fn remove_where<P>(&mut self, predicate: &P) -> usize
    where
        P: Fn(&Element, &Element) -> bool,
    {
        let mut removed = 0;
        let mut kept = Vec::with_capacity(self.children.len());
        for node in std::mem::take(&mut self.children) {
            match node {
                Node::Element(child) if predicate(self, &child) => removed += 1,
                Node::Element(mut child) => {
                    removed += child.remove_where(predicate);
                    kept.push(Node::Element(child));
                },
                other => kept.push(other),
            }
        }
        self.children = kept;
        removed
    }

    fn write_to(&self, out: &mut String) {
        write!(out, "<{}", self.name).ok();
        for (key, value) in &self.attributes {
            write!(out, " {key}=\"{}\"", escape(value)).ok();
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        write!(out, "</{}>", self.name).ok();
    }
}

impl Node {
    fn write_to(&self, out: &mut String) {
        match self {
            Self::Element(element) => element.write_to(out),
            Self::Text(raw) => out.push_str(raw),
            Self::CData(raw) => {
                write!(out, "<![CDATA[{raw}]]>").ok();
            },
            Self::Comment(raw) => {
                write!(out, "<!--{raw}-->").ok();
            },
            Self::ProcessingInstruction(raw) => {
                write!(out, "<?{raw}?>").ok();
            },
        }
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// XML declaration content, without `<?` and `?>`.
    pub declaration: Option<String>,
    /// Comments, doctype and processing instructions before the root.
    pub prolog: Vec<String>,
    /// The root element.
    pub root: Element,
    /// Comments and processing instructions after the root.
    pub epilog: Vec<String>,
}

struct Scope {
    element: Element,
    bindings: Vec<(String, String)>,
}

fn utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| NewspaperError::Xml(e.to_string()))
}

fn resolve<'s>(stack: &'s [Scope], own: &'s [(String, String)], prefix: &str) -> Option<&'s str> {
    own.iter()
        .chain(stack.iter().rev().flat_map(|scope| scope.bindings.iter()))
        .find(|(declared, _)| declared == prefix)
        .map(|(_, uri)| uri.as_str())
        .filter(|uri| !uri.is_empty())
}

fn open_element(start: &BytesStart<'_>, stack: &[Scope]) -> Result<Scope> {
    let name = utf8(start.name().as_ref())?;
    let mut attributes = Vec::new();
    let mut bindings = Vec::new();

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| NewspaperError::Xml(e.to_string()))?;
        let key = utf8(attribute.key.as_ref())?;
        let value = attribute
            .unescape_value()
            .map_err(|e| NewspaperError::Xml(e.to_string()))?
            .into_owned();
        if key == "xmlns" {
            bindings.push((String::new(), value.clone()));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            bindings.push((prefix.to_string(), value.clone()));
        }
        attributes.push((key, value));
    }

    let prefix = name.split_once(':').map_or("", |(prefix, _)| prefix);
    let namespace = resolve(stack, &bindings, prefix).map(str::to_string);
    if namespace.is_none() && !prefix.is_empty() && prefix != "xml" {
        return Err(NewspaperError::Xml(format!("unbound prefix '{prefix}' on <{name}>")));
    }

    let mut element = Element::new(name, namespace);
    element.attributes = attributes;
    Ok(Scope { element, bindings })
}

impl Document {
    /// Parses a well-formed document.
    ///
    /// # Errors
    ///
    /// Returns [`NewspaperError::Xml`] for malformed markup, mismatched or
    /// unclosed tags, unbound prefixes, content outside the root element, or a
    /// missing root.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.check_end_names(true);

        let mut declaration = None;
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut stack: Vec<Scope> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                NewspaperError::Xml(format!("at position {}: {e}", reader.buffer_position()))
            })?;

            match event {
                Event::Decl(decl) => declaration = Some(utf8(&decl)?),
                Event::Start(start) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(NewspaperError::Xml("multiple root elements".into()));
                    }
                    let scope = open_element(&start, &stack)?;
                    stack.push(scope);
                },
                Event::Empty(start) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(NewspaperError::Xml("multiple root elements".into()));
                    }
                    let scope = open_element(&start, &stack)?;
                    match stack.last_mut() {
                        Some(parent) => parent.element.children.push(Node::Element(scope.element)),
                        None => root = Some(scope.element),
                    }
                },
                Event::End(_) => {
                    let closed = stack
                        .pop()
                        .ok_or_else(|| NewspaperError::Xml("unexpected closing tag".into()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.element.children.push(Node::Element(closed.element)),
                        None => root = Some(closed.element),
                    }
                },
                Event::Text(text) => {
                    let raw = utf8(&text.into_inner())?;
                    match stack.last_mut() {
                        Some(parent) => parent.element.children.push(Node::Text(raw)),
                        None if raw.trim().is_empty() => {},
                        None => {
                            return Err(NewspaperError::Xml("text outside the root element".into()))
                        },
                    }
                },
                Event::CData(data) => {
                    let raw = utf8(&data.into_inner())?;
                    match stack.last_mut() {
                        Some(parent) => parent.element.children.push(Node::CData(raw)),
                        None => {
                            return Err(NewspaperError::Xml("CDATA outside the root element".into()))
                        },
                    }
                },
                Event::Comment(comment) => {
                    let raw = utf8(&comment.into_inner())?;
                    match stack.last_mut() {
                        Some(parent) => parent.element.children.push(Node::Comment(raw)),
                        None if root.is_none() => prolog.push(format!("<!--{raw}-->")),
                        None => epilog.push(format!("<!--{raw}-->")),
                    }
                },
                Event::PI(pi) => {
                    let raw = utf8(&pi.into_inner())?;
                    match stack.last_mut() {
                        Some(parent) => parent
                            .element
                            .children
                            .push(Node::ProcessingInstruction(raw)),
                        None if root.is_none() => prolog.push(format!("<?{raw}?>")),
                        None => epilog.push(format!("<?{raw}?>")),
                    }
                },
                Event::DocType(doctype) => {
                    let raw = utf8(&doctype.into_inner())?;
                    prolog.push(format!("<!DOCTYPE {raw}>"));
                },
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(NewspaperError::Xml(format!(
                "unclosed element <{}>",
                open.element.name
            )));
        }

        let root = root.ok_or_else(|| NewspaperError::Xml("document has no root element".into()))?;
        Ok(Self {
            declaration,
            prolog,
            root,
            epilog,
        })
    }

    /// Serializes the document.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        if let Some(declaration) = &self.declaration {
            writeln!(out, "<?{declaration}?>").ok();
        }
        for item in &self.prolog {
            out.push_str(item);
            out.push('\n');
        }
        self.root.write_to(&mut out);
        out.push('\n');
        for item in &self.epilog {
            out.push_str(item);
            out.push('\n');
        }
        out
    }
}
