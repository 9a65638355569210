//! StAX-style stream reader over quick-xml.
//!
//! `XmlStreamReader` is the low-level cursor the pull parser delegates to.
//! It owns all cursor state (current event, element name, attributes,
//! namespace scopes, text, location) and reports well-formedness problems
//! quick-xml leaves to the caller: content outside the root element,
//! several roots, a document that ends with open elements.
//!
//! # Event mapping
//!
//! ```text
//! quick-xml            reader
//! ─────────            ──────
//! Decl                 consumed at construction (version, encoding)
//! Start / Empty        START_ELEMENT (empty elements expanded, END_ELEMENT follows)
//! End                  END_ELEMENT
//! Text / CData         CHARACTERS (coalesced) or CHARACTERS / CDATA
//! Comment              COMMENT
//! PI                   PROCESSING_INSTRUCTION
//! DocType              DTD
//! Eof                  END_DOCUMENT
//! ```
//!
//! Whitespace outside the root element is skipped.

use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::str;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{PrefixDeclaration, QName, ResolveResult};
use quick_xml::reader::NsReader;
use thiserror::Error;

use crate::config::{keys, ParserConfig};
use crate::event::EventType;
use crate::source::{encoding_for_label, Location, Tracked, Transcoder};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// Failure reported by the stream reader.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Malformed(String),

    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),

    #[error("unsupported encoding: {0}")]
    Encoding(String),

    /// The requested data does not exist at the current event.
    #[error("{0}")]
    IllegalState(String),

    #[error("no more events: end of document reached")]
    NoMoreEvents,
}

type StreamResult<T> = std::result::Result<T, StreamError>;

/// Attribute of the current start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub namespace: Option<String>,
    pub local_name: String,
    pub prefix: Option<String>,
    pub value: String,
}

/// Namespace declaration (`xmlns` / `xmlns:prefix`) on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceBinding {
    /// `None` for the default namespace
    pub prefix: Option<String>,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ElementName {
    namespace: Option<String>,
    local_name: String,
    prefix: Option<String>,
}

impl ElementName {
    fn qualified(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.local_name),
            None => self.local_name.clone(),
        }
    }
}

/// An open element: its name and the namespaces it declared.
#[derive(Debug)]
struct Scope {
    name: ElementName,
    bindings: Vec<NamespaceBinding>,
}

/// Data for the event at the cursor.
#[derive(Debug)]
struct Cursor {
    event: EventType,
    attributes: Vec<Attribute>,
    text: Option<String>,
}

impl Cursor {
    fn new(event: EventType) -> Self {
        Self {
            event,
            attributes: Vec::new(),
            text: None,
        }
    }

    fn text(event: EventType, text: String) -> Self {
        Self {
            event,
            attributes: Vec::new(),
            text: Some(text),
        }
    }
}

type Source<'i> = Tracked<Box<dyn BufRead + 'i>>;

/// Cursor-based XML reader bound to one input.
pub struct XmlStreamReader<'i> {
    inner: NsReader<Source<'i>>,
    buf: Vec<u8>,
    /// One event read ahead (while coalescing text), with the location after it
    pending: Option<(Event<'static>, Location)>,
    /// Read-ahead failure, reported by the advance after the coalesced text
    deferred: Option<StreamError>,
    cursor: Cursor,
    location: Location,
    scopes: Vec<Scope>,
    /// The scope of the last END_ELEMENT is dropped on the next advance
    pop_scope: bool,
    root_seen: bool,
    namespace_aware: bool,
    coalescing: bool,
    encoding: Option<String>,
    version: Option<String>,
}

impl<'i> XmlStreamReader<'i> {
    /// Bind to UTF-8 character input.
    ///
    /// Reads the XML declaration, if present, so prolog errors surface here.
    pub fn from_reader<R: BufRead + 'i>(source: R, config: &ParserConfig) -> StreamResult<Self> {
        Self::bind(Box::new(source), None, config)
    }

    /// Bind to byte input in the encoding named by `label`.
    pub fn from_stream<R: Read + 'i>(
        stream: R,
        label: &str,
        config: &ParserConfig,
    ) -> StreamResult<Self> {
        let encoding =
            encoding_for_label(label).ok_or_else(|| StreamError::Encoding(label.to_owned()))?;
        let source = BufReader::new(Transcoder::new(stream, encoding));
        Self::bind(Box::new(source), Some(encoding.name().to_owned()), config)
    }

    fn bind(
        source: Box<dyn BufRead + 'i>,
        encoding: Option<String>,
        config: &ParserConfig,
    ) -> StreamResult<Self> {
        let mut inner = NsReader::from_reader(Tracked::new(source));
        let options = inner.config_mut();
        options.expand_empty_elements = true;
        options.check_end_names = config.flag(keys::CHECK_END_NAMES);
        options.check_comments = config.flag(keys::CHECK_COMMENTS);

        let mut reader = Self {
            inner,
            buf: Vec::new(),
            pending: None,
            deferred: None,
            cursor: Cursor::new(EventType::StartDocument),
            location: Location::start(),
            scopes: Vec::new(),
            pop_scope: false,
            root_seen: false,
            namespace_aware: config.namespace_aware(),
            coalescing: config.coalescing(),
            encoding,
            version: None,
        };
        reader.read_prolog()?;
        Ok(reader)
    }

    /// Consume the XML declaration, or keep the first event for `next()`.
    fn read_prolog(&mut self) -> StreamResult<()> {
        let (event, location) = self.read_raw()?;
        self.location = location;
        match event {
            Event::Decl(decl) => {
                let version = decl.version().map_err(malformed)?;
                self.version = Some(utf8(&version)?.to_owned());
                if self.encoding.is_none() {
                    if let Some(declared) = decl.encoding() {
                        self.encoding = Some(utf8(&declared.map_err(malformed)?)?.to_owned());
                    }
                }
            }
            other => self.pending = Some((other, location)),
        }
        Ok(())
    }

    /// Next raw quick-xml event: the read-ahead one if any, else a fresh read.
    fn read_raw(&mut self) -> StreamResult<(Event<'static>, Location)> {
        if let Some(pending) = self.pending.take() {
            return Ok(pending);
        }
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }
        self.buf.clear();
        let event = self.inner.read_event_into(&mut self.buf).map_err(stream_error)?.into_owned();
        let source = self.inner.get_ref();
        let location = match event {
            // quick-xml consumes the `<` that ends a text run
            Event::Text(_) => source.text_end(),
            _ => source.location(),
        };
        Ok((event, location))
    }

    // ========== Navigation ==========

    /// Advance to the next event.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> StreamResult<EventType> {
        if self.cursor.event == EventType::EndDocument {
            return Err(StreamError::NoMoreEvents);
        }
        // Scopes change only after a successful read
        let (cursor, opened) = self.read_cursor()?;
        if self.pop_scope {
            self.scopes.pop();
        }
        self.pop_scope = cursor.event == EventType::EndElement;
        if let Some(scope) = opened {
            self.scopes.push(scope);
        }
        tracing::trace!(event = %cursor.event, location = %self.location, "stream event");
        self.cursor = cursor;
        Ok(self.cursor.event)
    }

    /// Read the next cursor, and the scope it opens when it is a start tag.
    fn read_cursor(&mut self) -> StreamResult<(Cursor, Option<Scope>)> {
        loop {
            let (event, location) = self.read_raw()?;
            self.location = location;
            let depth = self.scopes.len() - usize::from(self.pop_scope);
            match event {
                Event::Decl(_) => {
                    return Err(StreamError::Malformed(
                        "XML declaration is only allowed at the start of the document".into(),
                    ));
                }
                // Empty never surfaces: empty elements are expanded
                Event::Start(start) | Event::Empty(start) => {
                    if depth == 0 && self.root_seen {
                        return Err(StreamError::Malformed(
                            "document has more than one root element".into(),
                        ));
                    }
                    self.root_seen = true;
                    let (cursor, scope) = self.start_element(&start)?;
                    return Ok((cursor, Some(scope)));
                }
                Event::End(_) => {
                    if depth == 0 {
                        return Err(StreamError::Malformed("end tag without a start tag".into()));
                    }
                    return Ok((Cursor::new(EventType::EndElement), None));
                }
                Event::Text(text) => {
                    let content = text.unescape().map_err(malformed)?.into_owned();
                    if depth == 0 {
                        if is_whitespace(&content) {
                            continue;
                        }
                        return Err(StreamError::Malformed(
                            "text is not allowed outside the root element".into(),
                        ));
                    }
                    if self.coalescing {
                        return Ok((self.coalesce(content), None));
                    }
                    return Ok((Cursor::text(EventType::Characters, content), None));
                }
                Event::CData(cdata) => {
                    if depth == 0 {
                        return Err(StreamError::Malformed(
                            "CDATA is not allowed outside the root element".into(),
                        ));
                    }
                    let content = utf8(&cdata)?.to_owned();
                    if self.coalescing {
                        return Ok((self.coalesce(content), None));
                    }
                    return Ok((Cursor::text(EventType::CData, content), None));
                }
                Event::Comment(comment) => {
                    return Ok((Cursor::text(EventType::Comment, utf8(&comment)?.to_owned()), None));
                }
                Event::PI(_) => return Ok((Cursor::new(EventType::ProcessingInstruction), None)),
                Event::DocType(doctype) => {
                    if self.root_seen {
                        return Err(StreamError::Malformed(
                            "DOCTYPE must come before the root element".into(),
                        ));
                    }
                    let content = utf8(&doctype)?.trim().to_owned();
                    return Ok((Cursor::text(EventType::Dtd, content), None));
                }
                Event::Eof => {
                    if depth > 0 {
                        return Err(StreamError::UnexpectedEof(format!(
                            "{depth} element(s) not closed"
                        )));
                    }
                    if !self.root_seen {
                        return Err(StreamError::UnexpectedEof("document has no root element".into()));
                    }
                    return Ok((Cursor::new(EventType::EndDocument), None));
                }
            }
        }
    }

    /// Append following text and CDATA events to `text`.
    ///
    /// A failure while reading ahead is deferred to the next advance, so the
    /// text read so far is still reported.
    fn coalesce(&mut self, mut text: String) -> Cursor {
        loop {
            match self.read_more(&mut text) {
                Ok(Some(location)) => self.location = location,
                Ok(None) => break,
                Err(err) => {
                    self.deferred = Some(err);
                    break;
                }
            }
        }
        Cursor::text(EventType::Characters, text)
    }

    /// Append one following text or CDATA event to `text` and return the
    /// location after it; any other event is kept pending.
    fn read_more(&mut self, text: &mut String) -> StreamResult<Option<Location>> {
        let (event, location) = self.read_raw()?;
        match event {
            Event::Text(more) => text.push_str(&more.unescape().map_err(malformed)?),
            Event::CData(more) => text.push_str(utf8(&more)?),
            other => {
                self.pending = Some((other, location));
                return Ok(None);
            }
        }
        Ok(Some(location))
    }

    fn start_element(&self, start: &BytesStart<'_>) -> StreamResult<(Cursor, Scope)> {
        let mut bindings = Vec::new();
        let mut raw_attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(malformed)?;
            let value = attr.unescape_value().map_err(malformed)?.into_owned();
            if self.namespace_aware {
                match attr.key.as_namespace_binding() {
                    Some(PrefixDeclaration::Default) => {
                        bindings.push(NamespaceBinding { prefix: None, uri: value });
                        continue;
                    }
                    Some(PrefixDeclaration::Named(prefix)) => {
                        let prefix = Some(utf8(prefix)?.to_owned());
                        bindings.push(NamespaceBinding { prefix, uri: value });
                        continue;
                    }
                    None => {}
                }
            }
            raw_attributes.push((attr.key, value));
        }

        let mut attributes = Vec::with_capacity(raw_attributes.len());
        for (key, value) in raw_attributes {
            let (namespace, local_name) = self.resolve(key, true)?;
            attributes.push(Attribute {
                namespace,
                local_name,
                prefix: self.prefix_of(key)?,
                value,
            });
        }

        let (namespace, local_name) = self.resolve(start.name(), false)?;
        let name = ElementName {
            namespace,
            local_name,
            prefix: self.prefix_of(start.name())?,
        };
        let cursor = Cursor {
            event: EventType::StartElement,
            attributes,
            text: None,
        };
        Ok((cursor, Scope { name, bindings }))
    }

    /// Namespace URI and local name of an element or attribute name.
    fn resolve(&self, name: QName<'_>, attribute: bool) -> StreamResult<(Option<String>, String)> {
        if !self.namespace_aware {
            return Ok((None, utf8(name.as_ref())?.to_owned()));
        }
        let (resolved, local) = if attribute {
            self.inner.resolve_attribute(name)
        } else {
            self.inner.resolve_element(name)
        };
        let namespace = match resolved {
            ResolveResult::Bound(ns) => Some(utf8(ns.as_ref())?.to_owned()),
            ResolveResult::Unbound => None,
            ResolveResult::Unknown(prefix) => {
                return Err(StreamError::Malformed(format!(
                    "namespace prefix '{}' is not bound",
                    String::from_utf8_lossy(&prefix)
                )));
            }
        };
        Ok((namespace, utf8(local.as_ref())?.to_owned()))
    }

    fn prefix_of(&self, name: QName<'_>) -> StreamResult<Option<String>> {
        if !self.namespace_aware {
            return Ok(None);
        }
        name.prefix()
            .map(|prefix| utf8(prefix.as_ref()).map(str::to_owned))
            .transpose()
    }

    /// Advance to the next start or end tag, skipping whitespace, comments
    /// and processing instructions.
    pub fn next_tag(&mut self) -> StreamResult<EventType> {
        loop {
            let event = self.next()?;
            match event {
                EventType::StartElement | EventType::EndElement => return Ok(event),
                EventType::Comment | EventType::ProcessingInstruction => {}
                _ if event.is_text() && self.is_whitespace() => {}
                _ => {
                    return Err(StreamError::IllegalState(format!(
                        "expected start or end tag, found {event}"
                    )));
                }
            }
        }
    }

    /// Check the current event type and, if given, namespace and local name.
    ///
    /// `Some("")` as namespace requires the element to have no namespace.
    pub fn require(
        &self,
        event: EventType,
        namespace: Option<&str>,
        local_name: Option<&str>,
    ) -> StreamResult<()> {
        if self.cursor.event != event {
            return Err(StreamError::IllegalState(format!(
                "expected event {event} but current event is {}",
                self.cursor.event
            )));
        }
        if namespace.is_none() && local_name.is_none() {
            return Ok(());
        }
        let name = self.element().map_err(|_| {
            StreamError::IllegalState(format!("event {event} has no name to compare"))
        })?;
        if let Some(expected) = local_name {
            if name.local_name != expected {
                return Err(StreamError::IllegalState(format!(
                    "expected local name '{expected}' but found '{}'",
                    name.local_name
                )));
            }
        }
        if let Some(expected) = namespace {
            let actual = name.namespace.as_deref().unwrap_or("");
            if actual != expected {
                return Err(StreamError::IllegalState(format!(
                    "expected namespace '{expected}' but found '{actual}'"
                )));
            }
        }
        Ok(())
    }

    // ========== Cursor State ==========

    #[inline]
    pub fn event_type(&self) -> EventType {
        self.cursor.event
    }

    /// Location just past the current event.
    #[inline]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Explicit encoding of byte input, else the declared encoding.
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Version from the XML declaration.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn element(&self) -> StreamResult<&ElementName> {
        match self.scopes.last() {
            Some(scope) if self.cursor.event.is_element() => Ok(&scope.name),
            _ => Err(StreamError::IllegalState(format!(
                "{} is not a start or end tag",
                self.cursor.event
            ))),
        }
    }

    pub fn local_name(&self) -> StreamResult<&str> {
        Ok(&self.element()?.local_name)
    }

    pub fn namespace_uri(&self) -> StreamResult<Option<&str>> {
        Ok(self.element()?.namespace.as_deref())
    }

    pub fn prefix(&self) -> StreamResult<Option<&str>> {
        Ok(self.element()?.prefix.as_deref())
    }

    /// `prefix:local` as written in the source.
    pub fn qualified_name(&self) -> StreamResult<String> {
        Ok(self.element()?.qualified())
    }

    pub fn text(&self) -> StreamResult<&str> {
        self.cursor.text.as_deref().ok_or_else(|| {
            StreamError::IllegalState(format!("{} does not carry text", self.cursor.event))
        })
    }

    /// True for text events made only of XML whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.cursor.event.is_text() && self.cursor.text.as_deref().is_some_and(is_whitespace)
    }

    // ========== Attributes ==========

    fn attributes(&self) -> StreamResult<&[Attribute]> {
        if self.cursor.event != EventType::StartElement {
            return Err(StreamError::IllegalState(format!(
                "{} does not carry attributes",
                self.cursor.event
            )));
        }
        Ok(&self.cursor.attributes)
    }

    pub fn attribute_count(&self) -> StreamResult<usize> {
        Ok(self.attributes()?.len())
    }

    pub fn attribute(&self, index: usize) -> StreamResult<&Attribute> {
        let attributes = self.attributes()?;
        attributes.get(index).ok_or_else(|| {
            StreamError::IllegalState(format!(
                "attribute index {index} out of bounds ({} attributes)",
                attributes.len()
            ))
        })
    }

    /// Attribute value by namespace URI and local name; the prefix is ignored.
    ///
    /// `None` as namespace matches any namespace, `Some("")` only attributes
    /// without one.
    pub fn attribute_value(
        &self,
        namespace: Option<&str>,
        local_name: &str,
    ) -> StreamResult<Option<&str>> {
        Ok(self
            .attributes()?
            .iter()
            .find(|attr| {
                attr.local_name == local_name
                    && namespace.map_or(true, |ns| attr.namespace.as_deref().unwrap_or("") == ns)
            })
            .map(|attr| attr.value.as_str()))
    }

    // ========== Namespaces ==========

    /// Namespaces declared on the current start tag, or going out of scope
    /// at the current end tag.
    fn bindings(&self) -> StreamResult<&[NamespaceBinding]> {
        match self.scopes.last() {
            Some(scope) if self.cursor.event.is_element() => Ok(&scope.bindings),
            _ => Err(StreamError::IllegalState(format!(
                "{} does not carry namespace declarations",
                self.cursor.event
            ))),
        }
    }

    pub fn namespace_count(&self) -> StreamResult<usize> {
        Ok(self.bindings()?.len())
    }

    pub fn namespace(&self, index: usize) -> StreamResult<&NamespaceBinding> {
        let bindings = self.bindings()?;
        bindings.get(index).ok_or_else(|| {
            StreamError::IllegalState(format!(
                "namespace index {index} out of bounds ({} declarations)",
                bindings.len()
            ))
        })
    }

    /// URI bound to `prefix` in the current scope; `None` or `""` is the default namespace.
    pub fn namespace_uri_for(&self, prefix: Option<&str>) -> Option<&str> {
        let prefix = prefix.filter(|p| !p.is_empty());
        match prefix {
            Some("xml") => return Some(XML_NAMESPACE),
            Some("xmlns") => return Some(XMLNS_NAMESPACE),
            _ => {}
        }
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.bindings.iter().rev())
            .find(|binding| binding.prefix.as_deref() == prefix)
            .map(|binding| binding.uri.as_str())
            // xmlns="" undeclares the default namespace
            .filter(|uri| !uri.is_empty())
    }
}

fn stream_error(err: quick_xml::Error) -> StreamError {
    match err {
        quick_xml::Error::Io(io) => StreamError::Io(io::Error::new(io.kind(), io.to_string())),
        other => malformed(other),
    }
}

fn malformed(err: impl fmt::Display) -> StreamError {
    StreamError::Malformed(err.to_string())
}

/// Decode bytes the transcoder already guaranteed to be UTF-8.
fn utf8(bytes: &[u8]) -> StreamResult<&str> {
    str::from_utf8(bytes).map_err(|e| StreamError::Malformed(format!("invalid UTF-8: {e}")))
}

fn is_whitespace(text: &str) -> bool {
    text.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(xml: &str) -> XmlStreamReader<'_> {
        XmlStreamReader::from_reader(xml.as_bytes(), &ParserConfig::new()).unwrap()
    }

    fn trace(reader: &mut XmlStreamReader<'_>) -> Vec<EventType> {
        let mut events = Vec::new();
        while reader.event_type() != EventType::EndDocument {
            events.push(reader.next().unwrap());
        }
        events
    }

    #[test]
    fn test_declaration_consumed() {
        let r = reader("<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>");
        assert_eq!(r.event_type(), EventType::StartDocument);
        assert_eq!(r.version(), Some("1.0"));
        assert_eq!(r.encoding(), Some("UTF-8"));
    }

    #[test]
    fn test_empty_element_expanded() {
        let mut r = reader("<a/>");
        assert_eq!(
            trace(&mut r),
            vec![EventType::StartElement, EventType::EndElement, EventType::EndDocument]
        );
    }

    #[test]
    fn test_coalescing_merges_cdata() {
        let mut r = reader("<a>x<![CDATA[<y>]]>z</a>");
        r.next().unwrap();
        assert_eq!(r.next().unwrap(), EventType::Characters);
        assert_eq!(r.text().unwrap(), "x<y>z");
        assert_eq!(r.next().unwrap(), EventType::EndElement);
    }

    #[test]
    fn test_cdata_without_coalescing() {
        let config = ParserConfig::new().with(keys::COALESCING, false);
        let mut r = XmlStreamReader::from_reader("<a>x<![CDATA[y]]></a>".as_bytes(), &config).unwrap();
        assert_eq!(
            trace(&mut r),
            vec![
                EventType::StartElement,
                EventType::Characters,
                EventType::CData,
                EventType::EndElement,
                EventType::EndDocument,
            ]
        );
    }

    #[test]
    fn test_end_element_keeps_scope() {
        let mut r = reader("<p:a xmlns:p=\"urn:p\"></p:a>");
        r.next().unwrap();
        assert_eq!(r.next().unwrap(), EventType::EndElement);
        assert_eq!(r.local_name().unwrap(), "a");
        assert_eq!(r.namespace_uri().unwrap(), Some("urn:p"));
        assert_eq!(r.namespace_count().unwrap(), 1);
        assert_eq!(r.qualified_name().unwrap(), "p:a");
    }

    #[test]
    fn test_failed_advance_keeps_end_element_scope() {
        let mut r = reader("<a><q:b xmlns:q=\"urn:q\"></q:b></c>");
        r.next().unwrap();
        r.next().unwrap();
        assert_eq!(r.next().unwrap(), EventType::EndElement);
        assert!(matches!(r.next(), Err(StreamError::Malformed(_))));
        assert_eq!(r.event_type(), EventType::EndElement);
        assert_eq!(r.local_name().unwrap(), "b");
        assert_eq!(r.namespace_uri().unwrap(), Some("urn:q"));
        assert_eq!(r.namespace_uri_for(Some("q")), Some("urn:q"));
    }

    #[test]
    fn test_read_ahead_failure_is_deferred() {
        let mut r = reader("<a>hello</b>");
        r.next().unwrap();
        assert_eq!(r.next().unwrap(), EventType::Characters);
        assert_eq!(r.text().unwrap(), "hello");
        assert!(matches!(r.next(), Err(StreamError::Malformed(_))));
        assert_eq!(r.event_type(), EventType::Characters);
    }

    #[test]
    fn test_text_location_excludes_next_markup() {
        let mut r = reader("<a>\n  <b>xy</b>\n</a>");
        let mut positions = Vec::new();
        while r.next().unwrap() != EventType::EndDocument {
            let Location { line, column } = r.location();
            positions.push((r.event_type(), line, column));
        }
        assert_eq!(
            positions,
            vec![
                (EventType::StartElement, 1, 4),
                (EventType::Characters, 2, 3),
                (EventType::StartElement, 2, 6),
                (EventType::Characters, 2, 8),
                (EventType::EndElement, 2, 12),
                (EventType::Characters, 3, 1),
                (EventType::EndElement, 3, 5),
            ]
        );
    }

    #[test]
    fn test_next_tag_skips_comments() {
        let mut r = reader("<a>\n  <!-- note -->\n  <b/></a>");
        assert_eq!(r.next_tag().unwrap(), EventType::StartElement);
        assert_eq!(r.next_tag().unwrap(), EventType::StartElement);
        assert_eq!(r.local_name().unwrap(), "b");
    }

    #[test]
    fn test_unclosed_element() {
        let mut r = reader("<a><b></b>");
        r.next().unwrap();
        r.next().unwrap();
        r.next().unwrap();
        assert!(matches!(
            r.next(),
            Err(StreamError::UnexpectedEof(_) | StreamError::Malformed(_))
        ));
    }

    #[test]
    fn test_two_roots() {
        let mut r = reader("<a/><b/>");
        r.next().unwrap();
        r.next().unwrap();
        assert!(matches!(r.next(), Err(StreamError::Malformed(_))));
    }

    #[test]
    fn test_no_more_events() {
        let mut r = reader("<a/>");
        trace(&mut r);
        assert!(matches!(r.next(), Err(StreamError::NoMoreEvents)));
    }

    #[test]
    fn test_unknown_encoding() {
        let result = XmlStreamReader::from_stream(&b"<a/>"[..], "klingon", &ParserConfig::new());
        assert!(matches!(result, Err(StreamError::Encoding(_))));
    }
}
