//! XmlPull-style pull parser over [`XmlStreamReader`].
//!
//! The parser keeps no copy of the cursor: every query goes to the bound
//! reader. What it adds on top of the reader:
//!
//! - `next_tag`, `next_text` and the consuming `read_text`
//! - one error type for every reader failure
//! - explicit [`Capability`] errors for the parts of the contract it does not offer
//!
//! # States
//!
//! ```text
//! Unbound ──set_input──▶ StartDocument ──next──▶ In-Document ──next──▶ EndDocument
//!                                                     │
//!                                                     └──reader failure──▶ Failed
//! ```
//!
//! A failed parser still answers inspection calls (`event_type`, location,
//! names); every call that would advance returns [`Error::State`].
//!
//! # Example
//!
//! ```
//! use xmlpull_core::{EventType, PullParser};
//!
//! let mut parser = PullParser::new();
//! parser.set_input("<greeting lang=\"en\">hello</greeting>".as_bytes())?;
//! assert_eq!(parser.next_tag()?, EventType::StartElement);
//! assert_eq!(parser.attribute_value_ns(None, "lang")?, Some("en"));
//! assert_eq!(parser.next_text()?, "hello");
//! assert_eq!(parser.next()?, EventType::EndDocument);
//! # Ok::<(), xmlpull_core::Error>(())
//! ```

use std::fmt;
use std::io::{BufRead, Read};

use crate::config::{ParserConfig, PropertyValue};
use crate::error::{Capability, Error, Result};
use crate::event::EventType;
use crate::reader::{StreamError, XmlStreamReader};
use crate::source::Location;

/// Pull parser bound to at most one input.
pub struct PullParser<'i> {
    config: ParserConfig,
    reader: Option<XmlStreamReader<'i>>,
    /// Message of the reader failure that stopped the parser
    failure: Option<String>,
}

impl<'i> PullParser<'i> {
    /// Create an unbound parser with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::new())
    }

    /// Create an unbound parser owning `config`.
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            reader: None,
            failure: None,
        }
    }

    // ========== Configuration ==========

    fn check_unbound(&self) -> Result<()> {
        if self.reader.is_some() {
            return Err(Error::Configuration(
                "configuration is frozen once input is bound".into(),
            ));
        }
        Ok(())
    }

    /// Enable or disable a feature by XmlPull identifier.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] for unrecognized features, or once input is bound.
    pub fn set_feature(&mut self, id: &str, enabled: bool) -> Result<()> {
        self.check_unbound()?;
        self.config.set_feature(id, enabled)?;
        tracing::debug!(feature = id, enabled, "feature set");
        Ok(())
    }

    /// Current value of a feature; `false` when unknown or not boolean.
    pub fn feature(&self, id: &str) -> bool {
        self.config.feature(id)
    }

    /// Store an arbitrary property for the reader. Not validated.
    pub fn set_property(&mut self, name: &str, value: impl Into<PropertyValue>) -> Result<()> {
        self.check_unbound()?;
        self.config.set(name, value);
        Ok(())
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.config.get(name)
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    // ========== Binding ==========

    /// Bind to UTF-8 character input.
    ///
    /// # Errors
    ///
    /// [`Error::Binding`] if the prolog cannot be read, [`Error::State`] if
    /// the parser is already bound.
    pub fn set_input<R: BufRead + 'i>(&mut self, input: R) -> Result<()> {
        self.check_rebind()?;
        let reader = XmlStreamReader::from_reader(input, &self.config);
        self.attach(reader)
    }

    /// Bind to byte input in the encoding named by `encoding` (a WHATWG
    /// label such as `"UTF-8"`, `"ISO-8859-1"` or `"UTF-16LE"`).
    ///
    /// # Errors
    ///
    /// [`Error::Binding`] for unknown encodings and unreadable prologs,
    /// [`Error::State`] if the parser is already bound.
    pub fn set_input_stream<R: Read + 'i>(&mut self, input: R, encoding: &str) -> Result<()> {
        self.check_rebind()?;
        let reader = XmlStreamReader::from_stream(input, encoding, &self.config);
        self.attach(reader)
    }

    fn check_rebind(&self) -> Result<()> {
        match &self.reader {
            Some(reader) => Err(Error::state("parser is already bound to an input", reader.location())),
            None => Ok(()),
        }
    }

    fn attach(&mut self, reader: std::result::Result<XmlStreamReader<'i>, StreamError>) -> Result<()> {
        let reader = reader.map_err(|err| Error::Binding(err.to_string()))?;
        tracing::debug!(encoding = ?reader.encoding(), "input bound");
        self.reader = Some(reader);
        Ok(())
    }

    /// Encoding of the input: the explicit one for byte input, else the declared one.
    pub fn input_encoding(&self) -> Option<&str> {
        self.reader.as_ref().and_then(XmlStreamReader::encoding)
    }

    /// Version from the XML declaration, if there was one.
    pub fn xml_version(&self) -> Option<&str> {
        self.reader.as_ref().and_then(XmlStreamReader::version)
    }

    // ========== Reader Access ==========

    fn bound(&self) -> Result<&XmlStreamReader<'i>> {
        self.reader
            .as_ref()
            .ok_or_else(|| Error::state("no input bound to parser", Location::UNKNOWN))
    }

    /// The reader, if the parser may still advance.
    fn advancing(&mut self) -> Result<&mut XmlStreamReader<'i>> {
        let location = self.location();
        if let Some(failure) = &self.failure {
            return Err(Error::state(
                format!("parser cannot advance after an earlier failure: {failure}"),
                location,
            ));
        }
        self.reader
            .as_mut()
            .ok_or_else(|| Error::state("no input bound to parser", Location::UNKNOWN))
    }

    fn location(&self) -> Location {
        self.reader.as_ref().map_or(Location::UNKNOWN, XmlStreamReader::location)
    }

    /// Translate a reader error raised at the current location.
    fn translate(&self, err: StreamError) -> Error {
        let location = self.location();
        match err {
            StreamError::IllegalState(message) => Error::State { message, location },
            StreamError::NoMoreEvents => Error::State {
                message: err.to_string(),
                location,
            },
            other => Error::Syntax {
                message: other.to_string(),
                location,
            },
        }
    }

    /// Translate a reader failure during an advance, entering the failed state
    /// for anything but running off the end of the document.
    fn fail(&mut self, err: StreamError) -> Error {
        let error = self.translate(err);
        if let Error::Syntax { message, location } = &error {
            tracing::warn!(%location, message = %message, "parser failed");
            self.failure = Some(message.clone());
        }
        error
    }

    fn state_error(&self, message: impl Into<String>) -> Error {
        Error::state(message, self.location())
    }

    // ========== Introspection ==========

    pub fn event_type(&self) -> Result<EventType> {
        Ok(self.bound()?.event_type())
    }

    /// Whether a reader failure has stopped the parser.
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Reader location, e.g. `line 3, column 14`.
    pub fn position_description(&self) -> Result<String> {
        Ok(self.bound()?.location().to_string())
    }

    pub fn line_number(&self) -> Result<u64> {
        Ok(self.bound()?.location().line)
    }

    pub fn column_number(&self) -> Result<u64> {
        Ok(self.bound()?.location().column)
    }

    /// Always fails: the reader does not track nesting depth.
    pub fn depth(&self) -> Result<usize> {
        Err(Error::Unsupported(Capability::Depth))
    }

    /// Whether the current text event is whitespace only.
    ///
    /// # Errors
    ///
    /// [`Error::State`] unless the cursor is on CHARACTERS, CDATA or SPACE.
    pub fn is_whitespace(&self) -> Result<bool> {
        let reader = self.bound()?;
        if !reader.event_type().is_text() {
            return Err(self.state_error(format!(
                "whitespace check requires a text event, not {}",
                reader.event_type()
            )));
        }
        Ok(reader.is_whitespace())
    }

    // ========== Text ==========

    /// Text of the current event, without moving the cursor.
    pub fn text(&self) -> Result<&str> {
        self.bound()?.text().map_err(|err| self.translate(err))
    }

    /// Text of the current event; **advances the cursor** to the next event.
    ///
    /// One call consumes the text event. A failure while advancing is
    /// returned and the text is lost with it.
    pub fn read_text(&mut self) -> Result<String> {
        let text = self.text()?.to_owned();
        self.next()?;
        Ok(text)
    }

    /// Always fails: text is only available as `&str`.
    pub fn text_characters(&self) -> Result<(&[char], usize, usize)> {
        Err(Error::Unsupported(Capability::TextCharacters))
    }

    // ========== Element Names ==========

    /// Local name of the current start or end tag.
    pub fn name(&self) -> Result<&str> {
        self.bound()?.local_name().map_err(|err| self.translate(err))
    }

    /// Namespace URI of the current tag, empty when it has none.
    pub fn namespace(&self) -> Result<&str> {
        let uri = self.bound()?.namespace_uri().map_err(|err| self.translate(err))?;
        Ok(uri.unwrap_or(""))
    }

    pub fn prefix(&self) -> Result<Option<&str>> {
        self.bound()?.prefix().map_err(|err| self.translate(err))
    }

    /// Always fails: `<a/>` and `<a></a>` produce the same events.
    pub fn is_empty_element_tag(&self) -> Result<bool> {
        Err(Error::Unsupported(Capability::EmptyElementTag))
    }

    // ========== Namespaces ==========

    /// Number of namespace declarations on the current tag.
    pub fn namespace_count(&self) -> Result<usize> {
        self.bound()?.namespace_count().map_err(|err| self.translate(err))
    }

    /// Prefix of the `index`th declaration; `None` for the default namespace.
    pub fn namespace_prefix(&self, index: usize) -> Result<Option<&str>> {
        let binding = self.bound()?.namespace(index).map_err(|err| self.translate(err))?;
        Ok(binding.prefix.as_deref())
    }

    pub fn namespace_uri(&self, index: usize) -> Result<&str> {
        let binding = self.bound()?.namespace(index).map_err(|err| self.translate(err))?;
        Ok(&binding.uri)
    }

    /// URI bound to `prefix` in scope; `None` or `""` looks up the default namespace.
    pub fn namespace_for(&self, prefix: Option<&str>) -> Result<Option<&str>> {
        Ok(self.bound()?.namespace_uri_for(prefix))
    }

    // ========== Attributes ==========

    fn attribute(&self, index: usize) -> Result<&crate::reader::Attribute> {
        self.bound()?.attribute(index).map_err(|err| self.translate(err))
    }

    pub fn attribute_count(&self) -> Result<usize> {
        self.bound()?.attribute_count().map_err(|err| self.translate(err))
    }

    /// Namespace URI of the `index`th attribute, empty when it has none.
    pub fn attribute_namespace(&self, index: usize) -> Result<&str> {
        Ok(self.attribute(index)?.namespace.as_deref().unwrap_or(""))
    }

    /// Local name of the `index`th attribute.
    pub fn attribute_name(&self, index: usize) -> Result<&str> {
        Ok(&self.attribute(index)?.local_name)
    }

    pub fn attribute_prefix(&self, index: usize) -> Result<Option<&str>> {
        Ok(self.attribute(index)?.prefix.as_deref())
    }

    /// Declared type; always `CDATA` since no DTD is processed.
    pub fn attribute_type(&self, index: usize) -> Result<&'static str> {
        self.attribute(index)?;
        Ok("CDATA")
    }

    pub fn attribute_value(&self, index: usize) -> Result<&str> {
        Ok(&self.attribute(index)?.value)
    }

    /// Attribute value by namespace URI and local name, independent of prefix.
    ///
    /// `None` as namespace ignores namespaces, `Some("")` selects attributes
    /// without one. A missing attribute is `Ok(None)`.
    pub fn attribute_value_ns(&self, namespace: Option<&str>, name: &str) -> Result<Option<&str>> {
        self.bound()?
            .attribute_value(namespace, name)
            .map_err(|err| self.translate(err))
    }

    /// Always fails: no DTD, so no defaulted attributes to report.
    pub fn is_attribute_default(&self, _index: usize) -> Result<bool> {
        Err(Error::Unsupported(Capability::AttributeDefault))
    }

    // ========== Navigation ==========

    /// Advance one event and return its type.
    ///
    /// # Errors
    ///
    /// [`Error::Syntax`] for malformed input (the parser then stays failed),
    /// [`Error::State`] past END_DOCUMENT, after a failure, or when unbound.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<EventType> {
        let result = self.advancing()?.next();
        result.map_err(|err| self.fail(err))
    }

    /// Always fails: comments, PIs and entity references are not reported
    /// token by token.
    pub fn next_token(&mut self) -> Result<EventType> {
        Err(Error::Unsupported(Capability::NextToken))
    }

    /// Check the current event type and, when given, namespace and local name.
    /// No side effect.
    pub fn require(&self, event: EventType, namespace: Option<&str>, name: Option<&str>) -> Result<()> {
        self.bound()?
            .require(event, namespace, name)
            .map_err(|err| self.translate(err))
    }

    /// Advance to the next start or end tag, skipping whitespace-only text.
    ///
    /// # Errors
    ///
    /// [`Error::State`] ("expected start or end tag") when anything else is found.
    pub fn next_tag(&mut self) -> Result<EventType> {
        let mut event = self.next()?;
        while matches!(event, EventType::Characters | EventType::Space) && self.is_whitespace()? {
            event = self.next()?;
        }
        if !event.is_element() {
            return Err(self.state_error(format!("expected start or end tag, found {event}")));
        }
        Ok(event)
    }

    /// Read the text content of a text-only element.
    ///
    /// Must be called on a start tag; leaves the cursor on the matching end
    /// tag. Returns `""` for an empty element.
    pub fn next_text(&mut self) -> Result<String> {
        if self.event_type()? != EventType::StartElement {
            return Err(self.state_error("parser must be on start tag"));
        }
        match self.next()? {
            EventType::Characters | EventType::CData => {
                let text = self.text()?.to_owned();
                if self.next()? != EventType::EndElement {
                    return Err(self.state_error("event text must be followed by end tag"));
                }
                Ok(text)
            }
            EventType::EndElement => Ok(String::new()),
            other => Err(self.state_error(format!(
                "event must be on start tag to read text, found {other} inside the element"
            ))),
        }
    }

    /// Always fails: entity definitions are not supported.
    pub fn define_entity_replacement_text(&mut self, _name: &str, _text: &str) -> Result<()> {
        Err(Error::Unsupported(Capability::EntityReplacementText))
    }
}

impl Default for PullParser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PullParser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(reader) = &self.reader else {
            return f.write_str("unbound parser");
        };
        let location = reader.location();
        match reader.event_type() {
            EventType::StartDocument => f.write_str("document start"),
            EventType::EndDocument => f.write_str("document end"),
            EventType::StartElement => match reader.qualified_name() {
                Ok(name) => write!(f, "start element {name} at {location}"),
                Err(_) => write!(f, "start element at {location}"),
            },
            EventType::EndElement => match reader.qualified_name() {
                Ok(name) => write!(f, "end element {name} at {location}"),
                Err(_) => write!(f, "end element at {location}"),
            },
            event => match reader.text() {
                Ok(text) => write!(f, "{event}: {text}"),
                Err(_) => write!(f, "{event} at {location}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(xml: &str) -> PullParser<'_> {
        let mut parser = PullParser::new();
        parser.set_input(xml.as_bytes()).unwrap();
        parser
    }

    #[test]
    fn test_unbound_state() {
        let parser = PullParser::new();
        assert!(matches!(parser.event_type(), Err(Error::State { .. })));
        assert_eq!(parser.to_string(), "unbound parser");
        assert_eq!(parser.input_encoding(), None);
    }

    #[test]
    fn test_display() {
        let mut p = parser("<p:a xmlns:p=\"urn:p\">text</p:a>");
        assert_eq!(p.to_string(), "document start");
        p.next().unwrap();
        assert!(p.to_string().starts_with("start element p:a at line 1"));
        p.next().unwrap();
        assert_eq!(p.to_string(), "CHARACTERS: text");
        p.next().unwrap();
        assert!(p.to_string().starts_with("end element p:a at"));
        p.next().unwrap();
        assert_eq!(p.to_string(), "document end");
    }

    #[test]
    fn test_failure_is_sticky() {
        let mut p = parser("<a><b></c></a>");
        p.next().unwrap();
        p.next().unwrap();
        assert!(matches!(p.next(), Err(Error::Syntax { .. })));
        assert!(p.is_failed());
        assert!(matches!(p.next(), Err(Error::State { .. })));
        assert!(matches!(p.next_tag(), Err(Error::State { .. })));
        // Inspection keeps working
        assert_eq!(p.event_type().unwrap(), EventType::StartElement);
        assert_eq!(p.name().unwrap(), "b");
    }

    #[test]
    fn test_end_of_document_is_not_failure() {
        let mut p = parser("<a/>");
        while p.next().unwrap() != EventType::EndDocument {}
        assert!(matches!(p.next(), Err(Error::State { .. })));
        assert!(!p.is_failed());
    }
}
