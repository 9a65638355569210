//! Structural event types - the cursor positions a pull parser reports.
//!
//! The numeric codes are the ones used by StAX-style readers and the
//! XmlPull consumers layered on top of them, so `EventType::code()` values
//! can be exchanged with code that still speaks in integers.
//!
//! A typical element with text content moves the cursor through:
//! ```text
//! StartDocument
//! StartElement  <b>
//! Characters    hi
//! EndElement    </b>
//! EndDocument
//! ```

use std::fmt;

/// Structural event at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventType {
    // ========== Element Events ==========

    /// Start tag: `<name ...>` (empty elements report start then end)
    StartElement = 1,

    /// End tag: `</name>`
    EndElement = 2,

    // ========== Content Events ==========

    /// Processing instruction: `<?target data?>`
    ProcessingInstruction = 3,

    /// Character data, with entities replaced
    Characters = 4,

    /// Comment: `<!-- text -->`
    Comment = 5,

    /// Ignorable whitespace
    Space = 6,

    // ========== Document Events ==========

    /// Before the first event has been read
    StartDocument = 7,

    /// After the root element has been closed
    EndDocument = 8,

    // ========== Declaration Events ==========

    EntityReference = 9,
    Attribute = 10,

    /// Document type declaration: `<!DOCTYPE ...>`
    Dtd = 11,

    /// CDATA section: `<![CDATA[...]]>` (only when not coalescing)
    CData = 12,

    Namespace = 13,
    NotationDeclaration = 14,
    EntityDeclaration = 15,
}

impl EventType {
    /// Numeric event code.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up an event type by its numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            1 => Self::StartElement,
            2 => Self::EndElement,
            3 => Self::ProcessingInstruction,
            4 => Self::Characters,
            5 => Self::Comment,
            6 => Self::Space,
            7 => Self::StartDocument,
            8 => Self::EndDocument,
            9 => Self::EntityReference,
            10 => Self::Attribute,
            11 => Self::Dtd,
            12 => Self::CData,
            13 => Self::Namespace,
            14 => Self::NotationDeclaration,
            15 => Self::EntityDeclaration,
            _ => return None,
        })
    }

    /// Conventional upper-case name, as used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::StartElement => "START_ELEMENT",
            Self::EndElement => "END_ELEMENT",
            Self::ProcessingInstruction => "PROCESSING_INSTRUCTION",
            Self::Characters => "CHARACTERS",
            Self::Comment => "COMMENT",
            Self::Space => "SPACE",
            Self::StartDocument => "START_DOCUMENT",
            Self::EndDocument => "END_DOCUMENT",
            Self::EntityReference => "ENTITY_REFERENCE",
            Self::Attribute => "ATTRIBUTE",
            Self::Dtd => "DTD",
            Self::CData => "CDATA",
            Self::Namespace => "NAMESPACE",
            Self::NotationDeclaration => "NOTATION_DECLARATION",
            Self::EntityDeclaration => "ENTITY_DECLARATION",
        }
    }

    /// Check if this is a start or end tag.
    #[inline]
    pub fn is_element(self) -> bool {
        matches!(self, Self::StartElement | Self::EndElement)
    }

    /// Check if this is character content (the events `is_whitespace` applies to).
    #[inline]
    pub fn is_text(self) -> bool {
        matches!(self, Self::Characters | Self::CData | Self::Space)
    }

    /// Check if the cursor carries text at this event.
    #[inline]
    pub fn has_text(self) -> bool {
        self.is_text() || matches!(self, Self::Comment | Self::Dtd)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
