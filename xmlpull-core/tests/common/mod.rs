//! Test infrastructure for the pull parser
//!
//! Parser construction, event tracing, and document generators.

#![allow(unused)]

mod generators;

pub use generators::{arb_document, Node};

use xmlpull_core::{EventType, PullParser, Result};

/// Bind a parser with the default configuration to `xml`.
pub fn bind(xml: &str) -> PullParser<'_> {
    let mut parser = PullParser::new();
    parser.set_input(xml.as_bytes()).expect("bind");
    parser
}

/// Every event type up to and including END_DOCUMENT.
pub fn trace(xml: &str) -> Result<Vec<EventType>> {
    trace_parser(&mut bind(xml))
}

pub fn trace_parser(parser: &mut PullParser<'_>) -> Result<Vec<EventType>> {
    let mut events = Vec::new();
    loop {
        let event = parser.next()?;
        events.push(event);
        if event == EventType::EndDocument {
            return Ok(events);
        }
    }
}

/// Advance until the cursor is on the start tag named `name`.
pub fn advance_to(parser: &mut PullParser<'_>, name: &str) {
    loop {
        if parser.next().expect("advance") == EventType::StartElement && parser.name().unwrap() == name {
            return;
        }
    }
}
