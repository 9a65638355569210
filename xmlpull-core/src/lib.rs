//! XmlPull Core
//!
//! XmlPull-style pull parser over a StAX-style streaming XML reader.
//! The caller drives the cursor (`next`, `next_tag`, `next_text`) and inspects
//! the current event; nothing is built in memory beyond the current event and
//! the open namespace scopes.
//!
//! # Architecture
//!
//! - **parser.rs** - `PullParser`: XmlPull contract, state machine, error translation
//! - **reader.rs** - `XmlStreamReader`: StAX cursor over quick-xml
//! - **source.rs** - Encoding transcoder and line/column tracking
//! - **config.rs** - Features and properties
//! - **event.rs** - Event type codes
//! - **error.rs** - Error kinds and unsupported capabilities

pub mod config;
pub mod error;
pub mod event;
pub mod parser;
pub mod reader;
pub mod source;

pub use config::{ParserConfig, PropertyValue, PROCESS_NAMESPACES};
pub use error::{Capability, Error, ErrorKind, Result};
pub use event::EventType;
pub use parser::PullParser;
pub use reader::{Attribute, NamespaceBinding, StreamError, XmlStreamReader};
pub use source::Location;
