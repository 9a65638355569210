//! Proptest generators for well-formed documents with a known event trace.

use proptest::prelude::*;
use xmlpull_core::EventType;

/// Element tree rendered to XML for property tests.
#[derive(Debug, Clone)]
pub enum Node {
    Element { name: String, children: Vec<Node> },
    Text(String),
}

impl Node {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Node::Element { name, children } if children.is_empty() => {
                out.push('<');
                out.push_str(name);
                out.push_str("/>");
            }
            Node::Element { name, children } => {
                out.push('<');
                out.push_str(name);
                out.push('>');
                for child in children {
                    child.render_into(out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            Node::Text(text) => {
                for c in text.chars() {
                    match c {
                        '&' => out.push_str("&amp;"),
                        '<' => out.push_str("&lt;"),
                        '>' => out.push_str("&gt;"),
                        c => out.push(c),
                    }
                }
            }
        }
    }

    /// Events a coalescing parser reports for this node: adjacent text
    /// children collapse into one CHARACTERS event.
    pub fn reference_trace(&self, events: &mut Vec<EventType>) {
        let Node::Element { children, .. } = self else {
            return;
        };
        events.push(EventType::StartElement);
        let mut in_text = false;
        for child in children {
            match child {
                Node::Text(_) if in_text => {}
                Node::Text(_) => {
                    events.push(EventType::Characters);
                    in_text = true;
                }
                element => {
                    element.reference_trace(events);
                    in_text = false;
                }
            }
        }
        events.push(EventType::EndElement);
    }

    /// Concatenated character data, in document order.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Element { children, .. } => children.iter().map(Node::text_content).collect(),
        }
    }
}

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,5}"
}

fn arb_node() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        "[a-z0-9 &<>]{1,12}".prop_map(Node::Text),
        name().prop_map(|name| Node::Element { name, children: Vec::new() }),
    ];
    leaf.prop_recursive(4, 32, 5, |inner| {
        (name(), prop::collection::vec(inner, 0..5))
            .prop_map(|(name, children)| Node::Element { name, children })
    })
}

/// A root element with arbitrary content.
pub fn arb_document() -> impl Strategy<Value = Node> {
    (name(), prop::collection::vec(arb_node(), 0..5))
        .prop_map(|(name, children)| Node::Element { name, children })
}
