//! XML output.

use crate::domain::{Direction, Message, Result};

use super::{escape_markup, DocumentFormat};

/// A `<messages>` document with one `<message>` element per record.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlFormat;

impl DocumentFormat for XmlFormat {
    const NAME: &'static str = "xml";

    fn render(&self, messages: &[Message], encoding: &str) -> Result<String> {
        let mut out = format!("<?xml version=\"1.0\" encoding=\"{encoding}\"?>\n<messages>\n");

        for message in messages {
            let kind = match message.direction() {
                Direction::Incoming => "income",
                Direction::Outgoing => "outcome",
            };

            out.push_str(&format!(
                "  <message id=\"{}\" type=\"{kind}\" address=\"",
                message.id
            ));
            escape_attribute(&message.address, &mut out);
            out.push_str(&format!("\" date=\"{}\">", message.timestamp));
            escape_xml(&message.body, &mut out);
            out.push_str("</message>\n");
        }

        out.push_str("</messages>\n");
        Ok(out)
    }
}

/// Escapes markup and replaces characters XML 1.0 does not allow.
fn escape_xml(text: &str, out: &mut String) {
    if text.chars().all(is_xml_char) {
        escape_markup(text, out);
    } else {
        let cleaned: String = text
            .chars()
            .map(|c| if is_xml_char(c) { c } else { '\u{FFFD}' })
            .collect();
        escape_markup(&cleaned, out);
    }
}

/// Like [`escape_xml`], plus whitespace that attribute normalization would fold.
fn escape_attribute(text: &str, out: &mut String) {
    let mut escaped = String::with_capacity(text.len());
    escape_xml(text, &mut escaped);
    for c in escaped.chars() {
        match c {
            '\n' => out.push_str("&#10;"),
            '\t' => out.push_str("&#9;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
}

const fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}
