//! CSV output.

use crate::domain::Message;

use super::{format_timestamp, RecordFormat};

const DELIMITER: char = ';';
const QUOTE: char = '"';

/// One row per message: id, date, address, body, flag. Every field is quoted.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormat;

impl RecordFormat for CsvFormat {
    const NAME: &'static str = "csv";

    fn write_record(&self, message: &Message, out: &mut String) {
        let fields = [
            message.id.to_string(),
            format_timestamp(message.timestamp),
            message.address.clone(),
            message.body.clone(),
            message.direction_flag.to_string(),
        ];

        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(DELIMITER);
            }
            push_quoted(field, out);
        }
        out.push('\n');
    }
}

/// Quotes a field, doubling embedded quote characters.
fn push_quoted(field: &str, out: &mut String) {
    out.push(QUOTE);
    for c in field.chars() {
        if c == QUOTE {
            out.push(QUOTE);
        }
        out.push(c);
    }
    out.push(QUOTE);
}
