//! Plain text output.

use crate::domain::{Direction, Message};

use super::{format_timestamp, RecordFormat};

/// Separator written after every message.
const BANNER: &str = "---------";

/// One indented block per message, separated by a banner line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormat;

impl RecordFormat for TextFormat {
    const NAME: &'static str = "txt";

    fn write_record(&self, message: &Message, out: &mut String) {
        let label = match message.direction() {
            Direction::Incoming => "from",
            Direction::Outgoing => "to",
        };

        out.push('\n');
        out.push_str(&format!(
            "message {} {label} {}\n",
            message.id, message.address
        ));
        out.push_str(&format!("   {}\n", format_timestamp(message.timestamp)));
        out.push_str(&format!("   {}\n", message.body));
        out.push_str(BANNER);
        out.push('\n');
    }
}
