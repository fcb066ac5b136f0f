//! HTML output.

use crate::domain::{Direction, Message, Result};

use super::{escape_markup, format_timestamp, DocumentFormat};

const STYLESHEET: &str = r"body {
  font-family: -apple-system, Helvetica, Arial, sans-serif;
  background: #f2f2f7;
  margin: 0 auto;
  max-width: 640px;
  padding: 16px;
}
.message {
  border-radius: 14px;
  margin: 8px 0;
  padding: 8px 12px;
  max-width: 75%;
  clear: both;
}
.income {
  background: #e5e5ea;
  color: #000;
  float: left;
}
.outcome {
  background: #0b84ff;
  color: #fff;
  float: right;
}
.meta {
  font-size: 0.75em;
  opacity: 0.7;
  margin-bottom: 4px;
}
.body {
  white-space: pre-wrap;
  word-wrap: break-word;
}";

/// A standalone page with one styled block per message.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormat;

impl DocumentFormat for HtmlFormat {
    const NAME: &'static str = "html";

    fn render(&self, messages: &[Message], encoding: &str) -> Result<String> {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str(&format!("<meta charset=\"{encoding}\">\n"));
        out.push_str("<title>SMS export</title>\n");
        out.push_str(&format!("<style>\n{STYLESHEET}\n</style>\n"));
        out.push_str("</head>\n<body>\n");

        for message in messages {
            let class = match message.direction() {
                Direction::Incoming => "income",
                Direction::Outgoing => "outcome",
            };

            out.push_str(&format!(
                "<div class=\"message {class}\" id=\"message-{}\">\n",
                message.id
            ));
            out.push_str("  <div class=\"meta\"><span class=\"address\">");
            escape_markup(&message.address, &mut out);
            out.push_str(&format!(
                "</span> <span class=\"date\">{}</span></div>\n",
                format_timestamp(message.timestamp)
            ));
            out.push_str("  <div class=\"body\">");
            escape_markup(&message.body, &mut out);
            out.push_str("</div>\n</div>\n");
        }

        out.push_str("</body>\n</html>\n");
        Ok(out)
    }
}
