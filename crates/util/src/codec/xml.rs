use oembed_types::FieldMap;
use quick_xml::Reader;
use quick_xml::events::Event;
use serde_json::Value;

use super::{DecodeError, body_preview};

/// Decode an XML reply into a flat field mapping.
///
/// The root element is discarded whatever its name. Each direct child becomes
/// a field keyed by its local tag name; its value is the concatenated text
/// content, or `null` when the element is empty.
pub fn decode_xml(body: &[u8]) -> Result<FieldMap, DecodeError> {
    let text = std::str::from_utf8(body)?;
    let xml_error = |source: quick_xml::Error| DecodeError::Xml {
        source,
        body_preview: body_preview(body),
    };

    let mut reader = Reader::from_str(text);
    let mut fields = FieldMap::new();
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut current: Option<(String, String)> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => {
                depth += 1;
                saw_root = true;
                if depth == 2 {
                    let tag = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                    current = Some((tag, String::new()));
                }
            }
            Event::Empty(start) => {
                saw_root = true;
                if depth == 1 {
                    let tag = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                    fields.insert(tag, Value::Null);
                }
            }
            Event::End(_) => {
                if depth == 2
                    && let Some((tag, content)) = current.take()
                {
                    let value = if content.is_empty() {
                        Value::Null
                    } else {
                        Value::String(content)
                    };
                    fields.insert(tag, value);
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(text) => {
                if depth >= 2
                    && let Some((_, content)) = current.as_mut()
                {
                    content.push_str(&text.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(data) => {
                if depth >= 2
                    && let Some((_, content)) = current.as_mut()
                {
                    content.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(DecodeError::EmptyDocument);
    }
    Ok(fields)
}
