// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Encode/decode the `<plist><dict><key/><string/>...</dict></plist>`
//! document to and from an order-preserving key/value map.

use indexmap::IndexMap;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fmt;

#[derive(Debug)]
pub struct PlistParseError(pub String);

impl fmt::Display for PlistParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed property list: {}", self.0)
    }
}

impl std::error::Error for PlistParseError {}

const DOCTYPE: &str = "<!DOCTYPE plist SYSTEM \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">";

/// Renders `properties` as a complete `Info.plist` document, insertion
/// order preserved.
pub fn encode(properties: &IndexMap<String, String>) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(DOCTYPE);
    out.push('\n');
    out.push_str("<plist><dict>\n");
    for (key, value) in properties {
        out.push_str("  <key>");
        out.push_str(&escape(key.as_str()));
        out.push_str("</key><string>");
        out.push_str(&escape(value.as_str()));
        out.push_str("</string>\n");
    }
    out.push_str("</dict></plist>\n");
    out
}

/// Parses an `Info.plist` document into an order-preserving map. Tolerates
/// the DOCTYPE being absent or differently worded; only `<key>`/`<string>`
/// pairs inside `<dict>` are significant.
pub fn decode(source: &str) -> Result<IndexMap<String, String>, PlistParseError> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut result = IndexMap::new();
    let mut pending_key: Option<String> = None;
    let mut in_key = false;
    let mut in_string = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(tag)) => match tag.local_name().as_ref() {
                b"key" => in_key = true,
                b"string" => in_string = true,
                _ => {}
            },
            Ok(Event::End(tag)) => match tag.local_name().as_ref() {
                b"key" => in_key = false,
                b"string" => {
                    in_string = false;
                    // An empty `<string></string>` produces no Text event;
                    // still record the key with an empty value so a
                    // previously-set property can be round-tripped to "".
                    if let Some(key) = pending_key.take() {
                        result.entry(key).or_insert_with(String::new);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(text)) => {
                let value = text.unescape().map_err(|e| PlistParseError(e.to_string()))?.into_owned();
                if in_key {
                    pending_key = Some(value);
                } else if in_string {
                    if let Some(key) = pending_key.as_ref() {
                        result.insert(key.clone(), value);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(PlistParseError(e.to_string())),
        }
        buf.clear();
    }

    Ok(result)
}

#[cfg(test)]
#[path = "plist_codec_tests.rs"]
mod tests;
