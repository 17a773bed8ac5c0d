//! XML property-list encoding and decoding.
//!
//! Only the types a launchd job can carry are supported: `dict`, `array`,
//! `string`, `integer`, `real`, `true` and `false`.

use std::fmt::Write as _;

use super::value::{Dictionary, Value};
use crate::error::{LaunchctlError, Result};

const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n\
<plist version=\"1.0\">\n";

const INDENT: &str = "    ";

/// Render a dictionary as a complete XML property-list document.
pub fn to_xml(dict: &Dictionary) -> String {
    let mut out = String::from(HEADER);
    write_dictionary(&mut out, dict, 0);
    out.push_str("</plist>\n");
    out
}

fn pad(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_dictionary(out: &mut String, dict: &Dictionary, depth: usize) {
    pad(out, depth);
    if dict.is_empty() {
        out.push_str("<dict/>\n");
        return;
    }
    out.push_str("<dict>\n");
    for (key, value) in dict {
        pad(out, depth + 1);
        let _ = writeln!(out, "<key>{}</key>", escape_xml(key));
        write_value(out, value, depth + 1);
    }
    pad(out, depth);
    out.push_str("</dict>\n");
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Dictionary(dict) => write_dictionary(out, dict, depth),
        Value::Array(items) => {
            pad(out, depth);
            if items.is_empty() {
                out.push_str("<array/>\n");
                return;
            }
            out.push_str("<array>\n");
            for item in items {
                write_value(out, item, depth + 1);
            }
            pad(out, depth);
            out.push_str("</array>\n");
        }
        Value::Boolean(b) => {
            pad(out, depth);
            out.push_str(if *b { "<true/>\n" } else { "<false/>\n" });
        }
        Value::Integer(i) => {
            pad(out, depth);
            let _ = writeln!(out, "<integer>{}</integer>", i);
        }
        Value::Real(r) => {
            pad(out, depth);
            let _ = writeln!(out, "<real>{}</real>", r);
        }
        Value::String(s) => {
            pad(out, depth);
            let _ = writeln!(out, "<string>{}</string>", escape_xml(s));
        }
    }
}

/// Escape special characters for XML.
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn unescape_xml(s: &str) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let semi = tail
            .find(';')
            .ok_or_else(|| malformed("unterminated entity"))?;
        let entity = &tail[1..semi];
        let decoded = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32)
                    .ok_or_else(|| malformed(&format!("unknown entity &{};", entity)))?
            }
        };
        out.push(decoded);
        rest = &tail[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn malformed(reason: &str) -> LaunchctlError {
    LaunchctlError::InvalidArgument(format!("malformed property list: {}", reason))
}

/// Parse an XML property list whose root element is a dictionary.
pub fn parse(input: &str) -> Result<Dictionary> {
    let mut parser = Parser {
        src: input,
        pos: 0,
        depth: 0,
    };
    parser.skip_misc();
    let mut tag = parser.read_tag()?;
    let wrapped = tag.name == "plist" && tag.kind == TagKind::Open;
    if wrapped {
        parser.skip_misc();
        tag = parser.read_tag()?;
    }
    let root = parser.parse_value(tag)?;
    if wrapped {
        parser.skip_misc();
        parser.expect_close("plist")?;
    }
    parser.skip_misc();
    if parser.pos < parser.src.len() {
        return Err(malformed("trailing content after root element"));
    }
    match root {
        Value::Dictionary(dict) => Ok(dict),
        _ => Err(malformed("root element must be a dict")),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum TagKind {
    Open,
    Close,
    Empty,
}

#[derive(Debug)]
struct Tag<'a> {
    name: &'a str,
    kind: TagKind,
}

/// Deepest array/dict nesting `parse` accepts.
const MAX_DEPTH: usize = 256;

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Skip whitespace, processing instructions, comments and the doctype.
    fn skip_misc(&mut self) {
        loop {
            let trimmed = self.rest().trim_start();
            self.pos = self.src.len() - trimmed.len();
            let terminator = if trimmed.starts_with("<?") {
                "?>"
            } else if trimmed.starts_with("<!--") {
                "-->"
            } else if trimmed.starts_with("<!") {
                ">"
            } else {
                return;
            };
            match trimmed.find(terminator) {
                Some(end) => self.pos += end + terminator.len(),
                None => {
                    self.pos = self.src.len();
                    return;
                }
            }
        }
    }

    fn read_tag(&mut self) -> Result<Tag<'a>> {
        let rest = self.rest();
        if !rest.starts_with('<') {
            return Err(malformed("expected an element"));
        }
        let end = rest.find('>').ok_or_else(|| malformed("unterminated element"))?;
        let body = rest[1..end].trim();
        self.pos += end + 1;

        let (body, kind) = if let Some(name) = body.strip_prefix('/') {
            (name.trim(), TagKind::Close)
        } else if let Some(name) = body.strip_suffix('/') {
            (name.trim(), TagKind::Empty)
        } else {
            (body, TagKind::Open)
        };
        let name = body.split_whitespace().next().unwrap_or_default();
        Ok(Tag { name, kind })
    }

    fn read_text(&mut self) -> Result<String> {
        let rest = self.rest();
        let end = rest.find('<').ok_or_else(|| malformed("unterminated text"))?;
        self.pos += end;
        unescape_xml(&rest[..end])
    }

    fn expect_close(&mut self, name: &str) -> Result<()> {
        let tag = self.read_tag()?;
        if tag.kind == TagKind::Close && tag.name == name {
            Ok(())
        } else {
            Err(malformed(&format!("expected </{}>", name)))
        }
    }

    fn scalar_text(&mut self, name: &str) -> Result<String> {
        let text = self.read_text()?;
        self.expect_close(name)?;
        Ok(text)
    }

    fn parse_value(&mut self, tag: Tag<'a>) -> Result<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(malformed("nesting too deep"));
        }
        self.depth += 1;
        let value = self.parse_element(tag);
        self.depth -= 1;
        value
    }

    fn parse_element(&mut self, tag: Tag<'a>) -> Result<Value> {
        match (tag.name, tag.kind) {
            ("true", TagKind::Empty) => Ok(Value::Boolean(true)),
            ("false", TagKind::Empty) => Ok(Value::Boolean(false)),
            ("string", TagKind::Empty) => Ok(Value::String(String::new())),
            ("string", TagKind::Open) => Ok(Value::String(self.scalar_text("string")?)),
            ("integer", TagKind::Open) => {
                let text = self.scalar_text("integer")?;
                text.trim()
                    .parse()
                    .map(Value::Integer)
                    .map_err(|_| malformed(&format!("bad integer {:?}", text)))
            }
            ("real", TagKind::Open) => {
                let text = self.scalar_text("real")?;
                text.trim()
                    .parse()
                    .map(Value::Real)
                    .map_err(|_| malformed(&format!("bad real {:?}", text)))
            }
            ("array", TagKind::Empty) => Ok(Value::Array(Vec::new())),
            ("array", TagKind::Open) => {
                let mut items = Vec::new();
                loop {
                    self.skip_misc();
                    let tag = self.read_tag()?;
                    if tag.kind == TagKind::Close && tag.name == "array" {
                        return Ok(Value::Array(items));
                    }
                    items.push(self.parse_value(tag)?);
                }
            }
            ("dict", TagKind::Empty) => Ok(Value::Dictionary(Dictionary::new())),
            ("dict", TagKind::Open) => {
                let mut dict = Dictionary::new();
                loop {
                    self.skip_misc();
                    let tag = self.read_tag()?;
                    let key = match (tag.name, tag.kind) {
                        ("dict", TagKind::Close) => return Ok(Value::Dictionary(dict)),
                        ("key", TagKind::Open) => self.scalar_text("key")?,
                        ("key", TagKind::Empty) => String::new(),
                        _ => return Err(malformed("expected <key> inside <dict>")),
                    };
                    self.skip_misc();
                    let value_tag = self.read_tag()?;
                    let value = self.parse_value(value_tag)?;
                    dict.insert(key, value);
                }
            }
            (name, _) => Err(malformed(&format!("unsupported element <{}>", name))),
        }
    }
}
