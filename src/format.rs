//! Pretty-printing of SVG markup for the code view.
//!
//! One element per line, two spaces per nesting level. A tag that does not
//! fit in [`PRINT_WIDTH`] columns is broken with one attribute per line.
//! Attribute values and text content are never altered.

use std::sync::OnceLock;

use regex::Regex;

pub const PRINT_WIDTH: usize = 60;
const INDENT: &str = "  ";

fn token_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->|<[^>]+>|[^<]+").ok())
        .as_ref()
}

fn tag_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)^<([/?!]?)([^\s/>?]+)(.*?)([/?]?)>$").ok())
        .as_ref()
}

fn attr_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"([^\s=]+)(?:\s*=\s*("[^"]*"|'[^']*'))?"#).ok())
        .as_ref()
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Open(&'a str),
    Close(&'a str),
    Empty(&'a str),
    Text(&'a str),
}

fn classify(raw: &str) -> Token<'_> {
    if !raw.starts_with('<') {
        return Token::Text(raw);
    }
    if raw.starts_with("</") {
        Token::Close(raw)
    } else if raw.ends_with("/>") || raw.starts_with("<?") || raw.starts_with("<!") {
        Token::Empty(raw)
    } else {
        Token::Open(raw)
    }
}

/// Break a long tag into `<name`, one line per attribute, and the closer.
fn wrap_tag(tag: &str, indent: &str) -> Option<String> {
    let caps = tag_re()?.captures(tag)?;
    let (bang, name, body, end) = (&caps[1], &caps[2], &caps[3], &caps[4]);
    let attrs: Vec<&str> = attr_re()?
        .find_iter(body)
        .map(|m| m.as_str())
        .collect();
    if attrs.len() < 2 {
        return None;
    }
    let mut out = format!("{indent}<{bang}{name}\n");
    for attr in attrs {
        out.push_str(&format!("{indent}{INDENT}{attr}\n"));
    }
    out.push_str(&format!("{indent}{end}>"));
    Some(out)
}

fn emit(out: &mut Vec<String>, depth: usize, tag: &str) {
    let indent = INDENT.repeat(depth);
    if indent.len() + tag.len() > PRINT_WIDTH {
        if let Some(wrapped) = wrap_tag(tag, &indent) {
            out.push(wrapped);
            return;
        }
    }
    out.push(format!("{indent}{tag}"));
}

/// Re-indent `markup`. Returns the input unchanged when it is not markup.
pub fn format_svg(markup: &str) -> String {
    let Some(tokens) = token_re() else {
        return markup.to_string();
    };

    let mut out = Vec::new();
    let mut depth = 0usize;
    for m in tokens.find_iter(markup) {
        match classify(m.as_str()) {
            Token::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    out.push(format!("{}{text}", INDENT.repeat(depth)));
                }
            }
            Token::Open(tag) => {
                emit(&mut out, depth, tag);
                depth += 1;
            }
            Token::Close(tag) => {
                depth = depth.saturating_sub(1);
                emit(&mut out, depth, tag);
            }
            Token::Empty(tag) => emit(&mut out, depth, tag),
        }
    }
    if out.is_empty() {
        return String::new();
    }
    let mut formatted = out.join("\n");
    formatted.push('\n');
    formatted
}

#[cfg(test)]
#[path = "../tests/rust/test_format.rs"]
mod tests;
