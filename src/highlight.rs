//! ANSI syntax highlighting for markup shown in a terminal code view.

use std::sync::OnceLock;

use regex::{Captures, Regex};

const RESET: &str = "\x1b[0m";
const TAG: &str = "\x1b[36m";
const ATTR: &str = "\x1b[33m";
const VALUE: &str = "\x1b[32m";

fn tag_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)(</?)([A-Za-z][\w:.-]*)(.*?)(/?>)").ok())
        .as_ref()
}

fn attr_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"([\w:.-]+)(=)("[^"]*")"#).ok())
        .as_ref()
}

fn paint_attrs(body: &str) -> String {
    match attr_re() {
        Some(re) => re
            .replace_all(body, |c: &Captures<'_>| {
                format!("{ATTR}{}{RESET}{}{VALUE}{}{RESET}", &c[1], &c[2], &c[3])
            })
            .into_owned(),
        None => body.to_string(),
    }
}

/// Colour tag names, attribute names and attribute values.
pub fn highlight_markup(markup: &str) -> String {
    let Some(re) = tag_re() else {
        return markup.to_string();
    };
    re.replace_all(markup, |c: &Captures<'_>| {
        format!(
            "{TAG}{}{}{RESET}{}{TAG}{}{RESET}",
            &c[1],
            &c[2],
            paint_attrs(&c[3]),
            &c[4]
        )
    })
    .into_owned()
}

/// Remove the escape sequences added by [`highlight_markup`].
pub fn strip_ansi(text: &str) -> String {
    [RESET, TAG, ATTR, VALUE]
        .iter()
        .fold(text.to_string(), |acc, code| acc.replace(code, ""))
}

#[cfg(test)]
#[path = "../tests/rust/test_highlight.rs"]
mod tests;
