use easel_config::EmissionMethod;

use crate::error::{ImageGenError, Result};

/// Fallback `max-width`/`max-height` for the HTML form
const DEFAULT_HTML_EDGE: u32 = 512;

/// Everything an emission method needs to render one image
#[derive(Debug, Clone, Copy)]
pub struct Emission<'a> {
    /// Resolved reference: URL, host path or `data:` URI
    pub src: &'a str,
    pub alt: &'a str,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Render with the first method in `order` that succeeds
///
/// There is no fallback beyond the given order; when every method fails
/// the reasons are collected into one error.
pub fn emit(order: &[EmissionMethod], image: &Emission<'_>) -> Result<(EmissionMethod, String)> {
    let mut failures = Vec::new();

    for &method in order {
        tracing::debug!(%method, "trying emission method");

        match render(method, image) {
            Ok(output) => return Ok((method, output)),
            Err(reason) => {
                tracing::warn!(%method, reason, "emission method failed");
                failures.push(format!("{method}: {reason}"));
            }
        }
    }

    Err(ImageGenError::Emission(if failures.is_empty() {
        "no emission method enabled".to_string()
    } else {
        failures.join("; ")
    }))
}

/// Render a single representation
pub fn render(method: EmissionMethod, image: &Emission<'_>) -> std::result::Result<String, &'static str> {
    match method {
        EmissionMethod::Direct => direct(image),
        EmissionMethod::Markdown => markdown(image),
        EmissionMethod::Html => html(image),
    }
}

fn direct(image: &Emission<'_>) -> std::result::Result<String, &'static str> {
    if image.src.trim().is_empty() {
        return Err("empty image reference");
    }

    Ok(image.src.to_string())
}

fn markdown(image: &Emission<'_>) -> std::result::Result<String, &'static str> {
    check_scheme(image.src)?;

    if image.src.contains(['<', '>', '\n', '\r']) {
        return Err("reference cannot be written as a markdown link destination");
    }

    let destination = if image.src.contains([' ', '(', ')']) {
        format!("<{}>", image.src)
    } else {
        image.src.to_string()
    };

    Ok(format!("![{}]({destination})", escape_markdown_alt(image.alt)))
}

fn html(image: &Emission<'_>) -> std::result::Result<String, &'static str> {
    check_scheme(image.src)?;

    Ok(format!(
        "<img src=\"{}\" alt=\"{}\" style=\"max-width: {}px; max-height: {}px; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1);\">",
        escape_attribute(image.src),
        escape_attribute(image.alt),
        image.width.unwrap_or(DEFAULT_HTML_EDGE),
        image.height.unwrap_or(DEFAULT_HTML_EDGE),
    ))
}

/// Only web, inline image and host-relative references may be embedded
fn check_scheme(src: &str) -> std::result::Result<(), &'static str> {
    if src.trim().is_empty() {
        return Err("empty image reference");
    }

    let scheme = src
        .split_once(':')
        .map(|(scheme, _)| scheme)
        .filter(|scheme| {
            !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        });

    match scheme.map(str::to_ascii_lowercase).as_deref() {
        None | Some("http" | "https") => Ok(()),
        Some("data") if src.get(5..11).is_some_and(|kind| kind.eq_ignore_ascii_case("image/")) => Ok(()),
        Some(_) => Err("reference uses a scheme that cannot be embedded"),
    }
}

fn escape_markdown_alt(alt: &str) -> String {
    let mut escaped = String::with_capacity(alt.len());
    for c in alt.chars() {
        match c {
            '\\' | '[' | ']' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' | '\r' => escaped.push(' '),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
