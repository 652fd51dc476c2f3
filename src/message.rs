//! Log message values: plain templates and renderable markup.

use crate::placeholder::substitute;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Error produced when a renderable value cannot produce its text.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("render failed: {0}")]
    Other(String),
}

/// A value that knows how to turn itself into final text.
///
/// Rendered text is considered fully resolved: the logger never applies
/// message placeholders to it. When `render` fails the logger falls back
/// to the value's `Debug` output.
pub trait Render: fmt::Debug + Send + Sync {
    fn render(&self) -> Result<String, RenderError>;
}

/// A log message or link as handed to the logger.
#[derive(Clone, Debug)]
pub enum Message {
    /// Template text; placeholders are substituted before emission.
    Text(String),
    /// Pre-rendered markup; placeholder substitution is skipped.
    Rendered(Arc<dyn Render>),
}

impl Message {
    pub fn rendered(value: impl Render + 'static) -> Self {
        Message::Rendered(Arc::new(value))
    }

    /// Resolve the message to text.
    ///
    /// **Parameters**
    /// - `placeholders`: token → value map, applied to `Text` only. An
    ///   empty map leaves the text untouched.
    ///
    /// **Returns**
    /// - The substituted template for `Text`.
    /// - The rendered output for `Rendered`, or its `Debug` form if
    ///   rendering failed.
    pub fn resolve(&self, placeholders: &BTreeMap<String, String>) -> String {
        match self {
            Message::Text(text) => substitute(
                text,
                placeholders.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            ),
            Message::Rendered(value) => value
                .render()
                .unwrap_or_else(|_| format!("{:?}", value)),
        }
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<Markup> for Message {
    fn from(markup: Markup) -> Self {
        Message::rendered(markup)
    }
}

impl From<Link> for Message {
    fn from(link: Link) -> Self {
        Message::rendered(link)
    }
}

/// Formattable markup: a template whose arguments are escaped on render.
///
/// Argument keys carry their treatment in the first character:
/// - `@name`: HTML-escaped.
/// - `%name`: HTML-escaped and wrapped in `<em class="placeholder">`.
/// - `:name`: treated as a URL; dangerous protocols are stripped, then
///   HTML-escaped.
///
/// Arguments with any other key are skipped; the rest still render.
#[derive(Clone, Debug, Default)]
pub struct Markup {
    template: String,
    args: BTreeMap<String, String>,
}

impl Markup {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            args: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }
}

impl Render for Markup {
    fn render(&self) -> Result<String, RenderError> {
        let mut resolved = BTreeMap::new();
        for (key, value) in &self.args {
            let text = match key.chars().next() {
                Some('@') => escape_html(value),
                Some('%') => format!("<em class=\"placeholder\">{}</em>", escape_html(value)),
                Some(':') => escape_html(&strip_dangerous_protocols(value)),
                _ => {
                    eprintln!("markup argument {:?} has no @, % or : prefix, skipping it", key);
                    continue;
                }
            };
            resolved.insert(key.as_str(), text);
        }
        Ok(substitute(
            &self.template,
            resolved.iter().map(|(k, v)| (*k, v.as_str())),
        ))
    }
}

/// A generated HTML anchor, as attached to log context for "operations"
/// links.
#[derive(Clone, Debug)]
pub struct Link {
    pub text: String,
    pub href: String,
}

impl Link {
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: href.into(),
        }
    }
}

impl Render for Link {
    fn render(&self) -> Result<String, RenderError> {
        Ok(format!(
            "<a href=\"{}\">{}</a>",
            escape_html(&strip_dangerous_protocols(&self.href)),
            escape_html(&self.text)
        ))
    }
}

const ALLOWED_PROTOCOLS: [&str; 13] = [
    "http", "https", "ftp", "news", "nntp", "tel", "telnet", "mailto", "irc", "ssh", "sftp",
    "webcal", "rtsp",
];

/// Remove URL schemes that are not on the allow-list, repeatedly, so that
/// `javascript:javascript:x` cannot survive a single pass.
fn strip_dangerous_protocols(uri: &str) -> String {
    let mut uri = uri.to_string();
    loop {
        let colon = match uri.find(':') {
            Some(colon) if colon > 0 => colon,
            _ => return uri,
        };
        let scheme = &uri[..colon];
        if scheme.contains(['/', '?', '#']) {
            return uri;
        }
        if ALLOWED_PROTOCOLS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(scheme.trim()))
        {
            return uri;
        }
        uri = uri[colon + 1..].to_string();
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Broken;

    impl Render for Broken {
        fn render(&self) -> Result<String, RenderError> {
            Err(RenderError::Other("no translation".into()))
        }
    }

    fn placeholders(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn text_applies_placeholders() {
        let msg = Message::from("User %uid failed");
        assert_eq!(msg.resolve(&placeholders(&[("%uid", "42")])), "User 42 failed");
    }

    #[test]
    fn rendered_skips_placeholders() {
        let msg = Message::from(Markup::new("Deleted @title"));
        let out = msg.resolve(&placeholders(&[("@title", "oops")]));
        assert_eq!(out, "Deleted @title");
    }

    #[test]
    fn markup_escapes_and_emphasizes() {
        let markup = Markup::new("Saved %type @title")
            .arg("%type", "page")
            .arg("@title", "Tom & <Jerry>");
        assert_eq!(
            markup.render().unwrap(),
            "Saved <em class=\"placeholder\">page</em> Tom &amp; &lt;Jerry&gt;"
        );
    }

    #[test]
    fn markup_skips_unprefixed_arguments() {
        let markup = Markup::new("Saved @title").arg("@title", "Home").arg("nid", "7");
        assert_eq!(markup.render().unwrap(), "Saved Home");
        assert_eq!(Message::from(markup).resolve(&BTreeMap::new()), "Saved Home");
    }

    #[test]
    fn url_arguments_lose_dangerous_protocols() {
        let markup = Markup::new(":url").arg(":url", "javascript:javascript:alert(1)");
        assert_eq!(markup.render().unwrap(), "alert(1)");

        let markup = Markup::new(":url").arg(":url", "https://example.com/?a=1");
        assert_eq!(markup.render().unwrap(), "https://example.com/?a=1");

        let markup = Markup::new(":url").arg(":url", "rtsp://cam/1");
        assert_eq!(markup.render().unwrap(), "rtsp://cam/1");

        let markup = Markup::new(":url").arg(":url", ":relative");
        assert_eq!(markup.render().unwrap(), ":relative");
    }

    #[test]
    fn link_renders_anchor() {
        let link = Link::new("view", "/node/1");
        assert_eq!(link.render().unwrap(), "<a href=\"/node/1\">view</a>");
    }

    #[test]
    fn render_failure_falls_back_to_debug() {
        let msg = Message::rendered(Broken);
        assert_eq!(msg.resolve(&BTreeMap::new()), "Broken");
    }
}
