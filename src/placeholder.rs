//! Placeholder handling for log message templates.
//!
//! Two pieces live here: exact-match token substitution (used both for
//! message placeholders and for the line template) and the parser that
//! decides which context entries act as placeholders for a message.

use crate::record::LogContext;
use std::collections::BTreeMap;

/// Prefixes that mark a context key as a message placeholder.
const PLACEHOLDER_PREFIXES: [char; 3] = ['@', '%', ':'];

/// Replace every occurrence of each token in `template` with its value.
///
/// At each position the longest matching token wins, substituted text is
/// never rescanned, and empty tokens are ignored. Text that matches no
/// token is copied unchanged.
pub fn substitute<'a, I>(template: &str, replacements: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut pairs: Vec<(&str, &str)> = replacements
        .into_iter()
        .filter(|(token, _)| !token.is_empty())
        .collect();
    if pairs.is_empty() {
        return template.to_string();
    }
    pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    'scan: while !rest.is_empty() {
        for (token, value) in &pairs {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(value);
                rest = tail;
                continue 'scan;
            }
        }

        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
        }
        rest = chars.as_str();
    }
    out
}

/// Collect the placeholder map for `message` from `context`.
///
/// PSR-3 style `{name}` placeholders are first rewritten in place to
/// `@name`, after which a context key `name` that appears as `@name` in
/// the message is promoted to `@name`. Only keys starting with `@`, `%`
/// or `:` end up in the returned map.
pub fn parse_message_placeholders(
    message: &mut String,
    context: &LogContext,
) -> BTreeMap<String, String> {
    let has_psr3 = match (message.find('{'), message.find('}')) {
        (Some(open), Some(close)) => close > open,
        _ => false,
    };
    if has_psr3 {
        *message = convert_psr3(message);
    }

    let mut variables = BTreeMap::new();
    for (key, value) in context.fields() {
        let mut key = key.clone();
        if has_psr3 && message.contains(&format!("@{key}")) {
            key = format!("@{key}");
        }
        if key.starts_with(PLACEHOLDER_PREFIXES) {
            variables.insert(key, LogContext::stringify(value));
        }
    }
    variables
}

/// Rewrite each `{name}` to `@name`. A brace pair never spans a newline.
fn convert_psr3(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(open) = rest.find('{') {
        let (before, from_open) = rest.split_at(open);
        out.push_str(before);
        let after_open = &from_open[1..];

        let line_end = after_open.find('\n').unwrap_or(after_open.len());
        match after_open[..line_end].find('}') {
            Some(close) => {
                out.push('@');
                out.push_str(&after_open[..close]);
                rest = &after_open[close + 1..];
            }
            None => {
                out.push('{');
                rest = after_open;
            }
        }
    }
    out.push_str(rest);
    out
}
