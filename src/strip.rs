//! Markup tag removal for message and link text.

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    Tag { depth: usize, quote: Option<char> },
    Comment,
}

/// Remove markup tags from `input`, leaving all other text untouched.
///
/// A tag starts at `<` (unless the next character is whitespace) and ends
/// at the matching `>`. Inside a tag, quoted attribute values may contain
/// `>`, and nested `<`/`>` pairs are balanced. A `<` at the very end of
/// the input counts as an unterminated tag.
/// `<!-- ... -->` comments are removed whole. An unterminated tag drops the
/// remainder of the input. A lone `>` in text is kept.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut state = State::Text;
    let mut rest = input;

    while let Some(ch) = rest.chars().next() {
        rest = &rest[ch.len_utf8()..];
        state = match state {
            State::Text => {
                if ch != '<' {
                    out.push(ch);
                    State::Text
                } else if rest.chars().next().is_some_and(char::is_whitespace) {
                    out.push(ch);
                    State::Text
                } else if let Some(tail) = rest.strip_prefix("!--") {
                    rest = tail;
                    State::Comment
                } else {
                    State::Tag { depth: 0, quote: None }
                }
            }
            State::Tag { depth, quote: Some(q) } => {
                let quote = if ch == q { None } else { Some(q) };
                State::Tag { depth, quote }
            }
            State::Tag { depth, quote: None } => match ch {
                '"' | '\'' => State::Tag { depth, quote: Some(ch) },
                '<' => State::Tag { depth: depth + 1, quote: None },
                '>' if depth == 0 => State::Text,
                '>' => State::Tag { depth: depth - 1, quote: None },
                _ => State::Tag { depth, quote: None },
            },
            State::Comment => match rest.strip_prefix("->") {
                Some(tail) if ch == '-' => {
                    rest = tail;
                    State::Text
                }
                _ => State::Comment,
            },
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::strip_tags;

    #[test]
    fn removes_simple_tags() {
        assert_eq!(strip_tags("<script>alert(1)</script>"), "alert(1)");
        assert_eq!(
            strip_tags("Saved <em class=\"placeholder\">page</em>  twice"),
            "Saved page  twice"
        );
    }

    #[test]
    fn keeps_surrounding_whitespace() {
        assert_eq!(strip_tags(" a <br/>\tb "), " a \tb ");
    }

    #[test]
    fn quoted_gt_does_not_close_tag() {
        assert_eq!(strip_tags(r#"<a title="x>y" href='>'>link</a>"#), "link");
    }

    #[test]
    fn removes_comments() {
        assert_eq!(strip_tags("a<!-- <b> -- > -->b"), "ab");
    }

    #[test]
    fn unterminated_tag_drops_the_rest() {
        assert_eq!(strip_tags("ok <div class=\"x"), "ok ");
    }

    #[test]
    fn comparison_operators_survive() {
        assert_eq!(strip_tags("a < b and c > d"), "a < b and c > d");
        assert_eq!(strip_tags("<b>a</b> 3 > 2 <"), "a 3 > 2 ");
    }

    #[test]
    fn multibyte_text_is_preserved() {
        assert_eq!(strip_tags("<p>naïve café</p>"), "naïve café");
    }
}
