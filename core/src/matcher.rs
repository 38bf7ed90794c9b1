//! Decoding a keyed value from a single token.
//!
//! For a keyword form such as `-d`, a token can carry its value in four ways:
//!
//! | Token             | Form                       | Value   |
//! |-------------------|----------------------------|---------|
//! | `-d` `3.14`       | [`ValueForm::Whitespace`]  | `3.14`  |
//! | `-d=3.14`         | [`ValueForm::Equals`]      | `3.14`  |
//! | `-d:3.14`         | [`ValueForm::Colon`]       | `3.14`  |
//! | `-d3.14`          | [`ValueForm::Concatenated`]| `3.14`  |
//!
//! An exact token with no following token is not a match.

use crate::keyword::Keyword;

/// How a keyed value was spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueForm {
    /// Keyword and value are separate tokens.
    Whitespace,
    /// `keyword=value`
    Equals,
    /// `keyword:value`
    Colon,
    /// `keywordvalue`
    Concatenated,
}

impl ValueForm {
    /// Number of tokens consumed from the stream.
    pub fn consumed(self) -> usize {
        match self {
            Self::Whitespace => 2,
            Self::Equals | Self::Colon | Self::Concatenated => 1,
        }
    }
}

/// A successful decode of one token against one keyword form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Decoded<'t> {
    pub form: ValueForm,
    pub value: &'t str,
    /// Length of the keyword form that matched.
    pub matched_len: usize,
}

/// Classifies `token` against a single keyword spelling.
pub(crate) fn decode_form<'t>(form: &str, token: &'t str, next: Option<&'t str>) -> Option<Decoded<'t>> {
    if token == form {
        return next.map(|value| Decoded {
            form: ValueForm::Whitespace,
            value,
            matched_len: form.len(),
        });
    }

    let rest = token.strip_prefix(form).filter(|rest| !rest.is_empty())?;
    let (form_kind, value) = if let Some(value) = rest.strip_prefix('=') {
        (ValueForm::Equals, value)
    } else if let Some(value) = rest.strip_prefix(':') {
        (ValueForm::Colon, value)
    } else {
        (ValueForm::Concatenated, rest)
    };

    Some(Decoded {
        form: form_kind,
        value,
        matched_len: form.len(),
    })
}

/// Classifies `token` against a keyword, primary form first.
pub(crate) fn decode_keyword<'t>(
    keyword: &Keyword,
    token: &'t str,
    next: Option<&'t str>,
) -> Option<Decoded<'t>> {
    keyword
        .forms()
        .find_map(|form| decode_form(form, token, next))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(token: &str, next: Option<&'static str>) -> Option<(ValueForm, String)> {
        let keyword = Keyword::with_abbreviation("double", "d").normalized();
        decode_keyword(&keyword, token, next).map(|d| (d.form, d.value.to_string()))
    }

    #[test]
    fn test_whitespace_form_takes_next_token() {
        assert_eq!(
            decode("-d", Some("3.14")),
            Some((ValueForm::Whitespace, "3.14".into()))
        );
        assert_eq!(
            decode("--double", Some("3.14")),
            Some((ValueForm::Whitespace, "3.14".into()))
        );
    }

    #[test]
    fn test_whitespace_form_without_next_is_no_match() {
        assert_eq!(decode("-d", None), None);
    }

    #[test]
    fn test_separator_forms() {
        assert_eq!(decode("-d=3.14", None), Some((ValueForm::Equals, "3.14".into())));
        assert_eq!(decode("-d:3.14", None), Some((ValueForm::Colon, "3.14".into())));
        assert_eq!(
            decode("--double=1", None),
            Some((ValueForm::Equals, "1".into()))
        );
    }

    #[test]
    fn test_concatenated_form() {
        assert_eq!(
            decode("-d3.14", None),
            Some((ValueForm::Concatenated, "3.14".into()))
        );
        assert_eq!(
            decode("--doublex", None),
            Some((ValueForm::Concatenated, "x".into()))
        );
    }

    #[test]
    fn test_separator_with_empty_value() {
        assert_eq!(decode("-d=", None), Some((ValueForm::Equals, String::new())));
    }

    #[test]
    fn test_unrelated_tokens_do_not_match() {
        assert_eq!(decode("d", Some("x")), None);
        assert_eq!(decode("-x3", None), None);
        assert_eq!(decode("double", None), None);
    }

    #[test]
    fn test_primary_form_tried_first() {
        let keyword = Keyword::with_abbreviation("--dd", "--d");
        let decoded = decode_keyword(&keyword, "--dd7", None).unwrap();
        assert_eq!(decoded.matched_len, 4);
        assert_eq!(decoded.value, "7");
    }

    #[test]
    fn test_consumed_token_counts() {
        assert_eq!(ValueForm::Whitespace.consumed(), 2);
        assert_eq!(ValueForm::Colon.consumed(), 1);
    }
}
