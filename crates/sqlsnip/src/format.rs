//! Enumeration rendering for listings and messages.
//!
//! Two rules coexist and are deliberately different:
//!
//! - **Plain** listings join names with `", "` and no conjunction. They are used
//!   wherever stored snippets or dependents are listed.
//! - **Candidate** enumerations quote every name and put `and ` before the last
//!   one. They are used when suggesting valid names after a lookup failed.

/// Shown by stored-snippet listings when the registry is empty.
pub const NO_STORED_SNIPPETS: &str = "There are no stored snippets";

/// Shown by candidate enumerations when the registry is empty.
pub const NO_AVAILABLE_SNIPPET: &str = "There is no available snippet.";

/// Join names with `", "`.
pub fn join_plain<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Join names with `", "`, except for the last one which follows ` and `.
///
/// `["a", "b", "c"]` renders as `a, b and c`.
pub fn join_with_final_and<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => format!("{} and {}", join_plain(init), last.as_ref()),
    }
}

/// Quote each name and prefix the last one with `and `.
///
/// Returns `None` for an empty list so that callers pick their own phrase.
/// Two names render as `'a', and 'b'`.
pub fn quoted_enumeration<S: AsRef<str>>(names: &[S]) -> Option<String> {
    match names {
        [] => None,
        [only] => Some(quote(only.as_ref())),
        [init @ .., last] => {
            let mut parts: Vec<String> = init.iter().map(|name| quote(name.as_ref())).collect();
            parts.push(format!("and {}", quote(last.as_ref())));
            Some(parts.join(", "))
        }
    }
}

/// `Stored snippets: a, b` or [`NO_STORED_SNIPPETS`].
pub fn describe_stored<S: AsRef<str>>(names: &[S]) -> String {
    if names.is_empty() {
        NO_STORED_SNIPPETS.to_string()
    } else {
        format!("Stored snippets: {}", join_plain(names))
    }
}

/// `Available snippets are 'a', and 'b'.` or [`NO_AVAILABLE_SNIPPET`].
pub fn describe_available<S: AsRef<str>>(names: &[S]) -> String {
    match quoted_enumeration(names) {
        Some(list) => format!("Available snippets are {list}."),
        None => NO_AVAILABLE_SNIPPET.to_string(),
    }
}

fn quote(name: &str) -> String {
    format!("'{name}'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], "")]
    #[case(&["high_price"], "high_price")]
    #[case(&["high_price", "high_price_a", "high_price_b"], "high_price, high_price_a, high_price_b")]
    fn test_join_plain(#[case] names: &[&str], #[case] expected: &str) {
        assert_eq!(join_plain(names), expected);
    }

    #[rstest]
    #[case(&[], "")]
    #[case(&["high_price"], "high_price")]
    #[case(&["high_price_a", "high_price"], "high_price_a and high_price")]
    #[case(&["high_price_a", "high_price_b", "high_price"], "high_price_a, high_price_b and high_price")]
    fn test_join_with_final_and(#[case] names: &[&str], #[case] expected: &str) {
        assert_eq!(join_with_final_and(names), expected);
    }

    #[test]
    fn test_quoted_enumeration_empty_is_none() {
        let names: [&str; 0] = [];
        assert_eq!(quoted_enumeration(&names), None);
    }

    #[rstest]
    #[case(&["high_price"], "'high_price'")]
    #[case(&["high_price", "high_price_a"], "'high_price', and 'high_price_a'")]
    #[case(
        &["high_price", "high_price_a", "high_price_b"],
        "'high_price', 'high_price_a', and 'high_price_b'"
    )]
    fn test_quoted_enumeration(#[case] names: &[&str], #[case] expected: &str) {
        assert_eq!(quoted_enumeration(names).as_deref(), Some(expected));
    }

    #[test]
    fn test_describe_stored() {
        let empty: [&str; 0] = [];
        assert_eq!(describe_stored(&empty), "There are no stored snippets");
        assert_eq!(
            describe_stored(&["high_price", "high_price_b"]),
            "Stored snippets: high_price, high_price_b"
        );
    }

    #[test]
    fn test_describe_available() {
        let empty: [&str; 0] = [];
        assert_eq!(describe_available(&empty), "There is no available snippet.");
        assert_eq!(
            describe_available(&["high_price"]),
            "Available snippets are 'high_price'."
        );
        assert_eq!(
            describe_available(&["high_price", "high_price_a", "high_price_b"]),
            "Available snippets are 'high_price', 'high_price_a', and 'high_price_b'."
        );
    }
}
