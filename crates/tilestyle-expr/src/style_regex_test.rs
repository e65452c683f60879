use super::{RegexError, StyleRegex};

#[test]
fn test_and_exec_use_first_group() {
    let regex = StyleRegex::new("^Chest(\\w+)", "").expect("regex");
    assert!(regex.test("Chesterfield"));
    assert!(!regex.test("Westchester"));
    assert_eq!(regex.exec("Chesterfield"), Some(Some("erfield")));
    assert_eq!(regex.exec("Leeds"), None);
}

#[test]
fn exec_reports_non_participating_group() {
    let regex = StyleRegex::new("a(b)?", "").expect("regex");
    assert_eq!(regex.exec("a"), Some(None));
}

#[test]
fn case_insensitive_flag_applies() {
    let regex = StyleRegex::new("^red$", "i").expect("regex");
    assert!(regex.test("RED"));
    assert_eq!(regex.flags(), "i");
}

#[test]
fn stateful_flags_are_accepted() {
    let regex = StyleRegex::new("a", "gy").expect("regex");
    assert!(regex.test("cat"));
    assert!(regex.test("cat"));
}

#[test]
fn rejects_unknown_and_duplicate_flags() {
    assert_eq!(
        StyleRegex::new("a", "x").expect_err("unknown flag"),
        RegexError::InvalidFlags("x".to_string())
    );
    assert_eq!(
        StyleRegex::new("a", "ii").expect_err("duplicate flag"),
        RegexError::InvalidFlags("ii".to_string())
    );
}

#[test]
fn rejects_invalid_patterns() {
    let err = StyleRegex::new("(", "").expect_err("unbalanced group");
    assert!(matches!(err, RegexError::InvalidPattern { .. }));
}

#[test]
fn displays_like_a_regex_literal() {
    assert_eq!(StyleRegex::new("a+", "i").expect("regex").to_string(), "/a+/i");
    assert_eq!(StyleRegex::new("", "").expect("regex").to_string(), "/(?:)/");
}

#[test]
fn equality_compares_source_and_flags() {
    let left = StyleRegex::new("a", "i").expect("regex");
    assert_eq!(left, StyleRegex::new("a", "i").expect("regex"));
    assert_ne!(left, StyleRegex::new("a", "").expect("regex"));
}
