//! Rewriter Test Utils

#![allow(dead_code)]

use element_query::rewriter::rewrite;
use regex::Regex;

pub fn rewrite_css(css: &str) -> String {
    rewrite(css).css
}

pub fn extract_css_content(css: &str) -> String {
    let re1 = Regex::new(r"^\n\s+").unwrap();
    let re2 = Regex::new(r"\n\s+$").unwrap();
    let re3 = Regex::new(r"\s+").unwrap();
    let re4 = Regex::new(r":\s").unwrap();
    let re5 = Regex::new(r" }").unwrap();
    let re6 = Regex::new(r"\{\s+").unwrap();
    let re7 = Regex::new(r"\s+\{").unwrap();

    let mut result = re1.replace(css, "").to_string();
    result = re2.replace(&result, "").to_string();
    result = re3.replace_all(&result, " ").to_string();
    result = re4.replace_all(&result, ":").to_string();
    result = re5.replace_all(&result, "}").to_string();
    result = re6.replace_all(&result, "{").to_string();
    result = re7.replace_all(&result, "{").to_string();
    result.trim().to_string()
}

pub fn assert_equal_css(actual: &str, expected: &str) {
    let actual_css = extract_css_content(actual);
    let expected_css = extract_css_content(expected);
    assert_eq!(
        actual_css, expected_css,
        "Expected '{}' to equal '{}'",
        actual_css, expected_css
    );
}

pub fn assert_not_contains(actual: &str, expected: &str) {
    assert!(
        !actual.contains(expected),
        "Expected '{}' to not contain '{}'",
        actual,
        expected
    );
}

/// Opening and closing braces must pair up, never going negative.
pub fn assert_balanced(css: &str) {
    let mut depth = 0i32;
    for ch in css.chars() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                assert!(depth >= 0, "unbalanced '}}' in '{}'", css);
            }
            _ => {}
        }
    }
    assert_eq!(depth, 0, "unclosed block in '{}'", css);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_css_content() {
        let css = "  \n  one { color: red; }  \n  ";
        let result = extract_css_content(css);
        assert_eq!(result, "one{color:red;}");
    }
}
