//! Property-based tests for the case transforms.

use blueprint_templates::transforms::{
    apply_name_transforms, to_camel_case, to_kebab_case, to_pascal_case, to_snake_case,
    to_upper_snake_case,
};
use proptest::prelude::*;

/// Names made of letters and common separators, starting with a letter.
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z _-]{0,24}"
}

/// Text that cannot contain a `__..._name__` token.
fn token_free_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ./-]{0,40}"
}

proptest! {
    #[test]
    fn prop_pascal_case_starts_uppercase_without_separators(name in name_strategy()) {
        let pascal = to_pascal_case(&name);
        prop_assert!(pascal.chars().next().map(|c| c.is_uppercase()).unwrap_or(false));
        prop_assert!(!pascal.contains(['-', '_', ' ']));
    }

    #[test]
    fn prop_kebab_case_is_lowercase_and_hyphenated(name in name_strategy()) {
        let kebab = to_kebab_case(&name);
        prop_assert!(!kebab.chars().any(|c| c.is_uppercase()));
        prop_assert!(!kebab.contains(['_', ' ']));
        prop_assert!(!kebab.starts_with('-') && !kebab.ends_with('-'));
        prop_assert!(!kebab.contains("--"));
    }

    #[test]
    fn prop_camel_case_starts_lowercase(name in name_strategy()) {
        let camel = to_camel_case(&name);
        prop_assert!(camel.chars().next().map(|c| c.is_lowercase()).unwrap_or(false));
    }

    #[test]
    fn prop_snake_and_kebab_share_words(name in name_strategy()) {
        prop_assert_eq!(to_snake_case(&name).replace('_', "-"), to_kebab_case(&name));
        prop_assert_eq!(to_upper_snake_case(&name), to_snake_case(&name).to_uppercase());
    }

    #[test]
    fn prop_separated_transforms_are_stable(name in name_strategy()) {
        let kebab = to_kebab_case(&name);
        prop_assert_eq!(to_kebab_case(&kebab), kebab.clone());
        let snake = to_snake_case(&name);
        prop_assert_eq!(to_snake_case(&snake), snake.clone());
    }

    #[test]
    fn prop_name_transforms_leave_token_free_text_alone(
        text in token_free_text(),
        name in name_strategy(),
    ) {
        prop_assert_eq!(apply_name_transforms(&text, &name), text);
    }
}
