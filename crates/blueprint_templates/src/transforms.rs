//! Name and date transforms applied to template paths and contents.
//!
//! Word splitting follows the usual "change case" rules: words break on
//! delimiters, on lower-to-upper transitions, at the end of an acronym
//! (`XMLHttp` -> `XML`, `Http`) and between letters and digits. Apostrophes
//! are dropped before splitting so `don't` stays one word, and Latin letters
//! lose their diacritics (`Café` -> `Cafe`).

use chrono::{Datelike, NaiveDateTime, Timelike};
use regex::{NoExpand, Regex};
use unicode_normalization::UnicodeNormalization;

/// Literal token replaced by the raw (sanitized) name.
pub const NAME_TOKEN: &str = "__name__";

/// Case transforms available to template authors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseTransform {
    Kebab,
    Pascal,
    Snake,
    LowerDot,
    Camel,
    Upper,
    Lower,
    UpperSnake,
}

impl CaseTransform {
    /// Every transform, in the order name tokens are substituted.
    pub const ALL: [CaseTransform; 8] = [
        CaseTransform::Kebab,
        CaseTransform::Pascal,
        CaseTransform::Snake,
        CaseTransform::LowerDot,
        CaseTransform::Camel,
        CaseTransform::Upper,
        CaseTransform::Lower,
        CaseTransform::UpperSnake,
    ];

    /// Helper name used inside template contents, e.g. `{{kebabCase name}}`.
    pub fn helper_name(&self) -> &'static str {
        match self {
            CaseTransform::Kebab => "kebabCase",
            CaseTransform::Pascal => "pascalCase",
            CaseTransform::Snake => "snakeCase",
            CaseTransform::LowerDot => "lowerDotCase",
            CaseTransform::Camel => "camelCase",
            CaseTransform::Upper => "upperCase",
            CaseTransform::Lower => "lowerCase",
            CaseTransform::UpperSnake => "upperSnakeCase",
        }
    }

    /// Literal token used in file and folder names, e.g. `__kebabCase_name__`.
    pub fn name_token(&self) -> String {
        format!("__{}_name__", self.helper_name())
    }

    /// Apply the transform to a string.
    pub fn apply(&self, input: &str) -> String {
        match self {
            CaseTransform::Kebab => to_kebab_case(input),
            CaseTransform::Pascal => to_pascal_case(input),
            CaseTransform::Snake => to_snake_case(input),
            CaseTransform::LowerDot => to_lower_dot_case(input),
            CaseTransform::Camel => to_camel_case(input),
            CaseTransform::Upper => to_upper_case(input),
            CaseTransform::Lower => to_lower_case(input),
            CaseTransform::UpperSnake => to_upper_snake_case(input),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharKind {
    Upper,
    Lower,
    Digit,
    Delimiter,
}

fn char_kind(c: char) -> CharKind {
    if c.is_uppercase() {
        CharKind::Upper
    } else if c.is_numeric() {
        CharKind::Digit
    } else if c.is_alphabetic() {
        // Caseless scripts behave like lowercase letters.
        CharKind::Lower
    } else {
        CharKind::Delimiter
    }
}

/// Latin letters that have no canonical decomposition.
fn deburr_letter(c: char) -> Option<&'static str> {
    Some(match c {
        'Æ' => "Ae",
        'æ' => "ae",
        'Ð' | 'Đ' => "D",
        'ð' | 'đ' => "d",
        'Ħ' => "H",
        'ħ' => "h",
        'ı' => "i",
        'Ĳ' => "IJ",
        'ĳ' => "ij",
        'ĸ' => "k",
        'Ŀ' | 'Ł' => "L",
        'ŀ' | 'ł' => "l",
        'Ŋ' => "N",
        'ŋ' => "n",
        'Ø' => "O",
        'ø' => "o",
        'Œ' => "Oe",
        'œ' => "oe",
        'ß' => "ss",
        'ſ' => "s",
        'Þ' => "Th",
        'þ' => "th",
        'Ŧ' => "T",
        'ŧ' => "t",
        _ => return None,
    })
}

/// Combining diacritical marks, including the symbol and half-mark blocks.
fn is_diacritic(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036f}' | '\u{20d0}'..='\u{20ff}' | '\u{fe20}'..='\u{fe2f}')
}

/// Strip diacritics from Latin letters: `Crème brûlée` -> `Creme brulee`.
pub fn deburr(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.nfd() {
        if is_diacritic(c) {
            continue;
        }
        match deburr_letter(c) {
            Some(replacement) => output.push_str(replacement),
            None => output.push(c),
        }
    }
    output.nfc().collect()
}

/// Split a string into words.
pub fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = deburr(input)
        .chars()
        .filter(|c| *c != '\'' && *c != '\u{2019}')
        .collect();
    let kinds: Vec<CharKind> = chars.iter().map(|c| char_kind(*c)).collect();

    let mut words = Vec::new();
    let mut current = String::new();

    for i in 0..chars.len() {
        let kind = kinds[i];
        if kind == CharKind::Delimiter {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() {
            let prev = kinds[i - 1];
            let next = kinds.get(i + 1).copied();
            let boundary = match (prev, kind) {
                (CharKind::Lower, CharKind::Upper) => true,
                (CharKind::Digit, CharKind::Upper | CharKind::Lower) => true,
                (CharKind::Upper | CharKind::Lower, CharKind::Digit) => true,
                (CharKind::Upper, CharKind::Upper) => next == Some(CharKind::Lower),
                _ => false,
            };
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(chars[i]);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn capitalize(word: &str) -> String {
    upper_first(&word.to_lowercase())
}

fn join_lower(input: &str, separator: &str) -> String {
    split_words(input)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(separator)
}

/// `MyThing` -> `my-thing`.
pub fn to_kebab_case(input: &str) -> String {
    join_lower(input, "-")
}

/// `MyThing` -> `my_thing`.
pub fn to_snake_case(input: &str) -> String {
    join_lower(input, "_")
}

/// `my thing` -> `myThing`.
pub fn to_camel_case(input: &str) -> String {
    split_words(input)
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
        .collect()
}

/// `my thing` -> `MyThing`.
pub fn to_pascal_case(input: &str) -> String {
    upper_first(&to_camel_case(input))
}

/// `myThing` -> `MY THING`.
pub fn to_upper_case(input: &str) -> String {
    split_words(input)
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `MyThing` -> `my thing`.
pub fn to_lower_case(input: &str) -> String {
    join_lower(input, " ")
}

/// `myThing` -> `MY_THING`.
pub fn to_upper_snake_case(input: &str) -> String {
    to_snake_case(input).to_uppercase()
}

/// `MyThing` -> `my.thing`.
pub fn to_lower_dot_case(input: &str) -> String {
    to_snake_case(input).replace('_', ".")
}

/// Replace every literal occurrence of `token` in `text`.
///
/// The token is escaped before matching, so characters such as `$` or `.`
/// are never interpreted as pattern syntax.
pub fn substitute_all_occurrences(text: &str, token: &str, replacement: &str) -> String {
    if token.is_empty() {
        return text.to_string();
    }
    match Regex::new(&regex::escape(token)) {
        Ok(pattern) => pattern.replace_all(text, NoExpand(replacement)).into_owned(),
        Err(_) => text.replace(token, replacement),
    }
}

/// Substitute the nine name tokens (`__name__`, `__kebabCase_name__`, ...).
pub fn apply_name_transforms(text: &str, name: &str) -> String {
    if !text.contains("__") {
        return text.to_string();
    }
    let mut result = substitute_all_occurrences(text, NAME_TOKEN, name);
    for transform in CaseTransform::ALL {
        result = substitute_all_occurrences(&result, &transform.name_token(), &transform.apply(name));
    }
    result
}

/// Date components exposed to templates, keyed by their helper name.
///
/// Year is four digits, day-of-week is `0` (Sunday) to `6` unpadded, and
/// every other component is zero-padded to two digits.
pub fn date_components(date: &NaiveDateTime) -> [(&'static str, String); 7] {
    [
        ("currentYear", format!("{:04}", date.year())),
        ("currentMonth", format!("{:02}", date.month())),
        ("currentDate", format!("{:02}", date.day())),
        ("currentDay", date.weekday().num_days_from_sunday().to_string()),
        ("currentHour", format!("{:02}", date.hour())),
        ("currentMin", format!("{:02}", date.minute())),
        ("currentSec", format!("{:02}", date.second())),
    ]
}

/// Substitute `__currentYear__`, `__currentMonth__` and the other date tokens.
pub fn apply_date_transforms(text: &str, date: &NaiveDateTime) -> String {
    if !text.contains("__current") {
        return text.to_string();
    }
    date_components(date)
        .iter()
        .fold(text.to_string(), |acc, (key, value)| {
            substitute_all_occurrences(&acc, &format!("__{}__", key), value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reference_date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(1965, 10, 31)
            .unwrap()
            .and_hms_opt(22, 43, 54)
            .unwrap()
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("MY User Input"), vec!["MY", "User", "Input"]);
        assert_eq!(split_words("fooBar"), vec!["foo", "Bar"]);
        assert_eq!(split_words("XMLHttpRequest"), vec!["XML", "Http", "Request"]);
        assert_eq!(split_words("foo2bar"), vec!["foo", "2", "bar"]);
        assert_eq!(split_words("--foo__bar--"), vec!["foo", "bar"]);
        assert_eq!(split_words("don't stop"), vec!["dont", "stop"]);
        assert_eq!(split_words("CaféÜber"), vec!["Cafe", "Uber"]);
        assert!(split_words("").is_empty());
    }

    #[test]
    fn test_deburr() {
        assert_eq!(deburr("Crème brûlée"), "Creme brulee");
        assert_eq!(deburr("Straße Øre Æsir"), "Strasse Ore Aesir");
        assert_eq!(deburr("日本が"), "日本が");
        assert_eq!(to_kebab_case("café Déjà-vu"), "cafe-deja-vu");
        assert_eq!(to_pascal_case("łódź"), "Lodz");
    }

    #[test]
    fn test_case_conversions() {
        assert_eq!(to_kebab_case("MyThing"), "my-thing");
        assert_eq!(to_snake_case("MyThing"), "my_thing");
        assert_eq!(to_camel_case("my user input"), "myUserInput");
        assert_eq!(to_pascal_case("my user input"), "MyUserInput");
        assert_eq!(to_pascal_case("MY User Input"), "MyUserInput");
        assert_eq!(to_upper_case("myThing"), "MY THING");
        assert_eq!(to_lower_case("MyThing"), "my thing");
        assert_eq!(to_upper_snake_case("myThing"), "MY_THING");
        assert_eq!(to_lower_dot_case("MyThing"), "my.thing");
    }

    #[test]
    fn test_substitute_is_literal() {
        assert_eq!(substitute_all_occurrences("a.b.c", ".", "-"), "a-b-c");
        assert_eq!(substitute_all_occurrences("$1 and $1", "$1", "x"), "x and x");
        assert_eq!(substitute_all_occurrences("abc", "b", "$0"), "a$0c");
        assert_eq!(substitute_all_occurrences("abc", "", "z"), "abc");
    }

    #[test]
    fn test_apply_name_transforms() {
        let text = "__name__|__kebabCase_name__|__pascalCase_name__|__snakeCase_name__|\
                    __lowerDotCase_name__|__camelCase_name__|__upperCase_name__|\
                    __lowerCase_name__|__upperSnakeCase_name__";
        assert_eq!(
            apply_name_transforms(text, "MyThing"),
            "MyThing|my-thing|MyThing|my_thing|my.thing|myThing|MY THING|my thing|MY_THING"
        );
    }

    #[test]
    fn test_apply_name_transforms_without_tokens() {
        assert_eq!(apply_name_transforms("plain_text.md", "Foo"), "plain_text.md");
        assert_eq!(apply_name_transforms("__init__.py", "Foo"), "__init__.py");
    }

    #[test]
    fn test_apply_date_transforms() {
        let text = "__currentYear__-__currentMonth__-__currentDate__ \
                    __currentHour__:__currentMin__:__currentSec__ day __currentDay__";
        assert_eq!(
            apply_date_transforms(text, &reference_date()),
            "1965-10-31 22:43:54 day 0"
        );
    }

    #[test]
    fn test_date_components_are_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(7, 8, 9)
            .unwrap();
        let components = date_components(&date);
        let values: Vec<&str> = components.iter().map(|(_, v)| v.as_str()).collect();
        assert_eq!(values, vec!["2024", "03", "05", "2", "07", "08", "09"]);
    }

    #[test]
    fn test_transform_tokens() {
        assert_eq!(CaseTransform::Kebab.name_token(), "__kebabCase_name__");
        assert_eq!(CaseTransform::UpperSnake.helper_name(), "upperSnakeCase");
        assert_eq!(CaseTransform::ALL.len(), 8);
    }
}
