//! Word-splitting shared by the case-conversion family (`camel_case`,
//! `pascal_case`, `snake_case`, `macro_case`, `kebab_case`). None of these
//! exist in the original implementation's `builtin_string.cpp` - only
//! `lower`/`upper`/`trim*`/`split`/`empty`/`append` do - so they're
//! written fresh here, in the same "operate on the whole string, return a
//! new one" style as the ones that are ported.

/// Splits `input` into words at `_`/`-`/whitespace separators and at
/// camelCase/PascalCase/ACRONYM boundaries (`HTTPServer` -> `HTTP`,
/// `Server`; `fooBar` -> `foo`, `Bar`).
pub fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = input.chars().collect();
    let n = chars.len();
    let mut i = 0;
    while i < n {
        let c = chars[i];
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            i += 1;
            continue;
        }
        if let Some(prev) = current.chars().last() {
            let boundary = if prev.is_lowercase() || prev.is_ascii_digit() {
                c.is_uppercase()
            } else if prev.is_uppercase() && c.is_uppercase() {
                i + 1 < n && chars[i + 1].is_lowercase()
            } else {
                false
            };
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
        i += 1;
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

pub fn to_camel_case(input: &str) -> String {
    let words = split_words(input);
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

pub fn to_pascal_case(input: &str) -> String {
    split_words(input).iter().map(|w| capitalize(w)).collect()
}

pub fn to_snake_case(input: &str) -> String {
    split_words(input).iter().map(|w| w.to_lowercase()).collect::<Vec<_>>().join("_")
}

pub fn to_macro_case(input: &str) -> String {
    split_words(input).iter().map(|w| w.to_uppercase()).collect::<Vec<_>>().join("_")
}

pub fn to_kebab_case(input: &str) -> String {
    split_words(input).iter().map(|w| w.to_lowercase()).collect::<Vec<_>>().join("-")
}

pub fn to_title_case(input: &str) -> String {
    split_words(input).iter().map(|w| capitalize(w)).collect::<Vec<_>>().join(" ")
}
