//! Candidate wordlists

/// Built-in dictionary of common passwords, in attempt order
pub const DEFAULT_DICTIONARY: [&str; 14] = [
    "password",
    "123456",
    "qwerty",
    "admin",
    "root",
    "football",
    "starwars",
    "princess",
    "dragon",
    "shadow",
    "hunter2",
    "123456789",
    "iloveyou",
    "secret",
];

/// The built-in dictionary as owned strings
pub fn default_wordlist() -> Vec<String> {
    Vec::from(DEFAULT_DICTIONARY.map(String::from))
}

/// Split wordlist text into candidates
///
/// Lines end in `\n` or `\r\n`. Empty lines are dropped; order and
/// duplicates are kept.
pub fn parse_wordlist(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Use `custom` when it has any words, otherwise the built-in dictionary
pub fn or_default(custom: Vec<String>) -> Vec<String> {
    if custom.is_empty() {
        default_wordlist()
    } else {
        custom
    }
}
