use std::sync::LazyLock;

use regex::Regex;

// Form validation presets. The patterns are deliberately strict about
// shape and loose about locale: names accept any Unicode letters.
const NAME_PATTERN: &str = r"^\p{L}+(?:['’\- ]\p{L}+)*$";
const PHONE_PATTERN: &str = r"^\+?[0-9](?:[0-9 ]*[0-9])?$";
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$";
const TEXT_PATTERN: &str = r".*\p{L}.*";

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(NAME_PATTERN).unwrap());
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(PHONE_PATTERN).unwrap());
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).unwrap());
static TEXT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(TEXT_PATTERN).unwrap());

/// Letters with optional apostrophe/hyphen/space separators ("Anne-Marie O'Neill").
pub fn is_valid_name(value: &str) -> bool {
    NAME_RE.is_match(value)
}

/// Digits with optional spaces and a leading `+`.
pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// At least one letter somewhere.
pub fn is_general_text(value: &str) -> bool {
    TEXT_RE.is_match(value)
}

/// Which password requirements a candidate misses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordWeakness {
    pub lowercase: bool,
    pub uppercase: bool,
    pub number: bool,
    pub special: bool,
    pub min_length: bool,
}

impl PasswordWeakness {
    pub fn ok(&self) -> bool {
        *self == PasswordWeakness::default()
    }
}

const PASSWORD_SPECIALS: &str = r#".,_#&?!%+$*=^"\/-><:{}|"#;

/// Check password strength: lower, upper, digit, special, eight characters.
pub fn check_password(password: &str) -> PasswordWeakness {
    PasswordWeakness {
        lowercase: !password.chars().any(|c| c.is_ascii_lowercase()),
        uppercase: !password.chars().any(|c| c.is_ascii_uppercase()),
        number: !password.chars().any(|c| c.is_ascii_digit()),
        special: !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)),
        min_length: password.chars().count() < 8,
    }
}
