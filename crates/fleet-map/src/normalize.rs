//! Header and field-key normalization.

/// Tokens that spreadsheets use interchangeably with `id`.
const IDENTIFIER_SYNONYMS: [&str; 3] = ["number", "no", "#"];

/// Lowercases and strips every non-alphanumeric character.
///
/// `"PU date"` and `"pu_date"` both become `"pudate"`.
pub fn normalize_simple(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Splits a header into lowercase word tokens.
///
/// Separators are any non-alphanumeric character except `#`, which becomes
/// a token of its own. A lowercase letter or digit followed by an uppercase
/// letter starts a new token, so `loadNumber` yields `["load", "number"]`.
pub fn tokenize(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in raw.chars() {
        if c == '#' {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            tokens.push("#".to_string());
            prev_lower = false;
        } else if c.is_alphanumeric() {
            if c.is_uppercase() && prev_lower && !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            prev_lower = c.is_lowercase() || c.is_numeric();
            current.extend(c.to_lowercase());
        } else {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            prev_lower = false;
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Simple normalization after collapsing identifier synonyms into `id`.
///
/// `"Load Number"`, `"Load No"`, `"Load #"`, `"loadNumber"` and `"load_id"`
/// all become `"loadid"`.
pub fn normalize_identifier(raw: &str) -> String {
    tokenize(raw)
        .into_iter()
        .map(|token| {
            if IDENTIFIER_SYNONYMS.contains(&token.as_str()) {
                "id".to_string()
            } else {
                token
            }
        })
        .map(|token| normalize_simple(&token))
        .collect()
}
