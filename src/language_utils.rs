use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Source and target languages are configuration inputs, never detected.
/// Backends accept tags such as `zh-CN`, so validation only looks at the
/// primary subtag while the full tag is passed through untouched.

/// ISO 639-2/B codes that differ from their ISO 639-2/T counterpart
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Primary language subtag of a tag like `zh-CN` or `pt_BR`, lowercased
pub fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Resolve a language tag to an isolang `Language`
pub fn resolve_language(code: &str) -> Result<Language> {
    let primary = primary_subtag(code);

    let language = match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => {
            let part2t = PART2B_TO_PART2T
                .iter()
                .find(|(b, _)| *b == primary)
                .map(|(_, t)| *t)
                .unwrap_or(primary.as_str());
            Language::from_639_3(part2t)
        }
        _ => None,
    };

    language.ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Validate a language tag, accepting an optional region subtag
pub fn validate_language_code(code: &str) -> Result<()> {
    resolve_language(code).map(|_| ())
}

/// Check if two language tags name the same language (regions ignored)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (resolve_language(code1), resolve_language(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// English display name for a language tag, used in prompts and headings
pub fn get_language_name(code: &str) -> Result<String> {
    Ok(resolve_language(code)?.to_name().to_string())
}
