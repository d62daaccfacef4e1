/*!
 * Tests for language code utilities
 */

use papertrans::language_utils::{
    get_language_name, language_codes_match, primary_subtag, validate_language_code,
};

/// Test ISO 639-1 codes
#[test]
fn test_validate_language_code_withPart1Codes_shouldSucceed() {
    for code in ["en", "fr", "de", "zh", "ja", "es"] {
        assert!(validate_language_code(code).is_ok(), "{} should be valid", code);
    }
}

/// Test ISO 639-2 codes, both T and B forms
#[test]
fn test_validate_language_code_withPart2Codes_shouldSucceed() {
    for code in ["eng", "fra", "fre", "deu", "ger", "zho", "chi"] {
        assert!(validate_language_code(code).is_ok(), "{} should be valid", code);
    }
}

/// Test region subtags accepted by the backends
#[test]
fn test_validate_language_code_withRegionSubtags_shouldSucceed() {
    assert!(validate_language_code("zh-CN").is_ok());
    assert!(validate_language_code("zh-TW").is_ok());
    assert!(validate_language_code("pt-BR").is_ok());
    assert_eq!(primary_subtag(" EN-us "), "en");
}

/// Test invalid codes
#[test]
fn test_validate_language_code_withInvalidCodes_shouldFail() {
    for code in ["", "x", "xx", "xyz", "french", "-CN"] {
        assert!(validate_language_code(code).is_err(), "{:?} should be invalid", code);
    }
}

/// Test code matching across formats
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("fr", "fre"));
    assert!(language_codes_match("zh-CN", "zho"));
    assert!(!language_codes_match("en", "de"));
    assert!(!language_codes_match("en", "invalid"));
}

/// Test display names
#[test]
fn test_get_language_name_withValidCodes_shouldReturnEnglishName() {
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert_eq!(get_language_name("ger").unwrap(), "German");
    assert!(get_language_name("zz").is_err());
}
