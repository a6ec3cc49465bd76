//! 自定义别名校验
//!
//! Pure syntax checks only. Whether an alias is already in use is decided
//! against the store by the engine.

use crate::errors::{QuicklinkError, Result};

pub const ALIAS_MIN_LEN: usize = 4;
pub const ALIAS_MAX_LEN: usize = 20;

/// Top-level path segments owned by fixed routes. A link under one of these
/// codes would be shadowed by the route and never redirect.
pub const RESERVED_ALIASES: &[&str] = &["shorten", "health", "analytics", "urls"];

/// 保留字比较不区分大小写
pub fn is_reserved_alias(alias: &str) -> bool {
    RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
}

fn is_alias_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Validate a custom alias.
///
/// Character set is checked before length, so `"ab cd"` reports
/// `INVALID_ALIAS` and `"ab"` reports `INVALID_ALIAS_LENGTH`.
pub fn validate_alias(alias: &str) -> Result<()> {
    if alias.is_empty() || !alias.chars().all(is_alias_char) {
        return Err(QuicklinkError::invalid_alias(
            "Custom alias can only contain letters, numbers, hyphens",
        ));
    }

    // 字符集已限定为 ASCII，len() 即字符数
    if !(ALIAS_MIN_LEN..=ALIAS_MAX_LEN).contains(&alias.len()) {
        return Err(QuicklinkError::invalid_alias_length(format!(
            "Custom alias must be between {} and {} characters",
            ALIAS_MIN_LEN, ALIAS_MAX_LEN
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_aliases() {
        assert!(validate_alias("my-link1").is_ok());
        assert!(validate_alias("abcd").is_ok());
        assert!(validate_alias("A-B-C-D").is_ok());
        assert!(validate_alias("12345678901234567890").is_ok());
    }

    #[test]
    fn test_bad_characters() {
        for alias in ["ab cd", "hello_world", "a/b/c/d", "caf\u{e9}s", "abc.def", ""] {
            assert!(
                matches!(validate_alias(alias), Err(QuicklinkError::InvalidAlias(_))),
                "{alias:?} should be rejected as INVALID_ALIAS"
            );
        }
    }

    #[test]
    fn test_length_bounds() {
        assert!(matches!(
            validate_alias("ab"),
            Err(QuicklinkError::InvalidAliasLength(_))
        ));
        assert!(matches!(
            validate_alias("abc"),
            Err(QuicklinkError::InvalidAliasLength(_))
        ));
        assert!(matches!(
            validate_alias("123456789012345678901"),
            Err(QuicklinkError::InvalidAliasLength(_))
        ));
    }

    #[test]
    fn test_reserved_aliases() {
        assert!(is_reserved_alias("health"));
        assert!(is_reserved_alias("URLS"));
        assert!(is_reserved_alias("shorten"));
        assert!(!is_reserved_alias("healthy"));
        assert!(!is_reserved_alias("my-urls"));
        // 保留字本身语法合法，由引擎拒绝
        assert!(validate_alias("health").is_ok());
    }

    #[test]
    fn test_surrounding_whitespace_is_rejected() {
        for alias in [" my-link ", "my-link ", "   "] {
            assert!(
                matches!(validate_alias(alias), Err(QuicklinkError::InvalidAlias(_))),
                "{alias:?} should be rejected as INVALID_ALIAS"
            );
        }
    }

    #[test]
    fn test_charset_checked_before_length() {
        // 2 个字符且含空格：字符集错误优先
        assert!(matches!(
            validate_alias("a "),
            Err(QuicklinkError::InvalidAlias(_))
        ));
    }
}
