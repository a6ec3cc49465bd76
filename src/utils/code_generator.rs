//! 短码生成
//!
//! Codes are the first [`CODE_LENGTH`] hex characters of the xxh64 digest of
//! the seed. The first attempt for a URL is seeded by the normalized URL
//! alone, so the same URL always yields the same candidate. After a
//! collision the seed is salted with fresh random bytes; re-hashing the bare
//! URL would hit the same occupied code forever.

use xxhash_rust::xxh64::xxh64;

/// Length of auto-generated codes.
pub const CODE_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, Default)]
pub struct CodeGenerator;

impl CodeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Deterministic code for `seed`.
    pub fn generate(&self, seed: &str) -> String {
        let digest = format!("{:016x}", xxh64(seed.as_bytes(), 0));
        digest[..CODE_LENGTH].to_string()
    }

    /// Code for `seed` concatenated with a random salt. Two calls almost
    /// surely differ.
    pub fn generate_salted(&self, seed: &str) -> String {
        let salt: [u8; 4] = rand::random();
        let mut salted = String::with_capacity(seed.len() + 8);
        salted.push_str(seed);
        for byte in salt {
            salted.push_str(&format!("{:02x}", byte));
        }
        self.generate(&salted)
    }
}

/// True for strings shaped like an auto-generated code.
pub fn is_generated_code(code: &str) -> bool {
    code.len() == CODE_LENGTH
        && code
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_deterministic() {
        let generator = CodeGenerator::new();
        let a = generator.generate("http://example.com/page");
        let b = generator.generate("http://example.com/page");
        assert_eq!(a, b);
        assert!(is_generated_code(&a), "unexpected code shape: {a}");
    }

    #[test]
    fn test_different_urls_differ() {
        let generator = CodeGenerator::new();
        assert_ne!(
            generator.generate("http://example.com/a"),
            generator.generate("http://example.com/b")
        );
    }

    #[test]
    fn test_salted_differs_from_plain() {
        let generator = CodeGenerator::new();
        let seed = "http://example.com/page";
        let plain = generator.generate(seed);

        // 32 位盐值，连续碰撞的概率可忽略
        let salted: Vec<String> = (0..8).map(|_| generator.generate_salted(seed)).collect();
        assert!(salted.iter().any(|c| c != &plain));
        assert!(salted.iter().all(|c| is_generated_code(c)));
    }

    #[test]
    fn test_is_generated_code() {
        assert!(is_generated_code("0123abcd"));
        assert!(!is_generated_code("0123ABCD"));
        assert!(!is_generated_code("0123abc"));
        assert!(!is_generated_code("my-link1"));
    }
}
