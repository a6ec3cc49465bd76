pub mod alias_validator;
pub mod code_generator;
pub mod url_validator;

pub use alias_validator::{
    ALIAS_MAX_LEN, ALIAS_MIN_LEN, RESERVED_ALIASES, is_reserved_alias, validate_alias,
};
pub use code_generator::{CODE_LENGTH, CodeGenerator, is_generated_code};
pub use url_validator::{normalize_url, validate_url};
