use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuicklinkError {
    MissingUrl(String),
    InvalidUrl(String),
    InvalidAlias(String),
    InvalidAliasLength(String),
    AliasTaken(String),
    MissingUserId(String),
    NoChanges(String),
    NotFound(String),
    Unauthorized(String),
    DuplicateCode(String),
    CodeSpaceExhausted(String),
    DatabaseOperation(String),
    StoreUnavailable(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    CacheConnection(String),
    CacheOperation(String),
    Config(String),
    FileOperation(String),
    Serialization(String),
}

impl QuicklinkError {
    /// 对外暴露的错误码
    pub fn code(&self) -> &'static str {
        match self {
            QuicklinkError::MissingUrl(_) => "MISSING_URL",
            QuicklinkError::InvalidUrl(_) => "INVALID_URL",
            QuicklinkError::InvalidAlias(_) => "INVALID_ALIAS",
            QuicklinkError::InvalidAliasLength(_) => "INVALID_ALIAS_LENGTH",
            QuicklinkError::AliasTaken(_) => "ALIAS_TAKEN",
            QuicklinkError::MissingUserId(_) => "MISSING_USER_ID",
            QuicklinkError::NoChanges(_) => "NO_CHANGES",
            QuicklinkError::NotFound(_) => "NOT_FOUND",
            QuicklinkError::Unauthorized(_) => "UNAUTHORIZED",
            QuicklinkError::DuplicateCode(_)
            | QuicklinkError::CodeSpaceExhausted(_)
            | QuicklinkError::DatabaseOperation(_)
            | QuicklinkError::StoreUnavailable(_)
            | QuicklinkError::DatabaseConfig(_)
            | QuicklinkError::DatabaseConnection(_) => "DB_ERROR",
            QuicklinkError::CacheConnection(_) | QuicklinkError::CacheOperation(_) => {
                "CACHE_ERROR"
            }
            QuicklinkError::Config(_) => "CONFIG_ERROR",
            QuicklinkError::FileOperation(_) | QuicklinkError::Serialization(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            QuicklinkError::MissingUrl(_) => "Missing URL",
            QuicklinkError::InvalidUrl(_) => "Invalid URL",
            QuicklinkError::InvalidAlias(_) => "Invalid Alias",
            QuicklinkError::InvalidAliasLength(_) => "Invalid Alias Length",
            QuicklinkError::AliasTaken(_) => "Alias Taken",
            QuicklinkError::MissingUserId(_) => "Missing User ID",
            QuicklinkError::NoChanges(_) => "No Changes",
            QuicklinkError::NotFound(_) => "Resource Not Found",
            QuicklinkError::Unauthorized(_) => "Unauthorized",
            QuicklinkError::DuplicateCode(_) => "Duplicate Code",
            QuicklinkError::CodeSpaceExhausted(_) => "Code Generation Exhausted",
            QuicklinkError::DatabaseOperation(_) => "Database Operation Error",
            QuicklinkError::StoreUnavailable(_) => "Store Unavailable",
            QuicklinkError::DatabaseConfig(_) => "Database Configuration Error",
            QuicklinkError::DatabaseConnection(_) => "Database Connection Error",
            QuicklinkError::CacheConnection(_) => "Cache Connection Error",
            QuicklinkError::CacheOperation(_) => "Cache Operation Error",
            QuicklinkError::Config(_) => "Configuration Error",
            QuicklinkError::FileOperation(_) => "File Operation Error",
            QuicklinkError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            QuicklinkError::MissingUrl(msg)
            | QuicklinkError::InvalidUrl(msg)
            | QuicklinkError::InvalidAlias(msg)
            | QuicklinkError::InvalidAliasLength(msg)
            | QuicklinkError::AliasTaken(msg)
            | QuicklinkError::MissingUserId(msg)
            | QuicklinkError::NoChanges(msg)
            | QuicklinkError::NotFound(msg)
            | QuicklinkError::Unauthorized(msg)
            | QuicklinkError::DuplicateCode(msg)
            | QuicklinkError::CodeSpaceExhausted(msg)
            | QuicklinkError::DatabaseOperation(msg)
            | QuicklinkError::StoreUnavailable(msg)
            | QuicklinkError::DatabaseConfig(msg)
            | QuicklinkError::DatabaseConnection(msg)
            | QuicklinkError::CacheConnection(msg)
            | QuicklinkError::CacheOperation(msg)
            | QuicklinkError::Config(msg)
            | QuicklinkError::FileOperation(msg)
            | QuicklinkError::Serialization(msg) => msg,
        }
    }

    /// Transient infrastructure failure; the caller may retry the whole request.
    pub fn is_transient(&self) -> bool {
        matches!(self, QuicklinkError::StoreUnavailable(_))
    }

    /// 格式化为彩色输出（用于启动失败）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for QuicklinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for QuicklinkError {}

// 便捷的构造函数
impl QuicklinkError {
    pub fn missing_url<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::MissingUrl(msg.into())
    }

    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::InvalidUrl(msg.into())
    }

    pub fn invalid_alias<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::InvalidAlias(msg.into())
    }

    pub fn invalid_alias_length<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::InvalidAliasLength(msg.into())
    }

    pub fn alias_taken<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::AliasTaken(msg.into())
    }

    pub fn missing_user_id<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::MissingUserId(msg.into())
    }

    pub fn no_changes<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::NoChanges(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::NotFound(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::Unauthorized(msg.into())
    }

    pub fn duplicate_code<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::DuplicateCode(msg.into())
    }

    pub fn code_space_exhausted<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::CodeSpaceExhausted(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::DatabaseOperation(msg.into())
    }

    pub fn store_unavailable<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::StoreUnavailable(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::DatabaseConnection(msg.into())
    }

    pub fn cache_connection<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::CacheConnection(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        QuicklinkError::FileOperation(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for QuicklinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        use sea_orm::DbErr;
        match err {
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
                QuicklinkError::StoreUnavailable(err.to_string())
            }
            other => QuicklinkError::DatabaseOperation(other.to_string()),
        }
    }
}

impl From<redis::RedisError> for QuicklinkError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_refusal() || err.is_connection_dropped() || err.is_timeout() {
            QuicklinkError::CacheConnection(err.to_string())
        } else {
            QuicklinkError::CacheOperation(err.to_string())
        }
    }
}

impl From<config::ConfigError> for QuicklinkError {
    fn from(err: config::ConfigError) -> Self {
        QuicklinkError::Config(err.to_string())
    }
}

impl From<std::io::Error> for QuicklinkError {
    fn from(err: std::io::Error) -> Self {
        QuicklinkError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for QuicklinkError {
    fn from(err: serde_json::Error) -> Self {
        QuicklinkError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QuicklinkError>;
