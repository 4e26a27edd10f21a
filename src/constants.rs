// Server configuration
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_DATA_PATH: &str = "data";
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:8080";
pub const DATABASE_FILE: &str = "cofrinho.db";

// Token configuration
pub const DEFAULT_TOKEN_EXPIRY_DAYS: i64 = 30;
pub const TOKEN_BYTES: usize = 32;
pub const BEARER_PREFIX: &str = "Bearer ";

// Client defaults
pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const TOKEN_FILE_NAME: &str = "token";
pub const APP_DIR_NAME: &str = "cofrinho";

// Validation limits
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 255;
pub const MAX_NOTES_LENGTH: usize = 1000;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_ICON_LENGTH: usize = 50;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MIN_RECEIVE_DAY: i64 = 1;
pub const MAX_RECEIVE_DAY: i64 = 31;

// Aggregation
pub const MONTHS_IN_YEAR: usize = 12;
pub const RANKING_SIZE: usize = 5;
pub const RECENT_ITEMS: usize = 5;
pub const DASHBOARD_INSIGHT_CAP: usize = 4;
pub const SAVINGS_PRAISE_RATIO: f64 = 0.7;
pub const UNCATEGORIZED_LABEL: &str = "Sem categoria";

// Error messages
pub const ERR_DATABASE_OPERATION: &str = "Database operation failed";
pub const ERR_UNAUTHORIZED: &str = "Not logged in";
pub const ERR_INVALID_CREDENTIALS: &str = "Invalid email or password";
