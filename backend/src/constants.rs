// =============================================================================
// Hangouts Backend Constants
// =============================================================================
// Tunables used throughout the backend, kept in one place.

// =============================================================================
// SOCIAL GRAPH
// =============================================================================

/// Maximum number of first-degree friends a user may list
pub const DEFAULT_MAX_FIRST_DEGREE_FRIENDS: usize = 5;

// =============================================================================
// AUTHENTICATION
// =============================================================================

/// Header carrying the caller's user id, set by the upstream auth gateway
pub const USER_ID_HEADER: &str = "x-user-id";

// =============================================================================
// DATABASE CONFIGURATION
// =============================================================================

/// Default pool size if DB_MAX_CONNECTIONS is not set
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

// =============================================================================
// SERVER CONFIGURATION
// =============================================================================

/// Default server port if not specified in environment
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Log filter used when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "hangouts=info,tower_http=debug,server=debug,seed=info";

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Parses common truthy spellings used in environment flags
pub fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
