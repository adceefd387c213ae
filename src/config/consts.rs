/// Message reported when a source fails without a usable cause
pub const NULL_ERROR_MESSAGE: &str = "null-error";
/// Object fields tried, in order, by the default key chain (after the first array element)
pub const DEFAULT_KEY_FIELDS: [&str; 3] = ["key", "code", "id"];
/// Log filter used by the binary when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";
