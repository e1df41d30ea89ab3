/// Constants used throughout the secretconf codebase
use std::time::Duration;

// Separator between configuration key segments, e.g. `Database:Password`
pub const KEY_DELIMITER: &str = ":";

// Environment variable key segment separator, mapped to KEY_DELIMITER
pub const ENV_KEY_SEPARATOR: &str = "__";

// Refresh cadence applied by `SecretsSource::refresh_periodically`
pub const DEFAULT_RELOAD_INTERVAL: Duration = Duration::from_secs(5 * 60);

// Log filter variable honoured by tracing initialisation
pub const SECRETCONF_LOG_VAR: &str = "SECRETCONF_LOG";

// Default log filter directive
pub const DEFAULT_LOG_FILTER: &str = "info";
