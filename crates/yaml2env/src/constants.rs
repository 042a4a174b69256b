//! Centralized constants for yaml2env.
//!
//! Default variable names and display strings shared across modules.

// =============================================================================
// Detection
// =============================================================================

/// Environment variable consulted first when auto-detecting the config root.
pub const DEFAULT_ROOT_VAR: &str = "RACK_ROOT";

/// Environment variable consulted first when auto-detecting the environment name.
pub const DEFAULT_ENV_VAR: &str = "RACK_ENV";

/// Setting name reported when root detection fails.
pub const ROOT_SETTING: &str = "root";

/// Setting name reported when environment detection fails.
pub const ENV_SETTING: &str = "env";

// =============================================================================
// Display
// =============================================================================

/// Rendering of a missing value in assignment and summary lines.
pub const NIL: &str = "nil";

/// Rendering of an unset setting in summary lines.
pub const UNSET: &str = "(unset)";
