//! Application-wide constants

/// Local storage key holding the per-role menu permission overrides.
pub const PERMISSIONS_STORAGE_KEY: &str = "fleet.menu_permissions";
/// Local storage key holding the signed-in user.
pub const SESSION_USER_KEY: &str = "fleet.user";
/// Local storage key holding the raw bearer token.
pub const SESSION_TOKEN_KEY: &str = "fleet.token";

pub const ADMIN_ROLE: &str = "admin";
pub const ADMIN_ROOT_PATH: &str = "/admin";
pub const ADMIN_SETTINGS_PATH: &str = "/admin/settings";

pub const SPREADSHEET_SHEET_NAME: &str = "Report";
pub const SPREADSHEET_EXTENSION: &str = "xlsx";
pub const DEFAULT_COLUMN_WIDTH: f64 = 20.0;
pub const DEFAULT_ROWS_PER_PAGE: usize = 25;
pub const DEFAULT_API_TIMEOUT_SECONDS: u64 = 30;
