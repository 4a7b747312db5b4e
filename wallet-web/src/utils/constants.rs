//! Application constants

pub const APP_NAME: &str = "BlockE";

/// How long the "wallet connected" toast stays up.
pub const CONNECT_TOAST_MS: u32 = 3000;

/// Message signed from the dashboard to prove account ownership.
pub const OWNERSHIP_MESSAGE: &str = "Sign in to BlockE";

// Routes
pub const ROUTE_HOME: &str = "/";
pub const ROUTE_DASHBOARD: &str = "/dashboard";
pub const ROUTE_STAKING: &str = "/staking";
pub const ROUTE_SETTINGS: &str = "/settings";
