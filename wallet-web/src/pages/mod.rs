//! Page modules

pub mod dashboard;
pub mod landing;
pub mod settings;
pub mod staking;

pub use dashboard::DashboardPage;
pub use landing::LandingPage;
pub use settings::SettingsPage;
pub use staking::StakingPage;
