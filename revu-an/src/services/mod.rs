//! Business logic for revu-an

pub mod aggregation;
pub mod dashboard;

pub use dashboard::DashboardService;
