pub mod activity;
pub mod plan;
