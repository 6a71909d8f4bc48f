pub mod collision;
pub mod columns;
pub mod config;
pub mod lanes;
