pub mod activity;
pub mod age;
pub mod dev_time;
pub mod rating;
pub mod roster;
pub mod slippage;
pub mod status;
pub mod summary;
