pub mod group;
pub mod membership;
pub mod message;
pub mod report;
pub mod review;
pub mod schedule_entry;
pub mod token;
pub mod transient;
pub mod user;
