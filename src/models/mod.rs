pub mod assignee;
pub mod issue;
pub mod report;
pub mod snapshot;
