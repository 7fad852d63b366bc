pub mod jira;
pub mod process;
pub mod snyk;
pub mod task;
