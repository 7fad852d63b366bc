pub mod issue;
pub mod transition;
pub mod webhook;
