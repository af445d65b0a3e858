pub mod github;
pub mod message;
pub mod search;
