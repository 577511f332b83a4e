// Client-side domain values shared by the API client, the orchestrator and
// the terminal front end.

pub mod answers;
pub mod config;
pub mod mbti;
pub mod session;
pub mod token_store;
