pub mod intent;
pub mod llm;
pub mod schedule;
pub mod sports;
pub mod store;
