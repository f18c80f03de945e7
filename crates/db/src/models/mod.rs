pub mod collection;
pub mod environment;
pub mod history;
