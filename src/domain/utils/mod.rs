pub mod command;
pub mod id;
