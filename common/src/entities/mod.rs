pub mod code;
pub mod envelope;
pub mod letter;
