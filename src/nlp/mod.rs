mod command;
mod tokenizer;

pub use command::{parse, Action, Command};
pub use tokenizer::tokenize;
