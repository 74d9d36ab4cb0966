pub mod ast;
pub mod conditions;
pub mod diagnostic;
pub mod parser;
pub mod tokenizer;
