//! rsqlint — a restricted-SQL parser with per-token diagnostics.
//!
//! Turns a query string of the form
//! `SELECT (<col>[,<col>]* | *) FROM <table> [WHERE <condition>] [LIMIT <n>]`
//! into a [`ParseResult`]: a diagnostic for every token, grouped by clause
//! section for inline feedback, plus a typed, evaluable condition tree for
//! the WHERE clause. Parsing never fails; malformed input comes back as a
//! fully-populated result with `valid = false`.
//!
//! Column types and the valid table name come from a host-supplied
//! [`Schema`]; query execution and storage are out of scope.

pub mod schema;
pub mod sql;
pub mod value;

pub use schema::{DataType, Schema};
pub use sql::ast::{Clause, Op};
pub use sql::diagnostic::{Diagnostic, Section, SectionDiagnostics, TokenKind};
pub use sql::parser::{parse, Columns, ParseResult};
pub use sql::tokenizer::{tokenize, Token};
pub use value::{Row, Value};
