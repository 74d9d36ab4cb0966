use crate::schema::{DataType, Schema};
use crate::sql::ast::Clause;
use crate::sql::conditions;
use crate::sql::diagnostic::{Diagnostic, Section, SectionDiagnostics, TokenKind};
use crate::sql::tokenizer::{self, Token};

/// Tokens that can never be used as a column or table name.
const KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "LIMIT", "!=", "=", "<", ">", "AND", "OR", "(", ")", ",", "*",
];

/// The SELECT column list: explicit names or the `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Columns {
    Wildcard,
    Named(Vec<String>),
}

impl Columns {
    pub fn is_empty(&self) -> bool {
        matches!(self, Columns::Named(names) if names.is_empty())
    }
}

/// Everything a single parse produces: the resolved query parts, one
/// diagnostic per token grouped by clause section, and the overall verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub columns: Columns,
    pub table: Option<String>,
    pub limit: Option<u64>,
    /// Root of the condition tree. `Constant(Bool, "TRUE")` when WHERE is
    /// absent; `None` when the WHERE clause could not be reduced.
    pub conditions: Option<Clause>,
    pub diagnostics: SectionDiagnostics,
    pub valid: bool,
    /// First structural error, in fixed priority order. `None` when the
    /// query is valid, and also when invalidity comes from a token-level
    /// diagnostic rather than a structural check.
    pub error: Option<String>,
}

/// Clause-role the next token is expected to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Keyword,
    ColumnStart,
    Column,
    Table,
    Limit,
    Comma,
    Conditions,
}

struct ParserState<'s> {
    schema: &'s Schema,
    state: State,
    section: Section,
    columns: Columns,
    table: Option<String>,
    limit: Option<u64>,
    seen_select: bool,
    seen_from: bool,
    seen_where: bool,
    seen_limit: bool,
    condition_tokens: Vec<Token>,
    diagnostics: SectionDiagnostics,
}

impl<'s> ParserState<'s> {
    fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            state: State::Keyword,
            section: Section::Misc,
            columns: Columns::Named(Vec::new()),
            table: None,
            limit: None,
            seen_select: false,
            seen_from: false,
            seen_where: false,
            seen_limit: false,
            condition_tokens: Vec::new(),
            diagnostics: SectionDiagnostics::default(),
        }
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.section_mut(self.section).push(diagnostic);
    }

    /// One step of the state machine. Never aborts: an inadmissible token
    /// gets an error diagnostic and the scan moves on, so the caller always
    /// receives feedback for the whole input.
    fn consume(&mut self, token: &Token) {
        let t = token.text.as_str();

        if self.state == State::ColumnStart && t == "*" {
            self.push(Diagnostic::new(t, TokenKind::Wildcard));
            self.columns = Columns::Wildcard;
            self.state = State::Keyword;
            return;
        }

        if matches!(self.state, State::Column | State::ColumnStart) {
            if KEYWORDS.contains(&t) {
                self.push(Diagnostic::error(t, "Unexpected keyword; expected column name"));
            } else {
                match self.schema.column_type(t) {
                    Some(data_type) => self.push(Diagnostic::new(t, TokenKind::Column(data_type))),
                    None => self.push(Diagnostic::error(t, format!("Cannot find column {t}"))),
                }
                // recorded even when unknown, so the rest of the query
                // still validates against a complete column list
                if let Columns::Named(names) = &mut self.columns {
                    names.push(t.to_string());
                }
                self.state = State::Comma;
            }
            return;
        }

        if self.state == State::Table {
            if KEYWORDS.contains(&t) {
                self.push(Diagnostic::error(t, "Unexpected keyword; expected table name"));
            } else {
                if t == self.schema.table_name() {
                    self.push(Diagnostic::new(t, TokenKind::Table));
                } else {
                    self.push(Diagnostic::error(t, format!("Cannot find table {t}")));
                }
                self.table = Some(t.to_string());
                self.state = State::Keyword;
            }
            return;
        }

        if self.state == State::Limit {
            if KEYWORDS.contains(&t) {
                self.push(Diagnostic::error(t, "Unexpected keyword; expected limit"));
            } else {
                match t.parse::<u64>() {
                    Ok(n) if n > 0 => {
                        self.push(Diagnostic::new(t, TokenKind::Limit));
                        self.limit = Some(n);
                        self.state = State::Keyword;
                    }
                    _ => self.push(Diagnostic::error(t, "Expected positive number for limit")),
                }
            }
            return;
        }

        // clause keywords start a new section from any remaining state,
        // including Conditions: LIMIT may follow the WHERE clause
        match t {
            "SELECT" => {
                if self.seen_select {
                    self.push(Diagnostic::error(t, "Cannot have more than one SELECT"));
                } else {
                    self.seen_select = true;
                    self.section = Section::Select;
                    self.push(Diagnostic::new(t, TokenKind::Keyword));
                    self.state = State::ColumnStart;
                }
                return;
            }
            "FROM" => {
                if self.seen_from {
                    self.push(Diagnostic::error(t, "Cannot have more than one FROM"));
                } else {
                    self.seen_from = true;
                    self.section = Section::From;
                    self.push(Diagnostic::new(t, TokenKind::Keyword));
                    self.state = State::Table;
                }
                return;
            }
            "WHERE" => {
                if self.seen_where {
                    self.push(Diagnostic::error(t, "Cannot have more than one WHERE"));
                } else {
                    self.seen_where = true;
                    self.section = Section::Where;
                    self.push(Diagnostic::new(t, TokenKind::Keyword));
                    self.state = State::Conditions;
                }
                return;
            }
            "LIMIT" => {
                if self.seen_limit {
                    self.push(Diagnostic::error(t, "Cannot have more than one LIMIT"));
                } else {
                    self.seen_limit = true;
                    self.section = Section::Limit;
                    self.push(Diagnostic::new(t, TokenKind::Keyword));
                    self.state = State::Limit;
                }
                return;
            }
            _ => {}
        }

        if self.state == State::Comma && t == "," {
            self.push(Diagnostic::new(t, TokenKind::Comma));
            self.state = State::Column;
            return;
        }

        // Keyword or Comma state, anything else
        if matches!(self.state, State::Keyword | State::Comma) {
            self.push(Diagnostic::error(t, "Expected new keyword clause"));
            return;
        }

        // Conditions state: buffer the token for the second-stage parser
        self.condition_tokens.push(token.clone());
    }

    fn finish(mut self) -> ParseResult {
        let conditions = if self.condition_tokens.is_empty() {
            // WHERE absent (or empty): every row matches
            Some(Clause::Constant {
                value: "TRUE".to_string(),
                data_type: DataType::Bool,
            })
        } else {
            let (where_diagnostics, root) =
                conditions::build_conditions(&self.condition_tokens, self.schema);
            self.diagnostics.where_clause.extend(where_diagnostics);
            root
        };

        let mut result = ParseResult {
            columns: self.columns,
            table: self.table,
            limit: self.limit,
            conditions,
            diagnostics: self.diagnostics,
            valid: true,
            error: None,
        };

        // verdict, in fixed priority order
        if result.diagnostics.has_errors() {
            result.valid = false;
        } else if result.columns.is_empty() {
            result.valid = false;
            result.error = Some("No columns specified".to_string());
        } else if result.table.is_none() {
            result.valid = false;
            result.error = Some("No table specified".to_string());
        } else if result.conditions.is_none() {
            result.valid = false;
            result.error = Some("Could not parse conditions clause".to_string());
        } else if self.seen_limit && result.limit.is_none() {
            result.valid = false;
            result.error = Some("Expecting limit but did not find one".to_string());
        }

        result
    }
}

/// Parses a restricted-SQL query against the schema provider. Always returns
/// a fully-populated [`ParseResult`]; malformed input shows up as per-token
/// diagnostics and `valid = false`, never as an error path.
pub fn parse(query: &str, schema: &Schema) -> ParseResult {
    let tokens = tokenizer::tokenize(query);
    let mut state = ParserState::new(schema);
    for token in &tokens {
        state.consume(token);
    }
    state.finish()
}
