use std::fmt;

use crate::schema::DataType;

/// Classification attached to a consumed token, suitable for inline
/// highlighting in a query editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Wildcard,
    Column(DataType),
    Constant(DataType),
    Table,
    Limit,
    Comma,
    Parens,
    Error,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword => write!(f, "keyword"),
            TokenKind::Wildcard => write!(f, "wildcard"),
            TokenKind::Column(ty) => write!(f, "{ty}_col"),
            TokenKind::Constant(ty) => write!(f, "{ty}_constant"),
            TokenKind::Table => write!(f, "table"),
            TokenKind::Limit => write!(f, "limit"),
            TokenKind::Comma => write!(f, "comma"),
            TokenKind::Parens => write!(f, "parens"),
            TokenKind::Error => write!(f, "error"),
        }
    }
}

/// One entry of user feedback: the token's text, its classification, and an
/// error message when the token could not be accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub text: String,
    pub kind: TokenKind,
    pub error: Option<String>,
}

impl Diagnostic {
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            kind,
            error: None,
        }
    }

    pub fn error(text: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: TokenKind::Error,
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }
}

/// Clause section a diagnostic belongs to. Tokens seen before any clause
/// keyword land in `Misc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Misc,
    Select,
    From,
    Where,
    Limit,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Misc => "misc",
            Section::Select => "select",
            Section::From => "from",
            Section::Where => "where",
            Section::Limit => "limit",
        };
        write!(f, "{name}")
    }
}

/// Per-token diagnostics grouped by clause section, each group in traversal
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionDiagnostics {
    pub misc: Vec<Diagnostic>,
    pub select: Vec<Diagnostic>,
    pub from: Vec<Diagnostic>,
    pub where_clause: Vec<Diagnostic>,
    pub limit: Vec<Diagnostic>,
}

impl SectionDiagnostics {
    pub fn section(&self, section: Section) -> &[Diagnostic] {
        match section {
            Section::Misc => &self.misc,
            Section::Select => &self.select,
            Section::From => &self.from,
            Section::Where => &self.where_clause,
            Section::Limit => &self.limit,
        }
    }

    pub fn section_mut(&mut self, section: Section) -> &mut Vec<Diagnostic> {
        match section {
            Section::Misc => &mut self.misc,
            Section::Select => &mut self.select,
            Section::From => &mut self.from,
            Section::Where => &mut self.where_clause,
            Section::Limit => &mut self.limit,
        }
    }

    /// All diagnostics, section by section.
    pub fn iter(&self) -> impl Iterator<Item = (Section, &Diagnostic)> {
        const SECTIONS: [Section; 5] = [
            Section::Misc,
            Section::Select,
            Section::From,
            Section::Where,
            Section::Limit,
        ];
        SECTIONS
            .into_iter()
            .flat_map(|s| self.section(s).iter().map(move |d| (s, d)))
    }

    pub fn has_errors(&self) -> bool {
        self.iter().any(|(_, d)| d.is_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_detection_spans_sections() {
        let mut diagnostics = SectionDiagnostics::default();
        diagnostics
            .section_mut(Section::Select)
            .push(Diagnostic::new("SELECT", TokenKind::Keyword));
        assert!(!diagnostics.has_errors());

        diagnostics
            .section_mut(Section::Where)
            .push(Diagnostic::error("bogus", "Cannot find column bogus"));
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn iter_walks_sections_in_order() {
        let mut diagnostics = SectionDiagnostics::default();
        diagnostics
            .section_mut(Section::From)
            .push(Diagnostic::new("FROM", TokenKind::Keyword));
        diagnostics
            .section_mut(Section::Misc)
            .push(Diagnostic::error("x", "Expected new keyword clause"));

        let order: Vec<Section> = diagnostics.iter().map(|(s, _)| s).collect();
        assert_eq!(order, vec![Section::Misc, Section::From]);
    }
}
