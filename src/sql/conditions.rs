use crate::schema::{DataType, Schema};
use crate::sql::ast::{Clause, Op};
use crate::sql::diagnostic::{Diagnostic, TokenKind};
use crate::sql::tokenizer::Token;

/// Tokens that can never be a leaf of the expression tree.
const OPERATOR_TOKENS: &[&str] = &["(", ")", "<", ">", "=", "!=", "AND", "OR"];

/// One precedence tier of the collapse loop: the operator spellings it
/// reduces, the static-type rule its operands must satisfy, and the message
/// attached to the operator's diagnostic when they don't.
struct Tier {
    ops: &'static [&'static str],
    check: fn(DataType, DataType) -> bool,
    error: &'static str,
}

fn both_num(left: DataType, right: DataType) -> bool {
    left == DataType::Num && right == DataType::Num
}

fn same_type(left: DataType, right: DataType) -> bool {
    left == right
}

fn both_bool(left: DataType, right: DataType) -> bool {
    left == DataType::Bool && right == DataType::Bool
}

const TIERS: [Tier; 3] = [
    Tier {
        ops: &["<", ">"],
        check: both_num,
        error: "Expected two numbers",
    },
    Tier {
        ops: &["=", "!="],
        check: same_type,
        error: "Expected similar types",
    },
    Tier {
        ops: &["AND", "OR"],
        check: both_bool,
        error: "Expected two booleans",
    },
];

#[derive(Debug)]
enum Node {
    Clause(Clause),
    Raw(String),
}

/// Worklist entry: a resolved clause or a still-raw operator/paren token,
/// bundled with the index of the diagnostic slot it originated from so that
/// error messages keep pointing at the right token through collapses.
#[derive(Debug)]
struct Item {
    node: Node,
    origin: usize,
}

impl Item {
    fn is_clause(&self) -> bool {
        matches!(self.node, Node::Clause(_))
    }

    fn into_clause(self) -> Option<Clause> {
        match self.node {
            Node::Clause(clause) => Some(clause),
            Node::Raw(_) => None,
        }
    }
}

/// Builds the condition expression tree from the raw WHERE token sub-stream.
///
/// Returns one diagnostic per input token, in order, plus the root clause
/// when the sequence reduced to exactly one node. An unreducible sequence
/// (unbalanced parens, dangling operator) produces no root; the caller turns
/// that into the structural verdict. Classification and collapsing both keep
/// going past errors so every token still receives feedback.
///
/// The collapse is worst-case quadratic in the token count: each round walks
/// the whole worklist and a round only repeats after at least one collapse.
pub fn build_conditions(tokens: &[Token], schema: &Schema) -> (Vec<Diagnostic>, Option<Clause>) {
    let mut diagnostics = Vec::with_capacity(tokens.len());
    let mut items = Vec::with_capacity(tokens.len());

    for (i, token) in tokens.iter().enumerate() {
        let (node, diagnostic) = classify(token, schema);
        items.push(Item { node, origin: i });
        diagnostics.push(diagnostic);
    }

    let mut changed = true;
    while items.len() > 1 && changed {
        changed = false;
        for tier in &TIERS {
            items = collapse_operators(items, tier, &mut diagnostics, &mut changed);
        }
        items = collapse_parens(items, &mut diagnostics, &mut changed);
    }

    let root = match (items.pop(), items.is_empty()) {
        (Some(item), true) => item.into_clause(),
        _ => None,
    };
    (diagnostics, root)
}

/// Phase A: one leaf or raw node per token. Precedence of form: numeric
/// literal, quoted literal, TRUE/FALSE, then schema lookup. Unknown columns
/// still become (null-typed) nodes so structural errors further up are also
/// detected.
fn classify(token: &Token, schema: &Schema) -> (Node, Diagnostic) {
    let text = token.text.as_str();

    if OPERATOR_TOKENS.contains(&text) {
        // stays raw for phase B; the collapse rewrites this diagnostic
        return (
            Node::Raw(text.to_string()),
            Diagnostic::new(text, TokenKind::Keyword),
        );
    }
    if text.parse::<f64>().is_ok() {
        return (
            Node::Clause(Clause::Constant {
                value: text.to_string(),
                data_type: DataType::Num,
            }),
            Diagnostic::new(text, TokenKind::Constant(DataType::Num)),
        );
    }
    if let Some(inner) = dequote(text) {
        return (
            Node::Clause(Clause::Constant {
                value: inner.to_string(),
                data_type: DataType::Str,
            }),
            Diagnostic::new(text, TokenKind::Constant(DataType::Str)),
        );
    }
    if text == "TRUE" || text == "FALSE" {
        return (
            Node::Clause(Clause::Constant {
                value: text.to_string(),
                data_type: DataType::Bool,
            }),
            Diagnostic::new(text, TokenKind::Constant(DataType::Bool)),
        );
    }
    match schema.column_type(text) {
        Some(data_type) => (
            Node::Clause(Clause::Column {
                name: text.to_string(),
                data_type,
            }),
            Diagnostic::new(text, TokenKind::Column(data_type)),
        ),
        None => (
            Node::Clause(Clause::Column {
                name: text.to_string(),
                data_type: DataType::Null,
            }),
            Diagnostic::error(text, format!("Cannot find column {text}")),
        ),
    }
}

fn dequote(text: &str) -> Option<&str> {
    let mut chars = text.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;
    if first == last && (first == '"' || first == '\'') {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

/// One tier pass. Walks the worklist left to right onto an output stack;
/// whenever a tier operator sits between two already-resolved clauses, the
/// three entries become one Operator node carrying the operator's origin.
/// Left-associative chains fall out of the stack scan in a single pass.
fn collapse_operators(
    items: Vec<Item>,
    tier: &Tier,
    diagnostics: &mut [Diagnostic],
    changed: &mut bool,
) -> Vec<Item> {
    let mut out: Vec<Item> = Vec::with_capacity(items.len());
    let mut iter = items.into_iter().peekable();

    while let Some(Item { node, origin }) = iter.next() {
        let text = match &node {
            Node::Raw(text) if tier.ops.contains(&text.as_str()) => text.clone(),
            _ => {
                out.push(Item { node, origin });
                continue;
            }
        };

        let reducible = out.last().is_some_and(Item::is_clause)
            && iter.peek().is_some_and(Item::is_clause)
            && Op::from_token(&text).is_some();
        if !reducible {
            out.push(Item { node, origin });
            continue;
        }

        let left = out.pop().and_then(Item::into_clause);
        let right = iter.next().and_then(Item::into_clause);
        let (Some(op), Some(left), Some(right)) = (Op::from_token(&text), left, right) else {
            continue;
        };

        diagnostics[origin] = if (tier.check)(left.data_type(), right.data_type()) {
            Diagnostic::new(&text, TokenKind::Keyword)
        } else {
            Diagnostic::error(&text, tier.error)
        };

        // built even on a type error so later structural problems surface too
        out.push(Item {
            node: Node::Clause(Clause::Operator {
                op,
                left: Box::new(left),
                right: Box::new(right),
            }),
            origin,
        });
        *changed = true;
    }

    out
}

/// Paren pass: a `(` clause `)` window collapses to the inner clause, which
/// keeps its own origin; both paren diagnostics become kind `Parens`.
fn collapse_parens(items: Vec<Item>, diagnostics: &mut [Diagnostic], changed: &mut bool) -> Vec<Item> {
    let mut out: Vec<Item> = Vec::with_capacity(items.len());

    for item in items {
        let closes = matches!(&item.node, Node::Raw(text) if text == ")");
        let wrapped = out.len() >= 2
            && out[out.len() - 1].is_clause()
            && matches!(&out[out.len() - 2].node, Node::Raw(text) if text == "(");

        if closes && wrapped {
            let inner = out.pop();
            let open = out.pop();
            let (Some(inner), Some(open)) = (inner, open) else {
                continue;
            };
            diagnostics[open.origin] = Diagnostic::new("(", TokenKind::Parens);
            diagnostics[item.origin] = Diagnostic::new(")", TokenKind::Parens);
            out.push(inner);
            *changed = true;
        } else {
            out.push(item);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::tokenizer::tokenize;

    fn schema() -> Schema {
        Schema::new("table")
            .with_column("a", DataType::Num)
            .with_column("b", DataType::Num)
            .with_column("name", DataType::Str)
            .with_column("active", DataType::Bool)
    }

    fn build(input: &str) -> (Vec<Diagnostic>, Option<Clause>) {
        build_conditions(&tokenize(input), &schema())
    }

    fn num_constant(value: &str) -> Clause {
        Clause::Constant {
            value: value.to_string(),
            data_type: DataType::Num,
        }
    }

    fn num_column(name: &str) -> Clause {
        Clause::Column {
            name: name.to_string(),
            data_type: DataType::Num,
        }
    }

    fn operator(op: Op, left: Clause, right: Clause) -> Clause {
        Clause::Operator {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[test]
    fn single_comparison() {
        let (diagnostics, root) = build("a > 5");
        assert_eq!(
            root,
            Some(operator(Op::Gt, num_column("a"), num_constant("5")))
        );
        assert_eq!(diagnostics[1].kind, TokenKind::Keyword);
        assert_eq!(diagnostics[1].error, None);
    }

    #[test]
    fn string_and_bool_leaves() {
        let (_, root) = build("name = \"ada\"");
        assert_eq!(
            root,
            Some(operator(
                Op::Eq,
                Clause::Column {
                    name: "name".to_string(),
                    data_type: DataType::Str,
                },
                Clause::Constant {
                    value: "ada".to_string(),
                    data_type: DataType::Str,
                },
            ))
        );

        let (_, root) = build("active = TRUE");
        assert_eq!(root.map(|c| c.data_type()), Some(DataType::Bool));
    }

    #[test]
    fn precedence_binds_comparisons_before_and() {
        let (_, root) = build("a > 1 AND b < 2");
        assert_eq!(
            root,
            Some(operator(
                Op::And,
                operator(Op::Gt, num_column("a"), num_constant("1")),
                operator(Op::Lt, num_column("b"), num_constant("2")),
            ))
        );
    }

    #[test]
    fn nested_parens_reduce_round_by_round() {
        let (diagnostics, root) = build("( ( a > 1 ) )");
        assert_eq!(
            root,
            Some(operator(Op::Gt, num_column("a"), num_constant("1")))
        );
        assert_eq!(diagnostics[0].kind, TokenKind::Parens);
        assert_eq!(diagnostics[1].kind, TokenKind::Parens);
        assert_eq!(diagnostics[5].kind, TokenKind::Parens);
        assert_eq!(diagnostics[6].kind, TokenKind::Parens);
    }

    #[test]
    fn type_error_marks_the_operator_but_still_builds() {
        let (diagnostics, root) = build("a > \"x\"");
        assert_eq!(diagnostics[1].kind, TokenKind::Error);
        assert_eq!(diagnostics[1].error.as_deref(), Some("Expected two numbers"));
        assert!(matches!(root, Some(Clause::Operator { op: Op::Gt, .. })));
    }

    #[test]
    fn equality_type_error() {
        let (diagnostics, _) = build("a = \"x\"");
        assert_eq!(diagnostics[1].error.as_deref(), Some("Expected similar types"));
    }

    #[test]
    fn and_requires_booleans() {
        let (diagnostics, _) = build("a AND active");
        assert_eq!(diagnostics[1].error.as_deref(), Some("Expected two booleans"));
    }

    #[test]
    fn unknown_column_becomes_null_typed_leaf() {
        let (diagnostics, root) = build("bogus > 5");
        assert_eq!(
            diagnostics[0].error.as_deref(),
            Some("Cannot find column bogus")
        );
        // the operator then fails its numeric check downstream
        assert_eq!(diagnostics[1].error.as_deref(), Some("Expected two numbers"));
        assert!(root.is_some());
    }

    #[test]
    fn unbalanced_paren_produces_no_root() {
        let (diagnostics, root) = build("( a > 1");
        assert_eq!(root, None);
        // no token-level error either: this is a structural failure
        assert!(diagnostics.iter().all(|d| !d.is_error()));
    }

    #[test]
    fn dangling_operator_produces_no_root() {
        let (_, root) = build("a >");
        assert_eq!(root, None);
    }

    #[test]
    fn chained_comparisons_collapse_left_associative() {
        // (a < b) < 3: the outer comparison sees a bool operand and errors,
        // but the tree still reduces to a single node
        let (diagnostics, root) = build("a < b < 3");
        assert!(matches!(root, Some(Clause::Operator { op: Op::Lt, .. })));
        assert_eq!(diagnostics[3].error.as_deref(), Some("Expected two numbers"));
    }

    #[test]
    fn lone_leaf_is_its_own_root() {
        let (_, root) = build("active");
        assert_eq!(
            root,
            Some(Clause::Column {
                name: "active".to_string(),
                data_type: DataType::Bool,
            })
        );
    }
}
