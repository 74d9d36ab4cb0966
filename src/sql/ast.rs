use std::fmt;

use crate::schema::DataType;
use crate::value::{Row, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Lt,
    Gt,
    Eq,
    Ne,
    And,
    Or,
}

impl Op {
    pub fn from_token(text: &str) -> Option<Self> {
        match text {
            "<" => Some(Op::Lt),
            ">" => Some(Op::Gt),
            "=" => Some(Op::Eq),
            "!=" => Some(Op::Ne),
            "AND" => Some(Op::And),
            "OR" => Some(Op::Or),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Op::Lt => "<",
            Op::Gt => ">",
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::And => "AND",
            Op::Or => "OR",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node of the condition expression tree. Column and Constant types are
/// fixed at construction; an Operator is always boolean-typed.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Column {
        name: String,
        data_type: DataType,
    },
    Constant {
        value: String,
        data_type: DataType,
    },
    Operator {
        op: Op,
        left: Box<Clause>,
        right: Box<Clause>,
    },
}

impl Clause {
    pub fn data_type(&self) -> DataType {
        match self {
            Clause::Column { data_type, .. } | Clause::Constant { data_type, .. } => *data_type,
            Clause::Operator { .. } => DataType::Bool,
        }
    }

    /// Evaluates the clause against a row of named values. Pure and
    /// infallible: a missing column yields `Null`, and an operator whose
    /// operands fail its static type requirements yields `Bool(false)`.
    /// Both operands are always evaluated; there is no short-circuit.
    pub fn evaluate(&self, row: &Row) -> Value {
        match self {
            Clause::Column { name, .. } => row.get(name).cloned().unwrap_or(Value::Null),
            Clause::Constant { value, data_type } => match data_type {
                DataType::Num => value.parse().map(Value::Num).unwrap_or(Value::Null),
                DataType::Bool => Value::Bool(value == "TRUE"),
                DataType::Str | DataType::Null => Value::Str(value.clone()),
            },
            Clause::Operator { op, left, right } => {
                let lhs = left.evaluate(row);
                let rhs = right.evaluate(row);

                let types_ok = match op {
                    Op::Lt | Op::Gt => {
                        left.data_type() == DataType::Num && right.data_type() == DataType::Num
                    }
                    Op::Eq | Op::Ne => left.data_type() == right.data_type(),
                    Op::And | Op::Or => {
                        left.data_type() == DataType::Bool && right.data_type() == DataType::Bool
                    }
                };
                if !types_ok {
                    return Value::Bool(false);
                }

                let result = match op {
                    Op::Lt => {
                        matches!((lhs.as_num(), rhs.as_num()), (Some(l), Some(r)) if l < r)
                    }
                    Op::Gt => {
                        matches!((lhs.as_num(), rhs.as_num()), (Some(l), Some(r)) if l > r)
                    }
                    Op::Eq => lhs == rhs,
                    Op::Ne => lhs != rhs,
                    Op::And => {
                        matches!((lhs.as_bool(), rhs.as_bool()), (Some(l), Some(r)) if l && r)
                    }
                    Op::Or => {
                        matches!((lhs.as_bool(), rhs.as_bool()), (Some(l), Some(r)) if l || r)
                    }
                };
                Value::Bool(result)
            }
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Column { name, .. } => write!(f, "{name}"),
            Clause::Constant { value, data_type } => match data_type {
                DataType::Str => write!(f, "\"{value}\""),
                _ => write!(f, "{value}"),
            },
            Clause::Operator { op, left, right } => write!(f, "({left} {op} {right})"),
        }
    }
}
