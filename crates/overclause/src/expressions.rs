//! SQL expression nodes.
//!
//! This module defines the closed set of expression variants the clause
//! builder composes over: name references ([`Identifier`], [`Column`]),
//! verbatim fragments ([`RawSql`]), the ordering sub-tree
//! ([`OrderByExpression`]), and the window clause itself
//! ([`WindowExpression`](crate::window::WindowExpression)).
//!
//! # Architecture
//!
//! The central type is [`Expression`], a tagged enum with one variant per
//! construct. Larger payloads are boxed to keep the enum size small. Every
//! variant supports two operations shared by the whole tree:
//!
//! - [`sql`](Expression::sql) -- render to SQL text, threading a
//!   [`ValueBinder`] through so nested nodes can bind literal values.
//! - [`traverse`](Expression::traverse) -- invoke a visitor on every nested
//!   expression node, depth-first, so tree-wide passes (parameter collection,
//!   identifier rewriting, validation) never need to know concrete node types.

use crate::binder::ValueBinder;
use crate::window::WindowExpression;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A SQL expression node.
///
/// Raw strings convert into unquoted [`Identifier`] references, so the fluent
/// APIs accept either text or pre-built nodes:
///
/// ```
/// use overclause::expressions::Expression;
///
/// let e = Expression::from("account_id");
/// assert!(matches!(e, Expression::Identifier(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// A bare or quoted name reference
    Identifier(Identifier),
    /// An optionally table-qualified column reference
    Column(Column),
    /// A verbatim SQL fragment, rendered as-is
    Raw(RawSql),
    /// An ORDER BY sub-tree
    OrderBy(Box<OrderByExpression>),
    /// A window (OVER) clause
    Window(Box<WindowExpression>),
}

impl Expression {
    /// Render this node to SQL text. Nodes that bind literal values record
    /// them against `binder`.
    pub fn sql(&self, binder: &mut ValueBinder) -> String {
        match self {
            Expression::Identifier(e) => e.sql(),
            Expression::Column(e) => e.sql(),
            Expression::Raw(e) => e.0.clone(),
            Expression::OrderBy(e) => e.sql(binder),
            Expression::Window(e) => e.sql(binder),
        }
    }

    /// Invoke `visitor` on every expression nested inside this node,
    /// depth-first: each child is visited, then asked to traverse its own
    /// children, before the next sibling. The node itself is not visited;
    /// that is the parent's job.
    pub fn traverse<F>(&self, visitor: &mut F) -> &Self
    where
        F: FnMut(&Expression),
    {
        match self {
            Expression::Identifier(_) | Expression::Column(_) | Expression::Raw(_) => {}
            Expression::OrderBy(e) => {
                e.traverse(visitor);
            }
            Expression::Window(e) => {
                e.traverse(visitor);
            }
        }
        self
    }
}

impl From<&str> for Expression {
    /// Promote raw text to an unquoted identifier reference.
    fn from(name: &str) -> Self {
        Expression::Identifier(Identifier::new(name))
    }
}

impl From<String> for Expression {
    fn from(name: String) -> Self {
        Expression::Identifier(Identifier::new(name))
    }
}

impl From<Identifier> for Expression {
    fn from(identifier: Identifier) -> Self {
        Expression::Identifier(identifier)
    }
}

impl From<Column> for Expression {
    fn from(column: Column) -> Self {
        Expression::Column(column)
    }
}

impl From<WindowExpression> for Expression {
    fn from(window: WindowExpression) -> Self {
        Expression::Window(Box::new(window))
    }
}

/// A name reference, optionally double-quoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub quoted: bool,
}

impl Identifier {
    /// Create an unquoted identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quoted: false,
        }
    }

    /// Create a double-quoted identifier
    pub fn quoted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quoted: true,
        }
    }

    pub fn sql(&self) -> String {
        if self.quoted {
            format!("\"{}\"", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// A column reference, optionally qualified with a table name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: Identifier,
    pub table: Option<Identifier>,
}

impl Column {
    /// Create an unqualified column reference
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Identifier::new(name),
            table: None,
        }
    }

    /// Create a table-qualified column reference
    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: Identifier::new(name),
            table: Some(Identifier::new(table)),
        }
    }

    pub fn sql(&self) -> String {
        match &self.table {
            Some(table) => format!("{}.{}", table.sql(), self.name.sql()),
            None => self.name.sql(),
        }
    }
}

/// A verbatim SQL fragment. Rendered exactly as written; the caller is
/// responsible for its validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSql(pub String);

impl RawSql {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }
}

/// Sort direction for an [`Ordered`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// One field of an ORDER BY list: an expression plus an optional explicit
/// sort direction. When the direction is `None` nothing is rendered after
/// the expression, leaving the dialect default in effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ordered {
    pub expr: Expression,
    pub direction: Option<OrderDirection>,
}

impl Ordered {
    /// Order by `expr` with no explicit direction
    pub fn new(expr: impl Into<Expression>) -> Self {
        Self {
            expr: expr.into(),
            direction: None,
        }
    }

    /// Order by `expr` ascending
    pub fn asc(expr: impl Into<Expression>) -> Self {
        Self {
            expr: expr.into(),
            direction: Some(OrderDirection::Asc),
        }
    }

    /// Order by `expr` descending
    pub fn desc(expr: impl Into<Expression>) -> Self {
        Self {
            expr: expr.into(),
            direction: Some(OrderDirection::Desc),
        }
    }
}

impl From<&str> for Ordered {
    fn from(name: &str) -> Self {
        Ordered::new(name)
    }
}

impl From<String> for Ordered {
    fn from(name: String) -> Self {
        Ordered::new(name)
    }
}

impl From<Expression> for Ordered {
    fn from(expr: Expression) -> Self {
        Ordered::new(expr)
    }
}

/// An ORDER BY clause accumulating [`Ordered`] fields.
///
/// Fields added across multiple [`add`](OrderByExpression::add) calls keep
/// their insertion order; the clause never deduplicates or replaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderByExpression {
    fields: Vec<Ordered>,
}

impl OrderByExpression {
    /// Create an empty clause
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `fields` to the clause
    pub fn add<I>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Ordered>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// The accumulated fields, in insertion order
    pub fn fields(&self) -> &[Ordered] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render `ORDER BY f1[, f2, ...]`, appending ` ASC`/` DESC` only where a
    /// direction was set explicitly.
    pub fn sql(&self, binder: &mut ValueBinder) -> String {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|field| match field.direction {
                Some(direction) => format!("{} {}", field.expr.sql(binder), direction),
                None => field.expr.sql(binder),
            })
            .collect();
        format!("ORDER BY {}", fields.join(", "))
    }

    /// Visit each field's expression in order, recursing into it before
    /// moving to the next field.
    pub fn traverse<F>(&self, visitor: &mut F) -> &Self
    where
        F: FnMut(&Expression),
    {
        for field in &self.fields {
            visitor(&field.expr);
            field.expr.traverse(visitor);
        }
        self
    }
}
