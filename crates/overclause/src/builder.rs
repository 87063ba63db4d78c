//! Helper constructors and conversion traits for the fluent API.
//!
//! The free functions ([`ident`], [`col`], [`raw`], [`asc`], [`desc`]) create
//! leaf values for partition and order lists without manual struct
//! construction. The conversion traits ([`IntoPartitions`],
//! [`IntoOrderFields`]) let the [`WindowExpression`](crate::window::WindowExpression)
//! mutators accept a single item or a collection of items interchangeably,
//! with raw text promoted to identifier references.
//!
//! # Examples
//!
//! ```
//! use overclause::binder::ValueBinder;
//! use overclause::builder::{col, desc};
//! use overclause::window::WindowExpression;
//!
//! let mut w = WindowExpression::new();
//! w.partition(col("orders.region")).order([desc("created")]);
//!
//! let mut binder = ValueBinder::new();
//! assert_eq!(w.sql(&mut binder), "OVER (PARTITION BY orders.region ORDER BY created DESC)");
//! ```

use crate::expressions::{Column, Expression, Identifier, Ordered, RawSql};

/// Create an unquoted identifier reference expression.
pub fn ident(name: &str) -> Expression {
    Expression::Identifier(Identifier::new(name))
}

/// Create a double-quoted identifier reference expression.
pub fn quoted_ident(name: &str) -> Expression {
    Expression::Identifier(Identifier::quoted(name))
}

/// Create a column reference expression.
///
/// If `name` contains a dot, it is split on the **last** `.` to produce a
/// table-qualified column (e.g. `"o.region"` becomes `o.region`).
pub fn col(name: &str) -> Expression {
    if let Some((table, column)) = name.rsplit_once('.') {
        Expression::Column(Column::qualified(table, column))
    } else {
        Expression::Column(Column::new(name))
    }
}

/// Create a verbatim SQL fragment expression. The fragment is rendered
/// exactly as written.
pub fn raw(sql: &str) -> Expression {
    Expression::Raw(RawSql::new(sql))
}

/// Create an ascending order field.
pub fn asc(field: impl Into<Expression>) -> Ordered {
    Ordered::asc(field)
}

/// Create a descending order field.
pub fn desc(field: impl Into<Expression>) -> Ordered {
    Ordered::desc(field)
}

/// Conversion trait for the `partition` mutator's input.
///
/// Accepts a single `&str` / `String` / [`Expression`], or a `Vec`, array, or
/// slice of convertible items. Empty input (the empty string or an empty
/// collection) converts to no partitions at all, making the mutator a no-op.
pub trait IntoPartitions {
    /// Convert this value into a list of partition expressions.
    fn into_partitions(self) -> Vec<Expression>;
}

impl IntoPartitions for &str {
    /// A single identifier name; the empty string yields no partitions.
    fn into_partitions(self) -> Vec<Expression> {
        if self.is_empty() {
            Vec::new()
        } else {
            vec![Expression::from(self)]
        }
    }
}

impl IntoPartitions for String {
    fn into_partitions(self) -> Vec<Expression> {
        self.as_str().into_partitions()
    }
}

impl IntoPartitions for Expression {
    fn into_partitions(self) -> Vec<Expression> {
        vec![self]
    }
}

impl<T: Into<Expression>> IntoPartitions for Vec<T> {
    fn into_partitions(self) -> Vec<Expression> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Expression>, const N: usize> IntoPartitions for [T; N] {
    fn into_partitions(self) -> Vec<Expression> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Expression> + Clone> IntoPartitions for &[T] {
    fn into_partitions(self) -> Vec<Expression> {
        self.iter().cloned().map(Into::into).collect()
    }
}

/// Conversion trait for the `order` mutator's input.
///
/// Accepts a single `&str` / [`Ordered`] / [`Expression`], or a `Vec`, array,
/// or slice of convertible items. Empty input converts to no fields, making
/// the mutator a no-op that leaves a not-yet-created order sub-tree alone.
pub trait IntoOrderFields {
    /// Convert this value into a list of order fields.
    fn into_order_fields(self) -> Vec<Ordered>;
}

impl IntoOrderFields for &str {
    /// A single field name with no explicit direction; the empty string
    /// yields no fields.
    fn into_order_fields(self) -> Vec<Ordered> {
        if self.is_empty() {
            Vec::new()
        } else {
            vec![Ordered::from(self)]
        }
    }
}

impl IntoOrderFields for String {
    fn into_order_fields(self) -> Vec<Ordered> {
        self.as_str().into_order_fields()
    }
}

impl IntoOrderFields for Ordered {
    fn into_order_fields(self) -> Vec<Ordered> {
        vec![self]
    }
}

impl IntoOrderFields for Expression {
    fn into_order_fields(self) -> Vec<Ordered> {
        vec![Ordered::new(self)]
    }
}

impl<T: Into<Ordered>> IntoOrderFields for Vec<T> {
    fn into_order_fields(self) -> Vec<Ordered> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Ordered>, const N: usize> IntoOrderFields for [T; N] {
    fn into_order_fields(self) -> Vec<Ordered> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Ordered> + Clone> IntoOrderFields for &[T] {
    fn into_order_fields(self) -> Vec<Ordered> {
        self.iter().cloned().map(Into::into).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::ValueBinder;

    #[test]
    fn test_col_splits_on_last_dot() {
        let mut binder = ValueBinder::new();
        assert_eq!(col("region").sql(&mut binder), "region");
        assert_eq!(col("o.region").sql(&mut binder), "o.region");
        assert_eq!(col("db.o.region").sql(&mut binder), "db.o.region");
    }

    #[test]
    fn test_quoted_ident_renders_quotes() {
        let mut binder = ValueBinder::new();
        assert_eq!(quoted_ident("order").sql(&mut binder), "\"order\"");
    }

    #[test]
    fn test_empty_string_converts_to_nothing() {
        assert!("".into_partitions().is_empty());
        assert!("".into_order_fields().is_empty());
    }

    #[test]
    fn test_mixed_partition_collection() {
        let partitions = vec![ident("a"), col("t.b"), raw("c % 2")];
        assert_eq!(partitions.into_partitions().len(), 3);
    }
}
