//! Overclause - SQL window-function clause builder
//!
//! This library models the `OVER (...)` clause attached to window and
//! aggregate function calls: partitioning, ordering, frame bounds
//! (RANGE/ROWS/GROUPS), and frame exclusion. Clauses are built fluently,
//! validated at construction time, and rendered to whitespace-exact SQL text
//! with literal values bound as parameters.
//!
//! # Architecture
//!
//! The library is organized around three cooperating pieces:
//!
//! 1. **Expression tree** ([`expressions`]) - a closed set of node variants
//!    (identifiers, columns, raw fragments, order sub-trees, windows) sharing
//!    a render/traverse protocol, so tree-wide passes never inspect concrete
//!    node types.
//! 2. **Window clause** ([`window`]) - the [`WindowExpression`] builder with
//!    fluent mutators, frame validation, rendering, and traversal.
//! 3. **Value binding** ([`binder`]) - a [`ValueBinder`] threaded explicitly
//!    through every render call, minting placeholders for literal values the
//!    driver should receive as parameters.
//!
//! # Example
//!
//! ```
//! use overclause::binder::ValueBinder;
//! use overclause::builder::desc;
//! use overclause::window::WindowExpression;
//!
//! let mut w = WindowExpression::new();
//! w.partition("account_id")
//!     .order([desc("created")])
//!     .rows_between(3, 0)
//!     .unwrap()
//!     .exclude_ties();
//!
//! let mut binder = ValueBinder::new();
//! assert_eq!(
//!     w.sql(&mut binder),
//!     "OVER (PARTITION BY account_id ORDER BY created DESC \
//!      ROWS BETWEEN 3 PRECEDING AND CURRENT ROW EXCLUDE TIES)"
//! );
//! ```

pub mod binder;
pub mod builder;
pub mod error;
pub mod expressions;
pub mod window;

pub use binder::{Binding, BindingType, Value, ValueBinder};
pub use builder::{asc, col, desc, ident, quoted_ident, raw, IntoOrderFields, IntoPartitions};
pub use error::{Error, Result};
pub use expressions::{
    Column, Expression, Identifier, OrderByExpression, OrderDirection, Ordered, RawSql,
};
pub use window::{
    BoundDirection, Exclusion, Frame, FrameBound, FrameKind, FrameOffset, WindowExpression,
};
