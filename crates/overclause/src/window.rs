//! Window (OVER) clause builder.
//!
//! A [`WindowExpression`] models the `OVER (...)` clause attached to a window
//! or aggregate function call: the partition list, the ordering sub-tree, the
//! frame specification (RANGE/ROWS/GROUPS with one or two bounds), and the
//! frame exclusion mode.
//!
//! The clause is built through fluent mutators and rendered with
//! [`sql`](WindowExpression::sql). Illegal frame combinations are rejected at
//! construction time by [`frame`](WindowExpression::frame); rendering and
//! traversal never fail.
//!
//! # Examples
//!
//! ```
//! use overclause::binder::ValueBinder;
//! use overclause::window::WindowExpression;
//!
//! let mut w = WindowExpression::new();
//! w.partition("account_id").order(["created"]);
//! w.rows_between(3, 0).unwrap();
//!
//! let mut binder = ValueBinder::new();
//! assert_eq!(
//!     w.sql(&mut binder),
//!     "OVER (PARTITION BY account_id ORDER BY created ROWS BETWEEN 3 PRECEDING AND CURRENT ROW)"
//! );
//! ```

use crate::binder::{BindingType, ValueBinder};
use crate::builder::{IntoOrderFields, IntoPartitions};
use crate::error::{Error, Result};
use crate::expressions::{Expression, OrderByExpression};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The unit a frame is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameKind {
    /// Value range relative to the current row's ordering key
    Range,
    /// Physical row count
    Rows,
    /// Peer-group count
    Groups,
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameKind::Range => write!(f, "RANGE"),
            FrameKind::Rows => write!(f, "ROWS"),
            FrameKind::Groups => write!(f, "GROUPS"),
        }
    }
}

/// Which side of the current row a bound lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundDirection {
    Preceding,
    Following,
}

impl fmt::Display for BoundDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundDirection::Preceding => write!(f, "PRECEDING"),
            BoundDirection::Following => write!(f, "FOLLOWING"),
        }
    }
}

/// Rows removed from an otherwise-included frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exclusion {
    CurrentRow,
    Group,
    Ties,
    NoOthers,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::CurrentRow => write!(f, "CURRENT ROW"),
            Exclusion::Group => write!(f, "GROUP"),
            Exclusion::Ties => write!(f, "TIES"),
            Exclusion::NoOthers => write!(f, "NO OTHERS"),
        }
    }
}

/// The distance of a frame bound from the current row.
///
/// Integers and `None`-like values convert directly; strings are interval
/// literals, legal only in RANGE frames, and are bound as string parameters
/// at render time rather than spliced into the SQL text.
///
/// ```
/// use overclause::window::FrameOffset;
///
/// let rows: FrameOffset = 3.into();
/// let interval: FrameOffset = "1 day".into();
/// let open: FrameOffset = Option::<i64>::None.into();
/// assert_eq!(open, FrameOffset::Unbounded);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameOffset {
    /// No limit in the bound's direction
    Unbounded,
    /// A row/group count or value distance; `0` means the current row
    Value(i64),
    /// An interval literal such as `"1 day"` (RANGE frames only)
    Interval(String),
}

impl FrameOffset {
    /// The current row, i.e. an offset of zero
    pub fn current_row() -> Self {
        FrameOffset::Value(0)
    }

    /// No limit in the bound's direction
    pub fn unbounded() -> Self {
        FrameOffset::Unbounded
    }
}

impl From<i64> for FrameOffset {
    fn from(offset: i64) -> Self {
        FrameOffset::Value(offset)
    }
}

impl From<i32> for FrameOffset {
    fn from(offset: i32) -> Self {
        FrameOffset::Value(offset as i64)
    }
}

impl From<u32> for FrameOffset {
    fn from(offset: u32) -> Self {
        FrameOffset::Value(offset as i64)
    }
}

impl From<&str> for FrameOffset {
    fn from(interval: &str) -> Self {
        FrameOffset::Interval(interval.to_string())
    }
}

impl From<String> for FrameOffset {
    fn from(interval: String) -> Self {
        FrameOffset::Interval(interval)
    }
}

impl<T: Into<FrameOffset>> From<Option<T>> for FrameOffset {
    /// `None` means unbounded.
    fn from(offset: Option<T>) -> Self {
        match offset {
            Some(offset) => offset.into(),
            None => FrameOffset::Unbounded,
        }
    }
}

/// One edge of a frame: an offset plus the direction it extends in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameBound {
    pub offset: FrameOffset,
    pub direction: BoundDirection,
}

impl FrameBound {
    pub fn new(offset: impl Into<FrameOffset>, direction: BoundDirection) -> Self {
        Self {
            offset: offset.into(),
            direction,
        }
    }

    /// A bound extending before the current row
    pub fn preceding(offset: impl Into<FrameOffset>) -> Self {
        Self::new(offset, BoundDirection::Preceding)
    }

    /// A bound extending after the current row
    pub fn following(offset: impl Into<FrameOffset>) -> Self {
        Self::new(offset, BoundDirection::Following)
    }

    /// Render this bound, binding interval offsets as string parameters.
    ///
    /// A zero offset renders as `CURRENT ROW` with no direction keyword;
    /// everything else renders as `<offset> <direction>` where the offset
    /// text is `UNBOUNDED`, the integer, or a freshly minted placeholder.
    fn sql(&self, binder: &mut ValueBinder) -> String {
        let offset = match &self.offset {
            FrameOffset::Value(0) => return "CURRENT ROW".to_string(),
            FrameOffset::Value(offset) => offset.to_string(),
            FrameOffset::Unbounded => "UNBOUNDED".to_string(),
            FrameOffset::Interval(interval) => {
                let placeholder = binder.placeholder("param");
                binder.bind(placeholder.clone(), interval.as_str(), BindingType::String);
                placeholder
            }
        };
        format!("{} {}", offset, self.direction)
    }
}

/// A frame specification: kind, mandatory start bound, optional end bound.
///
/// With an end bound present the frame renders as `BETWEEN start AND end`;
/// without one it renders single-sided. The distinction is carried solely by
/// `end` being `Some` or `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub kind: FrameKind,
    pub start: FrameBound,
    pub end: Option<FrameBound>,
}

/// A window (OVER) clause.
///
/// Created empty, mutated fluently, rendered any number of times. Partition
/// and order mutations accumulate; frame and exclusion mutations overwrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowExpression {
    partitions: Vec<Expression>,
    /// Always the `Expression::OrderBy` variant when set; kept as an
    /// `Expression` so traversal hands the sub-tree to visitors uniformly.
    order: Option<Expression>,
    frame: Option<Frame>,
    exclusion: Option<Exclusion>,
}

impl WindowExpression {
    /// Create an empty clause, rendering as `OVER ()`
    pub fn new() -> Self {
        Self::default()
    }

    /// Append partition keys.
    ///
    /// Accepts a single name, a single [`Expression`], or a collection of
    /// either; raw text is promoted to an identifier reference. Empty input
    /// is a no-op, so conditional fluent chains need no branching:
    ///
    /// ```
    /// use overclause::window::WindowExpression;
    ///
    /// let mut w = WindowExpression::new();
    /// w.partition("region").partition(["account_id", "plan"]);
    /// assert_eq!(w.partitions().len(), 3);
    /// ```
    pub fn partition<P: IntoPartitions>(&mut self, partitions: P) -> &mut Self {
        self.partitions.extend(partitions.into_partitions());
        self
    }

    /// Append ordering fields.
    ///
    /// The order sub-tree is created lazily on the first non-empty call;
    /// later calls add to it rather than replacing it. Empty input is a
    /// no-op.
    pub fn order<F: IntoOrderFields>(&mut self, fields: F) -> &mut Self {
        let fields = fields.into_order_fields();
        if fields.is_empty() {
            return self;
        }
        match &mut self.order {
            Some(Expression::OrderBy(order)) => {
                order.add(fields);
            }
            _ => {
                let mut order = OrderByExpression::new();
                order.add(fields);
                self.order = Some(Expression::OrderBy(Box::new(order)));
            }
        }
        self
    }

    /// Set a one-sided RANGE frame: `RANGE <start> PRECEDING`.
    pub fn range(&mut self, start: impl Into<FrameOffset>) -> Result<&mut Self> {
        self.frame(FrameKind::Range, FrameBound::preceding(start), None)
    }

    /// Set a two-sided RANGE frame:
    /// `RANGE BETWEEN <start> PRECEDING AND <end> FOLLOWING`.
    pub fn range_between(
        &mut self,
        start: impl Into<FrameOffset>,
        end: impl Into<FrameOffset>,
    ) -> Result<&mut Self> {
        self.frame(
            FrameKind::Range,
            FrameBound::preceding(start),
            Some(FrameBound::following(end)),
        )
    }

    /// Set a one-sided ROWS frame: `ROWS <start> PRECEDING`.
    pub fn rows(&mut self, start: impl Into<FrameOffset>) -> Result<&mut Self> {
        self.frame(FrameKind::Rows, FrameBound::preceding(start), None)
    }

    /// Set a two-sided ROWS frame:
    /// `ROWS BETWEEN <start> PRECEDING AND <end> FOLLOWING`.
    ///
    /// An end offset of `0` ends the frame at the current row; this is a
    /// different clause than the one-sided [`rows`](WindowExpression::rows):
    ///
    /// ```
    /// use overclause::binder::ValueBinder;
    /// use overclause::window::WindowExpression;
    ///
    /// let mut binder = ValueBinder::new();
    /// let mut w = WindowExpression::new();
    /// w.rows_between(3, 0).unwrap();
    /// assert_eq!(w.sql(&mut binder), "OVER (ROWS BETWEEN 3 PRECEDING AND CURRENT ROW)");
    /// ```
    pub fn rows_between(
        &mut self,
        start: impl Into<FrameOffset>,
        end: impl Into<FrameOffset>,
    ) -> Result<&mut Self> {
        self.frame(
            FrameKind::Rows,
            FrameBound::preceding(start),
            Some(FrameBound::following(end)),
        )
    }

    /// Set a one-sided GROUPS frame: `GROUPS <start> PRECEDING`.
    pub fn groups(&mut self, start: impl Into<FrameOffset>) -> Result<&mut Self> {
        self.frame(FrameKind::Groups, FrameBound::preceding(start), None)
    }

    /// Set a two-sided GROUPS frame:
    /// `GROUPS BETWEEN <start> PRECEDING AND <end> FOLLOWING`.
    pub fn groups_between(
        &mut self,
        start: impl Into<FrameOffset>,
        end: impl Into<FrameOffset>,
    ) -> Result<&mut Self> {
        self.frame(
            FrameKind::Groups,
            FrameBound::preceding(start),
            Some(FrameBound::following(end)),
        )
    }

    /// Set the frame specification, replacing any previous frame.
    ///
    /// This is the single validation point for frames. Offsets must be
    /// non-negative, and interval offsets are only legal for
    /// [`FrameKind::Range`]. On error nothing is mutated; a previously set
    /// frame stays intact.
    pub fn frame(
        &mut self,
        kind: FrameKind,
        start: FrameBound,
        end: Option<FrameBound>,
    ) -> Result<&mut Self> {
        Self::validate_bound(kind, &start)?;
        if let Some(end) = &end {
            Self::validate_bound(kind, end)?;
        }
        self.frame = Some(Frame { kind, start, end });
        Ok(self)
    }

    fn validate_bound(kind: FrameKind, bound: &FrameBound) -> Result<()> {
        match &bound.offset {
            FrameOffset::Value(offset) if *offset < 0 => Err(Error::negative_offset(*offset)),
            FrameOffset::Interval(_) if kind != FrameKind::Range => {
                Err(Error::interval_offset(kind))
            }
            _ => Ok(()),
        }
    }

    /// Exclude the current row from the frame
    pub fn exclude_current(&mut self) -> &mut Self {
        self.exclusion = Some(Exclusion::CurrentRow);
        self
    }

    /// Exclude the current row and its ordering peers from the frame
    pub fn exclude_group(&mut self) -> &mut Self {
        self.exclusion = Some(Exclusion::Group);
        self
    }

    /// Exclude the current row's peers but keep the current row
    pub fn exclude_ties(&mut self) -> &mut Self {
        self.exclusion = Some(Exclusion::Ties);
        self
    }

    /// Exclude nothing (the explicit default)
    pub fn exclude_no_others(&mut self) -> &mut Self {
        self.exclusion = Some(Exclusion::NoOthers);
        self
    }

    /// The partition keys, in insertion order
    pub fn partitions(&self) -> &[Expression] {
        &self.partitions
    }

    /// The order sub-tree, if any ordering field has been added
    pub fn order_by(&self) -> Option<&OrderByExpression> {
        match &self.order {
            Some(Expression::OrderBy(order)) => Some(order),
            _ => None,
        }
    }

    /// The frame specification, if one has been set
    pub fn frame_spec(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// The exclusion mode, if one has been set
    pub fn exclusion(&self) -> Option<Exclusion> {
        self.exclusion
    }

    /// Whether nothing has been set on the clause yet
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
            && self.order.is_none()
            && self.frame.is_none()
            && self.exclusion.is_none()
    }

    /// Render the clause as `OVER (...)`.
    ///
    /// Segments appear in fixed order -- partitions, ordering, frame --
    /// joined by single spaces, with empty segments omitted entirely. An
    /// empty clause renders as `OVER ()`. Interval offsets are bound to
    /// `binder` as string parameters; rendering the same clause again mints
    /// fresh placeholders for the same values.
    pub fn sql(&self, binder: &mut ValueBinder) -> String {
        let mut clauses: Vec<String> = Vec::new();

        if !self.partitions.is_empty() {
            let partitions: Vec<String> =
                self.partitions.iter().map(|p| p.sql(binder)).collect();
            clauses.push(format!("PARTITION BY {}", partitions.join(", ")));
        }

        if let Some(order) = &self.order {
            clauses.push(order.sql(binder));
        }

        if let Some(frame) = &self.frame {
            let mut clause = match &frame.end {
                Some(end) => format!(
                    "{} BETWEEN {} AND {}",
                    frame.kind,
                    frame.start.sql(binder),
                    end.sql(binder)
                ),
                None => format!("{} {}", frame.kind, frame.start.sql(binder)),
            };
            if let Some(exclusion) = self.exclusion {
                clause.push_str(&format!(" EXCLUDE {}", exclusion));
            }
            clauses.push(clause);
        }

        format!("OVER ({})", clauses.join(" "))
    }

    /// Invoke `visitor` on every nested expression node.
    ///
    /// Partitions are visited in insertion order, each immediately followed
    /// by its own sub-traversal, then the order sub-tree and its
    /// sub-traversal. The frame and exclusion hold no expression nodes and
    /// contribute no visits.
    pub fn traverse<F>(&self, visitor: &mut F) -> &Self
    where
        F: FnMut(&Expression),
    {
        for partition in &self.partitions {
            visitor(partition);
            partition.traverse(visitor);
        }
        if let Some(order) = &self.order {
            visitor(order);
            order.traverse(visitor);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{col, desc, raw};

    fn render(window: &WindowExpression) -> String {
        let mut binder = ValueBinder::new();
        window.sql(&mut binder)
    }

    #[test]
    fn test_empty_clause() {
        let w = WindowExpression::new();
        assert!(w.is_empty());
        assert_eq!(render(&w), "OVER ()");
    }

    #[test]
    fn test_partition_accumulates() {
        let mut w = WindowExpression::new();
        w.partition("a").partition([col("t.b"), raw("c + 1")]);
        assert_eq!(w.partitions().len(), 3);
        assert_eq!(render(&w), "OVER (PARTITION BY a, t.b, c + 1)");
    }

    #[test]
    fn test_empty_partition_is_noop() {
        let mut w = WindowExpression::new();
        w.partition("a");
        let before = render(&w);
        w.partition("").partition(Vec::<Expression>::new());
        assert_eq!(w.partitions().len(), 1);
        assert_eq!(render(&w), before);
    }

    #[test]
    fn test_order_lazily_created_and_accumulates() {
        let mut w = WindowExpression::new();
        assert!(w.order_by().is_none());
        w.order(["a"]);
        w.order([desc("b")]);
        assert_eq!(w.order_by().unwrap().fields().len(), 2);
        assert_eq!(render(&w), "OVER (ORDER BY a, b DESC)");
    }

    #[test]
    fn test_empty_order_is_noop() {
        let mut w = WindowExpression::new();
        w.order(Vec::<&str>::new());
        assert!(w.order_by().is_none());
        assert_eq!(render(&w), "OVER ()");
    }

    #[test]
    fn test_one_sided_rows_frame() {
        let mut w = WindowExpression::new();
        w.rows(3).unwrap();
        assert_eq!(render(&w), "OVER (ROWS 3 PRECEDING)");
    }

    #[test]
    fn test_two_sided_rows_frame_ending_at_current_row() {
        let mut w = WindowExpression::new();
        w.rows_between(3, 0).unwrap();
        assert_eq!(render(&w), "OVER (ROWS BETWEEN 3 PRECEDING AND CURRENT ROW)");
    }

    #[test]
    fn test_unbounded_rows_frame() {
        let mut w = WindowExpression::new();
        w.rows(FrameOffset::unbounded()).unwrap();
        assert_eq!(render(&w), "OVER (ROWS UNBOUNDED PRECEDING)");
    }

    #[test]
    fn test_two_sided_range_frame() {
        let mut w = WindowExpression::new();
        w.range_between(5, 10).unwrap();
        assert_eq!(render(&w), "OVER (RANGE BETWEEN 5 PRECEDING AND 10 FOLLOWING)");
    }

    #[test]
    fn test_groups_frame() {
        let mut w = WindowExpression::new();
        w.groups_between(FrameOffset::unbounded(), FrameOffset::unbounded())
            .unwrap();
        assert_eq!(
            render(&w),
            "OVER (GROUPS BETWEEN UNBOUNDED PRECEDING AND UNBOUNDED FOLLOWING)"
        );
    }

    #[test]
    fn test_zero_start_renders_current_row() {
        let mut w = WindowExpression::new();
        w.rows(0).unwrap();
        assert_eq!(render(&w), "OVER (ROWS CURRENT ROW)");
    }

    #[test]
    fn test_negative_offset_rejected() {
        let mut w = WindowExpression::new();
        assert_eq!(
            w.rows(-1).unwrap_err(),
            Error::NegativeOffset { offset: -1 }
        );
        assert_eq!(
            w.range_between(1, -2).unwrap_err(),
            Error::NegativeOffset { offset: -2 }
        );
    }

    #[test]
    fn test_interval_offset_rejected_for_rows_and_groups() {
        let mut w = WindowExpression::new();
        assert_eq!(
            w.rows("1 day").unwrap_err(),
            Error::IntervalOffset { kind: FrameKind::Rows }
        );
        assert_eq!(
            w.groups("1 day").unwrap_err(),
            Error::IntervalOffset { kind: FrameKind::Groups }
        );
    }

    #[test]
    fn test_interval_offset_allowed_for_range() {
        let mut w = WindowExpression::new();
        w.range("1 day").unwrap();

        let mut binder = ValueBinder::new();
        let sql = w.sql(&mut binder);
        let bindings = binder.bindings();
        assert_eq!(bindings.len(), 1);
        assert_eq!(sql, format!("OVER (RANGE {} PRECEDING)", bindings[0].placeholder));
        assert_eq!(bindings[0].value, crate::binder::Value::String("1 day".to_string()));
        assert_eq!(bindings[0].kind, BindingType::String);
    }

    #[test]
    fn test_failed_frame_keeps_prior_frame() {
        let mut w = WindowExpression::new();
        w.rows(3).unwrap();
        let before = render(&w);
        assert!(w.rows(-1).is_err());
        assert!(w.groups("1 day").is_err());
        assert_eq!(render(&w), before);
    }

    #[test]
    fn test_frame_overwrites_prior_frame() {
        let mut w = WindowExpression::new();
        w.rows(3).unwrap();
        w.range_between(0, 2).unwrap();
        assert_eq!(
            render(&w),
            "OVER (RANGE BETWEEN CURRENT ROW AND 2 FOLLOWING)"
        );
    }

    #[test]
    fn test_exclusion_last_write_wins() {
        let mut w = WindowExpression::new();
        w.rows(1).unwrap();
        w.exclude_current().exclude_group();
        assert_eq!(w.exclusion(), Some(Exclusion::Group));
        assert_eq!(render(&w), "OVER (ROWS 1 PRECEDING EXCLUDE GROUP)");

        w.exclude_ties();
        assert_eq!(render(&w), "OVER (ROWS 1 PRECEDING EXCLUDE TIES)");
        w.exclude_no_others();
        assert_eq!(render(&w), "OVER (ROWS 1 PRECEDING EXCLUDE NO OTHERS)");
    }

    #[test]
    fn test_segment_order_and_spacing() {
        let mut w = WindowExpression::new();
        w.partition("x");
        w.rows(3).unwrap();
        assert_eq!(render(&w), "OVER (PARTITION BY x ROWS 3 PRECEDING)");
    }

    #[test]
    fn test_traverse_visits_partitions_then_order() {
        let mut w = WindowExpression::new();
        w.partition(["a", "b"]).order(["c"]);

        let mut visits = Vec::new();
        let result = w.traverse(&mut |e: &Expression| {
            let label = match e {
                Expression::Identifier(identifier) => identifier.name.clone(),
                Expression::OrderBy(_) => "<order>".to_string(),
                _ => "<other>".to_string(),
            };
            visits.push(label);
        });
        assert_eq!(visits, vec!["a", "b", "<order>", "c"]);
        assert!(std::ptr::eq(result, &w));
    }

    #[test]
    fn test_traverse_skips_frame_and_exclusion() {
        let mut w = WindowExpression::new();
        w.range("1 day").unwrap();
        w.exclude_ties();

        let mut count = 0;
        w.traverse(&mut |_: &Expression| count += 1);
        assert_eq!(count, 0);
    }
}
