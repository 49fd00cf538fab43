//! Query building blocks for the relational read path.
//!
//! The hosted backend exposes filtered/ordered reads with embedded joins.
//! [`Select`] captures the pieces the client actually uses: a column (or
//! embedded-join) clause, equality filters, one ordering, and a row limit.

use serde::{Deserialize, Serialize};

/// An equality filter on a single column.
///
/// Equality is the only comparator the client needs; every filtered read in
/// the application is keyed or scoped by an exact id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Column name.
    pub column: String,
    /// Value the column must equal (rendered as text on the wire).
    pub value: String,
}

impl Filter {
    /// Creates an equality filter.
    pub fn eq(column: impl Into<String>, value: impl ToString) -> Self {
        Self {
            column: column.into(),
            value: value.to_string(),
        }
    }
}

/// Ordering applied to a select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Column to order by.
    pub column: String,
    /// Ascending when true, descending otherwise.
    pub ascending: bool,
}

impl Order {
    /// Ascending order on the given column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    /// Descending order on the given column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// A select query against a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Select {
    /// Column clause, `*` or an embedded-join expression.
    pub columns: String,
    /// Equality filters, applied conjunctively.
    pub filters: Vec<Filter>,
    /// Optional ordering.
    pub order: Option<Order>,
    /// Optional row limit.
    pub limit: Option<u32>,
}

impl Select {
    /// Creates a select with the given column clause.
    pub fn new(columns: impl Into<String>) -> Self {
        Self {
            columns: columns.into(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Selects all plain columns.
    pub fn all() -> Self {
        Self::new("*")
    }

    /// Adds an equality filter.
    pub fn filter(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    /// Sets the ordering.
    pub fn order_by(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    /// Sets the row limit.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
