//! Filter operations for PostgrestClient

/// Operator for filter expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equal to
    Eq,

    /// Less than or equal to
    Lte,

    /// Is (`null`, `true`, `false`)
    Is,
}

impl FilterOperator {
    /// Convert the operator to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Lte => "lte",
            FilterOperator::Is => "is",
        }
    }
}

/// A single `column=op.value` condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub operator: FilterOperator,
    pub value: String,
    pub negated: bool,
}

impl Filter {
    pub fn new(column: &str, operator: FilterOperator, value: impl ToString) -> Self {
        Self {
            column: column.to_string(),
            operator,
            value: value.to_string(),
            negated: false,
        }
    }

    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Render as a query parameter pair
    pub fn to_param(&self) -> (String, String) {
        let prefix = if self.negated { "not." } else { "" };
        (
            self.column.clone(),
            format!("{}{}.{}", prefix, self.operator.as_str(), self.value),
        )
    }
}

/// Shared filter methods for every builder that targets rows
pub trait Filterable: Sized {
    fn filters_mut(&mut self) -> &mut Vec<Filter>;

    fn filter(mut self, filter: Filter) -> Self {
        self.filters_mut().push(filter);
        self
    }

    /// Filter rows where column equals a value
    fn eq(self, column: &str, value: impl ToString) -> Self {
        self.filter(Filter::new(column, FilterOperator::Eq, value))
    }

    /// Filter rows where column is less than or equal to a value
    fn lte(self, column: &str, value: impl ToString) -> Self {
        self.filter(Filter::new(column, FilterOperator::Lte, value))
    }

    fn not_null(self, column: &str) -> Self {
        self.filter(Filter::new(column, FilterOperator::Is, "null").negate())
    }
}
