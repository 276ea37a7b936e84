//! Tabular dataset model shared by loss functions, attackers and metrics.
//!
//! A [`Table`] is a set of equal-length named columns, each either numeric or
//! categorical. Two tables exist per evaluation: `real` (ground truth, never
//! seen by an attacker during fit) and `synthetic` (the attacker's only
//! training signal).

use serde::{Deserialize, Serialize};

/// Errors raised by table construction and typed column access.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TableError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("Column '{0}' is not categorical")]
    NotCategorical(String),

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Column '{name}' has {got} rows, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        got: usize,
    },
}

/// The type of a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Continuous or discrete numeric values
    Numeric,
    /// Unordered categorical labels
    Categorical,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Categorical => write!(f, "categorical"),
        }
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Category(String),
}

impl Value {
    /// The kind of this value.
    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Number(_) => ColumnKind::Numeric,
            Self::Category(_) => ColumnKind::Categorical,
        }
    }

    /// The numeric payload, if this is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(x) => Some(*x),
            Self::Category(_) => None,
        }
    }

    /// The category label, if this is categorical.
    #[must_use]
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Category(c) => Some(c),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(x) => write!(f, "{x}"),
            Self::Category(c) => write!(f, "{c}"),
        }
    }
}

/// Column storage, typed per column rather than per cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum ColumnData {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

/// A named column of homogeneous values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a numeric column.
    #[must_use]
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    /// Create a categorical column.
    #[must_use]
    pub fn categorical(name: impl Into<String>, values: Vec<impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values.into_iter().map(Into::into).collect()),
        }
    }

    /// The column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column kind.
    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
        }
    }

    /// Number of rows in this column.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    /// Whether the column has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cell at `idx` as a [`Value`]. Caller guarantees `idx < len()`.
    fn value_at(&self, idx: usize) -> Value {
        match &self.data {
            ColumnData::Numeric(v) => Value::Number(v[idx]),
            ColumnData::Categorical(v) => Value::Category(v[idx].clone()),
        }
    }
}

/// An in-memory table of equal-length named columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table from columns.
    ///
    /// # Errors
    /// Returns error if column names repeat or column lengths differ.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let expected = columns.first().map_or(0, Column::len);
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(TableError::DuplicateColumn(col.name.clone()));
            }
            if col.len() != expected {
                return Err(TableError::RaggedColumn {
                    name: col.name.clone(),
                    expected,
                    got: col.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The kind of a column, if it exists.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.column(name).map(Column::kind)
    }

    /// Iterate over column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    /// Names of all columns of the given kind, in declaration order.
    #[must_use]
    pub fn columns_of_kind(&self, kind: ColumnKind) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind() == kind)
            .map(Column::name)
            .collect()
    }

    /// Borrow a numeric column's values.
    ///
    /// # Errors
    /// Returns error if the column is missing or categorical.
    pub fn numeric(&self, name: &str) -> Result<&[f64], TableError> {
        let col = self
            .column(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;
        match &col.data {
            ColumnData::Numeric(v) => Ok(v),
            ColumnData::Categorical(_) => Err(TableError::NotNumeric(name.to_string())),
        }
    }

    /// Borrow a categorical column's labels.
    ///
    /// # Errors
    /// Returns error if the column is missing or numeric.
    pub fn categorical(&self, name: &str) -> Result<&[String], TableError> {
        let col = self
            .column(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;
        match &col.data {
            ColumnData::Categorical(v) => Ok(v),
            ColumnData::Numeric(_) => Err(TableError::NotCategorical(name.to_string())),
        }
    }

    /// Materialize the given columns as row tuples.
    ///
    /// # Errors
    /// Returns error if any column is missing.
    pub fn rows(&self, columns: &[String]) -> Result<Vec<Vec<Value>>, TableError> {
        let selected: Vec<&Column> = columns
            .iter()
            .map(|name| {
                self.column(name)
                    .ok_or_else(|| TableError::UnknownColumn(name.clone()))
            })
            .collect::<Result<_, _>>()?;

        Ok((0..self.num_rows())
            .map(|idx| selected.iter().map(|c| c.value_at(idx)).collect())
            .collect())
    }
}
