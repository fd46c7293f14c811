use std::collections::HashSet;
use std::fmt;

/// Typed property columns understood by the bulk graph loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Int,
    Long,
    Float,
    Bool,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::String => "String",
            PropertyType::Int => "Int",
            PropertyType::Long => "Long",
            PropertyType::Float => "Float",
            PropertyType::Bool => "Bool",
        }
    }
}

/// Role a column plays in the bulk load format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Id,
    Label,
    From,
    To,
    Property(&'static str, PropertyType),
}

impl Column {
    /// Decorated header name, e.g. `~id` or `rating:Float`
    pub fn header(&self) -> String {
        match self {
            Column::Id => "~id".to_string(),
            Column::Label => "~label".to_string(),
            Column::From => "~from".to_string(),
            Column::To => "~to".to_string(),
            Column::Property(name, ty) => format!("{}:{}", name, ty.as_str()),
        }
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i32),
    Long(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            // Whole floats keep one decimal so the loader still sees a float
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Node,
    Edge,
}

impl TableKind {
    pub fn directory(&self) -> &'static str {
        match self {
            TableKind::Node => "nodes",
            TableKind::Edge => "edges",
        }
    }
}

/// One node or edge table destined for a single export unit
#[derive(Debug, Clone)]
pub struct GraphTable {
    pub kind: TableKind,
    pub name: &'static str,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
    /// Quote every field on export, not only the ones that need it
    pub quote_all: bool,
}

impl GraphTable {
    pub fn nodes(name: &'static str, properties: &[(&'static str, PropertyType)]) -> Self {
        let mut columns = vec![Column::Id, Column::Label];
        columns.extend(properties.iter().map(|&(n, t)| Column::Property(n, t)));
        Self {
            kind: TableKind::Node,
            name,
            columns,
            rows: Vec::new(),
            quote_all: false,
        }
    }

    pub fn edges(name: &'static str, properties: &[(&'static str, PropertyType)]) -> Self {
        let mut columns = vec![Column::Id, Column::From, Column::To, Column::Label];
        columns.extend(properties.iter().map(|&(n, t)| Column::Property(n, t)));
        Self {
            kind: TableKind::Edge,
            name,
            columns,
            rows: Vec::new(),
            quote_all: false,
        }
    }

    pub fn quoted(mut self) -> Self {
        self.quote_all = true;
        self
    }

    /// Append a row; panics when the arity does not match the columns
    pub fn push(&mut self, row: Vec<Value>) {
        assert_eq!(
            row.len(),
            self.columns.len(),
            "row arity mismatch for table {}",
            self.name
        );
        self.rows.push(row);
    }

    /// Drop rows identical to an earlier row, keeping first-seen order
    pub fn dedup(&mut self) -> &mut Self {
        let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(self.rows.len());
        self.rows
            .retain(|row| seen.insert(row.iter().map(|v| v.to_string()).collect()));
        self
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(Column::header).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column with the given decorated header
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.header() == header)
    }

    /// Cell lookup by row number and decorated header
    pub fn value(&self, row: usize, header: &str) -> Option<&Value> {
        let idx = self.column_index(header)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// All values of one column, in row order
    pub fn column_values(&self, header: &str) -> Vec<&Value> {
        match self.column_index(header) {
            Some(idx) => self.rows.iter().map(|r| &r[idx]).collect(),
            None => Vec::new(),
        }
    }

    /// Every `~id` in the table
    pub fn ids(&self) -> HashSet<String> {
        self.column_values("~id")
            .into_iter()
            .map(|v| v.to_string())
            .collect()
    }
}
