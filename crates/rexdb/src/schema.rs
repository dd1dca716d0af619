//! Table and column descriptors.
//!
//! A [`Table`] names a relation; a [`Column<K>`] names one of its columns and
//! carries a kind marker `K` that fixes the Rust type accepted by its
//! predicate builders:
//!
//! ```ignore
//! let posts = Table::new("posts");
//! let id = posts.int_column("id");
//! let title = posts.string_column("title");
//!
//! let clause = id.eq(1).and(title.like("%rust%"));
//! // (posts.id = ?) AND (posts.title LIKE ?)
//! ```

use crate::clause::Clause;
use crate::param::Param;
use chrono::{DateTime, Utc};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// Runtime tag for a column's value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Int,
    String,
    Bool,
    Float,
    Time,
    Json,
}

/// Compile-time column kind.
pub trait ColumnKind: private::Sealed {
    /// Rust type bound as the argument of comparisons against this column.
    type Value: ToSql + Send + Sync + 'static;

    /// Runtime tag for this kind.
    const KIND: Kind;
}

mod private {
    pub trait Sealed {}
}

macro_rules! column_kinds {
    ($($(#[$doc:meta])* $marker:ident => $value:ty, $kind:ident;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub enum $marker {}

            impl private::Sealed for $marker {}

            impl ColumnKind for $marker {
                type Value = $value;
                const KIND: Kind = Kind::$kind;
            }
        )*
    };
}

column_kinds! {
    /// Integer column (`bigint`).
    Int => i64, Int;
    /// Text column.
    Text => String, String;
    /// Boolean column.
    Bool => bool, Bool;
    /// Floating-point column (`double precision`).
    Float => f64, Float;
    /// Timestamp column (`timestamptz`).
    Time => DateTime<Utc>, Time;
    /// Structured column (`json`/`jsonb`).
    Json => serde_json::Value, Json;
}

pub type IntColumn = Column<Int>;
pub type StringColumn = Column<Text>;
pub type BoolColumn = Column<Bool>;
pub type FloatColumn = Column<Float>;
pub type TimeColumn = Column<Time>;
pub type JsonColumn = Column<Json>;

/// A table descriptor. Cheap to clone; columns keep a handle to their table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Table {
    name: Arc<str>,
}

impl Table {
    pub fn new(name: &str) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `<table>.*`
    pub fn all_columns(&self) -> String {
        format!("{}.*", self.name)
    }

    /// Create a column of kind `K` bound to this table.
    pub fn column<K: ColumnKind>(&self, name: &str) -> Column<K> {
        Column {
            table: self.clone(),
            name: name.into(),
            _kind: PhantomData,
        }
    }

    pub fn int_column(&self, name: &str) -> IntColumn {
        self.column(name)
    }

    pub fn string_column(&self, name: &str) -> StringColumn {
        self.column(name)
    }

    pub fn bool_column(&self, name: &str) -> BoolColumn {
        self.column(name)
    }

    pub fn float_column(&self, name: &str) -> FloatColumn {
        self.column(name)
    }

    pub fn time_column(&self, name: &str) -> TimeColumn {
        self.column(name)
    }

    pub fn json_column(&self, name: &str) -> JsonColumn {
        self.column(name)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A column descriptor of kind `K`.
pub struct Column<K: ColumnKind> {
    table: Table,
    name: Arc<str>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ColumnKind> Clone for Column<K> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            name: self.name.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: ColumnKind> fmt::Debug for Column<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("table", &self.table.name())
            .field("name", &&*self.name)
            .field("kind", &K::KIND)
            .finish()
    }
}

impl<K: ColumnKind> Column<K> {
    /// Unqualified column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn kind(&self) -> Kind {
        K::KIND
    }

    /// `<table>.<column>`
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.table.name(), self.name)
    }

    fn compare(&self, op: &str, value: impl Into<K::Value>) -> Clause {
        Clause::new(
            format!("{} {} ?", self.qualified(), op),
            vec![Param::new(value.into())],
        )
    }

    /// `<table>.<column> = ?`
    pub fn eq(&self, value: impl Into<K::Value>) -> Clause {
        self.compare("=", value)
    }

    /// `<table>.<column> != ?`
    pub fn ne(&self, value: impl Into<K::Value>) -> Clause {
        self.compare("!=", value)
    }

    /// `<table>.<column> > ?`
    pub fn gt(&self, value: impl Into<K::Value>) -> Clause {
        self.compare(">", value)
    }

    /// `<table>.<column> >= ?`
    pub fn gte(&self, value: impl Into<K::Value>) -> Clause {
        self.compare(">=", value)
    }

    /// `<table>.<column> < ?`
    pub fn lt(&self, value: impl Into<K::Value>) -> Clause {
        self.compare("<", value)
    }

    /// `<table>.<column> <= ?`
    pub fn lte(&self, value: impl Into<K::Value>) -> Clause {
        self.compare("<=", value)
    }

    /// `<table>.<column> IN (?, ?, ...)`. An empty list never matches.
    pub fn in_list<V, I>(&self, values: I) -> Clause
    where
        V: Into<K::Value>,
        I: IntoIterator<Item = V>,
    {
        let args: Vec<Param> = values
            .into_iter()
            .map(|v| Param::new(v.into()))
            .collect();
        if args.is_empty() {
            return Clause::raw("1=0");
        }
        let placeholders = vec!["?"; args.len()].join(", ");
        Clause::new(format!("{} IN ({})", self.qualified(), placeholders), args)
    }

    pub fn is_null(&self) -> Clause {
        Clause::raw(format!("{} IS NULL", self.qualified()))
    }

    pub fn is_not_null(&self) -> Clause {
        Clause::raw(format!("{} IS NOT NULL", self.qualified()))
    }

    /// Ordering term `<table>.<column> ASC`.
    pub fn asc(&self) -> String {
        format!("{} ASC", self.qualified())
    }

    /// Ordering term `<table>.<column> DESC`.
    pub fn desc(&self) -> String {
        format!("{} DESC", self.qualified())
    }
}

impl Column<Text> {
    /// `<table>.<column> LIKE ?`
    pub fn like(&self, pattern: impl Into<String>) -> Clause {
        self.compare("LIKE", pattern)
    }

    /// `<table>.<column> ILIKE ?`
    pub fn ilike(&self, pattern: impl Into<String>) -> Clause {
        self.compare("ILIKE", pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn eq_renders_qualified_fragment_with_one_arg() {
        let users = Table::new("users");
        let id = users.int_column("id");

        let clause = id.eq(5);
        assert_eq!(clause.fragment(), "users.id = ?");
        assert_eq!(format!("{:?}", clause.args()), "[5]");
    }

    #[test]
    fn columns_carry_their_kind() {
        let t = Table::new("t");
        assert_eq!(t.int_column("a").kind(), Kind::Int);
        assert_eq!(t.string_column("b").kind(), Kind::String);
        assert_eq!(t.bool_column("c").kind(), Kind::Bool);
        assert_eq!(t.float_column("d").kind(), Kind::Float);
        assert_eq!(t.time_column("e").kind(), Kind::Time);
        assert_eq!(t.json_column("f").kind(), Kind::Json);
    }

    #[test]
    fn typed_values_per_kind() {
        let t = Table::new("t");
        assert_eq!(format!("{:?}", t.string_column("s").eq("demo").args()), r#"["demo"]"#);
        assert_eq!(format!("{:?}", t.bool_column("b").eq(true).args()), "[true]");
        assert_eq!(format!("{:?}", t.float_column("f").gt(1.5).args()), "[1.5]");
        let doc = t.json_column("j").eq(json!({"k": 1}));
        assert_eq!(doc.fragment(), "t.j = ?");
        assert_eq!(doc.args().len(), 1);
    }

    #[test]
    fn comparison_operators() {
        let n = Table::new("t").int_column("n");
        assert_eq!(n.ne(1).fragment(), "t.n != ?");
        assert_eq!(n.gt(1).fragment(), "t.n > ?");
        assert_eq!(n.gte(1).fragment(), "t.n >= ?");
        assert_eq!(n.lt(1).fragment(), "t.n < ?");
        assert_eq!(n.lte(1).fragment(), "t.n <= ?");
    }

    #[test]
    fn in_list_keeps_placeholder_parity() {
        let id = Table::new("posts").int_column("id");
        let clause = id.in_list([1, 2, 3]);
        assert_eq!(clause.fragment(), "posts.id IN (?, ?, ?)");
        assert_eq!(clause.args().len(), 3);
    }

    #[test]
    fn empty_in_list_never_matches() {
        let id = Table::new("posts").int_column("id");
        let clause = id.in_list(Vec::<i64>::new());
        assert_eq!(clause.fragment(), "1=0");
        assert!(clause.args().is_empty());
    }

    #[test]
    fn null_checks_take_no_args() {
        let title = Table::new("posts").string_column("title");
        assert_eq!(title.is_null().fragment(), "posts.title IS NULL");
        assert_eq!(title.is_not_null().fragment(), "posts.title IS NOT NULL");
        assert!(title.is_null().args().is_empty());
    }

    #[test]
    fn like_is_text_only() {
        let title = Table::new("posts").string_column("title");
        assert_eq!(title.like("%rust%").fragment(), "posts.title LIKE ?");
        assert_eq!(title.ilike("%rust%").fragment(), "posts.title ILIKE ?");
    }

    #[test]
    fn ordering_terms() {
        let created = Table::new("posts").time_column("created_at");
        assert_eq!(created.asc(), "posts.created_at ASC");
        assert_eq!(created.desc(), "posts.created_at DESC");
    }

    #[test]
    fn table_helpers() {
        let posts = Table::new("posts");
        assert_eq!(posts.all_columns(), "posts.*");
        assert_eq!(posts.to_string(), "posts");
        assert_eq!(posts.int_column("id").table(), &posts);
    }
}
