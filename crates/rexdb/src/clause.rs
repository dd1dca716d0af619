//! Boolean predicate fragments.
//!
//! A [`Clause`] is a SQL fragment written with neutral `?` placeholders plus
//! the arguments for those placeholders, in order. Combinators build new
//! clauses; they never renumber anything; numbering happens once, when a
//! statement is rebound.

use crate::error::{DbError, DbResult};
use crate::param::Param;
use crate::rebind::count_placeholders;

/// A SQL boolean-expression fragment and its positional arguments.
#[derive(Debug, Clone, Default)]
pub struct Clause {
    fragment: String,
    args: Vec<Param>,
}

impl Clause {
    /// Create a clause from a `?` template and its arguments.
    ///
    /// # Example
    /// ```ignore
    /// Clause::new("posts.id = ? OR posts.id = ?", rexdb::params![1_i64, 2_i64])
    /// ```
    pub fn new(fragment: impl Into<String>, args: Vec<Param>) -> Self {
        Self {
            fragment: fragment.into(),
            args,
        }
    }

    /// Create a clause without arguments.
    pub fn raw(fragment: impl Into<String>) -> Self {
        Self::new(fragment, Vec::new())
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn args(&self) -> &[Param] {
        &self.args
    }

    pub fn into_parts(self) -> (String, Vec<Param>) {
        (self.fragment, self.args)
    }

    /// An empty clause renders no WHERE at all.
    pub fn is_empty(&self) -> bool {
        self.fragment.trim().is_empty()
    }

    /// `(self) AND (other)`
    pub fn and(self, other: Clause) -> Clause {
        and([self, other])
    }

    /// `(self) OR (other)`
    pub fn or(self, other: Clause) -> Clause {
        or([self, other])
    }

    /// Check that the placeholder count matches the argument count.
    pub fn validate(&self) -> DbResult<()> {
        let placeholders = count_placeholders(&self.fragment);
        if placeholders != self.args.len() {
            return Err(DbError::validation(format!(
                "clause `{}` has {} placeholder(s) but {} argument(s)",
                self.fragment,
                placeholders,
                self.args.len()
            )));
        }
        Ok(())
    }
}

fn join(clauses: impl IntoIterator<Item = Clause>, sep: &str) -> Clause {
    let mut fragments = Vec::new();
    let mut args = Vec::new();

    for clause in clauses {
        // Only a truly empty member is dropped; one carrying args stays so
        // that `validate` reports the mismatch.
        if clause.is_empty() && clause.args.is_empty() {
            continue;
        }
        fragments.push(format!("({})", clause.fragment));
        args.extend(clause.args);
    }

    Clause {
        fragment: fragments.join(sep),
        args,
    }
}

/// Conjunction: every non-empty clause wrapped in parentheses and joined by
/// `AND`, arguments concatenated left to right. No clauses yields an empty clause.
pub fn and(clauses: impl IntoIterator<Item = Clause>) -> Clause {
    join(clauses, " AND ")
}

/// Disjunction, with the same rules as [`and`], except that no clauses yields
/// the always-false `1=0` rather than an empty clause.
pub fn or(clauses: impl IntoIterator<Item = Clause>) -> Clause {
    let clause = join(clauses, " OR ");
    if clause.is_empty() {
        return Clause::raw("1=0");
    }
    clause
}

/// `NOT (<fragment>)`. Negating an empty clause stays empty.
pub fn not(clause: Clause) -> Clause {
    if clause.is_empty() && clause.args.is_empty() {
        return clause;
    }
    Clause {
        fragment: format!("NOT ({})", clause.fragment),
        args: clause.args,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Table;

    #[test]
    fn and_wraps_each_clause_and_concatenates_args() {
        let users = Table::new("users");
        let id = users.int_column("id");
        let name = users.string_column("name");
        let tags = users.int_column("tag");

        let clause = and([id.eq(1), name.eq("demo"), tags.in_list([7, 8])]);
        assert_eq!(
            clause.fragment(),
            "(users.id = ?) AND (users.name = ?) AND (users.tag IN (?, ?))"
        );
        assert_eq!(format!("{:?}", clause.args()), r#"[1, "demo", 7, 8]"#);
        assert!(clause.validate().is_ok());
    }

    #[test]
    fn or_is_a_real_disjunction() {
        let users = Table::new("users");
        let id = users.int_column("id");

        let clause = or([id.eq(1), id.eq(2)]);
        assert_eq!(clause.fragment(), "(users.id = ?) OR (users.id = ?)");
        assert_eq!(format!("{:?}", clause.args()), "[1, 2]");
    }

    #[test]
    fn empty_and_yields_empty_clause() {
        let clause = and(Vec::new());
        assert!(clause.is_empty());
        assert!(clause.args().is_empty());
    }

    #[test]
    fn empty_or_never_matches() {
        let clause = or(Vec::new());
        assert_eq!(clause.fragment(), "1=0");
        assert!(clause.args().is_empty());

        let only_empty = or([Clause::default(), Clause::raw("  ")]);
        assert_eq!(only_empty.fragment(), "1=0");
    }

    #[test]
    fn empty_member_with_args_fails_validation() {
        let id = Table::new("t").int_column("id");

        let combined = and([Clause::new("", crate::params![1_i64]), id.eq(3)]);
        assert_eq!(combined.args().len(), 2);
        assert!(combined.validate().unwrap_err().is_validation());

        let negated = not(Clause::new("", crate::params![1_i64]));
        assert!(negated.validate().unwrap_err().is_validation());
    }

    #[test]
    fn empty_members_are_skipped() {
        let id = Table::new("t").int_column("id");
        let clause = and([Clause::default(), id.eq(3)]);
        assert_eq!(clause.fragment(), "(t.id = ?)");
        assert_eq!(clause.args().len(), 1);
    }

    #[test]
    fn nested_groups_keep_argument_order() {
        let t = Table::new("t");
        let a = t.int_column("a");
        let b = t.int_column("b");
        let c = t.int_column("c");

        let clause = a.eq(1).and(b.eq(2).or(c.eq(3)));
        assert_eq!(clause.fragment(), "(t.a = ?) AND ((t.b = ?) OR (t.c = ?))");
        assert_eq!(format!("{:?}", clause.args()), "[1, 2, 3]");
    }

    #[test]
    fn not_negates() {
        let a = Table::new("t").bool_column("a");
        let clause = not(a.eq(true));
        assert_eq!(clause.fragment(), "NOT (t.a = ?)");
        assert!(not(Clause::default()).is_empty());
    }

    #[test]
    fn validate_detects_parity_mismatch() {
        let bad = Clause::new("a = ? AND b = ?", crate::params![1_i64]);
        let err = bad.validate().unwrap_err();
        assert!(err.is_validation());

        let good = Clause::new("a = ? AND b = ?", crate::params![1_i64, 2_i64]);
        assert!(good.validate().is_ok());
    }

    #[test]
    fn raw_has_no_args() {
        let clause = Clause::raw("1=1");
        assert_eq!(clause.into_parts().0, "1=1");
    }
}
