//! Placeholder rebinding.
//!
//! Statements are rendered with the dialect-neutral `?` placeholder and then
//! rewritten into the syntax a driver expects:
//!
//! | [`BindType`] | Output |
//! |---|---|
//! | `Unknown`, `Question` | `?` (unchanged) |
//! | `Dollar` | `$1, $2, ...` |
//! | `Named` | `:arg1, :arg2, ...` |
//! | `At` | `@p1, @p2, ...` |
//!
//! The scan is purely lexical: a `?` inside a quoted literal is rewritten like
//! any other. Never pass literal text containing `?` through this path.

/// The dialect-neutral placeholder character.
pub const PLACEHOLDER: char = '?';

/// Placeholder syntax understood by a database driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BindType {
    /// Unrecognized driver; placeholders are left as `?`.
    #[default]
    Unknown,
    /// `?` (MySQL, SQLite).
    Question,
    /// `$1`, `$2`, ... (PostgreSQL).
    Dollar,
    /// `:arg1`, `:arg2`, ... (Oracle).
    Named,
    /// `@p1`, `@p2`, ... (SQL Server).
    At,
}

impl BindType {
    /// Look up the bind type for a driver name.
    pub fn for_driver(driver: &str) -> Self {
        match driver {
            "postgres" | "postgresql" | "pgx" | "pq" => BindType::Dollar,
            "mysql" | "sqlite" | "sqlite3" => BindType::Question,
            "oci8" | "ora" | "goracle" => BindType::Named,
            "sqlserver" | "mssql" => BindType::At,
            _ => BindType::Unknown,
        }
    }

    /// Prefix written before the placeholder ordinal, or `None` for pass-through.
    fn prefix(self) -> Option<&'static str> {
        match self {
            BindType::Unknown | BindType::Question => None,
            BindType::Dollar => Some("$"),
            BindType::Named => Some(":arg"),
            BindType::At => Some("@p"),
        }
    }
}

/// Rewrite every `?` in `query` into the placeholder syntax of `bind_type`,
/// numbering from 1 in order of appearance.
pub fn rebind(bind_type: BindType, query: &str) -> String {
    let Some(prefix) = bind_type.prefix() else {
        return query.to_string();
    };

    // Room for a handful of params before reallocating
    let mut out = String::with_capacity(query.len() + 10);
    let mut rest = query;
    let mut ordinal = 0usize;

    while let Some(idx) = rest.find(PLACEHOLDER) {
        out.push_str(&rest[..idx]);
        ordinal += 1;
        out.push_str(prefix);
        out.push_str(&ordinal.to_string());
        rest = &rest[idx + PLACEHOLDER.len_utf8()..];
    }

    out.push_str(rest);
    out
}

/// Count the neutral placeholders in `sql`, using the same lexical rule as [`rebind`].
pub fn count_placeholders(sql: &str) -> usize {
    sql.matches(PLACEHOLDER).count()
}
