//! Named query catalogue
//!
//! Every route runs exactly one statement from this catalogue. Statements are
//! built once, checked against their declared parameter arity, and then
//! shared for the life of the process.
//!
//! The three subject listings share one builder and differ only by their
//! filter and the aggregate columns they add.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use once_cell::sync::Lazy;

use super::row::shaped;
use crate::models::ActionStatus;

static CATALOGUE: Lazy<Catalogue> =
    Lazy::new(|| Catalogue::build().expect("invalid query catalogue"));

/// Look up a query definition by name.
pub fn query(name: QueryName) -> &'static QueryDef {
    CATALOGUE.get(name)
}

/// Names of every statement the API can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryName {
    ListSujets,
    GetSujet,
    ListSousSujets,
    ListSujetsRacines,
    ListSujetActions,
    GetAction,
    ListSousActions,
    Statistiques,
}

impl QueryName {
    pub const ALL: [QueryName; 8] = [
        Self::ListSujets,
        Self::GetSujet,
        Self::ListSousSujets,
        Self::ListSujetsRacines,
        Self::ListSujetActions,
        Self::GetAction,
        Self::ListSousActions,
        Self::Statistiques,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListSujets => "list_sujets",
            Self::GetSujet => "get_sujet",
            Self::ListSousSujets => "list_sous_sujets",
            Self::ListSujetsRacines => "list_sujets_racines",
            Self::ListSujetActions => "list_sujet_actions",
            Self::GetAction => "get_action",
            Self::ListSousActions => "list_sous_actions",
            Self::Statistiques => "statistiques",
        }
    }
}

impl fmt::Display for QueryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parameterized SQL statement and the number of positional parameters
/// (`$1..$n`) it binds.
#[derive(Debug, Clone)]
pub struct QueryDef {
    name: QueryName,
    sql: String,
    shaped_sql: String,
    arity: usize,
}

impl QueryDef {
    /// Create a definition, checking that its placeholders are exactly
    /// `$1..=$arity`.
    pub fn new(name: QueryName, sql: impl Into<String>, arity: usize) -> Result<Self, CatalogueError> {
        let sql = sql.into();
        validate_placeholders(name, &sql, arity)?;
        let shaped_sql = shaped(&sql);
        Ok(Self {
            name,
            sql,
            shaped_sql,
            arity,
        })
    }

    pub fn name(&self) -> QueryName {
        self.name
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The statement as sent to Postgres, wrapped for row shaping.
    pub fn shaped_sql(&self) -> &str {
        &self.shaped_sql
    }

    pub fn arity(&self) -> usize {
        self.arity
    }
}

/// Error raised while building the catalogue
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogueError {
    #[error("query {name} is empty")]
    Empty { name: QueryName },

    #[error("query {name} declares {arity} parameter(s) but uses placeholders {found:?}")]
    Placeholders {
        name: QueryName,
        arity: usize,
        found: Vec<usize>,
    },

    #[error("query {name} is missing from the catalogue")]
    Missing { name: QueryName },
}

fn validate_placeholders(name: QueryName, sql: &str, arity: usize) -> Result<(), CatalogueError> {
    if sql.trim().is_empty() {
        return Err(CatalogueError::Empty { name });
    }

    let found = placeholders(sql);
    let expected: BTreeSet<usize> = (1..=arity).collect();
    if found != expected {
        return Err(CatalogueError::Placeholders {
            name,
            arity,
            found: found.into_iter().collect(),
        });
    }

    Ok(())
}

/// Collect the positional placeholder numbers used by a statement.
fn placeholders(sql: &str) -> BTreeSet<usize> {
    let bytes = sql.as_bytes();
    let mut found = BTreeSet::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'$' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end > start {
                if let Ok(n) = sql[start..end].parse::<usize>() {
                    found.insert(n);
                }
            }
            i = end.max(i + 1);
        } else {
            i += 1;
        }
    }

    found
}

/// All query definitions, keyed by name.
pub struct Catalogue {
    queries: HashMap<QueryName, QueryDef>,
}

impl Catalogue {
    /// Build and validate every statement.
    pub fn build() -> Result<Self, CatalogueError> {
        let defs = [
            QueryDef::new(
                QueryName::ListSujets,
                SubjectListing {
                    filter: None,
                    counts: &[
                        SubjectCount::TotalActions,
                        SubjectCount::Status(ActionStatus::Completed),
                        SubjectCount::Status(ActionStatus::Overdue),
                    ],
                }
                .sql(),
                0,
            )?,
            QueryDef::new(QueryName::GetSujet, "SELECT * FROM sujet WHERE id = $1", 1)?,
            QueryDef::new(
                QueryName::ListSousSujets,
                SubjectListing {
                    filter: Some("s.parent_sujet_id = $1"),
                    counts: &[
                        SubjectCount::TotalActions,
                        SubjectCount::Status(ActionStatus::Completed),
                    ],
                }
                .sql(),
                1,
            )?,
            QueryDef::new(
                QueryName::ListSujetsRacines,
                SubjectListing {
                    filter: Some("s.parent_sujet_id IS NULL"),
                    counts: &[SubjectCount::TotalActions, SubjectCount::SousSujets],
                }
                .sql(),
                0,
            )?,
            QueryDef::new(
                QueryName::ListSujetActions,
                action_listing("sujet_id = $1 AND parent_action_id IS NULL"),
                1,
            )?,
            QueryDef::new(QueryName::GetAction, "SELECT * FROM action WHERE id = $1", 1)?,
            QueryDef::new(
                QueryName::ListSousActions,
                action_listing("parent_action_id = $1"),
                1,
            )?,
            QueryDef::new(QueryName::Statistiques, statistics_sql(), 0)?,
        ];

        let queries: HashMap<_, _> = defs.into_iter().map(|def| (def.name, def)).collect();

        for name in QueryName::ALL {
            if !queries.contains_key(&name) {
                return Err(CatalogueError::Missing { name });
            }
        }

        Ok(Self { queries })
    }

    pub fn get(&self, name: QueryName) -> &QueryDef {
        // build() guarantees every name is present
        &self.queries[&name]
    }
}

/// Aggregate columns a subject listing can carry
#[derive(Debug, Clone, Copy)]
enum SubjectCount {
    /// `total_actions`: actions whose `sujet_id` is the subject
    TotalActions,
    /// `<status>_actions`: the same, restricted to one status bucket
    Status(ActionStatus),
    /// `total_sous_sujets`: subjects whose parent is the subject
    SousSujets,
}

impl SubjectCount {
    fn column(&self) -> String {
        match self {
            Self::TotalActions => "COALESCE(COUNT(DISTINCT a.id), 0) AS total_actions".to_string(),
            Self::Status(status) => format!(
                "{} AS {}_actions",
                status_count("a", *status),
                status.as_str()
            ),
            Self::SousSujets => {
                "COALESCE(COUNT(DISTINCT ss.id), 0) AS total_sous_sujets".to_string()
            }
        }
    }
}

/// Subjects left-joined with their actions, grouped per subject, newest first.
struct SubjectListing {
    filter: Option<&'static str>,
    counts: &'static [SubjectCount],
}

impl SubjectListing {
    fn sql(&self) -> String {
        let mut columns = vec!["s.*".to_string()];
        columns.extend(self.counts.iter().map(SubjectCount::column));

        let mut sql = format!(
            "SELECT {}\nFROM sujet s\nLEFT JOIN action a ON s.id = a.sujet_id\n",
            columns.join(",\n    ")
        );

        if self
            .counts
            .iter()
            .any(|c| matches!(c, SubjectCount::SousSujets))
        {
            sql.push_str("LEFT JOIN sujet ss ON s.id = ss.parent_sujet_id\n");
        }

        if let Some(filter) = self.filter {
            sql.push_str("WHERE ");
            sql.push_str(filter);
            sql.push('\n');
        }

        sql.push_str("GROUP BY s.id\nORDER BY s.created_at DESC");
        sql
    }
}

/// Actions matching `filter`, in manual order then newest first.
fn action_listing(filter: &str) -> String {
    format!("SELECT * FROM action\nWHERE {filter}\nORDER BY ordre ASC, created_at DESC")
}

fn statistics_sql() -> String {
    let mut columns = vec![
        "COALESCE(COUNT(DISTINCT s.id), 0) AS total_sujets".to_string(),
        "COALESCE(COUNT(DISTINCT a.id), 0) AS total_actions".to_string(),
    ];
    columns.extend(
        ActionStatus::ALL
            .iter()
            .map(|status| format!("{} AS actions_{}", status_count("a", *status), status.as_str())),
    );

    format!(
        "SELECT {}\nFROM sujet s\nLEFT JOIN action a ON s.id = a.sujet_id",
        columns.join(",\n    ")
    )
}

/// Distinct actions of alias `alias` in one status bucket, zero when none.
fn status_count(alias: &str, status: ActionStatus) -> String {
    format!(
        "COALESCE(COUNT(DISTINCT CASE WHEN {alias}.status = '{}' THEN {alias}.id END), 0)",
        status.as_str()
    )
}
