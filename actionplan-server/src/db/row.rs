//! Row shaping: Postgres rows to JSON objects
//!
//! Subject and action rows are selected with `*`, so their columns are not
//! known at compile time. Postgres renders each row itself with
//! `row_to_json`, which covers every column type and keeps column order.
//! Timestamp columns are then re-rendered as UTC instants with millisecond
//! precision (`2024-01-02T03:04:05.000Z`).

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row as _, TypeInfo};

/// A row as returned to clients: column name to JSON value.
pub type Row = Map<String, Value>;

/// Wrap a statement so each result row also carries its own JSON rendering
/// in the first column, followed by the statement's typed columns.
pub fn shaped(sql: &str) -> String {
    format!("SELECT row_to_json(q) AS row_json, q.*\nFROM (\n{sql}\n) q")
}

/// Convert a row produced by a [`shaped`] statement into a JSON object,
/// keeping every column in select order.
pub fn to_json(row: &PgRow) -> Result<Row, sqlx::Error> {
    let mut object = match row.try_get::<Value, _>(0)? {
        Value::Object(object) => object,
        other => {
            return Err(sqlx::Error::Decode(
                format!("row_to_json produced {other} instead of an object").into(),
            ))
        }
    };

    for col in row.columns().iter().skip(1) {
        if let Some(value) = timestamp(row, col.ordinal(), col.type_info().name()) {
            object.insert(col.name().to_string(), value);
        }
    }

    Ok(object)
}

/// Typed rendering for timestamp columns; `None` keeps the Postgres rendering.
fn timestamp(row: &PgRow, index: usize, type_name: &str) -> Option<Value> {
    let decoded = match type_name {
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)
            .map(|v| v.map(instant)),
        // naive timestamps are read as UTC
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)
            .map(|v| v.map(|v| instant(v.and_utc()))),
        _ => return None,
    };

    match decoded {
        Ok(value) => Some(value.unwrap_or(Value::Null)),
        Err(e) => {
            // infinity and out-of-range values stay as Postgres renders them
            tracing::debug!(column = index, %type_name, error = %e, "timestamp kept as rendered");
            None
        }
    }
}

fn instant(v: DateTime<Utc>) -> Value {
    Value::String(v.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn instants_use_millis_and_z() {
        let v = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(instant(v), Value::String("2024-01-02T03:04:05.000Z".into()));
    }

    #[test]
    fn shaped_wraps_statement() {
        let sql = shaped("SELECT * FROM sujet WHERE id = $1");
        assert!(sql.starts_with("SELECT row_to_json(q) AS row_json, q.*"));
        assert!(sql.contains("SELECT * FROM sujet WHERE id = $1"));
        assert!(sql.ends_with(") q"));
    }

    // Column rendering against a live server
    // Run with: DATABASE_URL=postgres://... cargo test -p actionplan-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn renders_every_column_type() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = sqlx::PgPool::connect(&url).await.expect("pool creation failed");

        let row = sqlx::query(&shaped(
            r#"
            SELECT
                1::int4 AS i4,
                2::int8 AS i8,
                true AS flag,
                'hello'::text AS label,
                NULL::text AS missing,
                1.25::float8 AS ratio,
                1234.50::numeric(10,2) AS budget,
                '2 days'::interval AS duree,
                '10.0.0.1'::inet AS addr,
                '2024-01-02T03:04:05Z'::timestamptz AS stamp,
                '2024-01-02 03:04:05.25'::timestamp AS naive,
                NULL::timestamptz AS no_stamp,
                '2024-01-02'::date AS day,
                '{"a": 1}'::jsonb AS doc,
                ARRAY['x', 'y']::text[] AS tags
            "#,
        ))
        .fetch_one(&pool)
        .await
        .expect("query failed");

        let json = to_json(&row).expect("row shaping failed");
        let keys: Vec<_> = json.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "i4", "i8", "flag", "label", "missing", "ratio", "budget", "duree", "addr",
                "stamp", "naive", "no_stamp", "day", "doc", "tags"
            ]
        );
        assert_eq!(json["i4"], 1);
        assert_eq!(json["i8"], 2);
        assert_eq!(json["flag"], true);
        assert_eq!(json["label"], "hello");
        assert_eq!(json["missing"], Value::Null);
        assert_eq!(json["ratio"], 1.25);
        assert_eq!(json["budget"], 1234.5);
        assert_eq!(json["duree"], "2 days");
        assert_eq!(json["addr"], "10.0.0.1");
        assert_eq!(json["stamp"], "2024-01-02T03:04:05.000Z");
        assert_eq!(json["naive"], "2024-01-02T03:04:05.250Z");
        assert_eq!(json["no_stamp"], Value::Null);
        assert_eq!(json["day"], "2024-01-02");
        assert_eq!(json["doc"], serde_json::json!({"a": 1}));
        assert_eq!(json["tags"], serde_json::json!(["x", "y"]));
    }
}
