use anyhow::Result;
use sqlx::PgPool;
use time::OffsetDateTime;

/// A stored consumption row, as the store hands it back.
///
/// Columns are kept raw (diet as text, household size as a signed integer) so
/// that malformed rows reach validation instead of failing the whole query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConsumptionRow {
    pub ts: OffsetDateTime,
    pub user_id: String,
    pub electricity: Option<f64>,
    pub gas: Option<f64>,
    pub water: Option<f64>,
    pub car_miles: Option<f64>,
    pub public_transport: Option<f64>,
    pub diet: Option<String>,
    pub household_size: Option<i32>,
}

/// `consumption_data.timestamp` is a naive UTC timestamp and rows are keyed by
/// the integer `users.id`, so the query converts the former and resolves the
/// external `auth0_id` through `users`. The table has no diet column.
const LOAD_WINDOW_SQL: &str = r#"
    SELECT
        c.timestamp AT TIME ZONE 'UTC' AS ts,
        u.auth0_id AS user_id,
        c.electricity,
        c.gas,
        c.water,
        c.car_miles,
        c.public_transport,
        NULL::text AS diet,
        c.household_size
    FROM consumption_data c
    JOIN users u ON u.id = c.user_id
    WHERE u.auth0_id = $1
      AND c.timestamp >= ($2::timestamptz AT TIME ZONE 'UTC')
      AND c.timestamp <= ($3::timestamptz AT TIME ZONE 'UTC')
    ORDER BY c.timestamp
"#;

/// Fetch one user's consumption history in `[start, end]`, oldest first.
///
/// `user_id` is the external (auth0) id the web application hands out.
pub async fn load_window(
    pool: &PgPool,
    user_id: &str,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<Vec<ConsumptionRow>> {
    let rows = sqlx::query_as::<_, ConsumptionRow>(LOAD_WINDOW_SQL)
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_query_resolves_external_user_id() {
        assert!(LOAD_WINDOW_SQL.contains("JOIN users u ON u.id = c.user_id"));
        assert!(LOAD_WINDOW_SQL.contains("WHERE u.auth0_id = $1"));
    }

    #[test]
    fn window_query_reads_stored_columns_only() {
        assert!(LOAD_WINDOW_SQL.contains("c.timestamp AT TIME ZONE 'UTC' AS ts"));
        assert!(LOAD_WINDOW_SQL.contains("NULL::text AS diet"));
        assert!(!LOAD_WINDOW_SQL.contains("c.diet"));
        assert!(!LOAD_WINDOW_SQL.contains(" ts >="));
    }
}
