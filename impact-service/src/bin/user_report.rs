use anyhow::{bail, Context, Result};
use impact_client::db;
use impact_service::{config::AppConfig, engine, observability, render};
use sqlx::postgres::PgPoolOptions;
use std::env;
use time::{Duration, OffsetDateTime};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!("usage: user_report <user_id> [display_name]");
    }
    let user_id = &args[1];
    let name = args.get(2).map(String::as_str).unwrap_or(user_id);

    let cfg = AppConfig::load()?;
    let engine = cfg.build_engine()?;
    let db_cfg = cfg
        .database
        .as_ref()
        .context("[database] section is required for user_report")?;

    let pool = PgPoolOptions::new()
        .max_connections(db_cfg.max_connections)
        .connect(&db_cfg.uri)
        .await?;

    // Table is owned by the web application; see `db::load_window` for the columns read.
    let end = OffsetDateTime::now_utc();
    let start = end
        .checked_sub(Duration::days(i64::from(engine.options().window_days)))
        .context("window_days reaches before the earliest representable date")?;
    let rows = db::load_window(&pool, user_id, start, end).await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        match engine::record_from_row(row) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(error = %e, ts = %row.ts, "skipping invalid stored record");
            }
        }
    }

    tracing::info!(user_id = %user_id, rows = rows.len(), valid = records.len(), "loaded consumption window");

    let report = engine.evaluate_window(&records, end)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    println!();

    let email = render::weekly_report(name, &report);
    println!("Subject: {}", email.subject);
    println!();
    print!("{}", email.body);

    Ok(())
}
