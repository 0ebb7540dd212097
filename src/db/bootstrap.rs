//! Database provisioning used at startup before the pool is handed to requests.

use crate::error::AppError;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, Connection};

const MAINTENANCE_DATABASE: &str = "postgres";

/// Creates the database named in `options` when it is missing, connecting through the
/// `postgres` maintenance database with the same credentials.
pub async fn ensure_database_exists(options: &PgConnectOptions) -> Result<(), AppError> {
    let Some(target) = target_database(options) else {
        return Ok(());
    };
    let mut conn = options.clone().database(MAINTENANCE_DATABASE).connect().await?;
    let present: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&target)
        .fetch_one(&mut conn)
        .await?;
    if present {
        tracing::debug!(database = %target, "database already present");
    } else {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&target)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %target, "database created");
    }
    conn.close().await?;
    Ok(())
}

/// Database to provision, or `None` when unset or already the maintenance database.
fn target_database(options: &PgConnectOptions) -> Option<String> {
    options
        .get_database()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != MAINTENANCE_DATABASE)
        .map(str::to_string)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DbSettings, EnvSource};
    use std::str::FromStr;

    #[test]
    fn target_from_parts_with_reserved_password() {
        let source = EnvSource::from_pairs([("POSTGRES_PASSWORD", "pa/ss#w@rd"), ("POSTGRES_DB", "greetings")]);
        let options = DbSettings::from_source(&source).unwrap().connect_options().unwrap();
        assert_eq!(target_database(&options).as_deref(), Some("greetings"));
    }

    #[test]
    fn target_from_url_with_encoded_password_and_query() {
        let options = PgConnectOptions::from_str("postgres://u:p%2Fq@db:5432/greetings?sslmode=disable").unwrap();
        assert_eq!(target_database(&options).as_deref(), Some("greetings"));
    }

    #[test]
    fn maintenance_database_is_skipped() {
        let options = PgConnectOptions::from_str("postgres://u:p@db/postgres").unwrap();
        assert_eq!(target_database(&options), None);
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("greeting-api-dev"), "\"greeting-api-dev\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
