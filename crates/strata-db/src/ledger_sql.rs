//! SQL and row decoding shared by the ledger implementations.

use crate::error::{DbError, DbResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use strata_core::sql_utils::quote_qualified;
use strata_core::{LedgerEntry, ModuleName, VersionParameters};

/// Timestamps are stored at microsecond precision.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Columns read back by every ledger query, in [`RawLedgerRow`] order.
const SELECT_COLUMNS: &str =
    "module, CAST(execution_ts AS VARCHAR), script_name, major, minor, patch";

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(table: &str, raw: &str) -> DbResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| DbError::InvalidLedgerRow {
            table: table.to_string(),
            reason: format!("execution_ts '{raw}': {e}"),
        })
}

pub(crate) fn latest_entry_sql(table: &str) -> String {
    format!(
        "SELECT {SELECT_COLUMNS} FROM {} WHERE module = ? \
         ORDER BY major DESC, minor DESC, patch DESC, execution_id DESC LIMIT 1",
        quote_qualified(table)
    )
}

pub(crate) fn entries_sql(table: &str, filtered: bool) -> String {
    let filter = if filtered { " WHERE module = ?" } else { "" };
    format!(
        "SELECT {SELECT_COLUMNS} FROM {}{filter} ORDER BY execution_id",
        quote_qualified(table)
    )
}

/// A ledger row as read from the driver, before validation.
pub(crate) struct RawLedgerRow {
    pub module: String,
    pub execution_ts: String,
    pub script_name: String,
    pub major: i64,
    pub minor: i64,
    pub patch: i64,
}

impl RawLedgerRow {
    pub(crate) fn into_entry(self, table: &str) -> DbResult<LedgerEntry> {
        let invalid = |reason: String| DbError::InvalidLedgerRow {
            table: table.to_string(),
            reason,
        };
        let component = |name: &str, value: i64| {
            u32::try_from(value).map_err(|_| invalid(format!("{name} out of range: {value}")))
        };

        let module = ModuleName::try_new(self.module)
            .ok_or_else(|| invalid("empty module name".to_string()))?;
        Ok(LedgerEntry {
            module,
            applied_at: parse_timestamp(table, &self.execution_ts)?,
            script_name: self.script_name,
            version: VersionParameters::new(
                component("major", self.major)?,
                component("minor", self.minor)?,
                component("patch", self.patch)?,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(major: i64) -> RawLedgerRow {
        RawLedgerRow {
            module: "core".to_string(),
            execution_ts: "2024-03-01 10:15:30.250000".to_string(),
            script_name: "upgrade.sql".to_string(),
            major,
            minor: 2,
            patch: 3,
        }
    }

    #[test]
    fn test_timestamp_round_trip_at_micros() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap();
        let formatted = format_timestamp(&ts);
        assert_eq!(formatted, "2024-03-01 10:15:30.000000");
        assert_eq!(parse_timestamp("t", &formatted).unwrap(), ts);
    }

    #[test]
    fn test_parse_timestamp_without_fraction() {
        let ts = parse_timestamp("t", "2024-03-01 10:15:30").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap());
    }

    #[test]
    fn test_into_entry() {
        let entry = raw(1).into_entry("t").unwrap();
        assert_eq!(entry.module, "core");
        assert_eq!(entry.version, VersionParameters::new(1, 2, 3));
        assert_eq!(entry.script_name, "upgrade.sql");
    }

    #[test]
    fn test_into_entry_rejects_negative_component() {
        let err = raw(-1).into_entry("script_execution").unwrap_err();
        assert!(matches!(err, DbError::InvalidLedgerRow { .. }));
        assert!(err.to_string().contains("major out of range"));
    }

    #[test]
    fn test_latest_entry_sql_orders_by_version() {
        let sql = latest_entry_sql("ops.ledger");
        assert!(sql.contains(r#"FROM "ops"."ledger""#));
        assert!(sql.contains("ORDER BY major DESC, minor DESC, patch DESC"));
        assert!(sql.ends_with("LIMIT 1"));
    }

    #[test]
    fn test_entries_sql_filter() {
        assert!(entries_sql("ledger", true).contains("WHERE module = ?"));
        assert!(!entries_sql("ledger", false).contains("WHERE"));
    }
}
