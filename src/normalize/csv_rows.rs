//! Lifting a normalized CSV table into `NormalizedRow`s

use crate::analysis::{user_matches, NormalizedRow};
use crate::input::CsvTable;

pub const DEFAULT_TUNNEL_TYPE: &str = "ssl-web";
pub const DEFAULT_REMOTE_IP: &str = "unknown";
pub const DEFAULT_MESSAGE: &str = "SSL tunnel established";

/// Coerce a cell to a byte count
///
/// Accepts integers and non-negative finite decimals (truncated, so
/// `"1024.0"` reads as 1024). Anything else is `None` and the row is dropped.
pub fn coerce_bytes(cell: &str) -> Option<u64> {
    let cell = cell.trim();
    if let Ok(value) = cell.parse::<u64>() {
        return Some(value);
    }

    let value = cell.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value < u64::MAX as f64 {
        Some(value as u64)
    } else {
        None
    }
}

fn cell_of(table: &CsvTable, row: &[String], column: &str) -> Option<String> {
    table
        .column_index(column)
        .map(|idx| CsvTable::cell(row, idx).to_string())
}

/// Login rows with defaults for the optional columns
///
/// Rows are not filtered here; the success check happens downstream.
pub fn vpn_rows(table: &CsvTable) -> Vec<NormalizedRow> {
    table
        .rows()
        .iter()
        .map(|row| NormalizedRow {
            date: cell_of(table, row, "date"),
            time: cell_of(table, row, "time"),
            user: cell_of(table, row, "user"),
            tunnel_type: cell_of(table, row, "tunneltype")
                .or_else(|| Some(DEFAULT_TUNNEL_TYPE.to_string())),
            remote_ip: cell_of(table, row, "remip").or_else(|| Some(DEFAULT_REMOTE_IP.to_string())),
            reason: cell_of(table, row, "reason"),
            message: cell_of(table, row, "msg").or_else(|| Some(DEFAULT_MESSAGE.to_string())),
            ..Default::default()
        })
        .collect()
}

/// Destination/byte rows; rows whose byte count will not coerce are dropped
pub fn traffic_rows(table: &CsvTable) -> Vec<NormalizedRow> {
    let rows: Vec<NormalizedRow> = table
        .rows()
        .iter()
        .filter_map(|row| {
            let sent_bytes = coerce_bytes(&cell_of(table, row, "sentbyte")?)?;
            Some(NormalizedRow {
                destination_ip: cell_of(table, row, "dstip").map(|ip| ip.trim().to_string()),
                sent_bytes: Some(sent_bytes),
                ..Default::default()
            })
        })
        .collect();

    log_dropped(table.len(), rows.len());
    rows
}

/// Rows for `target_user` that look like session shutdowns
///
/// The `msg` filter (substring "shutdown", any case) only applies when the
/// export has a `msg` column.
pub fn shutdown_rows(table: &CsvTable, target_user: &str) -> Vec<NormalizedRow> {
    let has_message = table.has_column("msg");
    let mut matched = 0usize;

    let rows: Vec<NormalizedRow> = table
        .rows()
        .iter()
        .filter(|row| {
            cell_of(table, row, "user")
                .map(|user| user_matches(&user, target_user))
                .unwrap_or(false)
        })
        .filter(|row| {
            !has_message
                || cell_of(table, row, "msg")
                    .map(|msg| msg.to_lowercase().contains("shutdown"))
                    .unwrap_or(false)
        })
        .inspect(|_| matched += 1)
        .filter_map(|row| {
            let sent_bytes = coerce_bytes(&cell_of(table, row, "sentbyte")?)?;
            Some(NormalizedRow {
                date: cell_of(table, row, "date"),
                time: cell_of(table, row, "time"),
                user: cell_of(table, row, "user"),
                message: cell_of(table, row, "msg"),
                sent_bytes: Some(sent_bytes),
                ..Default::default()
            })
        })
        .collect();

    log_dropped(matched, rows.len());
    rows
}

fn log_dropped(before: usize, after: usize) {
    if before > after {
        log::debug!("Dropped {} CSV row(s) with a non-numeric sentbyte", before - after);
    }
}
