// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use andaria_core::NotificationRecord;

use crate::store::FeedState;

/// Marker shown before unread notifications.
const UNREAD_MARK: char = '*';

/// Format a notification as a single line.
///
/// Format: `* [12] 2026-05-01 08:00 payment pending: Title`
pub fn format_record_line(record: &NotificationRecord) -> String {
    let mark = if record.is_read() { ' ' } else { UNREAD_MARK };
    format!(
        "{} [{}] {} {}: {}",
        mark,
        record.id,
        record.created_at.format("%Y-%m-%d %H:%M"),
        record.kind.label(),
        record.title
    )
}

/// Format a notification with its body and known payload fields.
pub fn format_record_detail(record: &NotificationRecord) -> String {
    let mut out = format_record_line(record);
    out.push_str(&format!("\n    {}", record.body));

    let payload = &record.payload;
    if let Some(name) = payload.package_name() {
        out.push_str(&format!("\n    package: {}", name));
    }
    if let Some(tourist) = payload.tourist_name() {
        out.push_str(&format!("\n    tourist: {}", tourist));
    }
    if let Some(amount) = payload.amount() {
        out.push_str(&format!("\n    amount: {:.2}", amount));
    }
    if let Some(reason) = payload.rejection_reason() {
        out.push_str(&format!("\n    reason: {}", reason));
    }
    if let Some(read_at) = record.read_at() {
        out.push_str(&format!("\n    read: {}", read_at.format("%Y-%m-%d %H:%M")));
    }
    out
}

/// One-line summary of the unread counter.
pub fn format_unread_summary(state: &FeedState) -> String {
    match state.unread_count() {
        0 => "no unread notifications".to_string(),
        1 => "1 unread notification".to_string(),
        n => format!("{} unread notifications", n),
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
