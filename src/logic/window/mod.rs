//! Window Module - Event Window Selector
//!
//! Lấy đoạn đuôi (suffix) của log theo thời gian: các event có timestamp
//! nằm trong `duration` gần nhất tính tới `now`.
//! Quét ngược từ cuối, dừng ngay ở event cũ hơn cutoff đầu tiên.

use chrono::{DateTime, Duration, Utc};

use crate::logic::events::{parse_timestamp, Event};

/// Output of one window selection
#[derive(Debug, Clone)]
pub struct WindowSelection {
    /// Selected events, ascending (same order as the input log)
    pub events: Vec<Event>,
    /// Events passed over during the scan because their timestamp did not parse
    pub skipped: usize,
    /// Oldest instant still inside the window
    pub cutoff: DateTime<Utc>,
}

/// Select the trailing `duration` of a chronologically ordered event log.
///
/// The scan walks backwards and stops at the first parseable timestamp older
/// than `now - duration`. Unparseable timestamps are skipped and the scan
/// continues past them. A window reaching past the representable range keeps
/// the whole log.
pub fn select_recent(events: &[Event], now: DateTime<Utc>, duration: Duration) -> WindowSelection {
    let cutoff = now
        .checked_sub_signed(duration)
        .unwrap_or_else(|| saturated_cutoff(duration > Duration::zero()));
    select_since(events, cutoff)
}

/// Same as `select_recent`, with the duration in minutes
pub fn select_recent_minutes(events: &[Event], now: DateTime<Utc>, minutes: i64) -> WindowSelection {
    match Duration::try_minutes(minutes) {
        Some(duration) => select_recent(events, now, duration),
        None => select_since(events, saturated_cutoff(minutes > 0)),
    }
}

fn saturated_cutoff(backwards: bool) -> DateTime<Utc> {
    if backwards {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    }
}

fn select_since(events: &[Event], cutoff: DateTime<Utc>) -> WindowSelection {
    let mut kept = Vec::new();
    let mut skipped = 0;

    for (index, event) in events.iter().enumerate().rev() {
        match parse_timestamp(&event.timestamp) {
            Ok(ts) if ts >= cutoff => kept.push(event.clone()),
            Ok(_) => break,
            Err(e) => {
                log::warn!("Window scan: skipping event at row {}: {}", index, e);
                skipped += 1;
            }
        }
    }
    kept.reverse();

    log::info!(
        "Window selection: {} of {} events since {} ({} unparseable timestamps skipped)",
        kept.len(),
        events.len(),
        cutoff.to_rfc3339(),
        skipped
    );

    WindowSelection { events: kept, skipped, cutoff }
}
