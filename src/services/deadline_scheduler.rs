//! Deadline Scheduler for PageKeeper.
//!
//! Turns the deadlines of an enriched bookmark into host alarms that fire a
//! type-dependent lead time before each deadline, and cancels them again when
//! the bookmark goes away.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use tracing::{debug, info};

use crate::managers::alarm_manager::AlarmHost;
use crate::services::clock::Clock;
use crate::types::alarm::{AlarmName, ReminderPolicy};
use crate::types::bookmark::{Bookmark, DeadlineType};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// One alarm registered by [`ReminderSchedulerTrait::schedule_for`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledReminder {
    pub name: String,
    pub ordinal: usize,
    pub fire_at: DateTime<Utc>,
}

/// Trait defining deadline reminder scheduling.
pub trait ReminderSchedulerTrait {
    /// Registers one alarm per future deadline. Unparseable and past entries are skipped.
    fn schedule_for(&self, bookmark: &Bookmark) -> Vec<ScheduledReminder>;
    /// Clears every live alarm owned by `url`. Returns how many were cleared.
    fn cancel_all_for(&self, url: &str) -> usize;
}

/// Deadline scheduler over a host alarm facility.
pub struct DeadlineScheduler {
    alarms: Arc<dyn AlarmHost>,
    clock: Arc<dyn Clock>,
    policy: ReminderPolicy,
    naive_offset: FixedOffset,
}

impl DeadlineScheduler {
    pub fn new(alarms: Arc<dyn AlarmHost>, clock: Arc<dyn Clock>, policy: ReminderPolicy) -> Self {
        Self {
            alarms,
            clock,
            policy,
            naive_offset: utc_offset(),
        }
    }

    /// Sets the offset used for deadlines written without a timezone.
    pub fn with_naive_offset_minutes(mut self, minutes: i32) -> Self {
        self.naive_offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(utc_offset);
        self
    }

    /// Computes when the reminder for `deadline` should fire, ignoring "now".
    pub fn fire_time(&self, deadline: &str, kind: DeadlineType) -> Option<DateTime<Utc>> {
        let due = parse_deadline(deadline, self.naive_offset)?;
        Some(due - self.policy.lead_time(kind))
    }
}

impl ReminderSchedulerTrait for DeadlineScheduler {
    fn schedule_for(&self, bookmark: &Bookmark) -> Vec<ScheduledReminder> {
        let kind = bookmark.deadline_type();
        let now = self.clock.now();
        let mut scheduled = Vec::new();

        for (ordinal, raw) in bookmark.deadlines().iter().enumerate() {
            let fire_at = match self.fire_time(raw, kind) {
                Some(at) => at,
                None => {
                    debug!("skipping unparseable deadline {:?} of {}", raw, bookmark.url);
                    continue;
                }
            };
            if fire_at <= now {
                debug!("skipping past reminder {} for {}", fire_at, bookmark.url);
                continue;
            }

            let name = AlarmName::deadline(&bookmark.url, ordinal).encode();
            self.alarms.create(&name, fire_at.timestamp_millis());
            info!(
                "reminder for {:?} set at {} (type: {}, lead: {} min)",
                bookmark.title,
                fire_at.to_rfc3339(),
                kind.as_str(),
                self.policy.lead_time(kind).num_minutes()
            );
            scheduled.push(ScheduledReminder {
                name,
                ordinal,
                fire_at,
            });
        }
        scheduled
    }

    fn cancel_all_for(&self, url: &str) -> usize {
        let mut cleared = 0;
        for alarm in self.alarms.get_all() {
            let owned = AlarmName::decode(&alarm.name)
                .map(|n| n.owner == url)
                .unwrap_or(false);
            if owned && self.alarms.clear(&alarm.name) {
                info!("cleared alarm {}", alarm.name);
                cleared += 1;
            }
        }
        cleared
    }
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

/// Parses a deadline written as an absolute date-time.
///
/// Accepts RFC 3339, RFC 2822, naive `YYYY-MM-DD[T ]HH:MM[:SS]` (read in
/// `naive_offset`) and bare dates (midnight UTC).
pub fn parse_deadline(raw: &str, naive_offset: FixedOffset) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return naive_offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n));
        }
    }
    None
}
