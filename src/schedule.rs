//! Wall-clock aligned trigger that fires the job every `period_minutes`.
//!
//! Boundaries are counted from UTC midnight, so the default 30 minute period
//! fires at `hh:00:00` and `hh:30:00`. Runs are awaited inline: a run that
//! overruns its slot delays the next one instead of overlapping with it.

use crate::config::ScheduleConfig;
use crate::job::Job;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use log::{info, warn};
use std::sync::Arc;

/// How late a firing may be before it is reported as past due.
const PAST_DUE_TOLERANCE_SECONDS: i64 = 1;

#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    config: ScheduleConfig,
}

impl Scheduler {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    /// Fires `job` on every boundary until Ctrl-C is received between runs.
    pub async fn run(&self, job: Arc<Job>) {
        let period = self.config.period_minutes;
        info!("Scheduler started, running every {} minutes", period);

        let mut scheduled = if self.config.run_on_startup {
            Utc::now()
        } else {
            next_boundary(Utc::now(), period)
        };

        loop {
            info!("Next run scheduled at {}", scheduled);
            let wait = (scheduled - Utc::now()).to_std().unwrap_or_default();
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown requested, stopping scheduler");
                    return;
                }
            }

            let fired_at = Utc::now();
            if is_past_due(scheduled, fired_at) {
                warn!("The timer is past due!");
            }
            job.tick(fired_at).await;

            scheduled = following_slot(scheduled, Utc::now(), period);
        }
    }
}

/// First boundary strictly after `after`.
pub fn next_boundary(after: DateTime<Utc>, period_minutes: u32) -> DateTime<Utc> {
    let period_seconds = i64::from(period_minutes.max(1)) * 60;
    let midnight = after.date_naive().and_time(NaiveTime::MIN).and_utc();
    let elapsed = (after - midnight).num_seconds();
    midnight + Duration::seconds((elapsed / period_seconds + 1) * period_seconds)
}

/// Slot to wait for after the run scheduled at `previous` finished at `now`.
///
/// Normally the boundary right after `previous`. If that boundary has already
/// passed, the most recent missed boundary is returned so it fires once, late;
/// older missed boundaries are dropped.
pub fn following_slot(
    previous: DateTime<Utc>,
    now: DateTime<Utc>,
    period_minutes: u32,
) -> DateTime<Utc> {
    let candidate = next_boundary(previous, period_minutes);
    if candidate > now {
        candidate
    } else {
        next_boundary(now, period_minutes) - Duration::minutes(i64::from(period_minutes.max(1)))
    }
}

pub fn is_past_due(scheduled: DateTime<Utc>, fired_at: DateTime<Utc>) -> bool {
    fired_at - scheduled > Duration::seconds(PAST_DUE_TOLERANCE_SECONDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, h, m, s).unwrap()
    }

    #[test]
    fn boundaries_are_on_the_hour_and_half_hour() {
        assert_eq!(next_boundary(at(10, 0, 1), 30), at(10, 30, 0));
        assert_eq!(next_boundary(at(10, 29, 59), 30), at(10, 30, 0));
        assert_eq!(next_boundary(at(10, 30, 0), 30), at(11, 0, 0));
        assert_eq!(next_boundary(at(10, 45, 0), 30), at(11, 0, 0));
    }

    #[test]
    fn boundary_rolls_over_midnight() {
        let next = next_boundary(at(23, 50, 0), 30);
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 5, 18, 0, 0, 0).unwrap());
    }

    #[test]
    fn sub_second_offsets_still_move_forward() {
        let just_after = at(12, 0, 0) + Duration::milliseconds(3);
        assert_eq!(next_boundary(just_after, 30), at(12, 30, 0));
    }

    #[test]
    fn other_periods() {
        assert_eq!(next_boundary(at(10, 7, 0), 15), at(10, 15, 0));
        assert_eq!(next_boundary(at(10, 7, 0), 1440), Utc.with_ymd_and_hms(2024, 5, 18, 0, 0, 0).unwrap());
    }

    #[test]
    fn on_time_run_waits_for_next_boundary() {
        assert_eq!(following_slot(at(10, 0, 0), at(10, 0, 40), 30), at(10, 30, 0));
    }

    #[test]
    fn overrun_fires_latest_missed_slot_once() {
        let slot = following_slot(at(10, 0, 0), at(11, 12, 0), 30);
        assert_eq!(slot, at(11, 0, 0));
        assert!(is_past_due(slot, at(11, 12, 0)));

        // once the late run is done the schedule is back on the boundaries
        assert_eq!(following_slot(slot, at(11, 12, 30), 30), at(11, 30, 0));
    }

    #[test]
    fn past_due_needs_more_than_the_tolerance() {
        assert!(!is_past_due(at(10, 0, 0), at(10, 0, 0) + Duration::milliseconds(20)));
        assert!(is_past_due(at(10, 0, 0), at(10, 0, 5)));
        assert!(!is_past_due(at(10, 0, 0), at(9, 59, 59)));
    }
}
