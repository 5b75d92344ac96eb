//! Time remaining until a task's deadline.
//!
//! The remaining/overdue figures are exact. The displayed percentage gets a
//! boost in the final three days so cards near their deadline stand out; the
//! boosted numbers are cosmetic.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::models::Task;

const HOUR_MS: f64 = 60.0 * 60.0 * 1000.0;
const DAY_MS: f64 = 24.0 * HOUR_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBand {
    Start,
    Low,
    Medium,
    MediumHigh,
    High,
    Complete,
    Overdue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeadlineProgress {
    /// Displayed completion, 0–100.
    pub percent: f64,
    pub overdue: bool,
    pub days_remaining: i64,
    pub hours_remaining: i64,
    pub band: ProgressBand,
    pub label: String,
}

/// A deadline counts until the last millisecond of its (UTC) day.
pub fn end_of_day(deadline: DateTime<Utc>) -> DateTime<Utc> {
    let midnight = deadline.date_naive().and_time(NaiveTime::default()).and_utc();
    midnight + Duration::days(1) - Duration::milliseconds(1)
}

impl DeadlineProgress {
    pub fn for_task(task: &Task, now: DateTime<Utc>) -> Option<Self> {
        Self::compute(Some(task.created_at), task.deadline?, now)
    }

    /// `None` when the deadline does not fall after the start.
    pub fn compute(
        created_at: Option<DateTime<Utc>>,
        deadline: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let start = created_at.unwrap_or(now);
        let end = end_of_day(deadline);
        if end <= start {
            return None;
        }

        let total = millis(end - start);
        let elapsed = millis(now - start);
        let remaining = millis(end - now);
        let overdue = now > end;

        let days_remaining = (remaining / DAY_MS).ceil() as i64;
        let hours_remaining = (remaining / HOUR_MS).ceil() as i64;

        let mut percent = (elapsed / total * 100.0).clamp(0.0, 100.0);
        if !overdue && (1..=3).contains(&days_remaining) {
            let hours_left = remaining / HOUR_MS;
            let base = 80.0 + (4 - days_remaining) as f64 * 5.0;
            let within_day = (24.0 - hours_left % 24.0) / 24.0 * 3.0;
            percent = percent.max(base + within_day);
        }

        let band = if overdue {
            ProgressBand::Overdue
        } else if percent >= 100.0 {
            ProgressBand::Complete
        } else if percent >= 80.0 {
            ProgressBand::High
        } else if percent >= 60.0 {
            ProgressBand::MediumHigh
        } else if percent >= 40.0 {
            ProgressBand::Medium
        } else if percent >= 20.0 {
            ProgressBand::Low
        } else {
            ProgressBand::Start
        };

        let label = if overdue {
            let late = millis(now - end);
            let days_late = (late / DAY_MS).floor() as i64;
            if days_late == 0 {
                format!("{} overdue", count((late / HOUR_MS).ceil() as i64, "hour"))
            } else {
                format!("{} overdue", count(days_late, "day"))
            }
        } else if hours_remaining > 0 && hours_remaining < 24 {
            format!("{} left", count(hours_remaining, "hour"))
        } else if days_remaining > 0 {
            format!("{} left", count(days_remaining, "day"))
        } else {
            "Less than 1 hour left".to_string()
        };

        Some(DeadlineProgress {
            percent,
            overdue,
            days_remaining,
            hours_remaining,
            band,
            label,
        })
    }
}

fn millis(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64
}

fn count(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}
