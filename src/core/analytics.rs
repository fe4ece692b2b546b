// Productivity numbers over a window of time
//
// Pure arithmetic over a task list. The dispatcher loads the tasks and
// hands them over.

use crate::db::{Category, Task};
use crate::error::{ErrandError, Result};
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use std::str::FromStr;

// Format SQLite's CURRENT_TIMESTAMP writes
const SQLITE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Week,
    Month,
    All,
}

impl Period {
    /// Start of the window, or None for all time
    pub fn start(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Period::Today => now.date().and_hms_opt(0, 0, 0),
            Period::Week => Some(now - Duration::days(7)),
            Period::Month => Some(now - Duration::days(30)),
            Period::All => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Week => "the past week",
            Period::Month => "the past month",
            Period::All => "all time",
        }
    }
}

impl FromStr for Period {
    type Err = ErrandError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "today" | "day" => Ok(Period::Today),
            "week" | "7 days" => Ok(Period::Week),
            "month" | "30 days" => Ok(Period::Month),
            "all" | "all time" | "ever" | "overall" => Ok(Period::All),
            other => Err(ErrandError::InvalidCommand(format!("unknown period: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryBreakdown {
    pub category: String,
    pub total: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductivityReport {
    pub period: Period,
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    /// 0.0 to 1.0
    pub completion_rate: f64,
    /// Minutes
    pub average_estimated_duration: f64,
    /// Categories with at least one task, in declaration order
    pub by_category: Vec<CategoryBreakdown>,
}

impl ProductivityReport {
    /// Build a report over the tasks touched during `period`.
    ///
    /// A task counts if it was created or completed inside the window.
    /// Tasks with an unreadable creation time are always counted.
    pub fn build(tasks: &[Task], period: Period, now: NaiveDateTime) -> Self {
        let start = period.start(now);
        let in_window: Vec<&Task> = tasks
            .iter()
            .filter(|t| match start {
                None => true,
                Some(start) => touched_since(t, start),
            })
            .collect();

        let total = in_window.len();
        let completed = in_window.iter().filter(|t| t.completed).count();
        let overdue = in_window.iter().filter(|t| t.is_overdue(now)).count();

        let completion_rate = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64
        };
        let average_estimated_duration = if total == 0 {
            0.0
        } else {
            in_window.iter().map(|t| t.estimated_duration as f64).sum::<f64>() / total as f64
        };

        let by_category = Category::ALL
            .iter()
            .map(|category| {
                let name = category.to_string();
                let matching: Vec<&&Task> =
                    in_window.iter().filter(|t| t.category == name).collect();
                CategoryBreakdown {
                    total: matching.len(),
                    completed: matching.iter().filter(|t| t.completed).count(),
                    category: name,
                }
            })
            .filter(|b| b.total > 0)
            .collect();

        Self {
            period,
            total,
            completed,
            pending: total - completed,
            overdue,
            completion_rate,
            average_estimated_duration,
            by_category,
        }
    }

    /// Whole-number percentage for display
    pub fn completion_percent(&self) -> u32 {
        (self.completion_rate * 100.0).round() as u32
    }
}

fn touched_since(task: &Task, start: NaiveDateTime) -> bool {
    let created = NaiveDateTime::parse_from_str(&task.created_at, SQLITE_TIMESTAMP).ok();
    let created_inside = created.map_or(true, |c| c >= start);
    let completed_inside = task.completed_at.map_or(false, |c| c >= start);
    created_inside || completed_inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn task(title: &str, category: &str, created: &str, minutes: i64) -> Task {
        Task {
            id: 0,
            title: title.to_string(),
            priority: "medium".to_string(),
            category: category.to_string(),
            estimated_duration: minutes,
            tags: None,
            due_date: None,
            completed: false,
            completed_at: None,
            created_at: created.to_string(),
        }
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("All Time".parse::<Period>().unwrap(), Period::All);
        assert!("fortnight".parse::<Period>().is_err());
    }

    #[test]
    fn test_empty_report() {
        let report = ProductivityReport::build(&[], Period::Week, now());
        assert_eq!(report.total, 0);
        assert_eq!(report.completion_rate, 0.0);
        assert!(report.by_category.is_empty());
    }

    #[test]
    fn test_week_report() {
        let mut done = task("Buy milk", "shopping", "2026-03-01 08:00:00", 30);
        done.completed = true;
        done.completed_at = Some(now() - Duration::hours(1));

        let mut late = task("File taxes", "finance", "2026-02-27 12:00:00", 120);
        late.due_date = Some(now() - Duration::days(1));

        let mut old_but_finished = task("Read book", "learning", "2025-12-01 08:00:00", 60);
        old_but_finished.completed = true;
        old_but_finished.completed_at = Some(now() - Duration::days(2));

        let ancient = task("Clean garage", "household", "2025-01-01 08:00:00", 60);

        let tasks = vec![done, late, old_but_finished, ancient];
        let report = ProductivityReport::build(&tasks, Period::Week, now());

        assert_eq!(report.total, 3);
        assert_eq!(report.completed, 2);
        assert_eq!(report.pending, 1);
        assert_eq!(report.overdue, 1);
        assert_eq!(report.completion_percent(), 67);
        assert_eq!(report.average_estimated_duration, 70.0);

        let categories: Vec<&str> = report.by_category.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(categories, vec!["shopping", "finance", "learning"]);
    }

    #[test]
    fn test_all_time_counts_everything() {
        let tasks = vec![
            task("Old", "general", "2020-01-01 00:00:00", 60),
            task("Unreadable", "general", "yesterday-ish", 60),
        ];
        let report = ProductivityReport::build(&tasks, Period::All, now());
        assert_eq!(report.total, 2);
        assert_eq!(report.by_category[0].total, 2);
    }
}
