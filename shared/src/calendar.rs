//! Calendar grid for payable accounts.
//!
//! The grid always spans six full weeks (Sunday first) so that every month
//! renders with the same shape. Buckets are built from the full, unfiltered
//! collection; list filters never apply here.

use crate::PayableAccount;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const GRID_WEEKS: usize = 6;
pub const GRID_CELLS: usize = GRID_WEEKS * 7;
/// Chips rendered per day before collapsing into "+N"
pub const MAX_VISIBLE_CHIPS: usize = 2;

/// Displayed month of the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCursor {
    pub year: i32,
    pub month: u32,
}

impl CalendarCursor {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.next();
        (next.first_day() - self.first_day()).num_days() as u32
    }

    pub fn label(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }
}

/// Spanish month name, as shown in the calendar header
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "Enero", 2 => "Febrero", 3 => "Marzo", 4 => "Abril",
        5 => "Mayo", 6 => "Junio", 7 => "Julio", 8 => "Agosto",
        9 => "Septiembre", 10 => "Octubre", 11 => "Noviembre", 12 => "Diciembre",
        _ => "Mes inválido",
    }
}

pub const WEEKDAY_LABELS: [&str; 7] = ["Dom", "Lun", "Mar", "Mié", "Jue", "Vie", "Sáb"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// False for the padding days of the previous and next month
    pub in_month: bool,
    pub is_today: bool,
    pub payables: Vec<PayableAccount>,
}

impl CalendarCell {
    pub fn visible_chips(&self) -> &[PayableAccount] {
        let end = self.payables.len().min(MAX_VISIBLE_CHIPS);
        &self.payables[..end]
    }

    pub fn overflow_count(&self) -> usize {
        self.payables.len().saturating_sub(MAX_VISIBLE_CHIPS)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarGrid {
    pub cursor: CalendarCursor,
    pub cells: Vec<CalendarCell>,
}

impl CalendarGrid {
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(7)
    }
}

/// Records whose due date is exactly `date`
pub fn payables_on(items: &[PayableAccount], date: NaiveDate) -> Vec<PayableAccount> {
    items
        .iter()
        .filter(|account| account.due_date == date)
        .cloned()
        .collect()
}

/// Build the 6x7 grid for `cursor`, starting on the Sunday on or before the 1st
pub fn build_calendar_grid(
    cursor: CalendarCursor,
    items: &[PayableAccount],
    today: NaiveDate,
) -> CalendarGrid {
    let first = cursor.first_day();
    let offset = first.weekday().num_days_from_sunday() as i64;
    let grid_start = first - Duration::days(offset);

    let cells = (0..GRID_CELLS as i64)
        .map(|i| {
            let date = grid_start + Duration::days(i);
            CalendarCell {
                date,
                in_month: date.month() == cursor.month && date.year() == cursor.year,
                is_today: date == today,
                payables: payables_on(items, date),
            }
        })
        .collect();

    CalendarGrid { cursor, cells }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryBucket {
    pub count: usize,
    pub amount: f64,
}

impl SummaryBucket {
    fn add(&mut self, amount: f64) {
        self.count += 1;
        self.amount += amount;
    }
}

/// Same-day summary shown in the day dialog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Fully paid; amount is `amount_with_tax`
    pub paid: SummaryBucket,
    /// Unpaid and not yet due; amount is the outstanding balance
    pub payable: SummaryBucket,
    /// Unpaid and due before today; amount is the outstanding balance
    pub overdue: SummaryBucket,
}

/// Summarise the records due on `date`; `today` must be read fresh by the caller
pub fn summarize_day(items: &[PayableAccount], date: NaiveDate, today: NaiveDate) -> DaySummary {
    let mut summary = DaySummary {
        date,
        paid: SummaryBucket::default(),
        payable: SummaryBucket::default(),
        overdue: SummaryBucket::default(),
    };
    for account in items.iter().filter(|a| a.due_date == date) {
        if account.is_paid {
            summary.paid.add(account.amount_with_tax);
        } else if account.is_overdue(today) {
            summary.overdue.add(account.outstanding());
        } else {
            summary.payable.add(account.outstanding());
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::payable;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_grid_always_has_42_cells() {
        let today = date("2025-06-15");
        for year in [2015, 2024, 2025, 2026] {
            for month in 1..=12 {
                let cursor = CalendarCursor::new(year, month).unwrap();
                let grid = build_calendar_grid(cursor, &[], today);
                assert_eq!(grid.cells.len(), GRID_CELLS);
                assert_eq!(grid.weeks().count(), GRID_WEEKS);
                let in_month = grid.cells.iter().filter(|c| c.in_month).count() as u32;
                assert_eq!(in_month, cursor.days_in_month());
            }
        }
    }

    #[test]
    fn test_grid_starts_on_sunday() {
        // June 1st 2025 is a Sunday, so no leading padding
        let grid = build_calendar_grid(CalendarCursor::new(2025, 6).unwrap(), &[], date("2025-06-15"));
        assert_eq!(grid.cells[0].date, date("2025-06-01"));
        assert!(grid.cells[0].in_month);

        // February 2026 starts on a Sunday and has 28 days: two trailing padding weeks
        let grid = build_calendar_grid(CalendarCursor::new(2026, 2).unwrap(), &[], date("2026-02-10"));
        assert_eq!(grid.cells[0].date, date("2026-02-01"));
        assert_eq!(grid.cells[41].date, date("2026-03-14"));

        // October 2026 starts on a Thursday
        let grid = build_calendar_grid(CalendarCursor::new(2026, 10).unwrap(), &[], date("2026-10-19"));
        assert_eq!(grid.cells[0].date, date("2026-09-27"));
        assert!(!grid.cells[0].in_month);
        assert_eq!(grid.cells[4].date, date("2026-10-01"));
    }

    #[test]
    fn test_cells_bucket_by_exact_date() {
        let items = vec![
            payable("a", "2025-06-10", 100.0, false, 0.0),
            payable("b", "2025-06-10", 200.0, true, 0.0),
            payable("c", "2025-06-10", 300.0, false, 0.0),
            payable("d", "2025-06-11", 400.0, false, 0.0),
            payable("e", "2025-07-01", 500.0, false, 0.0),
        ];
        let grid = build_calendar_grid(CalendarCursor::new(2025, 6).unwrap(), &items, date("2025-06-10"));
        let cell = grid.cells.iter().find(|c| c.date == date("2025-06-10")).unwrap();
        assert!(cell.is_today);
        assert_eq!(cell.payables.len(), 3);
        assert_eq!(cell.visible_chips().len(), 2);
        assert_eq!(cell.overflow_count(), 1);

        let next = grid.cells.iter().find(|c| c.date == date("2025-06-11")).unwrap();
        assert_eq!(next.visible_chips().len(), 1);
        assert_eq!(next.overflow_count(), 0);

        // July 1st shows up in the trailing padding
        let padding = grid.cells.iter().find(|c| c.date == date("2025-07-01")).unwrap();
        assert!(!padding.in_month);
        assert_eq!(padding.payables.len(), 1);
    }

    #[test]
    fn test_day_summary_splits_paid_payable_overdue() {
        let items = vec![
            payable("a", "2025-06-10", 1000.0, false, 400.0),
            payable("b", "2025-06-10", 200.0, true, 0.0),
            payable("c", "2025-06-10", 300.0, false, 0.0),
            payable("d", "2025-06-11", 400.0, false, 0.0),
        ];

        let before = summarize_day(&items, date("2025-06-10"), date("2025-06-10"));
        assert_eq!(before.paid, SummaryBucket { count: 1, amount: 200.0 });
        assert_eq!(before.payable, SummaryBucket { count: 2, amount: 900.0 });
        assert_eq!(before.overdue, SummaryBucket::default());

        let after = summarize_day(&items, date("2025-06-10"), date("2025-06-11"));
        assert_eq!(after.payable, SummaryBucket::default());
        assert_eq!(after.overdue, SummaryBucket { count: 2, amount: 900.0 });
    }

    #[test]
    fn test_cursor_navigation() {
        let june = CalendarCursor::new(2025, 6).unwrap();
        assert_eq!(june.previous(), CalendarCursor { year: 2025, month: 5 });
        assert_eq!(june.next(), CalendarCursor { year: 2025, month: 7 });

        let january = CalendarCursor::new(2025, 1).unwrap();
        assert_eq!(january.previous(), CalendarCursor { year: 2024, month: 12 });

        let december = CalendarCursor::new(2025, 12).unwrap();
        assert_eq!(december.next(), CalendarCursor { year: 2026, month: 1 });

        assert_eq!(CalendarCursor::containing(date("2026-10-19")).label(), "Octubre 2026");
        assert!(CalendarCursor::new(2025, 13).is_none());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(CalendarCursor::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(CalendarCursor::new(2025, 2).unwrap().days_in_month(), 28);
        assert_eq!(CalendarCursor::new(2025, 4).unwrap().days_in_month(), 30);
        assert_eq!(CalendarCursor::new(2025, 12).unwrap().days_in_month(), 31);
    }
}
