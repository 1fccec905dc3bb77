//! Month view arithmetic for the maintenance calendar.
//!
//! Weeks start on Monday. The grid always covers whole weeks, so it spills
//! into the previous and next month.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use contracts::dashboards::d100_maintenance_stats::calendar::{CalendarEvent, CalendarEventId};

const MONTHS: [&str; 12] = [
    "Janvier", "Février", "Mars", "Avril", "Mai", "Juin", "Juillet", "Août", "Septembre",
    "Octobre", "Novembre", "Décembre",
];

pub const WEEKDAYS: [&str; 7] = ["Lun", "Mar", "Mer", "Jeu", "Ven", "Sam", "Dim"];

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `delta` months away from the month of `date`
pub fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + delta;
    let (year, month0) = (index.div_euclid(12), index.rem_euclid(12) as u32);
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(date)
}

/// "Juin 2025"
pub fn month_label(date: NaiveDate) -> String {
    format!("{} {}", MONTHS[date.month0() as usize], date.year())
}

/// First and last day shown by the grid of the month containing `date`
pub fn grid_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = month_start(date);
    let start = first - Duration::days(first.weekday().num_days_from_monday() as i64);
    let last = shift_month(first, 1) - Duration::days(1);
    let end = last + Duration::days(6 - last.weekday().num_days_from_monday() as i64);
    (start, end)
}

pub fn weeks(date: NaiveDate) -> Vec<Vec<NaiveDate>> {
    let (start, end) = grid_range(date);
    let days: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
    days.chunks(7).map(<[NaiveDate]>::to_vec).collect()
}

/// Events starting on `day`, earliest first
pub fn events_on(events: &[CalendarEvent], day: NaiveDate) -> Vec<CalendarEvent> {
    let mut found: Vec<CalendarEvent> = events.iter().filter(|e| e.date() == day).cloned().collect();
    found.sort_by_key(|e| e.start);
    found
}

/// Page that opens when an event is clicked
pub fn event_route(event: &CalendarEvent) -> Option<String> {
    match event.event_id()? {
        CalendarEventId::Intervention(id) => Some(format!("/maintenance/interventions/{}", id)),
        CalendarEventId::Scheduled(_) => Some("/maintenance/planning".to_string()),
    }
}

/// End of a moved event keeping its original duration
pub fn moved_end(event: &CalendarEvent, new_start: NaiveDateTime) -> NaiveDateTime {
    new_start + (event.end - event.start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::{InterventionStatus, MaintenanceStatus, Priority};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(scheduled: bool, id: i32, date: NaiveDate, hour: u32) -> CalendarEvent {
        let start = date.and_hms_opt(hour, 0, 0).unwrap();
        let end = start + Duration::hours(2);
        if scheduled {
            CalendarEvent::scheduled(id, start, end, MaintenanceStatus::Scheduled, Priority::Low, 1, None, None)
        } else {
            CalendarEvent::intervention(id, start, end, InterventionStatus::Pending, Priority::High, 1, None, None)
        }
    }

    #[test]
    fn grid_covers_whole_weeks() {
        // June 2025 starts on a Sunday and ends on a Monday
        let (start, end) = grid_range(day(2025, 6, 18));
        assert_eq!(start, day(2025, 5, 26));
        assert_eq!(end, day(2025, 7, 6));
        let w = weeks(day(2025, 6, 1));
        assert_eq!(w.len(), 6);
        assert!(w.iter().all(|week| week.len() == 7));
    }

    #[test]
    fn month_navigation_crosses_years() {
        assert_eq!(shift_month(day(2025, 1, 31), -1), day(2024, 12, 1));
        assert_eq!(shift_month(day(2025, 12, 5), 1), day(2026, 1, 1));
        assert_eq!(month_label(day(2025, 8, 3)), "Août 2025");
    }

    #[test]
    fn events_are_grouped_by_day() {
        let d = day(2025, 6, 10);
        let events = vec![event(true, 1, d, 14), event(false, 2, d, 8), event(true, 3, day(2025, 6, 11), 8)];
        let on_day = events_on(&events, d);
        assert_eq!(on_day.len(), 2);
        assert_eq!(on_day[0].id, "intervention_2");
    }

    #[test]
    fn routes_and_moves() {
        let d = day(2025, 6, 10);
        assert_eq!(event_route(&event(false, 7, d, 8)).as_deref(), Some("/maintenance/interventions/7"));
        assert_eq!(event_route(&event(true, 7, d, 8)).as_deref(), Some("/maintenance/planning"));

        let moved = moved_end(&event(true, 1, d, 8), day(2025, 6, 12).and_hms_opt(9, 30, 0).unwrap());
        assert_eq!(moved, day(2025, 6, 12).and_hms_opt(11, 30, 0).unwrap());
    }
}
