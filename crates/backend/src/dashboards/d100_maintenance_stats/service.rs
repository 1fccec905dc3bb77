use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use contracts::dashboards::d100_maintenance_stats::calendar::{
    CalendarEvent, CalendarEventId, CalendarMoveRequest, CalendarQuery,
};
use contracts::dashboards::d100_maintenance_stats::dto::{MaintenanceStats, StatsQuery};
use contracts::domain::a005_scheduled_maintenance::aggregate::{
    default_start_time, ScheduledMaintenance, ScheduledQuery,
};
use contracts::domain::a006_intervention::aggregate::MaintenanceIntervention;
use contracts::enums::{InterventionStatus, MaintenanceStatus};
use std::collections::HashMap;

use crate::domain::{a003_equipment, a005_scheduled_maintenance, a006_intervention};
use crate::shared::error::{ApiError, ApiResult};
use crate::system::users::repository as user_repository;

/// Default length of an intervention block on the calendar
const INTERVENTION_SLOT_HOURS: i64 = 2;

fn month_start(today: NaiveDate) -> DateTime<Utc> {
    let first = today.with_day(1).unwrap_or(today);
    Utc.from_utc_datetime(&first.and_time(NaiveTime::MIN))
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Mean downtime of failure repairs, in hours.
pub fn mttr(interventions: &[MaintenanceIntervention]) -> f64 {
    let hours: Vec<f64> = interventions
        .iter()
        .filter(|i| i.maintenance_type.is_failure_repair() && i.status.is_done())
        .filter_map(|i| i.downtime_hours())
        .collect();
    round2(mean(&hours))
}

/// Mean interval between two consecutive failures of the same equipment, in hours.
pub fn mtbf(interventions: &[MaintenanceIntervention]) -> f64 {
    let mut failures: HashMap<i32, Vec<DateTime<Utc>>> = HashMap::new();
    for i in interventions
        .iter()
        .filter(|i| i.maintenance_type.is_failure_repair())
    {
        let at = i.downtime_start.or(i.actual_start_time).unwrap_or(i.created_at);
        failures.entry(i.equipment_id).or_default().push(at);
    }

    let mut gaps = Vec::new();
    for times in failures.values_mut() {
        times.sort();
        for pair in times.windows(2) {
            gaps.push((pair[1] - pair[0]).num_seconds() as f64 / 3600.0);
        }
    }
    round2(mean(&gaps))
}

/// Aggregates counters and reliability indicators.
pub fn compute_stats(
    scheduled: &[ScheduledMaintenance],
    interventions: &[MaintenanceIntervention],
    today: NaiveDate,
) -> MaintenanceStats {
    let mut stats = MaintenanceStats::empty();
    let since = month_start(today);

    stats.total_scheduled = scheduled.len() as u64;
    stats.overdue = scheduled
        .iter()
        .filter(|m| m.status == MaintenanceStatus::Overdue || m.is_overdue(today))
        .count() as u64;
    stats.in_progress = interventions
        .iter()
        .filter(|i| i.status == InterventionStatus::InProgress)
        .count() as u64;
    stats.completed_this_month = interventions
        .iter()
        .filter(|i| i.status.is_done() && i.status != InterventionStatus::Rejected)
        .filter(|i| i.actual_end_time.map_or(false, |end| end >= since))
        .count() as u64;

    for i in interventions {
        *stats
            .by_type
            .entry(i.maintenance_type.as_str().to_string())
            .or_insert(0) += 1;
        *stats
            .by_priority
            .entry(i.priority.as_str().to_string())
            .or_insert(0) += 1;
    }

    let durations: Vec<f64> = interventions
        .iter()
        .filter(|i| i.status.is_done())
        .filter_map(|i| i.completion_hours())
        .collect();
    stats.average_completion_time = round2(mean(&durations));
    stats.mttr = mttr(interventions);
    stats.mtbf = mtbf(interventions);
    stats
}

pub async fn get_stats(query: &StatsQuery) -> ApiResult<MaintenanceStats> {
    let scheduled = a005_scheduled_maintenance::service::list(&ScheduledQuery {
        equipment_id: query.equipment_id,
        ..Default::default()
    })
    .await?
    .into_iter()
    .map(|d| d.maintenance)
    .collect::<Vec<_>>();

    let mut interventions = a006_intervention::repository::list_all().await?;
    if let Some(equipment_id) = query.equipment_id {
        interventions.retain(|i| i.equipment_id == equipment_id);
    }

    Ok(compute_stats(&scheduled, &interventions, Utc::now().date_naive()))
}

/// Calendar span of an intervention: actual times when known, else a slot
/// on its scheduled date.
pub fn intervention_span(i: &MaintenanceIntervention) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = match (i.actual_start_time, i.scheduled_date) {
        (Some(start), _) => start.naive_utc(),
        (None, Some(date)) => date.and_time(default_start_time()),
        (None, None) => return None,
    };
    let end = i
        .actual_end_time
        .map(|e| e.naive_utc())
        .filter(|e| *e > start)
        .unwrap_or(start + Duration::hours(INTERVENTION_SLOT_HOURS));
    Some((start, end))
}

fn technician_of(id: Option<i32>, users: &HashMap<i32, String>) -> Option<(i32, String)> {
    id.and_then(|id| users.get(&id).map(|name| (id, name.clone())))
}

/// Events of scheduled maintenances and interventions, sorted by start.
pub fn build_events(
    scheduled: &[ScheduledMaintenance],
    interventions: &[MaintenanceIntervention],
    equipment: &HashMap<i32, String>,
    users: &HashMap<i32, String>,
) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = scheduled
        .iter()
        .map(|m| {
            CalendarEvent::scheduled(
                m.id,
                m.start(),
                m.end(),
                m.status,
                m.priority,
                m.equipment_id,
                equipment.get(&m.equipment_id).cloned(),
                technician_of(m.assigned_technician_id, users),
            )
        })
        .collect();

    events.extend(interventions.iter().filter_map(|i| {
        let (start, end) = intervention_span(i)?;
        Some(CalendarEvent::intervention(
            i.id,
            start,
            end,
            i.status,
            i.priority,
            i.equipment_id,
            equipment.get(&i.equipment_id).cloned(),
            technician_of(Some(i.technician_id), users),
        ))
    }));

    events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
    events
}

async fn name_maps() -> ApiResult<(HashMap<i32, String>, HashMap<i32, String>)> {
    let equipment = a003_equipment::repository::names_by_id().await?;
    let users = user_repository::names_by_id().await?;
    Ok((equipment, users))
}

pub async fn get_calendar(query: &CalendarQuery) -> ApiResult<Vec<CalendarEvent>> {
    if query.end_date < query.start_date {
        return Err(ApiError::bad_request(
            "La date de fin doit être postérieure à la date de début",
        ));
    }

    let scheduled = a005_scheduled_maintenance::repository::list(&ScheduledQuery {
        equipment_id: query.equipment_id,
        technician_id: query.technician_id,
        status: None,
        date_from: Some(query.start_date),
        date_to: Some(query.end_date),
    })
    .await?;

    let mut interventions =
        a006_intervention::repository::list_in_range(query.start_date, query.end_date).await?;
    interventions.retain(|i| {
        query.equipment_id.map_or(true, |id| i.equipment_id == id)
            && query.technician_id.map_or(true, |id| i.technician_id == id)
    });

    let (equipment, users) = name_maps().await?;
    Ok(build_events(&scheduled, &interventions, &equipment, &users))
}

/// Moves a calendar event and returns it as the calendar now shows it.
///
/// Interventions only carry a planned date, so moving one keeps the day of
/// `new_start` and the event lands back on the default morning slot.
pub async fn move_event(request: &CalendarMoveRequest) -> ApiResult<CalendarEvent> {
    let id: CalendarEventId = request.event_id.parse().map_err(ApiError::BadRequest)?;
    let (equipment, users) = name_maps().await?;

    let events = match id {
        CalendarEventId::Scheduled(id) => {
            let moved = a005_scheduled_maintenance::service::move_to(
                id,
                request.new_start,
                request.new_end,
            )
            .await?;
            build_events(&[moved], &[], &equipment, &users)
        }
        CalendarEventId::Intervention(id) => {
            let mut intervention = a006_intervention::service::get_by_id(id).await?;
            if intervention.status.is_done() || intervention.actual_start_time.is_some() {
                return Err(ApiError::bad_request(
                    "Une intervention démarrée ne peut pas être déplacée",
                ));
            }
            intervention.scheduled_date = Some(request.new_start.date());
            intervention.before_write();
            a006_intervention::repository::update(&intervention).await?;
            build_events(&[], &[intervention], &equipment, &users)
        }
    };

    tracing::info!("Calendar event {} moved to {}", request.event_id, request.new_start);
    events
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::not_found("Événement non trouvé"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a005_scheduled_maintenance::aggregate::ScheduledMaintenanceCreate;
    use contracts::domain::a006_intervention::aggregate::InterventionCreate;
    use crate::shared::data::db::test_support::{equipment, test_database, user};
    use contracts::enums::{MaintenanceType, Priority, UserRole};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn utc(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, h, 0, 0).unwrap()
    }

    fn scheduled(id: i32, date: NaiveDate, status: MaintenanceStatus) -> ScheduledMaintenance {
        let mut m = ScheduledMaintenance::new_for_insert(&ScheduledMaintenanceCreate {
            maintenance_plan_id: 1,
            equipment_id: 4,
            scheduled_date: date,
            estimated_start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            estimated_end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            assigned_technician_id: Some(7),
            status,
            priority: Priority::High,
            notes: None,
        });
        m.id = id;
        m
    }

    fn repair(
        equipment_id: i32,
        kind: MaintenanceType,
        start: DateTime<Utc>,
        hours: i64,
    ) -> MaintenanceIntervention {
        let mut i = MaintenanceIntervention::new_for_insert(&InterventionCreate {
            equipment_id,
            technician_id: 7,
            maintenance_type: kind,
            description: "Panne moteur".into(),
            ..Default::default()
        });
        i.status = InterventionStatus::Completed;
        i.actual_start_time = Some(start);
        i.actual_end_time = Some(start + Duration::hours(hours));
        i
    }

    #[test]
    fn reliability_indicators() {
        let items = vec![
            repair(1, MaintenanceType::Corrective, utc(1, 8), 2),
            repair(1, MaintenanceType::Emergency, utc(3, 8), 4),
            repair(2, MaintenanceType::Preventive, utc(2, 8), 10),
        ];
        assert_eq!(mttr(&items), 3.0);
        assert_eq!(mtbf(&items), 48.0);
        assert_eq!(mtbf(&items[..1]), 0.0);
    }

    #[test]
    fn stats_counts() {
        let today = day(10);
        let plans = vec![
            scheduled(1, day(5), MaintenanceStatus::Scheduled),
            scheduled(2, day(12), MaintenanceStatus::Scheduled),
            scheduled(3, day(6), MaintenanceStatus::Completed),
        ];
        let mut running = repair(3, MaintenanceType::Preventive, utc(9, 8), 1);
        running.status = InterventionStatus::InProgress;
        running.actual_end_time = None;
        let done = repair(1, MaintenanceType::Corrective, utc(2, 8), 3);

        let stats = compute_stats(&plans, &[running, done], today);
        assert_eq!(stats.total_scheduled, 3);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.completed_this_month, 1);
        assert_eq!(stats.by_type["preventive"], 1);
        assert_eq!(stats.by_type["corrective"], 1);
        assert_eq!(stats.by_type["emergency"], 0);
        assert_eq!(stats.by_priority["medium"], 2);
        assert_eq!(stats.average_completion_time, 3.0);
    }

    #[test]
    fn events_are_sorted_and_named() {
        let mut equipment = HashMap::new();
        equipment.insert(4, "Presse P-200".to_string());
        let mut users = HashMap::new();
        users.insert(7, "Jean Martin".to_string());

        let mut pending = MaintenanceIntervention::new_for_insert(&InterventionCreate {
            equipment_id: 4,
            technician_id: 7,
            description: "Fuite".into(),
            scheduled_date: Some(day(2)),
            ..Default::default()
        });
        pending.id = 5;
        let undated = MaintenanceIntervention::new_for_insert(&InterventionCreate {
            equipment_id: 9,
            technician_id: 7,
            description: "Sans date".into(),
            ..Default::default()
        });

        let events = build_events(
            &[scheduled(1, day(3), MaintenanceStatus::Scheduled)],
            &[pending, undated],
            &equipment,
            &users,
        );
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, "intervention_5");
        assert_eq!(events[0].title, "Intervention - Presse P-200");
        assert_eq!(
            events[0].end - events[0].start,
            Duration::hours(INTERVENTION_SLOT_HOURS)
        );
        assert_eq!(events[1].id, "scheduled_1");
        assert_eq!(
            events[1].extended_props.technician_name.as_deref(),
            Some("Jean Martin")
        );
    }

    async fn open_intervention(technician_id: i32, date: Option<NaiveDate>) -> MaintenanceIntervention {
        a006_intervention::service::create(InterventionCreate {
            equipment_id: equipment().await,
            technician_id,
            description: "Contrôle vibrations".into(),
            scheduled_date: date,
            ..Default::default()
        })
        .await
        .unwrap()
        .intervention
    }

    #[tokio::test]
    async fn started_interventions_show_on_the_calendar() {
        let _db = test_database().await;
        let manager = user(UserRole::Supervisor).await;
        let technician = user(UserRole::Technician).await;
        let undated = open_intervention(technician.id, None).await;
        a006_intervention::service::assign(undated.id, technician.id, &manager)
            .await
            .unwrap();
        a006_intervention::service::start(undated.id, &technician)
            .await
            .unwrap();

        let today = Utc::now().date_naive();
        let events = get_calendar(&CalendarQuery {
            start_date: today,
            end_date: today,
            equipment_id: None,
            technician_id: Some(technician.id),
        })
        .await
        .unwrap();
        let expected = CalendarEventId::Intervention(undated.id).to_string();
        assert!(events.iter().any(|e| e.id == expected));

        let yesterday = today - Duration::days(1);
        let earlier = get_calendar(&CalendarQuery {
            start_date: yesterday - Duration::days(6),
            end_date: yesterday,
            equipment_id: None,
            technician_id: Some(technician.id),
        })
        .await
        .unwrap();
        assert!(earlier.iter().all(|e| e.id != expected));
    }

    #[tokio::test]
    async fn moved_intervention_keeps_the_new_day() {
        let _db = test_database().await;
        let technician = user(UserRole::Technician).await;
        let today = Utc::now().date_naive();
        let planned = open_intervention(technician.id, Some(today)).await;

        let target = today + Duration::days(5);
        let event = move_event(&CalendarMoveRequest {
            event_id: CalendarEventId::Intervention(planned.id).to_string(),
            new_start: target.and_hms_opt(14, 30, 0).unwrap(),
            new_end: Some(target.and_hms_opt(16, 0, 0).unwrap()),
        })
        .await
        .unwrap();

        assert_eq!(event.start, target.and_time(default_start_time()));
        assert_eq!(event.end - event.start, Duration::hours(INTERVENTION_SLOT_HOURS));
        assert_eq!(
            a006_intervention::service::get_by_id(planned.id)
                .await
                .unwrap()
                .scheduled_date,
            Some(target)
        );
    }
}
