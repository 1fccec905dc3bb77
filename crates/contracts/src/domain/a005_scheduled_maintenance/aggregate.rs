use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::normalize_optional;
use crate::domain::a004_maintenance_plan::aggregate::MaintenancePlan;
use crate::enums::{MaintenanceStatus, Priority};

pub fn default_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default()
}

pub fn default_end_time() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default()
}

// ============================================================================
// Aggregate
// ============================================================================

/// One planned occurrence of a maintenance plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledMaintenance {
    pub id: i32,
    pub maintenance_plan_id: i32,
    pub equipment_id: i32,
    pub scheduled_date: NaiveDate,
    /// "HH:MM:SS"
    pub estimated_start_time: NaiveTime,
    pub estimated_end_time: NaiveTime,
    pub assigned_technician_id: Option<i32>,
    pub status: MaintenanceStatus,
    pub priority: Priority,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduledMaintenance {
    pub fn new_for_insert(dto: &ScheduledMaintenanceCreate) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            maintenance_plan_id: dto.maintenance_plan_id,
            equipment_id: dto.equipment_id,
            scheduled_date: dto.scheduled_date,
            estimated_start_time: dto.estimated_start_time,
            estimated_end_time: dto.estimated_end_time,
            assigned_technician_id: dto.assigned_technician_id,
            status: dto.status,
            priority: dto.priority,
            notes: normalize_optional(dto.notes.clone()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, dto: &ScheduledMaintenanceUpdate) {
        if let Some(date) = dto.scheduled_date {
            self.scheduled_date = date;
        }
        if let Some(t) = dto.estimated_start_time {
            self.estimated_start_time = t;
        }
        if let Some(t) = dto.estimated_end_time {
            self.estimated_end_time = t;
        }
        if dto.assigned_technician_id.is_some() {
            self.assigned_technician_id = dto.assigned_technician_id;
        }
        if let Some(status) = dto.status {
            self.status = status;
        }
        if let Some(priority) = dto.priority {
            self.priority = priority;
        }
        if let Some(notes) = &dto.notes {
            self.notes = normalize_optional(Some(notes.clone()));
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.maintenance_plan_id <= 0 {
            return Err("Le plan de maintenance est obligatoire".into());
        }
        if self.equipment_id <= 0 {
            return Err("L'équipement est obligatoire".into());
        }
        if self.estimated_end_time <= self.estimated_start_time {
            return Err("L'heure de fin doit être postérieure à l'heure de début".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn start(&self) -> NaiveDateTime {
        self.scheduled_date.and_time(self.estimated_start_time)
    }

    pub fn end(&self) -> NaiveDateTime {
        self.scheduled_date.and_time(self.estimated_end_time)
    }

    /// Still scheduled although its date has passed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status.is_open() && self.scheduled_date < today
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end() - self.start()).num_minutes()
    }

    /// Move to another slot, keeping the same duration when no end is given.
    pub fn move_to(&mut self, new_start: NaiveDateTime, new_end: Option<NaiveDateTime>) {
        let duration = self.end() - self.start();
        self.scheduled_date = new_start.date();
        self.estimated_start_time = new_start.time();
        self.estimated_end_time = match new_end {
            Some(end) if end.date() == new_start.date() && end.time() > new_start.time() => end.time(),
            _ => {
                let end = new_start + duration;
                if end.date() == new_start.date() {
                    end.time()
                } else {
                    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(end.time())
                }
            }
        };
        if self.status == MaintenanceStatus::Overdue {
            self.status = MaintenanceStatus::Scheduled;
        }
    }
}

/// Scheduled maintenance with the names the lists and calendar display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledMaintenanceDetails {
    #[serde(flatten)]
    pub maintenance: ScheduledMaintenance,
    pub plan_name: Option<String>,
    pub equipment_name: Option<String>,
    pub technician_name: Option<String>,
}

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledMaintenanceCreate {
    pub maintenance_plan_id: i32,
    pub equipment_id: i32,
    pub scheduled_date: NaiveDate,
    #[serde(default = "default_start_time")]
    pub estimated_start_time: NaiveTime,
    #[serde(default = "default_end_time")]
    pub estimated_end_time: NaiveTime,
    pub assigned_technician_id: Option<i32>,
    #[serde(default)]
    pub status: MaintenanceStatus,
    #[serde(default)]
    pub priority: Priority,
    pub notes: Option<String>,
}

impl ScheduledMaintenanceCreate {
    /// Occurrence of `plan` on `date`, slot sized from the plan duration.
    pub fn from_plan(plan: &MaintenancePlan, date: NaiveDate) -> Self {
        let start = default_start_time();
        let minutes = plan.estimated_duration.max(1) as i64;
        let (end, wrapped) = start.overflowing_add_signed(chrono::Duration::minutes(minutes));
        let end = if wrapped != 0 || end <= start {
            NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(end)
        } else {
            end
        };
        Self {
            maintenance_plan_id: plan.id,
            equipment_id: plan.equipment_id,
            scheduled_date: date,
            estimated_start_time: start,
            estimated_end_time: end,
            assigned_technician_id: None,
            status: MaintenanceStatus::Scheduled,
            priority: plan.priority,
            notes: Some(format!("Généré depuis le plan « {} »", plan.name)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScheduledMaintenanceUpdate {
    pub scheduled_date: Option<NaiveDate>,
    pub estimated_start_time: Option<NaiveTime>,
    pub estimated_end_time: Option<NaiveTime>,
    pub assigned_technician_id: Option<i32>,
    pub status: Option<MaintenanceStatus>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScheduledQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MaintenanceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

impl ScheduledQuery {
    pub fn matches(&self, m: &ScheduledMaintenance) -> bool {
        self.equipment_id.map_or(true, |id| m.equipment_id == id)
            && self
                .technician_id
                .map_or(true, |id| m.assigned_technician_id == Some(id))
            && self.status.map_or(true, |s| m.status == s)
            && self.date_from.map_or(true, |d| m.scheduled_date >= d)
            && self.date_to.map_or(true, |d| m.scheduled_date <= d)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub maintenance_ids: Vec<i32>,
    pub new_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignTechnicianRequest {
    pub technician_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingQuery {
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    7
}

impl Default for UpcomingQuery {
    fn default() -> Self {
        Self { days: default_days() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn sample() -> ScheduledMaintenance {
        ScheduledMaintenance::new_for_insert(&ScheduledMaintenanceCreate {
            maintenance_plan_id: 1,
            equipment_id: 2,
            scheduled_date: d(2025, 3, 10),
            estimated_start_time: t(8, 0),
            estimated_end_time: t(10, 30),
            assigned_technician_id: Some(5),
            status: MaintenanceStatus::Scheduled,
            priority: Priority::High,
            notes: None,
        })
    }

    #[test]
    fn occurrence_from_plan() {
        use crate::domain::a004_maintenance_plan::aggregate::MaintenancePlanCreate;
        let mut plan = MaintenancePlan::new_for_insert(
            &MaintenancePlanCreate {
                name: "Graissage".into(),
                equipment_id: 4,
                frequency_days: 30,
                estimated_duration: 90,
                priority: Priority::High,
                ..Default::default()
            },
            d(2025, 1, 1),
        );
        plan.id = 3;
        let dto = ScheduledMaintenanceCreate::from_plan(&plan, d(2025, 1, 31));
        assert_eq!(dto.maintenance_plan_id, 3);
        assert_eq!(dto.equipment_id, 4);
        assert_eq!(dto.estimated_start_time, t(8, 0));
        assert_eq!(dto.estimated_end_time, t(9, 30));
        assert_eq!(dto.priority, Priority::High);
        assert!(ScheduledMaintenance::new_for_insert(&dto).validate().is_ok());
    }

    #[test]
    fn long_plan_is_capped_at_end_of_day() {
        use crate::domain::a004_maintenance_plan::aggregate::MaintenancePlanCreate;
        let plan = MaintenancePlan::new_for_insert(
            &MaintenancePlanCreate {
                name: "Révision".into(),
                equipment_id: 4,
                frequency_days: 365,
                estimated_duration: 24 * 60,
                ..Default::default()
            },
            d(2025, 1, 1),
        );
        let dto = ScheduledMaintenanceCreate::from_plan(&plan, d(2025, 6, 1));
        assert_eq!(dto.estimated_end_time, t(23, 59));
    }

    #[test]
    fn times_serialize_as_hh_mm_ss() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["estimated_start_time"], "08:00:00");
        assert_eq!(json["scheduled_date"], "2025-03-10");
    }

    #[test]
    fn missing_times_use_defaults() {
        let dto: ScheduledMaintenanceCreate = serde_json::from_str(
            r#"{"maintenance_plan_id":1,"equipment_id":2,"scheduled_date":"2025-03-10"}"#,
        )
        .unwrap();
        assert_eq!(dto.estimated_start_time, t(8, 0));
        assert_eq!(dto.estimated_end_time, t(10, 0));
    }

    #[test]
    fn end_before_start_is_invalid() {
        let mut m = sample();
        m.estimated_end_time = t(7, 0);
        assert!(m.validate().is_err());
    }

    #[test]
    fn overdue_only_when_open_and_past() {
        let m = sample();
        assert!(m.is_overdue(d(2025, 3, 11)));
        assert!(!m.is_overdue(d(2025, 3, 10)));
        let mut done = sample();
        done.status = MaintenanceStatus::Completed;
        assert!(!done.is_overdue(d(2025, 4, 1)));
    }

    #[test]
    fn move_keeps_duration() {
        let mut m = sample();
        m.status = MaintenanceStatus::Overdue;
        m.move_to(d(2025, 3, 12).and_time(t(13, 0)), None);
        assert_eq!(m.scheduled_date, d(2025, 3, 12));
        assert_eq!(m.estimated_end_time, t(15, 30));
        assert_eq!(m.status, MaintenanceStatus::Scheduled);
        assert_eq!(m.duration_minutes(), 150);
    }

    #[test]
    fn move_uses_explicit_end() {
        let mut m = sample();
        m.move_to(d(2025, 3, 12).and_time(t(9, 0)), Some(d(2025, 3, 12).and_time(t(9, 45))));
        assert_eq!(m.estimated_end_time, t(9, 45));
    }

    #[test]
    fn query_filters() {
        let m = sample();
        let q = ScheduledQuery {
            technician_id: Some(5),
            date_from: Some(d(2025, 3, 1)),
            date_to: Some(d(2025, 3, 31)),
            ..Default::default()
        };
        assert!(q.matches(&m));
        let q = ScheduledQuery {
            technician_id: Some(6),
            ..Default::default()
        };
        assert!(!q.matches(&m));
    }
}
