use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{normalize_optional, ListQuery, DEFAULT_LIMIT};
use crate::enums::{InterventionStatus, MaintenanceType, Priority};

// ============================================================================
// Aggregate
// ============================================================================

/// Execution record of a maintenance event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceIntervention {
    pub id: i32,
    pub scheduled_maintenance_id: Option<i32>,
    pub equipment_id: i32,
    pub technician_id: i32,
    pub maintenance_type: MaintenanceType,
    pub status: InterventionStatus,
    pub priority: Priority,
    pub description: String,
    pub scheduled_date: Option<NaiveDate>,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub actual_end_time: Option<DateTime<Utc>>,
    pub downtime_start: Option<DateTime<Utc>>,
    pub downtime_end: Option<DateTime<Utc>>,
    pub work_performed: Option<String>,
    pub issues_found: Option<String>,
    pub recommendations: Option<String>,
    pub validated_by: Option<i32>,
    pub validated_at: Option<DateTime<Utc>>,
    pub validation_notes: Option<String>,
    /// Amounts in cents
    pub labor_cost: Option<i64>,
    pub parts_cost: Option<i64>,
    pub total_cost: Option<i64>,
    #[serde(default)]
    pub tasks: Vec<InterventionTask>,
    #[serde(default)]
    pub parts_used: Vec<PartUsed>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceIntervention {
    pub fn new_for_insert(dto: &InterventionCreate) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            scheduled_maintenance_id: dto.scheduled_maintenance_id,
            equipment_id: dto.equipment_id,
            technician_id: dto.technician_id,
            maintenance_type: dto.maintenance_type,
            status: InterventionStatus::Pending,
            priority: dto.priority,
            description: dto.description.trim().to_string(),
            scheduled_date: dto.scheduled_date,
            actual_start_time: None,
            actual_end_time: None,
            downtime_start: None,
            downtime_end: None,
            work_performed: None,
            issues_found: None,
            recommendations: None,
            validated_by: None,
            validated_at: None,
            validation_notes: None,
            labor_cost: None,
            parts_cost: None,
            total_cost: None,
            tasks: Vec::new(),
            parts_used: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Free edit of descriptive fields. Status only moves through the workflow actions.
    pub fn apply_update(&mut self, dto: &InterventionUpdate) {
        if let Some(description) = &dto.description {
            self.description = description.trim().to_string();
        }
        if let Some(priority) = dto.priority {
            self.priority = priority;
        }
        if dto.scheduled_date.is_some() {
            self.scheduled_date = dto.scheduled_date;
        }
        if dto.downtime_start.is_some() {
            self.downtime_start = dto.downtime_start;
        }
        if dto.downtime_end.is_some() {
            self.downtime_end = dto.downtime_end;
        }
        if let Some(v) = &dto.work_performed {
            self.work_performed = normalize_optional(Some(v.clone()));
        }
        if let Some(v) = &dto.issues_found {
            self.issues_found = normalize_optional(Some(v.clone()));
        }
        if let Some(v) = &dto.recommendations {
            self.recommendations = normalize_optional(Some(v.clone()));
        }
        if dto.labor_cost.is_some() {
            self.labor_cost = dto.labor_cost;
        }
        if dto.parts_cost.is_some() {
            self.parts_cost = dto.parts_cost;
        }
        self.recompute_total();
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("La description est obligatoire".into());
        }
        if self.equipment_id <= 0 {
            return Err("L'équipement est obligatoire".into());
        }
        if self.technician_id <= 0 {
            return Err("Le technicien est obligatoire".into());
        }
        if let (Some(start), Some(end)) = (self.downtime_start, self.downtime_end) {
            if end < start {
                return Err("La fin d'arrêt doit être postérieure au début d'arrêt".into());
            }
        }
        if self.labor_cost.map_or(false, |c| c < 0) || self.parts_cost.map_or(false, |c| c < 0) {
            return Err("Les coûts ne peuvent pas être négatifs".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn recompute_total(&mut self) {
        self.total_cost = match (self.labor_cost, self.parts_cost) {
            (None, None) => None,
            (labor, parts) => Some(labor.unwrap_or(0) + parts.unwrap_or(0)),
        };
    }

    /// Wall-clock hours between start and end of the work.
    pub fn completion_hours(&self) -> Option<f64> {
        match (self.actual_start_time, self.actual_end_time) {
            (Some(start), Some(end)) if end >= start => {
                Some((end - start).num_seconds() as f64 / 3600.0)
            }
            _ => None,
        }
    }

    /// Equipment downtime in hours; falls back to the work duration.
    pub fn downtime_hours(&self) -> Option<f64> {
        match (self.downtime_start, self.downtime_end) {
            (Some(start), Some(end)) if end >= start => {
                Some((end - start).num_seconds() as f64 / 3600.0)
            }
            _ => self.completion_hours(),
        }
    }

    pub fn completed_task_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_completed).count()
    }

    /// Share of checklist items ticked, in percent.
    pub fn progress_percent(&self) -> u8 {
        if self.tasks.is_empty() {
            return if self.status.is_done() { 100 } else { 0 };
        }
        (self.completed_task_count() * 100 / self.tasks.len()) as u8
    }
}

/// Checklist item of an intervention, usually copied from the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionTask {
    pub id: i32,
    pub intervention_id: i32,
    pub maintenance_task_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub completion_notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub order: i32,
}

impl InterventionTask {
    pub fn apply_update(&mut self, dto: &InterventionTaskUpdate, now: DateTime<Utc>) {
        if dto.is_completed && !self.is_completed {
            self.completed_at = Some(now);
        } else if !dto.is_completed {
            self.completed_at = None;
        }
        self.is_completed = dto.is_completed;
        if dto.completion_notes.is_some() {
            self.completion_notes = normalize_optional(dto.completion_notes.clone());
        }
    }
}

/// Spare part consumed by an intervention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartUsed {
    pub part_name: String,
    pub quantity: i32,
    /// Cents
    pub unit_cost: i64,
}

impl PartUsed {
    pub fn total(&self) -> i64 {
        self.quantity as i64 * self.unit_cost
    }
}

pub fn parts_total(parts: &[PartUsed]) -> i64 {
    parts.iter().map(PartUsed::total).sum()
}

/// Formats cents as euros: `1234` → `12,34 €`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{}{},{:02} €", sign, abs / 100, abs % 100)
}

/// Intervention with display names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterventionDetails {
    #[serde(flatten)]
    pub intervention: MaintenanceIntervention,
    pub equipment_name: Option<String>,
    pub technician_name: Option<String>,
    pub validator_name: Option<String>,
}

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InterventionCreate {
    pub scheduled_maintenance_id: Option<i32>,
    pub equipment_id: i32,
    pub technician_id: i32,
    #[serde(default)]
    pub maintenance_type: MaintenanceType,
    #[serde(default)]
    pub priority: Priority,
    pub description: String,
    pub scheduled_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InterventionUpdate {
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub scheduled_date: Option<NaiveDate>,
    pub downtime_start: Option<DateTime<Utc>>,
    pub downtime_end: Option<DateTime<Utc>>,
    pub work_performed: Option<String>,
    pub issues_found: Option<String>,
    pub recommendations: Option<String>,
    pub labor_cost: Option<i64>,
    pub parts_cost: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CompleteInterventionRequest {
    pub work_performed: String,
    pub issues_found: Option<String>,
    pub recommendations: Option<String>,
    pub labor_cost: Option<i64>,
    #[serde(default)]
    pub parts_used: Vec<PartUsed>,
}

impl CompleteInterventionRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.work_performed.trim().is_empty() {
            return Err("Veuillez décrire le travail effectué".into());
        }
        if self.labor_cost.map_or(false, |c| c < 0) {
            return Err("Les coûts ne peuvent pas être négatifs".into());
        }
        for part in &self.parts_used {
            if part.part_name.trim().is_empty() {
                return Err("Le nom de la pièce est obligatoire".into());
            }
            if part.quantity < 1 || part.unit_cost < 0 {
                return Err(format!("Quantité ou prix invalide pour « {} »", part.part_name));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ValidateInterventionRequest {
    pub validation_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RejectInterventionRequest {
    pub validation_notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InterventionTaskUpdate {
    pub is_completed: bool,
    pub completion_notes: Option<String>,
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InterventionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_type: Option<MaintenanceType>,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for InterventionQuery {
    fn default() -> Self {
        Self {
            equipment_id: None,
            technician_id: None,
            status: None,
            maintenance_type: None,
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl InterventionQuery {
    pub fn page(&self) -> ListQuery {
        ListQuery::new(self.skip, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> MaintenanceIntervention {
        MaintenanceIntervention::new_for_insert(&InterventionCreate {
            equipment_id: 1,
            technician_id: 2,
            description: "Remplacement roulement".into(),
            ..Default::default()
        })
    }

    #[test]
    fn starts_pending() {
        assert_eq!(sample().status, InterventionStatus::Pending);
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn total_cost_is_sum() {
        let mut i = sample();
        i.apply_update(&InterventionUpdate {
            labor_cost: Some(12_000),
            parts_cost: Some(4_550),
            ..Default::default()
        });
        assert_eq!(i.total_cost, Some(16_550));
        let mut j = sample();
        j.recompute_total();
        assert_eq!(j.total_cost, None);
    }

    #[test]
    fn parts_and_money() {
        let parts = vec![
            PartUsed {
                part_name: "Roulement 6205".into(),
                quantity: 2,
                unit_cost: 1_250,
            },
            PartUsed {
                part_name: "Graisse".into(),
                quantity: 1,
                unit_cost: 990,
            },
        ];
        assert_eq!(parts_total(&parts), 3_490);
        assert_eq!(format_cents(3_490), "34,90 €");
        assert_eq!(format_cents(-5), "-0,05 €");
    }

    #[test]
    fn durations() {
        let mut i = sample();
        i.actual_start_time = Some(Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap());
        i.actual_end_time = Some(Utc.with_ymd_and_hms(2025, 1, 1, 11, 30, 0).unwrap());
        assert_eq!(i.completion_hours(), Some(3.5));
        assert_eq!(i.downtime_hours(), Some(3.5));
        i.downtime_start = Some(Utc.with_ymd_and_hms(2025, 1, 1, 7, 0, 0).unwrap());
        i.downtime_end = Some(Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap());
        assert_eq!(i.downtime_hours(), Some(5.0));
    }

    #[test]
    fn completion_request_requires_work_description() {
        let req = CompleteInterventionRequest::default();
        assert!(req.validate().is_err());
        let req = CompleteInterventionRequest {
            work_performed: "Roulement changé".into(),
            parts_used: vec![PartUsed {
                part_name: "Joint".into(),
                quantity: 0,
                unit_cost: 100,
            }],
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn task_completion_stamps_time() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let mut task = InterventionTask {
            id: 1,
            intervention_id: 1,
            maintenance_task_id: None,
            name: "Contrôle".into(),
            description: None,
            is_completed: false,
            completion_notes: None,
            completed_at: None,
            order: 1,
        };
        task.apply_update(
            &InterventionTaskUpdate {
                is_completed: true,
                completion_notes: Some("RAS".into()),
            },
            now,
        );
        assert_eq!(task.completed_at, Some(now));
        task.apply_update(&InterventionTaskUpdate::default(), now);
        assert_eq!(task.completed_at, None);
        assert_eq!(task.completion_notes.as_deref(), Some("RAS"));
    }

    #[test]
    fn progress() {
        let mut i = sample();
        assert_eq!(i.progress_percent(), 0);
        i.status = InterventionStatus::Completed;
        assert_eq!(i.progress_percent(), 100);
    }
}
