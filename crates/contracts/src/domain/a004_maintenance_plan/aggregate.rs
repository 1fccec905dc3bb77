use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{normalize_optional, validate_name};
use crate::enums::{MaintenanceType, Priority};

// ============================================================================
// Aggregate
// ============================================================================

/// Recurring maintenance template for one equipment item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenancePlan {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub equipment_id: i32,
    pub maintenance_type: MaintenanceType,
    pub frequency_days: i32,
    /// Minutes
    pub estimated_duration: i32,
    pub priority: Priority,
    pub is_active: bool,
    pub next_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tasks: Vec<MaintenanceTask>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaintenancePlan {
    /// New plan; first occurrence is due one period after `today`.
    pub fn new_for_insert(dto: &MaintenancePlanCreate, today: NaiveDate) -> Self {
        let now = Utc::now();
        let mut plan = Self {
            id: 0,
            name: dto.name.trim().to_string(),
            description: normalize_optional(dto.description.clone()),
            equipment_id: dto.equipment_id,
            maintenance_type: dto.maintenance_type,
            frequency_days: dto.frequency_days,
            estimated_duration: dto.estimated_duration,
            priority: dto.priority,
            is_active: dto.is_active,
            next_due_date: dto.next_due_date,
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        if plan.next_due_date.is_none() {
            plan.next_due_date = Some(plan.next_due_after(today));
        }
        plan
    }

    pub fn apply_update(&mut self, dto: &MaintenancePlanUpdate) {
        if let Some(name) = &dto.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = &dto.description {
            self.description = normalize_optional(Some(description.clone()));
        }
        if let Some(t) = dto.maintenance_type {
            self.maintenance_type = t;
        }
        if let Some(f) = dto.frequency_days {
            self.frequency_days = f;
        }
        if let Some(d) = dto.estimated_duration {
            self.estimated_duration = d;
        }
        if let Some(p) = dto.priority {
            self.priority = p;
        }
        if let Some(active) = dto.is_active {
            self.is_active = active;
        }
        if dto.next_due_date.is_some() {
            self.next_due_date = dto.next_due_date;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name, "nom du plan", 200)?;
        if self.equipment_id <= 0 {
            return Err("L'équipement est obligatoire".into());
        }
        if self.frequency_days < 1 {
            return Err("La fréquence doit être d'au moins 1 jour".into());
        }
        if self.estimated_duration < 1 {
            return Err("La durée estimée doit être d'au moins 1 minute".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Date of the occurrence to generate next; overdue plans start from `today`.
    pub fn occurrence_date(&self, today: NaiveDate) -> NaiveDate {
        self.next_due_date.unwrap_or(today)
    }

    /// Moves `next_due_date` one period past the generated occurrence.
    pub fn advance_due_date(&mut self, generated: NaiveDate) {
        self.next_due_date = Some(self.next_due_after(generated));
    }

    pub fn next_due_after(&self, date: NaiveDate) -> NaiveDate {
        date + Duration::days(self.frequency_days.max(1) as i64)
    }

    /// Sum of task durations, falling back to the plan estimate when there is no checklist.
    pub fn total_task_duration(&self) -> i32 {
        if self.tasks.is_empty() {
            self.estimated_duration
        } else {
            self.tasks.iter().map(|t| t.estimated_duration).sum()
        }
    }

    pub fn sorted_tasks(&self) -> Vec<MaintenanceTask> {
        let mut tasks = self.tasks.clone();
        tasks.sort_by_key(|t| (t.order, t.id));
        tasks
    }
}

/// Checklist item of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceTask {
    pub id: i32,
    pub maintenance_plan_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub estimated_duration: i32,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub tools_required: Vec<String>,
    #[serde(default)]
    pub safety_requirements: Vec<String>,
    pub order: i32,
    pub is_mandatory: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceTask {
    pub fn new_for_insert(plan_id: i32, dto: &MaintenanceTaskDto) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            maintenance_plan_id: plan_id,
            name: dto.name.trim().to_string(),
            description: normalize_optional(dto.description.clone()),
            estimated_duration: dto.estimated_duration,
            required_skills: clean_list(&dto.required_skills),
            tools_required: clean_list(&dto.tools_required),
            safety_requirements: clean_list(&dto.safety_requirements),
            order: dto.order,
            is_mandatory: dto.is_mandatory,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, dto: &MaintenanceTaskDto) {
        self.name = dto.name.trim().to_string();
        self.description = normalize_optional(dto.description.clone());
        self.estimated_duration = dto.estimated_duration;
        self.required_skills = clean_list(&dto.required_skills);
        self.tools_required = clean_list(&dto.tools_required);
        self.safety_requirements = clean_list(&dto.safety_requirements);
        self.order = dto.order;
        self.is_mandatory = dto.is_mandatory;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name, "nom de la tâche", 200)?;
        if self.estimated_duration < 1 {
            return Err("La durée estimée doit être d'au moins 1 minute".into());
        }
        Ok(())
    }
}

fn clean_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Splits a comma separated form field into list items.
pub fn parse_list_field(text: &str) -> Vec<String> {
    clean_list(&text.split(',').map(str::to_string).collect::<Vec<_>>())
}

/// New `order` values after moving tasks into the given id sequence (1-based).
/// Ids absent from `task_ids` keep their relative order after the listed ones.
pub fn reorder(tasks: &[MaintenanceTask], task_ids: &[i32]) -> Vec<(i32, i32)> {
    let mut ordered: Vec<i32> = Vec::new();
    for id in task_ids {
        if tasks.iter().any(|t| t.id == *id) && !ordered.contains(id) {
            ordered.push(*id);
        }
    }
    let mut rest: Vec<&MaintenanceTask> = tasks.iter().filter(|t| !ordered.contains(&t.id)).collect();
    rest.sort_by_key(|t| (t.order, t.id));
    ordered.extend(rest.into_iter().map(|t| t.id));
    ordered
        .into_iter()
        .enumerate()
        .map(|(idx, id)| (id, idx as i32 + 1))
        .collect()
}

// ============================================================================
// DTOs
// ============================================================================

fn default_true() -> bool {
    true
}

fn default_order() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceTaskDto {
    pub name: String,
    pub description: Option<String>,
    pub estimated_duration: i32,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub tools_required: Vec<String>,
    #[serde(default)]
    pub safety_requirements: Vec<String>,
    #[serde(default = "default_order")]
    pub order: i32,
    #[serde(default = "default_true")]
    pub is_mandatory: bool,
}

impl Default for MaintenanceTaskDto {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            estimated_duration: 30,
            required_skills: Vec::new(),
            tools_required: Vec::new(),
            safety_requirements: Vec::new(),
            order: 1,
            is_mandatory: true,
        }
    }
}

impl From<&MaintenanceTask> for MaintenanceTaskDto {
    fn from(t: &MaintenanceTask) -> Self {
        Self {
            name: t.name.clone(),
            description: t.description.clone(),
            estimated_duration: t.estimated_duration,
            required_skills: t.required_skills.clone(),
            tools_required: t.tools_required.clone(),
            safety_requirements: t.safety_requirements.clone(),
            order: t.order,
            is_mandatory: t.is_mandatory,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenancePlanCreate {
    pub name: String,
    pub description: Option<String>,
    pub equipment_id: i32,
    #[serde(default)]
    pub maintenance_type: MaintenanceType,
    pub frequency_days: i32,
    pub estimated_duration: i32,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub next_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tasks: Vec<MaintenanceTaskDto>,
}

impl Default for MaintenancePlanCreate {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            equipment_id: 0,
            maintenance_type: MaintenanceType::Preventive,
            frequency_days: 30,
            estimated_duration: 60,
            priority: Priority::Medium,
            is_active: true,
            next_due_date: None,
            tasks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MaintenancePlanUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub maintenance_type: Option<MaintenanceType>,
    pub frequency_days: Option<i32>,
    pub estimated_duration: Option<i32>,
    pub priority: Option<Priority>,
    pub is_active: Option<bool>,
    pub next_due_date: Option<NaiveDate>,
}

impl From<&MaintenancePlanCreate> for MaintenancePlanUpdate {
    fn from(c: &MaintenancePlanCreate) -> Self {
        Self {
            name: Some(c.name.clone()),
            description: Some(c.description.clone().unwrap_or_default()),
            maintenance_type: Some(c.maintenance_type),
            frequency_days: Some(c.frequency_days),
            estimated_duration: Some(c.estimated_duration),
            priority: Some(c.priority),
            is_active: Some(c.is_active),
            next_due_date: c.next_due_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlanQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TaskReorderRequest {
    pub task_ids: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    fn create() -> MaintenancePlanCreate {
        MaintenancePlanCreate {
            name: "Vidange compresseur".into(),
            equipment_id: 3,
            frequency_days: 90,
            ..Default::default()
        }
    }

    fn task(id: i32, order: i32) -> MaintenanceTask {
        let mut t = MaintenanceTask::new_for_insert(
            1,
            &MaintenanceTaskDto {
                name: format!("T{}", id),
                order,
                ..Default::default()
            },
        );
        t.id = id;
        t
    }

    #[test]
    fn first_due_date_is_one_period_ahead() {
        let plan = MaintenancePlan::new_for_insert(&create(), today());
        assert_eq!(plan.next_due_date, NaiveDate::from_ymd_opt(2025, 4, 10));
    }

    #[test]
    fn explicit_due_date_is_kept() {
        let mut dto = create();
        dto.next_due_date = NaiveDate::from_ymd_opt(2025, 2, 1);
        let plan = MaintenancePlan::new_for_insert(&dto, today());
        assert_eq!(plan.next_due_date, NaiveDate::from_ymd_opt(2025, 2, 1));
    }

    #[test]
    fn zero_frequency_fails_validation() {
        let mut dto = create();
        dto.frequency_days = 0;
        let plan = MaintenancePlan::new_for_insert(&dto, today());
        assert!(plan.validate().is_err());
    }

    #[test]
    fn task_lists_are_cleaned() {
        let t = MaintenanceTask::new_for_insert(
            1,
            &MaintenanceTaskDto {
                name: "Contrôle".into(),
                tools_required: vec![" clé 13 ".into(), "".into()],
                ..Default::default()
            },
        );
        assert_eq!(t.tools_required, vec!["clé 13".to_string()]);
        assert_eq!(parse_list_field("gants, lunettes ,,"), vec!["gants", "lunettes"]);
    }

    #[test]
    fn generation_advances_due_date() {
        let mut plan = MaintenancePlan::new_for_insert(&create(), today());
        let due = plan.occurrence_date(today());
        assert_eq!(due, plan.next_due_date.unwrap());
        plan.advance_due_date(due);
        assert_eq!(plan.next_due_date, Some(due + chrono::Duration::days(plan.frequency_days as i64)));
    }

    #[test]
    fn reorder_puts_listed_tasks_first() {
        let tasks = vec![task(10, 1), task(11, 2), task(12, 3)];
        assert_eq!(reorder(&tasks, &[12, 10]), vec![(12, 1), (10, 2), (11, 3)]);
        assert_eq!(reorder(&tasks, &[99]), vec![(10, 1), (11, 2), (12, 3)]);
    }

    #[test]
    fn duration_falls_back_to_plan_estimate() {
        let mut plan = MaintenancePlan::new_for_insert(&create(), today());
        assert_eq!(plan.total_task_duration(), 60);
        plan.tasks = vec![task(1, 1), task(2, 2)];
        assert_eq!(plan.total_task_duration(), 60);
        plan.tasks[0].estimated_duration = 45;
        assert_eq!(plan.total_task_duration(), 75);
    }
}
