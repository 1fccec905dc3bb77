use chrono::{NaiveDate, Utc};
use contracts::dashboards::d101_role_dashboard::dto::{
    AlertItem, AlertLevel, DashboardData, DashboardStats, MemberStatus, TaskItem, TaskLevel,
    TaskState, TeamMember,
};
use contracts::domain::a003_equipment::aggregate::{Equipment, EquipmentStats};
use contracts::domain::a005_scheduled_maintenance::aggregate::{
    ScheduledMaintenanceDetails, ScheduledQuery,
};
use contracts::domain::a006_intervention::aggregate::{InterventionDetails, InterventionQuery};
use contracts::domain::common::MAX_LIMIT;
use contracts::enums::{EquipmentStatus, InterventionStatus, UserRole};
use contracts::system::auth::UserInfo;
use contracts::system::users::UserListQuery;

use crate::dashboards::d100_maintenance_stats::service::{mtbf, mttr};
use crate::domain::{a003_equipment, a005_scheduled_maintenance, a006_intervention};
use crate::shared::error::ApiResult;
use crate::system::users::repository as user_repository;

/// Tasks shown on a dashboard
const MAX_TASKS: usize = 10;
const MAX_ALERTS: usize = 10;

fn task_state(status: InterventionStatus) -> TaskState {
    match status {
        InterventionStatus::Pending | InterventionStatus::Assigned => TaskState::Pending,
        InterventionStatus::InProgress => TaskState::InProgress,
        _ => TaskState::Completed,
    }
}

/// Broken equipment, overdue maintenances and, for managers, work awaiting review.
pub fn build_alerts(
    equipment: &[Equipment],
    overdue: &[ScheduledMaintenanceDetails],
    interventions: &[InterventionDetails],
    role: UserRole,
) -> Vec<AlertItem> {
    let mut alerts: Vec<AlertItem> = equipment
        .iter()
        .filter(|e| e.status == EquipmentStatus::Broken)
        .map(|e| AlertItem {
            id: format!("equipment_{}", e.id),
            level: AlertLevel::Critical,
            title: "Équipement en panne".to_string(),
            description: format!("{} est hors service", e.name),
            timestamp: e.updated_at.to_rfc3339(),
            equipment: Some(e.name.clone()),
        })
        .collect();

    alerts.extend(overdue.iter().map(|m| AlertItem {
        id: format!("scheduled_{}", m.maintenance.id),
        level: AlertLevel::Warning,
        title: "Maintenance en retard".to_string(),
        description: format!(
            "{} prévue le {}",
            m.plan_name.as_deref().unwrap_or("Maintenance"),
            m.maintenance.scheduled_date.format("%d/%m/%Y")
        ),
        timestamp: m.maintenance.updated_at.to_rfc3339(),
        equipment: m.equipment_name.clone(),
    }));

    if role.is_manager() {
        alerts.extend(
            interventions
                .iter()
                .filter(|d| d.intervention.status == InterventionStatus::Completed)
                .map(|d| AlertItem {
                    id: format!("intervention_{}", d.intervention.id),
                    level: AlertLevel::Info,
                    title: "Intervention à valider".to_string(),
                    description: d.intervention.description.clone(),
                    timestamp: d.intervention.updated_at.to_rfc3339(),
                    equipment: d.equipment_name.clone(),
                }),
        );
    }

    alerts.truncate(MAX_ALERTS);
    alerts
}

/// Open interventions and scheduled maintenances, earliest first.
pub fn build_tasks(
    scheduled: &[ScheduledMaintenanceDetails],
    interventions: &[InterventionDetails],
    today: NaiveDate,
) -> Vec<TaskItem> {
    let mut tasks: Vec<TaskItem> = interventions
        .iter()
        .filter(|d| !d.intervention.status.is_final())
        .map(|d| {
            let i = &d.intervention;
            TaskItem {
                id: format!("intervention_{}", i.id),
                title: format!("Intervention {}", i.maintenance_type.label().to_lowercase()),
                description: i.description.clone(),
                priority: TaskLevel::from_code(i.priority.task_level()),
                status: task_state(i.status),
                due_date: i
                    .scheduled_date
                    .unwrap_or_else(|| i.created_at.date_naive())
                    .to_string(),
                assigned_to: d.technician_name.clone(),
                equipment: d.equipment_name.clone().unwrap_or_default(),
                link: Some(format!("/maintenance/interventions/{}", i.id)),
            }
        })
        .collect();

    tasks.extend(
        scheduled
            .iter()
            .filter(|d| d.maintenance.status.is_open())
            .map(|d| {
                let m = &d.maintenance;
                TaskItem {
                    id: format!("scheduled_{}", m.id),
                    title: d
                        .plan_name
                        .clone()
                        .unwrap_or_else(|| "Maintenance planifiée".to_string()),
                    description: if m.is_overdue(today) {
                        "En retard".to_string()
                    } else {
                        m.notes.clone().unwrap_or_default()
                    },
                    priority: TaskLevel::from_code(m.priority.task_level()),
                    status: TaskState::Pending,
                    due_date: m.scheduled_date.to_string(),
                    assigned_to: d.technician_name.clone(),
                    equipment: d.equipment_name.clone().unwrap_or_default(),
                    link: Some("/maintenance/calendar".to_string()),
                }
            }),
    );

    tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.id.cmp(&b.id)));
    tasks.truncate(MAX_TASKS);
    tasks
}

/// Technicians with their current load.
pub fn build_team(users: &[UserInfo], interventions: &[InterventionDetails]) -> Vec<TeamMember> {
    users
        .iter()
        .filter(|u| u.role == UserRole::Technician)
        .map(|u| {
            let own = interventions
                .iter()
                .map(|d| &d.intervention)
                .filter(|i| i.technician_id == u.id);
            let current = own
                .clone()
                .find(|i| i.status == InterventionStatus::InProgress);
            let completed = own.filter(|i| i.status.is_done()).count() as u64;

            let status = if !u.is_active {
                MemberStatus::Offline
            } else if current.is_some() {
                MemberStatus::Busy
            } else {
                MemberStatus::Available
            };

            TeamMember {
                id: u.id.to_string(),
                name: u.full_name(),
                role: u.role.label().to_string(),
                status,
                current_task: current.map(|i| i.description.clone()),
                completed_tasks: completed,
            }
        })
        .collect()
}

/// Dashboard for `user`: technicians only see their own work.
pub async fn get_dashboard(user: &UserInfo) -> ApiResult<DashboardData> {
    let today = Utc::now().date_naive();
    let own = (user.role == UserRole::Technician).then_some(user.id);

    let equipment = a003_equipment::repository::list_all().await?;
    let scheduled = a005_scheduled_maintenance::service::list(&ScheduledQuery {
        technician_id: own,
        ..Default::default()
    })
    .await?;
    let overdue = a005_scheduled_maintenance::service::overdue(own).await?;
    let interventions = a006_intervention::service::list(&InterventionQuery {
        technician_id: own,
        limit: MAX_LIMIT,
        ..Default::default()
    })
    .await?;

    let alerts = build_alerts(&equipment, &overdue, &interventions, user.role);
    let tasks = build_tasks(&scheduled, &interventions, today);

    let plain: Vec<_> = interventions.iter().map(|d| d.intervention.clone()).collect();
    let fleet = EquipmentStats::from_pairs(equipment.iter().map(|e| (e.status, e.criticality)));
    let stats = DashboardStats {
        equipments: fleet.total,
        maintenances: scheduled
            .iter()
            .filter(|d| d.maintenance.status.is_open())
            .count() as u64,
        alerts: alerts.len() as u64,
        interventions: plain.iter().filter(|i| !i.status.is_done()).count() as u64,
        availability: fleet.availability(),
        mtbf: mtbf(&plain),
        mttr: mttr(&plain),
    };

    let team_members = if user.role.is_manager() {
        let users = user_repository::list(&UserListQuery::default()).await?;
        Some(build_team(&users, &interventions))
    } else {
        None
    };

    Ok(DashboardData {
        stats,
        alerts,
        tasks,
        team_members,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone};
    use contracts::domain::a003_equipment::aggregate::EquipmentCreate;
    use contracts::domain::a005_scheduled_maintenance::aggregate::{
        ScheduledMaintenance, ScheduledMaintenanceCreate,
    };
    use contracts::domain::a006_intervention::aggregate::{
        InterventionCreate, MaintenanceIntervention,
    };
    use contracts::enums::{MaintenanceStatus, Priority};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn intervention(id: i32, technician: i32, status: InterventionStatus) -> InterventionDetails {
        let mut i = MaintenanceIntervention::new_for_insert(&InterventionCreate {
            equipment_id: 1,
            technician_id: technician,
            priority: Priority::Critical,
            description: format!("Travail {}", id),
            scheduled_date: Some(NaiveDate::from_ymd_opt(2025, 6, id as u32).unwrap()),
            ..Default::default()
        });
        i.id = id;
        i.status = status;
        InterventionDetails {
            intervention: i,
            equipment_name: Some("Compresseur C1".into()),
            technician_name: Some("Luc Petit".into()),
            validator_name: None,
        }
    }

    fn scheduled(id: i32, day: u32) -> ScheduledMaintenanceDetails {
        let mut m = ScheduledMaintenance::new_for_insert(&ScheduledMaintenanceCreate {
            maintenance_plan_id: 1,
            equipment_id: 1,
            scheduled_date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            estimated_start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            estimated_end_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            assigned_technician_id: Some(3),
            status: MaintenanceStatus::Scheduled,
            priority: Priority::Low,
            notes: None,
        });
        m.id = id;
        ScheduledMaintenanceDetails {
            maintenance: m,
            plan_name: Some("Graissage mensuel".into()),
            equipment_name: Some("Compresseur C1".into()),
            technician_name: None,
        }
    }

    fn user(id: i32, role: UserRole, active: bool) -> UserInfo {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        UserInfo {
            id,
            username: format!("u{}", id),
            email: format!("u{}@usine.fr", id),
            first_name: "Prénom".into(),
            last_name: format!("N{}", id),
            role,
            is_active: active,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn tasks_are_sorted_and_mapped() {
        let tasks = build_tasks(
            &[scheduled(9, 5)],
            &[
                intervention(7, 3, InterventionStatus::InProgress),
                intervention(2, 3, InterventionStatus::Validated),
            ],
            today(),
        );
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, "scheduled_9");
        assert_eq!(tasks[0].description, "En retard");
        assert_eq!(tasks[0].priority, TaskLevel::Low);
        assert_eq!(tasks[1].status, TaskState::InProgress);
        assert_eq!(tasks[1].priority, TaskLevel::High);
        assert_eq!(tasks[1].link.as_deref(), Some("/maintenance/interventions/7"));
    }

    #[test]
    fn technicians_do_not_get_review_alerts() {
        let mut broken = Equipment::new_for_insert(EquipmentCreate {
            name: "Tour T3".into(),
            site_id: Some(1),
            ..Default::default()
        });
        broken.status = EquipmentStatus::Broken;
        let done = [intervention(4, 3, InterventionStatus::Completed)];

        let manager = build_alerts(&[broken.clone()], &[scheduled(1, 2)], &done, UserRole::Supervisor);
        assert_eq!(manager.len(), 3);
        assert_eq!(manager[0].level, AlertLevel::Critical);
        assert_eq!(manager[1].level, AlertLevel::Warning);

        let technician = build_alerts(&[broken], &[], &done, UserRole::Technician);
        assert_eq!(technician.len(), 1);
    }

    #[test]
    fn team_status() {
        let users = [
            user(3, UserRole::Technician, true),
            user(4, UserRole::Technician, true),
            user(5, UserRole::Technician, false),
            user(1, UserRole::Admin, true),
        ];
        let work = [
            intervention(1, 3, InterventionStatus::InProgress),
            intervention(2, 4, InterventionStatus::Validated),
        ];
        let team = build_team(&users, &work);
        assert_eq!(team.len(), 3);
        assert_eq!(team[0].status, MemberStatus::Busy);
        assert_eq!(team[0].current_task.as_deref(), Some("Travail 1"));
        assert_eq!(team[1].status, MemberStatus::Available);
        assert_eq!(team[1].completed_tasks, 1);
        assert_eq!(team[2].status, MemberStatus::Offline);
    }
}
