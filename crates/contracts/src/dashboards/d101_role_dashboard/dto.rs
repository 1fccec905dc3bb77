use serde::{Deserialize, Serialize};

/// Payload of `GET /dashboard`, shaped for the caller's role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub alerts: Vec<AlertItem>,
    pub tasks: Vec<TaskItem>,
    /// Absent for technicians
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_members: Option<Vec<TeamMember>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub equipments: u64,
    pub maintenances: u64,
    pub alerts: u64,
    pub interventions: u64,
    /// Percent of equipment not broken nor in maintenance
    pub availability: f64,
    /// Hours
    pub mtbf: f64,
    /// Hours
    pub mttr: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Critical,
    Warning,
    Info,
}

impl AlertLevel {
    pub fn color(&self) -> &'static str {
        match self {
            AlertLevel::Critical => "#f5222d",
            AlertLevel::Warning => "#faad14",
            AlertLevel::Info => "#1890ff",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertItem {
    pub id: String,
    #[serde(rename = "type")]
    pub level: AlertLevel,
    pub title: String,
    pub description: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskLevel {
    High,
    Medium,
    Low,
}

impl TaskLevel {
    pub fn from_code(code: &str) -> Self {
        match code {
            "high" => TaskLevel::High,
            "low" => TaskLevel::Low,
            _ => TaskLevel::Medium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskLevel::High => "Haute",
            TaskLevel::Medium => "Moyenne",
            TaskLevel::Low => "Basse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Pending,
    InProgress,
    Completed,
}

impl TaskState {
    pub fn label(&self) -> &'static str {
        match self {
            TaskState::Pending => "À faire",
            TaskState::InProgress => "En cours",
            TaskState::Completed => "Terminée",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: TaskLevel,
    pub status: TaskState,
    /// `YYYY-MM-DD`
    pub due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub equipment: String,
    /// Route opened when the task is clicked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Available,
    Busy,
    Offline,
}

impl MemberStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MemberStatus::Available => "Disponible",
            MemberStatus::Busy => "Occupé",
            MemberStatus::Offline => "Hors ligne",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            MemberStatus::Available => "#52c41a",
            MemberStatus::Busy => "#faad14",
            MemberStatus::Offline => "#bfbfbf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub status: MemberStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_task: Option<String>,
    pub completed_tasks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_uses_camel_case_keys() {
        let data = DashboardData {
            stats: DashboardStats::default(),
            alerts: vec![],
            tasks: vec![TaskItem {
                id: "intervention_1".into(),
                title: "Remplacer courroie".into(),
                description: String::new(),
                priority: TaskLevel::High,
                status: TaskState::InProgress,
                due_date: "2025-05-02".into(),
                assigned_to: None,
                equipment: "Convoyeur".into(),
                link: None,
            }],
            team_members: Some(vec![]),
        };
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("teamMembers").is_some());
        assert_eq!(json["tasks"][0]["dueDate"], "2025-05-02");
        assert_eq!(json["tasks"][0]["status"], "in_progress");
        assert!(json["tasks"][0].get("assignedTo").is_none());
    }

    #[test]
    fn technician_dashboard_omits_team() {
        let json = serde_json::to_value(DashboardData::default()).unwrap();
        assert!(json.get("teamMembers").is_none());
    }

    #[test]
    fn alert_type_key() {
        let alert = AlertItem {
            id: "a1".into(),
            level: AlertLevel::Warning,
            title: "t".into(),
            description: "d".into(),
            timestamp: "2025-05-02T08:00:00Z".into(),
            equipment: Some("Presse".into()),
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "warning");
    }
}
