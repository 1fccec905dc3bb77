//! Role-aware routing rules of the web client.
//!
//! Kept free of any UI dependency so both the SPA and the tests can use them.

use crate::enums::UserRole;

pub const LOGIN_PATH: &str = "/login";

/// Landing page of a role.
pub fn dashboard_path(role: UserRole) -> String {
    format!("/dashboard/{}", role.as_str())
}

/// Same as [`dashboard_path`] for a raw role code; unknown codes land on the login page.
pub fn dashboard_path_for_code(role: Option<&str>) -> String {
    match role.and_then(|r| r.parse::<UserRole>().ok()) {
        Some(role) => dashboard_path(role),
        None => LOGIN_PATH.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    fn leaf(key: &'static str, label: &'static str, icon: &'static str) -> Self {
        Self {
            key,
            label,
            icon,
            children: Vec::new(),
        }
    }

    fn group(key: &'static str, label: &'static str, icon: &'static str, children: Vec<MenuItem>) -> Self {
        Self {
            key,
            label,
            icon,
            children,
        }
    }
}

pub const KEY_DASHBOARD: &str = "dashboard";
pub const KEY_EQUIPMENT_LIST: &str = "equipment-list";
pub const KEY_EQUIPMENT_ADD: &str = "equipment-add";
pub const KEY_MAINTENANCE_CALENDAR: &str = "maintenance-calendar";
pub const KEY_MAINTENANCE_PLANNING: &str = "maintenance-planning";
pub const KEY_MAINTENANCE_INTERVENTIONS: &str = "maintenance-interventions";

/// Sidebar entries visible to a role.
pub fn menu_for(role: UserRole) -> Vec<MenuItem> {
    let dashboard = MenuItem::leaf(KEY_DASHBOARD, "Tableau de bord", "dashboard");

    let mut equipment = vec![MenuItem::leaf(KEY_EQUIPMENT_LIST, "Liste des équipements", "list")];
    let mut maintenance = vec![MenuItem::leaf(KEY_MAINTENANCE_CALENDAR, "Calendrier", "calendar")];

    if role.is_manager() {
        equipment.push(MenuItem::leaf(KEY_EQUIPMENT_ADD, "Ajouter un équipement", "plus"));
        maintenance.push(MenuItem::leaf(KEY_MAINTENANCE_PLANNING, "Planification", "schedule"));
    }
    maintenance.push(MenuItem::leaf(
        KEY_MAINTENANCE_INTERVENTIONS,
        if role.is_manager() { "Interventions" } else { "Mes interventions" },
        "tool",
    ));

    vec![
        dashboard,
        MenuItem::group("equipment", "Équipements", "equipment", equipment),
        MenuItem::group("maintenance", "Maintenance", "wrench", maintenance),
    ]
}

/// Route behind a sidebar key. Group keys and unknown keys have no route.
pub fn route_for_key(key: &str, role: UserRole) -> Option<String> {
    let path = match key {
        KEY_DASHBOARD => return Some(dashboard_path(role)),
        KEY_EQUIPMENT_LIST => "/equipments",
        KEY_EQUIPMENT_ADD => "/equipments/new",
        KEY_MAINTENANCE_CALENDAR => "/maintenance/calendar",
        KEY_MAINTENANCE_PLANNING => "/maintenance/planning",
        KEY_MAINTENANCE_INTERVENTIONS => "/maintenance/interventions",
        _ => return None,
    };
    Some(path.to_string())
}

/// Sidebar key to highlight for the current location.
pub fn selected_key(path: &str) -> &'static str {
    if path == "/equipments/new" {
        KEY_EQUIPMENT_ADD
    } else if path.starts_with("/equipments") {
        KEY_EQUIPMENT_LIST
    } else if path.starts_with("/maintenance/calendar") {
        KEY_MAINTENANCE_CALENDAR
    } else if path.starts_with("/maintenance/planning") {
        KEY_MAINTENANCE_PLANNING
    } else if path.starts_with("/maintenance/interventions") {
        KEY_MAINTENANCE_INTERVENTIONS
    } else if path.starts_with("/maintenance") {
        KEY_MAINTENANCE_CALENDAR
    } else {
        KEY_DASHBOARD
    }
}

/// Group that must be expanded so that `key` is visible.
pub fn open_group_for(key: &str) -> Option<&'static str> {
    match key {
        KEY_EQUIPMENT_LIST | KEY_EQUIPMENT_ADD => Some("equipment"),
        KEY_MAINTENANCE_CALENDAR | KEY_MAINTENANCE_PLANNING | KEY_MAINTENANCE_INTERVENTIONS => {
            Some("maintenance")
        }
        _ => None,
    }
}

/// Whether `role` may open a page restricted to `required`. An empty list means any signed-in user.
pub fn is_role_allowed(role: UserRole, required: &[UserRole]) -> bool {
    required.is_empty() || required.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(items: &[MenuItem]) -> Vec<&'static str> {
        items
            .iter()
            .flat_map(|i| std::iter::once(i.key).chain(i.children.iter().map(|c| c.key)))
            .collect()
    }

    #[test]
    fn dashboards_per_role() {
        assert_eq!(dashboard_path(UserRole::Admin), "/dashboard/admin");
        assert_eq!(dashboard_path_for_code(Some("technician")), "/dashboard/technician");
        assert_eq!(dashboard_path_for_code(Some("guest")), "/login");
        assert_eq!(dashboard_path_for_code(None), "/login");
    }

    #[test]
    fn technician_menu_hides_management_entries() {
        let k = keys(&menu_for(UserRole::Technician));
        assert!(k.contains(&KEY_EQUIPMENT_LIST));
        assert!(k.contains(&KEY_MAINTENANCE_INTERVENTIONS));
        assert!(!k.contains(&KEY_EQUIPMENT_ADD));
        assert!(!k.contains(&KEY_MAINTENANCE_PLANNING));
    }

    #[test]
    fn supervisor_menu_has_planning() {
        let k = keys(&menu_for(UserRole::Supervisor));
        assert!(k.contains(&KEY_MAINTENANCE_PLANNING));
        assert!(k.contains(&KEY_EQUIPMENT_ADD));
    }

    #[test]
    fn route_map() {
        assert_eq!(
            route_for_key(KEY_DASHBOARD, UserRole::Supervisor).as_deref(),
            Some("/dashboard/supervisor")
        );
        assert_eq!(route_for_key(KEY_EQUIPMENT_ADD, UserRole::Admin).as_deref(), Some("/equipments/new"));
        assert_eq!(route_for_key("equipment", UserRole::Admin), None);
    }

    #[test]
    fn selected_key_follows_path() {
        assert_eq!(selected_key("/equipments/new"), KEY_EQUIPMENT_ADD);
        assert_eq!(selected_key("/equipments/12/edit"), KEY_EQUIPMENT_LIST);
        assert_eq!(selected_key("/maintenance/planning"), KEY_MAINTENANCE_PLANNING);
        assert_eq!(selected_key("/maintenance/interventions/4"), KEY_MAINTENANCE_INTERVENTIONS);
        assert_eq!(selected_key("/maintenance"), KEY_MAINTENANCE_CALENDAR);
        assert_eq!(selected_key("/dashboard/admin"), KEY_DASHBOARD);
    }

    #[test]
    fn open_group() {
        assert_eq!(open_group_for(KEY_EQUIPMENT_ADD), Some("equipment"));
        assert_eq!(open_group_for(KEY_DASHBOARD), None);
    }

    #[test]
    fn role_gate() {
        assert!(is_role_allowed(UserRole::Technician, &[]));
        assert!(is_role_allowed(UserRole::Admin, &[UserRole::Admin, UserRole::Supervisor]));
        assert!(!is_role_allowed(UserRole::Technician, &[UserRole::Admin, UserRole::Supervisor]));
    }
}
