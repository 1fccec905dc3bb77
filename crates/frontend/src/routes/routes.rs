use contracts::enums::UserRole;
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::dashboards::d100_maintenance_stats::ui::CalendarPage;
use crate::dashboards::d101_role_dashboard::ui::{
    AdminDashboardPage, SupervisorDashboardPage, TechnicianDashboardPage,
};
use crate::domain::a003_equipment::ui::details::EquipmentDetailsPage;
use crate::domain::a003_equipment::ui::form::{EquipmentCreatePage, EquipmentEditPage};
use crate::domain::a003_equipment::ui::list::EquipmentListPage;
use crate::domain::a004_maintenance_plan::ui::page::MaintenancePlanningPage;
use crate::domain::a006_intervention::ui::details::InterventionDetailsPage;
use crate::domain::a006_intervention::ui::list::InterventionListPage;
use crate::layout::DashboardLayout;
use crate::system::auth::guard::{ProtectedRoute, PublicRoute, RoleRedirect};
use crate::system::pages::login::LoginPage;
use crate::system::pages::register::RegisterPage;

fn managers() -> Vec<UserRole> {
    vec![UserRole::Admin, UserRole::Supervisor]
}

/// Signed-in page inside the dashboard shell; an empty role list admits every user
fn shell<P, V>(page: P, roles: Vec<UserRole>) -> impl Fn() -> AnyView + Clone + Send + Sync + 'static
where
    P: Fn() -> V + Copy + Send + Sync + 'static,
    V: IntoView + 'static,
{
    move || {
        view! {
            <ProtectedRoute required_roles=roles.clone()>
                <DashboardLayout>{page()}</DashboardLayout>
            </ProtectedRoute>
        }
        .into_any()
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Router>
            <Routes fallback=|| view! { <RoleRedirect /> }>
                <Route path=path!("/login") view=|| view! { <PublicRoute><LoginPage /></PublicRoute> } />
                <Route path=path!("/register") view=|| view! { <PublicRoute><RegisterPage /></PublicRoute> } />
                <Route path=path!("/") view=RoleRedirect />
                <Route path=path!("/dashboard") view=RoleRedirect />

                <Route path=path!("/dashboard/admin") view=shell(AdminDashboardPage, vec![UserRole::Admin]) />
                <Route path=path!("/dashboard/supervisor") view=shell(SupervisorDashboardPage, vec![UserRole::Supervisor]) />
                <Route path=path!("/dashboard/technician") view=shell(TechnicianDashboardPage, vec![UserRole::Technician]) />

                <Route path=path!("/equipments") view=shell(EquipmentListPage, vec![]) />
                <Route path=path!("/equipments/new") view=shell(EquipmentCreatePage, managers()) />
                <Route path=path!("/equipments/:id") view=shell(EquipmentDetailsPage, vec![]) />
                <Route path=path!("/equipments/:id/edit") view=shell(EquipmentEditPage, managers()) />

                <Route path=path!("/maintenance/calendar") view=shell(CalendarPage, vec![]) />
                <Route path=path!("/maintenance/planning") view=shell(MaintenancePlanningPage, managers()) />
                <Route path=path!("/maintenance/interventions") view=shell(InterventionListPage, vec![]) />
                <Route path=path!("/maintenance/interventions/:id") view=shell(InterventionDetailsPage, vec![]) />
            </Routes>
        </Router>
    }
}
