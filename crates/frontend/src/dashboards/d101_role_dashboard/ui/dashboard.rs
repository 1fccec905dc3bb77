use contracts::dashboards::d101_role_dashboard::dto::{DashboardData, DashboardStats};
use contracts::enums::UserRole;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::widgets::{AlertsWidget, TasksWidget, TeamWidget};
use crate::dashboards::d101_role_dashboard::api;
use crate::shared::components::feedback::{confirm, ErrorAlert};
use crate::shared::components::stat_card::{
    alert_tone, availability_tone, StatCard, StatTone, StatValue,
};
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PageHeader};
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use crate::shared::toast;
use crate::system::api::insert_test_data;

/// One tile of the statistics row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    Equipments,
    Maintenances,
    Alerts,
    Interventions,
    Availability,
    Mtbf,
    Mttr,
}

impl StatKind {
    /// Technicians get their own workload; managers see the whole fleet
    pub fn for_role(role: UserRole) -> Vec<StatKind> {
        use StatKind::*;
        match role {
            UserRole::Technician => vec![Maintenances, Interventions, Alerts, Mttr],
            UserRole::Admin | UserRole::Supervisor => {
                vec![Equipments, Availability, Maintenances, Interventions, Alerts, Mtbf, Mttr]
            }
        }
    }

    pub fn label(&self, own: bool) -> &'static str {
        match (self, own) {
            (StatKind::Equipments, _) => "Équipements",
            (StatKind::Maintenances, false) => "Maintenances planifiées",
            (StatKind::Maintenances, true) => "Mes maintenances",
            (StatKind::Alerts, _) => "Alertes",
            (StatKind::Interventions, false) => "Interventions en cours",
            (StatKind::Interventions, true) => "Mes interventions en cours",
            (StatKind::Availability, _) => "Disponibilité",
            (StatKind::Mtbf, _) => "MTBF",
            (StatKind::Mttr, _) => "MTTR",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            StatKind::Equipments => "equipment",
            StatKind::Maintenances => "calendar",
            StatKind::Alerts => "alert",
            StatKind::Interventions => "wrench",
            StatKind::Availability => "check",
            StatKind::Mtbf | StatKind::Mttr => "activity",
        }
    }

    pub fn value(&self, stats: &DashboardStats) -> StatValue {
        match self {
            StatKind::Equipments => StatValue::Count(stats.equipments),
            StatKind::Maintenances => StatValue::Count(stats.maintenances),
            StatKind::Alerts => StatValue::Count(stats.alerts),
            StatKind::Interventions => StatValue::Count(stats.interventions),
            StatKind::Availability => StatValue::Percent(stats.availability),
            StatKind::Mtbf => StatValue::Hours(stats.mtbf),
            StatKind::Mttr => StatValue::Hours(stats.mttr),
        }
    }

    pub fn tone(&self, stats: &DashboardStats) -> StatTone {
        match self {
            StatKind::Alerts => alert_tone(stats.alerts),
            StatKind::Availability => availability_tone(stats.availability),
            _ => StatTone::Neutral,
        }
    }

    fn subtitle(&self) -> Option<String> {
        match self {
            StatKind::Mtbf => Some("Temps moyen entre pannes".to_string()),
            StatKind::Mttr => Some("Temps moyen de réparation".to_string()),
            _ => None,
        }
    }
}

#[component]
fn RoleDashboard(title: &'static str, role: UserRole) -> impl IntoView {
    let data = RwSignal::new(None::<DashboardData>);
    let error = RwSignal::new(None::<String>);
    let reload = RwSignal::new(0u32);
    let seeding = RwSignal::new(false);
    let own = role == UserRole::Technician;

    Effect::new(move |_| {
        reload.track();
        spawn_local(async move {
            match api::fetch_dashboard().await {
                Ok(d) => {
                    data.set(Some(d));
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
        });
    });

    let load_demo = move |_| {
        if !confirm("Charger les données de démonstration ?") {
            return;
        }
        seeding.set(true);
        spawn_local(async move {
            match insert_test_data().await {
                Ok(r) => {
                    toast::success(r.message);
                    reload.update(|n| *n += 1);
                }
                Err(e) => toast::error(e),
            }
            seeding.set(false);
        });
    };

    let alerts = Signal::derive(move || data.with(|d| d.as_ref().map(|d| d.alerts.clone()).unwrap_or_default()));
    let tasks = Signal::derive(move || data.with(|d| d.as_ref().map(|d| d.tasks.clone()).unwrap_or_default()));
    let team = Signal::derive(move || {
        data.with(|d| d.as_ref().and_then(|d| d.team_members.clone()).unwrap_or_default())
    });

    let cards = StatKind::for_role(role)
        .into_iter()
        .map(|kind| {
            let value = Signal::derive(move || data.with(|d| d.as_ref().map(|d| kind.value(&d.stats))));
            let tone = Signal::derive(move || {
                data.with(|d| d.as_ref().map(|d| kind.tone(&d.stats)).unwrap_or_default())
            });
            view! {
                <StatCard
                    label=kind.label(own)
                    icon_name=kind.icon()
                    value=value
                    tone=tone
                    subtitle=Signal::derive(move || kind.subtitle())
                />
            }
        })
        .collect_view();

    view! {
        <PageFrame page_id="d101_role_dashboard--dashboard" category=PAGE_CAT_DASHBOARD>
            <PageHeader title=title>
                {(role == UserRole::Admin).then(|| view! {
                    <button
                        class="button button--secondary"
                        disabled=move || seeding.get()
                        on:click=load_demo
                    >
                        {icon("upload")}
                        " Données de démonstration"
                    </button>
                })}
                <button class="button button--secondary" on:click=move |_| reload.update(|n| *n += 1)>
                    {icon("refresh")}
                    " Actualiser"
                </button>
            </PageHeader>

            <div class="page__content">
                <ErrorAlert error=error />
                <div class="stat-grid">{cards}</div>

                <div class="dashboard-grid">
                    <TasksWidget
                        title={if own { "Mes tâches" } else { "Tâches à venir" }}
                        tasks=tasks
                        show_assignee=!own
                    />
                    <AlertsWidget alerts=alerts />
                </div>

                {(!own).then(|| view! { <TeamWidget members=team /> })}
            </div>
        </PageFrame>
    }
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    view! {
        <RoleDashboard
            title="Tableau de bord administrateur"
            role=UserRole::Admin
        />
    }
}

#[component]
pub fn SupervisorDashboardPage() -> impl IntoView {
    view! {
        <RoleDashboard
            title="Tableau de bord superviseur"
            role=UserRole::Supervisor
        />
    }
}

#[component]
pub fn TechnicianDashboardPage() -> impl IntoView {
    view! {
        <RoleDashboard
            title="Mon tableau de bord"
            role=UserRole::Technician
        />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technicians_see_their_workload_only() {
        let kinds = StatKind::for_role(UserRole::Technician);
        assert!(!kinds.contains(&StatKind::Equipments));
        assert!(!kinds.contains(&StatKind::Availability));
        assert_eq!(StatKind::Interventions.label(true), "Mes interventions en cours");
        assert_eq!(StatKind::for_role(UserRole::Supervisor).len(), 7);
    }

    #[test]
    fn tones_follow_thresholds() {
        let stats = DashboardStats {
            alerts: 2,
            availability: 97.0,
            ..Default::default()
        };
        assert_eq!(StatKind::Alerts.tone(&stats), StatTone::Bad);
        assert_eq!(StatKind::Availability.tone(&stats), StatTone::Good);
        assert_eq!(StatKind::Mttr.tone(&stats), StatTone::Neutral);
        assert_eq!(StatKind::Availability.value(&stats), StatValue::Percent(97.0));
    }
}
