use chrono::NaiveDate;
use contracts::dashboards::d101_role_dashboard::dto::{
    AlertItem, AlertLevel, TaskItem, TaskState, TeamMember,
};
use leptos::prelude::*;

use crate::shared::components::badges::badge;
use crate::shared::components::feedback::Empty;
use crate::shared::date_utils::{format_iso_date, format_timestamp, parse_date_input, today};
use crate::shared::icons::icon;

pub fn critical_count(alerts: &[AlertItem]) -> usize {
    alerts
        .iter()
        .filter(|a| a.level == AlertLevel::Critical)
        .count()
}

/// Open task whose due date has passed
pub fn is_late(task: &TaskItem, today: NaiveDate) -> bool {
    task.status != TaskState::Completed
        && parse_date_input(&task.due_date)
            .map(|due| due < today)
            .unwrap_or(false)
}

#[component]
pub fn AlertsWidget(#[prop(into)] alerts: Signal<Vec<AlertItem>>) -> impl IntoView {
    let summary = move || {
        alerts.with(|list| match critical_count(list) {
            0 => format!("{}", list.len()),
            n => format!("{} dont {} critique(s)", list.len(), n),
        })
    };

    view! {
        <section class="card widget">
            <div class="card__header">
                <h3 class="card__title">{icon("alert")}" Alertes"</h3>
                <span class="card__count">{summary}</span>
            </div>
            <div class="card__body">
                <Show
                    when=move || !alerts.with(Vec::is_empty)
                    fallback=|| view! { <Empty message="Aucune alerte" /> }
                >
                    <ul class="widget-list">
                        {move || alerts.get().into_iter().map(|alert| view! {
                            <li class="widget-list__item">
                                <div class="widget-list__head">
                                    {badge(alert.level)}
                                    <strong>{alert.title}</strong>
                                </div>
                                <div class="widget-list__text">{alert.description}</div>
                                <div class="widget-list__meta">
                                    {alert.equipment.map(|e| view! { <span>{e}" · "</span> })}
                                    <span>{format_timestamp(&alert.timestamp)}</span>
                                </div>
                            </li>
                        }).collect_view()}
                    </ul>
                </Show>
            </div>
        </section>
    }
}

/// Upcoming maintenances and interventions; each entry opens its page
#[component]
pub fn TasksWidget(
    title: &'static str,
    #[prop(into)] tasks: Signal<Vec<TaskItem>>,
    #[prop(optional)] show_assignee: bool,
) -> impl IntoView {
    view! {
        <section class="card widget">
            <div class="card__header">
                <h3 class="card__title">{icon("list")}" "{title}</h3>
                <span class="card__count">{move || tasks.with(Vec::len)}</span>
            </div>
            <div class="card__body">
                <Show
                    when=move || !tasks.with(Vec::is_empty)
                    fallback=|| view! { <Empty message="Aucune tâche" /> }
                >
                    <ul class="widget-list">
                        {move || {
                            let now = today();
                            tasks.get().into_iter().map(|task| {
                                let late = is_late(&task, now);
                                let heading = match task.link.clone() {
                                    Some(href) => view! {
                                        <a class="widget-list__link" href=href>{task.title.clone()}</a>
                                    }.into_any(),
                                    None => view! { <strong>{task.title.clone()}</strong> }.into_any(),
                                };
                                let assignee = task
                                    .assigned_to
                                    .clone()
                                    .filter(|_| show_assignee)
                                    .map(|name| view! { <span>{format!(" · {}", name)}</span> });
                                view! {
                                    <li class={if late { "widget-list__item widget-list__item--late" } else { "widget-list__item" }}>
                                        <div class="widget-list__head">
                                            {heading}
                                            {badge(task.priority)}
                                            {badge(task.status)}
                                        </div>
                                        <div class="widget-list__text">{task.description.clone()}</div>
                                        <div class="widget-list__meta">
                                            <span>{task.equipment.clone()}</span>
                                            <span>{format!(" · Échéance {}", format_iso_date(&task.due_date))}</span>
                                            {assignee}
                                        </div>
                                    </li>
                                }
                            }).collect_view()
                        }}
                    </ul>
                </Show>
            </div>
        </section>
    }
}

#[component]
pub fn TeamWidget(#[prop(into)] members: Signal<Vec<TeamMember>>) -> impl IntoView {
    view! {
        <section class="card widget">
            <div class="card__header">
                <h3 class="card__title">{icon("users")}" Équipe"</h3>
                <span class="card__count">{move || members.with(Vec::len)}</span>
            </div>
            <div class="card__body">
                <Show
                    when=move || !members.with(Vec::is_empty)
                    fallback=|| view! { <Empty message="Aucun membre actif" /> }
                >
                    <table class="table__data">
                        <thead class="table__head">
                            <tr>
                                <th class="table__header-cell">"Nom"</th>
                                <th class="table__header-cell">"Rôle"</th>
                                <th class="table__header-cell">"Statut"</th>
                                <th class="table__header-cell">"Tâche en cours"</th>
                                <th class="table__header-cell">"Terminées"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || members.get().into_iter().map(|m| view! {
                                <tr class="table__row">
                                    <td class="table__cell">{m.name}</td>
                                    <td class="table__cell">{m.role}</td>
                                    <td class="table__cell">{badge(m.status)}</td>
                                    <td class="table__cell">{m.current_task.unwrap_or_else(|| "-".into())}</td>
                                    <td class="table__cell">{m.completed_tasks}</td>
                                </tr>
                            }).collect_view()}
                        </tbody>
                    </table>
                </Show>
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d101_role_dashboard::dto::TaskLevel;

    fn task(due: &str, status: TaskState) -> TaskItem {
        TaskItem {
            id: "scheduled_1".into(),
            title: "Graissage".into(),
            description: String::new(),
            priority: TaskLevel::Medium,
            status,
            due_date: due.into(),
            assigned_to: None,
            equipment: "Presse P2".into(),
            link: None,
        }
    }

    #[test]
    fn late_tasks() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        assert!(is_late(&task("2025-06-09", TaskState::Pending), today));
        assert!(!is_late(&task("2025-06-09", TaskState::Completed), today));
        assert!(!is_late(&task("2025-06-10", TaskState::InProgress), today));
        assert!(!is_late(&task("bientôt", TaskState::Pending), today));
    }

    #[test]
    fn counts_critical_alerts() {
        let alert = |level| AlertItem {
            id: "a".into(),
            level,
            title: String::new(),
            description: String::new(),
            timestamp: String::new(),
            equipment: None,
        };
        let alerts = vec![
            alert(AlertLevel::Critical),
            alert(AlertLevel::Info),
            alert(AlertLevel::Critical),
        ];
        assert_eq!(critical_count(&alerts), 2);
    }
}
