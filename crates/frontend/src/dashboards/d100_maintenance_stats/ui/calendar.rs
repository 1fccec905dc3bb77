use chrono::Datelike;
use contracts::dashboards::d100_maintenance_stats::calendar::{
    CalendarEvent, CalendarEventKind, CalendarMoveRequest, CalendarQuery,
};
use contracts::domain::a003_equipment::aggregate::{EquipmentDetails, EquipmentFilter};
use contracts::domain::common::MAX_LIMIT;
use contracts::enums::{InterventionStatus, MaintenanceStatus};
use contracts::system::auth::UserInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::stats::MaintenanceStatsPanel;
use crate::dashboards::d100_maintenance_stats::api;
use crate::dashboards::d100_maintenance_stats::month_grid::{
    event_route, events_on, grid_range, month_label, month_start, moved_end, shift_month, weeks,
    WEEKDAYS,
};
use crate::domain::a003_equipment::api::fetch_equipments;
use crate::shared::components::badges::{badge, badge_for_code};
use crate::shared::components::feedback::{Empty, ErrorAlert, Loading};
use crate::shared::date_utils::{format_date, parse_datetime_input, to_datetime_input, today};
use crate::shared::form_utils::parse_optional;
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PageHeader};
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use crate::shared::toast;
use crate::system::auth::context::use_auth;
use crate::system::users::api::fetch_technicians;

fn status_badge(event: &CalendarEvent) -> AnyView {
    let status = &event.extended_props.status;
    match event.extended_props.kind {
        CalendarEventKind::Scheduled => badge_for_code::<MaintenanceStatus>(status),
        CalendarEventKind::Intervention => badge_for_code::<InterventionStatus>(status),
    }
}

fn chip_style(event: &CalendarEvent) -> String {
    format!(
        "background-color: {}; border-color: {}; color: {};",
        event.background_color.as_deref().unwrap_or("#1890ff"),
        event.border_color.as_deref().unwrap_or("#1890ff"),
        event.text_color.as_deref().unwrap_or("#ffffff"),
    )
}

#[component]
pub fn CalendarPage() -> impl IntoView {
    let month = RwSignal::new(month_start(today()));
    let equipment_id = RwSignal::new(None::<i32>);
    let technician_id = RwSignal::new(None::<i32>);
    let events = RwSignal::new(Vec::<CalendarEvent>::new());
    let equipments = RwSignal::new(Vec::<EquipmentDetails>::new());
    let technicians = RwSignal::new(Vec::<UserInfo>::new());
    let selected = RwSignal::new(None::<CalendarEvent>);
    let new_start = RwSignal::new(String::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let reload = RwSignal::new(0u32);

    let (auth_state, _) = use_auth();
    let is_manager = Memo::new(move |_| auth_state.with(|s| s.is_manager()));

    spawn_local(async move {
        let filter = EquipmentFilter {
            limit: MAX_LIMIT,
            ..Default::default()
        };
        match fetch_equipments(&filter).await {
            Ok(list) => equipments.set(list),
            Err(e) => log::warn!("Equipment list not loaded: {}", e),
        }
    });

    Effect::new(move |_| {
        if !is_manager.get() {
            return;
        }
        spawn_local(async move {
            match fetch_technicians().await {
                Ok(list) => technicians.set(list),
                Err(e) => log::warn!("Technicians not loaded: {}", e),
            }
        });
    });

    Effect::new(move |_| {
        reload.track();
        let (start_date, end_date) = grid_range(month.get());
        let query = CalendarQuery {
            start_date,
            end_date,
            equipment_id: equipment_id.get(),
            technician_id: technician_id.get(),
        };
        loading.set(true);
        spawn_local(async move {
            match api::fetch_calendar(&query).await {
                Ok(list) => {
                    events.set(list);
                    error.set(None);
                }
                Err(e) => error.set(Some(e)),
            }
            loading.set(false);
        });
    });

    let select = move |event: CalendarEvent| {
        new_start.set(to_datetime_input(event.start));
        selected.set(Some(event));
    };

    let open_href = move || selected.with(|s| s.as_ref().and_then(event_route));

    let move_selected = move |_| {
        let Some(event) = selected.get_untracked() else {
            return;
        };
        let Some(start) = parse_datetime_input(&new_start.get_untracked()) else {
            toast::error("Date de début invalide");
            return;
        };
        let request = CalendarMoveRequest {
            event_id: event.id.clone(),
            new_start: start,
            new_end: Some(moved_end(&event, start)),
        };
        spawn_local(async move {
            match api::move_event(&request).await {
                Ok(moved) => {
                    toast::success(format!("Événement déplacé au {}", format_date(moved.date())));
                    selected.set(Some(moved));
                    reload.update(|n| *n += 1);
                }
                Err(e) => toast::error(e),
            }
        });
    };

    let month_events = move || {
        let current = month.get();
        let mut list: Vec<CalendarEvent> = events
            .get()
            .into_iter()
            .filter(|e| e.date().month() == current.month() && e.date().year() == current.year())
            .collect();
        list.sort_by_key(|e| e.start);
        list
    };

    view! {
        <PageFrame page_id="d100_maintenance_stats--dashboard" category=PAGE_CAT_DASHBOARD>
            <PageHeader title="Calendrier de maintenance">
                <button class="button button--secondary" on:click=move |_| reload.update(|n| *n += 1)>
                    {icon("refresh")}
                    " Actualiser"
                </button>
            </PageHeader>

            <div class="page__content">
                <MaintenanceStatsPanel equipment_id=equipment_id />

                <div class="calendar-toolbar">
                    <div class="calendar-toolbar__nav">
                        <button class="button button--secondary" on:click=move |_| month.update(|m| *m = shift_month(*m, -1))>
                            {icon("chevron-left")}
                        </button>
                        <button class="button button--secondary" on:click=move |_| month.set(month_start(today()))>
                            "Aujourd'hui"
                        </button>
                        <button class="button button--secondary" on:click=move |_| month.update(|m| *m = shift_month(*m, 1))>
                            {icon("chevron-right")}
                        </button>
                        <h2 class="calendar-toolbar__title">{move || month_label(month.get())}</h2>
                    </div>
                    <div class="calendar-toolbar__filters">
                        <select on:change=move |ev| equipment_id.set(parse_optional(&event_target_value(&ev)))>
                            <option value="">"Tous les équipements"</option>
                            {move || equipments.get().into_iter().map(|e| view! {
                                <option value=e.equipment.id.to_string()>{e.equipment.name.clone()}</option>
                            }).collect_view()}
                        </select>
                        <Show when=move || is_manager.get()>
                            <select on:change=move |ev| technician_id.set(parse_optional(&event_target_value(&ev)))>
                                <option value="">"Tous les techniciens"</option>
                                {move || technicians.get().into_iter().map(|t| view! {
                                    <option value=t.id.to_string()>{t.full_name()}</option>
                                }).collect_view()}
                            </select>
                        </Show>
                    </div>
                </div>

                <ErrorAlert error=error />

                <div class="calendar-layout">
                    <div class="calendar">
                        <div class="calendar__weekdays">
                            {WEEKDAYS.into_iter().map(|d| view! { <div class="calendar__weekday">{d}</div> }).collect_view()}
                        </div>
                        {move || {
                            let current = month.get();
                            let now = today();
                            let all = events.get();
                            weeks(current).into_iter().map(|week| view! {
                                <div class="calendar__week">
                                    {week.into_iter().map(|day| {
                                        let mut class = String::from("calendar__day");
                                        if day.month() != current.month() {
                                            class.push_str(" calendar__day--outside");
                                        }
                                        if day == now {
                                            class.push_str(" calendar__day--today");
                                        }
                                        view! {
                                            <div class=class>
                                                <div class="calendar__day-number">{day.day()}</div>
                                                {events_on(&all, day).into_iter().map(|event| {
                                                    let style = chip_style(&event);
                                                    let label = format!("{} {}", event.start.format("%H:%M"), event.title);
                                                    view! {
                                                        <button
                                                            class="calendar__event"
                                                            style=style
                                                            title=event.title.clone()
                                                            on:click=move |_| select(event.clone())
                                                        >
                                                            {label}
                                                        </button>
                                                    }
                                                }).collect_view()}
                                            </div>
                                        }
                                    }).collect_view()}
                                </div>
                            }).collect_view()
                        }}
                    </div>

                    <aside class="card calendar-details">
                        <div class="card__header">
                            <h3 class="card__title">"Détails"</h3>
                        </div>
                        <div class="card__body">
                            {move || match selected.get() {
                                None => view! { <Empty message="Cliquez sur un événement" /> }.into_any(),
                                Some(event) => {
                                    let props = event.extended_props.clone();
                                    view! {
                                        <dl class="details-list">
                                            <dt>"Événement"</dt>
                                            <dd>{event.title.clone()}</dd>
                                            <dt>"Horaire"</dt>
                                            <dd>{format!("{} {} - {}", format_date(event.date()), event.start.format("%H:%M"), event.end.format("%H:%M"))}</dd>
                                            <dt>"Statut"</dt>
                                            <dd>{status_badge(&event)}</dd>
                                            <dt>"Priorité"</dt>
                                            <dd>{badge(props.priority)}</dd>
                                            <dt>"Équipement"</dt>
                                            <dd>
                                                <a class="table__link" href=format!("/equipments/{}", props.equipment_id)>
                                                    {props.equipment_name.clone()}
                                                </a>
                                            </dd>
                                            <dt>"Technicien"</dt>
                                            <dd>{props.technician_name.clone().unwrap_or_else(|| "Non assigné".into())}</dd>
                                        </dl>
                                    }.into_any()
                                }
                            }}
                            {move || open_href().map(|href| view! {
                                <a class="button button--primary" href=href>"Ouvrir"</a>
                            })}
                            <Show when=move || selected.with(Option::is_some)>
                                <Show when=move || is_manager.get()>
                                    <div class="form-group">
                                        <label>"Nouveau début"</label>
                                        <input
                                            type="datetime-local"
                                            prop:value=move || new_start.get()
                                            on:change=move |ev| new_start.set(event_target_value(&ev))
                                        />
                                    </div>
                                    <button class="button button--secondary" on:click=move_selected>
                                        {icon("calendar")}
                                        " Déplacer"
                                    </button>
                                </Show>
                            </Show>
                        </div>
                    </aside>
                </div>

                <section class="card">
                    <div class="card__header">
                        <h3 class="card__title">{icon("list")}" Événements du mois"</h3>
                    </div>
                    <div class="card__body">
                        <Loading loading=loading>
                            {move || {
                                let list = month_events();
                                if list.is_empty() {
                                    return view! { <Empty message="Aucun événement ce mois-ci" /> }.into_any();
                                }
                                view! {
                                    <table class="table__data table--striped">
                                        <thead class="table__head">
                                            <tr>
                                                <th class="table__header-cell">"Date"</th>
                                                <th class="table__header-cell">"Événement"</th>
                                                <th class="table__header-cell">"Statut"</th>
                                                <th class="table__header-cell">"Priorité"</th>
                                                <th class="table__header-cell">"Technicien"</th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {list.into_iter().map(|event| {
                                                let when = format!("{} {}", format_date(event.date()), event.start.format("%H:%M"));
                                                let status = status_badge(&event);
                                                let priority = event.extended_props.priority;
                                                let technician = event.extended_props.technician_name.clone().unwrap_or_else(|| "-".into());
                                                let title = event.title.clone();
                                                let href = event_route(&event).unwrap_or_default();
                                                view! {
                                                    <tr class="table__row">
                                                        <td class="table__cell">{when}</td>
                                                        <td class="table__cell">
                                                            <a class="table__link" href=href>{title}</a>
                                                            <button class="button button--link" on:click=move |_| select(event.clone())>
                                                                "Détails"
                                                            </button>
                                                        </td>
                                                        <td class="table__cell">{status}</td>
                                                        <td class="table__cell">{badge(priority)}</td>
                                                        <td class="table__cell">{technician}</td>
                                                    </tr>
                                                }
                                            }).collect_view()}
                                        </tbody>
                                    </table>
                                }.into_any()
                            }}
                        </Loading>
                    </div>
                </section>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::enums::Priority;

    #[test]
    fn chips_use_event_colours() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let event = CalendarEvent::scheduled(
            1,
            start,
            start + chrono::Duration::hours(1),
            MaintenanceStatus::Scheduled,
            Priority::Critical,
            3,
            Some("Presse P2".into()),
            None,
        );
        let style = chip_style(&event);
        assert!(style.starts_with(&format!("background-color: {};", Priority::Critical.color())));
        assert!(style.ends_with("color: #ffffff;"));
    }
}
