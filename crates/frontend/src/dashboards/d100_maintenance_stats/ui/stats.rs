use contracts::dashboards::d100_maintenance_stats::dto::MaintenanceStats;
use contracts::enums::{MaintenanceType, Priority};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::dashboards::d100_maintenance_stats::api;
use crate::shared::components::badges::{badge_for_code, BadgeValue};
use crate::shared::components::stat_card::{alert_tone, StatCard, StatValue};

/// Share of each bucket in percent, zero buckets dropped
pub fn shares(counts: &BTreeMap<String, u64>) -> Vec<(String, u64, f64)> {
    let total: u64 = counts.values().sum();
    counts
        .iter()
        .filter(|(_, n)| **n > 0)
        .map(|(code, n)| (code.clone(), *n, *n as f64 * 100.0 / total as f64))
        .collect()
}

fn breakdown<T>(title: &'static str, counts: Vec<(String, u64, f64)>) -> impl IntoView
where
    T: BadgeValue + FromStr,
{
    view! {
        <div class="breakdown">
            <h4 class="breakdown__title">{title}</h4>
            {if counts.is_empty() {
                view! { <div class="breakdown__empty">"Aucune intervention"</div> }.into_any()
            } else {
                counts.into_iter().map(|(code, n, pct)| view! {
                    <div class="breakdown__row">
                        {badge_for_code::<T>(&code)}
                        <div class="breakdown__bar">
                            <div class="breakdown__fill" style=format!("width: {:.0}%;", pct)></div>
                        </div>
                        <span class="breakdown__count">{n}</span>
                    </div>
                }).collect_view().into_any()
            }}
        </div>
    }
}

/// Maintenance indicators shown above the calendar
#[component]
pub fn MaintenanceStatsPanel(#[prop(into)] equipment_id: Signal<Option<i32>>) -> impl IntoView {
    let stats = RwSignal::new(None::<MaintenanceStats>);

    Effect::new(move |_| {
        let equipment_id = equipment_id.get();
        spawn_local(async move {
            match api::fetch_stats(equipment_id).await {
                Ok(s) => stats.set(Some(s)),
                Err(e) => log::warn!("Maintenance stats not loaded: {}", e),
            }
        });
    });

    let value = move |f: fn(&MaintenanceStats) -> StatValue| {
        Signal::derive(move || stats.with(|s| s.as_ref().map(f)))
    };
    let overdue_tone = Signal::derive(move || alert_tone(stats.with(|s| s.as_ref().map(|s| s.overdue).unwrap_or(0))));

    view! {
        <div class="stat-grid">
            <StatCard label="Planifiées" icon_name="calendar" value=value(|s| StatValue::Count(s.total_scheduled)) />
            <StatCard label="Terminées ce mois" icon_name="check" value=value(|s| StatValue::Count(s.completed_this_month)) />
            <StatCard label="En retard" icon_name="alert" value=value(|s| StatValue::Count(s.overdue)) tone=overdue_tone />
            <StatCard label="En cours" icon_name="wrench" value=value(|s| StatValue::Count(s.in_progress)) />
            <StatCard label="Durée moyenne" icon_name="activity" value=value(|s| StatValue::Hours(s.average_completion_time)) />
            <StatCard label="MTTR" icon_name="activity" value=value(|s| StatValue::Hours(s.mttr)) />
            <StatCard label="MTBF" icon_name="activity" value=value(|s| StatValue::Hours(s.mtbf)) />
        </div>
        {move || stats.get().map(|s| view! {
            <section class="card">
                <div class="card__body breakdown-grid">
                    {breakdown::<MaintenanceType>("Par type", shares(&s.by_type))}
                    {breakdown::<Priority>("Par priorité", shares(&s.by_priority))}
                </div>
            </section>
        })}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_skip_empty_buckets() {
        let mut stats = MaintenanceStats::empty();
        stats.by_type.insert("preventive".into(), 3);
        stats.by_type.insert("corrective".into(), 1);
        let s = shares(&stats.by_type);
        assert_eq!(s.len(), 2);
        let preventive = s.iter().find(|(code, _, _)| code == "preventive").unwrap();
        assert_eq!(preventive.1, 3);
        assert!((preventive.2 - 75.0).abs() < f64::EPSILON);
        assert!(shares(&MaintenanceStats::empty().by_priority).is_empty());
    }
}
