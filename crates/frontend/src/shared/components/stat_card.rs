use crate::shared::icons::icon;
use leptos::prelude::*;

/// How a card value is printed
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StatValue {
    Count(u64),
    Percent(f64),
    Hours(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StatTone {
    #[default]
    Neutral,
    Good,
    Warning,
    Bad,
}

impl StatValue {
    pub fn format(&self) -> String {
        match self {
            StatValue::Count(n) => format_thousands(*n),
            StatValue::Percent(p) => format!("{:.1}%", p).replace('.', ","),
            StatValue::Hours(h) => format!("{:.1} h", h).replace('.', ","),
        }
    }
}

fn format_thousands(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('\u{00a0}');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Availability colour thresholds used on every dashboard
pub fn availability_tone(percent: f64) -> StatTone {
    if percent >= 95.0 {
        StatTone::Good
    } else if percent >= 85.0 {
        StatTone::Warning
    } else {
        StatTone::Bad
    }
}

/// Non-zero counts of problems are shown in red
pub fn alert_tone(count: u64) -> StatTone {
    if count > 0 {
        StatTone::Bad
    } else {
        StatTone::Good
    }
}

#[component]
pub fn StatCard(
    /// Label displayed above the value
    label: &'static str,
    /// Icon name from the icon() helper
    icon_name: &'static str,
    /// None while loading
    #[prop(into)]
    value: Signal<Option<StatValue>>,
    #[prop(into, optional)] tone: Signal<StatTone>,
    #[prop(into, optional)] subtitle: Signal<Option<String>>,
) -> impl IntoView {
    let status_class = move || match tone.get() {
        StatTone::Good => "stat-card stat-card--success",
        StatTone::Bad => "stat-card stat-card--error",
        StatTone::Warning => "stat-card stat-card--warning",
        StatTone::Neutral => "stat-card",
    };

    let formatted = move || match value.get() {
        Some(v) => v.format(),
        None => "-".to_string(),
    };

    let subtitle_view = move || {
        subtitle
            .get()
            .map(|s| view! { <div class="stat-card__subtitle">{s}</div> })
    };

    view! {
        <div class=status_class>
            <div class="stat-card__icon">{icon(icon_name)}</div>
            <div class="stat-card__content">
                <div class="stat-card__label">{label}</div>
                <div class="stat-card__value">{formatted}</div>
                {subtitle_view}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_use_french_separators() {
        assert_eq!(StatValue::Count(12_345).format(), "12\u{00a0}345");
        assert_eq!(StatValue::Count(42).format(), "42");
        assert_eq!(StatValue::Percent(96.54).format(), "96,5%");
        assert_eq!(StatValue::Hours(3.0).format(), "3,0 h");
    }

    #[test]
    fn tones() {
        assert_eq!(availability_tone(97.0), StatTone::Good);
        assert_eq!(availability_tone(90.0), StatTone::Warning);
        assert_eq!(availability_tone(60.0), StatTone::Bad);
        assert_eq!(alert_tone(0), StatTone::Good);
        assert_eq!(alert_tone(3), StatTone::Bad);
    }
}
