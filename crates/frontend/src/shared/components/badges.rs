use contracts::dashboards::d101_role_dashboard::dto::{AlertLevel, MemberStatus, TaskLevel, TaskState};
use contracts::enums::{
    Criticality, EquipmentStatus, InterventionStatus, MaintenanceStatus, MaintenanceType, Priority,
};
use leptos::prelude::*;

/// Anything shown as a coloured badge
pub trait BadgeValue {
    fn label(&self) -> &'static str;
    fn color(&self) -> &'static str;
}

macro_rules! badge_value {
    ($($ty:ty),* $(,)?) => {
        $(impl BadgeValue for $ty {
            fn label(&self) -> &'static str {
                <$ty>::label(self)
            }
            fn color(&self) -> &'static str {
                <$ty>::color(self)
            }
        })*
    };
}

badge_value!(
    EquipmentStatus,
    Criticality,
    MaintenanceStatus,
    MaintenanceType,
    Priority,
    InterventionStatus,
    MemberStatus,
);

impl BadgeValue for AlertLevel {
    fn label(&self) -> &'static str {
        match self {
            AlertLevel::Critical => "Critique",
            AlertLevel::Warning => "Attention",
            AlertLevel::Info => "Info",
        }
    }

    fn color(&self) -> &'static str {
        AlertLevel::color(self)
    }
}

impl BadgeValue for TaskLevel {
    fn label(&self) -> &'static str {
        TaskLevel::label(self)
    }

    fn color(&self) -> &'static str {
        match self {
            TaskLevel::High => "#f5222d",
            TaskLevel::Medium => "#faad14",
            TaskLevel::Low => "#52c41a",
        }
    }
}

impl BadgeValue for TaskState {
    fn label(&self) -> &'static str {
        TaskState::label(self)
    }

    fn color(&self) -> &'static str {
        match self {
            TaskState::Pending => "#8c8c8c",
            TaskState::InProgress => "#1890ff",
            TaskState::Completed => "#52c41a",
        }
    }
}

/// Tinted background with the colour as text and border
pub fn badge_style(color: &str) -> String {
    let tint = if color.len() == 7 && color.starts_with('#') {
        format!("{color}1a")
    } else {
        "transparent".to_string()
    };
    format!("background-color: {tint}; color: {color}; border: 1px solid {color};")
}

pub fn badge<T: BadgeValue>(value: T) -> impl IntoView {
    view! {
        <span class="badge" style=badge_style(value.color())>
            {value.label()}
        </span>
    }
}

/// Badge driven by a code string; unknown codes are shown as they are
pub fn badge_for_code<T>(code: &str) -> AnyView
where
    T: BadgeValue + std::str::FromStr,
{
    match code.parse::<T>() {
        Ok(value) => badge(value).into_any(),
        Err(_) => view! { <span class="badge">{code.to_string()}</span> }.into_any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_tints_hex_colours() {
        assert_eq!(
            badge_style("#f5222d"),
            "background-color: #f5222d1a; color: #f5222d; border: 1px solid #f5222d;"
        );
        assert!(badge_style("red").starts_with("background-color: transparent;"));
    }

    #[test]
    fn labels_come_from_enums() {
        assert_eq!(BadgeValue::label(&EquipmentStatus::Broken), "En panne");
        assert_eq!(BadgeValue::label(&AlertLevel::Warning), "Attention");
        assert_eq!(BadgeValue::color(&AlertLevel::Critical), "#f5222d");
    }
}
