use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::enums::{InterventionStatus, MaintenanceStatus, Priority};

/// Event consumed by the calendar page. Outer keys are camelCase, `extendedProps` stays snake_case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub all_day: bool,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
    pub text_color: Option<String>,
    pub extended_props: CalendarEventProps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEventProps {
    #[serde(rename = "type")]
    pub kind: CalendarEventKind,
    /// Status code of the underlying record
    pub status: String,
    pub priority: Priority,
    pub equipment_id: i32,
    pub equipment_name: String,
    pub technician_id: Option<i32>,
    pub technician_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarEventKind {
    Scheduled,
    Intervention,
}

/// Identifier of a calendar event: `scheduled_{id}` or `intervention_{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarEventId {
    Scheduled(i32),
    Intervention(i32),
}

impl fmt::Display for CalendarEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarEventId::Scheduled(id) => write!(f, "scheduled_{}", id),
            CalendarEventId::Intervention(id) => write!(f, "intervention_{}", id),
        }
    }
}

impl FromStr for CalendarEventId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Identifiant d'événement invalide : {}", s);
        let (prefix, id) = s.rsplit_once('_').ok_or_else(invalid)?;
        let id: i32 = id.parse().map_err(|_| invalid())?;
        match prefix {
            "scheduled" => Ok(CalendarEventId::Scheduled(id)),
            "intervention" => Ok(CalendarEventId::Intervention(id)),
            _ => Err(invalid()),
        }
    }
}

/// Event colour: priority first, then the status colour.
pub fn event_color(priority: Option<Priority>, status_color: Option<&str>) -> String {
    priority
        .map(|p| p.color())
        .or(status_color)
        .unwrap_or("#1890ff")
        .to_string()
}

impl CalendarEvent {
    pub fn scheduled(
        id: i32,
        start: NaiveDateTime,
        end: NaiveDateTime,
        status: MaintenanceStatus,
        priority: Priority,
        equipment_id: i32,
        equipment_name: Option<String>,
        technician: Option<(i32, String)>,
    ) -> Self {
        let equipment_name = equipment_name.unwrap_or_else(|| "Équipement".to_string());
        let color = event_color(Some(priority), Some(status.color()));
        Self {
            id: CalendarEventId::Scheduled(id).to_string(),
            title: format!("Maintenance - {}", equipment_name),
            start,
            end,
            all_day: false,
            background_color: Some(color.clone()),
            border_color: Some(color),
            text_color: Some("#ffffff".to_string()),
            extended_props: CalendarEventProps {
                kind: CalendarEventKind::Scheduled,
                status: status.as_str().to_string(),
                priority,
                equipment_id,
                equipment_name,
                technician_id: technician.as_ref().map(|(id, _)| *id),
                technician_name: technician.map(|(_, name)| name),
            },
        }
    }

    pub fn intervention(
        id: i32,
        start: NaiveDateTime,
        end: NaiveDateTime,
        status: InterventionStatus,
        priority: Priority,
        equipment_id: i32,
        equipment_name: Option<String>,
        technician: Option<(i32, String)>,
    ) -> Self {
        let equipment_name = equipment_name.unwrap_or_else(|| "Équipement".to_string());
        let color = event_color(Some(priority), Some(status.color()));
        Self {
            id: CalendarEventId::Intervention(id).to_string(),
            title: format!("Intervention - {}", equipment_name),
            start,
            end,
            all_day: false,
            background_color: Some(color.clone()),
            border_color: Some(color),
            text_color: Some("#ffffff".to_string()),
            extended_props: CalendarEventProps {
                kind: CalendarEventKind::Intervention,
                status: status.as_str().to_string(),
                priority,
                equipment_id,
                equipment_name,
                technician_id: technician.as_ref().map(|(id, _)| *id),
                technician_name: technician.map(|(_, name)| name),
            },
        }
    }

    pub fn event_id(&self) -> Option<CalendarEventId> {
        self.id.parse().ok()
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_id: Option<i32>,
}

/// Drag-and-drop style move of an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarMoveRequest {
    pub event_id: String,
    pub new_start: NaiveDateTime,
    pub new_end: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 2)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn event_ids_round_trip() {
        assert_eq!("scheduled_12".parse(), Ok(CalendarEventId::Scheduled(12)));
        assert_eq!("intervention_3".parse(), Ok(CalendarEventId::Intervention(3)));
        assert!("scheduled_x".parse::<CalendarEventId>().is_err());
        assert!("task_1".parse::<CalendarEventId>().is_err());
        assert_eq!(CalendarEventId::Scheduled(9).to_string(), "scheduled_9");
    }

    #[test]
    fn scheduled_event_shape() {
        let e = CalendarEvent::scheduled(
            4,
            at(8),
            at(10),
            MaintenanceStatus::Scheduled,
            Priority::Critical,
            2,
            Some("Presse P1".into()),
            Some((5, "Luc Martin".into())),
        );
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["id"], "scheduled_4");
        assert_eq!(json["title"], "Maintenance - Presse P1");
        assert_eq!(json["allDay"], false);
        assert_eq!(json["backgroundColor"], "#f5222d");
        assert_eq!(json["extendedProps"]["type"], "scheduled");
        assert_eq!(json["extendedProps"]["equipment_name"], "Presse P1");
        assert_eq!(json["extendedProps"]["technician_name"], "Luc Martin");
    }

    #[test]
    fn missing_equipment_name_has_placeholder() {
        let e = CalendarEvent::intervention(
            1,
            at(9),
            at(11),
            InterventionStatus::Assigned,
            Priority::Low,
            2,
            None,
            None,
        );
        assert_eq!(e.title, "Intervention - Équipement");
        assert_eq!(e.event_id(), Some(CalendarEventId::Intervention(1)));
    }

    #[test]
    fn color_falls_back_to_status() {
        assert_eq!(event_color(None, Some("#52c41a")), "#52c41a");
        assert_eq!(event_color(None, None), "#1890ff");
    }
}
