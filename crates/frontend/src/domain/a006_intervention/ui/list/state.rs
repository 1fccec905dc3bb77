use contracts::domain::a006_intervention::aggregate::InterventionQuery;
use contracts::enums::{InterventionStatus, MaintenanceType};
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct InterventionListState {
    pub status: Option<InterventionStatus>,
    pub maintenance_type: Option<MaintenanceType>,
    pub technician_id: Option<i32>,

    pub page: u64,
    pub page_size: u64,
}

impl Default for InterventionListState {
    fn default() -> Self {
        Self {
            status: None,
            maintenance_type: None,
            technician_id: None,
            page: 0,
            page_size: 20,
        }
    }
}

impl InterventionListState {
    pub fn to_query(&self) -> InterventionQuery {
        InterventionQuery {
            equipment_id: None,
            technician_id: self.technician_id,
            status: self.status,
            maintenance_type: self.maintenance_type,
            skip: self.page * self.page_size,
            limit: self.page_size,
        }
    }

    pub fn active_filters_count(&self) -> usize {
        [
            self.status.is_some(),
            self.maintenance_type.is_some(),
            self.technician_id.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn cleared(&self) -> Self {
        Self {
            page_size: self.page_size,
            ..Self::default()
        }
    }
}

pub fn create_state() -> RwSignal<InterventionListState> {
    RwSignal::new(InterventionListState::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_follows_filters_and_page() {
        let state = InterventionListState {
            status: Some(InterventionStatus::Completed),
            technician_id: Some(4),
            page: 1,
            ..Default::default()
        };
        let query = state.to_query();
        assert_eq!(query.status, Some(InterventionStatus::Completed));
        assert_eq!(query.technician_id, Some(4));
        assert_eq!(query.skip, 20);
        assert_eq!(query.limit, 20);
        assert_eq!(state.active_filters_count(), 2);
        assert_eq!(state.cleared().active_filters_count(), 0);
    }
}
