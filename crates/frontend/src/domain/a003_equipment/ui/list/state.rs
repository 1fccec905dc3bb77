use contracts::domain::a003_equipment::aggregate::EquipmentFilter;
use contracts::enums::{Criticality, EquipmentStatus};
use leptos::prelude::*;

use crate::shared::form_utils::optional_text;

#[derive(Clone, Debug, PartialEq)]
pub struct EquipmentListState {
    pub search: String,
    pub site_id: Option<i32>,
    pub status: Option<EquipmentStatus>,
    pub criticality: Option<Criticality>,

    pub page: u64,
    pub page_size: u64,
}

impl Default for EquipmentListState {
    fn default() -> Self {
        Self {
            search: String::new(),
            site_id: None,
            status: None,
            criticality: None,
            page: 0,
            page_size: 10,
        }
    }
}

impl EquipmentListState {
    pub fn to_filter(&self) -> EquipmentFilter {
        EquipmentFilter {
            site_id: self.site_id,
            production_line_id: None,
            status: self.status,
            criticality: self.criticality,
            search: optional_text(&self.search),
            skip: self.page * self.page_size,
            limit: self.page_size,
        }
    }

    pub fn active_filters_count(&self) -> usize {
        [
            optional_text(&self.search).is_some(),
            self.site_id.is_some(),
            self.status.is_some(),
            self.criticality.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Keeps the page size, drops every filter
    pub fn cleared(&self) -> Self {
        Self {
            page_size: self.page_size,
            ..Self::default()
        }
    }
}

pub fn create_state() -> RwSignal<EquipmentListState> {
    RwSignal::new(EquipmentListState::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_pages_with_skip_and_limit() {
        let state = EquipmentListState {
            search: "  ".into(),
            status: Some(EquipmentStatus::Broken),
            page: 2,
            page_size: 20,
            ..Default::default()
        };
        let filter = state.to_filter();
        assert_eq!(filter.search, None);
        assert_eq!(filter.skip, 40);
        assert_eq!(filter.limit, 20);
        assert_eq!(state.active_filters_count(), 1);
    }

    #[test]
    fn clearing_keeps_page_size() {
        let state = EquipmentListState {
            site_id: Some(1),
            page: 3,
            page_size: 50,
            ..Default::default()
        };
        let cleared = state.cleared();
        assert_eq!(cleared.page_size, 50);
        assert_eq!(cleared.page, 0);
        assert_eq!(cleared.active_filters_count(), 0);
    }
}
