use contracts::domain::a003_equipment::aggregate::{EquipmentDetails, EquipmentFilter};
use contracts::domain::common::MAX_LIMIT;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::list::PlansPanel;
use crate::domain::a003_equipment::api::fetch_equipments;
use crate::domain::a005_scheduled_maintenance::ui::ScheduledPanel;
use crate::shared::page_frame::{PageFrame, PageHeader};
use crate::shared::page_standard::PAGE_CAT_LIST;

#[component]
pub fn MaintenancePlanningPage() -> impl IntoView {
    let equipments = RwSignal::new(Vec::<EquipmentDetails>::new());
    let schedule_reload = RwSignal::new(0u32);

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

    view! {
        <PageFrame page_id="a004_maintenance_plan--list" category=PAGE_CAT_LIST>
            <PageHeader title="Planification des maintenances" />
            <div class="page__content planning">
                <PlansPanel
                    equipments=equipments
                    on_generated=Callback::new(move |_| schedule_reload.update(|n| *n += 1))
                />
                <ScheduledPanel reload=schedule_reload />
            </div>
        </PageFrame>
    }
}
