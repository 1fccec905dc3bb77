use contracts::domain::a003_equipment::aggregate::{
    Equipment, EquipmentCreate, EquipmentDetails, EquipmentFilter, EquipmentStats,
    EquipmentUpdate,
};

use super::repository;
use crate::domain::{a001_site, a002_production_line};
use crate::shared::error::{ApiError, ApiResult};
use crate::system::uploads;

fn not_found() -> ApiError {
    ApiError::not_found("Équipement non trouvé")
}

/// Site, line and serial number consistency
async fn check_references(equipment: &Equipment) -> ApiResult<()> {
    if let Some(site_id) = equipment.site_id {
        a001_site::repository::get_by_id(site_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Site non trouvé"))?;
    }

    if let Some(line_id) = equipment.production_line_id {
        let line = a002_production_line::repository::get_by_id(line_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Ligne de production non trouvée"))?;
        if let Some(site_id) = equipment.site_id {
            if line.site_id != site_id {
                return Err(ApiError::bad_request(
                    "La ligne de production ne correspond pas au site spécifié",
                ));
            }
        }
    }

    if let Some(serial) = &equipment.serial_number {
        if let Some(existing) = repository::find_by_serial(serial).await? {
            if existing.id != equipment.id {
                return Err(ApiError::bad_request(
                    "Un équipement avec ce numéro de série existe déjà",
                ));
            }
        }
    }
    Ok(())
}

async fn details(equipment: Equipment) -> ApiResult<EquipmentDetails> {
    let site_name = match equipment.site_id {
        Some(id) => a001_site::repository::get_by_id(id).await?.map(|s| s.name),
        None => None,
    };
    let line_name = match equipment.production_line_id {
        Some(id) => a002_production_line::repository::get_by_id(id)
            .await?
            .map(|l| l.name),
        None => None,
    };
    Ok(EquipmentDetails::new(equipment, site_name, line_name))
}

pub async fn list(filter: &EquipmentFilter) -> ApiResult<Vec<EquipmentDetails>> {
    let items = repository::list(filter).await?;

    let sites = a001_site::repository::list_all().await?;
    let lines = a002_production_line::repository::list_all().await?;

    Ok(items
        .into_iter()
        .map(|e| {
            let site_name = e
                .site_id
                .and_then(|id| sites.iter().find(|s| s.id == id))
                .map(|s| s.name.clone());
            let line_name = e
                .production_line_id
                .and_then(|id| lines.iter().find(|l| l.id == id))
                .map(|l| l.name.clone());
            EquipmentDetails::new(e, site_name, line_name)
        })
        .collect())
}

pub async fn get_by_id(id: i32) -> ApiResult<Equipment> {
    repository::get_by_id(id).await?.ok_or_else(not_found)
}

pub async fn get_details(id: i32) -> ApiResult<EquipmentDetails> {
    details(get_by_id(id).await?).await
}

pub async fn create(dto: EquipmentCreate) -> ApiResult<EquipmentDetails> {
    let mut aggregate = Equipment::new_for_insert(dto);
    aggregate.validate().map_err(ApiError::BadRequest)?;
    check_references(&aggregate).await?;

    aggregate.before_write();
    aggregate.id = repository::insert(&aggregate).await?;
    tracing::info!("Equipment '{}' created (id {})", aggregate.name, aggregate.id);
    details(aggregate).await
}

pub async fn update(id: i32, dto: EquipmentUpdate) -> ApiResult<EquipmentDetails> {
    let mut aggregate = get_by_id(id).await?;
    aggregate.apply_update(dto);
    aggregate.validate().map_err(ApiError::BadRequest)?;
    check_references(&aggregate).await?;

    aggregate.before_write();
    repository::update(&aggregate).await?;
    details(aggregate).await
}

/// Deletes the equipment along with its attachment files.
pub async fn delete(id: i32) -> ApiResult<()> {
    get_by_id(id).await?;
    uploads::service::delete_for_equipment(id).await?;
    if !repository::delete(id).await? {
        return Err(not_found());
    }
    tracing::info!("Equipment {} deleted", id);
    Ok(())
}

pub async fn stats() -> ApiResult<EquipmentStats> {
    Ok(EquipmentStats::from_pairs(repository::status_pairs().await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::{test_database, unique};
    use axum::http::StatusCode;
    use contracts::domain::a001_site::aggregate::SiteDto;
    use contracts::domain::a002_production_line::aggregate::ProductionLineDto;

    async fn site() -> i32 {
        a001_site::service::create(SiteDto {
            name: unique("Site"),
            ..Default::default()
        })
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn serial_numbers_are_unique() {
        let _db = test_database().await;
        let serial = unique("SN");
        let first = create(EquipmentCreate {
            name: unique("Tour"),
            serial_number: Some(serial.clone()),
            ..Default::default()
        })
        .await
        .unwrap();

        let err = create(EquipmentCreate {
            name: unique("Tour"),
            serial_number: Some(serial.clone()),
            ..Default::default()
        })
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.detail(), "Un équipement avec ce numéro de série existe déjà");

        // Keeping its own serial on update is fine.
        update(first.equipment.id, EquipmentUpdate::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn line_must_belong_to_the_site() {
        let _db = test_database().await;
        let (site_a, site_b) = (site().await, site().await);
        let line = a002_production_line::service::create(ProductionLineDto {
            site_id: site_a,
            name: unique("Ligne"),
            ..Default::default()
        })
        .await
        .unwrap();

        let err = create(EquipmentCreate {
            name: unique("Robot"),
            site_id: Some(site_b),
            production_line_id: Some(line.id),
            ..Default::default()
        })
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.detail(),
            "La ligne de production ne correspond pas au site spécifié"
        );

        let created = create(EquipmentCreate {
            name: unique("Robot"),
            site_id: Some(site_a),
            production_line_id: Some(line.id),
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(created.production_line_name, Some(line.name));
    }
}
