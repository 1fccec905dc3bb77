use contracts::domain::a001_site::aggregate::{Site, SiteDetails, SiteDto};
use contracts::domain::common::ListQuery;

use super::repository;
use crate::domain::{a002_production_line, a003_equipment};
use crate::shared::error::{ApiError, ApiResult};

fn not_found() -> ApiError {
    ApiError::not_found("Site non trouvé")
}

async fn ensure_unique_name(name: &str, except_id: Option<i32>) -> ApiResult<()> {
    if let Some(existing) = repository::find_by_name(name).await? {
        if Some(existing.id) != except_id {
            return Err(ApiError::bad_request("Un site avec ce nom existe déjà"));
        }
    }
    Ok(())
}

pub async fn list(page: ListQuery) -> ApiResult<Vec<Site>> {
    let page = page.normalized();
    Ok(repository::list(page.skip, page.limit).await?)
}

pub async fn get_by_id(id: i32) -> ApiResult<Site> {
    repository::get_by_id(id).await?.ok_or_else(not_found)
}

/// Site with equipment and production line counts
pub async fn get_details(id: i32) -> ApiResult<SiteDetails> {
    let site = get_by_id(id).await?;
    let equipment_count = a003_equipment::repository::count_by_site(id).await?;
    let production_line_count = a002_production_line::repository::count_by_site(id).await?;
    Ok(SiteDetails {
        site,
        equipment_count,
        production_line_count,
    })
}

pub async fn create(dto: SiteDto) -> ApiResult<Site> {
    let mut aggregate = Site::new_for_insert(&dto);
    aggregate.validate().map_err(ApiError::BadRequest)?;
    ensure_unique_name(&aggregate.name, None).await?;

    aggregate.before_write();
    aggregate.id = repository::insert(&aggregate).await?;
    tracing::info!("Site '{}' created (id {})", aggregate.name, aggregate.id);
    Ok(aggregate)
}

pub async fn update(id: i32, dto: SiteDto) -> ApiResult<Site> {
    let mut aggregate = get_by_id(id).await?;
    aggregate.update(&dto);
    aggregate.validate().map_err(ApiError::BadRequest)?;
    ensure_unique_name(&aggregate.name, Some(id)).await?;

    aggregate.before_write();
    repository::update(&aggregate).await?;
    Ok(aggregate)
}

/// Refused while equipment or production lines are attached.
pub async fn delete(id: i32) -> ApiResult<()> {
    get_by_id(id).await?;

    let equipment_count = a003_equipment::repository::count_by_site(id).await?;
    if equipment_count > 0 {
        return Err(ApiError::bad_request(format!(
            "Impossible de supprimer le site : {} équipement(s) associé(s)",
            equipment_count
        )));
    }
    let line_count = a002_production_line::repository::count_by_site(id).await?;
    if line_count > 0 {
        return Err(ApiError::bad_request(format!(
            "Impossible de supprimer le site : {} ligne(s) de production associée(s)",
            line_count
        )));
    }

    repository::delete(id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::{test_database, unique};
    use axum::http::StatusCode;
    use contracts::domain::a002_production_line::aggregate::ProductionLineDto;
    use contracts::domain::a003_equipment::aggregate::EquipmentCreate;

    #[tokio::test]
    async fn site_in_use_cannot_be_deleted() {
        let _db = test_database().await;
        let site = create(SiteDto {
            name: unique("Usine"),
            ..Default::default()
        })
        .await
        .unwrap();
        let line = a002_production_line::service::create(ProductionLineDto {
            site_id: site.id,
            name: unique("Ligne"),
            ..Default::default()
        })
        .await
        .unwrap();

        let err = delete(site.id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.detail().contains("1 ligne(s) de production"));

        a002_production_line::service::delete(line.id).await.unwrap();
        a003_equipment::service::create(EquipmentCreate {
            name: unique("Compresseur"),
            site_id: Some(site.id),
            ..Default::default()
        })
        .await
        .unwrap();

        let err = delete(site.id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.detail().contains("1 équipement(s)"));
    }

    #[tokio::test]
    async fn empty_site_is_deleted() {
        let _db = test_database().await;
        let site = create(SiteDto {
            name: unique("Entrepôt"),
            ..Default::default()
        })
        .await
        .unwrap();

        delete(site.id).await.unwrap();
        assert_eq!(get_by_id(site.id).await.unwrap_err().status(), StatusCode::NOT_FOUND);
    }
}
