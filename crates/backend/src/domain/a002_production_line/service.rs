use contracts::domain::a002_production_line::aggregate::{
    ProductionLine, ProductionLineDetails, ProductionLineDto, ProductionLineQuery,
};

use super::repository;
use crate::domain::{a001_site, a003_equipment};
use crate::shared::error::{ApiError, ApiResult};

fn not_found() -> ApiError {
    ApiError::not_found("Ligne de production non trouvée")
}

async fn check(line: &ProductionLine, except_id: Option<i32>) -> ApiResult<()> {
    line.validate().map_err(ApiError::BadRequest)?;
    a001_site::service::get_by_id(line.site_id).await?;
    if let Some(existing) = repository::find_by_name(line.site_id, &line.name).await? {
        if Some(existing.id) != except_id {
            return Err(ApiError::bad_request(
                "Une ligne avec ce nom existe déjà sur ce site",
            ));
        }
    }
    Ok(())
}

pub async fn list(query: &ProductionLineQuery) -> ApiResult<Vec<ProductionLine>> {
    let page = query.page();
    Ok(repository::list(query.site_id, page.skip, page.limit).await?)
}

pub async fn get_by_id(id: i32) -> ApiResult<ProductionLine> {
    repository::get_by_id(id).await?.ok_or_else(not_found)
}

pub async fn get_details(id: i32) -> ApiResult<ProductionLineDetails> {
    let line = get_by_id(id).await?;
    let site_name = a001_site::repository::get_by_id(line.site_id)
        .await?
        .map(|s| s.name);
    let equipment_count = a003_equipment::repository::count_by_line(id).await?;
    Ok(ProductionLineDetails {
        line,
        site_name,
        equipment_count,
    })
}

pub async fn create(dto: ProductionLineDto) -> ApiResult<ProductionLine> {
    let mut aggregate = ProductionLine::new_for_insert(&dto);
    check(&aggregate, None).await?;

    aggregate.before_write();
    aggregate.id = repository::insert(&aggregate).await?;
    Ok(aggregate)
}

pub async fn update(id: i32, dto: ProductionLineDto) -> ApiResult<ProductionLine> {
    let mut aggregate = get_by_id(id).await?;
    aggregate.update(&dto);
    check(&aggregate, Some(id)).await?;

    aggregate.before_write();
    repository::update(&aggregate).await?;
    Ok(aggregate)
}

pub async fn delete(id: i32) -> ApiResult<()> {
    get_by_id(id).await?;
    let equipment_count = a003_equipment::repository::count_by_line(id).await?;
    if equipment_count > 0 {
        return Err(ApiError::bad_request(format!(
            "Impossible de supprimer la ligne : {} équipement(s) associé(s)",
            equipment_count
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
    use contracts::domain::a001_site::aggregate::SiteDto;
    use contracts::domain::a003_equipment::aggregate::EquipmentCreate;

    #[tokio::test]
    async fn line_with_equipment_cannot_be_deleted() {
        let _db = test_database().await;
        let site = a001_site::service::create(SiteDto {
            name: unique("Usine"),
            ..Default::default()
        })
        .await
        .unwrap();
        let line = create(ProductionLineDto {
            site_id: site.id,
            name: unique("Ligne"),
            ..Default::default()
        })
        .await
        .unwrap();
        let equipment = a003_equipment::service::create(EquipmentCreate {
            name: unique("Convoyeur"),
            site_id: Some(site.id),
            production_line_id: Some(line.id),
            ..Default::default()
        })
        .await
        .unwrap();

        let err = delete(line.id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.detail(),
            "Impossible de supprimer la ligne : 1 équipement(s) associé(s)"
        );

        a003_equipment::service::delete(equipment.equipment.id).await.unwrap();
        delete(line.id).await.unwrap();
    }
}
