use anyhow::Result;
use chrono::{Duration, NaiveTime, Utc};
use contracts::domain::a001_site::aggregate::SiteDto;
use contracts::domain::a002_production_line::aggregate::ProductionLineDto;
use contracts::domain::a003_equipment::aggregate::EquipmentCreate;
use contracts::domain::a004_maintenance_plan::aggregate::{MaintenancePlanCreate, MaintenanceTaskDto};
use contracts::domain::a005_scheduled_maintenance::aggregate::ScheduledMaintenanceCreate;
use contracts::domain::a006_intervention::aggregate::{
    CompleteInterventionRequest, InterventionCreate, PartUsed,
};
use contracts::enums::{Criticality, EquipmentStatus, MaintenanceStatus, MaintenanceType, Priority, UserRole};
use contracts::system::auth::{RegisterRequest, UserInfo};
use serde_json::json;

use crate::domain::{
    a001_site, a002_production_line, a003_equipment, a004_maintenance_plan,
    a005_scheduled_maintenance, a006_intervention,
};
use crate::shared::config;
use crate::system::users::{repository as user_repository, service as user_service};

const DEMO_PASSWORD: &str = "password123";

/// Creates the configured administrator if the database has none.
pub async fn ensure_admin_user_exists() -> Result<()> {
    let auth = &config::get().auth;
    user_service::ensure_admin(&auth.admin_username, &auth.admin_password).await
}

async fn demo_user(
    username: &str,
    first_name: &str,
    last_name: &str,
    role: UserRole,
) -> Result<UserInfo> {
    if let Some(model) = user_repository::get_model_by_username(username).await? {
        if let Some(user) = user_repository::get_by_id(model.id).await? {
            return Ok(user);
        }
    }
    Ok(user_service::register(RegisterRequest {
        username: username.to_string(),
        email: format!("{}@usine-demo.fr", username),
        password: DEMO_PASSWORD.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        role,
    })
    .await?)
}

fn task(name: &str, minutes: i32, skills: &[&str], tools: &[&str], safety: &[&str]) -> MaintenanceTaskDto {
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
    MaintenanceTaskDto {
        name: name.to_string(),
        estimated_duration: minutes,
        required_skills: owned(skills),
        tools_required: owned(tools),
        safety_requirements: owned(safety),
        ..Default::default()
    }
}

/// Fills an empty database with a small plant: sites, lines, equipment,
/// plans, scheduled occurrences and interventions in every state.
///
/// Returns `false` when data is already present.
pub async fn seed_demo_data() -> Result<bool> {
    if a001_site::repository::count().await? > 0 {
        tracing::info!("Demo data skipped: sites already present");
        return Ok(false);
    }
    tracing::info!("Seeding demo data...");

    let admin = match user_repository::get_model_by_username(&config::get().auth.admin_username).await? {
        Some(model) => user_repository::get_by_id(model.id).await?,
        None => None,
    };
    let supervisor = demo_user("superviseur", "Claire", "Durand", UserRole::Supervisor).await?;
    let tech1 = demo_user("technicien1", "Luc", "Moreau", UserRole::Technician).await?;
    let tech2 = demo_user("technicien2", "Sophie", "Bernard", UserRole::Technician).await?;

    let lyon = a001_site::service::create(SiteDto {
        name: "Usine de Lyon".into(),
        location: Some("Lyon, Rhône".into()),
        description: Some("Site principal d'assemblage".into()),
    })
    .await?;
    let nantes = a001_site::service::create(SiteDto {
        name: "Usine de Nantes".into(),
        location: Some("Nantes, Loire-Atlantique".into()),
        description: None,
    })
    .await?;

    let assembly = a002_production_line::service::create(ProductionLineDto {
        site_id: lyon.id,
        name: "Ligne d'assemblage A".into(),
        description: Some("Assemblage des carters".into()),
    })
    .await?;
    let packaging = a002_production_line::service::create(ProductionLineDto {
        site_id: nantes.id,
        name: "Ligne de conditionnement".into(),
        description: None,
    })
    .await?;

    let today = Utc::now().date_naive();
    let equipment_specs = [
        ("Presse hydraulique P-200", "P-200", "SN-P200-001", "Bosch Rexroth", Some(assembly.id), lyon.id, EquipmentStatus::Active, Criticality::Critical, json!({"pression": "200 bar", "puissance": "45 kW"})),
        ("Robot de soudure R-12", "IRB 1600", "SN-R12-014", "ABB", Some(assembly.id), lyon.id, EquipmentStatus::Active, Criticality::High, json!({"axes": 6, "charge": "10 kg"})),
        ("Compresseur C-50", "GA 30", "SN-C50-230", "Atlas Copco", None, lyon.id, EquipmentStatus::Maintenance, Criticality::Medium, json!({"débit": "5 m³/min"})),
        ("Convoyeur à bande CB-3", "CB-3000", "SN-CB3-077", "Interroll", Some(packaging.id), nantes.id, EquipmentStatus::Active, Criticality::Medium, json!({"longueur": "30 m"})),
        ("Étiqueteuse E-7", "Alpha Compact", "SN-E7-502", "Herma", Some(packaging.id), nantes.id, EquipmentStatus::Broken, Criticality::High, json!({"cadence": "120 étiquettes/min"})),
        ("Chariot élévateur F-2", "EFG 216", "SN-F2-811", "Jungheinrich", None, nantes.id, EquipmentStatus::Inactive, Criticality::Low, json!({"capacité": "1,6 t"})),
    ];

    let mut equipment = Vec::new();
    for (name, model, serial, manufacturer, line, site, status, criticality, specs) in equipment_specs {
        let created = a003_equipment::service::create(EquipmentCreate {
            name: name.into(),
            model: Some(model.into()),
            serial_number: Some(serial.into()),
            manufacturer: Some(manufacturer.into()),
            purchase_date: Some(today - Duration::days(3 * 365)),
            installation_date: Some(today - Duration::days(3 * 365 - 30)),
            warranty_expiry: Some(today + Duration::days(365)),
            expected_lifespan: Some(15),
            site_id: Some(site),
            production_line_id: line,
            status,
            criticality,
            specifications: specs.as_object().cloned(),
        })
        .await?;
        equipment.push(created.equipment);
    }

    let press_plan = a004_maintenance_plan::service::create(MaintenancePlanCreate {
        name: "Révision mensuelle presse".into(),
        description: Some("Contrôle hydraulique et graissage".into()),
        equipment_id: equipment[0].id,
        maintenance_type: MaintenanceType::Preventive,
        frequency_days: 30,
        estimated_duration: 180,
        priority: Priority::High,
        is_active: true,
        next_due_date: Some(today + Duration::days(2)),
        tasks: vec![
            task("Consignation de la presse", 15, &["Habilitation électrique"], &["Cadenas"], &["Consignation LOTO"]),
            task("Contrôle des niveaux d'huile", 30, &["Hydraulique"], &["Jauge"], &[]),
            task("Graissage des glissières", 45, &[], &["Pompe à graisse"], &["Gants"]),
            task("Essai à vide", 20, &["Conduite presse"], &[], &["Zone balisée"]),
        ],
    })
    .await?;
    let robot_plan = a004_maintenance_plan::service::create(MaintenancePlanCreate {
        name: "Inspection trimestrielle robot".into(),
        description: None,
        equipment_id: equipment[1].id,
        maintenance_type: MaintenanceType::Predictive,
        frequency_days: 90,
        estimated_duration: 120,
        priority: Priority::Medium,
        is_active: true,
        next_due_date: Some(today + Duration::days(10)),
        tasks: vec![
            task("Analyse vibratoire des axes", 60, &["Analyse vibratoire"], &["Capteur"], &[]),
            task("Contrôle des câbles", 30, &[], &[], &["Robot à l'arrêt"]),
        ],
    })
    .await?;
    a004_maintenance_plan::service::create(MaintenancePlanCreate {
        name: "Nettoyage convoyeur".into(),
        description: None,
        equipment_id: equipment[3].id,
        maintenance_type: MaintenanceType::Preventive,
        frequency_days: 7,
        estimated_duration: 60,
        priority: Priority::Low,
        is_active: false,
        next_due_date: None,
        tasks: vec![task("Nettoyage de la bande", 60, &[], &["Brosse"], &[])],
    })
    .await?;

    let slot = |h: u32| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or_default();

    // Next press occurrence, assigned to the first technician
    let upcoming = a004_maintenance_plan::service::generate_next(press_plan.id).await?;
    a005_scheduled_maintenance::service::assign(upcoming.maintenance.id, tech1.id).await?;
    a004_maintenance_plan::service::generate_next(robot_plan.id).await?;

    let late = a005_scheduled_maintenance::service::create(ScheduledMaintenanceCreate {
        maintenance_plan_id: robot_plan.id,
        equipment_id: equipment[1].id,
        scheduled_date: today - Duration::days(3),
        estimated_start_time: slot(9),
        estimated_end_time: slot(11),
        assigned_technician_id: Some(tech2.id),
        status: MaintenanceStatus::Scheduled,
        priority: Priority::High,
        notes: Some("Reportée faute de pièces".into()),
    })
    .await?;

    let past = a005_scheduled_maintenance::service::create(ScheduledMaintenanceCreate {
        maintenance_plan_id: press_plan.id,
        equipment_id: equipment[0].id,
        scheduled_date: today - Duration::days(1),
        estimated_start_time: slot(8),
        estimated_end_time: slot(11),
        assigned_technician_id: Some(tech1.id),
        status: MaintenanceStatus::Scheduled,
        priority: Priority::High,
        notes: None,
    })
    .await?;

    // Interventions walking through the workflow
    let manager = admin.unwrap_or_else(|| supervisor.clone());

    let done = a006_intervention::service::create(InterventionCreate {
        scheduled_maintenance_id: Some(past.maintenance.id),
        equipment_id: equipment[0].id,
        technician_id: tech1.id,
        maintenance_type: MaintenanceType::Preventive,
        priority: Priority::High,
        description: "Révision mensuelle de la presse".into(),
        scheduled_date: None,
    })
    .await?;
    let id = done.intervention.id;
    a006_intervention::service::assign(id, tech1.id, &manager).await?;
    a006_intervention::service::start(id, &tech1).await?;
    a006_intervention::service::complete(
        id,
        CompleteInterventionRequest {
            work_performed: "Niveaux complétés, glissières graissées".into(),
            issues_found: Some("Léger suintement sur le vérin principal".into()),
            recommendations: Some("Prévoir le remplacement du joint".into()),
            labor_cost: Some(18_000),
            parts_used: vec![PartUsed {
                part_name: "Huile hydraulique HLP 46 (20 L)".into(),
                quantity: 1,
                unit_cost: 9_500,
            }],
        },
        &tech1,
    )
    .await?;

    let breakdown = a006_intervention::service::create(InterventionCreate {
        scheduled_maintenance_id: None,
        equipment_id: equipment[4].id,
        technician_id: tech2.id,
        maintenance_type: MaintenanceType::Corrective,
        priority: Priority::Critical,
        description: "Étiqueteuse bloquée, rouleau d'entraînement cassé".into(),
        scheduled_date: Some(today),
    })
    .await?;
    a006_intervention::service::assign(breakdown.intervention.id, tech2.id, &manager).await?;
    a006_intervention::service::start(breakdown.intervention.id, &tech2).await?;

    a006_intervention::service::create(InterventionCreate {
        scheduled_maintenance_id: Some(late.maintenance.id),
        equipment_id: equipment[1].id,
        technician_id: tech2.id,
        maintenance_type: MaintenanceType::Predictive,
        priority: Priority::Medium,
        description: "Inspection du robot de soudure".into(),
        scheduled_date: Some(today + Duration::days(1)),
    })
    .await?;

    tracing::info!(
        "Demo data ready: 2 sites, {} equipment, 3 plans (password of demo accounts: {})",
        equipment.len(),
        DEMO_PASSWORD
    );
    Ok(true)
}
