// tests/scheduling_db.rs
//
// Testes contra um Postgres real. Só rodam com TEST_DATABASE_URL definida;
// sem ela cada teste retorna cedo. Cada teste cria a sua própria caserna.

use axum::http::StatusCode;
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sqlx::{pool::PoolConnection, postgres::PgPoolOptions, PgPool, Postgres};
use uuid::Uuid;

use firehall_backend::{
    common::error::AppError,
    config::{AppState, Settings},
    db::{PersonnelRepository, ShiftRepository},
    middleware::i18n::Locale,
    models::{
        legacy::{LegacyAssignmentDocument, LegacyPersonnelDocument},
        personnel::{NewPersonnel, Personnel},
        rotation::RotationTeam,
        scheduling::{AssignmentOrigin, DutyCategory, NewAssignment, NewShiftType, ShiftType},
    },
    scheduling::{DateRange, RotationPattern},
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .expect("TEST_DATABASE_URL inacessível");
    sqlx::migrate!().run(&pool).await.expect("migrações");
    Some(pool)
}

struct Firehall {
    state: AppState,
    tenant_id: Uuid,
    conn: PoolConnection<Postgres>,
}

impl Firehall {
    async fn create(pool: &PgPool) -> Self {
        let slug = format!("caserne-{}", Uuid::new_v4().simple());
        let tenant_id: Uuid = sqlx::query_scalar("INSERT INTO tenants (slug, name) VALUES ($1, $2) RETURNING id")
            .bind(&slug)
            .bind("Caserne de test")
            .fetch_one(pool)
            .await
            .unwrap();

        let mut conn = pool.acquire().await.unwrap();
        sqlx::query("SELECT set_config('app.tenant_id', $1, false)")
            .bind(tenant_id.to_string())
            .execute(&mut *conn)
            .await
            .unwrap();

        let settings = Settings {
            database_url: String::new(),
            bind_addr: "127.0.0.1:0".into(),
            max_connections: 4,
            default_max_weekly_hours: Decimal::from(48),
        };
        let state = AppState::with_pool(pool.clone(), &settings).unwrap();

        Self { state, tenant_id, conn }
    }

    async fn shift_type(&mut self, name: &str, start_hour: u32, hours: i64) -> ShiftType {
        ShiftRepository::new()
            .insert_shift_type(
                &mut *self.conn,
                self.tenant_id,
                &NewShiftType {
                    name: name.into(),
                    start_time: NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap(),
                    duration_hours: Decimal::from(hours),
                    category: DutyCategory::Internal,
                },
            )
            .await
            .unwrap()
    }

    async fn firefighter(&mut self, team: RotationTeam) -> Personnel {
        PersonnelRepository::new()
            .insert(
                &mut *self.conn,
                self.tenant_id,
                &NewPersonnel {
                    full_name: "Marie Roy".into(),
                    rotation_team: Some(team),
                    max_weekly_hours: None,
                    accepts_external_shifts: false,
                    competences: vec![],
                },
            )
            .await
            .unwrap()
    }

    async fn configure_rotation(&mut self, default_shift_type_id: Option<Uuid>) {
        self.state
            .rotation_service
            .update_settings(
                &mut *self.conn,
                self.tenant_id,
                date(2025, 1, 6),
                &RotationPattern::quebec_10_14(),
                default_shift_type_id,
            )
            .await
            .unwrap();
    }

    async fn count(&mut self, sql: &str) -> i64 {
        sqlx::query_scalar(sql)
            .bind(self.tenant_id)
            .fetch_one(&mut *self.conn)
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn availability_regeneration_keeps_declared_rows() {
    let Some(pool) = test_pool().await else { return };
    let mut hall = Firehall::create(&pool).await;
    let shift = hall.shift_type("Garde de jour", 7, 12).await;
    hall.configure_rotation(Some(shift.id)).await;
    let marie = hall.firefighter(RotationTeam::Vert).await;

    for day in [date(2025, 1, 6), date(2025, 1, 8)] {
        sqlx::query("INSERT INTO availabilities (tenant_id, personnel_id, date, source) VALUES ($1, $2, $3, 'DECLARED')")
            .bind(hall.tenant_id)
            .bind(marie.id)
            .bind(day)
            .execute(&mut *hall.conn)
            .await
            .unwrap();
    }

    // Duas semanas: dias 1, 2, 5, 6, 7, 8, 11 e 12 do ciclo
    let range = DateRange::new(date(2025, 1, 6), date(2025, 1, 19)).unwrap();
    let first = hall
        .state
        .rotation_service
        .generate_availability(&mut *hall.conn, hall.tenant_id, marie.id, range)
        .await
        .unwrap();
    assert_eq!(first.replaced, 0);
    assert_eq!(first.created.len(), 8);

    let second = hall
        .state
        .rotation_service
        .generate_availability(&mut *hall.conn, hall.tenant_id, marie.id, range)
        .await
        .unwrap();
    assert_eq!(second.replaced, 8);
    assert_eq!(second.created.len(), 8);

    let declared = hall
        .count("SELECT COUNT(*) FROM availabilities WHERE tenant_id = $1 AND source = 'DECLARED'")
        .await;
    let rotation = hall
        .count("SELECT COUNT(*) FROM availabilities WHERE tenant_id = $1 AND source = 'ROTATION'")
        .await;
    assert_eq!((declared, rotation), (2, 8));
}

#[tokio::test]
async fn dry_run_generation_writes_nothing() {
    let Some(pool) = test_pool().await else { return };
    let mut hall = Firehall::create(&pool).await;
    let shift = hall.shift_type("Garde de jour", 7, 12).await;
    hall.configure_rotation(Some(shift.id)).await;
    hall.firefighter(RotationTeam::Vert).await;

    let range = DateRange::new(date(2025, 1, 6), date(2025, 1, 12)).unwrap();
    let preview = hall
        .state
        .scheduling_service
        .generate_assignments(&mut *hall.conn, hall.tenant_id, range, true)
        .await
        .unwrap();

    assert!(preview.dry_run);
    assert_eq!(preview.created, 0);
    assert!(!preview.plan.planned.is_empty());
    assert_eq!(hall.count("SELECT COUNT(*) FROM assignments WHERE tenant_id = $1").await, 0);

    let applied = hall
        .state
        .scheduling_service
        .generate_assignments(&mut *hall.conn, hall.tenant_id, range, false)
        .await
        .unwrap();

    assert_eq!(applied.created, preview.plan.planned.len());
    assert_eq!(
        hall.count("SELECT COUNT(*) FROM assignments WHERE tenant_id = $1 AND origin = 'AUTOMATIC'")
            .await,
        applied.created as i64
    );
}

#[tokio::test]
async fn reconciliation_touches_only_the_requested_range() {
    let Some(pool) = test_pool().await else { return };
    let mut hall = Firehall::create(&pool).await;
    let shift = hall.shift_type("Garde de jour", 7, 12).await;
    let marie = hall.firefighter(RotationTeam::Jaune).await;

    let shifts = ShiftRepository::new();
    for day in [date(2025, 1, 9), date(2025, 1, 9), date(2025, 1, 12), date(2025, 1, 12)] {
        shifts
            .insert_assignment(
                &mut *hall.conn,
                hall.tenant_id,
                &NewAssignment {
                    personnel_id: marie.id,
                    shift_type_id: shift.id,
                    date: day,
                    origin: AssignmentOrigin::Automatic,
                },
            )
            .await
            .unwrap();
    }

    let range = DateRange::new(date(2025, 1, 10), date(2025, 1, 20)).unwrap();
    let preview = hall
        .state
        .scheduling_service
        .reconcile(&mut *hall.conn, hall.tenant_id, range, true)
        .await
        .unwrap();
    assert_eq!(preview.report.removed.len(), 1);
    assert_eq!(preview.deleted, 0);
    assert_eq!(hall.count("SELECT COUNT(*) FROM assignments WHERE tenant_id = $1").await, 4);

    let applied = hall
        .state
        .scheduling_service
        .reconcile(&mut *hall.conn, hall.tenant_id, range, false)
        .await
        .unwrap();
    assert_eq!(applied.deleted, 1);
    // As duplicatas da véspera ficam para a reconciliação do seu próprio período
    assert_eq!(
        hall.count("SELECT COUNT(*) FROM assignments WHERE tenant_id = $1 AND date = '2025-01-09'")
            .await,
        2
    );
    assert_eq!(hall.count("SELECT COUNT(*) FROM assignments WHERE tenant_id = $1").await, 3);
}

#[tokio::test]
async fn generation_without_default_shift_type_is_a_conflict() {
    let Some(pool) = test_pool().await else { return };
    let mut hall = Firehall::create(&pool).await;
    hall.configure_rotation(None).await;
    hall.firefighter(RotationTeam::Bleu).await;

    let range = DateRange::new(date(2025, 1, 6), date(2025, 1, 12)).unwrap();
    let err = hall
        .state
        .scheduling_service
        .generate_assignments(&mut *hall.conn, hall.tenant_id, range, false)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DefaultShiftTypeMissing));
    let api = err.to_api_error(&Locale("en".into()), &hall.state.i18n_store);
    assert_eq!(api.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn import_batches_are_all_or_nothing() {
    let Some(pool) = test_pool().await else { return };
    let mut hall = Firehall::create(&pool).await;
    let shift = hall.shift_type("Garde de nuit", 17, 14).await;
    let marie = hall.firefighter(RotationTeam::Rouge).await;

    // Conversão falha antes de qualquer escrita
    let people = vec![
        LegacyPersonnelDocument {
            prenom: Some("Luc".into()),
            nom: Some("Gagnon".into()),
            equipe_garde: Some("Bleu".into()),
            heures_max_semaine: None,
            accepte_gardes_externes: None,
            competences: None,
            formations: None,
        },
        LegacyPersonnelDocument {
            prenom: None,
            nom: None,
            equipe_garde: Some("Vert".into()),
            heures_max_semaine: None,
            accepte_gardes_externes: None,
            competences: None,
            formations: None,
        },
    ];
    let err = hall
        .state
        .import_service
        .import_personnel(&mut *hall.conn, hall.tenant_id, people)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Scheduling(_)));
    assert_eq!(hall.count("SELECT COUNT(*) FROM personnel WHERE tenant_id = $1").await, 1);

    // Referência desconhecida: o primeiro documento já inserido volta atrás
    let assignments = vec![
        LegacyAssignmentDocument {
            user_id: marie.id,
            type_garde_id: shift.id,
            date: date(2025, 1, 20),
            assignation_type: None,
        },
        LegacyAssignmentDocument {
            user_id: Uuid::new_v4(),
            type_garde_id: shift.id,
            date: date(2025, 1, 21),
            assignation_type: Some("auto".into()),
        },
    ];
    let err = hall
        .state
        .import_service
        .import_assignments(&mut *hall.conn, hall.tenant_id, assignments)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UnknownReference));
    assert_eq!(hall.count("SELECT COUNT(*) FROM assignments WHERE tenant_id = $1").await, 0);
}
