// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;
use crate::scheduling;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Rotation (sem caserna) ---
        handlers::rotation::calendar,
        handlers::rotation::verify,

        // --- Rotation (por caserna) ---
        handlers::rotation::get_settings,
        handlers::rotation::update_settings,
        handlers::rotation::tenant_calendar,

        // --- Assignments ---
        handlers::assignments::generate,
        handlers::assignments::reconcile,
        handlers::assignments::check,

        // --- Personnel ---
        handlers::personnel::weekly_hours,
        handlers::personnel::generate_availability,

        // --- Import ---
        handlers::imports::import_personnel,
        handlers::imports::import_shift_types,
        handlers::imports::import_assignments,
    ),
    components(
        schemas(
            // --- Modelos ---
            models::rotation::RotationTeam,
            models::rotation::RotationSettings,
            models::personnel::Personnel,
            models::scheduling::DutyCategory,
            models::scheduling::AssignmentOrigin,
            models::scheduling::AvailabilitySource,
            models::scheduling::ShiftType,
            models::scheduling::Assignment,
            models::scheduling::Availability,

            // --- Documentos legados ---
            models::legacy::LegacyPersonnelDocument,
            models::legacy::LegacyShiftTypeDocument,
            models::legacy::LegacyAssignmentDocument,

            // --- Motor de escala ---
            scheduling::rotation::RotationDay,
            scheduling::rotation::RotationDefect,
            scheduling::rotation::RotationVerification,
            scheduling::weekly_hours::WeeklyHours,
            scheduling::weekly_hours::Violation,
            scheduling::planner::SkipReason,
            scheduling::planner::PlannedAssignment,
            scheduling::planner::SkippedDay,
            scheduling::planner::GenerationPlan,
            scheduling::reconciliation::RemovalReason,
            scheduling::reconciliation::RemovedAssignment,
            scheduling::reconciliation::AssignmentConflict,
            scheduling::reconciliation::ReconciliationReport,

            // --- Respostas dos serviços ---
            services::rotation_service::AvailabilityGeneration,
            services::scheduling_service::AssignmentCheck,
            services::scheduling_service::WeeklyHoursReport,
            services::scheduling_service::GenerationOutcome,
            services::scheduling_service::ReconciliationOutcome,

            // --- Payloads ---
            handlers::health::HealthResponse,
            handlers::rotation::TeamCalendar,
            handlers::rotation::VerifyRotationPayload,
            handlers::rotation::UpdateRotationSettingsPayload,
            handlers::assignments::RangeOperationPayload,
            handlers::assignments::CheckAssignmentPayload,
            handlers::personnel::PeriodQuery,
            handlers::imports::PersonnelImportPayload,
            handlers::imports::ShiftTypeImportPayload,
            handlers::imports::AssignmentImportPayload,
        )
    ),
    tags(
        (name = "Health", description = "Estado do serviço"),
        (name = "Rotation", description = "Ciclo 10/14: calendário, verificação e configuração"),
        (name = "Assignments", description = "Geração automática, reconciliação e verificação de gardes"),
        (name = "Personnel", description = "Horas semanais e disponibilidades dos bombeiros"),
        (name = "Import", description = "Importação dos documentos da base antiga")
    )
)]
pub struct ApiDoc;
