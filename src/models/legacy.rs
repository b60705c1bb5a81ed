// src/models/legacy.rs
//
// Documentos do banco antigo (campos opcionais, nomes em francês) e a
// conversão para as estruturas validadas.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{
    personnel::NewPersonnel,
    rotation::RotationTeam,
    scheduling::{AssignmentOrigin, DutyCategory, NewAssignment, NewShiftType},
};
use crate::scheduling::SchedulingError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LegacyPersonnelDocument {
    #[schema(example = "Sébastien")]
    pub prenom: Option<String>,
    #[schema(example = "Tremblay")]
    pub nom: Option<String>,
    #[schema(example = "Jaune")]
    pub equipe_garde: Option<String>,
    pub heures_max_semaine: Option<Decimal>,
    pub accepte_gardes_externes: Option<bool>,
    // As competências ficaram duplicadas entre estes dois campos
    pub competences: Option<Vec<String>>,
    pub formations: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LegacyShiftTypeDocument {
    #[schema(example = "Garde de nuit")]
    pub nom: String,
    #[schema(example = "17:00")]
    pub heure_debut: String,
    #[schema(example = 14.0)]
    pub duree_heures: Decimal,
    #[serde(default)]
    pub est_garde_externe: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LegacyAssignmentDocument {
    pub user_id: Uuid,
    pub type_garde_id: Uuid,
    #[schema(example = "2025-01-20")]
    pub date: NaiveDate,
    #[schema(example = "auto")]
    pub assignation_type: Option<String>,
}

/// Junta as listas, normaliza (trim + minúsculas) e remove duplicatas
/// preservando a ordem da primeira ocorrência.
pub fn merge_competences<'a>(sources: impl IntoIterator<Item = &'a [String]>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for value in sources.into_iter().flatten() {
        let normalized = value.trim().to_lowercase();
        if !normalized.is_empty() && !merged.contains(&normalized) {
            merged.push(normalized);
        }
    }
    merged
}

pub fn parse_origin(raw: Option<&str>) -> Result<AssignmentOrigin, SchedulingError> {
    match raw.map(|r| r.trim().to_lowercase()).as_deref() {
        Some("auto") | Some("automatique") | Some("automatic") => Ok(AssignmentOrigin::Automatic),
        // Ausente ou nulo: tratada como manual para que uma nova geração não a apague.
        None | Some("") | Some("manuel") | Some("manual") => Ok(AssignmentOrigin::Manual),
        Some(other) => Err(SchedulingError::UnknownOrigin(other.to_string())),
    }
}

impl TryFrom<LegacyPersonnelDocument> for NewPersonnel {
    type Error = SchedulingError;

    fn try_from(doc: LegacyPersonnelDocument) -> Result<Self, Self::Error> {
        let full_name = [doc.prenom.as_deref(), doc.nom.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full_name.is_empty() {
            return Err(SchedulingError::InvalidDocument("personnel without prenom/nom".into()));
        }

        let rotation_team = match doc.equipe_garde.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<RotationTeam>()?),
        };

        if let Some(cap) = doc.heures_max_semaine {
            if cap <= Decimal::ZERO || cap > Decimal::from(168) {
                return Err(SchedulingError::InvalidDocument(format!("heures_max_semaine {cap} out of range")));
            }
        }

        let competences = merge_competences(
            [doc.competences.as_deref(), doc.formations.as_deref()]
                .into_iter()
                .flatten(),
        );

        Ok(NewPersonnel {
            full_name,
            rotation_team,
            max_weekly_hours: doc.heures_max_semaine,
            accepts_external_shifts: doc.accepte_gardes_externes.unwrap_or(false),
            competences,
        })
    }
}

impl TryFrom<LegacyShiftTypeDocument> for NewShiftType {
    type Error = SchedulingError;

    fn try_from(doc: LegacyShiftTypeDocument) -> Result<Self, Self::Error> {
        let name = doc.nom.trim().to_string();
        if name.is_empty() {
            return Err(SchedulingError::InvalidDocument("shift type without nom".into()));
        }

        let raw_time = doc.heure_debut.trim();
        let start_time = NaiveTime::parse_from_str(raw_time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw_time, "%H:%M:%S"))
            .map_err(|_| SchedulingError::InvalidDocument(format!("invalid heure_debut '{raw_time}'")))?;

        if doc.duree_heures <= Decimal::ZERO || doc.duree_heures > Decimal::from(24) {
            return Err(SchedulingError::InvalidDuration(doc.duree_heures));
        }

        Ok(NewShiftType {
            name,
            start_time,
            duration_hours: doc.duree_heures,
            category: if doc.est_garde_externe {
                DutyCategory::External
            } else {
                DutyCategory::Internal
            },
        })
    }
}

impl TryFrom<LegacyAssignmentDocument> for NewAssignment {
    type Error = SchedulingError;

    fn try_from(doc: LegacyAssignmentDocument) -> Result<Self, Self::Error> {
        Ok(NewAssignment {
            personnel_id: doc.user_id,
            shift_type_id: doc.type_garde_id,
            date: doc.date,
            origin: parse_origin(doc.assignation_type.as_deref())?,
        })
    }
}
