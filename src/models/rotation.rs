// src/models/rotation.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::scheduling::{RotationCycle, RotationPattern, SchedulingError};

// --- Enums ---

/// As quatro equipes da rotação 10/14. Cada uma é o mesmo padrão deslocado
/// de uma semana dentro do ciclo de 28 dias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "rotation_team", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RotationTeam {
    Vert,
    Bleu,
    Jaune,
    Rouge,
}

impl RotationTeam {
    pub const ALL: [RotationTeam; 4] = [
        RotationTeam::Vert,
        RotationTeam::Bleu,
        RotationTeam::Jaune,
        RotationTeam::Rouge,
    ];

    /// Deslocamento da equipe, em dias, a partir do início do ciclo.
    pub fn offset_days(self) -> u32 {
        match self {
            RotationTeam::Vert => 0,
            RotationTeam::Bleu => 7,
            RotationTeam::Jaune => 14,
            RotationTeam::Rouge => 21,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RotationTeam::Vert => "Vert",
            RotationTeam::Bleu => "Bleu",
            RotationTeam::Jaune => "Jaune",
            RotationTeam::Rouge => "Rouge",
        }
    }
}

impl fmt::Display for RotationTeam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RotationTeam {
    type Err = SchedulingError;

    // Aceita os nomes em francês (como gravados nos documentos antigos) e em inglês.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vert" | "green" => Ok(RotationTeam::Vert),
            "bleu" | "blue" => Ok(RotationTeam::Bleu),
            "jaune" | "yellow" => Ok(RotationTeam::Jaune),
            "rouge" | "red" => Ok(RotationTeam::Rouge),
            _ => Err(SchedulingError::UnknownTeam(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for RotationTeam {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// --- Structs de Configuração ---

/// Configuração da rotação de um tenant (uma linha por caserna).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RotationSettings {
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "2025-01-06")]
    pub cycle_start_date: NaiveDate,
    #[schema(example = 28)]
    pub cycle_length_days: i32,
    #[schema(example = json!([1, 2, 5, 6, 7, 8, 11, 12]))]
    pub working_days: Vec<i32>,
    pub default_shift_type_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl RotationSettings {
    /// Reconstrói o ciclo a partir das colunas gravadas.
    pub fn cycle(&self) -> Result<RotationCycle, SchedulingError> {
        let pattern = RotationPattern::from_columns(self.cycle_length_days, &self.working_days)?;
        Ok(RotationCycle::new(self.cycle_start_date, pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_french_and_english_names() {
        assert_eq!("Jaune".parse::<RotationTeam>().unwrap(), RotationTeam::Jaune);
        assert_eq!(" yellow ".parse::<RotationTeam>().unwrap(), RotationTeam::Jaune);
        assert_eq!("ROUGE".parse::<RotationTeam>().unwrap(), RotationTeam::Rouge);
        assert!(matches!(
            "orange".parse::<RotationTeam>(),
            Err(SchedulingError::UnknownTeam(_))
        ));
    }

    #[test]
    fn offsets_are_one_week_apart() {
        let offsets: Vec<u32> = RotationTeam::ALL.iter().map(|t| t.offset_days()).collect();
        assert_eq!(offsets, vec![0, 7, 14, 21]);
    }

    #[test]
    fn stored_settings_rebuild_the_cycle() {
        let mut settings = RotationSettings {
            tenant_id: Uuid::new_v4(),
            cycle_start_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            cycle_length_days: 28,
            working_days: vec![1, 2, 5, 6, 7, 8, 11, 12],
            default_shift_type_id: None,
            updated_at: Utc::now(),
        };
        let cycle = settings.cycle().unwrap();
        assert_eq!(cycle.pattern(), &RotationPattern::quebec_10_14());

        settings.working_days = vec![0, 3];
        assert!(matches!(settings.cycle(), Err(SchedulingError::InvalidPattern(_))));
    }

    #[test]
    fn deserializes_from_lowercase_json() {
        let team: RotationTeam = serde_json::from_str("\"bleu\"").unwrap();
        assert_eq!(team, RotationTeam::Bleu);
        assert_eq!(serde_json::to_string(&team).unwrap(), "\"Bleu\"");
    }
}
