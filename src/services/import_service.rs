// src/services/import_service.rs
//
// Importação dos documentos da base antiga. Cada lote é convertido por inteiro
// antes de qualquer escrita e gravado numa única transação.

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PersonnelRepository, ShiftRepository},
    models::{
        legacy::{LegacyAssignmentDocument, LegacyPersonnelDocument, LegacyShiftTypeDocument},
        personnel::{NewPersonnel, Personnel},
        scheduling::{Assignment, NewAssignment, NewShiftType, ShiftType},
    },
    scheduling::SchedulingError,
};

/// Converte o lote inteiro, registrando a posição do primeiro documento inválido.
fn convert_all<D, T>(tenant_id: Uuid, kind: &str, docs: Vec<D>) -> Result<Vec<T>, AppError>
where
    T: TryFrom<D, Error = SchedulingError>,
{
    docs.into_iter()
        .enumerate()
        .map(|(index, doc)| {
            T::try_from(doc).map_err(|e| {
                tracing::warn!(%tenant_id, kind, index, error = %e, "documento legado rejeitado");
                AppError::from(e)
            })
        })
        .collect()
}

#[derive(Clone)]
pub struct ImportService {
    personnel_repo: PersonnelRepository,
    shift_repo: ShiftRepository,
}

impl ImportService {
    pub fn new(personnel_repo: PersonnelRepository, shift_repo: ShiftRepository) -> Self {
        Self {
            personnel_repo,
            shift_repo,
        }
    }

    pub async fn import_personnel<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        docs: Vec<LegacyPersonnelDocument>,
    ) -> Result<Vec<Personnel>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let rows: Vec<NewPersonnel> = convert_all(tenant_id, "personnel", docs)?;

        let mut tx = executor.begin().await?;
        let mut created = Vec::with_capacity(rows.len());
        for row in &rows {
            created.push(self.personnel_repo.insert(&mut *tx, tenant_id, row).await?);
        }
        tx.commit().await?;

        tracing::info!(%tenant_id, imported = created.len(), "bombeiros importados");
        Ok(created)
    }

    pub async fn import_shift_types<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        docs: Vec<LegacyShiftTypeDocument>,
    ) -> Result<Vec<ShiftType>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let rows: Vec<NewShiftType> = convert_all(tenant_id, "shift_type", docs)?;

        let mut tx = executor.begin().await?;
        let mut created = Vec::with_capacity(rows.len());
        for row in &rows {
            created.push(self.shift_repo.insert_shift_type(&mut *tx, tenant_id, row).await?);
        }
        tx.commit().await?;

        tracing::info!(%tenant_id, imported = created.len(), "tipos de garde importados");
        Ok(created)
    }

    /// Origem ausente vira manual; referências desconhecidas abortam o lote inteiro.
    pub async fn import_assignments<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        docs: Vec<LegacyAssignmentDocument>,
    ) -> Result<Vec<Assignment>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let rows: Vec<NewAssignment> = convert_all(tenant_id, "assignment", docs)?;

        let mut tx = executor.begin().await?;
        let mut created = Vec::with_capacity(rows.len());
        for row in &rows {
            created.push(self.shift_repo.insert_assignment(&mut *tx, tenant_id, row).await?);
        }
        tx.commit().await?;

        tracing::info!(%tenant_id, imported = created.len(), "assignações importadas");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::models::rotation::RotationTeam;

    fn personnel_doc(value: serde_json::Value) -> LegacyPersonnelDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn one_bad_document_rejects_the_whole_batch() {
        let docs = vec![
            personnel_doc(json!({ "prenom": "Marie", "nom": "Roy", "equipe_garde": "Vert" })),
            personnel_doc(json!({ "nom": "Gagnon", "equipe_garde": "violet" })),
            personnel_doc(json!({ "nom": "Côté" })),
        ];

        let result: Result<Vec<NewPersonnel>, AppError> = convert_all(Uuid::nil(), "personnel", docs);

        assert!(matches!(
            result,
            Err(AppError::Scheduling(SchedulingError::UnknownTeam(team))) if team == "violet"
        ));
    }

    #[test]
    fn valid_batch_keeps_document_order() {
        let docs = vec![
            personnel_doc(json!({ "nom": "Roy", "equipe_garde": "rouge" })),
            personnel_doc(json!({ "nom": "Côté" })),
        ];

        let rows: Vec<NewPersonnel> = convert_all(Uuid::nil(), "personnel", docs).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rotation_team, Some(RotationTeam::Rouge));
        assert_eq!(rows[1].full_name, "Côté");
        assert_eq!(rows[1].rotation_team, None);
    }
}
