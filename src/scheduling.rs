//! Motor de escala: rotação 10/14, teto semanal, reconciliação e geração
//! automática. Tudo aqui é puro (sem banco); os serviços fazem a I/O.

pub mod error;
pub mod planner;
pub mod reconciliation;
pub mod rotation;
pub mod weekly_hours;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::SchedulingError;
pub use planner::{GenerationPlan, RotationPlanner};
pub use reconciliation::{ReconciliationReport, reconcile, reconcile_in};
pub use rotation::{DateRange, RotationCycle, RotationPattern, RotationVerification};
pub use weekly_hours::{HoursPolicy, Violation, WeeklyHours};
