// src/scheduling/rotation.rs
//
// Aritmética do ciclo de rotação: um padrão fixo de dias trabalhados dentro
// de um ciclo (28 dias no 10/14 de Québec), deslocado por equipe.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::rotation::RotationTeam;
use crate::scheduling::error::{Result, SchedulingError};

pub const CYCLE_LENGTH_DAYS: u32 = 28;

/// Dias trabalhados (base 1) da equipe Vert no ciclo 10/14.
pub const QUEBEC_10_14_WORKING_DAYS: [u32; 8] = [1, 2, 5, 6, 7, 8, 11, 12];

/// Limite de um intervalo consultável (~10 anos).
pub const MAX_RANGE_DAYS: i64 = 3660;

/// Anos aceitos nas datas de um intervalo.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

// =========================================================================
//  INTERVALO DE DATAS
// =========================================================================

/// Intervalo fechado `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        for date in [start, end] {
            if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
                return Err(SchedulingError::DateOutOfBounds(date));
            }
        }
        if end < start {
            return Err(SchedulingError::InvertedRange { start, end });
        }
        let days = (end - start).num_days() + 1;
        if days > MAX_RANGE_DAYS {
            return Err(SchedulingError::RangeTooLong { days, max: MAX_RANGE_DAYS });
        }
        Ok(Self { start, end })
    }

    /// Ano civil completo.
    pub fn year(year: i32) -> Result<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(SchedulingError::InvalidYear(year));
        }
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(SchedulingError::InvalidYear(year))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(SchedulingError::InvalidYear(year))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.len_days() as usize)
    }

    /// Mesmo intervalo começando `days` dias antes.
    pub fn extended_back(&self, days: u64) -> Self {
        let start = self.start.checked_sub_days(Days::new(days)).unwrap_or(self.start);
        Self { start, end: self.end }
    }

    pub fn extended_forward(&self, days: u64) -> Self {
        let end = self.end.checked_add_days(Days::new(days)).unwrap_or(self.end);
        Self { start: self.start, end }
    }
}

// =========================================================================
//  PADRÃO
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPattern {
    cycle_length: u32,
    working_days: BTreeSet<u32>,
}

impl RotationPattern {
    pub fn new(cycle_length: u32, working_days: impl IntoIterator<Item = u32>) -> Result<Self> {
        if cycle_length == 0 {
            return Err(SchedulingError::InvalidPattern("cycle length must be positive".into()));
        }

        let working_days: BTreeSet<u32> = working_days.into_iter().collect();
        if working_days.is_empty() {
            return Err(SchedulingError::InvalidPattern("at least one working day is required".into()));
        }
        if let Some(bad) = working_days.iter().find(|d| **d == 0 || **d > cycle_length) {
            return Err(SchedulingError::InvalidPattern(format!(
                "day {bad} is outside the cycle 1..={cycle_length}"
            )));
        }

        Ok(Self { cycle_length, working_days })
    }

    /// Converte a representação persistida (colunas INT) num padrão validado.
    pub fn from_columns(cycle_length: i32, working_days: &[i32]) -> Result<Self> {
        let length = u32::try_from(cycle_length)
            .map_err(|_| SchedulingError::InvalidPattern(format!("invalid cycle length {cycle_length}")))?;
        let days = working_days
            .iter()
            .map(|d| {
                u32::try_from(*d)
                    .map_err(|_| SchedulingError::InvalidPattern(format!("invalid working day {d}")))
            })
            .collect::<Result<Vec<u32>>>()?;
        Self::new(length, days)
    }

    /// Parte do padrão 10/14 e substitui o que vier informado.
    pub fn with_overrides(cycle_length: Option<i32>, working_days: Option<&[i32]>) -> Result<Self> {
        match (cycle_length, working_days) {
            (None, None) => Ok(Self::quebec_10_14()),
            (length, days) => {
                let default_days: Vec<i32> = QUEBEC_10_14_WORKING_DAYS.iter().map(|d| *d as i32).collect();
                Self::from_columns(
                    length.unwrap_or(CYCLE_LENGTH_DAYS as i32),
                    days.unwrap_or(&default_days),
                )
            }
        }
    }

    pub fn quebec_10_14() -> Self {
        Self {
            cycle_length: CYCLE_LENGTH_DAYS,
            working_days: QUEBEC_10_14_WORKING_DAYS.iter().copied().collect(),
        }
    }

    pub fn cycle_length(&self) -> u32 {
        self.cycle_length
    }

    /// Número de dias trabalhados por ciclo.
    pub fn working_days_per_cycle(&self) -> u32 {
        self.working_days.len() as u32
    }

    pub fn working_days(&self) -> impl Iterator<Item = u32> + '_ {
        self.working_days.iter().copied()
    }

    /// `day_in_cycle` é base 1. O padrão base é deslocado para frente em `offset` dias.
    pub fn is_working(&self, day_in_cycle: u32, offset: u32) -> bool {
        let len = self.cycle_length;
        let base = (day_in_cycle - 1 + len - offset % len) % len + 1;
        self.working_days.contains(&base)
    }
}

// =========================================================================
//  CICLO
// =========================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RotationDay {
    pub date: NaiveDate,
    pub day_in_cycle: u32,
    pub working: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RotationDefect {
    /// A contagem dia a dia e a fórmula fechada divergem.
    #[serde(rename_all = "camelCase")]
    ClosedFormMismatch { computed: u32, closed_form: u32 },
    /// A contagem sai dos limites `[ciclos * dias, ciclos * dias + cauda]`.
    #[serde(rename_all = "camelCase")]
    OutOfBounds { computed: u32, lower: u32, upper: u32 },
    /// O valor esperado pelo chamador não bate com o calculado.
    #[serde(rename_all = "camelCase")]
    ExpectationMismatch { expected: u32, computed: u32 },
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RotationVerification {
    pub team: RotationTeam,
    pub cycle_start_date: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub range_days: i64,
    pub full_cycles: i64,
    pub computed: u32,
    pub closed_form: u32,
    pub lower_bound: u32,
    pub upper_bound: u32,
    pub expected: Option<u32>,
    pub defects: Vec<RotationDefect>,
}

impl RotationVerification {
    pub fn is_consistent(&self) -> bool {
        self.defects.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationCycle {
    start: NaiveDate,
    pattern: RotationPattern,
}

impl RotationCycle {
    pub fn new(start: NaiveDate, pattern: RotationPattern) -> Self {
        Self { start, pattern }
    }

    pub fn quebec(start: NaiveDate) -> Self {
        Self::new(start, RotationPattern::quebec_10_14())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn pattern(&self) -> &RotationPattern {
        &self.pattern
    }

    /// `((date - start) mod L) + 1`, com módulo euclidiano para datas anteriores ao início.
    pub fn day_in_cycle(&self, date: NaiveDate) -> u32 {
        let len = i64::from(self.pattern.cycle_length());
        ((date - self.start).num_days().rem_euclid(len) + 1) as u32
    }

    pub fn is_working_day(&self, team: RotationTeam, date: NaiveDate) -> bool {
        self.pattern.is_working(self.day_in_cycle(date), team.offset_days())
    }

    pub fn working_days(&self, team: RotationTeam, range: DateRange) -> Vec<NaiveDate> {
        range.days().filter(|d| self.is_working_day(team, *d)).collect()
    }

    pub fn calendar(&self, team: RotationTeam, range: DateRange) -> Vec<RotationDay> {
        range
            .days()
            .map(|date| RotationDay {
                date,
                day_in_cycle: self.day_in_cycle(date),
                working: self.is_working_day(team, date),
            })
            .collect()
    }

    pub fn teams_on_duty(&self, date: NaiveDate) -> Vec<RotationTeam> {
        RotationTeam::ALL
            .into_iter()
            .filter(|team| self.is_working_day(*team, date))
            .collect()
    }

    pub fn count_working_days(&self, team: RotationTeam, range: DateRange) -> u32 {
        range.days().filter(|d| self.is_working_day(team, *d)).count() as u32
    }

    /// `floor(dias / L) * |padrão|` mais os dias trabalhados da cauda parcial.
    pub fn closed_form_count(&self, team: RotationTeam, range: DateRange) -> u32 {
        let len = i64::from(self.pattern.cycle_length());
        let days = range.len_days();
        let full = days / len;
        let tail = days % len;

        let tail_start = range.start() + Days::new((full * len) as u64);
        let tail_count = tail_start
            .iter_days()
            .take(tail as usize)
            .filter(|d| self.is_working_day(team, *d))
            .count() as u32;

        full as u32 * self.pattern.working_days_per_cycle() + tail_count
    }

    /// Limites válidos para qualquer equipe no intervalo.
    pub fn count_bounds(&self, range: DateRange) -> (u32, u32) {
        let len = i64::from(self.pattern.cycle_length());
        let per_cycle = self.pattern.working_days_per_cycle();
        let days = range.len_days();
        let lower = (days / len) as u32 * per_cycle;
        let tail = (days % len) as u32;
        (lower, lower + tail.min(per_cycle))
    }

    pub fn verify(&self, team: RotationTeam, range: DateRange, expected: Option<u32>) -> RotationVerification {
        let computed = self.count_working_days(team, range);
        let closed_form = self.closed_form_count(team, range);
        let (lower, upper) = self.count_bounds(range);

        let mut defects = Vec::new();
        if computed != closed_form {
            defects.push(RotationDefect::ClosedFormMismatch { computed, closed_form });
        }
        if computed < lower || computed > upper {
            defects.push(RotationDefect::OutOfBounds { computed, lower, upper });
        }
        if let Some(expected) = expected {
            if expected != computed {
                defects.push(RotationDefect::ExpectationMismatch { expected, computed });
            }
        }

        if !defects.is_empty() {
            tracing::warn!(
                team = %team,
                start = %range.start(),
                end = %range.end(),
                computed,
                ?expected,
                "rotation verification found defects"
            );
        }

        RotationVerification {
            team,
            cycle_start_date: self.start,
            start: range.start(),
            end: range.end(),
            range_days: range.len_days(),
            full_cycles: range.len_days() / i64::from(self.pattern.cycle_length()),
            computed,
            closed_form,
            lower_bound: lower,
            upper_bound: upper,
            expected,
            defects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reference_cycle() -> RotationCycle {
        RotationCycle::quebec(date(2025, 1, 6))
    }

    #[test]
    fn day_in_cycle_wraps_before_and_after_start() {
        let cycle = reference_cycle();
        assert_eq!(cycle.day_in_cycle(date(2025, 1, 6)), 1);
        assert_eq!(cycle.day_in_cycle(date(2025, 2, 2)), 28);
        assert_eq!(cycle.day_in_cycle(date(2025, 2, 3)), 1);
        assert_eq!(cycle.day_in_cycle(date(2025, 1, 5)), 28);
        assert_eq!(cycle.day_in_cycle(date(2024, 12, 9)), 1);
    }

    #[test]
    fn team_offset_shifts_the_pattern() {
        let cycle = reference_cycle();
        assert!(cycle.is_working_day(RotationTeam::Vert, date(2025, 1, 6)));
        assert!(!cycle.is_working_day(RotationTeam::Jaune, date(2025, 1, 6)));
        // Dia 15 do ciclo é o dia 1 da Jaune.
        assert!(cycle.is_working_day(RotationTeam::Jaune, date(2025, 1, 20)));
        assert!(cycle.is_working_day(RotationTeam::Jaune, date(2025, 1, 21)));
        assert!(!cycle.is_working_day(RotationTeam::Jaune, date(2025, 1, 22)));
    }

    #[test]
    fn teams_on_duty_for_cycle_start() {
        let cycle = reference_cycle();
        assert_eq!(
            cycle.teams_on_duty(date(2025, 1, 6)),
            vec![RotationTeam::Vert, RotationTeam::Rouge]
        );
    }

    #[test]
    fn reference_year_for_jaune() {
        let cycle = reference_cycle();
        let year = DateRange::year(2025).unwrap();

        // 365 dias = 13 ciclos completos + 1 dia (31/12, dia 24 do ciclo, folga da Jaune).
        assert_eq!(cycle.count_working_days(RotationTeam::Jaune, year), 104);
        assert_eq!(cycle.closed_form_count(RotationTeam::Jaune, year), 104);

        let report = cycle.verify(RotationTeam::Jaune, year, None);
        assert!(report.is_consistent());
        assert_eq!(report.full_cycles, 13);
        assert_eq!((report.lower_bound, report.upper_bound), (104, 105));
    }

    #[test]
    fn wrong_expectation_is_flagged_as_defect() {
        let cycle = reference_cycle();
        let year = DateRange::year(2025).unwrap();

        let report = cycle.verify(RotationTeam::Jaune, year, Some(52));
        assert!(!report.is_consistent());
        assert_eq!(
            report.defects,
            vec![RotationDefect::ExpectationMismatch { expected: 52, computed: 104 }]
        );
    }

    #[test]
    fn whole_cycles_give_identical_counts_for_every_team() {
        let cycle = reference_cycle();
        let range = DateRange::new(date(2025, 3, 1), date(2025, 3, 1) + Days::new(28 * 5 - 1)).unwrap();
        for team in RotationTeam::ALL {
            assert_eq!(cycle.count_working_days(team, range), 40, "team {team}");
        }
    }

    #[test]
    fn counts_stay_within_bounds_for_partial_ranges() {
        let cycle = reference_cycle();
        for extra in 0..60u64 {
            let range = DateRange::new(date(2024, 11, 17), date(2025, 4, 2) + Days::new(extra)).unwrap();
            let (lower, upper) = cycle.count_bounds(range);
            for team in RotationTeam::ALL {
                let computed = cycle.count_working_days(team, range);
                assert!(lower <= computed && computed <= upper, "team {team}, extra {extra}");
                assert_eq!(computed, cycle.closed_form_count(team, range));
            }
        }
    }

    #[test]
    fn calendar_reports_each_day() {
        let cycle = reference_cycle();
        let range = DateRange::new(date(2025, 1, 18), date(2025, 1, 21)).unwrap();
        let days = cycle.calendar(RotationTeam::Jaune, range);

        assert_eq!(days.len(), 4);
        assert_eq!(days[0].day_in_cycle, 13);
        let working: Vec<bool> = days.iter().map(|d| d.working).collect();
        assert_eq!(working, vec![false, false, true, true]);
    }

    #[test]
    fn rejects_invalid_patterns_and_ranges() {
        assert!(RotationPattern::new(0, [1]).is_err());
        assert!(RotationPattern::new(28, Vec::<u32>::new()).is_err());
        assert!(RotationPattern::new(28, [0, 3]).is_err());
        assert!(RotationPattern::new(28, [29]).is_err());
        assert!(RotationPattern::from_columns(-1, &[1]).is_err());

        let pattern = RotationPattern::new(14, [3, 1, 3]).unwrap();
        assert_eq!(pattern.working_days().collect::<Vec<_>>(), vec![1, 3]);

        assert!(matches!(
            DateRange::new(date(2025, 2, 1), date(2025, 1, 1)),
            Err(SchedulingError::InvertedRange { .. })
        ));
        assert!(matches!(
            DateRange::new(date(2000, 1, 1), date(2025, 1, 1)),
            Err(SchedulingError::RangeTooLong { .. })
        ));
    }

    #[test]
    fn dates_outside_the_supported_calendar_are_rejected() {
        assert_eq!(
            DateRange::new(NaiveDate::MAX - Days::new(27), NaiveDate::MAX),
            Err(SchedulingError::DateOutOfBounds(NaiveDate::MAX - Days::new(27)))
        );
        assert!(matches!(
            DateRange::new(date(0, 12, 1), date(1, 1, 10)),
            Err(SchedulingError::DateOutOfBounds(_))
        ));
        assert_eq!(DateRange::year(10_000), Err(SchedulingError::InvalidYear(10_000)));

        // O último dia aceito ainda permite a aritmética de semanas e ciclos
        let last = DateRange::new(date(9999, 12, 1), date(9999, 12, 31)).unwrap();
        let cycle = reference_cycle();
        assert_eq!(
            cycle.closed_form_count(RotationTeam::Vert, last),
            cycle.count_working_days(RotationTeam::Vert, last)
        );
    }

    #[test]
    fn offsets_wrap_for_shorter_cycles() {
        // Ciclo de 14 dias: o deslocamento da Jaune (14) equivale a zero.
        let cycle = RotationCycle::new(date(2025, 1, 6), RotationPattern::new(14, [1, 2]).unwrap());
        assert!(cycle.is_working_day(RotationTeam::Jaune, date(2025, 1, 6)));
        assert!(cycle.is_working_day(RotationTeam::Bleu, date(2025, 1, 13)));
    }

    #[test]
    fn overrides_start_from_the_quebec_pattern() {
        assert_eq!(RotationPattern::with_overrides(None, None).unwrap(), RotationPattern::quebec_10_14());

        let shorter = RotationPattern::with_overrides(Some(14), Some(&[1, 2])).unwrap();
        assert_eq!(shorter.cycle_length(), 14);
        assert_eq!(shorter.working_days_per_cycle(), 2);

        // Só o comprimento: os dias 10/14 continuam cabendo num ciclo de 12
        let only_length = RotationPattern::with_overrides(Some(12), None).unwrap();
        assert_eq!(only_length.working_days_per_cycle(), 8);
        assert!(RotationPattern::with_overrides(Some(10), None).is_err());
    }
}
