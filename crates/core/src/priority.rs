//! Priority reconciliation.
//!
//! Scans person records, grants priority to living persons who crossed the
//! age threshold, and revokes it from deceased persons. Demotion depends only
//! on the deceased flag, never on age.
//!
//! Reconciliation is idempotent: a second run against unchanged data and the
//! same `today` plans zero changes. Concurrent runs converge on the same
//! terminal state because each batch only moves flags toward the value the
//! rule prescribes.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::eligibility::{age_in_years, cutoff_date, is_priority_eligible, Cutoff};
use crate::error::CoreError;
use crate::types::Date;

/// Maximum number of example persons listed per batch in a report.
pub const REPORT_SAMPLE_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Person snapshot and store seam
// ---------------------------------------------------------------------------

/// The fields of a person record the reconciler reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonRecord {
    /// Normalized CPF (11 digits). Unique.
    pub cpf: String,
    pub name: String,
    pub birth_date: Option<Date>,
    pub deceased: bool,
    pub priority: bool,
}

/// Storage operations the reconciler needs.
///
/// Implementations may answer the candidate queries with a full scan; the
/// reconciler re-applies the eligibility rule to whatever comes back.
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Living persons without priority born strictly before `cutoff`.
    async fn promotion_candidates(&self, cutoff: Cutoff) -> Result<Vec<PersonRecord>, CoreError>;

    /// Deceased persons currently holding priority.
    async fn demotion_candidates(&self) -> Result<Vec<PersonRecord>, CoreError>;

    /// Grant priority to the listed CPFs in one batch.
    ///
    /// The write re-checks the promotion predicate against current state:
    /// rows that died, lost their birth date, fell on or after `cutoff`, or
    /// already hold priority are left alone. Returns the number of rows
    /// whose flag actually changed.
    async fn promote(&self, cpfs: &[String], cutoff: Cutoff) -> Result<u64, CoreError>;

    /// Revoke priority from the listed CPFs in one batch.
    ///
    /// Only rows that are still deceased and still hold priority change.
    async fn demote(&self, cpfs: &[String]) -> Result<u64, CoreError>;
}

#[async_trait]
impl<S: PersonStore + ?Sized> PersonStore for std::sync::Arc<S> {
    async fn promotion_candidates(&self, cutoff: Cutoff) -> Result<Vec<PersonRecord>, CoreError> {
        (**self).promotion_candidates(cutoff).await
    }

    async fn demotion_candidates(&self) -> Result<Vec<PersonRecord>, CoreError> {
        (**self).demotion_candidates().await
    }

    async fn promote(&self, cpfs: &[String], cutoff: Cutoff) -> Result<u64, CoreError> {
        (**self).promote(cpfs, cutoff).await
    }

    async fn demote(&self, cpfs: &[String]) -> Result<u64, CoreError> {
        (**self).demote(cpfs).await
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// The two disjoint working sets produced by a single partitioning pass.
///
/// Both sets are ordered by CPF so reports are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    pub to_promote: Vec<PersonRecord>,
    pub to_demote: Vec<PersonRecord>,
}

impl ReconciliationPlan {
    pub fn is_empty(&self) -> bool {
        self.to_promote.is_empty() && self.to_demote.is_empty()
    }
}

/// Partition `persons` into the promote and demote sets.
///
/// - promote: not deceased, no priority yet, eligible by age.
/// - demote: deceased and currently holding priority.
/// - everyone else is left untouched.
///
/// Duplicate CPFs (e.g. a store returning overlapping candidate lists) are
/// collapsed.
pub fn plan_reconciliation<'a, I>(persons: I, today: Date, age_threshold_years: i32) -> ReconciliationPlan
where
    I: IntoIterator<Item = &'a PersonRecord>,
{
    let mut plan = ReconciliationPlan::default();

    for person in persons {
        if person.deceased {
            if person.priority {
                plan.to_demote.push(person.clone());
            }
        } else if !person.priority
            && is_priority_eligible(person.birth_date, false, today, age_threshold_years)
        {
            plan.to_promote.push(person.clone());
        }
    }

    for set in [&mut plan.to_promote, &mut plan.to_demote] {
        set.sort_by(|a, b| a.cpf.cmp(&b.cpf));
        set.dedup_by(|a, b| a.cpf == b.cpf);
    }
    plan
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A human-readable example entry in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonSample {
    pub cpf: String,
    pub name: String,
    pub age_years: Option<i64>,
}

impl PersonSample {
    fn from_record(person: &PersonRecord, today: Date) -> Self {
        Self {
            cpf: person.cpf.clone(),
            name: person.name.clone(),
            age_years: person.birth_date.map(|born| age_in_years(born, today)),
        }
    }
}

/// What happened to one batch (promote or demote).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    /// Dry run: nothing was written.
    Planned,
    /// The batch update ran and changed `updated` rows.
    Applied { updated: u64 },
    /// The batch update failed as a whole. The store may have left a partial
    /// write behind; re-running is safe.
    Failed { error: String },
}

/// Counts, examples and outcome for one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Number of persons selected for this batch.
    pub planned: usize,
    /// The first [`REPORT_SAMPLE_SIZE`] selected persons, ordered by CPF.
    pub examples: Vec<PersonSample>,
    pub outcome: BatchOutcome,
}

impl BatchReport {
    fn new(persons: &[PersonRecord], today: Date, outcome: BatchOutcome) -> Self {
        Self {
            planned: persons.len(),
            examples: persons
                .iter()
                .take(REPORT_SAMPLE_SIZE)
                .map(|p| PersonSample::from_record(p, today))
                .collect(),
            outcome,
        }
    }

    /// Rows actually changed by this batch (zero for dry runs and failures).
    pub fn changed(&self) -> u64 {
        match self.outcome {
            BatchOutcome::Applied { updated } => updated,
            _ => 0,
        }
    }

    /// Number of selected persons not listed in `examples`.
    pub fn remaining(&self) -> usize {
        self.planned.saturating_sub(self.examples.len())
    }

    pub fn failed(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Failed { .. })
    }
}

/// Result of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    pub dry_run: bool,
    pub age_threshold_years: i32,
    /// `None` when the cutoff fell outside the representable date range.
    pub cutoff_date: Option<Date>,
    pub promotion: BatchReport,
    pub demotion: BatchReport,
}

impl ReconciliationReport {
    /// Persons actually granted priority.
    pub fn promoted(&self) -> u64 {
        self.promotion.changed()
    }

    /// Persons actually stripped of priority.
    pub fn demoted(&self) -> u64 {
        self.demotion.changed()
    }

    pub fn has_failures(&self) -> bool {
        self.promotion.failed() || self.demotion.failed()
    }

    fn build(
        plan: &ReconciliationPlan,
        today: Date,
        age_threshold_years: i32,
        dry_run: bool,
        promotion: BatchOutcome,
        demotion: BatchOutcome,
    ) -> Self {
        Self {
            dry_run,
            age_threshold_years,
            cutoff_date: cutoff_date(today, age_threshold_years).date(),
            promotion: BatchReport::new(&plan.to_promote, today, promotion),
            demotion: BatchReport::new(&plan.to_demote, today, demotion),
        }
    }
}

fn write_samples(f: &mut fmt::Formatter<'_>, batch: &BatchReport) -> fmt::Result {
    for sample in &batch.examples {
        match sample.age_years {
            Some(age) => writeln!(
                f,
                "  - {} (CPF: {}, Age: {age} years)",
                sample.name, sample.cpf
            )?,
            None => writeln!(f, "  - {} (CPF: {}, Age: unknown)", sample.name, sample.cpf)?,
        }
    }
    if batch.remaining() > 0 {
        writeln!(f, "  ... and {} more persons", batch.remaining())?;
    }
    Ok(())
}

impl fmt::Display for ReconciliationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let age = self.age_threshold_years;
        let promotion = &self.promotion;
        let demotion = &self.demotion;

        if promotion.planned == 0 && demotion.planned == 0 {
            writeln!(f, "No persons found that need priority updates.")?;
        }

        if self.dry_run {
            if promotion.planned > 0 {
                writeln!(
                    f,
                    "DRY RUN: Would update {} living persons over {age} years old to priority status",
                    promotion.planned
                )?;
                writeln!(f, "Persons that would get priority:")?;
                write_samples(f, promotion)?;
            }
            if demotion.planned > 0 {
                writeln!(
                    f,
                    "DRY RUN: Would remove priority from {} deceased persons",
                    demotion.planned
                )?;
                writeln!(f, "Deceased persons that would lose priority:")?;
                write_samples(f, demotion)?;
            }
            return write!(
                f,
                "Summary (dry run): {} to promote, {} to demote",
                promotion.planned, demotion.planned
            );
        }

        if promotion.planned > 0 {
            match &promotion.outcome {
                BatchOutcome::Failed { error } => writeln!(
                    f,
                    "Failed to update living persons over {age} years old to priority status: {error}"
                )?,
                _ => {
                    writeln!(
                        f,
                        "Successfully updated {} living persons over {age} years old to priority status",
                        promotion.changed()
                    )?;
                    writeln!(f, "Promoted persons:")?;
                    write_samples(f, promotion)?;
                }
            }
        }
        if demotion.planned > 0 {
            match &demotion.outcome {
                BatchOutcome::Failed { error } => writeln!(
                    f,
                    "Failed to remove priority status from deceased persons: {error}"
                )?,
                _ => {
                    writeln!(
                        f,
                        "Successfully removed priority status from {} deceased persons",
                        demotion.changed()
                    )?;
                    writeln!(f, "Demoted persons:")?;
                    write_samples(f, demotion)?;
                }
            }
        }
        write!(
            f,
            "Summary: {} promoted, {} demoted",
            self.promoted(),
            self.demoted()
        )
    }
}

// ---------------------------------------------------------------------------
// In-memory reconciliation
// ---------------------------------------------------------------------------

/// Reconcile a materialized collection of persons in place.
///
/// With `dry_run` the slice is left untouched.
pub fn reconcile_in_place(
    persons: &mut [PersonRecord],
    today: Date,
    age_threshold_years: i32,
    dry_run: bool,
) -> ReconciliationReport {
    let plan = plan_reconciliation(persons.iter(), today, age_threshold_years);
    if dry_run {
        return ReconciliationReport::build(
            &plan,
            today,
            age_threshold_years,
            true,
            BatchOutcome::Planned,
            BatchOutcome::Planned,
        );
    }

    let mut promoted = 0;
    let mut demoted = 0;
    for person in persons.iter_mut() {
        if plan.to_promote.iter().any(|p| p.cpf == person.cpf) && !person.priority {
            person.priority = true;
            promoted += 1;
        } else if plan.to_demote.iter().any(|p| p.cpf == person.cpf) && person.priority {
            person.priority = false;
            demoted += 1;
        }
    }

    ReconciliationReport::build(
        &plan,
        today,
        age_threshold_years,
        false,
        BatchOutcome::Applied { updated: promoted },
        BatchOutcome::Applied { updated: demoted },
    )
}

// ---------------------------------------------------------------------------
// Store-backed reconciler
// ---------------------------------------------------------------------------

/// Runs reconciliation against a [`PersonStore`].
///
/// Each set is written with a single batch update. There is no transaction
/// spanning both sets: a failed demotion does not undo a successful
/// promotion.
pub struct PriorityReconciler<S> {
    store: S,
}

impl<S: PersonStore> PriorityReconciler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Plan and (unless `dry_run`) apply priority changes as of `today`.
    ///
    /// Loading candidates is the only step that aborts with an error. Batch
    /// write failures are recorded in the report as
    /// [`BatchOutcome::Failed`].
    pub async fn reconcile(
        &self,
        today: Date,
        age_threshold_years: i32,
        dry_run: bool,
    ) -> Result<ReconciliationReport, CoreError> {
        if age_threshold_years <= 0 {
            tracing::warn!(
                age_threshold_years,
                "Non-positive age threshold: every living person with a known birth date is eligible"
            );
        }

        let cutoff = cutoff_date(today, age_threshold_years);
        let mut candidates = self.store.promotion_candidates(cutoff).await?;
        candidates.extend(self.store.demotion_candidates().await?);

        let plan = plan_reconciliation(candidates.iter(), today, age_threshold_years);
        tracing::info!(
            %today,
            age_threshold_years,
            to_promote = plan.to_promote.len(),
            to_demote = plan.to_demote.len(),
            dry_run,
            "Planned priority reconciliation"
        );

        if dry_run {
            return Ok(ReconciliationReport::build(
                &plan,
                today,
                age_threshold_years,
                true,
                BatchOutcome::Planned,
                BatchOutcome::Planned,
            ));
        }

        let promotion = self.apply_batch(&plan.to_promote, Some(cutoff)).await;
        let demotion = self.apply_batch(&plan.to_demote, None).await;

        Ok(ReconciliationReport::build(
            &plan,
            today,
            age_threshold_years,
            false,
            promotion,
            demotion,
        ))
    }

    /// Write one batch: a promotion when `promote_before` carries the
    /// cutoff, a demotion otherwise.
    async fn apply_batch(&self, persons: &[PersonRecord], promote_before: Option<Cutoff>) -> BatchOutcome {
        if persons.is_empty() {
            return BatchOutcome::Applied { updated: 0 };
        }

        let priority = promote_before.is_some();
        let cpfs: Vec<String> = persons.iter().map(|p| p.cpf.clone()).collect();
        let written = match promote_before {
            Some(cutoff) => self.store.promote(&cpfs, cutoff).await,
            None => self.store.demote(&cpfs).await,
        };
        match written {
            Ok(updated) => {
                tracing::info!(priority, updated, "Applied priority batch");
                BatchOutcome::Applied { updated }
            }
            Err(err) => {
                tracing::error!(priority, error = %err, "Priority batch update failed");
                BatchOutcome::Failed {
                    error: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> Date {
        date(2024, 6, 15)
    }

    fn person(cpf: &str, born: Option<Date>, deceased: bool, priority: bool) -> PersonRecord {
        PersonRecord {
            cpf: cpf.to_string(),
            name: format!("Person {cpf}"),
            birth_date: born,
            deceased,
            priority,
        }
    }

    // -----------------------------------------------------------------------
    // Partitioning
    // -----------------------------------------------------------------------

    #[test]
    fn partitions_into_disjoint_sets() {
        let persons = vec![
            person("3", Some(date(1950, 1, 1)), false, false), // promote
            person("1", Some(date(1980, 1, 1)), true, true),   // demote
            person("2", Some(date(1950, 1, 1)), false, true),  // already priority
            person("4", Some(date(1990, 1, 1)), false, false), // too young
            person("5", Some(date(1940, 1, 1)), true, false),  // deceased, no priority
        ];
        let plan = plan_reconciliation(&persons, today(), 60);
        assert_eq!(plan.to_promote.len(), 1);
        assert_eq!(plan.to_promote[0].cpf, "3");
        assert_eq!(plan.to_demote.len(), 1);
        assert_eq!(plan.to_demote[0].cpf, "1");
    }

    #[test]
    fn demotion_ignores_age() {
        let persons = vec![person("1", Some(date(2000, 1, 1)), true, true)];
        let plan = plan_reconciliation(&persons, today(), 60);
        assert_eq!(plan.to_demote.len(), 1);
    }

    #[test]
    fn deceased_without_birth_date_is_demoted() {
        let persons = vec![person("1", None, true, true)];
        let plan = plan_reconciliation(&persons, today(), 60);
        assert_eq!(plan.to_demote.len(), 1);
    }

    #[test]
    fn sets_are_sorted_and_deduplicated() {
        let old = Some(date(1940, 1, 1));
        let persons = vec![
            person("9", old, false, false),
            person("2", old, false, false),
            person("9", old, false, false),
        ];
        let plan = plan_reconciliation(&persons, today(), 60);
        let cpfs: Vec<_> = plan.to_promote.iter().map(|p| p.cpf.as_str()).collect();
        assert_eq!(cpfs, ["2", "9"]);
    }

    // -----------------------------------------------------------------------
    // In-place reconciliation
    // -----------------------------------------------------------------------

    #[test]
    fn in_place_applies_flags() {
        let mut persons = vec![
            person("1", Some(date(1950, 1, 1)), false, false),
            person("2", Some(date(1979, 1, 1)), true, true),
        ];
        let report = reconcile_in_place(&mut persons, today(), 60, false);
        assert!(persons[0].priority);
        assert!(!persons[1].priority);
        assert_eq!(report.promoted(), 1);
        assert_eq!(report.demoted(), 1);
    }

    #[test]
    fn in_place_dry_run_changes_nothing() {
        let mut persons = vec![
            person("1", Some(date(1950, 1, 1)), false, false),
            person("2", Some(date(1979, 1, 1)), true, true),
        ];
        let before = persons.clone();
        let first = reconcile_in_place(&mut persons, today(), 60, true);
        let second = reconcile_in_place(&mut persons, today(), 60, true);
        assert_eq!(persons, before);
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(first.promoted(), 0);
        assert_eq!(first.promotion.planned, 1);
    }

    #[test]
    fn in_place_is_idempotent() {
        let mut persons = vec![
            person("1", Some(date(1950, 1, 1)), false, false),
            person("2", Some(date(1979, 1, 1)), true, true),
            person("3", Some(date(1990, 1, 1)), false, false),
        ];
        reconcile_in_place(&mut persons, today(), 60, false);
        let after_first = persons.clone();
        let second = reconcile_in_place(&mut persons, today(), 60, false);
        assert_eq!(persons, after_first);
        assert_eq!(second.promoted(), 0);
        assert_eq!(second.demoted(), 0);
        assert_eq!(second.promotion.planned, 0);
        assert_eq!(second.demotion.planned, 0);
    }

    // -----------------------------------------------------------------------
    // Report rendering
    // -----------------------------------------------------------------------

    #[test]
    fn report_lists_examples_and_summary() {
        let mut persons = vec![
            person("11111111111", Some(date(1954, 6, 1)), false, false),
            person("22222222222", Some(date(1979, 6, 1)), true, true),
        ];
        let text = reconcile_in_place(&mut persons, today(), 60, false).to_string();
        assert!(text.contains(
            "Successfully updated 1 living persons over 60 years old to priority status"
        ));
        assert!(text.contains("Successfully removed priority status from 1 deceased persons"));
        assert!(text.contains("  - Person 11111111111 (CPF: 11111111111, Age: 70 years)"));
        assert!(text.contains("  - Person 22222222222 (CPF: 22222222222, Age: 45 years)"));
        assert!(text.ends_with("Summary: 1 promoted, 1 demoted"));
    }

    #[test]
    fn dry_run_report_wording() {
        let mut persons = vec![
            person("1", Some(date(1950, 1, 1)), false, false),
            person("2", None, true, true),
        ];
        let text = reconcile_in_place(&mut persons, today(), 60, true).to_string();
        assert!(text.contains("DRY RUN: Would update 1 living persons over 60 years old"));
        assert!(text.contains("DRY RUN: Would remove priority from 1 deceased persons"));
        assert!(text.contains("Persons that would get priority:"));
        assert!(text.contains("Deceased persons that would lose priority:"));
        assert!(text.contains("(CPF: 2, Age: unknown)"));
    }

    #[test]
    fn report_samples_are_bounded() {
        let mut persons: Vec<_> = (0..15)
            .map(|i| person(&format!("{i:02}"), Some(date(1940, 1, 1)), false, false))
            .collect();
        let report = reconcile_in_place(&mut persons, today(), 60, true);
        assert_eq!(report.promotion.examples.len(), REPORT_SAMPLE_SIZE);
        assert_eq!(report.promotion.examples[0].cpf, "00");
        assert_eq!(report.promotion.remaining(), 5);
        assert!(report.to_string().contains("  ... and 5 more persons"));
    }

    #[test]
    fn empty_report_says_nothing_to_do() {
        let mut persons = vec![person("1", Some(date(2000, 1, 1)), false, false)];
        let text = reconcile_in_place(&mut persons, today(), 60, false).to_string();
        assert!(text.starts_with("No persons found that need priority updates."));
        assert!(text.ends_with("Summary: 0 promoted, 0 demoted"));
    }

    #[test]
    fn failed_batch_is_rendered() {
        let plan = ReconciliationPlan {
            to_promote: vec![person("1", Some(date(1950, 1, 1)), false, false)],
            to_demote: vec![],
        };
        let report = ReconciliationReport::build(
            &plan,
            today(),
            60,
            false,
            BatchOutcome::Failed {
                error: "connection reset".into(),
            },
            BatchOutcome::Applied { updated: 0 },
        );
        assert!(report.has_failures());
        assert_eq!(report.promoted(), 0);
        assert!(report.to_string().contains(
            "Failed to update living persons over 60 years old to priority status: connection reset"
        ));
    }

    #[test]
    fn report_serializes_outcome_tag() {
        let mut persons = vec![person("1", Some(date(1950, 1, 1)), false, false)];
        let report = reconcile_in_place(&mut persons, today(), 60, false);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["promotion"]["outcome"]["status"], "applied");
        assert_eq!(json["promotion"]["outcome"]["updated"], 1);
        assert_eq!(json["cutoff_date"], "1964-06-15");
    }
}
