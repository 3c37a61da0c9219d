use std::panic::AssertUnwindSafe;
use std::pin::pin;

use chrono::{DateTime, Utc};
use colored::Colorize;
use futures::{stream, FutureExt, StreamExt};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    geocode::AddressLookup,
    verify::{
        eligibility::EligibilitySet,
        types::{CrossValidation, Record, ValidationOutcome, Verdict},
        validator::CrossValidator,
    },
};

/// Runs the cross-validator over every record of an input table
pub struct BatchRunner<L> {
    validator: CrossValidator<L>,
    threshold: u8,
    concurrency: usize,
}

impl<L: AddressLookup> BatchRunner<L> {
    pub fn new(validator: CrossValidator<L>, threshold: u8, concurrency: usize) -> Self {
        Self {
            validator,
            threshold,
            concurrency: concurrency.max(1),
        }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Validate `records` and collect outcomes in input order.
    ///
    /// `on_progress(processed, total)` fires after each record. With
    /// `concurrency > 1` several records are looked up at once but outcomes
    /// are still delivered in order, so `processed` only ever increases.
    pub async fn run<F>(
        &self,
        records: &[Record],
        eligibility: &EligibilitySet,
        mut on_progress: F,
    ) -> BatchReport
    where
        F: FnMut(usize, usize),
    {
        let total = records.len();
        info!(
            "Validating {} records (threshold {}, concurrency {}, {} electronic-eligible names)",
            total,
            self.threshold,
            self.concurrency,
            eligibility.len()
        );

        let mut outcomes = Vec::with_capacity(total);
        let mut pending = pin!(stream::iter(records)
            .map(|record| self.process(record, eligibility))
            .buffered(self.concurrency));

        while let Some(outcome) = pending.next().await {
            outcomes.push(outcome);
            on_progress(outcomes.len(), total);
        }

        let summary = BatchSummary::from_outcomes(&outcomes);
        info!(
            "Validation complete: {} matched, {} need review, {} with unresolved lookups",
            summary.matched, summary.needs_review, summary.unresolved
        );

        BatchReport {
            generated_at: Utc::now(),
            threshold: self.threshold,
            summary,
            outcomes,
        }
    }

    async fn process(&self, record: &Record, eligibility: &EligibilitySet) -> ValidationOutcome {
        let electronic_eligible = eligibility.is_eligible(&record.company_name);

        let validation = AssertUnwindSafe(self.validator.validate(
            &record.company_name,
            &record.branch_name,
            &record.ledger_address,
        ))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| {
            warn!(
                "Validation of row {} ({}) failed unexpectedly, marking for review",
                record.row_number, record.company_name
            );
            CrossValidation::unresolved()
        });

        ValidationOutcome::new(record, validation, self.threshold, electronic_eligible)
    }
}

/// Everything a renderer needs for one run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub threshold: u8,
    pub summary: BatchSummary,
    pub outcomes: Vec<ValidationOutcome>,
}

/// Counts over a finished batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub matched: usize,
    pub needs_review: usize,
    /// Outcomes where at least one of the two lookups failed
    pub unresolved: usize,
    pub electronic_eligible: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[ValidationOutcome]) -> Self {
        let mut summary = BatchSummary {
            total: outcomes.len(),
            ..Default::default()
        };

        for outcome in outcomes {
            match outcome.verdict {
                Verdict::Match => summary.matched += 1,
                Verdict::NeedsReview => summary.needs_review += 1,
            }
            if outcome.has_unresolved_lookup() {
                summary.unresolved += 1;
            }
            if outcome.electronic_eligible {
                summary.electronic_eligible += 1;
            }
        }

        summary
    }

    /// Get match rate as percentage
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.matched as f64 / self.total as f64) * 100.0
        }
    }

    /// Print a formatted summary to console
    pub fn print_summary(&self) {
        println!("\n{}", "=== 검증 결과 요약 ===".cyan().bold());
        println!("Total Records:     {}", self.total);
        println!("Matched:           {} ✓", self.matched.to_string().green());
        println!("Needs Review:      {} ✗", self.needs_review.to_string().red());
        println!("Unresolved:        {}", self.unresolved.to_string().yellow());
        println!("Electronic:        {}", self.electronic_eligible);
        println!("Match Rate:        {:.1}%", self.match_rate());
        println!("{}", "=====================".cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::LookupResult;
    use crate::verify::fake::FakeLookup;
    use std::time::Duration;

    fn record(row: usize, company: &str, ledger: &str) -> Record {
        Record::new(row, company, "", ledger)
    }

    fn runner(fake: FakeLookup, threshold: u8, concurrency: usize) -> BatchRunner<FakeLookup> {
        BatchRunner::new(CrossValidator::new(fake), threshold, concurrency)
    }

    #[tokio::test]
    async fn test_match_and_review_verdicts() {
        let fake = FakeLookup::default()
            .with_address("서울특별시 강남구 테헤란로 1", "서울 강남구 테헤란로 1")
            .with_keyword("서울특별시 ABC상사", "서울 강남구 테헤란로 1")
            .with_address("부산광역시 해운대구 센텀중앙로 79", "부산 해운대구 센텀중앙로 79");
        let records = vec![
            record(2, "ABC상사", "서울특별시 강남구 테헤란로 1"),
            record(3, "XYZ물산", "부산광역시 해운대구 센텀중앙로 79"),
        ];

        let report = runner(fake, 80, 1)
            .run(&records, &EligibilitySet::default(), |_, _| {})
            .await;

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.outcomes[0].verdict, Verdict::Match);
        assert_eq!(report.outcomes[0].similarity_score, 100);
        assert_eq!(report.outcomes[1].verdict, Verdict::NeedsReview);
        assert_eq!(report.outcomes[1].verified_address, LookupResult::Unresolved);
        assert_eq!(report.outcomes[1].similarity_score, 0);
        assert_eq!(report.summary.matched, 1);
        assert_eq!(report.summary.needs_review, 1);
        assert_eq!(report.summary.unresolved, 1);
        assert_eq!(report.threshold, 80);
    }

    fn near_miss() -> FakeLookup {
        FakeLookup::default()
            .with_address("서울 강남구 테헤란로 1", "서울 강남구 테헤란로 1")
            .with_keyword("서울 ABC상사", "서울 강남구 테헤란로 12")
    }

    #[tokio::test]
    async fn test_threshold_applies_to_partial_similarity() {
        // 강남구테헤란로1 vs 강남구테헤란로12 -> 2*8/17
        let records = vec![record(2, "ABC상사", "서울 강남구 테헤란로 1")];

        let lenient = runner(near_miss(), 80, 1)
            .run(&records, &EligibilitySet::default(), |_, _| {})
            .await;
        let strict = runner(near_miss(), 95, 1)
            .run(&records, &EligibilitySet::default(), |_, _| {})
            .await;

        assert_eq!(lenient.outcomes[0].similarity_score, 94);
        assert_eq!(lenient.outcomes[0].verdict, Verdict::Match);
        assert_eq!(strict.outcomes[0].verdict, Verdict::NeedsReview);
    }

    #[tokio::test]
    async fn test_electronic_eligibility_flag() {
        let records = vec![
            record(2, "ABC상사", "서울 강남구"),
            record(3, "XYZ물산", "서울 강남구"),
        ];
        let eligibility = EligibilitySet::new(["ABC상사 본점"]);

        let report = runner(FakeLookup::default(), 80, 1)
            .run(&records, &eligibility, |_, _| {})
            .await;

        assert!(report.outcomes[0].electronic_eligible);
        assert!(!report.outcomes[1].electronic_eligible);
        assert_eq!(report.summary.electronic_eligible, 1);
    }

    #[tokio::test]
    async fn test_order_preserved_with_concurrency() {
        let mut fake = FakeLookup::default();
        let mut records = Vec::new();
        for i in 0..6 {
            let ledger = format!("서울 강남구 테헤란로 {}", i);
            // earlier rows finish last
            fake = fake
                .with_address(&ledger, &ledger)
                .with_delay(&ledger, Duration::from_millis(60 - i as u64 * 10));
            records.push(record(i + 2, &format!("회사{}", i), &ledger));
        }

        let mut progress = Vec::new();
        let report = runner(fake, 80, 4)
            .run(&records, &EligibilitySet::default(), |done, total| progress.push((done, total)))
            .await;

        let rows: Vec<usize> = report.outcomes.iter().map(|o| o.row_number).collect();
        assert_eq!(rows, vec![2, 3, 4, 5, 6, 7]);
        assert_eq!(report.outcomes[3].company_name, "회사3");
        assert_eq!(progress, (1..=6).map(|n| (n, 6)).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_panicking_record_is_isolated() {
        let fake = FakeLookup::default()
            .panicking_on("서울 중구 세종대로 110")
            .with_address("서울 강남구 테헤란로 1", "서울 강남구 테헤란로 1")
            .with_keyword("서울 ABC상사", "서울 강남구 테헤란로 1");
        let records = vec![
            record(2, "고장회사", "서울 중구 세종대로 110"),
            record(3, "ABC상사", "서울 강남구 테헤란로 1"),
        ];

        let report = runner(fake, 80, 1)
            .run(&records, &EligibilitySet::default(), |_, _| {})
            .await;

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.outcomes[0].verdict, Verdict::NeedsReview);
        assert_eq!(report.outcomes[0].standardized_address, LookupResult::Unresolved);
        assert_eq!(report.outcomes[0].similarity_score, 0);
        assert_eq!(report.outcomes[1].verdict, Verdict::Match);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let mut calls = 0;
        let report = runner(FakeLookup::default(), 80, 1)
            .run(&[], &EligibilitySet::default(), |_, _| calls += 1)
            .await;

        assert!(report.outcomes.is_empty());
        assert_eq!(report.summary, BatchSummary::default());
        assert_eq!(report.summary.match_rate(), 0.0);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let runner = runner(FakeLookup::default(), 80, 0);
        assert_eq!(runner.concurrency, 1);
        assert_eq!(runner.threshold(), 80);
    }
}
