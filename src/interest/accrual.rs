use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cashflow::CashFlowEvent;
use crate::decimal::{Money, Rate};
use crate::interest::{AccrualReport, AccrualResult};
use crate::schedule::Period;
use crate::types::CashFlowKind;

/// day count convention for simple-interest proration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// actual days / 365
    #[default]
    Actual365,
    /// actual days / 360
    Actual360,
}

impl DayCountConvention {
    pub fn year_basis(&self) -> u32 {
        match self {
            DayCountConvention::Actual365 => 365,
            DayCountConvention::Actual360 => 360,
        }
    }
}

/// whole days from `start` to `end`, negative if misordered
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// events dated inside `period`, by date; same-day events keep insertion order
pub fn events_in_period<'a>(
    events: &'a [CashFlowEvent],
    period: &Period,
) -> Vec<&'a CashFlowEvent> {
    let mut in_period: Vec<&CashFlowEvent> =
        events.iter().filter(|e| period.contains(e.date())).collect();
    // sort_by_key is stable
    in_period.sort_by_key(|e| e.date());
    in_period
}

/// Period-based simple-interest engine.
///
/// A pure function of its inputs: the balance starts at zero, carries across
/// periods and changes on the exact dates of the cash flows falling inside
/// each period. Membership is inclusive on both period bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccrualEngine {
    pub convention: DayCountConvention,
}

impl AccrualEngine {
    pub fn new(convention: DayCountConvention) -> Self {
        Self { convention }
    }

    pub fn year_basis(&self) -> u32 {
        self.convention.year_basis()
    }

    /// interest on `balance` for `days` at `rate`
    pub fn interest_for_span(&self, balance: Money, rate: Rate, days: i64) -> Money {
        balance.simple_interest(rate, days, self.year_basis())
    }

    /// accrue every period in sequence-number order
    pub fn accrue(&self, events: &[CashFlowEvent], periods: &[Period]) -> Vec<AccrualResult> {
        let mut ordered: Vec<&Period> = periods.iter().collect();
        ordered.sort_by_key(|p| p.sequence_number());

        let mut balance = Money::ZERO;
        let mut results = Vec::with_capacity(ordered.len());

        for period in ordered {
            let result = self.accrue_period(balance, events, period);
            balance = result.closing_balance;
            results.push(result);
        }

        results
    }

    /// accrue and wrap the results with their totals
    pub fn report(&self, events: &[CashFlowEvent], periods: &[Period]) -> AccrualReport {
        AccrualReport::new(self.convention, self.accrue(events, periods))
    }

    /// accrue a single period starting from `opening_balance`
    pub fn accrue_period(
        &self,
        opening_balance: Money,
        events: &[CashFlowEvent],
        period: &Period,
    ) -> AccrualResult {
        let in_period = events_in_period(events, period);

        let rate = period.rate();
        let mut balance = opening_balance;
        let mut cursor = period.start();
        let mut interest = Money::ZERO;
        let mut disbursed = Money::ZERO;
        let mut repaid = Money::ZERO;

        for event in &in_period {
            let days = days_between(cursor, event.date());
            debug_assert!(days >= 0, "cash flow on {} precedes cursor {}", event.date(), cursor);
            interest += self.interest_for_span(balance, rate, days);
            cursor = event.date();

            match event.kind() {
                CashFlowKind::Disbursement => {
                    balance += event.amount();
                    disbursed += event.amount();
                }
                CashFlowKind::Repayment => {
                    balance -= event.amount();
                    repaid += event.amount();
                }
            }
        }

        let days = days_between(cursor, period.end());
        debug_assert!(days >= 0, "period end {} precedes cursor {}", period.end(), cursor);
        interest += self.interest_for_span(balance, rate, days);

        if balance.is_negative() {
            warn!(
                sequence_number = period.sequence_number(),
                %balance,
                "balance is negative at period end, repayments exceed disbursements"
            );
        }

        debug!(
            sequence_number = period.sequence_number(),
            cash_flows = in_period.len(),
            %opening_balance,
            closing_balance = %balance,
            %interest,
            "period accrued"
        );

        AccrualResult {
            sequence_number: period.sequence_number(),
            start: period.start(),
            end: period.end(),
            label: period.label(),
            disbursed,
            repaid,
            opening_balance,
            closing_balance: balance,
            elapsed_days: period.elapsed_days(),
            rate,
            interest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::PeriodGenerator;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn first_period(rate: Rate) -> Period {
        Period::new(1, date(2024, 1, 15), date(2024, 7, 31), rate).unwrap()
    }

    fn disbursement(d: NaiveDate, amount: i64) -> CashFlowEvent {
        CashFlowEvent::disbursement(d, Money::from_major(amount)).unwrap()
    }

    fn repayment(d: NaiveDate, amount: i64) -> CashFlowEvent {
        CashFlowEvent::repayment(d, Money::from_major(amount)).unwrap()
    }

    #[test]
    fn test_year_basis() {
        assert_eq!(AccrualEngine::new(DayCountConvention::Actual365).year_basis(), 365);
        assert_eq!(AccrualEngine::new(DayCountConvention::Actual360).year_basis(), 360);
        assert_eq!(AccrualEngine::default().convention, DayCountConvention::Actual365);
    }

    #[test]
    fn test_zero_events_zero_rates() {
        let periods = PeriodGenerator::semi_annual(Rate::ZERO)
            .generate(date(2024, 1, 15), date(2024, 7, 31), 6)
            .unwrap();

        let results = AccrualEngine::default().accrue(&[], &periods);

        assert_eq!(results.len(), 6);
        for result in &results {
            assert!(result.interest.is_zero());
            assert!(result.closing_balance.is_zero());
            assert!(result.disbursed.is_zero());
            assert!(result.repaid.is_zero());
        }
    }

    #[test]
    fn test_single_disbursement_on_period_start() {
        let period = first_period(Rate::from_percentage(2));
        let events = [disbursement(date(2024, 1, 15), 100_000)];

        let results = AccrualEngine::default().accrue(&events, &[period]);
        let result = &results[0];

        assert_eq!(result.elapsed_days, 198);
        assert_eq!(result.closing_balance, Money::from_major(100_000));
        assert_eq!(result.disbursed, Money::from_major(100_000));
        assert_eq!(result.interest.round_cents(), Money::from_str_exact("1084.93").unwrap());
    }

    #[test]
    fn test_disbursement_then_partial_repayment() {
        let period = first_period(Rate::from_percentage(2));
        let events = [
            disbursement(date(2024, 1, 15), 100_000),
            repayment(date(2024, 5, 1), 40_000),
        ];

        let result = &AccrualEngine::default().accrue(&events, &[period])[0];

        let engine = AccrualEngine::default();
        let rate = Rate::from_percentage(2);
        let expected = engine.interest_for_span(Money::from_major(100_000), rate, 107)
            + engine.interest_for_span(Money::from_major(60_000), rate, 91);

        assert_eq!(result.interest, expected);
        assert_eq!(result.interest.round_cents(), Money::from_str_exact("885.48").unwrap());
        assert_eq!(result.closing_balance, Money::from_major(60_000));
        assert_eq!(result.repaid, Money::from_major(40_000));
    }

    #[test]
    fn test_actual_360_convention() {
        let period = first_period(Rate::from_percentage(2));
        let events = [disbursement(date(2024, 1, 15), 100_000)];

        let engine = AccrualEngine::new(DayCountConvention::Actual360);
        let result = &engine.accrue(&events, &[period])[0];
        assert_eq!(result.interest, Money::from_major(1_100));
    }

    #[test]
    fn test_balance_carries_between_periods() {
        let periods = PeriodGenerator::semi_annual(Rate::from_percentage(2))
            .generate(date(2024, 1, 15), date(2024, 7, 31), 4)
            .unwrap();
        let events = [
            disbursement(date(2024, 3, 1), 50_000),
            disbursement(date(2024, 9, 10), 25_000),
            repayment(date(2025, 4, 2), 30_000),
        ];

        let results = AccrualEngine::default().accrue(&events, &periods);

        assert_eq!(results[0].opening_balance, Money::ZERO);
        for pair in results.windows(2) {
            assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
        }
        assert_eq!(results[3].closing_balance, Money::from_major(45_000));
    }

    #[test]
    fn test_empty_period_prorates_carried_balance() {
        let periods = PeriodGenerator::semi_annual(Rate::from_percentage(3))
            .generate(date(2024, 1, 15), date(2024, 7, 31), 2)
            .unwrap();
        let events = [disbursement(date(2024, 1, 15), 10_000)];

        let engine = AccrualEngine::default();
        let results = engine.accrue(&events, &periods);

        let second = &periods[1];
        assert_eq!(
            results[1].interest,
            engine.interest_for_span(
                Money::from_major(10_000),
                second.rate(),
                second.elapsed_days()
            )
        );
    }

    #[test]
    fn test_out_of_order_events_are_sorted() {
        let period = first_period(Rate::from_percentage(2));
        let ordered = [
            disbursement(date(2024, 1, 15), 100_000),
            repayment(date(2024, 5, 1), 40_000),
        ];
        let shuffled = [ordered[1].clone(), ordered[0].clone()];

        let engine = AccrualEngine::default();
        let a = &engine.accrue(&ordered, &[period.clone()])[0];
        let b = &engine.accrue(&shuffled, &[period])[0];

        assert_eq!(a.interest, b.interest);
        assert_eq!(a.closing_balance, b.closing_balance);
    }

    #[test]
    fn test_same_day_events_keep_insertion_order() {
        let period = first_period(Rate::from_percentage(2));
        let events = [
            repayment(date(2024, 3, 1), 400),
            disbursement(date(2024, 2, 1), 1_000),
            disbursement(date(2024, 3, 1), 250),
            repayment(date(2024, 3, 1), 100),
        ];

        let ids: Vec<_> = events_in_period(&events, &period)
            .iter()
            .map(|e| e.id())
            .collect();
        assert_eq!(
            ids,
            vec![events[1].id(), events[0].id(), events[2].id(), events[3].id()]
        );
    }

    #[test]
    fn test_same_day_events_accumulate_period_totals() {
        let period = first_period(Rate::from_percentage(2));
        let events = [
            disbursement(date(2024, 3, 1), 10_000),
            repayment(date(2024, 3, 1), 10_000),
            disbursement(date(2024, 3, 1), 5_000),
        ];

        let result = &AccrualEngine::default().accrue(&events, &[period])[0];
        assert_eq!(result.disbursed, Money::from_major(15_000));
        assert_eq!(result.repaid, Money::from_major(10_000));
        assert_eq!(result.closing_balance, Money::from_major(5_000));
    }

    #[test]
    fn test_event_on_period_end_is_included() {
        let periods = PeriodGenerator::semi_annual(Rate::from_percentage(2))
            .generate(date(2024, 1, 15), date(2024, 7, 31), 2)
            .unwrap();
        let events = [disbursement(date(2024, 7, 31), 1_000)];

        let results = AccrualEngine::default().accrue(&events, &periods);
        assert_eq!(results[0].disbursed, Money::from_major(1_000));
        assert!(results[0].interest.is_zero());
        assert!(results[1].disbursed.is_zero());
        assert_eq!(results[1].opening_balance, Money::from_major(1_000));
    }

    #[test]
    fn test_events_outside_every_period_are_ignored() {
        let period = first_period(Rate::from_percentage(2));
        let events = [
            disbursement(date(2023, 12, 31), 1_000),
            disbursement(date(2024, 8, 1), 1_000),
        ];

        let result = &AccrualEngine::default().accrue(&events, &[period])[0];
        assert!(result.closing_balance.is_zero());
        assert!(result.interest.is_zero());
    }

    #[test]
    fn test_periods_processed_by_sequence_number() {
        let p1 = first_period(Rate::from_percentage(2));
        let p2 =
            Period::new(2, date(2024, 8, 1), date(2025, 2, 28), Rate::from_percentage(2)).unwrap();
        let events = [disbursement(date(2024, 1, 15), 1_000)];

        let results = AccrualEngine::default().accrue(&events, &[p2, p1]);
        assert_eq!(results[0].sequence_number, 1);
        assert_eq!(results[1].sequence_number, 2);
        assert_eq!(results[1].opening_balance, Money::from_major(1_000));
    }

    #[test]
    fn test_overlapping_periods_refilter_events() {
        let p1 = first_period(Rate::from_percentage(2));
        let p2 =
            Period::new(2, date(2024, 5, 1), date(2024, 12, 31), Rate::from_percentage(2)).unwrap();
        let events = [disbursement(date(2024, 6, 1), 1_000)];

        let results = AccrualEngine::default().accrue(&events, &[p1, p2]);
        assert_eq!(results[0].closing_balance, Money::from_major(1_000));
        assert_eq!(results[1].closing_balance, Money::from_major(2_000));
    }

    #[test]
    fn test_negative_balance_is_permitted() {
        let period = first_period(Rate::from_percentage(2));
        let events = [
            disbursement(date(2024, 1, 15), 1_000),
            repayment(date(2024, 2, 1), 1_500),
        ];

        let result = &AccrualEngine::default().accrue(&events, &[period])[0];
        assert_eq!(result.closing_balance, Money::from_major(-500));
        assert!(result.interest.is_negative());
    }

    #[test]
    fn test_ceiling_amounts_accrue_without_overflow() {
        let period = Period::new(1, date(2000, 1, 1), date(2099, 12, 31), Rate::MAX).unwrap();
        let events: Vec<CashFlowEvent> = (0..10)
            .map(|_| CashFlowEvent::disbursement(date(2000, 1, 1), Money::MAX_CASH_FLOW).unwrap())
            .collect();

        let result = &AccrualEngine::default().accrue(&events, &[period])[0];
        assert_eq!(result.closing_balance, Money::from_major(10_000_000_000_000_000));
        assert!(result.interest > result.closing_balance);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let periods = vec![first_period(Rate::from_percentage(dec!(2.5)))];
        let events = vec![
            repayment(date(2024, 5, 1), 40_000),
            disbursement(date(2024, 1, 15), 100_000),
        ];
        let events_before = events.clone();
        let periods_before = periods.clone();

        AccrualEngine::default().accrue(&events, &periods);

        assert_eq!(events, events_before);
        assert_eq!(periods, periods_before);
    }
}
