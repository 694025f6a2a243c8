use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::Serialize;
use tracing::info;

use crate::cashflow::{CashFlowEvent, CashFlowInput, CashFlowLedger, LoanSummary};
use crate::config::{
    period_count_for_years, SimulationConfig, DEFAULT_CURRENCY, DEFAULT_DURATION_YEARS,
    DEFAULT_RATE_PERCENT,
};
use crate::decimal::Rate;
use crate::errors::{LoanError, Result};
use crate::events::{Event, EventStore};
use crate::export::format::format_summary;
use crate::interest::{AccrualEngine, AccrualReport, DayCountConvention};
use crate::schedule::{Period, PeriodGenerator, PeriodSchedule};
use crate::types::{Cadence, CashFlowId};

/// a prefinancing loan under simulation
///
/// Owns the cash flow ledger and the period schedule. Every accrual run works
/// on snapshots of both.
pub struct Simulation {
    config: SimulationConfig,
    ledger: CashFlowLedger,
    schedule: PeriodSchedule,
    engine: AccrualEngine,
    events: EventStore,
}

#[derive(Serialize)]
struct SimulationExport<'a> {
    config: &'a SimulationConfig,
    summary: LoanSummary,
    cash_flows: &'a [CashFlowEvent],
    periods: &'a [Period],
    report: AccrualReport,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let schedule = PeriodSchedule::generate(
            config.generator(),
            config.signing_date,
            config.first_period_end,
            config.period_count,
        )?;

        info!(
            partner = config.partner_name.as_deref().unwrap_or("-"),
            signing_date = %config.signing_date,
            periods = schedule.len(),
            rate = %config.default_rate,
            "simulation created"
        );

        Ok(Self {
            engine: AccrualEngine::new(config.day_count_convention),
            config,
            ledger: CashFlowLedger::new(),
            schedule,
            events: EventStore::new(),
        })
    }

    pub fn builder<'t>() -> SimulationBuilder<'t> {
        SimulationBuilder::new()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn ledger(&self) -> &CashFlowLedger {
        &self.ledger
    }

    pub fn schedule(&self) -> &PeriodSchedule {
        &self.schedule
    }

    pub fn record_cash_flow(&mut self, event: CashFlowEvent) -> CashFlowId {
        let recorded = Event::CashFlowRecorded {
            id: event.id(),
            date: event.date(),
            kind: event.kind(),
            amount: event.amount(),
        };
        let id = self.ledger.record(event);
        self.events.emit(recorded);
        id
    }

    /// parse raw fields and record them; nothing is recorded on failure
    pub fn record_input(&mut self, input: &CashFlowInput) -> Result<CashFlowId> {
        let event = input.try_into_event()?;
        Ok(self.record_cash_flow(event))
    }

    pub fn remove_cash_flow_at(&mut self, index: usize) -> Result<CashFlowEvent> {
        let removed = self.ledger.remove_at(index)?;
        self.emit_removed(&removed);
        Ok(removed)
    }

    pub fn remove_cash_flow(&mut self, id: CashFlowId) -> Result<CashFlowEvent> {
        let removed = self.ledger.remove(id)?;
        self.emit_removed(&removed);
        Ok(removed)
    }

    fn emit_removed(&mut self, removed: &CashFlowEvent) {
        self.events.emit(Event::CashFlowRemoved {
            id: removed.id(),
            date: removed.date(),
            kind: removed.kind(),
            amount: removed.amount(),
        });
    }

    /// change one period's rate, returning the previous one
    pub fn set_rate(&mut self, sequence_number: u32, rate: Rate) -> Result<Rate> {
        let old_rate = self.schedule.set_rate(sequence_number, rate)?;
        self.events.emit(Event::RateChanged {
            sequence_number,
            old_rate,
            new_rate: rate,
        });
        Ok(old_rate)
    }

    /// apply one rate to every period and to periods added later
    pub fn set_default_rate(&mut self, rate: Rate) -> Result<()> {
        self.schedule.set_all_rates(rate)?;

        let old_rate = self.config.default_rate;
        self.config.default_rate = rate;
        self.events.emit(Event::DefaultRateChanged {
            old_rate,
            new_rate: rate,
        });
        Ok(())
    }

    /// append periods after the last one, returning the new periods
    pub fn extend_periods(&mut self, additional: usize) -> Result<&[Period]> {
        let before = self.schedule.len();
        self.schedule.extend(additional)?;
        self.config.period_count = self.schedule.len();

        self.events.emit(Event::PeriodsExtended {
            added: self.schedule.len() - before,
            total: self.schedule.len(),
            last_end: self.schedule.periods().last().map(|p| p.end()),
        });
        Ok(&self.schedule.periods()[before..])
    }

    /// run the accrual engine over the current ledger and schedule
    pub fn run(&mut self) -> AccrualReport {
        let report = self.report();

        info!(
            periods = report.len(),
            cash_flows = self.ledger.len(),
            total_interest = %report.total_interest,
            final_balance = %report.final_balance,
            "accrual run complete"
        );
        self.events.emit(Event::AccrualRun {
            periods: report.len(),
            total_interest: report.total_interest,
            final_balance: report.final_balance,
        });
        report
    }

    fn report(&self) -> AccrualReport {
        let cash_flows = self.ledger.snapshot();
        let periods = self.schedule.snapshot();
        self.engine.report(&cash_flows, &periods)
    }

    pub fn summary(&self) -> LoanSummary {
        self.ledger.summary(self.config.partner_name.as_deref())
    }

    /// configuration, cash flows, periods and a fresh report as JSON
    pub fn json(&self) -> Result<String> {
        let export = SimulationExport {
            config: &self.config,
            summary: self.summary(),
            cash_flows: self.ledger.events(),
            periods: self.schedule.periods(),
            report: self.report(),
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// loan summary followed by the period table
    pub fn render(&self) -> String {
        let currency = self.config.currency.as_str();
        format!(
            "{}\n{}",
            format_summary(&self.summary(), currency),
            self.report().render_table(currency)
        )
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}

/// builder for a [`Simulation`]
#[derive(Default)]
pub struct SimulationBuilder<'t> {
    partner_name: Option<String>,
    signing_date: Option<NaiveDate>,
    first_period_end: Option<NaiveDate>,
    duration_years: Option<u32>,
    period_count: Option<usize>,
    rate: Option<Rate>,
    convention: Option<DayCountConvention>,
    cadence: Option<Cadence>,
    currency: Option<String>,
    time_provider: Option<&'t SafeTimeProvider>,
}

impl<'t> SimulationBuilder<'t> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time(mut self, time: &'t SafeTimeProvider) -> Self {
        self.time_provider = Some(time);
        self
    }

    pub fn partner(mut self, name: impl Into<String>) -> Self {
        self.partner_name = Some(name.into());
        self
    }

    pub fn signing_date(mut self, date: NaiveDate) -> Self {
        self.signing_date = Some(date);
        self
    }

    pub fn first_period_end(mut self, date: NaiveDate) -> Self {
        self.first_period_end = Some(date);
        self
    }

    /// term length; two periods per year
    pub fn duration_years(mut self, years: u32) -> Self {
        self.duration_years = Some(years);
        self
    }

    /// explicit period count, takes precedence over `duration_years`
    pub fn periods(mut self, count: usize) -> Self {
        self.period_count = Some(count);
        self
    }

    pub fn rate(mut self, rate: Rate) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn convention(mut self, convention: DayCountConvention) -> Self {
        self.convention = Some(convention);
        self
    }

    pub fn cadence(mut self, cadence: Cadence) -> Self {
        self.cadence = Some(cadence);
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// build with the stored time provider, or system time if none was set
    pub fn build(self) -> Result<Simulation> {
        match self.time_provider {
            Some(time) => self.build_with_time(time),
            None => self.build_now(),
        }
    }

    pub fn build_now(self) -> Result<Simulation> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.build_with_time(&time)
    }

    /// build, taking today's date from `time_provider` when no signing date is given
    pub fn build_with_time(self, time_provider: &SafeTimeProvider) -> Result<Simulation> {
        let signing_date = self
            .signing_date
            .unwrap_or_else(|| time_provider.now().date_naive());

        let cadence = self.cadence.unwrap_or_default();
        let default_rate = self
            .rate
            .unwrap_or_else(|| Rate::from_percentage(DEFAULT_RATE_PERCENT));
        let generator = PeriodGenerator::new(cadence, default_rate);

        let first_period_end = match self.first_period_end {
            Some(date) => date,
            None => generator.first_period_end_for(signing_date)?,
        };

        let period_count = match self.period_count {
            Some(count) => count,
            None => period_count_for_years(self.duration_years.unwrap_or(DEFAULT_DURATION_YEARS))?,
        };

        let partner_name = self
            .partner_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let currency = self.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        if currency.trim().is_empty() {
            return Err(LoanError::InvalidConfiguration {
                message: "currency suffix must not be blank".to_string(),
            });
        }

        Simulation::new(SimulationConfig {
            partner_name,
            signing_date,
            first_period_end,
            period_count,
            default_rate,
            day_count_convention: self.convention.unwrap_or_default(),
            cadence,
            currency,
        })
    }
}
