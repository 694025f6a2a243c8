/// quick start - one disbursement, one repayment, one report
use prefinancing_rs::chrono::NaiveDate;
use prefinancing_rs::{CashFlowInput, Rate, Simulation};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 2% over five years, two periods per year
    let mut sim = Simulation::builder()
        .partner("Atelier Martin")
        .signing_date(NaiveDate::from_ymd_opt(2024, 1, 15).ok_or("bad date")?)
        .rate(Rate::from_percentage(2))
        .duration_years(5)
        .build()?;

    sim.record_input(&CashFlowInput::new("15/01/2024", "Disbursement", "100 000"))?;
    sim.record_input(&CashFlowInput::new("01/05/2024", "Repayment", "40 000,00 €"))?;

    println!("{}", sim.render());

    let report = sim.run();
    println!("first period interest: {}", report.results()[0].interest.round_cents());

    Ok(())
}
