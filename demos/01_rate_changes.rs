/// rate changes - per-period overrides, a new default and an extended schedule
use prefinancing_rs::chrono::{TimeZone, Utc};
use prefinancing_rs::{
    format_money, CashFlowEvent, Decimal, Event, Money, Rate, SafeTimeProvider, Simulation,
    TimeSource,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // signing date comes from the time provider
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap(),
    ));

    let mut sim = Simulation::builder()
        .partner("Coopérative du Lac")
        .periods(4)
        .set_time(&time)
        .build()?;

    let signing = sim.config().signing_date;
    sim.record_cash_flow(CashFlowEvent::disbursement(signing, Money::from_major(250_000))?);

    let before = sim.run();
    println!("at 2%: {}", format_money(before.total_interest, "€"));

    // the second period is renegotiated
    sim.set_rate(2, Rate::from_percentage(Decimal::new(2_750, 3)))?;
    let after = sim.run();
    println!("with period 2 at 2.75%: {}", format_money(after.total_interest, "€"));

    // a new default reaches every period, including the appended ones
    sim.set_default_rate(Rate::from_percentage(3))?;
    for period in sim.extend_periods(2)? {
        println!("added {} at {}", period.label(), period.rate());
    }

    println!("{}", sim.run().render_table("€"));

    for event in sim.take_events() {
        if let Event::RateChanged { sequence_number, old_rate, new_rate } = event {
            println!("period {sequence_number}: {old_rate} -> {new_rate}");
        }
    }

    Ok(())
}
