/// csv export - write the report, read it back, dump the state as json
use prefinancing_rs::chrono::NaiveDate;
use prefinancing_rs::{read_rows, CashFlowInput, Simulation};
use std::io::Cursor;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut sim = Simulation::builder()
        .signing_date(NaiveDate::from_ymd_opt(2023, 9, 1).ok_or("bad date")?)
        .periods(5)
        .build()?;

    let inputs = [
        ("2023-09-01", "Versement", "80 000"),
        ("12/02/2024", "Versement", "35 500,50"),
        ("30/06/2024", "Remboursement", "60 000"),
        ("2025-01-10", "Remboursement", "55 500.50"),
    ];
    for (date, kind, amount) in inputs {
        sim.record_input(&CashFlowInput::new(date, kind, amount))?;
    }

    let report = sim.run();
    let csv = report.to_csv_string()?;
    println!("{csv}");

    let rows = read_rows(Cursor::new(csv))?;
    for row in &rows {
        let (balance, interest) = (row.balance.to_string(), row.interest.to_string());
        println!("{:<26} {balance:>12} {interest:>10}", row.period);
    }

    println!("\n{}", sim.json()?);
    Ok(())
}
