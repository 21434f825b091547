use anyhow::Context;
use clap::Parser;
use predikt_flight::client::{
    prompt, send, FlightQuery, AGENCIES, CITIES, DEFAULT_DAY, DEFAULT_MONTH, DEFAULT_URL, FLIGHT_TYPES, MIN_YEAR,
};

/// Ask for a flight and print the predicted ticket price.
///
/// Any field not given as a flag is asked for interactively, unless
/// `--defaults` is set.
#[derive(Debug, Parser)]
#[command(name = "flight-client", version)]
struct Cli {
    #[arg(long, default_value = DEFAULT_URL)]
    url: String,

    #[arg(long)]
    from: Option<String>,

    #[arg(long)]
    to: Option<String>,

    #[arg(long)]
    flight_type: Option<String>,

    #[arg(long)]
    agency: Option<String>,

    #[arg(long)]
    day: Option<u32>,

    #[arg(long)]
    month: Option<u32>,

    #[arg(long)]
    year: Option<i32>,

    /// Use defaults instead of prompting for missing fields
    #[arg(long)]
    defaults: bool,
}

fn choose(label: &str, given: Option<String>, options: &[&str], ask: bool) -> anyhow::Result<String> {
    match given {
        Some(v) => Ok(v),
        None if ask => Ok(options[prompt::select(label, options, 0)?].to_string()),
        None => Ok(options[0].to_string()),
    }
}

fn number(label: &str, given: Option<i64>, default: i64, min: i64, max: i64, ask: bool) -> anyhow::Result<i64> {
    match given {
        Some(v) => Ok(v),
        None if ask => Ok(prompt::number(label, default, min, max)?),
        None => Ok(default),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let ask = !cli.defaults;

    let query = FlightQuery {
        from: choose("From", cli.from, &CITIES, ask)?,
        to: choose("To", cli.to, &CITIES, ask)?,
        flight_type: choose("Flight Type", cli.flight_type, &FLIGHT_TYPES, ask)?,
        agency: choose("Agency", cli.agency, &AGENCIES, ask)?,
        day: u32::try_from(number("Day", cli.day.map(i64::from), DEFAULT_DAY as i64, 1, 31, ask)?)
            .context("day out of range")?,
        month: u32::try_from(number("Month", cli.month.map(i64::from), DEFAULT_MONTH as i64, 1, 12, ask)?)
            .context("month out of range")?,
        year: i32::try_from(number("Year", cli.year.map(i64::from), MIN_YEAR as i64, MIN_YEAR as i64, 9999, ask)?)
            .context("year out of range")?,
    };

    let payload = match query.payload() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    println!("{}", send(&cli.url, &payload));
    Ok(())
}
