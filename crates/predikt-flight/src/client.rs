use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::features::weekday_index;

pub const DEFAULT_URL: &str = "http://127.0.0.1:5000/predict";
pub const TIMEOUT: Duration = Duration::from_secs(5);

pub const CITIES: [&str; 9] = [
    "Aracaju",
    "Brasilia",
    "Campo_Grande",
    "Florianopolis",
    "Natal",
    "Recife",
    "Rio_de_Janeiro",
    "Salvador",
    "Sao_Paulo",
];
pub const FLIGHT_TYPES: [&str; 3] = ["economic", "premium", "firstClass"];
pub const AGENCIES: [&str; 3] = ["Rainbow", "CloudFy", "FlyingDrops"];

pub const FIXED_TIME: u32 = 90;
pub const FIXED_DISTANCE: u32 = 360;
pub const DEFAULT_DAY: u32 = 15;
pub const DEFAULT_MONTH: u32 = 7;
pub const MIN_YEAR: i32 = 2026;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{field} must be one of {allowed:?}, got '{value}'")]
    UnknownOption {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("{year}-{month:02}-{day:02} is not a valid date")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// What the user picks in the form.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightQuery {
    pub from: String,
    pub to: String,
    pub flight_type: String,
    pub agency: String,
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl Default for FlightQuery {
    fn default() -> Self {
        FlightQuery {
            from: CITIES[0].to_string(),
            to: CITIES[0].to_string(),
            flight_type: FLIGHT_TYPES[0].to_string(),
            agency: AGENCIES[0].to_string(),
            day: DEFAULT_DAY,
            month: DEFAULT_MONTH,
            year: MIN_YEAR,
        }
    }
}

/// JSON body sent to `/predict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictPayload {
    pub from: String,
    pub to: String,
    #[serde(rename = "flightType")]
    pub flight_type: String,
    pub time: u32,
    pub distance: u32,
    pub agency: String,
    pub day: u32,
    pub month: u32,
    pub weekday: u32,
}

fn check_option(field: &'static str, value: &str, allowed: &'static [&'static str]) -> Result<(), ClientError> {
    if allowed.iter().any(|a| *a == value) {
        Ok(())
    } else {
        Err(ClientError::UnknownOption {
            field,
            value: value.to_string(),
            allowed,
        })
    }
}

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), ClientError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ClientError::OutOfRange { field, value, min, max })
    }
}

impl FlightQuery {
    /// Validate the form and derive the request body.
    pub fn payload(&self) -> Result<PredictPayload, ClientError> {
        check_option("from", &self.from, &CITIES)?;
        check_option("to", &self.to, &CITIES)?;
        check_option("flightType", &self.flight_type, &FLIGHT_TYPES)?;
        check_option("agency", &self.agency, &AGENCIES)?;
        check_range("day", self.day as i64, 1, 31)?;
        check_range("month", self.month as i64, 1, 12)?;
        check_range("year", self.year as i64, MIN_YEAR as i64, 9999)?;

        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or(ClientError::InvalidDate {
            year: self.year,
            month: self.month,
            day: self.day,
        })?;

        Ok(PredictPayload {
            from: self.from.clone(),
            to: self.to.clone(),
            flight_type: self.flight_type.clone(),
            time: FIXED_TIME,
            distance: FIXED_DISTANCE,
            agency: self.agency.clone(),
            day: self.day,
            month: self.month,
            weekday: weekday_index(date),
        })
    }
}

/// Result of one request, rendered the way the user sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Price(f64),
    ApiError(String),
    ConnectionError(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Price(p) => write!(f, "Estimated Ticket Price ₹ {}", p),
            Outcome::ApiError(body) => write!(f, "API Error: {}", body),
            Outcome::ConnectionError(err) => write!(f, "Connection error: {}", err),
        }
    }
}

/// Interpret a response from the predictor.
pub fn interpret(status: u16, body: &str) -> Outcome {
    if status != 200 {
        return Outcome::ApiError(body.to_string());
    }
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("predicted_price").and_then(serde_json::Value::as_f64))
        .map(Outcome::Price)
        .unwrap_or_else(|| Outcome::ApiError(body.to_string()))
}

/// One blocking POST, no retry.
pub fn send(url: &str, payload: &PredictPayload) -> Outcome {
    let client = match reqwest::blocking::Client::builder().timeout(TIMEOUT).build() {
        Ok(c) => c,
        Err(e) => return Outcome::ConnectionError(e.to_string()),
    };
    let response = match client.post(url).json(payload).send() {
        Ok(r) => r,
        Err(e) => return Outcome::ConnectionError(e.to_string()),
    };
    let status = response.status().as_u16();
    match response.text() {
        Ok(body) => interpret(status, &body),
        Err(e) => Outcome::ConnectionError(e.to_string()),
    }
}

/// Terminal prompts.
pub mod prompt {
    use std::io::{stdin, stdout, Write};

    use crossterm::{
        cursor,
        event::{read, Event, KeyCode, KeyEventKind},
        execute,
        style::{Color, Print, ResetColor, SetForegroundColor},
        terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
    };

    struct RawMode;

    impl RawMode {
        fn enter() -> std::io::Result<Self> {
            enable_raw_mode()?;
            Ok(RawMode)
        }
    }

    impl Drop for RawMode {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
        }
    }

    /// Arrow-key menu. Returns the chosen index.
    pub fn select(label: &str, options: &[&str], default: usize) -> std::io::Result<usize> {
        if options.is_empty() {
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, "no options to choose from"));
        }
        let mut out = stdout();
        let mut selected = default.min(options.len() - 1);
        execute!(
            out,
            SetForegroundColor(Color::Cyan),
            Print(format!("{} ", label)),
            SetForegroundColor(Color::DarkGrey),
            Print("[Up/Down, Enter]\r\n"),
            ResetColor,
            cursor::Hide
        )?;

        let guard = RawMode::enter()?;
        loop {
            for (i, item) in options.iter().enumerate() {
                if i == selected {
                    execute!(
                        out,
                        Clear(ClearType::CurrentLine),
                        SetForegroundColor(Color::Green),
                        Print(" ► "),
                        SetForegroundColor(Color::White),
                        Print(format!("{}\r\n", item)),
                        ResetColor
                    )?;
                } else {
                    execute!(
                        out,
                        Clear(ClearType::CurrentLine),
                        SetForegroundColor(Color::DarkGrey),
                        Print(format!("   {}\r\n", item)),
                        ResetColor
                    )?;
                }
            }

            if let Event::Key(key) = read()? {
                if key.kind != KeyEventKind::Press {
                    execute!(out, cursor::MoveUp(options.len() as u16))?;
                    continue;
                }
                match key.code {
                    KeyCode::Up => selected = selected.checked_sub(1).unwrap_or(options.len() - 1),
                    KeyCode::Down => selected = (selected + 1) % options.len(),
                    KeyCode::Enter => break,
                    KeyCode::Esc | KeyCode::Char('q') => {
                        drop(guard);
                        execute!(out, cursor::Show)?;
                        return Err(std::io::Error::new(std::io::ErrorKind::Interrupted, "cancelled"));
                    }
                    _ => {}
                }
            }
            execute!(out, cursor::MoveUp(options.len() as u16))?;
        }
        drop(guard);
        execute!(out, cursor::Show)?;
        Ok(selected)
    }

    /// Line prompt for an integer; empty input takes `default`, bad input asks again.
    pub fn number(label: &str, default: i64, min: i64, max: i64) -> std::io::Result<i64> {
        let mut out = stdout();
        loop {
            execute!(
                out,
                SetForegroundColor(Color::Cyan),
                Print(format!("{} ", label)),
                SetForegroundColor(Color::DarkGrey),
                Print(format!("[{}]: ", default)),
                ResetColor
            )?;
            out.flush()?;

            let mut line = String::new();
            if stdin().read_line(&mut line)? == 0 {
                return Ok(default);
            }
            let line = line.trim();
            if line.is_empty() {
                return Ok(default);
            }
            match line.parse::<i64>() {
                Ok(v) if (min..=max).contains(&v) => return Ok(v),
                _ => execute!(
                    out,
                    SetForegroundColor(Color::Red),
                    Print(format!("  enter a whole number between {} and {}\n", min, max)),
                    ResetColor
                )?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_derives_weekday_and_fixed_fields() {
        let query = FlightQuery {
            from: "Recife".into(),
            to: "Natal".into(),
            ..FlightQuery::default()
        };
        let payload = query.payload().unwrap();
        // 2026-07-15 is a Wednesday
        assert_eq!(payload.weekday, 2);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "from": "Recife", "to": "Natal", "flightType": "economic",
                "time": 90, "distance": 360, "agency": "Rainbow",
                "day": 15, "month": 7, "weekday": 2
            })
        );
    }

    #[test]
    fn test_impossible_date_is_rejected() {
        let query = FlightQuery {
            day: 31,
            month: 2,
            ..FlightQuery::default()
        };
        assert!(matches!(query.payload(), Err(ClientError::InvalidDate { month: 2, day: 31, .. })));
    }

    #[test]
    fn test_options_and_ranges() {
        let bad_city = FlightQuery {
            from: "Lisbon".into(),
            ..FlightQuery::default()
        };
        assert!(matches!(bad_city.payload(), Err(ClientError::UnknownOption { field: "from", .. })));

        let old = FlightQuery {
            year: 2025,
            ..FlightQuery::default()
        };
        assert!(matches!(old.payload(), Err(ClientError::OutOfRange { field: "year", .. })));
    }

    #[test]
    fn test_interpret_responses() {
        assert_eq!(interpret(200, r#"{"predicted_price": 812.5}"#), Outcome::Price(812.5));
        assert_eq!(
            interpret(400, r#"{"error":"Missing fields: ['distance']"}"#).to_string(),
            r#"API Error: {"error":"Missing fields: ['distance']"}"#
        );
        assert_eq!(Outcome::Price(812.5).to_string(), "Estimated Ticket Price ₹ 812.5");
    }

    #[test]
    fn test_connection_error() {
        let payload = FlightQuery::default().payload().unwrap();
        // port 9 (discard) on localhost is closed in test environments
        let outcome = send("http://127.0.0.1:9/predict", &payload);
        assert!(matches!(outcome, Outcome::ConnectionError(_)));
        assert!(outcome.to_string().starts_with("Connection error: "));
    }
}
