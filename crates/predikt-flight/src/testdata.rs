use predikt_core::Frame;

const CITIES: [&str; 4] = ["Recife", "Natal", "Salvador", "Aracaju"];
const TYPES: [&str; 3] = ["economic", "premium", "firstClass"];
const AGENCIES: [&str; 3] = ["Rainbow", "CloudFy", "FlyingDrops"];

/// A small deterministic flights.csv with a price that depends on distance,
/// class and agency.
pub fn flights_csv(rows: usize) -> String {
    let mut out = String::from("travelCode,userCode,from,to,flightType,price,time,distance,agency,date\n");
    for i in 0..rows {
        let from = CITIES[i % 4];
        let to = CITIES[(i + 1 + i / 4) % 4];
        let class = TYPES[i % 3];
        let agency = AGENCIES[(i / 3) % 3];
        let distance = 200.0 + (i % 7) as f64 * 110.0;
        let time = distance / 400.0;
        let class_mult = match class {
            "economic" => 1.0,
            "premium" => 1.6,
            _ => 2.2,
        };
        let agency_fee = match agency {
            "Rainbow" => 15.0,
            "CloudFy" => 40.0,
            _ => 0.0,
        };
        let price = distance * 0.9 * class_mult + agency_fee;
        let day = 1 + i % 28;
        let month = 1 + i % 12;
        out.push_str(&format!(
            "{},{},{},{},{},{:.2},{:.2},{},{},{:02}/{:02}/2019\n",
            i,
            i % 11,
            from,
            to,
            class,
            price,
            time,
            distance,
            agency,
            month,
            day
        ));
    }
    out
}

pub fn flights_frame(rows: usize) -> Frame {
    predikt_io::read_csv_from(flights_csv(rows).as_bytes()).unwrap()
}

pub fn valid_request() -> serde_json::Value {
    serde_json::json!({
        "from": "Recife",
        "to": "Natal",
        "flightType": "premium",
        "time": 0.9,
        "distance": 360,
        "agency": "CloudFy",
        "day": 15,
        "month": 7,
        "weekday": 2
    })
}
