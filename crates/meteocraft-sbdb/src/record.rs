//! Extraction of an impact scenario from an SBDB JSON record.
//!
//! SBDB reports most numbers as strings, so every numeric field accepts
//! either a JSON number or numeric text.

use meteocraft_physics::{parse_diameter_m, parse_velocity_km_s};
use meteocraft_types::{ImpactScenario, ScenarioSource};
use serde_json::Value;

use crate::error::SbdbError;

/// Build a scenario from the `phys_par`, `ca_data` and `vi_data` sections.
///
/// - diameter: the last `phys_par` entry named `diameter`, as
///   `"{value} {unit}"` (unit defaults to `km`).
/// - velocity: `v_rel` of the first Earth close approach, as `"{v} km/s"`.
/// - probability, energy, mass: means over the virtual-impactor records
///   whose numbers parse; every record contributes its date.
///
/// # Errors
///
/// Returns [`SbdbError::Api`] when the body carries an API error message,
/// and [`SbdbError::Malformed`] when the record has no usable diameter,
/// velocity or virtual-impactor energy.
pub fn scenario_from_record(name: &str, record: &Value) -> Result<ImpactScenario, SbdbError> {
    if record.get("object").is_none() {
        if let Some(message) = record.get("message").and_then(Value::as_str) {
            return Err(SbdbError::Api(message.to_owned()));
        }
    }

    let diameter = extract_diameter(record)
        .ok_or_else(|| SbdbError::Malformed(String::from("no diameter in phys_par")))?;
    parse_diameter_m(&diameter).map_err(|e| SbdbError::Malformed(e.to_string()))?;

    let impact_velocity = extract_earth_velocity(record)
        .ok_or_else(|| SbdbError::Malformed(String::from("no Earth close approach in ca_data")))?;
    parse_velocity_km_s(&impact_velocity).map_err(|e| SbdbError::Malformed(e.to_string()))?;

    let impactors = summarize_impactors(record);
    if impactors.contributing == 0 {
        return Err(SbdbError::Malformed(String::from(
            "no usable virtual-impactor records in vi_data",
        )));
    }
    let (impact_probability, energy_megatons, mass_kg) = impactors.means();
    if !(energy_megatons.is_finite() && energy_megatons > 0.0) {
        return Err(SbdbError::Malformed(format!(
            "mean impact energy {energy_megatons} Mt is not positive"
        )));
    }

    Ok(ImpactScenario {
        asteroid_name: name.to_owned(),
        diameter,
        impact_velocity,
        impact_probability,
        energy_megatons,
        mass_kg,
        candidate_impact_dates: impactors.dates,
        source: ScenarioSource::Sbdb,
    })
}

/// Render a scalar JSON value as text; `None` for null, arrays and objects.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// The last `diameter` entry decides; `None` when there is none or its
/// value is not a scalar.
fn extract_diameter(record: &Value) -> Option<String> {
    let item = record
        .get("phys_par")?
        .as_array()?
        .iter()
        .rfind(|item| item.get("name").and_then(Value::as_str) == Some("diameter"))?;
    let value = item.get("value").and_then(scalar_text)?;
    let unit = item
        .get("unit")
        .and_then(scalar_text)
        .unwrap_or_else(|| String::from("km"));
    Some(format!("{value} {unit}"))
}

fn extract_earth_velocity(record: &Value) -> Option<String> {
    let approach = record
        .get("ca_data")?
        .as_array()?
        .iter()
        .find(|ca| ca.get("body").and_then(Value::as_str) == Some("Earth"))?;
    let v_rel = approach
        .get("v_rel")
        .and_then(scalar_text)
        .unwrap_or_else(|| String::from("N/A"));
    Some(format!("{v_rel} km/s"))
}

/// Parse a virtual-impactor number. Missing, null and empty count as 0;
/// `None` means the field is present but not numeric.
fn impactor_number(record: &Value, key: &str) -> Option<f64> {
    match record.get(key) {
        None | Some(Value::Null) => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => Some(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        Some(Value::Bool(_) | Value::Array(_) | Value::Object(_)) => None,
    }
}

#[derive(Debug, Default)]
struct ImpactorSummary {
    dates: Vec<String>,
    probability_sum: f64,
    energy_sum: f64,
    mass_sum: f64,
    contributing: u32,
}

impl ImpactorSummary {
    fn means(&self) -> (f64, f64, f64) {
        let n = f64::from(self.contributing);
        (
            self.probability_sum / n,
            self.energy_sum / n,
            self.mass_sum / n,
        )
    }
}

fn summarize_impactors(record: &Value) -> ImpactorSummary {
    let mut summary = ImpactorSummary::default();
    let Some(records) = record.get("vi_data").and_then(Value::as_array) else {
        return summary;
    };

    for vi in records {
        let date = vi
            .get("date")
            .and_then(scalar_text)
            .unwrap_or_else(|| String::from("N/A"));
        summary.dates.push(date);

        let (Some(ip), Some(energy), Some(mass)) = (
            impactor_number(vi, "ip"),
            impactor_number(vi, "energy"),
            impactor_number(vi, "mass"),
        ) else {
            continue;
        };
        summary.probability_sum += ip;
        summary.energy_sum += energy;
        summary.mass_sum += mass;
        summary.contributing = summary.contributing.saturating_add(1);
    }
    summary
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Value {
        json!({
            "object": {"fullname": "99942 Apophis (2004 MN4)"},
            "phys_par": [
                {"name": "H", "value": "19.09"},
                {"name": "diameter", "value": "0.34", "unit": "km"}
            ],
            "ca_data": [
                {"body": "Moon", "v_rel": "7.1"},
                {"body": "Earth", "v_rel": "7.42"},
                {"body": "Earth", "v_rel": "9.99"}
            ],
            "vi_data": [
                {"date": "2068-04-12.71", "ip": "2.0e-05", "energy": "1.2e+03", "mass": "6.1e+10"},
                {"date": "2069-04-12.70", "ip": "4.0e-05", "energy": "1.4e+03", "mass": "6.3e+10"}
            ]
        })
    }

    #[test]
    fn extracts_full_record() {
        let scenario = scenario_from_record("Apophis", &sample()).unwrap();
        assert_eq!(scenario.asteroid_name, "Apophis");
        assert_eq!(scenario.diameter, "0.34 km");
        assert_eq!(scenario.impact_velocity, "7.42 km/s");
        assert!((scenario.impact_probability - 3.0e-5).abs() < 1e-15);
        assert!((scenario.energy_megatons - 1300.0).abs() < 1e-9);
        assert!((scenario.mass_kg - 6.2e10).abs() < 1.0);
        assert_eq!(
            scenario.candidate_impact_dates,
            vec!["2068-04-12.71", "2069-04-12.70"]
        );
        assert_eq!(scenario.source, ScenarioSource::Sbdb);
    }

    #[test]
    fn last_diameter_wins_and_unit_defaults_to_km() {
        let mut record = sample();
        record["phys_par"] = json!([
            {"name": "diameter", "value": "0.5", "unit": "km"},
            {"name": "diameter", "value": 0.37}
        ]);
        let scenario = scenario_from_record("x", &record).unwrap();
        assert_eq!(scenario.diameter, "0.37 km");
    }

    #[test]
    fn trailing_diameter_without_value_is_malformed() {
        let mut record = sample();
        record["phys_par"] = json!([
            {"name": "diameter", "value": "0.5", "unit": "km"},
            {"name": "diameter", "value": null, "unit": "km"}
        ]);
        assert!(matches!(
            scenario_from_record("x", &record),
            Err(SbdbError::Malformed(_))
        ));
    }

    #[test]
    fn unparseable_impactor_keeps_date_but_not_numbers() {
        let mut record = sample();
        record["vi_data"] = json!([
            {"date": "2100-01-01", "ip": "n/a", "energy": "5", "mass": "1"},
            {"date": "2101-01-01", "ip": "", "energy": 10, "mass": null}
        ]);
        let scenario = scenario_from_record("x", &record).unwrap();
        assert_eq!(scenario.candidate_impact_dates.len(), 2);
        assert_eq!(scenario.energy_megatons, 10.0);
        assert_eq!(scenario.impact_probability, 0.0);
        assert_eq!(scenario.mass_kg, 0.0);
    }

    #[test]
    fn missing_sections_are_malformed() {
        let mut no_diameter = sample();
        no_diameter["phys_par"] = json!([{"name": "H", "value": "19"}]);
        assert!(matches!(
            scenario_from_record("x", &no_diameter),
            Err(SbdbError::Malformed(_))
        ));

        let mut no_earth = sample();
        no_earth["ca_data"] = json!([{"body": "Mars", "v_rel": "5"}]);
        assert!(matches!(
            scenario_from_record("x", &no_earth),
            Err(SbdbError::Malformed(_))
        ));

        let mut no_velocity = sample();
        no_velocity["ca_data"] = json!([{"body": "Earth"}]);
        assert!(matches!(
            scenario_from_record("x", &no_velocity),
            Err(SbdbError::Malformed(_))
        ));

        let mut no_impactors = sample();
        no_impactors["vi_data"] = json!([]);
        assert!(matches!(
            scenario_from_record("x", &no_impactors),
            Err(SbdbError::Malformed(_))
        ));

        let mut zero_energy = sample();
        zero_energy["vi_data"] = json!([{"date": "2100-01-01", "ip": "1e-6"}]);
        assert!(matches!(
            scenario_from_record("x", &zero_energy),
            Err(SbdbError::Malformed(_))
        ));
    }

    #[test]
    fn api_error_message_is_surfaced() {
        let record = json!({"code": "200", "message": "specified object was not found"});
        let err = scenario_from_record("nope", &record).unwrap_err();
        assert!(matches!(err, SbdbError::Api(ref m) if m.contains("not found")));
    }
}
