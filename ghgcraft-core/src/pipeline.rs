//! Row filtering and estimation aggregation

use crate::config::AggregationPolicy;
use crate::estimator::EstimateProvider;
use crate::reader::RawRow;
use crate::registry;
use crate::report::{Report, ReportRow};
use std::collections::HashMap;

/// A retained input row, augmented with its activity id and mass in kg.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionRow {
    pub name: String,
    pub mass_tons: f64,
    pub activity_id: &'static str,
    pub mass_kg: f64,
    pub co2e_kg: Option<f64>,
}

/// Keep rows whose gas name is in the registry, in input order.
/// Unrecognized names are dropped silently; the only trace is a
/// reduced row count.
pub fn filter_rows(raw: &[RawRow]) -> Vec<EmissionRow> {
    raw.iter()
        .filter_map(|row| {
            registry::lookup(&row.name).map(|activity_id| EmissionRow {
                name: row.name.clone(),
                mass_tons: row.mass_tons,
                activity_id,
                mass_kg: row.mass_tons * 1000.0,
                co2e_kg: None,
            })
        })
        .collect()
}

/// Orchestrates one filter-estimate-report run.
pub struct Pipeline {
    policy: AggregationPolicy,
    provider: Box<dyn EstimateProvider>,
}

impl Pipeline {
    pub fn new(policy: AggregationPolicy, provider: Box<dyn EstimateProvider>) -> Self {
        Self { policy, provider }
    }

    /// Filter the raw rows, issue estimation calls sequentially under
    /// the configured policy, and assemble the report. Per-call
    /// failures become warnings; they never abort the run.
    pub fn process_rows(&self, raw: &[RawRow]) -> Report {
        let mut rows = filter_rows(raw);
        let mut warnings = Vec::new();

        match self.policy {
            AggregationPolicy::PerRow => {
                estimate_per_row(&mut rows, self.provider.as_ref(), &mut warnings)
            }
            AggregationPolicy::Grouped => {
                estimate_grouped(&mut rows, self.provider.as_ref(), &mut warnings)
            }
        }

        Report {
            rows: rows.into_iter().map(into_report_row).collect(),
            warnings,
        }
    }

    /// Filter only, no estimation calls: every retained row appears
    /// with an absent estimate.
    pub fn preview(raw: &[RawRow]) -> Report {
        Report {
            rows: filter_rows(raw).into_iter().map(into_report_row).collect(),
            warnings: Vec::new(),
        }
    }
}

fn into_report_row(row: EmissionRow) -> ReportRow {
    ReportRow {
        name: row.name,
        mass_tons: row.mass_tons,
        co2e_kg: row.co2e_kg,
    }
}

/// One call per row with the row's own mass. Exact, more calls.
fn estimate_per_row(
    rows: &mut [EmissionRow],
    provider: &dyn EstimateProvider,
    warnings: &mut Vec<String>,
) {
    for row in rows.iter_mut() {
        match provider.estimate(row.activity_id, row.mass_kg) {
            Ok(co2e) => row.co2e_kg = Some(co2e),
            Err(e) => warnings.push(format!(
                "Estimation failed for {} ({} kg): {}",
                row.activity_id, row.mass_kg, e
            )),
        }
    }
}

/// One call per distinct activity id with the group's summed mass,
/// apportioned back to each member by its mass share. A failed group
/// call leaves every member's estimate absent.
fn estimate_grouped(
    rows: &mut [EmissionRow],
    provider: &dyn EstimateProvider,
    warnings: &mut Vec<String>,
) {
    // Groups keep first-seen order so calls are issued deterministically.
    let mut order: Vec<&'static str> = Vec::new();
    let mut totals: HashMap<&'static str, f64> = HashMap::new();
    for row in rows.iter() {
        if !totals.contains_key(row.activity_id) {
            order.push(row.activity_id);
        }
        *totals.entry(row.activity_id).or_insert(0.0) += row.mass_kg;
    }

    let mut group_results: HashMap<&'static str, Option<f64>> = HashMap::new();
    for &activity_id in &order {
        let total_mass_kg = totals[activity_id];
        let result = match provider.estimate(activity_id, total_mass_kg) {
            Ok(co2e) => Some(co2e),
            Err(e) => {
                warnings.push(format!(
                    "Estimation failed for {} ({} kg): {}",
                    activity_id, total_mass_kg, e
                ));
                None
            }
        };
        group_results.insert(activity_id, result);
    }

    for row in rows.iter_mut() {
        row.co2e_kg = group_results[row.activity_id]
            .map(|group_co2e| group_co2e * (row.mass_kg / totals[row.activity_id]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::EstimateError;
    use std::cell::RefCell;

    /// Canned provider: returns a per-kg factor for known activity ids
    /// and records every call it receives.
    struct MockProvider {
        factors: HashMap<&'static str, f64>,
        calls: RefCell<Vec<(String, f64)>>,
    }

    impl MockProvider {
        fn new(factors: &[(&'static str, f64)]) -> Self {
            Self {
                factors: factors.iter().copied().collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl EstimateProvider for MockProvider {
        fn estimate(&self, activity_id: &str, mass_kg: f64) -> Result<f64, EstimateError> {
            self.calls
                .borrow_mut()
                .push((activity_id.to_string(), mass_kg));
            self.factors
                .get(activity_id)
                .map(|factor| factor * mass_kg)
                .ok_or(EstimateError::MissingValue)
        }
    }

    fn raw(name: &str, mass_tons: f64) -> RawRow {
        RawRow {
            name: name.to_string(),
            mass_tons,
        }
    }

    #[test]
    fn test_filter_drops_unknown_names() {
        let rows = filter_rows(&[
            raw("HFC-134a", 2.0),
            raw("Unknown-Gas", 5.0),
            raw("R-22", 1.0),
        ]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].activity_id, "fugitive-hfc-134a");
        assert_eq!(rows[1].activity_id, "fugitive-hcfc-22");
        assert!(rows.iter().all(|r| registry::lookup(&r.name).is_some()));
    }

    #[test]
    fn test_mass_kg_is_exactly_tons_times_thousand() {
        let rows = filter_rows(&[raw("HFC-23", 0.125), raw("HFC-32", 3.0)]);
        assert_eq!(rows[0].mass_kg, 0.125 * 1000.0);
        assert_eq!(rows[1].mass_kg, 3000.0);
    }

    #[test]
    fn test_per_row_policy_calls_once_per_row() {
        let input = [raw("HFC-134a", 2.0), raw("HFC-134a", 1.0), raw("R-22", 4.0)];
        let mut rows = filter_rows(&input);
        let provider =
            MockProvider::new(&[("fugitive-hfc-134a", 1.43), ("fugitive-hcfc-22", 1.81)]);
        let mut warnings = Vec::new();

        estimate_per_row(&mut rows, &provider, &mut warnings);

        // Rows sharing an activity id still get their own calls
        let calls = provider.calls.borrow();
        assert_eq!(
            *calls,
            vec![
                ("fugitive-hfc-134a".to_string(), 2000.0),
                ("fugitive-hfc-134a".to_string(), 1000.0),
                ("fugitive-hcfc-22".to_string(), 4000.0),
            ]
        );
        assert_eq!(rows[0].co2e_kg, Some(1.43 * 2000.0));
        assert_eq!(rows[1].co2e_kg, Some(1.43 * 1000.0));
        assert_eq!(rows[2].co2e_kg, Some(1.81 * 4000.0));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_grouped_policy_calls_once_per_activity_id() {
        let input = [raw("HFC-134a", 2.0), raw("R-22", 4.0), raw("HFC-134a", 1.0)];
        let mut rows = filter_rows(&input);
        let provider =
            MockProvider::new(&[("fugitive-hfc-134a", 1.0), ("fugitive-hcfc-22", 1.0)]);
        let mut warnings = Vec::new();

        estimate_grouped(&mut rows, &provider, &mut warnings);

        let calls = provider.calls.borrow();
        assert_eq!(
            *calls,
            vec![
                ("fugitive-hfc-134a".to_string(), 3000.0),
                ("fugitive-hcfc-22".to_string(), 4000.0),
            ]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_grouped_apportionment_is_exact() {
        // 10 kg and 30 kg sharing one id, group estimate 400 kg CO2e:
        // the members must receive exactly 100 and 300.
        let input = [raw("HFC-125", 0.01), raw("HFC-125", 0.03)];
        let mut rows = filter_rows(&input);
        let provider = MockProvider::new(&[("fugitive-hfc-125", 10.0)]);
        let mut warnings = Vec::new();

        estimate_grouped(&mut rows, &provider, &mut warnings);

        assert_eq!(provider.calls.borrow().as_slice(), &[("fugitive-hfc-125".to_string(), 40.0)]);
        assert_eq!(rows[0].co2e_kg, Some(100.0));
        assert_eq!(rows[1].co2e_kg, Some(300.0));
    }

    #[test]
    fn test_failed_group_call_leaves_all_members_absent() {
        let input = [raw("HFC-23", 1.0), raw("HFC-23", 2.0), raw("R-22", 1.0)];
        let pipeline = Pipeline::new(
            AggregationPolicy::Grouped,
            Box::new(MockProvider::new(&[("fugitive-hcfc-22", 1.81)])),
        );

        let report = pipeline.process_rows(&input);

        assert_eq!(report.rows[0].co2e_kg, None);
        assert_eq!(report.rows[1].co2e_kg, None);
        assert_eq!(report.rows[2].co2e_kg, Some(1.81 * 1000.0));
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("fugitive-hfc-23"));
    }

    #[test]
    fn test_per_row_failure_is_one_warning_per_row() {
        let input = [raw("HFC-23", 1.0), raw("HFC-23", 2.0)];
        let pipeline = Pipeline::new(AggregationPolicy::PerRow, Box::new(MockProvider::new(&[])));

        let report = pipeline.process_rows(&input);

        assert!(report.rows.iter().all(|r| r.co2e_kg.is_none()));
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_output_preserves_input_order_under_grouping() {
        let input = [
            raw("R-22", 1.0),
            raw("HFC-134a", 2.0),
            raw("R-22", 3.0),
            raw("HFC-32", 4.0),
        ];
        let pipeline = Pipeline::new(
            AggregationPolicy::Grouped,
            Box::new(MockProvider::new(&[
                ("fugitive-hcfc-22", 1.0),
                ("fugitive-hfc-134a", 1.0),
                ("fugitive-hfc-32", 1.0),
            ])),
        );

        let report = pipeline.process_rows(&input);

        let names: Vec<_> = report.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["R-22", "HFC-134a", "R-22", "HFC-32"]);
    }

    #[test]
    fn test_runs_are_deterministic() {
        let input = [raw("HFC-134a", 2.0), raw("R-22", 4.0), raw("HFC-134a", 1.0)];
        let make_pipeline = || {
            Pipeline::new(
                AggregationPolicy::Grouped,
                Box::new(MockProvider::new(&[
                    ("fugitive-hfc-134a", 1.43),
                    ("fugitive-hcfc-22", 1.81),
                ])),
            )
        };

        let first = make_pipeline().process_rows(&input);
        let second = make_pipeline().process_rows(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn test_preview_makes_no_calls() {
        let input = [raw("HFC-134a", 2.0), raw("Unknown-Gas", 5.0)];
        let report = Pipeline::preview(&input);

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].co2e_kg, None);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_zero_mass_is_passed_through() {
        let input = [raw("HFC-32", 0.0)];
        let mut rows = filter_rows(&input);
        let provider = MockProvider::new(&[("fugitive-hfc-32", 0.675)]);
        let mut warnings = Vec::new();

        estimate_per_row(&mut rows, &provider, &mut warnings);

        assert_eq!(provider.calls.borrow().as_slice(), &[("fugitive-hfc-32".to_string(), 0.0)]);
        assert_eq!(rows[0].co2e_kg, Some(0.0));
    }
}
