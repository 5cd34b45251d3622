//! Vaccination coverage aggregation over a canonical vaccine list.

use std::collections::HashSet;
use std::hash::Hash;

/// The canonical vaccines reported on, in report order.
pub const CANONICAL_VACCINES: [&str; 6] = [
    "BCG",
    "Hepatitis B",
    "DPT",
    "Polio",
    "Measles",
    "MMR",
];

/// Case-insensitive substring match of a canonical vaccine name against
/// a recorded vaccine name, so "Polio (OPV) dose 2" counts toward
/// "Polio".
pub fn vaccine_matches(canonical: &str, recorded: &str) -> bool {
    recorded.to_lowercase().contains(&canonical.to_lowercase())
}

/// Coverage percentage: children given over total children, as a whole
/// percent rounded to nearest. Zero children yields zero.
pub fn coverage_percentage(children_given: usize, total_children: usize) -> u32 {
    if total_children == 0 {
        return 0;
    }
    ((children_given as f64 / total_children as f64) * 100.0).round() as u32
}

/// Average number of distinct canonical vaccines covered per child,
/// rounded to one decimal place. Zero children yields 0.0.
pub fn average_vaccines_per_child(distinct_matches: usize, total_children: usize) -> f64 {
    if total_children == 0 {
        return 0.0;
    }
    let avg = distinct_matches as f64 / total_children as f64;
    (avg * 10.0).round() / 10.0
}

/// Cohort split for one canonical vaccine. Both halves preserve the
/// caller's cohort order; every child lands in exactly one of them.
#[derive(Debug, Clone, PartialEq)]
pub struct VaccineCohort<Id> {
    pub vaccine_name: &'static str,
    pub covered: Vec<Id>,
    pub missing: Vec<Id>,
}

/// Coverage across the whole cohort: one [`VaccineCohort`] per
/// canonical vaccine, plus the average count of distinct canonical
/// vaccines covered per child.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSummary<Id> {
    pub per_vaccine: Vec<VaccineCohort<Id>>,
    pub average_per_child: f64,
}

/// Aggregate coverage over (child, recorded vaccine name) dose pairs.
///
/// A child counts as covered for a canonical vaccine when any of their
/// doses matches it, so repeated doses of the same vaccine count once.
/// Doses matching no canonical vaccine contribute nothing, and the
/// average is taken over distinct canonical matches rather than raw
/// dose rows.
pub fn aggregate_coverage<Id>(children: &[Id], doses: &[(Id, &str)]) -> CoverageSummary<Id>
where
    Id: Copy + Eq + Hash,
{
    let mut per_vaccine = Vec::with_capacity(CANONICAL_VACCINES.len());
    let mut distinct_matches = 0;

    for vaccine in CANONICAL_VACCINES {
        let covered_ids: HashSet<Id> = doses
            .iter()
            .filter(|(_, recorded)| vaccine_matches(vaccine, recorded))
            .map(|(child_id, _)| *child_id)
            .collect();

        let covered: Vec<Id> = children
            .iter()
            .copied()
            .filter(|id| covered_ids.contains(id))
            .collect();
        let missing: Vec<Id> = children
            .iter()
            .copied()
            .filter(|id| !covered_ids.contains(id))
            .collect();

        // Summing covered-set sizes across vaccines equals summing
        // each child's distinct canonical matches.
        distinct_matches += covered.len();

        per_vaccine.push(VaccineCohort {
            vaccine_name: vaccine,
            covered,
            missing,
        });
    }

    CoverageSummary {
        average_per_child: average_vaccines_per_child(distinct_matches, children.len()),
        per_vaccine,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vaccine_matches_case_insensitive() {
        assert!(vaccine_matches("BCG", "bcg at birth"));
        assert!(vaccine_matches("Hepatitis B", "HEPATITIS B - 2nd dose"));
        assert!(vaccine_matches("Polio", "Oral polio vaccine"));
    }

    #[test]
    fn test_vaccine_matches_substring_only() {
        assert!(!vaccine_matches("MMR", "Measles"));
        // Substring matching is deliberately loose: "Measles" matches
        // inside "Measles, Mumps, Rubella".
        assert!(vaccine_matches("Measles", "Measles, Mumps, Rubella"));
        assert!(!vaccine_matches("DPT", "polio"));
    }

    #[test]
    fn test_coverage_percentage_rounds_to_nearest() {
        assert_eq!(coverage_percentage(6, 10), 60);
        assert_eq!(coverage_percentage(1, 3), 33);
        assert_eq!(coverage_percentage(2, 3), 67);
        assert_eq!(coverage_percentage(10, 10), 100);
        assert_eq!(coverage_percentage(0, 10), 0);
    }

    #[test]
    fn test_coverage_percentage_empty_cohort() {
        assert_eq!(coverage_percentage(0, 0), 0);
    }

    #[test]
    fn test_average_vaccines_per_child() {
        assert_eq!(average_vaccines_per_child(25, 10), 2.5);
        assert_eq!(average_vaccines_per_child(7, 3), 2.3);
        assert_eq!(average_vaccines_per_child(0, 5), 0.0);
        assert_eq!(average_vaccines_per_child(0, 0), 0.0);
    }

    #[test]
    fn test_canonical_list_order() {
        assert_eq!(CANONICAL_VACCINES[0], "BCG");
        assert_eq!(CANONICAL_VACCINES.len(), 6);
    }

    #[test]
    fn test_aggregate_splits_cohort_per_vaccine() {
        let children: Vec<u32> = (1..=10).collect();
        let doses: Vec<(u32, &str)> = (1..=6).map(|id| (id, "BCG at birth")).collect();

        let summary = aggregate_coverage(&children, &doses);

        let bcg = &summary.per_vaccine[0];
        assert_eq!(bcg.vaccine_name, "BCG");
        assert_eq!(bcg.covered, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(bcg.missing, vec![7, 8, 9, 10]);
        assert_eq!(coverage_percentage(bcg.covered.len(), children.len()), 60);

        // Covered and missing partition the cohort for every vaccine.
        for cohort in &summary.per_vaccine {
            assert_eq!(cohort.covered.len() + cohort.missing.len(), children.len());
            let covered: std::collections::HashSet<u32> = cohort.covered.iter().copied().collect();
            assert!(cohort.missing.iter().all(|id| !covered.contains(id)));
        }
    }

    #[test]
    fn test_aggregate_average_counts_distinct_vaccines_not_doses() {
        // Three Polio doses for one child count as a single covered
        // vaccine in the average.
        let children = vec![1u32];
        let doses = vec![
            (1u32, "Polio dose 1"),
            (1u32, "Polio dose 2"),
            (1u32, "Polio dose 3"),
        ];

        let summary = aggregate_coverage(&children, &doses);
        assert_eq!(summary.average_per_child, 1.0);
    }

    #[test]
    fn test_aggregate_ignores_non_canonical_doses() {
        let children = vec![1u32, 2];
        let doses = vec![(1u32, "Rotavirus"), (1u32, "BCG"), (2u32, "Varicella")];

        let summary = aggregate_coverage(&children, &doses);
        // Only the BCG dose matches a canonical vaccine.
        assert_eq!(summary.average_per_child, 0.5);
        assert_eq!(summary.per_vaccine[0].covered, vec![1]);
    }

    #[test]
    fn test_aggregate_empty_cohort() {
        let summary = aggregate_coverage::<u32>(&[], &[]);
        assert_eq!(summary.average_per_child, 0.0);
        assert!(summary.per_vaccine.iter().all(|c| c.covered.is_empty() && c.missing.is_empty()));
    }
}
