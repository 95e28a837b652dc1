use std::collections::HashSet;

use super::catalog::Catalog;

pub const TITLE: &str = "Am I Ready for Aerospace Engineering?";

pub const SUMMARY: &str = "A comprehensive holistic career & learning readiness assessment to determine your psychological, cognitive, and technical fit for pursuing aerospace engineering.";

pub const FIELD_DESCRIPTION: &str = "Aerospace Engineering is the primary field of engineering concerned with the development of aircraft and spacecraft. It includes two major and overlapping branches: aeronautical engineering (aircraft) and astronautical engineering (spacecraft).";

pub const DURATION: &str = "25-30 minutes";

/// (title, icon)
pub const CAREERS: [(&str, &str); 6] = [
    ("Aerospace Engineer", "rocket"),
    ("Avionics Engineer", "satellite"),
    ("Flight Systems Analyst", "plane"),
    ("Propulsion Engineer", "target"),
    ("UAV/Drone Engineer", "satellite"),
    ("R&D Engineer", "users"),
];

pub const TRAITS: [&str; 6] = [
    "Precision and attention to detail",
    "High-level analytical thinking",
    "Passion for flight, space, and technology",
    "Problem-solving under constraints",
    "Team collaboration and communication",
    "Working with simulations and models",
];

/// Number of distinct sections the catalog covers.
pub fn section_count(catalog: &Catalog) -> usize {
    catalog
        .questions()
        .iter()
        .map(|q| q.category)
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_has_three_sections() {
        assert_eq!(section_count(Catalog::builtin()), 3);
    }

    #[test]
    fn test_static_lists() {
        assert_eq!(CAREERS[0].0, "Aerospace Engineer");
        assert!(TRAITS.iter().all(|t| !t.is_empty()));
    }
}
