//! Output formatting for build command results.

use super::execute::BuildResult;
use crate::output::Outputable;

impl Outputable for BuildResult {
    fn to_table(&self) -> String {
        let report = &self.report;
        let mut lines = Vec::new();

        lines.push(format!("Build: {} ({})", self.package, report.backend));
        lines.push(String::new());
        if report.subsystems.is_empty() {
            lines.push("Subsystems (0):".to_string());
        } else {
            lines.push(format!(
                "Subsystems ({}): {}",
                report.subsystems.len(),
                report.subsystems.join(", ")
            ));
        }

        lines.push(format!("Relations ({}):", report.relations.len()));
        for name in &report.relations {
            lines.push(format!("  {}", name));
        }

        lines.push(format!("Constraints ({}):", report.constraints.len()));
        for c in &report.constraints {
            lines.push(format!("  {} [{}]", c.name, c.kind.as_str()));
        }

        if !report.deferred.is_empty() {
            lines.push(format!("Skipped, class not in schema ({}):", report.deferred.len()));
            for d in &report.deferred {
                lines.push(format!("  {} in {}: {}", d.rnum, d.subsystem, d.missing));
            }
        }
        if !report.ordinal.is_empty() {
            lines.push(format!("Ordinal, no constraint: {}", report.ordinal.join(", ")));
        }
        if !report.skipped_imports.is_empty() {
            lines.push(format!("Imported classes: {}", report.skipped_imports.join(", ")));
        }

        lines.push(String::new());
        lines.push("Population:".to_string());
        lines.push(format!("  Attributes:             {:>4}", report.population.attributes));
        lines.push(format!("  Identifiers:            {:>4}", report.population.identifiers));
        lines.push(format!(
            "  Identifier attributes:  {:>4}",
            report.population.identifier_attributes
        ));
        if let Some(path) = &self.population_file {
            lines.push(format!("Population written to {}", path));
        }

        lines.join("\n")
    }
}
