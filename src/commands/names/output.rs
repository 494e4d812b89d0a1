//! Output formatting for names command results.

use super::execute::NamesResult;
use crate::output::Outputable;

impl Outputable for NamesResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        let header = match &self.pattern {
            Some(p) => format!("{} matching '{}'", capitalize(&self.kind), p),
            None => capitalize(&self.kind),
        };
        lines.push(format!("{} ({}):", header, self.names.len()));

        if self.names.is_empty() {
            lines.push(format!("  No {} found.", self.kind));
        }
        for name in &self.names {
            lines.push(format!("  {}", name));
        }

        lines.join("\n")
    }
}

pub(super) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
