//! Diagnostic reporter: final ordering and de-duplication.

use crate::types::Violation;

/// Sorts violations by `(line, column, rule id)` and collapses exact
/// duplicates (same rule id and position) to their first occurrence.
#[must_use]
pub fn report(mut violations: Vec<Violation>) -> Vec<Violation> {
    violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    violations.dedup_by(|later, earlier| {
        later.rule_id == earlier.rule_id
            && later.line == earlier.line
            && later.column == earlier.column
    });
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    fn v(rule: &str, line: usize, column: usize, message: &str) -> Violation {
        Violation::new(rule, Severity::Warning, (line, column), (line, column + 1), message)
    }

    #[test]
    fn orders_by_line_column_and_rule() {
        let out = report(vec![
            v("b", 2, 1, ""),
            v("a", 2, 1, ""),
            v("z", 1, 9, ""),
            v("a", 1, 10, ""),
        ]);
        let keys: Vec<(usize, usize, &str)> = out.iter().map(Violation::sort_key).collect();
        assert_eq!(keys, vec![(1, 9, "z"), (1, 10, "a"), (2, 1, "a"), (2, 1, "b")]);
    }

    #[test]
    fn keeps_first_of_duplicates() {
        let out = report(vec![v("a", 3, 1, "first"), v("a", 3, 1, "second"), v("b", 3, 1, "")]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].message, "first");
    }
}
