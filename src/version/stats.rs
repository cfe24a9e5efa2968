//! Descriptive statistics over the per-module counts of a store

use crate::version::aggregate::CategoryCounts;
use crate::version::semver::DifferenceClass;
use crate::version::store::SemanticStore;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStatistics {
    /// Category name as written in the store (`MAJOR`, ..., `TOTAL`)
    pub category: &'static str,
    pub min: u64,
    pub max: u64,
    pub median: f64,
    pub mean: f64,
    pub total: u64,
}

impl CategoryStatistics {
    fn from_values(category: &'static str, mut values: Vec<u64>) -> Self {
        if values.is_empty() {
            return Self {
                category,
                min: 0,
                max: 0,
                median: 0.0,
                mean: 0.0,
                total: 0,
            };
        }

        values.sort_unstable();
        let n = values.len();
        let total: u64 = values.iter().sum();
        let median = if n % 2 == 0 {
            (values[n / 2 - 1] + values[n / 2]) as f64 / 2.0
        } else {
            values[n / 2] as f64
        };

        Self {
            category,
            min: values[0],
            max: values[n - 1],
            median,
            mean: total as f64 / n as f64,
            total,
        }
    }
}

/// Statistics for each category, plus `TOTAL`, across all modules of all pull requests
pub fn category_statistics(store: &SemanticStore) -> Vec<CategoryStatistics> {
    let modules: Vec<&CategoryCounts> = store.module_counts().collect();

    let mut stats: Vec<CategoryStatistics> = DifferenceClass::ALL
        .iter()
        .map(|class| {
            let values = modules.iter().map(|counts| counts.get(*class)).collect();
            CategoryStatistics::from_values(class.as_str(), values)
        })
        .collect();

    let totals = modules.iter().map(|counts| counts.total()).collect();
    stats.push(CategoryStatistics::from_values("TOTAL", totals));

    stats
}

/// Render statistics as an aligned text table
pub fn render_table(stats: &[CategoryStatistics]) -> String {
    let headers = ["Semantic Difference", "Min", "Max", "Median", "Average", "Total"];
    let rows: Vec<[String; 6]> = stats
        .iter()
        .map(|s| {
            [
                s.category.to_string(),
                s.min.to_string(),
                s.max.to_string(),
                format!("{:.2}", s.median),
                format!("{:.2}", s.mean),
                s.total.to_string(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let header_cells = headers.map(str::to_string);
    for row in std::iter::once(&header_cells).chain(rows.iter()) {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                if i == 0 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::aggregate::SemanticSummary;
    use indexmap::IndexMap;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case(vec![3, 1, 2], 1, 3, 2.0, 2.0, 6)]
    #[case(vec![4, 1, 3, 2], 1, 4, 2.5, 2.5, 10)]
    #[case(vec![0, 0, 9], 0, 9, 0.0, 3.0, 9)]
    #[case(vec![], 0, 0, 0.0, 0.0, 0)]
    fn from_values_computes_statistics(
        #[case] values: Vec<u64>,
        #[case] min: u64,
        #[case] max: u64,
        #[case] median: f64,
        #[case] mean: f64,
        #[case] total: u64,
    ) {
        let stats = CategoryStatistics::from_values("MAJOR", values);
        assert_eq!(
            stats,
            CategoryStatistics {
                category: "MAJOR",
                min,
                max,
                median,
                mean,
                total,
            }
        );
    }

    #[test]
    fn category_statistics_spans_all_pull_requests() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = SemanticStore::load(temp_dir.path().join("store.json")).unwrap();

        for (pr, major, patch) in [("1", 2, 0), ("2", 4, 6)] {
            let counts = CategoryCounts {
                major,
                patch,
                ..Default::default()
            };
            let mut modules = IndexMap::new();
            modules.insert("core".to_string(), counts);
            store
                .record(&SemanticSummary {
                    pr_url: format!("https://github.com/acme/widgets/pull/{pr}"),
                    affected_modules: 1,
                    global: counts,
                    modules,
                })
                .unwrap();
        }

        let stats = category_statistics(&store);

        assert_eq!(stats.len(), 6);
        assert_eq!(stats[0].category, "MAJOR");
        assert_eq!((stats[0].min, stats[0].max, stats[0].total), (2, 4, 6));
        assert_eq!(stats[2].category, "PATCH");
        assert_eq!(stats[2].median, 3.0);
        assert_eq!(stats[5].category, "TOTAL");
        assert_eq!(stats[5].total, 12);
    }

    #[test]
    fn render_table_aligns_columns() {
        let stats = vec![CategoryStatistics::from_values("MAJOR", vec![1, 2])];

        let table = render_table(&stats);

        assert_eq!(
            table,
            "Semantic Difference  Min  Max  Median  Average  Total\n\
             MAJOR                  1    2    1.50     1.50      3\n"
        );
    }
}
