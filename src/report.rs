//! Human-readable rendering of the training evaluation report.

use crate::ml::models::{EvaluationReport, FeatureImportance};
use std::fmt::Write;

/// Render the evaluation report as a plain-text summary
pub fn render_text(report: &EvaluationReport) -> String {
    let mut out = String::new();

    writeln!(out, "Evaluation Results").unwrap();
    writeln!(out, "==================").unwrap();
    writeln!(
        out,
        "train: {} samples, test: {} samples",
        report.n_train, report.n_test
    )
    .unwrap();
    writeln!(out, "accuracy: {:.4}", report.accuracy).unwrap();
    writeln!(out).unwrap();

    writeln!(
        out,
        "{:<14} {:>9} {:>9} {:>9} {:>8}",
        "class", "precision", "recall", "f1", "support"
    )
    .unwrap();
    // Stable ordering: wildfire first.
    for class in ["wildfire", "non_wildfire"] {
        if let Some(metrics) = report.per_class.get(class) {
            writeln!(
                out,
                "{:<14} {:>9.4} {:>9.4} {:>9.4} {:>8}",
                class, metrics.precision, metrics.recall, metrics.f1_score, metrics.support
            )
            .unwrap();
        }
    }

    writeln!(out).unwrap();
    writeln!(out, "Average Precision Score: {:.4}", report.average_precision).unwrap();
    writeln!(out).unwrap();

    writeln!(out, "Feature Importances:").unwrap();
    for fi in &report.feature_importances {
        let bar_len = (fi.importance * 40.0).round() as usize;
        writeln!(
            out,
            "{:<28} {:.4} {}",
            fi.name,
            fi.importance,
            "#".repeat(bar_len)
        )
        .unwrap();
    }

    out
}

/// Render the feature importances as a horizontal bar chart (SVG)
pub fn render_importance_svg(importances: &[FeatureImportance]) -> String {
    const WIDTH: f64 = 640.0;
    const ROW_HEIGHT: f64 = 36.0;
    const LABEL_WIDTH: f64 = 220.0;
    const MARGIN: f64 = 20.0;

    let height = MARGIN * 2.0 + ROW_HEIGHT * importances.len() as f64 + 30.0;
    let max = importances
        .iter()
        .map(|f| f.importance)
        .fold(f64::EPSILON, f64::max);

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{height}" font-family="sans-serif" font-size="13">"#
    );
    svg.push('\n');
    let _ = writeln!(
        svg,
        r#"<text x="{MARGIN}" y="{}" font-size="16" font-weight="bold">Feature Importances</text>"#,
        MARGIN + 4.0
    );

    for (i, fi) in importances.iter().enumerate() {
        let y = MARGIN + 30.0 + i as f64 * ROW_HEIGHT;
        let bar_width = (WIDTH - LABEL_WIDTH - MARGIN * 2.0) * (fi.importance / max);

        let _ = writeln!(
            svg,
            r#"<text x="{MARGIN}" y="{}">{}</text>"#,
            y + 16.0,
            fi.name
        );
        let _ = writeln!(
            svg,
            r##"<rect x="{LABEL_WIDTH}" y="{y}" width="{bar_width:.1}" height="22" fill="#ff5500"/>"##
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{}">{:.4}</text>"#,
            LABEL_WIDTH + bar_width + 6.0,
            y + 16.0,
            fi.importance
        );
    }

    svg.push_str("</svg>\n");
    svg
}
