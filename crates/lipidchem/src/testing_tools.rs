use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};

/// Renders a diagnostic the way a terminal user would see it, minus the colours
pub fn render_diagnostic(diagnostic: &dyn Diagnostic) -> String {
    let mut out = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .with_width(80)
        .render_report(&mut out, diagnostic)
        .unwrap();
    out
}
