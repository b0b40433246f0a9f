// Efficiency view: headline metrics against targets, monthly throughput
// bars, and the analysis summary with suggestions.

use aerotech_core::models::analytics::{
    monthly_scale, EfficiencyAnalysis, EfficiencyMetric, EfficiencyMetrics, MonthlyEfficiency,
};
use aerotech_core::protocol::ViewId;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use super::{bar, render_load_status};
use crate::tui::ViewState;

const BAR_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    if render_load_status(frame, area, "Efficiency", &state.status(ViewId::Efficiency)) {
        return;
    }
    let Some(snapshot) = &state.efficiency else {
        let paragraph = Paragraph::new("No efficiency data yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Efficiency"));
        frame.render_widget(paragraph, area);
        return;
    };

    let [metrics_area, lower] =
        Layout::vertical([Constraint::Length(6), Constraint::Min(4)]).areas(area);
    let [monthly_area, analysis_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(lower);

    frame.render_widget(metrics_table(&snapshot.metrics), metrics_area);

    let monthly = Paragraph::new(monthly_lines(&snapshot.monthly))
        .block(Block::default().borders(Borders::ALL).title("Monthly completed / planned"));
    frame.render_widget(monthly, monthly_area);

    let analysis = Paragraph::new(analysis_lines(snapshot.analysis.as_ref()))
        .block(Block::default().borders(Borders::ALL).title("Analysis"))
        .wrap(Wrap { trim: true });
    frame.render_widget(analysis, analysis_area);
}

/// Metric table; used by the technician Metrics view too.
pub fn metrics_table(metrics: &EfficiencyMetrics) -> Table<'static> {
    let header = Row::new(vec!["Metric", "Value", "Target", ""]).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );
    let rows: Vec<Row> = EfficiencyMetric::ALL
        .iter()
        .map(|metric| {
            let (mark, color) = target_mark(metrics.on_target(*metric));
            Row::new(vec![
                Cell::from(metric.label()),
                Cell::from(format_value(metrics.value(*metric), metric.unit())),
                Cell::from(format_value(metrics.target(*metric), metric.unit())),
                Cell::from(mark).style(Style::default().fg(color)),
            ])
        })
        .collect();
    let widths = [
        Constraint::Min(24),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(3),
    ];
    Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Metrics vs targets"))
}

pub fn format_value(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if unit == "%" => format!("{v:.1}%"),
        Some(v) => format!("{v:.1} {unit}"),
        None => "--".to_string(),
    }
}

pub fn target_mark(on_target: Option<bool>) -> (&'static str, Color) {
    match on_target {
        Some(true) => ("✓", Color::Green),
        Some(false) => ("✗", Color::Red),
        None => ("-", Color::DarkGray),
    }
}

fn monthly_lines(months: &[MonthlyEfficiency]) -> Vec<Line<'static>> {
    if months.is_empty() {
        return vec![Line::from(Span::styled(
            "No monthly data.",
            Style::default().fg(Color::DarkGray),
        ))];
    }
    let scale = monthly_scale(months);
    months
        .iter()
        .flat_map(|m| {
            [
                Line::from(vec![
                    Span::raw(format!("{:<8}", m.month)),
                    Span::styled(bar(m.completed, scale, BAR_WIDTH), Style::default().fg(Color::Green)),
                    Span::raw(format!(" {:.0}", m.completed)),
                ]),
                Line::from(vec![
                    Span::raw(" ".repeat(8)),
                    Span::styled(bar(m.planned, scale, BAR_WIDTH), Style::default().fg(Color::DarkGray)),
                    Span::raw(format!(" {:.0}", m.planned)),
                ]),
            ]
        })
        .collect()
}

fn analysis_lines(analysis: Option<&EfficiencyAnalysis>) -> Vec<Line<'static>> {
    let Some(analysis) = analysis else {
        return vec![Line::from(Span::styled(
            "Analysis unavailable.",
            Style::default().fg(Color::DarkGray),
        ))];
    };
    let mut lines = Vec::new();
    if let Some(summary) = &analysis.summary {
        lines.push(Line::raw(summary.clone()));
    }
    if !analysis.suggestions.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "Suggestions",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.extend(analysis.suggestions.iter().map(|s| Line::raw(format!("- {s}"))));
    }
    lines
}
