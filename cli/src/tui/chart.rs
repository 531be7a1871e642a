use parkstat_core::{ChartSpec, SeriesColor, SeriesStyle};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    widgets::{
        Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph,
    },
    Frame,
};

const MIN_SAMPLES_PER_DAY: usize = 8;

fn color(series: SeriesColor) -> Color {
    match series {
        SeriesColor::Blue => Color::Blue,
        SeriesColor::Green => Color::Green,
        SeriesColor::Red => Color::Red,
        SeriesColor::Purple => Color::Magenta,
    }
}

pub fn draw_chart(f: &mut Frame, spec: &ChartSpec, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", spec.title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    if spec.is_empty() {
        let empty = Paragraph::new("No occupancy data for this month.")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let [x_min, x_max] = spec.x_bounds();
    let grid: Vec<[(f64, f64); 2]> = spec
        .grid_lines()
        .into_iter()
        .map(|y| [(x_min, y), (x_max, y)])
        .collect();

    // Grid first so the series draw over it; unnamed datasets stay out of the legend.
    let mut datasets: Vec<Dataset> = grid
        .iter()
        .map(|line| {
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::DarkGray))
                .data(line)
        })
        .collect();

    for series in spec.series.iter().filter(|s| s.style == SeriesStyle::Line) {
        datasets.push(
            Dataset::default()
                .name(series.label.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color(series.color)))
                .data(&series.points),
        );
    }

    // Two samples per braille column so neighbouring bars touch.
    let span = (x_max - x_min).max(1.0);
    let per_day =
        ((f64::from(area.width) * 2.0 / span).ceil() as usize).max(MIN_SAMPLES_PER_DAY);
    let layers = spec.area_layers(per_day);
    let mut named = Vec::new();
    for layer in &layers {
        let series = &spec.series[layer.series];
        let mut dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(color(series.color)).add_modifier(Modifier::DIM))
            .data(&layer.points);
        if !named.contains(&layer.series) {
            named.push(layer.series);
            dataset = dataset.name(series.label.clone());
        }
        datasets.push(dataset);
    }

    let x_labels = spec.x_labels();
    let y_labels: Vec<String> = spec.y_ticks().iter().map(|v| v.to_string()).collect();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(spec.x_label)
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(spec.y_label)
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, spec.y_max])
                .labels(y_labels),
        )
        .legend_position(Some(LegendPosition::TopRight))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    f.render_widget(chart, area);
}
