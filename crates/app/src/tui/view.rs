use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Map},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};
use gempa_core::app::{MarkerSpec, PanelState, PanelView, ShakemapRef, SHAKEMAP_HEADING};
use gempa_core::domain::SeverityColor;
use std::time::Instant;
use super::camera::CameraView;
use super::format::last_update_line;
use super::model::{PopupState, TuiModel, ViewMode};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Rings per marker used to fill the disc
const FILL_RINGS: usize = 6;

/// The View component of MVU - responsible for rendering the model
pub struct TuiView;

impl TuiView {
    /// Render the entire TUI based on the current model state
    pub fn render(model: &TuiModel, frame: &mut Frame, now: Instant) {
        let size = frame.area();

        // Main layout
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title bar
                Constraint::Min(0),    // Main content
                Constraint::Length(3), // Status bar
            ])
            .split(size);

        Self::render_title_bar(model, frame, chunks[0], now);

        match model.mode {
            ViewMode::Map => Self::render_map_view(model, frame, chunks[1], now),
            ViewMode::Help => Self::render_help_view(model, frame, chunks[1]),
        }

        Self::render_status_bar(model, frame, chunks[2]);
    }

    /// Render the title bar
    fn render_title_bar(model: &TuiModel, frame: &mut Frame, area: Rect, now: Instant) {
        let loading_indicator = if model.projection.loading {
            " [MEMUAT...]"
        } else {
            ""
        };

        let spinner = if model.is_spinning() {
            let elapsed = now.saturating_duration_since(model.ui_state.started);
            let frame_idx = (elapsed.as_millis() / 120) as usize;
            format!(" {}", SPINNER[frame_idx % SPINNER.len()])
        } else {
            String::new()
        };

        let title_text = format!("Gempa Terkini | BMKG{}{}", loading_indicator, spinner);

        let title_paragraph = Paragraph::new(title_text)
            .style(Style::default().fg(Color::White).bg(Color::Blue))
            .alignment(Alignment::Center);

        frame.render_widget(title_paragraph, area);
    }

    fn render_map_view(model: &TuiModel, frame: &mut Frame, area: Rect, now: Instant) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);

        Self::render_map(model, frame, chunks[0], now);
        Self::render_panel(model, frame, chunks[1]);
    }

    /// Render the base map and the marker
    fn render_map(model: &TuiModel, frame: &mut Frame, area: Rect, now: Instant) {
        let layer = model.ui_state.layer;
        let view = model.ui_state.camera.view_at(now);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", layer.name()))
            .title_bottom(Line::from(format!(" {} ", layer.attribution())).right_aligned());
        let inner = block.inner(area);
        let (x_bounds, y_bounds) = view.bounds(inner.width, inner.height);

        let marker = model.drawable_marker();
        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .background_color(layer.background())
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                ctx.draw(&Map {
                    resolution: layer.resolution(),
                    color: layer.land_color(),
                });

                if let Some(marker) = marker {
                    ctx.layer();
                    for circle in marker_circles(marker, &view) {
                        ctx.draw(&circle);
                    }
                }
            });

        frame.render_widget(canvas, area);

        if model.ui_state.popup == PopupState::Open {
            if let Some(marker) = marker {
                Self::render_popup(marker, frame, inner, x_bounds, y_bounds);
            }
        }
    }

    /// Popup box anchored just above the marker
    fn render_popup(
        marker: &MarkerSpec,
        frame: &mut Frame,
        map_area: Rect,
        x_bounds: [f64; 2],
        y_bounds: [f64; 2],
    ) {
        let Some((col, row)) = to_cell(marker, map_area, x_bounds, y_bounds) else {
            return;
        };

        let mut lines = vec![Line::from(Span::styled(
            marker.popup.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        lines.extend(marker.popup.lines.iter().map(|l| Line::from(l.as_str())));

        let content_width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
        let width = (content_width + 2).min(map_area.width);
        let height = (lines.len() as u16 + 2).min(map_area.height);

        let right = map_area.x + map_area.width;
        let bottom = map_area.y + map_area.height;
        let x = col.saturating_sub(width / 2).clamp(map_area.x, right.saturating_sub(width));
        let y = row.saturating_sub(height + 1).clamp(map_area.y, bottom.saturating_sub(height));
        let popup_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, popup_area);
        let popup = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::White).bg(Color::Black));
        frame.render_widget(popup, popup_area);
    }

    /// Render the info panel
    fn render_panel(model: &TuiModel, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Info ");

        let lines: Vec<Line> = if !model.projection.panel_visible {
            let text = if model.projection.loading {
                "Memuat data gempa..."
            } else {
                "Menunggu data..."
            };
            vec![Line::from(Span::styled(text, Style::default().fg(Color::Yellow)))]
        } else {
            match &model.projection.panel {
                PanelState::Empty => vec![Line::from("Menunggu data...")],
                PanelState::Event(panel) => panel_lines(panel),
                PanelState::Error(message) => vec![Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ))],
            }
        };

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, area);
    }

    /// Render help view
    fn render_help_view(model: &TuiModel, frame: &mut Frame, area: Rect) {
        let layer = model.ui_state.layer;
        let help_text = vec![
            Line::from(Span::styled(
                "Gempa Terkini Help",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Map:", Style::default().add_modifier(Modifier::UNDERLINED))),
            Line::from("  s - Switch base layer (Peta / Satelit)"),
            Line::from("  c - Recenter on Indonesia"),
            Line::from("  p - Show/hide the marker popup"),
            Line::from(format!("  Layer {}: {}", layer.name(), layer.tile_url())),
            Line::from(""),
            Line::from(Span::styled("Data:", Style::default().add_modifier(Modifier::UNDERLINED))),
            Line::from("  r / F5 - Refresh now"),
            Line::from("  The latest event is also checked every 30 seconds"),
            Line::from(""),
            Line::from(Span::styled(
                "Global:",
                Style::default().add_modifier(Modifier::UNDERLINED),
            )),
            Line::from("  ? - Show this help"),
            Line::from("  Ctrl+C / Esc / q - Quit"),
            Line::from(""),
            Line::from("Press any key to close help..."),
        ];

        let help = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: true });

        frame.render_widget(help, area);
    }

    /// Render the status bar at the bottom
    fn render_status_bar(model: &TuiModel, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let updated = Paragraph::new(last_update_line(model.projection.last_checked))
            .style(Style::default().fg(Color::Cyan));
        frame.render_widget(updated, chunks[0]);

        let status_paragraph = Paragraph::new(Self::build_status_text(model))
            .style(Style::default().fg(Color::White).bg(Color::DarkGray));
        frame.render_widget(status_paragraph, chunks[1]);

        let hints_paragraph = Paragraph::new(Self::get_key_hints(model))
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(hints_paragraph, chunks[2]);
    }

    fn build_status_text(model: &TuiModel) -> String {
        [
            format!("{} events", model.projection.renders),
            format!("{} failures", model.projection.failures),
            format!("Layer: {}", model.ui_state.layer.name()),
        ]
        .join(" | ")
    }

    fn get_key_hints(model: &TuiModel) -> &'static str {
        match model.mode {
            ViewMode::Map => "? Help | r Refresh | s Layer | c Recenter | p Popup | q Quit",
            ViewMode::Help => "Any key to close",
        }
    }
}

/// Panel content for an event
fn panel_lines(panel: &PanelView) -> Vec<Line<'static>> {
    let badge_style = Style::default()
        .fg(if panel.badge.color.prefers_dark_text() { Color::Black } else { Color::White })
        .bg(severity_color(panel.badge.color))
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(panel.heading, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(format!(" {} ", panel.badge.text), badge_style)),
        Line::from(""),
    ];

    for row in &panel.rows {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", row.label), Style::default().fg(Color::Gray)),
            Span::raw(row.value.clone()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        SHAKEMAP_HEADING,
        Style::default().add_modifier(Modifier::UNDERLINED),
    )));

    let shakemap_style = match panel.shakemap {
        ShakemapRef::Available { .. } => Style::default().fg(Color::Cyan),
        _ => Style::default().fg(Color::DarkGray),
    };
    lines.push(Line::from(Span::styled(panel.shakemap.display_text().to_string(), shakemap_style)));

    lines
}

pub fn severity_color(color: SeverityColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

/// Concentric circles that fill the marker disc, topped by the outline
fn marker_circles(marker: &MarkerSpec, view: &CameraView) -> Vec<Circle> {
    let radius = marker.radius * view.degrees_per_px();
    let fill = severity_color(marker.fill);
    let (r, g, b) = marker.outline;

    let mut circles: Vec<Circle> = (1..=FILL_RINGS)
        .map(|ring| Circle {
            x: marker.position.lon,
            y: marker.position.lat,
            radius: radius * ring as f64 / (FILL_RINGS + 1) as f64,
            color: fill,
        })
        .collect();

    circles.push(Circle {
        x: marker.position.lon,
        y: marker.position.lat,
        radius,
        color: Color::Rgb(r, g, b),
    });

    circles
}

/// Terminal cell of the marker, if it lies inside the map area
fn to_cell(
    marker: &MarkerSpec,
    area: Rect,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) -> Option<(u16, u16)> {
    let lon = marker.position.lon;
    let lat = marker.position.lat;
    if lon < x_bounds[0] || lon > x_bounds[1] || lat < y_bounds[0] || lat > y_bounds[1] {
        return None;
    }

    let fx = (lon - x_bounds[0]) / (x_bounds[1] - x_bounds[0]);
    let fy = (y_bounds[1] - lat) / (y_bounds[1] - y_bounds[0]);
    let col = area.x + (fx * f64::from(area.width.saturating_sub(1))).round() as u16;
    let row = area.y + (fy * f64::from(area.height.saturating_sub(1))).round() as u16;
    Some((col, row))
}
