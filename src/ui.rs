pub mod ring;
pub mod screen;

use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{canvas::Canvas, Paragraph, Widget, Wrap},
};

use lapring::{
    clock::Clock,
    engine::BoundaryEvent,
    entry::{DurationEntry, InputMode},
    presenter::{format_remaining, RingView},
};

use crate::{ui::ring::RingGeometry, ui::ring::RingShape, App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Setup => render_setup(&self.entry, area, buf),
            AppState::Ring => render_ring(self.ring.presenter(), Instant::now(), area, buf),
        }
    }
}

fn render_setup(entry: &DurationEntry, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let pad = area.height.saturating_sub(4) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(pad),
            Constraint::Length(1), // prompt
            Constraint::Length(1), // presets or text field
            Constraint::Length(1), // error
            Constraint::Length(1), // legend
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled("lap duration", bold_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let field = match entry.mode {
        InputMode::Buttons => {
            let spans = entry
                .presets
                .iter()
                .enumerate()
                .flat_map(|(idx, minutes)| {
                    let style = if idx == entry.selected {
                        bold_style.add_modifier(Modifier::REVERSED)
                    } else {
                        dim_style
                    };
                    [
                        Span::styled(format!(" {} min ", minutes), style),
                        Span::raw("  "),
                    ]
                })
                .collect::<Vec<Span>>();
            Line::from(spans)
        }
        InputMode::Typed => Line::from(vec![
            Span::styled("minutes: ", dim_style),
            Span::styled(entry.text.clone(), bold_style),
            Span::styled(" ", bold_style.add_modifier(Modifier::UNDERLINED)),
        ]),
    };
    Paragraph::new(field)
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    if let Some(error) = &entry.error {
        Paragraph::new(Span::styled(
            error.as_str(),
            Style::default().patch(bold_style).fg(Color::Red),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
    }

    let legend = match entry.mode {
        InputMode::Buttons => "(1-9) preset / (←→) select / (enter) start / (tab) type minutes / (esc)ape",
        InputMode::Typed => "(enter) start / (tab) presets / (esc)ape",
    };
    Paragraph::new(Span::styled(legend, italic_style))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[4], buf);
}

/// Largest rect in `area` that shows the canvas as a circle (cells are ~2:1)
fn ring_rect(area: Rect) -> Rect {
    let height = area.height.min(area.width / 2);
    let width = height * 2;
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn render_ring(view: &RingView, now: Instant, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(3),    // ring
            Constraint::Length(1), // status
            Constraint::Length(1), // legend
        ])
        .split(area);

    let fill = match (view.flash_at(now), view.is_paused()) {
        (Some(BoundaryEvent::HourReset), _) => Color::Magenta,
        (Some(BoundaryEvent::LapComplete), _) => Color::Yellow,
        (None, true) => Color::DarkGray,
        (None, false) => Color::White,
    };

    let geometry = RingGeometry::default();
    let bound = geometry.radius;
    let shape = RingShape {
        geometry,
        percent: view.progress_percent(),
        fill,
        guide: Color::Gray,
    };
    let rect = ring_rect(chunks[0]);
    Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-bound, bound])
        .y_bounds([-bound, bound])
        .paint(|ctx| ctx.draw(&shape))
        .render(rect, buf);

    if let Some(label) = view.center_label() {
        let middle = Rect::new(rect.x, rect.y + rect.height / 2, rect.width, rect.height.min(1));
        Paragraph::new(Span::styled(label, bold_style.fg(fill)))
            .alignment(Alignment::Center)
            .render(middle, buf);
    }

    if let Some(snapshot) = view.snapshot {
        let mut status = format!(
            "lap {}   {} left",
            snapshot.lap_index,
            format_remaining(snapshot.remaining_ms)
        );
        if snapshot.hour_resets > 0 {
            status.push_str(&format!("   hour {}", snapshot.hour_resets + 1));
        }
        if snapshot.is_paused {
            status.push_str("   PAUSED");
        }
        Paragraph::new(Span::styled(status, bold_style.add_modifier(Modifier::DIM)))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
    }

    let legend = if view.is_paused() {
        "(space) resume / (r)eset / (esc)ape"
    } else {
        "(space) pause / (r)eset / (esc)ape"
    };
    Paragraph::new(Span::styled(legend, italic_style))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
}
