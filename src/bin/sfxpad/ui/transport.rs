//! Status bar - sample rate, live voices, output level, last error

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::state::AudioStats;

pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    sample_rate: u32,
    live_voices: usize,
    stats: &AudioStats,
    status: Option<&str>,
) {
    let block = Block::default().title(" sfxpad ").borders(Borders::ALL);

    let mut spans = vec![
        Span::styled(
            format!(" {:.1}kHz  ", sample_rate as f32 / 1000.0),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Voices: {live_voices}  "),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}  ", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ];
    if let Some(status) = status {
        spans.push(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Red),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
