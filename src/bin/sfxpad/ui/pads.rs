//! Pad list - one row per sound with its live parameters

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use sfx_synth::synth::SoundBank;

use super::state::Pad;

pub fn render_pads(frame: &mut Frame, area: Rect, bank: &SoundBank, pads: &[Pad], selected: usize) {
    let block = Block::default().title(" Pads ").borders(Borders::ALL);

    let items: Vec<ListItem> = pads
        .iter()
        .enumerate()
        .map(|(i, pad)| {
            let Ok(handle) = bank.handle(pad.id) else {
                return ListItem::new(format!(" {}  {:<10} unloaded", pad.key, pad.name));
            };

            let state = if pad.paused {
                Span::styled("⏸", Style::default().fg(Color::Yellow))
            } else if handle.is_playing() {
                Span::styled("▶", Style::default().fg(Color::Green))
            } else {
                Span::styled("·", Style::default().fg(Color::DarkGray))
            };

            let mut name_style = Style::default();
            if i == selected {
                name_style = name_style.add_modifier(Modifier::REVERSED);
            }

            ListItem::new(Line::from(vec![
                Span::raw(format!(" {} ", pad.key)),
                state,
                Span::styled(format!(" {:<10}", pad.name), name_style),
                Span::styled(
                    format!(
                        " gain {:.1} pan {:+.1}{}",
                        handle.gain(),
                        handle.pan(),
                        if handle.looping() { " loop" } else { "" }
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
