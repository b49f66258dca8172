//! TUI module for sfxpad
//!
//! Pad list on the left, oscilloscope and spectrum on the right.

mod pads;
mod spectrum;
mod state;
mod transport;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::Duration;

use sfx_synth::synth::SoundBank;

pub use state::Pad;

use pads::render_pads;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use state::AudioStats;
use transport::render_transport;
use waveform::render_waveform;

/// Audio visualization buffer size
pub const VIS_BUFFER_SIZE: usize = 1024;

const GAIN_STEP: f32 = 0.1;
const PAN_STEP: f32 = 0.1;

pub struct UiApp {
    bank: SoundBank,
    pads: Vec<Pad>,
    selected: usize,
    /// Mono tap of the device output
    audio_rx: Consumer<f32>,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    sample_rate: u32,
    /// Last control error, shown in the transport bar
    status: Option<String>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(bank: SoundBank, pads: Vec<Pad>, audio_rx: Consumer<f32>, sample_rate: u32) -> Self {
        Self {
            bank,
            pads,
            selected: 0,
            audio_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate as f32),
            sample_rate,
            status: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.spectrum.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            self.bank.collect_retired();
        }

        Ok(())
    }

    pub fn shutdown(&mut self) {
        self.bank.shutdown();
    }

    /// Free voices the mixer handed back after shutdown
    pub fn collect(&mut self) {
        self.bank.collect_retired();
    }

    /// Keep the last VIS_BUFFER_SIZE samples of the tap
    fn poll_audio(&mut self) {
        let available = self.audio_rx.slots();
        if available == 0 {
            return;
        }
        if let Ok(chunk) = self.audio_rx.read_chunk(available) {
            self.audio_buffer.extend(chunk);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let result = match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                Ok(())
            }
            KeyCode::Char(c) => match self.pads.iter().position(|pad| pad.key == c) {
                Some(index) => {
                    self.selected = index;
                    self.pads[index].paused = false;
                    self.bank.play(self.pads[index].id)
                }
                None => self.handle_selected(c),
            },
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                Ok(())
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(self.pads.len().saturating_sub(1));
                Ok(())
            }
            KeyCode::Left => self.nudge_pan(-PAN_STEP),
            KeyCode::Right => self.nudge_pan(PAN_STEP),
            _ => Ok(()),
        };

        self.status = result.err().map(|err| err.to_string());
    }

    /// Keys that act on the selected pad
    fn handle_selected(&mut self, c: char) -> sfx_synth::Result<()> {
        let Some(pad) = self.pads.get_mut(self.selected) else {
            return Ok(());
        };
        let handle = self.bank.handle_mut(pad.id)?;

        match c {
            ' ' => handle.stop(),
            'p' => {
                pad.paused = !pad.paused;
                if pad.paused {
                    handle.pause()
                } else {
                    handle.resume()
                }
            }
            '+' | '=' => {
                handle.set_gain(handle.gain() + GAIN_STEP);
                Ok(())
            }
            '-' => {
                handle.set_gain(handle.gain() - GAIN_STEP);
                Ok(())
            }
            'm' => {
                handle.mute();
                Ok(())
            }
            'l' => {
                handle.set_loop(!handle.looping());
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn nudge_pan(&mut self, delta: f32) -> sfx_synth::Result<()> {
        let Some(pad) = self.pads.get(self.selected) else {
            return Ok(());
        };
        let handle = self.bank.handle(pad.id)?;
        handle.set_pan(handle.pan() + delta);
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Min(8),    // Pads + scopes
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_transport(
            frame,
            rows[0],
            self.sample_rate,
            self.bank.live_voices(),
            &stats,
            self.status.as_deref(),
        );

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(20)])
            .split(rows[1]);
        render_pads(frame, columns[0], &self.bank, &self.pads, self.selected);

        let scopes = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);
        render_waveform(frame, scopes[0], &self.audio_buffer);
        render_spectrum(frame, scopes[1], self.spectrum.data());

        let help = Paragraph::new(
            " [1-9] Play  [Space] Stop  [P] Pause  [+/-] Gain  [←/→] Pan  [L] Loop  [M] Mute  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[2]);
    }
}
