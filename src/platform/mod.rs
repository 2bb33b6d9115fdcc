//! Platform abstraction layer
//!
//! The frame loop owns the game state and talks to the outside world only
//! through these traits:
//! - `Platform`: window caption, input events, presentation, pacing
//! - `AudioSink`: sound cues and ambient tracks (see `crate::audio`)
//! - `StageSource`: stage text (see `crate::stages`)

use std::path::Path;
use std::time::Duration;

use crate::audio::{AmbientCommand, AmbientTrack, AudioSink};
use crate::consts::GAME_TITLE;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, HeldKeys, SideEffect, TickInput, load_stage, tick};
use crate::stages::{StageError, StageNames, StageSource};
use crate::summary::RunSummary;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Horizontal stop, once the chest upgrade is owned
    Down,
    Jump,
    Screenshot,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(Key),
    Up(Key),
}

/// Everything the platform saw since the previous poll
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFrame {
    /// Window closed
    pub quit: bool,
    pub events: Vec<KeyEvent>,
}

/// Window, input and presentation backend
pub trait Platform {
    fn set_caption(&mut self, caption: &str);
    fn poll_input(&mut self) -> InputFrame;
    /// Draw the current stage
    fn present_frame(&mut self, state: &GameState);
    /// Draw the score screen
    fn present_summary(&mut self, summary: &RunSummary);
    fn save_screenshot(&mut self, path: &Path) -> std::io::Result<()>;
    /// Wall time since the run started
    fn elapsed(&self) -> Duration;
    /// Sleep out the rest of the frame budget
    fn wait_for_next_frame(&mut self, frame: Duration);
}

/// Turns key events into per-frame tick input
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    held: HeldKeys,
    jump_pressed: bool,
    jump_released: bool,
}

/// Requests that bypass the simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCommands {
    pub quit: bool,
    pub screenshots: u32,
}

impl InputTracker {
    pub fn handle(&mut self, frame: &InputFrame) -> FrameCommands {
        let mut commands = FrameCommands {
            quit: frame.quit,
            screenshots: 0,
        };
        for event in &frame.events {
            match *event {
                KeyEvent::Down(Key::Left) => self.held.left = true,
                KeyEvent::Up(Key::Left) => self.held.left = false,
                KeyEvent::Down(Key::Right) => self.held.right = true,
                KeyEvent::Up(Key::Right) => self.held.right = false,
                KeyEvent::Down(Key::Down) => self.held.down = true,
                KeyEvent::Up(Key::Down) => self.held.down = false,
                KeyEvent::Down(Key::Jump) => self.jump_pressed = true,
                KeyEvent::Up(Key::Jump) => self.jump_released = true,
                KeyEvent::Down(Key::Screenshot) => commands.screenshots += 1,
                KeyEvent::Down(Key::Escape) => commands.quit = true,
                KeyEvent::Up(_) => {}
            }
        }
        commands
    }

    /// Input for the next tick; one-shot edges are cleared
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            held: self.held,
            jump_pressed: self.jump_pressed,
            jump_released: self.jump_released,
        };
        self.jump_pressed = false;
        self.jump_released = false;
        input
    }
}

enum Flow {
    Continue,
    Quit,
    Finished(RunSummary),
}

/// One run of the game, from stage 0 to the end sentinel
pub struct Game<'a, P, A, S> {
    platform: &'a mut P,
    audio: &'a mut A,
    source: &'a mut S,
    names: &'a StageNames,
    settings: &'a Settings,
    state: GameState,
    input: InputTracker,
    screenshot_num: u32,
}

impl<'a, P: Platform, A: AudioSink, S: StageSource> Game<'a, P, A, S> {
    pub fn new(
        platform: &'a mut P,
        audio: &'a mut A,
        source: &'a mut S,
        names: &'a StageNames,
        settings: &'a Settings,
    ) -> Self {
        Self {
            platform,
            audio,
            source,
            names,
            settings,
            state: GameState::new(),
            input: InputTracker::default(),
            screenshot_num: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Run until quit (`None`) or the end sentinel (`Some` summary)
    pub fn run(&mut self) -> Result<Option<RunSummary>, StageError> {
        self.platform.set_caption(GAME_TITLE);
        self.dispatch(SideEffect::Ambient(AmbientCommand::Play(AmbientTrack::Main)));

        loop {
            match self.frame()? {
                Flow::Continue => {}
                Flow::Quit => return Ok(None),
                Flow::Finished(summary) => return Ok(Some(summary)),
            }
        }
    }

    /// One pass of the loop
    fn frame(&mut self) -> Result<Flow, StageError> {
        let polled = self.platform.poll_input();
        let commands = self.input.handle(&polled);
        if commands.quit {
            log::info!("Quit requested on stage {}", self.state.stage_index);
            return Ok(Flow::Quit);
        }
        for _ in 0..commands.screenshots {
            self.screenshot();
        }

        if let Some(stage) = self.state.pending_stage() {
            let text = self.source.stage_text(stage)?;
            let effects = load_stage(&mut self.state, &text)
                .map_err(|source| StageError::Level { stage, source })?;
            if self.state.phase == GamePhase::Finished {
                let summary = RunSummary::from_state(&self.state, self.platform.elapsed());
                log::info!("Run finished: {}", summary.lines().join(", "));
                self.platform.present_summary(&summary);
                return Ok(Flow::Finished(summary));
            }
            self.dispatch_all(effects);
        }

        let input = self.input.take_tick_input();
        let report = tick(&mut self.state, &input);
        self.dispatch_all(report.effects);

        self.platform.present_frame(&self.state);
        self.platform.wait_for_next_frame(self.settings.frame_duration());
        Ok(Flow::Continue)
    }

    fn screenshot(&mut self) {
        let path = self.settings.screenshot_path(self.screenshot_num);
        match self.platform.save_screenshot(&path) {
            Ok(()) => {
                log::info!("Saved {}", path.display());
                self.screenshot_num += 1;
            }
            Err(e) => log::warn!("Screenshot {} failed: {}", path.display(), e),
        }
    }

    fn dispatch_all(&mut self, effects: Vec<SideEffect>) {
        for effect in effects {
            self.dispatch(effect);
        }
    }

    fn dispatch(&mut self, effect: SideEffect) {
        match effect {
            SideEffect::Sound(cue) => self.audio.play(cue, self.settings.cue_volume(cue)),
            SideEffect::Ambient(command) => {
                let track = match command {
                    AmbientCommand::Play(track) | AmbientCommand::Stop(track) => track,
                };
                self.audio.ambient(command, self.settings.track_volume(track));
            }
            SideEffect::StageCaption(stage) => {
                let caption = self.names.caption(stage);
                self.platform.set_caption(&caption);
            }
        }
    }
}

/// Convenience wrapper: build a `Game` and run it
pub fn run<P: Platform, A: AudioSink, S: StageSource>(
    platform: &mut P,
    audio: &mut A,
    source: &mut S,
    names: &StageNames,
    settings: &Settings,
) -> Result<Option<RunSummary>, StageError> {
    Game::new(platform, audio, source, names, settings).run()
}
