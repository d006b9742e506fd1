//! Presentation collaborators
//!
//! The host engine renders notifications, the end screen and audio. Each
//! collaborator is a trait whose methods default to doing nothing, and any of
//! them may be missing entirely; [`Presentation::dispatch`] routes simulation
//! events to whichever are present.

use crate::audio::SoundEffect;
use crate::sim::GameEvent;

/// Gate board pop-ups
pub trait GateNotifier {
    fn display_gate_notification(&mut self, _flight_number: u32, _gate_name: &str) {}

    fn display_fake_gate_notification(&mut self, _flight_number: u32, _decoy_gate_name: &str) {}
}

/// Messages on the player's phone
pub trait PhoneNotifier {
    fn display_gate_message(&mut self, _gate_name: &str) {}
}

/// Results screen shown when a round is over
pub trait EndGameUi {
    fn set_lose_message(&mut self, _text: &str) {}

    fn set_score_message(&mut self, _time_survived: f32, _score: f32) {}

    fn display_end_game_screen(&mut self) {}
}

pub trait AudioController {
    fn play(&mut self, _sound: SoundEffect) {}

    fn set_soundtrack_pitch(&mut self, _multiplier: f32) {}
}

/// The set of collaborators a session reports to
#[derive(Default)]
pub struct Presentation {
    pub gate_notifier: Option<Box<dyn GateNotifier>>,
    pub phone: Option<Box<dyn PhoneNotifier>>,
    pub end_game: Option<Box<dyn EndGameUi>>,
    pub audio: Option<Box<dyn AudioController>>,
}

impl Presentation {
    /// No collaborators; every event is dropped
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gate_notifier(mut self, notifier: impl GateNotifier + 'static) -> Self {
        self.gate_notifier = Some(Box::new(notifier));
        self
    }

    pub fn with_phone(mut self, phone: impl PhoneNotifier + 'static) -> Self {
        self.phone = Some(Box::new(phone));
        self
    }

    pub fn with_end_game(mut self, end_game: impl EndGameUi + 'static) -> Self {
        self.end_game = Some(Box::new(end_game));
        self
    }

    pub fn with_audio(mut self, audio: impl AudioController + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    /// Route events to the collaborators, in order
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            self.dispatch_one(event);
        }
    }

    fn dispatch_one(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::ChargingStarted => self.play(SoundEffect::PhoneCharging),
            GameEvent::GateReached { .. } => self.play(SoundEffect::GateReached),
            GameEvent::GateAssigned {
                flight_number,
                gate,
            } => {
                if let Some(notifier) = self.gate_notifier.as_mut() {
                    notifier.display_gate_notification(flight_number, gate.name());
                }
                if let Some(phone) = self.phone.as_mut() {
                    phone.display_gate_message(gate.name());
                }
                self.play(SoundEffect::Notification);
            }
            GameEvent::FakeGateNotification {
                flight_number,
                decoy,
            } => {
                if let Some(notifier) = self.gate_notifier.as_mut() {
                    notifier.display_fake_gate_notification(flight_number, decoy.name());
                }
                self.play(SoundEffect::Notification);
            }
            GameEvent::Lost { reason } => {
                if let Some(end_game) = self.end_game.as_mut() {
                    end_game.set_lose_message(reason.lose_message());
                }
                self.play(SoundEffect::GameOver);
            }
            GameEvent::RoundEnded {
                time_survived,
                score,
                ..
            } => {
                if let Some(end_game) = self.end_game.as_mut() {
                    end_game.set_score_message(time_survived, score);
                    end_game.display_end_game_screen();
                }
            }
            GameEvent::SoundtrackPitch { multiplier } => {
                if let Some(audio) = self.audio.as_mut() {
                    audio.set_soundtrack_pitch(multiplier);
                }
            }
            // Animation and HUD cues are read straight off the frame output
            GameEvent::RoundStarted { .. }
            | GameEvent::ChargingStopped
            | GameEvent::GateTimerReset { .. }
            | GameEvent::DirectionFlip => {}
        }
    }

    fn play(&mut self, sound: SoundEffect) {
        if let Some(audio) = self.audio.as_mut() {
            audio.play(sound);
        }
    }
}
