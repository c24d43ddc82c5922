//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Item picked up
    Collect,
    /// Player ran into an obstacle
    Collision,
    /// Score dropped below zero
    GameOver,
    /// Round started
    Start,
}

impl SoundEffect {
    /// Sound for a simulation event
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::Collected { .. } => SoundEffect::Collect,
            GameEvent::Collision { .. } => SoundEffect::Collision,
            GameEvent::GameOver => SoundEffect::GameOver,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_sfx_volume(),
        }
    }

    /// Pick up volume/mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_sfx_volume();
    }

    /// Mute/unmute without touching saved settings (focus loss)
    pub fn set_muted(&mut self, muted: bool, settings: &Settings) {
        self.volume = if muted {
            0.0
        } else {
            settings.effective_sfx_volume()
        };
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Collect => self.play_collect(ctx, vol),
            SoundEffect::Collision => self.play_collision(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
            SoundEffect::Start => self.play_start(ctx, vol),
        }
    }

    /// Create an oscillator routed through a gain node
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Collect - quick rising chirp
    fn play_collect(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 660.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(660.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1320.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.16).ok();
    }

    /// Collision - low thump
    fn play_collision(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 140.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.6, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(140.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(50.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Game over - slow descending tone
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 440.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 1.2)
            .ok();
        osc.frequency().set_value_at_time(440.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(110.0, t + 1.0)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 1.25).ok();
    }

    /// Start - two-note blip
    fn play_start(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 523.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.25)
            .ok();
        osc.frequency().set_value_at_time(523.0, t).ok();
        osc.frequency().set_value_at_time(784.0, t + 0.1).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.26).ok();
    }
}
