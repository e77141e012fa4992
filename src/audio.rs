//! Sound notifications
//!
//! The simulation fires one-way "play X" calls; playback, mixing and volume
//! belong to the host.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player jump or wall jump
    Jump,
    /// Dash started
    Dash,
    /// Enemy killed, player hit or player died
    Hit,
    /// Enemy fired a fireball
    Shoot,
    /// Looping level ambience
    Ambience,
}

impl SoundEffect {
    /// Asset-style key for hosts that index sounds by name
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump",
            SoundEffect::Dash => "dash",
            SoundEffect::Hit => "hit",
            SoundEffect::Shoot => "shoot",
            SoundEffect::Ambience => "ambience",
        }
    }
}

/// Fire-and-forget sound sink
pub trait AudioSink {
    fn play(&mut self, sfx: SoundEffect);
}

/// Discards every sound (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _sfx: SoundEffect) {}
}

/// Records sounds in order
impl AudioSink for Vec<SoundEffect> {
    fn play(&mut self, sfx: SoundEffect) {
        self.push(sfx);
    }
}
