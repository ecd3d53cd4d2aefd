use moon_salvage_core::{ConfigError, ItemCatalog};

/// Radius of the lantern's light.
pub const LANTERN_LIGHT_RADIUS: f32 = 250.0;

/// Ticks in each half of a shovel swing.
pub const SHOVEL_SWING_TICKS: u32 = 25;

/// Degrees the holder turns per swing tick.
pub const SHOVEL_ROTATION_PER_TICK: f32 = 5.0;

/// Damage of one shovel hit.
pub const SHOVEL_DAMAGE: f32 = 30.0;

/// Tool bought at the terminal.
#[derive(Clone, Debug, PartialEq)]
pub struct Tool {
    phrase: String,
    label: String,
    cost: u32,
    weight: f32,
}

impl Tool {
    /// Looks up the tool answering to `phrase`.
    pub fn from_catalog(catalog: &ItemCatalog, phrase: &str) -> Result<Self, ConfigError> {
        let definition = catalog.tool(phrase)?;
        Ok(Self {
            phrase: definition.terminal_phrase.clone(),
            label: definition.terminal_print.clone(),
            cost: definition.cost,
            weight: definition.weight,
        })
    }

    /// Terminal phrase.
    #[must_use]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Catalogue label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Purchase price.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Carry weight.
    #[must_use]
    pub const fn weight(&self) -> f32 {
        self.weight
    }
}

/// Light source that can be switched on and off.
#[derive(Clone, Debug, PartialEq)]
pub struct Lantern {
    tool: Tool,
    lit: bool,
}

impl Lantern {
    /// Wraps a catalogue tool; starts switched off.
    #[must_use]
    pub const fn new(tool: Tool) -> Self {
        Self { tool, lit: false }
    }

    /// Underlying catalogue entry.
    #[must_use]
    pub const fn tool(&self) -> &Tool {
        &self.tool
    }

    /// Switches the light on.
    pub fn turn_on(&mut self) {
        self.lit = true;
    }

    /// Switches the light off.
    pub fn turn_off(&mut self) {
        self.lit = false;
    }

    /// Whether the light is on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.lit
    }

    /// Radius currently lit, if any.
    #[must_use]
    pub const fn light_radius(&self) -> Option<f32> {
        if self.lit {
            Some(LANTERN_LIGHT_RADIUS)
        } else {
            None
        }
    }
}

/// Melee tool swung out and back, hitting at most once per swing.
#[derive(Clone, Debug, PartialEq)]
pub struct Shovel {
    tool: Tool,
    swing_out: u32,
    swing_back: u32,
    landed: bool,
}

impl Shovel {
    /// Wraps a catalogue tool.
    #[must_use]
    pub const fn new(tool: Tool) -> Self {
        Self {
            tool,
            swing_out: 0,
            swing_back: 0,
            landed: false,
        }
    }

    /// Underlying catalogue entry.
    #[must_use]
    pub const fn tool(&self) -> &Tool {
        &self.tool
    }

    /// Starts a swing unless one is already in progress.
    pub fn swing(&mut self) -> bool {
        if self.swing_out > 0 || self.swing_back > 0 {
            return false;
        }
        self.swing_out = SHOVEL_SWING_TICKS;
        self.swing_back = SHOVEL_SWING_TICKS;
        self.landed = false;
        true
    }

    /// Whether the blade is on its outward stroke.
    #[must_use]
    pub const fn is_swinging(&self) -> bool {
        self.swing_out > 0
    }

    /// Whether any part of the swing is still running.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.swing_out > 0 || self.swing_back > 0
    }

    /// Advances the swing one tick and returns the holder's rotation change.
    pub fn update(&mut self) -> f32 {
        if self.swing_out > 0 {
            self.swing_out -= 1;
            SHOVEL_ROTATION_PER_TICK
        } else if self.swing_back > 0 {
            self.swing_back -= 1;
            -SHOVEL_ROTATION_PER_TICK
        } else {
            0.0
        }
    }

    /// Damage dealt to a target touched by the blade, once per swing.
    pub fn strike(&mut self) -> Option<f32> {
        if self.is_swinging() && !self.landed {
            self.landed = true;
            Some(SHOVEL_DAMAGE)
        } else {
            None
        }
    }
}
