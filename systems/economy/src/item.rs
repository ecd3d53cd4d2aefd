use glam::Vec2;
use moon_salvage_core::{ConfigError, Handedness, ItemCatalog, ValueTier};
use rand::{seq::SliceRandom, Rng};

/// Scrap lying in a room or carried by the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    position: Vec2,
    handedness: Handedness,
    tier: ValueTier,
    value: u32,
    weight: f32,
    sprite: String,
    on_ground: bool,
}

impl Item {
    /// Picks a random template for the handedness and tier, and rolls its
    /// value inside the template's range.
    pub fn generate<R: Rng + ?Sized>(
        catalog: &ItemCatalog,
        handedness: Handedness,
        tier: ValueTier,
        position: Vec2,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let templates = catalog.items(handedness, tier)?;
        let template = templates
            .choose(rng)
            .ok_or(ConfigError::MissingItemTier { handedness, tier })?;
        let [low, high] = template.value_range;

        Ok(Self {
            position,
            handedness,
            tier,
            value: rng.gen_range(low..=high),
            weight: template.weight,
            sprite: template.sprite_filename.clone(),
            on_ground: true,
        })
    }

    /// World position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Whether the item needs both hands.
    #[must_use]
    pub const fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// Value bracket the item was drawn from.
    #[must_use]
    pub const fn tier(&self) -> ValueTier {
        self.tier
    }

    /// Full sale value.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Carry weight.
    #[must_use]
    pub const fn weight(&self) -> f32 {
        self.weight
    }

    /// World sprite reference.
    #[must_use]
    pub fn sprite(&self) -> &str {
        &self.sprite
    }

    /// Whether the item lies in the world rather than in an inventory.
    #[must_use]
    pub const fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    /// Moves the item into an inventory.
    pub fn pick_up(&mut self) {
        self.on_ground = false;
    }

    /// Drops the item at `position`.
    pub fn drop_at(&mut self, position: Vec2) {
        self.position = position;
        self.on_ground = true;
    }
}
