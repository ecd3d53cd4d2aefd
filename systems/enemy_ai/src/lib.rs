#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Autonomous enemies: wall-colliding agents and stationary turrets.
//!
//! Every agent is an [`Agent`] record holding the state all monsters share
//! (position, health, contact damage timer, collision hull) plus a
//! [`Behavior`] carrying the state of its specific brain. Agents are ticked
//! with [`Agent::update`] against a read-only [`PlayerView`] and the realm's
//! [`Terrain`]; turrets are ticked with [`Turret::update`] against the wall
//! set and push the bullets they fire into a caller-owned buffer.
//!
//! [`PlayerView`]: moon_salvage_core::PlayerView
//! [`Terrain`]: moon_salvage_system_navigation::Terrain

mod agent;
mod body;
pub mod chaser;
pub mod giant;
mod roam;
pub mod thumper;
pub mod turret;

use moon_salvage_core::{ConfigError, MonsterTable, Realm};
use moon_salvage_system_spawning::SpawnRequest;

pub use agent::{Agent, Behavior};
pub use body::Body;
pub use chaser::ChaserState;
pub use giant::{GiantMode, GiantState};
pub use roam::RoamState;
pub use thumper::{ThumperMode, ThumperState};
pub use turret::Turret;

/// Instantiates the agent described by a spawner release.
pub fn instantiate(
    request: &SpawnRequest,
    monsters: &MonsterTable,
    realm: Realm,
) -> Result<Agent, ConfigError> {
    let definition = monsters.definition(realm, request.kind())?;
    Ok(Agent::spawn(request.kind(), definition, request.position()))
}
