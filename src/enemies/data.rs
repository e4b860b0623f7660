//! Enemy data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::components::EnemyKind;
use super::effects::InvulnerabilityConfig;
use super::error::EnemyDataError;
use super::output::AnimationClip;
use super::stats::StatCurve;

/// Where enemy definitions live, one file per enemy type.
pub const ENEMY_DATA_DIR: &str = "assets/data/enemies";

/// Engagement and timing settings shared by every enemy kind.
#[derive(Deserialize, Clone, Debug)]
pub struct CombatTuning {
    /// Player must come closer than this for the enemy to engage.
    pub engage_range: f32,
    /// Player must get further than this for the enemy to give up.
    pub disengage_range: f32,
    /// Lockout after a missed attack; reload time for ranged enemies.
    pub exhaustion_time: f32,
    /// Time between successful attacks.
    pub successful_attack_cooldown: f32,
    /// Delay between getting in range and the first attack.
    pub first_attack_delay: f32,
    #[serde(default)]
    pub stun_resets_attack_cooldown: bool,
    /// Stop walking while the player is in range.
    #[serde(default)]
    pub freeze_in_range: bool,
}

/// Ranged attack settings.
#[derive(Deserialize, Clone, Debug)]
pub struct ProjectileConfig {
    pub projectile_speed: StatCurve,
    #[serde(default)]
    pub infinite_ammo: bool,
    /// Volleys before a reload. Reload time is the exhaustion time.
    pub max_ammo: u32,
    /// Volleys per attack.
    pub burst: u32,
    #[serde(default)]
    pub burst_interval: f32,
    /// Inclusive min/max projectiles per volley.
    pub projectiles_per_shot: (u32, u32),
    /// Spread of a multi-projectile volley, in degrees.
    #[serde(default)]
    pub projectile_arc: f32,
    /// Max random angular offset per projectile, in degrees.
    #[serde(default)]
    pub bloom: f32,
    #[serde(default)]
    pub always_show_attacking_indicator: bool,
    #[serde(default)]
    pub can_move_while_reloading: bool,
    #[serde(default)]
    pub can_move_while_firing: bool,
    #[serde(default)]
    pub can_adjust_aim_during_burst: bool,
    /// A stun during reload finishes the reload instead of pausing it.
    #[serde(default)]
    pub stun_completes_reload: bool,
    /// Exhaust like a melee enemy when the player dodges the windup.
    #[serde(default)]
    pub exhaust_on_dodge_windup: bool,
    /// Extra random first-attack delay, from 0 to this.
    #[serde(default)]
    pub attack_randomness_range: f32,
    /// Muzzle position relative to the enemy.
    #[serde(default)]
    pub origin_offset: (f32, f32, f32),
}

/// Behaviour variant and its settings.
#[derive(Deserialize, Clone, Debug)]
pub enum BehaviourConfig {
    Melee,
    /// Melee enemy that punishes hits landed during its attack.
    DefensiveMelee,
    /// Melee enemy that spawns another enemy when it dies.
    VengefulMelee { death_spawn: String },
    ProjectileRanged(ProjectileConfig),
}

impl BehaviourConfig {
    pub fn kind(&self) -> EnemyKind {
        match self {
            BehaviourConfig::Melee => EnemyKind::Melee,
            BehaviourConfig::DefensiveMelee => EnemyKind::DefensiveMelee,
            BehaviourConfig::VengefulMelee { .. } => EnemyKind::VengefulMelee,
            BehaviourConfig::ProjectileRanged(_) => EnemyKind::ProjectileRanged,
        }
    }
}

/// Collider configuration for an enemy type.
#[derive(Deserialize, Clone, Debug)]
pub struct ColliderConfig {
    pub half_height: f32,
    pub radius: f32,
}

impl Default for ColliderConfig {
    fn default() -> Self {
        Self {
            half_height: 0.5,
            radius: 0.3,
        }
    }
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct EnemyDefinition {
    pub name: String,
    pub behaviour: BehaviourConfig,
    pub move_speed: StatCurve,
    pub damage: StatCurve,
    pub max_health: StatCurve,
    pub combat: CombatTuning,
    #[serde(default = "default_mass")]
    pub mass: f32,
    #[serde(default)]
    pub invulnerability: InvulnerabilityConfig,
    /// Percent chance, 0 to 100, of dropping loot on death.
    #[serde(default)]
    pub drop_chance: f32,
    /// Clip durations in seconds. Missing clips play for zero seconds.
    #[serde(default)]
    pub animations: HashMap<AnimationClip, f32>,
    /// The chase stops this close to the player.
    #[serde(default = "default_stopping_distance")]
    pub stopping_distance: f32,
    #[serde(default)]
    pub model_path: Option<String>,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub collider: Option<ColliderConfig>,
}

fn default_mass() -> f32 {
    1.0
}

fn default_stopping_distance() -> f32 {
    1.0
}

fn default_scale() -> f32 {
    1.0
}

impl EnemyDefinition {
    pub fn kind(&self) -> EnemyKind {
        self.behaviour.kind()
    }

    /// Repair out-of-bounds settings in place.
    ///
    /// Returns every problem found; the definition stays usable afterwards.
    pub fn sanitize(&mut self) -> Vec<EnemyDataError> {
        let mut problems = Vec::new();

        let combat = &mut self.combat;
        if combat.disengage_range < combat.engage_range {
            problems.push(EnemyDataError::RangeOrdering {
                engage: combat.engage_range,
                disengage: combat.disengage_range,
            });
            combat.disengage_range = combat.engage_range;
        }

        if !(self.mass > 0.0) {
            problems.push(EnemyDataError::InvalidValue {
                field: "mass",
                details: format!("{} is not positive, using 1.0", self.mass),
            });
            self.mass = 1.0;
        }

        if let BehaviourConfig::ProjectileRanged(ranged) = &mut self.behaviour {
            let (min, max) = ranged.projectiles_per_shot;
            let min = min.max(1);
            let max = max.max(min);
            if (min, max) != ranged.projectiles_per_shot {
                problems.push(EnemyDataError::InvalidValue {
                    field: "projectiles_per_shot",
                    details: format!("{:?} adjusted to {:?}", ranged.projectiles_per_shot, (min, max)),
                });
                ranged.projectiles_per_shot = (min, max);
            }

            if ranged.burst == 0 {
                problems.push(EnemyDataError::InvalidValue {
                    field: "burst",
                    details: "must be at least 1".to_string(),
                });
                ranged.burst = 1;
            }

            if !ranged.infinite_ammo && ranged.burst > ranged.max_ammo {
                problems.push(EnemyDataError::InvalidValue {
                    field: "burst",
                    details: format!("{} exceeds max ammo {}", ranged.burst, ranged.max_ammo),
                });
                ranged.burst = ranged.max_ammo;
            }

            let max_bloom = 90.0 - ranged.projectile_arc / 2.0;
            if ranged.bloom > max_bloom {
                problems.push(EnemyDataError::InvalidValue {
                    field: "bloom",
                    details: format!("{} exceeds {}", ranged.bloom, max_bloom),
                });
                ranged.bloom = max_bloom;
            }
        }

        problems
    }
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(enemy_type)
    }

    /// Validate and store a definition, logging anything that had to be fixed.
    pub fn insert(&mut self, enemy_type: impl Into<String>, mut definition: EnemyDefinition) {
        let enemy_type = enemy_type.into();
        for problem in definition.sanitize() {
            match problem {
                EnemyDataError::RangeOrdering { .. } => {
                    error!("Enemy definition '{}': {}", enemy_type, problem)
                }
                _ => warn!("Enemy definition '{}': {}", enemy_type, problem),
            }
        }
        self.definitions.insert(enemy_type, definition);
    }
}

/// Parse a single enemy definition file.
pub fn read_definition(path: &Path) -> Result<EnemyDefinition, EnemyDataError> {
    let contents = fs::read_to_string(path).map_err(|e| EnemyDataError::ReadError {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;
    ron::from_str::<EnemyDefinition>(&contents).map_err(|e| EnemyDataError::ParseError {
        path: path.display().to_string(),
        details: e.to_string(),
    })
}

/// Load every `.ron` file in `dir` into the registry, keyed by file stem.
pub fn load_definitions_from(
    dir: &Path,
    registry: &mut EnemyRegistry,
) -> Result<usize, EnemyDataError> {
    if !dir.exists() {
        return Err(EnemyDataError::FileNotFound(dir.display().to_string()));
    }

    let entries = fs::read_dir(dir).map_err(|e| EnemyDataError::ReadError {
        path: dir.display().to_string(),
        details: e.to_string(),
    })?;

    let mut loaded = 0;
    for entry in entries.flatten() {
        let path = entry.path();

        if path.extension().is_some_and(|ext| ext == "ron") {
            let enemy_type = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();

            match read_definition(&path) {
                Ok(definition) => {
                    info!("Loaded enemy definition: {} ({})", definition.name, enemy_type);
                    registry.insert(enemy_type, definition);
                    loaded += 1;
                }
                Err(e) => error!("{}", e),
            }
        }
    }

    Ok(loaded)
}

/// Load all enemy definitions from the assets/data/enemies/ directory.
pub fn load_enemy_definitions(mut registry: ResMut<EnemyRegistry>) {
    match load_definitions_from(Path::new(ENEMY_DATA_DIR), &mut registry) {
        Ok(count) => info!("Loaded {} enemy definitions", count),
        Err(e) => warn!("Enemy definitions not loaded: {}", e),
    }
}
