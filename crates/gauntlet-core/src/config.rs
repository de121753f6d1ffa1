//! Arena configuration and its construction-time validation.
//!
//! Generation itself never fails: every degenerate layout is rejected here,
//! before a single entity exists.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dimensions and counts describing the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub num_agents: u32,
    pub num_challenges: u32,
    /// Arena extent along x, between the two side walls
    pub world_width: f32,
    /// Arena extent along y, from the back wall to the far end
    pub world_length: f32,
    pub wall_width: f32,
    pub agent_radius: f32,
    /// Forward distance worth one progress increment
    pub distance_per_progress: f32,
    pub num_move_buckets: i32,
    pub door_width: f32,
    /// Slots available to per-episode entities
    pub max_dynamic_entities: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        let world_width = 20.0;
        Self {
            num_agents: 2,
            num_challenges: 3,
            world_width,
            world_length: 40.0,
            wall_width: 1.0,
            agent_radius: 1.0,
            distance_per_progress: 4.0,
            num_move_buckets: 5,
            door_width: world_width / 3.0,
            max_dynamic_entities: 32,
        }
    }
}

impl ArenaConfig {
    /// Length of one challenge zone along y. Zones split the arena evenly.
    pub fn challenge_length(&self) -> f32 {
        self.world_length / self.num_challenges.max(1) as f32
    }

    /// Full width of the symmetric spawn jitter band along x, before group bias
    pub fn spawn_clearance(&self) -> f32 {
        self.world_width / 2.0 - 2.5 * self.agent_radius
    }

    /// Farthest y an agent can spawn at
    pub fn spawn_band_end(&self) -> f32 {
        self.distance_per_progress / 2.0 + 1.1 * self.agent_radius
    }

    /// Check every invariant generation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = [
            ("world_width", self.world_width),
            ("world_length", self.world_length),
            ("wall_width", self.wall_width),
            ("agent_radius", self.agent_radius),
            ("distance_per_progress", self.distance_per_progress),
            ("door_width", self.door_width),
        ];
        for (name, value) in dims {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidDimension { name, value });
            }
        }

        if self.num_agents == 0 {
            return Err(ConfigError::NoAgents);
        }
        if self.num_move_buckets <= 0 {
            return Err(ConfigError::NoMoveBuckets(self.num_move_buckets));
        }

        // Door center range is [0.75 d, W - 0.75 d]
        if 1.5 * self.door_width > self.world_width {
            return Err(ConfigError::DoorTooWide {
                door_width: self.door_width,
                world_width: self.world_width,
            });
        }

        if self.spawn_clearance() < 0.0 {
            return Err(ConfigError::NoSpawnClearance {
                agent_radius: self.agent_radius,
                world_width: self.world_width,
            });
        }

        if self.num_challenges > 0 {
            let zone = self.challenge_length();
            if zone < self.wall_width {
                return Err(ConfigError::ZonesTooShort {
                    challenge_length: zone,
                    wall_width: self.wall_width,
                });
            }

            // First separator must clear the spawn band plus its own half thickness
            let first = zone - self.wall_width / 2.0;
            let limit = self.spawn_band_end() + self.wall_width / 2.0;
            if first < limit {
                return Err(ConfigError::SeparatorInSpawnBand {
                    separator_y: first,
                    limit,
                });
            }
        }

        let separators = self.num_challenges.saturating_mul(2);
        if separators > self.max_dynamic_entities {
            return Err(ConfigError::DynamicCapacity {
                needed: separators,
                capacity: self.max_dynamic_entities,
            });
        }

        Ok(())
    }
}

/// Reasons an arena layout cannot be generated
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be finite and positive, got {value}")]
    InvalidDimension { name: &'static str, value: f32 },

    #[error("arena needs at least one agent")]
    NoAgents,

    #[error("num_move_buckets must be positive, got {0}")]
    NoMoveBuckets(i32),

    #[error("door width {door_width} leaves no room for walls in a {world_width} wide arena")]
    DoorTooWide { door_width: f32, world_width: f32 },

    #[error("agent radius {agent_radius} is too large for a {world_width} wide arena")]
    NoSpawnClearance { agent_radius: f32, world_width: f32 },

    #[error("challenge zones of length {challenge_length} are shorter than the {wall_width} wall width")]
    ZonesTooShort { challenge_length: f32, wall_width: f32 },

    #[error("first separator at y={separator_y} cuts into the spawn band, needs y >= {limit}")]
    SeparatorInSpawnBand { separator_y: f32, limit: f32 },

    #[error("{needed} separator walls exceed the dynamic entity capacity of {capacity}")]
    DynamicCapacity { needed: u32, capacity: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(ArenaConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_door_wider_than_arena_allows() {
        let config = ArenaConfig {
            door_width: 14.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DoorTooWide { .. })
        ));

        // Exactly W / 1.5 collapses the door range to a point but is still legal
        let edge = ArenaConfig {
            world_width: 15.0,
            door_width: 10.0,
            ..Default::default()
        };
        assert_eq!(edge.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_non_finite_and_non_positive_dimensions() {
        let nan = ArenaConfig {
            world_length: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            nan.validate(),
            Err(ConfigError::InvalidDimension { name: "world_length", .. })
        ));

        let zero = ArenaConfig {
            wall_width: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero.validate(),
            Err(ConfigError::InvalidDimension { name: "wall_width", .. })
        ));
    }

    #[test]
    fn test_rejects_empty_roster_and_buckets() {
        let no_agents = ArenaConfig {
            num_agents: 0,
            ..Default::default()
        };
        assert_eq!(no_agents.validate(), Err(ConfigError::NoAgents));

        let no_buckets = ArenaConfig {
            num_move_buckets: 0,
            ..Default::default()
        };
        assert_eq!(no_buckets.validate(), Err(ConfigError::NoMoveBuckets(0)));
    }

    #[test]
    fn test_rejects_agents_too_large_to_spawn() {
        let config = ArenaConfig {
            agent_radius: 5.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoSpawnClearance { .. })
        ));
    }

    #[test]
    fn test_rejects_more_separators_than_slots() {
        let config = ArenaConfig {
            num_challenges: 5,
            max_dynamic_entities: 9,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::DynamicCapacity {
                needed: 10,
                capacity: 9
            })
        );
    }

    #[test]
    fn test_rejects_zones_thinner_than_a_wall() {
        let config = ArenaConfig {
            world_length: 2.0,
            num_challenges: 4,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZonesTooShort {
                challenge_length: 0.5,
                wall_width: 1.0
            })
        );
    }

    #[test]
    fn test_rejects_first_separator_inside_spawn_band() {
        // 20 zones of 2.0: first wall centered at y=1.5, agents spawn up to y=3.1
        let config = ArenaConfig {
            num_challenges: 20,
            max_dynamic_entities: 40,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SeparatorInSpawnBand { separator_y, limit })
                if separator_y == 1.5 && (limit - 3.6).abs() < 1e-5
        ));

        // Ten zones of 4.0 put the first wall at y=3.5, still short of 3.6
        let tight = ArenaConfig {
            num_challenges: 10,
            ..Default::default()
        };
        assert!(matches!(
            tight.validate(),
            Err(ConfigError::SeparatorInSpawnBand { .. })
        ));

        let clear = ArenaConfig {
            num_challenges: 8,
            ..Default::default()
        };
        assert_eq!(clear.validate(), Ok(()));
    }

    #[test]
    fn test_open_arena_skips_zone_checks() {
        let config = ArenaConfig {
            world_length: 0.5,
            num_challenges: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_challenge_length_splits_world_evenly() {
        let config = ArenaConfig {
            num_challenges: 4,
            ..Default::default()
        };
        assert_eq!(config.challenge_length(), 10.0);
        assert_eq!(config.spawn_clearance(), 7.5);
    }
}
