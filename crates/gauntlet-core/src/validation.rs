//! Layout validation for generated episodes.
//!
//! Pure functions over an [`ArenaSnapshot`] that return validation errors.
//! No ECS dependency, so the harness can run them on a decoded dump just as
//! well as on a live engine.

use std::collections::HashSet;

use crate::components::{Action, SimObject, Vec3, Velocity};
use crate::config::ArenaConfig;
use crate::generation::group_bias;
use crate::snapshot::ArenaSnapshot;

/// Float slack for geometric comparisons
const TOLERANCE: f32 = 1e-4;

/// A layout validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

fn error(category: &'static str, message: String) -> ValidationError {
    ValidationError {
        category,
        severity: Severity::Error,
        message,
    }
}

// ── A. Roster ───────────────────────────────────────────────────────────

/// Every agent lists each other agent exactly once, in roster order.
pub fn check_peer_lists(snapshot: &ArenaSnapshot) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let num_agents = snapshot.config.num_agents;

    if snapshot.agents.len() != num_agents as usize {
        errors.push(error(
            "roster",
            format!(
                "Expected {} agents, found {}",
                num_agents,
                snapshot.agents.len()
            ),
        ));
    }

    for agent in &snapshot.agents {
        let expected: Vec<u32> = (0..num_agents).filter(|&j| j != agent.index).collect();
        if agent.peers != expected {
            let distinct: HashSet<u32> = agent.peers.iter().copied().collect();
            errors.push(error(
                "roster",
                format!(
                    "Agent #{} has peers {:?} ({} distinct), expected {:?}",
                    agent.index,
                    agent.peers,
                    distinct.len(),
                    expected
                ),
            ));
        }
    }
    errors
}

// ── B. Agent state ──────────────────────────────────────────────────────

/// Spawn positions respect the side clearance (before group bias) and the
/// band just past the back wall.
pub fn check_spawn_bounds(snapshot: &ArenaSnapshot) -> Vec<ValidationError> {
    let config = &snapshot.config;
    let clearance = config.spawn_clearance();
    let min_y = 1.1 * config.agent_radius;
    let max_y = config.spawn_band_end();

    let mut errors = Vec::new();
    for agent in &snapshot.agents {
        let pos = agent.body.position;
        let jitter = pos.x - group_bias(config, agent.index as usize);
        if jitter.abs() > clearance / 2.0 + TOLERANCE {
            errors.push(error(
                "spawn",
                format!(
                    "Agent #{} spawned with x jitter {:.3}, limit ±{:.3}",
                    agent.index,
                    jitter,
                    clearance / 2.0
                ),
            ));
        }
        if pos.y < min_y - TOLERANCE || pos.y > max_y + TOLERANCE {
            errors.push(error(
                "spawn",
                format!(
                    "Agent #{} spawned at y={:.3}, outside [{:.3}, {:.3}]",
                    agent.index, pos.y, min_y, max_y
                ),
            ));
        }
        if pos.x.abs() > config.world_width / 2.0 - config.agent_radius + TOLERANCE {
            errors.push(error(
                "spawn",
                format!("Agent #{} spawned outside the arena at x={:.3}", agent.index, pos.x),
            ));
        }
    }
    errors
}

/// Transient per-agent state is back at its episode-start values.
pub fn check_transient_state(snapshot: &ArenaSnapshot) -> Vec<ValidationError> {
    let neutral = Action::neutral(snapshot.config.num_move_buckets);
    let mut errors = Vec::new();
    for agent in &snapshot.agents {
        let dirty = agent.velocity != Velocity::ZERO
            || agent.force != Vec3::ZERO
            || agent.torque != Vec3::ZERO
            || agent.progress.num_progress_increments != 0
            || agent.done.v != 0
            || agent.action != neutral;
        if dirty {
            errors.push(error(
                "agent_state",
                format!("Agent #{} carries state over from a previous episode", agent.index),
            ));
        }
    }
    errors
}

/// Agents whose spawn footprints intersect. Allowed, but worth knowing.
pub fn check_agent_spacing(snapshot: &ArenaSnapshot) -> Vec<ValidationError> {
    let min_dist = 2.0 * snapshot.config.agent_radius;
    let mut errors = Vec::new();
    for (i, a) in snapshot.agents.iter().enumerate() {
        for b in &snapshot.agents[i + 1..] {
            let dist = (a.body.position - b.body.position).length();
            if dist < min_dist {
                errors.push(ValidationError {
                    category: "spawn",
                    severity: Severity::Warning,
                    message: format!(
                        "Agents #{} and #{} spawned {:.2} apart (radius {})",
                        a.index, b.index, dist, snapshot.config.agent_radius
                    ),
                });
            }
        }
    }
    errors
}

// ── C. Challenge separators ─────────────────────────────────────────────

/// One wall pair per challenge, all static walls.
pub fn check_separator_count(snapshot: &ArenaSnapshot) -> Vec<ValidationError> {
    let config = &snapshot.config;
    let mut errors = Vec::new();

    let expected = 2 * config.num_challenges as usize;
    if snapshot.separators.len() != expected {
        errors.push(error(
            "separators",
            format!(
                "Expected {} separator walls, found {}",
                expected,
                snapshot.separators.len()
            ),
        ));
    }
    if snapshot.separators.len() > config.max_dynamic_entities as usize {
        errors.push(error(
            "separators",
            format!(
                "{} separator walls exceed capacity {}",
                snapshot.separators.len(),
                config.max_dynamic_entities
            ),
        ));
    }
    if snapshot.doors.len() != config.num_challenges as usize {
        errors.push(error(
            "separators",
            format!(
                "Expected {} doors, found {}",
                config.num_challenges,
                snapshot.doors.len()
            ),
        ));
    }
    for wall in &snapshot.separators {
        if wall.body.object != SimObject::Wall {
            errors.push(error(
                "separators",
                format!("Challenge {} separator is not a wall", wall.tag.challenge),
            ));
        }
    }
    errors
}

/// Wall spans plus the door fill the arena width, and each span keeps at
/// least a quarter door of buffer.
pub fn check_door_spans(snapshot: &ArenaSnapshot) -> Vec<ValidationError> {
    let config = &snapshot.config;
    let half_width = config.world_width / 2.0;
    let min_span = 0.25 * config.door_width;
    let mut errors = Vec::new();

    for door in &snapshot.doors {
        let total = door.left_len + config.door_width + door.right_len;
        if (total - config.world_width).abs() > TOLERANCE {
            errors.push(error(
                "doors",
                format!(
                    "Challenge {} spans {:.4} instead of {:.4}",
                    door.challenge, total, config.world_width
                ),
            ));
        }
        if door.left_len < min_span - TOLERANCE || door.right_len < min_span - TOLERANCE {
            errors.push(error(
                "doors",
                format!(
                    "Challenge {} door too close to a side wall ({:.3} / {:.3}, min {:.3})",
                    door.challenge, door.left_len, door.right_len, min_span
                ),
            ));
        }

        // Gap must sit strictly inside the side walls
        let gap_min = door.center_x - config.door_width / 2.0;
        let gap_max = door.center_x + config.door_width / 2.0;
        if gap_min <= -half_width || gap_max >= half_width {
            errors.push(error(
                "doors",
                format!(
                    "Challenge {} gap [{:.3}, {:.3}] touches the border",
                    door.challenge, gap_min, gap_max
                ),
            ));
        }
    }
    errors
}

/// Each wall segment runs from its border to the door edge.
pub fn check_separator_geometry(snapshot: &ArenaSnapshot) -> Vec<ValidationError> {
    use crate::components::SeparatorSide;

    let config = &snapshot.config;
    let half_width = config.world_width / 2.0;
    let mut errors = Vec::new();

    for wall in &snapshot.separators {
        let Some(door) = snapshot
            .doors
            .iter()
            .find(|d| d.challenge == wall.tag.challenge)
        else {
            errors.push(error(
                "separators",
                format!("Challenge {} wall has no door", wall.tag.challenge),
            ));
            continue;
        };

        let pos = wall.body.position;
        let len = wall.body.scale.d0;
        let (outer, inner, door_edge, border) = match wall.tag.side {
            SeparatorSide::Left => (
                pos.x - len / 2.0,
                pos.x + len / 2.0,
                door.center_x - config.door_width / 2.0,
                -half_width,
            ),
            SeparatorSide::Right => (
                pos.x + len / 2.0,
                pos.x - len / 2.0,
                door.center_x + config.door_width / 2.0,
                half_width,
            ),
        };

        if (outer - border).abs() > TOLERANCE || (inner - door_edge).abs() > TOLERANCE {
            errors.push(error(
                "separators",
                format!(
                    "Challenge {} {:?} wall spans [{:.3}, {:.3}], expected [{:.3}, {:.3}]",
                    wall.tag.challenge, wall.tag.side, outer, inner, border, door_edge
                ),
            ));
        }
        if (pos.y - door.y).abs() > TOLERANCE {
            errors.push(error(
                "separators",
                format!(
                    "Challenge {} wall at y={:.3}, door line at y={:.3}",
                    wall.tag.challenge, pos.y, door.y
                ),
            ));
        }
    }
    errors
}

/// Run every check.
pub fn validate_snapshot(snapshot: &ArenaSnapshot) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    errors.extend(check_peer_lists(snapshot));
    errors.extend(check_spawn_bounds(snapshot));
    errors.extend(check_transient_state(snapshot));
    errors.extend(check_agent_spacing(snapshot));
    errors.extend(check_separator_count(snapshot));
    errors.extend(check_door_spans(snapshot));
    errors.extend(check_separator_geometry(snapshot));
    errors
}

/// Only the errors, dropping warnings
pub fn hard_errors(errors: &[ValidationError]) -> impl Iterator<Item = &ValidationError> {
    errors.iter().filter(|e| e.severity == Severity::Error)
}

/// Entities a generated arena holds: floor, borders, agents and separators.
pub fn expected_entity_count(config: &ArenaConfig) -> usize {
    1 + 3 + config.num_agents as usize + 2 * config.num_challenges as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ArenaEngine;

    fn fresh_snapshot(seed: u64) -> ArenaSnapshot {
        let mut engine = ArenaEngine::new(ArenaConfig::default(), seed).expect("valid config");
        engine.new_episode();
        engine.snapshot()
    }

    #[test]
    fn test_generated_episode_passes() {
        for seed in 0..20 {
            let snapshot = fresh_snapshot(seed);
            let errors = validate_snapshot(&snapshot);
            assert_eq!(hard_errors(&errors).count(), 0, "seed {seed}: {errors:?}");
        }
    }

    #[test]
    fn test_detects_corrupted_peer_list() {
        let mut snapshot = fresh_snapshot(1);
        snapshot.agents[0].peers = vec![0];
        let errors = check_peer_lists(&snapshot);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, "roster");
    }

    #[test]
    fn test_detects_leftover_agent_state() {
        let mut snapshot = fresh_snapshot(1);
        snapshot.agents[1].done.v = 1;
        assert_eq!(check_transient_state(&snapshot).len(), 1);
    }

    #[test]
    fn test_detects_bad_door_span() {
        let mut snapshot = fresh_snapshot(1);
        snapshot.doors[0].left_len += 1.0;
        let errors = check_door_spans(&snapshot);
        assert!(errors.iter().any(|e| e.message.contains("spans")));
    }

    #[test]
    fn test_detects_missing_separator() {
        let mut snapshot = fresh_snapshot(1);
        snapshot.separators.pop();
        assert!(!check_separator_count(&snapshot).is_empty());
    }

    #[test]
    fn test_detects_agent_outside_spawn_band() {
        let mut snapshot = fresh_snapshot(1);
        snapshot.agents[0].body.position.y = 30.0;
        assert!(!check_spawn_bounds(&snapshot).is_empty());
    }

    #[test]
    fn test_close_agents_only_warn() {
        let mut snapshot = fresh_snapshot(1);
        let first = snapshot.agents[0].body.position;
        snapshot.agents[1].body.position = first;
        let warnings = check_agent_spacing(&snapshot);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, Severity::Warning);
    }

    #[test]
    fn test_expected_entity_count() {
        assert_eq!(expected_entity_count(&ArenaConfig::default()), 12);
    }
}
