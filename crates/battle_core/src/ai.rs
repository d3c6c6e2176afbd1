//! Role-based targeting AI.
//!
//! [`decide`] is a pure function of a unit, its surroundings and the RNG. It
//! never mutates state; the combat resolver acts on the returned
//! [`Decision`].
//!
//! | Role | Enemy in range | Enemy noticed | Nothing around |
//! |---|---|---|---|
//! | Attacker | attack weakest | chase weakest | patrol |
//! | Defender | attack best scored | chase intruders, return home | patrol around home |
//! | Neutral | flee | flee | seek safety or wander |
//!
//! Attackers that are outmatched and unsupported flee before anything else.

use rand::Rng;

use crate::config::AiConfig;
use crate::math::{random_direction, random_fixed, Bounds, Fixed, Vec2Fixed};
use crate::unit::{Role, Unit, UnitId};

/// What a unit wants to do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Strike an enemy in range.
    Attack(UnitId),
    /// Move toward a point, optionally because of a target.
    Move {
        /// Where to go.
        destination: Vec2Fixed,
        /// Enemy being chased, if any.
        via: Option<UnitId>,
        /// A patrol or wander leg, kept as the unit's waypoint until reached.
        patrol: bool,
    },
    /// Run along a unit-length direction.
    Flee {
        /// Unit-length heading.
        direction: Vec2Fixed,
    },
    /// Stay put.
    Idle,
}

/// Choose an action for `unit`.
///
/// `enemies` and `allies` may contain dead units and `unit` itself; both
/// are filtered out.
pub fn decide<R: Rng + ?Sized>(
    unit: &Unit,
    enemies: &[Unit],
    allies: &[Unit],
    config: &AiConfig,
    bounds: &Bounds,
    rng: &mut R,
) -> Decision {
    if !unit.is_alive() {
        return Decision::Idle;
    }

    let nearby_enemies = within(enemies, unit.position, unit.detection_range, None);

    match unit.role {
        Role::Attacker => {
            let nearby_allies = within(allies, unit.position, unit.detection_range, Some(unit.id));
            let threat = threat_level(unit, &nearby_enemies);
            let support = support_level(unit, &nearby_allies, config);
            if threat > config.flee_threat() && support < config.flee_support() {
                return Decision::Flee {
                    direction: flee_direction(unit, &nearby_enemies),
                };
            }

            let in_range = within_refs(&nearby_enemies, unit.position, unit.attack_range);
            if let Some(target) = weakest(unit, &in_range) {
                return Decision::Attack(target.id);
            }
            if let Some(target) = weakest(unit, &nearby_enemies) {
                return Decision::Move {
                    destination: target.position,
                    via: Some(target.id),
                    patrol: false,
                };
            }

            let destination = unit.waypoint.unwrap_or_else(|| {
                let distance = random_fixed(
                    rng,
                    Fixed::from_num(config.patrol_min),
                    Fixed::from_num(config.patrol_max),
                );
                bounds.clamp(unit.position + random_direction(rng).scale(distance))
            });
            Decision::Move {
                destination,
                via: None,
                patrol: true,
            }
        }
        Role::Defender => {
            let in_range = within_refs(&nearby_enemies, unit.position, unit.attack_range);
            if let Some(target) = best_scored(unit, &in_range, config) {
                return Decision::Attack(target.id);
            }

            let territory = Fixed::from_num(config.territory_radius);
            let intruders = within(enemies, unit.home_position, territory, None);
            if let Some(intruder) = nearest(unit.position, &intruders) {
                return Decision::Move {
                    destination: intruder.position,
                    via: Some(intruder.id),
                    patrol: false,
                };
            }

            if unit.position.distance(unit.home_position) > territory {
                return Decision::Move {
                    destination: unit.home_position,
                    via: None,
                    patrol: false,
                };
            }

            let destination = unit.waypoint.unwrap_or_else(|| {
                let radius = territory * Fixed::from_num(config.patrol_radius_percent)
                    / Fixed::from_num(100);
                bounds.clamp(unit.home_position + random_direction(rng).scale(radius))
            });
            Decision::Move {
                destination,
                via: None,
                patrol: true,
            }
        }
        Role::Neutral => {
            if !nearby_enemies.is_empty() {
                return Decision::Flee {
                    direction: flee_direction(unit, &nearby_enemies),
                };
            }

            let all_enemies: Vec<&Unit> = enemies.iter().filter(|e| e.is_alive()).collect();
            if threat_level(unit, &all_enemies) > config.safety_threat() {
                let nearby_allies =
                    within(allies, unit.position, unit.detection_range, Some(unit.id));
                let heading = safe_heading(unit, &all_enemies, &nearby_allies);
                if heading.is_zero() {
                    return Decision::Idle;
                }
                let distance = Fixed::from_num(config.safety_distance);
                return Decision::Move {
                    destination: bounds.clamp(unit.position + heading.scale(distance)),
                    via: None,
                    patrol: false,
                };
            }

            let destination = unit.waypoint.unwrap_or_else(|| {
                let distance = random_fixed(
                    rng,
                    Fixed::from_num(config.wander_min),
                    Fixed::from_num(config.wander_max),
                );
                bounds.clamp(unit.position + random_direction(rng).scale(distance))
            });
            Decision::Move {
                destination,
                via: None,
                patrol: true,
            }
        }
    }
}

/// How endangered `unit` is by `enemies`, in `[0, 1]`.
///
/// Each enemy contributes its damage, fading linearly to nothing at twice
/// its attack range; the sum is measured against twice the unit's health.
#[must_use]
pub fn threat_level(unit: &Unit, enemies: &[&Unit]) -> Fixed {
    if unit.current_hp == 0 {
        return Fixed::ONE;
    }

    let mut total = Fixed::ZERO;
    for enemy in enemies {
        let reach = enemy.attack_range * Fixed::from_num(2);
        if reach <= Fixed::ZERO {
            continue;
        }
        let distance = unit.position.distance(enemy.position);
        let falloff = (Fixed::ONE - distance / reach).max(Fixed::ZERO);
        total += Fixed::from_num(enemy.damage) * falloff;
    }

    (total / Fixed::from_num(2 * u64::from(unit.current_hp))).min(Fixed::ONE)
}

/// How well supported `unit` is by `allies`, in `[0, 1]`.
#[must_use]
pub fn support_level(unit: &Unit, allies: &[&Unit], config: &AiConfig) -> Fixed {
    let range = Fixed::from_num(config.support_range);
    if range <= Fixed::ZERO || config.support_normaliser == 0 {
        return Fixed::ZERO;
    }

    let mut total = Fixed::ZERO;
    for ally in allies {
        let distance = unit.position.distance(ally.position);
        let falloff = (Fixed::ONE - distance / range).max(Fixed::ZERO);
        total += Fixed::from_num(ally.damage) * falloff;
    }

    (total / Fixed::from_num(config.support_normaliser)).min(Fixed::ONE)
}

/// Target preference: close and wounded scores higher.
#[must_use]
pub fn target_score(unit: &Unit, target: &Unit, config: &AiConfig) -> Fixed {
    let distance_term = if unit.attack_range > Fixed::ZERO {
        Fixed::ONE - unit.position.distance(target.position) / unit.attack_range
    } else {
        Fixed::ZERO
    };
    let health_term = Fixed::ONE - target.health_fraction();

    let hundred = Fixed::from_num(100);
    distance_term * Fixed::from_num(config.score_distance_weight_percent) / hundred
        + health_term * Fixed::from_num(config.score_health_weight_percent) / hundred
}

fn within<'a>(
    units: &'a [Unit],
    center: Vec2Fixed,
    radius: Fixed,
    exclude: Option<UnitId>,
) -> Vec<&'a Unit> {
    units
        .iter()
        .filter(|u| u.is_alive() && Some(u.id) != exclude)
        .filter(|u| u.position.distance(center) <= radius)
        .collect()
}

fn within_refs<'a>(units: &[&'a Unit], center: Vec2Fixed, radius: Fixed) -> Vec<&'a Unit> {
    units
        .iter()
        .copied()
        .filter(|u| u.position.distance(center) <= radius)
        .collect()
}

/// Lowest current HP, then nearest, then first seen.
fn weakest<'a>(unit: &Unit, candidates: &[&'a Unit]) -> Option<&'a Unit> {
    let mut best: Option<(&Unit, Fixed)> = None;
    for &candidate in candidates {
        let distance = unit.position.distance_squared(candidate.position);
        let better = match best {
            None => true,
            Some((current, current_distance)) => {
                candidate.current_hp < current.current_hp
                    || (candidate.current_hp == current.current_hp && distance < current_distance)
            }
        };
        if better {
            best = Some((candidate, distance));
        }
    }
    best.map(|(u, _)| u)
}

/// Highest [`target_score`], first seen on ties.
fn best_scored<'a>(unit: &Unit, candidates: &[&'a Unit], config: &AiConfig) -> Option<&'a Unit> {
    let mut best: Option<(&Unit, Fixed)> = None;
    for &candidate in candidates {
        let score = target_score(unit, candidate, config);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }
    best.map(|(u, _)| u)
}

fn nearest<'a>(from: Vec2Fixed, candidates: &[&'a Unit]) -> Option<&'a Unit> {
    let mut best: Option<(&Unit, Fixed)> = None;
    for &candidate in candidates {
        let distance = from.distance_squared(candidate.position);
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(u, _)| u)
}

/// Sum of unit vectors pointing away from each enemy.
fn flee_direction(unit: &Unit, enemies: &[&Unit]) -> Vec2Fixed {
    let mut heading = Vec2Fixed::ZERO;
    for enemy in enemies {
        heading += (unit.position - enemy.position).normalize();
    }
    let heading = heading.normalize();
    if heading.is_zero() {
        Vec2Fixed::new(Fixed::ONE, Fixed::ZERO)
    } else {
        heading
    }
}

/// Away from enemies, pulled half as strongly toward allies.
fn safe_heading(unit: &Unit, enemies: &[&Unit], allies: &[&Unit]) -> Vec2Fixed {
    let half = Fixed::from_num(0.5);
    let mut heading = Vec2Fixed::ZERO;
    for enemy in enemies {
        heading += (unit.position - enemy.position).normalize();
    }
    for ally in allies {
        heading += (ally.position - unit.position).normalize().scale(half);
    }
    heading.normalize()
}
