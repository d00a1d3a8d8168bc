//! Headless navigation collaborator
//!
//! Движок игры ведёт врагов по navmesh сам; для headless прогонов и тестов
//! хватает прямолинейного движения к точке с постоянной скоростью.
//! Протокол тот же: NavigationRequest → ... → DestinationReached.

use bevy::prelude::*;

use super::events::{DestinationReached, NavigationRequest};
use crate::SimulationSet;

pub const DEFAULT_NAVIGATION_SPEED: f32 = 4.0;

/// Текущая цель движения
#[derive(Component, Debug, Clone, Copy)]
pub struct NavigationAgent {
    pub destination: Option<Vec3>,
    /// м/с
    pub speed: f32,
}

impl Default for NavigationAgent {
    fn default() -> Self {
        Self {
            destination: None,
            speed: DEFAULT_NAVIGATION_SPEED,
        }
    }
}

/// Система: NavigationRequest → NavigationAgent (последний запрос побеждает)
pub fn accept_navigation_requests(
    mut commands: Commands,
    mut requests: EventReader<NavigationRequest>,
    mut agents: Query<Option<&mut NavigationAgent>>,
) {
    for request in requests.read() {
        match agents.get_mut(request.entity) {
            Ok(Some(mut agent)) => agent.destination = Some(request.destination),
            Ok(None) => {
                commands.entity(request.entity).insert(NavigationAgent {
                    destination: Some(request.destination),
                    ..default()
                });
            }
            Err(_) => {}
        }
    }
}

/// Система: шаг к цели; по прибытии — DestinationReached
pub fn move_navigation_agents(
    time: Res<Time>,
    mut agents: Query<(Entity, &mut Transform, &mut NavigationAgent)>,
    mut reached: EventWriter<DestinationReached>,
) {
    let dt = time.delta_secs();

    for (entity, mut transform, mut agent) in agents.iter_mut() {
        let Some(destination) = agent.destination else {
            continue;
        };

        let to_target = destination - transform.translation;
        let step = agent.speed * dt;

        if to_target.length() <= step {
            transform.translation = destination;
            agent.destination = None;
            reached.write(DestinationReached {
                entity,
                position: destination,
            });
        } else {
            transform.translation += to_target.normalize() * step;
        }
    }
}

/// Plugin: прямолинейная навигация для headless симуляции
pub struct HeadlessNavigationPlugin;

impl Plugin for HeadlessNavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (accept_navigation_requests, move_navigation_agents)
                .chain()
                .in_set(SimulationSet::Navigation),
        );
    }
}
