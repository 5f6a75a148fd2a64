//! Epidemic-style infection propagating between trains and stations.
//!
//! One seeded train starts infected along with its departure station. On
//! every arrival the infection crosses in whichever direction applies: an
//! infected train contaminates a healthy station, an infected station
//! contaminates a healthy train. There is no recovery. Disabled entirely
//! unless `SimulationConfig::pandemic` is set.

use std::collections::BTreeSet;

use bevy::prelude::*;
use rand::Rng;

use crate::config::SimulationConfig;
use crate::sim_rng::SimRng;
use crate::trains::{Train, TrainArrival, TrainRoute};

/// Marker for infected trains. Stations are tracked by name in
/// [`PandemicStats`] since they are not entities.
#[derive(Component, Debug)]
pub struct Infected;

#[derive(Resource, Debug, Default)]
pub struct PandemicStats {
    pub infected_stations: BTreeSet<String>,
    pub infected_trains: u32,
}

impl PandemicStats {
    pub fn station_infected(&self, name: &str) -> bool {
        self.infected_stations.contains(name)
    }
}

/// Startup (after train spawning): mark one random train and its departure
/// station as infected.
pub fn seed_infection(
    mut commands: Commands,
    config: Res<SimulationConfig>,
    mut rng: ResMut<SimRng>,
    mut stats: ResMut<PandemicStats>,
    trains: Query<(Entity, &Train, &TrainRoute)>,
) {
    if !config.pandemic {
        return;
    }
    let pool: Vec<(Entity, &Train, &TrainRoute)> = trains.iter().collect();
    if pool.is_empty() {
        return;
    }
    let (entity, train, route) = pool[rng.0.gen_range(0..pool.len())];

    let station = route
        .segments
        .first()
        .map(|segment| segment.from.clone())
        .unwrap_or_else(|| route.destination.clone());
    info!("pandemic: patient zero is train {} at {station}", train.name);

    commands.entity(entity).insert(Infected);
    stats.infected_trains += 1;
    stats.infected_stations.insert(station);
}

/// FixedUpdate (after movement): exchange infection at every arrival.
pub fn process_arrivals(
    mut commands: Commands,
    config: Res<SimulationConfig>,
    mut arrivals: EventReader<TrainArrival>,
    mut stats: ResMut<PandemicStats>,
    trains: Query<(&Train, Option<&Infected>)>,
) {
    if !config.pandemic {
        arrivals.clear();
        return;
    }
    for arrival in arrivals.read() {
        let Ok((train, infected)) = trains.get(arrival.train) else {
            continue;
        };
        let station_infected = stats.station_infected(&arrival.station);
        if infected.is_some() && !station_infected {
            info!("station {} infected by train {}", arrival.station, train.name);
            stats.infected_stations.insert(arrival.station.clone());
        } else if station_infected && infected.is_none() {
            info!("train {} infected at station {}", train.name, arrival.station);
            commands.entity(arrival.train).insert(Infected);
            stats.infected_trains += 1;
        }
    }
}
