//! Turn demo: several simulation threads feeding one render thread
//!
//! Usage: `turn_demo [config.toml|config.ron]`

use dungeon_engine::prelude::*;
use dungeon_engine::events::EventPass;
use dungeon_engine::foundation::logging;
use rand::Rng;
use std::sync::Arc;
use std::thread;

const MAP_SIZE: i32 = 8;
const SIM_THREADS: usize = 4;
const TURNS: usize = 10;
const REQUESTS_PER_THREAD: usize = 25;
const ANIMATIONS: [&str; 3] = ["Idle", "Walk", "Dig"];

/// Logs turn summary events
struct TurnLog;

impl EventHandler for TurnLog {
    fn on_event(&mut self, event: &Event) -> bool {
        log::info!("Turn {}: {}", event.turn, event.actions.join(", "));
        true
    }
}

/// Shared world handles the simulation threads draw from
struct DemoWorld {
    tiles: Vec<SharedTile>,
    creatures: Vec<SharedCreature>,
    players: Vec<SharedPlayer>,
    treasury: SharedRoom,
    trap: SharedTrap,
    lights: Vec<SharedMapLight>,
}

impl DemoWorld {
    fn new() -> Self {
        let tile_types = [TileType::Dirt, TileType::Gold, TileType::Rock, TileType::Claimed];
        let tiles = (0..MAP_SIZE)
            .flat_map(|x| (0..MAP_SIZE).map(move |y| (x, y)))
            .map(|(x, y)| {
                let tile_type = tile_types[usize::try_from(x + y).unwrap_or(0) % tile_types.len()];
                shared(Tile::new(x, y, tile_type, 100.0))
            })
            .collect();

        let players = vec![
            shared(Player::new("Keeper", Seat { team_id: 1, color: 1 })),
            shared(Player::new("Rival", Seat { team_id: 2, color: 2 })),
        ];

        #[allow(clippy::cast_precision_loss)]
        let creatures = (0..6)
            .map(|i| shared(Creature::new(format!("Imp{i}"), "Kobold.mesh", Vec3::new(i as f32, 1.0, 0.0), 1)))
            .collect();

        let lights = [(2.0, 2.0), (6.0, 5.0)]
            .into_iter()
            .enumerate()
            .map(|(i, (x, y))| shared(MapLight::new(format!("Torch{i}"), Vec3::new(x, y, 3.0))))
            .collect();

        Self {
            tiles,
            creatures,
            players,
            treasury: shared(Room::new("Treasury1", "Treasury", 1)),
            trap: shared(Trap::new("Cannon1", "Cannon")),
            lights,
        }
    }

    fn claimed_tiles(&self) -> impl Iterator<Item = &SharedTile> {
        self.tiles.iter().filter(|tile| tile.read().tile_type == TileType::Claimed)
    }

    /// Lights, the treasury on every claimed tile, and a trap on the first one
    fn furnish(&self, sender: &RenderRequestSender) -> Result<(), RenderError> {
        for light in &self.lights {
            sender.send(RenderRequest::CreateMapLight { light: light.clone() })?;
        }
        for tile in self.claimed_tiles().skip(1) {
            sender.send(RenderRequest::CreateRoom {
                room: self.treasury.clone(),
                tile: tile.clone(),
            })?;
        }
        if let Some(tile) = self.claimed_tiles().next() {
            sender.send(RenderRequest::CreateTrap {
                trap: self.trap.clone(),
                tile: tile.clone(),
            })?;
        }
        Ok(())
    }

    fn clear_furnishings(&self, sender: &RenderRequestSender) -> Result<(), RenderError> {
        if let Some(tile) = self.claimed_tiles().next() {
            sender.send(RenderRequest::DestroyTrap {
                trap: self.trap.clone(),
                tile: tile.clone(),
            })?;
        }
        for tile in self.claimed_tiles().skip(1) {
            sender.send(RenderRequest::DestroyRoom {
                room: self.treasury.clone(),
                tile: tile.clone(),
            })?;
        }
        for light in &self.lights {
            sender.send(RenderRequest::DestroyMapLight { light: light.clone() })?;
        }
        Ok(())
    }

    fn random_tile(&self, rng: &mut impl Rng) -> SharedTile {
        self.tiles[rng.gen_range(0..self.tiles.len())].clone()
    }

    /// Random request touching the shared world
    fn random_request(&self, rng: &mut impl Rng) -> RenderRequest {
        match rng.gen_range(0..7) {
            0 => {
                let tile = self.random_tile(rng);
                let fullness = tile.read().fullness;
                tile.write().fullness = (fullness - 25.0).max(0.0);
                RenderRequest::RefreshTile { tile }
            }
            1 => RenderRequest::ColorTile {
                tile: self.random_tile(rng),
                player: self.players[rng.gen_range(0..self.players.len())].clone(),
                colored: rng.gen_bool(0.7),
            },
            2 => RenderRequest::ShowSquareSelector {
                x: rng.gen_range(0..MAP_SIZE),
                y: rng.gen_range(0..MAP_SIZE),
            },
            3 => RenderRequest::SetCreatureAnimationState {
                creature: self.creatures[rng.gen_range(0..self.creatures.len())].clone(),
                animation: ANIMATIONS[rng.gen_range(0..ANIMATIONS.len())].to_string(),
                looping: rng.gen_bool(0.5),
            },
            4 => {
                let tile = self.random_tile(rng);
                if rng.gen_bool(0.5) {
                    RenderRequest::DetachTile { tile }
                } else {
                    RenderRequest::AttachTile { tile }
                }
            }
            5 => {
                let creature = &self.creatures[rng.gen_range(0..self.creatures.len())];
                let node = creature.read().node_name();
                RenderRequest::MoveSceneNode {
                    node,
                    position: Vec3::new(rng.gen_range(0.0..8.0), rng.gen_range(0.0..8.0), 0.0),
                }
            }
            _ => {
                let creature = &self.creatures[rng.gen_range(0..self.creatures.len())];
                let node = creature.read().node_name();
                RenderRequest::OrientSceneNodeToward {
                    node,
                    direction: Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0),
                }
            }
        }
    }
}

fn load_config() -> Result<EngineConfig, ConfigError> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from_file(&path)?,
        None => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run(config: &EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let world = Arc::new(DemoWorld::new());
    let manager = RenderManager::new(config)?;
    let events = EventManager::new();
    let render_thread = manager.spawn_dispatcher(SimpleSceneGraph::new())?;

    // Turn 0 builds the map
    let sender = manager.sender();
    for tile in &world.tiles {
        sender.send(RenderRequest::CreateTile { tile: tile.clone() })?;
    }
    for creature in &world.creatures {
        sender.send(RenderRequest::CreateCreature {
            creature: creature.clone(),
        })?;
    }
    world.furnish(&sender)?;
    events.push(Event::new(manager.current_turn()).with_action("map created"))?;
    manager.complete_turn()?;

    let keeper = world.players[0].clone();
    let held = world.creatures[0].clone();

    for _ in 0..TURNS {
        let turn = manager.current_turn();

        thread::scope(|scope| {
            for id in 0..SIM_THREADS {
                let sender = manager.sender();
                let world = Arc::clone(&world);
                thread::Builder::new()
                    .name(format!("sim-{id}"))
                    .spawn_scoped(scope, move || {
                        let mut rng = rand::thread_rng();
                        for _ in 0..REQUESTS_PER_THREAD {
                            if let Err(e) = sender.send(world.random_request(&mut rng)) {
                                log::warn!("Simulation thread {id} could not queue request: {e}");
                            }
                        }
                    })
                    .map(|_| ())
                    .unwrap_or_else(|e| log::error!("Failed to spawn simulation thread {id}: {e}"));
            }
        });

        // The keeper alternates between holding and releasing one creature
        let pick_up = keeper.read().creatures_in_hand.is_empty();
        if pick_up {
            keeper.write().creatures_in_hand.push(held.clone());
            sender.send(RenderRequest::PickUpCreature {
                creature: held.clone(),
                player: keeper.clone(),
            })?;
        } else {
            keeper.write().creatures_in_hand.clear();
            sender.send(RenderRequest::DropCreature {
                creature: held.clone(),
                player: keeper.clone(),
            })?;
        }

        let depth = manager.queue_depth();
        manager.complete_turn()?;
        events.push(
            Event::new(turn)
                .with_action(format!("queue depth {depth} at turn end"))
                .with_action(if pick_up { "creature picked up" } else { "creature dropped" }),
        )?;

        let EventPass { processed, .. } = events.process(&mut TurnLog);
        log::debug!("{processed} events processed after turn {turn}");
    }

    world.clear_furnishings(&sender)?;
    for creature in &world.creatures {
        sender.send(RenderRequest::DestroyCreature {
            creature: creature.clone(),
        })?;
        sender.send(RenderRequest::DeleteCreature {
            creature: creature.clone(),
        })?;
    }
    manager.complete_turn()?;

    manager.shutdown()?;
    let outcome = render_thread
        .join()
        .map_err(|_| "render thread panicked")?;

    let stats = &outcome.stats;
    log::info!(
        "Rendered {} requests ({} applied, {} failed) over {} turns",
        stats.dispatched,
        stats.applied,
        stats.failed,
        manager.current_turn()
    );
    for (kind, count) in &stats.per_kind {
        log::info!("  {kind}: {count}");
    }
    let queue = manager.queue_stats();
    log::info!(
        "Queue: {} enqueued, {} evicted, high water mark {}",
        queue.enqueued,
        queue.evicted,
        queue.high_water_mark
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    logging::init_with_level(&config.logging.level);

    log::info!("Starting turn demo with {SIM_THREADS} simulation threads");

    match run(&config) {
        Ok(()) => {
            log::info!("Turn demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Turn demo failed: {e}");
            Err(e)
        }
    }
}
