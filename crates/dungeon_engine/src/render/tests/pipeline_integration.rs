//! Producer threads and a render thread running concurrently

use crate::core::config::EngineConfig;
use crate::foundation::collections::shared;
use crate::foundation::math::Vec3;
use crate::render::{RenderManager, RenderRequest, RenderRequestKind};
use crate::scene::{SceneGraph, SimpleSceneGraph};
use crate::sim::{TurnError, TurnNumber};
use crate::world::{Tile, TileType};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const PRODUCERS: i32 = 4;
const REQUESTS_PER_PRODUCER: i32 = 250;

fn scene_with_producer_nodes() -> SimpleSceneGraph {
    let mut scene = SimpleSceneGraph::new();
    let root = scene.root();
    for producer in 0..PRODUCERS {
        scene.create_node(&format!("Producer{producer}"), root).unwrap();
    }
    scene
}

#[test]
fn test_concurrent_producers_keep_per_producer_order() {
    crate::foundation::logging::init_for_tests();
    let manager = RenderManager::new(&EngineConfig::default()).unwrap();
    let observed: Arc<Mutex<Vec<(i32, i32)>>> = Arc::new(Mutex::new(Vec::new()));

    let dispatcher = {
        let observed = Arc::clone(&observed);
        manager
            .dispatcher(scene_with_producer_nodes())
            .unwrap()
            .with_listener(move |record| {
                let entry = match record.request {
                    RenderRequest::ShowSquareSelector { x, y } => Some((*x, *y)),
                    #[allow(clippy::cast_possible_truncation)]
                    RenderRequest::MoveSceneNode { node, position } => node
                        .strip_prefix("Producer")
                        .and_then(|id| id.parse().ok())
                        .map(|producer| (producer, position.x as i32)),
                    _ => None,
                };
                if let Some(entry) = entry {
                    observed.lock().push(entry);
                }
            })
    };
    let render_thread = manager.spawn(dispatcher).unwrap();

    thread::scope(|scope| {
        for producer in 0..PRODUCERS {
            let sender = manager.sender();
            scope.spawn(move || {
                let tile = shared(Tile::new(producer, 0, TileType::Claimed, 100.0));
                let player = super::keeper(7);
                for i in 0..REQUESTS_PER_PRODUCER {
                    #[allow(clippy::cast_precision_loss)]
                    let request = match i % 5 {
                        0 | 4 => RenderRequest::MoveSceneNode {
                            node: format!("Producer{producer}"),
                            position: Vec3::new(i as f32, 0.0, 0.0),
                        },
                        1 => RenderRequest::ShowSquareSelector { x: producer, y: i },
                        2 => RenderRequest::ColorTile {
                            tile: tile.clone(),
                            player: player.clone(),
                            colored: true,
                        },
                        _ => RenderRequest::RefreshTile { tile: tile.clone() },
                    };
                    sender.send(request).unwrap();
                }
            });
        }
    });

    manager.shutdown().unwrap();
    let outcome = render_thread.join().unwrap();
    let stats = outcome.stats;

    assert_eq!(stats.dispatched, 1000);
    assert_eq!(stats.failed, 0);
    assert!(stats.shutdown_received);
    assert_eq!(stats.count(RenderRequestKind::MoveSceneNode), 400);
    assert_eq!(stats.count(RenderRequestKind::ShowSquareSelector), 200);
    assert_eq!(stats.count(RenderRequestKind::ColorTile), 200);
    assert_eq!(stats.count(RenderRequestKind::RefreshTile), 200);

    let observed = observed.lock();
    assert_eq!(observed.len(), 600);
    for producer in 0..PRODUCERS {
        let sequence: Vec<i32> = observed
            .iter()
            .filter(|(p, _)| *p == producer)
            .map(|(_, i)| *i)
            .collect();
        assert_eq!(sequence.len(), 150);
        assert!(
            sequence.windows(2).all(|w| w[0] < w[1]),
            "producer {producer} requests dispatched out of order"
        );
    }

    assert_eq!(manager.turns().total_outstanding(), 0);
    assert_eq!(manager.queue_stats().in_flight, 0);
}

#[test]
fn test_turn_completes_only_after_its_requests_render() {
    let manager = RenderManager::new(&EngineConfig::default()).unwrap();
    let sender = manager.sender();
    let handled = Arc::new(AtomicUsize::new(0));

    for x in 0..100 {
        sender.send(RenderRequest::ShowSquareSelector { x, y: 0 }).unwrap();
    }
    assert_eq!(
        manager.turns().wait_for_turn(0, Duration::from_millis(20)),
        Err(TurnError::Timeout { turn: 0, outstanding: 100 })
    );

    let dispatcher = {
        let handled = Arc::clone(&handled);
        manager
            .dispatcher(SimpleSceneGraph::new())
            .unwrap()
            .with_listener(move |_| {
                handled.fetch_add(1, Ordering::SeqCst);
            })
    };
    let render_thread = manager.spawn(dispatcher).unwrap();

    assert_eq!(manager.complete_turn(), Ok(1));
    assert_eq!(handled.load(Ordering::SeqCst), 100);
    assert_eq!(sender.current_turn(), 1);

    manager.shutdown().unwrap();
    let outcome = render_thread.join().unwrap();
    assert_eq!(outcome.stats.dispatched, 100);
}

#[test]
fn test_turns_render_in_order_across_producers() {
    let manager = RenderManager::new(&EngineConfig::default()).unwrap();
    let turns_seen: Arc<Mutex<Vec<TurnNumber>>> = Arc::new(Mutex::new(Vec::new()));

    let dispatcher = {
        let turns_seen = Arc::clone(&turns_seen);
        manager
            .dispatcher(SimpleSceneGraph::new())
            .unwrap()
            .with_listener(move |record| turns_seen.lock().push(record.turn))
    };
    let render_thread = manager.spawn(dispatcher).unwrap();

    for _ in 0..3 {
        thread::scope(|scope| {
            for producer in 0..PRODUCERS {
                let sender = manager.sender();
                scope.spawn(move || {
                    for y in 0..50 {
                        sender.send(RenderRequest::ShowSquareSelector { x: producer, y }).unwrap();
                    }
                });
            }
        });
        manager.complete_turn().unwrap();
    }
    assert!(manager.turns().snapshot().is_empty());

    manager.shutdown().unwrap();
    let outcome = render_thread.join().unwrap();
    assert_eq!(outcome.stats.dispatched, 600);

    let turns_seen = turns_seen.lock();
    assert!(turns_seen.windows(2).all(|w| w[0] <= w[1]));
    for turn in 0..3 {
        assert_eq!(turns_seen.iter().filter(|&&t| t == turn).count(), 200);
    }
    assert_eq!(manager.turns().snapshot(), vec![(3, 0)]);
}

#[test]
fn test_render_thread_discards_requests_behind_sentinel() {
    let manager = RenderManager::new(&EngineConfig::default()).unwrap();
    let sender = manager.sender();

    sender.send(RenderRequest::ShowSquareSelector { x: 0, y: 0 }).unwrap();
    sender.send_shutdown().unwrap();
    sender.send(RenderRequest::ShowSquareSelector { x: 1, y: 1 }).unwrap();
    sender.send(RenderRequest::ShowSquareSelector { x: 2, y: 2 }).unwrap();

    let outcome = manager
        .spawn_dispatcher(SimpleSceneGraph::new())
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(outcome.stats.dispatched, 1);
    assert_eq!(outcome.stats.discarded, 2);
    assert_eq!(manager.turns().total_outstanding(), 0);
    assert!(manager.wait_until_flushed(Duration::from_millis(10)));

    let scene = outcome.scene;
    let selector = scene.node(scene.find_node("SquareSelectorNode").unwrap()).unwrap();
    assert_eq!(selector.position, Vec3::zeros());
}

#[test]
fn test_wait_until_flushed_with_running_dispatcher() {
    let manager = RenderManager::new(&EngineConfig::default()).unwrap();
    let render_thread = manager.spawn_dispatcher(SimpleSceneGraph::new()).unwrap();
    let sender = manager.sender();

    for y in 0..20 {
        sender.send(RenderRequest::ShowSquareSelector { x: 3, y }).unwrap();
    }
    assert!(manager.wait_until_flushed(Duration::from_secs(5)));
    assert_eq!(manager.queue_depth(), 0);

    manager.shutdown().unwrap();
    let outcome = render_thread.join().unwrap();
    assert_eq!(outcome.stats.dispatched, 20);

    let scene = outcome.scene;
    let selector = scene.node(scene.find_node("SquareSelectorNode").unwrap()).unwrap();
    assert_eq!(selector.position, Vec3::new(3.0, 19.0, 0.0));
}

#[test]
fn test_send_while_completing_turn_lands_in_next_turn() {
    let manager = RenderManager::new(&EngineConfig::default()).unwrap();
    let sender = manager.sender();
    let mut dispatcher = manager.dispatcher(SimpleSceneGraph::new()).unwrap();
    assert_eq!(sender.send(RenderRequest::ShowSquareSelector { x: 0, y: 0 }).unwrap(), 0);

    thread::scope(|scope| {
        let completion = scope.spawn(|| manager.complete_turn());
        while manager.current_turn() == 0 {
            thread::sleep(Duration::from_millis(1));
        }

        // Turn 0 has not rendered yet, but new work already belongs to turn 1
        assert_eq!(sender.send(RenderRequest::ShowSquareSelector { x: 1, y: 1 }).unwrap(), 1);
        assert_eq!(manager.turns().outstanding(0), 1);
        assert_eq!(manager.turns().outstanding(1), 1);

        assert_eq!(dispatcher.process_pending(), 2);
        assert_eq!(completion.join().unwrap(), Ok(1));
    });

    assert!(manager.turns().is_turn_clear(1));
    assert_eq!(manager.current_turn(), 1);
}
