use std::io;

use glam::Vec2;

use gloom::net::{Hello, SpriteDesc, SpriteRecord, SpriteUpdate, Transform};
use gloom::{
    ClientMessage, ClientPacket, ConnectionState, HeldKeys, Map, ReceiveError, ServerMessage,
    ServerPacket, Session, SessionEvent, SpriteType, Transport, World, step,
};

#[derive(Default)]
struct RecordingTransport {
    sent: Vec<Vec<u8>>,
}

impl Transport for RecordingTransport {
    fn send(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.sent.push(bytes.to_vec());
        Ok(bytes.len())
    }
}

const LOCAL_ID: u8 = 1;

fn record(kind: SpriteType, id: u8, owner: u8, position: Vec2) -> SpriteRecord {
    SpriteRecord {
        desc: SpriteDesc {
            kind: kind as u8,
            id,
            owner,
            field: 0,
        },
        transform: Transform {
            rotation: 0.0,
            position,
            velocity: Vec2::ZERO,
        },
    }
}

fn hello_bytes(sequence: u32) -> Vec<u8> {
    let map = Map::from_rows(&["####", "#..#"]).unwrap();
    ServerPacket::new(
        sequence,
        ServerMessage::Hello(Hello {
            player_id: LOCAL_ID,
            map,
            sprites: vec![
                record(SpriteType::Player, LOCAL_ID, LOCAL_ID, Vec2::new(1.5, 1.5)),
                record(SpriteType::Player, 2, 2, Vec2::new(2.5, 1.5)),
            ],
        }),
    )
    .encode()
}

fn destroy_bytes(sequence: u32, kind: SpriteType, id: u8, owner: u8, field: u8) -> Vec<u8> {
    ServerPacket::new(
        sequence,
        ServerMessage::Destroy(SpriteDesc {
            kind: kind as u8,
            id,
            owner,
            field,
        }),
    )
    .encode()
}

fn create_bytes(sequence: u32, record: SpriteRecord) -> Vec<u8> {
    ServerPacket::new(sequence, ServerMessage::Create(record)).encode()
}

/// Session that has joined and received Hello (sequence 0).
fn joined() -> (Session, World, RecordingTransport) {
    let mut session = Session::new();
    let mut world = World::new();
    let mut transport = RecordingTransport::default();
    session.init(0x1234, 99);
    session.join(&mut transport).unwrap();
    session.receive(&mut world, &hello_bytes(0), 0.0).unwrap();
    (session, world, transport)
}

fn start_match(session: &mut Session, world: &mut World, sequence: u32, now: f32) {
    let start = ServerPacket::new(
        sequence,
        ServerMessage::Wait {
            seconds: 0,
            waiting_for_players: false,
        },
    );
    let events = session.receive(world, &start.encode(), now).unwrap();
    assert_eq!(events, vec![SessionEvent::MatchStarted]);
}

#[test]
fn test_hello_accepted_while_joining() {
    let (session, world, transport) = joined();

    assert_eq!(session.state(), ConnectionState::Waiting);
    assert_eq!(session.local_id(), Some(LOCAL_ID));
    assert_eq!(world.map.width(), 4);
    assert_eq!(world.map.height(), 2);
    assert_eq!(world.player.position, Vec2::new(1.5, 1.5));
    // The local record updates the player instead of creating a sprite
    assert_eq!(world.sprites.len(), 1);
    assert!(world.sprites.get(2).is_some());

    let ready = ClientPacket::decode(&transport.sent[0]).unwrap();
    assert_eq!(ready.message, ClientMessage::Ready(false));
}

#[test]
fn test_hello_dropped_while_updating() {
    let (mut session, mut world, _) = joined();
    start_match(&mut session, &mut world, 1, 5.0);

    let result = session.receive(&mut world, &hello_bytes(2), 6.0);
    assert_eq!(
        result,
        Err(ReceiveError::WrongState {
            packet: "hello",
            state: ConnectionState::Updating,
        })
    );
    assert_eq!(session.state(), ConnectionState::Updating);
    assert_eq!(session.stats().dropped_state, 1);
}

#[test]
fn test_hello_with_wrong_tail_is_malformed() {
    let mut session = Session::new();
    let mut world = World::new();
    session.init(1, 1);
    session.join(&mut RecordingTransport::default()).unwrap();

    let mut bytes = hello_bytes(0);
    bytes.push(0);
    assert!(matches!(
        session.receive(&mut world, &bytes, 0.0),
        Err(ReceiveError::Malformed(_))
    ));
    assert_eq!(session.state(), ConnectionState::Joining);
}

#[test]
fn test_sequence_window_drops_stale_packets() {
    let (mut session, mut world, _) = joined();
    // Walk the expected sequence up to 101
    for seq in (1..=100).step_by(5) {
        let bytes = create_bytes(seq, record(SpriteType::Player, 3, 3, Vec2::new(2.5, 1.5)));
        session.receive(&mut world, &bytes, 0.0).unwrap();
    }
    let bytes = create_bytes(100, record(SpriteType::Player, 3, 3, Vec2::new(2.5, 1.5)));
    session.receive(&mut world, &bytes, 0.0).unwrap();

    let bytes = create_bytes(105, record(SpriteType::Player, 4, 4, Vec2::new(2.5, 1.5)));
    assert!(session.receive(&mut world, &bytes, 0.0).is_ok());
    assert!(world.sprites.get(4).is_some());

    let bytes = create_bytes(50, record(SpriteType::Player, 5, 5, Vec2::new(2.5, 1.5)));
    assert_eq!(
        session.receive(&mut world, &bytes, 0.0),
        Err(ReceiveError::Sequence {
            expected: 106,
            got: 50
        })
    );
    assert!(world.sprites.get(5).is_none());
}

#[test]
fn test_ids_stay_unique_and_tracking_follows_killer() {
    let (mut session, mut world, _) = joined();
    let mut seq = 1;
    let mut next = || {
        seq += 1;
        seq - 1
    };

    for id in [3, 4, 3, 5, 4] {
        let bytes = create_bytes(next(), record(SpriteType::Player, id, id, Vec2::new(2.5, 1.5)));
        session.receive(&mut world, &bytes, 0.0).unwrap();
    }
    let mut ids: Vec<u8> = world.sprites.iter().map(|s| s.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![2, 3, 4, 5]);

    world.sprites.track(3);
    session
        .receive(&mut world, &destroy_bytes(next(), SpriteType::Player, 3, 3, 5), 0.0)
        .unwrap();
    assert_eq!(world.sprites.tracked().map(|s| s.id), Some(5));

    session
        .receive(&mut world, &destroy_bytes(next(), SpriteType::Player, 5, 5, 42), 0.0)
        .unwrap();
    assert!(world.sprites.tracked().is_none());

    let mut ids: Vec<u8> = world.sprites.iter().map(|s| s.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), world.sprites.len());
}

#[test]
fn test_local_death_spectates_killer() {
    let (mut session, mut world, _) = joined();
    let events = session
        .receive(&mut world, &destroy_bytes(1, SpriteType::Player, LOCAL_ID, LOCAL_ID, 2), 0.0)
        .unwrap();
    assert_eq!(events, vec![SessionEvent::LocalPlayerKilled { killer: 2 }]);
    assert_eq!(session.local_id(), None);
    assert_eq!(world.sprites.tracked().map(|s| s.id), Some(2));
}

#[test]
fn test_bullets_score_and_damage() {
    let (mut session, mut world, _) = joined();

    let bullet = record(SpriteType::Bullet, 10, 2, Vec2::new(2.0, 1.5));
    session.receive(&mut world, &create_bytes(1, bullet), 0.0).unwrap();
    assert_eq!(world.sprites.get(2).map(|s| s.anim_frame), Some(6.0));

    let events = session
        .receive(&mut world, &destroy_bytes(2, SpriteType::Bullet, 10, 2, LOCAL_ID), 0.0)
        .unwrap();
    assert_eq!(events, vec![SessionEvent::Damaged { health: 75 }]);
    assert_eq!(world.player.health, 75);

    let mine = record(SpriteType::Bullet, 11, LOCAL_ID, Vec2::new(2.0, 1.5));
    session.receive(&mut world, &create_bytes(3, mine), 0.0).unwrap();
    let events = session
        .receive(&mut world, &destroy_bytes(4, SpriteType::Bullet, 11, LOCAL_ID, 2), 0.0)
        .unwrap();
    assert_eq!(events, vec![SessionEvent::HitScored { victim: 2 }]);

    let events = session
        .receive(&mut world, &destroy_bytes(5, SpriteType::Player, 2, 2, LOCAL_ID), 0.0)
        .unwrap();
    assert_eq!(events, vec![SessionEvent::LastPlayerStanding]);
}

#[test]
fn test_reconciliation_without_new_input_is_stable() {
    let mut session = Session::new();
    let mut world = World::new();
    session.init(1, 1);
    session.join(&mut RecordingTransport::default()).unwrap();

    let map = Map::with_size(32, 8).unwrap();
    let hello = ServerPacket::new(
        0,
        ServerMessage::Hello(Hello {
            player_id: LOCAL_ID,
            map,
            sprites: vec![record(SpriteType::Player, LOCAL_ID, LOCAL_ID, Vec2::new(4.5, 4.5))],
        }),
    );
    session.receive(&mut world, &hello.encode(), 0.0).unwrap();
    start_match(&mut session, &mut world, 1, 10.0);

    session.record_input(&world.player, HeldKeys::FORWARD, 10.5);
    session.record_input(&world.player, HeldKeys::empty(), 11.0);

    let update = |seq| {
        ServerPacket::new(
            seq,
            ServerMessage::Update(SpriteUpdate {
                timestamp: 0.25,
                id: LOCAL_ID,
                transform: Transform {
                    rotation: 0.0,
                    position: Vec2::new(4.5, 4.5),
                    velocity: Vec2::ZERO,
                },
            }),
        )
        .encode()
    };

    session.receive(&mut world, &update(2), 12.0).unwrap();
    let first = world.player.position;
    session.receive(&mut world, &update(3), 12.0).unwrap();
    assert_eq!(world.player.position, first);
    // Half a second of forward movement at run speed
    assert!((first.x - (4.5 + 0.5 * 3.5)).abs() < 1e-3);
}

fn local_update(sequence: u32, timestamp: f32, position: Vec2) -> Vec<u8> {
    ServerPacket::new(
        sequence,
        ServerMessage::Update(SpriteUpdate {
            timestamp,
            id: LOCAL_ID,
            transform: Transform {
                rotation: 0.0,
                position,
                velocity: Vec2::ZERO,
            },
        }),
    )
    .encode()
}

fn predict(world: &mut World, keys: HeldKeys, ticks: u32) {
    for _ in 0..ticks {
        step(world, keys, 1.0 / 60.0);
    }
}

#[test]
fn test_replay_from_anchor_matches_prediction() {
    let mut session = Session::new();
    let mut world = World::new();
    session.init(1, 1);
    session.join(&mut RecordingTransport::default()).unwrap();

    // Wall column at x = 6
    let map = Map::from_rows(&[
        "########", "#.....##", "#.....##", "#.....##", "#.....##", "########",
    ])
    .unwrap();
    let start = Vec2::new(2.5, 2.5);
    let hello = ServerPacket::new(
        0,
        ServerMessage::Hello(Hello {
            player_id: LOCAL_ID,
            map,
            sprites: vec![record(SpriteType::Player, LOCAL_ID, LOCAL_ID, start)],
        }),
    );
    session.receive(&mut world, &hello.encode(), 0.0).unwrap();
    start_match(&mut session, &mut world, 1, 10.0);

    // Half a second forward in open space, then a quarter second standing
    session.record_input(&world.player, HeldKeys::FORWARD, 10.5);
    predict(&mut world, HeldKeys::FORWARD, 30);
    session.record_input(&world.player, HeldKeys::empty(), 11.0);
    predict(&mut world, HeldKeys::empty(), 15);
    let predicted = world.player.position;
    assert!((predicted.x - 4.25).abs() < 1e-3);

    session.receive(&mut world, &local_update(2, 0.5, start), 11.25).unwrap();
    assert!((world.player.position - predicted).length() < 1e-3);

    // A full second forward runs into the wall
    session.record_input(&world.player, HeldKeys::FORWARD, 11.25);
    predict(&mut world, HeldKeys::FORWARD, 60);
    session.record_input(&world.player, HeldKeys::empty(), 12.25);
    let predicted = world.player.position;
    assert!((predicted.x - (6.0 - 0.2)).abs() < 1e-3);

    session.receive(&mut world, &local_update(3, 0.5, start), 12.25).unwrap();
    assert!((world.player.position - predicted).length() < 1e-3);
    assert!((world.player.position.y - start.y).abs() < 1e-6);
}
