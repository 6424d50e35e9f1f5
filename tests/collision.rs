use bevy_ecs::{system::RunSystemOnce, world::World};
use glam::IVec2;
use pacman_engine::events::AudioEvent;
use pacman_engine::map::direction::Direction;
use pacman_engine::map::grid::TileGrid;
use pacman_engine::systems::{
    eaten_ghost_revert_system, player_movement_system, power_up_timer_system, GameStage, Ghost, GhostState, Path,
    Position, PowerUp, RequestedDirection, Session, Target, Velocity,
};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use strum::IntoEnumIterator;

mod common;

fn run_movement(world: &mut World) {
    world
        .run_system_once(player_movement_system)
        .expect("System should run successfully");
}

fn active_power() -> PowerUp {
    PowerUp {
        active: true,
        elapsed: 0,
        chain: 0,
    }
}

#[test]
fn test_power_pellet_frightens_ghosts() {
    let mut world = common::create_test_world(common::box_grid());
    common::spawn_player(&mut world, IVec2::new(86, 125), Direction::Right, 1);
    let blinky = common::spawn_ghost(&mut world, Ghost::Blinky, IVec2::new(7, 1), GhostState::Normal, 3);
    let inky = common::spawn_ghost(&mut world, Ghost::Inky, IVec2::new(7, 3), GhostState::Eaten { bitten: true }, 3);

    run_movement(&mut world);

    assert_that(&world.resource::<Session>().score).is_equal_to(50);
    assert_that(world.resource::<PowerUp>()).is_equal_to(&active_power());

    assert_that(&*world.get::<GhostState>(blinky).unwrap()).is_equal_to(GhostState::Frightened);
    assert_that(&world.get::<Velocity>(blinky).unwrap().speed).is_equal_to(1);
    assert_that(&*world.get::<GhostState>(inky).unwrap()).is_equal_to(GhostState::Eaten { bitten: false });
    assert_that(&world.get::<Velocity>(inky).unwrap().speed).is_equal_to(3);

    assert_eq!(common::drain_audio(&mut world), vec![AudioEvent::PowerPelletEaten]);
}

#[test]
fn test_second_power_pellet_restarts_window() {
    let mut world = common::create_test_world(common::box_grid());
    world.insert_resource(PowerUp {
        active: true,
        elapsed: 300,
        chain: 2,
    });
    common::spawn_player(&mut world, IVec2::new(86, 125), Direction::Right, 1);

    run_movement(&mut world);

    assert_that(world.resource::<PowerUp>()).is_equal_to(&active_power());
}

#[test]
fn test_eating_ghosts_doubles_score() {
    let mut world = common::create_test_world(common::box_grid());
    world.insert_resource(active_power());
    common::spawn_player(&mut world, IVec2::new(36, 25), Direction::Right, 1);
    let ghosts: Vec<_> = Ghost::iter()
        .map(|ghost| common::spawn_ghost(&mut world, ghost, IVec2::new(2, 1), GhostState::Frightened, 1))
        .collect();

    run_movement(&mut world);

    assert_that(&world.resource::<Session>().score).is_equal_to(10 + 400 + 800 + 1600 + 3200);
    assert_that(&world.resource::<PowerUp>().chain).is_equal_to(4);
    assert_that(world.resource::<GameStage>()).is_equal_to(&GameStage::Playing);

    for entity in ghosts {
        assert_that(&*world.get::<GhostState>(entity).unwrap()).is_equal_to(GhostState::Eaten { bitten: true });
        assert_that(&world.get::<Velocity>(entity).unwrap().speed).is_equal_to(3);
        assert_that(&world.get::<Target>(entity).unwrap().0).is_equal_to(IVec2::new(113, 88));
        assert_eq!(
            Vec::from(world.get::<Path>(entity).unwrap().0.clone()),
            vec![IVec2::new(3, 1), IVec2::new(4, 1), IVec2::new(4, 2), IVec2::new(4, 3)]
        );
    }

    let audio = common::drain_audio(&mut world);
    assert_that(&audio.iter().filter(|event| **event == AudioEvent::GhostEaten).count()).is_equal_to(4);
    assert_that(&audio).contains(AudioEvent::PelletEaten);
}

#[test]
fn test_normal_ghost_takes_a_life() {
    let mut world = common::create_test_world(common::box_grid());
    world.insert_resource(PowerUp {
        active: true,
        elapsed: 10,
        chain: 1,
    });
    let player = common::spawn_player(&mut world, IVec2::new(36, 25), Direction::Right, 4);
    let blinky = common::spawn_ghost(&mut world, Ghost::Blinky, IVec2::new(2, 1), GhostState::Normal, 3);

    run_movement(&mut world);

    assert_that(world.resource::<GameStage>()).is_equal_to(&GameStage::PlayerDying);
    assert_that(world.resource::<Session>()).is_equal_to(&Session { score: 10, lives: 2 });
    assert_that(world.resource::<PowerUp>()).is_equal_to(&PowerUp::default());

    assert_that(&world.get::<Position>(player).unwrap().0).is_equal_to(IVec2::new(25, 25));
    assert_that(&world.get::<Velocity>(player).unwrap().direction).is_equal_to(Direction::Right);
    assert_that(&world.get::<RequestedDirection>(player).unwrap().0).is_equal_to(Direction::Right);
    assert_that(&world.get::<Position>(blinky).unwrap().0).is_equal_to(IVec2::new(75, 75));

    assert_that(&common::drain_audio(&mut world)).contains(AudioEvent::PlayerDeath);
}

#[test]
fn test_last_life_loses_the_game() {
    let mut world = common::create_test_world(common::box_grid());
    world.insert_resource(Session { score: 0, lives: 0 });
    let player = common::spawn_player(&mut world, IVec2::new(36, 25), Direction::Right, 4);
    common::spawn_ghost(&mut world, Ghost::Blinky, IVec2::new(2, 1), GhostState::Normal, 3);

    run_movement(&mut world);

    assert_that(world.resource::<GameStage>()).is_equal_to(&GameStage::Lost);
    assert_that(&world.resource::<Session>().lives).is_equal_to(0);
    assert_that(&world.get::<Position>(player).unwrap().0).is_equal_to(IVec2::new(37, 25));
    assert_that(&common::drain_audio(&mut world)).contains(AudioEvent::PlayerDeath);
}

#[test]
fn test_stationary_player_is_still_caught() {
    let mut world = common::create_test_world(common::box_grid());
    common::spawn_player(&mut world, IVec2::new(25, 25), Direction::Left, 4);
    common::spawn_ghost(&mut world, Ghost::Pinky, IVec2::new(1, 1), GhostState::Normal, 3);

    run_movement(&mut world);

    assert_that(world.resource::<GameStage>()).is_equal_to(&GameStage::PlayerDying);
    assert_that(&world.resource::<Session>().lives).is_equal_to(2);
}

#[test]
fn test_bitten_ghost_is_lethal() {
    let mut world = common::create_test_world(common::box_grid());
    world.insert_resource(active_power());
    common::spawn_player(&mut world, IVec2::new(36, 25), Direction::Right, 1);
    common::spawn_ghost(&mut world, Ghost::Inky, IVec2::new(2, 1), GhostState::Bitten, 3);

    run_movement(&mut world);

    assert_that(world.resource::<GameStage>()).is_equal_to(&GameStage::PlayerDying);
}

#[test]
fn test_eaten_ghost_is_harmless() {
    let mut world = common::create_test_world(common::box_grid());
    common::spawn_player(&mut world, IVec2::new(36, 25), Direction::Right, 1);
    let inky = common::spawn_ghost(&mut world, Ghost::Inky, IVec2::new(2, 1), GhostState::Eaten { bitten: false }, 3);

    run_movement(&mut world);

    assert_that(world.resource::<GameStage>()).is_equal_to(&GameStage::Playing);
    assert_that(&world.resource::<Session>().lives).is_equal_to(3);
    assert_that(&*world.get::<GhostState>(inky).unwrap()).is_equal_to(GhostState::Eaten { bitten: false });
}

#[test]
fn test_no_collisions_in_tunnel() {
    let mut world = common::create_test_world(common::box_grid());
    common::spawn_player(&mut world, IVec2::new(-14, 25), Direction::Left, 1);
    common::spawn_ghost(&mut world, Ghost::Blinky, IVec2::new(-1, 1), GhostState::Normal, 3);

    run_movement(&mut world);

    assert_that(world.resource::<GameStage>()).is_equal_to(&GameStage::Playing);
    assert_that(&world.resource::<Session>().lives).is_equal_to(3);
}

#[test]
fn test_last_pellet_wins_the_level() {
    let grid = TileGrid::from_codes(&[&[5, 5, 5, 5, 5, 5, 5], &[5, 0, 1, 0, 0, 0, 5], &[5, 5, 5, 5, 5, 5, 5]]).unwrap();
    let mut world = common::create_test_world(grid);
    let player = common::spawn_player(&mut world, IVec2::new(36, 25), Direction::Right, 4);

    run_movement(&mut world);

    assert_that(world.resource::<GameStage>()).is_equal_to(&GameStage::Won);
    assert_that(&world.resource::<TileGrid>().dots_left()).is_equal_to(0);
    assert_that(&world.resource::<Session>().score).is_equal_to(10);
    // Movement stops on the step that cleared the board.
    assert_that(&world.get::<Position>(player).unwrap().0).is_equal_to(IVec2::new(37, 25));
}

#[test]
fn test_eaten_ghost_revives_at_end_of_path() {
    let mut world = common::create_test_world(common::box_grid());
    world.insert_resource(active_power());
    common::spawn_player(&mut world, IVec2::new(25, 25), Direction::Right, 4);
    let bitten = common::spawn_ghost(&mut world, Ghost::Blinky, IVec2::new(7, 5), GhostState::Eaten { bitten: true }, 3);
    let fresh = common::spawn_ghost(&mut world, Ghost::Inky, IVec2::new(6, 5), GhostState::Eaten { bitten: false }, 3);
    let travelling = common::spawn_ghost(&mut world, Ghost::Pinky, IVec2::new(5, 5), GhostState::Eaten { bitten: true }, 3);
    world.get_mut::<Path>(travelling).unwrap().0.push_back(IVec2::new(4, 5));

    world
        .run_system_once(eaten_ghost_revert_system)
        .expect("System should run successfully");

    assert_that(&*world.get::<GhostState>(bitten).unwrap()).is_equal_to(GhostState::Bitten);
    assert_that(&*world.get::<GhostState>(fresh).unwrap()).is_equal_to(GhostState::Frightened);
    assert_that(&*world.get::<GhostState>(travelling).unwrap()).is_equal_to(GhostState::Eaten { bitten: true });
}

#[test]
fn test_eaten_ghost_revives_normal_without_power() {
    let mut world = common::create_test_world(common::box_grid());
    common::spawn_player(&mut world, IVec2::new(25, 25), Direction::Right, 4);
    let ghost = common::spawn_ghost(&mut world, Ghost::Blinky, IVec2::new(7, 5), GhostState::Eaten { bitten: true }, 3);
    let underfoot = common::spawn_ghost(&mut world, Ghost::Inky, IVec2::new(1, 1), GhostState::Eaten { bitten: true }, 3);

    world
        .run_system_once(eaten_ghost_revert_system)
        .expect("System should run successfully");

    assert_that(&*world.get::<GhostState>(ghost).unwrap()).is_equal_to(GhostState::Normal);
    assert_that(&*world.get::<GhostState>(underfoot).unwrap()).is_equal_to(GhostState::Eaten { bitten: true });
}

#[test]
fn test_power_up_ages_while_playing() {
    let mut world = common::create_test_world(common::box_grid());
    world.insert_resource(PowerUp {
        active: true,
        elapsed: 100,
        chain: 1,
    });

    world
        .run_system_once(power_up_timer_system)
        .expect("System should run successfully");
    assert_that(&world.resource::<PowerUp>().elapsed).is_equal_to(101);

    world.insert_resource(GameStage::PlayerDying);
    world
        .run_system_once(power_up_timer_system)
        .expect("System should run successfully");
    assert_that(&world.resource::<PowerUp>().elapsed).is_equal_to(101);
}

#[test]
fn test_power_up_expiry_calms_ghosts() {
    let mut world = common::create_test_world(common::box_grid());
    world.insert_resource(PowerUp {
        active: true,
        elapsed: 480,
        chain: 2,
    });
    let frightened = common::spawn_ghost(&mut world, Ghost::Blinky, IVec2::new(7, 1), GhostState::Frightened, 1);
    let bitten = common::spawn_ghost(&mut world, Ghost::Inky, IVec2::new(7, 5), GhostState::Bitten, 3);
    let eaten = common::spawn_ghost(&mut world, Ghost::Pinky, IVec2::new(1, 5), GhostState::Eaten { bitten: true }, 3);

    world
        .run_system_once(power_up_timer_system)
        .expect("System should run successfully");

    assert_that(world.resource::<PowerUp>()).is_equal_to(&PowerUp::default());
    assert_that(&*world.get::<GhostState>(frightened).unwrap()).is_equal_to(GhostState::Normal);
    assert_that(&world.get::<Velocity>(frightened).unwrap().speed).is_equal_to(3);
    assert_that(&*world.get::<GhostState>(bitten).unwrap()).is_equal_to(GhostState::Normal);
    assert_that(&*world.get::<GhostState>(eaten).unwrap()).is_equal_to(GhostState::Eaten { bitten: false });
}
