use bevy_ecs::{system::RunSystemOnce, world::World};
use glam::IVec2;
use pacman_engine::config::GameConfig;
use pacman_engine::events::{AudioEvent, GameCommand};
use pacman_engine::map::direction::Direction;
use pacman_engine::map::grid::TileGrid;
use pacman_engine::map::level::{LevelCatalog, LevelColor};
use pacman_engine::systems::{
    animation_system, load_level, stage_command_system, stage_timer_system, AnimationCounter, CurrentLevel, GameStage,
    Ghost, GhostState, Position, PowerUp, Session,
};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

fn run_commands(world: &mut World) {
    world
        .run_system_once(stage_command_system)
        .expect("System should run successfully");
}

#[test]
fn test_stage_helpers() {
    let config = GameConfig::default();

    assert_that(&GameStage::intro(&config)).is_equal_to(GameStage::Intro { remaining_ticks: 300 });
    assert_that(&GameStage::Playing.is_playing()).is_true();
    assert_that(&GameStage::PlayerDying.is_playing()).is_false();
    assert_that(&GameStage::Won.is_over()).is_true();
    assert_that(&GameStage::Lost.is_over()).is_true();
    assert_that(&GameStage::Playing.is_over()).is_false();
}

#[test]
fn test_ghost_score_doubles() {
    let mut power = PowerUp::default();
    power.activate();

    let scores: Vec<u32> = (0..4).map(|_| power.next_ghost_score()).collect();

    assert_eq!(scores, vec![400, 800, 1600, 3200]);
    assert_that(&power.chain).is_equal_to(4);
}

#[test]
fn test_ghost_score_saturates() {
    let mut power = PowerUp {
        active: true,
        elapsed: 0,
        chain: 40,
    };

    assert_that(&power.next_ghost_score()).is_equal_to(u32::MAX);
}

#[test]
fn test_intro_counts_down_then_plays() {
    let mut world = common::create_test_world(common::box_grid());
    world.insert_resource(GameStage::Intro { remaining_ticks: 2 });

    let mut stages = Vec::new();
    for _ in 0..4 {
        world
            .run_system_once(stage_timer_system)
            .expect("System should run successfully");
        stages.push(*world.resource::<GameStage>());
    }

    assert_eq!(
        stages,
        vec![
            GameStage::Intro { remaining_ticks: 1 },
            GameStage::Intro { remaining_ticks: 0 },
            GameStage::Playing,
            GameStage::Playing,
        ]
    );
}

#[test]
fn test_animation_counter_cycles() {
    let mut world = common::create_test_world(common::box_grid());
    let config = GameConfig::default();

    world
        .run_system_once(animation_system)
        .expect("System should run successfully");
    assert_that(world.resource::<AnimationCounter>()).is_equal_to(&AnimationCounter(1));

    world.insert_resource(AnimationCounter(60));
    world
        .run_system_once(animation_system)
        .expect("System should run successfully");
    assert_that(world.resource::<AnimationCounter>()).is_equal_to(&AnimationCounter(0));

    assert_that(&AnimationCounter(31).power_pellets_visible(&config)).is_true();
    assert_that(&AnimationCounter(30).power_pellets_visible(&config)).is_false();
}

#[test]
fn test_load_level_replaces_board() {
    let catalog = LevelCatalog::builtin().unwrap();
    let mut grid = common::box_grid();
    let mut current = CurrentLevel {
        index: 0,
        color: LevelColor::default(),
        starts: common::box_starts(),
    };

    load_level(&catalog, 1, &mut grid, &mut current).unwrap();

    assert_that(&grid.dots_left()).is_equal_to(262);
    assert_that(&current.index).is_equal_to(1);
    assert_that(&current.color).is_equal_to(LevelColor::new(222, 33, 33));
    assert_that(&current.starts.player).is_equal_to(IVec2::new(15, 24));
}

#[test]
fn test_load_unknown_level_leaves_board_alone() {
    let catalog = LevelCatalog::builtin().unwrap();
    let mut grid = common::box_grid();
    let mut current = CurrentLevel {
        index: 0,
        color: LevelColor::default(),
        starts: common::box_starts(),
    };

    assert_that(&load_level(&catalog, 7, &mut grid, &mut current).is_err()).is_true();
    assert_that(&grid.dots_left()).is_equal_to(19);
    assert_that(&current.starts).is_equal_to(common::box_starts());
}

#[test]
fn test_death_sequence_finished_restarts_intro() {
    let mut world = common::create_test_world(common::box_grid());
    world.insert_resource(GameStage::PlayerDying);

    common::send_command(&mut world, GameCommand::DeathSequenceFinished);
    run_commands(&mut world);

    assert_that(world.resource::<GameStage>()).is_equal_to(&GameStage::Intro { remaining_ticks: 300 });
    assert_eq!(common::drain_audio(&mut world), vec![AudioEvent::Intro]);
}

#[test]
fn test_stage_commands_ignored_while_playing() {
    let mut world = common::create_test_world(common::box_grid());

    common::send_command(&mut world, GameCommand::DeathSequenceFinished);
    common::send_command(&mut world, GameCommand::Confirm);
    run_commands(&mut world);

    assert_that(world.resource::<GameStage>()).is_equal_to(&GameStage::Playing);
    assert_that(&world.resource::<TileGrid>().dots_left()).is_equal_to(19);
    assert_that(&common::drain_audio(&mut world).is_empty()).is_true();
}

#[test]
fn test_confirm_after_loss_starts_new_game() {
    let mut world = common::create_test_world(common::box_grid());
    world.insert_resource(GameStage::Lost);
    world.insert_resource(Session { score: 1234, lives: 0 });
    world.insert_resource(PowerUp {
        active: true,
        elapsed: 5,
        chain: 1,
    });
    let player = common::spawn_player(&mut world, IVec2::new(100, 125), Direction::Left, 4);
    let blinky = common::spawn_ghost(&mut world, Ghost::Blinky, IVec2::new(7, 5), GhostState::Frightened, 1);

    common::send_command(&mut world, GameCommand::Confirm);
    run_commands(&mut world);

    assert_that(world.resource::<GameStage>()).is_equal_to(&GameStage::Intro { remaining_ticks: 300 });
    assert_that(world.resource::<Session>()).is_equal_to(&Session { score: 0, lives: 3 });
    assert_that(world.resource::<PowerUp>()).is_equal_to(&PowerUp::default());
    assert_that(&world.resource::<CurrentLevel>().index).is_equal_to(0);
    assert_that(&world.resource::<TileGrid>().dots_left()).is_equal_to(244);

    assert_that(&world.get::<Position>(player).unwrap().0).is_equal_to(IVec2::new(375, 600));
    assert_that(&world.get::<Position>(blinky).unwrap().0).is_equal_to(IVec2::new(350, 300));
    assert_that(&*world.get::<GhostState>(blinky).unwrap()).is_equal_to(GhostState::Normal);

    assert_eq!(common::drain_audio(&mut world), vec![AudioEvent::Intro]);
}

#[test]
fn test_confirm_after_win_advances_level() {
    let mut world = common::create_test_world(common::box_grid());
    world.insert_resource(GameStage::Won);
    world.insert_resource(Session { score: 2500, lives: 2 });
    common::spawn_player(&mut world, IVec2::new(100, 125), Direction::Left, 4);

    common::send_command(&mut world, GameCommand::Confirm);
    run_commands(&mut world);

    let level = *world.resource::<CurrentLevel>();
    assert_that(&level.index).is_equal_to(1);
    assert_that(&level.color).is_equal_to(LevelColor::new(222, 33, 33));
    assert_that(&world.resource::<TileGrid>().dots_left()).is_equal_to(262);
    assert_that(world.resource::<Session>()).is_equal_to(&Session { score: 2500, lives: 2 });
    assert_eq!(common::drain_audio(&mut world), vec![AudioEvent::Intermission]);
}

#[test]
fn test_levels_loop_after_the_last() {
    let mut world = common::create_test_world(common::box_grid());
    world.insert_resource(GameStage::Won);
    world.resource_mut::<CurrentLevel>().index = 1;
    common::spawn_player(&mut world, IVec2::new(100, 125), Direction::Left, 4);

    common::send_command(&mut world, GameCommand::Confirm);
    run_commands(&mut world);

    assert_that(&world.resource::<CurrentLevel>().index).is_equal_to(0);
    assert_that(&world.resource::<TileGrid>().dots_left()).is_equal_to(244);
}
