//! Integration tests for Cat Life
//!
//! These tests drive a whole session through its public operations:
//! - Feeding rules within a phase
//! - Sending cats outside and calling them back
//! - Autonomous eating at the food bowl
//! - The night search for cats left outside
//! - Full days driven by the scheduler and by text commands

use cat_life::core::config::{Difficulty, GameMode, SimulationConfig};
use cat_life::core::error::CatLifeError;
use cat_life::core::random::{seeded, ScriptedRandom};
use cat_life::core::types::Location;
use cat_life::core::Phase;
use cat_life::house::RoomId;
use cat_life::persistence::MemoryStore;
use cat_life::simulation::{Game, GameSession, NullObserver, Scheduler, SessionSettings};

fn session_with(mode: GameMode) -> GameSession {
    let settings = SessionSettings {
        player_name: "tester".into(),
        difficulty: Difficulty::Normal,
        mode,
    };
    let mut rng = ScriptedRandom::constant(0.5);
    GameSession::new(settings, SimulationConfig::default(), &mut rng)
}

fn session() -> GameSession {
    session_with(GameMode::Endless)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_feeding_twice_in_one_morning_is_rejected() {
    let mut s = session();
    let mut rng = ScriptedRandom::constant(0.9);

    s.feed(Some("pip"), &mut rng).unwrap();
    assert_eq!(s.phase(), Phase::Morning);

    let pip = s.find_cat("pip").unwrap();
    let before_cat = s.cats[pip].needs.clone();
    let (energy, score) = (s.energy, s.score);

    let err = s.feed(Some("pip"), &mut rng).unwrap_err();
    assert!(matches!(err, CatLifeError::AlreadyFed(_)));
    assert!(err.to_string().contains("already"));
    assert_eq!(s.cats[pip].needs, before_cat);
    assert_eq!(s.energy, energy);
    assert_eq!(s.score, score);
}

#[test]
fn test_cat_let_back_in_lands_in_entry_room() {
    let mut s = session();
    // 0.9 never rolls the wont-come-back flag
    let mut rng = ScriptedRandom::constant(0.9);

    s.toggle_door(&mut rng).unwrap();
    s.send_outside(Some("mochi"), &mut rng).unwrap();
    let mochi = s.find_cat("mochi").unwrap();
    assert_eq!(s.cats[mochi].location, Location::Outside);
    assert!(!s.cats[mochi].wont_come_back);

    let score = s.score;
    s.let_in(Some("mochi"), &mut rng).unwrap();
    assert_eq!(s.cats[mochi].location, Location::Room(RoomId::ENTRY));
    assert_eq!(s.score, score + s.config.let_in_score);
    assert!(s.check_membership().is_ok());
}

#[test]
fn test_hungry_cat_finds_filled_bowl() {
    let mut s = session();
    let mut rng = ScriptedRandom::constant(0.9);

    // Only Boots is awake, the rest stay put
    for cat in &mut s.cats {
        cat.asleep = true;
        cat.movement.fall_asleep();
    }
    let boots = s.find_cat("boots").unwrap();
    s.cats[boots].asleep = false;
    s.cats[boots].movement.wake();
    s.cats[boots].needs.hunger = s.config.hunger_seek_threshold + 20;

    s.house.bowl.current = 0;
    s.fill_bowl(&mut rng).unwrap();
    let filled = s.house.bowl.current;
    assert_eq!(filled, s.house.bowl.capacity);

    let dt = s.config.frame_ms;
    for _ in 0..1000 {
        s.run_frame(dt, &mut rng);
        if s.cats[boots].fed {
            break;
        }
    }
    assert!(s.cats[boots].fed);
    assert_eq!(s.house.bowl.current, filled - 1);
    assert_eq!(s.cats[boots].location, Location::Room(RoomId::Kitchen));
}

#[test]
fn test_cat_fed_while_walking_to_bowl_leaves_it_alone() {
    let mut s = session();
    let mut rng = ScriptedRandom::constant(0.9);

    for cat in &mut s.cats {
        cat.asleep = true;
        cat.movement.fall_asleep();
    }
    let boots = s.find_cat("boots").unwrap();
    s.cats[boots].asleep = false;
    s.cats[boots].movement.wake();
    s.cats[boots].needs.hunger = 90;
    s.house.bowl.current = 0;
    s.fill_bowl(&mut rng).unwrap();

    // Boots sets off for the kitchen, then gets fed by hand halfway there
    let dt = s.config.frame_ms;
    s.run_frame(dt, &mut rng);
    assert!(s.cats[boots].movement.is_travelling());
    s.feed(Some("boots"), &mut rng).unwrap();

    for _ in 0..1000 {
        s.run_frame(dt, &mut rng);
    }
    assert_eq!(s.house.bowl.current, s.house.bowl.capacity);
    assert_eq!(s.stats.meals, 0);
    assert_eq!(s.cats[boots].location, Location::Room(RoomId::Kitchen));
}

#[test]
fn test_night_search_never_leaves_cat_outside() {
    for seed in 0..40 {
        let mut s = session();
        let mut rng = seeded(seed);
        s.toggle_door(&mut rng).unwrap();
        s.send_outside(Some("boots"), &mut rng).unwrap();
        let boots = s.find_cat("boots").unwrap();

        for _ in 0..3 {
            s.advance_phase(&mut rng);
        }
        assert_eq!(s.phase(), Phase::Night);
        let location = s.cats[boots].location;
        assert!(
            location == Location::Room(RoomId::ENTRY) || location == Location::Missing,
            "seed {seed}: boots ended at {location}"
        );
        assert!(s.cats.iter().all(|c| !c.is_outside()));
        assert!(s.check_membership().is_ok());
    }
}

// ============================================================================
// Whole days
// ============================================================================

#[test]
fn test_scheduler_runs_a_day_to_night() {
    let config = SimulationConfig {
        phase_interval_ms: 3_000,
        decay_interval_ms: 500,
        ..SimulationConfig::default()
    };
    let settings = SessionSettings {
        mode: GameMode::Endless,
        ..SessionSettings::default()
    };
    let mut rng = seeded(11);
    let mut s = GameSession::new(settings, config, &mut rng);
    let mut scheduler = Scheduler::new();

    let mut phases = vec![s.phase()];
    for _ in 0..400 {
        scheduler.run(50, &mut s, &mut rng);
        if *phases.last().unwrap() != s.phase() {
            phases.push(s.phase());
        }
        assert!(s.check_membership().is_ok());
        if s.clock.is_day_over() {
            break;
        }
    }
    assert_eq!(phases, vec![Phase::Morning, Phase::Afternoon, Phase::Evening, Phase::Night]);
    assert!(s.last_summary.is_some());

    // Night halts every driver until the player starts the next day
    let decay_ticks = s.decay_ticks;
    assert_eq!(scheduler.run(10_000, &mut s, &mut rng), 0);
    assert_eq!(s.decay_ticks, decay_ticks);

    s.new_day(&mut rng).unwrap();
    assert_eq!(s.day(), 2);
    assert_eq!(s.phase(), Phase::Morning);
    assert!(s.check_membership().is_ok());
}

#[test]
fn test_new_day_refused_before_night() {
    let mut s = session();
    let mut rng = ScriptedRandom::constant(0.5);
    assert!(s.new_day(&mut rng).is_err());
    assert_eq!(s.day(), 1);
}

#[test]
fn test_energy_depletion_ends_game_once() {
    let mut s = session_with(GameMode::Challenge);
    let mut rng = ScriptedRandom::constant(0.9);
    s.energy = s.config.feed_cost;

    s.feed(Some("pip"), &mut rng).unwrap();
    assert_eq!(s.energy, 0);
    assert!(s.is_game_over());

    let outcome = s.outcome;
    assert!(matches!(s.feed(Some("mochi"), &mut rng), Err(CatLifeError::GameOver)));
    assert_eq!(s.outcome, outcome);
}

#[test]
fn test_text_commands_play_through_a_morning() {
    let mut game = Game::new(
        SessionSettings::default(),
        SimulationConfig::default(),
        3,
        Box::new(NullObserver),
        Box::new(MemoryStore::new()),
    );
    for line in ["fill", "feed pip", "feed mochi", "play oscar", "clean all", "move boots kitchen"] {
        game.execute(line);
    }
    let s = game.session();
    assert!(s.cats[s.find_cat("pip").unwrap()].fed);
    assert_eq!(s.cats[s.find_cat("boots").unwrap()].location, Location::Room(RoomId::Kitchen));
    assert!(s.stats.feeds >= 1);
    assert!(s.check_membership().is_ok());

    game.execute("quit");
    assert!(game.is_finished());
}

#[test]
fn test_friends_share_a_room_without_fighting() {
    let mut s = session();
    let mut rng = seeded(5);
    // Pip and Scampi like everyone; park them together with nobody else
    for cat in &mut s.cats {
        cat.asleep = true;
        cat.movement.fall_asleep();
    }
    for name in ["pip", "scampi"] {
        let idx = s.find_cat(name).unwrap();
        s.cats[idx].asleep = false;
        s.cats[idx].movement.wake();
    }
    s.move_cat(Some("pip"), RoomId::Kitchen, &mut rng).unwrap();
    s.move_cat(Some("scampi"), RoomId::Kitchen, &mut rng).unwrap();

    let dt = s.config.frame_ms;
    for _ in 0..2_000 {
        s.run_frame(dt, &mut rng);
        assert!(s.fights.is_empty());
    }
}
