//! The single owner of a running game
//!
//! `Game` holds the session, the random source, the scheduler, the
//! observer and the store. Every input (a text line, a UI call, elapsed
//! time) is applied to the session in full before the next one starts,
//! then queued narration is flushed and the observer renders once.

use rand_chacha::ChaCha8Rng;

use crate::command::{parse_command, CommandExecutor, Flow};
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::random::{seeded, RandomSource};
use crate::core::types::Millis;
use crate::persistence::{
    clear_snapshot, load_high_scores, load_snapshot, record_high_score, render_high_scores, save_snapshot,
    KeyValueStore,
};
use crate::simulation::events::{LogCategory, SessionObserver};
use crate::simulation::scheduler::Scheduler;
use crate::simulation::session::{GameSession, SessionSettings};

pub struct Game {
    session: GameSession,
    rng: ChaCha8Rng,
    scheduler: Scheduler,
    observer: Box<dyn SessionObserver>,
    store: Box<dyn KeyValueStore>,
    high_score_recorded: bool,
    /// Day the scheduler's timers belong to
    scheduled_day: u32,
    quit: bool,
}

impl Game {
    pub fn new(
        settings: SessionSettings,
        config: SimulationConfig,
        seed: u64,
        observer: Box<dyn SessionObserver>,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let mut rng = seeded(seed);
        let session = GameSession::new(settings, config, &mut rng);
        let mut game = Self {
            scheduled_day: session.day(),
            session,
            rng,
            scheduler: Scheduler::new(),
            observer,
            store,
            high_score_recorded: false,
            quit: false,
        };
        game.flush();
        game
    }

    /// Continue the saved game if there is a usable one, otherwise start fresh
    pub fn resume_or_new(
        settings: SessionSettings,
        config: SimulationConfig,
        seed: u64,
        observer: Box<dyn SessionObserver>,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let mut game = Self::new(settings, config, seed, observer, store);
        game.load();
        game
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn is_finished(&self) -> bool {
        self.quit
    }

    /// Handle one line of player input
    pub fn execute(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        self.session.log(format!("> {line}"), LogCategory::Player);

        let result = parse_command(line)
            .and_then(|command| CommandExecutor::execute(&mut self.session, command, &mut self.rng));
        match result {
            Ok(Flow::Continue) => {}
            Ok(Flow::Save) => self.save(),
            Ok(Flow::Load) => self.load(),
            Ok(Flow::ShowScores) => self.show_scores(),
            Ok(Flow::Quit) => {
                self.quit = true;
                self.session.log("Goodbye!", LogCategory::Game);
            }
            Err(e) => self.session.log(e.to_string(), LogCategory::Warning),
        }
        self.after_operation();
    }

    /// Run a UI-originated operation through the same path as text commands
    pub fn act<F>(&mut self, operation: F)
    where
        F: FnOnce(&mut GameSession, &mut dyn RandomSource) -> Result<()>,
    {
        if let Err(e) = operation(&mut self.session, &mut self.rng) {
            self.session.log(e.to_string(), LogCategory::Warning);
        }
        self.after_operation();
    }

    /// Let `wall_dt_ms` of real time pass
    pub fn tick(&mut self, wall_dt_ms: Millis) {
        let fired = self.scheduler.run(wall_dt_ms, &mut self.session, &mut self.rng);
        if fired > 0 {
            self.after_operation();
        }
    }

    pub fn save(&mut self) {
        match save_snapshot(self.store.as_mut(), &self.session) {
            Ok(()) => self.session.log("Game saved.", LogCategory::Game),
            Err(e) => {
                tracing::warn!(error = %e, "save failed");
                self.session.log(format!("Could not save the game: {e}"), LogCategory::Warning);
            }
        }
    }

    pub fn load(&mut self) {
        match load_snapshot(self.store.as_ref()) {
            Ok(Some(session)) => {
                self.session = session;
                self.scheduler.reset();
                self.scheduled_day = self.session.day();
                self.high_score_recorded = self.session.is_game_over();
                let text = format!("Welcome back! Day {}, {}.", self.session.day(), self.session.phase());
                self.session.log(text, LogCategory::Game);
            }
            Ok(None) => self.session.log("No saved game found.", LogCategory::Game),
            Err(e) => {
                tracing::warn!(error = %e, "load failed");
                self.session.log(format!("Could not load the game: {e}"), LogCategory::Warning);
            }
        }
    }

    fn show_scores(&mut self) {
        match load_high_scores(self.store.as_ref()) {
            Ok(entries) => self.session.log(render_high_scores(&entries), LogCategory::Game),
            Err(e) => self.session.log(format!("Could not read high scores: {e}"), LogCategory::Warning),
        }
    }

    fn after_operation(&mut self) {
        if self.session.day() != self.scheduled_day {
            self.scheduled_day = self.session.day();
            self.scheduler.reset();
        }
        if self.session.is_game_over() && !self.high_score_recorded {
            self.high_score_recorded = true;
            self.record_high_score();
            // A finished game cannot be continued
            if let Err(e) = clear_snapshot(self.store.as_mut()) {
                tracing::warn!(error = %e, "could not clear saved game");
            }
        }
        self.flush();
    }

    fn record_high_score(&mut self) {
        let settings = &self.session.settings;
        let result = record_high_score(
            self.store.as_mut(),
            &settings.player_name,
            self.session.score,
            settings.difficulty,
        );
        match result {
            Ok(Some(rank)) => self
                .session
                .log(format!("New high score! You placed #{rank}."), LogCategory::Summary),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "could not record high score"),
        }
    }

    /// Hand queued narration to the observer, then render once
    fn flush(&mut self) {
        for message in self.session.drain_messages() {
            self.observer.log(&message);
        }
        self.observer.render(&self.session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::simulation::events::{GameMessage, NullObserver};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Observer that shares its log with the test
    #[derive(Default, Clone)]
    struct SharedLog(Rc<RefCell<Vec<GameMessage>>>, Rc<RefCell<usize>>);

    impl SessionObserver for SharedLog {
        fn render(&mut self, _session: &GameSession) {
            *self.1.borrow_mut() += 1;
        }

        fn log(&mut self, message: &GameMessage) {
            self.0.borrow_mut().push(message.clone());
        }
    }

    fn game(observer: Box<dyn SessionObserver>) -> Game {
        Game::new(
            SessionSettings::default(),
            SimulationConfig::default(),
            7,
            observer,
            Box::new(MemoryStore::new()),
        )
    }

    #[test]
    fn test_errors_become_warnings() {
        let log = SharedLog::default();
        let mut g = game(Box::new(log.clone()));
        g.execute("dance wildly");
        g.execute("feed garfield");
        let warnings = log.0.borrow().iter().filter(|m| m.category == LogCategory::Warning).count();
        assert_eq!(warnings, 2);
    }

    #[test]
    fn test_render_after_every_operation() {
        let log = SharedLog::default();
        let mut g = game(Box::new(log.clone()));
        let before = *log.1.borrow();
        g.execute("fill");
        g.act(|s, rng| s.feed(Some("pip"), rng));
        assert_eq!(*log.1.borrow(), before + 2);
        assert!(log.0.borrow().iter().any(|m| m.text == "> fill"));
    }

    #[test]
    fn test_save_and_load_through_commands() {
        let mut g = game(Box::new(NullObserver));
        g.execute("feed pip");
        let score = g.session().score;
        g.execute("save");
        g.execute("play mochi");
        assert_ne!(g.session().score, score);
        g.execute("load");
        assert_eq!(g.session().score, score);
    }

    #[test]
    fn test_high_score_recorded_once_on_game_over() {
        let mut g = game(Box::new(NullObserver));
        g.act(|s, _| {
            s.energy = 5;
            Ok(())
        });
        g.execute("feed pip");
        assert!(g.session().is_game_over());
        g.execute("feed mochi");
        let table = load_high_scores(g.store.as_ref()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_game_over_discards_saved_game() {
        let mut g = game(Box::new(NullObserver));
        g.execute("save");
        assert!(load_snapshot(g.store.as_ref()).unwrap().is_some());

        g.act(|s, _| {
            s.energy = 5;
            Ok(())
        });
        g.execute("feed pip");
        assert!(g.session().is_game_over());
        assert!(load_snapshot(g.store.as_ref()).unwrap().is_none());

        g.execute("load");
        assert!(g.session().is_game_over());
    }

    #[test]
    fn test_quit() {
        let mut g = game(Box::new(NullObserver));
        assert!(!g.is_finished());
        g.execute("quit");
        assert!(g.is_finished());
    }
}
