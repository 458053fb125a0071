//! Command execution - routes parsed commands to session operations

use crate::command::parser::{Command, HELP_TEXT};
use crate::core::error::Result;
use crate::core::random::RandomSource;
use crate::simulation::events::LogCategory;
use crate::simulation::session::GameSession;

/// What the driver has to do after a command ran against the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Save,
    Load,
    ShowScores,
    Quit,
}

/// Executes commands against a session
pub struct CommandExecutor;

impl CommandExecutor {
    /// Run one command. Errors leave the session untouched.
    pub fn execute(session: &mut GameSession, command: Command, rng: &mut dyn RandomSource) -> Result<Flow> {
        match command {
            Command::Feed(cat) => session.feed(cat.as_deref(), rng)?,
            Command::Play(cat) => session.play(cat.as_deref(), rng)?,
            Command::Clean(target) => session.clean(target, rng)?,
            Command::CleanBox(id) => session.clean_box(id, rng)?,
            Command::CleanMess(id) => session.clean_mess(id, rng)?,
            Command::Fill => session.fill_bowl(rng)?,
            Command::Move { cat, room } => session.move_cat(cat.as_deref(), room, rng)?,
            Command::Select(cat) => session.select(&cat)?,
            Command::Door => session.toggle_door(rng)?,
            Command::Out(cat) => session.send_outside(cat.as_deref(), rng)?,
            Command::In(cat) => session.let_in(cat.as_deref(), rng)?,
            Command::Sleep(cat) => session.put_to_sleep(cat.as_deref(), rng)?,
            Command::Separate(a, b) => session.separate(&a, &b, rng)?,
            Command::Skip => session.skip(rng)?,
            Command::Pause => session.pause()?,
            Command::Resume => session.resume()?,
            Command::Speed(speed) => session.set_speed(speed)?,
            Command::NewDay => session.new_day(rng)?,
            Command::Status => {
                let report = session.status_report();
                session.log(report, LogCategory::Game);
            }
            Command::Help => session.log(HELP_TEXT, LogCategory::Game),
            Command::Save => return Ok(Flow::Save),
            Command::Load => return Ok(Flow::Load),
            Command::Scores => return Ok(Flow::ShowScores),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}
