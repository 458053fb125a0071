//! Text command grammar
//!
//! A line is split into words with nom, then the first word picks the
//! command and the rest are its arguments. Matching is case-insensitive.

use nom::bytes::complete::take_while1;
use nom::character::complete::{space0, space1};
use nom::combinator::all_consuming;
use nom::multi::separated_list0;
use nom::sequence::delimited;
use nom::{IResult, Parser};

use crate::core::error::{CatLifeError, Result};
use crate::house::rooms::RoomId;
use crate::simulation::actions::CleanTarget;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Feed(Option<String>),
    Play(Option<String>),
    Clean(CleanTarget),
    CleanBox(usize),
    CleanMess(u32),
    Fill,
    Move { cat: Option<String>, room: RoomId },
    Select(String),
    Door,
    Out(Option<String>),
    In(Option<String>),
    Sleep(Option<String>),
    Separate(String, String),
    Skip,
    Pause,
    Resume,
    Speed(u32),
    Status,
    Help,
    NewDay,
    Save,
    Load,
    Scores,
    Quit,
}

pub const HELP_TEXT: &str = "\
Commands:
  feed [cat]            feed a cat (once per feeding round)
  play [cat]            play with a cat
  clean [room|all]      clean up messes
  clean box <n>         scoop litter box n
  fill                  fill the food bowl
  move [cat] <room>     carry a cat to another room
  select <cat>          remember a cat for commands without a name
  door                  open or close the front door
  out [cat] / in [cat]  let a cat out or call it back in
  sleep [cat]           tuck a content cat in (evening only)
  separate <cat> <cat>  break up a fight
  skip                  let the current phase pass
  pause / resume        stop or restart the clock
  speed <1-4>           clock speed
  status                show the household
  newday                start the next day after night
  save / load           save or restore the game
  scores                show the high score table
  quit                  leave the game";

fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-' || c == '\'').parse(input)
}

/// Split a line into words; anything but letters, digits, `_`, `-` and `'` between words is rejected
fn words(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(delimited(space0, separated_list0(space1, word), space0)).parse(input)
}

fn usage(text: &str) -> CatLifeError {
    CatLifeError::InvalidAction(format!("Usage: {text}"))
}

fn optional_cat(args: &[String]) -> Option<String> {
    if args.is_empty() {
        None
    } else {
        Some(args.join(" "))
    }
}

fn number<T: std::str::FromStr>(arg: Option<&String>, usage_text: &str) -> Result<T> {
    arg.and_then(|a| a.parse().ok()).ok_or_else(|| usage(usage_text))
}

/// Parse one input line into a command
pub fn parse_command(line: &str) -> Result<Command> {
    let (_, tokens) = words(line).map_err(|_| CatLifeError::UnknownCommand(line.trim().to_string()))?;
    let mut tokens: Vec<String> = tokens.into_iter().map(str::to_lowercase).collect();
    if tokens.is_empty() {
        return Err(CatLifeError::UnknownCommand(String::new()));
    }
    let verb = tokens.remove(0);
    let args = tokens;

    let command = match verb.as_str() {
        "feed" => Command::Feed(optional_cat(&args)),
        "play" => Command::Play(optional_cat(&args)),
        "clean" => parse_clean(&args)?,
        "fill" | "fillbowl" => Command::Fill,
        "move" => parse_move(&args)?,
        "select" => Command::Select(optional_cat(&args).ok_or_else(|| usage("select <cat>"))?),
        "door" => Command::Door,
        "out" | "outside" => Command::Out(optional_cat(&args)),
        "in" | "letin" => Command::In(optional_cat(&args)),
        "let" if args.first().map(String::as_str) == Some("in") => Command::In(optional_cat(&args[1..])),
        "sleep" => Command::Sleep(optional_cat(&args)),
        "separate" => match args.as_slice() {
            [a, b] => Command::Separate(a.clone(), b.clone()),
            _ => return Err(usage("separate <cat> <cat>")),
        },
        "skip" => Command::Skip,
        "pause" => Command::Pause,
        "resume" => Command::Resume,
        "speed" => Command::Speed(number(args.first(), "speed <1-4>")?),
        "status" | "look" => Command::Status,
        "help" => Command::Help,
        "newday" => Command::NewDay,
        "new" if args.first().map(String::as_str) == Some("day") => Command::NewDay,
        "save" => Command::Save,
        "load" => Command::Load,
        "scores" | "highscores" => Command::Scores,
        "quit" | "exit" => Command::Quit,
        _ => return Err(CatLifeError::UnknownCommand(verb)),
    };
    Ok(command)
}

fn parse_clean(args: &[String]) -> Result<Command> {
    match args.first().map(String::as_str) {
        None | Some("all") => Ok(Command::Clean(CleanTarget::All)),
        Some("box") | Some("litter") => {
            let n: usize = number(args.get(1), "clean box <n>")?;
            if n == 0 {
                return Err(usage("clean box <n> (boxes are numbered from 1)"));
            }
            Ok(Command::CleanBox(n - 1))
        }
        Some("mess") => Ok(Command::CleanMess(number(args.get(1), "clean mess <id>")?)),
        Some(_) => Ok(Command::Clean(CleanTarget::Room(args.join(" ").parse()?))),
    }
}

/// `move <cat> <room>`, or `move <room>` for the selected cat. Room names may be two words.
fn parse_move(args: &[String]) -> Result<Command> {
    if args.is_empty() {
        return Err(usage("move <cat> <room>"));
    }
    if let Ok(room) = args.join(" ").parse::<RoomId>() {
        return Ok(Command::Move { cat: None, room });
    }
    if args.len() < 2 {
        return Err(CatLifeError::UnknownRoom(args[0].clone()));
    }
    let room = args[1..].join(" ").parse::<RoomId>()?;
    Ok(Command::Move {
        cat: Some(args[0].clone()),
        room,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_verbs() {
        assert_eq!(parse_command("fill").unwrap(), Command::Fill);
        assert_eq!(parse_command("  SKIP  ").unwrap(), Command::Skip);
        assert_eq!(parse_command("new day").unwrap(), Command::NewDay);
        assert_eq!(parse_command("speed 3").unwrap(), Command::Speed(3));
    }

    #[test]
    fn test_parse_cat_arguments() {
        assert_eq!(parse_command("feed Mochi").unwrap(), Command::Feed(Some("mochi".into())));
        assert_eq!(parse_command("feed").unwrap(), Command::Feed(None));
        assert_eq!(parse_command("let in boots").unwrap(), Command::In(Some("boots".into())));
        assert_eq!(
            parse_command("separate oscar mochi").unwrap(),
            Command::Separate("oscar".into(), "mochi".into())
        );
    }

    #[test]
    fn test_parse_move() {
        assert_eq!(
            parse_command("move pip living room").unwrap(),
            Command::Move {
                cat: Some("pip".into()),
                room: RoomId::LivingRoom
            }
        );
        assert_eq!(
            parse_command("move kitchen").unwrap(),
            Command::Move {
                cat: None,
                room: RoomId::Kitchen
            }
        );
        assert!(matches!(parse_command("move pip attic"), Err(CatLifeError::UnknownRoom(_))));
    }

    #[test]
    fn test_parse_clean_forms() {
        assert_eq!(parse_command("clean").unwrap(), Command::Clean(CleanTarget::All));
        assert_eq!(
            parse_command("clean bathroom").unwrap(),
            Command::Clean(CleanTarget::Room(RoomId::Bathroom))
        );
        assert_eq!(parse_command("clean box 2").unwrap(), Command::CleanBox(1));
        assert!(parse_command("clean box 0").is_err());
        assert_eq!(parse_command("clean mess 7").unwrap(), Command::CleanMess(7));
    }

    #[test]
    fn test_rejects_unknown_and_malformed() {
        assert!(matches!(parse_command("dance"), Err(CatLifeError::UnknownCommand(_))));
        assert!(matches!(parse_command("feed pip!"), Err(CatLifeError::UnknownCommand(_))));
        assert!(parse_command("").is_err());
        assert!(parse_command("speed fast").is_err());
        assert!(parse_command("separate oscar").is_err());
    }
}
