// Application state and command dispatch.
//
// Parses one prompt line into a `Command`, runs it against the draft, and
// renders the result as text for the shell to print.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::draft::pick::Position;
use crate::draft::state::{DraftError, DraftState, BOARD_SIZE, PLACEHOLDER_RANK};
use crate::snapshot::{self, Snapshot};
use crate::valuation::rank::RankSource;

/// Most search hits printed by `find`.
pub const MAX_FIND_RESULTS: usize = 50;

pub const HELP: &str = "\
Commands:
  suggest                      Show SAFE & RISKY recommendation + top-25 board + YOUR roster needs
  board                        Show top-25 board
  board_full                   Show full draft board (all teams & picks)
  teams                        Show all team rosters
  needs                        Show roster needs for every team
  find \"text\"                  Search available players by substring
  me \"Player Name\"             Record YOUR pick
  other \"Player Name\"          Record someone else's pick
  add \"Name\" POS TEAM [rank]   Add a player (if missing), default rank=1500
  setrank [espn|fp|ds|consensus] \"Name\" N   Update rank live
  tag \"Name\" tag1,tag2         Update risk tags (comma-separated)
  undo                         Undo last pick
  save                         Save the draft snapshot
  help                         Show commands
  quit                         Exit";

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// A parsed prompt command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Suggest,
    Board,
    BoardFull,
    Teams,
    Needs,
    Find(String),
    Me(String),
    Other(String),
    Add {
        name: String,
        position: Position,
        team: String,
        rank: f64,
    },
    SetRank {
        source: RankSource,
        name: String,
        value: f64,
    },
    Tag {
        name: String,
        tags: String,
    },
    Undo,
    Save,
    Help,
    Quit,
}

/// Why a prompt line could not be turned into a `Command`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown command. Type 'help' for commands.")]
    Unknown,
}

const USAGE_FIND: &str = "find \"text\"";
const USAGE_ME: &str = "me \"Player Name\"";
const USAGE_OTHER: &str = "other \"Player Name\"";
const USAGE_ADD: &str = "add \"Name\" POS TEAM [rank]";
const USAGE_SETRANK: &str = "setrank [espn|fp|ds|consensus] \"Name\" N";
const USAGE_TAG: &str = "tag \"Name\" tag1,tag2";

/// Split off the next token: a double-quoted string or a bare word. Returns
/// the token and the unconsumed remainder. An unclosed quote yields `None`.
fn next_token(s: &str) -> Option<(String, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    if let Some(body) = s.strip_prefix('"') {
        let end = body.find('"')?;
        Some((body[..end].to_string(), &body[end + 1..]))
    } else {
        let end = s.find(char::is_whitespace).unwrap_or(s.len());
        Some((s[..end].to_string(), &s[end..]))
    }
}

/// A free-text name argument: the whole remainder with surrounding quotes
/// removed.
fn name_arg(rest: &str, usage: &'static str) -> Result<String, CommandError> {
    let name = rest.trim().trim_matches('"').trim();
    if name.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(name.to_string())
    }
}

fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

fn parse_add(rest: &str) -> Result<Command, CommandError> {
    let usage = CommandError::Usage(USAGE_ADD);
    let (name, rest) = next_token(rest).ok_or_else(|| usage.clone())?;
    let (pos, rest) = next_token(rest).ok_or_else(|| usage.clone())?;
    let (team, rest) = next_token(rest).ok_or_else(|| usage.clone())?;
    let position = Position::from_str_pos(&pos).ok_or_else(|| usage.clone())?;
    let rank = match next_token(rest) {
        Some((tok, tail)) if tail.trim().is_empty() => parse_number(&tok).ok_or_else(|| usage.clone())?,
        Some(_) => return Err(usage),
        None => PLACEHOLDER_RANK,
    };
    if name.trim().is_empty() {
        return Err(usage);
    }
    Ok(Command::Add {
        name: name.trim().to_string(),
        position,
        team: team.to_uppercase(),
        rank,
    })
}

fn parse_setrank(rest: &str) -> Result<Command, CommandError> {
    let usage = CommandError::Usage(USAGE_SETRANK);
    let (src, rest) = next_token(rest).ok_or_else(|| usage.clone())?;
    let source = RankSource::from_str_source(&src).ok_or_else(|| usage.clone())?;
    let (name, rest) = next_token(rest).ok_or_else(|| usage.clone())?;
    let (value, tail) = next_token(rest).ok_or_else(|| usage.clone())?;
    if name.trim().is_empty() || !tail.trim().is_empty() {
        return Err(usage);
    }
    let value = parse_number(&value).ok_or(usage)?;
    Ok(Command::SetRank {
        source,
        name: name.trim().to_string(),
        value,
    })
}

/// The name must be quoted: everything after it is the tag string.
fn parse_tag(rest: &str) -> Result<Command, CommandError> {
    let usage = CommandError::Usage(USAGE_TAG);
    if !rest.trim_start().starts_with('"') {
        return Err(usage);
    }
    let (name, tags) = next_token(rest).ok_or_else(|| usage.clone())?;
    let tags = tags.trim();
    if name.trim().is_empty() || tags.is_empty() {
        return Err(usage);
    }
    Ok(Command::Tag {
        name: name.trim().to_string(),
        tags: tags.to_string(),
    })
}

/// Parse one prompt line. Blank lines yield `Ok(None)`. Keywords are
/// case-insensitive; arguments keep their case.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (keyword, rest) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line, ""));

    let cmd = match (keyword.to_lowercase().as_str(), rest.trim().is_empty()) {
        ("suggest", true) => Command::Suggest,
        ("board", true) => Command::Board,
        ("board_full", true) => Command::BoardFull,
        ("teams", true) => Command::Teams,
        ("needs", true) => Command::Needs,
        ("undo", true) => Command::Undo,
        ("save", true) => Command::Save,
        ("help", true) => Command::Help,
        ("quit" | "exit", true) => Command::Quit,
        ("find", _) => Command::Find(name_arg(rest, USAGE_FIND)?),
        ("me", _) => Command::Me(name_arg(rest, USAGE_ME)?),
        ("other", _) => Command::Other(name_arg(rest, USAGE_OTHER)?),
        ("add", _) => parse_add(rest)?,
        ("setrank", _) => parse_setrank(rest)?,
        ("tag", _) => parse_tag(rest)?,
        _ => return Err(CommandError::Unknown),
    };
    Ok(Some(cmd))
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// What the shell should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Print the text (if any) and read the next line.
    Continue(String),
    Quit,
}

/// The running session: the draft plus where to save it.
pub struct AppState {
    pub draft: DraftState,
    pub snapshot_path: PathBuf,
}

impl AppState {
    pub fn new(draft: DraftState, snapshot_path: PathBuf) -> Self {
        AppState {
            draft,
            snapshot_path,
        }
    }

    /// Parse and run a prompt line.
    pub fn handle_line(&mut self, line: &str) -> CommandOutcome {
        match parse_command(line) {
            Ok(Some(cmd)) => self.execute(cmd),
            Ok(None) => CommandOutcome::Continue(String::new()),
            Err(e) => {
                debug!("Rejected input {:?}: {}", line, e);
                CommandOutcome::Continue(e.to_string())
            }
        }
    }

    /// Run a parsed command and render its result.
    pub fn execute(&mut self, cmd: Command) -> CommandOutcome {
        let text = match cmd {
            Command::Quit => return CommandOutcome::Quit,
            Command::Help => HELP.to_string(),
            Command::Suggest => self.draft.suggest(),
            Command::Board => self.draft.show_board(BOARD_SIZE),
            Command::BoardFull => self.draft.board_full(),
            Command::Teams => self.draft.show_teams(),
            Command::Needs => self.draft.all_needs_report(),
            Command::Find(query) => self.find(&query),
            Command::Me(name) => {
                let slot = self.draft.my_slot;
                render(self.draft.record_pick(slot, &name))
            }
            Command::Other(name) => self.record_other(&name),
            Command::Add {
                name,
                position,
                team,
                rank,
            } => {
                if self.draft.add_player(&name, position, &team, rank) {
                    format!("Added {name} ({position}, {team}) with rank {rank}.")
                } else {
                    format!("{name} is already in the player pool.")
                }
            }
            Command::SetRank {
                source,
                name,
                value,
            } => match self.draft.set_rank(source, &name, value) {
                Ok(p) => format!("Set {source} rank for {} to {value}.", p.name),
                Err(e) => e.to_string(),
            },
            Command::Tag { name, tags } => match self.draft.set_tags(&name, &tags) {
                Ok(p) => format!("Updated RiskTag for {} -> {}", p.name, p.tags),
                Err(e) => e.to_string(),
            },
            Command::Undo => match self.draft.undo() {
                Ok(last) => format!("Undid pick #{} ({})", last.global_pick, last.player),
                Err(e) => e.to_string(),
            },
            Command::Save => self.save(),
        };
        CommandOutcome::Continue(text)
    }

    fn find(&self, query: &str) -> String {
        let hits = self.draft.search(query);
        if hits.is_empty() {
            return "No matches.".to_string();
        }
        hits.iter()
            .take(MAX_FIND_RESULTS)
            .enumerate()
            .map(|(i, p)| format!("{:>2}. {}", i + 1, p.display_line()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn record_other(&mut self, name: &str) -> String {
        if self.draft.is_complete() {
            return DraftError::DraftComplete.to_string();
        }
        match self.draft.next_other_team() {
            Some(team) => render(self.draft.record_pick(team, name)),
            None => "No other team has a pick left.".to_string(),
        }
    }

    fn save(&self) -> String {
        let snap = Snapshot::from_state(&self.draft);
        match snapshot::save(&snap, &self.snapshot_path) {
            Ok(()) => format!("Saved -> {}", self.snapshot_path.display()),
            Err(e) => {
                warn!("Snapshot save failed: {:#}", e);
                format!("Save failed: {e:#}")
            }
        }
    }
}

fn render<T: ToString>(result: Result<T, DraftError>) -> String {
    match result {
        Ok(v) => v.to_string(),
        Err(e) => e.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::player::Player;
    use crate::draft::roster::RosterSlotConfig;
    use crate::valuation::rank::SourceRanks;

    fn app(my_slot: usize) -> AppState {
        let ranked = |name: &str, team: &str, pos: Position, rank: f64| {
            Player::new(
                name,
                team,
                pos,
                SourceRanks {
                    espn: Some(rank),
                    ..Default::default()
                },
            )
        };
        let players = vec![
            ranked("Christian McCaffrey", "SF", Position::RB, 1.0),
            ranked("Tyreek Hill", "MIA", Position::WR, 2.0),
            ranked("Travis Kelce", "KC", Position::TE, 3.0),
            ranked("Travis Etienne", "JAX", Position::RB, 4.0),
        ];
        let draft = DraftState::new(3, my_slot, 2, players, RosterSlotConfig::standard()).unwrap();
        let path = std::env::temp_dir().join("app_test_unused_snapshot.json");
        AppState::new(draft, path)
    }

    fn text(outcome: CommandOutcome) -> String {
        match outcome {
            CommandOutcome::Continue(s) => s,
            CommandOutcome::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn parses_simple_keywords() {
        assert_eq!(parse_command("suggest"), Ok(Some(Command::Suggest)));
        assert_eq!(parse_command("  BOARD "), Ok(Some(Command::Board)));
        assert_eq!(parse_command("board_full"), Ok(Some(Command::BoardFull)));
        assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command("Quit"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command(""), Ok(None));
    }

    #[test]
    fn unknown_command() {
        let err = parse_command("draft everyone").unwrap_err();
        assert_eq!(err, CommandError::Unknown);
        assert_eq!(err.to_string(), "Unknown command. Type 'help' for commands.");
        assert_eq!(parse_command("suggest now"), Err(CommandError::Unknown));
    }

    #[test]
    fn parses_names_with_or_without_quotes() {
        assert_eq!(
            parse_command("me \"Tyreek Hill\""),
            Ok(Some(Command::Me("Tyreek Hill".into())))
        );
        assert_eq!(
            parse_command("other Travis Kelce"),
            Ok(Some(Command::Other("Travis Kelce".into())))
        );
        assert_eq!(parse_command("find \"trav\""), Ok(Some(Command::Find("trav".into()))));
        assert_eq!(parse_command("me"), Err(CommandError::Usage(USAGE_ME)));
        assert_eq!(parse_command("find \"\""), Err(CommandError::Usage(USAGE_FIND)));
    }

    #[test]
    fn parses_add() {
        assert_eq!(
            parse_command("add \"Puka Nacua\" WR lar 85"),
            Ok(Some(Command::Add {
                name: "Puka Nacua".into(),
                position: Position::WR,
                team: "LAR".into(),
                rank: 85.0,
            }))
        );
        assert_eq!(
            parse_command("add Rookie TE NYG"),
            Ok(Some(Command::Add {
                name: "Rookie".into(),
                position: Position::TE,
                team: "NYG".into(),
                rank: 1500.0,
            }))
        );
    }

    #[test]
    fn add_usage_errors() {
        let usage = Err(CommandError::Usage(USAGE_ADD));
        assert_eq!(parse_command("add \"Puka Nacua\" WR"), usage);
        assert_eq!(parse_command("add \"Puka Nacua\" LB LAR"), usage);
        assert_eq!(parse_command("add \"Puka Nacua\" WR LAR soon"), usage);
        assert_eq!(parse_command("add \"Puka Nacua WR LAR"), usage);
        assert_eq!(
            parse_command("add \"Puka Nacua\" WR LAR 85 extra"),
            Err(CommandError::Usage(USAGE_ADD))
        );
        assert_eq!(
            parse_command("add \"Puka\" WR").unwrap_err().to_string(),
            "Usage: add \"Name\" POS TEAM [rank]"
        );
    }

    #[test]
    fn parses_setrank() {
        assert_eq!(
            parse_command("setrank FP \"Travis Kelce\" 12"),
            Ok(Some(Command::SetRank {
                source: RankSource::Fp,
                name: "Travis Kelce".into(),
                value: 12.0,
            }))
        );
        let usage = Err(CommandError::Usage(USAGE_SETRANK));
        assert_eq!(parse_command("setrank yahoo \"Travis Kelce\" 12"), usage);
        assert_eq!(parse_command("setrank espn \"Travis Kelce\""), usage);
        assert_eq!(parse_command("setrank espn \"Travis Kelce\" x"), usage);
    }

    #[test]
    fn parses_tag() {
        assert_eq!(
            parse_command("tag \"Travis Kelce\" age, established"),
            Ok(Some(Command::Tag {
                name: "Travis Kelce".into(),
                tags: "age, established".into(),
            }))
        );
        assert_eq!(
            parse_command("tag \"Travis Kelce\""),
            Err(CommandError::Usage(USAGE_TAG))
        );
    }

    #[test]
    fn me_and_other_record_to_right_team() {
        let mut app = app(1);
        // Team 1 (the user) is on the clock, so `other` goes to team 2.
        let out = text(app.handle_line("other \"Tyreek Hill\""));
        assert_eq!(out, "Recorded pick #1: Team 2 -> Tyreek Hill (WR)");
        let out = text(app.handle_line("me \"mccaffrey\""));
        assert_eq!(out, "Recorded pick #2: Team 1 -> Christian McCaffrey (RB)");
    }

    #[test]
    fn taken_player_message() {
        let mut app = app(1);
        app.handle_line("me \"Travis Kelce\"");
        let out = text(app.handle_line("other \"Travis Kelce\""));
        assert_eq!(out, "Travis Kelce is already taken by Team 1.");
        assert_eq!(app.draft.picks().len(), 1);
    }

    #[test]
    fn undo_messages() {
        let mut app = app(2);
        assert_eq!(text(app.handle_line("undo")), "No picks to undo.");
        app.handle_line("other Travis Etienne");
        assert_eq!(text(app.handle_line("undo")), "Undid pick #1 (Travis Etienne)");
    }

    #[test]
    fn find_lists_available_or_no_matches() {
        let mut app = app(1);
        app.handle_line("me \"Travis Kelce\"");
        assert_eq!(text(app.handle_line("find travis")), " 1. Travis Etienne JAX RB");
        assert_eq!(text(app.handle_line("find zzz")), "No matches.");
    }

    #[test]
    fn add_then_duplicate() {
        let mut app = app(1);
        assert_eq!(
            text(app.handle_line("add \"Puka Nacua\" WR LAR 85")),
            "Added Puka Nacua (WR, LAR) with rank 85."
        );
        assert_eq!(
            text(app.handle_line("add \"puka nacua\" WR LAR")),
            "puka nacua is already in the player pool."
        );
        let p = app.draft.find_player("Puka Nacua").unwrap();
        assert_eq!(p.tags, "volatile");
    }

    #[test]
    fn setrank_and_tag_messages() {
        let mut app = app(1);
        assert_eq!(
            text(app.handle_line("setrank consensus \"Travis Kelce\" 9")),
            "Set consensus rank for Travis Kelce to 9."
        );
        assert_eq!(
            text(app.handle_line("setrank espn \"Nobody Here\" 9")),
            "Player not found."
        );
        assert_eq!(
            text(app.handle_line("tag \"Travis Kelce\" age,injury")),
            "Updated RiskTag for Travis Kelce -> age,injury"
        );
        assert_eq!(text(app.handle_line("tag \"Nobody Here\" age")), "Player not found.");
    }

    #[test]
    fn other_after_completion() {
        let mut app = app(1);
        for name in ["Christian McCaffrey", "Tyreek Hill", "Travis Kelce", "Travis Etienne"] {
            app.handle_line(&format!("other \"{name}\""));
        }
        app.handle_line("me \"Late Pick One\"");
        app.handle_line("me \"Late Pick Two\"");
        assert!(app.draft.is_complete());
        assert_eq!(text(app.handle_line("other \"Anyone\"")), "Draft complete.");
        assert_eq!(text(app.handle_line("suggest")), "Draft complete.");
    }

    #[test]
    fn tag_requires_quoted_name() {
        let mut app = app(1);
        app.draft.set_tags("Travis Kelce", "age").unwrap();
        assert_eq!(
            parse_command("tag Travis Kelce injury"),
            Err(CommandError::Usage(USAGE_TAG))
        );
        assert_eq!(
            text(app.handle_line("tag Travis Kelce injury")),
            "Usage: tag \"Name\" tag1,tag2"
        );
        assert_eq!(app.draft.find_player("Travis Kelce").unwrap().tags, "age");
    }

    #[test]
    fn setrank_accepts_zero_but_not_negative() {
        assert_eq!(
            parse_command("setrank espn \"Travis Kelce\" 0"),
            Ok(Some(Command::SetRank {
                source: RankSource::Espn,
                name: "Travis Kelce".into(),
                value: 0.0,
            }))
        );
        assert_eq!(
            parse_command("setrank espn \"Travis Kelce\" -3"),
            Err(CommandError::Usage(USAGE_SETRANK))
        );
    }

    #[test]
    fn other_with_only_user_left_on_clock() {
        let players = vec![Player::new("Solo Back", "SF", Position::RB, SourceRanks::default())];
        let draft = DraftState::new(1, 1, 2, players, RosterSlotConfig::standard()).unwrap();
        let path = std::env::temp_dir().join("app_test_unused_snapshot.json");
        let mut app = AppState::new(draft, path);
        assert_eq!(
            text(app.handle_line("other \"Solo Back\"")),
            "No other team has a pick left."
        );
        assert!(app.draft.picks().is_empty());
    }

    #[test]
    fn quit_and_help() {
        let mut app = app(1);
        assert_eq!(app.handle_line("quit"), CommandOutcome::Quit);
        assert!(text(app.handle_line("help")).starts_with("Commands:"));
        assert_eq!(text(app.handle_line("   ")), "");
    }

    #[test]
    fn save_writes_snapshot() {
        let tmp = std::env::temp_dir().join("app_test_save");
        let _ = std::fs::remove_dir_all(&tmp);
        let mut app = app(1);
        app.snapshot_path = tmp.join("draft_state.json");
        app.handle_line("me \"Tyreek Hill\"");

        let out = text(app.handle_line("save"));
        assert_eq!(out, format!("Saved -> {}", app.snapshot_path.display()));
        let snap = snapshot::load(&app.snapshot_path).unwrap();
        assert_eq!(snap.picks.len(), 1);
        assert_eq!(snap.team_rosters["1"][0].player, "Tyreek Hill");

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
