//! Parsing of stdin command lines.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow, bail};
use moji_engine::Signal;
use moji_types::ConvertMode;

pub const HELP: &str = "\
commands:
  open <path>                              file opened in the editor
  focus [<path>]                           focus a file, or nothing
  detect <path>                            verbose detect into the output pane
  scan [<root>]                            scan the workspace
  fix <path>                               fix encoding in place
  convert <path> [validate|convert|autofix]
  report [<root>]                          write and open the HTML report
  status                                   print the current session
  reload-config                            re-read the config file
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Signal(Signal),
    Status,
    ReloadConfig,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    ///
    /// `workspace` stands in for an omitted root on `scan` and `report`.
    pub fn parse(line: &str, workspace: Option<&Path>) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        let root = || {
            if rest.is_empty() {
                workspace.map(Path::to_path_buf)
            } else {
                Some(PathBuf::from(rest))
            }
        };

        let command = match verb {
            "open" => Self::Signal(Signal::DocumentOpened(required_path(verb, rest)?)),
            "focus" => Self::Signal(Signal::ActiveFileChanged(
                (!rest.is_empty()).then(|| PathBuf::from(rest)),
            )),
            "detect" => Self::Signal(Signal::DetectRequested(required_path(verb, rest)?)),
            "scan" => Self::Signal(Signal::ScanRequested(root())),
            "fix" => Self::Signal(Signal::FixRequested(required_path(verb, rest)?)),
            "convert" => Self::Signal(parse_convert(rest)?),
            "report" => Self::Signal(Signal::ReportRequested(root())),
            "status" => Self::Status,
            "reload-config" => Self::ReloadConfig,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("unknown command '{other}' (try 'help')"),
        };
        Ok(Some(command))
    }
}

fn required_path(verb: &str, rest: &str) -> Result<PathBuf> {
    if rest.is_empty() {
        return Err(anyhow!("'{verb}' needs a file path"));
    }
    Ok(PathBuf::from(rest))
}

/// A trailing mode word selects the mode directly; otherwise the mode is
/// picked interactively.
fn parse_convert(rest: &str) -> Result<Signal> {
    if let Some((path, mode)) = rest.rsplit_once(char::is_whitespace)
        && let Ok(mode) = mode.parse::<ConvertMode>()
    {
        let path = required_path("convert", path.trim())?;
        return Ok(Signal::ConvertRequested(path, mode));
    }
    Ok(Signal::ConvertPicked(required_path("convert", rest)?))
}

/// Interpret a quick-pick answer: a 1-based index into [`ConvertMode::ALL`]
/// or a mode name. Anything else dismisses the pick.
pub fn parse_pick(answer: &str) -> Option<ConvertMode> {
    let answer = answer.trim();
    if let Ok(index) = answer.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| ConvertMode::ALL.get(i).copied());
    }
    answer.parse().ok()
}
