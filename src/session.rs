//! Interactive prompt loop
//!
//! The session moves between four states:
//!
//! ```text
//! AwaitingState --name--> ShowingSiteList --> AwaitingSiteChoice
//!      ^   |                                   |   |      |
//!      |   +--exit--> Exit <------exit---------+   |      |
//!      +---------------------back------------------+      |
//!      +-------------------number (shows places)----------+
//! ```
//!
//! Input mistakes print a diagnostic and re-prompt in the same state. Fetch
//! and parse failures end the session with an error.

use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::debug;

use crate::data::{PlaceSource, Site, SiteSource};
use crate::explorer::{Explorer, ExplorerError};

const EXIT_COMMAND: &str = "exit";
const BACK_COMMAND: &str = "back";

const STATE_PROMPT: &str = "Enter a state name (e.g. Michigan, michigan) or \"exit\": ";
const CHOICE_PROMPT: &str = "Choose the number for detail search or \"exit\" or \"back\": ";
const UNKNOWN_STATE_MESSAGE: &str = "[Error] Enter proper state name";
const INVALID_CHOICE_MESSAGE: &str = "[Error] Invalid input";

/// Width of the dashed separator around listing headers
const SEPARATOR_WIDTH: usize = 35;

/// Errors that end a session
#[derive(Debug, Error)]
pub enum SessionError {
    /// A lookup failed (network, malformed page or cache write)
    #[error(transparent)]
    Explorer(#[from] ExplorerError),

    /// Reading input or writing output failed
    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a site choice is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChoiceError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("{choice} is not between 1 and {count}")]
    OutOfRange { choice: usize, count: usize },
}

/// Current position in the prompt loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for a state name
    AwaitingState,
    /// A state was recognized; its sites are about to be listed
    ShowingSiteList { state: String, url: String },
    /// Sites are listed; waiting for a number, "back" or "exit"
    AwaitingSiteChoice { sites: Vec<Site> },
    /// The user asked to leave
    Exit,
}

/// Parsed input at the state prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateInput {
    Exit,
    /// Lowercased, trimmed state name
    State(String),
}

/// Parsed input at the site-choice prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Exit,
    Back,
    /// Zero-based index into the listed sites
    Site(usize),
}

/// Interprets a line typed at the state prompt
pub fn parse_state_input(line: &str) -> StateInput {
    let normalized = line.trim().to_lowercase();
    if normalized == EXIT_COMMAND {
        StateInput::Exit
    } else {
        StateInput::State(normalized)
    }
}

/// Interprets a line typed at the site-choice prompt
///
/// # Arguments
/// * `line` - Raw input
/// * `count` - Number of listed sites; valid choices are `1..=count`
///
/// # Returns
/// * `Ok(Choice)` - A command or a zero-based site index
/// * `Err(ChoiceError)` - Input is neither a command nor an in-range number
pub fn parse_choice(line: &str, count: usize) -> Result<Choice, ChoiceError> {
    let normalized = line.trim().to_lowercase();
    match normalized.as_str() {
        EXIT_COMMAND => return Ok(Choice::Exit),
        BACK_COMMAND => return Ok(Choice::Back),
        _ => {}
    }

    let choice: usize = normalized
        .parse()
        .map_err(|_| ChoiceError::NotANumber(line.trim().to_string()))?;

    if (1..=count).contains(&choice) {
        Ok(Choice::Site(choice - 1))
    } else {
        Err(ChoiceError::OutOfRange { choice, count })
    }
}

fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// A single user's interactive session over an explorer
pub struct Session<S, P, R, W> {
    explorer: Explorer<S, P>,
    input: R,
    output: W,
}

impl<S, P, R, W> Session<S, P, R, W>
where
    S: SiteSource,
    P: PlaceSource,
    R: BufRead,
    W: Write,
{
    /// Creates a session reading commands from `input` and printing to `output`
    pub fn new(explorer: Explorer<S, P>, input: R, output: W) -> Self {
        Self {
            explorer,
            input,
            output,
        }
    }

    /// The explorer and its caches
    pub fn explorer(&self) -> &Explorer<S, P> {
        &self.explorer
    }

    /// Everything written so far
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Runs prompts until the user exits or input ends
    pub async fn run(&mut self) -> Result<(), SessionError> {
        let mut state = SessionState::AwaitingState;
        while state != SessionState::Exit {
            state = self.step(state).await?;
        }
        debug!("Session finished");
        Ok(())
    }

    /// Performs one transition of the prompt loop
    pub async fn step(&mut self, state: SessionState) -> Result<SessionState, SessionError> {
        let next = match state {
            SessionState::AwaitingState => self.await_state().await?,
            SessionState::ShowingSiteList { state, url } => self.show_site_list(&state, &url).await?,
            SessionState::AwaitingSiteChoice { sites } => self.await_site_choice(sites).await?,
            SessionState::Exit => SessionState::Exit,
        };
        Ok(next)
    }

    /// Prints `prompt` and reads one line; `None` at end of input
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>, SessionError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("End of input");
            return Ok(None);
        }
        Ok(Some(line))
    }

    async fn await_state(&mut self) -> Result<SessionState, SessionError> {
        let Some(line) = self.prompt(STATE_PROMPT)? else {
            return Ok(SessionState::Exit);
        };

        let name = match parse_state_input(&line) {
            StateInput::Exit => return Ok(SessionState::Exit),
            StateInput::State(name) => name,
        };

        match self.explorer.state_url(&name).await? {
            Some(url) => Ok(SessionState::ShowingSiteList { state: name, url }),
            None => {
                debug!(state = %name, "Unknown state");
                writeln!(self.output, "{}\n", UNKNOWN_STATE_MESSAGE)?;
                Ok(SessionState::AwaitingState)
            }
        }
    }

    async fn show_site_list(&mut self, state: &str, url: &str) -> Result<SessionState, SessionError> {
        let sites = self.explorer.sites_for_state(url).await?.to_vec();

        writeln!(self.output, "{}", separator())?;
        writeln!(self.output, "List of national sites in {}", state)?;
        writeln!(self.output, "{}", separator())?;
        for (i, site) in sites.iter().enumerate() {
            writeln!(self.output, "[{}] {}", i + 1, site.info())?;
        }

        Ok(SessionState::AwaitingSiteChoice { sites })
    }

    async fn await_site_choice(&mut self, sites: Vec<Site>) -> Result<SessionState, SessionError> {
        let Some(line) = self.prompt(CHOICE_PROMPT)? else {
            return Ok(SessionState::Exit);
        };

        let index = match parse_choice(&line, sites.len()) {
            Ok(Choice::Exit) => return Ok(SessionState::Exit),
            Ok(Choice::Back) => return Ok(SessionState::AwaitingState),
            Ok(Choice::Site(index)) => index,
            Err(e) => {
                debug!(error = %e, "Rejected site choice");
                writeln!(self.output, "{}\n", INVALID_CHOICE_MESSAGE)?;
                return Ok(SessionState::AwaitingSiteChoice { sites });
            }
        };

        let site = &sites[index];
        writeln!(self.output, "{}", separator())?;
        writeln!(self.output, "Places near {}", site.name())?;
        writeln!(self.output, "{}", separator())?;

        let response = self.explorer.nearby_places(site).await?;
        for place in response.places() {
            writeln!(self.output, "{}", place.line())?;
        }

        Ok(SessionState::AwaitingState)
    }
}
