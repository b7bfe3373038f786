//! Line-oriented command shell over `App`.
//!
//! DESIGN
//! ======
//! Input is interpreted by mode, checked in this order:
//! 1. guided add prompts: the line is the value of the next form field;
//! 2. pending delete: only `yes` / `no`;
//! 3. open add form: `save`, `cancel` or `<field> <value>`;
//! 4. browsing: the regular command set.
//!
//! `<n>` arguments index the currently visible cards, 1-based, so a filter
//! change renumbers them. Signed-out users may only `login`, `help`, `quit`.

#[cfg(test)]
#[path = "shell_test.rs"]
mod shell_test;

use crate::app::{Action, App};
use crate::model::{Chain, Credentials, Platform};
use crate::store::StoreError;
use crate::surfaces::{AddField, FormError};

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Startup configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] StoreError),

    /// Terminal input or output failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("no wallet #{0} in the current list")]
    NoSuchCard(usize),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("sign in first: login <email> <password>")]
    LoginRequired,

    /// A terminal line that is not UTF-8; the line is dropped.
    #[error("input is not valid UTF-8")]
    NotUtf8,
}

/// Decode one raw stdin segment (without its `\n`).
///
/// # Errors
///
/// Returns `ShellError::NotUtf8` for bytes that are not UTF-8.
pub fn decode_line(raw: Vec<u8>) -> Result<String, ShellError> {
    String::from_utf8(raw).map_err(|_| ShellError::NotUtf8)
}

/// A parsed browse-mode command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Login(Credentials),
    Logout,
    List,
    Platform(Platform),
    Chain(Chain),
    Show(usize),
    Close,
    Copy(usize),
    Delete(usize),
    Add,
    Quit,
}

impl Command {
    fn allowed_signed_out(&self) -> bool {
        matches!(self, Self::Help | Self::Login(_) | Self::Quit)
    }
}

/// What the loop should do after a line was handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Render,
    Help,
    Quit,
}

/// Parse one browse-mode line.
///
/// # Errors
///
/// Returns an error for unknown commands, missing or malformed arguments,
/// and platform or chain names outside their enumerations.
pub fn parse(line: &str) -> Result<Command, ShellError> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    match word.to_ascii_lowercase().as_str() {
        "help" | "?" => Ok(Command::Help),
        "login" => {
            let (email, password) = rest.split_once(char::is_whitespace).ok_or(ShellError::Usage("login <email> <password>"))?;
            Ok(Command::Login(Credentials { email: email.to_owned(), password: password.trim().to_owned() }))
        }
        "logout" => Ok(Command::Logout),
        "ls" | "list" => Ok(Command::List),
        "platform" => rest
            .parse()
            .map(Command::Platform)
            .map_err(|_| FormError::InvalidPlatform(rest.to_owned()).into()),
        "chain" => rest
            .parse()
            .map(Command::Chain)
            .map_err(|_| FormError::InvalidChain(rest.to_owned()).into()),
        "show" => card_number(rest, "show <n>").map(Command::Show),
        "close" => Ok(Command::Close),
        "copy" => card_number(rest, "copy <n>").map(Command::Copy),
        "delete" | "rm" => card_number(rest, "delete <n>").map(Command::Delete),
        "add" => Ok(Command::Add),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        _ => Err(ShellError::UnknownCommand(word.to_owned())),
    }
}

fn card_number(arg: &str, usage: &'static str) -> Result<usize, ShellError> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ShellError::Usage(usage)),
    }
}

#[derive(Debug, Default)]
pub struct Shell {
    /// Index into `AddField::ALL` while the guided prompts run.
    prompting: Option<usize>,
}

impl Shell {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prompt text for the next line.
    #[must_use]
    pub fn prompt(&self, app: &App) -> String {
        if let Some(field) = self.prompting.map(|i| AddField::ALL[i]) {
            let marker = if field.is_required() { " *" } else { "" };
            return match field {
                AddField::Platform => format!(
                    "{}{marker} ({}) [{}]: ",
                    field.label(),
                    choices(&Platform::ALL.map(Platform::as_str)),
                    Platform::default()
                ),
                AddField::Chain => format!(
                    "{}{marker} ({}) [{}]: ",
                    field.label(),
                    choices(&Chain::ALL.map(Chain::as_str)),
                    Chain::default()
                ),
                _ => format!("{}{marker}: ", field.label()),
            };
        }
        if app.pending_delete().is_some() {
            "yes/no> ".to_owned()
        } else if app.add_form().is_some() {
            "add> ".to_owned()
        } else {
            "> ".to_owned()
        }
    }

    #[must_use]
    pub fn is_prompting(&self) -> bool {
        self.prompting.is_some()
    }

    /// Handle one input line.
    ///
    /// # Errors
    ///
    /// Returns input errors for the caller to print; the app is unchanged
    /// in that case. Remote failures are alerted by `App` and are not errors
    /// here.
    pub async fn handle_line(&mut self, app: &mut App, line: &str) -> Result<Flow, ShellError> {
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some(index) = self.prompting {
            if app.add_form().is_none() {
                self.prompting = None;
            } else {
                app.edit_add(AddField::ALL[index], line)?;
                let next = index + 1;
                self.prompting = (next < AddField::ALL.len()).then_some(next);
                return Ok(Flow::Render);
            }
        }

        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Render);
        }

        if app.pending_delete().is_some() {
            let action = match line.to_ascii_lowercase().as_str() {
                "yes" | "y" => Action::ConfirmDelete,
                "no" | "n" => Action::CancelDelete,
                _ => return Err(ShellError::Usage("yes | no")),
            };
            app.dispatch(action).await;
            return Ok(Flow::Render);
        }

        if app.add_form().is_some() {
            return self.handle_form_line(app, line).await;
        }

        let command = parse(line)?;
        if !app.is_authenticated() && !command.allowed_signed_out() {
            return Err(ShellError::LoginRequired);
        }
        self.run(app, command).await
    }

    async fn handle_form_line(&mut self, app: &mut App, line: &str) -> Result<Flow, ShellError> {
        let (word, value) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match word.to_ascii_lowercase().as_str() {
            "save" => app.dispatch(Action::SubmitAdd).await,
            "cancel" => app.dispatch(Action::CloseAdd).await,
            "quit" | "exit" => return Ok(Flow::Quit),
            _ => {
                let field: AddField = word.parse()?;
                app.edit_add(field, value)?;
            }
        }
        Ok(Flow::Render)
    }

    async fn run(&mut self, app: &mut App, command: Command) -> Result<Flow, ShellError> {
        let action = match command {
            Command::Help => return Ok(Flow::Help),
            Command::Quit => return Ok(Flow::Quit),
            Command::Login(credentials) => Action::Login(credentials),
            Command::Logout => Action::Logout,
            Command::List => Action::Refresh,
            Command::Platform(platform) => Action::TogglePlatform(platform),
            Command::Chain(chain) => Action::ToggleChain(chain),
            Command::Show(n) => Action::OpenDetail(card_id(app, n)?),
            Command::Close => Action::CloseDetail,
            Command::Copy(n) => Action::CopyAddress(card_id(app, n)?),
            Command::Delete(n) => Action::RequestDelete(card_id(app, n)?),
            Command::Add => {
                self.prompting = Some(0);
                Action::OpenAdd
            }
        };
        app.dispatch(action).await;
        Ok(Flow::Render)
    }
}

fn card_id(app: &App, n: usize) -> Result<String, ShellError> {
    app.collection()
        .visible()
        .get(n - 1)
        .map(|r| r.id.clone())
        .ok_or(ShellError::NoSuchCard(n))
}

fn choices(values: &[&str]) -> String {
    values.join(" | ")
}
