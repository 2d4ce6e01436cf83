//! Command-line rendition of the sign-in and sign-up screens.
//!
//! Each command fills the screen's [`FormInput`]s, validates them, prints
//! per-field complaints, and otherwise submits through an [`AuthScreen`]
//! while echoing the loading indicator and the final signal.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use form_validation::{FieldId, FormInput, InputKind, MessageKey, apply_result};
use tracing::debug;

use crate::domain::forms::{FormError, MIN_PASSWORD_LENGTH, fields, messages};
use crate::domain::ports::AuthTransport;
use crate::domain::{
    AuthScreen, AuthSignal, SessionStore, SignInForm, SignUpForm, SubmitDisposition, User,
};

/// `auth-client` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "auth-client",
    about = "Sign in, sign up and manage the stored session against the auth API",
    version
)]
pub struct Cli {
    /// Screen to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Screens reachable from the command line.
///
/// Missing form values default to empty so the form rules, not clap, report
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Sign in with email and password.
    SignIn {
        /// Account email.
        #[arg(long, default_value = "")]
        email: String,
        /// Account password.
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Create an account.
    SignUp {
        /// Display name; becomes the lowercase username.
        #[arg(long, default_value = "")]
        name: String,
        /// Account email.
        #[arg(long, default_value = "")]
        email: String,
        /// Gender as picked from the list.
        #[arg(long, default_value = "")]
        gender: String,
        /// Chosen password.
        #[arg(long, default_value = "")]
        password: String,
        /// Password typed again.
        #[arg(long = "password-confirmation", default_value = "")]
        password_confirmation: String,
    },
    /// Sign in with a Facebook access token.
    Facebook {
        /// Token returned by the Facebook login flow.
        #[arg(long = "access-token", default_value = "")]
        access_token: String,
    },
    /// End the current session.
    SignOut,
    /// Print the signed-in user.
    Whoami,
}

impl Command {
    /// Subcommand name as typed; carries no form values.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SignIn { .. } => "sign-in",
            Self::SignUp { .. } => "sign-up",
            Self::Facebook { .. } => "facebook",
            Self::SignOut => "sign-out",
            Self::Whoami => "whoami",
        }
    }
}

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// The screen reached its goal.
    Success,
    /// Validation, transport or session problems were reported.
    Failed,
}

impl From<CommandStatus> for ExitCode {
    fn from(status: CommandStatus) -> Self {
        match status {
            CommandStatus::Success => Self::SUCCESS,
            CommandStatus::Failed => Self::FAILURE,
        }
    }
}

/// English text for a validation message key.
#[must_use]
pub fn message_text(key: MessageKey) -> &'static str {
    match key {
        messages::MISSING_NAME => "Please enter your name.",
        messages::MISSING_EMAIL => "Please enter your email.",
        messages::EMAIL_NOT_VALID => "Please enter a valid email.",
        messages::MISSING_PASSWORD => "Please enter your password.",
        messages::SHORT_PASSWORD => "Password is too short.",
        messages::MISSING_CONFIRM_PASSWORD => "Please confirm your password.",
        messages::CONFIRM_PASSWORD_MATCH => "Passwords do not match.",
        messages::MISSING_GENDER => "Please select your gender.",
        other => other.as_str(),
    }
}

/// Run `command` against `transport` and `session`, rendering to `out`.
///
/// # Errors
///
/// Returns an I/O error when writing to `out` fails.
pub async fn run<W: Write>(
    command: Command,
    transport: Arc<dyn AuthTransport>,
    session: SessionStore,
    out: &mut W,
) -> io::Result<CommandStatus> {
    debug!(command = command.name(), "running command");
    let mut screen = AuthScreen::new(transport, session);
    match command {
        Command::SignIn { email, password } => {
            let form = SignInForm { email, password };
            let mut inputs = vec![
                filled(fields::EMAIL, InputKind::Email, &form.email),
                filled(fields::PASSWORD, InputKind::Password, &form.password),
            ];
            let submitted = screen.submit_sign_in(&form);
            settle(&mut screen, submitted, &mut inputs, out).await
        }
        Command::SignUp {
            name,
            email,
            gender,
            password,
            password_confirmation,
        } => {
            let form = SignUpForm {
                name,
                email,
                gender,
                password,
                password_confirmation,
            };
            let mut inputs = vec![
                filled(fields::NAME, InputKind::Text, &form.name),
                filled(fields::EMAIL, InputKind::Email, &form.email),
                filled(fields::PASSWORD, InputKind::Password, &form.password),
                filled(
                    fields::PASSWORD_CONFIRMATION,
                    InputKind::Password,
                    &form.password_confirmation,
                ),
                filled(fields::GENDER, InputKind::Picker, &form.gender),
            ];
            let submitted = screen.submit_sign_up(&form);
            settle(&mut screen, submitted, &mut inputs, out).await
        }
        Command::Facebook { access_token } => match screen.submit_social(&access_token) {
            Ok(disposition) => finish(&mut screen, disposition, out).await,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                Ok(CommandStatus::Failed)
            }
        },
        Command::SignOut => {
            let disposition = screen.sign_out();
            finish(&mut screen, disposition, out).await
        }
        Command::Whoami => render_session(screen.session(), out),
    }
}

fn filled(id: FieldId, kind: InputKind, value: &str) -> FormInput {
    let mut input = FormInput::new(id, kind);
    input.set_value(value);
    input
}

async fn settle<W: Write>(
    screen: &mut AuthScreen,
    submitted: Result<SubmitDisposition, FormError>,
    inputs: &mut [FormInput],
    out: &mut W,
) -> io::Result<CommandStatus> {
    match submitted {
        Ok(disposition) => finish(screen, disposition, out).await,
        Err(FormError::Invalid(result)) => {
            apply_result(inputs, &result);
            render_field_errors(inputs, out)?;
            Ok(CommandStatus::Failed)
        }
        Err(err @ FormError::Malformed(_)) => {
            writeln!(out, "error: {err}")?;
            Ok(CommandStatus::Failed)
        }
    }
}

fn render_field_errors<W: Write>(inputs: &[FormInput], out: &mut W) -> io::Result<()> {
    for input in inputs {
        let Some(key) = input.error() else {
            continue;
        };
        let text = message_text(key);
        if key == messages::SHORT_PASSWORD {
            writeln!(
                out,
                "{} [{}]: {text} Use at least {MIN_PASSWORD_LENGTH} characters.",
                input.id(),
                input.display_value()
            )?;
        } else {
            writeln!(out, "{} [{}]: {text}", input.id(), input.display_value())?;
        }
    }
    Ok(())
}

async fn finish<W: Write>(
    screen: &mut AuthScreen,
    disposition: SubmitDisposition,
    out: &mut W,
) -> io::Result<CommandStatus> {
    if disposition == SubmitDisposition::Ignored {
        writeln!(out, "A request is already in progress.")?;
        return Ok(CommandStatus::Failed);
    }
    writeln!(out, "Loading...")?;
    let signal = screen.next_signal().await;

    match signal {
        Some(AuthSignal::Authenticated(user)) => {
            writeln!(out, "Signed in as {}", describe(&user))?;
            Ok(CommandStatus::Success)
        }
        Some(AuthSignal::SignedOut) => {
            writeln!(out, "Signed out.")?;
            Ok(CommandStatus::Success)
        }
        Some(AuthSignal::Error(error)) => {
            match error.trace_id() {
                Some(trace_id) => writeln!(out, "error: {} (trace {trace_id})", error.message())?,
                None => writeln!(out, "error: {}", error.message())?,
            }
            Ok(CommandStatus::Failed)
        }
        None => Ok(CommandStatus::Failed),
    }
}

fn render_session<W: Write>(session: &SessionStore, out: &mut W) -> io::Result<CommandStatus> {
    match session.get() {
        Some(user) => {
            writeln!(out, "{}", describe(&user))?;
            Ok(CommandStatus::Success)
        }
        None => {
            writeln!(out, "Not signed in.")?;
            Ok(CommandStatus::Failed)
        }
    }
}

fn describe(user: &User) -> String {
    format!("{} <{}> (id {})", user.username(), user.email(), user.id())
}
