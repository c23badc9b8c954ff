//! Terminal sessions that command lines are sent to.
//!
//! A [`TerminalHost`] creates named sessions. Text sent to a session is
//! buffered and only acted upon when the session is shown, so a session
//! whose command fails to resolve never opens anything.

use std::process::{Command, Stdio};

use log::{debug, info};

use crate::error::{Error, Result};

pub trait TerminalSession {
    /// Queues a line of text for the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session can no longer accept input.
    fn send_text(&mut self, text: &str) -> Result<()>;

    /// Brings the session to the user, running whatever was sent to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be opened or what it ran failed.
    fn show(&mut self) -> Result<()>;
}

pub trait TerminalHost {
    /// # Errors
    ///
    /// Returns an error if no session can be created.
    fn create_terminal(&mut self, name: &str) -> Result<Box<dyn TerminalSession>>;
}

/// Runs sessions inside the current terminal through an interactive shell.
pub struct ShellTerminalHost {
    shell: String,
}

impl ShellTerminalHost {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl TerminalHost for ShellTerminalHost {
    fn create_terminal(&mut self, name: &str) -> Result<Box<dyn TerminalSession>> {
        Ok(Box::new(ShellSession {
            shell: self.shell.clone(),
            name: name.to_string(),
            lines: Vec::new(),
        }))
    }
}

struct ShellSession {
    shell: String,
    name: String,
    lines: Vec<String>,
}

impl TerminalSession for ShellSession {
    fn send_text(&mut self, text: &str) -> Result<()> {
        self.lines.push(text.to_string());
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let script = self.lines.join("\n");
        info!("Running in `{}`: {script}", self.name);

        // Give `-i` argument to start an interactive shell,
        // which will make it read ~/.rc or ~/.profile or whatever file
        let subprocess_exit_success = Command::new(&self.shell)
            .args(["-i", "-c", script.as_str()])
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?
            .wait()?
            .success();

        if subprocess_exit_success {
            Ok(())
        } else {
            Err(Error::SubProcessExit)
        }
    }
}

/// Opens a new terminal emulator window per session.
#[derive(Default)]
pub struct EmulatorTerminalHost;

impl EmulatorTerminalHost {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TerminalHost for EmulatorTerminalHost {
    fn create_terminal(&mut self, name: &str) -> Result<Box<dyn TerminalSession>> {
        Ok(Box::new(EmulatorSession {
            name: name.to_string(),
            lines: Vec::new(),
        }))
    }
}

struct EmulatorSession {
    name: String,
    lines: Vec<String>,
}

impl TerminalSession for EmulatorSession {
    fn send_text(&mut self, text: &str) -> Result<()> {
        self.lines.push(text.to_string());
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let full_command = self.lines.join("; ");
        debug!("Opening terminal `{}` for: {full_command}", self.name);

        if cfg!(target_os = "macos") {
            launch_terminal_macos(&self.name, &full_command)
        } else if cfg!(target_os = "windows") {
            launch_terminal_windows(&self.name, &full_command)
        } else {
            launch_terminal_linux(&self.name, &full_command)
        }
    }
}

fn launch_terminal_macos(name: &str, full_command: &str) -> Result<()> {
    let escape = |text: &str| text.replace('\\', "\\\\").replace('"', "\\\"");
    let script = format!(
        "tell application \"Terminal\"\nactivate\nset newTab to do script \"{}\"\nset custom title of newTab to \"{}\"\nend tell",
        escape(full_command),
        escape(name)
    );

    let output = Command::new("osascript").arg("-e").arg(&script).output()?;

    if output.status.success() {
        Ok(())
    } else {
        Err(Error::TerminalLaunch(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ))
    }
}

/// Arguments that set the window title of `terminal` and hand the rest of
/// the command line to a shell.
///
/// Every emulator is given a flag that takes the remaining arguments as the
/// program to run. `-e` of xfce4-terminal, mate-terminal and terminator takes
/// a single string instead, so those get `-x`.
fn linux_terminal_arguments(terminal: &str, name: &str) -> Vec<String> {
    let arguments = match terminal {
        "gnome-terminal" => vec![format!("--title={name}"), "--".to_string()],
        "konsole" => vec!["-p".to_string(), format!("tabtitle={name}"), "-e".to_string()],
        "kitty" => vec!["--title".to_string(), name.to_string()],
        "xterm" | "urxvt" => vec!["-T".to_string(), name.to_string(), "-e".to_string()],
        "xfce4-terminal" | "mate-terminal" => {
            vec![format!("--title={name}"), "-x".to_string()]
        }
        "terminator" => vec!["-T".to_string(), name.to_string(), "-x".to_string()],
        // alacritty
        _ => vec!["--title".to_string(), name.to_string(), "-e".to_string()],
    };

    arguments
        .into_iter()
        .chain(["bash".to_string(), "-c".to_string()])
        .collect()
}

/// Linux emulators in order of preference.
const LINUX_TERMINALS: [&str; 9] = [
    "gnome-terminal",
    "konsole",
    "xfce4-terminal",
    "mate-terminal",
    "xterm",
    "urxvt",
    "alacritty",
    "kitty",
    "terminator",
];

fn launch_terminal_linux(name: &str, full_command: &str) -> Result<()> {
    let shell_command = format!("{full_command}; exec bash");

    for terminal in LINUX_TERMINALS {
        let mut command = Command::new(terminal);
        command
            .args(linux_terminal_arguments(terminal, name))
            .arg(&shell_command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        match command.spawn() {
            Ok(_) => {
                debug!("Launched `{terminal}`");
                return Ok(());
            }
            Err(e) => debug!("Could not launch `{terminal}`: {e}"),
        }
    }

    Err(Error::TerminalLaunch(
        "no supported terminal emulator found".to_string(),
    ))
}

/// Programs to try on Windows, in order, with their arguments.
///
/// `start` only reads its first argument as a window title when it is
/// quoted, so `cmd` gets an empty title that is always passed as `""`.
fn windows_terminal_attempts<'a>(
    name: &'a str,
    full_command: &'a str,
) -> [(&'static str, Vec<&'a str>); 3] {
    [
        ("wt", vec!["--title", name, "cmd", "/k", full_command]),
        ("powershell", vec!["-NoExit", "-Command", full_command]),
        ("cmd", vec!["/c", "start", "", "cmd", "/k", full_command]),
    ]
}

fn launch_terminal_windows(name: &str, full_command: &str) -> Result<()> {
    for (program, arguments) in windows_terminal_attempts(name, full_command) {
        match Command::new(program).args(&arguments).spawn() {
            Ok(_) => return Ok(()),
            Err(e) => debug!("Could not launch `{program}`: {e}"),
        }
    }

    Err(Error::TerminalLaunch(
        "no supported terminal found".to_string(),
    ))
}
