//! # Command Dispatcher
//!
//! Every screen is a small modal state machine driven by single keys:
//!
//! ```text
//!        ┌──────────────────────────────────────────┐
//!        ▼                                          │
//!   draw command bar + body → read key → lookup ──┬─┘ unknown key: read again
//!        ▲                                        │
//!        └──────── execute(command) ◄─────────────┘ registered key
//!
//!   running ──stop()──► stopped   (checked once per iteration)
//! ```
//!
//! A screen declares its commands as a static list of [`CommandSpec`]s. The
//! list is turned into a [`CommandTable`] once per screen type and cached, so
//! every instance shares the same shortcuts.

use std::collections::HashMap;
use std::fmt;
use std::io;

use async_trait::async_trait;
use log::debug;

use crate::core::state::App;
use crate::tui::Console;

// ============================================================================
// Registration
// ============================================================================

/// One declared command: a display name, an optional preferred shortcut
/// (defaults to the first character of the name) and the value dispatched.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec<C> {
    pub name: &'static str,
    pub shortcut: Option<char>,
    pub command: C,
}

impl<C> CommandSpec<C> {
    pub const fn new(name: &'static str, command: C) -> Self {
        Self {
            name,
            shortcut: None,
            command,
        }
    }

    pub const fn with_shortcut(name: &'static str, shortcut: char, command: C) -> Self {
        Self {
            name,
            shortcut: Some(shortcut),
            command,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Command has an empty name and no explicit shortcut.
    NoShortcut,
    /// Both the preferred shortcut and its case-swapped form are taken.
    ShortcutCollision { command: &'static str, shortcut: char },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::NoShortcut => write!(f, "command has no name and no shortcut"),
            RegistrationError::ShortcutCollision { command, shortcut } => write!(
                f,
                "cannot register command '{command}': shortcut '{shortcut}' and its swapped case are taken"
            ),
        }
    }
}

impl std::error::Error for RegistrationError {}

#[derive(Debug, Clone, Copy)]
struct Entry<C> {
    key: char,
    name: &'static str,
    command: C,
}

/// Immutable shortcut → command map for one screen type.
#[derive(Debug)]
pub struct CommandTable<C> {
    entries: Vec<Entry<C>>,
    by_key: HashMap<char, usize>,
}

impl<C: Copy> CommandTable<C> {
    /// Registers commands in declaration order.
    ///
    /// A taken shortcut falls back to its swapped case (`t` ↔ `T`); if that is
    /// taken too the whole table is rejected.
    pub fn build(specs: &[CommandSpec<C>]) -> Result<Self, RegistrationError> {
        let mut table = Self {
            entries: Vec::with_capacity(specs.len()),
            by_key: HashMap::with_capacity(specs.len()),
        };

        for spec in specs {
            let preferred = spec
                .shortcut
                .or_else(|| spec.name.chars().next())
                .ok_or(RegistrationError::NoShortcut)?;

            let key = [preferred, swap_case(preferred)]
                .into_iter()
                .find(|k| !table.by_key.contains_key(k))
                .ok_or(RegistrationError::ShortcutCollision {
                    command: spec.name,
                    shortcut: preferred,
                })?;

            table.by_key.insert(key, table.entries.len());
            table.entries.push(Entry {
                key,
                name: spec.name,
                command: spec.command,
            });
        }

        Ok(table)
    }

    pub fn lookup(&self, key: char) -> Option<C> {
        self.by_key.get(&key).map(|&i| self.entries[i].command)
    }

    /// Registered shortcuts in declaration order.
    pub fn shortcuts(&self) -> impl Iterator<Item = (char, &'static str)> + '_ {
        self.entries.iter().map(|e| (e.key, e.name))
    }

    /// `(q)uit (u)pdate jobs (T)ag ...`
    ///
    /// The name loses its first letter when the shortcut already spells it.
    pub fn summary(&self) -> String {
        self.shortcuts()
            .map(|(key, name)| {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) if first.to_lowercase().eq(key.to_lowercase()) => {
                        format!("({}){}", key, chars.as_str())
                    }
                    _ => format!("({key}){name}"),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn swap_case(c: char) -> char {
    if c.is_lowercase() {
        c.to_uppercase().next().unwrap_or(c)
    } else if c.is_uppercase() {
        c.to_lowercase().next().unwrap_or(c)
    } else {
        c
    }
}

// ============================================================================
// Screens
// ============================================================================

/// Running flag of a screen. Once stopped it stays stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lifecycle {
    running: bool,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self { running: true }
    }
}

impl Lifecycle {
    pub fn stopped() -> Self {
        Self { running: false }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[async_trait]
pub trait Screen: Send {
    type Command: Copy + fmt::Debug + Send + Sync + 'static;

    /// The shortcut table shared by every instance of this screen type.
    fn commands() -> &'static CommandTable<Self::Command>;

    /// Body text for the current state, drawn under the command bar.
    fn render(&self, app: &App) -> String;

    fn lifecycle(&self) -> &Lifecycle;

    async fn execute(
        &mut self,
        command: Self::Command,
        app: &mut App,
        console: &mut dyn Console,
    ) -> io::Result<()>;
}

/// Clears the console and draws the command bar followed by the body.
pub fn refresh<S: Screen>(screen: &S, app: &App, console: &mut dyn Console) -> io::Result<()> {
    console.draw(&S::commands().summary(), &screen.render(app))
}

/// Runs a screen until one of its commands stops it.
pub async fn run<S: Screen>(
    screen: &mut S,
    app: &mut App,
    console: &mut dyn Console,
) -> io::Result<()> {
    let table = S::commands();
    while screen.lifecycle().is_running() {
        refresh(screen, app, console)?;

        let command = loop {
            let key = console.read_key()?;
            if let Some(command) = table.lookup(key) {
                break command;
            }
        };

        debug!("Dispatching {:?}", command);
        screen.execute(command, app, console).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedConsole, test_app};
    use std::sync::OnceLock;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        Tag,
        Tally,
        Toggle,
        Quit,
    }

    #[test]
    fn test_default_shortcut_is_first_char() {
        let table = CommandTable::build(&[CommandSpec::new("quit", Op::Quit)]).unwrap();
        assert_eq!(table.lookup('q'), Some(Op::Quit));
        assert_eq!(table.lookup('Q'), None);
    }

    #[test]
    fn test_collision_falls_back_to_swapped_case() {
        let table = CommandTable::build(&[
            CommandSpec::new("tag", Op::Tag),
            CommandSpec::new("tally", Op::Tally),
        ])
        .unwrap();
        assert_eq!(table.lookup('t'), Some(Op::Tag));
        assert_eq!(table.lookup('T'), Some(Op::Tally));
    }

    #[test]
    fn test_third_collision_fails() {
        let err = CommandTable::build(&[
            CommandSpec::new("tag", Op::Tag),
            CommandSpec::new("tally", Op::Tally),
            CommandSpec::new("toggle", Op::Toggle),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::ShortcutCollision {
                command: "toggle",
                shortcut: 't'
            }
        );
    }

    #[test]
    fn test_explicit_shortcut_wins_over_name() {
        let table = CommandTable::build(&[
            CommandSpec::with_shortcut("add tags", 't', Op::Tag),
            CommandSpec::new("quit", Op::Quit),
        ])
        .unwrap();
        assert_eq!(table.lookup('t'), Some(Op::Tag));
        assert_eq!(table.lookup('a'), None);
    }

    #[test]
    fn test_non_alphabetic_collision_has_no_fallback() {
        let err = CommandTable::build(&[
            CommandSpec::with_shortcut("next", '>', Op::Tag),
            CommandSpec::with_shortcut("skip", '>', Op::Tally),
        ])
        .unwrap_err();
        assert!(matches!(err, RegistrationError::ShortcutCollision { .. }));
    }

    #[test]
    fn test_empty_name_without_shortcut() {
        let err = CommandTable::build(&[CommandSpec::new("", Op::Quit)]).unwrap_err();
        assert_eq!(err, RegistrationError::NoShortcut);
    }

    #[test]
    fn test_summary_format() {
        let table = CommandTable::build(&[
            CommandSpec::new("quit", Op::Quit),
            CommandSpec::new("tag", Op::Tag),
            CommandSpec::new("tally", Op::Tally),
            CommandSpec::with_shortcut("add tags", 'x', Op::Toggle),
        ])
        .unwrap();
        assert_eq!(table.summary(), "(q)uit (t)ag (T)ally (x)add tags");
        let keys: Vec<char> = table.shortcuts().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!['q', 't', 'T', 'x']);
    }

    // ── Dispatch loop ───────────────────────────────────────────────────────

    struct Counter {
        lifecycle: Lifecycle,
        count: u32,
    }

    #[derive(Debug, Clone, Copy)]
    enum CounterCommand {
        Increment,
        Quit,
    }

    #[async_trait]
    impl Screen for Counter {
        type Command = CounterCommand;

        fn commands() -> &'static CommandTable<CounterCommand> {
            static TABLE: OnceLock<CommandTable<CounterCommand>> = OnceLock::new();
            TABLE.get_or_init(|| {
                CommandTable::build(&[
                    CommandSpec::new("increment", CounterCommand::Increment),
                    CommandSpec::new("quit", CounterCommand::Quit),
                ])
                .unwrap()
            })
        }

        fn render(&self, _app: &App) -> String {
            format!("count={}", self.count)
        }

        fn lifecycle(&self) -> &Lifecycle {
            &self.lifecycle
        }

        async fn execute(
            &mut self,
            command: CounterCommand,
            _app: &mut App,
            _console: &mut dyn Console,
        ) -> io::Result<()> {
            match command {
                CounterCommand::Increment => self.count += 1,
                CounterCommand::Quit => self.lifecycle.stop(),
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_loop_dispatches_and_ignores_unknown_keys() {
        let mut app = test_app([]);
        let mut console = ScriptedConsole::with_keys("ixi?q");
        let mut screen = Counter {
            lifecycle: Lifecycle::default(),
            count: 0,
        };

        run(&mut screen, &mut app, &mut console).await.unwrap();

        assert_eq!(screen.count, 2);
        assert!(!screen.lifecycle().is_running());
        // One redraw per dispatched command, none for ignored keys
        assert_eq!(console.frames.len(), 3);
        assert!(console.frames[0].starts_with("(i)ncrement (q)uit\n"));
        assert!(console.frames[2].ends_with("count=2"));
        assert!(console.keys_left() == 0);
    }

    #[tokio::test]
    async fn test_stopped_screen_never_reads() {
        let mut app = test_app([]);
        let mut console = ScriptedConsole::with_keys("");
        let mut screen = Counter {
            lifecycle: Lifecycle::stopped(),
            count: 0,
        };

        run(&mut screen, &mut app, &mut console).await.unwrap();
        assert!(console.frames.is_empty());
    }

    #[tokio::test]
    async fn test_console_error_propagates() {
        let mut app = test_app([]);
        // Script runs dry without a quit: the console reports an interrupt
        let mut console = ScriptedConsole::with_keys("ii");
        let mut screen = Counter {
            lifecycle: Lifecycle::default(),
            count: 0,
        };

        let err = run(&mut screen, &mut app, &mut console).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
        assert_eq!(screen.count, 2);
    }
}
