//! Line-based command host for running the watcher from a terminal.
//!
//! Each input line names a command; responses are written to stdout.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use market::{TraitAskMap, trait_floors};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::commands::{Command, CommandSurface, Interaction, TraitFloorFlow};
use crate::query::format_stars;

#[derive(Default)]
pub struct ConsoleSurface {
    commands: BTreeMap<&'static str, Command>,
}

impl CommandSurface for ConsoleSurface {
    fn add_command(&mut self, command: Command) {
        info!(command = command.name, "command registered");
        self.commands.insert(command.name, command);
    }
}

impl ConsoleSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.commands.keys().copied().collect()
    }

    /// Run one command line. Unknown names and `help` list what is available.
    pub async fn dispatch(&self, line: &str, interaction: &dyn Interaction) -> anyhow::Result<()> {
        let name = line.trim().trim_start_matches('/');

        match self.commands.get(name) {
            Some(command) => command.handler.invoke(interaction).await,
            None => interaction.send_message(self.help(name)).await,
        }
    }

    fn help(&self, requested: &str) -> String {
        let mut out = String::new();
        if !requested.is_empty() && requested != "help" {
            out.push_str(&format!("unknown command '{requested}'\n"));
        }
        out.push_str("available commands:\n");
        for c in self.commands.values() {
            out.push_str(&format!("  {} - {}\n", c.name, c.description));
        }
        out
    }

    /// Serve commands until `reader` is exhausted.
    pub async fn serve<R>(&self, reader: R, interaction: &dyn Interaction) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Err(e) = self.dispatch(&line, interaction).await {
                warn!(error = ?e, command = %line.trim(), "command failed");
            }
        }

        Ok(())
    }
}

/// Prints responses to stdout.
#[derive(Clone, Default)]
pub struct StdoutInteraction;

#[async_trait]
impl Interaction for StdoutInteraction {
    async fn send_message(&self, message: String) -> anyhow::Result<()> {
        println!("{message}");
        Ok(())
    }
}

/// Non-interactive trait floor flow: reports every value's floor for every retained collection.
#[derive(Clone, Default)]
pub struct ConsoleFloorFlow;

#[async_trait]
impl TraitFloorFlow for ConsoleFloorFlow {
    async fn start(
        &self,
        asks: HashMap<String, TraitAskMap>,
        interaction: &dyn Interaction,
    ) -> anyhow::Result<()> {
        interaction.send_message(render_trait_floors(&asks)).await
    }
}

pub fn render_trait_floors(asks: &HashMap<String, TraitAskMap>) -> String {
    if asks.is_empty() {
        return "No collections with trait queries enabled have been refreshed yet.".to_string();
    }

    let mut names: Vec<&String> = asks.keys().collect();
    names.sort();

    let mut out = String::new();
    for name in names {
        out.push_str(&format!("**{name}**\n"));
        for (trait_name, values) in trait_floors(&asks[name]) {
            for (value, floor) in values {
                out.push_str(&format!(
                    "- {trait_name}: {value} ({} $STARS)\n",
                    format_stars(floor)
                ));
            }
        }
    }
    out
}
