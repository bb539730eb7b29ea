// src/commands/registry.rs
use indexmap::IndexMap;

use super::types::Command;

/// Built-ins in registration order.
pub struct CommandRegistry {
    commands: IndexMap<&'static str, Box<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: IndexMap::new(),
        }
    }

    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name(), cmd);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.values().map(|c| c.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.commands.keys().copied().collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

use super::alias_cmd::AliasCommand;
use super::cat::CatCommand;
use super::cd::CdCommand;
use super::clear_cmd::ClearCommand;
use super::cp::CpCommand;
use super::curl::CurlCommand;
use super::echo::EchoCommand;
use super::env::{EnvCommand, ExportCommand};
use super::find::FindCommand;
use super::grep::GrepCommand;
use super::head::HeadCommand;
use super::help_cmd::HelpCommand;
use super::history_cmd::HistoryCommand;
use super::ls::LsCommand;
use super::mkdir::MkdirCommand;
use super::mv::MvCommand;
use super::pwd::PwdCommand;
use super::rm::RmCommand;
use super::rmdir_cmd::RmdirCommand;
use super::tail::TailCommand;
use super::touch::TouchCommand;
use super::unalias_cmd::UnaliasCommand;
use super::wc::WcCommand;

/// Register every built-in.
pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.register(Box::new(LsCommand));
    registry.register(Box::new(CdCommand));
    registry.register(Box::new(PwdCommand));
    registry.register(Box::new(CatCommand));
    registry.register(Box::new(MkdirCommand));
    registry.register(Box::new(RmdirCommand));
    registry.register(Box::new(RmCommand));
    registry.register(Box::new(CpCommand));
    registry.register(Box::new(MvCommand));
    registry.register(Box::new(TouchCommand));
    registry.register(Box::new(FindCommand));
    registry.register(Box::new(GrepCommand));
    registry.register(Box::new(HeadCommand));
    registry.register(Box::new(TailCommand));
    registry.register(Box::new(WcCommand));
    registry.register(Box::new(EchoCommand));
    registry.register(Box::new(AliasCommand));
    registry.register(Box::new(UnaliasCommand));
    registry.register(Box::new(HistoryCommand));
    registry.register(Box::new(ExportCommand));
    registry.register(Box::new(EnvCommand));
    registry.register(Box::new(CurlCommand));
    registry.register(Box::new(ClearCommand));
    registry.register(Box::new(HelpCommand));
}

/// Create a registry holding every built-in.
pub fn create_builtin_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_registered_in_order() {
        let registry = create_builtin_registry();
        let names = registry.names();
        assert_eq!(names.first(), Some(&"ls"));
        assert_eq!(names.last(), Some(&"help"));
        for name in ["cd", "grep", "alias", "history", "curl"] {
            assert!(registry.contains(name), "missing {}", name);
        }
        assert!(registry.get("frobnicate").is_none());
    }
}
