//! The command interpreter: terse command lines to records.

use std::collections::BTreeMap;

use fieldlog_format::{DocumentFormat, tokenize};
use fieldlog_model::Record;
use tracing::debug;

use crate::command::{Command, CommandSpec};
use crate::error::CommandError;

/// Interprets one-line commands like `f 123:45:00 85:30:15 p 1` into
/// records, using the same field codecs as the document grammar.
pub struct CommandInterpreter {
    commands: BTreeMap<String, Command>,
}

impl CommandInterpreter {
    pub fn new(
        document_format: &DocumentFormat,
        specs: impl IntoIterator<Item = CommandSpec>,
    ) -> Result<CommandInterpreter, CommandError> {
        let mut commands = BTreeMap::new();
        for spec in specs {
            let command = Command::new(spec, document_format)?;
            let name = command.name().to_string();
            if commands.insert(name.clone(), command).is_some() {
                return Err(CommandError::DuplicateCommand { name });
            }
        }
        Ok(CommandInterpreter { commands })
    }

    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Interpret one command line. Returns `None` for blank input.
    ///
    /// The first token names the command. When it is not a known name but
    /// ends in a digit run (like `f123`), the digits are split off and
    /// become the first argument.
    pub fn interpret(&self, text: &str) -> Result<Option<Record>, CommandError> {
        let tokens = tokenize(text).map_err(|source| CommandError::Tokenize { source })?;
        let Some(first) = tokens.first() else {
            return Ok(None);
        };

        if let Some(command) = self.commands.get(first.as_str()) {
            debug!(command = first.as_str(), "interpreting command");
            return command.invoke(&tokens[1..]).map(Some);
        }

        if let Some((name, digits)) = split_compound(first)
            && let Some(command) = self.commands.get(name)
        {
            debug!(command = name, "interpreting compound command");
            let mut args = Vec::with_capacity(tokens.len());
            args.push(digits.to_string());
            args.extend_from_slice(&tokens[1..]);
            return command.invoke(&args).map(Some);
        }

        Err(CommandError::Unrecognized {
            name: first.clone(),
        })
    }
}

/// Split a token of the form `<non-digits><digits>` into its two parts.
fn split_compound(token: &str) -> Option<(&str, &str)> {
    let index = token.find(|c: char| c.is_ascii_digit())?;
    let (head, tail) = token.split_at(index);
    if head.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((head, tail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_splitting() {
        assert_eq!(split_compound("f123"), Some(("f", "123")));
        assert_eq!(split_compound("fix1"), Some(("fix", "1")));
        assert_eq!(split_compound("123"), None);
        assert_eq!(split_compound("f"), None);
        assert_eq!(split_compound("f12x"), None);
    }
}
