/// Available commands and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
  /// Whether the command expects an argument (`:store store-2`)
  pub takes_arg: bool,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "products",
    aliases: &["p", "product", "inventory"],
    description: "Browse the product catalog",
    takes_arg: false,
  },
  Command {
    name: "sales",
    aliases: &["s", "sale", "history"],
    description: "Browse sales history",
    takes_arg: false,
  },
  Command {
    name: "store",
    aliases: &["st", "scope"],
    description: "Switch store (no argument clears it)",
    takes_arg: true,
  },
  Command {
    name: "page",
    aliases: &["pg", "goto"],
    description: "Jump to a page number",
    takes_arg: true,
  },
  Command {
    name: "filter",
    aliases: &["fl", "where"],
    description: "Set a filter: filter <name> [value]; no value clears it",
    takes_arg: true,
  },
  Command {
    name: "refresh",
    aliases: &["r", "reload"],
    description: "Drop cached pages and reload",
    takes_arg: false,
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit storefront",
    takes_arg: false,
  },
];

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
  Products,
  Sales,
  Store(Option<String>),
  Page(u32),
  Filter { name: String, value: Option<String> },
  Refresh,
  Quit,
}

/// Resolve a command name or alias exactly
fn lookup(name: &str) -> Option<&'static Command> {
  COMMANDS
    .iter()
    .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Parse a submitted command line such as `page 3` or `store store-2`.
pub fn parse(input: &str) -> Option<AppCommand> {
  let mut parts = input.split_whitespace();
  let name = parts.next()?.to_lowercase();
  let arg = parts.next();
  let rest = parts.collect::<Vec<_>>().join(" ");

  match lookup(&name)?.name {
    "products" => Some(AppCommand::Products),
    "sales" => Some(AppCommand::Sales),
    "store" => Some(AppCommand::Store(arg.map(String::from))),
    "page" => arg
      .and_then(|a| a.parse::<u32>().ok())
      .filter(|page| *page >= 1)
      .map(AppCommand::Page),
    "filter" => arg.map(|name| AppCommand::Filter {
      name: name.to_string(),
      value: (!rest.is_empty()).then_some(rest),
    }),
    "refresh" => Some(AppCommand::Refresh),
    "quit" => Some(AppCommand::Quit),
    _ => None,
  }
}

/// Get autocomplete suggestions for a given input.
///
/// Only the command word is matched; once an argument is being typed the
/// suggestions narrow to the command it belongs to.
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.trim_start().to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  if let Some((word, _)) = input_lower.split_once(char::is_whitespace) {
    return lookup(word)
      .filter(|cmd| cmd.takes_arg)
      .into_iter()
      .collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    // Exact match on name
    if cmd.name == input_lower {
      matches.push((cmd, 0)); // Highest priority
      continue;
    }

    // Exact match on alias
    if cmd.aliases.contains(&input_lower.as_str()) {
      matches.push((cmd, 1));
      continue;
    }

    // Prefix match on name
    if cmd.name.starts_with(&input_lower) {
      matches.push((cmd, 2));
      continue;
    }

    // Prefix match on alias
    if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      matches.push((cmd, 3));
      continue;
    }

    // Fuzzy match (contains)
    if cmd.name.contains(&input_lower) {
      matches.push((cmd, 4));
      continue;
    }

    // Fuzzy match on alias
    if cmd.aliases.iter().any(|a| a.contains(&input_lower)) {
      matches.push((cmd, 5));
    }
  }

  // Sort by priority
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    let suggestions = get_suggestions("");
    assert_eq!(suggestions.len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match() {
    let suggestions = get_suggestions("sales");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "sales");
  }

  #[test]
  fn test_alias_match() {
    let suggestions = get_suggestions("p");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "products");
  }

  #[test]
  fn test_prefix_match() {
    let suggestions = get_suggestions("prod");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "products");
  }

  #[test]
  fn test_fuzzy_match() {
    let suggestions = get_suggestions("fresh");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "refresh");
  }

  #[test]
  fn test_suggestions_while_typing_argument() {
    let suggestions = get_suggestions("store sto");
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].name, "store");

    assert!(get_suggestions("quit now").is_empty());
  }

  #[test]
  fn test_parse_commands() {
    assert_eq!(parse("products"), Some(AppCommand::Products));
    assert_eq!(parse("history"), Some(AppCommand::Sales));
    assert_eq!(parse("page 3"), Some(AppCommand::Page(3)));
    assert_eq!(parse("goto 0"), None);
    assert_eq!(parse("page x"), None);
    assert_eq!(
      parse("store store-2"),
      Some(AppCommand::Store(Some("store-2".into())))
    );
    assert_eq!(parse("store"), Some(AppCommand::Store(None)));
    assert_eq!(parse("Quit"), Some(AppCommand::Quit));
    assert_eq!(
      parse("filter supplier acme foods"),
      Some(AppCommand::Filter {
        name: "supplier".into(),
        value: Some("acme foods".into()),
      })
    );
    assert_eq!(
      parse("where supplier"),
      Some(AppCommand::Filter {
        name: "supplier".into(),
        value: None,
      })
    );
    assert_eq!(parse("filter"), None);
    assert_eq!(parse("bogus"), None);
    assert_eq!(parse("   "), None);
  }
}
