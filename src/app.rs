use crate::api::{Products, RetailClient, Sales};
use crate::browse::{BrowseSettings, PageSource};
use crate::commands::{self, AppCommand};
use crate::config::Config;
use crate::event::{Event, EventHandler, TICK_RATE};
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::view::{View, ViewAction};
use crate::ui::views::ResourceListView;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use tracing::{info, warn};

/// Root views reachable through `:` commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ViewKind {
  #[default]
  Products,
  Sales,
}

/// Main application state
pub struct App {
  config: Config,
  client: Arc<RetailClient>,
  settings: BrowseSettings,
  title: String,

  /// The single root view; replacing it drops its controller
  view: Box<dyn View>,

  command: CommandInput,
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, kind: ViewKind, store: Option<String>) -> Result<Self> {
    let client = Arc::new(RetailClient::new(&config)?);
    let settings = BrowseSettings::from(&config.browse);
    let title = config
      .title
      .clone()
      .unwrap_or_else(|| client.host().to_string());

    let view = build_view(kind, &client, &settings, store);

    Ok(Self {
      config,
      client,
      settings,
      title,
      view,
      command: CommandInput::new(),
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = self.event_loop().await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(&mut self) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(TICK_RATE);

    // Serve the initial page before the first frame
    self.view.tick();

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      // A finished request redraws right away instead of on the next tick
      let event = tokio::select! {
        event = events.next() => event,
        _ = self.view.next_completion() => Some(Event::Tick),
      };

      match event {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Resize) | Some(Event::Tick) => {}
        None => break,
      }

      self.view.tick();
    }

    Ok(())
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    // Typed text in a view overlay must not open the command line
    if self.command.is_active() || !self.view.captures_input() {
      match self.command.handle_key(key) {
        KeyResult::Handled | KeyResult::Event(CommandEvent::Cancelled) => return,
        KeyResult::Event(CommandEvent::Submitted(line)) => {
          self.execute_command(&line);
          return;
        }
        KeyResult::NotHandled => {}
      }
    }

    match self.view.handle_key(key) {
      ViewAction::None => {}
      ViewAction::CycleStore => {
        let next = next_store(&self.config.stores, self.view.store());
        info!(store = ?next, "switching store");
        self.view.set_store(next);
      }
      ViewAction::Quit => self.should_quit = true,
    }
  }

  fn execute_command(&mut self, line: &str) {
    let Some(command) = commands::parse(line) else {
      warn!(command = line, "unknown command");
      return;
    };

    match command {
      AppCommand::Products => self.open(ViewKind::Products),
      AppCommand::Sales => self.open(ViewKind::Sales),
      AppCommand::Store(store) => {
        info!(store = ?store, "switching store");
        self.view.set_store(store);
      }
      AppCommand::Page(page) => self.view.go_to_page(page),
      AppCommand::Filter { name, value } => {
        info!(filter = %name, value = ?value, "setting filter");
        self.view.set_filter(name, value);
      }
      AppCommand::Refresh => self.view.refresh(),
      AppCommand::Quit => self.should_quit = true,
    }
  }

  /// Replace the root view, keeping the current store
  fn open(&mut self, kind: ViewKind) {
    let store = self.view.store().map(String::from);
    info!(view = ?kind, store = ?store, "opening view");
    self.view = build_view(kind, &self.client, &self.settings, store);
  }

  // Accessors for UI rendering
  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn view(&self) -> &dyn View {
    self.view.as_ref()
  }

  pub fn view_mut(&mut self) -> &mut dyn View {
    self.view.as_mut()
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command
  }
}

fn build_view(
  kind: ViewKind,
  client: &Arc<RetailClient>,
  settings: &BrowseSettings,
  store: Option<String>,
) -> Box<dyn View> {
  match kind {
    ViewKind::Products => {
      let source: Arc<dyn PageSource<Products>> = client.clone();
      Box::new(ResourceListView::new(source, settings.clone(), store))
    }
    ViewKind::Sales => {
      let source: Arc<dyn PageSource<Sales>> = client.clone();
      Box::new(ResourceListView::new(source, settings.clone(), store))
    }
  }
}

/// Cycle through the configured stores, then "no store", then around again
fn next_store(stores: &[String], current: Option<&str>) -> Option<String> {
  let next = match current {
    None => stores.first(),
    Some(current) => match stores.iter().position(|s| s == current) {
      Some(i) => stores.get(i + 1),
      None => stores.first(),
    },
  };
  next.cloned()
}
