use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use portfolio_catalog::BuiltinCatalog;
use portfolio_forms::{Field, FormAssistant};
use portfolio_protocol::{Theme, TimedEvent, UiEvent};
use portfolio_search::FilterState;
use portfolio_store::{FileBackend, KvStore};
use portfolio_view::{
    resource_count, HideCompleted, Outcome, Progress, ThemeToggle, ViewFlavor, ViewProjector,
};
use serde_json::json;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

mod config;
mod text;

use config::Config;

#[derive(Parser)]
#[command(name = "portfolio")]
#[command(about = "Course checklist, resource finder and contact form", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Print the render model as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Config file (default: ./portfolio.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the course checklist
    Checklist(ChecklistArgs),

    /// Flip one checklist step between done and not done
    Toggle {
        /// Step id, e.g. u2-s3
        id: String,
    },

    /// Search the resource list
    Resources(ResourcesArgs),

    /// List every resource tag
    Tags,

    /// Show checklist progress
    Progress,

    /// Show or change the colour theme
    Theme(ThemeArgs),

    /// Fill in, check and submit the contact form
    Contact(ContactArgs),

    /// Inspect or discard the saved contact-form draft
    Draft {
        #[arg(value_enum, default_value_t = DraftAction::Show)]
        action: DraftAction,
    },

    /// Feed a timestamped event script through the checklist or resource view
    Replay(ReplayArgs),
}

#[derive(Args)]
struct ChecklistArgs {
    /// Only show steps containing this text
    #[arg(long, short)]
    query: Option<String>,

    /// Hide completed steps from now on
    #[arg(long, conflicts_with = "show_completed")]
    hide_completed: bool,

    /// Show completed steps again
    #[arg(long)]
    show_completed: bool,
}

#[derive(Args)]
struct ResourcesArgs {
    /// Only show resources whose title or description contains this text
    #[arg(long, short)]
    query: Option<String>,

    /// Require a tag (repeatable; all given tags must match)
    #[arg(long = "tag", short)]
    tags: Vec<String>,
}

#[derive(Args)]
struct ThemeArgs {
    #[command(subcommand)]
    action: Option<ThemeAction>,

    /// Pretend the operating system prefers a dark scheme
    #[arg(long, global = true)]
    os_dark: bool,
}

#[derive(Subcommand, Clone, Copy)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Choose a theme explicitly
    Set {
        #[arg(value_enum)]
        theme: ThemeFlag,
    },
}

#[derive(Copy, Clone, ValueEnum)]
enum ThemeFlag {
    Light,
    Dark,
}

impl ThemeFlag {
    const fn as_domain(self) -> Theme {
        match self {
            ThemeFlag::Light => Theme::Light,
            ThemeFlag::Dark => Theme::Dark,
        }
    }
}

#[derive(Args)]
struct ContactArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    topic: Option<String>,
    #[arg(long)]
    message: Option<String>,

    /// Validate and send; clears the draft on success
    #[arg(long)]
    submit: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum DraftAction {
    Show,
    Clear,
}

#[derive(Args)]
struct ReplayArgs {
    /// JSON array of events, each with an `at_ms` offset and an `action`
    script: PathBuf,

    #[arg(long, value_enum, default_value_t = FlavorFlag::Checklist)]
    view: FlavorFlag,
}

#[derive(Copy, Clone, ValueEnum)]
enum FlavorFlag {
    Checklist,
    Resources,
}

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    print_stdout(&serde_json::to_string_pretty(value)?)
}

/// Everything a command needs: settings, the durable store and the output mode.
struct App {
    config: Config,
    store: KvStore,
    json: bool,
}

impl App {
    fn new(config: Config, json: bool) -> Self {
        let dir = config.store_dir();
        log::debug!("Store directory: {}", dir.display());
        Self {
            store: KvStore::new(FileBackend::new(dir)),
            config,
            json,
        }
    }

    fn projector(&self, flavor: ViewFlavor) -> Result<ViewProjector> {
        let which = match flavor {
            ViewFlavor::Checklist => BuiltinCatalog::Checklist,
            ViewFlavor::Resources => BuiltinCatalog::Resources,
        };
        let catalog = Rc::new(self.config.catalog(which)?);
        let state = FilterState::load(catalog, self.store.clone());
        Ok(ViewProjector::new(state, flavor, self.config.projector()))
    }

    fn os_theme(&self, os_dark: bool) -> Theme {
        if os_dark {
            Theme::Dark
        } else {
            self.config.os_theme.unwrap_or(Theme::Light)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = Config::discover(cli.config.as_deref())?;
    let app = App::new(config, cli.json);

    match cli.command {
        Commands::Checklist(args) => run_checklist(&app, args),
        Commands::Toggle { id } => run_toggle(&app, &id),
        Commands::Resources(args) => run_resources(&app, args),
        Commands::Tags => run_tags(&app),
        Commands::Progress => run_progress(&app),
        Commands::Theme(args) => run_theme(&app, args),
        Commands::Contact(args) => run_contact(&app, args),
        Commands::Draft { action } => run_draft(&app, action),
        Commands::Replay(args) => run_replay(&app, args),
    }
}

/// Apply a typed query without waiting out the debounce window.
fn apply_query(projector: &mut ViewProjector, query: Option<String>) {
    if let Some(text) = query {
        projector.handle(UiEvent::Search { text }, Instant::now());
        projector.flush();
    }
}

fn run_checklist(app: &App, args: ChecklistArgs) -> Result<()> {
    let mut hide = HideCompleted::load(app.store.clone());
    if args.hide_completed {
        hide.set(true);
    } else if args.show_completed {
        hide.set(false);
    }

    let mut projector = app.projector(ViewFlavor::Checklist)?;
    apply_query(&mut projector, args.query);
    let progress = Progress::from_view(projector.view());
    let shown = hide.apply(projector.view());

    if app.json {
        return print_json(&json!({
            "view": shown,
            "progress": progress,
            "hide_completed": hide.is_enabled(),
        }));
    }
    print_stdout(&text::view(&shown))?;
    print_stdout(&format!("\n{}", text::progress(progress)))
}

fn run_toggle(app: &App, id: &str) -> Result<()> {
    let mut projector = app.projector(ViewFlavor::Checklist)?;
    if !projector.state().catalog().contains(id) {
        bail!("Unknown step: {id}");
    }
    let outcome = projector.handle(
        UiEvent::ToggleCompletion {
            entry_id: id.to_string(),
        },
        Instant::now(),
    );
    log::debug!("toggle {id}: {outcome:?}");
    let done = projector.state().is_complete(id);
    let progress = Progress::from_view(projector.view());

    if app.json {
        return print_json(&json!({ "id": id, "complete": done, "progress": progress }));
    }
    let status = if done { "done" } else { "not done" };
    print_stdout(&format!("{id}: {status}\n{}", text::progress(progress)))
}

fn run_resources(app: &App, args: ResourcesArgs) -> Result<()> {
    let mut projector = app.projector(ViewFlavor::Resources)?;
    let known = projector.state().catalog().all_tags().join(", ");
    let now = Instant::now();
    for tag in args.tags {
        if !projector.state().catalog().all_tags().contains(&tag.as_str()) {
            bail!("Unknown tag: {tag} (known: {known})");
        }
        projector.handle(UiEvent::ToggleTag { tag }, now);
    }
    apply_query(&mut projector, args.query);
    let count = resource_count(projector.view());

    if app.json {
        return print_json(&json!({ "view": projector.view(), "count": count }));
    }
    print_stdout(&text::view(projector.view()))?;
    let noun = if count == 1 { "resource" } else { "resources" };
    print_stdout(&format!("\n{count} {noun}"))
}

fn run_tags(app: &App) -> Result<()> {
    let catalog = app.config.catalog(BuiltinCatalog::Resources)?;
    let tags = catalog.all_tags();
    if app.json {
        return print_json(&json!(tags));
    }
    print_stdout(&tags.join("\n"))
}

fn run_progress(app: &App) -> Result<()> {
    let projector = app.projector(ViewFlavor::Checklist)?;
    let progress = Progress::from_view(projector.view());
    if app.json {
        return print_json(&json!(progress));
    }
    print_stdout(&text::progress(progress))
}

fn run_theme(app: &App, args: ThemeArgs) -> Result<()> {
    let mut toggle = ThemeToggle::init(app.store.clone(), app.os_theme(args.os_dark));
    match args.action.unwrap_or(ThemeAction::Show) {
        ThemeAction::Show => {}
        ThemeAction::Toggle => {
            toggle.toggle();
        }
        ThemeAction::Set { theme } => toggle.set(theme.as_domain()),
    }

    if app.json {
        return print_json(&json!({
            "theme": toggle.current(),
            "saved": toggle.stored().is_some(),
            "button_label": toggle.button_label(),
            "aria_pressed": toggle.aria_pressed(),
        }));
    }
    print_stdout(&text::theme(&toggle))
}

fn run_contact(app: &App, args: ContactArgs) -> Result<()> {
    let form_config = app.config.form();
    let mut assistant = FormAssistant::new(app.store.clone(), form_config);
    let now = Instant::now();
    let inputs = [
        (Field::Name, args.name),
        (Field::Email, args.email),
        (Field::Topic, args.topic),
        (Field::Message, args.message),
    ];
    for (field, value) in inputs {
        if let Some(value) = value {
            assistant.input(field, &value, now);
        }
    }
    // the process is about to exit, so let the autosave window elapse now
    assistant.tick(now + form_config.draft_debounce);

    if !args.submit {
        if app.json {
            return print_json(&json!({
                "values": assistant.values(),
                "errors": messages(&assistant),
                "characters": assistant.char_count().to_string(),
            }));
        }
        return print_stdout(&text::form(&assistant));
    }

    match assistant.submit() {
        Ok(sent) => {
            if app.json {
                return print_json(&json!({ "sent": true, "values": sent }));
            }
            print_stdout(&format!(
                "Thanks, {}! Your message has been sent and the draft cleared.",
                sent.name.trim()
            ))
        }
        Err(err) => {
            if app.json {
                print_json(&json!({
                    "sent": false,
                    "errors": messages(&assistant),
                    "focus": assistant.first_invalid(),
                }))?;
            } else {
                print_stdout(&text::form(&assistant))?;
            }
            Err(err.into())
        }
    }
}

fn messages(assistant: &FormAssistant) -> Vec<&'static str> {
    assistant.errors().iter().map(|m| m.text()).collect()
}

fn run_draft(app: &App, action: DraftAction) -> Result<()> {
    let mut assistant = FormAssistant::new(app.store.clone(), app.config.form());
    match action {
        DraftAction::Show => {
            let found = assistant.load_draft();
            if app.json {
                return print_json(&json!({ "draft": found.then(|| assistant.values().clone()) }));
            }
            if !found {
                return print_stdout("No saved draft.");
            }
            print_stdout(&text::form(&assistant))
        }
        DraftAction::Clear => {
            assistant.clear();
            if app.json {
                return print_json(&json!({ "cleared": true }));
            }
            print_stdout("Draft cleared.")
        }
    }
}

fn run_replay(app: &App, args: ReplayArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read {}", args.script.display()))?;
    let events: Vec<TimedEvent> =
        serde_json::from_str(&raw).context("Invalid event script")?;
    if events.windows(2).any(|pair| pair[1].at_ms < pair[0].at_ms) {
        bail!("Event script timestamps must not go backwards");
    }

    let flavor = match args.view {
        FlavorFlag::Checklist => ViewFlavor::Checklist,
        FlavorFlag::Resources => ViewFlavor::Resources,
    };
    let mut projector = app.projector(flavor)?;
    let start = Instant::now();
    let mut deferred = 0usize;
    let mut ignored = 0usize;
    for timed in &events {
        let now = start + Duration::from_millis(timed.at_ms);
        projector.tick(now);
        match projector.handle(timed.event.clone(), now) {
            Outcome::Deferred => deferred += 1,
            Outcome::Ignored => ignored += 1,
            Outcome::Changed | Outcome::Unchanged => {}
        }
    }
    // run the clock until nothing is pending
    if let Some(deadline) = projector.next_deadline() {
        projector.tick(deadline);
    }
    log::info!(
        "Replayed {} events ({deferred} debounced, {ignored} ignored)",
        events.len()
    );

    if app.json {
        return print_json(&json!({
            "view": projector.view(),
            "events": events.len(),
            "renders": projector.render_count(),
        }));
    }
    print_stdout(&text::view(projector.view()))?;
    print_stdout(&format!(
        "\nReplayed {} events, {} renders.",
        events.len(),
        projector.render_count()
    ))
}
