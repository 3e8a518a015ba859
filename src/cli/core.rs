//! Shell context, command dispatch, and the dashboard/manage renderers.

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDate};
use colored::Colorize;
use crossterm::{cursor, terminal, ExecutableCommand};
use dialoguer::{theme::ColorfulTheme, Select};
use strsim::levenshtein;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    config::{Config, ConfigManager},
    currency::format_usd,
    errors::LedgerError,
    ledger::{
        biggest_category_insight, filter_and_sort, group_by_category, totals, upcoming_renewals,
        CategoryFilter, Ledger, LedgerCommand, SortKey, Subscription, SubscriptionDraft,
    },
    storage::{JsonStorage, SubscriptionStore},
};

use super::forms::{FormResult, SubscriptionWizard};
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::ui::banner::Banner;
use super::ui::breakdown::render_breakdown;
use super::ui::table_renderer::{Table, TableColumn};

/// Errors that abort the whole shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Errors reported to the user without leaving the shell loop.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

struct CommandSpec {
    name: &'static str,
    aliases: &'static [&'static str],
    usage: &'static str,
    description: &'static str,
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "dashboard",
        aliases: &[],
        usage: "dashboard",
        description: "Spend totals, category breakdown, upcoming renewals",
    },
    CommandSpec {
        name: "manage",
        aliases: &["list"],
        usage: "manage",
        description: "Full subscription list with the active filter and sort",
    },
    CommandSpec {
        name: "add",
        aliases: &[],
        usage: "add [<name> <category> <billing> <price> <renew-day>]",
        description: "Add a subscription (wizard when no arguments are given)",
    },
    CommandSpec {
        name: "edit",
        aliases: &[],
        usage: "edit <name|#>",
        description: "Edit a subscription; deleting is offered while editing",
    },
    CommandSpec {
        name: "delete",
        aliases: &["remove"],
        usage: "delete <name|#>",
        description: "Delete a subscription",
    },
    CommandSpec {
        name: "toggle",
        aliases: &[],
        usage: "toggle <name|#>",
        description: "Pause or resume a subscription",
    },
    CommandSpec {
        name: "filter",
        aliases: &[],
        usage: "filter <category|all>",
        description: "Set the manage view category filter",
    },
    CommandSpec {
        name: "sort",
        aliases: &[],
        usage: "sort <cost|name|renew>",
        description: "Set the manage view sort order",
    },
    CommandSpec {
        name: "config",
        aliases: &[],
        usage: "config [limit <n>|plain <on|off>|quiet <on|off>]",
        description: "Show or change configuration",
    },
    CommandSpec {
        name: "start",
        aliases: &[],
        usage: "start",
        description: "Leave the landing view and persist the current list",
    },
    CommandSpec {
        name: "help",
        aliases: &[],
        usage: "help",
        description: "Show available commands",
    },
    CommandSpec {
        name: "exit",
        aliases: &["quit"],
        usage: "exit",
        description: "Exit the shell",
    },
];

/// Shared state for one shell session.
pub struct ShellContext {
    mode: CliMode,
    theme: ColorfulTheme,
    storage: JsonStorage,
    config_manager: ConfigManager,
    pub config: Config,
    pub ledger: Ledger,
    pub started: bool,
    pub filter: CategoryFilter,
    pub sort: SortKey,
    pub running: bool,
    pub last_command: Option<String>,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let storage = JsonStorage::new_default()?;
        let config_manager = ConfigManager::new()?;
        Self::from_parts(mode, storage, config_manager)
    }

    /// Builds a context rooted at an explicit directory; used by tests.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let storage = JsonStorage::new(Some(base.clone()))?;
        let config_manager = ConfigManager::with_base_dir(base)?;
        Self::from_parts(mode, storage, config_manager)
    }

    fn from_parts(
        mode: CliMode,
        storage: JsonStorage,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        output::set_preferences(OutputPreferences {
            plain_mode: config.plain_mode,
            quiet_mode: config.quiet_mode,
        });

        let outcome = storage.load_or_sample();
        tracing::debug!(
            count = outcome.subscriptions.len(),
            started = outcome.started,
            "shell context ready"
        );

        Ok(Self {
            mode,
            theme: ColorfulTheme::default(),
            storage,
            config_manager,
            config,
            ledger: Ledger::from_subscriptions(outcome.subscriptions),
            started: outcome.started,
            filter: CategoryFilter::default(),
            sort: SortKey::default(),
            running: true,
            last_command: None,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        "billguard> ".to_string()
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        COMMANDS
            .iter()
            .flat_map(|spec| std::iter::once(spec.name).chain(spec.aliases.iter().copied()))
            .collect()
    }

    /// Printed once when an interactive session opens.
    pub(crate) fn greet(&self) {
        if !self.started {
            Banner::render();
        } else {
            output::info(format!(
                "Tracking {} subscriptions ({} active). Type `help` for commands.",
                self.ledger.len(),
                self.ledger.active_count()
            ));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        output::error(err);
    }

    pub(crate) fn confirm_exit(&self) -> bool {
        if self.mode != CliMode::Interactive {
            return true;
        }
        cli_io::confirm_action(&self.theme, "Exit Billguard?", true).unwrap_or(true)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        match command {
            "dashboard" => self.cmd_dashboard()?,
            "manage" | "list" => self.cmd_manage()?,
            "add" => self.cmd_add(args)?,
            "edit" => self.cmd_edit(args)?,
            "delete" | "remove" => self.cmd_delete(args)?,
            "toggle" => self.cmd_toggle(args)?,
            "filter" => self.cmd_filter(args)?,
            "sort" => self.cmd_sort(args)?,
            "config" => self.cmd_config(args)?,
            "start" => self.cmd_start()?,
            "help" => self.cmd_help(),
            "exit" | "quit" => return Ok(LoopControl::Exit),
            _ => return Err(CommandError::InvalidArguments(unknown_command(raw))),
        }
        Ok(LoopControl::Continue)
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    /// Persists the full list; the list is the unit of persistence, written
    /// after every mutation. A first successful save leaves the landing view.
    fn persist(&mut self) -> CommandResult {
        self.storage.save(&self.ledger.subscriptions)?;
        self.started = true;
        Ok(())
    }

    fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        output::set_preferences(OutputPreferences {
            plain_mode: self.config.plain_mode,
            quiet_mode: self.config.quiet_mode,
        });
        Ok(())
    }

    fn cmd_config(&mut self, args: &[&str]) -> CommandResult {
        match args {
            [] => {
                output::section("Configuration");
                output::info(format!("locale   {}", self.config.locale));
                output::info(format!("currency {}", self.config.currency));
                output::info(format!("limit    {}", self.config.upcoming_limit));
                output::info(format!("plain    {}", self.config.plain_mode));
                output::info(format!("quiet    {}", self.config.quiet_mode));
                Ok(())
            }
            ["limit", value] => {
                let limit: usize = value.parse().map_err(|_| {
                    CommandError::InvalidArguments(format!("`{}` is not a count", value))
                })?;
                if limit == 0 {
                    return Err(CommandError::InvalidArguments(
                        "limit must be at least 1".into(),
                    ));
                }
                self.config.upcoming_limit = limit;
                self.persist_config()?;
                cli_io::print_success(format!("Dashboard now shows {} renewals.", limit));
                Ok(())
            }
            ["plain", value] => {
                let enabled = parse_switch(value)?;
                self.config.plain_mode = enabled;
                self.persist_config()?;
                cli_io::print_success(format!("plain mode {}.", on_off(enabled)));
                Ok(())
            }
            ["quiet", value] => {
                let enabled = parse_switch(value)?;
                self.config.quiet_mode = enabled;
                self.persist_config()?;
                cli_io::print_success(format!("quiet mode {}.", on_off(enabled)));
                Ok(())
            }
            _ => Err(CommandError::InvalidArguments(usage_for("config"))),
        }
    }

    fn gate_landing(&self) -> bool {
        if self.started {
            return false;
        }
        Banner::render();
        true
    }

    fn clear_screen(&self) {
        if self.mode != CliMode::Interactive || output::current_preferences().plain_mode {
            return;
        }
        let mut stdout = io::stdout();
        let _ = stdout.execute(terminal::Clear(terminal::ClearType::All));
        let _ = stdout.execute(cursor::MoveTo(0, 0));
        let _ = stdout.flush();
    }

    // ── views ──

    fn cmd_dashboard(&mut self) -> CommandResult {
        if self.gate_landing() {
            return Ok(());
        }
        self.clear_screen();
        let subs = &self.ledger.subscriptions;
        let spend = totals(subs);
        let grouped = group_by_category(subs);
        let today = self.today();

        output::section("Dashboard");
        output::info(format!(
            "Monthly {}   Per Year {}   Per Day {}",
            format_usd(spend.monthly),
            format_usd(spend.annual).bold(),
            format_usd(spend.daily)
        ));
        output::info(format!("{} active subscriptions", self.ledger.active_count()));

        if !grouped.is_empty() {
            output::section("Spend by Category");
            let plain = output::current_preferences().plain_mode;
            for line in render_breakdown(&grouped, spend.annual, plain) {
                println!("{}", line);
            }
        }

        output::section("Upcoming Renewals");
        let upcoming = upcoming_renewals(subs, today, self.config.upcoming_limit);
        if upcoming.is_empty() {
            output::info("Nothing coming up.");
        }
        for entry in &upcoming {
            let line = format!(
                "{:>3}d  {:<20} {} / {}",
                entry.days_left,
                entry.subscription.name,
                format_usd(entry.subscription.price),
                entry.subscription.billing.per_label()
            );
            if entry.is_urgent() {
                output::warning(line);
            } else {
                output::info(line);
            }
        }

        output::section("Insight");
        output::info(biggest_category_insight(&grouped, spend.annual));
        output::blank_line();
        Ok(())
    }

    fn cmd_manage(&mut self) -> CommandResult {
        if self.gate_landing() {
            return Ok(());
        }
        self.clear_screen();
        let today = self.today();
        let plain = output::current_preferences().plain_mode;
        let list = filter_and_sort(&self.ledger.subscriptions, self.filter, self.sort, today);

        output::section("Manage");
        output::info(format!(
            "Filter: {}   Sort: {}   {} shown",
            self.filter.label(),
            self.sort.label(),
            list.len()
        ));

        if list.is_empty() {
            output::info("No subscriptions here.");
            return Ok(());
        }

        let mut table = Table::new(
            vec![
                TableColumn::right("#"),
                TableColumn::left("Name"),
                TableColumn::left("Category"),
                TableColumn::left("Billing"),
                TableColumn::left("Renews"),
                TableColumn::right("Price"),
                TableColumn::right("Per Year"),
                TableColumn::left("Active"),
            ],
            plain,
        );
        for (index, sub) in list.iter().enumerate() {
            table.push_row(subscription_row(index, sub, today, plain));
        }
        println!("{}", table.render());
        output::info("Use `edit <name|#>`, `toggle <name|#>`, `filter <category|all>`, `sort <cost|name|renew>`.");
        Ok(())
    }

    fn cmd_help(&self) {
        output::section("Commands");
        let width = COMMANDS
            .iter()
            .map(|spec| spec.usage.len())
            .max()
            .unwrap_or(0);
        for spec in COMMANDS {
            let mut label = spec.usage.to_string();
            if !spec.aliases.is_empty() {
                label = format!("{} ({})", label, spec.aliases.join(", "));
            }
            println!("  {:<width$}  {}", label, spec.description, width = width + 12);
        }
        output::blank_line();
    }

    // ── mutations ──

    fn cmd_start(&mut self) -> CommandResult {
        if self.started {
            cli_io::print_info("Already tracking. Try `dashboard`.");
            return Ok(());
        }
        self.persist()?;
        cli_io::print_success(format!(
            "You're set. {} sample subscriptions are loaded; edit or delete them as you go.",
            self.ledger.len()
        ));
        self.cmd_dashboard()
    }

    fn cmd_add(&mut self, args: &[&str]) -> CommandResult {
        let draft = if args.is_empty() {
            if self.mode != CliMode::Interactive {
                return Err(CommandError::InvalidArguments(usage_for("add")));
            }
            let wizard = SubscriptionWizard::add(&self.theme, self.today().day());
            match wizard.run()? {
                FormResult::Saved(draft) => draft,
                FormResult::Deleted | FormResult::Cancelled => {
                    cli_io::print_info("Nothing added.");
                    return Ok(());
                }
            }
        } else {
            parse_draft_args(args)?
        };

        let name = draft.name.clone();
        self.ledger.apply(LedgerCommand::Add { draft })?;
        self.persist()?;
        cli_io::print_success(format!("Added `{}`.", name));
        Ok(())
    }

    fn cmd_edit(&mut self, args: &[&str]) -> CommandResult {
        if self.mode != CliMode::Interactive {
            return Err(CommandError::InvalidArguments(
                "edit is interactive; use add/delete/toggle in scripts".into(),
            ));
        }
        let Some(id) = self.resolve_target(args, "edit")? else {
            return Ok(());
        };
        let subscription = self
            .ledger
            .subscription(id)
            .ok_or_else(|| CommandError::Message(format!("no subscription with id {}", id)))?;
        let name = subscription.name.clone();
        let wizard = SubscriptionWizard::edit(&self.theme, SubscriptionDraft::from(subscription));

        match wizard.run()? {
            FormResult::Saved(draft) => {
                let new_name = draft.name.clone();
                self.ledger.apply(LedgerCommand::Update { id, draft })?;
                self.persist()?;
                cli_io::print_success(format!("Saved changes to `{}`.", new_name));
            }
            FormResult::Deleted => {
                self.ledger.apply(LedgerCommand::Remove { id })?;
                self.persist()?;
                cli_io::print_success(format!("Deleted `{}`.", name));
            }
            FormResult::Cancelled => cli_io::print_info("No changes made."),
        }
        Ok(())
    }

    fn cmd_delete(&mut self, args: &[&str]) -> CommandResult {
        let Some(id) = self.resolve_target(args, "delete")? else {
            return Ok(());
        };
        let name = self
            .ledger
            .subscription(id)
            .map(|sub| sub.name.clone())
            .unwrap_or_default();
        if self.mode == CliMode::Interactive
            && !cli_io::confirm_action(&self.theme, &format!("Delete `{}`?", name), false)?
        {
            cli_io::print_info("Kept it.");
            return Ok(());
        }
        self.ledger.apply(LedgerCommand::Remove { id })?;
        self.persist()?;
        cli_io::print_success(format!("Deleted `{}`.", name));
        Ok(())
    }

    fn cmd_toggle(&mut self, args: &[&str]) -> CommandResult {
        let Some(id) = self.resolve_target(args, "toggle")? else {
            return Ok(());
        };
        self.ledger.apply(LedgerCommand::Toggle { id })?;
        self.persist()?;
        let subscription = self
            .ledger
            .subscription(id)
            .ok_or_else(|| CommandError::Message(format!("no subscription with id {}", id)))?;
        if subscription.active {
            cli_io::print_success(format!("`{}` is active again.", subscription.name));
        } else {
            cli_io::print_success(format!(
                "`{}` is paused and no longer counted in totals.",
                subscription.name
            ));
        }
        Ok(())
    }

    fn cmd_filter(&mut self, args: &[&str]) -> CommandResult {
        if args.is_empty() {
            return Err(CommandError::InvalidArguments(usage_for("filter")));
        }
        self.filter = args[0]
            .parse::<CategoryFilter>()
            .map_err(CommandError::InvalidArguments)?;
        self.cmd_manage()
    }

    fn cmd_sort(&mut self, args: &[&str]) -> CommandResult {
        if args.is_empty() {
            return Err(CommandError::InvalidArguments(usage_for("sort")));
        }
        self.sort = args[0]
            .parse::<SortKey>()
            .map_err(CommandError::InvalidArguments)?;
        self.cmd_manage()
    }

    // ── target resolution ──

    /// Resolves `<name|#>` arguments against the manage-view ordering; with
    /// no arguments an interactive picker opens. `Ok(None)` means the user
    /// backed out.
    fn resolve_target(
        &self,
        args: &[&str],
        verb: &'static str,
    ) -> Result<Option<Uuid>, CommandError> {
        if args.is_empty() {
            if self.mode != CliMode::Interactive {
                return Err(CommandError::InvalidArguments(usage_for(verb)));
            }
            return self.pick_subscription(verb);
        }

        let needle = args.join(" ");
        let view = self.manage_view();
        if let Ok(index) = needle.parse::<usize>() {
            let id = index
                .checked_sub(1)
                .and_then(|idx| view.get(idx))
                .map(|sub| sub.id)
                .ok_or_else(|| {
                    CommandError::Message(format!(
                        "no entry #{} in the current view ({} shown)",
                        index,
                        view.len()
                    ))
                })?;
            return Ok(Some(id));
        }

        self.ledger
            .find_by_name(&needle)
            .map(|sub| Some(sub.id))
            .ok_or_else(|| CommandError::Message(format!("No subscription named `{}`.", needle)))
    }

    fn manage_view(&self) -> Vec<&Subscription> {
        filter_and_sort(
            &self.ledger.subscriptions,
            self.filter,
            self.sort,
            self.today(),
        )
    }

    fn pick_subscription(&self, verb: &'static str) -> Result<Option<Uuid>, CommandError> {
        let view = self.manage_view();
        if view.is_empty() {
            return Err(CommandError::Message("No subscriptions here.".into()));
        }
        let labels: Vec<String> = view
            .iter()
            .map(|sub| {
                format!(
                    "{} ({} / {})",
                    sub.name,
                    format_usd(sub.price),
                    sub.billing.per_label()
                )
            })
            .collect();
        let choice = Select::with_theme(&self.theme)
            .with_prompt(format!("Which subscription to {}?", verb))
            .items(&labels)
            .default(0)
            .interact_opt()?;
        Ok(choice.map(|index| view[index].id))
    }
}

fn subscription_row(
    index: usize,
    sub: &Subscription,
    today: NaiveDate,
    plain: bool,
) -> Vec<String> {
    let days_left = crate::ledger::days_until_renewal(sub.renew_day, today);
    let active = match (sub.active, plain) {
        (true, true) => "on",
        (false, true) => "off",
        (true, false) => "●",
        (false, false) => "○",
    };
    vec![
        format!("{}", index + 1),
        sub.name.clone(),
        sub.category.label().to_string(),
        sub.billing.label().to_string(),
        format!("day {} (in {}d)", sub.renew_day, days_left),
        format_usd(sub.price),
        format_usd(sub.annual_cost()),
        active.to_string(),
    ]
}

fn parse_draft_args(args: &[&str]) -> Result<SubscriptionDraft, CommandError> {
    if args.len() != 5 {
        return Err(CommandError::InvalidArguments(usage_for("add")));
    }
    let category = args[1]
        .parse()
        .map_err(CommandError::InvalidArguments)?;
    let billing = args[2]
        .parse()
        .map_err(CommandError::InvalidArguments)?;
    let price: f64 = args[3].parse().map_err(|_| {
        CommandError::InvalidArguments(format!("`{}` is not a price", args[3]))
    })?;
    let renew_day: u32 = args[4].parse().map_err(|_| {
        CommandError::InvalidArguments(format!("`{}` is not a day of month", args[4]))
    })?;
    Ok(SubscriptionDraft {
        name: args[0].to_string(),
        category,
        billing,
        price,
        renew_day,
    })
}

fn parse_switch(value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "`{}` is not on/off",
            other
        ))),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn usage_for(name: &str) -> String {
    COMMANDS
        .iter()
        .find(|spec| spec.name == name)
        .map(|spec| format!("Usage: {}", spec.usage))
        .unwrap_or_else(|| format!("Usage: {}", name))
}

fn unknown_command(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let suggestion = COMMANDS
        .iter()
        .flat_map(|spec| std::iter::once(spec.name).chain(spec.aliases.iter().copied()))
        .map(|name| (levenshtein(&lowered, name), name))
        .min();
    match suggestion {
        Some((distance, name)) if distance <= 2 => {
            format!("Unknown command `{}`. Did you mean `{}`?", raw, name)
        }
        _ => format!("Unknown command `{}`. Type `help` to list commands.", raw),
    }
}
