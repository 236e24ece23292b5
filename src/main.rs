//! CLI entry point for cfg-keybind-manager
//!
//! Provides command-line interface for listing, exporting, importing,
//! comparing and fine-tuning the keybindings of a mod config file.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cfg_keybind_manager::capture::{LineKeyCapture, NoopModifierPoller};
use cfg_keybind_manager::config::{
    read_exchange_file, write_exchange_file, ConfigManager, ConfigTransaction,
};
use cfg_keybind_manager::core::{
    compare_labeled, extract_active, extract_keybinds, merge_keybinds, ConfigStore, FeatureKeybind,
    FineTuneSession, KeyCodeTranslator, KeyScheme, ModificationHistory, TuneEvent, TuneOutcome,
    TuneState,
};
use cfg_keybind_manager::{logging, report};

#[derive(Parser)]
#[command(name = "cfg-keybind-manager")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Show debug logs (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Key-code numbering used by the config
    #[arg(short, long, global = true, value_enum, default_value_t = Scheme::Glfw)]
    scheme: Scheme,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Scheme {
    /// GLFW key codes
    Glfw,
    /// Windows virtual-key codes
    Vk,
}

impl From<Scheme> for KeyScheme {
    fn from(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Glfw => KeyScheme::Glfw,
            Scheme::Vk => KeyScheme::VirtualKey,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List keybindings in a config
    List {
        /// Path to config file
        #[arg(short, long)]
        config: PathBuf,

        /// Only bound features
        #[arg(short, long)]
        active: bool,
    },

    /// Export keybindings to a JSON exchange file
    Export {
        /// Path to config file
        #[arg(short, long)]
        config: PathBuf,

        /// Exchange file to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Merge keybindings from a JSON exchange file into a config
    Import {
        /// Path to config file
        #[arg(short, long)]
        config: PathBuf,

        /// Exchange file to read
        #[arg(short, long)]
        input: PathBuf,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Show active keybindings unique to either of two configs
    Compare {
        /// First config
        a: PathBuf,

        /// Second config
        b: PathBuf,
    },

    /// Rebind a single feature
    Set {
        /// Path to config file
        #[arg(short, long)]
        config: PathBuf,

        /// Feature name (case-insensitive)
        feature: String,

        /// Key code or key name (e.g. 32, -3, space, "pointer right", unbound)
        #[arg(allow_negative_numbers = true)]
        key: String,

        /// Set hold mode (true) or toggle mode (false)
        #[arg(long)]
        hold: Option<bool>,
    },

    /// Interactively rebind features, one line of input per step
    Tune {
        /// Path to config file
        #[arg(short, long)]
        config: PathBuf,
    },

    /// List backups of a config, newest first
    Backups {
        /// Path to config file
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let scheme = KeyScheme::from(cli.scheme);

    match cli.command {
        Commands::List { config, active } => list_keybindings(&config, active, scheme)?,
        Commands::Export { config, output } => export_keybindings(&config, &output)?,
        Commands::Import {
            config,
            input,
            dry_run,
        } => import_keybindings(&config, &input, dry_run, scheme)?,
        Commands::Compare { a, b } => compare(&a, &b, scheme)?,
        Commands::Set {
            config,
            feature,
            key,
            hold,
        } => set_keybinding(&config, &feature, &key, hold, scheme)?,
        Commands::Tune { config } => tune(&config, scheme)?,
        Commands::Backups { config } => list_backups(&config)?,
    }

    Ok(())
}

/// Expands `~` in a user-supplied path
fn expand_path(path: &Path) -> anyhow::Result<PathBuf> {
    let expanded = shellexpand::tilde(
        path.to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid path encoding"))?,
    );
    Ok(PathBuf::from(expanded.as_ref()))
}

fn open_config(config_path: &Path) -> anyhow::Result<ConfigManager> {
    let path = expand_path(config_path)?;
    ConfigManager::new(path).context("Failed to open config")
}

fn list_keybindings(config_path: &Path, active: bool, scheme: KeyScheme) -> anyhow::Result<()> {
    let manager = open_config(config_path)?;
    let store = manager.load_store()?;

    let bindings = if active {
        extract_active(&store)
    } else {
        extract_keybinds(&store)
    };

    println!(
        "{}",
        format!("Keybindings from: {}\n", manager.config_path().display()).bold()
    );
    print!("{}", report::render_keybind_table(&bindings, scheme));
    println!("\n{} Total: {} bindings", "✓".green(), bindings.len());

    Ok(())
}

fn export_keybindings(config_path: &Path, output: &Path) -> anyhow::Result<()> {
    let manager = open_config(config_path)?;
    let bindings = extract_keybinds(&manager.load_store()?);

    let output = expand_path(output)?;
    write_exchange_file(&output, &bindings)?;

    println!(
        "{} Exported {} bindings to {}",
        "✓".green(),
        bindings.len(),
        output.display()
    );
    Ok(())
}

fn import_keybindings(
    config_path: &Path,
    input: &Path,
    dry_run: bool,
    scheme: KeyScheme,
) -> anyhow::Result<()> {
    let manager = open_config(config_path)?;
    let incoming = read_exchange_file(&expand_path(input)?)?;

    let mut store = manager.load_store()?;
    let mut history = ModificationHistory::new();
    let summary = merge_keybinds(&mut store, &incoming, &mut history);

    print!("{}", report::render_history(&history, scheme));

    for name in &summary.not_applied {
        println!("{} {} is not in this config, skipped", "⚠".yellow(), name.cyan());
    }

    if dry_run {
        println!("\n{} Dry run: {} entries would change", "→".cyan(), summary.applied);
        return Ok(());
    }

    if summary.is_noop() {
        println!("\n{} Nothing to apply", "✓".green());
        return Ok(());
    }

    commit(&manager, &store)?;
    println!("\n{} Applied {} entries", "✓".green().bold(), summary.applied);
    Ok(())
}

fn compare(a: &Path, b: &Path, scheme: KeyScheme) -> anyhow::Result<()> {
    let path_a = expand_path(a)?;
    let path_b = expand_path(b)?;

    let store_a = load_for_compare(&path_a)?;
    let store_b = load_for_compare(&path_b)?;

    let label_a = path_a.display().to_string();
    let label_b = path_b.display().to_string();
    let result = compare_labeled(&store_a, &label_a, &store_b, &label_b);

    print!("{}", report::render_comparison(&result, &label_a, &label_b, scheme));

    if result.is_identical() {
        println!("\n{} {}", "✓".green().bold(), "Same active features on both sides".bold());
    } else {
        println!(
            "\n{} {} difference{}",
            "✗".red().bold(),
            result.total_differences(),
            if result.total_differences() == 1 { "" } else { "s" }
        );
    }

    Ok(())
}

/// Compare never writes, so no backups directory is created.
fn load_for_compare(path: &Path) -> anyhow::Result<ConfigStore> {
    if !path.is_file() {
        bail!("Config file not found: {}", path.display());
    }
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(ConfigStore::from_bytes(&bytes)?)
}

fn set_keybinding(
    config_path: &Path,
    feature: &str,
    key: &str,
    hold: Option<bool>,
    scheme: KeyScheme,
) -> anyhow::Result<()> {
    let manager = open_config(config_path)?;
    let mut store = manager.load_store()?;

    let current = extract_keybinds(&store)
        .into_iter()
        .find(|kb| kb.feature_name.eq_ignore_ascii_case(feature))
        .ok_or_else(|| anyhow::anyhow!("Feature '{}' has no keybinding in this config", feature))?;

    let code = match key.trim().parse::<i32>() {
        Ok(code) => code,
        Err(_) => KeyCodeTranslator::code_for(key, scheme)
            .ok_or_else(|| anyhow::anyhow!("'{}' is not a known {} key", key, scheme))?,
    };

    let binding = FeatureKeybind::new(
        &current.feature_name,
        code,
        hold.unwrap_or(current.is_hold),
    );

    let mut history = ModificationHistory::new();
    merge_keybinds(&mut store, std::slice::from_ref(&binding), &mut history);
    commit(&manager, &store)?;

    print!("{}", report::render_history(&history, scheme));
    println!("{} {}", "✓".green(), binding);
    Ok(())
}

fn tune(config_path: &Path, scheme: KeyScheme) -> anyhow::Result<()> {
    let manager = open_config(config_path)?;
    let mut store = manager.load_store()?;
    let mut history = ModificationHistory::new();

    let stdin = io::stdin();
    let mut input = LineKeyCapture::new(stdin.lock(), NoopModifierPoller);
    let mut session = FineTuneSession::new(&mut store, &mut history);

    loop {
        let event = match session.state() {
            TuneState::Cancelled => break,

            TuneState::SelectingFeature => {
                print!("{}", report::render_keybind_table(&session.features(), scheme));
                prompt("\nFeature to rebind (empty to finish): ")?;
                match input.read_line() {
                    Some(name) if !name.is_empty() => TuneEvent::Select(name),
                    _ => break,
                }
            }

            TuneState::AwaitingKeyCapture { current } => {
                prompt(&format!(
                    "Key for {} (name or code, 'skip', 'esc' to cancel): ",
                    current.feature_name.cyan()
                ))?;
                match input.read_line() {
                    Some(line) if line.eq_ignore_ascii_case("skip") => TuneEvent::Skip,
                    Some(line) => TuneEvent::Captured(input.resolve(&line, scheme)),
                    None => TuneEvent::Cancel,
                }
            }

            TuneState::ConfirmingCapture { pending, .. } => {
                prompt(&format!(
                    "Apply {}? [y]es / [h]old toggle / [r]ecapture / [s]kip / [c]ancel: ",
                    pending
                ))?;
                match input.read_line().map(|l| l.to_lowercase()).as_deref() {
                    Some("y") | Some("yes") => TuneEvent::Confirm,
                    Some("h") => TuneEvent::ToggleHold,
                    Some("r") => TuneEvent::Recapture,
                    Some("s") => TuneEvent::Skip,
                    Some("c") | None => TuneEvent::Cancel,
                    Some(other) => {
                        println!("{} Unknown choice '{}'", "⚠".yellow(), other);
                        continue;
                    }
                }
            }
        };

        match session.handle(event) {
            Ok(outcome) => print_outcome(&outcome, scheme),
            Err(e) => println!("{} {}", "✗".red(), e),
        }
    }

    let applied = session.applied().len();

    if applied == 0 {
        println!("{} No changes", "✓".green());
        return Ok(());
    }

    commit(&manager, &store)?;
    println!();
    print!("{}", report::render_history(&history, scheme));
    println!("{} Saved {} binding{}", "✓".green().bold(), applied, if applied == 1 { "" } else { "s" });
    Ok(())
}

fn print_outcome(outcome: &TuneOutcome, scheme: KeyScheme) {
    match outcome {
        TuneOutcome::Selected(current) => println!(
            "{} {} is {} ({})",
            "→".cyan(),
            current.feature_name.bold(),
            current.key_code,
            KeyCodeTranslator::name(current.key_code, scheme)
        ),
        TuneOutcome::RetryCapture(reason) => println!("{} {}, try again", "⚠".yellow(), reason),
        TuneOutcome::Captured { pending, display } => {
            println!("{} Captured {} ({})", "→".cyan(), display.bold(), pending.key_code)
        }
        TuneOutcome::HoldToggled(hold) => {
            println!("{} Mode: {}", "→".cyan(), if *hold { "hold" } else { "toggle" })
        }
        TuneOutcome::Applied { binding, .. } => println!("{} {}", "✓".green(), binding),
        TuneOutcome::Skipped(name) => println!("{} Skipped {}", "→".cyan(), name),
        TuneOutcome::Cancelled => println!("{}", "Cancelled".yellow()),
    }
}

fn prompt(text: &str) -> anyhow::Result<()> {
    print!("{}", text);
    io::stdout().flush()?;
    Ok(())
}

/// Backs up, then writes `store` over the config.
fn commit(manager: &ConfigManager, store: &ConfigStore) -> anyhow::Result<()> {
    let tx = ConfigTransaction::begin(manager)?;
    let backup = tx.backup_path().to_path_buf();
    tx.commit_store(store)?;

    println!("{} Backup: {}", "→".cyan(), backup.display());
    Ok(())
}

fn list_backups(config_path: &Path) -> anyhow::Result<()> {
    let manager = open_config(config_path)?;
    let backups = manager.list_backups()?;

    if backups.is_empty() {
        println!("{} No backups in {}", "✓".green(), manager.backup_dir().display());
        return Ok(());
    }

    for backup in &backups {
        println!("{}", backup.display());
    }
    println!("\n{} Total: {} backups", "✓".green(), backups.len());
    Ok(())
}
