use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use styletween::{EasingTable, Runner, Script, Settings, StyleSheet};

#[derive(Parser, Debug)]
#[command(name = "styletween", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a script and print its stages as JSON.
    Compile(ScriptArgs),
    /// Play a script in real time against an in-memory style sheet.
    Play(ScriptArgs),
}

#[derive(Parser, Debug)]
struct ScriptArgs {
    /// Input script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Settings JSON. `STYLETWEEN_*` environment variables override it.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compile(args) => cmd_compile(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(p) => Settings::from_json_path(p)
            .with_context(|| format!("load settings '{}'", p.display()))?,
        None => Settings::default(),
    };
    settings
        .apply_env()
        .with_context(|| "apply environment overrides")?;
    Ok(settings)
}

fn load_script(path: &Path) -> anyhow::Result<Script> {
    Script::from_json_path(path).with_context(|| format!("load script '{}'", path.display()))
}

fn sheet_for(script: &Script) -> StyleSheet {
    script
        .targets
        .iter()
        .fold(StyleSheet::new(), |sheet, t| sheet.with_target(t.as_str()))
}

fn cmd_compile(args: ScriptArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.config.as_deref())?;
    let script = load_script(&args.in_path)?;
    let anim = script.animation(EasingTable::standard(), &sheet_for(&script))?;

    let timeline = anim
        .compile(&settings.compile_options())
        .unwrap_or_default();
    let json = serde_json::to_string_pretty(&timeline).with_context(|| "serialize stages")?;
    println!("{json}");
    Ok(())
}

fn cmd_play(args: ScriptArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.config.as_deref())?;
    let script = load_script(&args.in_path)?;

    let mut runner = Runner::new(sheet_for(&script), settings);
    let anim = script.animation(EasingTable::standard(), runner.writer())?;
    match anim.play_on(&mut runner, None) {
        Some(id) => tracing::info!(run = %id, targets = anim.targets().len(), "playing"),
        None => tracing::warn!("script compiled to no stages"),
    }
    runner.run_until_idle();

    let sheet = runner.into_writer();
    tracing::info!(writes = sheet.write_count(), "playback finished");
    let json =
        serde_json::to_string_pretty(sheet.targets()).with_context(|| "serialize styles")?;
    println!("{json}");
    Ok(())
}
