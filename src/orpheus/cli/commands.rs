//! # CLI Layer
//!
//! This module is one client of the `orpheus` library. It is the only place
//! that:
//! - Parses arguments
//! - Touches the terminal and the process exit status
//! - Picks concrete pickers and pipelines
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Loads configuration and builds the [`Orpheus`] facade
//! - `handle_*()`: Per-command handlers that resolve a batch and submit it

use super::print::{print_messages, CmdMessage};
use super::setup::{print_help, Cli, Commands, ConfigAction, SearchArgs};
use clap::Parser;
use orpheus::api::{expand_link_arguments, Orpheus, Resolution, SearchMode};
use orpheus::batch::DownloadBatch;
use orpheus::config::{config_dir, OrpheusConfig, CONFIG_FILENAME};
use orpheus::error::Result;
use orpheus::overrides::RequestedOverrides;
use orpheus::picker::{FzfPicker, Picker, PromptPicker};
use orpheus::pipeline::{CommandPipeline, DownloadPipeline, JsonPipeline};
use orpheus::selection::Selector;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "ORPHEUS_LOG";

struct AppContext {
    api: Orpheus,
    output: Option<String>,
    overrides: RequestedOverrides,
    no_picker: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    install_interrupt_handler();

    let Cli {
        command,
        output,
        lyrics,
        covers,
        credits,
        separate_download,
        no_picker,
        ..
    } = cli;

    let Some(command) = command else {
        print_help();
        return Ok(());
    };

    // `config` must keep working when the module list in it is broken.
    let context = move || {
        let overrides = RequestedOverrides {
            lyrics,
            covers,
            credits,
            separate_download,
        };
        init_context(output, overrides, no_picker)
    };

    match command {
        Commands::Search(args) => handle_search(&context()?, &args, false),
        Commands::Luckysearch(args) => handle_search(&context()?, &args, true),
        Commands::Download {
            module,
            media_type,
            ids,
        } => handle_download(&context()?, &module, &media_type, &ids),
        Commands::Links(arguments) => handle_links(&context()?, &arguments),
        Commands::Config { action } => handle_config(action.unwrap_or(ConfigAction::Show)),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn install_interrupt_handler() {
    let installed = ctrlc::set_handler(|| {
        eprintln!("\n\t^C pressed - abort");
        std::process::exit(0);
    });
    if let Err(e) = installed {
        warn!("could not install Ctrl-C handler: {}", e);
    }
}

fn init_context(
    output: Option<String>,
    overrides: RequestedOverrides,
    no_picker: bool,
) -> Result<AppContext> {
    let dir = config_dir()?;
    let config = OrpheusConfig::load(&dir)?;
    debug!(
        config_dir = %dir.display(),
        modules = config.modules.len(),
        "configuration loaded"
    );

    Ok(AppContext {
        api: Orpheus::from_config(config)?,
        output,
        overrides,
        no_picker,
    })
}

fn build_selector(ctx: &AppContext) -> Selector {
    let interactive = if ctx.no_picker {
        None
    } else {
        FzfPicker::from_config(&ctx.api.config().picker)
            .map(|picker| Box::new(picker) as Box<dyn Picker>)
    };
    Selector::new(interactive, Box::new(PromptPicker::stdio()))
}

fn build_pipeline(ctx: &AppContext) -> Box<dyn DownloadPipeline> {
    match &ctx.api.config().pipeline.command {
        Some(program) => Box::new(CommandPipeline::new(program.clone())),
        None => Box::new(JsonPipeline::new(std::io::stdout())),
    }
}

fn handle_search(ctx: &AppContext, args: &SearchArgs, lucky: bool) -> Result<()> {
    let (module, media_type) = ctx.api.resolve_target(&args.module, &args.media_type)?;
    let query = args.query();

    let resolution = if lucky {
        ctx.api.search(&module, media_type, &query, SearchMode::Lucky)?
    } else {
        let mut selector = build_selector(ctx);
        let resolution = ctx.api.search(
            &module,
            media_type,
            &query,
            SearchMode::Interactive(&mut selector),
        )?;
        eprintln!();
        resolution
    };

    match resolution {
        Resolution::Batch(batch) => submit(ctx, batch),
        Resolution::Aborted => Ok(()),
    }
}

fn handle_download(
    ctx: &AppContext,
    module: &str,
    media_type: &str,
    ids: &[String],
) -> Result<()> {
    let (module, media_type) = ctx.api.resolve_target(module, media_type)?;
    let batch = ctx.api.download_ids(&module, media_type, ids);
    submit(ctx, batch)
}

fn handle_links(ctx: &AppContext, arguments: &[String]) -> Result<()> {
    let links = expand_link_arguments(arguments)?;
    let batch = ctx.api.resolve_links(&links)?;
    submit(ctx, batch)
}

fn submit(ctx: &AppContext, batch: DownloadBatch) -> Result<()> {
    let output_path = ctx.api.output_path(ctx.output.as_deref());
    std::fs::create_dir_all(&output_path)?;

    if batch.is_empty() {
        print_messages(&[CmdMessage::warning("No links given")]);
    }

    let job = ctx.api.job(batch, &ctx.overrides, output_path);
    build_pipeline(ctx).submit(&job)
}

fn handle_config(action: ConfigAction) -> Result<()> {
    let dir = config_dir()?;
    let config = OrpheusConfig::load(&dir)?;

    match action {
        ConfigAction::Show => {
            print_messages(&[CmdMessage::info(
                dir.join(CONFIG_FILENAME).display().to_string(),
            )]);
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Refresh => {
            config.save(&dir)?;
            print_messages(&[CmdMessage::success(format!(
                "{} has been refreshed successfully.",
                CONFIG_FILENAME
            ))]);
        }
    }
    Ok(())
}
