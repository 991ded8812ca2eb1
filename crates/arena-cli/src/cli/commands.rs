use super::args::*;
use arena_core::config::ArenaConfig;
use arena_core::engine::orchestrator::{GenerateRequest, Orchestrator};
use arena_core::errors::{BackendError, OrchestratorError, StoreError};
use arena_core::eval::EventTable;
use arena_core::model::Rating;
use arena_core::providers::llm::BackendRegistry;
use arena_core::report::{console, json, EvaluationReport};
use arena_core::storage::Store;
use std::path::Path;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const CONFIG_ERROR: i32 = 2;
    pub const UNKNOWN_BACKEND: i32 = 3;
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Init(args) => cmd_init(args),
        Command::Generate(args) => cmd_generate(args).await,
        Command::Compare(args) => cmd_compare(args).await,
        Command::Rate(args) => cmd_rate(args).await,
        Command::Report(args) => cmd_report(args),
        Command::Backends(args) => cmd_backends(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

fn cmd_init(args: InitArgs) -> anyhow::Result<i32> {
    if !args.config.exists() {
        ensure_parent_dir(&args.config)?;
        arena_core::config::write_sample_config(&args.config)?;
        eprintln!("created {}", args.config.display());
    } else {
        eprintln!("note: {} already exists", args.config.display());
    }

    if args.gitignore {
        let gi_path = Path::new(".gitignore");
        if !gi_path.exists() {
            std::fs::write(gi_path, crate::templates::GITIGNORE)?;
            eprintln!("created .gitignore");
        } else {
            eprintln!("note: .gitignore already exists (skipped)");
        }
    }
    Ok(exit_codes::OK)
}

async fn cmd_generate(args: GenerateArgs) -> anyhow::Result<i32> {
    let (_, orchestrator) = build_orchestrator(&args.common)?;
    let rating = args.rating.map(Rating::new).transpose()?;

    let res = orchestrator
        .generate(GenerateRequest {
            prompt: args.prompt,
            backend_id: args.backend,
            rating,
        })
        .await;

    match res {
        Ok(ev) => {
            print!("{}", console::render_event(&ev));
            Ok(exit_codes::OK)
        }
        Err(e) => Ok(report_orchestrator_error(&e)),
    }
}

async fn cmd_compare(args: CompareArgs) -> anyhow::Result<i32> {
    let (_, orchestrator) = build_orchestrator(&args.common)?;
    let ratings = args
        .ratings
        .iter()
        .map(|r| Rating::new(*r))
        .collect::<Result<Vec<_>, _>>()?;

    match orchestrator
        .compare(&args.prompt, &args.backends, &ratings)
        .await
    {
        Ok(events) => {
            for ev in &events {
                print!("{}", console::render_event(ev));
                println!();
            }
            if ratings.is_empty() {
                eprintln!("note: rate outputs later with `arena rate --id <event> --rating <1-5>`");
            }
            Ok(exit_codes::OK)
        }
        Err(e) => Ok(report_orchestrator_error(&e)),
    }
}

async fn cmd_rate(args: RateArgs) -> anyhow::Result<i32> {
    let (_, orchestrator) = build_orchestrator(&args.common)?;
    let rating = Rating::new(args.rating)?;

    match orchestrator.rate(args.id, rating).await {
        Ok(()) => {
            eprintln!("rated event #{} with {}", args.id, rating);
            Ok(exit_codes::OK)
        }
        Err(e) => Ok(report_orchestrator_error(&e)),
    }
}

fn cmd_report(args: ReportArgs) -> anyhow::Result<i32> {
    let (cfg, store) = open_store(&args.common)?;
    let limit = args.limit.unwrap_or(cfg.load_limit);
    let table = EventTable::load(&store, limit)?;
    let report = EvaluationReport::build(&table);
    tracing::info!(
        event = "report_built",
        events = report.total_events,
        backends = report.summaries.len(),
        limit
    );

    let rendered = match args.format {
        ReportFormat::Console => console::render_report(&report),
        ReportFormat::Json => json::to_json(&report)?,
    };

    match &args.out {
        Some(path) => {
            ensure_parent_dir(path)?;
            std::fs::write(path, rendered)?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{}", rendered.trim_end()),
    }
    Ok(exit_codes::OK)
}

fn cmd_backends(args: CommonArgs) -> anyhow::Result<i32> {
    let cfg = load_config(&args)?;
    for id in BackendRegistry::from_config(&cfg).ids() {
        println!("{id}");
    }
    Ok(exit_codes::OK)
}

fn report_orchestrator_error(e: &OrchestratorError) -> i32 {
    match e {
        OrchestratorError::Backend(BackendError::UnknownBackend(_)) => {
            eprintln!("error: {e}");
            exit_codes::UNKNOWN_BACKEND
        }
        OrchestratorError::InvalidRequest(_) => {
            eprintln!("error: {e}");
            exit_codes::CONFIG_ERROR
        }
        OrchestratorError::Rating { source, .. } if source.downcast_ref::<StoreError>().is_some() => {
            eprintln!("error: {e}");
            exit_codes::CONFIG_ERROR
        }
        _ => {
            eprintln!("fatal: {e:?}");
            exit_codes::CONFIG_ERROR
        }
    }
}

fn load_config(args: &CommonArgs) -> anyhow::Result<ArenaConfig> {
    let mut cfg = arena_core::config::load_config_or_default(&args.config)?;
    if let Some(db) = &args.db {
        cfg.db = db.clone();
    }
    Ok(cfg)
}

fn open_store(args: &CommonArgs) -> anyhow::Result<(ArenaConfig, Store)> {
    let cfg = load_config(args)?;
    ensure_parent_dir(&cfg.db)?;
    let store = Store::open(&cfg.db)?;
    store.init_schema()?;
    Ok((cfg, store))
}

fn build_orchestrator(args: &CommonArgs) -> anyhow::Result<(ArenaConfig, Orchestrator)> {
    let (cfg, store) = open_store(args)?;
    let registry = BackendRegistry::from_config(&cfg);
    Ok((cfg, Orchestrator::new(store, registry)))
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
