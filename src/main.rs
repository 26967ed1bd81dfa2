use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

use swagger_preview::cli::{Cli, USAGE_EXIT_CODE};
use swagger_preview::config::{Config, Target};
use swagger_preview::error::Result;
use swagger_preview::logger::Logger;
use swagger_preview::ui_bundle::UiBundle;
use swagger_preview::{handler, server};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Some(target) = cli.target.clone() else {
        eprintln!("{}", Cli::usage());
        return ExitCode::from(USAGE_EXIT_CODE);
    };

    let cfg = match Config::load(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let logger = match Logger::from_config(&cfg.logging) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("cannot open log file: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Worker threads default to the number of CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = match runtime_builder.build() {
        Ok(runtime) => runtime,
        Err(e) => {
            logger.error(&format!("cannot start runtime: {e}"));
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(target, cfg, logger.clone())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(target: std::path::PathBuf, cfg: Config, logger: Logger) -> Result<()> {
    let target = Target::detect(&target)?;

    let bundle = UiBundle::new(cfg.cache_dir()?, cfg.ui.release_api.clone(), logger.clone())?;
    let ui_dist = bundle.ensure(cfg.ui.force_update).await?;
    logger.debug(&format!("serving swagger-ui from {}", ui_dist.display()));

    let app = handler::build(&target, ui_dist, &cfg.validator.url, &logger);

    let addr = cfg.listen_addr()?;
    let listener = server::create_listener(addr)?;
    match &target {
        Target::Directory(dir) => logger.info(&format!(
            "listening on http://{addr}/ (specifications in {})",
            dir.display()
        )),
        Target::File(file) => logger.info(&format!(
            "listening on http://{addr}/ (specification {})",
            file.display()
        )),
    }

    server::serve(listener, Arc::new(app), logger, server::shutdown_signal()).await;
    Ok(())
}
