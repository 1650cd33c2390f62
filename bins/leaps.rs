use clap::Parser;
use common::types::BUILD_INFO;
use common::utils::logging::init_logging;
use dotenvy::dotenv;
use server::cli::Cli;
use server::errors::StartupError;
use server::startup::{self, Launch};
use std::process::ExitCode;
use tracing::{error, info};
use uuid::Uuid;

fn main() -> ExitCode {
    // 提前加载 .env，使得 RUST_LOG 等环境变量生效
    dotenv().ok();

    let cli = Cli::parse();
    let (config, mode) = match startup::prepare(&cli) {
        Ok(Launch::ShowVersion) => {
            println!("{BUILD_INFO}");
            return ExitCode::SUCCESS;
        }
        Ok(Launch::Start { config, mode }) => (config, mode),
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match config.to_pretty_json() {
        Ok(json) => {
            println!("Leaps server initializing, configuration:\n{json}");
            println!("Launching a leaps instance, use CTRL+C to close.\n");
        }
        Err(e) => {
            eprintln!("Configuration marshal error: {e}");
            return ExitCode::FAILURE;
        }
    }

    init_logging(&config.logger);

    let service_id = Uuid::new_v4();
    let pid = std::process::id();

    // Panic 钩子：捕获异常并输出错误日志
    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "leaps",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let worker_threads = config.num_processes.max(1);
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            let err = StartupError::Runtime(e.to_string());
            error!(service = "leaps", event = "runtime_build_failed", error = %err, "failed to build tokio runtime");
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "leaps",
        event = "start",
        %service_id,
        pid,
        version = BUILD_INFO.version,
        threads = worker_threads,
        ?mode,
        "leaps service starting"
    );

    match rt.block_on(startup::run(config, mode)) {
        Ok(reason) => {
            info!(service = "leaps", event = "stop", %service_id, pid, ?reason, "leaps service stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "leaps", event = "startup_failed", error = %e, "leaps service failed to start");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
