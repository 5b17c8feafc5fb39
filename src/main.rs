use std::process;

use gearguide::{
    application::error::AppError,
    application::render::{RenderPipelineConfig, configure_render_service, render_service},
    config::{self, OutputFormat, RenderArgs},
    infra::{
        error::InfraError,
        http::{self, HttpState},
        input::load_render_input,
        telemetry,
    },
    presentation::views::render_post_article,
};
use tokio::io::AsyncWriteExt;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| InfraError::configuration(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;
    configure_render_service(RenderPipelineConfig::from(&settings.render))?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Render(args) => run_render(args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let state = HttpState::new(render_service());
    let body_limit = usize::try_from(settings.server.max_request_bytes.get()).unwrap_or(usize::MAX);
    let router = http::build_router(state, body_limit);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        target = "gearguide::http",
        addr = %settings.server.addr,
        "preview service listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!(target = "gearguide::http", "preview service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(
            target = "gearguide::http",
            error = %err,
            "failed to listen for shutdown signal"
        );
        std::future::pending::<()>().await;
    }
}

async fn run_render(args: RenderArgs) -> Result<(), AppError> {
    let input = load_render_input(&args.post, args.products.as_deref()).await?;
    let assembled = render_service().assemble(&input.post, &input.products);

    let mut output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&assembled)
            .map_err(|err| AppError::unexpected(format!("failed to encode output: {err}")))?,
        OutputFormat::Html => {
            render_post_article(&assembled).map_err(|err| AppError::unexpected(err.to_string()))?
        }
    };
    output.push('\n');

    match args.output.as_ref() {
        Some(path) => tokio::fs::write(path, output)
            .await
            .map_err(|err| AppError::from(InfraError::from(err)))?,
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(output.as_bytes())
                .await
                .map_err(|err| AppError::from(InfraError::from(err)))?;
            stdout
                .flush()
                .await
                .map_err(|err| AppError::from(InfraError::from(err)))?;
        }
    }

    info!(
        target = "gearguide::cli::render",
        post = %args.post.display(),
        sections = assembled.sections.len(),
        words = assembled.metrics.word_count,
        "post rendered"
    );
    Ok(())
}
