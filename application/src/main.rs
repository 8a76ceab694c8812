use std::{io, sync::OnceLock};

use application::{
    config, view, Args, Command, Config, Entity, Format, Table,
};
use serde_json::Value;
use service::{
    infra::{Client, Endpoint},
    DataTable, View,
};
use tokio::{
    io::{AsyncBufReadExt as _, BufReader},
    task,
};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Stdout carries the rendered table.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_target(false)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO)
                            >= *meta.level()
                })),
        )
        .init();

    if task::LocalSet::new().run_until(start()).await.is_err() {
        std::process::exit(1);
    }
}

async fn start() -> Result<(), ()> {
    let Args {
        config,
        entity,
        search,
        filters,
        page,
        page_size,
        format,
        interactive,
    } = Args::parse().unwrap_or_else(|e| e.exit());

    let Config { api, table, log } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let http_config = api.try_into().map_err(|e| {
        log::error!("invalid `api.base_url`: {e}");
    })?;
    let client = Client::new(http_config).map_err(|e| {
        log::error!("failed to initialize HTTP `Client`: {e}");
    })?;

    let table = build_table(
        &client,
        entity,
        format,
        table,
        page_size,
        search,
        filters,
    )?;

    log::debug!("browsing `{entity}` at `{}`", entity.path());

    if page > 1 {
        table.go_to_page(page);
    } else {
        table.reload();
    }
    table.settled().await;

    if interactive {
        run_interactive(&table, &client, entity).await?;
    }

    Ok(())
}

/// Builds a [`Table`] of `entity` records rendered in the `format`.
fn build_table(
    client: &Client,
    entity: Entity,
    format: Format,
    config: config::Table,
    page_size: Option<u32>,
    search: Option<String>,
    filters: Vec<(String, String)>,
) -> Result<Table, ()> {
    let columns = entity.columns();
    let window = config.pager_window;
    let view: Box<dyn View<Value>> = match format {
        Format::Table => {
            Box::new(view::Terminal::new(io::stdout(), columns, window))
        }
        Format::Html => Box::new(view::Html::new(io::stdout(), columns, window)),
    };

    let mut config = service::table::Config::from(config);
    if let Some(size) = page_size {
        config.page_size = size;
    }

    let mut builder = DataTable::builder()
        .fetch_page(Endpoint::new(client.clone(), entity.path()))
        .view(view)
        .config(config);
    for &(parent, child) in entity.filter_chain() {
        builder = builder.dependent_filter(parent, child);
    }
    if let Some(term) = search {
        builder = builder.search(term);
    }
    for (key, value) in filters {
        builder = builder.filter(key, value);
    }

    builder.build().map_err(|e| {
        log::error!("failed to build `{entity}` table: {e}");
    })
}

/// Applies [`Command`]s read from stdin to the `table` until `quit` or EOF.
async fn run_interactive(
    table: &Table,
    client: &Client,
    entity: Entity,
) -> Result<(), ()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.map_err(|e| {
        log::error!("failed to read stdin: {e}");
    })? {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(cmd) => {
                if !cmd.apply(table, client, entity).await {
                    break;
                }
                table.settled().await;
            }
            Err(e) => log::warn!("{e}"),
        }
    }
    Ok(())
}
