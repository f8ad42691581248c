use anyhow::Context;
use chrono::Local;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use zylo_estate::ai::{AdvisorService, AnyProvider};
use zylo_estate::app_service::handle_command;
use zylo_estate::commands::AppCommand;
use zylo_estate::import::{spawn_import, FeedClient, ImportService, MappingConfig, PlaceholderGen};
use zylo_estate::storage::entity::new_id;
use zylo_estate::{AppConfig, AppContext, AppEvent, Store};

fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Warn)
        .filter_module("zylo_estate", log::LevelFilter::Info)
        .parse_default_env();

    if let Some(dir) = &config.log_dir {
        let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("创建日志目录失败: {}", dir.display()))?;
        let log_file = std::fs::File::create(dir.join(format!("app-{}.log", ts)))?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }
    builder.init();
    Ok(())
}

fn print_event(evt: AppEvent) {
    match evt {
        AppEvent::Log(s) => println!("· {s}"),
        AppEvent::Message(s) => println!("{s}"),
        AppEvent::Error(s) => eprintln!("✗ {s}"),
        AppEvent::Json { title, value } => {
            let body = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
            println!("== {title} ==\n{body}");
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();
    init_logging(&config)?;

    let store = if config.seed_sample_data {
        Store::with_sample_data()
            .await
            .context("加载示例数据失败")?
    } else {
        Store::new()
    };
    let store = Arc::new(store);

    let (evt_tx, mut evt_rx) = mpsc::unbounded_channel::<AppEvent>();
    let printer = tokio::spawn(async move {
        while let Some(evt) = evt_rx.recv().await {
            print_event(evt);
        }
    });

    let feed = FeedClient::new(config.feed_url.clone(), config.import_timeout)?;
    let mapping = MappingConfig {
        media_base: config.media_base.clone(),
        ..Default::default()
    };
    let placeholder = config
        .placeholder_seed
        .map(PlaceholderGen::from_seed)
        .unwrap_or_else(PlaceholderGen::from_entropy);
    let importer = Arc::new(ImportService::new(
        store.clone(),
        feed,
        mapping,
        config.import_limit,
        placeholder,
    ));

    // 启动导入在后台进行，命令循环不等待
    if config.import_on_start {
        let handle = spawn_import(importer.clone());
        let tx = evt_tx.clone();
        tokio::spawn(async move {
            match handle.await {
                Ok(report) => {
                    let _ = tx.send(AppEvent::Log(format!(
                        "后台导入完成: 新增 {} 个项目, {} 个开发商",
                        report.imported, report.builders_created
                    )));
                }
                Err(e) => warn!("import task failed: {e}"),
            }
        });
    }

    let session_id = format!("cli-{}", new_id());
    let mut ctx: AppContext<AnyProvider> =
        AppContext::new(store.clone(), session_id.clone()).with_importer(importer);
    match AnyProvider::from_env() {
        Ok(provider) => {
            info!("advisor: {} / {}", provider.name(), provider.model());
            let model = provider.model().to_string();
            ctx = ctx.with_advisor(Arc::new(AdvisorService::new(provider, model, store.clone())));
        }
        Err(e) => warn!("AI advisor disabled: {e}"),
    }

    let counts = store.counts().await;
    let _ = evt_tx.send(AppEvent::Message(format!(
        "已就绪: {} 个开发商, {} 个项目 (session {session_id})。输入 help 查看命令。",
        counts.builders, counts.projects
    )));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Ok(cmd) = line.parse::<AppCommand>() else {
            continue;
        };
        if !handle_command(&ctx, cmd, &evt_tx).await {
            break;
        }
    }

    drop(evt_tx);
    let _ = tokio::time::timeout(Duration::from_millis(500), printer).await;
    Ok(())
}
