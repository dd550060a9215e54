use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use dialoguer::Select;
use style_advisor::{capture, cli, client, config, error, report};
use style_advisor_common::render::html::render_page;
use style_advisor_common::{
    run_analysis, AcquisitionController, AnalysisInput, Attire, Occasion, PipelineState,
    ReadinessPolicy, SelectionState,
};
use cli::{Cli, Commands};
use client::{ReqwestTransport, WithoutImages};
use config::Config;
use error::{Result, StyleAdvisorError};
use report::CliObserver;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { image, occasion, attire, html, json, no_images } => {
            println!("👗 style-advisor - スタイル解析\n");

            let client_config = config.client_config();
            let policy = client_config.readiness_policy();

            // 1. 写真の読み込み
            println!("[1/3] 写真を読み込み中...");
            let loaded = capture::load_image_file(&image, config.max_image_size)?;
            let mut controller = AcquisitionController::new(capture::NoCamera, client_config.camera.clone());
            controller.use_uploaded_image(loaded.asset, loaded.file_name.clone());
            println!("✔ {} ({}x{})\n", loaded.file_name, loaded.width, loaded.height);

            // 2. 選択
            let mut selection = SelectionState::default();
            selection.set_occasion(match occasion {
                Some(occasion) => Some(occasion),
                None => prompt_occasion()?,
            });
            selection.set_attire(match attire {
                Some(attire) => Some(attire),
                None => prompt_attire(&policy)?,
            });
            let input = AnalysisInput::from_selection(controller.current_image(), &selection, &policy)?;

            // 3. 解析
            println!("[2/3] 解析中... ({})", client_config.analyze_url());
            let transport = ReqwestTransport::new(&client_config, Duration::from_secs(config.timeout_seconds))?;
            let mut observer = CliObserver::new(client_config.render.clone());
            let generation = observer.begin();
            let state = if no_images {
                run_analysis(&WithoutImages(transport), generation, &input, &mut observer).await
            } else {
                run_analysis(&transport, generation, &input, &mut observer).await
            };
            drop(controller);

            let view = observer.view();
            match &state {
                PipelineState::ErrorDisplay(message) => {
                    return Err(StyleAdvisorError::AnalysisFailed(message.clone()));
                }
                PipelineState::CompleteWithoutImages => println!("✔ 解析完了（スタイル画像は取得できませんでした）"),
                _ => println!("✔ 解析完了"),
            }

            if let Some(report) = view.report() {
                report::print_summary(report);
            }

            // 4. 保存
            if html.is_some() || json.is_some() {
                println!("\n[3/3] 結果を保存中...");
            }
            if let Some(path) = html {
                // 保存後に画像は届かないので、生成待ちのカードは画像なしにする
                let mut page_view = view.clone();
                page_view.settle_pending_images();
                let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
                std::fs::write(&path, render_page(&page_view, &generated_at))?;
                println!("✔ HTMLを保存: {}", path.display());
            }
            if let Some(path) = json {
                save_json(&path, &observer)?;
                println!("✔ JSONを保存: {}", path.display());
            }

            println!("\n✅ 完了");
        }

        Commands::Config { set_api_url, show } => {
            let mut config = config;

            if let Some(url) = set_api_url {
                config.set_api_url(&url)?;
                config.save()?;
                println!("✔ APIのURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  API URL: {}", config.api_url());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!("  服装の選択: {}", if config.attire_required { "必須" } else { "任意" });
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }

        Commands::Options => {
            println!("場面 (--occasion):");
            for occasion in Occasion::ALL {
                println!("  {:<14} {}", occasion.as_str(), occasion.label());
            }
            println!("\n服装 (--attire):");
            for attire in Attire::ALL {
                println!("  {:<14} {}", attire.as_str(), attire.label());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "style_advisor=debug,style_advisor_common=debug"
    } else {
        "style_advisor=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn prompt_occasion() -> Result<Option<Occasion>> {
    if !std::io::stdin().is_terminal() {
        return Ok(None);
    }
    let labels: Vec<&str> = Occasion::ALL.iter().map(|o| o.label()).collect();
    let index = Select::new()
        .with_prompt("場面を選択")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| StyleAdvisorError::Prompt(e.to_string()))?;
    Ok(Occasion::ALL.get(index).copied())
}

fn prompt_attire(policy: &ReadinessPolicy) -> Result<Option<Attire>> {
    if !std::io::stdin().is_terminal() {
        return Ok(None);
    }
    let mut labels: Vec<&str> = Attire::ALL.iter().map(|a| a.label()).collect();
    if !policy.attire_required {
        labels.push("(指定なし)");
    }
    let index = Select::new()
        .with_prompt("服装を選択")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| StyleAdvisorError::Prompt(e.to_string()))?;
    Ok(Attire::ALL.get(index).copied())
}

fn save_json(path: &Path, observer: &CliObserver) -> Result<()> {
    let raw = observer
        .raw_json()
        .ok_or_else(|| StyleAdvisorError::AnalysisFailed("保存できる結果がありません".into()))?;
    let content = serde_json::to_string_pretty(&raw)?;
    std::fs::write(path, content)?;
    Ok(())
}
