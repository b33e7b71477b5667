use anyhow::Context;
use clap::Parser;
use db_initializer::core::initializer::dry_run;
use db_initializer::utils::error::ErrorSeverity;
use db_initializer::utils::{logger, validation::Validate};
use db_initializer::{
    CliConfig, DatabaseInitializer, InitError, InitResponse, MySqlConnector, SqlFileSource,
};

fn exit_on_config_error(e: InitError) -> ! {
    tracing::error!("❌ Configuration validation failed: {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting db-initializer CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 解析並驗證配置
    let merged = config.load().unwrap_or_else(|e| exit_on_config_error(e));
    let init_config = merged
        .to_init_config()
        .and_then(|init| {
            init.validate()?;
            Ok(init)
        })
        .unwrap_or_else(|e| exit_on_config_error(e));

    let sql_source = SqlFileSource::new(init_config.sql_dir.clone());

    // dry run 不連線，也不需要憑證
    if config.dry_run {
        let reports = dry_run(&sql_source, &init_config)
            .await
            .context("failed to read the SQL files")?;
        for report in &reports {
            println!("📄 {}: {} statements", report.name, report.statements);
        }
        println!("🔍 Dry run complete, nothing was executed");
        return Ok(());
    }

    let secrets = config
        .secret_provider(&merged)
        .unwrap_or_else(|e| exit_on_config_error(e));
    let initializer =
        DatabaseInitializer::new(secrets, sql_source, MySqlConnector::new(), init_config);

    match initializer.run().await {
        Ok(report) => {
            println!("✅ Database initialization complete");
            for batch in &report.batches {
                println!(
                    "   {} - {} statements in {:.3}s",
                    batch.name,
                    batch.statements,
                    batch.elapsed.as_secs_f64()
                );
            }
            println!(
                "⏱️ Total {:.3}s ({} statements)",
                report.total_elapsed.as_secs_f64(),
                report.statements_executed()
            );

            let response = InitResponse::from(&report);
            println!("{}", serde_json::to_string(&response)?);
        }
        Err(e) => {
            tracing::error!(
                "❌ Initialization failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2, // 可重試
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
