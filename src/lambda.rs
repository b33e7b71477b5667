#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
#[cfg(feature = "lambda")]
use db_initializer::utils::logger;
#[cfg(feature = "lambda")]
use db_initializer::{
    DatabaseInitializer, InitResponse, LambdaConfig, MySqlConnector, SecretsManagerProvider,
    SqlFileSource,
};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

#[cfg(feature = "lambda")]
async fn function_handler(
    client: &SecretsManagerClient,
    event: LambdaEvent<serde_json::Value>,
) -> Result<InitResponse, Error> {
    tracing::info!(request_id = %event.context.request_id, "Starting DB initialization Lambda function");

    // 每次呼叫重新讀取配置，失敗時已在 load() 中記錄
    let lambda_config = LambdaConfig::load()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let secrets = SecretsManagerProvider::new(client.clone(), lambda_config.secret_id.clone());
    let sql_source = SqlFileSource::new(lambda_config.init.sql_dir.clone());
    let initializer =
        DatabaseInitializer::new(secrets, sql_source, MySqlConnector::new(), lambda_config);

    // 錯誤已在 run() 中記錄，這裡直接回傳給 Lambda 平台
    let report = initializer
        .run()
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    tracing::info!(
        "DB initialization Lambda function completed ({} statements)",
        report.statements_executed()
    );
    Ok(InitResponse::from(&report))
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let client = SecretsManagerClient::new(&config);
    let client_ref = &client;

    run(service_fn(move |event: LambdaEvent<serde_json::Value>| async move {
        function_handler(client_ref, event).await
    }))
    .await
}
