use lambda_runtime::{service_fn, Error, LambdaEvent};
use orderbot::{AppConfig, InvocationEvent, InvocationHandler};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // The platform timestamps every line itself
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("orderbot=info")),
        )
        .with_ansi(false)
        .without_time()
        .init();

    let config = AppConfig::load()?;
    let handler = InvocationHandler::from_config(&config).await?;
    let handler = &handler;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<InvocationEvent>| async move {
        let log_stream = event.context.env_config.log_stream.clone();
        handler
            .handle(event.payload, Some(&log_stream))
            .await
            .map_err(Error::from)
    }))
    .await
}
