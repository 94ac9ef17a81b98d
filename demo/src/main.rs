mod stock;

use resource_core::{Loader, Outcome, TransportConfig, UreqTransport};
use tracing_subscriber::EnvFilter;

use stock::{describe, stock_resource, Device};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let url = std::env::var("STOCK_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:3000/stock".to_string());
    let device = Device {
        id: std::env::var("DEVICE_ID").unwrap_or_default(),
        kind: "iPhone 5S".to_string(),
        app_version: "8.4".to_string(),
        request_id: uuid::Uuid::new_v4().to_string(),
    };

    let config = TransportConfig::default()
        .user_agent(format!("resource-demo/{}", env!("CARGO_PKG_VERSION")));
    let loader = Loader::new(UreqTransport::new(&config));
    let resource = stock_resource(&url, &device);
    tracing::info!(%url, request_id = %device.request_id, "loading stock");

    let handle = loader.load(&resource, |outcome| match outcome {
        Outcome::Success(stock) => {
            let rendered = serde_json::to_string_pretty(&stock.object)
                .unwrap_or_else(|_| format!("{:?}", stock.object));
            println!("{rendered}");
        }
        Outcome::Failure(err) => println!("{}", describe(&err)),
    });

    if handle.join().is_err() {
        tracing::error!("load thread panicked");
        std::process::exit(1);
    }
}
