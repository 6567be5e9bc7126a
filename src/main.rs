use clap::Parser;
use miette::{IntoDiagnostic, Result};
use paygate::application::checkout::CheckoutService;
use paygate::application::gateway::PaymentGateway;
use paygate::config::Config;
use paygate::domain::ports::{OrderStoreBox, PaymentStoreBox};
use paygate::infrastructure::in_memory::{
    InMemoryMerchantDirectory, InMemoryOrderStore, InMemoryPaymentStore,
};
use paygate::interfaces::csv::checkout_reader::CheckoutReader;
use paygate::interfaces::csv::payment_writer::PaymentWriter;
use paygate::logging::init_logging;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

fn in_memory_stores() -> (OrderStoreBox, PaymentStoreBox) {
    (
        Box::new(InMemoryOrderStore::new()),
        Box::new(InMemoryPaymentStore::new()),
    )
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(db_path: Option<&Path>) -> Result<(OrderStoreBox, PaymentStoreBox)> {
    use paygate::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            let store = RocksDBStore::open(path).into_diagnostic()?;
            info!(path = %path.display(), "using RocksDB storage");
            Ok((Box::new(store.clone()), Box::new(store)))
        }
        None => Ok(in_memory_stores()),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(db_path: Option<&Path>) -> Result<(OrderStoreBox, PaymentStoreBox)> {
    if db_path.is_some() {
        tracing::warn!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_stores())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(&config.log_level, config.log_format).into_diagnostic()?;

    let (orders, payments) = open_stores(config.db_path.as_deref())?;
    let gateway = PaymentGateway::new(orders, payments, Box::new(config.settlement()));
    let merchants = InMemoryMerchantDirectory::with_test_merchant().await;
    let service = Arc::new(CheckoutService::new(Arc::new(gateway), Box::new(merchants)));
    info!(mode = ?config.execution_mode(), "payment gateway ready");

    // Read every checkout up front so settlements can run concurrently
    let file = File::open(&config.input).into_diagnostic()?;
    let mut checkouts = Vec::new();
    for (line, checkout) in CheckoutReader::new(file).checkouts().enumerate() {
        match checkout {
            Ok(checkout) => checkouts.push(checkout),
            Err(e) => error!(record = line + 1, "Error reading checkout: {}", e),
        }
    }

    let mut settled = Vec::new();
    for result in service.run_all(checkouts).await {
        match result {
            Ok(payment) => settled.push(payment),
            Err(e) => error!(code = e.code(), "Error processing checkout: {}", e),
        }
    }

    let stdout = io::stdout();
    let mut writer = PaymentWriter::new(stdout.lock());
    writer.write_payments(&settled).into_diagnostic()?;

    Ok(())
}
