use anyhow::Result;
use bagsync::model::{ProductForm, ProductStatus, SizeCode, VariantColor, VariantSize};
use bagsync::server::{AppState, serve};
use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::{EnvFilter, fmt};

/// Storefront API server.
#[derive(Parser, Debug)]
#[command(name = "bagsync-server", version, about)]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 4000)]
    port: u16,

    /// Seed a demo catalog on startup
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let state = AppState::new();

    if args.seed {
        let mut repo = state.repo.write().await;
        repo.create_product(demo_product());
        tracing::info!("seeded demo catalog");
    }

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    serve(addr, state).await
}

fn demo_product() -> ProductForm {
    ProductForm {
        name: "Oversized Tee".to_string(),
        slug: "oversized-tee".to_string(),
        sku: "TEE-001".to_string(),
        description: "Heavyweight cotton oversized tee.".to_string(),
        status: ProductStatus::Active,
        category: "Shirts".to_string(),
        price: 450.0,
        variants: vec![VariantColor {
            id: String::new(),
            color: "Black".to_string(),
            images: vec!["tee-black.jpg".to_string()],
            sizes: vec![
                VariantSize {
                    id: String::new(),
                    size: SizeCode::M,
                    stock: 10,
                },
                VariantSize {
                    id: String::new(),
                    size: SizeCode::L,
                    stock: 6,
                },
            ],
        }],
    }
}
