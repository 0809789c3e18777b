use yasfs::server::{create_listener, StaticServer};
use yasfs::{config, logger};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;

    // A failed bind (port already taken) is the only fatal error path
    let listener = create_listener(addr)?;
    let server = StaticServer::new(cfg)?;

    logger::log_server_start(&addr, server.root());

    server.run(listener).await
}
