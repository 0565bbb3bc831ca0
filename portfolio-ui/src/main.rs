fn main() {
    // Initialize logging for WASM
    #[cfg(target_arch = "wasm32")]
    {
        wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
        portfolio_ui::web::start();
    }

    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("portfolio-ui runs in the browser; build it for wasm32-unknown-unknown");
}
