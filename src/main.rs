use std::env;

#[tokio::main]
async fn main() {
    env_logger::init();

    let raw_args: Vec<String> = env::args().collect();
    match raw_args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            if let Err(e) = nestegg::api::run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Some("plan") => {
            if let Err(e) = nestegg::api::run_plan_command(&raw_args[2..]) {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Some("drawdown") => {
            if let Err(e) = nestegg::api::run_drawdown_command(&raw_args[2..]) {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        _ => {
            eprintln!("Usage: cargo run -- serve [port]");
            eprintln!("       cargo run -- plan [--start-amount N --monthly-contribution N ...]");
            eprintln!("       cargo run -- drawdown [--initial-pot N --monthly-drawdown N ...]");
            std::process::exit(1);
        }
    }
}
