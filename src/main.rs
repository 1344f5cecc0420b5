#[tokio::main]
async fn main() {
  // Minimal CLI: support --version/-V
  let mut args = std::env::args().skip(1);
  if let Some(arg) = args.next() {
    if arg == "--version" || arg == "-V" {
      println!("logsink {}", env!("CARGO_PKG_VERSION"));
      return;
    }
    if arg == "--help" || arg == "-h" {
      eprintln!("Usage: logsink [--version]");
      eprintln!();
      eprintln!("Environment:");
      eprintln!("  DB_HOST, DB_PORT, DB_NAME, DB_USER, DB_PASSWORD  PostgreSQL settings");
      eprintln!("  DB_URL               full URL override (sqlite:// or postgres://)");
      eprintln!("  DB_MAX_CONNECTIONS   pool size (default 5)");
      eprintln!("  LOGSINK_ADDR         bind address (default 0.0.0.0:5000)");
      eprintln!("  RUST_LOG             tracing filter (default info)");
      return;
    }
  }

  if let Err(e) = logsink::app::run().await {
    eprintln!("error: {e}");
    std::process::exit(1);
  }
}
