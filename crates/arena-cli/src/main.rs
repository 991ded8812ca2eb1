use clap::Parser;

mod cli;
mod templates;

use cli::args::Cli;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = Cli::parse();
    cli::logging::init(cli.log_json);
    let code = match cli::commands::dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e:?}");
            cli::commands::exit_codes::CONFIG_ERROR
        }
    };
    std::process::exit(code);
}
