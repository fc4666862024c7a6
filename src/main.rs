mod bridge;
mod cli;
mod commands;
mod daylio;
mod env_loader;
mod error;
mod logging;
mod pixels;

fn main() {
    env_loader::load_dotenv();

    if let Err(err) = cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
