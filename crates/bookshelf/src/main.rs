//! The main function for the Bookshelf command line application
use std::process::ExitCode;

#[allow(clippy::print_stderr, reason = "No other tracing loaded at this point")]
#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine, the database may come from the flag or the environment
    if let Err(error) = dotenvy::dotenv() {
        if !error.not_found() {
            eprintln!("Failed to load environment variables: {error}");
            return ExitCode::FAILURE;
        }
    }
    bookshelf_lib::run().await
}
