mod cli;
mod infra;
mod reports;
mod routes;
mod server;

use green_score::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
