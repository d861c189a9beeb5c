//! Utility modules

pub mod logger;
pub mod validation;

/// Prepare the process environment: load `.env`, initialize logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logger::init_logger();
    Ok(())
}
