//! Seed the catalog with user products from YAML.
//!
//! Every entry is validated before anything is written, so a file with one bad
//! entry imports nothing. See `voidshop_storefront::services::catalog` for the
//! file format.

use std::path::Path;

use tracing::info;

use voidshop_storefront::error::AppError;
use voidshop_storefront::state::AppState;

use super::CliError;

/// Import the products listed in `file`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, an entry is invalid,
/// or the database write fails.
pub async fn run(state: &AppState, file: &Path) -> Result<(), CliError> {
    info!(path = %file.display(), "Loading products from file");

    let result = state
        .catalog()
        .seed_from_file(file)
        .await
        .map_err(AppError::from)?;

    info!("Seeding complete!");
    info!("  Products inserted: {}", result.inserted.len());
    info!("  Catalog size: {}", state.catalog().products().len());
    Ok(())
}
