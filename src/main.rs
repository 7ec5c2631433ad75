//! # tidybatch CLI
//!
//! Command-line interface for the batch file sorter.
//!
//! ## Usage
//! ```bash
//! tidybatch sort ~/inbox ~/sorted --max-per-folder 500
//! tidybatch sort ~/inbox ~/sorted --dry-run --output json
//! ```

mod cli;

use tidybatch::Result;

fn main() -> Result<()> {
    cli::run()
}
