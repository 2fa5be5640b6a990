//! Handler for the `link-wallet` command.

use serde_json::json;

use super::command::LinkWalletArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::sqlite::SqliteUserDirectory;
use crate::domain::id::UserId;
use crate::error::{ConfigError, Result};
use crate::infrastructure::bootstrap::open_database;
use crate::infrastructure::config::Config;

/// Execute the link-wallet command.
pub fn execute(config: &Config, args: &LinkWalletArgs) -> Result<()> {
    let address = args.address.trim();
    if !is_hex_address(address) {
        return Err(ConfigError::InvalidValue {
            field: "address",
            reason: format!("'{address}' is not a 0x-prefixed 20-byte hex address"),
        }
        .into());
    }

    let directory = SqliteUserDirectory::new(open_database(config)?);
    let user_id = UserId::from(args.user.as_str());
    directory.link_wallet(&user_id, address)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "link-wallet",
            "userId": user_id,
            "address": address,
        }));
        return Ok(());
    }
    output::success(&format!("Linked {address} to {user_id}"));
    Ok(())
}

fn is_hex_address(address: &str) -> bool {
    address
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_checksummed_address() {
        assert!(is_hex_address("0x5FbDB2315678afecb367f032d93F642f64180aa3"));
    }

    #[test]
    fn rejects_short_or_unprefixed_address() {
        assert!(!is_hex_address("0x1234"));
        assert!(!is_hex_address("5FbDB2315678afecb367f032d93F642f64180aa3"));
    }
}
