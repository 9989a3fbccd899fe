use std::path::PathBuf;

use charm_address::config::ENV_SNAPSHOT;
use charm_address::NetworkRole;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "charm-address")]
#[command(about = "Resolve the address and canonical URL a unit is reached on")]
pub struct Cli {
    /// Resolve from a recorded unit snapshot instead of the hook tools.
    #[arg(long, global = true, env = ENV_SNAPSHOT)]
    pub snapshot: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Print the address for a network role.
    Address(AddressArgs),
    /// Print the canonical base URL for a network role.
    Url(UrlArgs),
}

#[derive(Parser, Debug)]
pub struct AddressArgs {
    /// admin, internal or public.
    #[arg(long, default_value_t = NetworkRole::Public)]
    pub role: NetworkRole,
}

#[derive(Parser, Debug)]
pub struct UrlArgs {
    #[arg(long, default_value_t = NetworkRole::Public)]
    pub role: NetworkRole,
    /// Mark a configuration context complete (repeatable), e.g. `https`.
    #[arg(long)]
    pub context: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_defaults_to_public() {
        let cli = Cli::try_parse_from(["charm-address", "address"]).unwrap();
        match cli.command {
            Command::Address(args) => assert_eq!(args.role, NetworkRole::Public),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_url_with_contexts() {
        let cli = Cli::try_parse_from([
            "charm-address",
            "url",
            "--role",
            "internal",
            "--context",
            "https",
            "--snapshot",
            "unit.json",
        ])
        .unwrap();
        assert_eq!(cli.snapshot, Some(PathBuf::from("unit.json")));
        match cli.command {
            Command::Url(args) => {
                assert_eq!(args.role, NetworkRole::Internal);
                assert_eq!(args.context, vec!["https".to_string()]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_role() {
        assert!(Cli::try_parse_from(["charm-address", "address", "--role", "private"]).is_err());
    }
}
