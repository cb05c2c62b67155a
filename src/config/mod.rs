pub mod cli;
pub mod toml_config;

pub use cli::LocalStorage;
pub use toml_config::{ChannelKind, ShopConfig};

#[cfg(feature = "cli")]
use crate::utils::error::{Result, ShopError};
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use chrono::NaiveDate;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "bespoke-bouquet")]
#[command(about = "Storefront tools for The Bespoke Bouquet Co.")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log CPU and memory usage")]
    pub monitor: bool,

    #[arg(long, global = true, help = "Emit JSON log lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Load the catalog and print a summary
    Catalog,
    /// Inspect or change the basket
    #[command(subcommand)]
    Cart(CartCommand),
    /// Delivery quote for a UK postcode
    Quote { postcode: String },
    /// Validate the checkout form and submit the order
    Checkout(CheckoutArgs),
    /// Run the particle field headless
    Simulate(SimulateArgs),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum CartCommand {
    List,
    Add {
        product_id: String,
        #[arg(long, default_value = "1")]
        quantity: u32,
    },
    /// Order something similar to a gallery image
    Customize {
        image_id: String,
        #[arg(long)]
        size: Option<String>,
        /// Add-on id, optionally with details: `card=Happy birthday`
        #[arg(long = "add-on")]
        add_ons: Vec<String>,
        #[arg(long, default_value = "1")]
        quantity: u32,
    },
    Remove {
        id: String,
    },
    Quantity {
        id: String,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    Clear,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChannelArg {
    Email,
    Messaging,
}

#[cfg(feature = "cli")]
impl From<ChannelArg> for ChannelKind {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Email => ChannelKind::Email,
            ChannelArg::Messaging => ChannelKind::Messaging,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub postcode: String,
    #[arg(long, help = "Delivery date, YYYY-MM-DD")]
    pub date: NaiveDate,
    #[arg(long)]
    pub card_message: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub accept_terms: bool,
    #[arg(long, value_enum)]
    pub channel: Option<ChannelArg>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PointerArg {
    Idle,
    Circle,
    Sweep,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    #[arg(long, default_value = "600")]
    pub frames: u64,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long, value_enum, default_value = "circle")]
    pub pointer: PointerArg,
    #[arg(long, help = "Write the trajectory as CSV")]
    pub csv: Option<String>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn load_shop_config(&self) -> Result<ShopConfig> {
        match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                ShopConfig::from_file(path)
            }
            None => Ok(ShopConfig::default()),
        }
    }
}

/// `id` or `id=details`
#[cfg(feature = "cli")]
pub fn parse_add_on(arg: &str) -> (String, Option<String>) {
    match arg.split_once('=') {
        Some((id, details)) => (id.trim().to_string(), Some(details.to_string())),
        None => (arg.trim().to_string(), None),
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        match &self.command {
            Command::Simulate(args) => {
                if args.frames == 0 {
                    return Err(ShopError::InvalidConfigValueError {
                        field: "frames".to_string(),
                        value: "0".to_string(),
                        reason: "Simulate at least one frame".to_string(),
                    });
                }
                if let Some(csv) = &args.csv {
                    validate_path("csv", csv)?;
                }
            }
            Command::Cart(CartCommand::Quantity { delta: 0, .. }) => {
                return Err(ShopError::ValidationError {
                    message: "quantity delta must not be zero".to_string(),
                });
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simulate_command() {
        let cli = CliConfig::parse_from([
            "bespoke-bouquet",
            "--verbose",
            "simulate",
            "--frames",
            "120",
            "--pointer",
            "sweep",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Command::Simulate(args) => {
                assert_eq!(args.frames, 120);
                assert_eq!(args.pointer, PointerArg::Sweep);
                assert_eq!(args.seed, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_customize_with_add_ons() {
        let cli = CliConfig::parse_from([
            "bespoke-bouquet",
            "cart",
            "customize",
            "img-1",
            "--size",
            "l",
            "--add-on",
            "vase",
            "--add-on",
            "card=Happy birthday",
        ]);
        match cli.command {
            Command::Cart(CartCommand::Customize { add_ons, size, .. }) => {
                assert_eq!(size.as_deref(), Some("l"));
                assert_eq!(parse_add_on(&add_ons[0]), ("vase".to_string(), None));
                assert_eq!(
                    parse_add_on(&add_ons[1]),
                    ("card".to_string(), Some("Happy birthday".to_string()))
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_negative_quantity_delta() {
        let cli = CliConfig::parse_from(["bespoke-bouquet", "cart", "quantity", "1", "-2"]);
        assert!(matches!(
            cli.command,
            Command::Cart(CartCommand::Quantity { delta: -2, .. })
        ));
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_zero_frames_rejected() {
        let cli = CliConfig::parse_from(["bespoke-bouquet", "simulate", "--frames", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_checkout_date_parsing() {
        let cli = CliConfig::parse_from([
            "bespoke-bouquet",
            "checkout",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "--phone",
            "07700900123",
            "--address",
            "1 Road",
            "--postcode",
            "SW1A 1AA",
            "--date",
            "2024-02-14",
            "--accept-terms",
            "--channel",
            "messaging",
        ]);
        match cli.command {
            Command::Checkout(args) => {
                assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
                assert_eq!(args.channel, Some(ChannelArg::Messaging));
                assert!(args.accept_terms);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
