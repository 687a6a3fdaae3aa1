//! Hunar Bazaar CLI - cart management and checkout driver.
//!
//! # Usage
//!
//! ```bash
//! # Add two units of a catalog product to the local cart
//! bazaar-cli cart add -p prod-1 -n "Clay pot" --localized-name "مٹی کا برتن" \
//!     --price 450 --stock 5 -q 2
//!
//! # Show the cart with totals
//! bazaar-cli cart list
//!
//! # Change a quantity (clamped to stock) or drop a line
//! bazaar-cli cart update -p prod-1 -q 3
//! bazaar-cli cart remove -p prod-1
//!
//! # Check out with cash on delivery
//! bazaar-cli checkout --name "Zainab Bibi" --email zainab@example.com \
//!     --phone 0300-1234567 --address "House 12, Street 4" --city Bahawalpur \
//!     --postal-code 63100 --notes "Call before delivery"
//! ```
//!
//! # Commands
//!
//! - `cart` - Manage the durable local cart
//! - `checkout` - Walk the checkout wizard and submit an order

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use hunar_bazaar_checkout::types::{CardDetails, PaymentMethod, ShippingInfo};

mod commands;

#[derive(Parser)]
#[command(name = "bazaar-cli")]
#[command(author, version, about = "Hunar Bazaar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Walk the checkout wizard and submit the order
    Checkout {
        /// Recipient name
        #[arg(long, default_value = "")]
        name: String,

        /// Contact email
        #[arg(long, default_value = "")]
        email: String,

        /// Contact phone number
        #[arg(long, default_value = "")]
        phone: String,

        /// Street address
        #[arg(long, default_value = "")]
        address: String,

        /// City or village
        #[arg(long, default_value = "")]
        city: String,

        /// Postal code
        #[arg(long, default_value = "")]
        postal_code: String,

        /// Delivery notes
        #[arg(long, default_value = "")]
        notes: String,

        /// Pay by card instead of cash on delivery
        #[arg(long)]
        card: bool,

        /// Card number (with --card)
        #[arg(long, default_value = "")]
        card_number: String,

        /// Name on the card (with --card)
        #[arg(long, default_value = "")]
        card_holder: String,

        /// Card expiry, MM/YY (with --card)
        #[arg(long, default_value = "")]
        expiry: String,

        /// Card verification value (with --card)
        #[arg(long, default_value = "")]
        cvv: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a catalog product to the cart
    Add {
        /// Product ID
        #[arg(short = 'p', long)]
        product_id: String,

        /// English display name
        #[arg(short = 'n', long)]
        name: String,

        /// Urdu display name
        #[arg(long, default_value = "")]
        localized_name: String,

        /// Price per unit in rupees
        #[arg(long)]
        price: u64,

        /// Units in stock
        #[arg(long)]
        stock: u32,

        /// Units to add
        #[arg(short = 'q', long, default_value_t = 1)]
        quantity: u32,
    },
    /// Show cart contents and totals
    List,
    /// Set the quantity of a cart line (clamped to stock)
    Update {
        /// Product ID
        #[arg(short = 'p', long)]
        product_id: String,

        /// New quantity
        #[arg(short = 'q', long)]
        quantity: u32,
    },
    /// Remove a cart line
    Remove {
        /// Product ID
        #[arg(short = 'p', long)]
        product_id: String,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Add {
                product_id,
                name,
                localized_name,
                price,
                stock,
                quantity,
            } => commands::cart::add(&product_id, &name, &localized_name, price, stock, quantity)?,
            CartAction::List => commands::cart::list()?,
            CartAction::Update {
                product_id,
                quantity,
            } => commands::cart::update(&product_id, quantity)?,
            CartAction::Remove { product_id } => commands::cart::remove(&product_id)?,
            CartAction::Clear => commands::cart::clear()?,
        },
        Commands::Checkout {
            name,
            email,
            phone,
            address,
            city,
            postal_code,
            notes,
            card,
            card_number,
            card_holder,
            expiry,
            cvv,
        } => {
            let shipping = ShippingInfo {
                name,
                email,
                phone,
                address,
                city,
                postal_code,
                notes,
            };
            let payment = if card {
                PaymentMethod::Card(CardDetails {
                    card_number,
                    holder_name: card_holder,
                    expiry,
                    cvv,
                })
            } else {
                PaymentMethod::CashOnDelivery
            };
            commands::checkout::run(shipping, payment).await?;
        }
    }
    Ok(())
}
