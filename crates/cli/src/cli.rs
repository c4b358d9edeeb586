use std::{io, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use jiff::Zoned;
use storefront::{
    checkout::{CheckoutForm, OrderSubmission, SimulatedVerifier},
    config::CartConfig,
    fixtures::{load_catalog, load_catalog_file},
    manager::CartManager,
    money::format_price,
    products::{Catalog, ProductId},
};
use tabled::{builder::Builder, settings::Style};
use tracing::info;

use crate::{
    logging::LoggingConfig,
    sink::{HttpFormSink, TokioDelay},
    storage::FileStorage,
    surface::TerminalSurface,
};

const MERCH_CATALOG_YAML: &str = include_str!("../../../fixtures/products/merch.yml");

type Manager = CartManager<FileStorage, TerminalSurface<io::Stdout>>;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront cart CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    /// Cart configuration YAML; built-in defaults when omitted
    #[arg(long, env = "STOREFRONT_CONFIG")]
    config: Option<PathBuf>,

    /// Product catalog YAML; the bundled merch catalog when omitted
    #[arg(long, env = "STOREFRONT_CATALOG")]
    catalog: Option<PathBuf>,

    /// Directory holding the persisted cart
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = ".storefront")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the catalog by collection
    Products,

    /// Add a product to the cart
    Add(AddArgs),

    /// Remove a product from the cart
    Remove(ProductArgs),

    /// Set a line quantity; zero or less removes the line
    Set(SetArgs),

    /// Show the cart
    Show,

    /// Place an order for the cart
    Checkout(CheckoutArgs),
}

#[derive(Debug, Args)]
struct ProductArgs {
    /// Product id
    id: u32,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product id
    id: u32,

    /// Units to add
    #[arg(short, long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct SetArgs {
    /// Product id
    id: u32,

    /// New quantity
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    /// Student number
    #[arg(long)]
    student_number: String,

    /// Full name
    #[arg(long)]
    student_name: String,

    /// Class section
    #[arg(long)]
    section: String,

    /// Contact email
    #[arg(long)]
    email: String,

    /// Payment mode label as configured (e.g. "Cash", "Gcash")
    #[arg(long)]
    payment: String,

    /// Mobile-wallet payment reference
    #[arg(long, default_value = "")]
    reference: String,

    /// Print the form post instead of sending it; the cart is kept
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let config = match &self.config {
            Some(path) => CartConfig::from_file(path),
            None => Ok(CartConfig::default()),
        }
        .map_err(|error| format!("failed to load configuration: {error}"))?;

        let catalog = match &self.catalog {
            Some(path) => load_catalog_file(path),
            None => load_catalog(MERCH_CATALOG_YAML),
        }
        .map_err(|error| format!("failed to load catalog: {error}"))?;

        let currency = config
            .resolve_currency()
            .map_err(|error| format!("invalid configuration: {error}"))?;

        if catalog.currency() != currency {
            return Err(format!(
                "catalog is priced in {} but the cart uses {}",
                catalog.currency().iso_alpha_code,
                currency.iso_alpha_code
            ));
        }

        let mut manager = CartManager::new(
            config,
            FileStorage::new(&self.data_dir),
            TerminalSurface::new(io::stdout()),
        )
        .map_err(|error| format!("invalid configuration: {error}"))?;

        manager.surface_mut().show_badge();

        match self.command {
            Commands::Products => {
                list_products(&catalog, manager.config());
                Ok(())
            }
            Commands::Add(args) => add(&mut manager, &catalog, &args),
            Commands::Remove(args) => {
                manager.remove_item(product_id(args.id)?);
                Ok(())
            }
            Commands::Set(args) => {
                manager.update_quantity(product_id(args.id)?, args.quantity);
                manager.render_cart();
                Ok(())
            }
            Commands::Show => {
                manager.render_cart();
                Ok(())
            }
            Commands::Checkout(args) => checkout(&mut manager, args).await,
        }
    }
}

fn product_id(id: u32) -> Result<ProductId, String> {
    ProductId::new(id).ok_or_else(|| "product ids start at 1".to_string())
}

fn add(manager: &mut Manager, catalog: &Catalog, args: &AddArgs) -> Result<(), String> {
    let id = product_id(args.id)?;
    let product = catalog
        .get(id)
        .ok_or_else(|| format!("no product with id {id}"))?;

    if args.quantity == 0 {
        return Err("quantity must be at least 1".to_string());
    }

    manager.add_item(product);

    if args.quantity > 1
        && let Some(item) = manager.cart().get(id)
    {
        let quantity = i64::from(item.quantity()) + i64::from(args.quantity) - 1;
        manager.update_quantity(id, quantity);
    }

    Ok(())
}

#[expect(clippy::print_stdout, reason = "catalog listing is command output")]
fn list_products(catalog: &Catalog, config: &CartConfig) {
    for (collection, products) in catalog.collections() {
        let mut builder = Builder::default();

        builder.push_record(["ID", "Name", "Price", "Description"]);

        for product in products {
            builder.push_record([
                product.id.to_string(),
                product.name.clone(),
                format_price(&product.price, config.symbol()),
                product.description.clone(),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());

        println!("{}\n{table}\n", collection.unwrap_or("Products"));
    }
}

async fn checkout(manager: &mut Manager, args: CheckoutArgs) -> Result<(), String> {
    let payment_mode = manager.config().mode_for_label(&args.payment).ok_or_else(|| {
        let accepted: Vec<&str> = manager
            .config()
            .payment_modes
            .iter()
            .map(|option| option.label.as_str())
            .collect();

        format!(
            "unknown payment mode '{}'; expected one of: {}",
            args.payment,
            accepted.join(", ")
        )
    })?;

    let form = CheckoutForm {
        student_number: args.student_number,
        student_name: args.student_name,
        section: args.section,
        email: args.email,
        payment_mode: Some(payment_mode),
        payment_reference: args.reference,
    };

    if args.dry_run {
        return preview(manager, &form);
    }

    manager.checkout().map_err(|error| error.to_string())?;

    let verifier = SimulatedVerifier::new(TokioDelay, manager.config().verification_delay());
    let sink = HttpFormSink::new(reqwest::Client::new());

    let result = manager.process_checkout(&form, &verifier, &sink).await;

    sink.drain().await;

    let order = result.map_err(|error| error.to_string())?;

    info!(total = %order.total, items = %order.items, "order placed");

    Ok(())
}

#[expect(clippy::print_stdout, reason = "form preview is command output")]
fn preview(manager: &Manager, form: &CheckoutForm) -> Result<(), String> {
    if manager.cart().is_empty() {
        return Err("Your cart is empty!".to_string());
    }

    form.validate(manager.config())
        .map_err(|error| error.to_string())?;

    let order = OrderSubmission::build(form, manager.cart(), manager.config(), &Zoned::now())
        .map_err(|error| error.to_string())?;
    let post = order.to_form(&manager.config().endpoint);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);

    for (name, value) in &post.fields {
        builder.push_record([name.as_str(), value.as_str()]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    println!("POST {}\n{table}", post.action);

    Ok(())
}
