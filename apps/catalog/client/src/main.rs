//! Catalog CLI
//!
//! Talks to the Catalog API at `--api-url` / `CATALOG_API_URL`.

use catalog_client::{
    ConsoleNotifier, DEFAULT_API_URL, Product, ProductForm, ProductList, ProductsClient,
};
use clap::{Parser, Subcommand};
use core_config::tracing::{init_cli_tracing, install_color_eyre};
use eyre::{Result, bail};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "List, search, sort and edit products in the catalog")]
struct Cli {
    /// Base URL of the products API
    #[arg(long, global = true, env = "CATALOG_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every product
    List,

    /// Products whose name contains NAME (case-sensitive)
    Search { name: String },

    /// List ordered by name, category or price
    Sort {
        field: String,

        /// Descending order
        #[arg(long)]
        desc: bool,
    },

    /// Products in a category
    Category { name: String },

    /// Number of products
    Count,

    /// Show one product
    Show { id: i32 },

    /// Create a product
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        price: Decimal,
        /// Explicit id; the server assigns one when omitted
        #[arg(long)]
        id: Option<i32>,
    },

    /// Replace fields of an existing product
    Edit {
        id: i32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        price: Option<Decimal>,
    },

    /// Delete a product
    Delete { id: i32 },

    /// Delete every product
    DeleteAll,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();
    init_cli_tracing();

    let cli = Cli::parse();
    let client = ProductsClient::new(&cli.api_url)?;
    tracing::debug!(api_url = client.base_url(), "Using catalog API");

    match cli.command {
        Commands::List => {
            let mut list = ProductList::new(client, ConsoleNotifier);
            list.load().await?;
            print_products(&list.products);
        }
        Commands::Search { name } => {
            let mut list = ProductList::new(client, ConsoleNotifier);
            list.search_name = name;
            list.search().await?;
            print_products(&list.products);
        }
        Commands::Sort { field, desc } => {
            let mut list = ProductList::new(client, ConsoleNotifier);
            list.sort_by = field;
            list.set_sort_asc(!desc).await?;
            print_products(&list.products);
        }
        Commands::Category { name } => {
            print_products(&client.by_category(&name).await?);
        }
        Commands::Count => {
            println!("{}", client.count().await?);
        }
        Commands::Show { id } => match client.get(id).await? {
            Some(product) => print_products(&[product]),
            None => bail!("Product {} not found", id),
        },
        Commands::Add {
            name,
            description,
            category,
            price,
            id,
        } => {
            let mut form = ProductForm::open(client, ConsoleNotifier, None).await?;
            form.product = Product::new(name, description, category, price).with_id(id.unwrap_or(0));
            if !form.submit().await {
                bail!("Product was not created");
            }
        }
        Commands::Edit {
            id,
            name,
            description,
            category,
            price,
        } => {
            let mut form = ProductForm::open(client, ConsoleNotifier, Some(id)).await?;
            if let Some(name) = name {
                form.product.name = name;
            }
            if let Some(description) = description {
                form.product.description = description;
            }
            if let Some(category) = category {
                form.product.category = category;
            }
            if let Some(price) = price {
                form.product.price = price;
            }
            if !form.submit().await {
                bail!("Product {} was not updated", id);
            }
        }
        Commands::Delete { id } => {
            let mut list = ProductList::new(client, ConsoleNotifier);
            if !list.delete(id).await {
                bail!("Product {} was not deleted", id);
            }
        }
        Commands::DeleteAll => {
            let mut list = ProductList::new(client, ConsoleNotifier);
            if !list.delete_all().await {
                bail!("Products were not deleted");
            }
        }
    }

    Ok(())
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products");
        return;
    }

    println!("{:>6}  {:<28} {:<18} {:>12}  DESCRIPTION", "ID", "NAME", "CATEGORY", "PRICE");
    for product in products {
        println!(
            "{:>6}  {:<28} {:<18} {:>12}  {}",
            product.id, product.name, product.category, product.price, product.description
        );
    }
}
