use std::{
    error::Error,
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Parser, Subcommand, ValueEnum};
use time::OffsetDateTime;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use stocksight::{
    AlertPoller, ApiClient, ClientConfig, CsvExport, DashboardData, DateWindow, Granularity,
    PriceField, RankField, SessionContext, build_print_document, compute_series, compute_summary,
    compute_top_n, dashboard_document, export_csv, format_currency, inventory_value,
    movement_table, parts_table, potential_profit, potential_revenue, shutdown_signal,
    stock_level_counts,
};

/// Reporting and export tool for the stocksight inventory API.
///
/// The API location, timezone, and poll interval are read from the
/// STOCKSIGHT_API_URL, STOCKSIGHT_TIMEZONE, and STOCKSIGHT_POLL_SECONDS
/// environment variables.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the dashboard as a standalone HTML document.
    Dashboard {
        /// Granularity of the stock movement chart.
        #[arg(long, value_enum, default_value_t = GranularityArg::Daily)]
        granularity: GranularityArg,

        /// File path the document is written to.
        #[arg(long, default_value = "dashboard.html")]
        out: PathBuf,
    },

    /// Summarize the stock-in ledger.
    StockIn {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Summarize the stock-out ledger.
    StockOut {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Summarize the parts catalogue.
    Parts {
        /// How many parts the quantity ranking shows.
        #[arg(long, default_value_t = 5)]
        top: usize,

        /// File path to write a printable document to.
        #[arg(long)]
        print: Option<PathBuf>,
    },

    /// Write the CSV export presets.
    Export {
        /// Which collection to export.
        #[arg(long, value_enum, default_value_t = CollectionArg::All)]
        collection: CollectionArg,

        /// Directory the export files are written into.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Follow the open alert count until interrupted.
    WatchAlerts {
        /// Run a server side alert check before watching.
        #[arg(long)]
        check: bool,
    },

    /// Verify credentials against the inventory API.
    Login {
        /// Sign-in email.
        #[arg(long)]
        email: String,
    },
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Date window applied to the ledger.
    #[arg(long, value_enum, default_value_t = WindowArg::All)]
    window: WindowArg,

    /// Case insensitive search over part names and ids.
    #[arg(long, default_value = "")]
    search: String,

    /// Also print the movement series at this granularity.
    #[arg(long, value_enum)]
    series: Option<GranularityArg>,

    /// File path to write a printable document to.
    #[arg(long)]
    print: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WindowArg {
    All,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl From<WindowArg> for DateWindow {
    fn from(value: WindowArg) -> DateWindow {
        match value {
            WindowArg::All => DateWindow::All,
            WindowArg::Daily => DateWindow::Daily,
            WindowArg::Weekly => DateWindow::Weekly,
            WindowArg::Monthly => DateWindow::Monthly,
            WindowArg::Yearly => DateWindow::Yearly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GranularityArg {
    Daily,
    Monthly,
    Yearly,
}

impl From<GranularityArg> for Granularity {
    fn from(value: GranularityArg) -> Granularity {
        match value {
            GranularityArg::Daily => Granularity::Daily,
            GranularityArg::Monthly => Granularity::Monthly,
            GranularityArg::Yearly => Granularity::Yearly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CollectionArg {
    Products,
    StockIn,
    StockOut,
    All,
}

enum Ledger {
    StockIn,
    StockOut,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();
    let config = ClientConfig::from_env();
    let client = ApiClient::new(&config)?;

    match args.command {
        Command::Dashboard { granularity, out } => {
            run_dashboard(&client, &config, granularity.into(), &out).await
        }
        Command::StockIn { filters } => {
            run_movement_report(&client, &config, Ledger::StockIn, &filters).await
        }
        Command::StockOut { filters } => {
            run_movement_report(&client, &config, Ledger::StockOut, &filters).await
        }
        Command::Parts { top, print } => {
            run_parts_report(&client, &config, top, print.as_deref()).await
        }
        Command::Export { collection, dir } => {
            run_export(&client, &config, collection, &dir).await
        }
        Command::WatchAlerts { check } => run_watch_alerts(&client, &config, check).await,
        Command::Login { email } => run_login(&client, &email).await,
    }
}

async fn run_dashboard(
    client: &ApiClient,
    config: &ClientConfig,
    granularity: Granularity,
    out: &Path,
) -> Result<(), Box<dyn Error>> {
    let now = OffsetDateTime::now_utc();
    let offset = config.local_offset(now)?;

    let data = DashboardData::load(client, offset).await?;

    for counter in data.counters() {
        println!("{:<20} {}", counter.label, counter.count);
    }

    let document = dashboard_document(&data, granularity, now.to_offset(offset));
    fs::write(out, document)?;
    println!("Dashboard written to {}", out.display());

    Ok(())
}

async fn run_movement_report(
    client: &ApiClient,
    config: &ClientConfig,
    ledger: Ledger,
    filters: &FilterArgs,
) -> Result<(), Box<dyn Error>> {
    let now = OffsetDateTime::now_utc();
    let offset = config.local_offset(now)?;
    let today = now.to_offset(offset).date();

    let catalogue = client.fetch_catalogue().await?;
    let (movements, price_field, heading) = match ledger {
        Ledger::StockIn => (
            client.fetch_stock_in(&catalogue.parts, offset).await?,
            PriceField::Buying,
            "Stock In",
        ),
        Ledger::StockOut => (
            client.fetch_stock_out(&catalogue.parts, offset).await?,
            PriceField::Selling,
            "Stock Out",
        ),
    };

    let window = DateWindow::from(filters.window);
    let summary = compute_summary(&movements, window, &filters.search, today, price_field);

    println!("{heading} report ({})", window.label());
    println!("{:<16} {}", "Records", summary.filtered.len());
    println!("{:<16} {}", "Total Quantity", summary.total_quantity);
    println!(
        "{:<16} {}",
        "Total Amount",
        format_currency(summary.total_amount)
    );
    if let Some(profit) = summary.total_profit {
        println!("{:<16} {}", "Total Profit", format_currency(profit));
    }

    if let Some(granularity) = filters.series {
        println!();
        for point in compute_series(&summary.filtered, granularity.into(), today) {
            println!(
                "{:<28} {:>6} units  {:>3} records",
                point.full_label, point.value, point.record_count
            );
        }
    }

    if let Some(path) = &filters.print {
        let document =
            build_print_document(&movement_table(&summary.filtered), now.to_offset(offset));
        fs::write(path, document)?;
        println!("Printable report written to {}", path.display());
    }

    Ok(())
}

async fn run_parts_report(
    client: &ApiClient,
    config: &ClientConfig,
    top: usize,
    print: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let catalogue = client.fetch_catalogue().await?;
    let counts = stock_level_counts(&catalogue.parts);

    println!("Parts report");
    println!("{:<20} {}", "Parts", catalogue.parts.len());
    println!("{:<20} {}", "In Stock", counts.in_stock);
    println!("{:<20} {}", "Low Stock", counts.low_stock);
    println!("{:<20} {}", "Out of Stock", counts.out_of_stock);
    println!(
        "{:<20} {}",
        "Inventory Value",
        format_currency(inventory_value(&catalogue.parts))
    );
    println!(
        "{:<20} {}",
        "Potential Revenue",
        format_currency(potential_revenue(&catalogue.parts))
    );
    println!(
        "{:<20} {}",
        "Potential Profit",
        format_currency(potential_profit(&catalogue.parts))
    );

    if top > 0 {
        println!();
        println!("Top {top} parts by quantity");
        for entry in compute_top_n(&catalogue.parts, RankField::Quantity, top) {
            println!(
                "{:<28} {:>8} units  {:>5.1}%",
                entry.name, entry.value, entry.percentage
            );
        }
    }

    if let Some(path) = print {
        let now = OffsetDateTime::now_utc();
        let offset = config.local_offset(now)?;
        let document = build_print_document(&parts_table(&catalogue.parts), now.to_offset(offset));
        fs::write(path, document)?;
        println!("Printable report written to {}", path.display());
    }

    Ok(())
}

async fn run_export(
    client: &ApiClient,
    config: &ClientConfig,
    collection: CollectionArg,
    directory: &Path,
) -> Result<(), Box<dyn Error>> {
    let now = OffsetDateTime::now_utc();
    let offset = config.local_offset(now)?;
    let today = now.to_offset(offset).date();

    let catalogue = client.fetch_catalogue().await?;

    let needs_stock_in = matches!(collection, CollectionArg::StockIn | CollectionArg::All);
    let needs_stock_out = matches!(collection, CollectionArg::StockOut | CollectionArg::All);

    let stock_in = if needs_stock_in {
        client.fetch_stock_in(&catalogue.parts, offset).await?
    } else {
        Vec::new()
    };
    let stock_out = if needs_stock_out {
        client.fetch_stock_out(&catalogue.parts, offset).await?
    } else {
        Vec::new()
    };

    let mut exports = Vec::new();
    if matches!(collection, CollectionArg::Products | CollectionArg::All) {
        exports.push(CsvExport::Products(&catalogue.parts));
    }
    if needs_stock_in {
        exports.push(CsvExport::StockIn(&stock_in));
    }
    if needs_stock_out {
        exports.push(CsvExport::StockOut(&stock_out));
    }

    for export in exports {
        match export_csv(export, directory, today)? {
            Some(path) => println!("Wrote {}", path.display()),
            None => println!("Skipped {} (no records)", export.stem()),
        }
    }

    Ok(())
}

async fn run_watch_alerts(
    client: &ApiClient,
    config: &ClientConfig,
    check: bool,
) -> Result<(), Box<dyn Error>> {
    if check {
        let outcome = client.check_alerts().await?;
        println!(
            "Alert check: {} created, {} updated, {} resolved",
            outcome.created, outcome.updated, outcome.resolved
        );
    }

    let alerts = client.fetch_open_alerts().await?;
    println!("{} open alerts", alerts.len());
    for alert in &alerts {
        println!(
            "[{}] {:<28} {} on hand, threshold {}",
            alert.level.as_str(),
            alert.part_name,
            alert.quantity,
            alert.threshold
        );
    }

    let poller = AlertPoller::start(client.clone(), config.poll_interval);
    let mut badge = poller.subscribe();

    println!("Watching the open alert count, press ctrl+c to stop");

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = badge.changed() => {
                if changed.is_err() {
                    break;
                }

                println!("Open alerts: {}", *badge.borrow_and_update());
            }
            _ = &mut shutdown => break,
        }
    }

    Ok(())
}

async fn run_login(client: &ApiClient, email: &str) -> Result<(), Box<dyn Error>> {
    let password = rpassword::prompt_password("Password: ")?;

    let session = client.login(email, &password).await?;
    let context = SessionContext::authenticated(session);

    let session = context.require()?;
    println!(
        "Signed in as {} <{}> ({})",
        session.user.name, session.user.email, session.user.role
    );

    Ok(())
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}
