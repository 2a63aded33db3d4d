use std::{ffi::OsString, path::PathBuf, process::ExitCode, time::Instant};

use clap::{error::ErrorKind, CommandFactory, Parser};
use env_logger::Env;
use sales_total::{load_price_catalog, load_sales_list, Elapsed, Report, Status, RESULTS_FILE};

#[derive(Parser)]
#[command(version, about = "Totals the value of a sales list, using a price list")]
struct Args {
    /// JSON file listing products and their unit prices
    price_list: PathBuf,
    /// JSON file listing sales (product and quantity)
    sales_list: PathBuf,
    /// File to write the results to
    #[arg(short, long, env = "SALES_RESULTS", default_value = RESULTS_FILE)]
    output: PathBuf,
    /// Further arguments are accepted and ignored
    #[arg(hide = true, trailing_var_arg = true)]
    _extra: Vec<OsString>,
}

fn main() -> ExitCode {
    let started = Instant::now();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.kind() == ErrorKind::MissingRequiredArgument => {
            println!("{}", Args::command().render_usage());
            return Status::Ok.into();
        }
        Err(e) => e.exit(),
    };

    let (price_status, catalog) = load_price_catalog(&args.price_list);
    let (sales_status, sales) = load_sales_list(&args.sales_list);

    if let (Status::Ok, Status::Ok, Some(catalog), Some(sales)) =
        (price_status, sales_status, &catalog, &sales)
    {
        let mut report = Report::new(&args.price_list, &args.sales_list);
        report.add_sales(catalog, sales);
        for product in report.missing_products() {
            println!("Product {product} is not in the price list.");
        }
        if let Err(e) = report.write(&args.output) {
            results_error(&e);
            println!("{}", Elapsed(started.elapsed()));
            return Status::Error.into();
        }
        print!("{report}");
    }

    let elapsed = Elapsed(started.elapsed());
    if let Err(e) = elapsed.append_to(&args.output) {
        results_error(&e);
        println!("{elapsed}");
        return Status::Error.into();
    }
    println!("{elapsed}");
    ExitCode::from(price_status + sales_status)
}

fn results_error(e: &anyhow::Error) {
    log::error!("writing results: {e:#}");
    println!("[ERROR] - An exception ocurred while processing results file: {e:#}");
}
