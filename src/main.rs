use clap::Parser;
use train_estimator::utils::{logger, validation::Validate};
use train_estimator::{
    CliArgs, EstimatorError, FixedPriceLookup, HttpPriceLookup, PriceEstimator, PriceLookup, Quote,
    TripRequest,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(args.verbose, config.log_level());
    } else {
        logger::init_cli_logger(args.verbose, config.log_level());
    }

    tracing::debug!("CLI args: {:?}", args);

    // 驗證配置
    if let Err(e) = args.validate().and_then(|_| config.validate()) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let request = match args.trip_request() {
        Ok(request) => request,
        Err(e) => exit_with(&e),
    };

    let result = match args.base_fare {
        Some(fare) => {
            tracing::info!("Pricing offline with base fare {}", fare);
            quote(FixedPriceLookup::new(fare), &request).await
        }
        None => {
            let lookup = match HttpPriceLookup::from_config(&config) {
                Ok(lookup) => lookup,
                Err(e) => {
                    tracing::error!("❌ Could not build the pricing client: {}", e);
                    exit_with(&e);
                }
            };
            tracing::info!("Using pricing service at {}", lookup.endpoint());
            quote(lookup, &request).await
        }
    };

    match result {
        Ok(quote) => {
            if args.breakdown {
                print_breakdown(&quote);
            }
            println!("{}", quote.total.normalize());
        }
        Err(e) => {
            tracing::error!("❌ Estimate failed: {}", e);
            exit_with(&e);
        }
    }

    Ok(())
}

async fn quote<L: PriceLookup>(lookup: L, request: &TripRequest) -> train_estimator::Result<Quote> {
    PriceEstimator::new(lookup).quote(request).await
}

fn print_breakdown(quote: &Quote) {
    println!("base fare: {}", quote.base_fare.normalize());
    for (index, passenger) in quote.passengers.iter().enumerate() {
        println!(
            "passenger {}: {:?} {}",
            index + 1,
            passenger.kind,
            passenger.amount.normalize()
        );
    }
    println!("group adjustment: {}", quote.group_adjustment.normalize());
}

fn exit_with(e: &EstimatorError) -> ! {
    eprintln!("❌ {}", e);
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}
