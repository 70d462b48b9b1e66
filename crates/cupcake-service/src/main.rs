//! Main entry point for the Cupcake Corner order client.
//!
//! This binary plays the order screen: it fills in an order from the
//! command line, refuses to send it while the address is incomplete, places
//! it through the configured transport, and prints the confirmation.

use clap::Parser;
use cupcake_config::Config;
use cupcake_core::{OrderSession, SessionBuilder, SessionFactories};
use cupcake_types::{CakeType, Outcome};
use std::path::PathBuf;
use std::process::ExitCode;

use cupcake_submission::implementations::echo::create_submitter as create_echo_submitter;
use cupcake_submission::implementations::http::create_submitter as create_http_submitter;

/// Command-line arguments for the order client.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file (built-in HTTP defaults when omitted)
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	#[command(flatten)]
	order: OrderArgs,
}

/// Order fields as entered on the order screen.
#[derive(clap::Args, Debug)]
struct OrderArgs {
	/// Cake flavor: vanilla, chocolate, strawberry or rainbow
	#[arg(long, default_value = "vanilla")]
	cake_type: CakeType,

	/// Number of cakes (clamped to 3..=20)
	#[arg(long, default_value_t = 3)]
	quantity: u32,

	/// Show the topping options
	#[arg(long)]
	special_request: bool,

	/// Add extra frosting (needs --special-request)
	#[arg(long)]
	extra_frosting: bool,

	/// Add sprinkles (needs --special-request)
	#[arg(long)]
	add_sprinkles: bool,

	#[arg(long)]
	name: Option<String>,

	#[arg(long)]
	street_address: Option<String>,

	#[arg(long)]
	city: Option<String>,

	#[arg(long)]
	zip: Option<String>,
}

/// Main entry point for the order client.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration
/// 4. Builds the order session
/// 5. Fills in and places the order
#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str()));

	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let config = match &args.config {
		Some(path) => Config::from_file(path).await?,
		None => Config::builtin()?,
	};
	tracing::info!("Loaded configuration [{}]", config.app.id);

	let mut session = build_session(config)?;
	apply_order_args(&mut session, &args.order);

	if !session.can_submit() {
		tracing::error!("Order is missing shipping details: --name, --street-address, --city and --zip are required");
		return Ok(ExitCode::FAILURE);
	}

	match session.place_order().await? {
		Outcome::Success { message } => {
			println!("Thanks! {}", message);
			Ok(ExitCode::SUCCESS)
		},
		// Already logged by the submission service
		_ => Ok(ExitCode::FAILURE),
	}
}

/// Macro to create a factory HashMap with the appropriate type alias
macro_rules! create_factory_map {
    ($interface:path, $error:path, $( $name:literal => $factory:expr ),* $(,)?) => {{
        let mut factories = std::collections::HashMap::new();
        $(
            factories.insert(
                $name.to_string(),
                $factory as fn(&toml::Value) -> Result<Box<dyn $interface>, $error>
            );
        )*
        factories
    }};
}

/// Builds the order session with every known transport registered.
fn build_session(config: Config) -> Result<OrderSession, Box<dyn std::error::Error>> {
	let submission_factories = create_factory_map!(
		cupcake_submission::SubmissionInterface,
		cupcake_submission::SubmissionError,
		"http" => create_http_submitter,
		"echo" => create_echo_submitter,
	);

	let factories = SessionFactories {
		submission_factories,
	};

	Ok(SessionBuilder::new(config).build(factories)?)
}

/// Copies the command-line order into the session, field by field.
///
/// Topping flags are only applied when the special request toggle is on,
/// since the screen hides them otherwise.
fn apply_order_args(session: &mut OrderSession, order: &OrderArgs) {
	session.set_cake_type(order.cake_type);
	session.set_quantity(order.quantity);
	session.set_special_request(order.special_request);

	if order.special_request {
		session.set_extra_frosting(order.extra_frosting);
		session.set_add_sprinkles(order.add_sprinkles);
	} else if order.extra_frosting || order.add_sprinkles {
		tracing::warn!("Topping flags ignored without --special-request");
	}

	if let Some(name) = &order.name {
		session.set_name(name.as_str());
	}
	if let Some(street_address) = &order.street_address {
		session.set_street_address(street_address.as_str());
	}
	if let Some(city) = &order.city {
		session.set_city(city.as_str());
	}
	if let Some(zip) = &order.zip {
		session.set_zip(zip.as_str());
	}
}
