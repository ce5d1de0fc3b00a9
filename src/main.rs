/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::config::config_file::Config;
use crate::reports::position_reporter::PositionReporter;
use crate::store::filesystem::Filesystem;
use anyhow::{anyhow, bail, Error};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::str::FromStr;

mod book;
mod config;
mod reports;
mod store;

#[derive(Parser)]
#[command(
	name = "lotbook",
	version,
	about = "Investment lot tracking and cost basis tool"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	/// The asset symbol to operate on
	#[arg(required = false)]
	symbol: Option<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Quantity to buy or sell
	#[arg(short, long)]
	quantity: Option<String>,

	/// Unit price of the trade
	#[arg(short, long)]
	price: Option<String>,

	/// Settlement date of the trade (YYYY-MM-DD; defaults to today)
	#[arg(short, long)]
	date: Option<String>,

	/// Market price for the unrealized gain/loss report
	#[arg(short, long)]
	market: Option<String>,

	/// Specifies the book file (default: book.path from the config)
	#[arg(short, long)]
	file: Option<String>,

	/// Custom config file location (default: ~/.config/lotbook/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Amount of decimal places to show for amounts on reports
	#[arg(short = 'P', long)]
	precision: Option<u32>,
}

impl Cli {
	/// The point is that this number exceeds what anyone wants; it's just to
	/// stop the program from printing e.g. millions of zeroes by accident
	const MAX_PRECISION: u32 = 50;

	const DEFAULT_PRECISION: u32 = 2;

	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		if let Some(prec) = self.precision {
			if prec > Cli::MAX_PRECISION {
				bail!("Maximum precision is {}", Cli::MAX_PRECISION);
			}
		}

		Ok(())
	}
}

#[derive(Clone, ValueEnum)]
enum Directive {
	Buy,  // record a purchase lot
	Sell, // sell against open lots, oldest first

	Pos,  // position summary
	Lots, // open lot detail

	Ugl, // unrealized gain/loss for one symbol
}

fn main() -> Result<(), Error> {
	let args = Cli::parse();
	args.validate()?;

	let fs = Filesystem::new();
	let config = fs.get_config(args.config.as_ref())?;

	let book_path = resolve_book_path(&args, &config)?;
	let precision = args
		.precision
		.or_else(|| config.book.as_ref().and_then(|b| b.precision))
		.unwrap_or(Cli::DEFAULT_PRECISION);

	let mut ledger = fs.load_book(&book_path)?;
	let reporter = PositionReporter::new(precision);

	match args.command {
		Directive::Buy => {
			let symbol = require_symbol(&args)?;
			let quantity = parse_decimal(args.quantity.as_ref(), "quantity")?;
			let price = parse_decimal(args.price.as_ref(), "price")?;
			let date = parse_date_or_today(args.date.as_ref())?;

			ledger.add_purchase(symbol, date, quantity, price)?;
			fs.save_book(&ledger, &book_path)?;

			println!("Bought {} {} at {} on {}", quantity, symbol, price, date);
			reporter.print_positions(&ledger, Some(symbol));
		},
		Directive::Sell => {
			let symbol = require_symbol(&args)?;
			let quantity = parse_decimal(args.quantity.as_ref(), "quantity")?;
			let price = parse_decimal(args.price.as_ref(), "price")?;

			// Recorded for the user's benefit only; consumption order is
			// decided by the purchase lots' settlement dates
			let date = parse_date_or_today(args.date.as_ref())?;

			let realized = ledger.sell(symbol, quantity, price)?;
			fs.save_book(&ledger, &book_path)?;

			println!("Sold {} {} at {} on {}", quantity, symbol, price, date);
			println!("Realized G/L: {}", reporter.render(realized));

			if ledger.position(symbol).is_none() {
				println!("Position closed");
			} else {
				reporter.print_positions(&ledger, Some(symbol));
			}
		},
		Directive::Pos => {
			if ledger.is_empty() {
				println!("The book is empty");
			} else {
				reporter.print_positions(&ledger, args.symbol.as_deref());
			}
		},
		Directive::Lots => {
			reporter.print_lots(&ledger, args.symbol.as_deref());
		},
		Directive::Ugl => {
			let symbol = require_symbol(&args)?;
			let market = parse_decimal(args.market.as_ref(), "market price")?;

			let gain_loss = ledger.unrealized_gain_loss(symbol, market)?;
			reporter.print_unrealized(
				symbol,
				ledger.quantity(symbol),
				ledger.cost_basis(symbol),
				market,
				gain_loss,
			);
		},
	}

	Ok(())
}

fn resolve_book_path(args: &Cli, config: &Config) -> Result<String, Error> {
	if let Some(file) = &args.file {
		return Ok(file.clone());
	}

	if let Some(path) = config.book.as_ref().and_then(|b| b.path.clone()) {
		return Ok(path);
	}

	bail!("No book file specified; pass -f or set book.path in the config")
}

fn require_symbol(args: &Cli) -> Result<&str, Error> {
	match &args.symbol {
		Some(symbol) => Ok(symbol),
		None => bail!("No symbol specified"),
	}
}

fn parse_decimal(
	input: Option<&String>,
	label: &str,
) -> Result<Decimal, Error> {
	match input {
		Some(raw) => Decimal::from_str(raw)
			.map_err(|e| anyhow!("Invalid {}: {}", label, e)),
		None => bail!("No {} specified", label),
	}
}

fn parse_date_or_today(input: Option<&String>) -> Result<NaiveDate, Error> {
	match input {
		Some(raw) => NaiveDate::from_str(raw)
			.map_err(|_| anyhow!("Date format must be YYYY-MM-DD")),
		None => Ok(today()),
	}
}

fn today() -> NaiveDate {
	Local::now().date_naive()
}
