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
use crate::book::ledger::Ledger;
use crate::book::lot::Lot;
use crate::reports::table::Table;
use rust_decimal::Decimal;

/// Struct for rendering the state of the book as tables. Values are
/// rounded for display only; the book itself always holds exact values.
pub struct PositionReporter {
	precision: u32,
}

impl PositionReporter {
	pub fn new(precision: u32) -> Self {
		Self { precision }
	}

	/// Rounds for display, banker's rounding, fixed decimal places.
	pub fn render(&self, value: Decimal) -> String {
		format!(
			"{:.prec$}",
			value.round_dp(self.precision),
			prec = self.precision as usize
		)
	}

	/// Prints one summary line per position, with a totals line for the
	/// cost basis. Pass a symbol to restrict the report to it.
	pub fn print_positions(&self, ledger: &Ledger, symbol: Option<&str>) {
		let positions: Vec<_> = ledger
			.positions()
			.filter(|(s, _)| symbol.is_none() || symbol == Some(s.as_str()))
			.collect();

		if positions.is_empty() {
			println!("No open positions");
			return;
		}

		let mut table = Table::new(5);
		table.right_align(vec![1, 2, 3, 4]);
		table.add_header(vec![
			"Symbol",
			"Lots",
			"Qty",
			"Cost Basis",
			"Avg Cost",
		]);
		table.add_rule();

		let mut total_basis = Decimal::ZERO;
		for (symbol, position) in &positions {
			total_basis += position.cost_basis();

			// A listed position is never empty, so the average exists
			let avg = match position.average_cost() {
				Some(avg) => self.render(avg),
				None => "UNK".to_string(),
			};

			table.add_row(vec![
				symbol.to_string(),
				position.lots().len().to_string(),
				position.quantity().to_string(),
				self.render(position.cost_basis()),
				avg,
			]);
		}

		table.add_column_rule(3);
		table.add_row(vec![
			String::new(),
			String::new(),
			String::new(),
			self.render(total_basis),
			String::new(),
		]);

		table.print()
	}

	/// Prints every open lot, oldest settlement date first within each
	/// symbol. Pass a symbol to restrict the report to it.
	pub fn print_lots(&self, ledger: &Ledger, symbol: Option<&str>) {
		let mut rows: Vec<(&str, Lot)> = Vec::new();
		for (s, position) in ledger.positions() {
			if symbol.is_some() && symbol != Some(s.as_str()) {
				continue;
			}

			let mut lots = position.lots().to_vec();
			lots.sort_by_key(|lot| lot.settle_date);
			for lot in lots {
				rows.push((s.as_str(), lot));
			}
		}

		if rows.is_empty() {
			println!("No open lots");
			return;
		}

		let mut table = Table::new(5);
		table.right_align(vec![2, 3, 4]);
		table.add_header(vec![
			"Symbol",
			"Settled",
			"Qty",
			"Unit Cost",
			"Cost",
		]);
		table.add_rule();

		for (symbol, lot) in rows {
			table.add_row(vec![
				symbol.to_string(),
				lot.settle_date.to_string(),
				lot.quantity.to_string(),
				self.render(lot.unit_price),
				self.render(lot.value()),
			]);
		}

		table.print()
	}

	/// Prints the unrealized gain/loss line for one symbol at the given
	/// market price. Quantity and cost basis come from the caller so the
	/// figures are exactly the ones the book computed against.
	pub fn print_unrealized(
		&self,
		symbol: &str,
		quantity: Decimal,
		cost_basis: Decimal,
		market_price: Decimal,
		gain_loss: Decimal,
	) {
		let mut table = Table::new(6);
		table.right_align(vec![1, 2, 3, 4, 5]);
		table.add_header(vec![
			"Symbol",
			"Qty",
			"Cost Basis",
			"Market",
			"Value",
			"UG/L",
		]);
		table.add_rule();

		table.add_row(vec![
			symbol.to_string(),
			quantity.to_string(),
			self.render(cost_basis),
			self.render(market_price),
			self.render(quantity * market_price),
			self.render(gain_loss),
		]);

		table.print()
	}
}
