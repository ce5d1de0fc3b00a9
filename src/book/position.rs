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
use crate::book::lot::Lot;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All open lots of one asset, in the order they were recorded. Sale
/// matching sorts by settlement date before consuming, so stored order
/// only decides ties between lots settled on the same date.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Position {
	lots: Vec<Lot>,
}

impl Position {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, lot: Lot) {
		self.lots.push(lot);
	}

	pub fn lots(&self) -> &[Lot] {
		&self.lots
	}

	pub fn is_empty(&self) -> bool {
		self.lots.is_empty()
	}

	/// Total quantity held across all lots.
	pub fn quantity(&self) -> Decimal {
		self.lots.iter().map(|lot| lot.quantity).sum()
	}

	/// Total amount paid for what is currently held.
	pub fn cost_basis(&self) -> Decimal {
		self.lots.iter().map(Lot::value).sum()
	}

	/// Weighted-average unit cost. None when nothing is held, since there
	/// is no meaningful average to report.
	pub fn average_cost(&self) -> Option<Decimal> {
		let quantity = self.quantity();
		if quantity.is_zero() {
			return None;
		}
		Some(self.cost_basis() / quantity)
	}

	/// Drops exhausted lots, keeping the rest in recorded order.
	pub fn retain_open(&mut self) {
		self.lots.retain(|lot| !lot.is_exhausted());
	}
}

impl From<Vec<Lot>> for Position {
	fn from(lots: Vec<Lot>) -> Self {
		Self { lots }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use rust_decimal_macros::dec;

	fn lot(quantity: Decimal, date: &str, unit_price: Decimal) -> Lot {
		Lot::new(quantity, date.parse::<NaiveDate>().unwrap(), unit_price)
	}

	#[test]
	fn test_empty_position_sums_to_zero() {
		let position = Position::new();
		assert_eq!(position.quantity(), dec!(0));
		assert_eq!(position.cost_basis(), dec!(0));
		assert_eq!(position.average_cost(), None);
	}

	#[test]
	fn test_quantity_and_cost_basis() {
		let position = Position::from(vec![
			lot(dec!(10), "2023-09-28", dec!(160.0)),
			lot(dec!(5), "2023-09-29", dec!(170.0)),
		]);

		assert_eq!(position.quantity(), dec!(15));
		assert_eq!(position.cost_basis(), dec!(2450));
	}

	#[test]
	fn test_average_cost() {
		let position = Position::from(vec![
			lot(dec!(10), "2023-09-28", dec!(100)),
			lot(dec!(10), "2023-09-29", dec!(200)),
		]);

		assert_eq!(position.average_cost(), Some(dec!(150)));
	}

	#[test]
	fn test_retain_open() {
		let mut position = Position::from(vec![
			lot(dec!(0), "2023-09-28", dec!(160.0)),
			lot(dec!(5), "2023-09-29", dec!(170.0)),
		]);

		position.retain_open();
		assert_eq!(position.lots().len(), 1);
		assert_eq!(position.quantity(), dec!(5));
	}
}
