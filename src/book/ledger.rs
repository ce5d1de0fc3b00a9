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
use crate::book::error::BookError;
use crate::book::lot::Lot;
use crate::book::matcher;
use crate::book::position::Position;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The central data structure of this system: every open lot, keyed by
/// asset symbol. Symbols are free-form, case-sensitive strings.
///
/// A symbol present in the map always holds at least one open lot; selling
/// a position down to nothing removes the symbol entirely rather than
/// leaving an empty entry behind. The ledger is an explicit value with no
/// global instance; callers own it, mutate it through purchases and sales
/// only, and decide when it is persisted.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
	positions: BTreeMap<String, Position>,
}

impl Ledger {
	pub fn new() -> Self {
		Self::default()
	}

	// -----------
	// -- INPUT --
	// -----------

	/// Records a purchase lot for the symbol, creating the position if it
	/// is the first. Quantity and unit price must both be positive.
	pub fn add_purchase(
		&mut self,
		symbol: &str,
		settle_date: NaiveDate,
		quantity: Decimal,
		unit_price: Decimal,
	) -> Result<(), BookError> {
		if quantity <= Decimal::ZERO || unit_price <= Decimal::ZERO {
			return Err(BookError::InvalidInput);
		}

		self.positions
			.entry(symbol.to_string())
			.or_default()
			.push(Lot::new(quantity, settle_date, unit_price));

		Ok(())
	}

	/// Sells the given quantity against the symbol's open lots, oldest
	/// settlement date first, and returns the realized gain or loss.
	///
	/// An unknown symbol sells from an empty position and therefore
	/// reports `InsufficientQuantity`, not `AssetNotFound`. The ledger is
	/// unchanged on any error; a position sold out completely is removed.
	pub fn sell(
		&mut self,
		symbol: &str,
		quantity: Decimal,
		unit_price: Decimal,
	) -> Result<Decimal, BookError> {
		if quantity <= Decimal::ZERO || unit_price <= Decimal::ZERO {
			return Err(BookError::InvalidInput);
		}

		let empty = Position::new();
		let position = self.positions.get(symbol).unwrap_or(&empty);

		let (updated, realized) =
			matcher::match_sale(position, quantity, unit_price)?;

		if updated.is_empty() {
			self.positions.remove(symbol);
		} else {
			self.positions.insert(symbol.to_string(), updated);
		}

		Ok(realized)
	}

	// -------------
	// -- QUERIES --
	// -------------

	/// Paper gain or loss on the held quantity at the given market price.
	/// Unlike sales, this refuses outright to answer for a symbol that
	/// holds nothing.
	pub fn unrealized_gain_loss(
		&self,
		symbol: &str,
		market_price: Decimal,
	) -> Result<Decimal, BookError> {
		if market_price <= Decimal::ZERO {
			return Err(BookError::InvalidInput);
		}

		let position = self.positions.get(symbol).ok_or_else(|| {
			BookError::AssetNotFound {
				symbol: symbol.to_string(),
			}
		})?;

		Ok(position.quantity() * market_price - position.cost_basis())
	}

	pub fn position(&self, symbol: &str) -> Option<&Position> {
		self.positions.get(symbol)
	}

	/// All positions in symbol order.
	pub fn positions(&self) -> impl Iterator<Item = (&String, &Position)> {
		self.positions.iter()
	}

	/// Total quantity held for the symbol; zero when it holds nothing.
	pub fn quantity(&self, symbol: &str) -> Decimal {
		self.positions
			.get(symbol)
			.map_or(Decimal::ZERO, Position::quantity)
	}

	/// Total cost basis for the symbol; zero when it holds nothing.
	pub fn cost_basis(&self, symbol: &str) -> Decimal {
		self.positions
			.get(symbol)
			.map_or(Decimal::ZERO, Position::cost_basis)
	}

	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}

	// -------------
	// -- LOADING --
	// -------------

	/// Checks every stored lot for values the types alone cannot rule
	/// out. Used after deserializing a book file.
	pub fn validate(&self) -> Result<(), BookError> {
		for position in self.positions.values() {
			for lot in position.lots() {
				lot.validate()?;
			}
		}
		Ok(())
	}

	/// Restores the no-empty-positions invariant after loading: exhausted
	/// lots disappear, and so do symbols left with no lots at all.
	pub fn prune(&mut self) {
		for position in self.positions.values_mut() {
			position.retain_open();
		}
		self.positions.retain(|_, position| !position.is_empty());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rust_decimal_macros::dec;

	fn date(s: &str) -> NaiveDate {
		s.parse().unwrap()
	}

	mod purchases {
		use super::*;

		#[test]
		fn test_purchase_increases_quantity_by_exactly_that_amount() {
			let mut ledger = Ledger::new();

			let before = ledger.quantity("AAPL");
			ledger
				.add_purchase("AAPL", date("2023-09-28"), dec!(10), dec!(160.0))
				.unwrap();

			assert_eq!(ledger.quantity("AAPL"), before + dec!(10));

			ledger
				.add_purchase("AAPL", date("2023-09-29"), dec!(2.5), dec!(161.0))
				.unwrap();

			assert_eq!(ledger.quantity("AAPL"), dec!(12.5));
		}

		#[test]
		fn test_purchase_rejects_non_positive_input() {
			let mut ledger = Ledger::new();

			let result = ledger.add_purchase(
				"AAPL",
				date("2023-09-28"),
				dec!(0),
				dec!(160.0),
			);
			assert_eq!(result, Err(BookError::InvalidInput));

			let result = ledger.add_purchase(
				"AAPL",
				date("2023-09-28"),
				dec!(10),
				dec!(-1),
			);
			assert_eq!(result, Err(BookError::InvalidInput));

			assert!(ledger.is_empty(), "rejected input must not be recorded");
		}

		#[test]
		fn test_symbols_are_case_sensitive() {
			let mut ledger = Ledger::new();
			ledger
				.add_purchase("AAPL", date("2023-09-28"), dec!(10), dec!(160.0))
				.unwrap();
			ledger
				.add_purchase("aapl", date("2023-09-28"), dec!(1), dec!(160.0))
				.unwrap();

			assert_eq!(ledger.quantity("AAPL"), dec!(10));
			assert_eq!(ledger.quantity("aapl"), dec!(1));
		}
	}

	mod sales {
		use super::*;

		#[test]
		fn test_sale_updates_position_and_reports_gain() {
			let mut ledger = Ledger::new();
			ledger
				.add_purchase("AAPL", date("2023-09-28"), dec!(10), dec!(160.0))
				.unwrap();
			ledger
				.add_purchase("AAPL", date("2023-09-29"), dec!(10), dec!(160.0))
				.unwrap();

			let realized =
				ledger.sell("AAPL", dec!(9), dec!(200.0)).unwrap();

			assert_eq!(realized, dec!(360.0));
			assert_eq!(ledger.quantity("AAPL"), dec!(11));
		}

		#[test]
		fn test_selling_out_removes_the_symbol() {
			let mut ledger = Ledger::new();
			ledger
				.add_purchase("AAPL", date("2023-09-28"), dec!(10), dec!(160.0))
				.unwrap();

			let realized =
				ledger.sell("AAPL", dec!(10), dec!(200.0)).unwrap();

			assert_eq!(realized, dec!(400.0));
			assert!(ledger.position("AAPL").is_none());
			assert!(ledger.is_empty());
		}

		#[test]
		fn test_cost_basis_drops_by_consumed_fragments() {
			let mut ledger = Ledger::new();
			ledger
				.add_purchase("AAPL", date("2023-09-28"), dec!(10), dec!(160.0))
				.unwrap();
			ledger
				.add_purchase("AAPL", date("2023-09-29"), dec!(10), dec!(170.0))
				.unwrap();

			let before = ledger.cost_basis("AAPL");
			ledger.sell("AAPL", dec!(11), dec!(200.0)).unwrap();

			// 10 units at 160 plus 1 unit at 170 left the book
			let consumed = dec!(10) * dec!(160.0) + dec!(1) * dec!(170.0);
			assert_eq!(ledger.cost_basis("AAPL"), before - consumed);
		}

		#[test]
		fn test_oversell_fails_and_leaves_ledger_unchanged() {
			let mut ledger = Ledger::new();
			ledger
				.add_purchase("AAPL", date("2023-09-28"), dec!(10), dec!(160.0))
				.unwrap();

			let snapshot = ledger.clone();
			let result = ledger.sell("AAPL", dec!(11), dec!(200.0));

			assert_eq!(
				result,
				Err(BookError::InsufficientQuantity {
					requested: dec!(11),
					available: dec!(10),
				})
			);
			assert_eq!(ledger, snapshot);
		}

		#[test]
		fn test_sale_against_unknown_symbol_reports_insufficient() {
			let mut ledger = Ledger::new();

			// Deliberate: an absent position is an empty one, so this is
			// not AssetNotFound
			let result = ledger.sell("MSFT", dec!(1), dec!(200.0));

			assert_eq!(
				result,
				Err(BookError::InsufficientQuantity {
					requested: dec!(1),
					available: dec!(0),
				})
			);
		}

		#[test]
		fn test_sale_rejects_non_positive_input() {
			let mut ledger = Ledger::new();
			ledger
				.add_purchase("AAPL", date("2023-09-28"), dec!(10), dec!(160.0))
				.unwrap();

			let result = ledger.sell("AAPL", dec!(-1), dec!(200.0));
			assert_eq!(result, Err(BookError::InvalidInput));

			let result = ledger.sell("AAPL", dec!(1), dec!(0));
			assert_eq!(result, Err(BookError::InvalidInput));
		}
	}

	mod unrealized {
		use super::*;

		#[test]
		fn test_unknown_symbol_is_asset_not_found() {
			let ledger = Ledger::new();

			let result = ledger.unrealized_gain_loss("AAPL", dec!(200.0));

			assert_eq!(
				result,
				Err(BookError::AssetNotFound {
					symbol: "AAPL".to_string(),
				})
			);
		}

		#[test]
		fn test_single_lot_matches_closed_form() {
			let mut ledger = Ledger::new();
			ledger
				.add_purchase("AAPL", date("2023-09-28"), dec!(10), dec!(160.0))
				.unwrap();

			let gl =
				ledger.unrealized_gain_loss("AAPL", dec!(175.0)).unwrap();

			assert_eq!(gl, dec!(10) * (dec!(175.0) - dec!(160.0)));
		}

		#[test]
		fn test_sign_tracks_market_against_weighted_average_cost() {
			let mut ledger = Ledger::new();
			ledger
				.add_purchase("AAPL", date("2023-09-28"), dec!(10), dec!(100))
				.unwrap();
			ledger
				.add_purchase("AAPL", date("2023-09-29"), dec!(10), dec!(200))
				.unwrap();

			// Weighted-average cost is 150
			let at_cost =
				ledger.unrealized_gain_loss("AAPL", dec!(150)).unwrap();
			assert_eq!(at_cost, dec!(0));

			let above =
				ledger.unrealized_gain_loss("AAPL", dec!(151)).unwrap();
			assert!(above > dec!(0));

			let below =
				ledger.unrealized_gain_loss("AAPL", dec!(149)).unwrap();
			assert!(below < dec!(0));
		}

		#[test]
		fn test_rejects_non_positive_market_price() {
			let mut ledger = Ledger::new();
			ledger
				.add_purchase("AAPL", date("2023-09-28"), dec!(10), dec!(160.0))
				.unwrap();

			let result = ledger.unrealized_gain_loss("AAPL", dec!(0));
			assert_eq!(result, Err(BookError::InvalidInput));
		}
	}

	mod loading {
		use super::*;

		#[test]
		fn test_validate_flags_malformed_lots() {
			let mut ledger = Ledger::new();
			ledger
				.add_purchase("AAPL", date("2023-09-28"), dec!(10), dec!(160.0))
				.unwrap();
			assert!(ledger.validate().is_ok());

			let bad: Ledger = serde_json::from_str(
				r#"{"AAPL":[["-1","2023-09-28","160.0"]]}"#,
			)
			.unwrap();
			assert!(matches!(
				bad.validate(),
				Err(BookError::InvalidLotFormat { .. })
			));
		}

		#[test]
		fn test_prune_restores_invariants() {
			let mut ledger: Ledger = serde_json::from_str(
				r#"{"AAPL":[["0","2023-09-28","160.0"],["5","2023-09-29","170.0"]],"MSFT":[]}"#,
			)
			.unwrap();

			ledger.prune();

			assert_eq!(ledger.quantity("AAPL"), dec!(5));
			assert!(ledger.position("MSFT").is_none());
		}

		#[test]
		fn test_serializes_as_symbol_to_triples_mapping() {
			let mut ledger = Ledger::new();
			ledger
				.add_purchase("AAPL", date("2023-09-28"), dec!(10), dec!(160.0))
				.unwrap();

			let json = serde_json::to_string(&ledger).unwrap();
			assert_eq!(json, r#"{"AAPL":[["10","2023-09-28","160.0"]]}"#);

			let back: Ledger = serde_json::from_str(&json).unwrap();
			assert_eq!(back, ledger);
		}
	}
}
