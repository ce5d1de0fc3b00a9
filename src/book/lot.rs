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
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// On-disk shape of a lot. The book file stores each lot as this triple.
type LotRecord = (Decimal, NaiveDate, Decimal);

/// A discrete batch of an asset acquired in a single purchase. Quantity is
/// the amount still unsold from the batch; it shrinks as sales consume the
/// lot and never goes negative. The settlement date is the lot's ordering
/// key when sales are matched.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "LotRecord", into = "LotRecord")]
pub struct Lot {
	pub quantity: Decimal,
	pub settle_date: NaiveDate,
	pub unit_price: Decimal, // per-unit cost at purchase, always positive
}

impl Lot {
	pub fn new(
		quantity: Decimal,
		settle_date: NaiveDate,
		unit_price: Decimal,
	) -> Self {
		Self {
			quantity,
			settle_date,
			unit_price,
		}
	}

	/// Cost basis of what remains in this lot.
	pub fn value(&self) -> Decimal {
		self.quantity * self.unit_price
	}

	pub fn is_exhausted(&self) -> bool {
		self.quantity.is_zero()
	}

	/// Checks that this describes a lot the book could actually hold.
	/// Stored data can carry values the types alone do not rule out.
	pub fn validate(&self) -> Result<(), BookError> {
		if self.quantity < Decimal::ZERO {
			return Err(BookError::InvalidLotFormat {
				reason: format!("negative quantity {}", self.quantity),
			});
		}

		if self.unit_price <= Decimal::ZERO {
			return Err(BookError::InvalidLotFormat {
				reason: format!("non-positive unit price {}", self.unit_price),
			});
		}

		Ok(())
	}
}

impl From<LotRecord> for Lot {
	fn from((quantity, settle_date, unit_price): LotRecord) -> Self {
		Self {
			quantity,
			settle_date,
			unit_price,
		}
	}
}

impl From<Lot> for LotRecord {
	fn from(lot: Lot) -> Self {
		(lot.quantity, lot.settle_date, lot.unit_price)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rust_decimal_macros::dec;

	fn date(s: &str) -> NaiveDate {
		s.parse().unwrap()
	}

	#[test]
	fn test_value() {
		let lot = Lot::new(dec!(10), date("2023-09-28"), dec!(160.0));
		assert_eq!(lot.value(), dec!(1600));
	}

	#[test]
	fn test_serializes_as_triple() {
		let lot = Lot::new(dec!(10), date("2023-09-28"), dec!(160.0));
		let json = serde_json::to_string(&lot).unwrap();
		assert_eq!(json, r#"["10","2023-09-28","160.0"]"#);
	}

	#[test]
	fn test_deserializes_from_triple() {
		let lot: Lot =
			serde_json::from_str(r#"["10","2023-09-28","160.0"]"#).unwrap();
		assert_eq!(lot, Lot::new(dec!(10), date("2023-09-28"), dec!(160.0)));
	}

	#[test]
	fn test_rejects_wrong_arity() {
		let result = serde_json::from_str::<Lot>(r#"["10","2023-09-28"]"#);
		assert!(result.is_err());
	}

	#[test]
	fn test_validate() {
		let lot = Lot::new(dec!(0), date("2023-09-28"), dec!(160.0));
		assert!(lot.validate().is_ok(), "zero quantity is exhausted, not bad");

		let lot = Lot::new(dec!(-1), date("2023-09-28"), dec!(160.0));
		assert!(matches!(
			lot.validate(),
			Err(BookError::InvalidLotFormat { .. })
		));

		let lot = Lot::new(dec!(1), date("2023-09-28"), dec!(0));
		assert!(matches!(
			lot.validate(),
			Err(BookError::InvalidLotFormat { .. })
		));
	}
}
